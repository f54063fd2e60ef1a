//! # Core Protocol Components
//!
//! Low-level frame handling and the batched packet codec.
//!
//! This module provides the foundation for the protocol: length-prefixed
//! frame reassembly over a raw byte stream, the tagged packet type, and
//! the BSON batch codec that carries packets on the wire.
//!
//! ## Wire Format
//! ```text
//! [Length(4, LE, includes itself)] [BSON document(N)]
//! ```
//!
//! The BSON document is a mapping with keys `m0..m{mc-1}` holding one
//! packet each and an integer key `mc` holding the packet count. Packet
//! order is significant: packets are processed in index order.
//!
//! ## Security
//! - Maximum frame size: 16MB (prevents memory exhaustion)
//! - Declared length validated before allocation

pub mod batch;
pub mod frame;
pub mod packet;
