//! # world-client
//!
//! Headless async client for a BSON-batched, length-prefixed game-server
//! protocol.
//!
//! The client establishes a TCP stream connection, reassembles
//! length-prefixed message frames, decodes the batched BSON packet
//! format, drives the login/world-join session state machine,
//! decompresses and parses the binary world snapshot, and emits
//! movement/chat packets.
//!
//! ## Architecture
//! - [`core`]: frame reassembly, the tagged [`Packet`] type, and the
//!   batch codec
//! - [`protocol`]: the session state machine and outbound queue
//! - [`world`]: the LZMA-compressed world snapshot decoder
//! - [`client`]: the TCP transport and single-consumer event loop
//! - [`config`]: process-start configuration and protocol constants
//!
//! ## Concurrency Model
//! Single-threaded cooperative scheduling: every event handler runs to
//! completion before the next is processed, so the session and its
//! outbound queue need no locking. Snapshot decompression and hostname
//! resolution are the only suspend points; both are generation-tagged so
//! a reconnect can never install stale results.
//!
//! ## Example
//! ```no_run
//! use world_client::{Client, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> world_client::Result<()> {
//!     let mut config = ClientConfig::default();
//!     config.server_host = "203.0.113.10".into();
//!     config.world = "buy".into();
//!
//!     let mut client = Client::new(config);
//!     client.run().await
//! }
//! ```

pub mod client;
pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod utils;
pub mod world;

pub use client::Client;
pub use config::ClientConfig;
pub use core::packet::{Packet, PacketKind};
pub use error::{ProtocolError, Result};
pub use protocol::session::{Session, SessionEvent, SessionState};
pub use world::{Tile, World};
