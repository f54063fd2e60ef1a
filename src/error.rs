//! # Error Types
//!
//! Comprehensive error handling for the protocol client.
//!
//! This module defines all error variants that can occur during protocol
//! operations, from low-level I/O errors to high-level protocol violations.
//!
//! ## Error Categories
//! - **I/O Errors**: Socket and transport failures
//! - **Protocol Errors**: Malformed frame headers, missing batch counts
//! - **Decode Errors**: Missing packet indices, truncated tile layers,
//!   malformed documents, decompression failures
//! - **Resolution Errors**: Hostname lookup failures during a redirect
//!
//! Decode failures are fatal for the current connection: once a frame
//! fails to parse, frame boundaries can no longer be trusted and the
//! connection must be torn down rather than resynchronized.
//!
//! All errors implement `std::error::Error` for interoperability.

use std::io;
use thiserror::Error;

/// ProtocolError is the primary error type for all client operations
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Frame header shorter than 4 bytes")]
    IncompleteHeader,

    #[error("Invalid frame length: {0} bytes")]
    InvalidFrameLength(usize),

    #[error("Trailing bytes past declared frame length: {0} bytes")]
    TrailingFrameBytes(usize),

    #[error("Batch is missing the 'mc' packet count")]
    MissingBatchCount,

    #[error("Invalid batch packet count: {0}")]
    InvalidBatchCount(i64),

    #[error("Batch is missing packet index m{0}")]
    MissingPacketIndex(i64),

    #[error("Packet is missing the mandatory 'ID' tag")]
    MissingPacketId,

    #[error("Packet is missing field '{0}'")]
    MissingField(&'static str),

    #[error("Document decode error: {0}")]
    Document(#[from] bson::de::Error),

    #[error("Document encode error: {0}")]
    Serialize(#[from] bson::ser::Error),

    #[error("Decompression failed")]
    Decompression,

    #[error("Truncated {layer} layer: expected {expected} bytes, got {actual}")]
    TruncatedLayer {
        layer: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid world size: {0}x{1}")]
    InvalidWorldSize(i32, i32),

    #[error("Hostname resolution failed: {0}")]
    Resolution(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
