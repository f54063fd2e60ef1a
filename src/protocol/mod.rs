//! # Protocol Layer
//!
//! The login/world-join session state machine and its outbound queue.
//!
//! The session is a synchronous state machine: it consumes decoded
//! packet batches and produces outbound packets (into its queue) plus
//! commands and events for the async client shell to execute. Keeping it
//! free of I/O makes the whole handshake scriptable in unit tests.

pub mod session;
