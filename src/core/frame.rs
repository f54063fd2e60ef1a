//! # Frame Reassembly
//!
//! Turns a raw byte stream into discrete length-delimited frames.
//!
//! Every frame starts with a little-endian `u32` total length that
//! *includes* the 4 header bytes; the payload is the remainder. Transport
//! reads may split a frame across arbitrary chunk boundaries, so the
//! reassembler accumulates chunks until the declared length is reached.
//!
//! ## Known Limitations
//! The protocol is strictly request/response batched, and the server
//! never concatenates two frames into one transport write. The
//! reassembler therefore does not resynchronize on trailing bytes past a
//! declared frame length; it reports `TrailingFrameBytes` and the caller
//! is expected to drop the connection. Likewise, a first chunk shorter
//! than the 4-byte header is treated as a protocol violation rather than
//! buffered.

use bytes::{Bytes, BytesMut};
use tracing::trace;

use crate::config::MAX_FRAME_SIZE;
use crate::error::{ProtocolError, Result};

/// Frame header size in bytes (little-endian u32 total length)
pub const HEADER_LEN: usize = 4;

/// Reassembles length-prefixed frames from a stream of transport chunks.
///
/// State is a buffer of bytes received so far plus the declared total
/// length of the frame in progress (`None` while the header has not been
/// read).
#[derive(Debug, Default)]
pub struct FrameReassembler {
    buf: BytesMut,
    declared_len: Option<usize>,
}

impl FrameReassembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one transport chunk, producing the frame payload once the
    /// declared length has been reached.
    ///
    /// # Errors
    /// - `IncompleteHeader` if a chunk shorter than 4 bytes arrives while
    ///   no frame is in progress
    /// - `InvalidFrameLength` if the declared length is below the header
    ///   size or above [`MAX_FRAME_SIZE`]
    /// - `TrailingFrameBytes` if accumulated bytes overshoot the declared
    ///   length (multiple frames per read are not supported)
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Option<Bytes>> {
        let declared = match self.declared_len {
            Some(len) => len,
            None => {
                if chunk.len() < HEADER_LEN {
                    return Err(ProtocolError::IncompleteHeader);
                }
                let declared =
                    u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]) as usize;
                if declared < HEADER_LEN || declared > MAX_FRAME_SIZE {
                    return Err(ProtocolError::InvalidFrameLength(declared));
                }
                trace!(declared, chunk = chunk.len(), "frame header read");
                declared
            }
        };

        self.buf.extend_from_slice(chunk);

        if self.buf.len() < declared {
            // wait for more data
            self.declared_len = Some(declared);
            return Ok(None);
        }
        if self.buf.len() > declared {
            let excess = self.buf.len() - declared;
            return Err(ProtocolError::TrailingFrameBytes(excess));
        }

        let frame = self.buf.split_to(declared).freeze();
        self.declared_len = None;
        Ok(Some(frame.slice(HEADER_LEN..)))
    }

    /// True while a partially received frame is buffered.
    pub fn in_progress(&self) -> bool {
        self.declared_len.is_some()
    }

    /// Drop any partially accumulated frame (used on reconnect).
    pub fn reset(&mut self) {
        self.buf.clear();
        self.declared_len = None;
    }
}

/// Prepend the 4-byte little-endian length header to a serialized payload.
pub fn frame_payload(payload: &[u8]) -> Vec<u8> {
    let total = HEADER_LEN + payload.len();
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(payload);
    out
}
