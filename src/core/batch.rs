//! # Batch Codec
//!
//! Encodes and decodes the ordered packet batch carried by one frame.
//!
//! The wire representation is a single BSON document: keys `m0..m{mc-1}`
//! hold one packet mapping each, and the integer key `mc` holds the
//! count. Order is significant: packets are dispatched in index order on
//! decode and assigned consecutive indices on encode. Encoding also
//! prepends the 4-byte little-endian frame length header, so the output
//! of [`encode`] is written to the transport as-is.

use std::io::Cursor;

use bson::{Bson, Document};

use crate::core::frame::frame_payload;
use crate::core::packet::Packet;
use crate::error::{ProtocolError, Result};

/// Decode a frame payload into its ordered packet list.
///
/// # Errors
/// - `MissingBatchCount` if the `mc` key is absent or not an integer
/// - `InvalidBatchCount` if `mc` is negative
/// - `MissingPacketIndex` if any `m{i}` key is absent or not a mapping
/// - `MissingPacketId` if a packet mapping lacks the `ID` tag
pub fn decode(payload: &[u8]) -> Result<Vec<Packet>> {
    let doc = Document::from_reader(Cursor::new(payload))?;

    let count = match doc.get("mc") {
        Some(Bson::Int32(n)) => i64::from(*n),
        Some(Bson::Int64(n)) => *n,
        _ => return Err(ProtocolError::MissingBatchCount),
    };
    if count < 0 {
        return Err(ProtocolError::InvalidBatchCount(count));
    }

    // `mc` is untrusted; each packet costs several wire bytes, so the
    // payload length bounds any count a valid batch can declare
    let mut packets = Vec::with_capacity((count as u64).min(payload.len() as u64) as usize);
    for i in 0..count {
        let key = format!("m{i}");
        let entry = match doc.get(key.as_str()) {
            Some(Bson::Document(entry)) => entry,
            _ => return Err(ProtocolError::MissingPacketIndex(i)),
        };
        packets.push(Packet::from_document(entry.clone())?);
    }
    Ok(packets)
}

/// Encode an ordered packet list into a complete wire frame
/// (length header included).
pub fn encode(packets: &[Packet]) -> Result<Vec<u8>> {
    let mut root = Document::new();
    for (i, packet) in packets.iter().enumerate() {
        root.insert(format!("m{i}"), packet.document().clone());
    }
    root.insert("mc", packets.len() as i32);

    let mut body = Vec::new();
    root.to_writer(&mut body)?;
    Ok(frame_payload(&body))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use bson::doc;

    use super::*;
    use crate::core::frame::HEADER_LEN;

    fn packet(id: &str) -> Packet {
        Packet::from_document(doc! { "ID": id }).unwrap()
    }

    #[test]
    fn test_roundtrip_preserves_order_and_fields() {
        let packets = vec![
            Packet::login(),
            Packet::client_info(),
            Packet::move_position(1.5, -2.5, 99i64, 1, 7),
        ];
        let wire = encode(&packets).unwrap();
        let decoded = decode(&wire[HEADER_LEN..]).unwrap();
        assert_eq!(decoded, packets);
    }

    #[test]
    fn test_length_header_covers_whole_frame() {
        let wire = encode(&[packet("ST")]).unwrap();
        let declared = u32::from_le_bytes(wire[..4].try_into().unwrap()) as usize;
        assert_eq!(declared, wire.len());
    }

    #[test]
    fn test_empty_batch() {
        let wire = encode(&[]).unwrap();
        let decoded = decode(&wire[HEADER_LEN..]).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_missing_count_rejected() {
        let mut body = Vec::new();
        doc! { "m0": { "ID": "VChk" } }.to_writer(&mut body).unwrap();
        assert!(matches!(
            decode(&body),
            Err(ProtocolError::MissingBatchCount)
        ));
    }

    #[test]
    fn test_negative_count_rejected() {
        let mut body = Vec::new();
        doc! { "mc": -1i32 }.to_writer(&mut body).unwrap();
        assert!(matches!(
            decode(&body),
            Err(ProtocolError::InvalidBatchCount(-1))
        ));
    }

    #[test]
    fn test_count_exceeding_entries_rejected() {
        let mut body = Vec::new();
        doc! { "m0": { "ID": "VChk" }, "mc": 2i32 }
            .to_writer(&mut body)
            .unwrap();
        assert!(matches!(
            decode(&body),
            Err(ProtocolError::MissingPacketIndex(1))
        ));
    }

    #[test]
    fn test_entry_without_id_rejected() {
        let mut body = Vec::new();
        doc! { "m0": { "W": "buy" }, "mc": 1i32 }
            .to_writer(&mut body)
            .unwrap();
        assert!(matches!(decode(&body), Err(ProtocolError::MissingPacketId)));
    }

    #[test]
    fn test_malformed_document_rejected() {
        assert!(matches!(
            decode(&[0xFF, 0x00, 0x01]),
            Err(ProtocolError::Document(_))
        ));
    }

    #[test]
    fn test_huge_count_rejected_without_allocation() {
        // a hostile count must fail on the missing entry, not reserve
        // capacity for packets the payload cannot possibly hold
        for count in [i64::MAX, 1_000_000_000i64] {
            let mut body = Vec::new();
            doc! { "mc": count }.to_writer(&mut body).unwrap();
            assert!(matches!(
                decode(&body),
                Err(ProtocolError::MissingPacketIndex(0))
            ));
        }
    }

    #[test]
    fn test_int64_count_accepted() {
        let mut body = Vec::new();
        doc! { "m0": { "ID": "WCM" }, "mc": 1i64 }
            .to_writer(&mut body)
            .unwrap();
        let decoded = decode(&body).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].id(), "WCM");
    }
}
