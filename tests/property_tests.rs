//! Property-based tests using proptest
//!
//! These tests validate protocol invariants across a wide range of
//! randomly generated inputs: batch round-trips, frame reassembly under
//! arbitrary chunk boundaries, and decode robustness on garbage input.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use bson::doc;
use proptest::prelude::*;
use world_client::core::batch;
use world_client::core::frame::{FrameReassembler, HEADER_LEN};
use world_client::Packet;

fn arb_packet() -> impl Strategy<Value = Packet> {
    (
        "[A-Za-z]{2,4}",
        "[a-z0-9 ]{0,24}",
        any::<i32>(),
        any::<f64>().prop_filter("NaN breaks equality", |v| !v.is_nan()),
    )
        .prop_map(|(id, text, num, val)| {
            Packet::from_document(doc! { "ID": id, "S": text, "N": num, "V": val })
                .expect("valid packet")
        })
}

// Property: any ordered packet sequence round-trips through the batch
// codec with the same tags, field values, and order.
proptest! {
    #[test]
    fn prop_batch_roundtrip(packets in prop::collection::vec(arb_packet(), 0..16)) {
        let wire = batch::encode(&packets).expect("encode");
        let decoded = batch::decode(&wire[HEADER_LEN..]).expect("decode");
        prop_assert_eq!(decoded, packets);
    }
}

// Property: the declared frame length always covers the whole frame.
proptest! {
    #[test]
    fn prop_frame_length_header(packets in prop::collection::vec(arb_packet(), 0..8)) {
        let wire = batch::encode(&packets).expect("encode");
        let declared = u32::from_le_bytes(wire[..4].try_into().unwrap()) as usize;
        prop_assert_eq!(declared, wire.len());
    }
}

// Property: reassembly is chunk-boundary-independent. Splitting a valid
// frame at any sequence of points and feeding the pieces in order yields
// exactly one payload, identical to feeding the frame whole. The first
// chunk must keep the 4-byte header intact; past that, boundaries are
// arbitrary.
proptest! {
    #[test]
    fn prop_reassembly_chunk_independent(
        packets in prop::collection::vec(arb_packet(), 0..8),
        splits in prop::collection::vec(any::<prop::sample::Index>(), 0..6),
    ) {
        let wire = batch::encode(&packets).expect("encode");

        let mut points: Vec<usize> = splits
            .iter()
            .map(|ix| HEADER_LEN + ix.index(wire.len() - HEADER_LEN + 1))
            .collect();
        points.push(0);
        points.push(wire.len());
        points.sort_unstable();
        points.dedup();

        let mut reassembler = FrameReassembler::new();
        let mut produced = Vec::new();
        for pair in points.windows(2) {
            let chunk = &wire[pair[0]..pair[1]];
            if chunk.is_empty() {
                continue;
            }
            if let Some(payload) = reassembler.feed(chunk).expect("feed") {
                produced.push(payload);
            }
        }

        prop_assert_eq!(produced.len(), 1);
        prop_assert_eq!(produced[0].as_ref(), &wire[HEADER_LEN..]);
    }
}

// Property: batch decode never panics on arbitrary input; it returns a
// result either way.
proptest! {
    #[test]
    fn prop_batch_decode_no_panic(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = batch::decode(&data);
    }
}
