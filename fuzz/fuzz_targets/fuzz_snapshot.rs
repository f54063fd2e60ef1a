#![no_main]

use libfuzzer_sys::fuzz_target;
use world_client::world::decode_snapshot;

fuzz_target!(|data: &[u8]| {
    // Fuzz snapshot decode - decompression bombs must be rejected, not
    // allocated
    let _ = decode_snapshot(data);
});
