#![no_main]

use libfuzzer_sys::fuzz_target;
use world_client::core::frame::FrameReassembler;

fuzz_target!(|data: &[u8]| {
    // Feed the input as a sequence of chunks split at positions derived
    // from the first byte - test for panics and runaway allocation.
    if data.is_empty() {
        return;
    }
    let step = (data[0] as usize).max(1);
    let mut reassembler = FrameReassembler::new();
    for chunk in data[1..].chunks(step) {
        if reassembler.feed(chunk).is_err() {
            return;
        }
    }
});
