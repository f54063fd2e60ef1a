#![no_main]

use libfuzzer_sys::fuzz_target;
use world_client::core::batch;

fuzz_target!(|data: &[u8]| {
    // Fuzz batch decode - test for panics, crashes, infinite loops
    let _ = batch::decode(data);
});
