#![no_main]
#[macro_use]
extern crate libfuzzer_sys;
extern crate huffpack;
use huffpack::round_trip;

fuzz_target!(|data: &[u8]| {
    round_trip(data);
});
