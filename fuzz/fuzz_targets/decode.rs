#![no_main]
#[macro_use]
extern crate libfuzzer_sys;
extern crate huffpack;
use huffpack::container::read_container_header;

fuzz_target!(|data: &[u8]| {
    // a lone symbol decodes to `original_symbol_count` bytes without reading any payload
    if let Ok(header) = read_container_header(data) {
        if header.original_symbol_count() > 1 << 20 {
            return;
        }
    }
    if let Ok(decoded) = huffpack::decode(data) {
        // whatever decodes has to come out of the encoder unchanged
        let container = huffpack::encode(&decoded).unwrap();
        assert_eq!(huffpack::decode(&container).unwrap(), decoded);
    }
});
