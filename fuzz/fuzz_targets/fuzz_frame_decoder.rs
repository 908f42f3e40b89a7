//! Fuzz target: `sensors::decode`
//!
//! Arbitrary bytes must never panic the decoder.  Accepted frames must be
//! plain ASCII-compatible text with exactly five fields and the marker.
//!
//! cargo fuzz run fuzz_frame_decoder

#![no_main]

use aerodome::sensors::{FIELD_COUNT, FRAME_MARKER, decode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if decode(data).is_ok() {
        let text = core::str::from_utf8(data).expect("accepted frame must be utf-8");
        let fields: Vec<&str> = text.split(',').collect();
        assert_eq!(fields.len(), FIELD_COUNT);
        assert_eq!(fields[0], FRAME_MARKER);
    }
});
