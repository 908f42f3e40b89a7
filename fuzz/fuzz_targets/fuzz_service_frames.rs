//! Fuzz target: `ControlService::handle_frame`
//!
//! Splits the input on newlines and feeds each piece as a frame.  A
//! rejected frame must leave the previous reading untouched.
//!
//! cargo fuzz run fuzz_service_frames

#![no_main]

use aerodome::app::events::AppEvent;
use aerodome::app::ports::EventSink;
use aerodome::{ControlService, HumidityThresholds};
use libfuzzer_sys::fuzz_target;

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let mut svc = ControlService::new(HumidityThresholds::default(), "fuzz");
    for frame in data.split(|b| *b == b'\n') {
        let before = *svc.reading();
        if svc.handle_frame(frame, &mut Discard).is_err() {
            let after = *svc.reading();
            // NaN readings compare unequal to themselves; compare bits.
            assert_eq!(before.temperature.to_bits(), after.temperature.to_bits());
            assert_eq!(before.humidity.to_bits(), after.humidity.to_bits());
        }
    }
});
