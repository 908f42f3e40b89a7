//! Humidity hysteresis policy.
//!
//! Turns the latest humidity reading into an on/off "watering mode" latch.
//! Dry soil switches watering on at once; wet soil must stay wet for a
//! configurable time before watering is switched off again.
//!
//! ```text
//!   humidity:  0 ── invalid ── low ─────────── high ───── 100
//!   latch:       off(fault)    on   (hold)     off after `duration`
//! ```
//!
//! Rules run in a fixed order every fast tick; later rules override
//! earlier ones:
//!
//! 1. humidity < `low`            → latch on, accumulator = 0
//! 2. humidity > `high`           → accumulator += elapsed,
//!    latch off once accumulator > `duration`
//! 3. humidity < `invalid_floor`  → latch off
//!
//! Rule 3 runs after rule 1, so a reading below both the floor and `low`
//! ends with the latch **off**.  With a sane configuration
//! (`invalid_floor < low`) this is exactly the "sensor fault" case.
//!
//! The policy is a pure function: no clock, no I/O, no randomness.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::ActuatorCommand;
use crate::sensors::SensorReading;

/// Policy thresholds, humidity on the 0–100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HumidityThresholds {
    /// Below this the soil is dry: start watering.
    pub low: f64,
    /// Above this the soil is wet: start counting towards stop.
    pub high: f64,
    /// Below this the reading is treated as a sensor fault.
    pub invalid_floor: f64,
    /// How long humidity must stay above `high` before watering stops.
    pub high_duration_secs: u64,
}

impl HumidityThresholds {
    /// Wet-band dwell time in milliseconds.
    pub const fn high_duration_ms(&self) -> u64 {
        self.high_duration_secs.saturating_mul(1000)
    }
}

impl Default for HumidityThresholds {
    fn default() -> Self {
        Self {
            low: 30.0,
            high: 70.0,
            invalid_floor: 10.0,
            high_duration_secs: 60,
        }
    }
}

/// Loop-owned control state.  Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    /// The hysteresis latch.
    pub watering_mode_active: bool,
    /// Time spent above `high` since the last low-humidity reset.
    pub mode_elapsed_ms: u64,
    /// When the previous fast tick ran.
    pub last_tick: Instant,
}

impl ControlState {
    /// Latch off, accumulator empty.
    pub fn new(now: Instant) -> Self {
        Self {
            watering_mode_active: false,
            mode_elapsed_ms: 0,
            last_tick: now,
        }
    }
}

/// Run one policy step.
///
/// `elapsed_ms` is the measured time since the previous tick; late ticks
/// simply contribute a larger delta.  `last_tick` is carried through
/// untouched, the scheduler owns it.
pub fn evaluate(
    reading: &SensorReading,
    elapsed_ms: u64,
    state: ControlState,
    thresholds: &HumidityThresholds,
) -> (ControlState, ActuatorCommand) {
    let mut next = state;
    let humidity = reading.humidity;

    if humidity < thresholds.low {
        next.watering_mode_active = true;
        next.mode_elapsed_ms = 0;
    }

    if humidity > thresholds.high {
        next.mode_elapsed_ms = next.mode_elapsed_ms.saturating_add(elapsed_ms);
        if next.mode_elapsed_ms > thresholds.high_duration_ms() {
            next.watering_mode_active = false;
        }
    }

    // Must stay after the low-humidity rule.
    if humidity < thresholds.invalid_floor {
        next.watering_mode_active = false;
    }

    (next, ActuatorCommand::from_latch(next.watering_mode_active))
}

// ── Tests ────────────────────────────────────────────────────
