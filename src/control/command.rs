//! Actuator commands and their wire encoding.
//!
//! Both commands go to the same device topic.  The node tells them apart
//! by the first byte of the two-byte payload:
//!
//! | command  | off    | on     |
//! |----------|--------|--------|
//! | fan      | `"00"` | `"01"` |
//! | watering | `"10"` | `"11"` |
//!
//! The node firmware matches these exact bytes; do not change them.

use serde::{Deserialize, Serialize};

const FAN_OFF: &[u8; 2] = b"00";
const FAN_ON: &[u8; 2] = b"01";
const WATERING_OFF: &[u8; 2] = b"10";
const WATERING_ON: &[u8; 2] = b"11";

/// Desired actuator state for one control tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActuatorCommand {
    pub watering_enabled: bool,
    pub fan_enabled: bool,
}

impl ActuatorCommand {
    /// Both actuators off, the state before the first control tick.
    pub const fn all_off() -> Self {
        Self {
            watering_enabled: false,
            fan_enabled: false,
        }
    }

    /// Watering and fan follow the same latch.
    pub const fn from_latch(active: bool) -> Self {
        Self {
            watering_enabled: active,
            fan_enabled: active,
        }
    }

    /// Fan payload, `"00"` / `"01"`.
    pub const fn fan_payload(&self) -> &'static [u8] {
        if self.fan_enabled { FAN_ON } else { FAN_OFF }
    }

    /// Watering payload, `"10"` / `"11"`.
    pub const fn watering_payload(&self) -> &'static [u8] {
        if self.watering_enabled {
            WATERING_ON
        } else {
            WATERING_OFF
        }
    }

    /// Payloads in publish order: fan first, then watering.
    pub const fn payloads(&self) -> [&'static [u8]; 2] {
        [self.fan_payload(), self.watering_payload()]
    }
}
