//! Sensor telemetry: the [`SensorReading`] domain record and the frame
//! decoder that produces it.
//!
//! The field node publishes one ASCII frame per measurement:
//!
//! ```text
//! 1,24.5,55.0,1,0
//! │ │    │    │ └─ watering relay (active-low)
//! │ │    │    └─── fan relay (active-low)
//! │ │    └──────── relative humidity, %
//! │ └───────────── temperature, °C
//! └─────────────── record marker, always "1"
//! ```

mod frame;

pub use frame::{FIELD_COUNT, FRAME_MARKER, decode};

use serde::{Deserialize, Serialize};

/// One decoded telemetry frame.
///
/// Replaces the previous reading wholesale; fields are never merged across
/// frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Air temperature (°C).
    pub temperature: f64,
    /// Relative humidity on a 0–100 scale.
    pub humidity: f64,
    /// Watering relay state as reported by the node (already de-inverted).
    pub watering_actuator_reported: bool,
    /// Fan relay state as reported by the node (already de-inverted).
    pub fan_actuator_reported: bool,
}
