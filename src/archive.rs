//! Periodic archive snapshots.
//!
//! Every slow tick the scheduler captures the latest reading and the most
//! recent actuator command into an [`ArchiveSnapshot`] and hands it to the
//! [`ArchivePort`](crate::app::ports::ArchivePort) under a per-day key.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::control::ActuatorCommand;
use crate::sensors::SensorReading;

/// `YYYY-MM-DD`, one archive collection per site-local day.
pub const KEY_FORMAT: &str = "%Y-%m-%d";

/// Site-local wall-clock time of day.
pub const TIMESTAMP_FORMAT: &str = "%H:%M:%S";

/// One archived record.  Field names are the document schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveSnapshot {
    pub temperature: f64,
    pub humidity: f64,
    pub watering: bool,
    pub fan: bool,
    pub timestamp: String,
}

impl ArchiveSnapshot {
    /// Build a snapshot stamped with `at`.
    pub fn capture(
        reading: &SensorReading,
        command: &ActuatorCommand,
        at: &DateTime<FixedOffset>,
    ) -> Self {
        Self {
            temperature: reading.temperature,
            humidity: reading.humidity,
            watering: command.watering_enabled,
            fan: command.fan_enabled,
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

/// Archive key for the day containing `at`.
pub fn archive_key(at: &DateTime<FixedOffset>) -> String {
    at.format(KEY_FORMAT).to_string()
}
