//! Agent configuration
//!
//! All tunable parameters for the Aerodome agent, loaded from `agent.yaml`.
//! Keys are camelCase to stay compatible with deployed config files:
//!
//! ```yaml
//! serialNumber: 3927-2849-2930-1289
//! thresholds:
//!   humidity:
//!     low: 0.30       # fractions, scaled ×100 for the policy
//!     high: 0.70
//!     invalid: 0.10
//!     duration: 60    # seconds
//! ```

use std::path::PathBuf;
use std::time::Duration;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::control::HumidityThresholds;

/// Core agent configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentConfig {
    /// Device serial; topic names are derived from it.
    pub serial_number: String,
    /// First topic level, shared by every device.
    pub topic_prefix: String,
    pub broker: BrokerConfig,
    pub thresholds: ThresholdsConfig,
    pub intervals: IntervalConfig,
    pub archive: ArchiveConfig,
}

/// MQTT broker connection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrokerConfig {
    pub host: String,
    pub port: u16,
    pub client_id: String,
    pub keep_alive_secs: u64,
    /// `false` keeps the broker session (and queued messages) across reconnects.
    pub clean_session: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdsConfig {
    pub humidity: HumidityConfig,
}

/// Humidity thresholds as written in the file: fractions of 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HumidityConfig {
    pub low: f64,
    pub high: f64,
    pub invalid: f64,
    /// Seconds humidity must stay above `high` before watering stops.
    pub duration: u64,
}

/// Scheduler periods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntervalConfig {
    /// Fast tick: policy evaluation + actuator publish (milliseconds).
    pub control_ms: u64,
    /// Slow tick: archive snapshot (seconds).
    pub archive_secs: u64,
}

/// Archive location and site clock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArchiveConfig {
    pub dir: PathBuf,
    /// Site offset from UTC, used for archive keys and timestamps.
    pub utc_offset_hours: i32,
}

/// Topic names for one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topics {
    /// Telemetry frames from the node.
    pub sensors: String,
    /// Actuator commands to the node.
    pub commands: String,
}

impl Topics {
    pub fn for_device(prefix: &str, serial: &str) -> Self {
        Self {
            sensors: format!("{prefix}/{serial}/sensors"),
            commands: format!("{prefix}/{serial}"),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            serial_number: String::new(),
            topic_prefix: "AERODOME".into(),
            broker: BrokerConfig::default(),
            thresholds: ThresholdsConfig::default(),
            intervals: IntervalConfig::default(),
            archive: ArchiveConfig::default(),
        }
    }
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            host: "broker.emqx.io".into(),
            port: 1883,
            client_id: "AERODOME".into(),
            keep_alive_secs: 20,
            clean_session: false,
        }
    }
}

impl Default for HumidityConfig {
    fn default() -> Self {
        Self {
            low: 0.30,
            high: 0.70,
            invalid: 0.10,
            duration: 60,
        }
    }
}

impl Default for IntervalConfig {
    fn default() -> Self {
        Self {
            control_ms: 5_000,  // 0.2 Hz
            archive_secs: 180,  // every 3 min
        }
    }
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("archive"),
            utc_offset_hours: 7,
        }
    }
}

impl HumidityConfig {
    /// Scale the file's fractions onto the 0–100 reading scale.
    pub fn to_thresholds(&self) -> HumidityThresholds {
        HumidityThresholds {
            low: self.low * 100.0,
            high: self.high * 100.0,
            invalid_floor: self.invalid * 100.0,
            high_duration_secs: self.duration,
        }
    }
}

impl IntervalConfig {
    pub fn control_period(&self) -> Duration {
        Duration::from_millis(self.control_ms)
    }

    pub fn archive_period(&self) -> Duration {
        Duration::from_secs(self.archive_secs)
    }
}

impl AgentConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yaml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Topic names for this device.
    pub fn topics(&self) -> Topics {
        Topics::for_device(&self.topic_prefix, &self.serial_number)
    }

    /// Policy thresholds on the reading scale.
    pub fn humidity_thresholds(&self) -> HumidityThresholds {
        self.thresholds.humidity.to_thresholds()
    }

    /// Reject values that cannot produce a working agent.
    ///
    /// An `invalid` floor at or above `low` is legal (the floor simply wins)
    /// but almost certainly a typo, so it is only warned about.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.serial_number.trim().is_empty() {
            return Err(ConfigError::ValidationFailed("serialNumber is empty"));
        }
        if self.topic_prefix.is_empty() || self.topic_prefix.contains(['/', '+', '#']) {
            return Err(ConfigError::ValidationFailed("topicPrefix must be one topic level"));
        }
        if self.serial_number.contains(['/', '+', '#']) {
            return Err(ConfigError::ValidationFailed("serialNumber contains topic separators"));
        }

        let h = &self.thresholds.humidity;
        for value in [h.low, h.high, h.invalid] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ValidationFailed(
                    "humidity thresholds must be fractions in 0.0..=1.0",
                ));
            }
        }
        if h.low > h.high {
            return Err(ConfigError::ValidationFailed("humidity.low above humidity.high"));
        }
        if h.invalid >= h.low {
            warn!(
                "Config: humidity.invalid ({}) >= humidity.low ({}), dry readings will switch watering off",
                h.invalid, h.low
            );
        }

        if self.intervals.control_ms == 0 || self.intervals.archive_secs == 0 {
            return Err(ConfigError::ValidationFailed("intervals must be non-zero"));
        }
        if self.broker.host.is_empty() || self.broker.port == 0 {
            return Err(ConfigError::ValidationFailed("broker host/port missing"));
        }
        // Brokers only keep a session for a named client.
        if self.broker.client_id.is_empty() && !self.broker.clean_session {
            return Err(ConfigError::ValidationFailed(
                "broker.clientId is required unless cleanSession is true",
            ));
        }
        if !(-23..=23).contains(&self.archive.utc_offset_hours) {
            return Err(ConfigError::ValidationFailed("utcOffsetHours outside -23..=23"));
        }
        Ok(())
    }
}
