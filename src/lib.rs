//! Aerodome greenhouse agent library.
//!
//! Decodes telemetry frames from a greenhouse node, runs the humidity
//! hysteresis policy and publishes fan/watering commands back to the node,
//! archiving a snapshot of the latest state on a slower cadence.
//!
//! The core ([`app::service::ControlService`], [`control`], [`sensors`])
//! is pure logic behind the port traits in [`app::ports`]; the [`adapters`]
//! module holds the concrete MQTT, file, clock and logging collaborators.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod archive;
pub mod channels;
pub mod config;
pub mod control;
pub mod error;
pub mod scheduler;
pub mod sensors;

pub use app::service::ControlService;
pub use config::AgentConfig;
pub use control::{ActuatorCommand, ControlState, HumidityThresholds};
pub use error::{Error, FormatError, Result};
pub use scheduler::{Schedule, Scheduler};
pub use sensors::SensorReading;
