//! Actuator control: the humidity hysteresis policy and the commands it
//! produces.

pub mod command;
pub mod hysteresis;

pub use command::ActuatorCommand;
pub use hysteresis::{ControlState, HumidityThresholds, evaluate};
