//! Outbound application events.
//!
//! The [`ControlService`](super::service::ControlService) and the scheduler
//! emit these through the [`EventSink`](super::ports::EventSink) port.
//! Adapters on the other side decide what to do with them.

use crate::control::ActuatorCommand;
use crate::error::FormatError;
use crate::sensors::SensorReading;

use super::ports::{StoreError, TransportError};

/// Structured events emitted by the control core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The control loop has started.
    Started,

    /// A frame was decoded and replaced the latest reading.
    ReadingUpdated(SensorReading),

    /// A frame was rejected; the previous reading is still in effect.
    FrameRejected(FormatError),

    /// The hysteresis latch flipped.
    ModeChanged { active: bool, humidity: f64 },

    /// Both actuator payloads were handed to the transport.
    CommandPublished(ActuatorCommand),

    /// A payload could not be published.
    PublishFailed(TransportError),

    /// A snapshot was accepted by the archive.
    Archived { key: String },

    /// The archive refused a snapshot; it is not retried.
    ArchiveFailed(StoreError),

    /// The control loop has exited.
    Stopped,
}
