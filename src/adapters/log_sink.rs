//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade.  Routine traffic (every accepted frame, every
//! published command) goes out at `debug`; state changes and failures at
//! `info` / `warn`.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => info!("START | control loop running"),
            AppEvent::ReadingUpdated(r) => {
                debug!(
                    "READ | T={:.1}\u{00b0}C | RH={:.1}% | watering={} fan={}",
                    r.temperature,
                    r.humidity,
                    if r.watering_actuator_reported { "ON" } else { "OFF" },
                    if r.fan_actuator_reported { "ON" } else { "OFF" },
                );
            }
            AppEvent::FrameRejected(e) => warn!("DROP | {}", e),
            AppEvent::ModeChanged { active, humidity } => {
                info!(
                    "MODE | watering {} at RH={:.1}%",
                    if *active { "ON" } else { "OFF" },
                    humidity
                );
            }
            AppEvent::CommandPublished(c) => {
                debug!("CMD | watering={} fan={}", c.watering_enabled, c.fan_enabled);
            }
            AppEvent::PublishFailed(e) => warn!("CMD | publish failed: {}", e),
            AppEvent::Archived { key } => info!("ARCHIVE | snapshot stored under {}", key),
            AppEvent::ArchiveFailed(e) => warn!("ARCHIVE | {}", e),
            AppEvent::Stopped => info!("STOP | control loop exited"),
        }
    }
}
