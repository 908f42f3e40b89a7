//! Control service, the hexagonal core.
//!
//! [`ControlService`] owns the latest [`SensorReading`], the hysteresis
//! [`ControlState`] and the most recent [`ActuatorCommand`].  It exposes one
//! handler per loop event.  All I/O flows through port traits injected at
//! call sites, so the whole service is testable with mock adapters.
//!
//! ```text
//!   raw frame ──▶ ┌────────────────────────┐ ──▶ TransportPort
//!                 │     ControlService     │
//!  fast / slow ──▶│  reading · latch · cmd │ ──▶ ArchivePort
//!                 └────────────────────────┘ ──▶ EventSink
//! ```
//!
//! The service is not `Sync` and is meant to be driven by exactly one
//! loop; see [`crate::scheduler`].

use std::time::Instant;

use chrono::{DateTime, FixedOffset};
use log::{debug, info, warn};

use crate::archive::{ArchiveSnapshot, archive_key};
use crate::channels::ShutdownToken;
use crate::control::{ActuatorCommand, ControlState, HumidityThresholds, evaluate};
use crate::error::FormatError;
use crate::sensors::{self, SensorReading};

use super::events::AppEvent;
use super::ports::{ArchivePort, EventSink, StoreError, TransportError, TransportPort};

/// Running counters, reported when the loop stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub frames_accepted: u64,
    pub frames_rejected: u64,
    pub fast_ticks: u64,
    pub publish_failures: u64,
    pub snapshots_archived: u64,
    pub archive_failures: u64,
}

// ───────────────────────────────────────────────────────────────
// ControlService
// ───────────────────────────────────────────────────────────────

pub struct ControlService {
    thresholds: HumidityThresholds,
    /// Device topic that receives both actuator payloads.
    command_topic: String,
    reading: SensorReading,
    state: ControlState,
    /// Last command computed by a fast tick, published or not.
    last_command: ActuatorCommand,
    stats: LoopStats,
}

impl ControlService {
    /// Zeroed reading, latch off, both actuators off.
    pub fn new(thresholds: HumidityThresholds, command_topic: impl Into<String>) -> Self {
        Self {
            thresholds,
            command_topic: command_topic.into(),
            reading: SensorReading::default(),
            state: ControlState::new(Instant::now()),
            last_command: ActuatorCommand::all_off(),
            stats: LoopStats::default(),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Mark loop entry; the first fast tick measures its delta from `now`.
    pub fn start(&mut self, now: Instant, sink: &mut impl EventSink) {
        self.state.last_tick = now;
        sink.emit(&AppEvent::Started);
        info!(
            "ControlService started (low={}%, high={}%, floor={}%, hold={}s)",
            self.thresholds.low,
            self.thresholds.high,
            self.thresholds.invalid_floor,
            self.thresholds.high_duration_secs
        );
    }

    pub fn stop(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Stopped);
        info!("ControlService stopped: {:?}", self.stats);
    }

    // ── Inbound frame ─────────────────────────────────────────

    /// Decode a frame and, if valid, replace the latest reading.
    ///
    /// A rejected frame leaves the previous reading in effect.
    pub fn handle_frame(
        &mut self,
        frame: &[u8],
        sink: &mut impl EventSink,
    ) -> Result<(), FormatError> {
        match sensors::decode(frame) {
            Ok(reading) => {
                self.reading = reading;
                self.stats.frames_accepted += 1;
                sink.emit(&AppEvent::ReadingUpdated(reading));
                Ok(())
            }
            Err(e) => {
                self.stats.frames_rejected += 1;
                warn!(
                    "Dropping frame {:?}: {}",
                    String::from_utf8_lossy(frame),
                    e
                );
                sink.emit(&AppEvent::FrameRejected(e));
                Err(e)
            }
        }
    }

    // ── Fast tick ─────────────────────────────────────────────

    /// Run the policy and publish the resulting command.
    ///
    /// The new state and command are kept even if publishing fails.  Both
    /// payloads are attempted unless `shutdown` has been requested, in which
    /// case the tick stops at the first failure.  Returns the first publish
    /// error, if any.
    pub fn fast_tick(
        &mut self,
        now: Instant,
        transport: &mut impl TransportPort,
        sink: &mut impl EventSink,
        shutdown: &ShutdownToken,
    ) -> Result<ActuatorCommand, TransportError> {
        self.stats.fast_ticks += 1;
        let elapsed_ms = now.saturating_duration_since(self.state.last_tick).as_millis() as u64;

        let prev_active = self.state.watering_mode_active;
        let (mut next, command) = evaluate(&self.reading, elapsed_ms, self.state, &self.thresholds);
        next.last_tick = now;
        self.state = next;
        self.last_command = command;

        debug!(
            "Tick +{}ms humidity={:.1}% latch={} hold={}ms",
            elapsed_ms, self.reading.humidity, next.watering_mode_active, next.mode_elapsed_ms
        );
        if next.watering_mode_active != prev_active {
            sink.emit(&AppEvent::ModeChanged {
                active: next.watering_mode_active,
                humidity: self.reading.humidity,
            });
        }

        let mut first_error = None;
        for payload in command.payloads() {
            if let Err(e) = transport.publish(&self.command_topic, payload) {
                self.stats.publish_failures += 1;
                sink.emit(&AppEvent::PublishFailed(e));
                if first_error.is_none() {
                    first_error = Some(e);
                }
                if shutdown.is_requested() {
                    break;
                }
            }
        }

        match first_error {
            None => {
                sink.emit(&AppEvent::CommandPublished(command));
                Ok(command)
            }
            Some(e) => Err(e),
        }
    }

    // ── Slow tick ─────────────────────────────────────────────

    /// Archive the latest reading and command under the day of `at`.
    pub fn slow_tick(
        &mut self,
        at: &DateTime<FixedOffset>,
        store: &mut impl ArchivePort,
        sink: &mut impl EventSink,
    ) -> Result<String, StoreError> {
        let key = archive_key(at);
        let snapshot = ArchiveSnapshot::capture(&self.reading, &self.last_command, at);

        match store.put(&key, &snapshot) {
            Ok(()) => {
                self.stats.snapshots_archived += 1;
                sink.emit(&AppEvent::Archived { key: key.clone() });
                Ok(key)
            }
            Err(e) => {
                self.stats.archive_failures += 1;
                sink.emit(&AppEvent::ArchiveFailed(e));
                Err(e)
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn reading(&self) -> &SensorReading {
        &self.reading
    }

    pub fn state(&self) -> &ControlState {
        &self.state
    }

    pub fn last_command(&self) -> ActuatorCommand {
        self.last_command
    }

    pub fn thresholds(&self) -> &HumidityThresholds {
        &self.thresholds
    }

    pub fn command_topic(&self) -> &str {
        &self.command_topic
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }
}

// ── Tests ────────────────────────────────────────────────────
