//! Port traits: the hexagonal boundary between control logic and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlService (domain)
//! ```
//!
//! Driven adapters (MQTT, archive files, logger, config file, clock)
//! implement these traits.  The [`ControlService`](super::service::ControlService)
//! and the [`Scheduler`](crate::scheduler::Scheduler) consume them via
//! generics, so the domain core never touches a socket or a file directly.

use std::time::Instant;

use chrono::{DateTime, FixedOffset};

use crate::archive::ArchiveSnapshot;
use crate::config::AgentConfig;

// ───────────────────────────────────────────────────────────────
// Transport port (driven adapter: domain → broker)
// ───────────────────────────────────────────────────────────────

/// Outbound side of the message transport.
///
/// Inbound frames do not come through this trait: the transport adapter
/// pushes them into the [`InboundQueue`](crate::channels::InboundQueue)
/// from its own thread.
pub trait TransportPort {
    /// Publish one payload.  Must not block indefinitely.
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError>;
}

// ───────────────────────────────────────────────────────────────
// Archive port (driven adapter: domain → document store)
// ───────────────────────────────────────────────────────────────

/// Durable store for periodic snapshots.
///
/// Once `put` returns `Ok`, durability is the store's responsibility; the
/// caller keeps no copy.
pub trait ArchivePort {
    /// Append `record` under `key` (a `YYYY-MM-DD` date).
    fn put(&mut self, key: &str, record: &ArchiveSnapshot) -> Result<(), StoreError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Time source for the scheduler.
pub trait ClockPort {
    /// Monotonic time, used for tick deltas.
    fn monotonic(&self) -> Instant;

    /// Wall-clock time at the site's UTC offset, used for archive keys.
    fn wall(&self) -> DateTime<FixedOffset>;
}

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Loads agent configuration.
///
/// Implementations MUST run [`AgentConfig::validate`] before returning.
pub trait ConfigPort {
    fn load(&self) -> Result<AgentConfig, ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`TransportPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The connection to the broker is down.
    NotConnected,
    /// The client's outbound request queue is full.
    QueueFull,
}

/// Errors from [`ArchivePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// The store cannot be reached.
    Unavailable,
    /// The record could not be serialised.
    Encode,
    /// Generic I/O error from the backend.
    IoError,
}

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The config file does not exist.
    NotFound,
    /// The config file is not valid YAML for [`AgentConfig`].
    Parse(String),
    /// A config field failed range validation.
    ValidationFailed(&'static str),
    /// Generic I/O error while reading the file.
    IoError,
}

impl core::fmt::Display for TransportError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotConnected => write!(f, "not connected"),
            Self::QueueFull => write!(f, "request queue full"),
        }
    }
}

impl core::fmt::Display for StoreError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "store unavailable"),
            Self::Encode => write!(f, "record encoding failed"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Parse(msg) => write!(f, "parse error: {}", msg),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for TransportError {}
impl std::error::Error for StoreError {}
impl std::error::Error for ConfigError {}
