//! Unified error types for the Aerodome agent.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! scheduler's error handling uniform.  Port-specific errors
//! ([`TransportError`], [`StoreError`], [`ConfigError`]) live beside their
//! traits in [`crate::app::ports`] and convert into `Error` here.

use core::fmt;

use crate::app::ports::{ConfigError, StoreError, TransportError};

// ---------------------------------------------------------------------------
// Top-level agent error
// ---------------------------------------------------------------------------

/// Every fallible operation in the agent funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An inbound sensor frame was malformed.
    Format(FormatError),
    /// Publishing an actuator command failed.
    Transport(TransportError),
    /// Archiving a snapshot failed.
    Store(StoreError),
    /// Configuration could not be loaded or is invalid.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format(e) => write!(f, "frame: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Store(e) => write!(f, "store: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Frame format errors
// ---------------------------------------------------------------------------

/// An inbound sensor frame could not be decoded.
///
/// Deliberately uniform: callers only learn that the frame is unusable and
/// must keep their previous reading.  The `reason` is for logs only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatError {
    reason: &'static str,
}

impl FormatError {
    pub(crate) const fn new(reason: &'static str) -> Self {
        Self { reason }
    }

    /// Short description of which check rejected the frame.
    pub fn reason(&self) -> &'static str {
        self.reason
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid sensor frame ({})", self.reason)
    }
}

impl std::error::Error for FormatError {}

impl From<FormatError> for Error {
    fn from(e: FormatError) -> Self {
        Self::Format(e)
    }
}

// ---------------------------------------------------------------------------
// Port error conversions
// ---------------------------------------------------------------------------

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Agent-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
