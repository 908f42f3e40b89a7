//! System clock adapter.
//!
//! Monotonic time comes from `std::time::Instant`.  Wall-clock time is the
//! system UTC clock shifted to the site's fixed offset, so archive keys
//! and timestamps follow the greenhouse's local day regardless of the host
//! timezone.

use std::time::Instant;

use chrono::{DateTime, FixedOffset, Utc};

use crate::app::ports::{ClockPort, ConfigError};

/// Time adapter for the agent host.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    /// Clock for a site `hours` east of UTC (negative = west).
    pub fn with_utc_offset_hours(hours: i32) -> Result<Self, ConfigError> {
        let offset = FixedOffset::east_opt(hours * 3600)
            .ok_or(ConfigError::ValidationFailed("utcOffsetHours out of range"))?;
        Ok(Self { offset })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }
}

impl ClockPort for SystemClock {
    fn monotonic(&self) -> Instant {
        Instant::now()
    }

    fn wall(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}
