//! Mock ports for integration tests.
//!
//! Records every publish and event so tests can assert on the full history
//! without a broker or a log backend.

use std::time::Instant;

use aerodome::app::events::AppEvent;
use aerodome::app::ports::{ClockPort, EventSink, TransportError, TransportPort};
use aerodome::channels::ShutdownToken;
use chrono::{DateTime, FixedOffset, TimeZone};

// ── Transport ─────────────────────────────────────────────────

/// How the mock transport answers publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behaviour {
    Accept,
    Fail(TransportError),
}

pub struct MockTransport<'a> {
    pub published: Vec<(String, Vec<u8>)>,
    pub attempts: usize,
    behaviour: Behaviour,
    /// Requested on the first publish attempt, if set.
    cancel_on_publish: Option<&'a ShutdownToken>,
}

#[allow(dead_code)]
impl<'a> MockTransport<'a> {
    pub fn accepting() -> Self {
        Self::with(Behaviour::Accept)
    }

    pub fn failing(error: TransportError) -> Self {
        Self::with(Behaviour::Fail(error))
    }

    fn with(behaviour: Behaviour) -> Self {
        Self {
            published: Vec::new(),
            attempts: 0,
            behaviour,
            cancel_on_publish: None,
        }
    }

    /// Request `token` as soon as anything is published.
    pub fn cancelling(mut self, token: &'a ShutdownToken) -> Self {
        self.cancel_on_publish = Some(token);
        self
    }

    pub fn payloads(&self) -> Vec<&[u8]> {
        self.published.iter().map(|(_, p)| p.as_slice()).collect()
    }
}

impl TransportPort for MockTransport<'_> {
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError> {
        self.attempts += 1;
        if let Some(token) = self.cancel_on_publish {
            token.request();
        }
        match self.behaviour {
            Behaviour::Accept => {
                self.published.push((topic.to_string(), payload.to_vec()));
                Ok(())
            }
            Behaviour::Fail(e) => Err(e),
        }
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Clock ─────────────────────────────────────────────────────

/// Real monotonic time, frozen wall clock.
pub struct FrozenWallClock {
    pub wall: DateTime<FixedOffset>,
}

#[allow(dead_code)]
impl FrozenWallClock {
    /// 2024-03-09 06:05:04 at UTC+7.
    pub fn new() -> Self {
        let wall = FixedOffset::east_opt(7 * 3600)
            .and_then(|tz| tz.with_ymd_and_hms(2024, 3, 9, 6, 5, 4).single())
            .unwrap();
        Self { wall }
    }
}

impl ClockPort for FrozenWallClock {
    fn monotonic(&self) -> Instant {
        Instant::now()
    }

    fn wall(&self) -> DateTime<FixedOffset> {
        self.wall
    }
}
