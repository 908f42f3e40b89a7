//! Control loop scheduler.
//!
//! One long-lived loop multiplexes four event sources and handles exactly
//! one event at a time, so the [`ControlService`] is only ever touched from
//! this loop:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       Event Sources                          │
//! │                                                              │
//! │  ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌──────────┐   │
//! │  │ Shutdown  │  │ Inbound   │  │ Fast tick │  │ Slow tick│   │
//! │  │ token     │  │ queue     │  │ (control) │  │ (archive)│   │
//! │  └─────┬─────┘  └─────┬─────┘  └─────┬─────┘  └─────┬────┘   │
//! │        │              │              │              │        │
//! │        ▼              ▼              ▼              ▼        │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │        race: first ready wins, left-most on ties       │  │
//! │  └───────────────────────┬────────────────────────────────┘  │
//! │                          ▼                                   │
//! │        ControlService.handle_frame / fast_tick / slow_tick   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Ticks are deadline based.  If the loop falls behind by more than a full
//! period the missed ticks are not replayed; the next fast tick simply
//! reports the larger measured delta to the policy.

use std::time::{Duration, Instant};

use futures_lite::future::FutureExt;
use log::{debug, error, info, warn};

use crate::app::ports::{ArchivePort, ClockPort, EventSink, TransportPort};
use crate::app::service::ControlService;
use crate::channels::{InboundQueue, RawFrame, ShutdownToken};
use crate::config::IntervalConfig;
use crate::error::Error;

// ═══════════════════════════════════════════════════════════════
//  Schedule
// ═══════════════════════════════════════════════════════════════

/// Periods of the two timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    /// Fast tick: policy evaluation + actuator publish.
    pub control_period: Duration,
    /// Slow tick: archive snapshot.
    pub archive_period: Duration,
}

impl From<&IntervalConfig> for Schedule {
    fn from(intervals: &IntervalConfig) -> Self {
        Self {
            control_period: intervals.control_period(),
            archive_period: intervals.archive_period(),
        }
    }
}

/// Next deadline after `deadline` fired at `now`.
fn advance(deadline: Instant, period: Duration, now: Instant) -> Instant {
    let next = deadline + period;
    if next <= now { now + period } else { next }
}

// ═══════════════════════════════════════════════════════════════
//  Loop events
// ═══════════════════════════════════════════════════════════════

#[derive(Debug)]
enum LoopEvent {
    Shutdown,
    Frame(RawFrame),
    FastTick,
    SlowTick,
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler
// ═══════════════════════════════════════════════════════════════

/// Drives a [`ControlService`] from the inbound queue and two timers.
pub struct Scheduler<'a> {
    schedule: Schedule,
    inbound: &'a InboundQueue,
    shutdown: &'a ShutdownToken,
}

impl<'a> Scheduler<'a> {
    pub fn new(schedule: Schedule, inbound: &'a InboundQueue, shutdown: &'a ShutdownToken) -> Self {
        Self {
            schedule,
            inbound,
            shutdown,
        }
    }

    /// Run until shutdown.
    ///
    /// Returns `Ok` on a requested shutdown.  The only error exit is a
    /// publish failure observed after shutdown was requested; that stops
    /// the loop at once with no retry.  Every other failure is logged and
    /// the loop carries on.
    pub async fn run(
        &self,
        service: &mut ControlService,
        transport: &mut impl TransportPort,
        store: &mut impl ArchivePort,
        sink: &mut impl EventSink,
        clock: &impl ClockPort,
    ) -> Result<(), Error> {
        let start = clock.monotonic();
        let mut next_fast = start + self.schedule.control_period;
        let mut next_slow = start + self.schedule.archive_period;
        service.start(start, sink);
        info!(
            "Scheduler: control every {:?}, archive every {:?}",
            self.schedule.control_period, self.schedule.archive_period
        );

        let result = loop {
            let now = clock.monotonic();
            match self.next_event(now, next_fast, next_slow).await {
                LoopEvent::Shutdown => {
                    let discarded = core::iter::from_fn(|| self.inbound.try_receive()).count();
                    info!("Scheduler: shutdown requested, {} queued frame(s) discarded", discarded);
                    break Ok(());
                }

                LoopEvent::Frame(frame) => {
                    // The service logs and counts the rejection itself.
                    if service.handle_frame(&frame, sink).is_err() {
                        debug!("Scheduler: frame rejected, previous reading kept");
                    }
                }

                LoopEvent::FastTick => {
                    let now = clock.monotonic();
                    next_fast = advance(next_fast, self.schedule.control_period, now);
                    if let Err(e) = service.fast_tick(now, transport, sink, self.shutdown) {
                        if self.shutdown.is_requested() {
                            error!("Scheduler: publish failed during shutdown ({}), stopping", e);
                            break Err(e.into());
                        }
                        warn!("Scheduler: publish failed ({}), will retry next tick", e);
                    }
                }

                LoopEvent::SlowTick => {
                    next_slow = advance(next_slow, self.schedule.archive_period, clock.monotonic());
                    if let Err(e) = service.slow_tick(&clock.wall(), store, sink) {
                        warn!("Scheduler: archive failed ({}), snapshot dropped", e);
                    }
                }
            }
        };

        service.stop(sink);
        result
    }

    /// Wait for whichever source is ready first.  On ties the order is
    /// shutdown, frame, fast tick, slow tick.
    async fn next_event(&self, now: Instant, next_fast: Instant, next_slow: Instant) -> LoopEvent {
        let shutdown = async {
            self.shutdown.wait().await;
            LoopEvent::Shutdown
        };
        let frame = async { LoopEvent::Frame(self.inbound.receive().await) };
        let fast = async move {
            async_io_mini::Timer::after(next_fast.saturating_duration_since(now)).await;
            LoopEvent::FastTick
        };
        let slow = async move {
            async_io_mini::Timer::after(next_slow.saturating_duration_since(now)).await;
            LoopEvent::SlowTick
        };

        shutdown.or(frame).or(fast).or(slow).await
    }

    /// Run the loop to completion on the current thread.
    pub fn run_blocking(
        &self,
        service: &mut ControlService,
        transport: &mut impl TransportPort,
        store: &mut impl ArchivePort,
        sink: &mut impl EventSink,
        clock: &impl ClockPort,
    ) -> Result<(), Error> {
        let executor: edge_executor::LocalExecutor<'_, 4> = edge_executor::LocalExecutor::new();
        futures_lite::future::block_on(
            executor.run(self.run(service, transport, store, sink, clock)),
        )
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
