//! End-to-end tests for the scheduler loop: frames in, commands out,
//! snapshots archived, clean and failing shutdowns.

use std::thread;
use std::time::Duration;

use aerodome::adapters::memory_store::MemoryArchive;
use aerodome::app::events::AppEvent;
use aerodome::app::ports::TransportError;
use aerodome::channels::{InboundQueue, ShutdownToken};
use aerodome::error::Error;
use aerodome::{ControlService, HumidityThresholds, Schedule, Scheduler};

use crate::mock_ports::{FrozenWallClock, MockTransport, RecordingSink};

fn service() -> ControlService {
    ControlService::new(HumidityThresholds::default(), "AERODOME/A1")
}

fn fast_schedule() -> Schedule {
    Schedule {
        control_period: Duration::from_millis(20),
        archive_period: Duration::from_millis(50),
    }
}

#[test]
fn shutdown_before_start_exits_without_publishing() {
    let inbound = InboundQueue::new();
    let shutdown = ShutdownToken::new();
    shutdown.request();

    let mut svc = service();
    let mut tx = MockTransport::accepting();
    let mut store = MemoryArchive::new();
    let mut sink = RecordingSink::new();

    let result = Scheduler::new(fast_schedule(), &inbound, &shutdown).run_blocking(
        &mut svc,
        &mut tx,
        &mut store,
        &mut sink,
        &FrozenWallClock::new(),
    );

    assert!(result.is_ok());
    assert_eq!(tx.attempts, 0);
    assert!(store.is_empty());
    assert_eq!(sink.events.first(), Some(&AppEvent::Started));
    assert_eq!(sink.events.last(), Some(&AppEvent::Stopped));
}

#[test]
fn dry_reading_drives_watering_and_fan_on() {
    let inbound = InboundQueue::new();
    let shutdown = ShutdownToken::new();
    inbound.push(b"1,21.0,25.0,1,1").unwrap();

    let mut svc = service();
    let mut tx = MockTransport::accepting();
    let mut store = MemoryArchive::new();
    let mut sink = RecordingSink::new();
    let clock = FrozenWallClock::new();
    let scheduler = Scheduler::new(fast_schedule(), &inbound, &shutdown);

    let result = thread::scope(|s| {
        s.spawn(|| {
            thread::sleep(Duration::from_millis(300));
            shutdown.request();
        });
        scheduler.run_blocking(&mut svc, &mut tx, &mut store, &mut sink, &clock)
    });

    assert!(result.is_ok());
    assert!(svc.state().watering_mode_active);

    // Fan first, then watering, on the device topic; at least two ticks.
    assert!(tx.published.len() >= 4, "published {:?}", tx.published);
    assert_eq!(tx.payloads()[..2], [b"01".as_slice(), b"11".as_slice()]);
    assert!(tx.published.iter().all(|(topic, _)| topic == "AERODOME/A1"));

    let day = store.get("2024-03-09");
    assert!(!day.is_empty());
    assert_eq!(store.len(), day.len());
    for snap in day {
        assert!(snap.watering && snap.fan);
        assert!((snap.humidity - 25.0).abs() < f64::EPSILON);
        assert_eq!(snap.timestamp, "06:05:04");
    }
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::ModeChanged { active: true, .. })),
        1
    );
}

#[test]
fn publish_failures_are_retried_while_running() {
    let inbound = InboundQueue::new();
    let shutdown = ShutdownToken::new();

    let mut svc = service();
    let mut tx = MockTransport::failing(TransportError::NotConnected);
    let mut store = MemoryArchive::new();
    let mut sink = RecordingSink::new();
    let clock = FrozenWallClock::new();
    let scheduler = Scheduler::new(fast_schedule(), &inbound, &shutdown);

    let result = thread::scope(|s| {
        s.spawn(|| {
            thread::sleep(Duration::from_millis(150));
            shutdown.request();
        });
        scheduler.run_blocking(&mut svc, &mut tx, &mut store, &mut sink, &clock)
    });

    // A tick racing the shutdown request may end the loop with its error.
    assert!(matches!(
        result,
        Ok(()) | Err(Error::Transport(TransportError::NotConnected))
    ));
    let ticks = svc.stats().fast_ticks;
    assert!(ticks >= 2);
    // Both payloads attempted on every tick that ran to completion.
    assert!(tx.attempts as u64 >= ticks * 2 - 1);
    assert!(tx.attempts as u64 <= ticks * 2);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::CommandPublished(_))), 0);
}

#[test]
fn publish_failure_after_shutdown_request_ends_loop_with_error() {
    let inbound = InboundQueue::new();
    let shutdown = ShutdownToken::new();

    let mut svc = service();
    let mut tx = MockTransport::failing(TransportError::QueueFull).cancelling(&shutdown);
    let mut store = MemoryArchive::new();
    let mut sink = RecordingSink::new();

    let result = Scheduler::new(fast_schedule(), &inbound, &shutdown).run_blocking(
        &mut svc,
        &mut tx,
        &mut store,
        &mut sink,
        &FrozenWallClock::new(),
    );

    assert!(matches!(
        result,
        Err(Error::Transport(TransportError::QueueFull))
    ));
    // Stopped at the first failed payload, no retry.
    assert_eq!(tx.attempts, 1);
    assert_eq!(sink.events.last(), Some(&AppEvent::Stopped));
}

#[test]
fn malformed_frames_do_not_disturb_the_reading() {
    let inbound = InboundQueue::new();
    let shutdown = ShutdownToken::new();
    inbound.push(b"1,21.0,80.0,1,1").unwrap();
    inbound.push(b"1,21.0,oops,1,1").unwrap();
    inbound.push(b"9,21.0,10.0,1,1").unwrap();

    let mut svc = service();
    let mut tx = MockTransport::accepting();
    let mut store = MemoryArchive::new();
    let mut sink = RecordingSink::new();
    let clock = FrozenWallClock::new();
    let scheduler = Scheduler::new(fast_schedule(), &inbound, &shutdown);

    let result = thread::scope(|s| {
        s.spawn(|| {
            thread::sleep(Duration::from_millis(100));
            shutdown.request();
        });
        scheduler.run_blocking(&mut svc, &mut tx, &mut store, &mut sink, &clock)
    });

    assert!(result.is_ok());
    assert!((svc.reading().humidity - 80.0).abs() < f64::EPSILON);
    assert_eq!(svc.stats().frames_accepted, 1);
    assert_eq!(svc.stats().frames_rejected, 2);
    assert!(!svc.last_command().watering_enabled);
}

#[test]
fn shutdown_outranks_queued_frames() {
    let inbound = InboundQueue::new();
    let shutdown = ShutdownToken::new();
    inbound.push(b"1,21.0,25.0,1,1").unwrap();
    inbound.push(b"1,21.0,26.0,1,1").unwrap();
    inbound.push(b"bogus").unwrap();
    shutdown.request();

    let mut svc = service();
    let mut tx = MockTransport::accepting();
    let mut store = MemoryArchive::new();
    let mut sink = RecordingSink::new();

    let result = Scheduler::new(fast_schedule(), &inbound, &shutdown).run_blocking(
        &mut svc,
        &mut tx,
        &mut store,
        &mut sink,
        &FrozenWallClock::new(),
    );

    assert!(result.is_ok());
    assert_eq!(svc.stats().frames_accepted, 0);
    assert_eq!(svc.stats().frames_rejected, 0);
    assert_eq!(tx.attempts, 0);
    // Frames still queued at shutdown are discarded.
    assert!(inbound.try_receive().is_none());
}

#[test]
fn queued_frame_reaches_the_first_tick_before_archiving() {
    let inbound = InboundQueue::new();
    let shutdown = ShutdownToken::new();
    inbound.push(b"1,21.0,25.0,1,1").unwrap();

    let mut svc = service();
    // Stop after the first tick has published.
    let mut tx = MockTransport::accepting().cancelling(&shutdown);
    let mut store = MemoryArchive::new();
    let mut sink = RecordingSink::new();

    // Every source is ready on the first poll.
    let schedule = Schedule {
        control_period: Duration::ZERO,
        archive_period: Duration::ZERO,
    };
    let result = Scheduler::new(schedule, &inbound, &shutdown).run_blocking(
        &mut svc,
        &mut tx,
        &mut store,
        &mut sink,
        &FrozenWallClock::new(),
    );

    assert!(result.is_ok());
    assert_eq!(svc.stats().frames_accepted, 1);
    assert_eq!(svc.stats().fast_ticks, 1);
    // The tick already saw humidity 25 and latched watering on.
    assert_eq!(tx.payloads(), [b"01".as_slice(), b"11".as_slice()]);
    // Fast tick ran first; shutdown then beat the slow tick.
    assert!(store.is_empty());
    assert_eq!(svc.stats().snapshots_archived, 0);
}
