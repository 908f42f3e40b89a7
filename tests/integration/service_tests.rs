//! Integration tests for the config → ControlService → archive pipeline.

use std::time::{Duration, Instant};

use aerodome::adapters::jsonl_store::JsonlArchive;
use aerodome::app::events::AppEvent;
use aerodome::app::ports::{ArchivePort, ClockPort};
use aerodome::channels::ShutdownToken;
use aerodome::{AgentConfig, ControlService};

use crate::mock_ports::{FrozenWallClock, MockTransport, RecordingSink};

const CONFIG: &str = r"
serialNumber: GH-0042
thresholds:
  humidity:
    low: 0.35
    high: 0.65
    invalid: 0.05
    duration: 2
intervals:
  controlMs: 1000
";

fn service_from_config() -> ControlService {
    let config = AgentConfig::from_yaml_str(CONFIG).unwrap();
    ControlService::new(config.humidity_thresholds(), config.topics().commands)
}

#[test]
fn config_fractions_become_percent_thresholds() {
    let svc = service_from_config();
    let t = svc.thresholds();
    assert!((t.low - 35.0).abs() < 1e-9);
    assert!((t.high - 65.0).abs() < 1e-9);
    assert!((t.invalid_floor - 5.0).abs() < 1e-9);
    assert_eq!(t.high_duration_secs, 2);
    assert_eq!(svc.command_topic(), "AERODOME/GH-0042");
}

#[test]
fn watering_cycle_from_dry_to_wet() {
    let mut svc = service_from_config();
    let mut tx = MockTransport::accepting();
    let mut sink = RecordingSink::new();
    let shutdown = ShutdownToken::new();
    let t0 = Instant::now();
    svc.start(t0, &mut sink);

    let tick = |n: u64| t0 + Duration::from_secs(n);

    svc.handle_frame(b"1,22.0,30.0,1,1", &mut sink).unwrap();
    let cmd = svc.fast_tick(tick(1), &mut tx, &mut sink, &shutdown).unwrap();
    assert!(cmd.watering_enabled && cmd.fan_enabled);

    // Wet, but not for long enough yet.
    svc.handle_frame(b"1,22.0,70.0,0,0", &mut sink).unwrap();
    assert!(svc.fast_tick(tick(2), &mut tx, &mut sink, &shutdown).unwrap().watering_enabled);
    assert!(svc.fast_tick(tick(3), &mut tx, &mut sink, &shutdown).unwrap().watering_enabled);

    // 3000 ms > 2000 ms hold.
    let cmd = svc.fast_tick(tick(4), &mut tx, &mut sink, &shutdown).unwrap();
    assert!(!cmd.watering_enabled && !cmd.fan_enabled);

    let expected: [&[u8]; 8] = [b"01", b"11", b"01", b"11", b"01", b"11", b"00", b"10"];
    assert_eq!(tx.payloads(), expected);
    let modes: Vec<bool> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::ModeChanged { active, .. } => Some(*active),
            _ => None,
        })
        .collect();
    assert_eq!(modes, [true, false]);
}

#[test]
fn slow_tick_writes_snapshot_to_day_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = JsonlArchive::open(dir.path().join("archive")).unwrap();
    let mut svc = service_from_config();
    let mut tx = MockTransport::accepting();
    let mut sink = RecordingSink::new();
    let clock = FrozenWallClock::new();

    svc.handle_frame(b"1,24.5,20.0,1,0", &mut sink).unwrap();
    svc.fast_tick(Instant::now(), &mut tx, &mut sink, &ShutdownToken::new())
        .unwrap();
    let key = svc.slow_tick(&clock.wall(), &mut store, &mut sink).unwrap();

    assert_eq!(key, "2024-03-09");
    assert!(store.path_for(&key).exists());
    let records = store.load(&key).unwrap();
    assert_eq!(records.len(), 1);
    let snap = &records[0];
    assert!((snap.temperature - 24.5).abs() < f64::EPSILON);
    assert!((snap.humidity - 20.0).abs() < f64::EPSILON);
    assert!(snap.watering && snap.fan);
    assert_eq!(snap.timestamp, "06:05:04");

    // A second put lands on its own line.
    store.put(&key, snap).unwrap();
    assert_eq!(store.load(&key).unwrap().len(), 2);
}

#[test]
fn snapshot_before_any_tick_is_all_zero_and_off() {
    let mut store = aerodome::adapters::memory_store::MemoryArchive::new();
    let mut svc = service_from_config();
    let mut sink = RecordingSink::new();

    svc.slow_tick(&FrozenWallClock::new().wall(), &mut store, &mut sink)
        .unwrap();

    let snap = &store.get("2024-03-09")[0];
    assert_eq!(snap.humidity, 0.0);
    assert!(!snap.watering && !snap.fan);
}
