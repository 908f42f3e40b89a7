//! Aerodome agent main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  MqttTransport     LogEventSink   JsonlArchive   SystemClock   │
//! │  (TransportPort)   (EventSink)    (ArchivePort)  (ClockPort)   │
//! │  mqtt-rx thread ──▶ INBOUND       YamlConfigFile (ConfigPort)  │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            ControlService (pure logic)                 │    │
//! │  │  Frame decoder · Hysteresis policy · Snapshots         │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Scheduler (shutdown · frames · fast tick · slow tick)         │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `aerodome-agent [config.yaml]` (default `./agent.yaml`).

#![deny(unused_must_use)]

use anyhow::{Context, Result};
use log::{info, warn};
use tracing_subscriber::EnvFilter;

use aerodome::adapters::jsonl_store::JsonlArchive;
use aerodome::adapters::log_sink::LogEventSink;
use aerodome::adapters::memory_store::MemoryArchive;
use aerodome::adapters::mqtt::{self, MqttTransport};
use aerodome::adapters::signal;
use aerodome::adapters::time::SystemClock;
use aerodome::adapters::yaml_config::{DEFAULT_CONFIG_PATH, YamlConfigFile};
use aerodome::app::ports::{ArchivePort, ConfigPort};
use aerodome::channels::{INBOUND, SHUTDOWN};
use aerodome::{ControlService, Schedule, Scheduler};

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Aerodome agent v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Config ─────────────────────────────────────────────
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = YamlConfigFile::new(&path)
        .load()
        .with_context(|| format!("loading config from {path}"))?;
    let topics = config.topics();
    info!("Device serial: {}", config.serial_number);
    info!("Telemetry on {}, commands on {}", topics.sensors, topics.commands);

    let clock = SystemClock::with_utc_offset_hours(config.archive.utc_offset_hours)
        .context("site clock")?;

    // Ctrl-C / SIGTERM end the loop at the next event boundary.
    signal::install(&SHUTDOWN).context("installing signal handler")?;

    // ── 3. Broker connection ──────────────────────────────────
    let (mut transport, connection) = MqttTransport::connect(&config.broker);
    let rx = mqtt::spawn_inbound(
        connection,
        transport.client(),
        topics.sensors.clone(),
        &INBOUND,
        &SHUTDOWN,
    )
    .context("spawning MQTT receive thread")?;

    // ── 4. Core + scheduler ───────────────────────────────────
    let mut service = ControlService::new(config.humidity_thresholds(), topics.commands);
    let scheduler = Scheduler::new(Schedule::from(&config.intervals), &INBOUND, &SHUTDOWN);
    let mut sink = LogEventSink::new();

    // ── 5. Archive + run ──────────────────────────────────────
    let result = match JsonlArchive::open(config.archive.dir.clone()) {
        Ok(mut store) => {
            info!("Archive: {}", store.root_dir().display());
            run(&scheduler, &mut service, &mut transport, &mut store, &mut sink, &clock)
        }
        Err(e) => {
            warn!(
                "Archive: {} unusable ({}), snapshots kept in memory only",
                config.archive.dir.display(),
                e
            );
            let mut store = MemoryArchive::new();
            run(&scheduler, &mut service, &mut transport, &mut store, &mut sink, &clock)
        }
    };

    // ── 6. Teardown ───────────────────────────────────────────
    SHUTDOWN.request();
    transport.disconnect();
    if rx.join().is_err() {
        warn!("MQTT receive thread panicked");
    }

    let stats = service.stats();
    info!(
        "Exit: {} frames accepted, {} rejected, {} ticks, {} snapshots",
        stats.frames_accepted, stats.frames_rejected, stats.fast_ticks, stats.snapshots_archived
    );
    result.context("control loop")
}

fn run(
    scheduler: &Scheduler<'_>,
    service: &mut ControlService,
    transport: &mut MqttTransport,
    store: &mut impl ArchivePort,
    sink: &mut LogEventSink,
    clock: &SystemClock,
) -> aerodome::Result<()> {
    scheduler.run_blocking(service, transport, store, sink, clock)
}
