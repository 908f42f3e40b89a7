//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements     | Connects to                   |
//! |----------------|----------------|-------------------------------|
//! | `mqtt`         | TransportPort  | MQTT broker (rumqttc)         |
//! |                | InboundQueue   | sensors topic subscription    |
//! | `jsonl_store`  | ArchivePort    | one JSON-lines file per day   |
//! | `memory_store` | ArchivePort    | in-process map (tests/fallback)|
//! | `log_sink`     | EventSink      | `log` facade                  |
//! | `signal`       | ShutdownToken  | SIGINT / SIGTERM              |
//! | `time`         | ClockPort      | system clock + site offset    |
//! | `yaml_config`  | ConfigPort     | `agent.yaml`                  |

pub mod jsonl_store;
pub mod log_sink;
pub mod memory_store;
#[cfg(feature = "mqtt")]
pub mod mqtt;
pub mod signal;
pub mod time;
pub mod yaml_config;
