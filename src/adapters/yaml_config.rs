//! YAML config file adapter.
//!
//! Implements [`ConfigPort`] by reading `agent.yaml` from disk.  Missing or
//! invalid files are errors; the agent has no usable defaults without a
//! device serial.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use log::info;

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::AgentConfig;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "agent.yaml";

pub struct YamlConfigFile {
    path: PathBuf,
}

impl YamlConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for YamlConfigFile {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_PATH)
    }
}

impl ConfigPort for YamlConfigFile {
    fn load(&self) -> Result<AgentConfig, ConfigError> {
        let text = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConfigError::NotFound,
            _ => ConfigError::IoError,
        })?;
        let config = AgentConfig::from_yaml_str(&text)?;
        info!("Config loaded from {}", self.path.display());
        Ok(config)
    }
}
