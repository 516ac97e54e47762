use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::models::ticket::TicketRequest;

pub const DEFAULT_CONFIG_PATH: &str = "config.yml";
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000";
pub const DEFAULT_TICKET_ID: u64 = 972501191214907482;

/// Everything needed to issue one ticket request. Keys left out of
/// `config.yml` fall back to the built-in values.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub endpoint: String,
    pub ticket_id: u64,
    /// No timeout unless set
    pub timeout_secs: Option<u64>,
    pub ticket: TicketRequest,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            ticket_id: DEFAULT_TICKET_ID,
            timeout_secs: None,
            ticket: TicketRequest::default(),
        }
    }
}

/// Reads the config file. An explicitly named file must exist; the
/// default `config.yml` is optional.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(path) => path,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => Path::new(DEFAULT_CONFIG_PATH),
        None => return Ok(Config::default()),
    };

    let config_str = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config = parse(&config_str)
        .with_context(|| format!("invalid config file {}", path.display()))?;
    info!("Loaded config from {}", path.display());
    Ok(config)
}

pub fn parse(config_str: &str) -> Result<Config> {
    let deserializer = serde_yaml::Deserializer::from_str(config_str);
    let config: Config = serde_path_to_error::deserialize(deserializer).map_err(|e| {
        // serde_yaml usually prefixes the location itself
        let path = e.path().to_string();
        let message = e.into_inner().to_string();
        if path == "." || message.starts_with(&path) {
            anyhow::anyhow!(message)
        } else {
            anyhow::anyhow!("{path}: {message}")
        }
    })?;
    Ok(config)
}
