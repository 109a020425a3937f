//! Server configuration.
//!
//! Values come from, in increasing precedence: built-in defaults, a TOML
//! file, `PLAYROOM_*` environment variables, and command-line flags.

use crate::store::StoreSettings;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Settings for the HTTP server and its session store.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    host: String,
    /// Port to bind.
    port: u16,
    /// Seconds a session may sit untouched before eviction.
    session_idle_timeout_secs: u64,
    /// Seconds between eviction sweeps.
    sweep_interval_secs: u64,
    /// Most sessions held at once.
    max_sessions: usize,
    /// Fixed seed for opponent randomness, for reproducible games.
    ai_seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            session_idle_timeout_secs: 30 * 60,
            sweep_interval_secs: 60,
            max_sessions: 1024,
            ai_seed: None,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file. Missing keys take defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(host = %config.host, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Defaults, or the given file, with the process environment applied on top.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Applies `PLAYROOM_*` overrides read through `lookup`.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(host) = lookup("PLAYROOM_HOST") {
            self.host = host;
        }
        if let Some(port) = parse_var(&lookup, "PLAYROOM_PORT")? {
            self.port = port;
        }
        if let Some(secs) = parse_var(&lookup, "PLAYROOM_IDLE_TIMEOUT_SECS")? {
            self.session_idle_timeout_secs = secs;
        }
        if let Some(secs) = parse_var(&lookup, "PLAYROOM_SWEEP_INTERVAL_SECS")? {
            self.sweep_interval_secs = secs;
        }
        if let Some(max) = parse_var(&lookup, "PLAYROOM_MAX_SESSIONS")? {
            self.max_sessions = max;
        }
        if let Some(seed) = parse_var(&lookup, "PLAYROOM_AI_SEED")? {
            self.ai_seed = Some(seed);
        }
        Ok(())
    }

    /// Overrides the bind host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Overrides the bind port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// `host:port` for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Idle timeout as a duration.
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_timeout_secs)
    }

    /// Sweep interval as a duration, at least one second.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }

    /// Store limits derived from this configuration.
    pub fn store_settings(&self) -> StoreSettings {
        StoreSettings::new(self.max_sessions, self.idle_timeout(), self.ai_seed)
    }
}

#[track_caller]
fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    // Built here, not in a closure, so the location is the caller's line.
    match raw.trim().parse() {
        Ok(value) => Ok(Some(value)),
        Err(_) => Err(ConfigError::new(format!(
            "{} has invalid value {:?}",
            key, raw
        ))),
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
