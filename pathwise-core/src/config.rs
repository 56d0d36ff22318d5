//! Configuration system for pathwise.

use std::time::Duration;

use serde::Deserialize;

use crate::error::PathwiseError;

/// Top-level pathwise configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PathwiseConfig {
    pub server: ServerConfig,
}

impl PathwiseConfig {
    /// Load configuration from a TOML file, with environment variable overrides.
    ///
    /// Environment variables use the `PATHWISE_` prefix and `_` separators.
    /// E.g. `PATHWISE_SERVER_PORT=50001`.
    pub fn load(path: Option<&str>) -> Result<Self, PathwiseError> {
        let mut config = if let Some(path) = path {
            let contents = std::fs::read_to_string(path).map_err(|e| {
                PathwiseError::InvalidConfig(format!("failed to read config file '{path}': {e}"))
            })?;
            toml::from_str::<PathwiseConfig>(&contents)
                .map_err(|e| PathwiseError::InvalidConfig(format!("failed to parse config: {e}")))?
        } else {
            PathwiseConfig::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("PATHWISE_SERVER_PORT") {
            if let Ok(port) = v.parse() {
                self.server.port = port;
            }
        }
        if let Some(v) = lookup("PATHWISE_SERVER_BIND_ADDRESS") {
            self.server.bind_address = v;
        }
        if let Some(v) = lookup("PATHWISE_SERVER_IDLE_TIMEOUT_MS") {
            if let Ok(ms) = v.parse() {
                self.server.idle_timeout_ms = ms;
            }
        }
        if let Some(v) = lookup("PATHWISE_SERVER_MAX_LINE_LENGTH") {
            if let Ok(n) = v.parse() {
                self.server.max_line_length = n;
            }
        }
    }

    pub fn validate(&self) -> Result<(), PathwiseError> {
        if self.server.port == 0 {
            return Err(PathwiseError::InvalidConfig(
                "server.port must be > 0".into(),
            ));
        }
        if self.server.idle_timeout_ms == 0 {
            return Err(PathwiseError::InvalidConfig(
                "server.idle_timeout_ms must be > 0".into(),
            ));
        }
        if self.server.max_line_length == 0 {
            return Err(PathwiseError::InvalidConfig(
                "server.max_line_length must be > 0".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    /// A session with no input for this long is closed.
    pub idle_timeout_ms: u64,
    pub max_line_length: usize,
}

impl ServerConfig {
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".into(),
            port: 50000,
            idle_timeout_ms: 30_000,
            max_line_length: 8192,
        }
    }
}
