//! Configuration loading and validation.
//!
//! This module is split the way the config this server's ancestor uses is
//! split:
//! - [`types`]: the struct tree deserialized from TOML.
//! - [`defaults`]: `#[serde(default = "...")]` value functions.
//! - [`validation`]: cross-field checks run once at startup.

mod defaults;
mod types;
mod validation;

pub use types::{
    ChannelLogConfig, Config, ListenConfig, LivenessConfig, LoggingConfig, MotdConfig,
    ServerConfig, StateConfig, TlsConfig,
};
pub use validation::{validate, ValidationError};

use std::fs;
use std::path::Path;

/// Load and parse a configuration file from disk.
pub fn load(path: &Path) -> anyhow::Result<Config> {
    let text = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("reading config file {}: {e}", path.display()))?;
    let config: Config = toml::from_str(&text)
        .map_err(|e| anyhow::anyhow!("parsing config file {}: {e}", path.display()))?;
    Ok(config)
}

impl ServerConfig {
    /// Resolve the effective connection password: `password_file` (with its
    /// trailing newline stripped) takes precedence over a literal
    /// `password`.
    pub fn resolve_password(&self) -> anyhow::Result<Option<String>> {
        if let Some(path) = &self.password_file {
            let contents = fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("reading password_file {path}: {e}"))?;
            return Ok(Some(contents.trim_end_matches('\n').to_string()));
        }
        Ok(self.password.clone())
    }
}

impl MotdConfig {
    /// Load the MOTD file as a list of lines, or synthesize a single-line
    /// notice if it can't be read.
    pub fn load_lines(&self) -> Vec<String> {
        match fs::read_to_string(&self.file) {
            Ok(contents) => contents.lines().map(str::to_string).collect(),
            Err(e) => {
                tracing::warn!(error = %e, file = %self.file, "failed to read MOTD file");
                vec![format!("MOTD file unavailable: {e}")]
            }
        }
    }
}
