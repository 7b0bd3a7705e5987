//! Process-wide shared server state: identity, bootstrap-resolved
//! configuration, and the connection registry.

use std::path::PathBuf;

use chrono::Utc;

use crate::config::{Config, LivenessConfig};
use crate::state::Registry;

/// The version string reported in the welcome block's 002/004 numerics,
/// matching the reference server's `miniircd-<version>` convention.
pub const VERSION: &str = "miniircd-0.1";

/// Everything a connection or handler needs that isn't specific to one
/// client: server identity, the resolved password, MOTD lines, persistence
/// directories, and the shared registry.
pub struct Server {
    pub name: String,
    pub network: String,
    pub password: Option<String>,
    pub cloak: Option<String>,
    pub motd_lines: Vec<String>,
    pub channel_log_dir: Option<PathBuf>,
    pub state_dir: Option<PathBuf>,
    pub liveness: LivenessConfig,
    pub created_at: String,
    pub registry: Registry,
}

impl Server {
    pub fn from_config(config: &Config, password: Option<String>) -> Self {
        Self {
            name: config.server.name.clone(),
            network: config.server.network.clone(),
            password,
            cloak: config.server.cloak.clone(),
            motd_lines: config
                .motd
                .as_ref()
                .map(|motd| motd.load_lines())
                .unwrap_or_default(),
            channel_log_dir: config.channel_log.as_ref().map(|c| PathBuf::from(&c.directory)),
            state_dir: config.state.as_ref().map(|s| PathBuf::from(&s.directory)),
            liveness: config.liveness.clone(),
            created_at: Utc::now().format("%Y-%m-%d at %H:%M:%S UTC").to_string(),
            registry: Registry::new(),
        }
    }

    pub fn requires_password(&self) -> bool {
        self.password.is_some()
    }
}
