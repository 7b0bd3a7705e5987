//! Configuration type definitions.

use std::net::SocketAddr;

use serde::Deserialize;

use super::defaults::{
    default_log_format, default_ping_threshold_secs, default_sweep_interval_secs,
    default_timeout_secs,
};

/// Top-level server configuration, loaded once at startup from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(rename = "listen", default)]
    pub listeners: Vec<ListenConfig>,
    pub tls: Option<TlsConfig>,
    #[serde(default)]
    pub motd: Option<MotdConfig>,
    #[serde(default)]
    pub channel_log: Option<ChannelLogConfig>,
    #[serde(default)]
    pub state: Option<StateConfig>,
    #[serde(default)]
    pub liveness: LivenessConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Core server identity and registration policy.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server name used in message prefixes and the welcome block.
    pub name: String,
    /// Network name, used in the MOTD/welcome text.
    pub network: String,
    /// Literal connection password. Ignored when `password_file` is set.
    #[serde(default)]
    pub password: Option<String>,
    /// Path to a file containing the connection password (trailing newline
    /// stripped). Takes precedence over `password` when both are set.
    #[serde(default)]
    pub password_file: Option<String>,
    /// Host string substituted for every client's real remote host in
    /// prefixes (the real host remains available to the channel logger).
    #[serde(default)]
    pub cloak: Option<String>,
}

/// A plain-TCP listener block; repeatable via `[[listen]]`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListenConfig {
    /// Address to bind to (e.g. "0.0.0.0:6667", "[::]:6667").
    pub address: SocketAddr,
}

/// TLS listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TlsConfig {
    /// Address to bind to for TLS (e.g. "0.0.0.0:6697").
    pub address: SocketAddr,
    /// Path to certificate file (PEM format).
    pub cert_path: String,
    /// Path to private key file (PEM format).
    pub key_path: String,
}

/// MOTD (message of the day) source.
#[derive(Debug, Clone, Deserialize)]
pub struct MotdConfig {
    /// Path to a MOTD text file, one line per `\n`.
    pub file: String,
}

/// Per-channel append-only transcript logging.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelLogConfig {
    /// Directory under which `<safe-lower-name>.log` files are written.
    pub directory: String,
}

/// Per-channel topic/key persistence.
#[derive(Debug, Clone, Deserialize)]
pub struct StateConfig {
    /// Directory under which `<safe-lower-name>.state` files are written.
    pub directory: String,
}

/// Idle-ping / timeout thresholds for the liveness sweep (see the reactor
/// loop design note for the asymmetry between registered and unregistered
/// clients).
#[derive(Debug, Clone, Deserialize)]
pub struct LivenessConfig {
    /// Seconds of inactivity after which a registered client is sent a PING.
    #[serde(default = "default_ping_threshold_secs")]
    pub ping_threshold_secs: u64,
    /// Seconds of inactivity after which any client is disconnected.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// How often the background sweep task scans connected clients.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for LivenessConfig {
    fn default() -> Self {
        Self {
            ping_threshold_secs: default_ping_threshold_secs(),
            timeout_secs: default_timeout_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

/// Structured logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `pretty` or `json`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_parses() {
        let toml_str = r#"
            [server]
            name = "irc.example.org"
            network = "ExampleNet"

            [[listen]]
            address = "0.0.0.0:6667"
        "#;
        let cfg: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.server.name, "irc.example.org");
        assert_eq!(cfg.listeners.len(), 1);
        assert_eq!(cfg.liveness.ping_threshold_secs, 90);
        assert_eq!(cfg.liveness.timeout_secs, 180);
        assert_eq!(cfg.logging.format, "pretty");
    }

    #[test]
    fn tls_block_parses() {
        let toml_str = r#"
            [server]
            name = "irc.example.org"
            network = "ExampleNet"

            [tls]
            address = "0.0.0.0:6697"
            cert_path = "/etc/slircd/cert.pem"
            key_path = "/etc/slircd/key.pem"
        "#;
        let cfg: Config = toml::from_str(toml_str).unwrap();
        let tls = cfg.tls.unwrap();
        assert_eq!(tls.address.port(), 6697);
    }
}
