//! Configuration validation.
//!
//! Catches cross-field configuration errors at startup, before any socket is
//! bound.

use std::path::Path;

use thiserror::Error;

use super::Config;

/// A single configuration problem.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("server.name must not be empty")]
    MissingServerName,
    #[error("server.network must not be empty")]
    MissingNetworkName,
    #[error("no [[listen]] or [tls] block configured; the server would accept no connections")]
    NoListeners,
    #[error("tls.cert_path does not exist: {0}")]
    TlsCertNotFound(String),
    #[error("tls.key_path does not exist: {0}")]
    TlsKeyNotFound(String),
    #[error("motd.file does not exist: {0}")]
    MotdFileNotFound(String),
}

/// Validate a configuration, returning every problem found (not just the
/// first).
pub fn validate(config: &Config) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.server.name.is_empty() {
        errors.push(ValidationError::MissingServerName);
    }
    if config.server.network.is_empty() {
        errors.push(ValidationError::MissingNetworkName);
    }
    if config.listeners.is_empty() && config.tls.is_none() {
        errors.push(ValidationError::NoListeners);
    }

    if let Some(tls) = &config.tls {
        if !Path::new(&tls.cert_path).exists() {
            errors.push(ValidationError::TlsCertNotFound(tls.cert_path.clone()));
        }
        if !Path::new(&tls.key_path).exists() {
            errors.push(ValidationError::TlsKeyNotFound(tls.key_path.clone()));
        }
    }

    if let Some(motd) = &config.motd {
        if !Path::new(&motd.file).exists() {
            errors.push(ValidationError::MotdFileNotFound(motd.file.clone()));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ListenConfig, ServerConfig};

    fn base_config() -> Config {
        Config {
            server: ServerConfig {
                name: "irc.example.org".into(),
                network: "ExampleNet".into(),
                password: None,
                password_file: None,
                cloak: None,
            },
            listeners: vec![ListenConfig {
                address: "0.0.0.0:6667".parse().unwrap(),
            }],
            tls: None,
            motd: None,
            channel_log: None,
            state: None,
            liveness: Default::default(),
            logging: Default::default(),
        }
    }

    #[test]
    fn valid_config_has_no_errors() {
        assert!(validate(&base_config()).is_empty());
    }

    #[test]
    fn missing_name_and_network_are_reported() {
        let mut cfg = base_config();
        cfg.server.name.clear();
        cfg.server.network.clear();
        let errors = validate(&cfg);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn no_listeners_is_an_error() {
        let mut cfg = base_config();
        cfg.listeners.clear();
        let errors = validate(&cfg);
        assert!(matches!(errors[0], ValidationError::NoListeners));
    }
}
