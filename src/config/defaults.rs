//! Default value functions for configuration fields.

pub fn default_ping_threshold_secs() -> u64 {
    90
}

pub fn default_timeout_secs() -> u64 {
    180
}

pub fn default_sweep_interval_secs() -> u64 {
    10
}

pub fn default_log_format() -> String {
    "pretty".to_string()
}
