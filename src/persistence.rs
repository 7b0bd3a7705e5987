//! Channel topic/key persistence: one small file per channel under the
//! configured state directory.
//!
//! The on-disk format is a hand-parsed `key=value` text format, never
//! evaluated as code — the reference miniircd's choice to `eval()` its state
//! file is a remote-code-execution hazard and is not reproduced here. Writes
//! are atomic: write to a sibling temp file, then rename it over the target.

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use crate::state::ChannelState;

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '=' => out.push_str("\\="),
            _ => out.push(c),
        }
    }
    out
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

/// Filesystem-safe transform of a canonical (lowercased) channel name:
/// `_` is doubled, `/` becomes `_`.
pub fn safe_filename(canonical_name: &str) -> String {
    canonical_name.replace('_', "__").replace('/', "_")
}

fn state_path(dir: &Path, canonical_name: &str) -> PathBuf {
    dir.join(format!("{}.state", safe_filename(canonical_name)))
}

/// Load a channel's persisted topic/key. A missing or unreadable file is
/// treated as "no state" (empty topic, no key) rather than an error.
pub fn load(dir: &Path, canonical_name: &str) -> ChannelState {
    let path = state_path(dir, canonical_name);
    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(error = %e, path = %path.display(), "failed to read channel state file");
            }
            return ChannelState::default();
        }
    };

    let mut state = ChannelState::default();
    for line in contents.lines() {
        if let Some((key, value)) = line.split_once('=') {
            match key {
                "topic" => state.topic = unescape(value),
                "key" => state.key = Some(unescape(value)),
                _ => {}
            }
        }
    }
    state
}

/// Persist a channel's topic/key atomically. Failures are logged; the
/// in-memory state remains authoritative and the next mutation retries.
pub fn save(dir: &Path, canonical_name: &str, state: &ChannelState) {
    if let Err(e) = save_inner(dir, canonical_name, state) {
        tracing::warn!(error = %e, channel = %canonical_name, "failed to persist channel state");
    }
}

fn save_inner(dir: &Path, canonical_name: &str, state: &ChannelState) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;
    let target = state_path(dir, canonical_name);
    let tmp = target.with_extension("state.tmp");

    let mut contents = format!("topic={}\n", escape(&state.topic));
    if let Some(key) = &state.key {
        contents.push_str(&format!("key={}\n", escape(key)));
    }

    let mut file = fs::File::create(&tmp)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()?;
    fs::rename(&tmp, &target)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_topic_and_key() {
        let dir = tempfile::tempdir().unwrap();
        let state = ChannelState {
            topic: "hello = world\nwith a newline".to_string(),
            key: Some("s3cr\\et".to_string()),
        };
        save(dir.path(), "#test", &state);

        let loaded = load(dir.path(), "#test");
        assert_eq!(loaded, state);
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load(dir.path(), "#nope");
        assert_eq!(loaded, ChannelState::default());
    }

    #[test]
    fn safe_filename_escapes_slashes_and_underscores() {
        assert_eq!(safe_filename("#a_b/c"), "#a__b_c");
    }
}
