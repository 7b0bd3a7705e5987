//! Append-only per-channel transcript logging.
//!
//! Every PRIVMSG/NOTICE to a channel and every membership/state-change event
//! appends one line to `<log-dir>/<safe-lower-name>.log`. File handles are
//! opened, appended, and closed for each event so external log rotation
//! tools can rename or truncate the file between writes.

use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::Path;

use chrono::Utc;

use crate::persistence::safe_filename;

fn log_path(dir: &Path, canonical_name: &str) -> std::path::PathBuf {
    dir.join(format!("{}.log", safe_filename(canonical_name)))
}

fn append_line(dir: &Path, canonical_name: &str, line: &str) {
    let path = log_path(dir, canonical_name);
    let result = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .and_then(|mut file| writeln!(file, "{line}"));
    if let Err(e) = result {
        tracing::warn!(error = %e, path = %path.display(), "failed to write channel log");
    }
}

/// Log a line of channel speech (PRIVMSG/NOTICE text).
pub fn log_speech(dir: &Path, canonical_name: &str, nick: &str, text: &str) {
    let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
    append_line(dir, canonical_name, &format!("[{timestamp}] {nick} {text}"));
}

/// Log a meta event: join, part, quit, nick change, topic set, key set/clear.
pub fn log_meta(dir: &Path, canonical_name: &str, nick: &str, text: &str) {
    let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
    append_line(dir, canonical_name, &format!("[{timestamp}] * {nick} {text}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speech_and_meta_lines_are_distinguished() {
        let dir = tempfile::tempdir().unwrap();
        log_speech(dir.path(), "#test", "alice", "hello there");
        log_meta(dir.path(), "#test", "alice", "joined the channel");

        let contents = std::fs::read_to_string(log_path(dir.path(), "#test")).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("alice hello there"));
        assert!(lines[1].contains("* alice joined the channel"));
    }

    #[test]
    fn filename_uses_safe_transform() {
        let dir = tempfile::tempdir().unwrap();
        log_speech(dir.path(), "#a/b", "bob", "hi");
        assert!(dir.path().join("#a_b.log").exists());
    }
}
