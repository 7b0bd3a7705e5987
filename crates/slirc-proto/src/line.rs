//! Line-based codec for tokio.
//!
//! Reads/writes newline-terminated lines. Incoming lines are decoded as
//! UTF-8, replacing invalid sequences (clients occasionally send garbage);
//! outgoing lines are always well-formed UTF-8 produced by this crate.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::error;

/// Line-based codec that handles CRLF- or LF-terminated messages.
///
/// Accepts both `\r\n` and bare `\n` terminators on input; the trailing
/// terminator bytes are stripped from the returned line. Incoming lines
/// longer than `max_len` (512 bytes by default, matching the wire cap) are
/// rejected.
pub struct LineCodec {
    /// Index of next byte to check for newline.
    next_index: usize,
    /// Maximum line length, including the terminator.
    max_len: usize,
}

impl LineCodec {
    /// Create a new codec with the standard 512-byte line cap.
    pub fn new() -> Self {
        Self {
            next_index: 0,
            max_len: crate::MAX_LINE_LEN,
        }
    }

    /// Create a new codec with a custom max line length.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
        }
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = error::ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<String>> {
        if let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') {
            let line = src.split_to(self.next_index + offset + 1);
            self.next_index = 0;

            if line.len() > self.max_len {
                return Err(error::ProtocolError::MessageTooLong {
                    actual: line.len(),
                    limit: self.max_len,
                });
            }

            let data = String::from_utf8_lossy(&line);
            let trimmed = data.trim_end_matches(['\r', '\n']);
            Ok(Some(trimmed.to_string()))
        } else {
            self.next_index = src.len();

            if src.len() > self.max_len {
                return Err(error::ProtocolError::MessageTooLong {
                    actual: src.len(),
                    limit: self.max_len,
                });
            }

            Ok(None)
        }
    }
}

impl Encoder<String> for LineCodec {
    type Error = error::ProtocolError;

    fn encode(&mut self, msg: String, dst: &mut BytesMut) -> error::Result<()> {
        dst.extend(msg.into_bytes());
        Ok(())
    }
}
