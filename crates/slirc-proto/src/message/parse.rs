//! Wire-format tokenization for IRC lines.
//!
//! Implements the tokenizer this server uses to turn one line of input into a
//! command name and its arguments:
//!
//! 1. Split once on the first space into `command` and `rest`; uppercase
//!    `command` for dispatch.
//! 2. If `rest` begins with `:`, the single argument is the remainder after
//!    the colon.
//! 3. Otherwise split `rest` once on `" :"` into `head` and `trailing`;
//!    whitespace-split `head` into arguments, then append `trailing`
//!    (verbatim, may contain spaces) as the last argument if present.

use std::str::FromStr;

use super::types::Message;
use crate::error::MessageParseError;

/// Split a raw line (prefix already stripped) into a command name and its
/// positional arguments.
fn tokenize(line: &str) -> Result<(String, Vec<&str>), MessageParseError> {
    let line = line.trim_start_matches(' ');
    if line.is_empty() {
        return Err(MessageParseError::EmptyMessage);
    }

    let (command, rest) = match line.split_once(' ') {
        Some((cmd, rest)) => (cmd, rest),
        None => (line, ""),
    };

    if command.is_empty() {
        return Err(MessageParseError::InvalidCommand);
    }

    let command = command.to_ascii_uppercase();
    let rest = rest.trim_start_matches(' ');

    if rest.is_empty() {
        return Ok((command, Vec::new()));
    }

    if let Some(trailing) = rest.strip_prefix(':') {
        return Ok((command, vec![trailing]));
    }

    let args: Vec<&str> = match rest.split_once(" :") {
        Some((head, trailing)) => {
            let mut args: Vec<&str> = head.split(' ').filter(|s| !s.is_empty()).collect();
            args.push(trailing);
            args
        }
        None => rest.split(' ').filter(|s| !s.is_empty()).collect(),
    };

    Ok((command, args))
}

impl FromStr for Message {
    type Err = MessageParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            return Err(MessageParseError::EmptyMessage);
        }

        let (prefix, rest) = if let Some(stripped) = line.strip_prefix(':') {
            match stripped.split_once(' ') {
                Some((p, r)) => (Some(p), r),
                None => (Some(stripped), ""),
            }
        } else {
            (None, line)
        };

        let (command, args) = tokenize(rest)?;
        Message::new(prefix, &command, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Command;

    #[test]
    fn parses_trailing_with_colon() {
        let msg: Message = "CMD a b :c d e\r\n".parse().unwrap();
        assert_eq!(
            msg.command,
            Command::Raw(
                "CMD".into(),
                vec!["a".into(), "b".into(), "c d e".into()]
            )
        );
    }

    #[test]
    fn parses_bare_lf() {
        let msg: Message = "PING :test\n".parse().unwrap();
        assert_eq!(msg.command, Command::PING(Some("test".into())));
    }

    #[test]
    fn parses_prefix() {
        let msg: Message = ":nick!user@host PRIVMSG #chan :hi".parse().unwrap();
        assert_eq!(msg.source_nickname(), Some("nick"));
        assert_eq!(msg.command, Command::PRIVMSG("#chan".into(), "hi".into()));
    }

    #[test]
    fn parses_without_trailing() {
        let msg: Message = "JOIN #chan".parse().unwrap();
        assert_eq!(msg.command, Command::JOIN("#chan".into(), None));
    }

    #[test]
    fn uppercases_command() {
        let msg: Message = "nick alice".parse().unwrap();
        assert_eq!(msg.command, Command::NICK("alice".into()));
    }

    #[test]
    fn empty_line_is_error() {
        assert!("".parse::<Message>().is_err());
        assert!("\r\n".parse::<Message>().is_err());
    }

    #[test]
    fn leading_colon_only_trailing() {
        let msg: Message = "USER a 0 * :Real Name".parse().unwrap();
        assert_eq!(
            msg.command,
            Command::USER("a".into(), "0".into(), "*".into(), "Real Name".into())
        );
    }
}
