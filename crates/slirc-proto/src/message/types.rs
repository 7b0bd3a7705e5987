use crate::chan::ChannelExt;
use crate::command::Command;
use crate::error::MessageParseError;
use crate::prefix::Prefix;
use crate::response::Response;

/// An owned IRC message: an optional prefix/source plus a command.
///
/// # Example
///
/// ```
/// use slirc_proto::Message;
///
/// let msg: Message = ":nick!user@host PRIVMSG #channel :Hello!".parse().unwrap();
/// assert_eq!(msg.source_nickname(), Some("nick"));
/// ```
#[derive(Clone, PartialEq, Debug)]
pub struct Message {
    /// Message prefix/source (e.g., `nick!user@host`).
    pub prefix: Option<Prefix>,
    /// The IRC command and its parameters.
    pub command: Command,
}

impl Message {
    /// Create a new message from raw components.
    pub fn new(
        prefix: Option<&str>,
        command: &str,
        args: Vec<&str>,
    ) -> Result<Message, MessageParseError> {
        let parsed_prefix = match prefix {
            Some(p) => Some(Prefix::try_from_str(p)?),
            None => None,
        };

        Ok(Message {
            prefix: parsed_prefix,
            command: Command::new(command, args)?,
        })
    }

    /// Build a server-originated numeric reply.
    ///
    /// `args` are rendered in order; the last one is sent as the trailing
    /// parameter (space-prefixed with `:` when it contains a space or is
    /// empty).
    pub fn reply(server_name: &str, response: Response, args: &[&str]) -> Message {
        Message {
            prefix: Some(Prefix::ServerName(server_name.to_string())),
            command: Command::Reply(
                response.code(),
                args.iter().map(|s| s.to_string()).collect(),
            ),
        }
    }

    /// Render this message as a complete wire line: `:<prefix> <command>\r\n`,
    /// or just `<command>\r\n` when there is no prefix.
    pub fn to_wire(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!(":{prefix} {}\r\n", self.command),
            None => format!("{}\r\n", self.command),
        }
    }

    /// Get the nickname from the message prefix, if present.
    pub fn source_nickname(&self) -> Option<&str> {
        self.prefix.as_ref().and_then(|p| match p {
            Prefix::Nickname(name, _, _) => Some(&name[..]),
            _ => None,
        })
    }

    /// Get the appropriate target for a response: the channel name for
    /// channel-targeted PRIVMSG/NOTICE, otherwise the sender's nickname.
    pub fn response_target(&self) -> Option<&str> {
        match self.command {
            Command::PRIVMSG(ref target, _) if target.is_channel_name() => Some(target),
            Command::NOTICE(ref target, _) if target.is_channel_name() => Some(target),
            _ => self.source_nickname(),
        }
    }

    /// Set the prefix/source of this message.
    #[must_use]
    pub fn with_prefix(mut self, prefix: Prefix) -> Self {
        self.prefix = Some(prefix);
        self
    }
}

impl From<Command> for Message {
    fn from(cmd: Command) -> Message {
        Message {
            prefix: None,
            command: cmd,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_prefix() {
        let prefix = Prefix::new_from_str("nick!user@host");
        let msg: Message = Command::PRIVMSG("#test".into(), "Hello".into()).into();
        let msg = msg.with_prefix(prefix.clone());

        assert!(msg.prefix.is_some());
        assert_eq!(msg.prefix.unwrap(), prefix);
    }

    #[test]
    fn test_reply_renders_numeric() {
        let msg = Message::reply("irc.example.org", Response::RplWelcome, &["alice", "Hi"]);
        assert_eq!(msg.to_wire(), ":irc.example.org 001 alice :Hi\r\n");
    }

    #[test]
    fn test_source_nickname_and_response_target() {
        let msg: Message =
            Message::new(Some("nick!user@host"), "PRIVMSG", vec!["#chan", "hi"]).unwrap();
        assert_eq!(msg.source_nickname(), Some("nick"));
        assert_eq!(msg.response_target(), Some("#chan"));

        let msg: Message =
            Message::new(Some("nick!user@host"), "PRIVMSG", vec!["other", "hi"]).unwrap();
        assert_eq!(msg.response_target(), Some("nick"));
    }
}
