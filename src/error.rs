//! Unified error handling for command dispatch and channel operations.

use slirc_proto::{Message, Response};
use thiserror::Error;

// ============================================================================
// Handler errors (command processing)
// ============================================================================

/// Errors raised while dispatching a single client command.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("not enough parameters")]
    NeedMoreParams,

    #[error("no text to send")]
    NoTextToSend,

    #[error("no origin given")]
    NoOrigin,

    #[error("no recipient given")]
    NoRecipient,

    #[error("nickname in use: {0}")]
    NicknameInUse(String),

    #[error("erroneous nickname: {0}")]
    ErroneousNickname(String),

    #[error("password incorrect")]
    PasswdMismatch,

    #[error("unknown mode flag")]
    UModeUnknownFlag,

    /// Disconnect the client silently; the error has already been sent.
    #[error("access denied")]
    AccessDenied,

    #[error("client quit: {0:?}")]
    Quit(Option<String>),

    #[error("internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Convert to an IRC error reply, or `None` for errors that don't warrant
    /// a client-visible numeric (access denial already sent its own message;
    /// quit is handled specially by the connection task).
    pub fn to_irc_reply(&self, server_name: &str, nick: &str, cmd_name: &str) -> Option<Message> {
        let (response, args): (Response, Vec<String>) = match self {
            Self::NeedMoreParams => (
                Response::ErrNeedMoreParams,
                vec![
                    nick.to_string(),
                    cmd_name.to_string(),
                    "Not enough parameters".to_string(),
                ],
            ),
            Self::NoTextToSend => (
                Response::ErrNoTextToSend,
                vec![nick.to_string(), "No text to send".to_string()],
            ),
            Self::NoOrigin => (
                Response::ErrNoOrigin,
                vec![nick.to_string(), "No origin specified".to_string()],
            ),
            Self::NoRecipient => (
                Response::ErrNoRecipient,
                vec![nick.to_string(), "No recipient given".to_string()],
            ),
            Self::NicknameInUse(bad_nick) => (
                Response::ErrNicknameInUse,
                vec![
                    nick.to_string(),
                    bad_nick.clone(),
                    "Nickname is already in use".to_string(),
                ],
            ),
            Self::ErroneousNickname(bad_nick) => (
                Response::ErrErroneousNickname,
                vec![
                    nick.to_string(),
                    bad_nick.clone(),
                    "Erroneous nickname".to_string(),
                ],
            ),
            Self::PasswdMismatch => (
                Response::ErrPasswdMismatch,
                vec![nick.to_string(), "Password incorrect".to_string()],
            ),
            Self::UModeUnknownFlag => (
                Response::ErrUModeUnknownFlag,
                vec![nick.to_string(), "Unknown MODE flag".to_string()],
            ),
            Self::AccessDenied | Self::Quit(_) | Self::Internal(_) => return None,
        };
        Some(Message::reply(
            server_name,
            response,
            &args.iter().map(String::as_str).collect::<Vec<_>>(),
        ))
    }
}

/// Result type for command handlers.
pub type HandlerResult = Result<(), HandlerError>;

// ============================================================================
// Channel errors (registry/channel operations)
// ============================================================================

/// Errors specific to channel membership and state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("no such channel")]
    NoSuchChannel,

    #[error("not on channel")]
    NotOnChannel,

    #[error("cannot join channel (+k)")]
    BadChannelKey,

    #[error("unknown channel mode")]
    UnknownMode,
}

impl ChannelError {
    /// Convert to an IRC error reply.
    pub fn to_irc_reply(&self, server_name: &str, nick: &str, channel: &str) -> Message {
        let (response, args): (Response, Vec<String>) = match self {
            Self::NoSuchChannel => (
                Response::ErrNoSuchChannel,
                vec![
                    nick.to_string(),
                    channel.to_string(),
                    "No such channel".to_string(),
                ],
            ),
            Self::NotOnChannel => (
                Response::ErrNotOnChannel,
                vec![
                    nick.to_string(),
                    channel.to_string(),
                    "You're not on that channel".to_string(),
                ],
            ),
            Self::BadChannelKey => (
                Response::ErrBadChannelKey,
                vec![
                    nick.to_string(),
                    channel.to_string(),
                    "Cannot join channel (+k)".to_string(),
                ],
            ),
            Self::UnknownMode => (
                Response::ErrUnknownMode,
                vec![
                    nick.to_string(),
                    channel.to_string(),
                    "Unknown MODE flag".to_string(),
                ],
            ),
        };
        Message::reply(
            server_name,
            response,
            &args.iter().map(String::as_str).collect::<Vec<_>>(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn need_more_params_has_a_reply() {
        let reply = HandlerError::NeedMoreParams.to_irc_reply("server", "nick", "JOIN");
        assert!(reply.is_some());
    }

    #[test]
    fn internal_errors_have_no_reply() {
        let reply = HandlerError::Internal("oops".into()).to_irc_reply("server", "nick", "JOIN");
        assert!(reply.is_none());
    }

    #[test]
    fn channel_error_renders_expected_numeric() {
        let reply = ChannelError::NotOnChannel.to_irc_reply("server", "nick", "#test");
        assert!(matches!(
            reply.command,
            slirc_proto::Command::Reply(442, _)
        ));
    }
}
