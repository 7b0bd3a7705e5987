//! IRC numeric response codes used by this server.
//!
//! Only the numerics this server actually sends are represented; see
//! `Response::code` for the wire value and [`crate::Message::reply`] for
//! constructing a full reply message.
//!
//! # Reference
//! - RFC 2812: Internet Relay Chat: Client Protocol
//! - Modern IRC documentation: <https://modern.ircdocs.horse/>

#![allow(non_camel_case_types)]

/// IRC server response code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Response {
    // === Registration (001-099) ===
    /// 001 - Welcome to the network
    RplWelcome,
    /// 002 - Your host is running this server
    RplYourHost,
    /// 003 - Server creation date
    RplCreated,
    /// 004 - Server info: name, version, user modes, channel modes
    RplMyInfo,

    // === Command replies (200-399) ===
    /// 221 - User mode string
    RplUModeIs,
    /// 251 - Current client/server counts
    RplLuserClient,
    /// 303 - ISON reply
    RplIson,
    /// 311 - WHOIS: user info
    RplWhoisUser,
    /// 312 - WHOIS: server info
    RplWhoisServer,
    /// 315 - End of WHO list
    RplEndOfWho,
    /// 318 - End of WHOIS list
    RplEndOfWhois,
    /// 319 - WHOIS: channel list
    RplWhoisChannels,
    /// 322 - LIST: one channel
    RplList,
    /// 323 - End of LIST
    RplListEnd,
    /// 324 - Channel mode reply
    RplChannelModeIs,
    /// 331 - No topic set
    RplNoTopic,
    /// 332 - Topic reply
    RplTopic,
    /// 352 - WHO reply
    RplWhoReply,
    /// 353 - NAMES reply
    RplNamReply,
    /// 366 - End of NAMES
    RplEndOfNames,
    /// 372 - MOTD line
    RplMotd,
    /// 375 - Start of MOTD
    RplMotdStart,
    /// 376 - End of MOTD
    RplEndOfMotd,

    // === Error replies (400-599) ===
    /// 401 - No such nick/channel
    ErrNoSuchNick,
    /// 403 - No such channel
    ErrNoSuchChannel,
    /// 409 - No origin given to PING/PONG
    ErrNoOrigin,
    /// 411 - No recipient given
    ErrNoRecipient,
    /// 412 - No text to send
    ErrNoTextToSend,
    /// 421 - Unknown command
    ErrUnknownCommand,
    /// 422 - MOTD file missing
    ErrNoMotd,
    /// 431 - No nickname given
    ErrNoNicknameGiven,
    /// 432 - Erroneous nickname
    ErrErroneousNickname,
    /// 433 - Nickname already in use
    ErrNicknameInUse,
    /// 442 - Not on that channel
    ErrNotOnChannel,
    /// 461 - Not enough parameters
    ErrNeedMoreParams,
    /// 464 - Password incorrect
    ErrPasswdMismatch,
    /// 472 - Unknown mode character
    ErrUnknownMode,
    /// 475 - Channel key (password) incorrect
    ErrBadChannelKey,
    /// 501 - Unknown user mode flag
    ErrUModeUnknownFlag,
}

impl Response {
    /// The three-digit numeric code for this response.
    pub fn code(self) -> u16 {
        use Response::*;
        match self {
            RplWelcome => 1,
            RplYourHost => 2,
            RplCreated => 3,
            RplMyInfo => 4,
            RplUModeIs => 221,
            RplLuserClient => 251,
            RplIson => 303,
            RplWhoisUser => 311,
            RplWhoisServer => 312,
            RplEndOfWho => 315,
            RplEndOfWhois => 318,
            RplWhoisChannels => 319,
            RplList => 322,
            RplListEnd => 323,
            RplChannelModeIs => 324,
            RplNoTopic => 331,
            RplTopic => 332,
            RplWhoReply => 352,
            RplNamReply => 353,
            RplEndOfNames => 366,
            RplMotd => 372,
            RplMotdStart => 375,
            RplEndOfMotd => 376,
            ErrNoSuchNick => 401,
            ErrNoSuchChannel => 403,
            ErrNoOrigin => 409,
            ErrNoRecipient => 411,
            ErrNoTextToSend => 412,
            ErrUnknownCommand => 421,
            ErrNoMotd => 422,
            ErrNoNicknameGiven => 431,
            ErrErroneousNickname => 432,
            ErrNicknameInUse => 433,
            ErrNotOnChannel => 442,
            ErrNeedMoreParams => 461,
            ErrPasswdMismatch => 464,
            ErrUnknownMode => 472,
            ErrBadChannelKey => 475,
            ErrUModeUnknownFlag => 501,
        }
    }

    /// Whether this is an error reply (4xx/5xx), as opposed to an
    /// informational one.
    pub fn is_error(self) -> bool {
        self.code() >= 400
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:03}", self.code())
    }
}
