//! # slirc-proto
//!
//! Wire protocol for a minimal IRC daemon: case-folding, nickname/channel
//! validation, line framing, command tokenization, and numeric reply
//! construction.
//!
//! This crate owns everything that is purely about the bytes on the wire. It
//! has no knowledge of sockets, channel membership, or the server registry;
//! those live in the `slircd` binary crate.
//!
//! ## Quick start
//!
//! ```rust
//! use slirc_proto::Message;
//!
//! let msg: Message = "NICK alice\r\n".parse().unwrap();
//! assert!(matches!(msg.command, slirc_proto::Command::NICK(_)));
//!
//! let reply = slirc_proto::Message::reply(
//!     "irc.example.org",
//!     slirc_proto::Response::RplWelcome,
//!     &["alice", "Hi, welcome to IRC"],
//! );
//! println!("{}", reply.to_wire());
//! ```

#![deny(clippy::all)]

pub mod casemap;
pub mod chan;
pub mod command;
pub mod error;
pub mod line;
pub mod message;
pub mod nick;
pub mod prefix;
pub mod response;

pub use casemap::{irc_eq, irc_lower_char, irc_to_lower};
pub use chan::ChannelExt;
pub use command::Command;
pub use error::{MessageParseError, ProtocolError};
pub use line::LineCodec;
pub use message::Message;
pub use nick::NickExt;
pub use prefix::Prefix;
pub use response::Response;

/// Maximum length of a constructed wire line, including the trailing CRLF.
pub const MAX_LINE_LEN: usize = 512;
