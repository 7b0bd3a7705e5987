//! IRC message prefix (`nick!user@host` / server name) types.

mod serialize;
mod types;

pub use self::types::Prefix;
