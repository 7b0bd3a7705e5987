//! Shared server state: connected clients, the nickname index, and channels.

mod channel;
mod client;
mod registry;

pub use channel::{Channel, ChannelState};
pub use client::{Client, ConnState, Sender};
pub use registry::Registry;
