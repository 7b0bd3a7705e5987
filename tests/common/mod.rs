//! Shared integration test harness: spawn a real `slircd` binary on an
//! ephemeral port and drive it with a small test client over a real socket.

pub mod client;
pub mod server;

pub use client::TestClient;
pub use server::TestServer;
