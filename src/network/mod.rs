//! Transport layer: the listen/accept loops, per-connection driver, the
//! liveness sweep, and TLS setup.

pub mod connection;
pub mod gateway;
pub mod liveness;
pub mod tls;

pub use connection::Stream;
