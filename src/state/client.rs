//! Per-connection client state, shared across tasks through the registry.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use chrono::Utc;
use parking_lot::RwLock;
use slirc_proto::Message;
use tokio::sync::mpsc;

/// Outgoing-message channel for one connection.
///
/// Every cross-connection relay (channel fanout, NICK/QUIT broadcasts,
/// WALLOPS) writes into the target's sender rather than touching its socket
/// directly; the connection task alone drains the matching receiver onto the
/// wire, which is what serializes writes without a lock held across `.await`.
pub type Sender = mpsc::Sender<Message>;

/// The connection's progress through the registration state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnState {
    /// Waiting for a correct `PASS` (only reachable when a server password
    /// is configured).
    PasswordPending,
    /// Waiting for both `NICK` and `USER` (and, if negotiated, `CAP END`).
    Registration,
    /// Welcome block sent; the full command table is available.
    Registered,
}

/// One accepted connection.
///
/// Stored behind an `Arc` in the registry for the lifetime of the connection;
/// the connection task that owns the socket also holds a clone.
pub struct Client {
    /// Registry-assigned connection identity, stable for the life of the
    /// connection and never reused.
    pub id: u64,
    pub remote_addr: SocketAddr,
    /// Host shown in the client's prefix; the configured cloak string when
    /// one is set, otherwise `remote_addr`'s IP.
    pub display_host: String,
    sender: Sender,
    /// Out-of-band channel the liveness sweep uses to force a disconnect
    /// (ping timeout); carries the reason shown in the synthesized QUIT.
    kill: mpsc::Sender<String>,
    nickname: RwLock<String>,
    user: RwLock<String>,
    realname: RwLock<String>,
    state: RwLock<ConnState>,
    last_activity: AtomicI64,
    ping_sent: AtomicBool,
    awaiting_cap_end: AtomicBool,
}

impl Client {
    pub fn new(
        id: u64,
        remote_addr: SocketAddr,
        display_host: String,
        sender: Sender,
        kill: mpsc::Sender<String>,
        initial_state: ConnState,
    ) -> Self {
        Self {
            id,
            remote_addr,
            display_host,
            sender,
            kill,
            nickname: RwLock::new(String::new()),
            user: RwLock::new(String::new()),
            realname: RwLock::new(String::new()),
            state: RwLock::new(initial_state),
            last_activity: AtomicI64::new(Utc::now().timestamp()),
            ping_sent: AtomicBool::new(false),
            awaiting_cap_end: AtomicBool::new(false),
        }
    }

    pub fn nickname(&self) -> String {
        self.nickname.read().clone()
    }

    pub fn set_nickname(&self, nick: &str) {
        *self.nickname.write() = nick.to_string();
    }

    pub fn has_nickname(&self) -> bool {
        !self.nickname.read().is_empty()
    }

    pub fn user(&self) -> String {
        self.user.read().clone()
    }

    pub fn set_user(&self, user: &str) {
        *self.user.write() = user.to_string();
    }

    pub fn realname(&self) -> String {
        self.realname.read().clone()
    }

    pub fn set_realname(&self, realname: &str) {
        *self.realname.write() = realname.to_string();
    }

    pub fn state(&self) -> ConnState {
        *self.state.read()
    }

    pub fn set_state(&self, state: ConnState) {
        *self.state.write() = state;
    }

    pub fn is_registered(&self) -> bool {
        self.state() == ConnState::Registered
    }

    /// `nick!user@host`, the prefix used when the server relays this
    /// client's own messages to others.
    pub fn prefix(&self) -> String {
        format!("{}!{}@{}", self.nickname(), self.user(), self.display_host)
    }

    /// The identifier shown in replies before a nickname exists.
    pub fn nick_or_star(&self) -> String {
        let nick = self.nickname();
        if nick.is_empty() { "*".to_string() } else { nick }
    }

    pub fn touch(&self) {
        self.last_activity
            .store(Utc::now().timestamp(), Ordering::Relaxed);
        self.ping_sent.store(false, Ordering::Relaxed);
    }

    pub fn idle_secs(&self) -> i64 {
        Utc::now().timestamp() - self.last_activity.load(Ordering::Relaxed)
    }

    pub fn ping_sent(&self) -> bool {
        self.ping_sent.load(Ordering::Relaxed)
    }

    pub fn set_ping_sent(&self, sent: bool) {
        self.ping_sent.store(sent, Ordering::Relaxed);
    }

    pub fn awaiting_cap_end(&self) -> bool {
        self.awaiting_cap_end.load(Ordering::Relaxed)
    }

    pub fn set_awaiting_cap_end(&self, awaiting: bool) {
        self.awaiting_cap_end.store(awaiting, Ordering::Relaxed);
    }

    /// Queue a message for delivery to this client. Silently dropped if the
    /// connection task has already exited; the connection's own teardown
    /// path is responsible for registry cleanup.
    pub async fn send(&self, msg: Message) {
        let _ = self.sender.send(msg).await;
    }

    /// Force this connection's task to disconnect with the given reason.
    /// Used by the liveness sweep on ping timeout. Silently dropped if the
    /// connection has already exited.
    pub async fn kill(&self, reason: String) {
        let _ = self.kill.send(reason).await;
    }
}
