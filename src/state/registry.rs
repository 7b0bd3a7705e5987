//! The server registry: the set of connected clients, the nickname index,
//! and the set of active channels.
//!
//! All three maps are `dashmap`-backed so no handler ever holds a lock across
//! an `.await` point (matching the teacher's choice of `dashmap` for its
//! `Matrix` state store).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use slirc_proto::irc_to_lower;

use super::channel::{Channel, ChannelState};
use super::client::Client;

/// Owns every piece of shared, cross-connection state.
///
/// A single `Arc<Registry>` is handed to every connection task and to the
/// liveness-sweep task; it outlives any individual connection.
pub struct Registry {
    clients: DashMap<u64, Arc<Client>>,
    /// Canonical (case-folded) nickname -> owning client id. A bijection onto
    /// the subset of clients with a non-empty nickname.
    nicknames: DashMap<String, u64>,
    /// Canonical (case-folded) channel name -> channel.
    channels: DashMap<String, Arc<Channel>>,
    next_id: AtomicU64,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            clients: DashMap::new(),
            nicknames: DashMap::new(),
            channels: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Allocate a fresh connection id.
    pub fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    pub fn insert_client(&self, client: Arc<Client>) {
        self.clients.insert(client.id, client);
    }

    pub fn client(&self, id: u64) -> Option<Arc<Client>> {
        self.clients.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    /// Remove a client from the registry entirely: the client map, the
    /// nickname index (iff it still owns its nickname), and every channel
    /// it belonged to. Returns the channels it was a member of, so the
    /// caller can compute the disconnect broadcast set before the member
    /// sets are mutated further.
    pub fn remove_client(&self, id: u64) -> Vec<Arc<Channel>> {
        if let Some((_, client)) = self.clients.remove(&id) {
            let nick = irc_to_lower(&client.nickname());
            if !nick.is_empty() {
                self.nicknames.remove_if(&nick, |_, owner| *owner == id);
            }
        }
        let mut left = Vec::new();
        for entry in self.channels.iter() {
            let chan = entry.value();
            if chan.is_member(id) {
                chan.remove_member(id);
                left.push(Arc::clone(chan));
            }
        }
        for chan in &left {
            self.remove_channel_if_empty(&chan.name);
        }
        left
    }

    /// Every channel a client currently belongs to.
    pub fn channels_of(&self, id: u64) -> Vec<Arc<Channel>> {
        self.channels
            .iter()
            .filter(|entry| entry.value().is_member(id))
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    pub fn client_by_nick(&self, nick: &str) -> Option<Arc<Client>> {
        let id = *self.nicknames.get(&irc_to_lower(nick))?;
        self.client(id)
    }

    pub fn nick_in_use(&self, nick: &str) -> bool {
        self.nicknames.contains_key(&irc_to_lower(nick))
    }

    /// Claim a nickname for a client that doesn't have one yet (or is
    /// changing nicknames). Returns `false` if another client already owns
    /// the canonical form.
    pub fn claim_nick(&self, client: &Client, new_nick: &str) -> bool {
        let canon = irc_to_lower(new_nick);
        let old_canon = irc_to_lower(&client.nickname());

        if canon == old_canon {
            // Same canonical nick: a no-op case-change, not a new claim.
            client.set_nickname(new_nick);
            return true;
        }

        let inserted = self
            .nicknames
            .insert(canon.clone(), client.id)
            .is_none_or(|prev_owner| prev_owner == client.id);
        if !inserted {
            // Someone else already owns this canonical nick; undo.
            return false;
        }
        if !old_canon.is_empty() {
            self.nicknames.remove_if(&old_canon, |_, owner| *owner == client.id);
        }
        client.set_nickname(new_nick);
        true
    }

    /// Get an existing channel, or lazily create an empty one (the caller is
    /// expected to add the joining member immediately afterward).
    pub fn get_or_create_channel(&self, name: &str, initial_state: ChannelState) -> Arc<Channel> {
        let canon = irc_to_lower(name);
        self.channels
            .entry(canon)
            .or_insert_with(|| Arc::new(Channel::with_state(name.to_string(), initial_state)))
            .clone()
    }

    pub fn channel(&self, name: &str) -> Option<Arc<Channel>> {
        self.channels
            .get(&irc_to_lower(name))
            .map(|entry| Arc::clone(entry.value()))
    }

    pub fn remove_channel_if_empty(&self, name: &str) {
        let canon = irc_to_lower(name);
        self.channels.remove_if(&canon, |_, chan| chan.is_empty());
    }

    pub fn all_channels(&self) -> Vec<Arc<Channel>> {
        self.channels.iter().map(|e| Arc::clone(e.value())).collect()
    }

    pub fn all_clients(&self) -> Vec<Arc<Client>> {
        self.clients.iter().map(|e| Arc::clone(e.value())).collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::client::ConnState;
    use tokio::sync::mpsc;

    fn new_client(registry: &Registry) -> Arc<Client> {
        let (tx, _rx) = mpsc::channel(8);
        let (kill_tx, _kill_rx) = mpsc::channel(1);
        let client = Arc::new(Client::new(
            registry.next_id(),
            "127.0.0.1:6667".parse().unwrap(),
            "127.0.0.1".to_string(),
            tx,
            kill_tx,
            ConnState::Registration,
        ));
        registry.insert_client(Arc::clone(&client));
        client
    }

    #[test]
    fn claim_nick_rejects_collision_case_insensitively() {
        let registry = Registry::new();
        let alice = new_client(&registry);
        let bob = new_client(&registry);

        assert!(registry.claim_nick(&alice, "Alice"));
        assert!(!registry.claim_nick(&bob, "alice"));
        assert!(registry.client_by_nick("ALICE").is_some());
    }

    #[test]
    fn claim_nick_allows_rename() {
        let registry = Registry::new();
        let alice = new_client(&registry);
        registry.claim_nick(&alice, "alice");

        assert!(registry.claim_nick(&alice, "alice2"));
        assert!(registry.client_by_nick("alice").is_none());
        assert!(registry.client_by_nick("alice2").is_some());
    }

    #[test]
    fn channel_removed_once_last_member_parts() {
        let registry = Registry::new();
        let chan = registry.get_or_create_channel("#test", ChannelState::default());
        chan.add_member(1);
        assert!(registry.channel("#Test").is_some());

        chan.remove_member(1);
        registry.remove_channel_if_empty("#TEST");
        assert!(registry.channel("#test").is_none());
    }

    #[test]
    fn remove_client_leaves_every_channel_it_was_in() {
        let registry = Registry::new();
        let alice = new_client(&registry);
        let chan_a = registry.get_or_create_channel("#a", ChannelState::default());
        let chan_b = registry.get_or_create_channel("#b", ChannelState::default());
        chan_a.add_member(alice.id);
        chan_b.add_member(alice.id);

        let left = registry.remove_client(alice.id);
        assert_eq!(left.len(), 2);
        assert!(registry.channel("#a").is_none());
        assert!(registry.channel("#b").is_none());
    }
}
