//! Channel state: membership and the mutable topic/key pair.

use dashmap::DashSet;
use parking_lot::Mutex;

/// The part of a channel's state that can be persisted (topic and key).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChannelState {
    pub topic: String,
    pub key: Option<String>,
}

/// A channel and its members.
///
/// Membership lives in a `DashSet` so joins/parts never need a lock held
/// across an `.await`; topic/key mutation is guarded by a `parking_lot::Mutex`
/// held only for the duration of the read-modify-write, never across a
/// socket write.
pub struct Channel {
    /// Display name, in the case the first JOIN used.
    pub name: String,
    /// Member connection ids.
    pub members: DashSet<u64>,
    state: Mutex<ChannelState>,
}

impl Channel {
    pub fn new(name: String) -> Self {
        Self {
            name,
            members: DashSet::new(),
            state: Mutex::new(ChannelState::default()),
        }
    }

    pub fn with_state(name: String, state: ChannelState) -> Self {
        Self {
            name,
            members: DashSet::new(),
            state: Mutex::new(state),
        }
    }

    pub fn topic(&self) -> String {
        self.state.lock().topic.clone()
    }

    pub fn key(&self) -> Option<String> {
        self.state.lock().key.clone()
    }

    pub fn set_topic(&self, topic: String) {
        self.state.lock().topic = topic;
    }

    pub fn set_key(&self, key: Option<String>) {
        self.state.lock().key = key;
    }

    pub fn snapshot_state(&self) -> ChannelState {
        self.state.lock().clone()
    }

    pub fn is_member(&self, client_id: u64) -> bool {
        self.members.contains(&client_id)
    }

    pub fn add_member(&self, client_id: u64) {
        self.members.insert(client_id);
    }

    pub fn remove_member(&self, client_id: u64) {
        self.members.remove(&client_id);
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_channel_has_no_topic_or_key() {
        let chan = Channel::new("#test".to_string());
        assert_eq!(chan.topic(), "");
        assert_eq!(chan.key(), None);
        assert!(chan.is_empty());
    }

    #[test]
    fn membership_tracks_presence() {
        let chan = Channel::new("#test".to_string());
        chan.add_member(1);
        chan.add_member(2);
        assert_eq!(chan.member_count(), 2);
        assert!(chan.is_member(1));
        chan.remove_member(1);
        assert!(!chan.is_member(1));
        assert_eq!(chan.member_count(), 1);
    }

    #[test]
    fn topic_and_key_mutate_independently() {
        let chan = Channel::new("#test".to_string());
        chan.set_topic("hello".to_string());
        chan.set_key(Some("secret".to_string()));
        assert_eq!(chan.topic(), "hello");
        assert_eq!(chan.key(), Some("secret".to_string()));
    }
}
