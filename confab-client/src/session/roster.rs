use confab_core::{ConnectionId, RoomUser};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Known remote participants, keyed by connection id.
///
/// A participant can be announced twice: listed in `room-users` and then
/// racing in as `user-joined`. Insertion is therefore idempotent and
/// reports whether the entry was actually new, so the session never
/// negotiates the same pairing twice.
#[derive(Debug, Default)]
pub struct Roster {
    participants: HashMap<ConnectionId, RoomUser>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the participant was already known; the
    /// original entry is kept.
    pub fn insert(&mut self, user: RoomUser) -> bool {
        match self.participants.entry(user.user_id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(user);
                true
            }
        }
    }

    pub fn remove(&mut self, conn_id: &ConnectionId) -> Option<RoomUser> {
        self.participants.remove(conn_id)
    }

    pub fn get(&self, conn_id: &ConnectionId) -> Option<&RoomUser> {
        self.participants.get(conn_id)
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}
