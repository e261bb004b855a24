use confab_core::{ConnectionId, RoomId};
use std::collections::{HashMap, HashSet};

/// Tracks which connection ids belong to which room.
///
/// Owned exclusively by the gateway actor; every mutation is serialized
/// through its command loop. Nothing is persisted, so a process restart
/// drops all rooms and every in-progress call with them.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomId, HashSet<ConnectionId>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            rooms: HashMap::new(),
        }
    }

    /// Add `conn_id` to the member set of `room_id`, creating the room on
    /// first join. Idempotent for an existing member.
    pub fn join(&mut self, room_id: RoomId, conn_id: ConnectionId) {
        self.rooms.entry(room_id).or_default().insert(conn_id);
    }

    /// Remove `conn_id` from `room_id`. The room entry is deleted once its
    /// member set empties. No-op for an unknown room or member.
    pub fn leave(&mut self, room_id: &RoomId, conn_id: &ConnectionId) {
        let Some(members) = self.rooms.get_mut(room_id) else {
            return;
        };

        members.remove(conn_id);
        if members.is_empty() {
            self.rooms.remove(room_id);
        }
    }

    /// Current member ids of `room_id`, in no particular order.
    pub fn members_of(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        self.rooms
            .get(room_id)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn contains_room(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
