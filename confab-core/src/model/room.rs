use crate::model::connection::ConnectionId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque caller-supplied room key. Unguessable by convention only; the
/// gateway never allocates or validates these.
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RoomId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Roster entry as delivered to clients in `room-users`, `user-joined`
/// and `user-left`.
#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomUser {
    pub user_id: ConnectionId,
    pub user_name: String,
}
