use crate::model::connection::ConnectionId;
use crate::model::room::RoomUser;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

/// Relay blob taken off a client frame. The gateway never looks inside
/// the `Value`; it only picks the matching outbound event.
#[derive(Debug, Clone)]
pub enum SignalPayload {
    Offer(Value),
    Answer(Value),
    IceCandidate(Value),
}

impl SignalPayload {
    /// Wrap the blob into the broadcast event, stamping the sender id.
    pub fn into_server_event(self, from: ConnectionId) -> ServerEvent {
        match self {
            SignalPayload::Offer(offer) => ServerEvent::Offer { offer, from },
            SignalPayload::Answer(answer) => ServerEvent::Answer { answer, from },
            SignalPayload::IceCandidate(candidate) => ServerEvent::IceCandidate { candidate, from },
        }
    }
}

/// Frames accepted from a client channel.
///
/// The `room_id` on the relay variants is part of the reference protocol
/// but is not trusted for routing; the gateway routes by the channel's
/// recorded join state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    #[serde(rename_all = "camelCase")]
    JoinRoom { room_id: String, display_name: String },
    #[serde(rename_all = "camelCase")]
    Offer { room_id: String, offer: Value },
    #[serde(rename_all = "camelCase")]
    Answer { room_id: String, answer: Value },
    #[serde(rename_all = "camelCase")]
    IceCandidate { room_id: String, candidate: Value },
}

/// Frames emitted by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    #[serde(rename_all = "camelCase")]
    IceConfig { ice_servers: Vec<IceServerConfig> },
    RoomUsers(Vec<RoomUser>),
    UserJoined(RoomUser),
    UserLeft(RoomUser),
    Offer {
        offer: Value,
        from: ConnectionId,
    },
    Answer {
        answer: Value,
        from: ConnectionId,
    },
    IceCandidate {
        candidate: Value,
        from: ConnectionId,
    },
    Error {
        message: String,
    },
}
