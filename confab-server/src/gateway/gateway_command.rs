use confab_core::{ConnectionId, RoomId, SignalPayload};

/// Commands fed into the gateway actor by the WebSocket layer.
#[derive(Debug)]
pub enum GatewayCommand {
    /// A channel asked to join a room under a display name.
    Join {
        conn_id: ConnectionId,
        room_id: RoomId,
        display_name: String,
    },

    /// A signaling blob to fan out to the rest of the sender's room.
    Relay {
        conn_id: ConnectionId,
        payload: SignalPayload,
    },

    /// The channel closed, for any reason.
    Disconnect { conn_id: ConnectionId },
}
