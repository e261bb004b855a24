use anyhow::{Context, Result};
use confab_core::{ConnectionId, RoomId, RoomUser, ServerEvent, SignalPayload};
use confab_server::GatewayCommand;
use serde_json::json;
use tokio::sync::mpsc;

/// Timeout for event delivery assertions (ms).
pub const EVENT_TIMEOUT_MS: u64 = 2000;

pub async fn join_room(
    tx: &mpsc::Sender<GatewayCommand>,
    conn_id: ConnectionId,
    room: &str,
    name: &str,
) -> Result<()> {
    tx.send(GatewayCommand::Join {
        conn_id,
        room_id: RoomId::from(room),
        display_name: name.to_string(),
    })
    .await
    .context("Failed to send Join")
}

pub async fn send_offer(
    tx: &mpsc::Sender<GatewayCommand>,
    conn_id: ConnectionId,
    sdp: &str,
) -> Result<()> {
    tx.send(GatewayCommand::Relay {
        conn_id,
        payload: SignalPayload::Offer(json!({ "type": "offer", "sdp": sdp })),
    })
    .await
    .context("Failed to send Relay")
}

pub async fn disconnect(tx: &mpsc::Sender<GatewayCommand>, conn_id: ConnectionId) -> Result<()> {
    tx.send(GatewayCommand::Disconnect { conn_id })
        .await
        .context("Failed to send Disconnect")
}

/// The `room-users` roster out of a channel's event log, if one arrived.
pub fn room_users(events: &[ServerEvent]) -> Option<Vec<RoomUser>> {
    events.iter().find_map(|event| match event {
        ServerEvent::RoomUsers(users) => Some(users.clone()),
        _ => None,
    })
}

pub fn user_joined(events: &[ServerEvent]) -> Vec<RoomUser> {
    events
        .iter()
        .filter_map(|event| match event {
            ServerEvent::UserJoined(user) => Some(user.clone()),
            _ => None,
        })
        .collect()
}

pub fn user_left(events: &[ServerEvent]) -> Vec<RoomUser> {
    events
        .iter()
        .filter_map(|event| match event {
            ServerEvent::UserLeft(user) => Some(user.clone()),
            _ => None,
        })
        .collect()
}

pub fn errors(events: &[ServerEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            ServerEvent::Error { message } => Some(message.clone()),
            _ => None,
        })
        .collect()
}

pub fn offers_from(events: &[ServerEvent]) -> Vec<ConnectionId> {
    events
        .iter()
        .filter_map(|event| match event {
            ServerEvent::Offer { from, .. } => Some(*from),
            _ => None,
        })
        .collect()
}
