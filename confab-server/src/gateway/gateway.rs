use crate::gateway::{GatewayCommand, ProtocolError, SignalingOutput};
use crate::room::RoomRegistry;
use confab_core::{ConnectionId, RoomId, RoomUser, ServerEvent, SignalPayload};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Per-channel join state. A connection id is present here iff the channel
/// has reached JOINED; its room binding is fixed until disconnect.
struct Participant {
    room_id: RoomId,
    display_name: String,
}

/// Single actor owning the room registry and the participant table.
///
/// Every mutation arrives through the command channel, so concurrent
/// joins, relays and disconnects from different channels are serialized
/// here without locking.
pub struct Gateway {
    registry: RoomRegistry,
    participants: HashMap<ConnectionId, Participant>,
    command_rx: mpsc::Receiver<GatewayCommand>,
    output: Arc<dyn SignalingOutput>,
}

impl Gateway {
    pub fn new(command_rx: mpsc::Receiver<GatewayCommand>, output: Arc<dyn SignalingOutput>) -> Self {
        Self {
            registry: RoomRegistry::new(),
            participants: HashMap::new(),
            command_rx,
            output,
        }
    }

    pub async fn run(mut self) {
        info!("Gateway event loop started");

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd).await;
        }

        info!("Gateway event loop finished");
    }

    async fn handle_command(&mut self, cmd: GatewayCommand) {
        match cmd {
            GatewayCommand::Join {
                conn_id,
                room_id,
                display_name,
            } => self.handle_join(conn_id, room_id, display_name).await,

            GatewayCommand::Relay { conn_id, payload } => {
                self.handle_relay(conn_id, payload).await;
            }

            GatewayCommand::Disconnect { conn_id } => self.handle_disconnect(conn_id).await,
        }
    }

    async fn handle_join(&mut self, conn_id: ConnectionId, room_id: RoomId, display_name: String) {
        if self.participants.contains_key(&conn_id) {
            warn!("Duplicate join-room from {}", conn_id);
            self.reject(conn_id, ProtocolError::AlreadyJoined).await;
            return;
        }

        info!("{} joining room '{}' as '{}'", conn_id, room_id, display_name);

        let existing = self.registry.members_of(&room_id);
        let roster: Vec<RoomUser> = existing
            .iter()
            .filter_map(|id| self.roster_entry(id))
            .collect();

        self.registry.join(room_id.clone(), conn_id);
        self.participants.insert(
            conn_id,
            Participant {
                room_id,
                display_name: display_name.clone(),
            },
        );

        self.output
            .send(conn_id, ServerEvent::RoomUsers(roster))
            .await;

        let joined = RoomUser {
            user_id: conn_id,
            user_name: display_name,
        };
        for member in existing {
            self.output
                .send(member, ServerEvent::UserJoined(joined.clone()))
                .await;
        }
    }

    async fn handle_relay(&mut self, conn_id: ConnectionId, payload: SignalPayload) {
        // Routing derives from the channel's recorded join state; the
        // client-declared room id never participates.
        let Some(participant) = self.participants.get(&conn_id) else {
            warn!("Relay from {} before join-room", conn_id);
            self.reject(conn_id, ProtocolError::NotJoined).await;
            return;
        };

        let event = payload.into_server_event(conn_id);
        for member in self.registry.members_of(&participant.room_id) {
            if member != conn_id {
                self.output.send(member, event.clone()).await;
            }
        }
    }

    async fn handle_disconnect(&mut self, conn_id: ConnectionId) {
        let Some(participant) = self.participants.remove(&conn_id) else {
            // Closed without ever joining, nothing to tear down.
            return;
        };

        info!("{} left room '{}'", conn_id, participant.room_id);
        self.registry.leave(&participant.room_id, &conn_id);

        let left = RoomUser {
            user_id: conn_id,
            user_name: participant.display_name,
        };
        for member in self.registry.members_of(&participant.room_id) {
            self.output
                .send(member, ServerEvent::UserLeft(left.clone()))
                .await;
        }
    }

    async fn reject(&self, conn_id: ConnectionId, error: ProtocolError) {
        self.output
            .send(
                conn_id,
                ServerEvent::Error {
                    message: error.to_string(),
                },
            )
            .await;
    }

    fn roster_entry(&self, conn_id: &ConnectionId) -> Option<RoomUser> {
        self.participants.get(conn_id).map(|p| RoomUser {
            user_id: *conn_id,
            user_name: p.display_name.clone(),
        })
    }
}
