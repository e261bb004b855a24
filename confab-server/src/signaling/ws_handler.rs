use crate::SignalingService;
use crate::gateway::GatewayCommand;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use confab_core::{ClientEvent, ConnectionId, RoomId, ServerEvent, SignalPayload};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(service): State<SignalingService>,
) -> impl IntoResponse {
    let conn_id = ConnectionId::new();

    ws.on_upgrade(move |socket| handle_socket(socket, conn_id, service))
}

async fn handle_socket(socket: WebSocket, conn_id: ConnectionId, service: SignalingService) {
    info!("New WebSocket connection: {}", conn_id);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    service.add_peer(conn_id, tx);
    service.send_event(
        conn_id,
        &ServerEvent::IceConfig {
            ice_servers: service.get_ice_servers(),
        },
    );

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let service = service.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(event) => {
                            if let Err(e) = service.gateway_tx.send(command_for(conn_id, event)).await
                            {
                                error!("Gateway died: {}", e);
                                break;
                            }
                        }
                        Err(e) => warn!("Invalid client event from {}: {:?}", conn_id, e),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    // Exactly one disconnect command per channel, whichever half failed.
    let _ = service
        .gateway_tx
        .send(GatewayCommand::Disconnect { conn_id })
        .await;

    service.remove_peer(&conn_id);
    info!("WebSocket disconnected: {}", conn_id);
}

/// The room id on relay frames stays part of the wire format, but routing
/// is by the channel's recorded join state, so it is dropped here.
fn command_for(conn_id: ConnectionId, event: ClientEvent) -> GatewayCommand {
    match event {
        ClientEvent::JoinRoom {
            room_id,
            display_name,
        } => GatewayCommand::Join {
            conn_id,
            room_id: RoomId::from(room_id),
            display_name,
        },
        ClientEvent::Offer { offer, .. } => GatewayCommand::Relay {
            conn_id,
            payload: SignalPayload::Offer(offer),
        },
        ClientEvent::Answer { answer, .. } => GatewayCommand::Relay {
            conn_id,
            payload: SignalPayload::Answer(answer),
        },
        ClientEvent::IceCandidate { candidate, .. } => GatewayCommand::Relay {
            conn_id,
            payload: SignalPayload::IceCandidate(candidate),
        },
    }
}
