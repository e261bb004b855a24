use crate::gateway::{GatewayCommand, SignalingOutput};
use async_trait::async_trait;
use axum::extract::ws::Message;
use confab_core::{ConnectionId, IceServerConfig, ServerEvent};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, warn};

struct SignalingInner {
    peers: DashMap<ConnectionId, mpsc::UnboundedSender<Message>>,
    ice_servers: Vec<IceServerConfig>,
}

#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
    pub(crate) gateway_tx: mpsc::Sender<GatewayCommand>,
}

impl SignalingService {
    pub fn new(gateway_tx: mpsc::Sender<GatewayCommand>, ice_servers: Vec<IceServerConfig>) -> Self {
        Self {
            inner: Arc::new(SignalingInner {
                peers: DashMap::new(),
                ice_servers,
            }),
            gateway_tx,
        }
    }

    pub fn get_ice_servers(&self) -> Vec<IceServerConfig> {
        self.inner.ice_servers.clone()
    }

    pub fn add_peer(&self, conn_id: ConnectionId, tx: mpsc::UnboundedSender<Message>) {
        self.inner.peers.insert(conn_id, tx);
    }

    pub fn remove_peer(&self, conn_id: &ConnectionId) {
        self.inner.peers.remove(conn_id);
    }

    pub fn send_event(&self, conn_id: ConnectionId, event: &ServerEvent) {
        if let Some(peer) = self.inner.peers.get(&conn_id) {
            match serde_json::to_string(event) {
                Ok(json) => {
                    if let Err(e) = peer.send(Message::Text(json.into())) {
                        error!("Failed to send WS message to {}: {:?}", conn_id, e);
                    }
                }
                Err(e) => error!("Failed to serialize server event: {}", e),
            }
        } else {
            warn!("Attempted to send event to disconnected channel {}", conn_id);
        }
    }
}

#[async_trait]
impl SignalingOutput for SignalingService {
    async fn send(&self, conn_id: ConnectionId, event: ServerEvent) {
        self.send_event(conn_id, &event);
    }
}
