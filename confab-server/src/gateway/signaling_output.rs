use async_trait::async_trait;
use confab_core::{ConnectionId, ServerEvent};

/// Outbound delivery seam. The WebSocket service implements it in
/// production; tests substitute a capturing mock.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    /// Deliver `event` to the channel identified by `conn_id`.
    async fn send(&self, conn_id: ConnectionId, event: ServerEvent);
}
