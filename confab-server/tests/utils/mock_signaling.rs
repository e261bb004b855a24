use async_trait::async_trait;
use confab_core::{ConnectionId, ServerEvent};
use confab_server::SignalingOutput;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Mock SignalingOutput that captures every delivered event.
#[derive(Clone)]
pub struct MockSignalingOutput {
    /// All captured `(recipient, event)` pairs, in delivery order.
    events: Arc<Mutex<Vec<(ConnectionId, ServerEvent)>>>,
}

impl MockSignalingOutput {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// All events delivered so far, in order.
    pub async fn all_events(&self) -> Vec<(ConnectionId, ServerEvent)> {
        self.events.lock().await.clone()
    }

    /// Events delivered to a specific channel, in order.
    pub async fn events_for(&self, conn_id: &ConnectionId) -> Vec<ServerEvent> {
        self.events
            .lock()
            .await
            .iter()
            .filter(|(id, _)| id == conn_id)
            .map(|(_, event)| event.clone())
            .collect()
    }

    /// Wait until at least `count` events were delivered to `conn_id`.
    pub async fn wait_for_events(&self, conn_id: &ConnectionId, count: usize, timeout_ms: u64) -> bool {
        let start = std::time::Instant::now();
        let timeout = std::time::Duration::from_millis(timeout_ms);

        loop {
            if self.events_for(conn_id).await.len() >= count {
                return true;
            }
            if start.elapsed() > timeout {
                return false;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    }

    /// Wait until at least `count` events were delivered overall.
    pub async fn wait_for_total(&self, count: usize, timeout_ms: u64) -> bool {
        let start = std::time::Instant::now();
        let timeout = std::time::Duration::from_millis(timeout_ms);

        loop {
            if self.events.lock().await.len() >= count {
                return true;
            }
            if start.elapsed() > timeout {
                return false;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    }
}

impl Default for MockSignalingOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SignalingOutput for MockSignalingOutput {
    async fn send(&self, conn_id: ConnectionId, event: ServerEvent) {
        tracing::debug!("[MockSignaling] send to {}: {:?}", conn_id, event);
        self.events.lock().await.push((conn_id, event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_captures_events_per_recipient() {
        let mock = MockSignalingOutput::new();
        let a = ConnectionId::new();
        let b = ConnectionId::new();

        mock.send(a, ServerEvent::RoomUsers(vec![])).await;
        mock.send(
            b,
            ServerEvent::Error {
                message: "nope".to_string(),
            },
        )
        .await;

        assert_eq!(mock.events_for(&a).await.len(), 1);
        assert_eq!(mock.events_for(&b).await.len(), 1);
        assert!(mock.wait_for_total(2, 100).await);
    }
}
