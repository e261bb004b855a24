use crate::error::ClientError;
use confab_core::{ClientEvent, RoomId, ServerEvent, SignalPayload};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{error, info, warn};

/// Client half of the persistent signaling channel.
///
/// Outbound frames go through an unbounded queue drained by a writer
/// task; inbound frames are decoded and surfaced on the event receiver
/// returned by [`SignalingChannel::connect`]. The receiver closing means
/// the channel is gone; the session treats that as the end of the call.
pub struct SignalingChannel {
    outbound: mpsc::UnboundedSender<ClientEvent>,
    writer: JoinHandle<()>,
    reader: JoinHandle<()>,
}

impl SignalingChannel {
    pub async fn connect(
        url: &str,
    ) -> Result<(Self, mpsc::UnboundedReceiver<ServerEvent>), ClientError> {
        let (ws_stream, _) = connect_async(url).await?;
        info!("Signaling channel connected: {}", url);

        let (mut write, mut read) = ws_stream.split();
        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<ClientEvent>();
        let (event_tx, event_rx) = mpsc::unbounded_channel::<ServerEvent>();

        let writer = tokio::spawn(async move {
            while let Some(event) = out_rx.recv().await {
                match serde_json::to_string(&event) {
                    Ok(json) => {
                        if write.send(Message::Text(json)).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => error!("Failed to serialize client event: {}", e),
                }
            }
            let _ = write.close().await;
        });

        let reader = tokio::spawn(async move {
            while let Some(msg) = read.next().await {
                match msg {
                    Ok(Message::Text(text)) => match serde_json::from_str::<ServerEvent>(&text) {
                        Ok(event) => {
                            if event_tx.send(event).is_err() {
                                break;
                            }
                        }
                        Err(e) => warn!("Invalid server event: {:?}", e),
                    },
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        warn!("Signaling socket error: {}", e);
                        break;
                    }
                }
            }
        });

        Ok((
            Self {
                outbound: out_tx,
                writer,
                reader,
            },
            event_rx,
        ))
    }

    pub fn join_room(&self, room_id: &RoomId, display_name: &str) -> Result<(), ClientError> {
        self.send(ClientEvent::JoinRoom {
            room_id: room_id.to_string(),
            display_name: display_name.to_string(),
        })
    }

    /// Ship a locally produced signaling blob, stamped with the room id
    /// the reference wire format expects.
    pub fn send_signal(&self, room_id: &RoomId, payload: SignalPayload) -> Result<(), ClientError> {
        let room_id = room_id.to_string();
        let event = match payload {
            SignalPayload::Offer(offer) => ClientEvent::Offer { room_id, offer },
            SignalPayload::Answer(answer) => ClientEvent::Answer { room_id, answer },
            SignalPayload::IceCandidate(candidate) => ClientEvent::IceCandidate { room_id, candidate },
        };
        self.send(event)
    }

    pub fn close(&self) {
        self.writer.abort();
        self.reader.abort();
    }

    fn send(&self, event: ClientEvent) -> Result<(), ClientError> {
        self.outbound
            .send(event)
            .map_err(|_| ClientError::ChannelClosed)
    }
}

impl Drop for SignalingChannel {
    fn drop(&mut self) {
        self.close();
    }
}
