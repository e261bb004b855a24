use crate::media::MediaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Fatal before any transport activity: without local media there is
    /// no call to start.
    #[error("media acquisition failed: {0}")]
    Media(#[from] MediaError),

    #[error("signaling transport error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("signaling channel closed")]
    ChannelClosed,

    #[error("negotiation failed: {0}")]
    Negotiation(#[from] webrtc::Error),

    #[error("malformed signaling payload: {0}")]
    Payload(#[from] serde_json::Error),
}
