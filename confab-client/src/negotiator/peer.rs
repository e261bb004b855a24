use crate::error::ClientError;
use crate::media::LocalMedia;
use crate::negotiator::{NegotiationRole, PendingCandidates};
use confab_core::{ConnectionId, IceServerConfig, SignalPayload};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::ice_transport::ice_candidate::RTCIceCandidateInit;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_remote::TrackRemote;

/// Lifecycle of one pairing. There is no retry: once `Closed`, the
/// pairing is discarded and never re-established.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum PeerState {
    New,
    Negotiating,
    Connected,
    Closed,
}

/// What a negotiator surfaces to the session driver.
#[derive(Debug)]
pub enum PeerEvent {
    StateChanged(ConnectionId, PeerState),
    TrackReceived(ConnectionId, Arc<TrackRemote>),
}

/// Drives the offer/answer/ICE exchange for exactly one remote
/// participant, using the signaling channel as transport. Locally
/// generated blobs go out through `signal_tx`; the session stamps them
/// with the room id and ships them.
pub struct PeerNegotiator {
    remote_id: ConnectionId,
    role: NegotiationRole,
    pc: Arc<RTCPeerConnection>,
    pending: Arc<Mutex<PendingCandidates>>,
    state: Arc<Mutex<PeerState>>,
    signal_tx: mpsc::UnboundedSender<SignalPayload>,
}

impl PeerNegotiator {
    pub async fn new(
        remote_id: ConnectionId,
        role: NegotiationRole,
        ice_servers: &[IceServerConfig],
        media: &LocalMedia,
        signal_tx: mpsc::UnboundedSender<SignalPayload>,
        event_tx: mpsc::UnboundedSender<PeerEvent>,
    ) -> Result<Self, ClientError> {
        let mut media_engine = MediaEngine::default();
        media_engine.register_default_codecs()?;

        let registry = register_default_interceptors(Registry::new(), &mut media_engine)?;

        let api = APIBuilder::new()
            .with_media_engine(media_engine)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: ice_servers
                .iter()
                .map(|server| RTCIceServer {
                    urls: server.urls.clone(),
                    username: server.username.clone().unwrap_or_default(),
                    credential: server.credential.clone().unwrap_or_default(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        };

        let pc = Arc::new(api.new_peer_connection(rtc_config).await?);

        pc.add_track(media.audio_track() as Arc<dyn TrackLocal + Send + Sync>)
            .await?;
        pc.add_track(media.video_track() as Arc<dyn TrackLocal + Send + Sync>)
            .await?;

        let state = Arc::new(Mutex::new(PeerState::New));

        {
            let state = Arc::clone(&state);
            let event_tx = event_tx.clone();
            pc.on_peer_connection_state_change(Box::new(move |s: RTCPeerConnectionState| {
                let state = Arc::clone(&state);
                let event_tx = event_tx.clone();
                Box::pin(async move {
                    debug!("Connection state for {}: {:?}", remote_id, s);

                    let mapped = match s {
                        RTCPeerConnectionState::Connected => Some(PeerState::Connected),
                        RTCPeerConnectionState::Failed
                        | RTCPeerConnectionState::Disconnected
                        | RTCPeerConnectionState::Closed => Some(PeerState::Closed),
                        _ => None,
                    };

                    if let Some(next) = mapped {
                        *state.lock().await = next;
                        let _ = event_tx.send(PeerEvent::StateChanged(remote_id, next));
                    }
                })
            }));
        }

        {
            let signal_tx = signal_tx.clone();
            pc.on_ice_candidate(Box::new(move |candidate| {
                let signal_tx = signal_tx.clone();
                Box::pin(async move {
                    let Some(candidate) = candidate else { return };

                    match candidate.to_json() {
                        Ok(init) => match serde_json::to_value(&init) {
                            Ok(value) => {
                                let _ = signal_tx.send(SignalPayload::IceCandidate(value));
                            }
                            Err(e) => warn!("Failed to encode ICE candidate: {}", e),
                        },
                        Err(e) => warn!("Failed to serialize ICE candidate: {:?}", e),
                    }
                })
            }));
        }

        {
            let event_tx = event_tx.clone();
            pc.on_track(Box::new(move |track, _receiver, _transceiver| {
                let event_tx = event_tx.clone();
                Box::pin(async move {
                    info!("Remote track from {}", remote_id);
                    let _ = event_tx.send(PeerEvent::TrackReceived(remote_id, track));
                })
            }));
        }

        Ok(Self {
            remote_id,
            role,
            pc,
            pending: Arc::new(Mutex::new(PendingCandidates::new())),
            state,
            signal_tx,
        })
    }

    /// Offerer side: create the local offer and ship it.
    pub async fn start_offer(&self) -> Result<(), ClientError> {
        self.set_state(PeerState::Negotiating).await;

        let offer = self.pc.create_offer(None).await?;
        self.pc.set_local_description(offer.clone()).await?;

        self.send_signal(SignalPayload::Offer(serde_json::to_value(&offer)?))
    }

    /// Answerer side: apply the remote offer, reply with an answer.
    pub async fn handle_offer(&self, offer: Value) -> Result<(), ClientError> {
        self.set_state(PeerState::Negotiating).await;

        let desc: RTCSessionDescription = serde_json::from_value(offer)?;
        self.pc.set_remote_description(desc).await?;
        self.drain_pending().await?;

        let answer = self.pc.create_answer(None).await?;
        self.pc.set_local_description(answer.clone()).await?;

        self.send_signal(SignalPayload::Answer(serde_json::to_value(&answer)?))
    }

    pub async fn handle_answer(&self, answer: Value) -> Result<(), ClientError> {
        let desc: RTCSessionDescription = serde_json::from_value(answer)?;
        self.pc.set_remote_description(desc).await?;
        self.drain_pending().await
    }

    pub async fn handle_candidate(&self, candidate: Value) -> Result<(), ClientError> {
        let init: RTCIceCandidateInit = serde_json::from_value(candidate)?;

        let ready = { self.pending.lock().await.enqueue(init) };
        if let Some(init) = ready {
            self.pc.add_ice_candidate(init).await?;
        }
        Ok(())
    }

    pub async fn close(&self) {
        self.set_state(PeerState::Closed).await;

        if let Err(e) = self.pc.close().await {
            warn!("Failed to close peer connection to {}: {}", self.remote_id, e);
        }
    }

    pub fn remote_id(&self) -> ConnectionId {
        self.remote_id
    }

    pub fn role(&self) -> NegotiationRole {
        self.role
    }

    pub async fn state(&self) -> PeerState {
        *self.state.lock().await
    }

    async fn drain_pending(&self) -> Result<(), ClientError> {
        let queued = { self.pending.lock().await.mark_remote_ready() };
        for init in queued {
            self.pc.add_ice_candidate(init).await?;
        }
        Ok(())
    }

    fn send_signal(&self, payload: SignalPayload) -> Result<(), ClientError> {
        self.signal_tx
            .send(payload)
            .map_err(|_| ClientError::ChannelClosed)
    }

    async fn set_state(&self, next: PeerState) {
        *self.state.lock().await = next;
    }
}
