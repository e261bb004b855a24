use crate::error::ClientError;
use crate::media::{LocalMedia, MediaSource};
use crate::negotiator::{NegotiationRole, PeerEvent, PeerNegotiator, PeerState};
use crate::session::Roster;
use crate::signaling::SignalingChannel;
use confab_core::{ConnectionId, IceServerConfig, RoomId, RoomUser, ServerEvent, SignalPayload};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Notify, mpsc};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use webrtc::track::track_remote::TrackRemote;

pub struct CallConfig {
    pub signaling_url: String,
    pub room_id: RoomId,
    pub display_name: String,
    /// Used until the gateway pushes its own `ice-config`.
    pub ice_servers: Vec<IceServerConfig>,
}

/// What the session surfaces to the host application.
#[derive(Debug)]
pub enum SessionEvent {
    PeerConnected { user: RoomUser },
    PeerLeft { user: RoomUser },
    TrackReceived { user_id: ConnectionId, track: Arc<TrackRemote> },
    /// A single pairing failed; the rest of the call continues.
    PeerFailed { user_id: ConnectionId, reason: String },
    /// The gateway rejected one of our frames.
    GatewayError { message: String },
    /// The signaling channel is gone; the whole session is over and the
    /// user has to rejoin.
    Ended,
}

/// One call: local media, the signaling channel, and one negotiator per
/// remote participant. Controls are local-only; hanging up tears down
/// everything this session created.
pub struct CallSession {
    media: Arc<LocalMedia>,
    shutdown: Arc<Notify>,
    driver: JoinHandle<()>,
}

impl CallSession {
    /// Acquire media, open the channel, join the room, start the event
    /// loop. Media acquisition failure is fatal and happens before any
    /// transport activity.
    pub async fn start(
        config: CallConfig,
        source: &dyn MediaSource,
    ) -> Result<(Self, mpsc::UnboundedReceiver<SessionEvent>), ClientError> {
        let media = Arc::new(source.acquire().await?);

        let (channel, server_rx) = SignalingChannel::connect(&config.signaling_url).await?;
        channel.join_room(&config.room_id, &config.display_name)?;

        let (session_tx, session_rx) = mpsc::unbounded_channel();
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        let (peer_tx, peer_rx) = mpsc::unbounded_channel();
        let shutdown = Arc::new(Notify::new());

        let driver = SessionDriver {
            channel,
            room_id: config.room_id,
            ice_servers: config.ice_servers,
            media: Arc::clone(&media),
            roster: Roster::new(),
            negotiators: HashMap::new(),
            signal_tx,
            peer_tx,
            session_tx,
        };

        let driver = tokio::spawn(driver.run(server_rx, signal_rx, peer_rx, Arc::clone(&shutdown)));

        Ok((
            Self {
                media,
                shutdown,
                driver,
            },
            session_rx,
        ))
    }

    /// Local track gating only; peers just stop receiving audio.
    pub fn set_muted(&self, muted: bool) {
        self.media.set_audio_enabled(!muted);
    }

    /// Local track gating only; peers just stop receiving video.
    pub fn set_camera_enabled(&self, enabled: bool) {
        self.media.set_video_enabled(enabled);
    }

    /// Handle for the capture pump feeding the local tracks.
    pub fn media(&self) -> Arc<LocalMedia> {
        Arc::clone(&self.media)
    }

    /// Release local media, close the channel, destroy every pairing.
    pub async fn hang_up(self) {
        self.shutdown.notify_one();
        let _ = self.driver.await;
    }
}

struct SessionDriver {
    channel: SignalingChannel,
    room_id: RoomId,
    ice_servers: Vec<IceServerConfig>,
    media: Arc<LocalMedia>,
    roster: Roster,
    negotiators: HashMap<ConnectionId, PeerNegotiator>,
    signal_tx: mpsc::UnboundedSender<SignalPayload>,
    peer_tx: mpsc::UnboundedSender<PeerEvent>,
    session_tx: mpsc::UnboundedSender<SessionEvent>,
}

impl SessionDriver {
    async fn run(
        mut self,
        mut server_rx: mpsc::UnboundedReceiver<ServerEvent>,
        mut signal_rx: mpsc::UnboundedReceiver<SignalPayload>,
        mut peer_rx: mpsc::UnboundedReceiver<PeerEvent>,
        shutdown: Arc<Notify>,
    ) {
        info!("Call session started in room '{}'", self.room_id);

        loop {
            tokio::select! {
                event = server_rx.recv() => match event {
                    Some(event) => self.handle_server_event(event).await,
                    None => {
                        info!("Signaling channel closed, ending session");
                        self.emit(SessionEvent::Ended);
                        break;
                    }
                },

                // Outbound blobs produced by negotiator callbacks. The
                // driver keeps a sender clone, so this arm never yields None.
                Some(payload) = signal_rx.recv() => {
                    if let Err(e) = self.channel.send_signal(&self.room_id, payload) {
                        warn!("Failed to send signal: {}", e);
                    }
                }

                Some(event) = peer_rx.recv() => self.handle_peer_event(event),

                _ = shutdown.notified() => {
                    info!("Hang-up requested");
                    break;
                }
            }
        }

        self.teardown().await;
    }

    async fn handle_server_event(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::IceConfig { ice_servers } => {
                if !ice_servers.is_empty() {
                    self.ice_servers = ice_servers;
                }
            }

            // We are the newcomer: answer everyone already in the room.
            ServerEvent::RoomUsers(users) => {
                for user in users {
                    if self.roster.insert(user.clone()) {
                        self.spawn_negotiator(user, NegotiationRole::toward_existing_member())
                            .await;
                    }
                }
            }

            // We are the existing member: offer to the newcomer.
            ServerEvent::UserJoined(user) => {
                if !self.roster.insert(user.clone()) {
                    // Already known from the roster; do not negotiate twice.
                    return;
                }

                let user_id = user.user_id;
                self.spawn_negotiator(user, NegotiationRole::toward_newcomer())
                    .await;

                let result = match self.negotiators.get(&user_id) {
                    Some(negotiator) => negotiator.start_offer().await,
                    None => return,
                };
                if let Err(e) = result {
                    self.fail_pairing(user_id, e).await;
                }
            }

            ServerEvent::UserLeft(user) => {
                self.roster.remove(&user.user_id);
                if let Some(negotiator) = self.negotiators.remove(&user.user_id) {
                    negotiator.close().await;
                }
                self.emit(SessionEvent::PeerLeft { user });
            }

            ServerEvent::Offer { offer, from } => {
                let Some(negotiator) = self.negotiators.get(&from) else {
                    warn!("Offer from unknown peer {}", from);
                    return;
                };
                if let Err(e) = negotiator.handle_offer(offer).await {
                    self.fail_pairing(from, e).await;
                }
            }

            ServerEvent::Answer { answer, from } => {
                let Some(negotiator) = self.negotiators.get(&from) else {
                    warn!("Answer from unknown peer {}", from);
                    return;
                };
                if let Err(e) = negotiator.handle_answer(answer).await {
                    self.fail_pairing(from, e).await;
                }
            }

            ServerEvent::IceCandidate { candidate, from } => {
                let Some(negotiator) = self.negotiators.get(&from) else {
                    return;
                };
                if let Err(e) = negotiator.handle_candidate(candidate).await {
                    warn!("Failed to apply candidate from {}: {}", from, e);
                }
            }

            ServerEvent::Error { message } => {
                warn!("Gateway error: {}", message);
                self.emit(SessionEvent::GatewayError { message });
            }
        }
    }

    fn handle_peer_event(&mut self, event: PeerEvent) {
        match event {
            PeerEvent::StateChanged(user_id, PeerState::Connected) => {
                if let Some(user) = self.roster.get(&user_id) {
                    self.emit(SessionEvent::PeerConnected { user: user.clone() });
                }
            }

            PeerEvent::StateChanged(user_id, PeerState::Closed) => {
                // A departed peer was already handled via user-left; a
                // pairing dying while its peer is still present is a failure.
                if self.roster.get(&user_id).is_some() && self.negotiators.remove(&user_id).is_some()
                {
                    self.emit(SessionEvent::PeerFailed {
                        user_id,
                        reason: "peer connection closed".to_string(),
                    });
                }
            }

            PeerEvent::StateChanged(_, _) => {}

            PeerEvent::TrackReceived(user_id, track) => {
                self.emit(SessionEvent::TrackReceived { user_id, track });
            }
        }
    }

    async fn spawn_negotiator(&mut self, user: RoomUser, role: NegotiationRole) {
        let user_id = user.user_id;

        match PeerNegotiator::new(
            user_id,
            role,
            &self.ice_servers,
            &self.media,
            self.signal_tx.clone(),
            self.peer_tx.clone(),
        )
        .await
        {
            Ok(negotiator) => {
                info!("Negotiating with {} ('{}') as {:?}", user_id, user.user_name, role);
                self.negotiators.insert(user_id, negotiator);
            }
            Err(e) => self.fail_pairing(user_id, e).await,
        }
    }

    async fn fail_pairing(&mut self, user_id: ConnectionId, error: ClientError) {
        warn!("Pairing with {} failed: {}", user_id, error);

        if let Some(negotiator) = self.negotiators.remove(&user_id) {
            negotiator.close().await;
        }

        self.emit(SessionEvent::PeerFailed {
            user_id,
            reason: error.to_string(),
        });
    }

    async fn teardown(&mut self) {
        for (_, negotiator) in self.negotiators.drain() {
            negotiator.close().await;
        }
        self.channel.close();
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.session_tx.send(event);
    }
}
