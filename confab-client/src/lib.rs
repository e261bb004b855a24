pub mod error;
pub mod media;
pub mod negotiator;
pub mod session;
pub mod signaling;

pub use error::ClientError;
pub use media::{LocalMedia, MediaError, MediaSource};
pub use negotiator::{NegotiationRole, PeerEvent, PeerNegotiator, PeerState};
pub use session::{CallConfig, CallSession, Roster, SessionEvent};
pub use signaling::SignalingChannel;
