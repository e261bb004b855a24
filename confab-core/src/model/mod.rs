mod connection;
mod event;
mod room;

pub use connection::ConnectionId;
pub use event::{ClientEvent, IceServerConfig, ServerEvent, SignalPayload};
pub use room::{RoomId, RoomUser};
