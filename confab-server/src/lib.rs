pub mod gateway;
pub mod room;
pub mod signaling;

pub use gateway::{Gateway, GatewayCommand, ProtocolError, SignalingOutput};
pub use room::RoomRegistry;
pub use signaling::{SIGNALING_PATH, SignalingService, ws_handler};
