mod signaling_service;
mod ws_handler;

pub use signaling_service::*;
pub use ws_handler::*;

/// Fixed path the reference clients dial.
pub const SIGNALING_PATH: &str = "/api/socketio";
