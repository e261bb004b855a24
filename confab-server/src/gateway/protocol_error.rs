use thiserror::Error;

/// Protocol misuse reported back to the offending channel as an `error`
/// event. Never tears the channel down.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum ProtocolError {
    #[error("already in a room; a channel joins at most once")]
    AlreadyJoined,

    #[error("not in a room; send join-room first")]
    NotJoined,
}
