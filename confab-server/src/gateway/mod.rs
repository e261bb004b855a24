mod gateway;
mod gateway_command;
mod protocol_error;
mod signaling_output;

pub use gateway::*;
pub use gateway_command::*;
pub use protocol_error::*;
pub use signaling_output::*;
