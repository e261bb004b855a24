mod pairing;
mod peer;
mod pending_candidates;

pub use pairing::*;
pub use peer::*;
pub use pending_candidates::*;
