/// Which side of a pairing creates the offer.
///
/// The member already in the room offers to the newcomer; the newcomer
/// answers everyone listed in its initial roster. The asymmetry is the
/// glare tie-break: no pair can end up with two offers in flight.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum NegotiationRole {
    Offerer,
    Answerer,
}

impl NegotiationRole {
    /// Role toward a peer learned from a `user-joined` notification.
    pub fn toward_newcomer() -> Self {
        NegotiationRole::Offerer
    }

    /// Role toward a peer listed in our initial `room-users` roster.
    pub fn toward_existing_member() -> Self {
        NegotiationRole::Answerer
    }
}
