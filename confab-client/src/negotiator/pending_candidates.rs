use webrtc::ice_transport::ice_candidate::RTCIceCandidateInit;

/// Remote candidates can outrun the remote description on an unordered
/// pair of messages from two senders. They are buffered here and drained
/// exactly once, after the description is applied.
#[derive(Debug, Default)]
pub struct PendingCandidates {
    queued: Vec<RTCIceCandidateInit>,
    remote_ready: bool,
}

impl PendingCandidates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands the candidate back when it can be applied immediately;
    /// otherwise buffers it.
    pub fn enqueue(&mut self, candidate: RTCIceCandidateInit) -> Option<RTCIceCandidateInit> {
        if self.remote_ready {
            Some(candidate)
        } else {
            self.queued.push(candidate);
            None
        }
    }

    /// Mark the remote description applied and take everything buffered.
    pub fn mark_remote_ready(&mut self) -> Vec<RTCIceCandidateInit> {
        self.remote_ready = true;
        std::mem::take(&mut self.queued)
    }

    pub fn is_remote_ready(&self) -> bool {
        self.remote_ready
    }
}
