use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use webrtc::media::Sample;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("camera/microphone permission denied")]
    PermissionDenied,

    #[error("capture device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("capture failed: {0}")]
    Capture(String),
}

/// Local capture seam. Device integration lives behind this trait; the
/// session only needs the resulting tracks and their enablement switches.
#[async_trait]
pub trait MediaSource: Send + Sync {
    async fn acquire(&self) -> Result<LocalMedia, MediaError>;
}

/// Locally captured audio/video tracks plus their enablement switches.
///
/// Muting is purely local track gating: peers observe it as an absence of
/// media on the track, no signaling message is involved.
pub struct LocalMedia {
    audio: Arc<TrackLocalStaticSample>,
    video: Arc<TrackLocalStaticSample>,
    audio_enabled: AtomicBool,
    video_enabled: AtomicBool,
}

impl LocalMedia {
    pub fn new(audio: Arc<TrackLocalStaticSample>, video: Arc<TrackLocalStaticSample>) -> Self {
        Self {
            audio,
            video,
            audio_enabled: AtomicBool::new(true),
            video_enabled: AtomicBool::new(true),
        }
    }

    pub fn audio_track(&self) -> Arc<TrackLocalStaticSample> {
        Arc::clone(&self.audio)
    }

    pub fn video_track(&self) -> Arc<TrackLocalStaticSample> {
        Arc::clone(&self.video)
    }

    pub fn set_audio_enabled(&self, enabled: bool) {
        self.audio_enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn set_video_enabled(&self, enabled: bool) {
        self.video_enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn audio_enabled(&self) -> bool {
        self.audio_enabled.load(Ordering::SeqCst)
    }

    pub fn video_enabled(&self) -> bool {
        self.video_enabled.load(Ordering::SeqCst)
    }

    /// Forward a captured audio sample; dropped while audio is disabled.
    pub async fn write_audio(&self, sample: &Sample) -> Result<(), webrtc::Error> {
        if !self.audio_enabled() {
            return Ok(());
        }
        self.audio.write_sample(sample).await
    }

    /// Forward a captured video sample; dropped while the camera is off.
    pub async fn write_video(&self, sample: &Sample) -> Result<(), webrtc::Error> {
        if !self.video_enabled() {
            return Ok(());
        }
        self.video.write_sample(sample).await
    }
}
