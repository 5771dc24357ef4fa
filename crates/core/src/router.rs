//! Callback routing from the protocol engine to the renderers.
//!
//! The engine is handed a [`CallbackRouter`] before any renderer exists,
//! so renderers are attached once they are constructed and detached again
//! during teardown. Routing itself carries no state: every call is a
//! straight forward to whichever renderer is attached.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::Level;

use crate::media::{
    AudioFrame, ConnectionId, LogSink, MediaSink, Severity, TimingReference, VideoFrame,
};
use crate::platform::{AudioRenderer, VideoRenderer};

#[derive(Default)]
pub struct CallbackRouter {
    video: RwLock<Option<Arc<dyn VideoRenderer>>>,
    audio: RwLock<Option<Arc<dyn AudioRenderer>>>,
}

impl CallbackRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach_video(&self, renderer: Arc<dyn VideoRenderer>) {
        *self.video.write() = Some(renderer);
    }

    pub fn attach_audio(&self, renderer: Arc<dyn AudioRenderer>) {
        *self.audio.write() = Some(renderer);
    }

    /// Drop the router's references so renderer destruction is final.
    pub fn detach_renderers(&self) {
        self.audio.write().take();
        self.video.write().take();
    }

    pub fn has_audio(&self) -> bool {
        self.audio.read().is_some()
    }
}

impl LogSink for CallbackRouter {
    fn log_event(&self, severity: Severity, message: &str) {
        // Unknown severities are dropped, never promoted.
        match severity.to_level() {
            Some(Level::DEBUG) => tracing::debug!("{message}"),
            Some(Level::INFO) => tracing::info!("{message}"),
            Some(Level::WARN) => tracing::warn!("{message}"),
            Some(Level::ERROR) => tracing::error!("{message}"),
            _ => {}
        }
    }
}

impl MediaSink for CallbackRouter {
    fn deliver_audio(&self, timing: &dyn TimingReference, frame: AudioFrame<'_>) {
        if let Some(audio) = self.audio.read().as_ref() {
            audio.render(timing, frame);
        }
    }

    fn deliver_video(&self, timing: &dyn TimingReference, frame: VideoFrame<'_>) {
        match self.video.read().as_ref() {
            Some(video) => video.render(timing, frame),
            None => tracing::trace!(len = frame.data.len(), "video frame before renderer attached"),
        }
    }

    fn set_volume(&self, connection: ConnectionId, gain: f32) {
        if let Some(audio) = self.audio.read().as_ref() {
            tracing::trace!(connection = connection.0, gain, "set volume");
            audio.set_volume(gain);
        }
    }
}
