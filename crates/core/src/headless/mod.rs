//! Hardware-free implementation of every collaborator.
//!
//! Makes the receiver runnable on any host: the engine listens on a real
//! TCP port, the advertiser tracks its services in memory, and renderers
//! count what they are given.
//!
//! | Collaborator | Type |
//! |--------------|------|
//! | Protocol engine | [`HeadlessEngine`] |
//! | Service advertiser | [`HeadlessAdvertiser`] |
//! | Video renderer | [`HeadlessVideoRenderer`] |
//! | Audio renderer | [`HeadlessAudioRenderer`] |

pub mod discovery;
pub mod engine;
pub mod render;

use std::sync::Arc;

pub use discovery::HeadlessAdvertiser;
pub use engine::HeadlessEngine;
pub use render::{HeadlessAudioRenderer, HeadlessVideoRenderer};

use crate::config::AudioDevice;
use crate::error::BackendError;
use crate::hwaddr::HwAddr;
use crate::media::{DiagnosticsLogger, MediaSink};
use crate::platform::{
    AudioRenderer, Platform, ProtocolEngine, ServiceAdvertiser, VideoRenderer,
};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:0";

/// [`Platform`] backed by the headless collaborators.
#[derive(Debug, Clone)]
pub struct HeadlessPlatform {
    bind_addr: String,
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new(DEFAULT_BIND_ADDR)
    }
}

impl HeadlessPlatform {
    /// `bind_addr` is the engine's listen address; port `0` picks one.
    pub fn new(bind_addr: &str) -> Self {
        Self {
            bind_addr: bind_addr.to_string(),
        }
    }
}

impl Platform for HeadlessPlatform {
    fn init_engine(
        &self,
        max_connections: usize,
        _sink: Arc<dyn MediaSink>,
    ) -> Result<Box<dyn ProtocolEngine>, BackendError> {
        let engine = HeadlessEngine::bind(&self.bind_addr, max_connections)
            .map_err(|e| BackendError::new(format!("bind {}: {e}", self.bind_addr)))?;
        Ok(Box::new(engine))
    }

    fn init_video_renderer(
        &self,
        logger: DiagnosticsLogger,
        show_background: bool,
        low_latency: bool,
    ) -> Result<Arc<dyn VideoRenderer>, BackendError> {
        Ok(Arc::new(HeadlessVideoRenderer::new(
            logger,
            show_background,
            low_latency,
        )))
    }

    fn init_audio_renderer(
        &self,
        logger: DiagnosticsLogger,
        sync_reference: Arc<dyn VideoRenderer>,
        device: AudioDevice,
        low_latency: bool,
    ) -> Result<Arc<dyn AudioRenderer>, BackendError> {
        let renderer = HeadlessAudioRenderer::new(logger, sync_reference, device, low_latency)?;
        Ok(Arc::new(renderer))
    }

    fn init_advertiser(
        &self,
        name: &str,
        hw_addr: &HwAddr,
    ) -> Result<Arc<dyn ServiceAdvertiser>, BackendError> {
        Ok(Arc::new(HeadlessAdvertiser::new(name, hw_addr)?))
    }
}
