//! Interfaces of the external collaborators the session core drives.
//!
//! The protocol engine, the service advertiser and the two renderers are
//! not implemented here. A [`Platform`] constructs them; the orchestrator
//! only sequences their lifecycles.

use std::sync::Arc;

use crate::config::AudioDevice;
use crate::error::BackendError;
use crate::hwaddr::HwAddr;
use crate::media::{
    AudioFrame, DiagnosticsLogger, LogSink, MediaSink, Severity, TimingReference, VideoFrame,
};

/// Concurrent connection hint passed to the engine at construction.
pub const ENGINE_MAX_CONNECTIONS: usize = 10;

/// Services published by the advertiser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    /// Primary streaming service, on the engine's bound port.
    Raop,
    /// Companion service, always on the primary port plus one.
    AirPlay,
}

/// Mirroring/streaming protocol engine.
pub trait ProtocolEngine: Send {
    fn set_log_sink(&mut self, sink: Arc<dyn LogSink>);
    fn set_log_level(&mut self, level: Severity);
    /// Begin serving. Returns the dynamically chosen port.
    fn start(&mut self) -> u16;
    fn set_port(&mut self, port: u16);
    fn port(&self) -> u16;
    /// Hand the engine the advertiser so it can withdraw services itself.
    fn set_advertiser(&mut self, advertiser: Arc<dyn ServiceAdvertiser>);
    fn destroy(&mut self);
}

/// Network service advertisement.
pub trait ServiceAdvertiser: Send + Sync {
    fn register(&self, kind: ServiceKind, port: u16);
    fn unregister(&self, kind: ServiceKind);
}

/// Hardware-backed video output. Also the timing authority for audio.
pub trait VideoRenderer: Send + Sync {
    fn start(&self);
    fn render(&self, timing: &dyn TimingReference, frame: VideoFrame<'_>);
    fn destroy(&self);
}

/// Hardware-backed audio output.
pub trait AudioRenderer: Send + Sync {
    fn start(&self);
    fn render(&self, timing: &dyn TimingReference, frame: AudioFrame<'_>);
    fn set_volume(&self, gain: f32);
    fn destroy(&self);
}

/// Factory for every collaborator a session needs.
///
/// Each constructor is a blocking call; an `Err` means no usable handle
/// was produced.
pub trait Platform {
    fn init_engine(
        &self,
        max_connections: usize,
        sink: Arc<dyn MediaSink>,
    ) -> Result<Box<dyn ProtocolEngine>, BackendError>;

    fn init_video_renderer(
        &self,
        logger: DiagnosticsLogger,
        show_background: bool,
        low_latency: bool,
    ) -> Result<Arc<dyn VideoRenderer>, BackendError>;

    fn init_audio_renderer(
        &self,
        logger: DiagnosticsLogger,
        sync_reference: Arc<dyn VideoRenderer>,
        device: AudioDevice,
        low_latency: bool,
    ) -> Result<Arc<dyn AudioRenderer>, BackendError>;

    fn init_advertiser(
        &self,
        name: &str,
        hw_addr: &HwAddr,
    ) -> Result<Arc<dyn ServiceAdvertiser>, BackendError>;
}
