use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};

use crate::config::AudioDevice;
use crate::error::BackendError;
use crate::media::{AudioFrame, DiagnosticsLogger, Severity, TimingReference, VideoFrame};
use crate::platform::{AudioRenderer, VideoRenderer};

/// Running totals kept by a headless renderer.
#[derive(Debug, Default)]
pub struct RenderStats {
    frames: AtomicU64,
    bytes: AtomicU64,
}

impl RenderStats {
    fn record(&self, len: usize) {
        self.frames.fetch_add(1, Ordering::Relaxed);
        self.bytes.fetch_add(len as u64, Ordering::Relaxed);
    }

    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    pub fn bytes(&self) -> u64 {
        self.bytes.load(Ordering::Relaxed)
    }
}

pub struct HeadlessVideoRenderer {
    logger: DiagnosticsLogger,
    show_background: bool,
    low_latency: bool,
    started: AtomicBool,
    destroyed: AtomicBool,
    stats: RenderStats,
}

impl HeadlessVideoRenderer {
    pub fn new(logger: DiagnosticsLogger, show_background: bool, low_latency: bool) -> Self {
        logger.log(
            Severity::DEBUG,
            &format!("video renderer: background={show_background} low_latency={low_latency}"),
        );
        Self {
            logger,
            show_background,
            low_latency,
            started: AtomicBool::new(false),
            destroyed: AtomicBool::new(false),
            stats: RenderStats::default(),
        }
    }

    pub fn show_background(&self) -> bool {
        self.show_background
    }

    pub fn low_latency(&self) -> bool {
        self.low_latency
    }

    pub fn stats(&self) -> &RenderStats {
        &self.stats
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }
}

impl VideoRenderer for HeadlessVideoRenderer {
    fn start(&self) {
        self.started.store(true, Ordering::SeqCst);
        self.logger.log(Severity::DEBUG, "video renderer started");
    }

    fn render(&self, _timing: &dyn TimingReference, frame: VideoFrame<'_>) {
        if !self.is_started() || self.destroyed.load(Ordering::SeqCst) {
            return;
        }
        self.stats.record(frame.data.len());
    }

    fn destroy(&self) {
        if self.destroyed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.logger.log(
            Severity::DEBUG,
            &format!(
                "video renderer destroyed after {} frames ({} bytes)",
                self.stats.frames(),
                self.stats.bytes()
            ),
        );
    }
}

pub struct HeadlessAudioRenderer {
    logger: DiagnosticsLogger,
    _sync_reference: Arc<dyn VideoRenderer>,
    device: AudioDevice,
    low_latency: bool,
    started: AtomicBool,
    destroyed: AtomicBool,
    /// Last gain, stored as `f32` bits.
    gain: AtomicU32,
    stats: RenderStats,
}

impl HeadlessAudioRenderer {
    /// Fails for [`AudioDevice::None`]: a disabled device has no output.
    pub fn new(
        logger: DiagnosticsLogger,
        sync_reference: Arc<dyn VideoRenderer>,
        device: AudioDevice,
        low_latency: bool,
    ) -> Result<Self, BackendError> {
        if !device.is_enabled() {
            return Err(BackendError::new("no audio output device"));
        }
        logger.log(
            Severity::DEBUG,
            &format!("audio renderer: device={device:?} low_latency={low_latency}"),
        );
        Ok(Self {
            logger,
            _sync_reference: sync_reference,
            device,
            low_latency,
            started: AtomicBool::new(false),
            destroyed: AtomicBool::new(false),
            gain: AtomicU32::new(0f32.to_bits()),
            stats: RenderStats::default(),
        })
    }

    pub fn device(&self) -> AudioDevice {
        self.device
    }

    pub fn low_latency(&self) -> bool {
        self.low_latency
    }

    pub fn gain(&self) -> f32 {
        f32::from_bits(self.gain.load(Ordering::Relaxed))
    }

    pub fn stats(&self) -> &RenderStats {
        &self.stats
    }
}

impl AudioRenderer for HeadlessAudioRenderer {
    fn start(&self) {
        self.started.store(true, Ordering::SeqCst);
        self.logger.log(Severity::DEBUG, "audio renderer started");
    }

    fn render(&self, _timing: &dyn TimingReference, frame: AudioFrame<'_>) {
        if !self.started.load(Ordering::SeqCst) || self.destroyed.load(Ordering::SeqCst) {
            return;
        }
        self.stats.record(frame.data.len());
    }

    fn set_volume(&self, gain: f32) {
        self.gain.store(gain.to_bits(), Ordering::Relaxed);
        self.logger.log(Severity::DEBUG, &format!("volume {gain}"));
    }

    fn destroy(&self) {
        if self.destroyed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.logger.log(
            Severity::DEBUG,
            &format!("audio renderer destroyed after {} frames", self.stats.frames()),
        );
    }
}
