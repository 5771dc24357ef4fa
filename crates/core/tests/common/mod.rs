//! Instrumented collaborators that record every call in one shared log.

#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;

use airmirror::config::AudioDevice;
use airmirror::media::{
    AudioFrame, DiagnosticsLogger, LogSink, MediaSink, Severity, TimingReference, VideoFrame,
};
use airmirror::platform::{
    AudioRenderer, Platform, ProtocolEngine, ServiceAdvertiser, ServiceKind, VideoRenderer,
};
use airmirror::{BackendError, HwAddr};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    EngineInit { max_connections: usize },
    EngineLogSink,
    EngineLogLevel(Severity),
    EngineStart,
    EngineSetPort(u16),
    EngineSetAdvertiser,
    EngineDestroy,
    VideoInit { show_background: bool, low_latency: bool },
    VideoStart,
    VideoRender { len: usize, pts: u64, frame_type: i32 },
    VideoDestroy,
    AudioInit { device: AudioDevice, low_latency: bool },
    AudioStart,
    AudioRender { len: usize, pts: u64 },
    AudioVolume(f32),
    AudioDestroy,
    AdvertiserInit { name: String, hw_addr: HwAddr },
    Register(ServiceKind, u16),
    Unregister(ServiceKind),
}

impl Event {
    /// Calls that release a subsystem.
    pub fn is_teardown(&self) -> bool {
        matches!(
            self,
            Event::EngineDestroy | Event::Unregister(_) | Event::AudioDestroy | Event::VideoDestroy
        )
    }
}

pub type EventLog = Arc<Mutex<Vec<Event>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Engine,
    Video,
    Audio,
    Discovery,
}

pub struct MockPlatform {
    pub events: EventLog,
    fail_at: Option<FailAt>,
    port: u16,
    sink: Mutex<Option<Arc<dyn MediaSink>>>,
    render_logger: Mutex<Option<DiagnosticsLogger>>,
}

impl MockPlatform {
    pub fn new(port: u16) -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            fail_at: None,
            port,
            sink: Mutex::new(None),
            render_logger: Mutex::new(None),
        }
    }

    pub fn failing_at(port: u16, step: FailAt) -> Self {
        Self {
            fail_at: Some(step),
            ..Self::new(port)
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    pub fn teardown_events(&self) -> Vec<Event> {
        self.events().into_iter().filter(Event::is_teardown).collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// The media sink the engine was constructed with.
    pub fn sink(&self) -> Arc<dyn MediaSink> {
        self.sink.lock().clone().expect("engine not constructed")
    }

    /// The diagnostics logger the video renderer was given.
    pub fn render_logger(&self) -> DiagnosticsLogger {
        self.render_logger.lock().clone().expect("video renderer not constructed")
    }

    fn record(&self, event: Event) {
        self.events.lock().push(event);
    }

    fn fails(&self, step: FailAt) -> bool {
        self.fail_at == Some(step)
    }
}

impl Platform for MockPlatform {
    fn init_engine(
        &self,
        max_connections: usize,
        sink: Arc<dyn MediaSink>,
    ) -> Result<Box<dyn ProtocolEngine>, BackendError> {
        if self.fails(FailAt::Engine) {
            return Err(BackendError::new("raop = NULL"));
        }
        self.record(Event::EngineInit { max_connections });
        *self.sink.lock() = Some(sink);
        Ok(Box::new(MockEngine {
            events: self.events.clone(),
            start_port: self.port,
            port: 0,
        }))
    }

    fn init_video_renderer(
        &self,
        logger: DiagnosticsLogger,
        show_background: bool,
        low_latency: bool,
    ) -> Result<Arc<dyn VideoRenderer>, BackendError> {
        if self.fails(FailAt::Video) {
            return Err(BackendError::new("no display"));
        }
        self.record(Event::VideoInit {
            show_background,
            low_latency,
        });
        *self.render_logger.lock() = Some(logger);
        Ok(Arc::new(MockVideo {
            events: self.events.clone(),
        }))
    }

    fn init_audio_renderer(
        &self,
        _logger: DiagnosticsLogger,
        _sync_reference: Arc<dyn VideoRenderer>,
        device: AudioDevice,
        low_latency: bool,
    ) -> Result<Arc<dyn AudioRenderer>, BackendError> {
        if self.fails(FailAt::Audio) {
            return Err(BackendError::new("no audio sink"));
        }
        self.record(Event::AudioInit { device, low_latency });
        Ok(Arc::new(MockAudio {
            events: self.events.clone(),
        }))
    }

    fn init_advertiser(
        &self,
        name: &str,
        hw_addr: &HwAddr,
    ) -> Result<Arc<dyn ServiceAdvertiser>, BackendError> {
        if self.fails(FailAt::Discovery) {
            return Err(BackendError::with_code("dnssd init", -65537));
        }
        self.record(Event::AdvertiserInit {
            name: name.to_string(),
            hw_addr: *hw_addr,
        });
        Ok(Arc::new(MockAdvertiser {
            events: self.events.clone(),
        }))
    }
}

struct MockEngine {
    events: EventLog,
    start_port: u16,
    port: u16,
}

impl ProtocolEngine for MockEngine {
    fn set_log_sink(&mut self, _sink: Arc<dyn LogSink>) {
        self.events.lock().push(Event::EngineLogSink);
    }

    fn set_log_level(&mut self, level: Severity) {
        self.events.lock().push(Event::EngineLogLevel(level));
    }

    fn start(&mut self) -> u16 {
        self.events.lock().push(Event::EngineStart);
        self.start_port
    }

    fn set_port(&mut self, port: u16) {
        self.port = port;
        self.events.lock().push(Event::EngineSetPort(port));
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn set_advertiser(&mut self, _advertiser: Arc<dyn ServiceAdvertiser>) {
        self.events.lock().push(Event::EngineSetAdvertiser);
    }

    fn destroy(&mut self) {
        self.events.lock().push(Event::EngineDestroy);
    }
}

struct MockVideo {
    events: EventLog,
}

impl VideoRenderer for MockVideo {
    fn start(&self) {
        self.events.lock().push(Event::VideoStart);
    }

    fn render(&self, _timing: &dyn TimingReference, frame: VideoFrame<'_>) {
        self.events.lock().push(Event::VideoRender {
            len: frame.data.len(),
            pts: frame.pts,
            frame_type: frame.frame_type,
        });
    }

    fn destroy(&self) {
        self.events.lock().push(Event::VideoDestroy);
    }
}

struct MockAudio {
    events: EventLog,
}

impl AudioRenderer for MockAudio {
    fn start(&self) {
        self.events.lock().push(Event::AudioStart);
    }

    fn render(&self, _timing: &dyn TimingReference, frame: AudioFrame<'_>) {
        self.events.lock().push(Event::AudioRender {
            len: frame.data.len(),
            pts: frame.pts,
        });
    }

    fn set_volume(&self, gain: f32) {
        self.events.lock().push(Event::AudioVolume(gain));
    }

    fn destroy(&self) {
        self.events.lock().push(Event::AudioDestroy);
    }
}

struct MockAdvertiser {
    events: EventLog,
}

impl ServiceAdvertiser for MockAdvertiser {
    fn register(&self, kind: ServiceKind, port: u16) {
        self.events.lock().push(Event::Register(kind, port));
    }

    fn unregister(&self, kind: ServiceKind) {
        self.events.lock().push(Event::Unregister(kind));
    }
}

pub struct Clock(pub u64);

impl TimingReference for Clock {
    fn now_us(&self) -> u64 {
        self.0
    }
}
