//! Data-plane types shared by the protocol engine, the router and renderers.
//!
//! The engine delivers encoded buffers and control events through a
//! [`MediaSink`]. Diagnostics from the engine and renderers travel through
//! a [`LogSink`] tagged with a [`Severity`] on the engine's numeric scale.

use std::sync::Arc;

/// Engine diagnostic severity (syslog-style: lower is more severe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Severity(pub u8);

impl Severity {
    pub const ERR: Severity = Severity(3);
    pub const WARNING: Severity = Severity(4);
    pub const INFO: Severity = Severity(6);
    pub const DEBUG: Severity = Severity(7);

    /// The most detailed verbosity an engine or logger can be set to.
    pub const MAX_VERBOSITY: Severity = Severity::DEBUG;

    /// Map onto a `tracing` level. Values outside the known set map to `None`.
    pub fn to_level(self) -> Option<tracing::Level> {
        match self {
            Self::DEBUG => Some(tracing::Level::DEBUG),
            Self::INFO => Some(tracing::Level::INFO),
            Self::WARNING => Some(tracing::Level::WARN),
            Self::ERR => Some(tracing::Level::ERROR),
            _ => None,
        }
    }
}

/// Opaque clock-synchronisation handle owned by the engine.
///
/// Passed alongside every buffer so renderers can schedule presentation
/// against the sender's timeline.
pub trait TimingReference: Send + Sync {
    /// Current synchronised time in microseconds.
    fn now_us(&self) -> u64;
}

/// Opaque identifier the engine attaches to control events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(pub u64);

/// One encoded audio buffer.
#[derive(Debug, Clone, Copy)]
pub struct AudioFrame<'a> {
    pub data: &'a [u8],
    /// Presentation timestamp.
    pub pts: u64,
}

/// One encoded video buffer.
#[derive(Debug, Clone, Copy)]
pub struct VideoFrame<'a> {
    pub data: &'a [u8],
    pub pts: u64,
    /// Engine-defined frame type tag, forwarded untouched.
    pub frame_type: i32,
}

/// Receives diagnostic messages.
pub trait LogSink: Send + Sync {
    fn log_event(&self, severity: Severity, message: &str);
}

/// Capability set the engine calls into from its own threads.
///
/// Implementations must be safe to enter concurrently and reentrantly.
pub trait MediaSink: LogSink {
    fn deliver_audio(&self, timing: &dyn TimingReference, frame: AudioFrame<'_>);
    fn deliver_video(&self, timing: &dyn TimingReference, frame: VideoFrame<'_>);
    /// `gain` is the engine's own scale and is forwarded unmodified.
    fn set_volume(&self, connection: ConnectionId, gain: f32);
}

/// Diagnostics logger for the engine and renderers.
///
/// Filters on the engine severity scale and forwards everything at or
/// above its verbosity to a shared [`LogSink`].
#[derive(Clone)]
pub struct DiagnosticsLogger {
    sink: Arc<dyn LogSink>,
    level: Severity,
}

impl DiagnosticsLogger {
    /// New logger forwarding at [`Severity::INFO`] until told otherwise.
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            level: Severity::INFO,
        }
    }

    pub fn set_level(&mut self, level: Severity) {
        self.level = level;
    }

    pub fn level(&self) -> Severity {
        self.level
    }

    pub fn log(&self, severity: Severity, message: &str) {
        if severity <= self.level {
            self.sink.log_event(severity, message);
        }
    }
}
