//! Error types for the mirroring session core.

use std::fmt;

/// Failure reported by an external collaborator (engine, renderer, advertiser).
///
/// Collaborators only tell us that construction did not yield a usable
/// handle, optionally with a numeric code (the advertiser's error code).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct BackendError {
    pub message: String,
    pub code: Option<i32>,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(message: impl Into<String>, code: i32) -> Self {
        Self {
            message: message.into(),
            code: Some(code),
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} (code {code})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Errors returned by [`Session::start`](crate::Session::start).
///
/// Each variant names the step of the startup sequence that failed:
///
/// - **Engine**: [`EngineInitFailed`](Self::EngineInitFailed) — step 1.
/// - **Renderers**: [`VideoRendererInitFailed`](Self::VideoRendererInitFailed),
///   [`AudioRendererInitFailed`](Self::AudioRendererInitFailed) — steps 4 and 5.
/// - **Discovery**: [`DiscoveryInitFailed`](Self::DiscoveryInitFailed) — step 8.
///
/// None of them are retried. By the time the caller sees one, every
/// subsystem constructed before the failing step has been torn down.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("protocol engine init failed: {0}")]
    EngineInitFailed(#[source] BackendError),

    #[error("could not init video renderer: {0}")]
    VideoRendererInitFailed(#[source] BackendError),

    #[error("could not init audio renderer: {0}")]
    AudioRendererInitFailed(#[source] BackendError),

    #[error("could not initialize service discovery: {0}")]
    DiscoveryInitFailed(#[source] BackendError),
}

impl StartupError {
    /// Which startup step produced this error.
    pub fn kind(&self) -> StartupErrorKind {
        match self {
            Self::EngineInitFailed(_) => StartupErrorKind::Engine,
            Self::VideoRendererInitFailed(_) => StartupErrorKind::VideoRenderer,
            Self::AudioRendererInitFailed(_) => StartupErrorKind::AudioRenderer,
            Self::DiscoveryInitFailed(_) => StartupErrorKind::Discovery,
        }
    }
}

/// Fieldless mirror of [`StartupError`] for matching in callers and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupErrorKind {
    Engine,
    VideoRenderer,
    AudioRenderer,
    Discovery,
}

/// Failure to obtain a hardware address from the host.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HwAddrError {
    /// None of the interface identity sources could be read.
    #[error("no readable interface address source")]
    NoSource,

    /// The source was readable but held no address.
    #[error("empty hardware address")]
    Empty,

    /// A hex pair at the given byte position did not parse.
    #[error("malformed hardware address: {kind}")]
    Malformed { kind: MalformedKind },
}

/// Specific kind of hardware address parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedKind {
    /// Byte at this index is not a hex pair.
    BadPair(usize),
    /// Parsing yielded this many bytes instead of six.
    WrongLength(usize),
}

impl fmt::Display for MalformedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadPair(pos) => write!(f, "bad hex pair at byte {pos}"),
            Self::WrongLength(n) => write!(f, "expected 6 bytes, got {n}"),
        }
    }
}

/// Convenience alias for `Result<T, StartupError>`.
pub type Result<T> = std::result::Result<T, StartupError>;
