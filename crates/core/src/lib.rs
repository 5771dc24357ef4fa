pub mod config;
pub mod error;
pub mod headless;
pub mod hwaddr;
pub mod media;
pub mod platform;
pub mod router;
pub mod runloop;
pub mod session;

pub use config::{AudioDevice, SessionConfig};
pub use error::{BackendError, HwAddrError, Result, StartupError, StartupErrorKind};
pub use headless::HeadlessPlatform;
pub use hwaddr::HwAddr;
pub use media::{DiagnosticsLogger, LogSink, MediaSink, Severity};
pub use platform::{Platform, ServiceKind};
pub use router::CallbackRouter;
pub use runloop::{RunPhase, RunState, SignalBridge};
pub use session::Session;
