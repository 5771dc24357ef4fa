//! Run loop and signal bridge.
//!
//! ```text
//! RUNNING --(SIGINT | SIGTERM)--> STOPPING
//! ```
//!
//! The signal handler performs a single atomic store and nothing else.
//! The run loop polls the flag between idle ticks.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::SigId;

/// Idle interval of the process run loop.
pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Running,
    Stopping,
}

/// Process-wide stop flag. `false` is RUNNING, `true` is STOPPING.
#[derive(Debug, Clone, Default)]
pub struct RunState {
    stop: Arc<AtomicBool>,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> RunPhase {
        if self.stop.load(Ordering::SeqCst) {
            RunPhase::Stopping
        } else {
            RunPhase::Running
        }
    }

    pub fn is_stopping(&self) -> bool {
        self.phase() == RunPhase::Stopping
    }

    /// Request a stop from ordinary (non-signal) code.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }
}

/// Registration of the termination signals against a [`RunState`].
///
/// Unregisters the handlers when dropped.
pub struct SignalBridge {
    ids: Vec<SigId>,
}

impl SignalBridge {
    /// Route SIGINT and SIGTERM to `state`.
    ///
    /// Repeated signals keep storing `true`; the flag never leaves STOPPING.
    pub fn install(state: &RunState) -> io::Result<Self> {
        let mut ids = Vec::with_capacity(2);
        for signal in [SIGINT, SIGTERM] {
            ids.push(signal_hook::flag::register(signal, state.stop.clone())?);
        }
        tracing::debug!("termination signal handlers installed");
        Ok(Self { ids })
    }
}

impl Drop for SignalBridge {
    fn drop(&mut self) {
        for id in self.ids.drain(..) {
            signal_hook::low_level::unregister(id);
        }
    }
}

/// Idle until `state` reaches STOPPING.
pub fn run_until_stopped(state: &RunState, tick: Duration) {
    while !state.is_stopping() {
        thread::sleep(tick);
    }
    tracing::info!("stop requested");
}
