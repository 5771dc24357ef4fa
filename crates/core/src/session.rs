//! Session lifecycle orchestration.
//!
//! A [`Session`] is the one live set of subsystems for a mirroring run:
//! protocol engine, service advertiser, video renderer and an optional
//! audio renderer. It only exists fully constructed. [`Session::start`]
//! either returns every subsystem running or tears down whatever it had
//! built and returns the failing step.
//!
//! ## Startup order
//!
//! ```text
//! engine (router registered) -> engine log sink -> diagnostics logger
//!   -> video renderer -> audio renderer (unless disabled)
//!   -> start video, start audio -> start engine, record port
//!   -> advertiser -> register RAOP on port, AirPlay on port + 1
//! ```
//!
//! ## Teardown order
//!
//! ```text
//! destroy engine -> unregister RAOP, AirPlay -> destroy audio -> destroy video
//! ```
//!
//! Partial unwinds during startup follow the same order.

use std::sync::Arc;

use crate::config::SessionConfig;
use crate::error::{Result, StartupError};
use crate::media::{DiagnosticsLogger, Severity};
use crate::platform::{
    AudioRenderer, ENGINE_MAX_CONNECTIONS, Platform, ProtocolEngine, ServiceAdvertiser,
    ServiceKind, VideoRenderer,
};
use crate::router::CallbackRouter;

/// Port of the companion service for a given primary port.
///
/// Always the primary port plus one; `65535` wraps to `0` as a 16-bit port.
pub fn companion_port(port: u16) -> u16 {
    port.wrapping_add(1)
}

/// Subsystem handles in the order they must be released.
///
/// Dropping this tears down whatever is still held, so an early return
/// from [`Session::start`] unwinds the partially built session.
struct Subsystems {
    router: Arc<CallbackRouter>,
    engine: Box<dyn ProtocolEngine>,
    engine_destroyed: bool,
    advertiser: Option<Arc<dyn ServiceAdvertiser>>,
    audio: Option<Arc<dyn AudioRenderer>>,
    video: Option<Arc<dyn VideoRenderer>>,
}

impl Subsystems {
    fn new(router: Arc<CallbackRouter>, engine: Box<dyn ProtocolEngine>) -> Self {
        Self {
            router,
            engine,
            engine_destroyed: false,
            advertiser: None,
            audio: None,
            video: None,
        }
    }

    fn teardown(&mut self) {
        if !self.engine_destroyed {
            self.engine_destroyed = true;
            self.engine.destroy();
            tracing::debug!("protocol engine destroyed");
        }

        if let Some(advertiser) = self.advertiser.take() {
            advertiser.unregister(ServiceKind::Raop);
            advertiser.unregister(ServiceKind::AirPlay);
            tracing::debug!("services unregistered");
        }

        self.router.detach_renderers();

        // Audio must go before video. The other order deadlocks the
        // hardware rendering client.
        if let Some(audio) = self.audio.take() {
            audio.destroy();
            tracing::debug!("audio renderer destroyed");
        }
        if let Some(video) = self.video.take() {
            video.destroy();
            tracing::debug!("video renderer destroyed");
        }
    }
}

impl Drop for Subsystems {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// One running mirroring session.
pub struct Session {
    subsystems: Subsystems,
    port: u16,
}

impl Session {
    /// Construct and start every subsystem.
    ///
    /// Not reentrant; call once per process.
    pub fn start<P>(platform: &P, config: &SessionConfig) -> Result<Session>
    where
        P: Platform + ?Sized,
    {
        let router = Arc::new(CallbackRouter::new());

        let engine = platform
            .init_engine(ENGINE_MAX_CONNECTIONS, router.clone())
            .map_err(|e| reported(StartupError::EngineInitFailed(e)))?;
        tracing::debug!("protocol engine init success");
        let mut subsystems = Subsystems::new(router.clone(), engine);

        subsystems.engine.set_log_sink(router.clone());
        subsystems.engine.set_log_level(Severity::MAX_VERBOSITY);

        let mut diagnostics = DiagnosticsLogger::new(router.clone());
        diagnostics.set_level(Severity::MAX_VERBOSITY);

        if config.low_latency {
            diagnostics.log(Severity::INFO, "Using low-latency mode");
        }

        let video = platform
            .init_video_renderer(
                diagnostics.clone(),
                config.show_background,
                config.low_latency,
            )
            .map_err(|e| reported(StartupError::VideoRendererInitFailed(e)))?;
        subsystems.video = Some(video.clone());
        router.attach_video(video.clone());

        if config.audio_device.is_enabled() {
            let audio = platform
                .init_audio_renderer(
                    diagnostics,
                    video.clone(),
                    config.audio_device,
                    config.low_latency,
                )
                .map_err(|e| reported(StartupError::AudioRendererInitFailed(e)))?;
            subsystems.audio = Some(audio.clone());
            router.attach_audio(audio);
        } else {
            tracing::info!("audio disabled");
        }

        video.start();
        if let Some(audio) = &subsystems.audio {
            audio.start();
        }

        let port = subsystems.engine.start();
        subsystems.engine.set_port(port);
        tracing::debug!(port = subsystems.engine.port(), "protocol engine started");

        let advertiser = platform
            .init_advertiser(&config.name, &config.hw_addr)
            .map_err(|e| reported(StartupError::DiscoveryInitFailed(e)))?;
        subsystems.advertiser = Some(advertiser.clone());

        subsystems.engine.set_advertiser(advertiser.clone());
        advertiser.register(ServiceKind::Raop, port);
        advertiser.register(ServiceKind::AirPlay, companion_port(port));

        tracing::info!(
            name = %config.name,
            hw_addr = %config.hw_addr,
            port,
            audio = ?config.audio_device,
            "session started"
        );

        Ok(Session { subsystems, port })
    }

    /// Tear the session down in the fixed order. Never fails.
    pub fn stop(mut self) {
        tracing::info!("session stopping");
        self.subsystems.teardown();
    }

    /// Port the primary service is advertised on.
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn companion_port(&self) -> u16 {
        companion_port(self.port)
    }

    pub fn has_audio(&self) -> bool {
        self.subsystems.audio.is_some()
    }
}

fn reported(err: StartupError) -> StartupError {
    tracing::error!(error = %err, "session startup failed");
    err
}
