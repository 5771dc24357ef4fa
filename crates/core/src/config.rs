//! Session configuration, fixed before startup and read-only afterwards.

use crate::hwaddr::{HwAddr, Resolver};

pub const DEFAULT_NAME: &str = "AirMirror";
pub const DEFAULT_SHOW_BACKGROUND: bool = true;
pub const DEFAULT_AUDIO_DEVICE: AudioDevice = AudioDevice::Hdmi;
pub const DEFAULT_LOW_LATENCY: bool = false;

/// Audio output selected for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioDevice {
    Hdmi,
    Analog,
    /// Audio disabled; no audio renderer is constructed.
    None,
}

impl AudioDevice {
    /// Map a device name to a selector.
    ///
    /// Only `"hdmi"` and `"analog"` are recognised. Any other string
    /// disables audio rather than being rejected.
    pub fn from_name(name: &str) -> Self {
        match name {
            "hdmi" => Self::Hdmi,
            "analog" => Self::Analog,
            _ => Self::None,
        }
    }

    pub fn is_enabled(self) -> bool {
        self != Self::None
    }
}

/// Configuration for the single session this process runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Network name advertised to senders.
    pub name: String,
    /// Hardware address identifying the session on the network.
    pub hw_addr: HwAddr,
    /// Draw a black background behind the video.
    pub show_background: bool,
    pub audio_device: AudioDevice,
    /// Disables the render clock in both renderers.
    pub low_latency: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            hw_addr: HwAddr::FALLBACK,
            show_background: DEFAULT_SHOW_BACKGROUND,
            audio_device: DEFAULT_AUDIO_DEVICE,
            low_latency: DEFAULT_LOW_LATENCY,
        }
    }
}

impl SessionConfig {
    /// Fill in the hardware address from the host interfaces.
    ///
    /// An explicitly supplied address wins. Otherwise the first readable
    /// interface address is used, and [`HwAddr::FALLBACK`] when none is.
    pub fn with_resolved_hw_addr(self, explicit: Option<HwAddr>) -> Self {
        self.with_resolved_hw_addr_from(explicit, &Resolver::default())
    }

    /// Like [`with_resolved_hw_addr`](Self::with_resolved_hw_addr), reading
    /// from the given resolver's sources.
    pub fn with_resolved_hw_addr_from(
        mut self,
        explicit: Option<HwAddr>,
        resolver: &Resolver,
    ) -> Self {
        self.hw_addr = match explicit {
            Some(addr) => addr,
            None => resolver.resolve().unwrap_or_else(|e| {
                tracing::info!(
                    error = %e,
                    fallback = %HwAddr::FALLBACK,
                    "using fallback hardware address"
                );
                HwAddr::FALLBACK
            }),
        };
        self
    }
}
