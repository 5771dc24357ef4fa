use std::convert::Infallible;
use std::process::ExitCode;

use airmirror::config::{DEFAULT_LOW_LATENCY, DEFAULT_NAME, DEFAULT_SHOW_BACKGROUND};
use airmirror::runloop::{DEFAULT_TICK, run_until_stopped};
use airmirror::{
    AudioDevice, HeadlessPlatform, HwAddr, RunState, Session, SessionConfig, SignalBridge,
};
use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "airmirror",
    version,
    about = "An open-source screen-mirroring receiver",
    disable_help_flag = true,
    disable_version_flag = true,
    help_template = "{name} {version}: {about}\n\n{usage-heading} {usage}\n\n{all-args}"
)]
struct Args {
    /// Network name of the receiver
    #[arg(short = 'n', value_name = "name", default_value = DEFAULT_NAME)]
    name: String,

    /// Hide the black background behind the video
    #[arg(short = 'b', action = ArgAction::Count)]
    background: u8,

    /// Audio output device
    #[arg(
        short = 'a',
        value_name = "hdmi|analog|off",
        value_parser = parse_audio_device,
        default_value = "hdmi"
    )]
    audio: AudioDevice,

    /// Enable low-latency mode (disables render clock)
    #[arg(short = 'l', action = ArgAction::Count)]
    low_latency: u8,

    /// Advertise this hardware address instead of the interface's
    #[arg(long = "hw-addr", value_name = "xx:xx:xx:xx:xx:xx")]
    hw_addr: Option<HwAddr>,

    /// Display this help and version information
    #[arg(short = 'h', short_alias = 'v', long = "help", action = ArgAction::Help)]
    help: Option<bool>,
}

/// Unknown device names disable audio rather than failing the parse.
fn parse_audio_device(name: &str) -> Result<AudioDevice, Infallible> {
    Ok(AudioDevice::from_name(name))
}

impl Args {
    /// `-b` and `-l` flip their default on every occurrence.
    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            name: self.name.clone(),
            show_background: DEFAULT_SHOW_BACKGROUND ^ (self.background % 2 == 1),
            audio_device: self.audio,
            low_latency: DEFAULT_LOW_LATENCY ^ (self.low_latency % 2 == 1),
            ..SessionConfig::default()
        }
    }
}

/// Help display exits 0; any other parse error exits 1 like a failed start.
fn parse_exit_status(err: &clap::Error) -> u8 {
    if err.exit_code() == 0 { 0 } else { 1 }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(parse_exit_status(&e));
        }
    };

    let run_state = RunState::new();
    let _signals = match SignalBridge::install(&run_state) {
        Ok(bridge) => Some(bridge),
        Err(e) => {
            tracing::warn!(error = %e, "could not install signal handlers");
            None
        }
    };

    let config = args.session_config().with_resolved_hw_addr(args.hw_addr);

    let session = match Session::start(&HeadlessPlatform::default(), &config) {
        Ok(session) => session,
        Err(_) => return ExitCode::FAILURE,
    };

    run_until_stopped(&run_state, DEFAULT_TICK);

    tracing::info!("Stopping...");
    session.stop();
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> SessionConfig {
        let mut argv = vec!["airmirror"];
        argv.extend_from_slice(args);
        Args::try_parse_from(argv).unwrap().session_config()
    }

    #[test]
    fn defaults() {
        let config = parse(&[]);
        assert_eq!(config.name, DEFAULT_NAME);
        assert!(config.show_background);
        assert_eq!(config.audio_device, AudioDevice::Hdmi);
        assert!(!config.low_latency);
    }

    #[test]
    fn flags_toggle() {
        let config = parse(&["-b", "-l"]);
        assert!(!config.show_background);
        assert!(config.low_latency);

        let config = parse(&["-b", "-b", "-l", "-l", "-l"]);
        assert!(config.show_background);
        assert!(config.low_latency);
    }

    #[test]
    fn name_and_audio_device() {
        let config = parse(&["-n", "Living Room", "-a", "analog"]);
        assert_eq!(config.name, "Living Room");
        assert_eq!(config.audio_device, AudioDevice::Analog);
        assert_eq!(parse(&["-a", "off"]).audio_device, AudioDevice::None);
    }

    #[test]
    fn unknown_audio_device_disables_audio() {
        assert_eq!(parse(&["-a", "speakers"]).audio_device, AudioDevice::None);
    }

    #[test]
    fn explicit_hw_addr() {
        let args = Args::try_parse_from(["airmirror", "--hw-addr", "02:00:00:aa:bb:cc"]).unwrap();
        assert_eq!(args.hw_addr, Some(HwAddr::new([2, 0, 0, 0xaa, 0xbb, 0xcc])));
        assert!(Args::try_parse_from(["airmirror", "--hw-addr", "nope"]).is_err());
    }

    #[test]
    fn help_and_version_flags_display_help() {
        for flag in ["-h", "-v"] {
            let err = Args::try_parse_from(["airmirror", flag]).err().unwrap();
            assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
            assert_eq!(parse_exit_status(&err), 0);
        }
    }

    #[test]
    fn bad_arguments_exit_with_failure_status() {
        for argv in [
            &["airmirror", "--bogus"][..],
            &["airmirror", "-n"][..],
            &["airmirror", "-a"][..],
        ] {
            let err = Args::try_parse_from(argv).err().unwrap();
            assert_eq!(parse_exit_status(&err), 1, "{argv:?}");
        }
    }
}
