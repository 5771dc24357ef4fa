use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::media::{DiagnosticsLogger, LogSink, Severity};
use crate::platform::{ProtocolEngine, ServiceAdvertiser};

const ACCEPT_POLL: Duration = Duration::from_millis(50);

/// Protocol engine that accepts sender connections on a TCP port.
///
/// It does not speak the mirroring protocol: connections are reported
/// through the diagnostics sink and closed, so no media is ever delivered.
pub struct HeadlessEngine {
    listener: Option<TcpListener>,
    bound_port: u16,
    port: u16,
    max_connections: usize,
    logger: Option<DiagnosticsLogger>,
    log_level: Severity,
    advertiser: Option<Arc<dyn ServiceAdvertiser>>,
    running: Arc<AtomicBool>,
    accept_thread: Option<JoinHandle<()>>,
}

impl HeadlessEngine {
    /// Bind the listening socket. Port `0` lets the OS choose.
    pub fn bind(addr: &str, max_connections: usize) -> io::Result<Self> {
        let listener = TcpListener::bind(addr)?;
        listener.set_nonblocking(true)?;
        let bound_port = listener.local_addr()?.port();

        Ok(Self {
            listener: Some(listener),
            bound_port,
            port: 0,
            max_connections,
            logger: None,
            log_level: Severity::INFO,
            advertiser: None,
            running: Arc::new(AtomicBool::new(false)),
            accept_thread: None,
        })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn has_advertiser(&self) -> bool {
        self.advertiser.is_some()
    }

    fn log(&self, severity: Severity, message: &str) {
        if let Some(logger) = &self.logger {
            logger.log(severity, message);
        }
    }
}

impl ProtocolEngine for HeadlessEngine {
    fn set_log_sink(&mut self, sink: Arc<dyn LogSink>) {
        let mut logger = DiagnosticsLogger::new(sink);
        logger.set_level(self.log_level);
        self.logger = Some(logger);
    }

    fn set_log_level(&mut self, level: Severity) {
        self.log_level = level;
        if let Some(logger) = &mut self.logger {
            logger.set_level(level);
        }
    }

    fn start(&mut self) -> u16 {
        let Some(listener) = self.listener.take() else {
            return self.bound_port;
        };

        self.running.store(true, Ordering::SeqCst);
        let running = self.running.clone();
        let logger = self.logger.clone();

        self.log(
            Severity::DEBUG,
            &format!(
                "listening on port {} (max {} connections)",
                self.bound_port, self.max_connections
            ),
        );

        self.accept_thread = Some(thread::spawn(move || {
            accept_loop(listener, logger, running);
        }));

        self.bound_port
    }

    fn set_port(&mut self, port: u16) {
        self.port = port;
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn set_advertiser(&mut self, advertiser: Arc<dyn ServiceAdvertiser>) {
        self.advertiser = Some(advertiser);
    }

    fn destroy(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.accept_thread.take() {
            if handle.join().is_err() {
                tracing::warn!("accept thread panicked");
            }
        }
        self.listener = None;
        self.advertiser = None;
        self.log(Severity::DEBUG, "engine destroyed");
    }
}

impl Drop for HeadlessEngine {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

/// Non-blocking TCP accept loop.
///
/// Checks the `running` flag between accepts with a 50ms poll interval
/// so that [`ProtocolEngine::destroy`] can join it promptly.
fn accept_loop(
    listener: TcpListener,
    logger: Option<DiagnosticsLogger>,
    running: Arc<AtomicBool>,
) {
    let log = |severity: Severity, message: &str| {
        if let Some(logger) = &logger {
            logger.log(severity, message);
        }
    };

    while running.load(Ordering::SeqCst) {
        match listener.accept() {
            Ok((stream, peer_addr)) => handle_connection(stream, peer_addr, &log),
            Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => {
                thread::sleep(ACCEPT_POLL);
            }
            Err(e) => {
                if running.load(Ordering::SeqCst) {
                    log(Severity::WARNING, &format!("accept error: {e}"));
                }
            }
        }
    }
    tracing::debug!("accept loop exited");
}

fn handle_connection(stream: TcpStream, peer_addr: SocketAddr, log: &dyn Fn(Severity, &str)) {
    log(Severity::INFO, &format!("connection from {peer_addr}"));
    drop(stream);
    log(Severity::DEBUG, &format!("{peer_addr}: closed, protocol not available"));
}
