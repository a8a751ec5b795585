//! Single-host reachability probing.
//!
//! The prober answers one question: does this address respond within the
//! timeout, and how fast? ICMP echo is preferred; when an ICMP socket
//! cannot be had (no raw-socket privilege) or the echo errors for a
//! non-timeout reason, it degrades to a TCP connect probe. A connect that
//! is *refused* still proves a live IP stack, so refusal counts as
//! reachable; only timeouts and unreachable-network errors count as down.
//!
//! Probing never returns an error. Every failure mode collapses into an
//! unreachable outcome, which makes the call safe to fan out across a
//! worker pool without per-task error plumbing.

use rand::random;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::{Duration, Instant};
use surge_ping::{Client, Config, PingIdentifier, PingSequence, SurgeError};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

/// Port used by the TCP fallback probe. Any port works for liveness: an
/// RST answer is as good as an accepted connection.
const FALLBACK_PROBE_PORT: u16 = 80;

/// Payload carried by ICMP echo requests.
const ECHO_PAYLOAD: [u8; 56] = [0; 56];

/// Outcome of one reachability probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOutcome {
    /// Whether the host answered within the timeout.
    pub reachable: bool,
    /// Round-trip time of the probe itself, reachable outcomes only.
    pub latency_ms: Option<u64>,
}

impl ProbeOutcome {
    fn down() -> Self {
        Self {
            reachable: false,
            latency_ms: None,
        }
    }

    fn up(elapsed: Duration) -> Self {
        Self {
            reachable: true,
            latency_ms: Some(elapsed.as_millis() as u64),
        }
    }
}

/// Reachability prober with a fixed per-probe timeout.
///
/// Stateless apart from its configuration; a single prober may be shared
/// across concurrent probe tasks.
#[derive(Debug, Clone, Copy)]
pub struct HostProber {
    timeout: Duration,
}

impl HostProber {
    /// Create a prober with the given per-probe timeout.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// The configured per-probe timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Probe one address. Infallible and idempotent.
    pub async fn probe(&self, addr: Ipv4Addr) -> ProbeOutcome {
        match self.icmp_probe(addr).await {
            Some(outcome) => outcome,
            None => self.tcp_probe(addr).await,
        }
    }

    /// ICMP echo probe. `None` means ICMP was unusable and the caller
    /// should fall through to TCP.
    async fn icmp_probe(&self, addr: Ipv4Addr) -> Option<ProbeOutcome> {
        let client = match Client::new(&Config::default()) {
            Ok(client) => client,
            Err(e) => {
                debug!("ICMP socket unavailable, using TCP probe: {e}");
                return None;
            }
        };

        let mut pinger = client
            .pinger(IpAddr::V4(addr), PingIdentifier(random()))
            .await;
        pinger.timeout(self.timeout);

        match pinger.ping(PingSequence(0), &ECHO_PAYLOAD).await {
            Ok((_packet, elapsed)) => Some(ProbeOutcome::up(elapsed)),
            Err(SurgeError::Timeout { .. }) => Some(ProbeOutcome::down()),
            Err(e) => {
                debug!("ICMP echo to {addr} failed ({e}), using TCP probe");
                None
            }
        }
    }

    /// TCP connect probe against [`FALLBACK_PROBE_PORT`].
    async fn tcp_probe(&self, addr: Ipv4Addr) -> ProbeOutcome {
        let socket = SocketAddr::new(IpAddr::V4(addr), FALLBACK_PROBE_PORT);
        let start = Instant::now();

        match timeout(self.timeout, TcpStream::connect(socket)).await {
            Ok(Ok(_stream)) => ProbeOutcome::up(start.elapsed()),
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::ConnectionRefused => {
                // RST received: nobody listening on the port, but the
                // host is alive and answered.
                ProbeOutcome::up(start.elapsed())
            }
            Ok(Err(_)) | Err(_) => ProbeOutcome::down(),
        }
    }
}
