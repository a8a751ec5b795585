//! Dual-strategy port scanning.
//!
//! One scan request walks a small state machine:
//! `TryExternalTool -> Done | FallbackRawProbe -> Done`. The external
//! tool tier is richer (it can distinguish open/closed/filtered, we keep
//! only open); the raw tier is a plain concurrent TCP connect per port.
//! The fallback trigger - tool unavailable *or* zero open results - is
//! the single predicate on [`ToolOutcome`](super::nmap::ToolOutcome).
//!
//! Neither tier raises: an empty result means "nothing found open", by
//! whichever path.

use crate::scanner::nmap::{self, ToolOutcome};
use crate::scanner::pacer::ProbePacer;
use crate::services::service_label;
use crate::types::PortSpec;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::debug;

/// Concurrent connection attempts on the raw probe tier. Attempts are
/// cheap and mostly fail fast on closed ports, so this pool runs wide.
pub const RAW_PROBE_CONCURRENCY: usize = 100;

/// Default per-connection timeout on the raw probe tier.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(300);

/// One open port on a scanned host. Closed and filtered ports are never
/// materialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortResult {
    /// The open port number.
    pub port: u16,
    /// Transport protocol, `"tcp"` unless the scan tool says otherwise.
    pub protocol: String,
    /// Probable service name for display.
    pub service: &'static str,
}

impl PortResult {
    /// Build a result for an open port.
    pub fn open(port: u16, protocol: impl Into<String>) -> Self {
        Self {
            port,
            protocol: protocol.into(),
            service: service_label(port),
        }
    }
}

impl std::fmt::Display for PortResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{} ({})", self.port, self.protocol, self.service)
    }
}

/// Configuration for a port scan.
#[derive(Debug, Clone)]
pub struct PortScanConfig {
    /// Per-connection timeout on the raw tier.
    pub connect_timeout: Duration,
    /// Raw-tier pool width.
    pub concurrency: usize,
    /// Raw-tier attempts per second, `0` for unlimited.
    pub rate_limit: u32,
    /// Skip the external tool and go straight to raw probing.
    pub skip_tool: bool,
}

impl Default for PortScanConfig {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            concurrency: RAW_PROBE_CONCURRENCY,
            rate_limit: 0,
            skip_tool: false,
        }
    }
}

/// Scan a host's ports with the two-tier strategy.
///
/// Results are deduplicated and ordered by first discovery: the tool's
/// own output order on tier 1, the port specification's order on tier 2.
pub async fn scan_ports(
    addr: Ipv4Addr,
    spec: &PortSpec,
    config: &PortScanConfig,
) -> Vec<PortResult> {
    if spec.is_empty() {
        return Vec::new();
    }

    if !config.skip_tool {
        let outcome = nmap::scan_with_tool(addr, spec).await;
        if !outcome.should_fall_back() {
            let ToolOutcome::Ran(results) = outcome else {
                unreachable!("non-fallback outcome always carries results");
            };
            return dedup_by_port(results);
        }
        debug!("external tool yielded nothing for {addr}, raw probing");
    }

    raw_probe_ports(addr, spec, config).await
}

/// Tier 2: concurrent TCP connect against each requested port.
///
/// A port is open iff the connection succeeds within the timeout. Every
/// connection error, including refusal, means "not open" here - unlike
/// reachability probing, a refusal is a definitive closed port.
pub async fn raw_probe_ports(
    addr: Ipv4Addr,
    spec: &PortSpec,
    config: &PortScanConfig,
) -> Vec<PortResult> {
    let semaphore = Arc::new(Semaphore::new(config.concurrency.max(1)));
    let pacer = ProbePacer::per_second(config.rate_limit);
    let connect_timeout = config.connect_timeout;

    let mut open: Vec<(usize, u16)> = stream::iter(spec.ports().iter().copied().enumerate())
        .map(|(index, port)| {
            let sem = Arc::clone(&semaphore);
            let pacer = pacer.clone();
            async move {
                let _permit = sem.acquire().await.expect("probe semaphore closed");
                pacer.acquire().await;
                let socket = SocketAddr::new(IpAddr::V4(addr), port);
                let is_open = matches!(
                    timeout(connect_timeout, TcpStream::connect(socket)).await,
                    Ok(Ok(_))
                );
                (index, port, is_open)
            }
        })
        .buffer_unordered(config.concurrency.max(1))
        .filter_map(|(index, port, is_open)| async move { is_open.then_some((index, port)) })
        .collect()
        .await;

    // Completion order is arbitrary; restore the specification's order.
    open.sort_unstable_by_key(|&(index, _)| index);
    open.into_iter()
        .map(|(_, port)| PortResult::open(port, "tcp"))
        .collect()
}

/// Drop repeated ports, keeping the first occurrence.
fn dedup_by_port(results: Vec<PortResult>) -> Vec<PortResult> {
    let mut seen = std::collections::HashSet::new();
    results
        .into_iter()
        .filter(|r| seen.insert(r.port))
        .collect()
}
