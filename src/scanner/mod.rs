//! Scanner module - subnet sweeps and port scanning.
//!
//! Two independent worker-pool tiers drive a sweep: each /24 fans its
//! 254 probes out on a bounded pool, and multi-subnet requests fan whole
//! subnet sweeps out on a second, narrower pool. Pools are scoped to the
//! call - dropping the stream is the teardown.

pub mod nmap;
pub mod pacer;
pub mod ports;

pub use ports::{scan_ports, PortResult, PortScanConfig};

use crate::probe::HostProber;
use crate::types::{Host, SubnetSpec};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Concurrent probes per subnet sweep. Sized so a full /24 completes in
/// low single-digit seconds even when every probe runs to its timeout.
pub const SWEEP_CONCURRENCY: usize = 50;

/// Upper bound on concurrently swept subnets.
pub const SUBNET_CONCURRENCY: usize = 8;

/// Default per-probe timeout for sweeps.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(200);

/// Configuration for a sweep operation.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Per-probe timeout.
    pub probe_timeout: Duration,
    /// Probe pool width per subnet.
    pub concurrency: usize,
    /// Subnet pool width cap.
    pub subnet_concurrency: usize,
    /// Show a progress bar while sweeping.
    pub progress: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            concurrency: SWEEP_CONCURRENCY,
            subnet_concurrency: SUBNET_CONCURRENCY,
            progress: false,
        }
    }
}

impl SweepConfig {
    /// Override the per-probe timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Enable the progress bar.
    pub fn with_progress(mut self) -> Self {
        self.progress = true;
        self
    }
}

/// Sweep one /24: probe all 254 host addresses on a bounded pool.
///
/// Returns a record for every address, unreachable ones included, in no
/// guaranteed order. No single slow probe stalls the rest, and nothing a
/// probe does can abort the pool.
pub async fn sweep_subnet(spec: &SubnetSpec, config: &SweepConfig) -> Vec<Arc<Host>> {
    let hosts: Vec<Arc<Host>> = spec.hosts().map(|addr| Arc::new(Host::new(addr))).collect();
    probe_hosts(&hosts, config).await;
    hosts
}

/// Sweep multiple subnets on a second bounded tier.
///
/// The outer pool is capped at `min(subnet count, subnet_concurrency)`
/// so a many-subnet request cannot multiply into an unbounded number of
/// probe pools. A subnet whose sweep task dies contributes zero hosts
/// rather than aborting the others.
pub async fn sweep_subnets(specs: &[SubnetSpec], config: &SweepConfig) -> Vec<Arc<Host>> {
    if specs.is_empty() {
        return Vec::new();
    }
    let width = specs.len().min(config.subnet_concurrency.max(1));

    let results: Vec<Vec<Arc<Host>>> = stream::iter(specs.to_vec())
        .map(|spec| {
            let config = config.clone();
            tokio::spawn(async move { sweep_subnet(&spec, &config).await })
        })
        .buffer_unordered(width)
        .map(|joined| match joined {
            Ok(hosts) => hosts,
            Err(e) => {
                warn!("subnet sweep task failed: {e}");
                Vec::new()
            }
        })
        .collect()
        .await;

    results.into_iter().flatten().collect()
}

/// Re-probe an existing host set in place on the sweep pool.
pub async fn probe_hosts(hosts: &[Arc<Host>], config: &SweepConfig) {
    let prober = HostProber::new(config.probe_timeout);
    let semaphore = Arc::new(Semaphore::new(config.concurrency.max(1)));

    let progress = if config.progress {
        let pb = ProgressBar::new(hosts.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    stream::iter(hosts.iter().cloned())
        .map(|host| {
            let sem = Arc::clone(&semaphore);
            let progress = progress.clone();
            async move {
                let _permit = sem.acquire().await.expect("sweep semaphore closed");
                let outcome = prober.probe(host.address()).await;
                host.record_probe(outcome.reachable, outcome.latency_ms);
                if let Some(ref pb) = progress {
                    pb.inc(1);
                    if outcome.reachable {
                        pb.set_message(format!("found {}", host.address()));
                    }
                }
            }
        })
        // High buffering; the semaphore bounds actual concurrency.
        .buffer_unordered(1000)
        .collect::<Vec<()>>()
        .await;

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    debug!(
        "probed {} hosts, {} reachable",
        hosts.len(),
        hosts.iter().filter(|h| h.is_reachable()).count()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::net::Ipv4Addr;

    fn fast_config() -> SweepConfig {
        // TEST-NET sweeps: every probe times out, so keep it tight.
        SweepConfig::default().with_timeout(Duration::from_millis(20))
    }

    #[tokio::test]
    async fn test_sweep_returns_all_254_unique_addresses() {
        let spec = SubnetSpec::parse("192.0.2").unwrap();
        let hosts = sweep_subnet(&spec, &fast_config()).await;

        assert_eq!(hosts.len(), 254);
        let unique: HashSet<Ipv4Addr> = hosts.iter().map(|h| h.address()).collect();
        assert_eq!(unique.len(), 254);
    }

    #[tokio::test]
    async fn test_unreachable_hosts_carry_no_latency() {
        let spec = SubnetSpec::parse("192.0.2").unwrap();
        let hosts = sweep_subnet(&spec, &fast_config()).await;

        for host in hosts.iter().filter(|h| !h.is_reachable()) {
            assert_eq!(host.snapshot().latency_ms, None);
        }
    }

    #[tokio::test]
    async fn test_multi_subnet_union_without_cross_duplication() {
        let specs = SubnetSpec::parse_list("192.0.2,198.51.100");
        let hosts = sweep_subnets(&specs, &fast_config()).await;

        assert_eq!(hosts.len(), 508);
        let unique: HashSet<Ipv4Addr> = hosts.iter().map(|h| h.address()).collect();
        assert_eq!(unique.len(), 508);
    }

    #[tokio::test]
    async fn test_empty_subnet_list_yields_empty_result() {
        let hosts = sweep_subnets(&[], &fast_config()).await;
        assert!(hosts.is_empty());
    }
}
