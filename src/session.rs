//! Process-scoped scan session.
//!
//! The session is the consumer-facing boundary: sweep subnets, re-probe
//! an existing host set, scan one host's ports, enumerate interfaces,
//! find the gateway. It also owns the one piece of ambient state the
//! core has - the periodic re-prober. At most one re-prober is active
//! per session: starting a scan or a new watch cancels the previous one,
//! and dropping the session releases it.

use crate::netinfo::{self, InterfaceDescriptor};
use crate::resolve::AddressResolver;
use crate::scanner::{self, PortResult, PortScanConfig, SweepConfig};
use crate::types::{Host, PortSpec, SubnetSpec};
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Timeout for the enrichment/re-probe pass, looser than the sweep's
/// because it targets hosts already known to answer.
pub const ENRICH_PROBE_TIMEOUT: Duration = Duration::from_millis(500);

/// Default cadence of the periodic re-prober.
pub const DEFAULT_WATCH_INTERVAL: Duration = Duration::from_secs(2);

/// A discovery session: scan entry points plus the periodic re-prober.
pub struct ScanSession {
    sweep: SweepConfig,
    resolver: Arc<AddressResolver>,
    monitor: Option<JoinHandle<()>>,
}

impl ScanSession {
    /// Session with the given sweep configuration.
    pub fn new(sweep: SweepConfig) -> Self {
        Self {
            sweep,
            resolver: Arc::new(AddressResolver::new()),
            monitor: None,
        }
    }

    /// Full discovery pass over the given subnets.
    ///
    /// Cancels any active re-prober, sweeps every subnet, then enriches
    /// reachable hosts (latency re-measure, hostname, MAC). Returns a
    /// record per swept address, unreachable ones included.
    pub async fn scan(&mut self, subnets: &[SubnetSpec]) -> Vec<Arc<Host>> {
        self.stop();

        let hosts = scanner::sweep_subnets(subnets, &self.sweep).await;
        let reachable: Vec<Arc<Host>> = hosts
            .iter()
            .filter(|h| h.is_reachable())
            .cloned()
            .collect();
        debug!("sweep found {} reachable hosts", reachable.len());

        Self::refresh_pass(&reachable, &self.sweep, &self.resolver).await;
        hosts
    }

    /// One in-place re-probe-and-enrich pass over an existing host set.
    pub async fn rescan(&self, hosts: &[Arc<Host>]) {
        Self::refresh_pass(hosts, &self.sweep, &self.resolver).await;
    }

    /// Start the periodic re-prober over a host set.
    ///
    /// Any previous re-prober is cancelled first - watches replace,
    /// they never stack.
    pub fn watch(&mut self, hosts: Vec<Arc<Host>>, interval: Duration) {
        self.stop();
        if hosts.is_empty() {
            return;
        }

        let sweep = self.sweep.clone();
        let resolver = Arc::clone(&self.resolver);
        self.monitor = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                Self::refresh_pass(&hosts, &sweep, &resolver).await;
            }
        }));
    }

    /// Whether a periodic re-prober is currently active.
    pub fn is_watching(&self) -> bool {
        self.monitor.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Cancel the periodic re-prober, if any.
    pub fn stop(&mut self) {
        if let Some(task) = self.monitor.take() {
            task.abort();
        }
    }

    /// Dual-strategy port scan of one host.
    pub async fn scan_host_ports(
        &self,
        addr: Ipv4Addr,
        spec: &PortSpec,
        config: &PortScanConfig,
    ) -> Vec<PortResult> {
        scanner::scan_ports(addr, spec, config).await
    }

    /// Usable local interfaces, enumerated fresh.
    pub fn interfaces(&self) -> Vec<InterfaceDescriptor> {
        netinfo::list_interfaces()
    }

    /// The platform's default gateway, if it can be determined.
    pub async fn default_gateway(&self) -> Option<Ipv4Addr> {
        netinfo::system_default_gateway().await
    }

    /// Re-probe each host with the enrichment timeout and fill blank
    /// hostname/MAC fields on the ones that answer.
    async fn refresh_pass(hosts: &[Arc<Host>], sweep: &SweepConfig, resolver: &AddressResolver) {
        if hosts.is_empty() {
            return;
        }
        let config = sweep.clone().with_timeout(ENRICH_PROBE_TIMEOUT);
        scanner::probe_hosts(hosts, &config).await;

        for host in hosts.iter().filter(|h| h.is_reachable()) {
            resolver.enrich(host).await;
        }
    }
}

impl Drop for ScanSession {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new(SweepConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> ScanSession {
        ScanSession::new(SweepConfig::default().with_timeout(Duration::from_millis(20)))
    }

    #[tokio::test]
    async fn test_scan_returns_full_host_list() {
        let mut session = session();
        let subnets = vec![SubnetSpec::parse("192.0.2").unwrap()];
        let hosts = session.scan(&subnets).await;
        assert_eq!(hosts.len(), 254);
    }

    #[tokio::test]
    async fn test_empty_working_set_scans_nothing() {
        let mut session = session();
        let subnets = SubnetSpec::parse_list("10.0, bogus");
        assert!(subnets.is_empty());
        let hosts = session.scan(&subnets).await;
        assert!(hosts.is_empty());
    }

    #[tokio::test]
    async fn test_watch_replaces_previous_monitor() {
        let mut session = session();
        let hosts = vec![Arc::new(Host::new(Ipv4Addr::new(192, 0, 2, 1)))];

        session.watch(hosts.clone(), Duration::from_secs(60));
        assert!(session.is_watching());

        // Starting a second watch cancels the first instead of stacking.
        session.watch(hosts, Duration::from_secs(60));
        assert!(session.is_watching());

        session.stop();
        assert!(!session.is_watching());
    }

    #[tokio::test]
    async fn test_watch_with_no_hosts_is_a_no_op() {
        let mut session = session();
        session.watch(Vec::new(), Duration::from_secs(1));
        assert!(!session.is_watching());
    }

    #[tokio::test]
    async fn test_scan_cancels_active_watch() {
        let mut session = session();
        let hosts = vec![Arc::new(Host::new(Ipv4Addr::new(192, 0, 2, 1)))];
        session.watch(hosts, Duration::from_secs(60));
        assert!(session.is_watching());

        let _ = session.scan(&[]).await;
        assert!(!session.is_watching());
    }
}
