//! Best-effort host enrichment: reverse DNS and ARP-table MAC lookup.
//!
//! Enrichment only ever fills blank fields on a [`Host`] - it is safe to
//! run after every probe pass without clobbering earlier results. A
//! lookup that fails leaves its field unset; it says nothing about
//! reachability.

use crate::netinfo::arp::{parse_mac_for, ArpTableSource, SystemArpSource};
use crate::types::Host;
use std::net::{IpAddr, Ipv4Addr};
use tracing::debug;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

/// Fills hostnames and MAC addresses on discovered hosts.
pub struct AddressResolver {
    resolver: TokioAsyncResolver,
    arp: Box<dyn ArpTableSource>,
}

impl AddressResolver {
    /// Resolver backed by the default DNS configuration and the system
    /// `arp` command.
    pub fn new() -> Self {
        Self::with_arp_source(Box::new(SystemArpSource))
    }

    /// Resolver with a custom ARP text source (used by tests).
    pub fn with_arp_source(arp: Box<dyn ArpTableSource>) -> Self {
        let resolver =
            TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default());
        Self { resolver, arp }
    }

    /// Enrich a host in place. Idempotent: populated fields are kept.
    pub async fn enrich(&self, host: &Host) {
        let addr = host.address();

        if host.snapshot().hostname.is_none() {
            if let Some(name) = self.reverse_hostname(addr).await {
                host.fill_hostname(name);
            }
        }

        if host.snapshot().mac_address.is_none() {
            if let Some(mac) = self.lookup_mac(addr).await {
                host.fill_mac(mac);
            }
        }
    }

    /// PTR lookup for an address. `None` when no name exists - which is
    /// common on a LAN and not an error.
    async fn reverse_hostname(&self, addr: Ipv4Addr) -> Option<String> {
        match self.resolver.reverse_lookup(IpAddr::V4(addr)).await {
            Ok(lookup) => lookup
                .iter()
                .next()
                .map(|name| name.to_utf8().trim_end_matches('.').to_string()),
            Err(e) => {
                debug!("reverse lookup for {addr} failed: {e}");
                None
            }
        }
    }

    /// ARP-table lookup for an address.
    async fn lookup_mac(&self, addr: Ipv4Addr) -> Option<String> {
        let table = self.arp.arp_table().await?;
        parse_mac_for(&table, addr)
    }
}

impl Default for AddressResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedArp(&'static str);

    #[async_trait]
    impl ArpTableSource for FixedArp {
        async fn arp_table(&self) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    struct NoArp;

    #[async_trait]
    impl ArpTableSource for NoArp {
        async fn arp_table(&self) -> Option<String> {
            None
        }
    }

    const TABLE: &str = "192.168.1.50   aa-bb-cc-dd-ee-01   dynamic\n";

    #[tokio::test]
    async fn test_mac_enrichment_from_injected_table() {
        let resolver = AddressResolver::with_arp_source(Box::new(FixedArp(TABLE)));
        let host = Host::new(Ipv4Addr::new(192, 168, 1, 50));

        if let Some(mac) = resolver.lookup_mac(host.address()).await {
            host.fill_mac(mac);
        }
        assert_eq!(
            host.snapshot().mac_address.as_deref(),
            Some("aa:bb:cc:dd:ee:01")
        );
    }

    #[tokio::test]
    async fn test_enrichment_is_idempotent() {
        let resolver = AddressResolver::with_arp_source(Box::new(FixedArp(TABLE)));
        let host = Host::new(Ipv4Addr::new(192, 168, 1, 50));
        host.fill_hostname("known.local");
        host.fill_mac("11:22:33:44:55:66");

        resolver.enrich(&host).await;

        let snap = host.snapshot();
        assert_eq!(snap.hostname.as_deref(), Some("known.local"));
        assert_eq!(snap.mac_address.as_deref(), Some("11:22:33:44:55:66"));
    }

    #[tokio::test]
    async fn test_missing_arp_source_leaves_field_unset() {
        let resolver = AddressResolver::with_arp_source(Box::new(NoArp));
        let host = Host::new(Ipv4Addr::new(192, 168, 1, 50));
        host.record_probe(true, Some(1));

        assert_eq!(resolver.lookup_mac(host.address()).await, None);
        assert_eq!(host.snapshot().mac_address, None);
        // A failed resolution never flips reachability.
        assert!(host.is_reachable());
    }
}
