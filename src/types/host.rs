//! The `Host` record: one probed address and its discovery state.
//!
//! The address is the stable identity of a host and never changes after
//! creation. Everything else (reachability, latency, hostname, MAC) is
//! updated in place as probe results arrive, so every holder of the same
//! `Arc<Host>` observes updates. Readers that need a consistent view take
//! a [`HostSnapshot`] under the lock instead of reading fields piecemeal.

use serde::Serialize;
use std::fmt;
use std::net::Ipv4Addr;
use std::sync::Mutex;

/// Mutable per-host probe state, guarded by the host's lock.
#[derive(Debug, Default, Clone)]
struct HostState {
    reachable: bool,
    hostname: Option<String>,
    mac_address: Option<String>,
    latency_ms: Option<u64>,
}

/// A single probed address.
///
/// Created unreachable; mutated by the prober and the resolver on every
/// scan or re-probe pass. Invariant: an unreachable host never carries a
/// latency value.
#[derive(Debug)]
pub struct Host {
    address: Ipv4Addr,
    state: Mutex<HostState>,
}

impl Host {
    /// Create a new, not-yet-probed host.
    pub fn new(address: Ipv4Addr) -> Self {
        Self {
            address,
            state: Mutex::new(HostState::default()),
        }
    }

    /// The host's address. Stable for the lifetime of the record.
    pub fn address(&self) -> Ipv4Addr {
        self.address
    }

    /// Whether the last probe found the host reachable.
    pub fn is_reachable(&self) -> bool {
        self.state.lock().unwrap().reachable
    }

    /// Record the outcome of a reachability probe.
    ///
    /// Latency is retained only for reachable outcomes; marking a host
    /// unreachable clears any previous latency.
    pub fn record_probe(&self, reachable: bool, latency_ms: Option<u64>) {
        let mut state = self.state.lock().unwrap();
        state.reachable = reachable;
        state.latency_ms = if reachable { latency_ms } else { None };
    }

    /// Set the hostname if it is not already populated.
    ///
    /// Returns `true` if the field was written. Enrichment only fills
    /// blanks; it never replaces an existing value.
    pub fn fill_hostname(&self, hostname: impl Into<String>) -> bool {
        let mut state = self.state.lock().unwrap();
        if state.hostname.is_none() {
            let name = hostname.into();
            if !name.is_empty() {
                state.hostname = Some(name);
                return true;
            }
        }
        false
    }

    /// Set the MAC address if it is not already populated.
    ///
    /// Returns `true` if the field was written.
    pub fn fill_mac(&self, mac: impl Into<String>) -> bool {
        let mut state = self.state.lock().unwrap();
        if state.mac_address.is_none() {
            let mac = mac.into();
            if !mac.is_empty() {
                state.mac_address = Some(mac);
                return true;
            }
        }
        false
    }

    /// Take a consistent snapshot of the host's current state.
    pub fn snapshot(&self) -> HostSnapshot {
        let state = self.state.lock().unwrap();
        HostSnapshot {
            address: self.address,
            reachable: state.reachable,
            hostname: state.hostname.clone(),
            mac_address: state.mac_address.clone(),
            latency_ms: state.latency_ms,
        }
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snap = self.snapshot();
        write!(f, "{}", snap)
    }
}

/// An immutable, serializable view of a host at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostSnapshot {
    /// The probed address.
    pub address: Ipv4Addr,
    /// Whether the last probe succeeded.
    pub reachable: bool,
    /// Reverse-resolved name, if one was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Link-layer address from the ARP table, lowercase colon form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    /// Round-trip time of the last successful probe.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

impl fmt::Display for HostSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)?;
        if let Some(ref name) = self.hostname {
            write!(f, " ({})", name)?;
        }
        if self.reachable {
            match self.latency_ms {
                Some(ms) => write!(f, " | reachable | {} ms", ms),
                None => write!(f, " | reachable"),
            }
        } else {
            write!(f, " | unreachable")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> Host {
        Host::new(Ipv4Addr::new(192, 168, 1, 10))
    }

    #[test]
    fn test_new_host_is_unreachable() {
        let h = host();
        assert!(!h.is_reachable());
        assert_eq!(h.snapshot().latency_ms, None);
    }

    #[test]
    fn test_unreachable_never_keeps_latency() {
        let h = host();
        h.record_probe(true, Some(12));
        assert_eq!(h.snapshot().latency_ms, Some(12));

        h.record_probe(false, Some(40));
        let snap = h.snapshot();
        assert!(!snap.reachable);
        assert_eq!(snap.latency_ms, None);
    }

    #[test]
    fn test_fill_only_writes_blanks() {
        let h = host();
        assert!(h.fill_hostname("printer.local"));
        assert!(!h.fill_hostname("other.local"));
        assert_eq!(h.snapshot().hostname.as_deref(), Some("printer.local"));

        assert!(h.fill_mac("aa:bb:cc:dd:ee:ff"));
        assert!(!h.fill_mac("11:22:33:44:55:66"));
        assert_eq!(h.snapshot().mac_address.as_deref(), Some("aa:bb:cc:dd:ee:ff"));
    }

    #[test]
    fn test_fill_ignores_empty_values() {
        let h = host();
        assert!(!h.fill_hostname(""));
        assert_eq!(h.snapshot().hostname, None);
    }

    #[test]
    fn test_display_formats() {
        let h = host();
        h.record_probe(true, Some(3));
        h.fill_hostname("nas");
        assert_eq!(h.to_string(), "192.168.1.10 (nas) | reachable | 3 ms");
    }
}
