//! ARP table acquisition and parsing.
//!
//! The platform's `arp` dump maps local IPv4 addresses to link-layer
//! addresses. Row shapes vary by OS but share a core of
//! `<ipv4> ... <six hex pairs> ...` with `:` or `-` separators; the
//! parser extracts that core and ignores everything else. Acquisition is
//! a capability trait so tests (and other platforms) can inject text.

use async_trait::async_trait;
use std::net::Ipv4Addr;
use tokio::process::Command;
use tracing::debug;

/// Provides the raw ARP table text, best-effort.
#[async_trait]
pub trait ArpTableSource: Send + Sync {
    /// The raw table dump, or `None` when it could not be obtained.
    async fn arp_table(&self) -> Option<String>;
}

/// Acquires the ARP table by running the platform `arp` command.
#[derive(Debug, Default)]
pub struct SystemArpSource;

#[async_trait]
impl ArpTableSource for SystemArpSource {
    async fn arp_table(&self) -> Option<String> {
        let args: &[&str] = if cfg!(target_os = "linux") {
            &["-n"]
        } else {
            &["-a"]
        };
        match Command::new("arp").args(args).output().await {
            Ok(output) => Some(String::from_utf8_lossy(&output.stdout).into_owned()),
            Err(e) => {
                debug!("arp table dump unavailable: {e}");
                None
            }
        }
    }
}

/// Find the MAC address for `addr` in an ARP table dump.
///
/// Returns the first matching row's MAC, normalized to lowercase colon
/// form, or `None` when the address has no entry.
pub fn parse_mac_for(text: &str, addr: Ipv4Addr) -> Option<String> {
    let needle = addr.to_string();
    for line in text.lines() {
        let mut row_ip = None;
        let mut row_mac = None;
        for token in line.split_whitespace() {
            // macOS wraps the address in parentheses: "? (10.0.0.1) at ..."
            let token = token.trim_matches(|c| c == '(' || c == ')');
            if row_ip.is_none() && token.parse::<Ipv4Addr>().is_ok() {
                row_ip = Some(token.to_string());
            } else if row_mac.is_none() {
                row_mac = normalize_mac(token);
            }
            if row_ip.is_some() && row_mac.is_some() {
                break;
            }
        }
        if let (Some(ip), Some(mac)) = (row_ip, row_mac) {
            if ip == needle {
                return Some(mac);
            }
        }
    }
    None
}

/// Validate and normalize a MAC token to lowercase colon-delimited form.
///
/// Accepts six hex pairs separated by `:` or `-`; incomplete entries and
/// the all-zero placeholder are rejected.
pub fn normalize_mac(token: &str) -> Option<String> {
    let sep = if token.contains(':') {
        ':'
    } else if token.contains('-') {
        '-'
    } else {
        return None;
    };

    let pairs: Vec<&str> = token.split(sep).collect();
    if pairs.len() != 6 {
        return None;
    }
    if !pairs
        .iter()
        .all(|p| p.len() == 2 && p.chars().all(|c| c.is_ascii_hexdigit()))
    {
        return None;
    }

    let mac = pairs.join(":").to_ascii_lowercase();
    if mac == "00:00:00:00:00:00" {
        return None;
    }
    Some(mac)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOWS_DUMP: &str = "\
Interface: 192.168.1.5 --- 0x8
  Internet Address      Physical Address      Type
  192.168.1.1           70-4F-57-12-34-56     dynamic
  192.168.1.3           d4-3b-04-12-34-56     dynamic
  192.168.1.255         ff-ff-ff-ff-ff-ff     static
";

    const LINUX_DUMP: &str = "\
Address                  HWtype  HWaddress           Flags Mask            Iface
192.168.1.1              ether   70:4f:57:12:34:56   C                     eth0
192.168.1.9              ether   aa:bb:cc:00:11:22   C                     eth0
";

    const MACOS_DUMP: &str = "\
? (192.168.1.1) at 70:4f:57:12:34:56 on en0 ifscope [ethernet]
? (192.168.1.77) at (incomplete) on en0 ifscope [ethernet]
";

    #[test]
    fn test_windows_rows_normalize_to_colons() {
        let mac = parse_mac_for(WINDOWS_DUMP, Ipv4Addr::new(192, 168, 1, 1));
        assert_eq!(mac.as_deref(), Some("70:4f:57:12:34:56"));
    }

    #[test]
    fn test_linux_rows() {
        let mac = parse_mac_for(LINUX_DUMP, Ipv4Addr::new(192, 168, 1, 9));
        assert_eq!(mac.as_deref(), Some("aa:bb:cc:00:11:22"));
    }

    #[test]
    fn test_macos_rows_and_incomplete_entries() {
        let mac = parse_mac_for(MACOS_DUMP, Ipv4Addr::new(192, 168, 1, 1));
        assert_eq!(mac.as_deref(), Some("70:4f:57:12:34:56"));

        assert_eq!(parse_mac_for(MACOS_DUMP, Ipv4Addr::new(192, 168, 1, 77)), None);
    }

    #[test]
    fn test_missing_address() {
        assert_eq!(parse_mac_for(WINDOWS_DUMP, Ipv4Addr::new(10, 0, 0, 1)), None);
    }

    #[test]
    fn test_normalize_mac_rejects_junk() {
        assert_eq!(normalize_mac("dynamic"), None);
        assert_eq!(normalize_mac("70-4f-57-12-34"), None);
        assert_eq!(normalize_mac("70:4f:57:12:34:5g"), None);
        assert_eq!(normalize_mac("00:00:00:00:00:00"), None);
        assert_eq!(
            normalize_mac("AA-BB-CC-DD-EE-FF").as_deref(),
            Some("aa:bb:cc:dd:ee:ff")
        );
    }
}
