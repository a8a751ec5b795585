//! Subnet specifications and host-range expansion.
//!
//! A [`SubnetSpec`] names a /24 network by its three leading octets
//! (`"192.168.1"`). Input is permissive about the common ways people
//! write a /24 - `"192.168.1.0/24"`, `"192.168.1."`, `"192.168.1"` all
//! normalize to the same spec - but anything that is not three in-range
//! octets is rejected before scanning begins.

use serde::Serialize;
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// First host id swept in a /24 (network address excluded).
const HOST_RANGE_START: u8 = 1;
/// Last host id swept in a /24 (broadcast address excluded).
const HOST_RANGE_END: u8 = 254;

/// Error type for subnet parsing.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SubnetError {
    #[error("invalid subnet prefix: {0}")]
    InvalidPrefix(String),
}

/// A validated 3-octet /24 prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct SubnetSpec {
    octets: [u8; 3],
}

impl SubnetSpec {
    /// Build a spec from its three leading octets.
    pub fn new(a: u8, b: u8, c: u8) -> Self {
        Self { octets: [a, b, c] }
    }

    /// Parse a single subnet token.
    ///
    /// Accepted shapes: `"a.b.c"`, `"a.b.c."`, `"a.b.c.0/24"`. Each octet
    /// must be 0-255; anything else is an error.
    pub fn parse(input: &str) -> Result<Self, SubnetError> {
        let mut s = input.trim();
        if let Some(stripped) = s.strip_suffix("/24") {
            s = stripped;
            s = s.strip_suffix(".0").unwrap_or(s);
        }
        s = s.strip_suffix('.').unwrap_or(s);

        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 3 {
            return Err(SubnetError::InvalidPrefix(input.to_string()));
        }

        let mut octets = [0u8; 3];
        for (i, part) in parts.iter().enumerate() {
            octets[i] = part
                .parse::<u8>()
                .map_err(|_| SubnetError::InvalidPrefix(input.to_string()))?;
        }

        Ok(Self { octets })
    }

    /// Parse a comma-separated list of subnet tokens.
    ///
    /// Malformed tokens are dropped from the working set rather than
    /// rejected; an input with no valid token yields an empty list.
    pub fn parse_list(input: &str) -> Vec<Self> {
        input
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .filter_map(|t| Self::parse(t).ok())
            .collect()
    }

    /// Derive the spec covering an address, for /24 prefixes only.
    pub fn containing(addr: Ipv4Addr, prefix_len: u8) -> Option<Self> {
        if prefix_len != 24 {
            return None;
        }
        let [a, b, c, _] = addr.octets();
        Some(Self::new(a, b, c))
    }

    /// The dotted 3-octet prefix, e.g. `"192.168.1"`.
    pub fn prefix(&self) -> String {
        format!("{}.{}.{}", self.octets[0], self.octets[1], self.octets[2])
    }

    /// Lazily expand to the 254 host addresses of this /24, ascending.
    pub fn hosts(&self) -> impl Iterator<Item = Ipv4Addr> + '_ {
        let [a, b, c] = self.octets;
        (HOST_RANGE_START..=HOST_RANGE_END).map(move |d| Ipv4Addr::new(a, b, c, d))
    }

    /// Number of hosts a sweep of this subnet probes.
    pub fn host_count(&self) -> usize {
        (HOST_RANGE_END - HOST_RANGE_START + 1) as usize
    }
}

impl FromStr for SubnetSpec {
    type Err = SubnetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SubnetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

impl From<SubnetSpec> for String {
    fn from(spec: SubnetSpec) -> Self {
        spec.prefix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization() {
        for input in ["192.168.1", "192.168.1.", "192.168.1.0/24"] {
            let spec = SubnetSpec::parse(input).unwrap();
            assert_eq!(spec.prefix(), "192.168.1", "input {input:?}");
        }
    }

    #[test]
    fn test_rejects_wrong_octet_count() {
        assert!(SubnetSpec::parse("10.0").is_err());
        assert!(SubnetSpec::parse("10.0.0.1").is_err());
        assert!(SubnetSpec::parse("").is_err());
    }

    #[test]
    fn test_rejects_out_of_range_octets() {
        assert!(SubnetSpec::parse("192.168.256").is_err());
        assert!(SubnetSpec::parse("192.-1.0").is_err());
        assert!(SubnetSpec::parse("a.b.c").is_err());
    }

    #[test]
    fn test_expansion_is_254_ascending() {
        let spec = SubnetSpec::parse("10.0.0").unwrap();
        let hosts: Vec<Ipv4Addr> = spec.hosts().collect();
        assert_eq!(hosts.len(), 254);
        assert_eq!(hosts[0], Ipv4Addr::new(10, 0, 0, 1));
        assert_eq!(hosts[253], Ipv4Addr::new(10, 0, 0, 254));
        assert!(hosts.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_parse_list_drops_bad_tokens() {
        let specs = SubnetSpec::parse_list("192.168.1, 10.0, , 10.0.1.0/24");
        let prefixes: Vec<String> = specs.iter().map(|s| s.prefix()).collect();
        assert_eq!(prefixes, vec!["192.168.1", "10.0.1"]);
    }

    #[test]
    fn test_containing_only_for_slash_24() {
        let addr = Ipv4Addr::new(172, 16, 4, 77);
        assert_eq!(
            SubnetSpec::containing(addr, 24).map(|s| s.prefix()),
            Some("172.16.4".to_string())
        );
        assert_eq!(SubnetSpec::containing(addr, 16), None);
        assert_eq!(SubnetSpec::containing(addr, 25), None);
    }
}
