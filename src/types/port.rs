//! Permissive port-specification parsing.
//!
//! The grammar accepts comma-separated singles and `a-b` ranges. Parsing
//! is permissive rather than validating: malformed or out-of-range tokens
//! are silently dropped, ranges are normalized so start <= end and clamped
//! into the valid port range, and duplicates are removed while keeping
//! first-occurrence order. A blank or absent specification resolves to a
//! small default set of ports worth checking on a LAN host.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Ports scanned when no specification is given.
pub const DEFAULT_PORTS: [u16; 6] = [22, 80, 443, 3389, 5900, 8080];

/// A parsed, deduplicated, order-preserving list of target ports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PortSpec {
    ports: Vec<u16>,
    #[serde(skip)]
    from_default: bool,
}

impl PortSpec {
    /// Parse a textual specification.
    ///
    /// `None` or blank input resolves to [`DEFAULT_PORTS`]. Non-blank
    /// input that yields no valid port produces an *empty* spec - "the
    /// user asked for something specific and it was all invalid" is not
    /// the same as "the user asked for nothing".
    pub fn parse(spec: Option<&str>) -> Self {
        let text = match spec {
            Some(s) if !s.trim().is_empty() => s,
            _ => return Self::default_set(),
        };

        let mut seen = HashSet::new();
        let mut ports = Vec::new();
        let mut push = |p: u16| {
            if seen.insert(p) {
                ports.push(p);
            }
        };

        for token in text.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            if let Some((lo, hi)) = token.split_once('-') {
                let (Ok(lo), Ok(hi)) = (lo.trim().parse::<u32>(), hi.trim().parse::<u32>())
                else {
                    continue;
                };
                let (start, end) = if lo <= hi { (lo, hi) } else { (hi, lo) };
                let start = start.max(1);
                let end = end.min(u16::MAX as u32);
                for p in start..=end {
                    push(p as u16);
                }
            } else if let Ok(p) = token.parse::<u32>() {
                if (1..=u16::MAX as u32).contains(&p) {
                    push(p as u16);
                }
            }
        }

        Self {
            ports,
            from_default: false,
        }
    }

    /// The default port set.
    pub fn default_set() -> Self {
        Self {
            ports: DEFAULT_PORTS.to_vec(),
            from_default: true,
        }
    }

    /// The parsed ports, in first-occurrence order.
    pub fn ports(&self) -> &[u16] {
        &self.ports
    }

    /// Whether this spec came from the default set rather than user text.
    pub fn is_default(&self) -> bool {
        self.from_default
    }

    /// True when no valid port survived parsing.
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// Number of target ports.
    pub fn len(&self) -> usize {
        self.ports.len()
    }
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.ports.iter().map(u16::to_string).collect();
        write!(f, "{}", parts.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singles_and_ranges_keep_first_occurrence_order() {
        let spec = PortSpec::parse(Some("22,80-82,80"));
        assert_eq!(spec.ports(), &[22, 80, 81, 82]);
        assert!(!spec.is_default());
    }

    #[test]
    fn test_blank_and_absent_resolve_to_defaults() {
        assert_eq!(PortSpec::parse(None).ports(), &DEFAULT_PORTS);
        assert_eq!(PortSpec::parse(Some("")).ports(), &DEFAULT_PORTS);
        assert_eq!(PortSpec::parse(Some("   ")).ports(), &DEFAULT_PORTS);
        assert!(PortSpec::parse(None).is_default());
    }

    #[test]
    fn test_out_of_range_single_yields_empty() {
        let spec = PortSpec::parse(Some("70000"));
        assert!(spec.is_empty());
        assert!(!spec.is_default());
    }

    #[test]
    fn test_reversed_range_is_normalized() {
        let spec = PortSpec::parse(Some("85-81"));
        assert_eq!(spec.ports(), &[81, 82, 83, 84, 85]);
    }

    #[test]
    fn test_range_clamped_into_valid_ports() {
        let spec = PortSpec::parse(Some("0-3"));
        assert_eq!(spec.ports(), &[1, 2, 3]);

        let spec = PortSpec::parse(Some("65534-65600"));
        assert_eq!(spec.ports(), &[65534, 65535]);
    }

    #[test]
    fn test_garbage_tokens_are_dropped() {
        let spec = PortSpec::parse(Some("22,,abc,80-x,443"));
        assert_eq!(spec.ports(), &[22, 443]);
    }

    #[test]
    fn test_display_round_trip() {
        let spec = PortSpec::parse(Some("443,22"));
        assert_eq!(spec.to_string(), "443,22");
    }
}
