//! Default-gateway extraction from platform route/configuration text.
//!
//! Some platforms print the gateway's IPv4 address on the labeled line
//! itself; Windows `ipconfig /all` often prints an IPv6 value there and
//! the IPv4 value indented on a following line. The parser handles both:
//! a label line with an IPv4 token wins immediately, otherwise scanning
//! continues into the adapter's continuation lines until an IPv4 token,
//! a blank line (end of adapter section), or a line that starts a new
//! `field:` entry.

use std::net::Ipv4Addr;
use tokio::process::Command;
use tracing::debug;

/// Labels that mark the gateway line across supported platforms.
const GATEWAY_LABELS: [&str; 3] = ["default gateway", "default via", "gateway:"];

/// Extract the default gateway address from route/configuration text.
pub fn parse_default_gateway(text: &str) -> Option<Ipv4Addr> {
    let mut continuation = false;

    for line in text.lines() {
        let lower = line.to_ascii_lowercase();
        if GATEWAY_LABELS.iter().any(|label| lower.contains(label)) {
            if let Some(addr) = first_ipv4_token(line) {
                return Some(addr);
            }
            // No IPv4 on the label line; the value may follow indented.
            continuation = true;
            continue;
        }

        if continuation {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                // Blank line ends this adapter's section.
                continuation = false;
                continue;
            }
            if let Some(addr) = first_ipv4_token(trimmed) {
                return Some(addr);
            }
            if trimmed.contains(':') {
                // Looks like the start of a new field.
                continuation = false;
            }
        }
    }

    None
}

/// First token on the line that parses as an IPv4 address.
fn first_ipv4_token(line: &str) -> Option<Ipv4Addr> {
    line.split_whitespace()
        .find_map(|token| token.parse::<Ipv4Addr>().ok())
}

/// Query the platform for its default gateway.
///
/// Runs the platform route-dump command and parses its output. Any
/// failure - command missing, non-UTF8 output, no gateway line - yields
/// `None`, never an error.
pub async fn system_default_gateway() -> Option<Ipv4Addr> {
    let (program, args): (&str, &[&str]) = if cfg!(target_os = "windows") {
        ("ipconfig", &["/all"])
    } else if cfg!(target_os = "macos") {
        ("route", &["-n", "get", "default"])
    } else {
        ("ip", &["route", "show", "default"])
    };

    match Command::new(program).args(args).output().await {
        Ok(output) => parse_default_gateway(&String::from_utf8_lossy(&output.stdout)),
        Err(e) => {
            debug!("route dump unavailable: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ipv4_on_label_line_wins() {
        let text = "\
   Default Gateway . . . . . . . . . : 192.168.1.1
";
        assert_eq!(
            parse_default_gateway(text),
            Some(Ipv4Addr::new(192, 168, 1, 1))
        );
    }

    #[test]
    fn test_ipv6_then_indented_ipv4_continuation() {
        let text = "\
   Default Gateway . . . . . . . . . : fe80::1%12
                                       192.168.1.254
";
        assert_eq!(
            parse_default_gateway(text),
            Some(Ipv4Addr::new(192, 168, 1, 254))
        );
    }

    #[test]
    fn test_blank_line_abandons_continuation() {
        let text = "\
   Default Gateway . . . . . . . . . : fe80::1%12

   DHCP Server . . . . . . . . . . . : 192.168.1.2
";
        assert_eq!(parse_default_gateway(text), None);
    }

    #[test]
    fn test_new_field_abandons_continuation() {
        let text = "\
   Default Gateway . . . . . . . . . : fe80::1%12
   NetBIOS over Tcpip. . . . . . . . : Enabled
   Something unlabeled with 10.0.0.9 in it
";
        assert_eq!(parse_default_gateway(text), None);
    }

    #[test]
    fn test_linux_route_output() {
        let text = "default via 10.0.0.1 dev eth0 proto dhcp metric 100\n";
        assert_eq!(parse_default_gateway(text), Some(Ipv4Addr::new(10, 0, 0, 1)));
    }

    #[test]
    fn test_macos_route_output() {
        let text = "\
   route to: default
destination: default
       mask: default
    gateway: 192.168.4.1
  interface: en0
";
        assert_eq!(
            parse_default_gateway(text),
            Some(Ipv4Addr::new(192, 168, 4, 1))
        );
    }

    #[test]
    fn test_no_gateway_line() {
        assert_eq!(parse_default_gateway("no routes here\n"), None);
    }
}
