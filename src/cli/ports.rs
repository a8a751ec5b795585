//! Ports subcommand implementation.
//!
//! Handles `soundline ports <HOST>`: dual-strategy port scan of one
//! host, external tool first, raw connect probing as fallback.

use crate::cli::OutputFormat;
use crate::config::AppSettings;
use crate::error::{CliError, CliResult};
use crate::output;
use crate::scanner::PortScanConfig;
use crate::session::ScanSession;
use crate::types::PortSpec;
use clap::Parser;
use std::net::Ipv4Addr;
use std::time::Duration;

/// Scan a host for open ports.
#[derive(Parser, Debug)]
pub struct PortsCommand {
    /// Target host address (dotted IPv4)
    #[arg(value_name = "HOST")]
    pub host: String,

    /// Ports to scan (e.g. "80", "22,80,443", "8000-8100"); defaults to
    /// a small set of common ports
    #[arg(short, long)]
    pub ports: Option<String>,

    /// Per-connection timeout in milliseconds (raw probe tier)
    #[arg(short = 't', long)]
    pub timeout: Option<u64>,

    /// Connection attempts per second, 0 for unlimited (raw probe tier)
    #[arg(short = 'r', long = "rate")]
    pub rate_limit: Option<u32>,

    /// Skip the external scan tool and probe directly
    #[arg(long)]
    pub no_tool: bool,

    /// Output format for results
    #[arg(short, long, value_enum, default_value = "plain")]
    pub output: OutputFormat,
}

impl PortsCommand {
    /// Execute the ports command.
    pub async fn execute(&self, settings: &AppSettings, quiet: bool) -> CliResult<()> {
        let addr: Ipv4Addr = self
            .host
            .trim()
            .parse()
            .map_err(|_| CliError::Other(format!("not an IPv4 address: {}", self.host)))?;

        let spec = PortSpec::parse(self.ports.as_deref());
        if spec.is_empty() {
            if !quiet {
                output::print_warning("no valid port in the given specification");
            }
            output::print_ports(&self.host, &[], self.output)?;
            return Ok(());
        }

        let config = PortScanConfig {
            connect_timeout: Duration::from_millis(
                self.timeout.unwrap_or(settings.connect_timeout_ms),
            ),
            concurrency: settings.port_concurrency,
            rate_limit: self.rate_limit.unwrap_or(settings.default_rate_limit),
            skip_tool: self.no_tool,
        };

        let session = ScanSession::default();
        let results = session.scan_host_ports(addr, &spec, &config).await;
        output::print_ports(&self.host, &results, self.output)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_flags() {
        let cmd =
            PortsCommand::try_parse_from(["ports", "10.0.0.5", "-p", "22,80", "-r", "200"])
                .unwrap();
        assert_eq!(cmd.host, "10.0.0.5");
        assert_eq!(cmd.ports.as_deref(), Some("22,80"));
        assert_eq!(cmd.rate_limit, Some(200));
    }

    #[tokio::test]
    async fn test_rejects_non_ipv4_host() {
        let cmd = PortsCommand::try_parse_from(["ports", "not-a-host"]).unwrap();
        let result = cmd.execute(&AppSettings::default(), true).await;
        assert!(matches!(result, Err(CliError::Other(_))));
    }
}
