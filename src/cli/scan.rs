//! Scan subcommand implementation.
//!
//! Handles `soundline scan [SUBNETS]`: sweep, enrich, print, and
//! optionally keep a periodic re-probe running.

use crate::cli::OutputFormat;
use crate::config::AppSettings;
use crate::error::{CliError, CliResult};
use crate::netinfo;
use crate::output::{self, ScanReport};
use crate::scanner::SweepConfig;
use crate::session::ScanSession;
use crate::types::SubnetSpec;
use clap::Parser;
use std::time::Duration;

/// Sweep subnets for live hosts.
#[derive(Parser, Debug)]
pub struct ScanCommand {
    /// Comma-separated /24 subnets (e.g. "192.168.1,10.0.0.0/24").
    /// When omitted, the subnet of the first usable /24 interface is used.
    #[arg(value_name = "SUBNETS")]
    pub subnets: Option<String>,

    /// Per-probe timeout in milliseconds
    #[arg(short = 't', long)]
    pub timeout: Option<u64>,

    /// Output format for results
    #[arg(short, long, value_enum, default_value = "plain")]
    pub output: OutputFormat,

    /// Keep re-probing the discovered hosts and re-printing
    #[arg(short, long)]
    pub watch: bool,

    /// Re-probe interval in seconds (with --watch)
    #[arg(long, value_name = "SECS")]
    pub interval: Option<u64>,
}

impl ScanCommand {
    /// Execute the scan command.
    pub async fn execute(&self, settings: &AppSettings, quiet: bool) -> CliResult<()> {
        let subnets = self.working_set(quiet)?;
        if subnets.is_empty() {
            let report = ScanReport::new(Vec::new(), Vec::new());
            output::print_report(&report, self.output)?;
            return Ok(());
        }

        let timeout = Duration::from_millis(self.timeout.unwrap_or(settings.sweep_timeout_ms));
        let mut sweep = SweepConfig {
            probe_timeout: timeout,
            concurrency: settings.sweep_concurrency,
            subnet_concurrency: settings.subnet_concurrency,
            progress: false,
        };
        if !quiet && self.output == OutputFormat::Plain {
            sweep = sweep.with_progress();
        }

        let mut session = ScanSession::new(sweep);
        let hosts = session.scan(&subnets).await;

        let prefixes: Vec<String> = subnets.iter().map(|s| s.prefix()).collect();
        let print = |hosts: &[std::sync::Arc<crate::types::Host>]| -> CliResult<()> {
            let snapshots = hosts.iter().map(|h| h.snapshot()).collect();
            let report = ScanReport::new(prefixes.clone(), snapshots);
            output::print_report(&report, self.output)?;
            Ok(())
        };
        print(&hosts)?;

        if self.watch {
            let interval =
                Duration::from_secs(self.interval.unwrap_or(settings.watch_interval_secs).max(1));
            let watched: Vec<_> = hosts.iter().filter(|h| h.is_reachable()).cloned().collect();
            session.watch(watched, interval);
            if !quiet {
                output::print_info("re-probing; press Ctrl-C to stop");
            }

            loop {
                tokio::select! {
                    _ = tokio::time::sleep(interval) => print(&hosts)?,
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
            session.stop();
        }

        Ok(())
    }

    /// Resolve the subnet working set from the argument or the local
    /// interface configuration.
    fn working_set(&self, quiet: bool) -> CliResult<Vec<SubnetSpec>> {
        if let Some(ref raw) = self.subnets {
            let specs = SubnetSpec::parse_list(raw);
            if specs.is_empty() && !quiet {
                output::print_warning("no valid /24 subnet in the given list");
            }
            return Ok(specs);
        }

        match netinfo::local_subnet() {
            Some(spec) => Ok(vec![spec]),
            None => Err(CliError::Other(
                "no /24 interface found; pass a subnet explicitly".to_string(),
            )),
        }
    }
}
