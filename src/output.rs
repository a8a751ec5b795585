//! Output formatting module.
//!
//! Formatters for plain text, JSON, and CSV emission of discovery and
//! port-scan results. JSON and CSV go to stdout uncolored so they pipe
//! cleanly; plain text uses console styling.

use crate::cli::OutputFormat;
use crate::netinfo::InterfaceDescriptor;
use crate::scanner::PortResult;
use crate::types::HostSnapshot;
use chrono::{DateTime, Utc};
use console::style;
use serde::Serialize;
use std::io::{self, Write};

/// A discovery result set as emitted to the user.
#[derive(Debug, Serialize)]
pub struct ScanReport {
    /// When the report was produced.
    pub scanned_at: DateTime<Utc>,
    /// Subnet prefixes covered by the sweep.
    pub subnets: Vec<String>,
    /// Snapshot per host, reachable ones only.
    pub hosts: Vec<HostSnapshot>,
}

impl ScanReport {
    /// Build a report from host snapshots, keeping reachable hosts and
    /// ordering them by address for stable output.
    pub fn new(subnets: Vec<String>, mut hosts: Vec<HostSnapshot>) -> Self {
        hosts.retain(|h| h.reachable);
        hosts.sort_by_key(|h| h.address);
        Self {
            scanned_at: Utc::now(),
            subnets,
            hosts,
        }
    }
}

/// Print a discovery report in the requested format.
pub fn print_report(report: &ScanReport, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Plain => print_report_plain(report),
        OutputFormat::Json => print_json(report),
        OutputFormat::Csv => print_report_csv(report),
    }
}

fn print_report_plain(report: &ScanReport) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out)?;
    writeln!(
        out,
        "  {} {} on {}",
        style("Discovered").green().bold(),
        format_args!("{} host(s)", report.hosts.len()),
        report.subnets.join(", ")
    )?;
    writeln!(out)?;

    for host in &report.hosts {
        let name = host.hostname.as_deref().unwrap_or("-");
        let mac = host.mac_address.as_deref().unwrap_or("-");
        let latency = host
            .latency_ms
            .map(|ms| format!("{ms} ms"))
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            out,
            "  {:<15}  {:<24}  {:<17}  {}",
            style(host.address).cyan(),
            name,
            mac,
            latency
        )?;
    }

    Ok(())
}

fn print_report_csv(report: &ScanReport) -> io::Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer
        .write_record(["address", "hostname", "mac_address", "latency_ms"])
        .map_err(io::Error::other)?;
    for host in &report.hosts {
        writer
            .write_record([
                host.address.to_string(),
                host.hostname.clone().unwrap_or_default(),
                host.mac_address.clone().unwrap_or_default(),
                host.latency_ms.map(|ms| ms.to_string()).unwrap_or_default(),
            ])
            .map_err(io::Error::other)?;
    }
    writer.flush()
}

/// Print port-scan results in the requested format.
pub fn print_ports(host: &str, results: &[PortResult], format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Plain => print_ports_plain(host, results),
        OutputFormat::Json => print_json(&results),
        OutputFormat::Csv => print_ports_csv(results),
    }
}

fn print_ports_plain(host: &str, results: &[PortResult]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out)?;
    if results.is_empty() {
        writeln!(out, "  No open ports found on {}", style(host).cyan())?;
        return Ok(());
    }

    writeln!(
        out,
        "  {} open port(s) on {}",
        style(results.len()).green().bold(),
        style(host).cyan()
    )?;
    for result in results {
        writeln!(
            out,
            "    {:>5}/{:<4}  {}",
            style(result.port).green(),
            result.protocol,
            result.service
        )?;
    }

    Ok(())
}

fn print_ports_csv(results: &[PortResult]) -> io::Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer
        .write_record(["port", "protocol", "service"])
        .map_err(io::Error::other)?;
    for result in results {
        writer
            .write_record([
                result.port.to_string(),
                result.protocol.clone(),
                result.service.to_string(),
            ])
            .map_err(io::Error::other)?;
    }
    writer.flush()
}

/// Print the interface listing.
pub fn print_interfaces(
    interfaces: &[InterfaceDescriptor],
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Plain => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for iface in interfaces {
                let subnet = iface
                    .subnet()
                    .map(|s| format!("sweepable /24: {}", s.prefix()))
                    .unwrap_or_else(|| "no sweepable subnet".to_string());
                writeln!(out, "  {}  ({})", iface, style(subnet).dim())?;
            }
            Ok(())
        }
        OutputFormat::Json => print_json(&interfaces),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(io::stdout());
            writer
                .write_record(["system_name", "display_name", "ipv4", "prefix_len"])
                .map_err(io::Error::other)?;
            for iface in interfaces {
                writer
                    .write_record([
                        iface.system_name.clone(),
                        iface.display_name.clone(),
                        iface.ipv4.map(|a| a.to_string()).unwrap_or_default(),
                        iface.prefix_len.to_string(),
                    ])
                    .map_err(io::Error::other)?;
            }
            writer.flush()
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    println!("{json}");
    Ok(())
}

/// Print an informational note to stderr.
pub fn print_info(message: &str) {
    eprintln!("{} {}", style("info:").blue().bold(), message);
}

/// Print a warning to stderr.
pub fn print_warning(message: &str) {
    eprintln!("{} {}", style("warning:").yellow().bold(), message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn snapshot(last_octet: u8, reachable: bool) -> HostSnapshot {
        HostSnapshot {
            address: Ipv4Addr::new(10, 0, 0, last_octet),
            reachable,
            hostname: None,
            mac_address: None,
            latency_ms: reachable.then_some(5),
        }
    }

    #[test]
    fn test_report_keeps_reachable_sorted_by_address() {
        let report = ScanReport::new(
            vec!["10.0.0".to_string()],
            vec![snapshot(9, true), snapshot(3, false), snapshot(2, true)],
        );
        let octets: Vec<u8> = report.hosts.iter().map(|h| h.address.octets()[3]).collect();
        assert_eq!(octets, vec![2, 9]);
    }

    #[test]
    fn test_report_serializes() {
        let report = ScanReport::new(vec!["10.0.0".to_string()], vec![snapshot(1, true)]);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"10.0.0.1\""));
        assert!(json.contains("\"latency_ms\":5"));
    }
}
