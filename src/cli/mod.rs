//! CLI subcommand definitions and handlers.
//!
//! Implements a git-like subcommand architecture:
//! - `soundline scan [SUBNETS]` - Sweep subnets for live hosts
//! - `soundline ports <HOST>` - Scan one host's ports
//! - `soundline interfaces` - List usable network interfaces
//! - `soundline gateway` - Print the default gateway

mod info;
mod ports;
mod scan;

pub use info::{GatewayCommand, InterfacesCommand};
pub use ports::PortsCommand;
pub use scan::ScanCommand;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Soundline - LAN host discovery and port probing.
///
/// Soundline sweeps /24 subnets for reachable hosts, resolves their
/// hostnames and MAC addresses, and can enumerate open TCP ports on a
/// selected host via an external scan tool with a raw-probe fallback.
#[derive(Parser, Debug)]
#[command(name = "soundline")]
#[command(author = "HueCodes <huecodes@proton.me>")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "LAN host discovery and port probing", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to custom configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sweep subnets for live hosts
    #[command(alias = "s")]
    Scan(ScanCommand),

    /// Scan a host for open ports
    #[command(alias = "p")]
    Ports(PortsCommand),

    /// List usable network interfaces
    #[command(alias = "i")]
    Interfaces(InterfacesCommand),

    /// Print the default gateway
    #[command(alias = "g")]
    Gateway(GatewayCommand),
}

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable plain text
    Plain,
    /// JSON structured output
    Json,
    /// CSV format for data analysis
    Csv,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Plain
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_scan_with_subnets() {
        let cli = Cli::try_parse_from(["soundline", "scan", "192.168.1,10.0.0"]).unwrap();
        assert!(matches!(cli.command, Commands::Scan(_)));
    }

    #[test]
    fn test_parses_ports_alias() {
        let cli = Cli::try_parse_from(["soundline", "p", "192.168.1.10", "-p", "22,80"]).unwrap();
        assert!(matches!(cli.command, Commands::Ports(_)));
    }

    #[test]
    fn test_requires_a_subcommand() {
        assert!(Cli::try_parse_from(["soundline"]).is_err());
    }
}
