//! # Soundline - LAN Host Discovery and Port Probing
//!
//! Soundline sweeps local IPv4 /24 subnets for live hosts, measures
//! round-trip latency, resolves hostnames and MAC addresses, and can
//! enumerate open TCP ports on a selected host.
//!
//! ## Features
//!
//! - **Subnet Sweeps**: Bounded-concurrency probing of full /24 ranges,
//!   single or multiple subnets per request
//! - **Reachability Probing**: ICMP echo with a TCP-connect fallback;
//!   probe failures collapse into unreachable results, never errors
//! - **Host Enrichment**: Best-effort reverse DNS and ARP-table MAC
//!   lookup that only ever fills blank fields
//! - **Dual-Strategy Port Scanning**: External scan tool in grepable
//!   mode, falling back to concurrent raw connect probing
//! - **Live Re-Probing**: A periodic re-prober keeps an existing host
//!   set fresh; one active re-prober per session, replaced on restart
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use soundline::scanner::SweepConfig;
//! use soundline::session::ScanSession;
//! use soundline::types::SubnetSpec;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut session = ScanSession::new(SweepConfig::default());
//!     let subnets = SubnetSpec::parse_list("192.168.1");
//!     let hosts = session.scan(&subnets).await;
//!
//!     for host in hosts.iter().filter(|h| h.is_reachable()) {
//!         println!("{}", host.snapshot());
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`types`] - Host records, subnet and port specifications
//! - [`probe`] - Single-host reachability probing
//! - [`scanner`] - Sweep orchestration and port scanning
//! - [`resolve`] - Hostname and MAC enrichment
//! - [`netinfo`] - Interface, gateway, and ARP-table discovery
//! - [`session`] - The consumer-facing session facade
//! - [`config`] - Settings management
//! - [`error`] - Error types
//! - [`output`] - Output formatting utilities

pub mod cli;
pub mod config;
pub mod error;
pub mod netinfo;
pub mod output;
pub mod probe;
pub mod resolve;
pub mod scanner;
pub mod services;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, ConfigError, ScanError};
pub use scanner::{PortResult, PortScanConfig, SweepConfig};
pub use session::ScanSession;
pub use types::{Host, HostSnapshot, PortSpec, SubnetSpec};
