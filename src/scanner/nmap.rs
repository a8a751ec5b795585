//! External scan-tool integration.
//!
//! The primary port-scan tier shells out to nmap in grepable output mode
//! and parses the `Ports:` field of each `Host:` line. The tool is looked
//! up on the process search path first, then in a short list of
//! well-known install locations; a missing or failing tool is an
//! expected condition that triggers the raw-probe fallback, never an
//! error surfaced to the caller.

use crate::error::{ScanError, ScanResult};
use crate::scanner::ports::PortResult;
use crate::types::PortSpec;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::debug;

/// Well-known install directories checked after the search path.
#[cfg(windows)]
const INSTALL_DIRS: [&str; 2] = ["C:\\Program Files (x86)\\Nmap", "C:\\Program Files\\Nmap"];
#[cfg(not(windows))]
const INSTALL_DIRS: [&str; 3] = ["/usr/bin", "/usr/local/bin", "/opt/homebrew/bin"];

#[cfg(windows)]
const TOOL_BINARY: &str = "nmap.exe";
#[cfg(not(windows))]
const TOOL_BINARY: &str = "nmap";

/// What the external tool tier produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    /// Tool missing, failed to spawn, or exited unsuccessfully.
    Unavailable,
    /// Tool ran; these are the open ports it reported (possibly none).
    Ran(Vec<PortResult>),
}

impl ToolOutcome {
    /// The single fallback predicate: raw probing runs when the tool was
    /// unavailable *or* when it ran and reported nothing open. The two
    /// cases are deliberately conflated, matching the accepted ambiguity
    /// that an empty tool result is indistinguishable from a failed one.
    pub fn should_fall_back(&self) -> bool {
        match self {
            Self::Unavailable => true,
            Self::Ran(ports) => ports.is_empty(),
        }
    }
}

/// Locate the scan tool: search path first, then well-known directories.
pub fn locate_tool() -> Option<PathBuf> {
    if let Some(path_var) = std::env::var_os("PATH") {
        for dir in std::env::split_paths(&path_var) {
            let candidate = dir.join(TOOL_BINARY);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }

    for dir in INSTALL_DIRS {
        let candidate = PathBuf::from(dir).join(TOOL_BINARY);
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    None
}

/// Run the tool against one host and parse its grepable output.
///
/// Any failure along the way - tool missing, spawn error, unsuccessful
/// exit - collapses into [`ToolOutcome::Unavailable`].
pub async fn scan_with_tool(addr: Ipv4Addr, spec: &PortSpec) -> ToolOutcome {
    match run_tool(addr, spec).await {
        Ok(stdout) => ToolOutcome::Ran(parse_grepable(&stdout)),
        Err(e) => {
            debug!("external scan tool unavailable: {e}");
            ToolOutcome::Unavailable
        }
    }
}

/// Invoke the tool and return its raw grepable output.
///
/// The host argument is reduced to `[0-9.]` before it reaches the
/// command line. `-Pn` skips the host-discovery preamble (the caller
/// already knows the host is interesting); the default port set maps to
/// the tool's fast mode instead of an explicit list.
async fn run_tool(addr: Ipv4Addr, spec: &PortSpec) -> ScanResult<String> {
    let tool = locate_tool().ok_or(ScanError::ToolNotFound)?;

    let host = sanitize_host(&addr.to_string());
    let mut command = Command::new(&tool);
    command.arg("-Pn");
    if spec.is_default() {
        command.arg("-F");
    } else {
        command.args(["-p", &spec.to_string()]);
    }
    command.args(["-oG", "-"]).arg(&host);

    let output = command.output().await?;
    if !output.status.success() {
        return Err(ScanError::ToolFailed(output.status.to_string()));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Strip everything but digits and dots from a host argument.
fn sanitize_host(host: &str) -> String {
    host.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect()
}

/// Parse grepable output, keeping only entries whose state is `open`.
///
/// Expected shape per host line:
/// `Host: 1.2.3.4 () Ports: 22/open/tcp//ssh///, 80/closed/tcp//http///`
pub fn parse_grepable(output: &str) -> Vec<PortResult> {
    let mut results = Vec::new();

    for line in output.lines() {
        if !line.starts_with("Host:") {
            continue;
        }
        let Some(idx) = line.find("Ports:") else {
            continue;
        };
        let ports_part = &line[idx + "Ports:".len()..];

        for entry in ports_part.split(',') {
            let mut segs = entry.trim().split('/');
            let (Some(port), Some(state)) = (segs.next(), segs.next()) else {
                continue;
            };
            let Ok(port) = port.trim().parse::<u16>() else {
                continue;
            };
            if !state.trim().eq_ignore_ascii_case("open") {
                continue;
            }
            let proto = segs
                .next()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .unwrap_or("tcp");
            results.push(PortResult::open(port, proto));
        }
    }

    results
}
