//! Core type definitions.
//!
//! - [`Host`] - a probed address with interior-mutable probe state
//! - [`SubnetSpec`] - a validated /24 prefix and its host-range expansion
//! - [`PortSpec`] - permissive port-specification parsing

pub mod host;
pub mod port;
pub mod subnet;

pub use host::{Host, HostSnapshot};
pub use port::{PortSpec, DEFAULT_PORTS};
pub use subnet::SubnetSpec;
