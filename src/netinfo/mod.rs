//! Platform network information: interfaces, ARP table, default gateway.
//!
//! Everything here that depends on OS command output is split in two:
//! a narrow *source* trait that acquires raw text (swappable, untestable)
//! and a pure parser over that text (testable). Probing never happens in
//! this module.

pub mod arp;
pub mod gateway;
pub mod interfaces;

pub use arp::{parse_mac_for, ArpTableSource, SystemArpSource};
pub use gateway::{parse_default_gateway, system_default_gateway};
pub use interfaces::{list_interfaces, local_subnet, InterfaceDescriptor};
