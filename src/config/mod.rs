//! Configuration management.

pub mod settings;

pub use settings::{AppSettings, Paths};
