//! Application settings and paths.
//!
//! Manages XDG-compliant paths and the `settings.json` holding the
//! default sweep/probe knobs. Settings exist so a user can tune the
//! defaults once instead of passing flags on every invocation; every
//! value can still be overridden per command.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Global paths singleton.
static PATHS: OnceLock<Paths> = OnceLock::new();

/// Application directory paths following the XDG Base Directory
/// Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/soundline)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Get the global paths instance.
    pub fn get() -> &'static Paths {
        PATHS.get_or_init(|| Self::new().expect("Failed to initialize paths"))
    }

    /// Initialize paths using XDG directories.
    fn new() -> ConfigResult<Self> {
        let project = ProjectDirs::from("com", "soundline", "soundline")
            .ok_or(ConfigError::DirectoryNotFound)?;

        let paths = Self {
            config_dir: project.config_dir().to_path_buf(),
        };
        fs::create_dir_all(&paths.config_dir)?;

        Ok(paths)
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// Application-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Per-probe timeout for subnet sweeps, in milliseconds.
    pub sweep_timeout_ms: u64,
    /// Concurrent probes per subnet sweep.
    pub sweep_concurrency: usize,
    /// Concurrently swept subnets.
    pub subnet_concurrency: usize,
    /// Per-connection timeout for raw port probes, in milliseconds.
    pub connect_timeout_ms: u64,
    /// Concurrent connections on the raw port-probe tier.
    pub port_concurrency: usize,
    /// Raw port-probe attempts per second, 0 for unlimited.
    pub default_rate_limit: u32,
    /// Cadence of the periodic re-prober, in seconds.
    pub watch_interval_secs: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            sweep_timeout_ms: 200,
            sweep_concurrency: 50,
            subnet_concurrency: 8,
            connect_timeout_ms: 300,
            port_concurrency: 100,
            default_rate_limit: 0,
            watch_interval_secs: 2,
        }
    }
}

impl AppSettings {
    /// Load settings from the default location.
    pub fn load() -> ConfigResult<Self> {
        let file = Paths::get().settings_file();
        if !file.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&file)
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))
    }

    /// Save settings to the default location.
    pub fn save(&self) -> ConfigResult<()> {
        let file = Paths::get().settings_file();
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&file, content).map_err(|e| ConfigError::WriteFailed {
            path: file,
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_match_sweep_constants() {
        let settings = AppSettings::default();
        assert_eq!(settings.sweep_timeout_ms, 200);
        assert_eq!(settings.sweep_concurrency, 50);
        assert_eq!(settings.subnet_concurrency, 8);
        assert_eq!(settings.connect_timeout_ms, 300);
        assert_eq!(settings.port_concurrency, 100);
    }

    #[test]
    fn test_settings_round_trip() {
        let settings = AppSettings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let parsed: AppSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.sweep_timeout_ms, settings.sweep_timeout_ms);
        assert_eq!(parsed.watch_interval_secs, settings.watch_interval_secs);
    }

    #[test]
    fn test_load_from_file_and_partial_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"sweep_timeout_ms": 500}"#).unwrap();

        let settings = AppSettings::load_from(&path).unwrap();
        assert_eq!(settings.sweep_timeout_ms, 500);
        // Unspecified fields fall back to defaults.
        assert_eq!(settings.sweep_concurrency, 50);
    }

    #[test]
    fn test_load_from_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            AppSettings::load_from(&path),
            Err(ConfigError::InvalidFormat(_))
        ));
    }
}
