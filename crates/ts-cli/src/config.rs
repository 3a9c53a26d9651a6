//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory that `export` writes CSV files to when none is given.
    pub export_dir: PathBuf,

    /// Delay between readouts printed by `watch`.
    pub tick_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            export_dir: PathBuf::from("."),
            tick_interval_ms: 50,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Environment variables (TS_*) win over files
        figment = figment.merge(Env::prefixed("TS_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for ts.
///
/// On Linux: `~/.config/ts`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("ts"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.export_dir, PathBuf::from("."));
        assert_eq!(config.tick_interval_ms, 50);
    }

    #[test]
    fn test_dirs_config_path_ends_with_ts() {
        let path = dirs_config_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "ts");
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "tick_interval_ms = 250\nexport_dir = \"/tmp/studies\"\n").unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.tick_interval_ms, 250);
        assert_eq!(config.export_dir, PathBuf::from("/tmp/studies"));
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config::load_from(Some(&temp.path().join("absent.toml"))).unwrap();
        assert_eq!(config.tick_interval_ms, Config::default().tick_interval_ms);
    }
}
