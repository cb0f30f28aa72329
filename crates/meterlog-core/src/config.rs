//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/meterlog/config.toml)
//! 3. Environment variables (METERLOG_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::export::CsvQuoting;

/// Environment variable prefix
const ENV_PREFIX: &str = "METERLOG";

/// File holding the persisted readings
const READINGS_FILE: &str = "readings.json";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory for data storage (readings, printable exports, logs)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// File name offered for CSV exports
    #[serde(default = "default_csv_file_name")]
    pub csv_file_name: String,

    /// File name of the printable document written to `data_dir`
    #[serde(default = "default_print_file_name")]
    pub print_file_name: String,

    /// Quote CSV fields that contain delimiters (false = raw output)
    #[serde(default = "default_true")]
    pub csv_quoting: bool,

    /// Open the printable document in the system viewer after writing it
    #[serde(default = "default_true")]
    pub open_printable: bool,

    /// Log file used when METERLOG_LOG is set
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            csv_file_name: default_csv_file_name(),
            print_file_name: default_print_file_name(),
            csv_quoting: true,
            open_printable: true,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (METERLOG_DATA_DIR, METERLOG_CSV_QUOTING, METERLOG_LOG_FILE)
    /// 2. Config file (~/.config/meterlog/config.toml or METERLOG_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring a path given on the command line
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var(format!("{}_CSV_QUOTING", ENV_PREFIX)) {
            self.csv_quoting = val.eq_ignore_ascii_case("true") || val == "1";
        }

        // Empty string clears it
        if let Ok(val) = std::env::var(format!("{}_LOG_FILE", ENV_PREFIX)) {
            self.log_file = if val.is_empty() {
                None
            } else {
                Some(PathBuf::from(val))
            };
        }
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to the default config file
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &PathBuf) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with METERLOG_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("meterlog")
            .join("config.toml")
    }

    /// Get the path to the persisted readings
    pub fn readings_path(&self) -> PathBuf {
        self.data_dir.join(READINGS_FILE)
    }

    /// Get the path the printable document is written to
    pub fn print_path(&self) -> PathBuf {
        self.data_dir.join(&self.print_file_name)
    }

    /// Get the log file path (configured or `{data_dir}/debug.log`)
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("debug.log"))
    }

    /// CSV quoting mode derived from `csv_quoting`
    pub fn csv_quoting(&self) -> CsvQuoting {
        CsvQuoting::from(self.csv_quoting)
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("meterlog")
}

fn default_csv_file_name() -> String {
    "meter-readings.csv".to_string()
}

fn default_print_file_name() -> String {
    "meter-readings.html".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &[
        "METERLOG_DATA_DIR",
        "METERLOG_CSV_QUOTING",
        "METERLOG_LOG_FILE",
        "METERLOG_CONFIG",
    ];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.csv_quoting);
        assert!(config.open_printable);
        assert!(config.log_file.is_none());
        assert_eq!(config.csv_file_name, "meter-readings.csv");
        assert!(config.data_dir.ends_with("meterlog"));
    }

    #[test]
    fn test_file_paths() {
        let config = Config {
            data_dir: PathBuf::from("/data/meterlog"),
            ..Config::default()
        };

        assert_eq!(
            config.readings_path(),
            PathBuf::from("/data/meterlog/readings.json")
        );
        assert_eq!(
            config.print_path(),
            PathBuf::from("/data/meterlog/meter-readings.html")
        );
        assert_eq!(config.log_path(), PathBuf::from("/data/meterlog/debug.log"));
    }

    #[test]
    fn test_env_override_data_dir() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("METERLOG_DATA_DIR", "/tmp/meterlog-test");
        config.apply_env_overrides();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/meterlog-test"));
    }

    #[test]
    fn test_env_override_csv_quoting() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("METERLOG_CSV_QUOTING", "false");
        config.apply_env_overrides();
        assert!(!config.csv_quoting);
        assert_eq!(config.csv_quoting(), CsvQuoting::Never);

        env::set_var("METERLOG_CSV_QUOTING", "1");
        config.apply_env_overrides();
        assert!(config.csv_quoting);
    }

    #[test]
    fn test_env_override_log_file() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("METERLOG_LOG_FILE", "/tmp/meterlog.log");
        config.apply_env_overrides();
        assert_eq!(config.log_path(), PathBuf::from("/tmp/meterlog.log"));

        env::set_var("METERLOG_LOG_FILE", "");
        config.apply_env_overrides();
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_load_from_str_partial() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            data_dir = "/custom/data"
            csv_quoting = false
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
        assert!(!config.csv_quoting);
        // Missing keys fall back to defaults
        assert!(config.open_printable);
        assert_eq!(config.print_file_name, "meter-readings.html");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let config = Config {
            data_dir: temp_dir.path().join("data"),
            open_printable: false,
            ..Config::default()
        };
        config.save_to_path(&config_path).unwrap();

        let loaded = Config::load_from_path(&config_path).unwrap();
        assert_eq!(loaded.data_dir, config.data_dir);
        assert!(!loaded.open_printable);
        // Loading creates the data directory
        assert!(loaded.data_dir.exists());
    }

    #[test]
    fn test_save_writes_default_config_file() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("meterlog").join("config.toml");
        env::set_var("METERLOG_CONFIG", &config_path);

        let config = Config {
            csv_file_name: "leituras.csv".to_string(),
            ..Config::default()
        };
        config.save().unwrap();

        let content = std::fs::read_to_string(&config_path).unwrap();
        let loaded = Config::load_from_str(&content).unwrap();
        assert_eq!(loaded.csv_file_name, "leituras.csv");
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        env::set_var("METERLOG_DATA_DIR", temp_dir.path());

        let path = PathBuf::from("/nonexistent/config.toml");
        let config = Config::load_from_path(&path).unwrap();
        assert!(config.csv_quoting);
        assert_eq!(config.data_dir, temp_dir.path());
    }
}
