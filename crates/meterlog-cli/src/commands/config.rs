//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use meterlog_core::Config;

use crate::output::{Output, OutputFormat};

/// Keys accepted by `config set`
const VALID_KEYS: &str =
    "data_dir, csv_file_name, print_file_name, csv_quoting, open_printable, log_file";

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "csv_file_name": config.csv_file_name,
                    "print_file_name": config.print_file_name,
                    "csv_quoting": config.csv_quoting,
                    "open_printable": config.open_printable,
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:        {}", config.data_dir.display());
            println!("  csv_file_name:   {}", config.csv_file_name);
            println!("  print_file_name: {}", config.print_file_name);
            println!("  csv_quoting:     {}", config.csv_quoting);
            println!("  open_printable:  {}", config.open_printable);
            println!(
                "  log_file:        {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply(&mut config, &key, &value)?;

    match config_path {
        Some(path) => config.save_to_path(path),
        None => config.save(),
    }
    .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

/// Apply one `key = value` change to a config
fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => {
            config.data_dir = value.into();
        }
        "csv_file_name" => {
            if value.is_empty() {
                bail!("csv_file_name cannot be empty");
            }
            config.csv_file_name = value.to_string();
        }
        "print_file_name" => {
            if value.is_empty() {
                bail!("print_file_name cannot be empty");
            }
            config.print_file_name = value.to_string();
        }
        "csv_quoting" => {
            config.csv_quoting = value
                .parse()
                .context("Invalid value for csv_quoting. Use 'true' or 'false'.")?;
        }
        "open_printable" => {
            config.open_printable = value
                .parse()
                .context("Invalid value for open_printable. Use 'true' or 'false'.")?;
        }
        "log_file" => {
            config.log_file = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.into())
            };
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\nValid keys: {}",
                key,
                VALID_KEYS
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_known_keys() {
        let mut config = Config::default();

        apply(&mut config, "csv_quoting", "false").unwrap();
        apply(&mut config, "open_printable", "false").unwrap();
        apply(&mut config, "csv_file_name", "leituras.csv").unwrap();
        apply(&mut config, "log_file", "/tmp/meterlog.log").unwrap();

        assert!(!config.csv_quoting);
        assert!(!config.open_printable);
        assert_eq!(config.csv_file_name, "leituras.csv");
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/meterlog.log")));

        apply(&mut config, "log_file", "none").unwrap();
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_apply_rejects_bad_input() {
        let mut config = Config::default();

        assert!(apply(&mut config, "csv_quoting", "maybe").is_err());
        assert!(apply(&mut config, "print_file_name", "").is_err());
        let err = apply(&mut config, "colour", "blue").unwrap_err();
        assert!(err.to_string().contains("Valid keys"));
    }
}
