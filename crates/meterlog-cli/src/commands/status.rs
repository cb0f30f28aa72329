//! Status command handler

use anyhow::Result;

use meterlog_core::{Config, JsonFileStore, Ledger};

use crate::output::{Output, OutputFormat};

/// Show status information
pub fn show(config: &Config, ledger: &Ledger<JsonFileStore>, output: &Output) -> Result<()> {
    let stats = ledger.stats()?;
    let store = ledger.store();

    match output.format {
        OutputFormat::Json => {
            let counts: serde_json::Map<String, serde_json::Value> = stats
                .by_category
                .iter()
                .map(|(label, count)| (label.clone(), serde_json::json!(count)))
                .collect();
            println!(
                "{}",
                serde_json::json!({
                    "store": {
                        "path": store.path(),
                        "exists": store.exists(),
                        "size": store.size()
                    },
                    "readings": stats.total,
                    "by_category": counts
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", stats.total);
        }
        OutputFormat::Human => {
            println!("meterlog Status");
            println!("===============");
            println!();
            println!("Storage:");
            println!("  Location: {}", store.path().display());
            println!(
                "  Size:     {}",
                if store.exists() {
                    format_size(store.size())
                } else {
                    "(not created yet)".to_string()
                }
            );
            println!("  Data dir: {}", config.data_dir.display());
            println!();
            println!("Readings: {}", stats.total);
            for (label, count) in &stats.by_category {
                println!("  {}: {}", label, count);
            }
        }
    }

    Ok(())
}

/// Human-readable byte count
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
