//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use meterlog_core::history::EMPTY_MESSAGE;
use meterlog_core::{History, LedgerError, Reading, StorageError};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print a single reading
    pub fn print_reading(&self, reading: &Reading) {
        match self.format {
            OutputFormat::Human => {
                println!("Type:    {}", reading.category.label());
                println!("Date:    {}", reading.date);
                println!("Reading: {} m³", reading.display_value());
            }
            OutputFormat::Json => {
                println!("{}", reading_json(reading));
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print the history table
    pub fn print_history(&self, history: &History) {
        match self.format {
            OutputFormat::Human => {
                if history.is_empty() {
                    println!("{}", EMPTY_MESSAGE);
                    return;
                }
                for line in history_table(history) {
                    println!("{}", line);
                }
                println!("\n{} reading(s)", history.len());
            }
            OutputFormat::Json => {
                let rows: Vec<_> = history
                    .rows()
                    .iter()
                    .map(|row| {
                        let mut json = reading_json(&row.reading);
                        json["consumption"] = serde_json::json!(row.consumption.delta());
                        json
                    })
                    .collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".to_string())
                );
            }
            OutputFormat::Quiet => {
                for row in history.rows() {
                    println!(
                        "{}\t{}\t{}",
                        row.reading.category.tag(),
                        row.reading.date,
                        row.reading.display_value()
                    );
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a warning to stderr (suppressed in quiet mode)
    pub fn warning(&self, message: &str) {
        if !self.is_quiet() {
            eprintln!("⚠ {}", message);
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }
}

/// Recovery suggestion for a storage failure anywhere in the error chain
pub fn recovery_hint(err: &anyhow::Error) -> Option<&'static str> {
    err.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<LedgerError>() {
            return e.recovery_suggestion();
        }
        cause
            .downcast_ref::<StorageError>()
            .and_then(StorageError::recovery_suggestion)
    })
}

fn reading_json(reading: &Reading) -> serde_json::Value {
    serde_json::json!({
        "type": reading.category.tag(),
        "label": reading.category.label(),
        "date": reading.date,
        "value": reading.value,
    })
}

/// Lay out the history as aligned text columns
fn history_table(history: &History) -> Vec<String> {
    let header = ["Type", "Date", "Reading (m³)", "Consumption"];
    let rows: Vec<[String; 4]> = history
        .rows()
        .iter()
        .map(|row| {
            [
                row.label().to_string(),
                row.reading.date.clone(),
                row.reading.display_value(),
                row.consumption.to_string(),
            ]
        })
        .collect();

    let mut widths = header.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: [&str; 4]| -> String {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| pad(cell, width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format_row(header)];
    lines.push(
        widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in &rows {
        lines.push(format_row([
            row[0].as_str(),
            row[1].as_str(),
            row[2].as_str(),
            row[3].as_str(),
        ]));
    }
    lines
}

/// Pad to a display width counted in chars (labels carry accents)
fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    format!("{}{}", s, " ".repeat(width.saturating_sub(len)))
}
