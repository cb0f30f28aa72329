//! Export command handlers
//!
//! The `save_*` helpers are shared with the TUI.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

use meterlog_core::{Config, Ledger, ReadingStore};

use crate::output::Output;

/// A written printable document
#[derive(Debug)]
pub struct PrintableExport {
    pub path: PathBuf,
    /// Why the viewer could not be launched, if it was requested and failed
    pub open_error: Option<String>,
}

/// Export readings as CSV to a file or stdout
pub fn csv<S: ReadingStore>(
    config: &Config,
    ledger: &Ledger<S>,
    path: Option<PathBuf>,
    output: &Output,
) -> Result<()> {
    if path.as_deref() == Some(Path::new("-")) {
        let bytes = ledger.export_csv(config.csv_quoting())?;
        let mut stdout = io::stdout().lock();
        stdout.write_all(&bytes)?;
        stdout.flush()?;
        return Ok(());
    }

    let path = save_csv(config, ledger, path)?;
    output.success(&format!("Exported CSV to {}", path.display()));
    Ok(())
}

/// Write the printable document and open it for printing
pub fn print<S: ReadingStore>(
    config: &Config,
    ledger: &Ledger<S>,
    path: Option<PathBuf>,
    open: bool,
    output: &Output,
) -> Result<()> {
    let export = save_printable(config, ledger, path, open && config.open_printable)?;

    output.success(&format!(
        "Printable document written to {}",
        export.path.display()
    ));
    if let Some(err) = export.open_error {
        output.warning(&format!("Could not open it for printing: {}", err));
    }
    Ok(())
}

/// Write the CSV export, returning where it went
pub fn save_csv<S: ReadingStore>(
    config: &Config,
    ledger: &Ledger<S>,
    path: Option<PathBuf>,
) -> Result<PathBuf> {
    let bytes = ledger.export_csv(config.csv_quoting())?;
    let path = path.unwrap_or_else(|| PathBuf::from(&config.csv_file_name));

    fs::write(&path, bytes).with_context(|| format!("Failed to write CSV to {:?}", path))?;
    Ok(path)
}

/// Write the printable document and optionally hand it to the system viewer
pub fn save_printable<S: ReadingStore>(
    config: &Config,
    ledger: &Ledger<S>,
    path: Option<PathBuf>,
    open: bool,
) -> Result<PrintableExport> {
    let html = ledger.export_printable()?;
    let path = path.unwrap_or_else(|| config.print_path());

    fs::write(&path, html)
        .with_context(|| format!("Failed to write printable document to {:?}", path))?;

    let open_error = if open {
        open::that(&path).err().map(|e| {
            warn!("Failed to open {:?}: {}", path, e);
            e.to_string()
        })
    } else {
        None
    };

    Ok(PrintableExport { path, open_error })
}
