//! Reading ledger
//!
//! The `Ledger` owns a store accessor and runs the read-modify-write cycle:
//! every mutation loads the full list, changes it in memory and saves the
//! full list back.
//!
//! ## Usage
//!
//! ```ignore
//! let mut ledger = Ledger::new(JsonFileStore::from_config(&config));
//!
//! ledger.submit(Category::Gas, "2024-03-01", "50")?;
//! let history = ledger.history()?;
//! let csv = ledger.export_csv(config.csv_quoting())?;
//! ```

use thiserror::Error;
use tracing::info;

use crate::export::{self, CsvQuoting};
use crate::history::{self, History};
use crate::models::{Category, Reading, ValidationError};
use crate::storage::{ReadingStore, StorageError};

/// Errors returned by ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid reading: {0}")]
    Validation(#[from] ValidationError),

    #[error("No data to export")]
    NoData,

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),
}

impl LedgerError {
    /// What the user can do about a storage failure, if anything
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            LedgerError::Storage(e) => e.recovery_suggestion(),
            _ => None,
        }
    }
}

/// Reading counts for status output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerStats {
    pub total: usize,
    /// Per category label, in first-seen order
    pub by_category: Vec<(String, usize)>,
}

/// Read/modify/render cycle over a store of readings
pub struct Ledger<S: ReadingStore> {
    store: S,
}

impl<S: ReadingStore> Ledger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All readings in stored order (most recently entered first)
    pub fn readings(&self) -> Result<Vec<Reading>, LedgerError> {
        Ok(self.store.load()?)
    }

    /// Validate and record a new reading
    ///
    /// On success the reading is inserted at the front of the list and the
    /// list is persisted. On validation failure nothing is written.
    /// Resubmitting the same values records another entry.
    pub fn submit(
        &mut self,
        category: Category,
        date: &str,
        value: &str,
    ) -> Result<Reading, LedgerError> {
        let reading = Reading::from_input(category, date, value)?;

        let mut readings = self.store.load()?;
        readings.insert(0, reading.clone());
        self.store.save(&readings)?;

        info!(
            "Recorded {} reading {} on {} ({} total)",
            reading.category.tag(),
            reading.display_value(),
            reading.date,
            readings.len()
        );
        Ok(reading)
    }

    /// Render the history table with consumption deltas
    pub fn history(&self) -> Result<History, LedgerError> {
        Ok(history::render(&self.store.load()?))
    }

    /// Remove every reading
    ///
    /// Irreversible; callers are responsible for asking for confirmation.
    pub fn clear_all(&mut self) -> Result<(), LedgerError> {
        self.store.clear()?;
        info!("Cleared reading history");
        Ok(())
    }

    /// Export all readings as CSV, in stored order
    pub fn export_csv(&self, quoting: CsvQuoting) -> Result<Vec<u8>, LedgerError> {
        let readings = self.non_empty_readings()?;
        let csv = export::to_csv(&readings, quoting)?;
        info!("Exported {} readings as CSV", readings.len());
        Ok(csv)
    }

    /// Build the printable document for all readings, in stored order
    pub fn export_printable(&self) -> Result<String, LedgerError> {
        let readings = self.non_empty_readings()?;
        info!("Exported {} readings as printable document", readings.len());
        Ok(export::printable_document(&readings))
    }

    /// Count readings per category
    pub fn stats(&self) -> Result<LedgerStats, LedgerError> {
        let readings = self.store.load()?;
        let mut by_category: Vec<(String, usize)> = Vec::new();
        for reading in &readings {
            let label = reading.category.label();
            match by_category.iter_mut().find(|(l, _)| l == label) {
                Some((_, count)) => *count += 1,
                None => by_category.push((label.to_string(), 1)),
            }
        }
        Ok(LedgerStats {
            total: readings.len(),
            by_category,
        })
    }

    fn non_empty_readings(&self) -> Result<Vec<Reading>, LedgerError> {
        let readings = self.store.load()?;
        if readings.is_empty() {
            return Err(LedgerError::NoData);
        }
        Ok(readings)
    }
}
