//! meterlog Core Library
//!
//! This crate provides the core functionality for meterlog, a local-first
//! log of water and gas meter readings.
//!
//! # Architecture
//!
//! - **Store**: a single JSON file holding every reading, rewritten wholesale
//!   on each mutation
//! - **Ledger**: the read-modify-render cycle over that list
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let mut ledger = Ledger::new(JsonFileStore::from_config(&config));
//!
//! // Record a reading
//! ledger.submit(Category::Water, "2024-03-01", "123.4")?;
//!
//! // Render the history with consumption deltas
//! let history = ledger.history()?;
//! ```
//!
//! # Modules
//!
//! - `ledger`: Submission, clearing and export entry points (main entry point)
//! - `models`: Readings and categories
//! - `history`: Consumption rendering
//! - `export`: CSV and printable HTML exporters
//! - `storage`: Store accessor trait and implementations
//! - `config`: Application configuration

pub mod config;
pub mod export;
pub mod history;
pub mod ledger;
pub mod models;
pub mod storage;

pub use config::Config;
pub use export::CsvQuoting;
pub use history::{Consumption, History, HistoryRow};
pub use ledger::{Ledger, LedgerError, LedgerStats};
pub use models::{Category, Reading, ValidationError};
pub use storage::{JsonFileStore, MemoryStore, ReadingStore, StorageError};
