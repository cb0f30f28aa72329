//! Storage layer
//!
//! The store accessor is the only access point to persisted readings. It
//! loads and saves the full list; there are no partial updates.
//!
//! ## Implementations
//!
//! - **JsonFileStore**: one JSON file in the data directory, written atomically
//! - **MemoryStore**: in-memory store for tests and embedding

pub mod error;
pub mod memory;
pub mod persistence;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use persistence::JsonFileStore;

use crate::models::Reading;

/// Access to the single persisted list of readings
pub trait ReadingStore {
    /// Read the full list
    ///
    /// Returns an empty list when nothing is stored or the stored data
    /// cannot be decoded.
    fn load(&self) -> StorageResult<Vec<Reading>>;

    /// Overwrite the stored list
    fn save(&mut self, readings: &[Reading]) -> StorageResult<()>;

    /// Remove the stored list entirely
    fn clear(&mut self) -> StorageResult<()>;
}
