//! In-memory store

use super::{ReadingStore, StorageResult};
use crate::models::Reading;

/// Store that keeps the list in memory
///
/// `None` means nothing has been saved (or it was cleared), mirroring a
/// missing file for `JsonFileStore`.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    readings: Option<Vec<Reading>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an already persisted list
    pub fn with_readings(readings: Vec<Reading>) -> Self {
        Self {
            readings: Some(readings),
        }
    }

    /// Whether a value is currently persisted
    pub fn is_present(&self) -> bool {
        self.readings.is_some()
    }
}

impl ReadingStore for MemoryStore {
    fn load(&self) -> StorageResult<Vec<Reading>> {
        Ok(self.readings.clone().unwrap_or_default())
    }

    fn save(&mut self, readings: &[Reading]) -> StorageResult<()> {
        self.readings = Some(readings.to_vec());
        Ok(())
    }

    fn clear(&mut self) -> StorageResult<()> {
        self.readings = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    #[test]
    fn test_empty_store_loads_nothing() {
        let store = MemoryStore::new();
        assert!(!store.is_present());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_overwrites_and_clear_removes() {
        let mut store = MemoryStore::new();
        store
            .save(&[Reading::new(Category::Water, "2024-01-01", 1.0)])
            .unwrap();
        store
            .save(&[Reading::new(Category::Gas, "2024-02-01", 2.0)])
            .unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].category, Category::Gas);

        store.clear().unwrap();
        assert!(!store.is_present());
        assert!(store.load().unwrap().is_empty());
    }
}
