//! JSON file persistence
//!
//! The whole list of readings lives in one file (`readings.json` in the data
//! directory) and is rewritten on every mutation. Uses atomic writes (write
//! to temp file, then rename) to prevent corruption.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{ReadingStore, StorageError, StorageResult};
use crate::config::Config;
use crate::models::Reading;

/// Store backed by a single JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the configured readings path
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.readings_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if a readings file exists on disk
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Size of the readings file in bytes (0 when missing)
    pub fn size(&self) -> u64 {
        fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
    }
}

impl ReadingStore for JsonFileStore {
    fn load(&self) -> StorageResult<Vec<Reading>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No readings file at {:?}", self.path);
                return Ok(Vec::new());
            }
            Err(e) => return Err(StorageError::from_read_io(e, self.path.clone())),
        };

        match serde_json::from_slice::<Vec<Reading>>(&bytes) {
            Ok(readings) => {
                debug!("Loaded {} readings from {:?}", readings.len(), self.path);
                Ok(readings)
            }
            Err(e) => {
                // Unreadable data counts as an empty list; the file is left alone
                warn!("Ignoring undecodable readings file {:?}: {}", self.path, e);
                Ok(Vec::new())
            }
        }
    }

    fn save(&mut self, readings: &[Reading]) -> StorageResult<()> {
        let bytes = serde_json::to_vec(readings)?;
        atomic_write(&self.path, &bytes)?;
        debug!("Saved {} readings to {:?}", readings.len(), self.path);
        Ok(())
    }

    fn clear(&mut self) -> StorageResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::from_io(e, self.path.clone())),
        }
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
pub(crate) fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|source| StorageError::AtomicWriteFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use tempfile::TempDir;

    fn test_store(temp_dir: &TempDir) -> JsonFileStore {
        JsonFileStore::new(temp_dir.path().join("readings.json"))
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = test_store(&temp_dir);

        assert!(!store.exists());
        assert!(store.load().unwrap().is_empty());

        let readings = vec![
            Reading::new(Category::Gas, "2024-02-01", 12.5),
            Reading::new(Category::Water, "2024-01-01", 100.0),
        ];
        store.save(&readings).unwrap();
        assert!(store.exists());
        assert!(store.size() > 0);

        let loaded = store.load().unwrap();
        assert_eq!(loaded, readings);
    }

    #[test]
    fn test_reads_browser_store_format() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);
        fs::write(
            store.path(),
            r#"[{"type":"gas","date":"2024-03-01","value":50},{"type":"agua","date":"2024-02-01","value":80.25}]"#,
        )
        .unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(
            loaded,
            vec![
                Reading::new(Category::Gas, "2024-03-01", 50.0),
                Reading::new(Category::Water, "2024-02-01", 80.25),
            ]
        );
    }

    #[test]
    fn test_corrupt_file_loads_as_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);
        fs::write(store.path(), "{not json").unwrap();

        assert!(store.load().unwrap().is_empty());
        // The file itself is not touched
        assert!(store.exists());
    }

    #[test]
    fn test_clear_removes_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = test_store(&temp_dir);

        store
            .save(&[Reading::new(Category::Water, "2024-01-01", 1.0)])
            .unwrap();
        store.clear().unwrap();
        assert!(!store.exists());
        assert!(store.load().unwrap().is_empty());

        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = JsonFileStore::new(temp_dir.path().join("nested/dir/readings.json"));

        store.save(&[]).unwrap();
        assert!(store.exists());
        // No temp file left behind
        assert!(!temp_dir.path().join("nested/dir/readings.tmp").exists());
    }
}
