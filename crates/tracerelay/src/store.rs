//! On-disk crash record store
//!
//! Enumerates, reads, and deletes pending record files in the storage
//! directory. The pending set is fixed at first observation: `list_pending`
//! caches its snapshot for the store's lifetime, so every phase of the
//! submission pass works against the same file list even if the directory
//! changes underneath it.

use std::path::PathBuf;
use std::sync::OnceLock;

use tracing::{debug, warn};

use tracerelay_core::domain::{is_record_filename, CrashRecord, StoreError};

/// File-based store of pending crash records.
pub struct RecordStore {
    storage_dir: PathBuf,
    snapshot: OnceLock<Vec<String>>,
}

impl RecordStore {
    /// Creates a store over `storage_dir`. The directory is created lazily
    /// on the first scan.
    pub fn new(storage_dir: PathBuf) -> Self {
        Self {
            storage_dir,
            snapshot: OnceLock::new(),
        }
    }

    /// Returns the storage directory path.
    pub fn storage_dir(&self) -> &PathBuf {
        &self.storage_dir
    }

    /// Lists pending record filenames, sorted for a deterministic pass order.
    ///
    /// The first call scans the directory (creating it if absent) and caches
    /// the result; later calls return the same snapshot. A scan failure is
    /// logged and cached as an empty snapshot.
    pub fn list_pending(&self) -> &[String] {
        self.snapshot.get_or_init(|| match self.scan() {
            Ok(names) => names,
            Err(e) => {
                warn!("{e}");
                Vec::new()
            }
        })
    }

    fn scan(&self) -> Result<Vec<String>, StoreError> {
        let scan_err = |reason: String| StoreError::Scan {
            path: self.storage_dir.display().to_string(),
            reason,
        };

        std::fs::create_dir_all(&self.storage_dir).map_err(|e| scan_err(e.to_string()))?;

        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.storage_dir).map_err(|e| scan_err(e.to_string()))? {
            let entry = entry.map_err(|e| scan_err(e.to_string()))?;
            let name = entry.file_name().to_string_lossy().to_string();
            if is_record_filename(&name) {
                names.push(name);
            }
        }

        names.sort();
        debug!(count = names.len(), dir = %self.storage_dir.display(), "Scanned pending crash records");
        Ok(names)
    }

    /// Reads and parses one record by filename.
    pub fn read(&self, filename: &str) -> Result<CrashRecord, StoreError> {
        let path = self.storage_dir.join(filename);
        let contents = std::fs::read_to_string(&path).map_err(|e| StoreError::Read {
            filename: filename.to_string(),
            reason: e.to_string(),
        })?;
        Ok(CrashRecord::parse(filename, &contents))
    }

    /// Removes one record file. Best effort: failure is logged, not
    /// propagated, since an undeletable file simply remains pending and
    /// resurfaces on the next run.
    pub fn delete(&self, filename: &str) {
        let path = self.storage_dir.join(filename);
        if let Err(e) = std::fs::remove_file(&path) {
            warn!(file = %path.display(), "Failed to delete crash record: {e}");
        }
    }
}
