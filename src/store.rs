use crate::downloader::to_xlsx;
use crate::entry::{Entry, unique_id};
use crate::error::StoreError;
use crate::loader::from_xlsx;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the workbook inside the data directory
pub const FILE_NAME: &str = "data.xlsx";

/// File-backed list of entries.
///
/// Every operation reads or writes the whole workbook; nothing is cached
/// between calls. Writes are plain overwrites, so a crash in the middle of
/// one can leave a truncated file behind.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    /// Store backed by `data.xlsx` inside `data_dir`
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        RecordStore {
            path: data_dir.as_ref().join(FILE_NAME),
        }
    }

    /// Store backed by an explicit file path
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        RecordStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the workbook with only its header row if it does not exist.
    ///
    /// Returns `true` when a new file was written. An existing file is left
    /// untouched; callers load it separately.
    pub fn initialize(&self) -> Result<bool, StoreError> {
        if self.path.exists() {
            debug!("{:?} already exists", self.path);
            return Ok(false);
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StoreError::write(parent, e))?;
            }
        }

        self.write_all(&[])?;
        info!("created empty workbook at {:?}", self.path);
        Ok(true)
    }

    /// Every row in file order
    pub fn load_all(&self) -> Result<Vec<Entry>, StoreError> {
        let bytes = self.export_bytes()?;
        let entries = from_xlsx(&bytes).map_err(|e| StoreError::read(&self.path, e))?;
        debug!("loaded {} entries from {:?}", entries.len(), self.path);
        Ok(entries)
    }

    /// Raw file content, as handed to a share target or download
    pub fn export_bytes(&self) -> Result<Vec<u8>, StoreError> {
        fs::read(&self.path).map_err(|e| StoreError::read(&self.path, e))
    }

    /// Add `entry` after the last row.
    ///
    /// If its id is already used, the entry is stored under the next free id.
    pub fn append(&self, mut entry: Entry) -> Result<Vec<Entry>, StoreError> {
        let mut entries = self.load_all()?;

        let id = unique_id(&entry.id, &entries);
        if id != entry.id {
            debug!("id {:?} taken, using {:?}", entry.id, id);
            entry.id = id;
        }

        entries.push(entry);
        self.write_all(&entries)?;
        Ok(entries)
    }

    /// Replace the fields of the row with `id`, keeping its id and position.
    pub fn update(&self, id: &str, patch: &Entry) -> Result<Vec<Entry>, StoreError> {
        let mut entries = self.load_all()?;

        let row = entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| StoreError::EntryNotFound(id.to_string()))?;
        row.apply(patch);

        self.write_all(&entries)?;
        Ok(entries)
    }

    /// Drop the row with `id`.
    pub fn remove(&self, id: &str) -> Result<Vec<Entry>, StoreError> {
        let mut entries = self.load_all()?;

        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return Err(StoreError::EntryNotFound(id.to_string()));
        }

        self.write_all(&entries)?;
        Ok(entries)
    }

    fn write_all(&self, entries: &[Entry]) -> Result<(), StoreError> {
        let buffer = to_xlsx(entries).map_err(|e| StoreError::write(&self.path, e))?;
        fs::write(&self.path, buffer).map_err(|e| StoreError::write(&self.path, e))?;
        debug!("wrote {} entries to {:?}", entries.len(), self.path);
        Ok(())
    }
}
