use std::path::PathBuf;
use thiserror::Error;

/// Failures of the workbook file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: StoreCause,
    },

    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: StoreCause,
    },

    /// Update or delete named an id that is not in the file.
    #[error("no entry with id {0:?}")]
    EntryNotFound(String),
}

/// Underlying cause of a read or write failure
#[derive(Debug, Error)]
pub enum StoreCause {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl StoreError {
    pub fn read(path: impl Into<PathBuf>, source: impl Into<StoreCause>) -> Self {
        StoreError::Read {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: impl Into<StoreCause>) -> Self {
        StoreError::Write {
            path: path.into(),
            source: source.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("sharing not available on this platform")]
    Unavailable,

    #[error("failed to share {path:?}: {reason}")]
    Failed { path: PathBuf, reason: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine a data directory for this user")]
    NoDataDir,

    #[error("failed to create data directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Workbook codec failures, wrapped into `StoreError` by the store.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("xlsx encode failed: {0}")]
    Encode(#[from] rust_xlsxwriter::XlsxError),

    #[error("xlsx decode failed: {0}")]
    Decode(#[from] calamine::XlsxError),

    #[error("workbook has no sheets")]
    NoSheet,
}
