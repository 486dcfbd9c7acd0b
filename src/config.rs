use crate::error::ConfigError;
use directories_next::ProjectDirs;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

const QUALIFIER: &str = "com";
const ORGANIZATION: &str = "ContactSheet";
const APPLICATION: &str = "ContactSheet";

/// Environment variable that overrides the data directory
pub const DATA_DIR_ENV: &str = "CONTACT_SHEET_DATA_DIR";

/// Environment variable that overrides the HTTP bind address
pub const BIND_ENV: &str = "CONTACT_SHEET_BIND";

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// The per-user application data directory, e.g.
/// `~/.local/share/contactsheet` on Linux.
pub fn default_data_dir() -> Result<PathBuf, ConfigError> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or(ConfigError::NoDataDir)
}

/// Resolve the directory holding `data.xlsx` and make sure it exists.
///
/// An explicit directory wins over the per-user default.
pub fn resolve_data_dir(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let dir = match explicit {
        Some(dir) => dir.to_path_buf(),
        None => default_data_dir()?,
    };

    fs::create_dir_all(&dir).map_err(|source| ConfigError::CreateDir {
        path: dir.clone(),
        source,
    })?;
    debug!("using data directory {:?}", dir);
    Ok(dir)
}
