use crate::error::ShareError;
use log::{error, info};
use std::path::Path;

/// Hands a file to whatever the host offers for sending it elsewhere.
pub trait Share: Send {
    fn is_available(&self) -> bool;

    fn share(&self, path: &Path, mime: &str) -> Result<(), ShareError>;
}

/// Opens the file with the desktop's default handler for its type.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemShare;

impl Share for SystemShare {
    fn is_available(&self) -> bool {
        cfg!(any(target_os = "windows", target_os = "macos", target_os = "linux"))
    }

    fn share(&self, path: &Path, mime: &str) -> Result<(), ShareError> {
        if !self.is_available() {
            return Err(ShareError::Unavailable);
        }
        info!("sharing {:?} as {}", path, mime);
        open::that_detached(path).map_err(|e| {
            error!("failed to hand {:?} to the system: {}", path, e);
            ShareError::Failed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })
    }
}

/// For hosts without any share target, such as the HTTP server.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoShare;

impl Share for NoShare {
    fn is_available(&self) -> bool {
        false
    }

    fn share(&self, _path: &Path, _mime: &str) -> Result<(), ShareError> {
        Err(ShareError::Unavailable)
    }
}
