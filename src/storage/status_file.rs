//! Status hand-off file.
//!
//! The pipeline is the only writer and replaces the whole content on every
//! run; the status web service only reads. There is no locking: a reader
//! racing a write may see stale or partial content, which is accepted.
//! The file's modification time is part of the contract, it tells readers
//! when the status was last published.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use log::{debug, error, info, warn};

use super::types::{PublishedStatus, StatusInfo};
use crate::error_handling::types::StatusError;

/// Text served on `/` when no status has been published yet.
pub const MISSING_STATUS_TEXT: &str = "Status file not found";

#[derive(Debug, Clone)]
pub struct StatusFile {
    path: PathBuf,
}

impl StatusFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrites the file with the status string, no trailing newline.
    pub fn publish(&self, status: PublishedStatus) -> Result<(), StatusError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                error!("Failed to create status dir {}: {}", parent.display(), e);
                StatusError::WriteFailed(e)
            })?;
        }
        fs::write(&self.path, status.as_str()).map_err(|e| {
            error!("Failed to write status file {}: {}", self.path.display(), e);
            StatusError::WriteFailed(e)
        })?;
        info!("Status file updated: {}", status);
        Ok(())
    }

    /// Trimmed content, or `None` when the file does not exist.
    pub fn read_status(&self) -> Result<Option<String>, StatusError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content.trim().to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StatusError::ReadFailed(e)),
        }
    }

    /// Content for the plain-text route.
    pub fn read_text(&self) -> String {
        match self.read_status() {
            Ok(Some(status)) => status,
            Ok(None) => MISSING_STATUS_TEXT.to_string(),
            Err(e) => {
                warn!("{}", e);
                MISSING_STATUS_TEXT.to_string()
            }
        }
    }

    /// Content and modification time for the JSON route; never fails.
    pub fn read_info(&self) -> StatusInfo {
        let status = match self.read_status() {
            Ok(Some(status)) => status,
            Ok(None) => {
                debug!("Status file {} not found", self.path.display());
                return StatusInfo::not_found();
            }
            Err(e) => {
                warn!("{}", e);
                return StatusInfo::not_found();
            }
        };

        // The file can vanish between the two reads.
        let updated = match fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(modified) => modified
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs_f64())
                .unwrap_or(0.0),
            Err(e) => {
                warn!("Failed to read mtime of {}: {}", self.path.display(), e);
                return StatusInfo::not_found();
            }
        };

        debug!(
            "File read: {} | Status: {} | Modified: {}",
            self.path.display(),
            status,
            updated
        );
        StatusInfo { status, updated }
    }
}
