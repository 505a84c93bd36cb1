use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use log::{debug, error, info, warn};

use crate::error_handling::types::ArchiveError;

/// Timestamp prefix of archived files, taken when the file is moved.
pub const ARCHIVE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Moves processed images into a flat archive directory as `<timestamp>_<name>`.
pub struct Archiver {
    archive_dir: PathBuf,
}

impl Archiver {
    pub fn new<P: AsRef<Path>>(archive_dir: P) -> Self {
        Self {
            archive_dir: archive_dir.as_ref().to_path_buf(),
        }
    }

    pub fn archive_dir(&self) -> &Path {
        &self.archive_dir
    }

    /// Moves `image` into the archive and returns its new path.
    ///
    /// Falls back to copy-and-delete when a rename is impossible, e.g. across
    /// filesystems. On failure the image stays where it was.
    pub fn archive(&self, image: &Path) -> Result<PathBuf, ArchiveError> {
        let file_name = image
            .file_name()
            .ok_or_else(|| ArchiveError::InvalidPath(image.display().to_string()))?;

        fs::create_dir_all(&self.archive_dir).map_err(|e| {
            error!("Failed to create archive dir {}: {}", self.archive_dir.display(), e);
            ArchiveError::IoError(e)
        })?;

        let timestamp = Local::now().format(ARCHIVE_TIMESTAMP_FORMAT);
        let dest = self
            .archive_dir
            .join(format!("{}_{}", timestamp, file_name.to_string_lossy()));

        if let Err(rename_err) = fs::rename(image, &dest) {
            debug!("Rename of {} failed ({}), copying instead", image.display(), rename_err);
            fs::copy(image, &dest).map_err(|e| {
                warn!("Failed to move {}: {}", image.display(), e);
                ArchiveError::IoError(e)
            })?;
            if let Err(e) = fs::remove_file(image) {
                let _ = fs::remove_file(&dest);
                warn!("Failed to move {}: {}", image.display(), e);
                return Err(ArchiveError::IoError(e));
            }
        }

        info!("Moved {} to {}", image.display(), dest.display());
        Ok(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn is_archive_name(name: &str, original: &str) -> bool {
        // YYYYMMDD_HHMMSS_<original>
        let (stamp, rest) = name.split_at(15);
        rest == format!("_{}", original)
            && stamp.as_bytes()[8] == b'_'
            && stamp
                .chars()
                .enumerate()
                .all(|(i, c)| i == 8 || c.is_ascii_digit())
    }

    #[test]
    fn test_archive_moves_with_timestamp_prefix() {
        let dir = TempDir::new().unwrap();
        let image = dir.path().join("leaf1.jpg");
        fs::write(&image, b"jpeg").unwrap();
        let archiver = Archiver::new(dir.path().join("processed_images"));

        let dest = archiver.archive(&image).unwrap();

        assert!(!image.exists());
        assert_eq!(fs::read(&dest).unwrap(), b"jpeg");
        assert_eq!(dest.parent().unwrap(), archiver.archive_dir());
        let name = dest.file_name().unwrap().to_str().unwrap();
        assert!(is_archive_name(name, "leaf1.jpg"), "unexpected name {}", name);
    }

    #[test]
    fn test_archive_is_flat() {
        let dir = TempDir::new().unwrap();
        let archiver = Archiver::new(dir.path().join("processed_images"));
        for i in 1..=3 {
            let image = dir.path().join(format!("leaf{}.jpg", i));
            fs::write(&image, b"x").unwrap();
            archiver.archive(&image).unwrap();
        }

        let entries: Vec<_> = fs::read_dir(archiver.archive_dir()).unwrap().collect();
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| e.as_ref().unwrap().path().is_file()));
    }

    #[test]
    fn test_missing_source_is_an_error() {
        let dir = TempDir::new().unwrap();
        let archiver = Archiver::new(dir.path().join("processed_images"));

        let err = archiver.archive(&dir.path().join("leaf9.jpg")).unwrap_err();
        assert!(matches!(err, ArchiveError::IoError(_)));
    }

    #[test]
    fn test_path_without_file_name_is_rejected() {
        let dir = TempDir::new().unwrap();
        let archiver = Archiver::new(dir.path().join("processed_images"));

        let err = archiver.archive(Path::new("/")).unwrap_err();
        assert!(matches!(err, ArchiveError::InvalidPath(_)));
    }
}
