//! Filesystem persistence.
//!
//! - `archiver`: timestamped relocation of processed images.
//! - `status_file`: the single-writer status hand-off read by the web service.
//! - `types`: published status vocabulary and the status-info payload.

pub mod archiver;
pub mod status_file;
pub mod types;

pub use archiver::Archiver;
pub use status_file::StatusFile;
pub use types::{PublishedStatus, StatusInfo};
