//! Data types shared by the capture subsystem.

use std::path::PathBuf;

/// One decoded image, numbered by its position among the marker matches (1-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    pub index: usize,
    pub data: Vec<u8>,
}

/// Result of the capture retry loop.
///
/// `saved` never holds more than the requested image count. An empty list means
/// the attempt budget was exhausted without a usable response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureOutcome {
    pub saved: Vec<PathBuf>,
    pub attempts: u32,
}

impl CaptureOutcome {
    pub fn is_empty(&self) -> bool {
        self.saved.is_empty()
    }
}
