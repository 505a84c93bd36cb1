use serde::{Serialize, Serializer};
use std::fmt;

use crate::analysis::types::HealthStatus;

/// The two strings ever written to the status file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishedStatus {
    Healthy,
    DiseaseDetected,
}

impl PublishedStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublishedStatus::Healthy => "Healthy",
            PublishedStatus::DiseaseDetected => "Disease Detected",
        }
    }
}

impl From<HealthStatus> for PublishedStatus {
    fn from(status: HealthStatus) -> Self {
        match status {
            HealthStatus::Healthy => PublishedStatus::Healthy,
            HealthStatus::Infected | HealthStatus::Unknown => PublishedStatus::DiseaseDetected,
        }
    }
}

impl fmt::Display for PublishedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Body of `GET /status_info`.
///
/// `updated` is the status file's modification time in seconds since the
/// epoch, serialized as the integer `0` when the file is missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusInfo {
    pub status: String,
    #[serde(serialize_with = "serialize_updated")]
    pub updated: f64,
}

impl StatusInfo {
    pub const NOT_FOUND: &'static str = "File not found";

    pub fn not_found() -> Self {
        Self {
            status: Self::NOT_FOUND.to_string(),
            updated: 0.0,
        }
    }
}

fn serialize_updated<S: Serializer>(updated: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if *updated == 0.0 {
        serializer.serialize_u64(0)
    } else {
        serializer.serialize_f64(*updated)
    }
}
