use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealthStatus {
    Healthy,
    Infected,
    Unknown,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "Healthy",
            HealthStatus::Infected => "Infected",
            HealthStatus::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Health of a batch of images: overall status and the share of infected images (0..=100).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Verdict {
    pub status: HealthStatus,
    pub percentage: f64,
}

impl Verdict {
    pub fn unknown() -> Self {
        Self {
            status: HealthStatus::Unknown,
            percentage: 0.0,
        }
    }
}
