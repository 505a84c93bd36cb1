use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, PartialEq, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub url: String,
    pub image_count: usize,
    pub request_timeout_secs: u64,
    pub max_attempts: u32,
    pub timeout_backoff_ms: u64,
    pub error_backoff_ms: u64,
    pub image_delay_ms: u64,
    pub marker: String,
    pub file_prefix: String,
    pub debug_response_path: Option<PathBuf>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            url: String::from("http://192.168.137.213/capture"),
            image_count: 3,
            request_timeout_secs: 60,
            max_attempts: 3,
            timeout_backoff_ms: 5000,
            error_backoff_ms: 3000,
            image_delay_ms: 500,
            marker: String::from("data:image/jpeg;base64,"),
            file_prefix: String::from("leaf"),
            debug_response_path: Some(PathBuf::from("camera_response.html")),
        }
    }
}

impl CameraConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn timeout_backoff(&self) -> Duration {
        Duration::from_millis(self.timeout_backoff_ms)
    }

    pub fn error_backoff(&self) -> Duration {
        Duration::from_millis(self.error_backoff_ms)
    }

    pub fn image_delay(&self) -> Duration {
        Duration::from_millis(self.image_delay_ms)
    }
}

/// External classifier invocation. The image path is appended after `command`.
#[derive(Debug, PartialEq, Clone, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub command: Vec<String>,
    pub timeout_secs: u64,
    pub delay_ms: u64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            command: vec![String::from("python"), String::from("checking.py")],
            timeout_secs: 60,
            delay_ms: 1000,
        }
    }
}

impl InferenceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Debug, PartialEq, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub input_dir: PathBuf,
    pub archive_dir: PathBuf,
    pub archive_delay_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input_images"),
            archive_dir: PathBuf::from("processed_images"),
            archive_delay_ms: 500,
        }
    }
}

impl StorageConfig {
    pub fn archive_delay(&self) -> Duration {
        Duration::from_millis(self.archive_delay_ms)
    }
}

#[derive(Debug, PartialEq, Clone, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    pub status_file: PathBuf,
    pub bind_address: String,
    pub port: u16,
    pub probe_host: String,
    pub probe_timeout_secs: u64,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            status_file: PathBuf::from("status.txt"),
            bind_address: String::from("0.0.0.0"),
            port: 5000,
            probe_host: String::from("127.0.0.1"),
            probe_timeout_secs: 3,
        }
    }
}

impl StatusConfig {
    /// URL of the `/status_info` route of a locally running status service.
    pub fn probe_url(&self) -> String {
        format!("http://{}:{}/status_info", self.probe_host, self.port)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}
