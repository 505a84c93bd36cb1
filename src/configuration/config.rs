use super::types::*;
use crate::error_handling::types::ConfigError;
use log::{debug, info};
use serde::Deserialize;
use std::net::IpAddr;
use std::path::Path;

/// Application configuration structure that defines all runtime parameters.
///
/// This structure holds the complete configuration for one deployment: where the
/// camera lives and how patiently to talk to it, which classifier to run, where
/// captured and archived images go, and where the status hand-off file and its
/// web service live. Every component receives the section it needs at
/// construction instead of reading module-level constants, so tests can point
/// each one at a temporary directory or a fake.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use leafwatch::configuration::config::Config;
///
/// let config = Config::from_file(Path::new("leafwatch.toml")).unwrap();
/// println!("Camera: {}", config.camera.url);
/// println!("Images per run: {}", config.camera.image_count);
/// ```
///
/// # Fields Overview
///
/// - `camera`: camera endpoint, expected image count, retry budget and backoffs
/// - `inference`: classifier command line, per-image timeout and pacing
/// - `storage`: input and archive directories
/// - `status`: status file path, web service bind address/port and liveness probe
///
/// Missing sections or keys fall back to [`Default`], which mirrors the values
/// the pipeline has always shipped with.
#[derive(Debug, PartialEq, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Camera endpoint and capture retry policy
    pub camera: CameraConfig,

    /// External classifier invocation
    pub inference: InferenceConfig,

    /// Input and archive directories
    pub storage: StorageConfig,

    /// Status hand-off file and the web service exposing it
    pub status: StatusConfig,
}

impl Config {
    /// Reads and validates a TOML configuration file.
    ///
    /// # Errors
    /// - [`ConfigError::IoError`] when the file cannot be read
    /// - [`ConfigError::TomlError`] when the content is not valid TOML for this structure
    /// - any error returned by [`Config::validate`]
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        info!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        debug!("Configuration parsed: {:?}", config);
        Ok(config)
    }

    /// Checks the invariants the pipeline relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.camera.url.trim().is_empty() {
            return Err(ConfigError::MissingValue("camera.url".to_string()));
        }
        if self.camera.image_count == 0 {
            return Err(ConfigError::NotInRange(
                "camera.image_count must be at least 1".to_string(),
            ));
        }
        if self.camera.max_attempts == 0 {
            return Err(ConfigError::NotInRange(
                "camera.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.camera.marker.is_empty() {
            return Err(ConfigError::MissingValue("camera.marker".to_string()));
        }
        if self.inference.command.first().map_or(true, |p| p.trim().is_empty()) {
            return Err(ConfigError::MissingValue("inference.command".to_string()));
        }
        if self.inference.timeout_secs == 0 {
            return Err(ConfigError::NotInRange(
                "inference.timeout_secs must be at least 1".to_string(),
            ));
        }
        self.status
            .bind_address
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::BadAddress(format!("{}: {}", self.status.bind_address, e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_match_shipped_values() {
        let config = Config::default();

        assert_eq!(config.camera.url, "http://192.168.137.213/capture");
        assert_eq!(config.camera.image_count, 3);
        assert_eq!(config.camera.max_attempts, 3);
        assert_eq!(config.camera.marker, "data:image/jpeg;base64,");
        assert_eq!(config.inference.command, vec!["python", "checking.py"]);
        assert_eq!(config.storage.archive_dir, PathBuf::from("processed_images"));
        assert_eq!(config.status.port, 5000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [camera]
            url = "http://10.0.0.7/capture"
            image_count = 5

            [status]
            port = 8080
            "#,
        )
        .unwrap_or_else(|e| panic!("{}", e));

        assert_eq!(config.camera.url, "http://10.0.0.7/capture");
        assert_eq!(config.camera.image_count, 5);
        assert_eq!(config.camera.request_timeout_secs, 60);
        assert_eq!(config.status.port, 8080);
        assert_eq!(config.status.probe_url(), "http://127.0.0.1:8080/status_info");
        assert_eq!(config.inference, InferenceConfig::default());
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [inference]
            command = ["./classify.sh"]
            timeout_secs = 10

            [storage]
            input_dir = "/tmp/in"
            "#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.inference.command, vec!["./classify.sh"]);
        assert_eq!(config.inference.timeout().as_secs(), 10);
        assert_eq!(config.storage.input_dir, PathBuf::from("/tmp/in"));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file(Path::new("/nonexistent/leafwatch.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml_str("[camera\nurl = ").unwrap_err();
        assert!(matches!(err, ConfigError::TomlError(_)));
    }

    #[test]
    fn test_zero_image_count_rejected() {
        let err = Config::from_toml_str("[camera]\nimage_count = 0").unwrap_err();
        assert!(matches!(err, ConfigError::NotInRange(_)));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let err = Config::from_toml_str("[camera]\nmax_attempts = 0").unwrap_err();
        assert!(matches!(err, ConfigError::NotInRange(_)));
    }

    #[test]
    fn test_empty_command_rejected() {
        let err = Config::from_toml_str("[inference]\ncommand = []").unwrap_err();
        assert!(matches!(err, ConfigError::MissingValue(_)));
    }

    #[test]
    fn test_bad_bind_address_rejected() {
        let err = Config::from_toml_str("[status]\nbind_address = \"localhost:80\"").unwrap_err();
        assert!(matches!(err, ConfigError::BadAddress(_)));
    }
}
