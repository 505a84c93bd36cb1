use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    TomlError(String),
    MissingValue(String),
    NotInRange(String),
    BadAddress(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::TomlError(e) => write!(f, "TOML parsing error: {}", e),
            ConfigError::MissingValue(e) => write!(f, "Missing configuration value: {}", e),
            ConfigError::NotInRange(e) => write!(f, "Value out of range: {}", e),
            ConfigError::BadAddress(e) => write!(f, "Address formatting error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::TomlError(err.to_string())
    }
}

/// Failures of a single camera fetch attempt.
///
/// Every variant is retryable; [`CaptureError::is_timeout`] selects the longer backoff.
#[derive(Debug)]
pub enum CaptureError {
    Timeout,
    Request(String),
    HttpStatus(u16),
    InsufficientImages { expected: usize, found: usize },
    IncompleteDecode { expected: usize, decoded: usize },
    InvalidPattern(String),
    IoError(std::io::Error),
}

impl CaptureError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, CaptureError::Timeout)
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::Timeout => write!(f, "Camera request timed out"),
            CaptureError::Request(e) => write!(f, "Camera request error: {}", e),
            CaptureError::HttpStatus(code) => write!(f, "Camera answered with HTTP {}", code),
            CaptureError::InsufficientImages { expected, found } => {
                write!(f, "Expected {} images, found {}", expected, found)
            }
            CaptureError::IncompleteDecode { expected, decoded } => {
                write!(f, "Expected {} images, decoded {}", expected, decoded)
            }
            CaptureError::InvalidPattern(e) => write!(f, "Invalid image marker pattern: {}", e),
            CaptureError::IoError(e) => write!(f, "Capture IO error: {}", e),
        }
    }
}

impl std::error::Error for CaptureError {}

impl From<std::io::Error> for CaptureError {
    fn from(err: std::io::Error) -> Self {
        CaptureError::IoError(err)
    }
}

impl From<reqwest::Error> for CaptureError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CaptureError::Timeout
        } else if let Some(status) = err.status() {
            CaptureError::HttpStatus(status.as_u16())
        } else {
            CaptureError::Request(err.to_string())
        }
    }
}

#[derive(Debug)]
pub enum ArchiveError {
    InvalidPath(String),
    IoError(std::io::Error),
}

impl fmt::Display for ArchiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchiveError::InvalidPath(e) => write!(f, "Invalid archive source: {}", e),
            ArchiveError::IoError(e) => write!(f, "Archive IO error: {}", e),
        }
    }
}

impl std::error::Error for ArchiveError {}

impl From<std::io::Error> for ArchiveError {
    fn from(err: std::io::Error) -> Self {
        ArchiveError::IoError(err)
    }
}

#[derive(Debug)]
pub enum StatusError {
    WriteFailed(std::io::Error),
    ReadFailed(std::io::Error),
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusError::WriteFailed(e) => write!(f, "Status file write failed: {}", e),
            StatusError::ReadFailed(e) => write!(f, "Status file read failed: {}", e),
        }
    }
}

impl std::error::Error for StatusError {}

#[derive(Debug)]
pub enum WebError {
    InvalidAddress(String),
    BindFailed(std::io::Error),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebError::InvalidAddress(e) => write!(f, "Invalid bind address: {}", e),
            WebError::BindFailed(e) => write!(f, "Failed to bind status server: {}", e),
        }
    }
}

impl std::error::Error for WebError {}

#[derive(Debug)]
pub enum PipelineError {
    NoImagesCaptured { attempts: u32 },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::NoImagesCaptured { attempts } => {
                write!(f, "No images captured after {} attempt(s)", attempts)
            }
        }
    }
}

impl std::error::Error for PipelineError {}

#[derive(Debug)]
pub enum ControllerError {
    ConfigurationError(ConfigError),
    CaptureError(CaptureError),
    PipelineError(PipelineError),
    WebError(WebError),
}

impl fmt::Display for ControllerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerError::ConfigurationError(e) => write!(f, "Configuration error: {}", e),
            ControllerError::CaptureError(e) => write!(f, "Capture error: {}", e),
            ControllerError::PipelineError(e) => write!(f, "Pipeline error: {}", e),
            ControllerError::WebError(e) => write!(f, "Web error: {}", e),
        }
    }
}

impl std::error::Error for ControllerError {}

impl From<ConfigError> for ControllerError {
    fn from(err: ConfigError) -> Self {
        ControllerError::ConfigurationError(err)
    }
}

impl From<CaptureError> for ControllerError {
    fn from(err: CaptureError) -> Self {
        ControllerError::CaptureError(err)
    }
}

impl From<PipelineError> for ControllerError {
    fn from(err: PipelineError) -> Self {
        ControllerError::PipelineError(err)
    }
}

impl From<WebError> for ControllerError {
    fn from(err: WebError) -> Self {
        ControllerError::WebError(err)
    }
}
