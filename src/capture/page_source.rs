use std::future::Future;
use std::time::Duration;

use log::debug;

use crate::error_handling::types::CaptureError;

/// Something that can hand back the camera page body.
///
/// Implemented over HTTP by [`HttpPageSource`]; tests substitute scripted sources.
pub trait PageSource {
    fn fetch_page(&self) -> impl Future<Output = Result<String, CaptureError>> + Send;
}

/// Blocking-per-attempt GET against the camera's fixed capture URL.
pub struct HttpPageSource {
    client: reqwest::Client,
    url: String,
}

impl HttpPageSource {
    /// `timeout` bounds the whole request; cameras capture before answering, so keep it generous.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, CaptureError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CaptureError::Request(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl PageSource for HttpPageSource {
    async fn fetch_page(&self) -> Result<String, CaptureError> {
        debug!("Requesting {}", self.url);
        let response = self.client.get(&self.url).send().await?.error_for_status()?;
        let body = response.text().await?;
        debug!("Received {} byte(s) from {}", body.len(), self.url);
        Ok(body)
    }
}
