//! Camera capture with a bounded retry loop.
//!
//! [`ImageCapture`] fetches the camera page through a [`PageSource`], extracts
//! the embedded images and writes them as `<prefix><n>.jpg` in the input
//! directory, overwriting files left by earlier runs. Every failure of an
//! attempt (timeout, connection or HTTP error, too few images in the body, or
//! too few images surviving decoding) consumes one attempt and is followed by
//! a backoff sleep, unless it was the last one.
//!
//! ```text
//! attempt 1 ──fail──▶ sleep(backoff) ──▶ attempt 2 ──fail──▶ sleep ──▶ attempt 3 ──fail──▶ give up
//!     │                                      │                            │
//!     └──ok: N files──▶ return               └──ok──▶ return              └──ok──▶ return
//! ```
//!
//! A timeout waits longer than any other failure, since the camera is most
//! likely still busy capturing.

use std::path::PathBuf;
use std::time::Duration;

use log::{debug, error, info, warn};

use super::extractor::ImageExtractor;
use super::page_source::PageSource;
use super::types::{CaptureOutcome, CapturedImage};
use crate::configuration::types::{CameraConfig, StorageConfig};
use crate::error_handling::types::CaptureError;

/// Knobs of the retry loop, usually derived from [`CameraConfig`] and [`StorageConfig`].
#[derive(Debug, Clone)]
pub struct CaptureSettings {
    pub image_count: usize,
    pub max_attempts: u32,
    pub timeout_backoff: Duration,
    pub error_backoff: Duration,
    pub image_delay: Duration,
    pub output_dir: PathBuf,
    pub file_prefix: String,
    pub debug_response_path: Option<PathBuf>,
}

impl CaptureSettings {
    pub fn from_config(camera: &CameraConfig, storage: &StorageConfig) -> Self {
        Self {
            image_count: camera.image_count,
            max_attempts: camera.max_attempts,
            timeout_backoff: camera.timeout_backoff(),
            error_backoff: camera.error_backoff(),
            image_delay: camera.image_delay(),
            output_dir: storage.input_dir.clone(),
            file_prefix: camera.file_prefix.clone(),
            debug_response_path: camera.debug_response_path.clone(),
        }
    }

    fn backoff_for(&self, err: &CaptureError) -> Duration {
        if err.is_timeout() {
            self.timeout_backoff
        } else {
            self.error_backoff
        }
    }
}

pub struct ImageCapture<S> {
    source: S,
    extractor: ImageExtractor,
    settings: CaptureSettings,
}

impl<S: PageSource> ImageCapture<S> {
    pub fn new(source: S, extractor: ImageExtractor, settings: CaptureSettings) -> Self {
        Self {
            source,
            extractor,
            settings,
        }
    }

    pub fn settings(&self) -> &CaptureSettings {
        &self.settings
    }

    /// Path an image with the given 1-based ordinal is written to.
    pub fn image_path(&self, index: usize) -> PathBuf {
        self.settings
            .output_dir
            .join(format!("{}{}.jpg", self.settings.file_prefix, index))
    }

    /// Runs the retry loop and returns the files of the best attempt.
    ///
    /// Never fails: an exhausted budget yields the last partial set (possibly
    /// empty), which callers treat as a hard stop when empty.
    pub async fn capture(&self) -> CaptureOutcome {
        let max_attempts = self.settings.max_attempts;
        let expected = self.settings.image_count;
        let mut saved = Vec::new();
        let mut attempts = 0;

        for attempt in 1..=max_attempts {
            attempts = attempt;
            info!("Fetching images from camera (attempt {}/{})", attempt, max_attempts);

            let err = match self.attempt().await {
                Ok(files) if files.len() >= expected => {
                    info!("Successfully saved {} image(s)", files.len());
                    return CaptureOutcome {
                        saved: files,
                        attempts,
                    };
                }
                Ok(files) => {
                    let err = CaptureError::IncompleteDecode {
                        expected,
                        decoded: files.len(),
                    };
                    saved = files;
                    err
                }
                Err(e) => e,
            };

            warn!("Capture attempt {}/{} failed: {}", attempt, max_attempts, err);
            if attempt < max_attempts {
                let backoff = self.settings.backoff_for(&err);
                if err.is_timeout() {
                    info!("Camera may still be capturing, waiting {:?} before retrying", backoff);
                } else {
                    debug!("Waiting {:?} before retrying", backoff);
                }
                tokio::time::sleep(backoff).await;
            }
        }

        error!(
            "Failed to get {} valid image(s) after {} attempt(s)",
            expected, attempts
        );
        CaptureOutcome { saved, attempts }
    }

    async fn attempt(&self) -> Result<Vec<PathBuf>, CaptureError> {
        let body = self.source.fetch_page().await?;
        self.dump_response(&body).await;

        let images = self.extractor.extract(&body, self.settings.image_count)?;
        tokio::fs::create_dir_all(&self.settings.output_dir).await?;

        let mut files = Vec::with_capacity(images.len());
        for image in images {
            if let Some(path) = self.save_image(&image).await {
                files.push(path);
                tokio::time::sleep(self.settings.image_delay).await;
            }
        }
        Ok(files)
    }

    async fn save_image(&self, image: &CapturedImage) -> Option<PathBuf> {
        let path = self.image_path(image.index);
        match tokio::fs::write(&path, &image.data).await {
            Ok(()) => {
                info!("Saved {} ({} bytes)", path.display(), image.data.len());
                Some(path)
            }
            Err(e) => {
                warn!("Failed to write image {} to {}: {}", image.index, path.display(), e);
                None
            }
        }
    }

    /// Keeps the last camera answer around for troubleshooting.
    async fn dump_response(&self, body: &str) {
        let Some(path) = &self.settings.debug_response_path else {
            return;
        };
        match tokio::fs::write(path, body).await {
            Ok(()) => debug!("Saved camera response to {}", path.display()),
            Err(e) => warn!("Failed to save camera response to {}: {}", path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use tempfile::TempDir;

    const MARKER: &str = "data:image/jpeg;base64,";

    /// Replays queued responses; once drained, keeps answering with `fallback`.
    struct ScriptedSource {
        script: Mutex<VecDeque<Result<String, CaptureError>>>,
        fallback: String,
        calls: AtomicU32,
    }

    impl ScriptedSource {
        fn new(script: Vec<Result<String, CaptureError>>, fallback: &str) -> Self {
            Self {
                script: Mutex::new(script.into()),
                fallback: fallback.to_string(),
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl PageSource for &ScriptedSource {
        async fn fetch_page(&self) -> Result<String, CaptureError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self.script.lock().unwrap().pop_front();
            next.unwrap_or_else(|| Ok(self.fallback.clone()))
        }
    }

    fn page_with(payloads: &[&str]) -> String {
        payloads
            .iter()
            .map(|p| format!("<img src=\"{}{}\">", MARKER, STANDARD.encode(p)))
            .collect()
    }

    fn settings(dir: &TempDir, count: usize) -> CaptureSettings {
        CaptureSettings {
            image_count: count,
            max_attempts: 3,
            timeout_backoff: Duration::ZERO,
            error_backoff: Duration::ZERO,
            image_delay: Duration::ZERO,
            output_dir: dir.path().join("input_images"),
            file_prefix: "leaf".to_string(),
            debug_response_path: None,
        }
    }

    fn capture<'a>(source: &'a ScriptedSource, settings: CaptureSettings) -> ImageCapture<&'a ScriptedSource> {
        ImageCapture::new(source, ImageExtractor::new(MARKER).unwrap(), settings)
    }

    #[tokio::test]
    async fn first_attempt_success() {
        let dir = TempDir::new().unwrap();
        let source = ScriptedSource::new(vec![], &page_with(&["a", "b", "c"]));

        let outcome = capture(&source, settings(&dir, 3)).capture().await;

        assert_eq!(outcome.attempts, 1);
        assert_eq!(source.calls(), 1);
        assert_eq!(outcome.saved.len(), 3);
        let input = dir.path().join("input_images");
        assert_eq!(outcome.saved[0], input.join("leaf1.jpg"));
        assert_eq!(outcome.saved[2], input.join("leaf3.jpg"));
        assert_eq!(std::fs::read(input.join("leaf2.jpg")).unwrap(), b"b");
    }

    #[tokio::test]
    async fn recovers_after_two_transient_failures() {
        let dir = TempDir::new().unwrap();
        let source = ScriptedSource::new(
            vec![
                Err(CaptureError::Timeout),
                Err(CaptureError::Request("connection refused".into())),
            ],
            &page_with(&["x", "y", "z"]),
        );

        let outcome = capture(&source, settings(&dir, 3)).capture().await;

        assert_eq!(outcome.attempts, 3);
        assert_eq!(source.calls(), 3);
        assert_eq!(outcome.saved.len(), 3);
    }

    #[tokio::test]
    async fn short_page_is_retried() {
        let dir = TempDir::new().unwrap();
        let source = ScriptedSource::new(
            vec![Ok(page_with(&["only one"]))],
            &page_with(&["a", "b"]),
        );

        let outcome = capture(&source, settings(&dir, 2)).capture().await;

        assert_eq!(outcome.attempts, 2);
        assert_eq!(outcome.saved.len(), 2);
    }

    #[tokio::test]
    async fn exhaustion_returns_empty() {
        let dir = TempDir::new().unwrap();
        let source = ScriptedSource::new(vec![], &page_with(&["a"]));

        let outcome = capture(&source, settings(&dir, 3)).capture().await;

        assert!(outcome.is_empty());
        assert_eq!(outcome.attempts, 3);
        assert_eq!(source.calls(), 3);
        assert!(!dir.path().join("input_images").join("leaf1.jpg").exists());
    }

    #[tokio::test]
    async fn partial_decode_is_returned_after_exhaustion() {
        let dir = TempDir::new().unwrap();
        let body = format!(
            "{}<img src=\"{}A\">",
            page_with(&["good"]),
            MARKER
        );
        let source = ScriptedSource::new(vec![], &body);

        let outcome = capture(&source, settings(&dir, 2)).capture().await;

        assert_eq!(outcome.attempts, 3);
        assert_eq!(outcome.saved, vec![dir.path().join("input_images").join("leaf1.jpg")]);
    }

    #[tokio::test]
    async fn overwrites_previous_run() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("input_images");
        std::fs::create_dir_all(&input).unwrap();
        std::fs::write(input.join("leaf1.jpg"), b"stale").unwrap();
        let source = ScriptedSource::new(vec![], &page_with(&["fresh"]));

        let outcome = capture(&source, settings(&dir, 1)).capture().await;

        assert_eq!(outcome.saved.len(), 1);
        assert_eq!(std::fs::read(input.join("leaf1.jpg")).unwrap(), b"fresh");
    }

    #[tokio::test]
    async fn response_is_dumped_for_troubleshooting() {
        let dir = TempDir::new().unwrap();
        let dump = dir.path().join("camera_response.html");
        let body = page_with(&["a"]);
        let source = ScriptedSource::new(vec![], &body);
        let mut settings = settings(&dir, 1);
        settings.debug_response_path = Some(dump.clone());

        capture(&source, settings).capture().await;

        assert_eq!(std::fs::read_to_string(dump).unwrap(), body);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_backs_off_longer_than_other_errors() {
        let dir = TempDir::new().unwrap();
        let source = ScriptedSource::new(
            vec![
                Err(CaptureError::Timeout),
                Err(CaptureError::HttpStatus(500)),
            ],
            &page_with(&["a"]),
        );
        let mut settings = settings(&dir, 1);
        settings.timeout_backoff = Duration::from_secs(5);
        settings.error_backoff = Duration::from_secs(3);

        let start = tokio::time::Instant::now();
        let outcome = capture(&source, settings).capture().await;

        assert_eq!(outcome.attempts, 3);
        assert!(start.elapsed() >= Duration::from_secs(8));
    }

    #[tokio::test(start_paused = true)]
    async fn no_sleep_after_last_attempt() {
        let dir = TempDir::new().unwrap();
        let source = ScriptedSource::new(vec![], "<html>camera busy</html>");
        let mut settings = settings(&dir, 1);
        settings.max_attempts = 1;
        settings.error_backoff = Duration::from_secs(3);

        let start = tokio::time::Instant::now();
        let outcome = capture(&source, settings).capture().await;

        assert!(outcome.is_empty());
        assert!(start.elapsed() < Duration::from_secs(3));
    }
}
