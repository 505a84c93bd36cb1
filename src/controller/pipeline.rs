//! One end-to-end run: capture, classify, archive, aggregate, publish.
//!
//! Every stage runs strictly after the previous one, one image at a time.
//! Only an empty capture stops a run; classifier, archive and status-file
//! failures are logged and the run carries on.
//!
//! ```text
//! ImageCapture ──▶ Classifier (per image) ──▶ Archiver (per image) ──▶ aggregate ──▶ StatusFile
//! ```

use std::path::PathBuf;
use std::time::Duration;

use log::{error, info, warn};
use uuid::Uuid;

use crate::analysis::aggregator::aggregate;
use crate::analysis::report::{render_report, ReportRow};
use crate::analysis::types::Verdict;
use crate::capture::image_capture::ImageCapture;
use crate::capture::page_source::PageSource;
use crate::error_handling::types::PipelineError;
use crate::inference::classifier::Classifier;
use crate::inference::types::InferenceResult;
use crate::storage::archiver::Archiver;
use crate::storage::status_file::StatusFile;
use crate::storage::types::PublishedStatus;

/// A captured image and what the classifier said about it.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRecord {
    pub path: PathBuf,
    pub result: InferenceResult,
    /// Where the image ended up; `None` when archiving failed and it stayed in place.
    pub archived_to: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub run_id: Uuid,
    pub capture_attempts: u32,
    pub records: Vec<ImageRecord>,
    pub verdict: Verdict,
    /// `None` when the status file could not be written.
    pub published: Option<PublishedStatus>,
}

impl PipelineReport {
    pub fn render(&self) -> String {
        let rows: Vec<ReportRow<'_>> = self
            .records
            .iter()
            .map(|r| ReportRow {
                image: &r.path,
                result: r.result.as_str(),
            })
            .collect();
        render_report(&rows, &self.verdict)
    }
}

/// Pacing between per-image operations.
#[derive(Debug, Clone, Default)]
pub struct PipelineDelays {
    pub inference: Duration,
    pub archive: Duration,
}

pub struct Pipeline<S, C> {
    capture: ImageCapture<S>,
    classifier: C,
    archiver: Archiver,
    status_file: StatusFile,
    delays: PipelineDelays,
}

impl<S: PageSource, C: Classifier> Pipeline<S, C> {
    pub fn new(
        capture: ImageCapture<S>,
        classifier: C,
        archiver: Archiver,
        status_file: StatusFile,
        delays: PipelineDelays,
    ) -> Self {
        Self {
            capture,
            classifier,
            archiver,
            status_file,
            delays,
        }
    }

    pub async fn run(&self) -> Result<PipelineReport, PipelineError> {
        let run_id = Uuid::new_v4();
        info!("[{}] Step 1: fetching images from camera", run_id);
        let outcome = self.capture.capture().await;

        if outcome.is_empty() {
            error!("[{}] No images captured, aborting run", run_id);
            info!("[{}] Troubleshooting:", run_id);
            info!("[{}]   1. Check the camera address is correct", run_id);
            info!("[{}]   2. Verify the camera is powered and connected to Wi-Fi", run_id);
            match &self.capture.settings().debug_response_path {
                Some(path) => info!("[{}]   3. Review {} for error details", run_id, path.display()),
                None => info!("[{}]   3. Enable camera.debug_response_path to inspect responses", run_id),
            }
            return Err(PipelineError::NoImagesCaptured {
                attempts: outcome.attempts,
            });
        }

        info!(
            "[{}] Step 2: running inference on {} image(s)",
            run_id,
            outcome.saved.len()
        );
        let mut records = Vec::with_capacity(outcome.saved.len());
        for path in outcome.saved {
            let result = self.classifier.classify(&path).await;
            records.push(ImageRecord {
                path,
                result,
                archived_to: None,
            });
            tokio::time::sleep(self.delays.inference).await;
        }

        let unclassified = records.iter().filter(|r| r.result.is_sentinel()).count();
        if unclassified > 0 {
            warn!(
                "[{}] {} image(s) without a classifier result, counted as not infected",
                run_id, unclassified
            );
        }

        info!(
            "[{}] Step 3: archiving processed images to {}",
            run_id,
            self.archiver.archive_dir().display()
        );
        for record in &mut records {
            match self.archiver.archive(&record.path) {
                Ok(dest) => record.archived_to = Some(dest),
                Err(e) => warn!("[{}] Failed to move {}: {}", run_id, record.path.display(), e),
            }
            tokio::time::sleep(self.delays.archive).await;
        }

        info!("[{}] Step 4: analyzing results", run_id);
        let results: Vec<&InferenceResult> = records.iter().map(|r| &r.result).collect();
        let verdict = aggregate(&results);
        info!(
            "[{}] Overall condition: {} ({:?}% infected)",
            run_id, verdict.status, verdict.percentage
        );

        info!("[{}] Step 5: publishing status", run_id);
        let status = PublishedStatus::from(verdict.status);
        let published = match self.status_file.publish(status) {
            Ok(()) => Some(status),
            Err(e) => {
                warn!("[{}] Status not published, previous status stays: {}", run_id, e);
                None
            }
        };

        Ok(PipelineReport {
            run_id,
            capture_attempts: outcome.attempts,
            records,
            verdict,
            published,
        })
    }
}
