use std::sync::Arc;

use log::{error, info};

use super::pipeline::{Pipeline, PipelineDelays, PipelineReport};
use crate::capture::extractor::ImageExtractor;
use crate::capture::image_capture::{CaptureSettings, ImageCapture};
use crate::capture::page_source::HttpPageSource;
use crate::configuration::config::Config;
use crate::error_handling::types::*;
use crate::inference::command_classifier::CommandClassifier;
use crate::storage::archiver::Archiver;
use crate::storage::status_file::StatusFile;
use crate::web_interface::probe::status_service_responding;
use crate::web_interface::web_server::WebServer;

/// Wires the production components together from a validated [`Config`].
pub struct Controller {
    pub config: Config,
    pipeline: Pipeline<HttpPageSource, CommandClassifier>,
}

impl Controller {
    pub fn new(config: Config) -> Result<Self, ControllerError> {
        config.validate().map_err(|e| {
            error!("Invalid configuration: {}", e);
            ControllerError::ConfigurationError(e)
        })?;

        let source = HttpPageSource::new(config.camera.url.clone(), config.camera.request_timeout())?;
        let extractor = ImageExtractor::new(&config.camera.marker)?;
        let capture = ImageCapture::new(
            source,
            extractor,
            CaptureSettings::from_config(&config.camera, &config.storage),
        );

        let classifier = CommandClassifier::from_config(&config.inference).ok_or_else(|| {
            ControllerError::ConfigurationError(ConfigError::MissingValue(
                "inference.command".to_string(),
            ))
        })?;

        let pipeline = Pipeline::new(
            capture,
            classifier,
            Archiver::new(&config.storage.archive_dir),
            StatusFile::new(&config.status.status_file),
            PipelineDelays {
                inference: config.inference.delay(),
                archive: config.storage.archive_delay(),
            },
        );

        Ok(Self { config, pipeline })
    }

    /// One full pipeline run.
    pub async fn run_pipeline(&self) -> Result<PipelineReport, ControllerError> {
        info!("Starting leaf health pipeline against {}", self.config.camera.url);
        let report = self.pipeline.run().await?;
        info!(
            "[{}] Run finished after {} capture attempt(s)",
            report.run_id, report.capture_attempts
        );
        Ok(report)
    }

    /// Whether a status service already answers on the configured port.
    pub async fn status_service_running(&self) -> bool {
        status_service_responding(&self.config.status.probe_url(), self.config.status.probe_timeout())
            .await
    }

    /// Serves the status endpoints until the process stops.
    pub async fn serve(&self) -> Result<(), ControllerError> {
        let server = WebServer::new(Arc::new(StatusFile::new(&self.config.status.status_file)));
        server
            .start(&self.config.status.bind_address, self.config.status.port)
            .await?;
        Ok(())
    }
}
