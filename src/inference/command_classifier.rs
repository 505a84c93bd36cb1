use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::process::Command;

use super::classifier::Classifier;
use super::types::InferenceResult;
use crate::configuration::types::InferenceConfig;

/// Runs an external classifier once per image.
///
/// The configured command line gets the image path appended as its last
/// argument. Standard output is the result; standard error is logged and
/// otherwise ignored. The exit status is not interpreted.
///
/// The child is spawned with `kill_on_drop(true)`: when the timeout fires the
/// pending wait is dropped and the process is killed with it.
#[derive(Debug, Clone)]
pub struct CommandClassifier {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandClassifier {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    /// Builds the classifier from `inference.command`; `None` when the command is empty.
    pub fn from_config(config: &InferenceConfig) -> Option<Self> {
        let (program, args) = config.command.split_first()?;
        Some(Self::new(program.clone(), args.to_vec(), config.timeout()))
    }
}

impl Classifier for CommandClassifier {
    async fn classify(&self, image: &Path) -> InferenceResult {
        let name = image
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| image.display().to_string());
        info!("Processing {} ...", name);

        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(image)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let child = match child {
            Ok(child) => child,
            Err(e) => {
                error!("Failed to run classifier {}: {}", self.program, e);
                return InferenceResult::Error;
            }
        };

        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                if !stderr.trim().is_empty() {
                    warn!("Classifier stderr for {}: {}", name, stderr.trim());
                }
                if !output.status.success() {
                    warn!("Classifier exited with {} for {}", output.status, name);
                }
                let result = InferenceResult::from_output(&String::from_utf8_lossy(&output.stdout));
                info!("Result for {}: {}", name, result);
                result
            }
            Ok(Err(e)) => {
                error!("Classifier execution failed for {}: {}", name, e);
                InferenceResult::Error
            }
            Err(_) => {
                warn!("Inference timeout for {} after {:?}", name, self.timeout);
                debug!("Classifier process for {} killed on drop", name);
                InferenceResult::Timeout
            }
        }
    }
}
