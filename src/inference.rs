//! Per-image classification.
//!
//! [`Classifier`] is the capability the pipeline depends on; [`CommandClassifier`]
//! fulfils it by running an external program with a timeout.

pub mod classifier;
pub mod command_classifier;
pub mod types;

pub use classifier::Classifier;
pub use command_classifier::CommandClassifier;
pub use types::InferenceResult;
