use std::future::Future;
use std::path::Path;

use super::types::InferenceResult;

/// Image classification capability.
///
/// Implementations must not fail: every problem degrades to a sentinel
/// [`InferenceResult`] so the remaining images of a batch are still processed.
pub trait Classifier {
    fn classify(&self, image: &Path) -> impl Future<Output = InferenceResult> + Send;
}
