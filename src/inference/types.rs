use std::fmt;

/// Outcome of classifying one image.
///
/// Only `Label` comes from the classifier itself; the other variants stand in
/// for a missing or failed run and render as their fixed sentinel text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InferenceResult {
    Label(String),
    NoOutput,
    Timeout,
    Error,
}

impl InferenceResult {
    /// Wraps raw classifier output, trimming it and mapping blank output to `NoOutput`.
    pub fn from_output(output: &str) -> Self {
        let trimmed = output.trim();
        if trimmed.is_empty() {
            InferenceResult::NoOutput
        } else {
            InferenceResult::Label(trimmed.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            InferenceResult::Label(label) => label,
            InferenceResult::NoOutput => "No output",
            InferenceResult::Timeout => "Timeout",
            InferenceResult::Error => "Error",
        }
    }

    pub fn is_sentinel(&self) -> bool {
        !matches!(self, InferenceResult::Label(_))
    }
}

impl AsRef<str> for InferenceResult {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for InferenceResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
