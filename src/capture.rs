//! Camera capture subsystem.
//!
//! - [`PageSource`] / [`HttpPageSource`]: fetch the camera page.
//! - [`ImageExtractor`]: find and decode the inline JPEG payloads.
//! - [`ImageCapture`]: retry loop writing the decoded images to the input directory.

pub mod extractor;
pub mod image_capture;
pub mod page_source;
pub mod types;

pub use extractor::ImageExtractor;
pub use image_capture::{CaptureSettings, ImageCapture};
pub use page_source::{HttpPageSource, PageSource};
pub use types::{CaptureOutcome, CapturedImage};
