//! Extraction of inline base64 JPEG payloads from a camera page.
//!
//! The camera answers with an HTML page holding several `<img>` tags whose
//! sources are `data:image/jpeg;base64,<payload>`. Payloads may be wrapped with
//! CR/LF by the embedded server and are not always padded, so every candidate
//! is cleaned and padded before decoding. A candidate that still fails to
//! decode is skipped on its own; the rest of the batch is kept.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use log::{debug, warn};
use regex::Regex;

use super::types::CapturedImage;
use crate::error_handling::types::CaptureError;

/// Standard alphabet, canonical padding, tolerant of non-zero trailing bits.
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::RequireCanonical),
);

/// Characters a payload may span, line breaks included.
const PAYLOAD_CLASS: &str = r"([A-Za-z0-9+/=\r\n]+)";

#[derive(Debug, Clone)]
pub struct ImageExtractor {
    pattern: Regex,
}

impl ImageExtractor {
    /// Builds an extractor for payloads following `marker` (e.g. `data:image/jpeg;base64,`).
    pub fn new(marker: &str) -> Result<Self, CaptureError> {
        let pattern = Regex::new(&format!("{}{}", regex::escape(marker), PAYLOAD_CLASS))
            .map_err(|e| CaptureError::InvalidPattern(e.to_string()))?;
        Ok(Self { pattern })
    }

    /// Raw payload candidates in order of appearance.
    pub fn find_payloads<'a>(&self, body: &'a str) -> Vec<&'a str> {
        self.pattern
            .captures_iter(body)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str())
            .collect()
    }

    /// Decodes up to `count` images from `body`.
    ///
    /// Fails with [`CaptureError::InsufficientImages`] when fewer than `count`
    /// candidates are present, before any decoding happens. Past that check,
    /// undecodable candidates are dropped individually, so the result can
    /// still be shorter than `count`.
    pub fn extract(&self, body: &str, count: usize) -> Result<Vec<CapturedImage>, CaptureError> {
        let payloads = self.find_payloads(body);
        debug!("Found {} embedded image(s) in response", payloads.len());

        if payloads.len() < count {
            return Err(CaptureError::InsufficientImages {
                expected: count,
                found: payloads.len(),
            });
        }

        let images = payloads
            .into_iter()
            .take(count)
            .enumerate()
            .filter_map(|(i, raw)| {
                let index = i + 1;
                match decode_payload(raw) {
                    Ok(data) => Some(CapturedImage { index, data }),
                    Err(e) => {
                        warn!("Error decoding image {}: {}", index, e);
                        None
                    }
                }
            })
            .collect();
        Ok(images)
    }
}

/// Removes whitespace, drops stray trailing `=` and pads to a multiple of four with `=`.
pub fn normalize_payload(raw: &str) -> String {
    let mut cleaned: String = raw.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    cleaned.truncate(cleaned.trim_end_matches('=').len());
    let missing = (4 - cleaned.len() % 4) % 4;
    cleaned.extend(std::iter::repeat('=').take(missing));
    cleaned
}

pub fn decode_payload(raw: &str) -> Result<Vec<u8>, base64::DecodeError> {
    LENIENT_STANDARD.decode(normalize_payload(raw))
}
