//! Receipt field extraction module.
//!
//! Raw OCR text is split into lines, then the vendor, date, total and item
//! extractors run independently over it. Their outputs are scored and
//! assembled into a [`ReceiptExtractionResult`].

pub mod confidence;
mod parser;
pub mod rules;

pub use confidence::{ConfidenceBreakdown, ConfidenceScorer};
pub use parser::{ExtractionReport, ReceiptParser};

use tracing::warn;

use crate::error::Result;
use crate::models::receipt::ReceiptExtractionResult;
use crate::ocr::{Language, OcrEngine};

/// Trait for receipt extractors.
pub trait ReceiptExtractor {
    /// Extract receipt data with diagnostics.
    fn extract(&self, text: &str) -> ExtractionReport;

    /// Extract receipt data from plain text.
    fn extract_from_text(&self, text: &str) -> ReceiptExtractionResult {
        self.extract(text).result
    }
}

/// Run the OCR engine over an image and extract the receipt from its text.
///
/// Engine failures are returned as errors; extraction itself cannot fail.
pub fn extract_from_image<E, X>(
    engine: &E,
    extractor: &X,
    image: &[u8],
    languages: &[Language],
) -> Result<ExtractionReport>
where
    E: OcrEngine + ?Sized,
    X: ReceiptExtractor + ?Sized,
{
    let text = engine.recognize(image, languages).inspect_err(|e| {
        warn!("OCR failed: {}", e);
    })?;

    Ok(extractor.extract(&text))
}
