//! Configuration structures for the extraction pipeline.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{RcptError, Result};
use crate::ocr::Language;

/// Main configuration for rcpt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RcptConfig {
    /// Receipt extraction configuration.
    pub extraction: ExtractionConfig,

    /// OCR engine configuration.
    pub ocr: OcrConfig,
}

/// Receipt extraction thresholds.
///
/// The pattern tables are fixed; only the numeric cut-offs are tunable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Vendor lines must be longer than this many characters.
    pub vendor_min_len: usize,

    /// Vendor lines must be shorter than this many characters.
    pub vendor_max_len: usize,

    /// Item lines shorter than this are skipped.
    pub min_item_line_len: usize,

    /// Item names shorter than this are discarded.
    pub min_item_name_len: usize,

    /// Allowed relative difference between the item sum and the total.
    #[serde(with = "rust_decimal::serde::float")]
    pub consistency_tolerance: Decimal,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            vendor_min_len: 3,
            vendor_max_len: 100,
            min_item_line_len: 5,
            min_item_name_len: 2,
            consistency_tolerance: Decimal::new(10, 2),
        }
    }
}

/// OCR engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Languages the engine should recognize.
    pub languages: Vec<Language>,

    /// Engine executable.
    pub command: String,

    /// Extra arguments appended after the language flag.
    pub extra_args: Vec<String>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            languages: Language::ALL.to_vec(),
            command: "tesseract".to_string(),
            extra_args: Vec::new(),
        }
    }
}

impl RcptConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| RcptError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| RcptError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
