//! Boundary to the external image-to-text OCR engine.
//!
//! Recognition itself is not part of this crate. Engines implement
//! [`OcrEngine`] and hand back raw text for the receipt parser.

#[cfg(feature = "native")]
mod tesseract;

#[cfg(feature = "native")]
pub use tesseract::TesseractEngine;

use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// Languages supported by the receipt rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "eng")]
    English,
    #[serde(rename = "rus")]
    Russian,
    #[serde(rename = "ukr")]
    Ukrainian,
    #[serde(rename = "pol")]
    Polish,
    #[serde(rename = "bel")]
    Belarusian,
}

impl Language {
    /// Every supported language, in engine preference order.
    pub const ALL: [Language; 5] = [
        Language::English,
        Language::Russian,
        Language::Ukrainian,
        Language::Polish,
        Language::Belarusian,
    ];

    /// Engine language code.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "eng",
            Language::Russian => "rus",
            Language::Ukrainian => "ukr",
            Language::Polish => "pol",
            Language::Belarusian => "bel",
        }
    }

    /// Parse an engine language code.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|l| l.code().eq_ignore_ascii_case(code.trim()))
    }

    /// Join languages into a `+` separated engine argument.
    pub fn join_codes(languages: &[Language]) -> String {
        languages
            .iter()
            .map(Language::code)
            .collect::<Vec<_>>()
            .join("+")
    }
}

/// An image-to-text engine.
pub trait OcrEngine {
    /// Transcribe the image into newline-delimited text.
    fn recognize(&self, image: &[u8], languages: &[Language]) -> Result<String, OcrError>;
}
