//! Core library for receipt text extraction.
//!
//! This crate provides:
//! - Rule-based field extraction from raw OCR text (vendor, date, total, line items)
//! - Confidence scoring over the recovered structure
//! - Receipt data models serialized as the JSON shape the service returns
//! - The boundary to an external OCR engine (and a Tesseract adapter on native targets)

pub mod error;
pub mod models;
pub mod ocr;
pub mod receipt;

pub use error::{OcrError, RcptError, Result};
pub use models::config::{ExtractionConfig, OcrConfig, RcptConfig};
pub use models::receipt::{LineItem, ReceiptExtractionResult};
pub use ocr::{Language, OcrEngine};
#[cfg(feature = "native")]
pub use ocr::TesseractEngine;
pub use receipt::{extract_from_image, ExtractionReport, ReceiptExtractor, ReceiptParser};
