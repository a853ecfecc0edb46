//! Error types for the rcpt-core library.
//!
//! Text extraction itself never fails; these errors belong to the layers
//! around it (configuration files, the OCR collaborator, file I/O).

use thiserror::Error;

/// Main error type for the rcpt library.
#[derive(Error, Debug)]
pub enum RcptError {
    /// OCR engine error, raised before extraction runs.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors reported by the external OCR engine.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The engine could not be started.
    #[error("OCR engine unavailable: {0}")]
    Unavailable(String),

    /// The engine ran but failed to produce text.
    #[error("OCR engine failed: {0}")]
    Engine(String),

    /// The image was empty or unreadable.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Result type for the rcpt library.
pub type Result<T> = std::result::Result<T, RcptError>;
