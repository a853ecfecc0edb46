//! OCR engine backed by the Tesseract command-line tool.

use std::io::{ErrorKind, Write};
use std::process::Command;

use tracing::debug;

use super::{Language, OcrEngine};
use crate::error::OcrError;
use crate::models::config::OcrConfig;

/// Runs `<command> <image> stdout -l <langs> [extra_args]` and returns stdout.
pub struct TesseractEngine {
    command: String,
    extra_args: Vec<String>,
}

impl TesseractEngine {
    /// Create an engine that runs the given executable.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            extra_args: Vec::new(),
        }
    }

    /// Create an engine from OCR configuration.
    pub fn from_config(config: &OcrConfig) -> Self {
        Self::new(config.command.clone()).with_args(config.extra_args.clone())
    }

    /// Set extra arguments passed after the language flag.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, image: &[u8], languages: &[Language]) -> Result<String, OcrError> {
        if image.is_empty() {
            return Err(OcrError::InvalidImage("image is empty".to_string()));
        }

        let mut file = tempfile::NamedTempFile::new()
            .map_err(|e| OcrError::Engine(format!("failed to create temp file: {}", e)))?;
        file.write_all(image)
            .map_err(|e| OcrError::Engine(format!("failed to write image: {}", e)))?;

        let mut cmd = Command::new(&self.command);
        cmd.arg(file.path()).arg("stdout");
        if !languages.is_empty() {
            cmd.arg("-l").arg(Language::join_codes(languages));
        }
        cmd.args(&self.extra_args);

        debug!("Running OCR: {:?}", cmd);

        let output = cmd.output().map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                OcrError::Unavailable(format!("'{}' not found in PATH", self.command))
            }
            _ => OcrError::Unavailable(format!("failed to run '{}': {}", self.command, e)),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Engine(format!(
                "'{}' exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!("OCR produced {} characters", text.len());

        Ok(text)
    }
}
