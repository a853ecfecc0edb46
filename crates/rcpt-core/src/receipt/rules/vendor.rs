//! Merchant name extraction.
//!
//! Receipts print the merchant first, ahead of dates and totals, so the
//! first plausible line wins.

use super::lines::{char_len, split_lines};
use super::patterns::{DATE_LINE, NUMBERS_ONLY_LINE};
use super::{ExtractionMatch, FieldExtractor};

/// Vendor field extractor.
pub struct VendorExtractor {
    /// Lines must be longer than this.
    min_len: usize,
    /// Lines must be shorter than this.
    max_len: usize,
}

impl VendorExtractor {
    pub fn new() -> Self {
        Self {
            min_len: 3,
            max_len: 100,
        }
    }

    /// Set the exclusive length bounds for a vendor line.
    pub fn with_length(mut self, min_len: usize, max_len: usize) -> Self {
        self.min_len = min_len;
        self.max_len = max_len;
        self
    }

    /// Whether a trimmed line could be a merchant name.
    pub fn is_candidate(&self, line: &str) -> bool {
        let len = char_len(line);
        len > self.min_len
            && len < self.max_len
            && !is_date_line(line)
            && !is_numbers_only_line(line)
    }

    /// Pick the vendor from pre-split lines.
    pub fn from_lines(&self, lines: &[&str]) -> Option<ExtractionMatch<String>> {
        self.candidates(lines).into_iter().next()
    }

    fn candidates(&self, lines: &[&str]) -> Vec<ExtractionMatch<String>> {
        lines
            .iter()
            .enumerate()
            .filter(|(_, line)| self.is_candidate(line))
            .map(|(idx, line)| ExtractionMatch::new(line.to_string(), "first line", *line).with_line(idx))
            .collect()
    }
}

impl Default for VendorExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for VendorExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.from_lines(&split_lines(text))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.candidates(&split_lines(text))
    }
}

/// Extract the vendor name, empty if no line qualifies.
pub fn extract_vendor(text: &str) -> String {
    VendorExtractor::new()
        .extract(text)
        .map(|m| m.value)
        .unwrap_or_default()
}

/// Whether the line starts with a DD.MM.YY(YY) date.
pub fn is_date_line(line: &str) -> bool {
    DATE_LINE.is_match(line.trim())
}

/// Whether the line holds only digits, whitespace, `.` and `,`.
pub fn is_numbers_only_line(line: &str) -> bool {
    NUMBERS_ONLY_LINE.is_match(line.trim())
}
