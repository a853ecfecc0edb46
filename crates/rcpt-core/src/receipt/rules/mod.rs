//! Rule-based field extractors for receipts.

pub mod amounts;
pub mod dates;
pub mod items;
pub mod lines;
pub mod patterns;
pub mod vendor;

pub use amounts::{extract_total, parse_amount, TotalExtractor};
pub use dates::{extract_date, parse_date_token, DateExtractor};
pub use items::{extract_items, is_service_line, ItemExtractor};
pub use lines::split_lines;
pub use vendor::{extract_vendor, is_date_line, is_numbers_only_line, VendorExtractor};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract every candidate for the field, in text order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A value recovered by one rule, with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Label of the rule that produced it.
    pub rule: &'static str,
    /// Source text that was matched.
    pub source: String,
    /// Byte span in the source text.
    pub position: Option<(usize, usize)>,
    /// Zero-based line index, for line-oriented extractors.
    pub line: Option<usize>,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, rule: &'static str, source: impl Into<String>) -> Self {
        Self {
            value,
            rule,
            source: source.into(),
            position: None,
            line: None,
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}
