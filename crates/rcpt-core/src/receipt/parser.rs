//! Rule-based receipt parser.

use std::time::Instant;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use crate::models::config::ExtractionConfig;
use crate::models::receipt::ReceiptExtractionResult;

use super::confidence::{ConfidenceBreakdown, ConfidenceScorer};
use super::rules::{
    amounts::TotalExtractor, dates::DateExtractor, items::ItemExtractor, lines::split_lines,
    vendor::VendorExtractor, FieldExtractor,
};
use super::ReceiptExtractor;

/// Extraction result with diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    /// Extracted receipt data.
    pub result: ReceiptExtractionResult,
    /// Missing fields and consistency notes.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Receipt parser running the vendor, date, total and item rules over OCR
/// text and scoring the outcome.
///
/// Holds only thresholds; the rule tables are shared statics, so one parser
/// can serve many threads.
#[derive(Debug, Clone)]
pub struct ReceiptParser {
    config: ExtractionConfig,
}

impl ReceiptParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self {
            config: ExtractionConfig::default(),
        }
    }

    /// Replace all thresholds.
    pub fn with_config(mut self, config: ExtractionConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the exclusive vendor line length bounds.
    pub fn with_vendor_length(mut self, min_len: usize, max_len: usize) -> Self {
        self.config.vendor_min_len = min_len;
        self.config.vendor_max_len = max_len;
        self
    }

    /// Set the minimum item line length.
    pub fn with_min_item_line_len(mut self, len: usize) -> Self {
        self.config.min_item_line_len = len;
        self
    }

    /// Set the minimum item name length.
    pub fn with_min_item_name_len(mut self, len: usize) -> Self {
        self.config.min_item_name_len = len;
        self
    }

    /// Set the relative tolerance between item sum and total.
    pub fn with_consistency_tolerance(mut self, tolerance: Decimal) -> Self {
        self.config.consistency_tolerance = tolerance;
        self
    }

    /// Current thresholds.
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Parse receipt text. Never fails; missing fields stay empty.
    pub fn parse(&self, text: &str) -> ReceiptExtractionResult {
        self.parse_inner(text).0
    }

    /// Parse receipt text and collect warnings and timing.
    pub fn parse_with_report(&self, text: &str) -> ExtractionReport {
        let start = Instant::now();
        let (result, breakdown) = self.parse_inner(text);

        let mut warnings = Vec::new();
        if !breakdown.has_vendor {
            warnings.push("Could not extract vendor".to_string());
        }
        if !breakdown.has_date {
            warnings.push("Could not extract date".to_string());
        }
        if !breakdown.has_total {
            warnings.push("Could not extract total".to_string());
        }
        if !breakdown.has_items {
            warnings.push("Could not extract line items".to_string());
        }
        if breakdown.consistent == Some(false) {
            warnings.push(format!(
                "Line items sum to {} but total is {}",
                result.items_total(),
                result.total
            ));
        }

        ExtractionReport {
            result,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    fn parse_inner(&self, text: &str) -> (ReceiptExtractionResult, ConfidenceBreakdown) {
        info!("Parsing receipt from {} characters of text", text.len());

        let lines = split_lines(text);

        let vendor = VendorExtractor::new()
            .with_length(self.config.vendor_min_len, self.config.vendor_max_len)
            .from_lines(&lines)
            .map(|m| m.value)
            .unwrap_or_default();

        let date = DateExtractor::new()
            .extract(text)
            .map(|m| m.value)
            .unwrap_or_default();

        let total = TotalExtractor::new()
            .extract(text)
            .map(|m| m.value)
            .unwrap_or(Decimal::ZERO);

        let items: Vec<_> = ItemExtractor::new()
            .with_min_line_len(self.config.min_item_line_len)
            .with_min_name_len(self.config.min_item_name_len)
            .from_lines(&lines)
            .into_iter()
            .map(|m| m.value)
            .collect();

        debug!(
            "Extracted vendor '{}', date '{}', total {}, {} items",
            vendor,
            date,
            total,
            items.len()
        );

        let breakdown = ConfidenceScorer::new(self.config.consistency_tolerance)
            .breakdown(&vendor, &date, total, &items);
        let confidence = breakdown.score();

        debug!(
            "Confidence {:.2} ({}/{} checks)",
            confidence,
            breakdown.passed(),
            breakdown.checks()
        );

        let result = ReceiptExtractionResult {
            raw_text: text.to_string(),
            vendor,
            date,
            total,
            items,
            confidence,
        };

        (result, breakdown)
    }
}

impl Default for ReceiptParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiptExtractor for ReceiptParser {
    fn extract(&self, text: &str) -> ExtractionReport {
        self.parse_with_report(text)
    }

    fn extract_from_text(&self, text: &str) -> ReceiptExtractionResult {
        self.parse(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::receipt::LineItem;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    const SUPERMART: &str = "SuperMart LLC\n12.03.2024\nMilk          3.50\nBread         2.20\nSubtotal: 5.70\nTotal: 5.70\nThank you";

    #[test]
    fn test_parse_basic_receipt() {
        let result = ReceiptParser::new().parse(SUPERMART);

        assert_eq!(result.vendor, "SuperMart LLC");
        assert_eq!(result.date, "12.03.2024");
        assert_eq!(result.total, dec("5.70"));
        assert_eq!(
            result.items,
            vec![
                LineItem::new("Milk", dec("3.50")),
                LineItem::new("Bread", dec("2.20")),
            ]
        );
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.raw_text, SUPERMART);
    }

    #[test]
    fn test_report_warnings() {
        let report = ReceiptParser::new().parse_with_report("Milk          3.50");

        assert_eq!(
            report.warnings,
            vec![
                "Could not extract date".to_string(),
                "Could not extract total".to_string(),
            ]
        );
        assert_eq!(report.result.vendor, "Milk          3.50");
    }

    #[test]
    fn test_report_inconsistency() {
        let report = ReceiptParser::new()
            .parse_with_report("Shop\n01.02.2024\nMilk   3.50\nTotal 9.00");

        assert_eq!(report.result.confidence, 0.8);
        assert!(report.warnings[0].contains("sum to 3.50"));
    }

    #[test]
    fn test_custom_thresholds() {
        let parser = ReceiptParser::new()
            .with_vendor_length(0, 100)
            .with_consistency_tolerance(dec("0.50"));
        let result = parser.parse("ABC\nMilk   3.50\nTotal 6.00");

        assert_eq!(result.vendor, "ABC");
        // 2.50 / 6.00 is within 50%.
        assert_eq!(result.confidence, 0.8);
    }
}
