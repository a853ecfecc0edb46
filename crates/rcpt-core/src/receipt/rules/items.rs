//! Line item extraction for receipts.

use rust_decimal::Decimal;
use tracing::trace;

use super::amounts::parse_amount;
use super::lines::{char_len, split_lines};
use super::patterns::{ITEM_RULES, SERVICE_LINE_KEYWORDS};
use super::{ExtractionMatch, FieldExtractor};
use crate::models::receipt::LineItem;

/// Line item extractor.
pub struct ItemExtractor {
    /// Lines shorter than this are skipped.
    min_line_len: usize,
    /// Names shorter than this are discarded.
    min_name_len: usize,
}

impl ItemExtractor {
    pub fn new() -> Self {
        Self {
            min_line_len: 5,
            min_name_len: 2,
        }
    }

    /// Set the minimum line length.
    pub fn with_min_line_len(mut self, len: usize) -> Self {
        self.min_line_len = len;
        self
    }

    /// Set the minimum name length.
    pub fn with_min_name_len(mut self, len: usize) -> Self {
        self.min_name_len = len;
        self
    }

    /// Parse one line against the item rules, first match wins.
    ///
    /// A line whose first matching rule yields a short name or a
    /// non-positive price is discarded, not retried with later rules.
    pub fn parse_line(&self, line: &str) -> Option<ExtractionMatch<LineItem>> {
        let line = line.trim();
        if is_service_line(line) || char_len(line) < self.min_line_len {
            return None;
        }

        let (rule, caps) = ITEM_RULES
            .iter()
            .find_map(|rule| rule.pattern.captures(line).map(|caps| (rule, caps)))?;

        let name = caps.name("name")?.as_str().trim();
        if char_len(name) < self.min_name_len {
            trace!("Discarding '{}': name too short", line);
            return None;
        }

        let price = caps
            .name("line_total")
            .or_else(|| caps.name("price"))
            .and_then(|m| parse_amount(m.as_str()))
            .filter(|p| *p > Decimal::ZERO);
        let Some(price) = price else {
            trace!("Discarding '{}': no positive price", line);
            return None;
        };

        let quantity = caps
            .name("quantity")
            .and_then(|m| parse_amount(m.as_str()))
            .unwrap_or(Decimal::ONE);

        trace!("Item '{}' x {} = {} ({})", name, quantity, price, rule.label);

        Some(ExtractionMatch::new(
            LineItem::new(name, price).with_quantity(quantity),
            rule.label,
            line,
        ))
    }

    /// Extract items from pre-split lines, in order.
    pub fn from_lines(&self, lines: &[&str]) -> Vec<ExtractionMatch<LineItem>> {
        lines
            .iter()
            .enumerate()
            .filter_map(|(idx, line)| self.parse_line(line).map(|m| m.with_line(idx)))
            .collect()
    }
}

impl Default for ItemExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for ItemExtractor {
    type Output = ExtractionMatch<LineItem>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.from_lines(&split_lines(text))
    }
}

/// Extract all line items from receipt text.
pub fn extract_items(text: &str) -> Vec<LineItem> {
    ItemExtractor::new()
        .extract_all(text)
        .into_iter()
        .map(|m| m.value)
        .collect()
}

/// Whether the line is boilerplate (totals, payment, tax, courtesy, headers).
pub fn is_service_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    SERVICE_LINE_KEYWORDS.iter().any(|kw| lower.contains(*kw))
}
