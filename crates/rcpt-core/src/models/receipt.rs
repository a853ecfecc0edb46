//! Receipt data models returned by the extraction pipeline.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::receipt::confidence::{checked_price_sum, relative_difference};
use crate::receipt::rules::dates::parse_date_token;

/// Structured data recovered from the OCR text of a single receipt.
///
/// Produced fresh by every parse; there is no update path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptExtractionResult {
    /// The unmodified input text.
    pub raw_text: String,

    /// Best-guess merchant name, empty if none found.
    pub vendor: String,

    /// Date token exactly as printed, empty if none found.
    pub date: String,

    /// Final payable amount, zero if none found.
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,

    /// Purchased items in receipt order.
    pub items: Vec<LineItem>,

    /// Heuristic confidence (0.0 - 1.0).
    pub confidence: f64,
}

/// A single purchased item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product name as printed.
    pub name: String,

    /// Quantity, 1 when the line has none.
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,

    /// Price charged for the line. Always positive.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl LineItem {
    /// Create a line item with quantity 1.
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            quantity: Decimal::ONE,
            price,
        }
    }

    /// Set the quantity.
    pub fn with_quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = quantity;
        self
    }
}

impl ReceiptExtractionResult {
    /// Create an empty result for the given text.
    pub fn empty(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            vendor: String::new(),
            date: String::new(),
            total: Decimal::ZERO,
            items: Vec::new(),
            confidence: 0.0,
        }
    }

    /// Sum of all item prices.
    ///
    /// Saturates at `Decimal::MAX` instead of overflowing.
    pub fn items_total(&self) -> Decimal {
        self.items
            .iter()
            .fold(Decimal::ZERO, |acc, item| acc.saturating_add(item.price))
    }

    /// Interpret the date token as a calendar date, if possible.
    ///
    /// The `date` field is kept verbatim; this is a convenience for callers
    /// that need a real date and can live without one.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date_token(&self.date)
    }

    /// Check the result for gaps and inconsistencies.
    ///
    /// `tolerance` is the relative difference allowed between the item sum
    /// and the total (0.10 for 10%).
    pub fn validate(&self, tolerance: Decimal) -> Vec<String> {
        let mut issues = Vec::new();

        if self.vendor.is_empty() {
            issues.push("Missing vendor".to_string());
        }

        if self.date.is_empty() {
            issues.push("Missing date".to_string());
        } else if self.parsed_date().is_none() {
            issues.push(format!("Date '{}' is not a valid calendar date", self.date));
        }

        if self.total.is_zero() {
            issues.push("Total is zero".to_string());
        }

        if self.items.is_empty() {
            issues.push("No line items".to_string());
        }

        if !self.items.is_empty() && self.total > Decimal::ZERO {
            let items_total = self.items_total();
            let within = checked_price_sum(&self.items)
                .and_then(|sum| relative_difference(sum, self.total))
                .is_some_and(|diff| diff < tolerance);
            if !within {
                issues.push(format!(
                    "Line item total ({}) differs from receipt total ({})",
                    items_total, self.total
                ));
            }
        }

        issues
    }
}

impl Default for ReceiptExtractionResult {
    fn default() -> Self {
        Self::empty(String::new())
    }
}
