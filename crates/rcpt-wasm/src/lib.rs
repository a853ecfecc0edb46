//! WASM bindings for receipt text extraction.
//!
//! OCR runs on the JavaScript side (e.g. Tesseract.js); these bindings take
//! the recognized text and return the extracted receipt as a plain object.

use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

use rcpt_core::models::receipt::ReceiptExtractionResult;
use rcpt_core::receipt::rules::{parse_amount as parse_decimal, parse_date_token};
use rcpt_core::receipt::ReceiptExtractor as _;
use rcpt_core::{Language, ReceiptParser};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Extract receipt data from OCR text with default settings.
#[wasm_bindgen]
pub fn extract_receipt_from_text(text: &str) -> Result<JsValue, JsValue> {
    to_js(&ReceiptParser::new().parse(text))
}

/// Parse an amount with either decimal separator (e.g. "12,50").
#[wasm_bindgen]
pub fn parse_amount(amount: &str) -> Option<f64> {
    parse_decimal(amount).map(to_f64)
}

/// Tesseract language codes the extraction rules understand.
#[wasm_bindgen]
pub fn supported_languages() -> js_sys::Array {
    Language::ALL
        .iter()
        .map(|lang| JsValue::from_str(lang.code()))
        .collect()
}

/// Receipt extractor class for browser use.
#[wasm_bindgen]
pub struct ReceiptExtractor {
    parser: ReceiptParser,
}

#[wasm_bindgen]
impl ReceiptExtractor {
    /// Create a new receipt extractor.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            parser: ReceiptParser::new(),
        }
    }

    /// Vendor line length bounds, both exclusive.
    #[wasm_bindgen]
    pub fn set_vendor_length(&mut self, min_len: usize, max_len: usize) {
        self.parser = self.parser.clone().with_vendor_length(min_len, max_len);
    }

    /// Minimum trimmed length of a line considered for items.
    #[wasm_bindgen]
    pub fn set_min_item_line_len(&mut self, len: usize) {
        self.parser = self.parser.clone().with_min_item_line_len(len);
    }

    /// Relative tolerance between the items sum and the total.
    #[wasm_bindgen]
    pub fn set_consistency_tolerance(&mut self, tolerance: f64) -> Result<(), JsValue> {
        let tolerance = Decimal::try_from(tolerance)
            .map_err(|e| JsValue::from_str(&format!("Invalid tolerance: {}", e)))?;
        self.parser = self.parser.clone().with_consistency_tolerance(tolerance);
        Ok(())
    }

    /// Extract receipt from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.parser.extract_from_text(text))
    }

    /// Get extraction result with warnings and timing.
    #[wasm_bindgen]
    pub fn extract_with_metadata(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.parser.extract(text))
    }
}

impl Default for ReceiptExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Text lines collected from browser-side OCR.
#[wasm_bindgen]
pub struct OcrLines {
    lines: Vec<String>,
}

#[wasm_bindgen]
impl OcrLines {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Append one recognized line, in reading order.
    #[wasm_bindgen]
    pub fn add_line(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }

    /// Get the full text.
    #[wasm_bindgen]
    pub fn get_text(&self) -> String {
        self.lines.join("\n")
    }

    /// Extract receipt from the collected lines.
    #[wasm_bindgen]
    pub fn extract_receipt(&self) -> Result<JsValue, JsValue> {
        extract_receipt_from_text(&self.get_text())
    }
}

impl Default for OcrLines {
    fn default() -> Self {
        Self::new()
    }
}

/// Helpers for displaying receipt data.
#[wasm_bindgen]
pub struct ReceiptUtils;

#[wasm_bindgen]
impl ReceiptUtils {
    /// Interpret a date token as ISO `YYYY-MM-DD`.
    #[wasm_bindgen]
    pub fn parse_date(token: &str) -> Option<String> {
        parse_date_token(token).map(|d| d.to_string())
    }

    /// Sum of line item prices.
    #[wasm_bindgen]
    pub fn items_total(text: &str) -> f64 {
        let result: ReceiptExtractionResult = ReceiptParser::new().parse(text);
        to_f64(result.items_total())
    }
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn to_f64(value: Decimal) -> f64 {
    value.to_string().parse().unwrap_or(0.0)
}
