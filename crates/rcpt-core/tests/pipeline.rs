//! End-to-end behaviour of the receipt pipeline.

use std::str::FromStr;
use std::sync::Arc;
use std::thread;

use pretty_assertions::assert_eq;
use rcpt_core::{LineItem, ReceiptExtractionResult, ReceiptParser};
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

const SUPERMART: &str = "SuperMart LLC
12.03.2024
Milk          3.50
Bread         2.20
Subtotal: 5.70
Total: 5.70
Thank you";

#[test]
fn end_to_end_receipt() {
    let result = ReceiptParser::new().parse(SUPERMART);

    let mut expected = ReceiptExtractionResult::empty(SUPERMART);
    expected.vendor = "SuperMart LLC".to_string();
    expected.date = "12.03.2024".to_string();
    expected.total = dec("5.70");
    expected.items = vec![
        LineItem::new("Milk", dec("3.50")),
        LineItem::new("Bread", dec("2.20")),
    ];
    expected.confidence = 1.0;

    assert_eq!(result, expected);
}

#[test]
fn json_shape() {
    let result = ReceiptParser::new().parse(SUPERMART);
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "raw_text": SUPERMART,
            "vendor": "SuperMart LLC",
            "date": "12.03.2024",
            "total": 5.7,
            "items": [
                {"name": "Milk", "quantity": 1.0, "price": 3.5},
                {"name": "Bread", "quantity": 1.0, "price": 2.2},
            ],
            "confidence": 1.0,
        })
    );
}

#[test]
fn idempotent() {
    let parser = ReceiptParser::new();
    let first = serde_json::to_string(&parser.parse(SUPERMART)).unwrap();
    let second = serde_json::to_string(&parser.parse(SUPERMART)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn empty_input() {
    let result = ReceiptParser::new().parse("");

    assert_eq!(result, ReceiptExtractionResult::empty(""));
    assert_eq!(result.confidence, 0.0);
}

#[test]
fn garbage_input_degrades_gracefully() {
    let noise = "\u{0}\u{1}�".repeat(10_000);
    let result = ReceiptParser::new().parse(&noise);

    assert!(result.items.is_empty());
    assert_eq!(result.total, Decimal::ZERO);
    assert!((0.0..=1.0).contains(&result.confidence));

    let long_line = format!("{}  1.00", "x".repeat(100_000));
    let result = ReceiptParser::new().parse(&long_line);
    assert_eq!(result.vendor, "");
    assert_eq!(result.items.len(), 1);
}

#[test]
fn overflowing_item_sum_does_not_panic() {
    let huge = format!("5{}.00", "0".repeat(28));
    let text = format!("Shop\nAaa  {huge}\nBbb  {huge}\nTotal 1.00");
    let parser = ReceiptParser::new();

    let result = parser.parse(&text);
    assert_eq!(result.items.len(), 2);
    assert_eq!(result.total, dec("1.00"));
    // vendor, total and items pass; the overflowing sum fails consistency
    assert_eq!(result.confidence, 0.6);

    let report = parser.parse_with_report(&text);
    assert!(report.warnings.iter().any(|w| w.starts_with("Line items sum to")));
}

#[test]
fn overflowing_ratio_does_not_panic() {
    let text = format!("Shop\nAaa  7{}.00\nTotal 0.01", "0".repeat(28));
    let result = ReceiptParser::new().parse(&text);

    assert_eq!(result.items.len(), 1);
    assert_eq!(result.total, dec("0.01"));
    assert_eq!(result.confidence, 0.6);
    assert!(
        result
            .validate(dec("0.10"))
            .iter()
            .any(|issue| issue.contains("differs"))
    );
}

#[test]
fn vendor_skips_leading_date() {
    let result = ReceiptParser::new().parse("12.03.2024\nSuperMart LLC");
    assert_eq!(result.vendor, "SuperMart LLC");
}

#[test]
fn total_takes_maximum() {
    let parser = ReceiptParser::new();
    assert_eq!(parser.parse("Subtotal: 45.00\nTotal: 52.30").total, dec("52.30"));
    assert_eq!(parser.parse("Total: 52.30\nSubtotal: 45.00").total, dec("52.30"));
}

#[test]
fn comma_decimal_total() {
    assert_eq!(ReceiptParser::new().parse("Suma: 12,50").total, dec("12.50"));
}

#[test]
fn non_positive_items_dropped() {
    let result = ReceiptParser::new().parse("Bag          0.00\nCoupon  -2.00\nMilk  3.50");
    assert_eq!(result.items, vec![LineItem::new("Milk", dec("3.50"))]);
    assert!(result.items.iter().all(|i| i.price > Decimal::ZERO));
}

#[test]
fn confidence_with_inconsistent_items() {
    let text = "Corner Shop\n01.04.2024\nMilk   3.50\nBread   2.20\nTotal: 9.99";
    assert_eq!(ReceiptParser::new().parse(text).confidence, 0.8);
}

#[test]
fn change_lines_never_items() {
    let text = "Shop\nChange        4.30\nСДАЧА         4,30\nYour change: 4.30\nTea  1.40";
    let result = ReceiptParser::new().parse(text);

    assert_eq!(result.items, vec![LineItem::new("Tea", dec("1.40"))]);
}

#[test]
fn mixed_language_receipt() {
    let text = "\
АТБ-Маркет
Дата: 05.03.2024
Хліб                 24,50
Молоко 2 х 38,00 = 76,00
Cukier  5,49
Сума: 105,99
До сплати: 105,99
Дякуємо за покупку!";

    let result = ReceiptParser::new().parse(text);

    assert_eq!(result.vendor, "АТБ-Маркет");
    assert_eq!(result.date, "05.03.2024");
    assert_eq!(result.total, dec("105.99"));
    assert_eq!(
        result.items,
        vec![
            LineItem::new("Хліб", dec("24.50")),
            LineItem::new("Молоко", dec("76.00")).with_quantity(dec("2")),
            LineItem::new("Cukier", dec("5.49")),
        ]
    );
    assert_eq!(result.confidence, 1.0);
}

#[test]
fn parser_is_shareable_across_threads() {
    let parser = Arc::new(ReceiptParser::new());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let parser = Arc::clone(&parser);
            thread::spawn(move || parser.parse(SUPERMART))
        })
        .collect();

    let expected = parser.parse(SUPERMART);
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
