//! Total amount extraction for receipts.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::TOTAL_RULES;
use super::{ExtractionMatch, FieldExtractor};

/// Total amount extractor.
///
/// Every labeled candidate in the text is collected and the largest one
/// wins, so a grand total beats the subtotal printed before it. A tax line
/// larger than the real total would win too.
pub struct TotalExtractor;

impl TotalExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TotalExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for TotalExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text)
            .into_iter()
            .reduce(|best, candidate| if candidate.value > best.value { candidate } else { best })
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for rule in TOTAL_RULES.iter() {
            for caps in rule.pattern.captures_iter(text) {
                let (Some(full_match), Some(amount)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };

                if let Some(value) = parse_amount(amount.as_str()) {
                    results.push(
                        ExtractionMatch::new(value, rule.label, full_match.as_str())
                            .with_position(full_match.start(), full_match.end()),
                    );
                }
            }
        }

        results.sort_by_key(|r| r.position);
        results
    }
}

/// Extract the receipt total, zero if no labeled amount is found.
pub fn extract_total(text: &str) -> Decimal {
    TotalExtractor::new()
        .extract(text)
        .map(|m| m.value)
        .unwrap_or(Decimal::ZERO)
}

/// Parse an amount printed with `,` or `.` as the decimal separator.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    Decimal::from_str(s.replace(',', ".").trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("12,50"), Some(dec("12.50")));
        assert_eq!(parse_amount(" 5.70 "), Some(dec("5.70")));
        assert_eq!(parse_amount("42"), Some(dec("42")));
        assert_eq!(parse_amount("1,234.56"), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn test_max_of_candidates() {
        let text = "Subtotal: 45.00\nTax: 7.30\nTotal: 52.30";
        assert_eq!(extract_total(text), dec("52.30"));
    }

    #[test]
    fn test_max_regardless_of_order() {
        let text = "TOTAL 52.30\nsubtotal 45.00";
        assert_eq!(extract_total(text), dec("52.30"));
    }

    #[test]
    fn test_comma_decimal() {
        assert_eq!(extract_total("Suma: 12,50"), dec("12.50"));
    }

    #[test]
    fn test_multilingual_labels() {
        assert_eq!(extract_total("ИТОГО =1250,00"), dec("1250.00"));
        assert_eq!(extract_total("До сплати: 99,90 грн"), dec("99.90"));
        assert_eq!(extract_total("Do zapłaty 15,99 zł"), dec("15.99"));
        assert_eq!(extract_total("К ОПЛАТЕ: 300"), dec("300"));
        assert_eq!(extract_total("Загалом 18.40"), dec("18.40"));
    }

    #[test]
    fn test_grand_total_labels() {
        let all = TotalExtractor::new().extract_all("Grand Total: 80.00");
        assert!(all.iter().any(|m| m.rule == "grand total"));
        assert!(all.iter().all(|m| m.value == dec("80.00")));
    }

    #[test]
    fn test_no_total() {
        assert_eq!(extract_total(""), Decimal::ZERO);
        assert_eq!(extract_total("Milk  3.50\nBread  2.20"), Decimal::ZERO);
    }

    #[test]
    fn test_thousands_groups_are_not_joined() {
        // Known limitation: only the leading group is captured.
        assert_eq!(extract_total("Total: 1 234,56"), dec("1"));
        assert_eq!(extract_total("Total: 1,234.56"), dec("1.234"));
    }

    #[test]
    fn test_tax_line_larger_than_total_wins() {
        // Known limitation of max resolution.
        assert_eq!(extract_total("Total: 5.00\nAmount of tax base: 9.00"), dec("5.00"));
        assert_eq!(extract_total("Total: 5.00\nVAT amount 9.00"), dec("9.00"));
    }
}
