//! Confidence scoring for extraction results.

use rust_decimal::Decimal;

use crate::models::receipt::LineItem;

/// Outcome of the individual confidence checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfidenceBreakdown {
    pub has_vendor: bool,
    pub has_date: bool,
    pub has_total: bool,
    pub has_items: bool,
    /// Whether items sum to the total within tolerance; `None` when the
    /// check did not apply.
    pub consistent: Option<bool>,
}

impl ConfidenceBreakdown {
    /// Number of checks performed.
    pub fn checks(&self) -> u32 {
        4 + u32::from(self.consistent.is_some())
    }

    /// Number of checks passed.
    pub fn passed(&self) -> u32 {
        [
            self.has_vendor,
            self.has_date,
            self.has_total,
            self.has_items,
            self.consistent.unwrap_or(false),
        ]
        .into_iter()
        .map(u32::from)
        .sum()
    }

    /// Passed over performed, in `[0.0, 1.0]`.
    pub fn score(&self) -> f64 {
        match self.checks() {
            0 => 0.0,
            checks => f64::from(self.passed()) / f64::from(checks),
        }
    }
}

/// Scores how much of the expected receipt structure was recovered.
#[derive(Debug, Clone)]
pub struct ConfidenceScorer {
    tolerance: Decimal,
}

impl ConfidenceScorer {
    /// Create a scorer with the given relative item-sum tolerance.
    pub fn new(tolerance: Decimal) -> Self {
        Self { tolerance }
    }

    /// Run every check over the extracted fields.
    pub fn breakdown(
        &self,
        vendor: &str,
        date: &str,
        total: Decimal,
        items: &[LineItem],
    ) -> ConfidenceBreakdown {
        let has_total = total > Decimal::ZERO;
        let has_items = !items.is_empty();

        // Sums or ratios past the Decimal range count as inconsistent
        let consistent = (has_total && has_items).then(|| {
            checked_price_sum(items)
                .and_then(|sum| relative_difference(sum, total))
                .is_some_and(|diff| diff < self.tolerance)
        });

        ConfidenceBreakdown {
            has_vendor: !vendor.is_empty(),
            has_date: !date.is_empty(),
            has_total,
            has_items,
            consistent,
        }
    }

    /// Confidence in `[0.0, 1.0]`.
    pub fn score(&self, vendor: &str, date: &str, total: Decimal, items: &[LineItem]) -> f64 {
        self.breakdown(vendor, date, total, items).score()
    }
}

/// Sum of item prices, `None` on overflow.
pub fn checked_price_sum(items: &[LineItem]) -> Option<Decimal> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.price))
}

/// `|amount - total| / total`, `None` when `total` is zero or the ratio overflows.
pub fn relative_difference(amount: Decimal, total: Decimal) -> Option<Decimal> {
    amount.checked_sub(total)?.abs().checked_div(total)
}

impl Default for ConfidenceScorer {
    fn default() -> Self {
        Self::new(Decimal::new(10, 2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_nothing_found() {
        let scorer = ConfidenceScorer::default();
        let breakdown = scorer.breakdown("", "", Decimal::ZERO, &[]);
        assert_eq!(breakdown.checks(), 4);
        assert_eq!(breakdown.score(), 0.0);
    }

    #[test]
    fn test_all_checks_pass() {
        let scorer = ConfidenceScorer::default();
        let items = vec![LineItem::new("Milk", dec("3.50")), LineItem::new("Bread", dec("2.20"))];
        assert_eq!(scorer.score("Shop", "12.03.2024", dec("5.70"), &items), 1.0);
    }

    #[test]
    fn test_inconsistent_sum() {
        let scorer = ConfidenceScorer::default();
        let items = vec![LineItem::new("Milk", dec("3.50"))];
        let breakdown = scorer.breakdown("Shop", "12.03.2024", dec("5.70"), &items);
        assert_eq!(breakdown.consistent, Some(false));
        assert_eq!(breakdown.score(), 0.8);
    }

    #[test]
    fn test_tolerance_is_strict() {
        let scorer = ConfidenceScorer::default();
        let within = vec![LineItem::new("Milk", dec("9.01"))];
        let at_edge = vec![LineItem::new("Milk", dec("9.00"))];
        assert_eq!(scorer.breakdown("", "", dec("10"), &within).consistent, Some(true));
        assert_eq!(scorer.breakdown("", "", dec("10"), &at_edge).consistent, Some(false));
    }

    #[test]
    fn test_overflowing_sum_is_inconsistent() {
        let scorer = ConfidenceScorer::default();
        let items = vec![LineItem::new("Aaa", Decimal::MAX), LineItem::new("Bbb", Decimal::MAX)];
        assert_eq!(checked_price_sum(&items), None);
        assert_eq!(scorer.breakdown("Shop", "", dec("1.00"), &items).consistent, Some(false));
    }

    #[test]
    fn test_overflowing_ratio_is_inconsistent() {
        assert_eq!(relative_difference(Decimal::MAX, dec("0.01")), None);
        assert_eq!(relative_difference(dec("5"), Decimal::ZERO), None);
        assert_eq!(relative_difference(dec("9"), dec("10")), Some(dec("0.1")));
    }

    #[test]
    fn test_no_consistency_check_without_total() {
        let scorer = ConfidenceScorer::default();
        let items = vec![LineItem::new("Milk", dec("3.50"))];
        let breakdown = scorer.breakdown("Shop", "", Decimal::ZERO, &items);
        assert_eq!(breakdown.consistent, None);
        assert_eq!(breakdown.score(), 0.5);
    }
}
