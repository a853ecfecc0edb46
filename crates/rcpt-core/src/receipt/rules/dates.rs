//! Date extraction for receipts.
//!
//! The date is returned exactly as printed. [`parse_date_token`] is a
//! separate best-effort interpretation for callers that need a calendar date.

use chrono::NaiveDate;

use super::patterns::{month_number, DATE_RULES};
use super::{ExtractionMatch, FieldExtractor};

/// Date field extractor.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<String>;

    /// First rule in table order that matches anywhere in the text.
    fn extract(&self, text: &str) -> Option<Self::Output> {
        DATE_RULES.iter().find_map(|rule| {
            rule.pattern.captures(text).and_then(|caps| {
                let token = caps.get(1)?;
                Some(
                    ExtractionMatch::new(token.as_str().to_string(), rule.label, token.as_str())
                        .with_position(token.start(), token.end()),
                )
            })
        })
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results: Vec<Self::Output> = Vec::new();

        for rule in DATE_RULES.iter() {
            for caps in rule.pattern.captures_iter(text) {
                let Some(token) = caps.get(1) else { continue };

                // Several rules can match the same token.
                if results.iter().any(|r| r.position == Some((token.start(), token.end()))) {
                    continue;
                }

                results.push(
                    ExtractionMatch::new(token.as_str().to_string(), rule.label, token.as_str())
                        .with_position(token.start(), token.end()),
                );
            }
        }

        results.sort_by_key(|r| r.position);
        results
    }
}

/// Extract the date token, empty if none found.
pub fn extract_date(text: &str) -> String {
    DateExtractor::new()
        .extract(text)
        .map(|m| m.value)
        .unwrap_or_default()
}

/// Interpret a date token produced by [`DateExtractor`].
///
/// Numeric tokens ending in a 4-digit year are day-first, tokens starting
/// with one are year-first, and all-2-digit tokens are year-first when
/// dash-separated, day-first otherwise. Two-digit years map to 2000+.
pub fn parse_date_token(token: &str) -> Option<NaiveDate> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    let words: Vec<&str> = token.split_whitespace().collect();
    if words.len() == 3 {
        let day: u32 = words[0].parse().ok()?;
        let month = month_number(words[1])?;
        let year: i32 = words[2].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    let parts: Vec<&str> = token.split(['.', '/', '-']).collect();
    if parts.len() != 3 || !parts.iter().all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit())) {
        return None;
    }

    let (year, month, day) = if parts[0].len() == 4 {
        (parts[0], parts[1], parts[2])
    } else if parts[2].len() == 4 {
        (parts[2], parts[1], parts[0])
    } else if token.contains('-') {
        (parts[0], parts[1], parts[2])
    } else {
        (parts[2], parts[1], parts[0])
    };

    NaiveDate::from_ymd_opt(parse_year(year)?, month.parse().ok()?, day.parse().ok()?)
}

fn parse_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    Some(if s.len() <= 2 { 2000 + year } else { year })
}
