//! Pattern and keyword tables for receipt extraction.
//!
//! Languages are added by extending the tables below; the extractors only
//! iterate them.

use lazy_static::lazy_static;
use regex::Regex;

/// Labels that introduce the payable amount, as (label, regex fragment).
pub const TOTAL_LABELS: &[(&str, &str)] = &[
    ("total", r"total"),
    ("итого", r"итого"),
    ("всего", r"всего"),
    ("suma", r"suma"),
    ("razem", r"razem"),
    ("сума", r"сума"),
    ("загалом", r"загалом"),
    ("do zapłaty", r"do\s+zap[łl]aty"),
    ("к оплате", r"к\s+оплате"),
    ("до сплати", r"до\s+сплати"),
    ("amount", r"amount"),
    ("сумма", r"сумма"),
    ("kwota", r"kwota"),
    ("grand total", r"grand\s+total"),
];

/// Currency markers tolerated between a total label and its value.
const CURRENCY: &str = r"(?:[$€£₽₴]|zł|pln|руб\.?|грн\.?|byn|usd|eur)";

/// Words marking boilerplate lines that never hold a purchased item.
///
/// Matched as lowercase substrings.
pub const SERVICE_LINE_KEYWORDS: &[&str] = &[
    // totals
    "total", "итого", "всего", "suma", "razem", "сума",
    // payment
    "cash", "card", "наличн", "картой", "сдача", "change", "решта", "рэшта", "reszta",
    // tax
    "tax", "vat", "ндс", "pdv",
    // courtesy
    "thank", "спасибо", "дякуємо",
    // document
    "receipt", "чек", "fiscal", "фіскальний",
];

/// Month names as printed in dates, with their month number.
pub const MONTH_NAMES: &[(&str, u32)] = &[
    // English
    ("january", 1), ("february", 2), ("march", 3), ("april", 4),
    ("may", 5), ("june", 6), ("july", 7), ("august", 8),
    ("september", 9), ("october", 10), ("november", 11), ("december", 12),
    ("jan", 1), ("feb", 2), ("mar", 3), ("apr", 4), ("jun", 6), ("jul", 7),
    ("aug", 8), ("sep", 9), ("sept", 9), ("oct", 10), ("nov", 11), ("dec", 12),
    // Russian
    ("января", 1), ("февраля", 2), ("марта", 3), ("апреля", 4),
    ("мая", 5), ("июня", 6), ("июля", 7), ("августа", 8),
    ("сентября", 9), ("октября", 10), ("ноября", 11), ("декабря", 12),
    // Ukrainian
    ("січня", 1), ("лютого", 2), ("березня", 3), ("квітня", 4),
    ("травня", 5), ("червня", 6), ("липня", 7), ("серпня", 8),
    ("вересня", 9), ("жовтня", 10), ("листопада", 11), ("грудня", 12),
    // Polish
    ("stycznia", 1), ("lutego", 2), ("marca", 3), ("kwietnia", 4),
    ("maja", 5), ("czerwca", 6), ("lipca", 7), ("sierpnia", 8),
    ("września", 9), ("października", 10), ("listopada", 11), ("grudnia", 12),
    // Belarusian
    ("студзеня", 1), ("лютага", 2), ("сакавіка", 3), ("красавіка", 4),
    ("траўня", 5), ("чэрвеня", 6), ("ліпеня", 7), ("жніўня", 8),
    ("верасня", 9), ("кастрычніка", 10), ("лістапада", 11), ("снежня", 12),
];

/// A labeled regex tried as part of an ordered table.
#[derive(Debug)]
pub struct Rule {
    pub label: &'static str,
    pub pattern: Regex,
}

impl Rule {
    fn new(label: &'static str, pattern: &str) -> Self {
        Self {
            label,
            pattern: Regex::new(pattern).unwrap(),
        }
    }
}

fn month_alternation() -> String {
    let mut names: Vec<&str> = MONTH_NAMES.iter().map(|(name, _)| *name).collect();
    // Longest first so "sept" is not cut to "sep".
    names.sort_by_key(|n| std::cmp::Reverse(n.chars().count()));
    names.join("|")
}

lazy_static! {
    // Vendor line filters
    pub static ref DATE_LINE: Regex = Regex::new(
        r"^\d{2}[./\-]\d{2}[./\-](?:\d{4}|\d{2})"
    ).unwrap();

    pub static ref NUMBERS_ONLY_LINE: Regex = Regex::new(
        r"^[\d\s.,]+$"
    ).unwrap();

    /// Date patterns in priority order; group 1 is the date token.
    pub static ref DATE_RULES: Vec<Rule> = vec![
        Rule::new("dd.mm.yyyy", r"\b(\d{2}[./]\d{2}[./]\d{4})\b"),
        Rule::new("yyyy-mm-dd", r"\b(\d{4}[\-.]\d{2}[\-.]\d{2})\b"),
        Rule::new("dd.mm.yy", r"\b(\d{2}[./]\d{2}[./]\d{2})\b"),
        Rule::new("yy-mm-dd", r"\b(\d{2}-\d{2}-\d{2})\b"),
        Rule::new(
            "dd month yyyy",
            &format!(r"(?i)\b(\d{{1,2}}\s+(?:{})\.?\s+\d{{4}})\b", month_alternation()),
        ),
        Rule::new(
            "labeled",
            r"(?i)(?:date|дата)[ \t]*:?[ \t]*(\d{1,2}[./\-]\d{1,2}[./\-]\d{2,4})",
        ),
    ];

    /// One pattern per total label; group 1 is the amount.
    pub static ref TOTAL_RULES: Vec<Rule> = TOTAL_LABELS
        .iter()
        .map(|&(label, fragment)| {
            Rule::new(
                label,
                &format!(
                    r"(?i){}[ \t]*[:=]?[ \t]*{}?[ \t]*(\d+(?:[.,]\d+)?)",
                    fragment, CURRENCY
                ),
            )
        })
        .collect();

    /// Item line shapes in priority order.
    ///
    /// Named groups: `name`, `price`, optional `quantity` and `line_total`.
    pub static ref ITEM_RULES: Vec<Rule> = vec![
        Rule::new(
            "quantity x price",
            r"^(?P<name>.+?)\s+(?P<quantity>\d+(?:[.,]\d+)?)\s*[xXхХ*×]\s*(?P<price>\d+(?:[.,]\d+)?)(?:\s*=\s*(?P<line_total>\d+(?:[.,]\d+)?))?",
        ),
        Rule::new(
            "spaced price",
            r"^(?P<name>.+?)\s{2,}(?P<price>-?\d+[.,]\d{2})(?:\D|$)",
        ),
        Rule::new(
            "letters price",
            r"^(?P<name>[\p{L}\s\-]+?)\s+(?P<price>-?\d+[.,]\d{2})(?:\D|$)",
        ),
    ];
}

/// Look up a month number by its printed name.
pub fn month_number(name: &str) -> Option<u32> {
    let name = name.trim().trim_end_matches('.').to_lowercase();
    MONTH_NAMES
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, month)| *month)
}
