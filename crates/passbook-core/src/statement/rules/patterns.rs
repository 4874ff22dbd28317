//! Common regex patterns for statement field classification.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Date shapes recognised at the start of a cell or token
    pub static ref DATE_AT_START: Vec<Regex> = vec![
        Regex::new(r"^\d{1,2}[-/]\d{1,2}[-/]\d{2,4}").unwrap(),
        Regex::new(r"^\d{1,2}[-/][A-Za-z]{3}[-/]\d{2,4}").unwrap(),
        Regex::new(r"^\d{2,4}[-/]\d{1,2}[-/]\d{1,2}").unwrap(),
        Regex::new(r"^\d{1,2}\s+[A-Za-z]{3}\s+\d{2,4}").unwrap(),
    ];

    // Same shapes, anywhere in a line
    pub static ref DATE_ANYWHERE: Vec<Regex> = vec![
        Regex::new(r"\d{1,2}[-/]\d{1,2}[-/]\d{2,4}").unwrap(),
        Regex::new(r"\d{1,2}[-/][A-Za-z]{3}[-/]\d{2,4}").unwrap(),
        Regex::new(r"\d{2,4}[-/]\d{1,2}[-/]\d{1,2}").unwrap(),
        Regex::new(r"\d{1,2}\s+[A-Za-z]{3}\s+\d{2,4}").unwrap(),
    ];

    // "01 Jun, 2025", "Jun 01, 2025", "01Jun2025"
    pub static ref FLEXIBLE_DATE: Vec<Regex> = vec![
        Regex::new(r"\d{1,2}\s+[A-Za-z]{3},?\s+\d{4}").unwrap(),
        Regex::new(r"[A-Za-z]{3}\s+\d{1,2},?\s+\d{4}").unwrap(),
        Regex::new(r"\d{1,2}\s*[A-Za-z]{3}\s*,?\s*\d{4}").unwrap(),
    ];

    // Normalization templates, tried in order
    pub static ref DATE_DMY_LONG: Regex = Regex::new(
        r"^(\d{1,2})[-/](\d{1,2})[-/](\d{4})"
    ).unwrap();

    pub static ref DATE_DMY_SHORT: Regex = Regex::new(
        r"^(\d{1,2})[-/](\d{1,2})[-/](\d{2})"
    ).unwrap();

    pub static ref DATE_YMD: Regex = Regex::new(
        r"^(\d{4})[-/](\d{1,2})[-/](\d{1,2})"
    ).unwrap();

    pub static ref DATE_D_MON_Y: Regex = Regex::new(
        r"^(\d{1,2})\s+([A-Za-z]{3}),?\s+(\d{4})"
    ).unwrap();

    pub static ref DATE_D_MON_Y_DASHED: Regex = Regex::new(
        r"^(\d{1,2})[-/]([A-Za-z]{3})[-/](\d{4}|\d{2})"
    ).unwrap();

    // Leading spaced date kept whole when splitting on single spaces
    pub static ref LEADING_SPACED_DATE: Regex = Regex::new(
        r"^\d{1,2}\s+[A-Za-z]{3},?\s+\d{2,4}"
    ).unwrap();

    // Amount shapes after sign and symbol stripping
    pub static ref AMOUNT_PLAIN: Regex = Regex::new(r"^\d+\.?\d*$").unwrap();

    pub static ref AMOUNT_PARENTHESIZED: Regex = Regex::new(r"^\(\d+\.?\d*\)$").unwrap();

    // Currency symbols, thousands separators and whitespace
    pub static ref AMOUNT_NOISE: Regex = Regex::new(r"[₹$€£,\s]").unwrap();

    pub static ref AMOUNT_ANYWHERE: Regex = Regex::new(r"\d+[.,]\d{2}|\d{4,}").unwrap();

    // Column separators in free text
    pub static ref WIDE_GAP: Regex = Regex::new(r"\s{2,}|\t").unwrap();
}
