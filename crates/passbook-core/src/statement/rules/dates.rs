//! Date recognition and normalization for statement cells.

use chrono::NaiveDate;
use regex::Captures;

use super::patterns::{
    DATE_ANYWHERE, DATE_AT_START, DATE_DMY_LONG, DATE_DMY_SHORT, DATE_D_MON_Y,
    DATE_D_MON_Y_DASHED, DATE_YMD, FLEXIBLE_DATE,
};

/// True if the trimmed text starts with a recognised date shape.
pub fn is_date(text: &str) -> bool {
    let text = text.trim();
    DATE_AT_START.iter().any(|re| re.is_match(text))
}

/// True if the text holds a looser date such as `01 Jun, 2025` or `Jun 01, 2025`.
pub fn looks_like_date(text: &str) -> bool {
    let text = text.trim();
    FLEXIBLE_DATE.iter().any(|re| re.is_match(text))
}

/// True if a date shape appears anywhere in the text.
pub fn contains_date(text: &str) -> bool {
    DATE_ANYWHERE.iter().any(|re| re.is_match(text))
}

/// Either [`is_date`] or [`looks_like_date`].
pub fn is_any_date(text: &str) -> bool {
    is_date(text) || looks_like_date(text)
}

/// True for a bare two-part numeric period such as `05-2025`.
pub fn is_period(text: &str) -> bool {
    let text = text.trim();
    if text.len() > 8 || text.matches('-').count() != 1 {
        return false;
    }
    text.split('-')
        .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
}

/// Normalize a date string to `DD-MM-YYYY`.
///
/// The first matching template wins. Input that matches no template is
/// returned trimmed but otherwise unchanged; this never fails.
pub fn normalize_date(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }

    if let Some(caps) = DATE_DMY_LONG.captures(text) {
        return format_dmy(&caps[1], &caps[2], &caps[3]);
    }

    if let Some(caps) = DATE_DMY_SHORT.captures(text) {
        let year = expand_year(&caps[3]);
        return format_dmy(&caps[1], &caps[2], &year.to_string());
    }

    if let Some(caps) = DATE_YMD.captures(text) {
        return format_dmy(&caps[3], &caps[2], &caps[1]);
    }

    if let Some(date) = DATE_D_MON_Y.captures(text).and_then(|caps| named_month(&caps)) {
        return date;
    }

    if let Some(date) = DATE_D_MON_Y_DASHED
        .captures(text)
        .and_then(|caps| named_month(&caps))
    {
        return date;
    }

    text.to_string()
}

/// Calendar date of a canonical `DD-MM-YYYY` string.
///
/// Anything else (including impossible dates) has no key and sorts first.
pub fn sort_key(date: &str) -> Option<NaiveDate> {
    let mut parts = date.split('-');
    let day: u32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let year: i32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Month number for a three-letter English abbreviation.
pub fn month_number(name: &str) -> Option<u32> {
    let month = match name.to_ascii_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn named_month(caps: &Captures<'_>) -> Option<String> {
    let month = month_number(&caps[2])?;
    let year = if caps[3].len() == 2 {
        expand_year(&caps[3]).to_string()
    } else {
        caps[3].to_string()
    };
    Some(format_dmy(&caps[1], &month.to_string(), &year))
}

// Two-digit years pivot at 50.
fn expand_year(short: &str) -> u32 {
    let year: u32 = short.parse().unwrap_or(0);
    if year < 50 { 2000 + year } else { 1900 + year }
}

fn format_dmy(day: &str, month: &str, year: &str) -> String {
    format!("{:0>2}-{:0>2}-{}", day, month, year)
}
