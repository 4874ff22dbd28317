//! Rule-based field classification and normalization.

pub mod amounts;
pub mod dates;
pub mod keywords;
pub mod patterns;

pub use amounts::{amount_magnitude, contains_amount, is_amount, normalize_amount, AmountSign, AmountToken};
pub use dates::{contains_date, is_any_date, is_date, is_period, looks_like_date, normalize_date, sort_key};
pub use keywords::{contains_any, count_matches, KeywordTables};

/// True if the token looks like a cheque number or transfer reference.
///
/// Matches a known transfer marker prefix, a purely numeric token, or any
/// token of at least five characters containing a digit.
pub fn is_reference_like(text: &str, markers: &[String]) -> bool {
    let text = text.trim();
    if text.is_empty() {
        return false;
    }
    if markers.iter().any(|m| text.starts_with(m.as_str())) {
        return true;
    }
    if text.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    text.chars().count() >= 5 && text.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_reference_like() {
        let markers = vec!["UPI-".to_string()];
        assert!(is_reference_like("UPI-ab", &markers));
        assert!(is_reference_like("000123", &markers));
        assert!(is_reference_like("CHQ12", &markers));
        assert!(!is_reference_like("CHQ1", &markers));
        assert!(!is_reference_like("Salary Credit", &markers));
        assert!(!is_reference_like("  ", &markers));
    }
}
