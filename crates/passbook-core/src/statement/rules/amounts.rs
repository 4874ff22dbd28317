//! Amount recognition and normalization.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{AMOUNT_ANYWHERE, AMOUNT_NOISE, AMOUNT_PARENTHESIZED, AMOUNT_PLAIN};

/// Sign marker carried by an amount token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AmountSign {
    #[default]
    Unsigned,
    /// Leading `+`.
    Positive,
    /// Leading `-` or parenthesized.
    Negative,
}

/// A normalized amount: non-negative magnitude plus the sign it was written with.
///
/// The sign only steers slot attribution; it is never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountToken {
    pub magnitude: Decimal,
    pub sign: AmountSign,
}

impl AmountToken {
    pub fn is_zero(&self) -> bool {
        self.magnitude.is_zero()
    }
}

/// True if the text is a plain, comma-grouped, signed or parenthesized amount.
pub fn is_amount(text: &str) -> bool {
    let text = text.trim();
    let unsigned = text
        .strip_prefix('+')
        .or_else(|| text.strip_prefix('-'))
        .unwrap_or(text);
    let cleaned = AMOUNT_NOISE.replace_all(unsigned, "");
    AMOUNT_PLAIN.is_match(&cleaned) || AMOUNT_PARENTHESIZED.is_match(&cleaned)
}

/// True if an amount-like run of digits appears anywhere in the text.
pub fn contains_amount(text: &str) -> bool {
    AMOUNT_ANYWHERE.is_match(text)
}

/// Normalize an amount string. Unparseable input yields a zero magnitude.
pub fn normalize_amount(text: &str) -> AmountToken {
    let mut sign = AmountSign::Unsigned;
    let mut rest = text.trim();

    if let Some(stripped) = rest.strip_prefix('+') {
        sign = AmountSign::Positive;
        rest = stripped;
    }

    let cleaned = AMOUNT_NOISE.replace_all(rest, "");
    let mut digits: &str = &cleaned;

    if let Some(inner) = digits.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        sign = AmountSign::Negative;
        digits = inner;
    }
    if let Some(stripped) = digits.strip_prefix('-') {
        sign = AmountSign::Negative;
        digits = stripped;
    }

    AmountToken {
        magnitude: parse_magnitude(digits),
        sign,
    }
}

/// Magnitude of an amount string, discarding its sign.
pub fn amount_magnitude(text: &str) -> Decimal {
    normalize_amount(text).magnitude
}

fn parse_magnitude(digits: &str) -> Decimal {
    let digits = digits.trim_end_matches('.');
    if digits.is_empty() {
        return Decimal::ZERO;
    }
    let parsed = if digits.starts_with('.') {
        Decimal::from_str(&format!("0{}", digits))
    } else {
        Decimal::from_str(digits)
    };
    parsed.map(|value| value.abs()).unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parenthesized_amount() {
        let token = normalize_amount("(1,250.50)");
        assert_eq!(token.magnitude, dec("1250.50"));
        assert_eq!(token.sign, AmountSign::Negative);
    }

    #[test]
    fn test_currency_and_sign() {
        assert_eq!(normalize_amount("₹ 69,201.94").magnitude, dec("69201.94"));
        assert_eq!(normalize_amount("-500").sign, AmountSign::Negative);
        assert_eq!(normalize_amount("-500").magnitude, dec("500"));
        assert_eq!(normalize_amount("+1,000.00").sign, AmountSign::Positive);
        assert_eq!(normalize_amount("$12.").magnitude, dec("12"));
    }

    #[test]
    fn test_unparseable_amount_is_zero() {
        assert!(normalize_amount("N/A").is_zero());
        assert!(normalize_amount("").is_zero());
        assert!(normalize_amount("12.3.4").is_zero());
    }

    #[test]
    fn test_scale_is_preserved() {
        assert_eq!(normalize_amount("50000.00").magnitude.to_string(), "50000.00");
    }

    #[test]
    fn test_is_amount() {
        for text in ["301.00", "69,201.94", "(1,250.50)", "-45", "+1,000", "₹ 500", "0.00"] {
            assert!(is_amount(text), "{text} should be an amount");
        }
        for text in ["", "Salary", "UPI-123", "01-06-2025", "12a"] {
            assert!(!is_amount(text), "{text} should not be an amount");
        }
    }

    #[test]
    fn test_contains_amount() {
        assert!(contains_amount("ATM WDL 500.00"));
        assert!(contains_amount("REF 123456"));
        assert!(!contains_amount("ATM 500"));
    }
}
