//! Duplicate removal across tables, pages and the text fallback.

use rust_decimal::Decimal;
use std::collections::HashSet;

use crate::models::Transaction;

/// Identity of a transaction for duplicate detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    date: String,
    description: String,
    debit: Decimal,
    credit: Decimal,
    balance: Decimal,
}

impl DedupKey {
    /// Missing amounts count as zero; `1250.5` and `1250.50` are the same amount.
    pub fn of(tx: &Transaction) -> Self {
        let amount = |value: Option<Decimal>| value.unwrap_or(Decimal::ZERO).normalize();
        Self {
            date: tx.date.clone(),
            description: tx.description.clone(),
            debit: amount(tx.debit),
            credit: amount(tx.credit),
            balance: amount(tx.balance),
        }
    }
}

/// Keep the first occurrence of each key, preserving order.
pub fn dedup(transactions: Vec<Transaction>) -> Vec<Transaction> {
    let mut seen = HashSet::new();
    transactions
        .into_iter()
        .filter(|tx| seen.insert(DedupKey::of(tx)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn tx(date: &str, description: &str, debit: Option<&str>, reference: &str) -> Transaction {
        Transaction {
            date: date.to_string(),
            description: description.to_string(),
            debit: debit.map(|d| Decimal::from_str(d).unwrap()),
            credit: None,
            balance: None,
            reference: reference.to_string(),
            branch_code: String::new(),
        }
    }

    #[test]
    fn test_first_occurrence_wins() {
        let from_table = tx("01-06-2025", "Rent", Some("15000.00"), "CHQ000123");
        let from_text = tx("01-06-2025", "Rent", Some("15000"), "");
        let other = tx("02-06-2025", "Rent", Some("15000.00"), "");

        let kept = dedup(vec![from_table.clone(), other.clone(), from_text]);

        assert_eq!(kept, vec![from_table, other]);
    }

    #[test]
    fn test_missing_amount_equals_zero() {
        let none = tx("01-06-2025", "Adjustment", None, "");
        let zero = tx("01-06-2025", "Adjustment", Some("0.00"), "");
        assert_eq!(DedupKey::of(&none), DedupKey::of(&zero));
    }
}
