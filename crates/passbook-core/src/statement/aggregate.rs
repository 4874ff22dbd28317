//! Ordering and summarizing the final transaction list.

use tracing::info;

use super::bank::BankTable;
use super::rules::sort_key;
use crate::error::ErrorKind;
use crate::models::{DateRange, ProcessingOutcome, Transaction};

/// First and last non-empty dates of an already sorted list.
pub fn date_range(transactions: &[Transaction]) -> Option<DateRange> {
    let mut dated = transactions.iter().filter(|tx| !tx.date.is_empty());
    let first = dated.next()?;
    let last = dated.last().unwrap_or(first);
    Some(DateRange {
        start: first.date.clone(),
        end: last.date.clone(),
    })
}

/// Build the outcome from deduplicated transactions.
///
/// Sorting is stable; dates without a calendar key sort first.
pub fn aggregate(
    mut transactions: Vec<Transaction>,
    bank_code: &str,
    banks: &BankTable,
) -> ProcessingOutcome {
    let display_name = banks.display_name(bank_code).to_string();

    if transactions.is_empty() {
        let mut outcome =
            ProcessingOutcome::failure(ErrorKind::NoTransactionsFound, Some(bank_code.to_string()));
        outcome.bank_display_name = Some(display_name);
        return outcome;
    }

    transactions.sort_by_key(|tx| sort_key(&tx.date));
    let date_range = date_range(&transactions);

    info!(
        "Extracted {} transactions ({})",
        transactions.len(),
        display_name
    );

    ProcessingOutcome {
        success: true,
        transactions,
        bank_code: Some(bank_code.to_string()),
        bank_display_name: Some(display_name),
        date_range,
        error_kind: None,
        error_message: None,
        warnings: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn tx(date: &str, description: &str) -> Transaction {
        Transaction {
            date: date.to_string(),
            description: description.to_string(),
            debit: Some(Decimal::ONE),
            credit: None,
            balance: None,
            reference: String::new(),
            branch_code: String::new(),
        }
    }

    fn descriptions(outcome: &ProcessingOutcome) -> Vec<&str> {
        outcome.transactions.iter().map(|t| t.description.as_str()).collect()
    }

    #[test]
    fn test_sort_is_stable() {
        let banks = BankTable::default();
        let outcome = aggregate(
            vec![
                tx("02-06-2025", "b"),
                tx("01-06-2025", "a1"),
                tx("01-06-2025", "a2"),
                tx("15-05-2025", "z"),
            ],
            "hdfc",
            &banks,
        );

        assert!(outcome.success);
        assert_eq!(descriptions(&outcome), vec!["z", "a1", "a2", "b"]);
        assert_eq!(
            outcome.date_range,
            Some(DateRange {
                start: "15-05-2025".to_string(),
                end: "02-06-2025".to_string(),
            })
        );
        assert_eq!(outcome.bank_display_name.as_deref(), Some("HDFC Bank"));
    }

    #[test]
    fn test_unparseable_dates_sort_first() {
        let banks = BankTable::default();
        let outcome = aggregate(
            vec![tx("01-06-2025", "dated"), tx("", "undated"), tx("sometime", "odd")],
            "unknown",
            &banks,
        );

        assert_eq!(descriptions(&outcome), vec!["undated", "odd", "dated"]);
        assert_eq!(
            outcome.date_range,
            Some(DateRange {
                start: "sometime".to_string(),
                end: "01-06-2025".to_string(),
            })
        );
    }

    #[test]
    fn test_empty_list_is_a_failure() {
        let banks = BankTable::default();
        let outcome = aggregate(Vec::new(), "sbi", &banks);

        assert!(!outcome.success);
        assert_eq!(outcome.error_kind, Some(ErrorKind::NoTransactionsFound));
        assert_eq!(outcome.bank_code.as_deref(), Some("sbi"));
        assert_eq!(outcome.error_message.as_deref(), Some("No valid transactions found in PDF"));
    }
}
