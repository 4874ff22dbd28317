//! CSV and JSON export of extraction results.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::io::Write;

use crate::error::Result;
use crate::models::{ProcessingOutcome, Transaction};

/// Column labels of the transaction CSV.
pub const CSV_HEADERS: [&str; 7] = [
    "Tran Date",
    "Chq No",
    "Particulars",
    "Debit",
    "Credit",
    "Balance",
    "Init.Br",
];

fn amount(value: Option<Decimal>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Write transactions as CSV; absent values become empty cells.
pub fn write_csv<W: Write>(transactions: &[Transaction], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADERS)?;

    for tx in transactions {
        let (debit, credit, balance) = (amount(tx.debit), amount(tx.credit), amount(tx.balance));
        wtr.write_record([
            tx.date.as_str(),
            tx.reference.as_str(),
            tx.description.as_str(),
            debit.as_str(),
            credit.as_str(),
            balance.as_str(),
            tx.branch_code.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Transactions as a CSV string.
pub fn to_csv(transactions: &[Transaction]) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(transactions, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()).into()
    })
}

/// CSV of a successful outcome; failed outcomes have nothing to export.
pub fn outcome_to_csv(outcome: &ProcessingOutcome) -> Result<String> {
    to_csv(outcome.require_transactions()?)
}

/// File name offered for a statement's CSV download.
pub fn download_filename(bank_name: &str, date: NaiveDate) -> String {
    format!(
        "{}_Statement_{}.csv",
        bank_name.split_whitespace().collect::<Vec<_>>().join("_"),
        date.format("%Y-%m-%d")
    )
}

/// Serialize the transaction listing of an outcome.
pub fn listing_json(outcome: &ProcessingOutcome, pretty: bool) -> Result<String> {
    to_json(&outcome.listing(), pretty)
}

/// Serialize the status record of an outcome.
pub fn status_json(outcome: &ProcessingOutcome, pretty: bool) -> Result<String> {
    to_json(&outcome.status(), pretty)
}

/// Serialize any value as JSON.
pub fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, PassbookError};
    use crate::models::DateRange;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn outcome() -> ProcessingOutcome {
        ProcessingOutcome {
            success: true,
            transactions: vec![Transaction {
                date: "01-06-2025".to_string(),
                description: "Salary, June".to_string(),
                debit: None,
                credit: Some(Decimal::from_str("50000.00").unwrap()),
                balance: Some(Decimal::from_str("150000.00").unwrap()),
                reference: String::new(),
                branch_code: "0042".to_string(),
            }],
            bank_code: Some("hdfc".to_string()),
            bank_display_name: Some("HDFC Bank".to_string()),
            date_range: Some(DateRange {
                start: "01-06-2025".to_string(),
                end: "01-06-2025".to_string(),
            }),
            error_kind: None,
            error_message: None,
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_csv_layout() {
        let csv = outcome_to_csv(&outcome()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Tran Date,Chq No,Particulars,Debit,Credit,Balance,Init.Br");
        assert_eq!(lines[1], "01-06-2025,,\"Salary, June\",,50000.00,150000.00,0042");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_failed_outcome_has_no_csv() {
        let failed = ProcessingOutcome::failure(ErrorKind::NoTablesOrText, None);
        assert!(matches!(outcome_to_csv(&failed), Err(PassbookError::Extraction(_))));
    }

    #[test]
    fn test_download_filename() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();
        assert_eq!(
            download_filename("State Bank of India", date),
            "State_Bank_of_India_Statement_2025-07-04.csv"
        );
    }

    #[test]
    fn test_listing_json() {
        let json: serde_json::Value =
            serde_json::from_str(&listing_json(&outcome(), false).unwrap()).unwrap();

        assert_eq!(json["bank_name"], "HDFC Bank");
        assert_eq!(json["total_transactions"], 1);
        assert_eq!(json["transactions"][0]["credit"], 50000.0);
        assert_eq!(json["date_range"]["start"], "01-06-2025");
    }
}
