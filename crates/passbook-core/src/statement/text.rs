//! Transaction extraction from free page text.

use tracing::trace;

use super::assembler::TransactionDraft;
use super::classifier::RowClassifier;
use super::rules::patterns::{LEADING_SPACED_DATE, WIDE_GAP};
use super::rules::{
    contains_amount, contains_any, contains_date, is_amount, is_any_date, is_reference_like,
    normalize_amount, normalize_date, KeywordTables,
};
use crate::models::{Role, Transaction};

/// Split a line into column-like tokens.
///
/// Runs of two or more spaces (or tabs) separate columns; lines that yield
/// fewer than three such tokens are split on single spaces instead.
pub fn tokenize(line: &str) -> Vec<String> {
    let line = line.trim();
    let wide: Vec<String> = WIDE_GAP
        .split(line)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect();
    if wide.len() >= 3 {
        return wide;
    }

    let mut tokens = Vec::new();
    let mut rest = line;
    if let Some(m) = LEADING_SPACED_DATE.find(line) {
        tokens.push(m.as_str().to_string());
        rest = &line[m.end()..];
    }
    tokens.extend(rest.split_whitespace().map(String::from));
    tokens
}

/// Line-oriented extractor for pages without usable tables.
pub struct TextLineExtractor<'a> {
    keywords: &'a KeywordTables,
    classifier: RowClassifier<'a>,
    min_line_length: usize,
}

impl<'a> TextLineExtractor<'a> {
    pub fn new(keywords: &'a KeywordTables) -> Self {
        Self {
            keywords,
            classifier: RowClassifier::new(keywords),
            min_line_length: 15,
        }
    }

    /// Lines must be strictly longer than this many characters.
    pub fn with_min_line_length(mut self, length: usize) -> Self {
        self.min_line_length = length;
        self
    }

    /// Extract every transaction found in `text`, in line order.
    pub fn extract(&self, text: &str) -> Vec<Transaction> {
        text.lines()
            .filter(|line| self.is_candidate(line))
            .filter_map(|line| self.parse_line(line))
            .collect()
    }

    /// Long enough, with both a date and an amount somewhere in it.
    pub fn is_candidate(&self, line: &str) -> bool {
        let line = line.trim();
        line.chars().count() > self.min_line_length && contains_date(line) && contains_amount(line)
    }

    /// Parse a single candidate line.
    pub fn parse_line(&self, line: &str) -> Option<Transaction> {
        let mut draft = TransactionDraft::default();
        let mut description: Vec<String> = Vec::new();

        for token in tokenize(line) {
            if draft.date.is_empty() && is_any_date(&token) {
                draft.date = normalize_date(&token);
            } else if is_amount(&token) {
                let amount = normalize_amount(&token);
                // Parenthesized amounts carry no credit signal
                let credit_context = token.trim_start().starts_with(['-', '+'])
                    || contains_any(&description.join(" ").to_lowercase(), &self.keywords.credit_hints);
                let unset = draft.is_free(Role::Debit) && draft.is_free(Role::Credit);

                if credit_context && unset {
                    draft.set_amount(Role::Credit, amount.magnitude);
                } else if unset {
                    draft.set_amount(Role::Debit, amount.magnitude);
                } else if draft.is_free(Role::Balance) {
                    draft.set_amount(Role::Balance, amount.magnitude);
                }
            } else if draft.reference.is_empty()
                && is_reference_like(&token, &self.keywords.transfer_markers)
            {
                draft.reference = token;
            } else {
                description.push(token);
            }
        }

        draft.description = description.join(" ");
        let transaction = draft.finish(&self.classifier);
        if transaction.is_none() {
            trace!("Text line rejected: {}", line.trim());
        }
        transaction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_tokenize_wide_gaps() {
        assert_eq!(
            tokenize("01-06-2025   Salary Credit\t50,000.00   1,50,000.00"),
            vec!["01-06-2025", "Salary Credit", "50,000.00", "1,50,000.00"]
        );
    }

    #[test]
    fn test_tokenize_single_spaces_keeps_leading_date() {
        assert_eq!(
            tokenize("01 Jun, 2025 ATM WDL 500.00"),
            vec!["01 Jun, 2025", "ATM", "WDL", "500.00"]
        );
    }

    #[test]
    fn test_credit_keyword_line() {
        let keywords = KeywordTables::default();
        let extractor = TextLineExtractor::new(&keywords);

        let tx = extractor
            .parse_line("01-06-2025  Salary Credit  50000.00  150000.00")
            .unwrap();
        assert_eq!(tx.date, "01-06-2025");
        assert_eq!(tx.description, "Salary Credit");
        assert_eq!(tx.credit, Some(dec("50000.00")));
        assert_eq!(tx.debit, None);
        assert_eq!(tx.balance, Some(dec("150000.00")));
    }

    #[test]
    fn test_debit_then_balance() {
        let keywords = KeywordTables::default();
        let extractor = TextLineExtractor::new(&keywords);

        let tx = extractor
            .parse_line("02-06-2025  ATM WDL MG ROAD  2,000.00  148,000.00")
            .unwrap();
        assert_eq!(tx.debit, Some(dec("2000.00")));
        assert_eq!(tx.balance, Some(dec("148000.00")));
    }

    #[test]
    fn test_signed_amount_binds_credit() {
        let keywords = KeywordTables::default();
        let extractor = TextLineExtractor::new(&keywords);

        let tx = extractor
            .parse_line("03-06-2025  UPI-55443322  Grocer  -450.00  147,550.00")
            .unwrap();
        assert_eq!(tx.reference, "UPI-55443322");
        assert_eq!(tx.description, "Grocer");
        assert_eq!(tx.credit, Some(dec("450.00")));
        assert_eq!(tx.balance, Some(dec("147550.00")));
    }

    #[test]
    fn test_parenthesized_amount_stays_debit() {
        let keywords = KeywordTables::default();
        let extractor = TextLineExtractor::new(&keywords);

        let tx = extractor
            .parse_line("05-06-2025  ATM Withdrawal  (500.00)  1,000.00")
            .unwrap();
        assert_eq!(tx.debit, Some(dec("500.00")));
        assert_eq!(tx.credit, None);
        assert_eq!(tx.balance, Some(dec("1000.00")));
    }

    #[test]
    fn test_extract_filters_lines() {
        let keywords = KeywordTables::default();
        let extractor = TextLineExtractor::new(&keywords);
        let text = "HDFC BANK LTD\n\
                    Statement from 01-06-2025 to 30-06-2025\n\
                    01-06-2025  Opening Balance  100000.00\n\
                    05-06-2025  Electricity bill  1,200.00  98,800.00\n\
                    short 1.00\n";

        let transactions = extractor.extract(text);
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].description, "Electricity bill");
    }
}
