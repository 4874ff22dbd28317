//! Turning mapped rows into validated transactions.

use rust_decimal::Decimal;
use tracing::trace;

use super::classifier::RowClassifier;
use super::columns::{fill_order, positional_role};
use super::rules::{
    is_amount, is_any_date, is_reference_like, normalize_amount, normalize_date, AmountSign,
    AmountToken, KeywordTables,
};
use crate::models::{AmountFillOrder, ColumnMapping, Role, Transaction};

/// Placeholder narration for transactions without one.
pub const DEFAULT_DESCRIPTION: &str = "Transaction";

/// Mutable accumulator for one row or line.
#[derive(Debug, Default)]
pub(crate) struct TransactionDraft {
    pub date: String,
    pub description: String,
    pub debit: Option<Decimal>,
    pub credit: Option<Decimal>,
    pub balance: Option<Decimal>,
    pub reference: String,
    pub branch_code: String,
}

impl TransactionDraft {
    fn amount_slot(&mut self, role: Role) -> Option<&mut Option<Decimal>> {
        match role {
            Role::Debit => Some(&mut self.debit),
            Role::Credit => Some(&mut self.credit),
            Role::Balance => Some(&mut self.balance),
            _ => None,
        }
    }

    pub fn is_free(&self, role: Role) -> bool {
        match role {
            Role::Debit => self.debit.is_none(),
            Role::Credit => self.credit.is_none(),
            Role::Balance => self.balance.is_none(),
            _ => false,
        }
    }

    pub fn set_amount(&mut self, role: Role, magnitude: Decimal) {
        if let Some(slot) = self.amount_slot(role) {
            *slot = Some(magnitude);
        }
    }

    pub fn has_amount(&self) -> bool {
        self.debit.is_some() || self.credit.is_some() || self.balance.is_some()
    }

    pub fn has_identity(&self) -> bool {
        !self.date.is_empty() || !self.description.is_empty()
    }

    /// Validate and freeze the draft.
    pub fn finish(self, classifier: &RowClassifier<'_>) -> Option<Transaction> {
        if classifier.is_summary(&self.description) {
            trace!("Dropping summary row: {}", self.description);
            return None;
        }
        if !self.has_identity() {
            trace!("Dropping row without date or description");
            return None;
        }
        if !self.has_amount() {
            trace!("Dropping row without amounts: {}", self.description);
            return None;
        }

        let description = if self.description.is_empty() {
            DEFAULT_DESCRIPTION.to_string()
        } else {
            self.description
        };

        Some(Transaction {
            date: self.date,
            description,
            debit: self.debit,
            credit: self.credit,
            balance: self.balance,
            reference: self.reference,
            branch_code: self.branch_code,
        })
    }
}

/// Builds transactions from table rows.
pub struct TransactionAssembler<'a> {
    keywords: &'a KeywordTables,
    classifier: RowClassifier<'a>,
    fill_order: AmountFillOrder,
}

impl<'a> TransactionAssembler<'a> {
    pub fn new(keywords: &'a KeywordTables) -> Self {
        Self {
            keywords,
            classifier: RowClassifier::new(keywords),
            fill_order: AmountFillOrder::default(),
        }
    }

    pub fn with_fill_order(mut self, order: AmountFillOrder) -> Self {
        self.fill_order = order;
        self
    }

    /// Assemble one row through its table's mapping.
    ///
    /// Falls back to content-based placement when the mapping yields
    /// neither a date nor a description.
    pub fn assemble(&self, row: &[Option<String>], mapping: &ColumnMapping) -> Option<Transaction> {
        let mut draft = TransactionDraft::default();

        for (role, column) in mapping.iter() {
            let Some(cell) = row
                .get(column)
                .and_then(|c| c.as_deref())
                .map(str::trim)
                .filter(|c| !c.is_empty())
            else {
                continue;
            };

            match role {
                Role::Date => draft.date = normalize_date(cell),
                Role::Description => draft.description = cell.to_string(),
                Role::Reference => draft.reference = cell.to_string(),
                Role::BranchCode => draft.branch_code = cell.to_string(),
                Role::Debit | Role::Credit | Role::Balance => {
                    if is_amount(cell) {
                        draft.set_amount(role, normalize_amount(cell).magnitude);
                    }
                }
            }
        }

        if !draft.has_identity() {
            draft = self.positional_draft(row);
        }

        draft.finish(&self.classifier)
    }

    /// Assemble one row by classifying each cell on its own.
    pub fn assemble_positional(&self, row: &[Option<String>]) -> Option<Transaction> {
        self.positional_draft(row).finish(&self.classifier)
    }

    fn positional_draft(&self, row: &[Option<String>]) -> TransactionDraft {
        let mut draft = TransactionDraft::default();
        let mut description = Vec::new();

        for (index, cell) in row.iter().enumerate() {
            let Some(cell) = cell.as_deref().map(str::trim).filter(|c| !c.is_empty()) else {
                continue;
            };

            if draft.date.is_empty() && is_any_date(cell) {
                draft.date = normalize_date(cell);
            } else if is_amount(cell) {
                let token = normalize_amount(cell);
                if token.is_zero() {
                    continue;
                }
                if let Some(role) = self.place_amount(&draft, &token, index) {
                    draft.set_amount(role, token.magnitude);
                }
            } else if draft.reference.is_empty()
                && is_reference_like(cell, &self.keywords.transfer_markers)
            {
                draft.reference = cell.to_string();
            } else {
                description.push(cell);
            }
        }

        draft.description = description.join(" ");
        draft
    }

    fn place_amount(&self, draft: &TransactionDraft, token: &AmountToken, index: usize) -> Option<Role> {
        let signed = match token.sign {
            AmountSign::Negative => Some(Role::Debit),
            AmountSign::Positive => Some(Role::Credit),
            AmountSign::Unsigned => None,
        };

        signed
            .filter(|role| draft.is_free(*role))
            .or_else(|| positional_role(index).filter(|role| draft.is_free(*role)))
            .or_else(|| {
                fill_order(self.fill_order)
                    .into_iter()
                    .find(|role| draft.is_free(*role))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::columns::ColumnRoleInferencer;
    use crate::models::RawTable;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn row(cells: &[&str]) -> Vec<Option<String>> {
        cells.iter().map(|c| Some(c.to_string())).collect()
    }

    #[test]
    fn test_assemble_with_header_mapping() {
        let keywords = KeywordTables::default();
        let table = RawTable::from_cells([
            vec!["Tran Date", "Chq No", "Particulars", "Debit", "Credit", "Balance", "Init.Br"],
            vec!["01-06-2025", "", "Salary Credit", "", "50000.00", "150000.00", ""],
        ]);
        let mapping = ColumnRoleInferencer::new(&keywords).infer(&table.rows).mapping;

        let tx = TransactionAssembler::new(&keywords)
            .assemble(&table.rows[1], &mapping)
            .unwrap();

        assert_eq!(
            tx,
            Transaction {
                date: "01-06-2025".to_string(),
                description: "Salary Credit".to_string(),
                debit: None,
                credit: Some(dec("50000.00")),
                balance: Some(dec("150000.00")),
                reference: String::new(),
                branch_code: String::new(),
            }
        );
    }

    #[test]
    fn test_summary_rows_are_dropped() {
        let keywords = KeywordTables::default();
        let table = RawTable::from_cells([
            vec!["Tran Date", "Chq No", "Particulars", "Debit", "Credit", "Balance", "Init.Br"],
            vec!["30-06-2025", "", "Closing Balance", "", "", "150000.00", ""],
        ]);
        let mapping = ColumnRoleInferencer::new(&keywords).infer(&table.rows).mapping;

        assert_eq!(TransactionAssembler::new(&keywords).assemble(&table.rows[1], &mapping), None);
    }

    #[test]
    fn test_rows_without_amounts_are_dropped() {
        let keywords = KeywordTables::default();
        let table = RawTable::from_cells([
            vec!["Date", "Particulars", "Debit", "Credit", "Balance"],
            vec!["01-06-2025", "Cheque returned", "n/a", "", ""],
        ]);
        let mapping = ColumnRoleInferencer::new(&keywords).infer(&table.rows).mapping;

        assert_eq!(TransactionAssembler::new(&keywords).assemble(&table.rows[1], &mapping), None);
    }

    #[test]
    fn test_zero_amounts_are_kept_in_mapped_columns() {
        let keywords = KeywordTables::default();
        let table = RawTable::from_cells([
            vec!["Date", "Particulars", "Debit", "Credit", "Balance"],
            vec!["01-06-2025", "Interest adjustment", "0.00", "", ""],
        ]);
        let mapping = ColumnRoleInferencer::new(&keywords).infer(&table.rows).mapping;

        let tx = TransactionAssembler::new(&keywords)
            .assemble(&table.rows[1], &mapping)
            .unwrap();
        assert_eq!(tx.debit, Some(Decimal::ZERO));
    }

    #[test]
    fn test_positional_fallback_when_mapping_misses() {
        let keywords = KeywordTables::default();
        let mut builder = crate::models::MappingBuilder::new();
        builder.bind(Role::Date, 9);
        let mapping = builder.build();

        let tx = TransactionAssembler::new(&keywords)
            .assemble(&row(&["05 Jun 2025", "NEFT", "from Acme", "(1,250.50)", "+300", "8,000.00"]), &mapping)
            .unwrap();

        assert_eq!(tx.date, "05-06-2025");
        assert_eq!(tx.description, "NEFT from Acme");
        assert_eq!(tx.debit, Some(dec("1250.50")));
        assert_eq!(tx.credit, Some(dec("300")));
        assert_eq!(tx.balance, Some(dec("8000.00")));
    }

    #[test]
    fn test_positional_reference_and_placeholder() {
        let keywords = KeywordTables::default();
        let tx = TransactionAssembler::new(&keywords)
            .assemble_positional(&row(&["01-06-2025", "UPI-998877", "0.00", "420.00"]))
            .unwrap();

        assert_eq!(tx.reference, "UPI-998877");
        assert_eq!(tx.description, DEFAULT_DESCRIPTION);
        // Column 3 conventionally holds the debit.
        assert_eq!(tx.debit, Some(dec("420.00")));
        assert_eq!(tx.balance, None);
    }

    #[test]
    fn test_positional_fill_order() {
        let keywords = KeywordTables::default();
        let cells = row(&["01-06-2025", "Card purchase", "99.00"]);

        let balance_first = TransactionAssembler::new(&keywords).assemble_positional(&cells).unwrap();
        assert_eq!(balance_first.balance, Some(dec("99.00")));

        let debit_first = TransactionAssembler::new(&keywords)
            .with_fill_order(AmountFillOrder::DebitFirst)
            .assemble_positional(&cells)
            .unwrap();
        assert_eq!(debit_first.debit, Some(dec("99.00")));
        assert_eq!(debit_first.balance, None);
    }
}
