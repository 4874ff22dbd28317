//! Column role inference for tables without a declared schema.

use tracing::debug;

use super::classifier::{join_row, RowClassifier};
use super::rules::{contains_any, is_amount, is_any_date, is_date, is_reference_like, KeywordTables};
use crate::models::{AmountFillOrder, ColumnMapping, MappingBuilder, RawRow, Role};

/// How a mapping was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferenceStrategy {
    /// From the header row at this index.
    Header(usize),
    /// From the content of sampled rows.
    Content,
}

/// Result of inferring one table's columns.
#[derive(Debug, Clone)]
pub struct ColumnInference {
    pub mapping: ColumnMapping,
    pub strategy: InferenceStrategy,
    /// First row holding data.
    pub data_start: usize,
}

/// Slot preference for amounts with no positional hint.
pub fn fill_order(order: AmountFillOrder) -> [Role; 3] {
    match order {
        AmountFillOrder::BalanceFirst => [Role::Balance, Role::Debit, Role::Credit],
        AmountFillOrder::DebitFirst => [Role::Debit, Role::Credit, Role::Balance],
    }
}

/// Conventional amount role for a column position.
pub fn positional_role(index: usize) -> Option<Role> {
    match index {
        3 => Some(Role::Debit),
        4 => Some(Role::Credit),
        5 => Some(Role::Balance),
        _ => None,
    }
}

/// Derives a [`ColumnMapping`] per table.
pub struct ColumnRoleInferencer<'a> {
    keywords: &'a KeywordTables,
    classifier: RowClassifier<'a>,
    sample_rows: usize,
    fill_order: AmountFillOrder,
}

impl<'a> ColumnRoleInferencer<'a> {
    pub fn new(keywords: &'a KeywordTables) -> Self {
        Self {
            keywords,
            classifier: RowClassifier::new(keywords),
            sample_rows: 10,
            fill_order: AmountFillOrder::default(),
        }
    }

    /// Set how many leading rows content inference samples.
    pub fn with_sample_rows(mut self, rows: usize) -> Self {
        self.sample_rows = rows;
        self
    }

    /// Set the slot order for unpositioned amount columns.
    pub fn with_fill_order(mut self, order: AmountFillOrder) -> Self {
        self.fill_order = order;
        self
    }

    /// Infer roles from the header row, or from content when there is none.
    pub fn infer(&self, rows: &[RawRow]) -> ColumnInference {
        let inference = match self.find_header(rows) {
            Some(index) => ColumnInference {
                mapping: self.map_header(&rows[index]),
                strategy: InferenceStrategy::Header(index),
                data_start: index + 1,
            },
            None => ColumnInference {
                mapping: self.map_content(rows),
                strategy: InferenceStrategy::Content,
                data_start: 0,
            },
        };

        debug!(
            "Column mapping via {:?}: {:?}",
            inference.strategy,
            inference.mapping.iter().collect::<Vec<_>>()
        );
        inference
    }

    /// Index of the first row naming a date column plus an amount or description column.
    pub fn find_header(&self, rows: &[RawRow]) -> Option<usize> {
        rows.iter().position(|row| {
            if row.is_empty() || self.classifier.is_charge_header(row) {
                return false;
            }
            let text = join_row(row);
            contains_any(&text, &self.keywords.date_header)
                && (contains_any(&text, &self.keywords.amount_header)
                    || contains_any(&text, &self.keywords.description_header))
        })
    }

    fn role_keywords(&self, role: Role) -> &[String] {
        match role {
            Role::Date => &self.keywords.date_header,
            Role::Debit => &self.keywords.debit,
            Role::Credit => &self.keywords.credit,
            Role::Balance => &self.keywords.balance,
            Role::Description => &self.keywords.description_header,
            Role::Reference => &self.keywords.reference,
            Role::BranchCode => &self.keywords.branch,
        }
    }

    fn map_header(&self, header: &[Option<String>]) -> ColumnMapping {
        let mut builder = MappingBuilder::new();

        for (index, cell) in header.iter().enumerate() {
            let Some(cell) = cell.as_deref() else {
                continue;
            };
            let cell = cell.trim().to_lowercase();
            if cell.is_empty() {
                continue;
            }

            if let Some(role) = Role::HEADER_PRIORITY
                .into_iter()
                .find(|role| !builder.is_bound(*role) && contains_any(&cell, self.role_keywords(*role)))
            {
                builder.bind(role, index);
            }
        }

        builder.build()
    }

    fn map_content(&self, rows: &[RawRow]) -> ColumnMapping {
        let mut builder = MappingBuilder::new();
        let sample = &rows[..rows.len().min(self.sample_rows)];

        for row in sample.iter().filter(|row| row.len() >= 3) {
            for (index, cell) in row.iter().enumerate() {
                let Some(cell) = cell.as_deref().map(str::trim).filter(|c| !c.is_empty()) else {
                    continue;
                };
                if builder.is_claimed(index) {
                    continue;
                }

                if is_any_date(cell) {
                    builder.bind(Role::Date, index);
                } else if is_amount(cell) {
                    let role = positional_role(index)
                        .filter(|role| !builder.is_bound(*role))
                        .or_else(|| {
                            fill_order(self.fill_order)
                                .into_iter()
                                .find(|role| !builder.is_bound(*role))
                        });
                    if let Some(role) = role {
                        builder.bind(role, index);
                    }
                } else if is_reference_like(cell, &self.keywords.transfer_markers) {
                    builder.bind(Role::Reference, index);
                }
            }
        }

        'description: for row in sample {
            for (index, cell) in row.iter().enumerate() {
                let Some(cell) = cell.as_deref().map(str::trim) else {
                    continue;
                };
                if cell.chars().count() > 10
                    && !builder.is_claimed(index)
                    && !is_date(cell)
                    && !is_amount(cell)
                {
                    builder.bind(Role::Description, index);
                    break 'description;
                }
            }
        }

        builder.build()
    }
}
