//! Renderer-agnostic report document and the assembler that builds it.

use serde::Serialize;
use tally_shared::types::{AccountId, BudgetId, DecimalValue, ReportTemplateId};

use super::aggregator::AggregatedValues;
use super::error::ReportError;
use super::types::{ReportRow, ReportTemplate, SkippedPair, ValueKind, VisibilityFlags};
use crate::budget::BudgetPeriod;

/// One value cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValueField {
    /// Column the value belongs to.
    pub kind: ValueKind,
    /// The amount.
    pub value: DecimalValue,
}

/// One account line inside a budget section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentRow {
    /// Account shown.
    pub account_id: AccountId,
    /// Account display name.
    pub account_name: String,
    /// Name of the account's group, when the group still exists.
    pub group_name: Option<String>,
    /// `None` when descriptions were not requested, `Some("")` when requested but empty.
    pub description: Option<String>,
    /// Enabled values only, in column order.
    pub values: Vec<ValueField>,
}

/// All rows of one budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSection {
    /// Budget shown.
    pub budget_id: BudgetId,
    /// Budget name.
    pub budget_name: String,
    /// Budget period.
    pub period: BudgetPeriod,
    /// Same convention as [`DocumentRow::description`].
    pub description: Option<String>,
    /// Account rows in selection order.
    pub rows: Vec<DocumentRow>,
    /// Column sums over `rows`.
    pub totals: Vec<ValueField>,
}

/// The assembled report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportDocument {
    /// Template the report was laid out with.
    pub template_id: ReportTemplateId,
    /// Document heading.
    pub title: String,
    /// Value columns shown, in order.
    pub columns: Vec<ValueKind>,
    /// Whether rows carry account descriptions.
    pub account_descriptions: bool,
    /// Whether sections carry budget descriptions.
    pub budget_descriptions: bool,
    /// One section per budget, in selection order.
    pub sections: Vec<ReportSection>,
    /// Pairs left out because an entity no longer exists.
    pub skipped: Vec<SkippedPair>,
}

impl ReportDocument {
    /// Total number of account rows across all sections.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.sections.iter().map(|s| s.rows.len()).sum()
    }
}

/// Builds a [`ReportDocument`] from aggregated values.
pub struct ReportAssembler;

impl ReportAssembler {
    /// Lays out `values` according to the template and the requested flags.
    ///
    /// A field appears only if the template recognizes it and the request
    /// enables it. Disabled value fields are left out entirely.
    pub fn assemble(
        template: &ReportTemplate,
        requested: VisibilityFlags,
        values: &AggregatedValues,
    ) -> Result<ReportDocument, ReportError> {
        let flags = template.options.intersect(requested);
        let columns = flags.value_kinds();

        let mut sections: Vec<ReportSection> = Vec::new();
        for row in &values.rows {
            let document_row = Self::document_row(row, flags, &columns, values);

            match sections.last_mut() {
                Some(section) if section.budget_id == row.budget_id => {
                    section.rows.push(document_row);
                }
                _ => {
                    let Some(budget) = values.budgets.get(&row.budget_id) else {
                        continue;
                    };
                    sections.push(ReportSection {
                        budget_id: budget.id,
                        budget_name: budget.name.clone(),
                        period: budget.period,
                        description: flags
                            .budget_descriptions_enabled
                            .then(|| budget.description.clone().unwrap_or_default()),
                        rows: vec![document_row],
                        totals: Vec::new(),
                    });
                }
            }
        }

        for section in &mut sections {
            section.totals = Self::totals(&section.rows, &columns)?;
        }

        Ok(ReportDocument {
            template_id: template.id,
            title: template.heading().to_string(),
            columns,
            account_descriptions: flags.account_descriptions_enabled,
            budget_descriptions: flags.budget_descriptions_enabled,
            sections,
            skipped: values.skipped.clone(),
        })
    }

    fn document_row(
        row: &ReportRow,
        flags: VisibilityFlags,
        columns: &[ValueKind],
        values: &AggregatedValues,
    ) -> DocumentRow {
        let account = values.accounts.get(&row.account_id);

        DocumentRow {
            account_id: row.account_id,
            account_name: account.map(|a| a.name.clone()).unwrap_or_default(),
            group_name: account
                .and_then(|a| values.groups.get(&a.group_id))
                .map(|g| g.name.clone()),
            description: flags
                .account_descriptions_enabled
                .then(|| account.and_then(|a| a.description.clone()).unwrap_or_default()),
            values: columns
                .iter()
                .map(|&kind| ValueField {
                    kind,
                    value: kind.pick(&row.change),
                })
                .collect(),
        }
    }

    fn totals(rows: &[DocumentRow], columns: &[ValueKind]) -> Result<Vec<ValueField>, ReportError> {
        columns
            .iter()
            .enumerate()
            .map(|(index, &kind)| {
                let column = rows.iter().filter_map(|row| row.values.get(index).map(|f| &f.value));
                Ok::<_, ReportError>(ValueField {
                    kind,
                    value: DecimalValue::checked_sum(column)?,
                })
            })
            .collect()
    }
}
