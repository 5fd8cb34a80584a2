//! Report request, template and row types.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tally_shared::types::{
    AccountId, BudgetId, DecimalValue, DecimalValueChange, ReportId, ReportTemplateId,
};

use super::error::ReportError;

/// Which fields a report shows.
///
/// On a template these are the options the template recognizes; on a request
/// they are what the user asked for. A field is shown only when both agree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityFlags {
    /// Show actual (posted) values.
    pub actual_values_enabled: bool,
    /// Show target (budgeted) values.
    pub target_values_enabled: bool,
    /// Show actual minus target.
    pub difference_values_enabled: bool,
    /// Show account descriptions.
    pub account_descriptions_enabled: bool,
    /// Show budget descriptions.
    pub budget_descriptions_enabled: bool,
}

impl VisibilityFlags {
    /// Every field enabled.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            actual_values_enabled: true,
            target_values_enabled: true,
            difference_values_enabled: true,
            account_descriptions_enabled: true,
            budget_descriptions_enabled: true,
        }
    }

    /// Fields enabled in both `self` and `other`.
    #[must_use]
    pub const fn intersect(self, other: Self) -> Self {
        Self {
            actual_values_enabled: self.actual_values_enabled && other.actual_values_enabled,
            target_values_enabled: self.target_values_enabled && other.target_values_enabled,
            difference_values_enabled: self.difference_values_enabled
                && other.difference_values_enabled,
            account_descriptions_enabled: self.account_descriptions_enabled
                && other.account_descriptions_enabled,
            budget_descriptions_enabled: self.budget_descriptions_enabled
                && other.budget_descriptions_enabled,
        }
    }

    /// Enabled value columns in display order.
    #[must_use]
    pub fn value_kinds(self) -> Vec<ValueKind> {
        [
            (ValueKind::Actual, self.actual_values_enabled),
            (ValueKind::Target, self.target_values_enabled),
            (ValueKind::Difference, self.difference_values_enabled),
        ]
        .into_iter()
        .filter_map(|(kind, enabled)| enabled.then_some(kind))
        .collect()
    }
}

/// A value column of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Sum of postings in the budget period.
    Actual,
    /// Budgeted allocation.
    Target,
    /// Actual minus target.
    Difference,
}

impl ValueKind {
    /// Column heading.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Actual => "Actual",
            Self::Target => "Target",
            Self::Difference => "Difference",
        }
    }

    /// Picks this column's value out of a change triple.
    #[must_use]
    pub const fn pick(self, change: &DecimalValueChange) -> DecimalValue {
        match self {
            Self::Actual => change.new(),
            Self::Target => change.old(),
            Self::Difference => change.diff(),
        }
    }
}

/// A report layout stored by the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTemplate {
    /// Template ID.
    pub id: ReportTemplateId,
    /// Template name.
    pub name: String,
    /// Heading printed on the document; falls back to the name.
    #[serde(default)]
    pub title: Option<String>,
    /// Options this template recognizes.
    #[serde(default)]
    pub options: VisibilityFlags,
}

impl ReportTemplate {
    /// Heading for documents built from this template.
    #[must_use]
    pub fn heading(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }
}

/// Output format of a generated report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportType {
    /// Self-contained HTML document.
    Html,
    /// PDF bytes from the rendering service.
    Pdf,
}

impl ExportType {
    /// MIME type of the rendered output.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Html => "text/html; charset=utf-8",
            Self::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for ExportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Html => write!(f, "html"),
            Self::Pdf => write!(f, "pdf"),
        }
    }
}

impl FromStr for ExportType {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "pdf" => Ok(Self::Pdf),
            _ => Err(ReportError::UnsupportedExportType(s.to_string())),
        }
    }
}

/// A request to generate one report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRequest {
    /// Template to lay the report out with.
    pub template_id: ReportTemplateId,
    /// Budgets, one section each, in display order.
    pub budget_ids: Vec<BudgetId>,
    /// Accounts, one row each per budget, in display order.
    pub account_ids: Vec<AccountId>,
    /// Fields the user asked for.
    #[serde(default)]
    pub visibility: VisibilityFlags,
    /// `"html"` or `"pdf"`; validated when the report is generated.
    pub export_type: String,
}

/// One (budget, account) combination selected for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportPair {
    /// Budget of the pair.
    pub budget_id: BudgetId,
    /// Account of the pair.
    pub account_id: AccountId,
}

/// Computed values for one pair: `old` is the target, `new` the actual.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRow {
    /// Budget of the row.
    pub budget_id: BudgetId,
    /// Account of the row.
    pub account_id: AccountId,
    /// Target to actual.
    pub change: DecimalValueChange,
}

/// Why a pair was left out of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The account no longer exists.
    AccountNotFound,
    /// The budget no longer exists.
    BudgetNotFound,
}

impl SkipReason {
    /// Human-readable reason.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::AccountNotFound => "account not found",
            Self::BudgetNotFound => "budget not found",
        }
    }
}

/// A pair dropped from the report with the reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedPair {
    /// Budget of the pair.
    pub budget_id: BudgetId,
    /// Account of the pair.
    pub account_id: AccountId,
    /// Why it was dropped.
    pub reason: SkipReason,
}

/// Output of the render step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedReport {
    /// HTML document text.
    Html(String),
    /// PDF bytes.
    Pdf(Bytes),
}

/// Result of a full report generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratedReport {
    /// HTML document text; nothing is stored.
    Html(String),
    /// PDF bytes, also persisted under `report_id`.
    Pdf {
        /// ID of the stored report.
        report_id: ReportId,
        /// PDF payload.
        bytes: Bytes,
    },
}

impl GeneratedReport {
    /// Export type this result was produced for.
    #[must_use]
    pub const fn export_type(&self) -> ExportType {
        match self {
            Self::Html(_) => ExportType::Html,
            Self::Pdf { .. } => ExportType::Pdf,
        }
    }
}
