//! Read access to the entities a report is built from.
//!
//! Persistence lives outside this crate. Implementations hand out read-only
//! snapshots; the report pipeline never writes through this trait.

use async_trait::async_trait;
use tally_shared::types::{AccountGroupId, AccountId, BudgetId, ReportTemplateId};
use thiserror::Error;

use super::types::ReportTemplate;
use crate::account::{Account, AccountGroup};
use crate::budget::{Budget, BudgetPeriod};

/// Failures of a report source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// A stored amount could not be read as a decimal.
    #[error("corrupt stored amount: {0:?}")]
    CorruptAmount(String),

    /// The backing store failed.
    #[error("{0}")]
    Backend(String),
}

/// Keyed lookups used by report generation.
///
/// `Ok(None)` means "not found"; `Err` means the lookup itself failed.
#[async_trait]
pub trait ReportSource: Send + Sync {
    /// Looks up a report template.
    async fn find_template(
        &self,
        id: ReportTemplateId,
    ) -> Result<Option<ReportTemplate>, SourceError>;

    /// Looks up a budget.
    async fn find_budget(&self, id: BudgetId) -> Result<Option<Budget>, SourceError>;

    /// Looks up an account.
    async fn find_account(&self, id: AccountId) -> Result<Option<Account>, SourceError>;

    /// Looks up an account group.
    async fn find_account_group(
        &self,
        id: AccountGroupId,
    ) -> Result<Option<AccountGroup>, SourceError>;

    /// Sum of postings on `account_id` dated within `period`, as decimal text.
    async fn sum_postings(
        &self,
        account_id: AccountId,
        period: &BudgetPeriod,
    ) -> Result<String, SourceError>;
}
