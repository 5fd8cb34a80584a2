//! In-memory report source backed by a JSON snapshot.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountGroupId, AccountId, BudgetId, DecimalValue, ReportTemplateId};

use super::source::{ReportSource, SourceError};
use super::types::ReportTemplate;
use crate::account::{Account, AccountGroup};
use crate::budget::{Budget, BudgetPeriod};

/// A recorded posting against an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    /// Account booked against.
    pub account_id: AccountId,
    /// Booking date.
    pub date: NaiveDate,
    /// Amount as stored decimal text.
    pub amount: String,
}

/// Everything a report can read, in one serializable bundle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSnapshot {
    /// Account groups.
    pub account_groups: Vec<AccountGroup>,
    /// Accounts.
    pub accounts: Vec<Account>,
    /// Budgets.
    pub budgets: Vec<Budget>,
    /// Report templates.
    pub templates: Vec<ReportTemplate>,
    /// Postings.
    pub postings: Vec<Posting>,
}

impl ReportSnapshot {
    /// Parses a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// [`ReportSource`] over data held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReportSource {
    groups: HashMap<AccountGroupId, AccountGroup>,
    accounts: HashMap<AccountId, Account>,
    budgets: HashMap<BudgetId, Budget>,
    templates: HashMap<ReportTemplateId, ReportTemplate>,
    postings: HashMap<AccountId, Vec<Posting>>,
}

impl InMemoryReportSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes a snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: ReportSnapshot) -> Self {
        let source = Self::new();
        let source = snapshot
            .account_groups
            .into_iter()
            .fold(source, Self::with_group);
        let source = snapshot.accounts.into_iter().fold(source, Self::with_account);
        let source = snapshot.budgets.into_iter().fold(source, Self::with_budget);
        let source = snapshot
            .templates
            .into_iter()
            .fold(source, Self::with_template);
        snapshot.postings.into_iter().fold(source, Self::with_posting)
    }

    /// Adds an account group.
    #[must_use]
    pub fn with_group(mut self, group: AccountGroup) -> Self {
        self.groups.insert(group.id, group);
        self
    }

    /// Adds an account.
    #[must_use]
    pub fn with_account(mut self, account: Account) -> Self {
        self.accounts.insert(account.id, account);
        self
    }

    /// Adds a budget.
    #[must_use]
    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.budgets.insert(budget.id, budget);
        self
    }

    /// Adds a report template.
    #[must_use]
    pub fn with_template(mut self, template: ReportTemplate) -> Self {
        self.templates.insert(template.id, template);
        self
    }

    /// Records a posting.
    #[must_use]
    pub fn with_posting(mut self, posting: Posting) -> Self {
        self.postings
            .entry(posting.account_id)
            .or_default()
            .push(posting);
        self
    }

    /// Number of accounts held.
    #[must_use]
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }
}

#[async_trait]
impl ReportSource for InMemoryReportSource {
    async fn find_template(
        &self,
        id: ReportTemplateId,
    ) -> Result<Option<ReportTemplate>, SourceError> {
        Ok(self.templates.get(&id).cloned())
    }

    async fn find_budget(&self, id: BudgetId) -> Result<Option<Budget>, SourceError> {
        Ok(self.budgets.get(&id).cloned())
    }

    async fn find_account(&self, id: AccountId) -> Result<Option<Account>, SourceError> {
        Ok(self.accounts.get(&id).cloned())
    }

    async fn find_account_group(
        &self,
        id: AccountGroupId,
    ) -> Result<Option<AccountGroup>, SourceError> {
        Ok(self.groups.get(&id).cloned())
    }

    async fn sum_postings(
        &self,
        account_id: AccountId,
        period: &BudgetPeriod,
    ) -> Result<String, SourceError> {
        let Some(postings) = self.postings.get(&account_id) else {
            return Ok(DecimalValue::ZERO.to_text());
        };

        let mut total = DecimalValue::ZERO;
        for posting in postings.iter().filter(|p| period.contains(p.date)) {
            let amount = DecimalValue::from_text(&posting.amount)
                .map_err(|_| SourceError::CorruptAmount(posting.amount.clone()))?;
            total = total
                .add(&amount)
                .map_err(|e| SourceError::Backend(e.to_string()))?;
        }

        Ok(total.to_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn posting(account_id: AccountId, day: NaiveDate, amount: &str) -> Posting {
        Posting {
            account_id,
            date: day,
            amount: amount.to_string(),
        }
    }

    #[tokio::test]
    async fn test_sum_postings_within_period() {
        let account = AccountId::new();
        let source = InMemoryReportSource::new()
            .with_posting(posting(account, date(2025, 12, 31), "999.99"))
            .with_posting(posting(account, date(2026, 1, 1), "40.10"))
            .with_posting(posting(account, date(2026, 1, 31), "59.90"))
            .with_posting(posting(account, date(2026, 2, 1), "1000"));
        let january = BudgetPeriod::new(date(2026, 1, 1), date(2026, 1, 31)).expect("period");

        let sum = source.sum_postings(account, &january).await.expect("sum");
        assert_eq!(sum, "100.00");
    }

    #[tokio::test]
    async fn test_sum_postings_without_postings_is_zero() {
        let source = InMemoryReportSource::new();
        let period = BudgetPeriod::new(date(2026, 1, 1), date(2026, 1, 31)).expect("period");

        let sum = source.sum_postings(AccountId::new(), &period).await.expect("sum");
        assert_eq!(sum, "0");
    }

    #[tokio::test]
    async fn test_sum_postings_reports_corrupt_amount() {
        let account = AccountId::new();
        let source =
            InMemoryReportSource::new().with_posting(posting(account, date(2026, 1, 5), "12,50"));
        let period = BudgetPeriod::new(date(2026, 1, 1), date(2026, 1, 31)).expect("period");

        let err = source.sum_postings(account, &period).await.expect_err("corrupt");
        assert_eq!(err, SourceError::CorruptAmount("12,50".to_string()));
    }

    #[tokio::test]
    async fn test_snapshot_from_json() {
        let json = r#"{
            "account_groups": [
                {"id": "0190b8a0-0000-7000-8000-000000000001", "name": "Housing"}
            ],
            "accounts": [
                {
                    "id": "0190b8a0-0000-7000-8000-000000000002",
                    "group_id": "0190b8a0-0000-7000-8000-000000000001",
                    "name": "Rent"
                }
            ],
            "budgets": [
                {
                    "id": "0190b8a0-0000-7000-8000-000000000003",
                    "name": "2026",
                    "period": {"start": "2026-01-01", "end": "2026-12-31"},
                    "allocations": {"0190b8a0-0000-7000-8000-000000000002": "14400.00"}
                }
            ]
        }"#;

        let source = InMemoryReportSource::from_snapshot(
            ReportSnapshot::from_json(json).expect("valid snapshot"),
        );
        assert_eq!(source.account_count(), 1);

        let budget_id: BudgetId = "0190b8a0-0000-7000-8000-000000000003".parse().expect("id");
        let account_id: AccountId = "0190b8a0-0000-7000-8000-000000000002".parse().expect("id");
        let budget = source
            .find_budget(budget_id)
            .await
            .expect("lookup")
            .expect("budget present");
        assert_eq!(budget.allocation_for(account_id), Some("14400.00"));
    }

    #[test]
    fn test_snapshot_rejects_reversed_period() {
        let json = r#"{
            "budgets": [
                {
                    "id": "0190b8a0-0000-7000-8000-000000000003",
                    "name": "broken",
                    "period": {"start": "2026-12-31", "end": "2026-01-01"}
                }
            ]
        }"#;
        assert!(ReportSnapshot::from_json(json).is_err());
    }
}
