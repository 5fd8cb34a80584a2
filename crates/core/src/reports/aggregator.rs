//! Actual, target and difference values per selected pair.

use std::collections::{HashMap, HashSet};

use futures::future::try_join_all;
use tally_shared::types::{
    AccountGroupId, AccountId, BudgetId, DecimalValue, DecimalValueChange,
};
use tracing::{debug, warn};

use super::error::ReportError;
use super::source::ReportSource;
use super::types::{ReportPair, ReportRow, SkipReason, SkippedPair};
use crate::account::{Account, AccountGroup};
use crate::budget::Budget;

/// Rows plus the entity snapshots they were computed from.
#[derive(Debug, Clone, Default)]
pub struct AggregatedValues {
    /// One row per surviving pair, in selection order.
    pub rows: Vec<ReportRow>,
    /// Budgets that were found.
    pub budgets: HashMap<BudgetId, Budget>,
    /// Accounts that were found.
    pub accounts: HashMap<AccountId, Account>,
    /// Groups of the found accounts.
    pub groups: HashMap<AccountGroupId, AccountGroup>,
    /// Pairs dropped because an entity no longer exists.
    pub skipped: Vec<SkippedPair>,
}

/// Computes a [`ReportRow`] for each selected pair.
pub struct ValueAggregator<'a> {
    source: &'a dyn ReportSource,
}

impl<'a> ValueAggregator<'a> {
    /// Creates an aggregator reading from `source`.
    #[must_use]
    pub fn new(source: &'a dyn ReportSource) -> Self {
        Self { source }
    }

    /// Looks up every entity once, then computes all rows concurrently.
    ///
    /// A pair whose budget or account is missing is skipped and recorded; any
    /// other failure aborts the aggregation. Row order always matches `pairs`.
    pub async fn aggregate(&self, pairs: &[ReportPair]) -> Result<AggregatedValues, ReportError> {
        let budget_ids = unique(pairs.iter().map(|p| p.budget_id));
        let account_ids = unique(pairs.iter().map(|p| p.account_id));

        let budgets: HashMap<BudgetId, Budget> =
            try_join_all(budget_ids.iter().map(|&id| self.source.find_budget(id)))
                .await?
                .into_iter()
                .flatten()
                .map(|budget| (budget.id, budget))
                .collect();

        let accounts: HashMap<AccountId, Account> =
            try_join_all(account_ids.iter().map(|&id| self.source.find_account(id)))
                .await?
                .into_iter()
                .flatten()
                .map(|account| (account.id, account))
                .collect();

        let group_ids = unique(
            account_ids
                .iter()
                .filter_map(|id| accounts.get(id))
                .map(|account| account.group_id),
        );
        let groups: HashMap<AccountGroupId, AccountGroup> =
            try_join_all(group_ids.iter().map(|&id| self.source.find_account_group(id)))
                .await?
                .into_iter()
                .flatten()
                .map(|group| (group.id, group))
                .collect();

        let mut skipped = Vec::new();
        let mut live = Vec::with_capacity(pairs.len());
        for pair in pairs {
            let reason = match (
                budgets.get(&pair.budget_id),
                accounts.contains_key(&pair.account_id),
            ) {
                (Some(budget), true) => {
                    live.push((budget, pair.account_id));
                    continue;
                }
                (None, _) => SkipReason::BudgetNotFound,
                (Some(_), false) => SkipReason::AccountNotFound,
            };

            warn!(
                budget_id = %pair.budget_id,
                account_id = %pair.account_id,
                reason = reason.describe(),
                "Skipping report row"
            );
            skipped.push(SkippedPair {
                budget_id: pair.budget_id,
                account_id: pair.account_id,
                reason,
            });
        }

        let rows = try_join_all(
            live.iter()
                .map(|&(budget, account_id)| self.row_for(budget, account_id)),
        )
        .await?;

        debug!(
            rows = rows.len(),
            skipped = skipped.len(),
            "Aggregated report values"
        );

        Ok(AggregatedValues {
            rows,
            budgets,
            accounts,
            groups,
            skipped,
        })
    }

    /// old = target (zero when unallocated), new = actual, diff = actual - target.
    async fn row_for(&self, budget: &Budget, account_id: AccountId) -> Result<ReportRow, ReportError> {
        let actual_text = self.source.sum_postings(account_id, &budget.period).await?;
        let actual = DecimalValue::from_text(&actual_text)?;

        let target = match budget.allocation_for(account_id) {
            Some(text) => DecimalValue::from_text(text)?,
            None => DecimalValue::ZERO,
        };

        Ok(ReportRow {
            budget_id: budget.id,
            account_id,
            change: DecimalValueChange::between(target, actual)?,
        })
    }
}

fn unique<T, I>(ids: I) -> Vec<T>
where
    T: Copy + Eq + std::hash::Hash,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::BudgetPeriod;
    use crate::reports::memory::{InMemoryReportSource, Posting};
    use crate::reports::selection::SelectionResolver;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn value(text: &str) -> DecimalValue {
        DecimalValue::from_text(text).expect("valid decimal")
    }

    struct Fixture {
        source: InMemoryReportSource,
        budget: BudgetId,
        rent: AccountId,
        food: AccountId,
    }

    fn fixture() -> Fixture {
        let group = AccountGroup {
            id: AccountGroupId::new(),
            name: "Living".to_string(),
            description: None,
        };
        let rent = Account {
            id: AccountId::new(),
            group_id: group.id,
            name: "Rent".to_string(),
            description: Some("Monthly rent".to_string()),
        };
        let food = Account {
            id: AccountId::new(),
            group_id: group.id,
            name: "Food".to_string(),
            description: None,
        };
        let period = BudgetPeriod::new(date(2026, 1, 1), date(2026, 1, 31)).expect("period");
        let budget = Budget::new(BudgetId::new(), "January", period).with_allocation(rent.id, "80.00");

        let source = InMemoryReportSource::new()
            .with_posting(Posting {
                account_id: rent.id,
                date: date(2026, 1, 3),
                amount: "100.00".to_string(),
            })
            .with_posting(Posting {
                account_id: food.id,
                date: date(2026, 1, 9),
                amount: "12.34".to_string(),
            });

        Fixture {
            budget: budget.id,
            rent: rent.id,
            food: food.id,
            source: source
                .with_group(group)
                .with_account(rent)
                .with_account(food)
                .with_budget(budget),
        }
    }

    #[tokio::test]
    async fn test_aggregate_computes_change() {
        let fx = fixture();
        let pairs = SelectionResolver::resolve(&[fx.budget], &[fx.rent]).expect("pairs");

        let values = ValueAggregator::new(&fx.source).aggregate(&pairs).await.expect("aggregate");

        assert_eq!(values.rows.len(), 1);
        let change = values.rows[0].change;
        assert_eq!(change.old(), value("80.00"));
        assert_eq!(change.new(), value("100.00"));
        assert_eq!(change.diff().to_text(), "20.00");
        assert!(values.skipped.is_empty());
        assert_eq!(values.groups.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_allocation_targets_zero() {
        let fx = fixture();
        let pairs = SelectionResolver::resolve(&[fx.budget], &[fx.food]).expect("pairs");

        let values = ValueAggregator::new(&fx.source).aggregate(&pairs).await.expect("aggregate");

        let change = values.rows[0].change;
        assert!(change.old().is_zero());
        assert_eq!(change.diff(), value("12.34"));
    }

    #[tokio::test]
    async fn test_stale_account_is_skipped() {
        let fx = fixture();
        let ghost = AccountId::new();
        let pairs = SelectionResolver::resolve(&[fx.budget], &[ghost, fx.rent]).expect("pairs");

        let values = ValueAggregator::new(&fx.source).aggregate(&pairs).await.expect("aggregate");

        assert_eq!(values.rows.len(), 1);
        assert_eq!(values.rows[0].account_id, fx.rent);
        assert_eq!(
            values.skipped,
            vec![SkippedPair {
                budget_id: fx.budget,
                account_id: ghost,
                reason: SkipReason::AccountNotFound,
            }]
        );
    }

    #[tokio::test]
    async fn test_stale_budget_is_skipped() {
        let fx = fixture();
        let ghost = BudgetId::new();
        let pairs = SelectionResolver::resolve(&[ghost, fx.budget], &[fx.rent]).expect("pairs");

        let values = ValueAggregator::new(&fx.source).aggregate(&pairs).await.expect("aggregate");

        assert_eq!(values.rows.len(), 1);
        assert_eq!(values.skipped[0].reason, SkipReason::BudgetNotFound);
    }

    #[tokio::test]
    async fn test_corrupt_allocation_is_invalid_decimal() {
        let fx = fixture();
        let period = BudgetPeriod::new(date(2026, 1, 1), date(2026, 1, 31)).expect("period");
        let broken = Budget::new(BudgetId::new(), "Broken", period).with_allocation(fx.rent, "8.0.0");
        let broken_id = broken.id;
        let source = fx.source.with_budget(broken);
        let pairs = SelectionResolver::resolve(&[broken_id], &[fx.rent]).expect("pairs");

        let err = ValueAggregator::new(&source).aggregate(&pairs).await.expect_err("corrupt");
        assert!(matches!(err, ReportError::InvalidDecimalFormat(ref s) if s == "8.0.0"));
    }

    #[tokio::test]
    async fn test_rows_follow_selection_order() {
        let fx = fixture();
        let pairs = SelectionResolver::resolve(&[fx.budget], &[fx.food, fx.rent]).expect("pairs");

        let values = ValueAggregator::new(&fx.source).aggregate(&pairs).await.expect("aggregate");

        let order: Vec<_> = values.rows.iter().map(|r| r.account_id).collect();
        assert_eq!(order, vec![fx.food, fx.rent]);
    }
}
