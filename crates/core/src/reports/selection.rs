//! Budget × account selection.

use std::collections::HashSet;
use std::hash::Hash;

use tally_shared::types::{AccountId, BudgetId};

use super::error::ReportError;
use super::types::ReportPair;

/// Turns the two selected ID lists into the pairs a report covers.
pub struct SelectionResolver;

impl SelectionResolver {
    /// Pairs every budget with every account.
    ///
    /// Repeated IDs are dropped (first occurrence wins). Budgets form the outer
    /// loop and accounts the inner one, both in the order supplied.
    pub fn resolve(
        budget_ids: &[BudgetId],
        account_ids: &[AccountId],
    ) -> Result<Vec<ReportPair>, ReportError> {
        if budget_ids.is_empty() || account_ids.is_empty() {
            return Err(ReportError::EmptySelection);
        }

        let budgets = dedup(budget_ids);
        let accounts = dedup(account_ids);

        Ok(budgets
            .iter()
            .flat_map(|&budget_id| {
                accounts.iter().map(move |&account_id| ReportPair {
                    budget_id,
                    account_id,
                })
            })
            .collect())
    }
}

fn dedup<T: Copy + Eq + Hash>(ids: &[T]) -> Vec<T> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
