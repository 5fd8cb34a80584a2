//! Budget data types.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, BudgetId};

use super::error::BudgetError;

/// Inclusive date range a budget covers. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPeriod")]
pub struct BudgetPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl BudgetPeriod {
    /// Creates a period, rejecting one that ends before it starts.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, BudgetError> {
        if start > end {
            return Err(BudgetError::InvalidPeriod { start, end });
        }
        Ok(Self { start, end })
    }

    /// First day of the period.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the period.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` falls inside the period, both ends included.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Deserialize)]
struct RawPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawPeriod> for BudgetPeriod {
    type Error = BudgetError;

    fn try_from(raw: RawPeriod) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

/// A budget record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Budget ID.
    pub id: BudgetId,
    /// Budget name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Period the budget covers.
    pub period: BudgetPeriod,
    /// Target per account, as stored decimal text.
    ///
    /// Kept as text so that a corrupt stored amount surfaces as a decimal
    /// format error at the point of use.
    #[serde(default)]
    pub allocations: BTreeMap<AccountId, String>,
}

impl Budget {
    /// Creates a budget without allocations.
    #[must_use]
    pub fn new(id: BudgetId, name: impl Into<String>, period: BudgetPeriod) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            period,
            allocations: BTreeMap::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the target for one account.
    #[must_use]
    pub fn with_allocation(mut self, account_id: AccountId, amount: impl Into<String>) -> Self {
        self.allocations.insert(account_id, amount.into());
        self
    }

    /// Stored target text for an account, if one was configured.
    #[must_use]
    pub fn allocation_for(&self, account_id: AccountId) -> Option<&str> {
        self.allocations.get(&account_id).map(String::as_str)
    }
}
