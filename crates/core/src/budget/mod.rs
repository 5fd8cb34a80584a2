//! Budgets: a period plus per-account targets.

pub mod error;
pub mod types;


pub use error::BudgetError;
pub use types::{Budget, BudgetPeriod};
