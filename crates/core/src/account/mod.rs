//! Accounts and the groups that label them.

pub mod types;

pub use types::{Account, AccountGroup};
