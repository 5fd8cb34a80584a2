//! Account data types.

use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountGroupId, AccountId};

/// A labelling bucket for accounts. Carries no amounts of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountGroup {
    /// Group ID.
    pub id: AccountGroupId,
    /// Group name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// An account that postings are booked against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account ID.
    pub id: AccountId,
    /// Owning group.
    pub group_id: AccountGroupId,
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}
