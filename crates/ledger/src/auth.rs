//! Authorization - capability check for privileged operations
//!
//! The ledger never compares a caller against its admin directly. It asks
//! its `Authorizer`, so the policy (single admin, operator set, anything
//! else) can change without touching the accounting core.

use elastic_core::AccountId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use strum_macros::{Display, EnumString};

/// Privileged operations gated by the authorizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AdminAction {
    /// Contract the global index by one step
    Rebase,

    /// Replace the current admin
    TransferAdmin,
}

/// Capability check for privileged ledger operations
pub trait Authorizer: Send + Sync {
    /// Policy name (for logging)
    fn name(&self) -> &str;

    /// Whether `caller` may perform `action` while `admin` is the ledger's admin
    fn is_authorized(&self, caller: &AccountId, action: AdminAction, admin: &AccountId) -> bool;
}

/// Default policy: only the current admin may act
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleAdmin;

impl Authorizer for SingleAdmin {
    fn name(&self) -> &str {
        "single_admin"
    }

    fn is_authorized(&self, caller: &AccountId, _action: AdminAction, admin: &AccountId) -> bool {
        !caller.is_null() && caller == admin
    }
}

/// Operator-set policy: the admin plus a fixed set of operators may rebase;
/// only the admin may hand over admin.
#[derive(Debug, Clone, Default)]
pub struct AdminSet {
    operators: HashSet<AccountId>,
}

impl AdminSet {
    /// Create a policy from a list of operators
    pub fn new(operators: impl IntoIterator<Item = AccountId>) -> Self {
        Self {
            operators: operators.into_iter().filter(|op| !op.is_null()).collect(),
        }
    }

    /// Check if an account is a registered operator
    pub fn is_operator(&self, account: &AccountId) -> bool {
        self.operators.contains(account)
    }
}

impl Authorizer for AdminSet {
    fn name(&self) -> &str {
        "admin_set"
    }

    fn is_authorized(&self, caller: &AccountId, action: AdminAction, admin: &AccountId) -> bool {
        if caller.is_null() {
            return false;
        }
        match action {
            AdminAction::Rebase => caller == admin || self.is_operator(caller),
            AdminAction::TransferAdmin => caller == admin,
        }
    }
}
