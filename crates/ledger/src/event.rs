//! Ledger events
//!
//! Every successful mutating operation produces exactly one event. Amounts
//! are external amounts as requested by the caller, never share deltas.

use elastic_core::{AccountId, Amount, Index};
use serde::{Deserialize, Serialize};

/// Events emitted by the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// Balance moved (from = null for the initial mint)
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: Amount,
    },

    /// Allowance set (overwrite)
    Approval {
        owner: AccountId,
        spender: AccountId,
        amount: Amount,
    },

    /// Index contracted
    Rebase {
        old_index: Index,
        new_index: Index,
        /// Ledger logical clock after the rebase
        logical_time: u64,
    },

    /// Admin replaced
    AdminTransferred {
        previous_admin: AccountId,
        new_admin: AccountId,
    },
}

impl LedgerEvent {
    /// Create a Transfer event
    pub fn transfer(from: &AccountId, to: &AccountId, amount: Amount) -> Self {
        Self::Transfer {
            from: from.clone(),
            to: to.clone(),
            amount,
        }
    }

    /// Create an Approval event
    pub fn approval(owner: &AccountId, spender: &AccountId, amount: Amount) -> Self {
        Self::Approval {
            owner: owner.clone(),
            spender: spender.clone(),
            amount,
        }
    }

    /// Create a Rebase event
    pub fn rebase(old_index: Index, new_index: Index, logical_time: u64) -> Self {
        Self::Rebase {
            old_index,
            new_index,
            logical_time,
        }
    }

    /// Create an AdminTransferred event
    pub fn admin_transferred(previous_admin: &AccountId, new_admin: &AccountId) -> Self {
        Self::AdminTransferred {
            previous_admin: previous_admin.clone(),
            new_admin: new_admin.clone(),
        }
    }

    /// Event name (for logging)
    pub fn name(&self) -> &'static str {
        match self {
            LedgerEvent::Transfer { .. } => "transfer",
            LedgerEvent::Approval { .. } => "approval",
            LedgerEvent::Rebase { .. } => "rebase",
            LedgerEvent::AdminTransferred { .. } => "admin_transferred",
        }
    }

    /// Returns true for the initial mint (Transfer from the null account)
    pub fn is_mint(&self) -> bool {
        matches!(self, LedgerEvent::Transfer { from, .. } if from.is_null())
    }
}
