//! Ledger errors

use crate::auth::AdminAction;
use elastic_core::{AccountId, Amount, ArithmeticError, Index};
use thiserror::Error;

/// Errors that can occur in ledger operations
///
/// Every variant is a rejection: the ledger is left exactly as it was
/// before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Null account supplied where a real account is required")]
    ZeroAddress,

    #[error("Insufficient balance for {account}: available {available}, required {required}")]
    InsufficientBalance {
        account: AccountId,
        available: Amount,
        required: Amount,
    },

    #[error("Insufficient allowance for {spender} on {owner}: available {available}, required {required}")]
    InsufficientAllowance {
        owner: AccountId,
        spender: AccountId,
        available: Amount,
        required: Amount,
    },

    #[error("{caller} is not authorized to {action}")]
    NotAuthorized {
        caller: AccountId,
        action: AdminAction,
    },

    #[error("Rebase refused: index {index} would fall to {next}, below the floor")]
    IndexFloor { index: Index, next: u64 },

    #[error("Arithmetic overflow in share/amount conversion")]
    ArithmeticOverflow,
}

impl From<ArithmeticError> for LedgerError {
    fn from(_: ArithmeticError) -> Self {
        // Divisors are BASE or a live index, both non-zero, so every
        // arithmetic failure is an overflow.
        LedgerError::ArithmeticOverflow
    }
}

impl LedgerError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::ZeroAddress => "ZERO_ADDRESS",
            LedgerError::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            LedgerError::InsufficientAllowance { .. } => "INSUFFICIENT_ALLOWANCE",
            LedgerError::NotAuthorized { .. } => "NOT_AUTHORIZED",
            LedgerError::IndexFloor { .. } => "INDEX_FLOOR",
            LedgerError::ArithmeticOverflow => "ARITHMETIC_OVERFLOW",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_context() {
        let err = LedgerError::InsufficientBalance {
            account: AccountId::new_unchecked("ALICE"),
            available: Amount::new(5),
            required: Amount::new(10),
        };
        let msg = err.to_string();
        assert!(msg.contains("ALICE"));
        assert!(msg.contains("available 5"));
        assert!(msg.contains("required 10"));
    }

    #[test]
    fn test_not_authorized_names_action() {
        let err = LedgerError::NotAuthorized {
            caller: AccountId::new_unchecked("MALLORY"),
            action: AdminAction::Rebase,
        };
        assert_eq!(err.to_string(), "MALLORY is not authorized to rebase");
        assert_eq!(err.code(), "NOT_AUTHORIZED");
    }

    #[test]
    fn test_arithmetic_error_maps_to_overflow() {
        let err: LedgerError = ArithmeticError::Overflow.into();
        assert_eq!(err, LedgerError::ArithmeticOverflow);
    }
}
