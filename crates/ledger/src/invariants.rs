//! Invariant checks over a ledger's full state
//!
//! These walk every holder, so they are O(accounts). Meant for tests and
//! audits, never for the hot path.

use crate::ledger::ScaledLedger;
use elastic_core::{AccountId, Amount, Index, Shares, BASE};
use elastic_core::math::mul_div_floor;
use serde::Serialize;
use thiserror::Error;

/// A broken ledger invariant
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("Sum of shares {sum} differs from total shares {total}")]
    SharesNotConserved { sum: Shares, total: Shares },

    #[error("Index {index} is outside the allowed range")]
    IndexOutOfRange { index: u64 },

    #[error("Total supply {supply} is below the sum of balances {balances}")]
    SupplyBelowBalances { supply: Amount, balances: Amount },

    #[error("Rounding gap {gap} exceeds the holder count {accounts}")]
    RoundingGapTooLarge { gap: Amount, accounts: usize },

    #[error("Balance of {account} is {reported}, expected {expected}")]
    BalanceMismatch {
        account: AccountId,
        reported: Amount,
        expected: Amount,
    },
}

/// Aggregate view used by audits
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvariantReport {
    pub index: Index,
    pub total_shares: Shares,
    pub total_supply: Amount,
    pub sum_of_balances: Amount,
    /// `total_supply - sum_of_balances` (zero if negative)
    pub rounding_gap: Amount,
    pub accounts: usize,
    #[serde(skip)]
    pub violations: Vec<InvariantViolation>,
}

impl InvariantReport {
    /// Build a report for the given ledger
    pub fn collect(ledger: &ScaledLedger) -> Self {
        let mut violations = Vec::new();
        let index = ledger.get_index();
        let total_shares = ledger.total_shares();
        let total_supply = ledger.total_supply();

        let mut share_sum: u128 = 0;
        let mut balance_sum: u128 = 0;
        let mut accounts = 0usize;

        for (account, shares) in ledger.accounts() {
            accounts += 1;
            share_sum = share_sum.saturating_add(shares.value());

            let reported = ledger.balance_of(account);
            balance_sum = balance_sum.saturating_add(reported.value());

            // Cross-check against the generic widened division
            if let Ok(expected) = mul_div_floor(shares.value(), index.value(), BASE) {
                let expected = Amount::new(expected);
                if expected != reported {
                    violations.push(InvariantViolation::BalanceMismatch {
                        account: account.clone(),
                        reported,
                        expected,
                    });
                }
            }
        }

        if share_sum != total_shares.value() {
            violations.push(InvariantViolation::SharesNotConserved {
                sum: Shares::new(share_sum),
                total: total_shares,
            });
        }

        if Index::new(index.value()).is_err() {
            violations.push(InvariantViolation::IndexOutOfRange {
                index: index.value(),
            });
        }

        let sum_of_balances = Amount::new(balance_sum);
        let rounding_gap = total_supply
            .checked_sub(sum_of_balances)
            .unwrap_or(Amount::ZERO);

        if total_supply < sum_of_balances {
            violations.push(InvariantViolation::SupplyBelowBalances {
                supply: total_supply,
                balances: sum_of_balances,
            });
        } else if rounding_gap.value() > accounts as u128 {
            violations.push(InvariantViolation::RoundingGapTooLarge {
                gap: rounding_gap,
                accounts,
            });
        }

        Self {
            index,
            total_shares,
            total_supply,
            sum_of_balances,
            rounding_gap,
            accounts,
            violations,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Check every invariant, returning the violations (empty = healthy)
pub fn check_invariants(ledger: &ScaledLedger) -> Vec<InvariantViolation> {
    InvariantReport::collect(ledger).violations
}
