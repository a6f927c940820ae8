//! Serialized access to a ledger across threads
//!
//! Mutations hold the write lock for their whole duration and queries share
//! the read lock, so readers never observe a half-applied operation.

use crate::command::LedgerCommand;
use crate::error::LedgerError;
use crate::event::LedgerEvent;
use crate::invariants::{check_invariants, InvariantViolation};
use crate::ledger::ScaledLedger;
use elastic_core::{AccountId, Amount, Index, Shares};
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// One holder in a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountBalance {
    pub account: AccountId,
    pub shares: Shares,
    pub amount: Amount,
}

/// Consistent point-in-time copy of the ledger's balances
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerSnapshot {
    pub index: Index,
    pub total_shares: Shares,
    pub total_supply: Amount,
    pub admin: AccountId,
    pub logical_time: u64,
    /// Sorted by account
    pub balances: Vec<AccountBalance>,
}

impl LedgerSnapshot {
    pub fn of(ledger: &ScaledLedger) -> Self {
        let mut balances: Vec<AccountBalance> = ledger
            .accounts()
            .map(|(account, shares)| AccountBalance {
                account: account.clone(),
                shares,
                amount: ledger.get_index().to_amount(shares),
            })
            .collect();
        balances.sort_by(|a, b| a.account.cmp(&b.account));

        Self {
            index: ledger.get_index(),
            total_shares: ledger.total_shares(),
            total_supply: ledger.total_supply(),
            admin: ledger.admin().clone(),
            logical_time: ledger.logical_time(),
            balances,
        }
    }

    /// Sum of all holder balances
    pub fn sum_of_balances(&self) -> Amount {
        self.balances.iter().map(|b| b.amount).sum()
    }
}

/// Cloneable handle to a lock-guarded ledger
#[derive(Debug, Clone)]
pub struct SharedLedger {
    inner: Arc<RwLock<ScaledLedger>>,
}

impl SharedLedger {
    pub fn new(ledger: ScaledLedger) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ledger)),
        }
    }

    // No write happens before validation completes, so the state behind a
    // poisoned lock is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, ScaledLedger> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ScaledLedger> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run a closure under the read lock
    pub fn with_read<R>(&self, f: impl FnOnce(&ScaledLedger) -> R) -> R {
        f(&*self.read())
    }

    // === Queries ===

    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.read().balance_of(account)
    }

    pub fn total_supply(&self) -> Amount {
        self.read().total_supply()
    }

    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> Amount {
        self.read().allowance(owner, spender)
    }

    pub fn get_index(&self) -> Index {
        self.read().get_index()
    }

    pub fn get_raw_shares(&self, account: &AccountId) -> Shares {
        self.read().get_raw_shares(account)
    }

    pub fn admin(&self) -> AccountId {
        self.read().admin().clone()
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot::of(&self.read())
    }

    pub fn check_invariants(&self) -> Vec<InvariantViolation> {
        check_invariants(&self.read())
    }

    // === Mutations ===

    pub fn transfer(
        &self,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<LedgerEvent, LedgerError> {
        self.write().transfer(from, to, amount)
    }

    pub fn transfer_from(
        &self,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<LedgerEvent, LedgerError> {
        self.write().transfer_from(spender, from, to, amount)
    }

    pub fn approve(
        &self,
        owner: &AccountId,
        spender: &AccountId,
        amount: Amount,
    ) -> Result<LedgerEvent, LedgerError> {
        self.write().approve(owner, spender, amount)
    }

    pub fn rebase(&self, caller: &AccountId) -> Result<LedgerEvent, LedgerError> {
        self.write().rebase(caller)
    }

    pub fn transfer_admin(
        &self,
        caller: &AccountId,
        new_admin: &AccountId,
    ) -> Result<LedgerEvent, LedgerError> {
        self.write().transfer_admin(caller, new_admin)
    }

    pub fn execute(&self, command: &LedgerCommand) -> Result<LedgerEvent, LedgerError> {
        self.write().execute(command)
    }
}
