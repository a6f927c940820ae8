//! Scaled ledger - balances as shares, scaled by a global index
//!
//! Stored state never changes on rebase. An external balance is derived on
//! every read as `shares * index / BASE`, so contracting the index contracts
//! every balance at once.
//!
//! Each mutating operation validates and computes all new values first and
//! writes only after every check has passed. A rejected call leaves the
//! ledger untouched.

use crate::auth::{AdminAction, Authorizer, SingleAdmin};
use crate::config::{LedgerConfig, TokenMetadata};
use crate::error::LedgerError;
use crate::event::LedgerEvent;
use elastic_core::{AccountId, Amount, Index, Shares};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type AllowanceKey = (AccountId, AccountId);

/// Share movement computed by a transfer before anything is written
struct TransferPlan {
    from: AccountId,
    to: AccountId,
    from_after: Shares,
    to_after: Shares,
}

/// The share/index ledger
#[derive(Clone)]
pub struct ScaledLedger {
    metadata: TokenMetadata,
    index: Index,
    total_shares: Shares,
    initial_supply: Amount,
    deployer: AccountId,
    admin: AccountId,
    /// Holder -> shares (zero balances are not stored)
    shares: HashMap<AccountId, Shares>,
    /// (owner, spender) -> allowance in shares (zero allowances are not stored)
    allowances: HashMap<AllowanceKey, Shares>,
    logical_time: u64,
    authorizer: Arc<dyn Authorizer>,
}

impl ScaledLedger {
    /// Create a ledger with the whole initial supply held by `deployer`,
    /// who also becomes admin.
    pub fn new(
        metadata: TokenMetadata,
        initial_supply: Amount,
        deployer: AccountId,
    ) -> Result<Self, LedgerError> {
        if deployer.is_null() {
            return Err(LedgerError::ZeroAddress);
        }

        // index starts at BASE, so this is the identity
        let total_shares = Index::INITIAL.to_shares(initial_supply)?;

        let mut shares = HashMap::new();
        if !total_shares.is_zero() {
            shares.insert(deployer.clone(), total_shares);
        }

        tracing::info!(
            name = %metadata.name,
            symbol = %metadata.symbol,
            supply = %initial_supply,
            admin = %deployer,
            "Ledger created"
        );

        Ok(Self {
            metadata,
            index: Index::INITIAL,
            total_shares,
            initial_supply,
            admin: deployer.clone(),
            deployer,
            shares,
            allowances: HashMap::new(),
            logical_time: 0,
            authorizer: Arc::new(SingleAdmin),
        })
    }

    /// Create a ledger from a config
    pub fn from_config(config: &LedgerConfig) -> Result<Self, LedgerError> {
        Self::new(config.metadata(), config.initial_supply, config.admin.clone())
    }

    /// Replace the authorization policy
    pub fn with_authorizer(mut self, authorizer: Arc<dyn Authorizer>) -> Self {
        self.authorizer = authorizer;
        self
    }

    /// The Transfer event of the initial mint (from the null account)
    pub fn mint_event(&self) -> LedgerEvent {
        LedgerEvent::transfer(&AccountId::null(), &self.deployer, self.initial_supply)
    }

    // === Queries ===

    /// External balance: `shares * index / BASE`
    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.index.to_amount(self.get_raw_shares(account))
    }

    /// External total supply: `total_shares * index / BASE`
    pub fn total_supply(&self) -> Amount {
        self.index.to_amount(self.total_shares)
    }

    /// Remaining allowance in external amount
    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> Amount {
        self.index.to_amount(self.raw_allowance(owner, spender))
    }

    /// Current index
    pub fn get_index(&self) -> Index {
        self.index
    }

    /// Stored share balance
    pub fn get_raw_shares(&self, account: &AccountId) -> Shares {
        self.shares.get(account).copied().unwrap_or(Shares::ZERO)
    }

    /// Stored allowance in shares
    pub fn raw_allowance(&self, owner: &AccountId, spender: &AccountId) -> Shares {
        self.allowances
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or(Shares::ZERO)
    }

    /// Total shares (constant after construction)
    pub fn total_shares(&self) -> Shares {
        self.total_shares
    }

    /// Current admin
    pub fn admin(&self) -> &AccountId {
        &self.admin
    }

    /// Token metadata
    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    /// Logical clock: number of successful mutations since construction
    pub fn logical_time(&self) -> u64 {
        self.logical_time
    }

    /// Name of the active authorization policy
    pub fn authorizer_name(&self) -> &str {
        self.authorizer.name()
    }

    /// Whether the next rebase would clear the index floor
    pub fn rebase_available(&self) -> bool {
        self.index.can_contract()
    }

    /// All holders with a non-zero share balance
    pub fn accounts(&self) -> impl Iterator<Item = (&AccountId, Shares)> {
        self.shares.iter().map(|(account, shares)| (account, *shares))
    }

    /// All non-zero allowances as (owner, spender, shares)
    pub fn allowances(&self) -> impl Iterator<Item = (&AccountId, &AccountId, Shares)> {
        self.allowances
            .iter()
            .map(|((owner, spender), shares)| (owner, spender, *shares))
    }

    // === Mutations ===

    /// Move `amount` (external) from `from` to `to`.
    pub fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<LedgerEvent, LedgerError> {
        let plan = self.plan_transfer(from, to, amount)?;
        self.apply_transfer(plan);
        self.tick();

        tracing::debug!(from = %from, to = %to, amount = %amount, "Transfer applied");
        Ok(LedgerEvent::transfer(from, to, amount))
    }

    /// Move `amount` from `from` to `to` on behalf of `spender`.
    ///
    /// The allowance is checked in amount space but deducted in share space,
    /// so a rebase between approve and spend leaves more allowance than a
    /// plain "remaining = approved - spent" would.
    pub fn transfer_from(
        &mut self,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<LedgerEvent, LedgerError> {
        let raw = self.raw_allowance(from, spender);
        let available = self.index.to_amount(raw);
        let insufficient = || LedgerError::InsufficientAllowance {
            owner: from.clone(),
            spender: spender.clone(),
            available,
            required: amount,
        };

        if available < amount {
            return Err(insufficient());
        }

        let spent = self.index.to_shares(amount)?;
        let remaining = raw.checked_sub(spent).ok_or_else(insufficient)?;

        let plan = self.plan_transfer(from, to, amount)?;

        self.set_allowance(from, spender, remaining);
        self.apply_transfer(plan);
        self.tick();

        tracing::debug!(
            spender = %spender,
            from = %from,
            to = %to,
            amount = %amount,
            "Transfer on behalf applied"
        );
        Ok(LedgerEvent::transfer(from, to, amount))
    }

    /// Set the allowance of `spender` over `owner`'s balance (overwrite).
    pub fn approve(
        &mut self,
        owner: &AccountId,
        spender: &AccountId,
        amount: Amount,
    ) -> Result<LedgerEvent, LedgerError> {
        if owner.is_null() || spender.is_null() {
            return Err(LedgerError::ZeroAddress);
        }

        let shares = self.index.to_shares(amount)?;
        self.set_allowance(owner, spender, shares);
        self.tick();

        tracing::debug!(owner = %owner, spender = %spender, amount = %amount, "Approval set");
        Ok(LedgerEvent::approval(owner, spender, amount))
    }

    /// Contract the index by 1%. Touches no share balance.
    pub fn rebase(&mut self, caller: &AccountId) -> Result<LedgerEvent, LedgerError> {
        self.authorize(caller, AdminAction::Rebase)?;

        let old_index = self.index;
        let new_index = old_index.contracted().map_err(|_| {
            tracing::warn!(index = %old_index, "Rebase refused at index floor");
            LedgerError::IndexFloor {
                index: old_index,
                next: old_index.next_value(),
            }
        })?;

        self.index = new_index;
        self.tick();

        tracing::info!(
            old_index = %old_index,
            new_index = %new_index,
            logical_time = self.logical_time,
            "Rebase applied"
        );
        Ok(LedgerEvent::rebase(old_index, new_index, self.logical_time))
    }

    /// Replace the admin. Immediate, no acceptance step.
    pub fn transfer_admin(
        &mut self,
        caller: &AccountId,
        new_admin: &AccountId,
    ) -> Result<LedgerEvent, LedgerError> {
        self.authorize(caller, AdminAction::TransferAdmin)?;

        if new_admin.is_null() {
            return Err(LedgerError::ZeroAddress);
        }

        let previous = std::mem::replace(&mut self.admin, new_admin.clone());
        self.tick();

        tracing::info!(previous = %previous, new_admin = %new_admin, "Admin transferred");
        Ok(LedgerEvent::admin_transferred(&previous, new_admin))
    }

    // === Internals ===

    fn authorize(&self, caller: &AccountId, action: AdminAction) -> Result<(), LedgerError> {
        if self.authorizer.is_authorized(caller, action, &self.admin) {
            return Ok(());
        }

        tracing::warn!(
            caller = %caller,
            action = %action,
            policy = self.authorizer.name(),
            "Privileged operation rejected"
        );
        Err(LedgerError::NotAuthorized {
            caller: caller.clone(),
            action,
        })
    }

    fn plan_transfer(
        &self,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<TransferPlan, LedgerError> {
        if from.is_null() || to.is_null() {
            return Err(LedgerError::ZeroAddress);
        }

        let moved = self.index.to_shares(amount)?;
        let held = self.get_raw_shares(from);
        let available = self.index.to_amount(held);
        let insufficient = || LedgerError::InsufficientBalance {
            account: from.clone(),
            available,
            required: amount,
        };

        // Checked in amount space: what the holder sees is what they can send
        if available < amount {
            return Err(insufficient());
        }

        let from_after = held.checked_sub(moved).ok_or_else(insufficient)?;
        let to_before = if from == to {
            from_after
        } else {
            self.get_raw_shares(to)
        };
        let to_after = to_before
            .checked_add(moved)
            .ok_or(LedgerError::ArithmeticOverflow)?;

        Ok(TransferPlan {
            from: from.clone(),
            to: to.clone(),
            from_after,
            to_after,
        })
    }

    fn apply_transfer(&mut self, plan: TransferPlan) {
        // Order matters for self-transfers: the credit overwrites the debit
        self.set_shares(plan.from, plan.from_after);
        self.set_shares(plan.to, plan.to_after);
    }

    fn set_shares(&mut self, account: AccountId, shares: Shares) {
        if shares.is_zero() {
            self.shares.remove(&account);
        } else {
            self.shares.insert(account, shares);
        }
    }

    fn set_allowance(&mut self, owner: &AccountId, spender: &AccountId, shares: Shares) {
        let key = (owner.clone(), spender.clone());
        if shares.is_zero() {
            self.allowances.remove(&key);
        } else {
            self.allowances.insert(key, shares);
        }
    }

    fn tick(&mut self) {
        self.logical_time += 1;
    }
}

impl fmt::Debug for ScaledLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScaledLedger")
            .field("metadata", &self.metadata)
            .field("index", &self.index)
            .field("total_shares", &self.total_shares)
            .field("admin", &self.admin)
            .field("holders", &self.shares.len())
            .field("allowances", &self.allowances.len())
            .field("logical_time", &self.logical_time)
            .field("authorizer", &self.authorizer.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AdminSet;
    use elastic_core::BASE;

    fn id(s: &str) -> AccountId {
        s.parse().unwrap()
    }

    fn units(n: u128) -> Amount {
        Amount::new(n * u128::from(BASE))
    }

    fn ledger() -> ScaledLedger {
        ScaledLedger::new(TokenMetadata::default(), units(1_000_000), id("admin")).unwrap()
    }

    #[test]
    fn test_construction_mints_to_deployer() {
        let ledger = ledger();
        assert_eq!(ledger.get_index(), Index::INITIAL);
        assert_eq!(ledger.total_supply(), units(1_000_000));
        assert_eq!(ledger.balance_of(&id("admin")), units(1_000_000));
        assert_eq!(ledger.get_raw_shares(&id("admin")).value(), units(1_000_000).value());
        assert_eq!(ledger.admin(), &id("admin"));
        assert_eq!(ledger.logical_time(), 0);
    }

    #[test]
    fn test_construction_rejects_null_deployer() {
        let result = ScaledLedger::new(TokenMetadata::default(), units(1), AccountId::null());
        assert!(matches!(result, Err(LedgerError::ZeroAddress)));
    }

    #[test]
    fn test_mint_event() {
        let event = ledger().mint_event();
        assert_eq!(
            event,
            LedgerEvent::transfer(&AccountId::null(), &id("admin"), units(1_000_000))
        );
        assert!(event.is_mint());
    }

    #[test]
    fn test_transfer_moves_shares() {
        let mut ledger = ledger();
        let event = ledger.transfer(&id("admin"), &id("alice"), units(10)).unwrap();

        assert_eq!(event, LedgerEvent::transfer(&id("admin"), &id("alice"), units(10)));
        assert_eq!(ledger.balance_of(&id("alice")), units(10));
        assert_eq!(ledger.balance_of(&id("admin")), units(999_990));
        assert_eq!(ledger.total_shares().value(), units(1_000_000).value());
        assert_eq!(ledger.logical_time(), 1);
    }

    #[test]
    fn test_transfer_insufficient_balance_leaves_state() {
        let mut ledger = ledger();
        let before = format!("{:?}", ledger.accounts().collect::<Vec<_>>());

        let result = ledger.transfer(&id("alice"), &id("bob"), Amount::new(1));
        assert!(matches!(result, Err(LedgerError::InsufficientBalance { .. })));
        assert_eq!(format!("{:?}", ledger.accounts().collect::<Vec<_>>()), before);
        assert_eq!(ledger.logical_time(), 0);
    }

    #[test]
    fn test_transfer_zero_address() {
        let mut ledger = ledger();
        let result = ledger.transfer(&id("admin"), &AccountId::null(), units(1));
        assert_eq!(result, Err(LedgerError::ZeroAddress));
        let result = ledger.transfer(&AccountId::null(), &id("admin"), units(1));
        assert_eq!(result, Err(LedgerError::ZeroAddress));
    }

    #[test]
    fn test_self_transfer_is_noop_on_balance() {
        let mut ledger = ledger();
        ledger.transfer(&id("admin"), &id("admin"), units(500)).unwrap();
        assert_eq!(ledger.balance_of(&id("admin")), units(1_000_000));
    }

    #[test]
    fn test_transfer_entire_balance_removes_holder() {
        let mut ledger = ledger();
        ledger.transfer(&id("admin"), &id("alice"), units(1_000_000)).unwrap();
        assert_eq!(ledger.accounts().count(), 1);
        assert_eq!(ledger.get_raw_shares(&id("admin")), Shares::ZERO);
    }

    #[test]
    fn test_transfer_check_is_in_amount_space() {
        let mut ledger = ledger();
        ledger.transfer(&id("admin"), &id("alice"), Amount::new(100)).unwrap();
        ledger.rebase(&id("admin")).unwrap();

        // 100 shares are worth 99 now
        assert_eq!(ledger.balance_of(&id("alice")), Amount::new(99));
        let result = ledger.transfer(&id("alice"), &id("bob"), Amount::new(100));
        assert!(matches!(result, Err(LedgerError::InsufficientBalance { .. })));
        ledger.transfer(&id("alice"), &id("bob"), Amount::new(99)).unwrap();
        assert_eq!(ledger.balance_of(&id("bob")), Amount::new(99));
    }

    #[test]
    fn test_approve_overwrites() {
        let mut ledger = ledger();
        ledger.approve(&id("admin"), &id("alice"), units(5)).unwrap();
        ledger.approve(&id("admin"), &id("alice"), units(2)).unwrap();
        assert_eq!(ledger.allowance(&id("admin"), &id("alice")), units(2));

        ledger.approve(&id("admin"), &id("alice"), Amount::ZERO).unwrap();
        assert_eq!(ledger.allowances().count(), 0);
    }

    #[test]
    fn test_approve_zero_address() {
        let mut ledger = ledger();
        assert_eq!(
            ledger.approve(&id("admin"), &AccountId::null(), units(1)),
            Err(LedgerError::ZeroAddress)
        );
        assert_eq!(
            ledger.approve(&AccountId::null(), &id("alice"), units(1)),
            Err(LedgerError::ZeroAddress)
        );
    }

    #[test]
    fn test_transfer_from_consumes_allowance() {
        let mut ledger = ledger();
        ledger.approve(&id("admin"), &id("alice"), units(50)).unwrap();
        ledger
            .transfer_from(&id("alice"), &id("admin"), &id("bob"), units(30))
            .unwrap();

        assert_eq!(ledger.allowance(&id("admin"), &id("alice")), units(20));
        assert_eq!(ledger.balance_of(&id("bob")), units(30));
    }

    #[test]
    fn test_transfer_from_insufficient_allowance() {
        let mut ledger = ledger();
        ledger.approve(&id("admin"), &id("alice"), units(5)).unwrap();
        let result = ledger.transfer_from(&id("alice"), &id("admin"), &id("bob"), units(6));
        assert!(matches!(result, Err(LedgerError::InsufficientAllowance { .. })));
    }

    #[test]
    fn test_transfer_from_failed_transfer_keeps_allowance() {
        let mut ledger = ledger();
        ledger.approve(&id("carol"), &id("alice"), units(5)).unwrap();

        // Carol holds nothing: allowance check passes, balance check fails
        let result = ledger.transfer_from(&id("alice"), &id("carol"), &id("bob"), units(5));
        assert!(matches!(result, Err(LedgerError::InsufficientBalance { .. })));
        assert_eq!(ledger.allowance(&id("carol"), &id("alice")), units(5));
    }

    #[test]
    fn test_transfer_from_allowance_checked_before_address() {
        let mut ledger = ledger();
        let result = ledger.transfer_from(&id("alice"), &id("admin"), &AccountId::null(), units(1));
        assert!(matches!(result, Err(LedgerError::InsufficientAllowance { .. })));

        ledger.approve(&id("admin"), &id("alice"), units(1)).unwrap();
        let result = ledger.transfer_from(&id("alice"), &id("admin"), &AccountId::null(), units(1));
        assert_eq!(result, Err(LedgerError::ZeroAddress));
        assert_eq!(ledger.allowance(&id("admin"), &id("alice")), units(1));
    }

    #[test]
    fn test_rebase_requires_admin() {
        let mut ledger = ledger();
        let result = ledger.rebase(&id("alice"));
        assert_eq!(
            result,
            Err(LedgerError::NotAuthorized {
                caller: id("alice"),
                action: AdminAction::Rebase,
            })
        );
        assert_eq!(ledger.get_index(), Index::INITIAL);
    }

    #[test]
    fn test_rebase_event_carries_logical_time() {
        let mut ledger = ledger();
        ledger.transfer(&id("admin"), &id("alice"), units(1)).unwrap();
        let event = ledger.rebase(&id("admin")).unwrap();
        assert_eq!(
            event,
            LedgerEvent::rebase(Index::INITIAL, Index::INITIAL.contracted().unwrap(), 2)
        );
    }

    #[test]
    fn test_transfer_admin() {
        let mut ledger = ledger();
        let event = ledger.transfer_admin(&id("admin"), &id("ops")).unwrap();
        assert_eq!(event, LedgerEvent::admin_transferred(&id("admin"), &id("ops")));
        assert_eq!(ledger.admin(), &id("ops"));

        // Old admin lost the capability
        assert!(matches!(
            ledger.rebase(&id("admin")),
            Err(LedgerError::NotAuthorized { .. })
        ));
        ledger.rebase(&id("ops")).unwrap();
    }

    #[test]
    fn test_transfer_admin_checks_authority_first() {
        let mut ledger = ledger();
        let result = ledger.transfer_admin(&id("alice"), &AccountId::null());
        assert!(matches!(result, Err(LedgerError::NotAuthorized { .. })));

        let result = ledger.transfer_admin(&id("admin"), &AccountId::null());
        assert_eq!(result, Err(LedgerError::ZeroAddress));
        assert_eq!(ledger.admin(), &id("admin"));
    }

    #[test]
    fn test_pluggable_authorizer() {
        let mut ledger = ledger().with_authorizer(Arc::new(AdminSet::new([id("keeper")])));
        assert_eq!(ledger.authorizer_name(), "admin_set");

        ledger.rebase(&id("keeper")).unwrap();
        assert!(matches!(
            ledger.transfer_admin(&id("keeper"), &id("keeper")),
            Err(LedgerError::NotAuthorized { .. })
        ));
    }

    #[test]
    fn test_overflowing_amount_rejected() {
        let mut ledger = ledger();
        for _ in 0..10 {
            ledger.rebase(&id("admin")).unwrap();
        }
        let result = ledger.approve(&id("admin"), &id("alice"), Amount::MAX);
        assert_eq!(result, Err(LedgerError::ArithmeticOverflow));
        assert_eq!(ledger.allowances().count(), 0);
    }
}
