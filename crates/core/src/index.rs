//! Index - global fixed-point scaling factor
//!
//! An external amount is `shares * index / BASE`. The index starts at
//! `BASE` (one share is worth one unit) and only ever shrinks, one 1% step
//! per rebase, down to `MIN_INDEX`.
//!
//! Every conversion truncates toward zero. That direction decides who
//! absorbs dust: the holder, never the ledger.

use crate::amount::{Amount, Shares};
use crate::math::{mul_div_floor, ArithmeticError};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Fixed-point unit of the index (10^18)
pub const BASE: u64 = 1_000_000_000_000_000_000;

/// Lowest index a rebase may produce (BASE / 1000)
pub const MIN_INDEX: u64 = BASE / 1000;

/// Rebase multiplies the index by `REBASE_NUMERATOR / REBASE_DENOMINATOR`
pub const REBASE_NUMERATOR: u64 = 99;
pub const REBASE_DENOMINATOR: u64 = 100;

/// Errors when constructing or contracting an index
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexError {
    #[error("Index {0} is below the floor {floor}", floor = MIN_INDEX)]
    BelowFloor(u64),

    #[error("Index {0} is above BASE {base}", base = BASE)]
    AboveBase(u64),
}

/// Global scaling factor, always within `[MIN_INDEX, BASE]`.
///
/// # Example
/// ```
/// use elastic_core::{Amount, Index, BASE};
///
/// let index = Index::INITIAL;
/// let shares = index.to_shares(Amount::new(500)).unwrap();
/// assert_eq!(index.to_amount(shares), Amount::new(500));
///
/// let next = index.contracted().unwrap();
/// assert_eq!(next.value(), BASE / 100 * 99);
/// assert_eq!(next.to_amount(shares), Amount::new(495));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Index(u64);

impl Index {
    /// Starting index: one share per external unit
    pub const INITIAL: Self = Self(BASE);

    /// Lowest reachable index
    pub const FLOOR: Self = Self(MIN_INDEX);

    /// Create an index, validating the `[MIN_INDEX, BASE]` range.
    pub fn new(value: u64) -> Result<Self, IndexError> {
        if value < MIN_INDEX {
            Err(IndexError::BelowFloor(value))
        } else if value > BASE {
            Err(IndexError::AboveBase(value))
        } else {
            Ok(Self(value))
        }
    }

    /// Get the raw fixed-point value
    #[inline]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Convert an external amount to shares: `amount * BASE / index`.
    ///
    /// Fails with `Overflow` when the share count would not fit in 128 bits,
    /// which can happen once the index has shrunk below `BASE`.
    pub fn to_shares(&self, amount: Amount) -> Result<Shares, ArithmeticError> {
        mul_div_floor(amount.value(), BASE, self.0).map(Shares::new)
    }

    /// Convert shares to an external amount: `shares * index / BASE`.
    ///
    /// Never fails: `index <= BASE`, so the result is at most `shares`.
    pub fn to_amount(&self, shares: Shares) -> Amount {
        let value = shares.value();
        let index = u128::from(self.0);
        let base = u128::from(BASE);

        // head <= value and remainder * index < BASE^2 < 2^128
        let head = value / base * index;
        let tail = value % base * index / base;
        Amount::new(head + tail)
    }

    /// Raw value of the next index after one rebase step (may be below the floor)
    pub fn next_value(&self) -> u64 {
        // 99 * BASE does not fit in u64, so scale down first
        let scaled = u128::from(self.0) * u128::from(REBASE_NUMERATOR)
            / u128::from(REBASE_DENOMINATOR);
        scaled as u64
    }

    /// One rebase step: `index * 99 / 100`, refused below `MIN_INDEX`.
    pub fn contracted(&self) -> Result<Self, IndexError> {
        Self::new(self.next_value())
    }

    /// Whether another rebase step is still permitted
    pub fn can_contract(&self) -> bool {
        self.next_value() >= MIN_INDEX
    }
}

impl Default for Index {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u64> for Index {
    type Error = IndexError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Index> for u64 {
    fn from(index: Index) -> Self {
        index.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn base_units(n: u128) -> Amount {
        Amount::new(n * u128::from(BASE))
    }

    #[test]
    fn test_error_messages_name_bounds() {
        assert_eq!(
            IndexError::BelowFloor(5).to_string(),
            "Index 5 is below the floor 1000000000000000"
        );
        assert_eq!(
            IndexError::AboveBase(2_000_000_000_000_000_000).to_string(),
            "Index 2000000000000000000 is above BASE 1000000000000000000"
        );
    }

    #[test]
    fn test_initial_is_identity() {
        let index = Index::INITIAL;
        let amount = base_units(1_000_000);
        let shares = index.to_shares(amount).unwrap();
        assert_eq!(shares.value(), amount.value());
        assert_eq!(index.to_amount(shares), amount);
    }

    #[test]
    fn test_one_wei_rounds_away_after_rebase() {
        let index = Index::INITIAL.contracted().unwrap();
        // 1 * BASE / (0.99 * BASE) = 1.0101.. -> 1 share, worth 0.99 -> 0
        assert_eq!(index.to_shares(Amount::new(1)).unwrap(), Shares::new(1));
        assert_eq!(index.to_amount(Shares::new(1)), Amount::ZERO);
    }

    #[test]
    fn test_contraction_truncates() {
        let once = Index::INITIAL.contracted().unwrap();
        let twice = once.contracted().unwrap();
        let thrice = twice.contracted().unwrap();
        assert_eq!(once.value(), BASE / 100 * 99);
        assert_eq!(thrice.value(), 970_299_000_000_000_000);
    }

    #[test]
    fn test_floor_rejected() {
        let index = Index::new(MIN_INDEX).unwrap();
        assert!(!index.can_contract());
        assert!(matches!(index.contracted(), Err(IndexError::BelowFloor(_))));
    }

    #[test]
    fn test_new_validates_range() {
        assert!(matches!(Index::new(MIN_INDEX - 1), Err(IndexError::BelowFloor(_))));
        assert!(matches!(Index::new(BASE + 1), Err(IndexError::AboveBase(_))));
        assert!(Index::new(MIN_INDEX).is_ok());
        assert!(Index::new(BASE).is_ok());
    }

    #[test]
    fn test_to_shares_overflow_at_low_index() {
        let index = Index::FLOOR;
        let result = index.to_shares(Amount::MAX);
        assert_eq!(result, Err(ArithmeticError::Overflow));
    }

    #[test]
    fn test_to_amount_max_shares() {
        // Must not overflow even for the largest share count
        let amount = Index::INITIAL.to_amount(Shares::MAX);
        assert_eq!(amount, Amount::MAX);
        let amount = Index::FLOOR.to_amount(Shares::MAX);
        assert_eq!(amount.value(), u128::MAX / 1000);
    }

    #[test]
    fn test_serde_rejects_out_of_range() {
        let result: Result<Index, _> = serde_json::from_str("5");
        assert!(result.is_err());
        let index: Index = serde_json::from_str(&BASE.to_string()).unwrap();
        assert_eq!(index, Index::INITIAL);
    }

    proptest! {
        #[test]
        fn prop_round_trip_never_gains(amount in any::<u64>(), index in MIN_INDEX..=BASE) {
            let index = Index::new(index).unwrap();
            let amount = Amount::new(u128::from(amount));
            let shares = index.to_shares(amount).unwrap();
            prop_assert!(index.to_amount(shares) <= amount);
        }

        #[test]
        fn prop_to_amount_matches_definition(shares in any::<u64>(), index in MIN_INDEX..=BASE) {
            let expected = u128::from(shares) * u128::from(index) / u128::from(BASE);
            let index = Index::new(index).unwrap();
            prop_assert_eq!(index.to_amount(Shares::new(u128::from(shares))).value(), expected);
        }
    }
}
