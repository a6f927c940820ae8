//! Amount and Shares - the two unit spaces of the ledger
//!
//! `Amount` is what callers see and pass in; `Shares` is what the ledger
//! stores. Both are unsigned 128-bit quantities, so negative balances are
//! unrepresentable. Keeping them as distinct types stops a share count from
//! ever being handed out where an external amount is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when parsing amounts or share counts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("Empty quantity")]
    Empty,

    #[error("Invalid quantity (expected a non-negative integer): {0}")]
    InvalidFormat(String),
}

/// Parse a non-negative integer, allowing `_` digit separators.
fn parse_quantity(s: &str) -> Result<u128, AmountError> {
    let cleaned: String = s.trim().chars().filter(|c| *c != '_').collect();
    if cleaned.is_empty() {
        return Err(AmountError::Empty);
    }
    cleaned
        .parse::<u128>()
        .map_err(|_| AmountError::InvalidFormat(s.trim().to_string()))
}

macro_rules! quantity {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(u128);

        impl $name {
            /// Zero constant
            pub const ZERO: Self = Self(0);

            /// Largest representable value
            pub const MAX: Self = Self(u128::MAX);

            /// Wrap a raw integer
            #[inline]
            pub const fn new(value: u128) -> Self {
                Self(value)
            }

            /// Get the inner integer
            #[inline]
            pub const fn value(&self) -> u128 {
                self.0
            }

            /// Check if the quantity is zero
            #[inline]
            pub const fn is_zero(&self) -> bool {
                self.0 == 0
            }

            /// Checked addition - returns None on overflow
            pub fn checked_add(&self, other: Self) -> Option<Self> {
                self.0.checked_add(other.0).map(Self)
            }

            /// Checked subtraction - returns None if result would be negative
            pub fn checked_sub(&self, other: Self) -> Option<Self> {
                self.0.checked_sub(other.0).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = AmountError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_quantity(s).map(Self)
            }
        }

        impl TryFrom<String> for $name {
            type Error = AmountError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                s.parse()
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0.to_string()
            }
        }

        impl From<u128> for $name {
            fn from(value: u128) -> Self {
                Self(value)
            }
        }

        impl std::iter::Sum for $name {
            /// Sum saturates at `MAX`; callers comparing against a known
            /// total treat saturation as a mismatch.
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self::ZERO, |acc, x| Self(acc.0.saturating_add(x.0)))
            }
        }
    };
}

quantity! {
    /// An external, index-scaled amount.
    ///
    /// This is the value every caller sees: balances, allowances, transfer
    /// amounts and the total supply are all expressed in `Amount`.
    ///
    /// # Example
    /// ```
    /// use elastic_core::Amount;
    ///
    /// let amount: Amount = "1_000".parse().unwrap();
    /// assert_eq!(amount.value(), 1000);
    ///
    /// // Negative values do not parse
    /// assert!("-5".parse::<Amount>().is_err());
    /// ```
    Amount
}

quantity! {
    /// An internal share count.
    ///
    /// Shares are the conserved quantity of the ledger. A rebase never
    /// changes any share count; it only changes how many external units a
    /// share is worth.
    Shares
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_separators() {
        let amount: Amount = "1_000_000".parse().unwrap();
        assert_eq!(amount, Amount::new(1_000_000));
    }

    #[test]
    fn test_parse_rejects_negative() {
        let result: Result<Amount, _> = "-1".parse();
        assert!(matches!(result, Err(AmountError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_rejects_empty() {
        let result: Result<Shares, _> = "  ".parse();
        assert!(matches!(result, Err(AmountError::Empty)));
    }

    #[test]
    fn test_parse_rejects_fraction() {
        let result: Result<Amount, _> = "1.5".parse();
        assert!(matches!(result, Err(AmountError::InvalidFormat(_))));
    }

    #[test]
    fn test_checked_sub_prevents_negative() {
        let a = Shares::new(50);
        let b = Shares::new(100);
        assert!(a.checked_sub(b).is_none());
        assert_eq!(b.checked_sub(a), Some(Shares::new(50)));
    }

    #[test]
    fn test_checked_add_overflow() {
        assert!(Amount::MAX.checked_add(Amount::new(1)).is_none());
    }

    #[test]
    fn test_serializes_as_string() {
        let shares = Shares::new(u128::MAX);
        let json = serde_json::to_string(&shares).unwrap();
        assert_eq!(json, format!("\"{}\"", u128::MAX));

        let parsed: Shares = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, shares);
    }

    #[test]
    fn test_sum_saturates() {
        let total: Amount = vec![Amount::MAX, Amount::new(1)].into_iter().sum();
        assert_eq!(total, Amount::MAX);

        let total: Shares = (1..=4).map(Shares::new).sum();
        assert_eq!(total, Shares::new(10));
    }
}
