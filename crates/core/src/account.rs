//! AccountId - ledger account identifiers
//!
//! Identifiers are case-insensitive and normalized to uppercase, the same
//! way as everywhere else in Elastic. The literal `0` denotes the null
//! account: it is the `from` of the initial mint and is rejected wherever
//! a real account is required.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum identifier length
pub const MAX_ACCOUNT_ID_LEN: usize = 64;

/// Textual form of the null account
pub const NULL_ACCOUNT: &str = "0";

/// Errors that can occur when parsing account identifiers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountIdError {
    #[error("Empty account id")]
    Empty,

    #[error("Account id too long (max {max} chars): {0}", max = MAX_ACCOUNT_ID_LEN)]
    TooLong(String),

    #[error("Invalid account id format: {0}")]
    InvalidFormat(String),
}

/// Account identifier
///
/// # Examples
/// ```
/// use elastic_core::AccountId;
///
/// let alice: AccountId = "alice".parse().unwrap();
/// assert_eq!(alice.to_string(), "ALICE");
/// assert!(!alice.is_null());
///
/// let null: AccountId = "0".parse().unwrap();
/// assert!(null.is_null());
/// assert_eq!(null, AccountId::null());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    /// The null account
    pub fn null() -> Self {
        Self(NULL_ACCOUNT.to_string())
    }

    /// Create an AccountId without validation.
    ///
    /// # Safety
    /// The caller MUST pass an already-normalized (uppercase, valid) id.
    /// Use only for trusted constants and defaults.
    pub fn new_unchecked(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns true for the null account
    pub fn is_null(&self) -> bool {
        self.0 == NULL_ACCOUNT
    }

    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccountId {
    type Err = AccountIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_uppercase();

        if s.is_empty() {
            return Err(AccountIdError::Empty);
        }

        if s.len() > MAX_ACCOUNT_ID_LEN {
            return Err(AccountIdError::TooLong(s));
        }

        // Validate: alphanumeric plus '_', '-', '.'
        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        {
            return Err(AccountIdError::InvalidFormat(s));
        }

        Ok(Self(s))
    }
}

impl TryFrom<String> for AccountId {
    type Error = AccountIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl TryFrom<&str> for AccountId {
    type Error = AccountIdError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}
