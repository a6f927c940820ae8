//! Elastic Core - Domain types
//!
//! This crate contains the fundamental types used across Elastic:
//! - `Amount`: External, index-scaled quantity seen by callers
//! - `Shares`: Internal unit of account, untouched by rebases
//! - `Index`: Global fixed-point scaling factor and the conversions it drives
//! - `AccountId`: Account identifier, including the distinguished null account

pub mod account;
pub mod amount;
pub mod index;
pub mod math;

pub use account::{AccountId, AccountIdError};
pub use amount::{Amount, AmountError, Shares};
pub use index::{Index, IndexError, BASE, MIN_INDEX, REBASE_DENOMINATOR, REBASE_NUMERATOR};
pub use math::ArithmeticError;
