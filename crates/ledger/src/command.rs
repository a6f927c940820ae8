//! Ledger commands - serializable form of every mutating operation
//!
//! A command carries its caller explicitly. The journal stores commands,
//! and replaying them through `ScaledLedger::execute` rebuilds the state.

use crate::error::LedgerError;
use crate::event::LedgerEvent;
use crate::ledger::ScaledLedger;
use elastic_core::{AccountId, Amount};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// A mutating ledger operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum LedgerCommand {
    /// Move balance from the caller
    Transfer {
        caller: AccountId,
        to: AccountId,
        amount: Amount,
    },

    /// Move balance from `from` using the caller's allowance
    TransferFrom {
        caller: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    },

    /// Set the allowance of `spender` over the caller's balance
    Approve {
        caller: AccountId,
        spender: AccountId,
        amount: Amount,
    },

    /// Contract the index by one step
    Rebase { caller: AccountId },

    /// Hand admin over to `new_admin`
    TransferAdmin {
        caller: AccountId,
        new_admin: AccountId,
    },
}

/// Command discriminant (for logging and CLI output)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
pub enum CommandKind {
    Transfer,
    TransferFrom,
    Approve,
    Rebase,
    TransferAdmin,
}

impl LedgerCommand {
    /// The principal issuing the command
    pub fn caller(&self) -> &AccountId {
        match self {
            LedgerCommand::Transfer { caller, .. }
            | LedgerCommand::TransferFrom { caller, .. }
            | LedgerCommand::Approve { caller, .. }
            | LedgerCommand::Rebase { caller }
            | LedgerCommand::TransferAdmin { caller, .. } => caller,
        }
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            LedgerCommand::Transfer { .. } => CommandKind::Transfer,
            LedgerCommand::TransferFrom { .. } => CommandKind::TransferFrom,
            LedgerCommand::Approve { .. } => CommandKind::Approve,
            LedgerCommand::Rebase { .. } => CommandKind::Rebase,
            LedgerCommand::TransferAdmin { .. } => CommandKind::TransferAdmin,
        }
    }

    /// Whether the command needs the admin capability
    pub fn is_privileged(&self) -> bool {
        matches!(self.kind(), CommandKind::Rebase | CommandKind::TransferAdmin)
    }
}

impl ScaledLedger {
    /// Dispatch a command to the matching operation
    pub fn execute(&mut self, command: &LedgerCommand) -> Result<LedgerEvent, LedgerError> {
        let result = match command {
            LedgerCommand::Transfer { caller, to, amount } => self.transfer(caller, to, *amount),
            LedgerCommand::TransferFrom {
                caller,
                from,
                to,
                amount,
            } => self.transfer_from(caller, from, to, *amount),
            LedgerCommand::Approve {
                caller,
                spender,
                amount,
            } => self.approve(caller, spender, *amount),
            LedgerCommand::Rebase { caller } => self.rebase(caller),
            LedgerCommand::TransferAdmin { caller, new_admin } => {
                self.transfer_admin(caller, new_admin)
            }
        };

        if let Err(e) = &result {
            tracing::debug!(
                kind = %command.kind(),
                caller = %command.caller(),
                code = e.code(),
                "Command rejected"
            );
        }
        result
    }
}
