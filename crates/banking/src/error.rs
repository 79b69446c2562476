use serde::{Deserialize, Serialize};
use thiserror::Error;

use subledger_core::{DomainError, Money};

use crate::account::SubAccount;

/// Which balance operation an amount was supplied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Deposit,
    Withdrawal,
    Transfer,
}

impl core::fmt::Display for Operation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Operation::Deposit => "Deposit",
            Operation::Withdrawal => "Withdrawal",
            Operation::Transfer => "Transfer",
        })
    }
}

/// Rejection reasons for ledger operations.
///
/// Every variant is recoverable: the ledger is left exactly as it was.
/// The display strings are the customer-facing console messages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Account “{0}” does not exist.")]
    UnknownAccount(String),

    #[error("{operation} amount must be positive.")]
    InvalidAmount { operation: Operation, amount: Money },

    #[error("Insufficient funds in {account}.")]
    InsufficientFunds {
        account: SubAccount,
        balance: Money,
        requested: Money,
    },

    #[error("Owner name cannot be empty.")]
    InvalidOwner,

    #[error("Ledger has already been opened.")]
    AlreadyOpened,

    #[error("Ledger has not been opened.")]
    NotOpened,

    #[error("Amount would overflow the balance of {0}.")]
    Overflow(SubAccount),

    #[error("Ledger is unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl LedgerError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}
