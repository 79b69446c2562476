//! Banking module: one customer's ledger of fixed sub-accounts.
//!
//! The `Ledger` aggregate holds the deterministic rules (no IO). `Bank` wraps
//! it with typed receipts, transfer policy and logging; `SharedBank` adds a
//! lock for callers that need to share one ledger across threads.

pub mod account;
pub mod bank;
pub mod config;
pub mod error;
pub mod ledger;
pub mod shared;
pub mod statement;

pub use account::SubAccount;
pub use bank::{Bank, Receipt, TransferOutcome};
pub use config::{BankConfig, TransferMode};
pub use error::{LedgerError, Operation};
pub use ledger::{
    Deposit, FundsDeposited, FundsWithdrawn, Ledger, LedgerCommand, LedgerEvent, LedgerId,
    LedgerOpened, OpenLedger, Transfer, Withdraw,
};
pub use shared::SharedBank;
pub use statement::{Statement, StatementLine};
