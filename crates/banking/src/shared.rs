use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use subledger_core::Money;

use crate::bank::{Bank, Receipt, TransferOutcome};
use crate::error::LedgerError;
use crate::statement::Statement;

/// A `Bank` behind a read/write lock, for callers that share one ledger
/// between threads. Each operation holds the lock for its whole duration, so
/// a transfer is never interleaved with another mutation.
#[derive(Debug, Clone)]
pub struct SharedBank {
    inner: Arc<RwLock<Bank>>,
}

impl SharedBank {
    pub fn new(bank: Bank) -> Self {
        Self {
            inner: Arc::new(RwLock::new(bank)),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Bank>, LedgerError> {
        self.inner
            .read()
            .map_err(|_| LedgerError::unavailable("lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Bank>, LedgerError> {
        self.inner
            .write()
            .map_err(|_| LedgerError::unavailable("lock poisoned"))
    }

    pub fn deposit(&self, account: &str, amount: Money) -> Result<Receipt, LedgerError> {
        self.write()?.deposit(account, amount)
    }

    pub fn withdraw(&self, account: &str, amount: Money) -> Result<Receipt, LedgerError> {
        self.write()?.withdraw(account, amount)
    }

    pub fn transfer(&self, from: &str, to: &str, amount: Money) -> TransferOutcome {
        match self.write() {
            Ok(mut bank) => bank.transfer(from, to, amount),
            Err(err) => TransferOutcome::Rejected(err),
        }
    }

    pub fn balance(&self, account: &str) -> Result<Money, LedgerError> {
        self.read()?.balance(account)
    }

    pub fn statement(&self) -> Result<Statement, LedgerError> {
        Ok(self.read()?.statement())
    }
}

impl From<Bank> for SharedBank {
    fn from(bank: Bank) -> Self {
        Self::new(bank)
    }
}
