//! `Bank`: the caller-facing ledger API.
//!
//! Accepts account names as text, turns them into typed commands, runs them
//! through the `Ledger` aggregate and reports typed receipts or errors.
//! Nothing here prints; callers decide how results are surfaced.

use chrono::Utc;
use serde::Serialize;

use subledger_core::{Aggregate, AggregateId, AggregateRoot, DomainError, Money};
use subledger_events::Event;

use crate::account::SubAccount;
use crate::config::{BankConfig, TransferMode};
use crate::error::{LedgerError, Operation};
use crate::ledger::{
    Deposit, Ledger, LedgerCommand, LedgerEvent, LedgerId, OpenLedger, Transfer, Withdraw,
};
use crate::statement::Statement;

/// Confirmation of one accepted deposit or withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub operation: Operation,
    pub account: SubAccount,
    pub amount: Money,
    pub new_balance: Money,
}

impl core::fmt::Display for Receipt {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.operation {
            Operation::Withdrawal => write!(
                f,
                "Withdrew {} from {}. New balance: {}.",
                self.amount, self.account, self.new_balance
            ),
            Operation::Deposit => write!(
                f,
                "Deposited {} to {}. New balance: {}.",
                self.amount, self.account, self.new_balance
            ),
            Operation::Transfer => write!(
                f,
                "Transferred {} via {}. New balance: {}.",
                self.amount, self.account, self.new_balance
            ),
        }
    }
}

/// Result of `Bank::transfer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    /// Both legs were applied.
    Completed { withdrawal: Receipt, deposit: Receipt },
    /// Atomic mode: the transfer was refused and nothing changed.
    Rejected(LedgerError),
    /// Sequential mode: at least one leg was refused; the other may have
    /// been applied.
    Partial {
        withdrawal: Result<Receipt, LedgerError>,
        deposit: Result<Receipt, LedgerError>,
    },
}

impl TransferOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, TransferOutcome::Completed { .. })
    }

    /// Every error raised while transferring, in the order the legs ran.
    pub fn errors(&self) -> Vec<&LedgerError> {
        match self {
            TransferOutcome::Completed { .. } => Vec::new(),
            TransferOutcome::Rejected(err) => vec![err],
            TransferOutcome::Partial {
                withdrawal,
                deposit,
            } => [withdrawal.as_ref().err(), deposit.as_ref().err()]
                .into_iter()
                .flatten()
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Bank {
    ledger: Ledger,
    config: BankConfig,
}

impl Bank {
    /// Open a ledger for `owner` with default settings.
    pub fn open(owner: impl Into<String>) -> Result<Self, LedgerError> {
        Self::open_with_config(owner, BankConfig::default())
    }

    pub fn open_with_config(
        owner: impl Into<String>,
        config: BankConfig,
    ) -> Result<Self, LedgerError> {
        let ledger_id = LedgerId::new(AggregateId::new());
        let mut ledger = Ledger::empty(ledger_id);
        ledger.execute(&LedgerCommand::OpenLedger(OpenLedger {
            ledger_id,
            owner: owner.into(),
            occurred_at: Utc::now(),
        }))?;

        tracing::info!(
            ledger_id = %ledger_id,
            owner = ledger.owner(),
            transfer_mode = ?config.transfer_mode,
            "ledger opened"
        );

        Ok(Self { ledger, config })
    }

    pub fn id(&self) -> LedgerId {
        self.ledger.id_typed()
    }

    pub fn owner(&self) -> &str {
        self.ledger.owner()
    }

    pub fn config(&self) -> &BankConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn deposit(&mut self, account: &str, amount: Money) -> Result<Receipt, LedgerError> {
        let result = self.try_deposit(account, amount);
        Self::trace(Operation::Deposit, account, amount, &result);
        result
    }

    pub fn withdraw(&mut self, account: &str, amount: Money) -> Result<Receipt, LedgerError> {
        let result = self.try_withdraw(account, amount);
        Self::trace(Operation::Withdrawal, account, amount, &result);
        result
    }

    /// Move `amount` from one sub-account to another, honouring the
    /// configured `TransferMode`.
    pub fn transfer(&mut self, from: &str, to: &str, amount: Money) -> TransferOutcome {
        match self.config.transfer_mode {
            TransferMode::Atomic => self.transfer_atomic(from, to, amount),
            TransferMode::Sequential => self.transfer_sequential(from, to, amount),
        }
    }

    pub fn balance(&self, account: &str) -> Result<Money, LedgerError> {
        let account: SubAccount = account.parse()?;
        Ok(self.ledger.balance(account))
    }

    pub fn statement(&self) -> Statement {
        Statement::of(&self.ledger)
    }

    fn try_deposit(&mut self, account: &str, amount: Money) -> Result<Receipt, LedgerError> {
        let account: SubAccount = account.parse()?;
        let receipts = self.commit(&LedgerCommand::Deposit(Deposit {
            ledger_id: self.id(),
            account,
            amount,
            occurred_at: Utc::now(),
        }))?;
        Self::single(receipts)
    }

    fn try_withdraw(&mut self, account: &str, amount: Money) -> Result<Receipt, LedgerError> {
        let account: SubAccount = account.parse()?;
        let receipts = self.commit(&LedgerCommand::Withdraw(Withdraw {
            ledger_id: self.id(),
            account,
            amount,
            occurred_at: Utc::now(),
        }))?;
        Self::single(receipts)
    }

    fn transfer_atomic(&mut self, from: &str, to: &str, amount: Money) -> TransferOutcome {
        let result = self.try_transfer(from, to, amount);
        match result {
            Ok([withdrawal, deposit]) => {
                tracing::info!(
                    ledger_id = %self.id(),
                    from,
                    to,
                    amount = %amount,
                    "transfer completed"
                );
                TransferOutcome::Completed {
                    withdrawal,
                    deposit,
                }
            }
            Err(err) => {
                tracing::warn!(
                    ledger_id = %self.id(),
                    from,
                    to,
                    amount = %amount,
                    error = %err,
                    "transfer rejected"
                );
                TransferOutcome::Rejected(err)
            }
        }
    }

    fn try_transfer(
        &mut self,
        from: &str,
        to: &str,
        amount: Money,
    ) -> Result<[Receipt; 2], LedgerError> {
        let from: SubAccount = from.parse()?;
        let to: SubAccount = to.parse()?;
        let receipts = self.commit(&LedgerCommand::Transfer(Transfer {
            ledger_id: self.id(),
            from,
            to,
            amount,
            occurred_at: Utc::now(),
        }))?;
        <[Receipt; 2]>::try_from(receipts).map_err(|_| {
            LedgerError::Domain(DomainError::invariant(
                "transfer must produce one withdrawal and one deposit",
            ))
        })
    }

    fn transfer_sequential(&mut self, from: &str, to: &str, amount: Money) -> TransferOutcome {
        let withdrawal = self.withdraw(from, amount);
        let deposit = self.deposit(to, amount);

        match (withdrawal, deposit) {
            (Ok(withdrawal), Ok(deposit)) => TransferOutcome::Completed {
                withdrawal,
                deposit,
            },
            (withdrawal, deposit) => {
                if withdrawal.is_err() && deposit.is_ok() {
                    tracing::warn!(
                        ledger_id = %self.id(),
                        from,
                        to,
                        amount = %amount,
                        "deposit leg applied although withdrawal was rejected"
                    );
                }
                TransferOutcome::Partial {
                    withdrawal,
                    deposit,
                }
            }
        }
    }

    /// Decide, then apply events one at a time, reading the balance each
    /// event leaves behind.
    fn commit(&mut self, command: &LedgerCommand) -> Result<Vec<Receipt>, LedgerError> {
        let events = self.ledger.handle(command)?;
        let mut receipts = Vec::with_capacity(events.len());
        for event in &events {
            self.ledger.apply(event)?;
            let metadata = event.metadata();
            tracing::debug!(
                ledger_id = %self.id(),
                event_type = metadata.event_type,
                event_version = metadata.version,
                occurred_at = %metadata.occurred_at,
                version = self.ledger.version(),
                "event applied"
            );
            if let Some(receipt) = self.receipt_for(event) {
                receipts.push(receipt);
            }
        }
        Ok(receipts)
    }

    fn receipt_for(&self, event: &LedgerEvent) -> Option<Receipt> {
        match event {
            LedgerEvent::LedgerOpened(_) => None,
            LedgerEvent::FundsDeposited(e) => Some(Receipt {
                operation: Operation::Deposit,
                account: e.account,
                amount: e.amount,
                new_balance: self.ledger.balance(e.account),
            }),
            LedgerEvent::FundsWithdrawn(e) => Some(Receipt {
                operation: Operation::Withdrawal,
                account: e.account,
                amount: e.amount,
                new_balance: self.ledger.balance(e.account),
            }),
        }
    }

    fn single(receipts: Vec<Receipt>) -> Result<Receipt, LedgerError> {
        receipts.into_iter().next().ok_or_else(|| {
            LedgerError::Domain(DomainError::invariant("accepted command produced no receipt"))
        })
    }

    fn trace(
        operation: Operation,
        account: &str,
        amount: Money,
        result: &Result<Receipt, LedgerError>,
    ) {
        match result {
            Ok(receipt) => tracing::info!(
                operation = %operation,
                account,
                amount = %amount,
                new_balance = %receipt.new_balance,
                "operation accepted"
            ),
            Err(err) => tracing::warn!(
                operation = %operation,
                account,
                amount = %amount,
                error = %err,
                "operation rejected"
            ),
        }
    }
}
