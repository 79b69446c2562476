use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use subledger_core::{Aggregate, AggregateId, AggregateRoot, Money};
use subledger_events::{Command, Event};

use crate::account::SubAccount;
use crate::error::{LedgerError, Operation};

/// Ledger identifier (aggregate id).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerId(pub AggregateId);

impl LedgerId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for LedgerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Aggregate root: Ledger (one customer, fixed sub-accounts).
///
/// Balances are stored per `SubAccount` in declaration order and are never
/// negative: both `handle` and `apply` refuse anything that would take one below zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    id: LedgerId,
    owner: String,
    balances: [Money; SubAccount::COUNT],
    version: u64,
    created: bool,
}

impl Ledger {
    /// Empty, not-yet-opened aggregate.
    pub fn empty(id: LedgerId) -> Self {
        Self {
            id,
            owner: String::new(),
            balances: [Money::ZERO; SubAccount::COUNT],
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> LedgerId {
        self.id
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn is_open(&self) -> bool {
        self.created
    }

    pub fn balance(&self, account: SubAccount) -> Money {
        self.balances[account.index()]
    }

    /// All balances in statement order.
    pub fn balances(&self) -> impl Iterator<Item = (SubAccount, Money)> + '_ {
        SubAccount::ALL
            .into_iter()
            .map(|account| (account, self.balance(account)))
    }
}

impl AggregateRoot for Ledger {
    type Id = LedgerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: OpenLedger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenLedger {
    pub ledger_id: LedgerId,
    pub owner: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: Deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
    pub ledger_id: LedgerId,
    pub account: SubAccount,
    pub amount: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Command: Withdraw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdraw {
    pub ledger_id: LedgerId,
    pub account: SubAccount,
    pub amount: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Command: Transfer (all-or-nothing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub ledger_id: LedgerId,
    pub from: SubAccount,
    pub to: SubAccount,
    pub amount: Money,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerCommand {
    OpenLedger(OpenLedger),
    Deposit(Deposit),
    Withdraw(Withdraw),
    Transfer(Transfer),
}

impl Command for LedgerCommand {
    fn target_aggregate_id(&self) -> AggregateId {
        let ledger_id = match self {
            LedgerCommand::OpenLedger(cmd) => cmd.ledger_id,
            LedgerCommand::Deposit(cmd) => cmd.ledger_id,
            LedgerCommand::Withdraw(cmd) => cmd.ledger_id,
            LedgerCommand::Transfer(cmd) => cmd.ledger_id,
        };
        ledger_id.0
    }
}

/// Event: LedgerOpened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerOpened {
    pub ledger_id: LedgerId,
    pub owner: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: FundsDeposited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundsDeposited {
    pub ledger_id: LedgerId,
    pub account: SubAccount,
    pub amount: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Event: FundsWithdrawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundsWithdrawn {
    pub ledger_id: LedgerId,
    pub account: SubAccount,
    pub amount: Money,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    LedgerOpened(LedgerOpened),
    FundsDeposited(FundsDeposited),
    FundsWithdrawn(FundsWithdrawn),
}

impl Event for LedgerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::LedgerOpened(_) => "banking.ledger.opened",
            LedgerEvent::FundsDeposited(_) => "banking.ledger.funds_deposited",
            LedgerEvent::FundsWithdrawn(_) => "banking.ledger.funds_withdrawn",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            LedgerEvent::LedgerOpened(e) => e.occurred_at,
            LedgerEvent::FundsDeposited(e) => e.occurred_at,
            LedgerEvent::FundsWithdrawn(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Ledger {
    type Command = LedgerCommand;
    type Event = LedgerEvent;
    type Error = LedgerError;

    fn apply(&mut self, event: &Self::Event) -> Result<(), Self::Error> {
        match event {
            LedgerEvent::LedgerOpened(e) => {
                if self.created {
                    return Err(LedgerError::AlreadyOpened);
                }
                self.id = e.ledger_id;
                self.owner = e.owner.clone();
                self.balances = [Money::ZERO; SubAccount::COUNT];
                self.created = true;
            }
            LedgerEvent::FundsDeposited(e) => {
                self.ensure_open(e.ledger_id)?;
                Self::ensure_positive(Operation::Deposit, e.amount)?;
                let updated = self
                    .balance(e.account)
                    .checked_add(e.amount)
                    .map_err(|_| LedgerError::Overflow(e.account))?;
                self.balances[e.account.index()] = updated;
            }
            LedgerEvent::FundsWithdrawn(e) => {
                self.ensure_open(e.ledger_id)?;
                Self::ensure_positive(Operation::Withdrawal, e.amount)?;
                self.ensure_covered(e.account, e.amount)?;
                let updated = self.balance(e.account).checked_sub(e.amount)?;
                self.balances[e.account.index()] = updated;
            }
        }

        self.version += 1;
        Ok(())
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            LedgerCommand::OpenLedger(cmd) => self.handle_open(cmd),
            LedgerCommand::Deposit(cmd) => self.handle_deposit(cmd),
            LedgerCommand::Withdraw(cmd) => self.handle_withdraw(cmd),
            LedgerCommand::Transfer(cmd) => self.handle_transfer(cmd),
        }
    }
}

impl Ledger {
    fn ensure_open(&self, ledger_id: LedgerId) -> Result<(), LedgerError> {
        if !self.created {
            return Err(LedgerError::NotOpened);
        }
        if self.id != ledger_id {
            return Err(LedgerError::Domain(subledger_core::DomainError::invariant(
                "ledger_id mismatch",
            )));
        }
        Ok(())
    }

    fn ensure_positive(operation: Operation, amount: Money) -> Result<(), LedgerError> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount { operation, amount });
        }
        Ok(())
    }

    fn ensure_covered(&self, account: SubAccount, amount: Money) -> Result<(), LedgerError> {
        let balance = self.balance(account);
        if balance < amount {
            return Err(LedgerError::InsufficientFunds {
                account,
                balance,
                requested: amount,
            });
        }
        Ok(())
    }

    fn ensure_room(balance: Money, account: SubAccount, amount: Money) -> Result<(), LedgerError> {
        balance
            .checked_add(amount)
            .map(|_| ())
            .map_err(|_| LedgerError::Overflow(account))
    }

    fn handle_open(&self, cmd: &OpenLedger) -> Result<Vec<LedgerEvent>, LedgerError> {
        if self.created {
            return Err(LedgerError::AlreadyOpened);
        }
        if cmd.owner.trim().is_empty() {
            return Err(LedgerError::InvalidOwner);
        }

        Ok(vec![LedgerEvent::LedgerOpened(LedgerOpened {
            ledger_id: cmd.ledger_id,
            owner: cmd.owner.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_deposit(&self, cmd: &Deposit) -> Result<Vec<LedgerEvent>, LedgerError> {
        self.ensure_open(cmd.ledger_id)?;
        Self::ensure_positive(Operation::Deposit, cmd.amount)?;
        Self::ensure_room(self.balance(cmd.account), cmd.account, cmd.amount)?;

        Ok(vec![LedgerEvent::FundsDeposited(FundsDeposited {
            ledger_id: cmd.ledger_id,
            account: cmd.account,
            amount: cmd.amount,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_withdraw(&self, cmd: &Withdraw) -> Result<Vec<LedgerEvent>, LedgerError> {
        self.ensure_open(cmd.ledger_id)?;
        Self::ensure_positive(Operation::Withdrawal, cmd.amount)?;
        self.ensure_covered(cmd.account, cmd.amount)?;

        Ok(vec![LedgerEvent::FundsWithdrawn(FundsWithdrawn {
            ledger_id: cmd.ledger_id,
            account: cmd.account,
            amount: cmd.amount,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_transfer(&self, cmd: &Transfer) -> Result<Vec<LedgerEvent>, LedgerError> {
        self.ensure_open(cmd.ledger_id)?;
        Self::ensure_positive(Operation::Transfer, cmd.amount)?;
        self.ensure_covered(cmd.from, cmd.amount)?;

        // Same-account transfers see the destination after the withdrawal.
        let destination = if cmd.from == cmd.to {
            self.balance(cmd.to).checked_sub(cmd.amount)?
        } else {
            self.balance(cmd.to)
        };
        Self::ensure_room(destination, cmd.to, cmd.amount)?;

        Ok(vec![
            LedgerEvent::FundsWithdrawn(FundsWithdrawn {
                ledger_id: cmd.ledger_id,
                account: cmd.from,
                amount: cmd.amount,
                occurred_at: cmd.occurred_at,
            }),
            LedgerEvent::FundsDeposited(FundsDeposited {
                ledger_id: cmd.ledger_id,
                account: cmd.to,
                amount: cmd.amount,
                occurred_at: cmd.occurred_at,
            }),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_ledger_id() -> LedgerId {
        LedgerId::new(AggregateId::new())
    }

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn dollars(units: i64) -> Money {
        Money::from_major(units).unwrap()
    }

    fn opened_ledger(owner: &str) -> Ledger {
        let ledger_id = test_ledger_id();
        let mut ledger = Ledger::empty(ledger_id);
        ledger
            .execute(&LedgerCommand::OpenLedger(OpenLedger {
                ledger_id,
                owner: owner.to_string(),
                occurred_at: test_time(),
            }))
            .unwrap();
        ledger
    }

    fn deposit(ledger: &Ledger, account: SubAccount, amount: Money) -> LedgerCommand {
        LedgerCommand::Deposit(Deposit {
            ledger_id: ledger.id_typed(),
            account,
            amount,
            occurred_at: test_time(),
        })
    }

    fn withdraw(ledger: &Ledger, account: SubAccount, amount: Money) -> LedgerCommand {
        LedgerCommand::Withdraw(Withdraw {
            ledger_id: ledger.id_typed(),
            account,
            amount,
            occurred_at: test_time(),
        })
    }

    fn transfer(ledger: &Ledger, from: SubAccount, to: SubAccount, amount: Money) -> LedgerCommand {
        LedgerCommand::Transfer(Transfer {
            ledger_id: ledger.id_typed(),
            from,
            to,
            amount,
            occurred_at: test_time(),
        })
    }

    #[test]
    fn open_ledger_starts_every_account_at_zero() {
        let ledger = opened_ledger("Michael");
        assert!(ledger.is_open());
        assert_eq!(ledger.owner(), "Michael");
        assert_eq!(ledger.version(), 1);
        for (_, balance) in ledger.balances() {
            assert_eq!(balance, Money::ZERO);
        }
    }

    #[test]
    fn open_ledger_rejects_blank_owner_and_reopening() {
        let ledger_id = test_ledger_id();
        let ledger = Ledger::empty(ledger_id);
        let err = ledger
            .handle(&LedgerCommand::OpenLedger(OpenLedger {
                ledger_id,
                owner: "  ".to_string(),
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert_eq!(err, LedgerError::InvalidOwner);

        let opened = opened_ledger("Michael");
        let err = opened
            .handle(&LedgerCommand::OpenLedger(OpenLedger {
                ledger_id: opened.id_typed(),
                owner: "Someone".to_string(),
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert_eq!(err, LedgerError::AlreadyOpened);
    }

    #[test]
    fn commands_on_unopened_ledger_are_rejected() {
        let ledger = Ledger::empty(test_ledger_id());
        let err = ledger
            .handle(&deposit(&ledger, SubAccount::Checking, dollars(1)))
            .unwrap_err();
        assert_eq!(err, LedgerError::NotOpened);
    }

    #[test]
    fn commands_for_another_ledger_are_rejected() {
        let ledger = opened_ledger("Michael");
        let cmd = LedgerCommand::Deposit(Deposit {
            ledger_id: test_ledger_id(),
            account: SubAccount::Checking,
            amount: dollars(1),
            occurred_at: test_time(),
        });
        match ledger.handle(&cmd).unwrap_err() {
            LedgerError::Domain(subledger_core::DomainError::InvariantViolation(msg)) => {
                assert!(msg.contains("ledger_id mismatch"));
            }
            other => panic!("Expected invariant violation, got {other:?}"),
        }
    }

    #[test]
    fn deposit_emits_event_and_increases_balance() {
        let mut ledger = opened_ledger("Michael");
        let events = ledger
            .execute(&deposit(&ledger, SubAccount::Checking, dollars(500)))
            .unwrap();

        assert_eq!(events.len(), 1);
        match &events[0] {
            LedgerEvent::FundsDeposited(e) => {
                assert_eq!(e.account, SubAccount::Checking);
                assert_eq!(e.amount, dollars(500));
            }
            other => panic!("Expected FundsDeposited, got {other:?}"),
        }
        assert_eq!(events[0].event_type(), "banking.ledger.funds_deposited");
        assert_eq!(ledger.balance(SubAccount::Checking), dollars(500));
        assert_eq!(ledger.version(), 2);
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        let ledger = opened_ledger("Michael");
        for amount in [Money::ZERO, Money::from_cents(-100)] {
            assert_eq!(
                ledger
                    .handle(&deposit(&ledger, SubAccount::Saving, amount))
                    .unwrap_err(),
                LedgerError::InvalidAmount {
                    operation: Operation::Deposit,
                    amount
                }
            );
            assert_eq!(
                ledger
                    .handle(&withdraw(&ledger, SubAccount::Saving, amount))
                    .unwrap_err(),
                LedgerError::InvalidAmount {
                    operation: Operation::Withdrawal,
                    amount
                }
            );
        }
    }

    #[test]
    fn withdraw_on_empty_account_reports_insufficient_funds() {
        let ledger = opened_ledger("Michael");
        let err = ledger
            .handle(&withdraw(&ledger, SubAccount::College, dollars(50)))
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientFunds {
                account: SubAccount::College,
                balance: Money::ZERO,
                requested: dollars(50),
            }
        );
    }

    #[test]
    fn withdraw_may_drain_account_to_exactly_zero() {
        let mut ledger = opened_ledger("Michael");
        ledger
            .execute(&deposit(&ledger, SubAccount::Saving, dollars(200)))
            .unwrap();
        ledger
            .execute(&withdraw(&ledger, SubAccount::Saving, dollars(200)))
            .unwrap();
        assert_eq!(ledger.balance(SubAccount::Saving), Money::ZERO);
    }

    #[test]
    fn deposit_that_would_overflow_is_rejected() {
        let mut ledger = opened_ledger("Michael");
        ledger
            .execute(&deposit(&ledger, SubAccount::Investing, Money::from_cents(i64::MAX)))
            .unwrap();
        let err = ledger
            .handle(&deposit(&ledger, SubAccount::Investing, Money::from_cents(1)))
            .unwrap_err();
        assert_eq!(err, LedgerError::Overflow(SubAccount::Investing));
    }

    #[test]
    fn transfer_emits_withdrawal_then_deposit() {
        let mut ledger = opened_ledger("Michael");
        ledger
            .execute(&deposit(&ledger, SubAccount::Checking, dollars(500)))
            .unwrap();
        let events = ledger
            .execute(&transfer(
                &ledger,
                SubAccount::Checking,
                SubAccount::Investing,
                dollars(150),
            ))
            .unwrap();

        assert!(matches!(events[0], LedgerEvent::FundsWithdrawn(_)));
        assert!(matches!(events[1], LedgerEvent::FundsDeposited(_)));
        assert_eq!(ledger.balance(SubAccount::Checking), dollars(350));
        assert_eq!(ledger.balance(SubAccount::Investing), dollars(150));
    }

    #[test]
    fn transfer_without_funds_changes_nothing() {
        let mut ledger = opened_ledger("Michael");
        let before = ledger.clone();
        let err = ledger
            .execute(&transfer(
                &ledger,
                SubAccount::College,
                SubAccount::Saving,
                dollars(10),
            ))
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
        assert_eq!(ledger, before);
    }

    #[test]
    fn transfer_to_same_account_is_net_zero() {
        let mut ledger = opened_ledger("Michael");
        ledger
            .execute(&deposit(&ledger, SubAccount::Checking, dollars(100)))
            .unwrap();
        ledger
            .execute(&transfer(
                &ledger,
                SubAccount::Checking,
                SubAccount::Checking,
                dollars(100),
            ))
            .unwrap();
        assert_eq!(ledger.balance(SubAccount::Checking), dollars(100));
    }

    fn withdrawn(ledger: &Ledger, account: SubAccount, amount: Money) -> LedgerEvent {
        LedgerEvent::FundsWithdrawn(FundsWithdrawn {
            ledger_id: ledger.id_typed(),
            account,
            amount,
            occurred_at: test_time(),
        })
    }

    fn deposited(ledger: &Ledger, account: SubAccount, amount: Money) -> LedgerEvent {
        LedgerEvent::FundsDeposited(FundsDeposited {
            ledger_id: ledger.id_typed(),
            account,
            amount,
            occurred_at: test_time(),
        })
    }

    #[test]
    fn apply_refuses_withdrawal_larger_than_balance() {
        let mut ledger = opened_ledger("Michael");
        let before = ledger.clone();

        let event = withdrawn(&ledger, SubAccount::College, dollars(50));
        let err = ledger.apply(&event).unwrap_err();

        assert_eq!(
            err,
            LedgerError::InsufficientFunds {
                account: SubAccount::College,
                balance: Money::ZERO,
                requested: dollars(50),
            }
        );
        assert_eq!(ledger, before);
        assert_eq!(ledger.balance(SubAccount::College), Money::ZERO);
    }

    #[test]
    fn apply_refuses_overflowing_deposit_without_bumping_version() {
        let mut ledger = opened_ledger("Michael");
        let first = deposited(&ledger, SubAccount::Saving, Money::from_cents(i64::MAX));
        ledger.apply(&first).unwrap();
        let version = ledger.version();

        let second = deposited(&ledger, SubAccount::Saving, Money::from_cents(1));
        assert_eq!(
            ledger.apply(&second).unwrap_err(),
            LedgerError::Overflow(SubAccount::Saving)
        );
        assert_eq!(ledger.version(), version);
        assert_eq!(ledger.balance(SubAccount::Saving), Money::from_cents(i64::MAX));
    }

    #[test]
    fn apply_refuses_non_positive_amounts_and_reopening() {
        let mut ledger = opened_ledger("Michael");
        let before = ledger.clone();

        let negative = deposited(&ledger, SubAccount::Checking, Money::from_cents(-1));
        assert!(matches!(
            ledger.apply(&negative),
            Err(LedgerError::InvalidAmount { .. })
        ));

        let reopen = LedgerEvent::LedgerOpened(LedgerOpened {
            ledger_id: ledger.id_typed(),
            owner: "Someone".to_string(),
            occurred_at: test_time(),
        });
        assert_eq!(ledger.apply(&reopen).unwrap_err(), LedgerError::AlreadyOpened);
        assert_eq!(ledger, before);
    }

    #[test]
    fn apply_refuses_fund_events_before_opening() {
        let mut ledger = Ledger::empty(test_ledger_id());
        let event = deposited(&ledger, SubAccount::Checking, dollars(1));
        assert_eq!(ledger.apply(&event).unwrap_err(), LedgerError::NotOpened);
        assert_eq!(ledger.version(), 0);
    }

    #[test]
    fn events_carry_type_version_and_business_time() {
        let ledger = opened_ledger("Michael");
        let occurred_at = test_time();
        let events = ledger
            .handle(&LedgerCommand::Deposit(Deposit {
                ledger_id: ledger.id_typed(),
                account: SubAccount::Checking,
                amount: dollars(1),
                occurred_at,
            }))
            .unwrap();
        let metadata = events[0].metadata();
        assert_eq!(metadata.event_type, "banking.ledger.funds_deposited");
        assert_eq!(metadata.version, 1);
        assert_eq!(metadata.occurred_at, occurred_at);
    }

    #[test]
    fn handle_does_not_mutate_state() {
        let ledger = opened_ledger("Michael");
        let before = ledger.clone();
        let first = ledger
            .handle(&deposit(&ledger, SubAccount::Checking, dollars(5)))
            .unwrap();
        assert_eq!(ledger, before);
        assert_eq!(first.len(), 1);
    }

    #[test]
    fn commands_target_the_ledger_aggregate() {
        let ledger = opened_ledger("Michael");
        let cmd = deposit(&ledger, SubAccount::Checking, dollars(1));
        assert_eq!(cmd.target_aggregate_id(), ledger.id_typed().0);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Deposit(SubAccount, i64),
        Withdraw(SubAccount, i64),
        Transfer(SubAccount, SubAccount, i64),
    }

    fn account_strategy() -> impl Strategy<Value = SubAccount> {
        prop::sample::select(SubAccount::ALL.to_vec())
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (account_strategy(), -10_000i64..100_000).prop_map(|(a, c)| Op::Deposit(a, c)),
            (account_strategy(), -10_000i64..100_000).prop_map(|(a, c)| Op::Withdraw(a, c)),
            (account_strategy(), account_strategy(), -10_000i64..100_000)
                .prop_map(|(f, t, c)| Op::Transfer(f, t, c)),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: after any sequence of commands, accepted or not, no
        /// balance is negative and rejected commands leave state untouched.
        #[test]
        fn balances_never_go_negative(ops in prop::collection::vec(op_strategy(), 1..40)) {
            let mut ledger = opened_ledger("Michael");

            for op in ops {
                let cmd = match op {
                    Op::Deposit(a, c) => deposit(&ledger, a, Money::from_cents(c)),
                    Op::Withdraw(a, c) => withdraw(&ledger, a, Money::from_cents(c)),
                    Op::Transfer(f, t, c) => transfer(&ledger, f, t, Money::from_cents(c)),
                };
                let before = ledger.clone();
                if ledger.execute(&cmd).is_err() {
                    prop_assert_eq!(&ledger, &before);
                }
                for (_, balance) in ledger.balances() {
                    prop_assert!(!balance.is_negative());
                }
            }
        }

        /// Property: an accepted deposit changes exactly one balance by
        /// exactly the deposited amount.
        #[test]
        fn deposit_touches_only_its_account(
            account in account_strategy(),
            cents in 1i64..1_000_000_000,
        ) {
            let mut ledger = opened_ledger("Michael");
            let before = ledger.clone();
            ledger.execute(&deposit(&ledger, account, Money::from_cents(cents))).unwrap();

            for (other, balance) in ledger.balances() {
                let expected = if other == account {
                    before.balance(other).checked_add(Money::from_cents(cents)).unwrap()
                } else {
                    before.balance(other)
                };
                prop_assert_eq!(balance, expected);
            }
        }

        /// Property: a covered withdrawal lowers exactly one balance by
        /// exactly the amount; an uncovered one is refused and changes
        /// nothing.
        #[test]
        fn withdraw_touches_only_its_account(
            account in account_strategy(),
            funded in 0i64..1_000_000,
            requested in 1i64..2_000_000,
        ) {
            let mut ledger = opened_ledger("Michael");
            if funded > 0 {
                ledger.execute(&deposit(&ledger, account, Money::from_cents(funded))).unwrap();
            }
            let before = ledger.clone();

            let result = ledger.execute(&withdraw(&ledger, account, Money::from_cents(requested)));

            if requested <= funded {
                prop_assert!(result.is_ok());
                for (other, balance) in ledger.balances() {
                    let expected = if other == account {
                        Money::from_cents(funded - requested)
                    } else {
                        before.balance(other)
                    };
                    prop_assert_eq!(balance, expected);
                }
            } else {
                let is_insufficient =
                    matches!(result, Err(LedgerError::InsufficientFunds { .. }));
                prop_assert!(is_insufficient);
                prop_assert_eq!(&ledger, &before);
            }
        }
    }
}
