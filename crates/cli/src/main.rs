//! Fixed demonstration script for one customer's ledger.
//!
//! Confirmations go to stdout, rejections to stderr, logs (via tracing) to
//! stderr as well.

use anyhow::Context;

use subledger_banking::{Bank, BankConfig, LedgerError, Receipt, TransferOutcome};
use subledger_core::Money;

const OWNER_VAR: &str = "BANK_OWNER";
const STATEMENT_FORMAT_VAR: &str = "BANK_STATEMENT_FORMAT";

/// One line of the demo script; amounts are decimal text.
enum Step {
    Deposit(&'static str, &'static str),
    Withdraw(&'static str, &'static str),
    Transfer(&'static str, &'static str, &'static str),
    Balance(&'static str),
}

const SCRIPT: &[Step] = &[
    Step::Deposit("Checking", "500"),
    Step::Deposit("Saving", "200"),
    Step::Withdraw("College", "50"),
    Step::Transfer("Checking", "Investing", "150"),
    Step::Balance("Checking"),
];

fn main() -> anyhow::Result<()> {
    subledger_observability::init();

    let owner = std::env::var(OWNER_VAR).unwrap_or_else(|_| "Michael".to_string());
    let json_statement = std::env::var(STATEMENT_FORMAT_VAR)
        .map(|v| v.trim().eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let mut bank = Bank::open_with_config(owner, BankConfig::from_env())
        .context("failed to open ledger")?;

    for step in SCRIPT {
        match *step {
            Step::Deposit(account, amount) => {
                report(bank.deposit(account, parse_amount(amount)?))
            }
            Step::Withdraw(account, amount) => {
                report(bank.withdraw(account, parse_amount(amount)?))
            }
            Step::Transfer(from, to, amount) => {
                let amount = parse_amount(amount)?;
                println!("Transferring {amount} from {from} to {to}…");
                report_transfer(bank.transfer(from, to, amount));
            }
            Step::Balance(account) => match bank.balance(account) {
                Ok(balance) => println!("{account} balance: {}", balance.to_decimal()),
                Err(err) => eprintln!("{err}"),
            },
        }
    }

    let statement = bank.statement();
    if json_statement {
        println!(
            "{}",
            serde_json::to_string_pretty(&statement).context("failed to encode statement")?
        );
    } else {
        print!("{statement}");
    }

    tracing::info!(ledger_id = %bank.id(), "demo script finished");
    Ok(())
}

fn parse_amount(text: &str) -> anyhow::Result<Money> {
    text.parse::<Money>()
        .with_context(|| format!("invalid amount in demo script: {text}"))
}

fn report(result: Result<Receipt, LedgerError>) {
    match result {
        Ok(receipt) => println!("{receipt}"),
        Err(err) => eprintln!("{err}"),
    }
}

fn report_transfer(outcome: TransferOutcome) {
    match outcome {
        TransferOutcome::Completed {
            withdrawal,
            deposit,
        } => {
            report(Ok(withdrawal));
            report(Ok(deposit));
        }
        TransferOutcome::Rejected(err) => report(Err(err)),
        TransferOutcome::Partial {
            withdrawal,
            deposit,
        } => {
            report(withdrawal);
            report(deposit);
        }
    }
}
