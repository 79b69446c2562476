use serde::Serialize;

use subledger_core::Money;

use crate::account::SubAccount;
use crate::ledger::Ledger;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatementLine {
    pub account: SubAccount,
    pub balance: Money,
}

/// Point-in-time listing of every sub-account balance, in account order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statement {
    pub owner: String,
    pub lines: Vec<StatementLine>,
}

impl Statement {
    pub fn of(ledger: &Ledger) -> Self {
        Self {
            owner: ledger.owner().to_string(),
            lines: ledger
                .balances()
                .map(|(account, balance)| StatementLine { account, balance })
                .collect(),
        }
    }
}

/// Console layout: leading blank line, header, one bullet per account,
/// trailing blank line.
impl core::fmt::Display for Statement {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f)?;
        writeln!(f, "Account statement for {}:", self.owner)?;
        for line in &self.lines {
            writeln!(f, "  • {}: {}", line.account, line.balance)?;
        }
        writeln!(f)
    }
}
