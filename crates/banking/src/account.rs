use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// One of the customer's fixed sub-accounts.
///
/// Declaration order is the statement order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SubAccount {
    Checking,
    College,
    Investing,
    Saving,
}

impl SubAccount {
    pub const COUNT: usize = 4;

    pub const ALL: [SubAccount; Self::COUNT] = [
        SubAccount::Checking,
        SubAccount::College,
        SubAccount::Investing,
        SubAccount::Saving,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SubAccount::Checking => "Checking",
            SubAccount::College => "College",
            SubAccount::Investing => "Investing",
            SubAccount::Saving => "Saving",
        }
    }

    /// Position in `ALL`; used to index balance storage.
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl core::fmt::Display for SubAccount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact, case-sensitive name match.
impl FromStr for SubAccount {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SubAccount::ALL
            .into_iter()
            .find(|account| account.as_str() == s)
            .ok_or_else(|| LedgerError::UnknownAccount(s.to_string()))
    }
}
