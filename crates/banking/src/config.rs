//! Ledger behaviour settings, read from the environment.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use subledger_core::DomainError;

/// How `Bank::transfer` combines its withdrawal and deposit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferMode {
    /// Validate everything first; apply both legs or neither.
    #[default]
    Atomic,
    /// Withdraw, then deposit, as two independent operations. The deposit is
    /// attempted even if the withdrawal was rejected.
    Sequential,
}

impl FromStr for TransferMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "atomic" => Ok(TransferMode::Atomic),
            "sequential" => Ok(TransferMode::Sequential),
            other => Err(DomainError::validation(format!(
                "unknown transfer mode '{other}' (expected 'atomic' or 'sequential')"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankConfig {
    pub transfer_mode: TransferMode,
}

impl BankConfig {
    pub const TRANSFER_MODE_VAR: &'static str = "BANK_TRANSFER_MODE";

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    ///
    /// Invalid values are logged and replaced by the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let transfer_mode = match lookup(Self::TRANSFER_MODE_VAR) {
            None => TransferMode::default(),
            Some(raw) => raw.parse::<TransferMode>().unwrap_or_else(|err| {
                tracing::warn!(
                    "{} is invalid ({err}); using {:?}",
                    Self::TRANSFER_MODE_VAR,
                    TransferMode::default()
                );
                TransferMode::default()
            }),
        };

        Self { transfer_mode }
    }

    pub fn with_transfer_mode(mut self, transfer_mode: TransferMode) -> Self {
        self.transfer_mode = transfer_mode;
        self
    }
}
