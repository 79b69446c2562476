//! Fixed-point monetary amounts.

use core::str::FromStr;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

const CENTS_PER_UNIT: i64 = 100;
const MINOR_DIGITS: u32 = 2;

/// Amount of money in the smallest currency unit (cents).
///
/// Signed on purpose: callers may hand in a non-positive amount, and the
/// domain has to be able to represent it in order to reject it.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl ValueObject for Money {}

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Whole currency units, e.g. `from_major(500)` is `$500.00`.
    pub fn from_major(units: i64) -> DomainResult<Self> {
        units
            .checked_mul(CENTS_PER_UNIT)
            .map(Self)
            .ok_or(DomainError::Overflow)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    /// The amount in currency units with trailing zeros dropped
    /// (`$350.00` is `350`, `$12.50` is `12.5`).
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, MINOR_DIGITS).normalize()
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, other: Money) -> DomainResult<Money> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or(DomainError::Overflow)
    }

    pub fn checked_sub(self, other: Money) -> DomainResult<Money> {
        self.0
            .checked_sub(other.0)
            .map(Money)
            .ok_or(DomainError::Overflow)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per_unit = CENTS_PER_UNIT as u64;
        write!(f, "{sign}${}.{:02}", abs / per_unit, abs % per_unit)
    }
}

/// Parses decimal text such as `"500"`, `"12.5"` or `"-3.25"`.
///
/// Amounts finer than a cent are rejected rather than rounded.
impl FromStr for Money {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim())
            .map_err(|e| DomainError::invalid_amount(format!("'{s}': {e}")))?
            .normalize();

        if decimal.scale() > MINOR_DIGITS {
            return Err(DomainError::invalid_amount(format!(
                "'{s}' has more than {MINOR_DIGITS} fractional digits"
            )));
        }

        decimal
            .checked_mul(Decimal::from(CENTS_PER_UNIT))
            .and_then(|cents| cents.to_i64())
            .map(Money)
            .ok_or(DomainError::Overflow)
    }
}
