use crate::error::{PayrollError, Result};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Seconds since an arbitrary epoch chosen by the host's `TimeSource`.
pub type Timestamp = u64;

/// An unsigned amount in the smallest unit of some asset.
pub type Amount = u128;

/// Fixed-point scale of exchange rates: a rate of `RATE_SCALE` means 1:1.
pub const RATE_SCALE: u128 = 1_000_000_000_000_000_000;

/// 365.25 days.
pub const SECONDS_PER_YEAR: u128 = 31_557_600;

/// Identifier of a settlement asset (a token contract, a ticker, ...).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AssetId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Settlement account of an employee. The empty string is the null account.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_null(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Exchange rate in quote units per base unit, scaled by `RATE_SCALE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Rate(pub u128);

impl Rate {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(RATE_SCALE);

    pub fn new(scaled: u128) -> Self {
        Self(scaled)
    }

    /// Builds a rate from a human-readable decimal such as `0.05`.
    /// Digits beyond the 18th decimal place are truncated.
    pub fn from_decimal(value: Decimal) -> Result<Self> {
        if value.is_sign_negative() {
            return Err(PayrollError::Validation(format!(
                "Exchange rate must not be negative: {value}"
            )));
        }
        let scaled = value
            .checked_mul(Decimal::from(RATE_SCALE as u64))
            .ok_or(PayrollError::ArithmeticOverflow)?;
        scaled
            .trunc()
            .to_u128()
            .map(Self)
            .ok_or(PayrollError::ArithmeticOverflow)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Converts a base-asset amount into the quote asset, rounding down.
    pub fn convert(&self, amount: Amount) -> Result<Amount> {
        mul_div(amount, self.0, RATE_SCALE).ok_or(PayrollError::ArithmeticOverflow)
    }
}

/// Computes `floor(a * b / d)` without overflowing on the intermediate product.
///
/// Both factors are split around `d`, so the only products formed are bounded
/// by the result itself or by `d * d`. Returns `None` when the result does not
/// fit, or `d` is zero, or `d * d` does not fit.
pub fn mul_div(a: u128, b: u128, d: u128) -> Option<u128> {
    if d == 0 {
        return None;
    }
    d.checked_mul(d)?;
    let (qa, ra) = (a / d, a % d);
    let (qb, rb) = (b / d, b % d);
    qa.checked_mul(qb)?
        .checked_mul(d)?
        .checked_add(qa.checked_mul(rb)?)?
        .checked_add(ra.checked_mul(qb)?)?
        .checked_add(ra * rb / d)
}

/// Per-second rate of an annual salary expressed with `decimals` decimal places.
pub fn annual_salary_per_second(annual: u128, decimals: u32) -> Result<Amount> {
    10u128
        .checked_pow(decimals)
        .and_then(|unit| annual.checked_mul(unit))
        .map(|total| total / SECONDS_PER_YEAR)
        .ok_or(PayrollError::ArithmeticOverflow)
}
