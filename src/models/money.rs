//! Integer-cent money amounts
//!
//! Stored transaction amounts are never negative: the transaction's direction
//! carries the sign. Balances and totals derived from them can be.
//! Arithmetic saturates at the `i64` bounds instead of overflowing.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub};
use thiserror::Error;

/// Largest amount read back from a stored document; anything above is 0
pub const MAX_STORED_CENTS: i64 = 1_000_000_000_000_000;

/// An amount in cents
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyParseError {
    #[error("no amount given")]
    Empty,
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("'{0}' has more than two decimal places")]
    TooPrecise(String),
}

impl Money {
    /// ```
    /// use fintrack::models::Money;
    /// assert_eq!(Money::from_cents(1050).to_string(), "10.50");
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn cents(&self) -> i64 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Parse what a user types for an amount: `40`, `40.5`, `40,50`,
    /// `$40.50` or `R$ 40,50`. Comma and dot are both decimal separators.
    pub fn parse(input: &str) -> Result<Self, MoneyParseError> {
        let trimmed = input.trim();
        let (sign, rest) = match trimmed.strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => (1, trimmed),
        };
        let body = ["R$", "$"]
            .iter()
            .find_map(|symbol| rest.strip_prefix(symbol))
            .unwrap_or(rest)
            .trim();

        if body.is_empty() {
            return Err(MoneyParseError::Empty);
        }

        let not_a_number = || MoneyParseError::NotANumber(input.trim().to_string());
        let (whole, frac) = match body.split_once(|c: char| c == ',' || c == '.') {
            Some((whole, frac)) => (whole, frac),
            None => (body, ""),
        };

        let digits_only = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        if !digits_only(whole) || !digits_only(frac) || (whole.is_empty() && frac.is_empty()) {
            return Err(not_a_number());
        }
        if frac.len() > 2 {
            return Err(MoneyParseError::TooPrecise(input.trim().to_string()));
        }

        let units: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| not_a_number())?
        };
        let cents: i64 = format!("{:0<2}", frac).parse().map_err(|_| not_a_number())?;

        units
            .checked_mul(100)
            .and_then(|u| u.checked_add(cents))
            .map(|total| Self(sign * total))
            .ok_or_else(not_a_number)
    }

    /// `R$12.50`, `-R$3.00`
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{}{}{}.{:02}", sign, symbol, abs / 100, abs % 100)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with_symbol(""))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |total, m| total + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Cents from a stored JSON value; anything malformed, negative or above
/// [`MAX_STORED_CENTS`] is 0.
///
/// Old documents hold integers, floats or numeric strings.
pub fn lenient_cents(value: &Value) -> i64 {
    let rounded = |f: f64| {
        (f.is_finite() && f.abs() <= MAX_STORED_CENTS as f64).then(|| f.round() as i64)
    };

    let cents = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(rounded)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| s.parse().ok().and_then(rounded))
        }
        _ => None,
    };

    cents
        .filter(|c| (0..=MAX_STORED_CENTS).contains(c))
        .unwrap_or(0)
}

/// `deserialize_with` for a required amount
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Money, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(Money(lenient_cents(&value)))
}

/// `deserialize_with` for an optional amount; pair with `#[serde(default)]`
pub fn deserialize_lenient_opt<'de, D>(deserializer: D) -> Result<Option<Money>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok((!value.is_null()).then(|| Money(lenient_cents(&value))))
}
