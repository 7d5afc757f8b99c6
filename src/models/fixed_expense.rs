//! Fixed expense model
//!
//! A fixed expense is a template for a recurring bill (rent, internet) used to
//! pre-fill a scheduled expense each month.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::ids::FixedExpenseId;
use super::money::{self, Money};

/// Suggested due days are clamped to this so every month has them
pub const MAX_SUGGESTED_DUE_DAY: u32 = 28;

/// A recurring bill template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedExpense {
    pub id: FixedExpenseId,

    #[serde(default, rename = "userId", skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,

    /// Bill name, e.g. "Internet"
    pub name: String,

    /// Day of month the bill is usually due (1-31)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_due_day: Option<u32>,

    /// Usual amount, if known
    #[serde(
        default,
        rename = "defaultAmountCents",
        deserialize_with = "money::deserialize_lenient_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_amount: Option<Money>,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,

    #[serde(default)]
    pub archived: bool,
}

impl FixedExpense {
    /// Create a new template stamped at `now`
    pub fn new(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: FixedExpenseId::new(),
            owner_id: None,
            name: name.into().trim().to_string(),
            default_due_day: None,
            default_amount: None,
            created_at: now,
            updated_at: now,
            archived: false,
        }
    }

    pub fn with_due_day(mut self, day: u32) -> Self {
        self.default_due_day = Some(day);
        self
    }

    pub fn with_amount(mut self, amount: Money) -> Self {
        self.default_amount = Some(amount);
        self
    }

    pub fn with_owner(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }

    /// Check whether this template belongs to `owner` (`None` matches everything)
    pub fn is_owned_by(&self, owner: Option<&str>) -> bool {
        owner.map_or(true, |o| self.owner_id.as_deref() == Some(o))
    }

    pub fn archive(&mut self, now: DateTime<Utc>) {
        self.archived = true;
        self.updated_at = now;
    }

    /// Suggested due date in the month of `today`.
    ///
    /// Uses the template's due day, or today's day when it has none, capped at
    /// the 28th so short months never roll over.
    pub fn suggested_due_date(&self, today: NaiveDate) -> NaiveDate {
        let day = self
            .default_due_day
            .unwrap_or_else(|| today.day())
            .clamp(1, MAX_SUGGESTED_DUE_DAY);
        today.with_day(day).unwrap_or(today)
    }

    /// Validate the template
    pub fn validate(&self) -> Result<(), FixedExpenseValidationError> {
        if self.name.trim().is_empty() {
            return Err(FixedExpenseValidationError::EmptyName);
        }

        if let Some(day) = self.default_due_day {
            if !(1..=31).contains(&day) {
                return Err(FixedExpenseValidationError::InvalidDueDay(day));
            }
        }

        if let Some(amount) = self.default_amount {
            if amount.is_negative() {
                return Err(FixedExpenseValidationError::NegativeAmount(amount));
            }
        }

        Ok(())
    }
}

impl fmt::Display for FixedExpense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(day) = self.default_due_day {
            write!(f, " (day {})", day)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixedExpenseValidationError {
    #[error("Fixed expense name cannot be empty")]
    EmptyName,
    #[error("Due day must be between 1 and 31, got {0}")]
    InvalidDueDay(u32),
    #[error("Default amount cannot be negative ({0})")]
    NegativeAmount(Money),
}
