//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod account;
pub mod fixed;
pub mod report;
pub mod transaction;

pub use account::{handle_account_command, AccountCommands};
pub use fixed::{handle_fixed_command, FixedCommands};
pub use report::{handle_calendar, handle_history, handle_stats, handle_summary};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::{DateTime, Local, Utc};

use crate::config::Settings;
use crate::display::DisplayContext;
use crate::error::{FinanceError, FinanceResult};
use crate::models::date::{local_midnight, parse_date_key};
use crate::models::Money;
use crate::storage::Storage;

/// Everything a command handler needs
pub struct CliContext<'a> {
    pub storage: &'a Storage,
    pub settings: &'a Settings,
    /// Owner the command acts for, `None` for every record
    pub owner: Option<&'a str>,
}

impl<'a> CliContext<'a> {
    pub fn new(storage: &'a Storage, settings: &'a Settings, owner: Option<&'a str>) -> Self {
        Self {
            storage,
            settings,
            owner,
        }
    }

    /// Formatting in the machine's local time zone
    pub fn display(&self) -> DisplayContext<Local> {
        DisplayContext::new(self.settings, Local)
    }
}

/// Parse an amount argument such as `40`, `40.50` or `R$ 40,50`
pub(crate) fn parse_amount(raw: &str) -> FinanceResult<Money> {
    let amount = Money::parse(raw).map_err(|e| {
        FinanceError::Validation(format!(
            "Invalid amount '{}': {}. Use a format like '40.50'",
            raw, e
        ))
    })?;

    if amount.is_negative() {
        return Err(FinanceError::Validation(format!(
            "Amount cannot be negative: '{}'",
            raw
        )));
    }

    Ok(amount)
}

/// Parse a `YYYY-MM-DD` argument as local midnight of that day
pub(crate) fn parse_local_date(raw: &str) -> FinanceResult<DateTime<Utc>> {
    let date = parse_date_key(raw).map_err(|_| {
        FinanceError::Validation(format!("Invalid date '{}'. Use YYYY-MM-DD", raw))
    })?;
    Ok(local_midnight(date, &Local))
}
