//! Display formatting for terminal output
//!
//! Plain-text tables and views for accounts, transactions, templates, the
//! summary screens and the month calendar.

pub mod account;
pub mod calendar;
pub mod fixed_expense;
pub mod summary;
pub mod transaction;

pub use account::format_account_list;
pub use calendar::format_month_grid;
pub use fixed_expense::format_fixed_expense_list;
pub use summary::{format_stats, format_summary, SummaryView};
pub use transaction::{
    format_paid_list, format_pending_list, format_transaction_details, format_transaction_register,
};

use chrono::{DateTime, TimeZone, Utc};

use crate::config::Settings;
use crate::models::Money;

/// How amounts and dates are rendered
#[derive(Debug, Clone)]
pub struct DisplayContext<Tz: TimeZone> {
    pub currency_symbol: String,
    pub date_format: String,
    pub tz: Tz,
}

impl<Tz: TimeZone> DisplayContext<Tz> {
    pub fn new(settings: &Settings, tz: Tz) -> Self {
        Self {
            currency_symbol: settings.currency_symbol.clone(),
            date_format: settings.date_format.clone(),
            tz,
        }
    }

    pub fn money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }

    /// A timestamp's local date in the configured format
    pub fn date(&self, ts: DateTime<Utc>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        ts.with_timezone(&self.tz).format(&self.date_format).to_string()
    }
}

/// Truncate to `max_len` characters, ending with "..." when cut
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
pub(crate) fn test_context() -> DisplayContext<chrono::FixedOffset> {
    DisplayContext::new(
        &Settings::default(),
        chrono::FixedOffset::west_opt(3 * 3600).unwrap(),
    )
}
