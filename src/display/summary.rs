//! Home summary and statistics views

use chrono::{DateTime, TimeZone, Utc};

use crate::models::{Account, Money, Transaction};
use crate::services::aggregate::{BalanceSummary, CategoryShare, PeriodTotals};
use crate::services::calendar::MonthCursor;

use super::transaction::format_pending_list;
use super::{truncate, DisplayContext};

const BAR_WIDTH: usize = 20;

/// Inputs for the home summary
pub struct SummaryView<'a> {
    pub summary: &'a BalanceSummary,
    pub accounts: &'a [Account],
    pub pending: &'a [&'a Transaction],
    pub month: MonthCursor,
    /// Leave accounts named "cash" out of the account list
    pub hide_cash: bool,
}

/// Balance overview, paid totals, accounts and this month's pending bills
pub fn format_summary<Tz>(view: &SummaryView<'_>, ctx: &DisplayContext<Tz>, now: DateTime<Utc>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let summary = view.summary;
    let mut output = String::new();

    output.push_str(&format!("Total balance:   {:>14}\n", ctx.money(summary.total_balance)));
    output.push_str(&format!("Income (paid):   {:>14}\n", ctx.money(summary.paid_income_total)));
    output.push_str(&format!("Expenses (paid): {:>14}\n", ctx.money(-summary.paid_expense_total)));

    let shown: Vec<&Account> = view
        .accounts
        .iter()
        .filter(|a| !(view.hide_cash && a.name.trim().eq_ignore_ascii_case("cash")))
        .collect();

    if !shown.is_empty() {
        output.push_str("\nAccounts\n");
        for account in shown {
            output.push_str(&format!(
                "  {:<24} {:<8} {:>14}\n",
                truncate(&account.name, 24),
                account.account_type,
                ctx.money(summary.balance_of(account.id)),
            ));
        }
    }

    if summary.has_orphans() {
        let orphaned: Money = summary.orphaned.values().copied().sum();
        output.push_str(&format!(
            "\nNote: {} from transactions on unknown accounts is not included above.\n",
            ctx.money(orphaned)
        ));
    }

    output.push_str(&format!("\nPending in {}\n", view.month.label()));
    output.push_str(&format_pending_list(view.pending, ctx, now));

    output
}

/// Spending statistics: period totals and the category breakdown
pub fn format_stats<Tz: TimeZone>(
    summary: &BalanceSummary,
    periods: &PeriodTotals,
    shares: &[CategoryShare],
    ctx: &DisplayContext<Tz>,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Total balance:  {:>14}\n\n", ctx.money(summary.total_balance)));
    output.push_str("Spending\n");
    output.push_str(&format!("  Today:        {:>14}\n", ctx.money(periods.today)));
    output.push_str(&format!("  Last 7 days:  {:>14}\n", ctx.money(periods.week)));
    output.push_str(&format!("  This month:   {:>14}\n", ctx.money(periods.month)));

    output.push_str("\nBy category\n");
    if shares.is_empty() {
        output.push_str("  No expenses recorded.\n");
        return output;
    }

    for share in shares {
        let filled = (share.percent as usize * BAR_WIDTH).div_ceil(100).min(BAR_WIDTH);
        output.push_str(&format!(
            "  {:<16} {:>14} {:>4}% {}\n",
            truncate(&share.category, 16),
            ctx.money(share.total),
            share.percent,
            "█".repeat(filled),
        ));
    }

    output
}
