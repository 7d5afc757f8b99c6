//! Summary, statistics, calendar and history commands

use chrono::Local;

use crate::display::calendar::format_month_grid;
use crate::display::summary::{format_stats, format_summary, SummaryView};
use crate::error::{FinanceError, FinanceResult};
use crate::models::date::{self, local_date, parse_date_key};
use crate::services::aggregate::{
    aggregate, category_shares, expense_period_totals, scheduled_for_month, sort_pending,
};
use crate::services::calendar::{
    build_month_grid, marked_dates_for_month, unpaid_due_dates, MonthCursor,
};
use crate::services::{AccountService, TransactionService};

use super::CliContext;

/// Balances, paid totals and this month's pending bills
pub fn handle_summary(ctx: &CliContext<'_>) -> FinanceResult<()> {
    let now = date::now();
    let accounts = AccountService::new(ctx.storage, ctx.owner).list()?;
    let transactions = TransactionService::new(ctx.storage, ctx.owner).list_all()?;

    let summary = aggregate(&accounts, &transactions);
    let month = MonthCursor::containing(local_date(now, &Local));
    let mut pending = scheduled_for_month(&transactions, month.year(), month.month0(), &Local);
    sort_pending(&mut pending);

    let view = SummaryView {
        summary: &summary,
        accounts: &accounts,
        pending: &pending,
        month,
        hide_cash: ctx.settings.hide_cash_in_summary,
    };
    print!("{}", format_summary(&view, &ctx.display(), now));

    Ok(())
}

/// Spending by period and by category
pub fn handle_stats(ctx: &CliContext<'_>) -> FinanceResult<()> {
    let now = date::now();
    let accounts = AccountService::new(ctx.storage, ctx.owner).list()?;
    let transactions = TransactionService::new(ctx.storage, ctx.owner).list_all()?;

    let summary = aggregate(&accounts, &transactions);
    let periods = expense_period_totals(&transactions, now, &Local);
    let shares = category_shares(&summary.expense_by_category);

    print!("{}", format_stats(&summary, &periods, &shares, &ctx.display()));

    Ok(())
}

/// Month grid with the due dates of unpaid bills marked.
///
/// `shift` pages that many months forward (negative: back) from the month
/// picked by `--month`, the selected day or today.
pub fn handle_calendar(
    ctx: &CliContext<'_>,
    month: Option<String>,
    select: Option<String>,
    shift: i32,
) -> FinanceResult<()> {
    let today = local_date(date::now(), &Local);

    let selected = match select {
        Some(raw) => Some(parse_date_key(&raw).map_err(|_| {
            FinanceError::Validation(format!("Invalid date '{}'. Use YYYY-MM-DD", raw))
        })?),
        None => None,
    };

    let month = match (month, selected) {
        (Some(raw), _) => raw.parse::<MonthCursor>().map_err(FinanceError::Validation)?,
        (None, Some(day)) => MonthCursor::containing(day),
        (None, None) => MonthCursor::containing(today),
    };
    let month = (0..shift.unsigned_abs()).fold(month, |m, _| {
        if shift < 0 {
            m.previous()
        } else {
            m.next()
        }
    });

    let transactions = TransactionService::new(ctx.storage, ctx.owner).list_all()?;
    let marked = marked_dates_for_month(unpaid_due_dates(&transactions), month, &Local);
    let weeks = build_month_grid(month, &marked, selected);

    print!("{}", format_month_grid(month, &weeks));

    Ok(())
}

/// Most recent audit log entries, newest last
pub fn handle_history(ctx: &CliContext<'_>, limit: usize) -> FinanceResult<()> {
    let entries = ctx.storage.audit_logger().read_recent(limit)?;

    if entries.is_empty() {
        println!("No history recorded yet.");
        return Ok(());
    }

    for entry in entries {
        println!("{}", entry.format_human_readable());
    }

    Ok(())
}
