//! Transaction display formatting
//!
//! Register view for listings, the pending and paid lists of the home screen,
//! and a detail view.

use chrono::{DateTime, TimeZone, Utc};

use crate::models::{Money, Transaction, TransactionStatus};

use super::{truncate, DisplayContext};

fn status_icon(status: TransactionStatus) -> &'static str {
    match status {
        TransactionStatus::Paid => "✓",
        TransactionStatus::Scheduled => "◷",
        TransactionStatus::Overdue => "!",
    }
}

/// Format a list of transactions as a register
pub fn format_transaction_register<Tz>(
    transactions: &[Transaction],
    ctx: &DisplayContext<Tz>,
    now: DateTime<Utc>,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:2} {:12} {:12} {:24} {:14} {:>14}\n",
        "St", "ID", "Date", "Description", "Category", "Amount"
    ));
    output.push_str(&"-".repeat(83));
    output.push('\n');

    for txn in transactions {
        output.push_str(&format!(
            "{:2} {:12} {:12} {:24} {:14} {:>14}\n",
            status_icon(txn.effective_status(now)),
            txn.id.to_string(),
            ctx.date(txn.date),
            truncate(txn.label(), 24),
            truncate(&txn.category, 14),
            ctx.money(txn.signed_amount()),
        ));
    }

    output
}

/// Pending bills, one per line, flagged when past due
pub fn format_pending_list<Tz>(
    items: &[&Transaction],
    ctx: &DisplayContext<Tz>,
    now: DateTime<Utc>,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    if items.is_empty() {
        return "No pending bills.\n".to_string();
    }

    let mut output = String::new();
    for txn in items {
        let due = txn.due_date.map(|d| ctx.date(d)).unwrap_or_default();
        let flag = if txn.is_overdue(now) { " (overdue)" } else { "" };
        output.push_str(&format!(
            "  {} {:24} due {:10} {:>14}{}\n",
            txn.id,
            truncate(txn.label(), 24),
            due,
            ctx.money(txn.amount),
            flag,
        ));
    }

    let total: Money = items.iter().map(|t| t.amount).sum();
    output.push_str(&format!("  Total pending: {}\n", ctx.money(total)));
    output
}

/// Paid bills with their payment date
pub fn format_paid_list<Tz>(items: &[&Transaction], ctx: &DisplayContext<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    if items.is_empty() {
        return "No paid transactions.\n".to_string();
    }

    let mut output = String::new();
    for txn in items {
        let paid_on = ctx.date(txn.paid_at.unwrap_or(txn.date));
        output.push_str(&format!(
            "  {} {:24} paid {:10} {:>14}\n",
            txn.id,
            truncate(txn.label(), 24),
            paid_on,
            ctx.money(txn.signed_amount()),
        ));
    }
    output
}

/// Format transaction details for display
pub fn format_transaction_details<Tz>(
    txn: &Transaction,
    account_name: Option<&str>,
    ctx: &DisplayContext<Tz>,
    now: DateTime<Utc>,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!(
        "Account:     {}\n",
        account_name.map_or_else(|| txn.account_id.to_string(), str::to_string)
    ));
    output.push_str(&format!("Type:        {}\n", txn.kind));
    output.push_str(&format!("Amount:      {}\n", ctx.money(txn.amount)));
    output.push_str(&format!("Category:    {}\n", txn.category));

    if let Some(note) = &txn.note {
        output.push_str(&format!("Note:        {}\n", note));
    }

    output.push_str(&format!("Date:        {}\n", ctx.date(txn.date)));

    if let Some(due) = txn.due_date {
        output.push_str(&format!("Due:         {}\n", ctx.date(due)));
    }

    output.push_str(&format!("Status:      {}\n", txn.effective_status(now)));

    if let Some(paid_at) = txn.paid_at {
        output.push_str(&format!("Paid:        {}\n", ctx.date(paid_at)));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::test_context;
    use crate::models::{AccountId, TransactionDraft};
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 15, 0, 0).unwrap()
    }

    fn bill(note: &str, due: DateTime<Utc>) -> Transaction {
        TransactionDraft::expense(AccountId::new(), Money::from_cents(4000))
            .note(note)
            .due(due)
            .build(now() - Duration::days(10))
            .unwrap()
    }

    #[test]
    fn test_register_shows_effective_status() {
        let late = bill("Internet", now() - Duration::days(1));
        let output = format_transaction_register(&[late], &test_context(), now());

        let row = output.lines().nth(2).unwrap();
        assert!(row.starts_with('!'));
        assert!(row.contains("Internet"));
        assert!(row.contains("-R$40.00"));
    }

    #[test]
    fn test_pending_list_flags_overdue_and_totals() {
        let late = bill("Internet", now() - Duration::days(1));
        let upcoming = bill("Rent", now() + Duration::days(3));

        let output = format_pending_list(&[&late, &upcoming], &test_context(), now());
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].contains("(overdue)"));
        assert!(!lines[1].contains("(overdue)"));
        assert!(lines[2].contains("R$80.00"));
    }

    #[test]
    fn test_paid_list_uses_paid_date() {
        let mut paid = bill("Water", now());
        paid.mark_paid(Utc.with_ymd_and_hms(2024, 3, 8, 15, 0, 0).unwrap());

        let output = format_paid_list(&[&paid], &test_context());
        assert!(output.contains("paid 08/03/2024"));
    }

    #[test]
    fn test_details() {
        let txn = bill("Internet", now() + Duration::days(2));
        let output = format_transaction_details(&txn, Some("Card"), &test_context(), now());

        assert!(output.contains("Account:     Card"));
        assert!(output.contains("Note:        Internet"));
        assert!(output.contains("Status:      Scheduled"));
        assert!(!output.contains("Paid:"));
    }
}
