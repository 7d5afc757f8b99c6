//! Account display formatting

use chrono::TimeZone;

use crate::models::Money;
use crate::services::account::AccountBalance;

use super::DisplayContext;

/// Format accounts with balances as a table, with a total row
pub fn format_account_list<Tz: TimeZone>(
    balances: &[AccountBalance],
    ctx: &DisplayContext<Tz>,
) -> String {
    if balances.is_empty() {
        return "No accounts found.\n".to_string();
    }

    let name_width = balances
        .iter()
        .map(|b| b.account.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(5);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<8}  {:>14}  {}\n",
        "Name", "Type", "Balance", "ID",
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:-<8}  {:->14}  {:-<12}\n",
        "", "", "", "",
    ));

    for entry in balances {
        output.push_str(&format!(
            "{:<name_width$}  {:<8}  {:>14}  {}\n",
            entry.account.name,
            entry.account.account_type,
            ctx.money(entry.balance),
            entry.account.id,
        ));
    }

    let total: Money = balances.iter().map(|b| b.balance).sum();
    output.push_str(&format!(
        "{:<name_width$}  {:<8}  {:>14}\n",
        "Total",
        "",
        ctx.money(total),
    ));

    output
}
