//! Fixed expense template display

use chrono::TimeZone;

use crate::models::FixedExpense;

use super::{truncate, DisplayContext};

/// Format templates as a table
pub fn format_fixed_expense_list<Tz: TimeZone>(
    items: &[FixedExpense],
    ctx: &DisplayContext<Tz>,
) -> String {
    if items.is_empty() {
        return "No fixed expenses found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:12} {:24} {:>7} {:>14}\n",
        "ID", "Name", "Due day", "Amount"
    ));
    output.push_str(&"-".repeat(60));
    output.push('\n');

    for item in items {
        let due = item
            .default_due_day
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        let amount = item
            .default_amount
            .map(|a| ctx.money(a))
            .unwrap_or_else(|| "-".to_string());
        let name = if item.archived {
            format!("{} (archived)", item.name)
        } else {
            item.name.clone()
        };

        output.push_str(&format!(
            "{:12} {:24} {:>7} {:>14}\n",
            item.id.to_string(),
            truncate(&name, 24),
            due,
            amount,
        ));
    }

    output
}
