//! Fixed expense CLI commands

use chrono::Local;
use clap::Subcommand;

use crate::display::fixed_expense::format_fixed_expense_list;
use crate::error::{FinanceError, FinanceResult};
use crate::models::date::{self, local_date, local_midnight};
use crate::services::calendar::MonthCursor;
use crate::services::{AccountService, FixedExpenseService, Registration};

use super::{parse_amount, parse_local_date, CliContext};

/// Fixed expense subcommands
#[derive(Subcommand)]
pub enum FixedCommands {
    /// Add a recurring bill template
    Add {
        /// Template name (e.g., "Rent")
        name: String,
        /// Default day of month the bill is due (1-31)
        #[arg(short, long)]
        day: Option<u32>,
        /// Default amount
        #[arg(short, long)]
        amount: Option<String>,
    },
    /// List templates
    List {
        /// Include archived templates
        #[arg(short, long)]
        all: bool,
    },
    /// Delete a template
    Delete {
        /// Template name or ID
        template: String,
    },
    /// Archive a template so it no longer shows by default
    Archive {
        /// Template name or ID
        template: String,
    },
    /// Register this month's bills from one or more templates
    Register {
        /// Template names or IDs
        #[arg(required = true)]
        templates: Vec<String>,
        /// Account the bills are paid from
        #[arg(short, long)]
        account: String,
        /// Amount for every listed bill, defaults to each template's amount
        #[arg(long)]
        amount: Option<String>,
        /// Due date (YYYY-MM-DD), defaults to each template's day this month
        #[arg(long)]
        due: Option<String>,
    },
}

/// Handle a fixed expense command
pub fn handle_fixed_command(ctx: &CliContext<'_>, cmd: FixedCommands) -> FinanceResult<()> {
    let service = FixedExpenseService::new(ctx.storage, ctx.owner);
    let display = ctx.display();
    let now = date::now();

    match cmd {
        FixedCommands::Add { name, day, amount } => {
            let amount = amount.as_deref().map(parse_amount).transpose()?;
            let item = service.create(&name, day, amount, now)?;

            println!("Created fixed expense: {}", item.name);
            if let Some(day) = item.default_due_day {
                println!("  Due day: {}", day);
            }
            if let Some(amount) = item.default_amount {
                println!("  Amount:  {}", display.money(amount));
            }
        }

        FixedCommands::List { all } => {
            let items = service.list(all)?;
            print!("{}", format_fixed_expense_list(&items, &display));
        }

        FixedCommands::Delete { template } => {
            let removed = service.delete(&template)?;
            println!("Deleted fixed expense: {}", removed.name);
        }

        FixedCommands::Archive { template } => {
            let item = service.archive(&template, now)?;
            println!("Archived fixed expense: {}", item.name);
        }

        FixedCommands::Register {
            templates,
            account,
            amount,
            due,
        } => {
            let account = AccountService::new(ctx.storage, ctx.owner).require(&account)?;
            let amount = amount.as_deref().map(parse_amount).transpose()?;
            let due = due.as_deref().map(parse_local_date).transpose()?;
            let today = local_date(now, &Local);

            let mut registrations = Vec::with_capacity(templates.len());
            for template in &templates {
                let item = service.require(template)?;
                let amount = match amount.or(item.default_amount) {
                    Some(amount) => amount,
                    None => {
                        return Err(FinanceError::Validation(format!(
                            "Fixed expense '{}' has no default amount; pass --amount",
                            item.name
                        )))
                    }
                };
                let due = due.unwrap_or_else(|| {
                    let day = service.suggested_due_date(&item, MonthCursor::containing(today), today);
                    local_midnight(day, &Local)
                });

                registrations.push(Registration {
                    identifier: item.id.to_string(),
                    amount,
                    due,
                });
            }

            let summary = service.register_batch(account.id, &registrations, now)?;

            for txn in &summary.transactions {
                let due = txn.due_date.map(|d| display.date(d)).unwrap_or_default();
                println!(
                    "Registered {} ({}) on {}, due {}",
                    txn.label(),
                    display.money(txn.amount),
                    account.name,
                    due
                );
            }
            if summary.count() > 1 {
                println!("Total: {}", display.money(summary.total));
            }
        }
    }

    Ok(())
}
