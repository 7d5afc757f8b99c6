//! Transaction CLI commands

use chrono::{Datelike, Local};
use clap::Subcommand;

use crate::display::transaction::{
    format_paid_list, format_pending_list, format_transaction_details, format_transaction_register,
};
use crate::error::{FinanceError, FinanceResult};
use crate::models::date::{self, local_date};
use crate::models::{Transaction, TransactionDraft, TransactionKind, TransactionStatus};
use crate::services::aggregate::{net_paid_total, scheduled_for_month, sort_paid, sort_pending};
use crate::services::calendar::MonthCursor;
use crate::services::{AccountService, TransactionFilter, TransactionService};

use super::{parse_amount, parse_local_date, CliContext};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Add a new transaction
    Add {
        /// Account name or ID
        account: String,
        /// Amount, e.g. "40.50"
        amount: String,
        /// Record income instead of an expense
        #[arg(short, long)]
        income: bool,
        /// Category label
        #[arg(short, long)]
        category: Option<String>,
        /// Free-text note
        #[arg(short, long)]
        note: Option<String>,
        /// Occurrence date (YYYY-MM-DD), defaults to now
        #[arg(short, long)]
        date: Option<String>,
        /// Due date (YYYY-MM-DD); an expense with a due date is scheduled
        #[arg(long)]
        due: Option<String>,
        /// Record as already paid even with a due date
        #[arg(long)]
        paid: bool,
    },
    /// List transactions
    List {
        /// Filter by account name or ID
        #[arg(short, long)]
        account: Option<String>,
        /// Filter by type (income, expense)
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// Filter by status (paid, scheduled, overdue)
        #[arg(short, long)]
        status: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Show transaction details
    Show {
        /// Transaction ID
        id: String,
    },
    /// Scheduled expenses due in a month
    Pending {
        /// Month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
    },
    /// Paid transactions, most recent first
    Paid {
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Mark a transaction as paid
    Pay {
        /// Transaction ID
        id: String,
    },
    /// Move a paid transaction back to scheduled
    Unpay {
        /// Transaction ID
        id: String,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    ctx: &CliContext<'_>,
    cmd: TransactionCommands,
) -> FinanceResult<()> {
    let service = TransactionService::new(ctx.storage, ctx.owner);
    let accounts = AccountService::new(ctx.storage, ctx.owner);
    let display = ctx.display();
    let now = date::now();

    match cmd {
        TransactionCommands::Add {
            account,
            amount,
            income,
            category,
            note,
            date: occurred,
            due,
            paid,
        } => {
            let account = accounts.require(&account)?;
            let amount = parse_amount(&amount)?;
            let kind = if income {
                TransactionKind::Income
            } else {
                TransactionKind::Expense
            };

            let mut draft = TransactionDraft::new(account.id, kind, amount);
            if let Some(category) = category {
                draft = draft.category(category);
            }
            if let Some(note) = note {
                draft = draft.note(note);
            }
            if let Some(occurred) = occurred {
                draft = draft.date(parse_local_date(&occurred)?);
            }
            if let Some(due) = due {
                draft = draft.due(parse_local_date(&due)?);
            }
            if paid {
                draft = draft.status(TransactionStatus::Paid);
            }

            let txn = service.create(draft, now)?;

            println!("Created transaction: {}", txn.id);
            println!("  {} {} on {}", txn.kind, display.money(txn.amount), account.name);
            println!("  Status: {}", txn.effective_status(now));
        }

        TransactionCommands::List {
            account,
            kind,
            status,
            limit,
        } => {
            let mut filter = TransactionFilter::new().limit(limit);

            if let Some(account) = account {
                filter = filter.account(accounts.require(&account)?.id);
            }
            if let Some(kind) = kind {
                filter = filter.kind(TransactionKind::parse(&kind).ok_or_else(|| {
                    FinanceError::Validation(format!(
                        "Invalid type: '{}'. Valid types: income, expense",
                        kind
                    ))
                })?);
            }
            if let Some(status) = status {
                filter = filter.status(TransactionStatus::parse(&status).ok_or_else(|| {
                    FinanceError::Validation(format!(
                        "Invalid status: '{}'. Valid statuses: paid, scheduled, overdue",
                        status
                    ))
                })?);
            }

            let transactions = service.list(&filter, now)?;
            print!("{}", format_transaction_register(&transactions, &display, now));
        }

        TransactionCommands::Show { id } => {
            let txn = service.require(&id)?;
            let account_name = accounts.get(txn.account_id)?.map(|a| a.name);
            print!(
                "{}",
                format_transaction_details(&txn, account_name.as_deref(), &display, now)
            );
        }

        TransactionCommands::Pending { month } => {
            let month = match month {
                Some(raw) => raw.parse::<MonthCursor>().map_err(FinanceError::Validation)?,
                None => MonthCursor::containing(local_date(now, &Local)),
            };

            let transactions = service.list_all()?;
            let mut pending =
                scheduled_for_month(&transactions, month.year(), month.month0(), &Local);
            sort_pending(&mut pending);

            println!("Pending in {}", month.label());
            print!("{}", format_pending_list(&pending, &display, now));
        }

        TransactionCommands::Paid { limit } => {
            let transactions = service.list_all()?;
            let mut paid: Vec<&Transaction> =
                transactions.iter().filter(|t| t.status.is_paid()).collect();
            sort_paid(&mut paid);
            paid.truncate(limit);

            println!("Net paid: {}", display.money(net_paid_total(&transactions)));
            print!("{}", format_paid_list(&paid, &display));
        }

        TransactionCommands::Pay { id } => {
            let txn = service.mark_paid(&id, now)?;
            let local = local_date(now, &Local);
            println!(
                "Marked paid: {} ({}) on {:02}/{:02}",
                txn.label(),
                display.money(txn.amount),
                local.day(),
                local.month()
            );
        }

        TransactionCommands::Unpay { id } => {
            let txn = service.mark_unpaid(&id, now)?;
            println!("Moved back to scheduled: {} ({})", txn.label(), display.money(txn.amount));
        }
    }

    Ok(())
}
