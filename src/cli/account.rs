//! Account CLI commands

use clap::Subcommand;

use crate::display::account::format_account_list;
use crate::error::{FinanceError, FinanceResult};
use crate::models::{AccountType, UnknownAccountType};
use crate::services::AccountService;

use super::CliContext;

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Create a new account
    Create {
        /// Account name
        name: String,
        /// Account type (cash, card, savings)
        #[arg(short = 't', long = "type", default_value = "cash")]
        account_type: String,
    },
    /// List accounts with their balances
    List,
}

/// Handle an account command
pub fn handle_account_command(ctx: &CliContext<'_>, cmd: AccountCommands) -> FinanceResult<()> {
    let service = AccountService::new(ctx.storage, ctx.owner);

    match cmd {
        AccountCommands::Create { name, account_type } => {
            let account_type: AccountType = account_type
                .parse()
                .map_err(|e: UnknownAccountType| FinanceError::Validation(e.to_string()))?;

            let account = service.create(&name, account_type)?;

            println!("Created account: {}", account.name);
            println!("  Type: {}", account.account_type);
            println!("  ID:   {}", account.id);
        }

        AccountCommands::List => {
            let balances = service.list_with_balances()?;
            print!("{}", format_account_list(&balances, &ctx.display()));
        }
    }

    Ok(())
}
