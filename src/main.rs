use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fintrack::cli::{
    handle_account_command, handle_calendar, handle_fixed_command, handle_history, handle_stats,
    handle_summary, handle_transaction_command, CliContext,
};
use fintrack::config::{paths::FinancePaths, settings::Settings};
use fintrack::services::AccountService;
use fintrack::storage::{init::initialize_storage, Storage};

/// Environment variable holding the log filter
const LOG_ENV: &str = "FINTRACK_LOG";

#[derive(Parser)]
#[command(
    name = "fintrack",
    version,
    about = "Personal finance tracker for the terminal",
    long_about = "fintrack keeps your accounts, income and expenses, and the bills \
                  you schedule every month. It shows balances per account, what is \
                  still pending this month and a calendar of due dates."
)]
struct Cli {
    /// Directory holding settings and data files
    #[arg(long, global = true, env = "FINTRACK_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Act on the records of this owner only
    #[arg(long, global = true)]
    owner: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory with a default Cash account
    Init,

    /// Show current configuration and paths
    Config,

    /// Balances, paid totals and this month's pending bills
    #[command(alias = "home")]
    Summary,

    /// Spending today, this week, this month and by category
    Stats,

    /// Month calendar with bill due dates marked
    Calendar {
        /// Month to show (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
        /// Day to highlight (YYYY-MM-DD)
        #[arg(short, long)]
        select: Option<String>,
        /// Page back one month; repeat to go further
        #[arg(long, action = clap::ArgAction::Count, conflicts_with = "next")]
        prev: u8,
        /// Page forward one month; repeat to go further
        #[arg(long, action = clap::ArgAction::Count)]
        next: u8,
    },

    /// Recent changes from the audit log
    History {
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Account management commands
    #[command(subcommand)]
    Account(fintrack::cli::AccountCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(fintrack::cli::TransactionCommands),

    /// Recurring bill templates
    #[command(subcommand)]
    Fixed(fintrack::cli::FixedCommands),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let paths = match cli.data_dir {
        Some(dir) => FinancePaths::with_base_dir(dir),
        None => FinancePaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;
    let owner = cli.owner.or_else(|| settings.default_owner.clone());

    let storage = Storage::open(paths.clone())?;
    let ctx = CliContext::new(&storage, &settings, owner.as_deref());

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing fintrack at: {}", paths.base_dir().display());
            let created = initialize_storage(&paths)?;
            storage.load_all()?;

            match AccountService::new(&storage, ctx.owner).ensure_default()? {
                Some(account) => println!("Created default account: {}", account.name),
                None if !created => println!("Already initialized."),
                None => {}
            }
            println!("Initialization complete!");
            println!();
            println!("Run 'fintrack account create <name> --type card' to add accounts.");
        }
        Some(Commands::Config) => {
            println!("fintrack Configuration");
            println!("======================");
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Data directory:  {}", paths.data_dir().display());
            println!("Audit log:       {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!("  Date format:     {}", settings.date_format);
            println!(
                "  Default owner:   {}",
                settings.default_owner.as_deref().unwrap_or("(none)")
            );
            println!("  Hide cash in summary: {}", settings.hide_cash_in_summary);
        }
        Some(Commands::Summary) => handle_summary(&ctx)?,
        Some(Commands::Stats) => handle_stats(&ctx)?,
        Some(Commands::Calendar {
            month,
            select,
            prev,
            next,
        }) => handle_calendar(&ctx, month, select, i32::from(next) - i32::from(prev))?,
        Some(Commands::History { limit }) => handle_history(&ctx, limit)?,
        Some(Commands::Account(cmd)) => handle_account_command(&ctx, cmd)?,
        Some(Commands::Transaction(cmd)) => handle_transaction_command(&ctx, cmd)?,
        Some(Commands::Fixed(cmd)) => handle_fixed_command(&ctx, cmd)?,
        None => {
            println!("fintrack - personal finance tracker");
            println!();
            println!("Run 'fintrack --help' for usage information.");
            println!("Run 'fintrack init' to get started.");
        }
    }

    Ok(())
}
