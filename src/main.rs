use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use household_equity::cli::{
    handle_budget_command, handle_card_command, handle_chore_command, handle_dream_command,
    handle_equity_command, handle_expense_command, handle_export_command, handle_goal_command,
    handle_household_command, handle_income_command, handle_jobs_command,
    handle_notification_command, handle_user_command, BudgetCommands, CardCommands,
    ChoreCommands, DreamCommands, ExpenseCommands, ExportFormat, GoalCommands, HouseholdCommands,
    IncomeCommands, JobCommands, NotificationCommands, UserCommands,
};
use household_equity::config::{paths::LedgerPaths, settings::Settings};
use household_equity::logging;
use household_equity::storage::Storage;

#[derive(Parser)]
#[command(
    name = "household",
    version,
    about = "Shared household finances for two partners",
    long_about = "Track what a couple earns and spends, split shared expenses by the \
                  household's policy and see each month who owes whom. Credit card \
                  installments, budgets and savings goals are tracked alongside."
)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,

    /// User management commands
    #[command(subcommand)]
    User(UserCommands),

    /// Household management commands
    #[command(subcommand)]
    Household(HouseholdCommands),

    /// Income commands
    #[command(subcommand)]
    Income(IncomeCommands),

    /// Expense commands
    #[command(subcommand)]
    Expense(ExpenseCommands),

    /// Credit card commands
    #[command(subcommand)]
    Card(CardCommands),

    /// Monthly category budgets
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Savings goals
    #[command(subcommand)]
    Goal(GoalCommands),

    /// Dreams
    #[command(subcommand)]
    Dream(DreamCommands),

    /// Housework and who carries it
    #[command(subcommand, alias = "chores")]
    Chore(ChoreCommands),

    /// Who owes whom for a month
    Equity {
        /// Month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Your notifications
    #[command(subcommand, alias = "notifications")]
    Notification(NotificationCommands),

    /// Periodic jobs
    #[command(subcommand, alias = "job")]
    Jobs(JobCommands),

    /// Export your household
    Export {
        /// Export format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,

        /// Output file path (defaults to the export directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    // Initialize paths and settings
    let paths = LedgerPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    let storage = Storage::open(paths.clone())?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing household ledger at: {}", paths.data_dir().display());
            paths.ensure_directories()?;
            storage.save_all()?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Next steps:");
            println!("  household user add <name>");
            println!("  household household create <name>");
        }
        Some(Commands::Config) => {
            println!("Household ledger configuration");
            println!("==============================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Export directory: {}", paths.export_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:      {}", settings.currency_symbol);
            println!("  Date format:          {}", settings.date_format);
            println!("  Installment rounding: {:?}", settings.installment_rounding);
            println!(
                "  Dedup notifications:  {}",
                settings.notifications.deduplicate
            );
            match settings.active_user {
                Some(user) => println!("  Active user:          {}", user),
                None => println!("  Active user:          (none)"),
            }
        }
        Some(Commands::User(cmd)) => {
            handle_user_command(&storage, &paths, &mut settings, cmd)?;
        }
        Some(Commands::Household(cmd)) => {
            handle_household_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Income(cmd)) => {
            handle_income_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Expense(cmd)) => {
            handle_expense_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Card(cmd)) => {
            handle_card_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Budget(cmd)) => {
            handle_budget_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Goal(cmd)) => {
            handle_goal_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Dream(cmd)) => {
            handle_dream_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Chore(cmd)) => {
            handle_chore_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Equity { month }) => {
            handle_equity_command(&storage, &settings, month)?;
        }
        Some(Commands::Notification(cmd)) => {
            handle_notification_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Jobs(cmd)) => {
            handle_jobs_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Export {
            format,
            output,
            pretty,
        }) => {
            handle_export_command(&storage, &settings, format, output, pretty)?;
        }
        None => {
            println!("household - shared finances for two");
            println!();
            println!("Run 'household --help' for usage information.");
        }
    }

    Ok(())
}
