//! Budget CLI commands
//!
//! One budget per category and month. Spending is recomputed from the month's
//! expenses whenever the limit changes or an expense lands in it.

use clap::Subcommand;

use super::{parse_amount, parse_category, parse_month};
use crate::config::settings::Settings;
use crate::display::{format_budget_list, format_budget_outcome};
use crate::error::LedgerResult;
use crate::services::{notifier_for, BudgetService};
use crate::storage::Storage;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Set a monthly limit for a category
    Set {
        /// Category
        category: String,
        /// Limit (e.g., "800.00" or "800")
        amount: String,
        /// Month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },
    /// List the household's budgets for a month
    List {
        /// Month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },
    /// Change a budget's limit
    Update {
        /// Category
        category: String,
        /// New limit
        amount: String,
        /// Month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },
    /// Remove a budget
    Remove {
        /// Category
        category: String,
        /// Month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BudgetCommands,
) -> LedgerResult<()> {
    let user_id = settings.require_active_user()?;
    let service = BudgetService::new(storage);
    let notifier = notifier_for(storage, settings);

    match cmd {
        BudgetCommands::Set {
            category,
            amount,
            month,
        } => {
            let category = parse_category(&category)?;
            let period = parse_month(month.as_deref())?;
            let outcome = service.create(
                user_id,
                category,
                parse_amount(&amount)?,
                period,
                notifier.as_ref(),
            )?;

            println!(
                "Budget set: {} {} limit {}",
                outcome.budget.category, outcome.budget.period, outcome.budget.amount
            );
            println!("  Spent so far: {}", outcome.budget.spent);
            print!("{}", format_budget_outcome(&outcome, settings));
        }

        BudgetCommands::List { month } => {
            let period = parse_month(month.as_deref())?;
            let budgets = service.list(user_id, period)?;
            println!("Budgets for {}", period);
            println!("{}", format_budget_list(&budgets, settings));
        }

        BudgetCommands::Update {
            category,
            amount,
            month,
        } => {
            let category = parse_category(&category)?;
            let period = parse_month(month.as_deref())?;
            let budget = service.find(user_id, category, period)?;
            let outcome =
                service.update_amount(user_id, budget.id, parse_amount(&amount)?, notifier.as_ref())?;

            println!(
                "Budget updated: {} {} limit {}",
                outcome.budget.category, outcome.budget.period, outcome.budget.amount
            );
            print!("{}", format_budget_outcome(&outcome, settings));
        }

        BudgetCommands::Remove { category, month } => {
            let category = parse_category(&category)?;
            let period = parse_month(month.as_deref())?;
            let budget = service.find(user_id, category, period)?;
            let removed = service.delete(user_id, budget.id)?;
            println!("Removed budget: {} {}", removed.category, removed.period);
        }
    }

    Ok(())
}
