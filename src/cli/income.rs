//! Income CLI commands

use clap::Subcommand;

use super::{parse_amount, parse_date, parse_frequency, parse_month};
use crate::config::settings::Settings;
use crate::display::{format_income_list, format_income_summary};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Income, UserId};
use crate::services::{IncomeService, IncomeUpdate};
use crate::storage::Storage;

/// Income subcommands
#[derive(Subcommand)]
pub enum IncomeCommands {
    /// Record an income
    Add {
        /// Amount (e.g., "3500.00" or "3500")
        amount: String,
        /// Description
        description: String,
        /// Date received (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Repeat (weekly, biweekly, monthly, yearly)
        #[arg(short, long)]
        repeat: Option<String>,
    },
    /// List incomes for a month
    List {
        /// Month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
        /// Include your partner's incomes
        #[arg(short = 'H', long)]
        household: bool,
    },
    /// Edit one of your incomes
    Edit {
        /// Income ID
        income: String,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New description
        #[arg(short = 'n', long)]
        description: Option<String>,
        /// New date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// Repeat (weekly, biweekly, monthly, yearly)
        #[arg(short, long, conflicts_with = "once")]
        repeat: Option<String>,
        /// Stop repeating
        #[arg(long)]
        once: bool,
    },
    /// Household income per member for a month
    Summary {
        /// Month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },
    /// Delete one of your incomes
    Remove {
        /// Income ID
        income: String,
    },
}

/// Handle an income command
pub fn handle_income_command(
    storage: &Storage,
    settings: &Settings,
    cmd: IncomeCommands,
) -> LedgerResult<()> {
    let user_id = settings.require_active_user()?;
    let service = IncomeService::new(storage);

    match cmd {
        IncomeCommands::Add {
            amount,
            description,
            date,
            repeat,
        } => {
            let amount = parse_amount(&amount)?;
            let date = parse_date(date.as_deref())?;
            let frequency = parse_frequency(repeat.as_deref())?;

            let income = service.record(user_id, &description, amount, date, frequency)?;
            println!("Recorded income: {} {}", income.description, income.amount);
            if let Some(recurrence) = income.recurrence {
                println!("  Repeats: {}", recurrence.frequency);
            }
            println!("  ID: {}", income.id);
        }

        IncomeCommands::List { month, household } => {
            let period = parse_month(month.as_deref())?;
            let incomes = if household {
                service.household_month(user_id, period)?
            } else {
                service.list_for_month(user_id, period)?
            };
            println!("Incomes for {}", period);
            print!("{}", format_income_list(&incomes, settings));
        }

        IncomeCommands::Edit {
            income,
            amount,
            description,
            date,
            repeat,
            once,
        } => {
            let found = require_income(&service, user_id, &income)?;
            let changes = IncomeUpdate {
                description,
                amount: amount.as_deref().map(parse_amount).transpose()?,
                date: date.as_deref().map(|d| parse_date(Some(d))).transpose()?,
                frequency: parse_frequency(repeat.as_deref())?,
                stop_repeating: once,
            };

            let updated = service.update(user_id, found.id, changes)?;
            println!("Updated income: {} {}", updated.description, updated.amount);
            match updated.recurrence {
                Some(recurrence) => println!("  Repeats: {}", recurrence.frequency),
                None => println!("  Does not repeat"),
            }
        }

        IncomeCommands::Summary { month } => {
            let period = parse_month(month.as_deref())?;
            let summary = service.monthly_summary(user_id, period)?;
            print!("{}", format_income_summary(&summary, settings));
        }

        IncomeCommands::Remove { income } => {
            let found = require_income(&service, user_id, &income)?;
            let removed = service.delete(user_id, found.id)?;
            println!("Deleted income: {}", removed.description);
        }
    }

    Ok(())
}

fn require_income(
    service: &IncomeService<'_>,
    user_id: UserId,
    identifier: &str,
) -> LedgerResult<Income> {
    service
        .find(user_id, identifier)?
        .ok_or_else(|| LedgerError::NotFound {
            entity_type: "Income",
            identifier: identifier.to_string(),
        })
}
