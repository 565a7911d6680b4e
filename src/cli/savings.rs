//! Goal and dream CLI commands
//!
//! Goals carry a deadline and a status derived from it; dreams are open-ended
//! with a priority. Both are funded through contributions.

use clap::Subcommand;

use super::{parse_amount, parse_date, today};
use crate::config::settings::Settings;
use crate::display::{format_contribution, format_dream_list, format_goal_list, format_suggestion};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{ContributionTarget, Dream, Goal, GoalType, Priority};
use crate::services::{notifier_for, DreamUpdate, GoalUpdate, NewDream, NewGoal, SavingsService};
use crate::storage::Storage;

/// Goal subcommands
#[derive(Subcommand)]
pub enum GoalCommands {
    /// Create a savings goal
    Add {
        /// Goal name
        name: String,
        /// Target amount
        target: String,
        /// Deadline (YYYY-MM-DD)
        #[arg(long)]
        by: String,
        /// Goal type (monthly, annual, long-term)
        #[arg(short = 't', long, default_value = "monthly")]
        goal_type: String,
        /// Start date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        start: Option<String>,
        /// Description
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// List the household's goals
    List,
    /// Change a goal
    Edit {
        /// Goal name or ID
        goal: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New target amount
        #[arg(short, long)]
        target: Option<String>,
        /// New deadline (YYYY-MM-DD)
        #[arg(long)]
        by: Option<String>,
    },
    /// Put money toward a goal
    Contribute {
        /// Goal name or ID
        goal: String,
        /// Amount
        amount: String,
        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Note
        #[arg(short, long)]
        note: Option<String>,
    },
    /// Delete a goal and its contributions
    Remove {
        /// Goal name or ID
        goal: String,
    },
    /// Suggest a monthly saving from the last three months
    Suggest,
}

/// Dream subcommands
#[derive(Subcommand)]
pub enum DreamCommands {
    /// Create a dream
    Add {
        /// Dream name
        name: String,
        /// Target amount
        target: String,
        /// Priority (low, medium, high)
        #[arg(short, long, default_value = "medium")]
        priority: String,
        /// Target date (YYYY-MM-DD)
        #[arg(long)]
        by: Option<String>,
        /// Description
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// List the household's dreams, highest priority first
    List,
    /// Change a dream
    Edit {
        /// Dream name or ID
        dream: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New target amount
        #[arg(short, long)]
        target: Option<String>,
        /// New priority
        #[arg(short, long)]
        priority: Option<String>,
    },
    /// Put money toward a dream
    Contribute {
        /// Dream name or ID
        dream: String,
        /// Amount
        amount: String,
        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Note
        #[arg(short, long)]
        note: Option<String>,
    },
    /// Delete a dream and its contributions
    Remove {
        /// Dream name or ID
        dream: String,
    },
}

fn parse_priority(input: &str) -> LedgerResult<Priority> {
    Priority::parse(input).ok_or_else(|| {
        LedgerError::Validation(format!(
            "Invalid priority: '{}'. Valid values: low, medium, high",
            input
        ))
    })
}

/// Handle a goal command
pub fn handle_goal_command(
    storage: &Storage,
    settings: &Settings,
    cmd: GoalCommands,
) -> LedgerResult<()> {
    let user_id = settings.require_active_user()?;
    let service = SavingsService::new(storage);

    let require_goal = |identifier: &str| -> LedgerResult<Goal> {
        service
            .find_goal(user_id, identifier)?
            .ok_or_else(|| LedgerError::goal_not_found(identifier))
    };

    match cmd {
        GoalCommands::Add {
            name,
            target,
            by,
            goal_type,
            start,
            description,
        } => {
            let goal_type = GoalType::parse(&goal_type).ok_or_else(|| {
                LedgerError::Validation(format!(
                    "Invalid goal type: '{}'. Valid types: monthly, annual, long-term",
                    goal_type
                ))
            })?;
            let goal = service.create_goal(
                user_id,
                NewGoal {
                    name,
                    description,
                    target_amount: parse_amount(&target)?,
                    goal_type,
                    start_date: parse_date(start.as_deref())?,
                    target_date: parse_date(Some(by.as_str()))?,
                },
            )?;
            println!("Created goal: {} ({} by {})", goal.name, goal.target_amount, goal.target_date);
            println!("  ID: {}", goal.id);
        }

        GoalCommands::List => {
            let goals = service.list_goals(user_id)?;
            println!("{}", format_goal_list(&goals, settings));
        }

        GoalCommands::Edit {
            goal,
            name,
            target,
            by,
        } => {
            let found = require_goal(&goal)?;
            let changes = GoalUpdate {
                name,
                target_amount: target.as_deref().map(parse_amount).transpose()?,
                target_date: by.as_deref().map(|d| parse_date(Some(d))).transpose()?,
                ..GoalUpdate::default()
            };
            let updated = service.update_goal(user_id, found.id, changes, today())?;
            println!("Updated goal: {} ({})", updated.name, updated.status);
        }

        GoalCommands::Contribute {
            goal,
            amount,
            date,
            note,
        } => {
            let found = require_goal(&goal)?;
            let notifier = notifier_for(storage, settings);
            let outcome = service.contribute(
                user_id,
                ContributionTarget::Goal(found.id),
                parse_amount(&amount)?,
                parse_date(date.as_deref())?,
                note,
                today(),
                notifier.as_ref(),
            )?;
            print!("{}", format_contribution(&outcome, settings));
        }

        GoalCommands::Remove { goal } => {
            let found = require_goal(&goal)?;
            let removed = service.delete_goal(user_id, found.id)?;
            println!("Deleted goal: {}", removed.name);
        }

        GoalCommands::Suggest => {
            let suggestion = service.suggestion(user_id, today())?;
            print!("{}", format_suggestion(&suggestion, settings));
        }
    }

    Ok(())
}

/// Handle a dream command
pub fn handle_dream_command(
    storage: &Storage,
    settings: &Settings,
    cmd: DreamCommands,
) -> LedgerResult<()> {
    let user_id = settings.require_active_user()?;
    let service = SavingsService::new(storage);

    let require_dream = |identifier: &str| -> LedgerResult<Dream> {
        service
            .find_dream(user_id, identifier)?
            .ok_or_else(|| LedgerError::dream_not_found(identifier))
    };

    match cmd {
        DreamCommands::Add {
            name,
            target,
            priority,
            by,
            description,
        } => {
            let dream = service.create_dream(
                user_id,
                NewDream {
                    name,
                    description,
                    target_amount: parse_amount(&target)?,
                    target_date: by.as_deref().map(|d| parse_date(Some(d))).transpose()?,
                    priority: parse_priority(&priority)?,
                },
            )?;
            println!("Created dream: {} ({})", dream.name, dream.target_amount);
            println!("  ID: {}", dream.id);
        }

        DreamCommands::List => {
            let dreams = service.list_dreams(user_id)?;
            println!("{}", format_dream_list(&dreams, settings));
        }

        DreamCommands::Edit {
            dream,
            name,
            target,
            priority,
        } => {
            let found = require_dream(&dream)?;
            let changes = DreamUpdate {
                name,
                target_amount: target.as_deref().map(parse_amount).transpose()?,
                priority: priority.as_deref().map(parse_priority).transpose()?,
                ..DreamUpdate::default()
            };
            let updated = service.update_dream(user_id, found.id, changes)?;
            println!("Updated dream: {} ({})", updated.name, updated.status);
        }

        DreamCommands::Contribute {
            dream,
            amount,
            date,
            note,
        } => {
            let found = require_dream(&dream)?;
            let notifier = notifier_for(storage, settings);
            let outcome = service.contribute(
                user_id,
                ContributionTarget::Dream(found.id),
                parse_amount(&amount)?,
                parse_date(date.as_deref())?,
                note,
                today(),
                notifier.as_ref(),
            )?;
            print!("{}", format_contribution(&outcome, settings));
        }

        DreamCommands::Remove { dream } => {
            let found = require_dream(&dream)?;
            let removed = service.delete_dream(user_id, found.id)?;
            println!("Deleted dream: {}", removed.name);
        }
    }

    Ok(())
}
