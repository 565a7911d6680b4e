//! Chore CLI commands
//!
//! Logging housework and the monthly split of it between the two members.

use clap::Subcommand;

use super::{parse_date, parse_month};
use crate::config::settings::Settings;
use crate::display::{format_chore_entries, format_chore_statement, format_chore_templates};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{ChoreKind, ChoreTemplate, ChoreWeight};
use crate::services::{ChoreService, ChoreTemplateUpdate, NewChoreEntry, NewChoreTemplate};
use crate::storage::Storage;

/// Chore subcommands
#[derive(Subcommand)]
pub enum ChoreCommands {
    /// List the chores you can log
    Templates,
    /// Define a chore for your household
    Define {
        /// Chore name
        name: String,
        /// Kind (dishes, cooking, cleaning, laundry, maintenance, grocery, pet-care, other)
        #[arg(short, long, default_value = "other")]
        kind: String,
        /// Weight (light, medium, heavy)
        #[arg(short, long, default_value = "medium")]
        weight: String,
        /// Description
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Change one of your household's chores
    Edit {
        /// Chore name or ID
        chore: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New kind
        #[arg(short, long)]
        kind: Option<String>,
        /// New weight
        #[arg(short, long)]
        weight: Option<String>,
    },
    /// Stop offering one of your household's chores
    Retire {
        /// Chore name or ID
        chore: String,
    },
    /// Log a chore you did
    Log {
        /// Chore name or ID
        chore: String,
        /// Hours spent (counts as one when omitted)
        #[arg(long)]
        hours: Option<f64>,
        /// Note
        #[arg(short, long, default_value = "")]
        note: String,
        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// List the month's chores
    List {
        /// Month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },
    /// Remove a chore you logged
    Remove {
        /// Entry ID
        entry: String,
    },
    /// Who did how much of the housework
    Equity {
        /// Month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },
}

fn parse_kind(input: &str) -> LedgerResult<ChoreKind> {
    ChoreKind::parse(input).ok_or_else(|| {
        LedgerError::Validation(format!(
            "Invalid kind: '{}'. Valid kinds: dishes, cooking, cleaning, laundry, maintenance, grocery, pet-care, other",
            input
        ))
    })
}

fn parse_weight(input: &str) -> LedgerResult<ChoreWeight> {
    ChoreWeight::parse(input).ok_or_else(|| {
        LedgerError::Validation(format!(
            "Invalid weight: '{}'. Valid weights: light, medium, heavy",
            input
        ))
    })
}

/// Handle a chore command
pub fn handle_chore_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ChoreCommands,
) -> LedgerResult<()> {
    let user_id = settings.require_active_user()?;
    let service = ChoreService::new(storage);

    let require_template = |identifier: &str| -> LedgerResult<ChoreTemplate> {
        service
            .find_template(user_id, identifier)?
            .ok_or_else(|| LedgerError::chore_not_found(identifier))
    };

    match cmd {
        ChoreCommands::Templates => {
            let templates = service.templates(user_id)?;
            println!("{}", format_chore_templates(&templates));
        }

        ChoreCommands::Define {
            name,
            kind,
            weight,
            description,
        } => {
            let template = service.create_template(
                user_id,
                NewChoreTemplate {
                    name,
                    description,
                    kind: parse_kind(&kind)?,
                    weight: parse_weight(&weight)?,
                },
            )?;
            println!("Defined chore: {} ({})", template.name, template.weight);
            println!("  ID: {}", template.id);
        }

        ChoreCommands::Edit {
            chore,
            name,
            kind,
            weight,
        } => {
            let found = require_template(&chore)?;
            let changes = ChoreTemplateUpdate {
                name,
                kind: kind.as_deref().map(parse_kind).transpose()?,
                weight: weight.as_deref().map(parse_weight).transpose()?,
                ..ChoreTemplateUpdate::default()
            };
            let updated = service.update_template(user_id, found.id, changes)?;
            println!("Updated chore: {} ({})", updated.name, updated.weight);
        }

        ChoreCommands::Retire { chore } => {
            let found = require_template(&chore)?;
            let retired = service.retire_template(user_id, found.id)?;
            println!("Retired chore: {}", retired.name);
        }

        ChoreCommands::Log {
            chore,
            hours,
            note,
            date,
        } => {
            let template = require_template(&chore)?;
            let entry = service.record(
                user_id,
                NewChoreEntry {
                    template_id: template.id,
                    hours,
                    note,
                    completed_on: parse_date(date.as_deref())?,
                },
            )?;
            println!("Logged chore: {} on {}", template.name, entry.completed_on);
            println!("  ID: {}", entry.id);
        }

        ChoreCommands::List { month } => {
            let period = parse_month(month.as_deref())?;
            let entries = service.entries_for_month(user_id, period)?;
            println!("{}", format_chore_entries(&entries, settings));
        }

        ChoreCommands::Remove { entry } => {
            let found = service
                .find_entry(user_id, &entry)?
                .ok_or_else(|| LedgerError::chore_entry_not_found(entry.as_str()))?;
            let removed = service.delete_entry(user_id, found.id)?;
            println!("Removed chore entry: {}", removed.id);
        }

        ChoreCommands::Equity { month } => {
            let period = parse_month(month.as_deref())?;
            let statement = service.monthly_equity(user_id, period)?;
            print!("{}", format_chore_statement(&statement));
        }
    }

    Ok(())
}
