//! Household CLI commands
//!
//! Creating, joining and leaving a household, and choosing its split method.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_household;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{CustomSplit, SplitMethod};
use crate::services::HouseholdService;
use crate::storage::Storage;

/// Household subcommands
#[derive(Subcommand)]
pub enum HouseholdCommands {
    /// Create a household and become its first member
    Create {
        /// Household name
        name: String,
        /// Split method (fifty-fifty, custom, proportional, one-pays, no-split)
        #[arg(short, long, default_value = "fifty-fifty")]
        split: String,
        /// First member's share for a custom split
        #[arg(long)]
        user1: Option<f64>,
        /// Second member's share for a custom split
        #[arg(long)]
        user2: Option<f64>,
    },
    /// Join a household with its invite code
    Join {
        /// Invite code
        code: String,
    },
    /// Leave your household
    Leave,
    /// Show your household
    Show,
    /// Change your household's split method
    Split {
        /// Split method (fifty-fifty, custom, proportional, one-pays, no-split)
        method: String,
        /// First member's share for a custom split
        #[arg(long)]
        user1: Option<f64>,
        /// Second member's share for a custom split
        #[arg(long)]
        user2: Option<f64>,
    },
}

fn parse_split(
    method: &str,
    user1: Option<f64>,
    user2: Option<f64>,
) -> LedgerResult<(SplitMethod, Option<CustomSplit>)> {
    let method = SplitMethod::parse(method).ok_or_else(|| {
        LedgerError::Validation(format!(
            "Invalid split method: '{}'. Valid methods: fifty-fifty, custom, proportional, one-pays, no-split",
            method
        ))
    })?;

    let custom = match (user1, user2) {
        (Some(a), Some(b)) => Some(CustomSplit::new(a, b)),
        (None, None) => None,
        _ => {
            return Err(LedgerError::Validation(
                "Give both --user1 and --user2 for a custom split".into(),
            ))
        }
    };
    if method == SplitMethod::Custom && custom.is_none() {
        return Err(LedgerError::Validation(
            "A custom split needs --user1 and --user2 percentages".into(),
        ));
    }

    Ok((method, custom))
}

/// Handle a household command
pub fn handle_household_command(
    storage: &Storage,
    settings: &Settings,
    cmd: HouseholdCommands,
) -> LedgerResult<()> {
    let user_id = settings.require_active_user()?;
    let service = HouseholdService::new(storage);

    match cmd {
        HouseholdCommands::Create {
            name,
            split,
            user1,
            user2,
        } => {
            let (method, custom) = parse_split(&split, user1, user2)?;
            let view = service.create(user_id, &name, method, custom)?;
            println!("Created household: {}", view.household.name);
            println!("  Invite code: {}", view.household.invite_code);
            println!("  Share the code with your partner: household household join <code>");
        }

        HouseholdCommands::Join { code } => {
            let view = service.join(user_id, &code)?;
            println!("Joined household: {}", view.household.name);
        }

        HouseholdCommands::Leave => {
            service.leave(user_id)?;
            println!("Left the household.");
        }

        HouseholdCommands::Show => {
            let view = service.my_household(user_id)?;
            print!("{}", format_household(&view));
        }

        HouseholdCommands::Split {
            method,
            user1,
            user2,
        } => {
            let (method, custom) = parse_split(&method, user1, user2)?;
            let current = service.my_household(user_id)?;
            let view = service.update_split(user_id, current.household.id, method, custom)?;
            println!("Split method is now: {}", view.household.split_method);
        }
    }

    Ok(())
}
