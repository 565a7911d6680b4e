//! User CLI commands
//!
//! Registering users and choosing which one the CLI acts as.

use clap::Subcommand;

use crate::config::paths::LedgerPaths;
use crate::config::settings::Settings;
use crate::display::format_user_list;
use crate::error::{LedgerError, LedgerResult};
use crate::services::UserService;
use crate::storage::Storage;

/// User subcommands
#[derive(Subcommand)]
pub enum UserCommands {
    /// Register a new user
    Add {
        /// Display name
        name: String,
        /// Email address
        #[arg(short, long, default_value = "")]
        email: String,
    },
    /// Act as this user for the following commands
    Use {
        /// User name, email or ID
        user: String,
    },
    /// List registered users
    List,
}

/// Handle a user command
///
/// The first user registered becomes the active user.
pub fn handle_user_command(
    storage: &Storage,
    paths: &LedgerPaths,
    settings: &mut Settings,
    cmd: UserCommands,
) -> LedgerResult<()> {
    let service = UserService::new(storage);

    match cmd {
        UserCommands::Add { name, email } => {
            let user = service.register(&name, &email)?;
            println!("Registered user: {}", user.name);
            println!("  ID: {}", user.id);

            if settings.active_user.is_none() {
                settings.active_user = Some(user.id);
                settings.save(paths)?;
                println!("  Now acting as {}", user.name);
            }
        }

        UserCommands::Use { user } => {
            let found = service
                .find(&user)?
                .ok_or_else(|| LedgerError::user_not_found(&user))?;

            settings.active_user = Some(found.id);
            settings.save(paths)?;
            println!("Now acting as {} ({})", found.name, found.id);
        }

        UserCommands::List => {
            let users = service.list()?;
            println!("{}", format_user_list(&users, settings.active_user));
        }
    }

    Ok(())
}
