//! Notification CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_notification_list;
use crate::error::{LedgerError, LedgerResult};
use crate::services::NotificationService;
use crate::storage::Storage;

/// Notification subcommands
#[derive(Subcommand)]
pub enum NotificationCommands {
    /// List your notifications, newest first
    List {
        /// Only unread notifications
        #[arg(short, long)]
        unread: bool,
    },
    /// Mark a notification read
    Read {
        /// Notification ID, or "all"
        notification: String,
    },
}

/// Handle a notification command
pub fn handle_notification_command(
    storage: &Storage,
    settings: &Settings,
    cmd: NotificationCommands,
) -> LedgerResult<()> {
    let user_id = settings.require_active_user()?;
    let service = NotificationService::new(storage);

    match cmd {
        NotificationCommands::List { unread } => {
            let notifications = service.list(user_id, unread)?;
            println!("{}", format_notification_list(&notifications));
            println!("{} unread", service.unread_count(user_id)?);
        }

        NotificationCommands::Read { notification } => {
            if notification.eq_ignore_ascii_case("all") {
                let unread = service.list(user_id, true)?;
                for n in &unread {
                    service.mark_read(user_id, n.id)?;
                }
                println!("Marked {} notification(s) read.", unread.len());
                return Ok(());
            }

            let found = service
                .find(user_id, &notification)?
                .ok_or_else(|| LedgerError::NotFound {
                    entity_type: "Notification",
                    identifier: notification.clone(),
                })?;
            let read = service.mark_read(user_id, found.id)?;
            println!("Marked read: {}", read.payload.title);
        }
    }

    Ok(())
}
