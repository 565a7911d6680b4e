//! Periodic job CLI commands
//!
//! Meant to be run from cron or a systemd timer; running it more than once a
//! day is harmless.

use clap::Subcommand;

use super::parse_date;
use crate::config::settings::Settings;
use crate::display::format_job_report;
use crate::error::LedgerResult;
use crate::services::{notifier_for, RecurringService};
use crate::storage::Storage;

/// Job subcommands
#[derive(Subcommand)]
pub enum JobCommands {
    /// Generate recurring incomes, expenses and installments that are due
    Run {
        /// Treat this date as today (YYYY-MM-DD)
        #[arg(long)]
        today: Option<String>,
    },
}

/// Handle a job command
///
/// Jobs run across every household, so no active user is needed.
pub fn handle_jobs_command(storage: &Storage, settings: &Settings, cmd: JobCommands) -> LedgerResult<()> {
    match cmd {
        JobCommands::Run { today } => {
            let today = parse_date(today.as_deref())?;
            let notifier = notifier_for(storage, settings);
            let report = RecurringService::new(storage).run(today, notifier.as_ref())?;
            println!("{}", format_job_report(&report, settings));
        }
    }

    Ok(())
}
