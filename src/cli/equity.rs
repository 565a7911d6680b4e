//! Equity CLI command

use super::parse_month;
use crate::config::settings::Settings;
use crate::display::format_equity_statement;
use crate::error::LedgerResult;
use crate::services::EquityService;
use crate::storage::Storage;

/// Show who owes whom for a month
pub fn handle_equity_command(
    storage: &Storage,
    settings: &Settings,
    month: Option<String>,
) -> LedgerResult<()> {
    let user_id = settings.require_active_user()?;
    let period = parse_month(month.as_deref())?;

    let statement = EquityService::new(storage).monthly_equity(user_id, period)?;
    print!("{}", format_equity_statement(&statement, settings));

    Ok(())
}
