//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.
//! Every command except `user` acts as the active user from the settings.

pub mod budget;
pub mod card;
pub mod chore;
pub mod equity;
pub mod expense;
pub mod export;
pub mod household;
pub mod income;
pub mod jobs;
pub mod notification;
pub mod savings;
pub mod user;

pub use budget::{handle_budget_command, BudgetCommands};
pub use card::{handle_card_command, CardCommands};
pub use chore::{handle_chore_command, ChoreCommands};
pub use equity::handle_equity_command;
pub use expense::{handle_expense_command, ExpenseCommands};
pub use export::{handle_export_command, ExportFormat};
pub use household::{handle_household_command, HouseholdCommands};
pub use income::{handle_income_command, IncomeCommands};
pub use jobs::{handle_jobs_command, JobCommands};
pub use notification::{handle_notification_command, NotificationCommands};
pub use savings::{handle_dream_command, handle_goal_command, DreamCommands, GoalCommands};
pub use user::{handle_user_command, UserCommands};

use chrono::{Local, NaiveDate};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{ExpenseCategory, Frequency, Money, MonthPeriod};

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) fn parse_amount(input: &str) -> LedgerResult<Money> {
    Money::parse(input).map_err(|e| {
        LedgerError::Validation(format!(
            "Invalid amount: '{}'. Use format like '120.50' or '120'. Error: {}",
            input, e
        ))
    })
}

/// A `YYYY-MM-DD` date, or today when absent
pub(crate) fn parse_date(input: Option<&str>) -> LedgerResult<NaiveDate> {
    match input {
        None => Ok(today()),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            LedgerError::Validation(format!("Invalid date: '{}'. Use YYYY-MM-DD", s))
        }),
    }
}

/// A `YYYY-MM` month, or the current one when absent
pub(crate) fn parse_month(input: Option<&str>) -> LedgerResult<MonthPeriod> {
    match input {
        None => Ok(MonthPeriod::of(today())),
        Some(s) => MonthPeriod::parse(s).map_err(|e| {
            LedgerError::Validation(format!("Invalid month: '{}'. Use YYYY-MM. Error: {}", s, e))
        }),
    }
}

pub(crate) fn parse_category(input: &str) -> LedgerResult<ExpenseCategory> {
    ExpenseCategory::parse(input).ok_or_else(|| {
        let valid: Vec<String> = ExpenseCategory::all()
            .iter()
            .map(|c| c.to_string().to_lowercase())
            .collect();
        LedgerError::Validation(format!(
            "Invalid category: '{}'. Valid categories: {}",
            input,
            valid.join(", ")
        ))
    })
}

pub(crate) fn parse_frequency(input: Option<&str>) -> LedgerResult<Option<Frequency>> {
    input
        .map(|s| {
            Frequency::parse(s).ok_or_else(|| {
                LedgerError::Validation(format!(
                    "Invalid frequency: '{}'. Valid values: weekly, biweekly, monthly, yearly",
                    s
                ))
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("120.5").unwrap(), Money::from_cents(12050));
        assert!(parse_amount("twelve").unwrap_err().is_validation());
    }

    #[test]
    fn test_parse_date_and_month() {
        assert_eq!(
            parse_date(Some("2025-03-01")).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );
        assert!(parse_date(Some("01/03/2025")).is_err());
        assert_eq!(parse_month(Some("2025-03")).unwrap(), MonthPeriod::new(2025, 3).unwrap());
        assert_eq!(parse_month(None).unwrap(), MonthPeriod::of(today()));
    }

    #[test]
    fn test_parse_category_lists_choices() {
        assert_eq!(parse_category("groceries").unwrap(), ExpenseCategory::Groceries);
        let err = parse_category("pets").unwrap_err().to_string();
        assert!(err.contains("housing"));
    }

    #[test]
    fn test_parse_frequency() {
        assert_eq!(parse_frequency(None).unwrap(), None);
        assert_eq!(parse_frequency(Some("monthly")).unwrap(), Some(Frequency::Monthly));
        assert!(parse_frequency(Some("daily")).is_err());
    }
}
