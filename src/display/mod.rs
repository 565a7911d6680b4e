//! Display formatting for terminal output
//!
//! List views are rendered as tables with `tabled`; detail views and
//! reports are laid out line by line. Amounts and dates follow the user's
//! settings.

pub mod chores;
pub mod equity;
pub mod household;
pub mod ledger;
pub mod planning;

pub use chores::{format_chore_entries, format_chore_statement, format_chore_templates};
pub use equity::format_equity_statement;
pub use household::{format_household, format_notification_list, format_user_list};
pub use ledger::{
    format_card_list, format_expense_list, format_income_list, format_income_summary,
    format_installment_list,
};
pub use planning::{
    format_budget_list, format_budget_outcome, format_contribution, format_dream_list,
    format_goal_list, format_job_report, format_suggestion,
};

use chrono::NaiveDate;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::config::settings::Settings;
use crate::models::Money;

pub(crate) fn money(settings: &Settings, amount: Money) -> String {
    amount.format_with_symbol(&settings.currency_symbol)
}

pub(crate) fn date(settings: &Settings, date: NaiveDate) -> String {
    date.format(&settings.date_format).to_string()
}

pub(crate) fn table<T: Tabled>(rows: Vec<T>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::sharp());
    table.to_string()
}

/// A fixed-width bar, full at 100% and capped there
pub(crate) fn progress_bar(percentage: f64, width: usize) -> String {
    let ratio = (percentage / 100.0).clamp(0.0, 1.0);
    let filled = (ratio * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0.0, 4), "[....]");
        assert_eq!(progress_bar(50.0, 4), "[##..]");
        assert_eq!(progress_bar(250.0, 4), "[####]");
    }

    #[test]
    fn test_money_uses_settings_symbol() {
        let settings = Settings {
            currency_symbol: "R$".into(),
            ..Settings::default()
        };
        assert_eq!(money(&settings, Money::from_cents(-1050)), "-R$10.50");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Groceries", 20), "Groceries");
        assert_eq!(truncate("A very long description", 10), "A very ...");
    }
}
