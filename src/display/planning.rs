//! Budget, goal and dream views

use tabled::Tabled;

use super::{date, money, progress_bar, table};
use crate::config::settings::Settings;
use crate::engine::threshold::Band;
use crate::models::{Budget, Dream, Goal, InsightTone};
use crate::services::{BudgetOutcome, ContributionOutcome, JobReport, SavingsSuggestion};

fn band_label(percentage: f64) -> &'static str {
    if percentage >= 100.0 {
        "over"
    } else if percentage >= 80.0 {
        "warning"
    } else {
        ""
    }
}

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Limit")]
    limit: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "")]
    band: &'static str,
}

pub fn format_budget_list(budgets: &[Budget], settings: &Settings) -> String {
    if budgets.is_empty() {
        return "No budgets for this month.".to_string();
    }

    table(
        budgets
            .iter()
            .map(|b| BudgetRow {
                id: b.id.to_string(),
                category: b.category.to_string(),
                limit: money(settings, b.amount),
                spent: money(settings, b.spent),
                remaining: money(settings, b.remaining()),
                progress: format!("{} {:>5.1}%", progress_bar(b.percentage, 10), b.percentage),
                band: band_label(b.percentage),
            })
            .collect(),
    )
}

#[derive(Tabled)]
struct GoalRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Goal")]
    name: String,
    #[tabled(rename = "Type")]
    goal_type: String,
    #[tabled(rename = "Saved")]
    saved: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "By")]
    by: String,
    #[tabled(rename = "Status")]
    status: String,
}

pub fn format_goal_list(goals: &[Goal], settings: &Settings) -> String {
    if goals.is_empty() {
        return "No goals yet.".to_string();
    }

    table(
        goals
            .iter()
            .map(|g| GoalRow {
                id: g.id.to_string(),
                name: g.name.clone(),
                goal_type: g.goal_type.to_string(),
                saved: money(settings, g.current_amount),
                target: money(settings, g.target_amount),
                by: date(settings, g.target_date),
                status: g.status.to_string(),
            })
            .collect(),
    )
}

#[derive(Tabled)]
struct DreamRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Dream")]
    name: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Saved")]
    saved: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Status")]
    status: String,
}

pub fn format_dream_list(dreams: &[Dream], settings: &Settings) -> String {
    if dreams.is_empty() {
        return "No dreams yet.".to_string();
    }

    table(
        dreams
            .iter()
            .map(|d| DreamRow {
                id: d.id.to_string(),
                name: d.name.clone(),
                priority: d.priority.to_string(),
                saved: money(settings, d.current_amount),
                target: money(settings, d.target_amount),
                status: d.status.to_string(),
            })
            .collect(),
    )
}

/// A line about a recomputed budget, empty while it is below the warning band
pub fn format_budget_outcome(outcome: &BudgetOutcome, settings: &Settings) -> String {
    let state = match outcome.progress.band {
        Band::None => return String::new(),
        Band::Warning => "is nearing its limit",
        Band::Critical => "has reached its limit",
    };
    let budget = &outcome.budget;
    format!(
        "Budget {} {} {}: {} of {} ({:.1}%)\n",
        budget.category,
        budget.period,
        state,
        money(settings, budget.spent),
        money(settings, budget.amount),
        outcome.progress.percentage
    )
}

/// Result of a contribution, with the insight when there is one
pub fn format_contribution(outcome: &ContributionOutcome, settings: &Settings) -> String {
    let target = &outcome.target;
    let mut output = format!(
        "Added {} to \"{}\": {} of {} {} {:.1}%\nStatus: {}\n",
        money(settings, outcome.contribution.amount),
        target.name(),
        money(settings, target.current_amount()),
        money(settings, target.target_amount()),
        progress_bar(outcome.progress.percentage, 20),
        outcome.progress.percentage,
        target.status_label(),
    );

    if outcome.progress.band != Band::None {
        output.push_str(&format!(
            "Notified {} household member(s).\n",
            outcome.notified
        ));
    }
    if let Some(insight) = &outcome.insight {
        let prefix = match insight.tone {
            InsightTone::Encouraging => "Tip",
            InsightTone::Celebratory => "Well done",
        };
        output.push_str(&format!("{}: {}\n", prefix, insight.message));
    }
    output
}

pub fn format_suggestion(suggestion: &SavingsSuggestion, settings: &Settings) -> String {
    let mut output = String::from("Over the last three months:\n");
    output.push_str(&format!(
        "  Average income:   {}\n",
        money(settings, suggestion.average_income)
    ));
    output.push_str(&format!(
        "  Average expenses: {}\n",
        money(settings, suggestion.average_expenses)
    ));
    output.push_str(&format!(
        "  Left over:        {}\n",
        money(settings, suggestion.possible_saving)
    ));
    output.push_str(&format!(
        "A safe amount to save each month: {}\n",
        money(settings, suggestion.safe_saving)
    ));
    output
}

pub fn format_job_report(report: &JobReport, settings: &Settings) -> String {
    if report.is_empty() {
        return "Nothing was due.".to_string();
    }

    let mut output = String::new();
    for income in &report.incomes {
        output.push_str(&format!(
            "income       {}  {:<24} {}\n",
            date(settings, income.date),
            income.description,
            money(settings, income.amount)
        ));
    }
    for expense in &report.expenses {
        output.push_str(&format!(
            "expense      {}  {:<24} {}\n",
            date(settings, expense.date),
            expense.description,
            money(settings, expense.amount)
        ));
    }
    for installment in &report.installments {
        let position = format!("{}/{}", installment.number, installment.total_installments);
        output.push_str(&format!(
            "installment  {}  {:<24} {}\n",
            date(settings, installment.due_date),
            position,
            money(settings, installment.amount)
        ));
    }
    if report.budgets_refreshed > 0 {
        output.push_str(&format!("{} budget(s) recomputed\n", report.budgets_refreshed));
    }
    output
}
