//! Threshold evaluation and the notifications it triggers
//!
//! Progress toward a target is classified into a band. Budgets, goals and
//! dreams share the same bands but produce different notification payloads.
//! Nothing here remembers what was sent before, so re-entering a band on a
//! later mutation produces the same payloads again.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};
pub use crate::models::{DreamStatus, GoalStatus};
use crate::models::{
    Budget, Dream, Goal, HouseholdId, Insight, InsightTone, Money, NotificationPayload,
    NotificationType, RelatedEntity, UserId,
};

/// Percentage at which the warning band starts
pub const WARNING_PERCENT: i128 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Band {
    None,
    /// 80% up to but excluding 100%
    Warning,
    /// 100% and above
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub percentage: f64,
    pub band: Band,
}

/// Evaluate `current` against a positive `target`
///
/// Bands are decided on the integer cent amounts so a value sitting exactly
/// on a boundary is never misclassified by float rounding.
pub fn evaluate(current: Money, target: Money) -> LedgerResult<Progress> {
    if !target.is_positive() {
        return Err(LedgerError::InvalidTarget(format!(
            "target must be greater than zero (got {})",
            target
        )));
    }

    let current_cents = i128::from(current.cents());
    let target_cents = i128::from(target.cents());

    let band = if current_cents >= target_cents {
        Band::Critical
    } else if current_cents * 100 >= target_cents * WARNING_PERCENT {
        Band::Warning
    } else {
        Band::None
    };

    Ok(Progress {
        percentage: current.cents() as f64 * 100.0 / target.cents() as f64,
        band,
    })
}

/// Goal status from progress and the goal's deadline
pub fn classify_goal(progress: &Progress, target_date: NaiveDate, today: NaiveDate) -> GoalStatus {
    match progress.band {
        Band::Critical => GoalStatus::Completed,
        Band::Warning => GoalStatus::NearCompletion,
        Band::None if today > target_date => GoalStatus::Delayed,
        Band::None => GoalStatus::InProgress,
    }
}

pub fn classify_dream(progress: &Progress) -> DreamStatus {
    match progress.band {
        Band::Critical => DreamStatus::Completed,
        _ => DreamStatus::InProgress,
    }
}

fn fan_out(
    household_id: HouseholdId,
    members: &[UserId],
    title: &str,
    message: &str,
    notification_type: NotificationType,
    related: RelatedEntity,
) -> Vec<NotificationPayload> {
    members
        .iter()
        .map(|&user_id| NotificationPayload {
            household_id,
            user_id,
            title: title.to_string(),
            message: message.to_string(),
            notification_type,
            related,
        })
        .collect()
}

/// One payload per member when a budget is in the warning or critical band
pub fn budget_notifications(
    budget: &Budget,
    progress: &Progress,
    members: &[UserId],
) -> Vec<NotificationPayload> {
    let (title, message, kind) = match progress.band {
        Band::None => return Vec::new(),
        Band::Warning => (
            "Budget warning",
            format!(
                "Budget is at {} of {} (above 80%).",
                budget.spent, budget.amount
            ),
            NotificationType::BudgetWarning,
        ),
        Band::Critical => (
            "Budget exceeded",
            format!("Budget exceeded: {} of {}.", budget.spent, budget.amount),
            NotificationType::BudgetCritical,
        ),
    };

    fan_out(
        budget.household_id,
        members,
        title,
        &message,
        kind,
        RelatedEntity::Budget(budget.id),
    )
}

/// One payload per member when a goal is near or past its target
pub fn goal_notifications(
    goal: &Goal,
    progress: &Progress,
    members: &[UserId],
) -> Vec<NotificationPayload> {
    let (title, message) = match progress.band {
        Band::None => return Vec::new(),
        Band::Warning => (
            "Goal almost reached!",
            format!(
                "Goal \"{}\" reached {:.1}% of its target.",
                goal.name, progress.percentage
            ),
        ),
        Band::Critical => (
            "Goal completed!",
            format!("Congratulations! Goal \"{}\" is complete.", goal.name),
        ),
    };

    fan_out(
        goal.household_id,
        members,
        title,
        &message,
        NotificationType::GoalUpdated,
        RelatedEntity::Goal(goal.id),
    )
}

/// One payload per member when a dream is near or past its target
pub fn dream_notifications(
    dream: &Dream,
    progress: &Progress,
    members: &[UserId],
) -> Vec<NotificationPayload> {
    let (title, message) = match progress.band {
        Band::None => return Vec::new(),
        Band::Warning => (
            "Dream on its way!",
            format!(
                "Dream \"{}\" is at {:.1}% of its target.",
                dream.name, progress.percentage
            ),
        ),
        Band::Critical => (
            "Dream come true!",
            format!("You made the dream \"{}\" happen!", dream.name),
        ),
    };

    fan_out(
        dream.household_id,
        members,
        title,
        &message,
        NotificationType::DreamUpdated,
        RelatedEntity::Dream(dream.id),
    )
}

/// Encouragement below the halfway mark, celebration at completion
pub fn insight_for(name: &str, progress: &Progress) -> Option<Insight> {
    let pct = progress.percentage;
    if pct >= 100.0 {
        Some(Insight {
            tone: InsightTone::Celebratory,
            message: format!(
                "\"{}\" is complete! Great consistency in your planning.",
                name
            ),
        })
    } else if pct > 0.0 && pct < 50.0 {
        Some(Insight {
            tone: InsightTone::Encouraging,
            message: format!(
                "You are already {:.1}% of the way to \"{}\". Keep up the pace!",
                pct, name
            ),
        })
    } else {
        None
    }
}
