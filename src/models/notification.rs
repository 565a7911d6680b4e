//! Notification payloads and stored notifications

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BudgetId, DreamId, GoalId, HouseholdId, NotificationId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    BudgetWarning,
    BudgetCritical,
    GoalUpdated,
    DreamUpdated,
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::BudgetWarning => "BUDGET_WARNING",
            Self::BudgetCritical => "BUDGET_CRITICAL",
            Self::GoalUpdated => "GOAL_UPDATED",
            Self::DreamUpdated => "DREAM_UPDATED",
        };
        write!(f, "{}", label)
    }
}

/// The record a notification is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(
    tag = "related_type",
    content = "related_id",
    rename_all = "SCREAMING_SNAKE_CASE"
)]
pub enum RelatedEntity {
    Budget(BudgetId),
    Goal(GoalId),
    Dream(DreamId),
}

impl fmt::Display for RelatedEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Budget(id) => write!(f, "{}", id),
            Self::Goal(id) => write!(f, "{}", id),
            Self::Dream(id) => write!(f, "{}", id),
        }
    }
}

/// What the dispatcher receives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub household_id: HouseholdId,
    pub user_id: UserId,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    #[serde(flatten)]
    pub related: RelatedEntity,
}

/// A delivered notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    #[serde(flatten)]
    pub payload: NotificationPayload,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(payload: NotificationPayload) -> Self {
        Self {
            id: NotificationId::new(),
            payload,
            is_read: false,
            read_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn mark_read(&mut self) {
        self.is_read = true;
        self.read_at = Some(Utc::now());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InsightTone {
    Encouraging,
    Celebratory,
}

/// Auxiliary encouragement or celebration message for a contributor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub tone: InsightTone,
    pub message: String,
}
