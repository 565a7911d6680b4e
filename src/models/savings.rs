//! Savings goals, dreams and their contributions
//!
//! A goal or dream's `current_amount` is a denormalized copy of the sum of its
//! contributions, rewritten on every contribution.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ContributionId, DreamId, GoalId, HouseholdId, UserId};
use super::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalType {
    #[default]
    Monthly,
    Annual,
    LongTerm,
}

impl GoalType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "monthly" => Some(Self::Monthly),
            "annual" | "yearly" => Some(Self::Annual),
            "longterm" => Some(Self::LongTerm),
            _ => None,
        }
    }
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Monthly => write!(f, "Monthly"),
            Self::Annual => write!(f, "Annual"),
            Self::LongTerm => write!(f, "Long term"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalStatus {
    #[default]
    InProgress,
    NearCompletion,
    Completed,
    Delayed,
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProgress => write!(f, "In progress"),
            Self::NearCompletion => write!(f, "Near completion"),
            Self::Completed => write!(f, "Completed"),
            Self::Delayed => write!(f, "Delayed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DreamStatus {
    #[default]
    InProgress,
    Completed,
}

impl fmt::Display for DreamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProgress => write!(f, "In progress"),
            Self::Completed => write!(f, "Completed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Validation errors shared by goals and dreams
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SavingsValidationError {
    EmptyName,
    NonPositiveTarget,
    TargetBeforeStart,
}

impl fmt::Display for SavingsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Name cannot be empty"),
            Self::NonPositiveTarget => write!(f, "Target amount must be greater than zero"),
            Self::TargetBeforeStart => write!(f, "Target date cannot be before the start date"),
        }
    }
}

impl std::error::Error for SavingsValidationError {}

/// A time-boxed savings goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub household_id: HouseholdId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub target_amount: Money,
    #[serde(default)]
    pub current_amount: Money,
    #[serde(default)]
    pub goal_type: GoalType,
    pub start_date: NaiveDate,
    pub target_date: NaiveDate,
    #[serde(default)]
    pub status: GoalStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    pub fn new(
        household_id: HouseholdId,
        name: impl Into<String>,
        target_amount: Money,
        start_date: NaiveDate,
        target_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: GoalId::new(),
            household_id,
            name: name.into(),
            description: String::new(),
            target_amount,
            current_amount: Money::zero(),
            goal_type: GoalType::default(),
            start_date,
            target_date,
            status: GoalStatus::InProgress,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record a new total and status; the completion time is set only once
    pub fn apply_progress(&mut self, current_amount: Money, status: GoalStatus) {
        self.current_amount = current_amount;
        self.status = status;
        if status == GoalStatus::Completed && self.completed_at.is_none() {
            self.completed_at = Some(Utc::now());
        }
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Result<(), SavingsValidationError> {
        if self.name.trim().is_empty() {
            return Err(SavingsValidationError::EmptyName);
        }
        if !self.target_amount.is_positive() {
            return Err(SavingsValidationError::NonPositiveTarget);
        }
        if self.target_date < self.start_date {
            return Err(SavingsValidationError::TargetBeforeStart);
        }
        Ok(())
    }
}

/// An open-ended savings dream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dream {
    pub id: DreamId,
    pub household_id: HouseholdId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub target_amount: Money,
    #[serde(default)]
    pub current_amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: DreamStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Dream {
    pub fn new(household_id: HouseholdId, name: impl Into<String>, target_amount: Money) -> Self {
        let now = Utc::now();
        Self {
            id: DreamId::new(),
            household_id,
            name: name.into(),
            description: String::new(),
            target_amount,
            current_amount: Money::zero(),
            target_date: None,
            priority: Priority::default(),
            status: DreamStatus::InProgress,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record a new total and status; the completion time is set only once
    pub fn apply_progress(&mut self, current_amount: Money, status: DreamStatus) {
        self.current_amount = current_amount;
        self.status = status;
        if status == DreamStatus::Completed && self.completed_at.is_none() {
            self.completed_at = Some(Utc::now());
        }
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Result<(), SavingsValidationError> {
        if self.name.trim().is_empty() {
            return Err(SavingsValidationError::EmptyName);
        }
        if !self.target_amount.is_positive() {
            return Err(SavingsValidationError::NonPositiveTarget);
        }
        Ok(())
    }
}

/// What a contribution is paying toward; exactly one of a goal or a dream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionTarget {
    Goal(GoalId),
    Dream(DreamId),
}

impl fmt::Display for ContributionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Goal(id) => write!(f, "{}", id),
            Self::Dream(id) => write!(f, "{}", id),
        }
    }
}

/// Append-only ledger entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contribution {
    pub id: ContributionId,
    pub target: ContributionTarget,
    pub user_id: UserId,
    pub amount: Money,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Contribution {
    pub fn new(target: ContributionTarget, user_id: UserId, amount: Money, date: NaiveDate) -> Self {
        Self {
            id: ContributionId::new(),
            target,
            user_id,
            amount,
            date,
            note: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_note(mut self, note: Option<String>) -> Self {
        self.note = note.filter(|n| !n.trim().is_empty());
        self
    }
}
