//! Income model
//!
//! An income belongs to one household member for one date. Incomes feed the
//! PROPORTIONAL split through the monthly equity calculation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{HouseholdId, IncomeId, UserId};
use super::money::Money;
use super::recurrence::Recurrence;

/// Validation errors for incomes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncomeValidationError {
    NonPositiveAmount,
    EmptyDescription,
}

impl std::fmt::Display for IncomeValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveAmount => write!(f, "Income amount must be greater than zero"),
            Self::EmptyDescription => write!(f, "Income description cannot be empty"),
        }
    }
}

impl std::error::Error for IncomeValidationError {}

/// Money received by one member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Income {
    pub id: IncomeId,
    pub household_id: HouseholdId,
    pub user_id: UserId,
    pub description: String,
    pub amount: Money,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Income {
    pub fn new(
        household_id: HouseholdId,
        user_id: UserId,
        description: impl Into<String>,
        amount: Money,
        date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: IncomeId::new(),
            household_id,
            user_id,
            description: description.into(),
            amount,
            date,
            recurrence: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }

    /// Copy of this income for the next occurrence; the copy carries the
    /// recurrence forward and this one stops recurring
    pub fn next_occurrence(&mut self, date: NaiveDate) -> Income {
        let mut next = Income::new(
            self.household_id,
            self.user_id,
            self.description.clone(),
            self.amount,
            date,
        );
        next.recurrence = self.recurrence.map(|r| Recurrence::new(r.frequency, date));
        self.recurrence = None;
        self.updated_at = Utc::now();
        next
    }

    pub fn validate(&self) -> Result<(), IncomeValidationError> {
        if !self.amount.is_positive() {
            return Err(IncomeValidationError::NonPositiveAmount);
        }
        if self.description.trim().is_empty() {
            return Err(IncomeValidationError::EmptyDescription);
        }
        Ok(())
    }
}
