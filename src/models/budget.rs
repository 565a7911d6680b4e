//! Budget model
//!
//! A spending limit for one category in one calendar month. `spent` and
//! `percentage` are derived from the month's expenses and are recomputed on
//! every create, update and refresh.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::expense::ExpenseCategory;
use super::ids::{BudgetId, HouseholdId};
use super::money::Money;
use super::period::MonthPeriod;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,
    pub household_id: HouseholdId,
    pub category: ExpenseCategory,
    /// The limit
    pub amount: Money,
    pub period: MonthPeriod,
    #[serde(default)]
    pub spent: Money,
    #[serde(default)]
    pub percentage: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    pub fn new(
        household_id: HouseholdId,
        category: ExpenseCategory,
        amount: Money,
        period: MonthPeriod,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: BudgetId::new(),
            household_id,
            category,
            amount,
            period,
            spent: Money::zero(),
            percentage: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Store freshly derived spend figures
    pub fn apply_spent(&mut self, spent: Money, percentage: f64) {
        self.spent = spent;
        self.percentage = percentage;
        self.updated_at = Utc::now();
    }

    pub fn set_amount(&mut self, amount: Money) {
        self.amount = amount;
        self.updated_at = Utc::now();
    }

    pub fn remaining(&self) -> Money {
        self.amount - self.spent
    }

    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if !self.amount.is_positive() {
            return Err(BudgetValidationError::NonPositiveLimit);
        }
        Ok(())
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {} of {} ({:.1}%)",
            self.period, self.category, self.spent, self.amount, self.percentage
        )
    }
}

/// Validation errors for budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    NonPositiveLimit,
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveLimit => write!(f, "Budget limit must be greater than zero"),
        }
    }
}

impl std::error::Error for BudgetValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn budget(amount: i64) -> Budget {
        Budget::new(
            HouseholdId::new(),
            ExpenseCategory::Groceries,
            Money::from_cents(amount),
            MonthPeriod::new(2025, 1).unwrap(),
        )
    }

    #[test]
    fn test_new_budget_has_no_spend() {
        let budget = budget(100000);
        assert_eq!(budget.spent, Money::zero());
        assert_eq!(budget.percentage, 0.0);
        assert_eq!(budget.remaining(), Money::from_cents(100000));
    }

    #[test]
    fn test_apply_spent() {
        let mut budget = budget(100000);
        budget.apply_spent(Money::from_cents(85000), 85.0);
        assert_eq!(budget.remaining(), Money::from_cents(15000));
        assert_eq!(budget.to_string(), "2025-01 Groceries: $850.00 of $1000.00 (85.0%)");
    }

    #[test]
    fn test_validation() {
        assert!(budget(1).validate().is_ok());
        assert_eq!(
            budget(0).validate(),
            Err(BudgetValidationError::NonPositiveLimit)
        );
    }
}
