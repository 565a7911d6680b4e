//! Budget service
//!
//! Category budgets per calendar month. `spent` and `percentage` are
//! recomputed from the month's expenses on every create, update and
//! refresh, and each recomputation re-evaluates the warning bands.

use tracing::{info, warn};

use super::household::{member_ids, membership};
use super::notification::{dispatch_all, Notifier};
use crate::audit::EntityType;
use crate::engine::threshold::{self, Progress};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Budget, BudgetId, ExpenseCategory, HouseholdId, Money, MonthPeriod, UserId};
use crate::storage::Storage;

/// A budget after recomputation
#[derive(Debug, Clone)]
pub struct BudgetOutcome {
    pub budget: Budget,
    pub progress: Progress,
    /// Notifications dispatched by this recomputation
    pub notified: usize,
}

pub struct BudgetService<'a> {
    storage: &'a Storage,
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Recompute spent and percentage in place
    fn measure(&self, budget: &mut Budget) -> LedgerResult<Progress> {
        let spent = self
            .storage
            .expenses
            .sum_for_category(budget.household_id, budget.category, budget.period)?;
        let progress = threshold::evaluate(spent, budget.amount)?;
        budget.apply_spent(spent, progress.percentage);
        Ok(progress)
    }

    /// Notify every member on WARNING or CRITICAL; the budget must already be
    /// saved
    fn notify(&self, budget: &Budget, progress: &Progress, notifier: &dyn Notifier) -> LedgerResult<usize> {
        let members = member_ids(self.storage, budget.household_id)?;
        let payloads = threshold::budget_notifications(budget, progress, &members);
        let notified = dispatch_all(notifier, &payloads)?;
        if notified > 0 {
            info!(budget = %budget.id, band = ?progress.band, "budget threshold reached");
        }
        Ok(notified)
    }

    fn owned(&self, household_id: HouseholdId, id: BudgetId) -> LedgerResult<Budget> {
        self.storage
            .budgets
            .get(id)?
            .filter(|b| b.household_id == household_id)
            .ok_or_else(|| LedgerError::budget_not_found(id.to_string()))
    }

    /// Create the budget for one category and month
    pub fn create(
        &self,
        user_id: UserId,
        category: ExpenseCategory,
        amount: Money,
        period: MonthPeriod,
        notifier: &dyn Notifier,
    ) -> LedgerResult<BudgetOutcome> {
        let (_, household) = membership(self.storage, user_id)?;

        if self
            .storage
            .budgets
            .find(household.id, category, period)?
            .is_some()
        {
            warn!(household = %household.id, %category, %period, "refused duplicate budget");
            return Err(LedgerError::Duplicate {
                entity_type: "Budget",
                identifier: format!("{} {}", category, period),
            });
        }

        let mut budget = Budget::new(household.id, category, amount, period);
        budget
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let progress = self.measure(&mut budget)?;
        self.storage.budgets.upsert(budget.clone())?;
        self.storage.budgets.save()?;

        self.storage.log_create(
            EntityType::Budget,
            budget.id.to_string(),
            Some(format!("{} {}", budget.category, budget.period)),
            &budget,
        )?;
        info!(budget = %budget.id, limit = %budget.amount, "created budget");
        let notified = self.notify(&budget, &progress, notifier)?;

        Ok(BudgetOutcome {
            budget,
            progress,
            notified,
        })
    }

    /// The household's budgets for a month
    pub fn list(&self, user_id: UserId, period: MonthPeriod) -> LedgerResult<Vec<Budget>> {
        let (_, household) = membership(self.storage, user_id)?;
        self.storage.budgets.for_household_in(household.id, period)
    }

    /// Find a budget of the caller's household by category and month
    pub fn find(
        &self,
        user_id: UserId,
        category: ExpenseCategory,
        period: MonthPeriod,
    ) -> LedgerResult<Budget> {
        let (_, household) = membership(self.storage, user_id)?;
        self.storage
            .budgets
            .find(household.id, category, period)?
            .ok_or_else(|| LedgerError::budget_not_found(format!("{} {}", category, period)))
    }

    /// Change the limit and recompute
    pub fn update_amount(
        &self,
        user_id: UserId,
        id: BudgetId,
        amount: Money,
        notifier: &dyn Notifier,
    ) -> LedgerResult<BudgetOutcome> {
        let (_, household) = membership(self.storage, user_id)?;
        let before = self.owned(household.id, id)?;

        let mut budget = before.clone();
        budget.set_amount(amount);
        budget
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let progress = self.measure(&mut budget)?;
        self.storage.budgets.upsert(budget.clone())?;
        self.storage.budgets.save()?;

        self.storage.log_update(
            EntityType::Budget,
            budget.id.to_string(),
            Some(format!("{} {}", budget.category, budget.period)),
            &before,
            &budget,
        )?;
        info!(budget = %budget.id, limit = %budget.amount, "updated budget");
        let notified = self.notify(&budget, &progress, notifier)?;

        Ok(BudgetOutcome {
            budget,
            progress,
            notified,
        })
    }

    pub fn delete(&self, user_id: UserId, id: BudgetId) -> LedgerResult<Budget> {
        let (_, household) = membership(self.storage, user_id)?;
        let budget = self.owned(household.id, id)?;

        self.storage.budgets.delete(id)?;
        self.storage.budgets.save()?;

        self.storage.log_delete(
            EntityType::Budget,
            budget.id.to_string(),
            Some(format!("{} {}", budget.category, budget.period)),
            &budget,
        )?;
        info!(budget = %id, "deleted budget");

        Ok(budget)
    }

    /// Recompute the budget matching an expense's household, category and
    /// month, if one exists
    pub fn refresh(
        &self,
        household_id: HouseholdId,
        category: ExpenseCategory,
        period: MonthPeriod,
        notifier: &dyn Notifier,
    ) -> LedgerResult<Option<BudgetOutcome>> {
        let Some(before) = self.storage.budgets.find(household_id, category, period)? else {
            return Ok(None);
        };

        let mut budget = before.clone();
        let progress = self.measure(&mut budget)?;
        self.storage.budgets.upsert(budget.clone())?;
        self.storage.budgets.save()?;

        self.storage.log_update(
            EntityType::Budget,
            budget.id.to_string(),
            Some(format!("{} {}", budget.category, budget.period)),
            &before,
            &budget,
        )?;
        let notified = self.notify(&budget, &progress, notifier)?;

        Ok(Some(BudgetOutcome {
            budget,
            progress,
            notified,
        }))
    }
}
