//! Budget repository (budgets.json)

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LedgerResult;
use crate::models::{Budget, BudgetId, ExpenseCategory, HouseholdId, MonthPeriod};

use super::file_io::{read_json, write_json_atomic};
use super::table::Table;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct BudgetData {
    #[serde(default)]
    budgets: Vec<Budget>,
}

pub struct BudgetRepository {
    path: PathBuf,
    budgets: Table<BudgetId, Budget>,
}

impl BudgetRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            budgets: Table::new(),
        }
    }

    pub fn load(&self) -> LedgerResult<()> {
        let file_data: BudgetData = read_json(&self.path)?;
        debug!(count = file_data.budgets.len(), "loaded budgets");
        self.budgets.replace_all(file_data.budgets, |b| b.id)
    }

    pub fn save(&self) -> LedgerResult<()> {
        let mut budgets = self.budgets.all()?;
        budgets.sort_by(|a, b| {
            a.period
                .cmp(&b.period)
                .then(a.category.to_string().cmp(&b.category.to_string()))
        });
        write_json_atomic(&self.path, &BudgetData { budgets })
    }

    pub fn get(&self, id: BudgetId) -> LedgerResult<Option<Budget>> {
        self.budgets.get(id)
    }

    pub fn upsert(&self, budget: Budget) -> LedgerResult<()> {
        self.budgets.upsert(budget.id, budget)?;
        Ok(())
    }

    pub fn delete(&self, id: BudgetId) -> LedgerResult<Option<Budget>> {
        self.budgets.remove(id)
    }

    /// The budget for one (household, category, month), if any
    pub fn find(
        &self,
        household_id: HouseholdId,
        category: ExpenseCategory,
        period: MonthPeriod,
    ) -> LedgerResult<Option<Budget>> {
        self.budgets.find(|b| {
            b.household_id == household_id && b.category == category && b.period == period
        })
    }

    pub fn for_household_in(
        &self,
        household_id: HouseholdId,
        period: MonthPeriod,
    ) -> LedgerResult<Vec<Budget>> {
        let mut budgets = self
            .budgets
            .filter(|b| b.household_id == household_id && b.period == period)?;
        budgets.sort_by_key(|b| b.category.to_string());
        Ok(budgets)
    }

    pub fn for_household(&self, household_id: HouseholdId) -> LedgerResult<Vec<Budget>> {
        let mut budgets = self.budgets.filter(|b| b.household_id == household_id)?;
        budgets.sort_by_key(|b| (b.period, b.category.to_string()));
        Ok(budgets)
    }
}
