//! Income repository (incomes.json)

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LedgerResult;
use crate::models::{HouseholdId, Income, IncomeId, MonthPeriod, UserId};

use super::file_io::{read_json, write_json_atomic};
use super::table::Table;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct IncomeData {
    #[serde(default)]
    incomes: Vec<Income>,
}

pub struct IncomeRepository {
    path: PathBuf,
    incomes: Table<IncomeId, Income>,
}

fn by_date(mut incomes: Vec<Income>) -> Vec<Income> {
    incomes.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
    incomes
}

impl IncomeRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            incomes: Table::new(),
        }
    }

    pub fn load(&self) -> LedgerResult<()> {
        let file_data: IncomeData = read_json(&self.path)?;
        debug!(count = file_data.incomes.len(), "loaded incomes");
        self.incomes.replace_all(file_data.incomes, |i| i.id)
    }

    pub fn save(&self) -> LedgerResult<()> {
        let incomes = by_date(self.incomes.all()?);
        write_json_atomic(&self.path, &IncomeData { incomes })
    }

    pub fn get(&self, id: IncomeId) -> LedgerResult<Option<Income>> {
        self.incomes.get(id)
    }

    pub fn upsert(&self, income: Income) -> LedgerResult<()> {
        self.incomes.upsert(income.id, income)?;
        Ok(())
    }

    pub fn delete(&self, id: IncomeId) -> LedgerResult<Option<Income>> {
        self.incomes.remove(id)
    }

    pub fn for_household(&self, household_id: HouseholdId) -> LedgerResult<Vec<Income>> {
        Ok(by_date(
            self.incomes.filter(|i| i.household_id == household_id)?,
        ))
    }

    /// Every income of a household dated inside `period`
    pub fn for_household_in(
        &self,
        household_id: HouseholdId,
        period: MonthPeriod,
    ) -> LedgerResult<Vec<Income>> {
        Ok(by_date(self.incomes.filter(|i| {
            i.household_id == household_id && period.contains(i.date)
        })?))
    }

    pub fn for_user_in(&self, user_id: UserId, period: MonthPeriod) -> LedgerResult<Vec<Income>> {
        Ok(by_date(
            self.incomes
                .filter(|i| i.user_id == user_id && period.contains(i.date))?,
        ))
    }

    /// Incomes still carrying a recurrence; each chain has exactly one
    pub fn recurring(&self) -> LedgerResult<Vec<Income>> {
        Ok(by_date(self.incomes.filter(|i| i.is_recurring())?))
    }
}
