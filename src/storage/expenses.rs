//! Expense and installment repository (expenses.json)
//!
//! Installments live in the same file as their parent expenses so a
//! purchase and its schedule, or a deletion and its cascade, land in one
//! write.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LedgerResult;
use crate::models::{
    CreditCardId, Expense, ExpenseCategory, ExpenseId, HouseholdId, Installment, InstallmentId,
    Money, MonthPeriod,
};

use super::file_io::{read_json, write_json_atomic};
use super::table::Table;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ExpenseData {
    #[serde(default)]
    expenses: Vec<Expense>,
    #[serde(default)]
    installments: Vec<Installment>,
}

pub struct ExpenseRepository {
    path: PathBuf,
    expenses: Table<ExpenseId, Expense>,
    installments: Table<InstallmentId, Installment>,
}

fn by_date(mut expenses: Vec<Expense>) -> Vec<Expense> {
    expenses.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
    expenses
}

fn by_due_date(mut installments: Vec<Installment>) -> Vec<Installment> {
    installments.sort_by(|a, b| {
        a.due_date
            .cmp(&b.due_date)
            .then(a.expense_id.cmp(&b.expense_id))
            .then(a.number.cmp(&b.number))
    });
    installments
}

impl ExpenseRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            expenses: Table::new(),
            installments: Table::new(),
        }
    }

    pub fn load(&self) -> LedgerResult<()> {
        let file_data: ExpenseData = read_json(&self.path)?;
        debug!(
            expenses = file_data.expenses.len(),
            installments = file_data.installments.len(),
            "loaded expenses"
        );
        self.expenses.replace_all(file_data.expenses, |e| e.id)?;
        self.installments
            .replace_all(file_data.installments, |i| i.id)?;
        Ok(())
    }

    pub fn save(&self) -> LedgerResult<()> {
        let expenses = by_date(self.expenses.all()?);
        let installments = by_due_date(self.installments.all()?);
        write_json_atomic(
            &self.path,
            &ExpenseData {
                expenses,
                installments,
            },
        )
    }

    pub fn get(&self, id: ExpenseId) -> LedgerResult<Option<Expense>> {
        self.expenses.get(id)
    }

    pub fn upsert(&self, expense: Expense) -> LedgerResult<()> {
        self.expenses.upsert(expense.id, expense)?;
        Ok(())
    }

    /// Insert an expense with its installment set
    pub fn insert_with_installments(
        &self,
        expense: Expense,
        installments: Vec<Installment>,
    ) -> LedgerResult<()> {
        for installment in installments {
            self.installments.upsert(installment.id, installment)?;
        }
        self.expenses.upsert(expense.id, expense)?;
        Ok(())
    }

    /// Remove an expense and every installment belonging to it
    pub fn delete_with_installments(
        &self,
        id: ExpenseId,
    ) -> LedgerResult<Option<(Expense, Vec<Installment>)>> {
        let Some(expense) = self.expenses.remove(id)? else {
            return Ok(None);
        };
        let installments = self.installments.remove_where(|i| i.expense_id == id)?;
        Ok(Some((expense, installments)))
    }

    pub fn for_household(&self, household_id: HouseholdId) -> LedgerResult<Vec<Expense>> {
        Ok(by_date(
            self.expenses.filter(|e| e.household_id == household_id)?,
        ))
    }

    pub fn for_household_in(
        &self,
        household_id: HouseholdId,
        period: MonthPeriod,
    ) -> LedgerResult<Vec<Expense>> {
        Ok(by_date(self.expenses.filter(|e| {
            e.household_id == household_id && period.contains(e.date)
        })?))
    }

    /// Total spent by a household on one category during `period`
    pub fn sum_for_category(
        &self,
        household_id: HouseholdId,
        category: ExpenseCategory,
        period: MonthPeriod,
    ) -> LedgerResult<Money> {
        Ok(self
            .expenses
            .filter(|e| {
                e.household_id == household_id
                    && e.category == category
                    && period.contains(e.date)
            })?
            .iter()
            .map(|e| e.amount)
            .sum())
    }

    pub fn recurring(&self) -> LedgerResult<Vec<Expense>> {
        Ok(by_date(self.expenses.filter(|e| e.is_recurring())?))
    }

    /// Installment expenses whose schedule is stepped forward by the periodic job
    pub fn stepped_installment_expenses(&self) -> LedgerResult<Vec<Expense>> {
        Ok(by_date(self.expenses.filter(|e| {
            e.credit_card_id.is_none() && e.installments.is_some_and(|plan| plan.stepped)
        })?))
    }

    pub fn get_installment(&self, id: InstallmentId) -> LedgerResult<Option<Installment>> {
        self.installments.get(id)
    }

    pub fn upsert_installment(&self, installment: Installment) -> LedgerResult<()> {
        self.installments.upsert(installment.id, installment)?;
        Ok(())
    }

    /// Installments of one expense ordered by number
    pub fn installments_for(&self, expense_id: ExpenseId) -> LedgerResult<Vec<Installment>> {
        let mut installments = self.installments.filter(|i| i.expense_id == expense_id)?;
        installments.sort_by_key(|i| i.number);
        Ok(installments)
    }

    /// The highest-numbered installment materialized so far for an expense
    pub fn last_installment(&self, expense_id: ExpenseId) -> LedgerResult<Option<Installment>> {
        Ok(self.installments_for(expense_id)?.pop())
    }

    /// Installments of every purchase made with `card_id`
    pub fn installments_for_card(&self, card_id: CreditCardId) -> LedgerResult<Vec<Installment>> {
        let expense_ids: HashSet<ExpenseId> = self
            .expenses
            .filter(|e| e.credit_card_id == Some(card_id))?
            .into_iter()
            .map(|e| e.id)
            .collect();
        Ok(by_due_date(
            self.installments
                .filter(|i| expense_ids.contains(&i.expense_id))?,
        ))
    }

    pub fn installments_for_household(
        &self,
        household_id: HouseholdId,
    ) -> LedgerResult<Vec<Installment>> {
        let expense_ids: HashSet<ExpenseId> = self
            .for_household(household_id)?
            .into_iter()
            .map(|e| e.id)
            .collect();
        Ok(by_due_date(
            self.installments
                .filter(|i| expense_ids.contains(&i.expense_id))?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserId;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_repo() -> (TempDir, ExpenseRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = ExpenseRepository::new(temp_dir.path().join("expenses.json"));
        (temp_dir, repo)
    }

    fn expense(household: HouseholdId, category: ExpenseCategory, cents: i64, on: NaiveDate) -> Expense {
        Expense::new(household, UserId::new(), "Item", Money::from_cents(cents), category, on)
    }

    #[test]
    fn test_sum_for_category() {
        let (_temp, repo) = create_test_repo();
        let household = HouseholdId::new();
        repo.upsert(expense(household, ExpenseCategory::Groceries, 1000, date(2025, 3, 1)))
            .unwrap();
        repo.upsert(expense(household, ExpenseCategory::Groceries, 2500, date(2025, 3, 31)))
            .unwrap();
        repo.upsert(expense(household, ExpenseCategory::Groceries, 9999, date(2025, 4, 1)))
            .unwrap();
        repo.upsert(expense(household, ExpenseCategory::Leisure, 700, date(2025, 3, 10)))
            .unwrap();
        repo.upsert(expense(HouseholdId::new(), ExpenseCategory::Groceries, 700, date(2025, 3, 10)))
            .unwrap();

        let march = MonthPeriod::new(2025, 3).unwrap();
        assert_eq!(
            repo.sum_for_category(household, ExpenseCategory::Groceries, march)
                .unwrap(),
            Money::from_cents(3500)
        );
        assert_eq!(repo.for_household_in(household, march).unwrap().len(), 3);
    }

    #[test]
    fn test_delete_cascades_to_installments() {
        let (temp_dir, repo) = create_test_repo();
        let household = HouseholdId::new();
        let parent = expense(household, ExpenseCategory::Other, 3000, date(2025, 3, 1));
        let other = expense(household, ExpenseCategory::Other, 1000, date(2025, 3, 1));

        let installments: Vec<Installment> = (1..=3)
            .map(|n| Installment::new(parent.id, n, 3, Money::from_cents(1000), date(2025, 3 + n, 10)))
            .collect();
        repo.insert_with_installments(parent.clone(), installments)
            .unwrap();
        repo.insert_with_installments(
            other.clone(),
            vec![Installment::new(other.id, 1, 1, Money::from_cents(1000), date(2025, 4, 10))],
        )
        .unwrap();
        repo.save().unwrap();

        let (removed, cascade) = repo.delete_with_installments(parent.id).unwrap().unwrap();
        assert_eq!(removed.id, parent.id);
        assert_eq!(cascade.len(), 3);
        repo.save().unwrap();

        let reloaded = ExpenseRepository::new(temp_dir.path().join("expenses.json"));
        reloaded.load().unwrap();
        assert!(reloaded.get(parent.id).unwrap().is_none());
        assert!(reloaded.installments_for(parent.id).unwrap().is_empty());
        assert_eq!(reloaded.installments_for(other.id).unwrap().len(), 1);
        assert!(repo.delete_with_installments(parent.id).unwrap().is_none());
    }

    #[test]
    fn test_installments_for_card() {
        let (_temp, repo) = create_test_repo();
        let card = CreditCardId::new();
        let mut purchase = expense(HouseholdId::new(), ExpenseCategory::Other, 2000, date(2025, 3, 1));
        purchase.credit_card_id = Some(card);

        let installments = vec![
            Installment::new(purchase.id, 2, 2, Money::from_cents(1000), date(2025, 5, 10)),
            Installment::new(purchase.id, 1, 2, Money::from_cents(1000), date(2025, 4, 10)),
        ];
        repo.insert_with_installments(purchase.clone(), installments)
            .unwrap();

        let on_card = repo.installments_for_card(card).unwrap();
        assert_eq!(on_card.len(), 2);
        assert_eq!(on_card[0].number, 1);
        assert!(repo.installments_for_card(CreditCardId::new()).unwrap().is_empty());
        assert_eq!(repo.last_installment(purchase.id).unwrap().unwrap().number, 2);
    }
}
