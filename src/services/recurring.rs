//! Periodic job
//!
//! Brings recurring incomes and expenses and stepped installment chains up
//! to date. Running it twice for the same day creates nothing the second
//! time: each recurrence is anchored on its last materialized occurrence.

use chrono::NaiveDate;
use tracing::{debug, info};

use super::budget::BudgetService;
use super::notification::Notifier;
use crate::audit::EntityType;
use crate::engine::billing;
use crate::engine::date_cycle::next_recurring_date;
use crate::error::LedgerResult;
use crate::models::{Expense, ExpenseCategory, HouseholdId, Income, Installment, MonthPeriod};
use crate::storage::Storage;

/// What one run created
#[derive(Debug, Clone, Default)]
pub struct JobReport {
    pub incomes: Vec<Income>,
    pub expenses: Vec<Expense>,
    pub installments: Vec<Installment>,
    /// Budgets recomputed because a generated expense landed in them
    pub budgets_refreshed: usize,
}

impl JobReport {
    pub fn is_empty(&self) -> bool {
        self.incomes.is_empty() && self.expenses.is_empty() && self.installments.is_empty()
    }
}

pub struct RecurringService<'a> {
    storage: &'a Storage,
}

impl<'a> RecurringService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Materialize everything that has fallen due on or before `today`
    pub fn run(&self, today: NaiveDate, notifier: &dyn Notifier) -> LedgerResult<JobReport> {
        let mut report = JobReport {
            incomes: self.roll_incomes(today)?,
            expenses: self.roll_expenses(today)?,
            installments: self.roll_installments(today)?,
            budgets_refreshed: 0,
        };

        let mut touched: Vec<(HouseholdId, ExpenseCategory, MonthPeriod)> = Vec::new();
        for expense in &report.expenses {
            let key = (expense.household_id, expense.category, MonthPeriod::of(expense.date));
            if !touched.contains(&key) {
                touched.push(key);
            }
        }
        let budgets = BudgetService::new(self.storage);
        for (household_id, category, period) in touched {
            if budgets.refresh(household_id, category, period, notifier)?.is_some() {
                report.budgets_refreshed += 1;
            }
        }

        info!(
            incomes = report.incomes.len(),
            expenses = report.expenses.len(),
            installments = report.installments.len(),
            budgets = report.budgets_refreshed,
            %today,
            "periodic job finished"
        );
        Ok(report)
    }

    fn roll_incomes(&self, today: NaiveDate) -> LedgerResult<Vec<Income>> {
        let mut created = Vec::new();

        for mut current in self.storage.incomes.recurring()? {
            let mut generated = Vec::new();
            while let Some(recurrence) = current.recurrence {
                let next_date = next_recurring_date(recurrence.last_occurrence, recurrence.frequency);
                if next_date > today {
                    break;
                }
                let next = current.next_occurrence(next_date);
                self.storage.incomes.upsert(current)?;
                generated.push(next.clone());
                current = next;
            }
            self.storage.incomes.upsert(current)?;
            created.extend(generated);
        }

        if !created.is_empty() {
            self.storage.incomes.save()?;
            for income in &created {
                self.storage.log_create(
                    EntityType::Income,
                    income.id.to_string(),
                    Some(income.description.clone()),
                    income,
                )?;
            }
            debug!(count = created.len(), "generated recurring incomes");
        }
        Ok(created)
    }

    fn roll_expenses(&self, today: NaiveDate) -> LedgerResult<Vec<Expense>> {
        let mut created = Vec::new();

        for mut current in self.storage.expenses.recurring()? {
            let mut generated = Vec::new();
            while let Some(recurrence) = current.recurrence {
                let next_date = next_recurring_date(recurrence.last_occurrence, recurrence.frequency);
                if next_date > today {
                    break;
                }
                let next = current.next_occurrence(next_date);
                self.storage.expenses.upsert(current)?;
                generated.push(next.clone());
                current = next;
            }
            self.storage.expenses.upsert(current)?;
            created.extend(generated);
        }

        if !created.is_empty() {
            self.storage.expenses.save()?;
            for expense in &created {
                self.storage.log_create(
                    EntityType::Expense,
                    expense.id.to_string(),
                    Some(expense.description.clone()),
                    expense,
                )?;
            }
            debug!(count = created.len(), "generated recurring expenses");
        }
        Ok(created)
    }

    fn roll_installments(&self, today: NaiveDate) -> LedgerResult<Vec<Installment>> {
        let mut created = Vec::new();

        for expense in self.storage.expenses.stepped_installment_expenses()? {
            let Some(mut last) = self.storage.expenses.last_installment(expense.id)? else {
                continue;
            };
            while billing::should_roll_forward(&last, today) {
                let next = billing::next_in_chain(&last);
                self.storage.expenses.upsert_installment(next.clone())?;
                created.push(next.clone());
                last = next;
            }
        }

        if !created.is_empty() {
            self.storage.expenses.save()?;
            for installment in &created {
                self.storage.log_create(
                    EntityType::Installment,
                    installment.id.to_string(),
                    Some(format!(
                        "{}/{}",
                        installment.number, installment.total_installments
                    )),
                    installment,
                )?;
            }
            debug!(count = created.len(), "rolled installment chains forward");
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::models::{
        Frequency, InstallmentPlan, Money, NotificationType, SplitMethod, UserId,
    };
    use crate::services::expense::{ExpenseService, NewExpense};
    use crate::services::notification::tests::RecordingNotifier;
    use crate::services::{BudgetService, HouseholdService, IncomeService, UserService};
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn money(units: i64) -> Money {
        Money::from_units_cents(units, 0)
    }

    fn setup() -> (TempDir, Storage, UserId) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        let ana = UserService::new(&storage).register("Ana", "").unwrap().id;
        HouseholdService::new(&storage)
            .create(ana, "Home", SplitMethod::FiftyFifty, None)
            .unwrap();
        (temp_dir, storage, ana)
    }

    #[test]
    fn test_recurring_income_catches_up() {
        let (_dir, storage, ana) = setup();
        IncomeService::new(&storage)
            .record(ana, "Salary", money(3000), date(2025, 1, 31), Some(Frequency::Monthly))
            .unwrap();
        let notifier = RecordingNotifier::default();
        let job = RecurringService::new(&storage);

        let report = job.run(date(2025, 3, 31), &notifier).unwrap();
        let dates: Vec<_> = report.incomes.iter().map(|i| i.date).collect();
        // native rollover: Jan 31 + 1 month is Mar 3
        assert_eq!(dates, vec![date(2025, 3, 3)]);

        let report = job.run(date(2025, 4, 3), &notifier).unwrap();
        assert_eq!(report.incomes[0].date, date(2025, 4, 3));

        assert!(job.run(date(2025, 4, 3), &notifier).unwrap().is_empty());
        assert_eq!(storage.incomes.recurring().unwrap().len(), 1);
    }

    #[test]
    fn test_weekly_expense_refreshes_budget() {
        let (_dir, storage, ana) = setup();
        let notifier = RecordingNotifier::default();
        BudgetService::new(&storage)
            .create(ana, ExpenseCategory::Leisure, money(100), MonthPeriod::new(2025, 3).unwrap(), &notifier)
            .unwrap();

        let mut input = NewExpense::new("Climbing", money(30), ExpenseCategory::Leisure, date(2025, 3, 1));
        input.frequency = Some(Frequency::Weekly);
        ExpenseService::new(&storage).create(ana, input, &notifier).unwrap();

        let report = RecurringService::new(&storage)
            .run(date(2025, 3, 15), &notifier)
            .unwrap();
        assert_eq!(report.expenses.len(), 2);
        assert_eq!(report.budgets_refreshed, 1);

        let budget = storage
            .budgets
            .find(report.expenses[0].household_id, ExpenseCategory::Leisure, MonthPeriod::new(2025, 3).unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(budget.spent, money(90));
        assert!(notifier
            .sent
            .borrow()
            .iter()
            .any(|p| p.notification_type == NotificationType::BudgetWarning));
    }

    #[test]
    fn test_stepped_chain_rolls_forward() {
        let (_dir, storage, ana) = setup();
        let notifier = RecordingNotifier::default();
        let mut input = NewExpense::new("Sofa", money(400), ExpenseCategory::Housing, date(2025, 1, 5));
        input.installments = Some(InstallmentPlan {
            total_installments: 4,
            first_due_date: Some(date(2025, 1, 10)),
            stepped: true,
        });
        let outcome = ExpenseService::new(&storage).create(ana, input, &notifier).unwrap();
        assert_eq!(outcome.installments.len(), 1);

        let job = RecurringService::new(&storage);
        assert!(job.run(date(2025, 1, 9), &notifier).unwrap().installments.is_empty());

        let report = job.run(date(2025, 2, 10), &notifier).unwrap();
        let numbers: Vec<_> = report.installments.iter().map(|i| i.number).collect();
        assert_eq!(numbers, vec![2, 3]);
        assert_eq!(report.installments[1].due_date, date(2025, 3, 10));

        let report = job.run(date(2026, 1, 1), &notifier).unwrap();
        assert_eq!(report.installments.len(), 1);
        let chain = storage.expenses.installments_for(outcome.expense.id).unwrap();
        assert_eq!(chain.len(), 4);
        assert!(chain.iter().all(|i| i.amount == money(100)));
    }
}
