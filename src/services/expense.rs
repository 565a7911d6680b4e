//! Expense service
//!
//! Records household expenses, generates installment schedules for
//! financed ones and keeps the matching category budget current.

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use super::budget::{BudgetOutcome, BudgetService};
use super::household::{member_ids, membership};
use super::notification::Notifier;
use crate::audit::EntityType;
use crate::engine::billing::{self, InstallmentRounding, ScheduledInstallment};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    CreditCard, CreditCardId, Expense, ExpenseCategory, ExpenseId, Frequency, HouseholdId,
    Installment, InstallmentPlan, Money, MonthPeriod, PaymentMethod, Recurrence, UserId,
};
use crate::storage::Storage;

/// Input for recording an expense
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub description: String,
    pub amount: Money,
    pub category: ExpenseCategory,
    pub date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub credit_card_id: Option<CreditCardId>,
    pub is_individual: bool,
    /// Owner of an individual expense; the creator when not given
    pub individual_user_id: Option<UserId>,
    pub installments: Option<InstallmentPlan>,
    pub frequency: Option<Frequency>,
}

impl NewExpense {
    pub fn new(
        description: impl Into<String>,
        amount: Money,
        category: ExpenseCategory,
        date: NaiveDate,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            category,
            date,
            payment_method: PaymentMethod::default(),
            credit_card_id: None,
            is_individual: false,
            individual_user_id: None,
            installments: None,
            frequency: None,
        }
    }
}

/// Changes to an existing expense; `None` keeps the current value
///
/// The installment plan itself is never changed here.
#[derive(Debug, Clone, Default)]
pub struct ExpenseUpdate {
    pub description: Option<String>,
    pub amount: Option<Money>,
    pub category: Option<ExpenseCategory>,
    pub date: Option<NaiveDate>,
    pub payment_method: Option<PaymentMethod>,
    pub credit_card_id: Option<CreditCardId>,
    /// `true` charges the expense to the editor alone, `false` shares it
    pub is_individual: Option<bool>,
}

impl ExpenseUpdate {
    fn touches_schedule(&self) -> bool {
        self.amount.is_some()
            || self.date.is_some()
            || self.payment_method.is_some()
            || self.credit_card_id.is_some()
    }
}

/// An edited expense and every budget it was recomputed into
#[derive(Debug, Clone)]
pub struct ExpenseUpdateOutcome {
    pub expense: Expense,
    pub budgets: Vec<BudgetOutcome>,
}

/// A recorded expense with its schedule and the budget it touched
#[derive(Debug, Clone)]
pub struct ExpenseOutcome {
    pub expense: Expense,
    pub installments: Vec<Installment>,
    pub budget: Option<BudgetOutcome>,
}

pub struct ExpenseService<'a> {
    storage: &'a Storage,
    rounding: InstallmentRounding,
}

pub(crate) fn materialize(expense_id: ExpenseId, total: u32, schedule: Vec<ScheduledInstallment>) -> Vec<Installment> {
    schedule
        .into_iter()
        .map(|s| Installment::new(expense_id, s.number, total, s.amount, s.due_date))
        .collect()
}

impl<'a> ExpenseService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            rounding: InstallmentRounding::default(),
        }
    }

    pub fn with_rounding(mut self, rounding: InstallmentRounding) -> Self {
        self.rounding = rounding;
        self
    }

    /// An active card owned by `user_id`
    pub(crate) fn usable_card(&self, user_id: UserId, card_id: CreditCardId) -> LedgerResult<CreditCard> {
        let card = self
            .storage
            .cards
            .get(card_id)?
            .filter(|c| c.is_active)
            .ok_or_else(|| LedgerError::card_not_found(card_id.to_string()))?;

        if card.user_id != user_id {
            warn!(card = %card_id, user = %user_id, "refused use of another member's card");
            return Err(LedgerError::Forbidden(
                "credit card belongs to another user".into(),
            ));
        }
        Ok(card)
    }

    fn schedule(&self, expense: &Expense, card: Option<&CreditCard>) -> LedgerResult<Vec<Installment>> {
        let Some(plan) = expense.installments else {
            return Ok(Vec::new());
        };
        let n = plan.total_installments;

        let schedule = match (card, plan.first_due_date) {
            (Some(card), _) => billing::schedule_installments(
                expense.date,
                expense.amount,
                n,
                card.closing_day,
                card.due_day,
                self.rounding,
            )?,
            (None, Some(first_due)) => {
                billing::schedule_from_first_due(first_due, expense.amount, n, self.rounding)?
            }
            (None, None) => {
                return Err(LedgerError::Validation(
                    "Installment expenses need a first due date".into(),
                ))
            }
        };

        let mut installments = materialize(expense.id, n, schedule);
        if plan.stepped && card.is_none() {
            installments.truncate(1);
        }
        Ok(installments)
    }

    /// Record an expense for the caller's household
    ///
    /// The installment set is written in the same save as the expense. The
    /// budget for the expense's category and month is refreshed afterwards.
    pub fn create(
        &self,
        user_id: UserId,
        input: NewExpense,
        notifier: &dyn Notifier,
    ) -> LedgerResult<ExpenseOutcome> {
        let (user, household) = membership(self.storage, user_id)?;

        let mut expense = Expense::new(
            household.id,
            user.id,
            input.description.trim(),
            input.amount,
            input.category,
            input.date,
        );
        expense.payment_method = input.payment_method;
        expense.credit_card_id = input.credit_card_id;
        expense.installments = input.installments;
        expense.recurrence = input.frequency.map(|f| Recurrence::new(f, input.date));

        if input.is_individual || input.individual_user_id.is_some() {
            let owner = input.individual_user_id.unwrap_or(user.id);
            if !member_ids(self.storage, household.id)?.contains(&owner) {
                return Err(LedgerError::Validation(
                    "An individual expense must belong to a household member".into(),
                ));
            }
            expense.make_individual(owner);
        }

        expense
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let card = match expense.credit_card_id {
            Some(card_id) => Some(self.usable_card(user.id, card_id)?),
            None => None,
        };

        let installments = self.schedule(&expense, card.as_ref())?;
        self.storage
            .expenses
            .insert_with_installments(expense.clone(), installments.clone())?;
        self.storage.expenses.save()?;

        self.storage.log_create(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.description.clone()),
            &expense,
        )?;
        info!(
            expense = %expense.id,
            amount = %expense.amount,
            installments = installments.len(),
            "recorded expense"
        );

        let budget = BudgetService::new(self.storage).refresh(
            household.id,
            expense.category,
            MonthPeriod::of(expense.date),
            notifier,
        )?;

        Ok(ExpenseOutcome {
            expense,
            installments,
            budget,
        })
    }

    fn owned(&self, household_id: HouseholdId, id: ExpenseId) -> LedgerResult<Expense> {
        self.storage
            .expenses
            .get(id)?
            .filter(|e| e.household_id == household_id)
            .ok_or_else(|| LedgerError::expense_not_found(id.to_string()))
    }

    pub fn get(&self, user_id: UserId, id: ExpenseId) -> LedgerResult<Expense> {
        let (_, household) = membership(self.storage, user_id)?;
        self.owned(household.id, id)
    }

    /// Find an expense of the caller's household by short or full ID
    pub fn find(&self, user_id: UserId, identifier: &str) -> LedgerResult<Option<Expense>> {
        let (_, household) = membership(self.storage, user_id)?;
        let needle = identifier.trim().to_lowercase();
        let expenses = self.storage.expenses.for_household(household.id)?;
        if let Some(found) = expenses.iter().find(|e| e.id.to_string() == needle) {
            return Ok(Some(found.clone()));
        }
        match identifier.parse::<ExpenseId>() {
            Ok(id) => Ok(expenses.into_iter().find(|e| e.id == id)),
            Err(_) => Ok(None),
        }
    }

    /// A month's expenses, newest first, optionally for one category
    pub fn list_for_month(
        &self,
        user_id: UserId,
        period: MonthPeriod,
        category: Option<ExpenseCategory>,
    ) -> LedgerResult<Vec<Expense>> {
        let (_, household) = membership(self.storage, user_id)?;
        let mut expenses = self.storage.expenses.for_household_in(household.id, period)?;
        if let Some(category) = category {
            expenses.retain(|e| e.category == category);
        }
        expenses.reverse();
        Ok(expenses)
    }

    pub fn installments(&self, user_id: UserId, id: ExpenseId) -> LedgerResult<Vec<Installment>> {
        let expense = self.get(user_id, id)?;
        self.storage.expenses.installments_for(expense.id)
    }

    /// Edit one of the caller's expenses
    ///
    /// Amount, date and payment of an installment expense are fixed by its
    /// schedule and refused here. The budgets of both the previous and the new
    /// category and month are refreshed.
    pub fn update(
        &self,
        user_id: UserId,
        id: ExpenseId,
        changes: ExpenseUpdate,
        notifier: &dyn Notifier,
    ) -> LedgerResult<ExpenseUpdateOutcome> {
        let (user, household) = membership(self.storage, user_id)?;
        let before = self.owned(household.id, id)?;

        if before.created_by != user.id {
            warn!(expense = %id, user = %user.id, "refused edit of another member's expense");
            return Err(LedgerError::Forbidden(
                "only the member who recorded an expense may edit it".into(),
            ));
        }
        if before.is_installment() && changes.touches_schedule() {
            return Err(LedgerError::Validation(
                "Amount, date and payment of an installment expense cannot be changed".into(),
            ));
        }
        if changes.payment_method == Some(PaymentMethod::CreditCard)
            && changes.credit_card_id.is_none()
        {
            return Err(LedgerError::Validation(
                "A credit card is required when paying by credit card".into(),
            ));
        }

        let mut expense = before.clone();
        if let Some(description) = changes.description {
            expense.description = description.trim().to_string();
        }
        if let Some(amount) = changes.amount {
            expense.amount = amount;
        }
        if let Some(category) = changes.category {
            expense.category = category;
        }
        if let Some(date) = changes.date {
            expense.date = date;
        }
        if let Some(method) = changes.payment_method {
            expense.payment_method = method;
            if method != PaymentMethod::CreditCard {
                expense.credit_card_id = None;
            }
        }
        if let Some(card_id) = changes.credit_card_id {
            self.usable_card(user.id, card_id)?;
            expense.credit_card_id = Some(card_id);
            expense.payment_method = PaymentMethod::CreditCard;
        }
        match changes.is_individual {
            Some(true) => expense.make_individual(user.id),
            Some(false) => {
                expense.is_individual = false;
                expense.individual_user_id = None;
            }
            None => {}
        }

        expense
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;
        expense.updated_at = Utc::now();

        self.storage.expenses.upsert(expense.clone())?;
        self.storage.expenses.save()?;

        self.storage.log_update(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.description.clone()),
            &before,
            &expense,
        )?;
        info!(expense = %expense.id, amount = %expense.amount, "updated expense");

        let budgets = BudgetService::new(self.storage);
        let previous = (before.category, MonthPeriod::of(before.date));
        let current = (expense.category, MonthPeriod::of(expense.date));
        let mut refreshed = Vec::new();
        if previous != current {
            refreshed.extend(budgets.refresh(household.id, previous.0, previous.1, notifier)?);
        }
        refreshed.extend(budgets.refresh(household.id, current.0, current.1, notifier)?);

        Ok(ExpenseUpdateOutcome {
            expense,
            budgets: refreshed,
        })
    }

    /// Delete one of the caller's expenses along with its installments
    pub fn delete(
        &self,
        user_id: UserId,
        id: ExpenseId,
        notifier: &dyn Notifier,
    ) -> LedgerResult<Option<BudgetOutcome>> {
        let (_, household) = membership(self.storage, user_id)?;
        let expense = self.owned(household.id, id)?;

        if expense.created_by != user_id {
            return Err(LedgerError::Forbidden(
                "only the member who recorded an expense may delete it".into(),
            ));
        }

        let removed = self.storage.expenses.delete_with_installments(id)?;
        self.storage.expenses.save()?;

        self.storage.log_delete(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.description.clone()),
            &expense,
        )?;
        info!(
            expense = %id,
            installments = removed.map(|(_, i)| i.len()).unwrap_or(0),
            "deleted expense"
        );

        BudgetService::new(self.storage).refresh(
            household.id,
            expense.category,
            MonthPeriod::of(expense.date),
            notifier,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::engine::threshold::Band;
    use crate::models::SplitMethod;
    use crate::services::notification::tests::RecordingNotifier;
    use crate::services::{BudgetService, HouseholdService, UserService};
    use tempfile::TempDir;

    struct Fixture {
        _temp_dir: TempDir,
        storage: Storage,
        ana: UserId,
        bruno: UserId,
    }

    fn fixture() -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();

        let users = UserService::new(&storage);
        let ana = users.register("Ana", "").unwrap().id;
        let bruno = users.register("Bruno", "").unwrap().id;
        let households = HouseholdService::new(&storage);
        let code = households
            .create(ana, "Home", SplitMethod::FiftyFifty, None)
            .unwrap()
            .household
            .invite_code;
        households.join(bruno, &code).unwrap();

        Fixture {
            _temp_dir: temp_dir,
            storage,
            ana,
            bruno,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_installment_expense_generates_full_set() {
        let f = fixture();
        let notifier = RecordingNotifier::default();
        let mut input = NewExpense::new("Sofa", Money::from_cents(10000), ExpenseCategory::Housing, date(2025, 1, 10));
        input.installments = Some(InstallmentPlan {
            total_installments: 3,
            first_due_date: Some(date(2025, 1, 31)),
            stepped: false,
        });

        let outcome = ExpenseService::new(&f.storage)
            .create(f.ana, input, &notifier)
            .unwrap();
        let due: Vec<_> = outcome.installments.iter().map(|i| i.due_date).collect();
        assert_eq!(due, vec![date(2025, 1, 31), date(2025, 3, 3), date(2025, 3, 31)]);
        assert!(outcome
            .installments
            .iter()
            .all(|i| i.amount == Money::from_cents(3333) && !i.is_paid));
        assert_eq!(f.storage.expenses.installments_for(outcome.expense.id).unwrap().len(), 3);
    }

    #[test]
    fn test_adjust_last_rounding_and_stepped_plans() {
        let f = fixture();
        let notifier = RecordingNotifier::default();
        let service = ExpenseService::new(&f.storage).with_rounding(InstallmentRounding::AdjustLast);

        let mut input = NewExpense::new("Laptop", Money::from_cents(10000), ExpenseCategory::Education, date(2025, 2, 1));
        input.installments = Some(InstallmentPlan {
            total_installments: 3,
            first_due_date: Some(date(2025, 2, 10)),
            stepped: false,
        });
        let outcome = service.create(f.ana, input.clone(), &notifier).unwrap();
        let total: Money = outcome.installments.iter().map(|i| i.amount).sum();
        assert_eq!(total, Money::from_cents(10000));

        input.installments = Some(InstallmentPlan {
            total_installments: 3,
            first_due_date: Some(date(2025, 2, 10)),
            stepped: true,
        });
        let stepped = service.create(f.ana, input, &notifier).unwrap();
        assert_eq!(stepped.installments.len(), 1);
        assert_eq!(stepped.installments[0].total_installments, 3);
    }

    #[test]
    fn test_validation_rules() {
        let f = fixture();
        let notifier = RecordingNotifier::default();
        let service = ExpenseService::new(&f.storage);

        let zero = NewExpense::new("Nothing", Money::zero(), ExpenseCategory::Other, date(2025, 2, 1));
        assert!(service.create(f.ana, zero, &notifier).unwrap_err().is_validation());

        let mut stranger = NewExpense::new("Gift", Money::from_cents(100), ExpenseCategory::Other, date(2025, 2, 1));
        stranger.individual_user_id = Some(UserId::new());
        assert!(service.create(f.ana, stranger, &notifier).unwrap_err().is_validation());

        let mut no_due = NewExpense::new("TV", Money::from_cents(100), ExpenseCategory::Other, date(2025, 2, 1));
        no_due.installments = Some(InstallmentPlan {
            total_installments: 2,
            first_due_date: None,
            stepped: false,
        });
        assert!(service.create(f.ana, no_due, &notifier).unwrap_err().is_validation());
    }

    #[test]
    fn test_individual_expense_defaults_to_creator() {
        let f = fixture();
        let notifier = RecordingNotifier::default();
        let mut input = NewExpense::new("Haircut", Money::from_cents(5000), ExpenseCategory::Health, date(2025, 2, 1));
        input.is_individual = true;

        let expense = ExpenseService::new(&f.storage)
            .create(f.bruno, input, &notifier)
            .unwrap()
            .expense;
        assert!(expense.is_individual);
        assert_eq!(expense.individual_user_id, Some(f.bruno));
    }

    #[test]
    fn test_other_members_card_is_forbidden() {
        let f = fixture();
        let notifier = RecordingNotifier::default();
        let card = CreditCard::new(f.bruno, "Visa", Money::from_cents(100000), 10, 20);
        f.storage.cards.upsert(card.clone()).unwrap();

        let mut input = NewExpense::new("Dinner", Money::from_cents(5000), ExpenseCategory::Restaurants, date(2025, 2, 1));
        input.payment_method = PaymentMethod::CreditCard;
        input.credit_card_id = Some(card.id);
        let err = ExpenseService::new(&f.storage)
            .create(f.ana, input.clone(), &notifier)
            .unwrap_err();
        assert!(err.is_forbidden());

        input.credit_card_id = Some(CreditCardId::new());
        let err = ExpenseService::new(&f.storage)
            .create(f.ana, input, &notifier)
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_create_and_delete_refresh_budget() {
        let f = fixture();
        let notifier = RecordingNotifier::default();
        let march = MonthPeriod::new(2025, 3).unwrap();
        BudgetService::new(&f.storage)
            .create(f.ana, ExpenseCategory::Groceries, Money::from_cents(10000), march, &notifier)
            .unwrap();

        let service = ExpenseService::new(&f.storage);
        let outcome = service
            .create(
                f.ana,
                NewExpense::new("Market", Money::from_cents(9000), ExpenseCategory::Groceries, date(2025, 3, 4)),
                &notifier,
            )
            .unwrap();
        let budget = outcome.budget.unwrap();
        assert_eq!(budget.budget.spent, Money::from_cents(9000));
        assert_eq!(budget.progress.band, Band::Warning);
        assert_eq!(budget.notified, 2);

        assert!(service
            .delete(f.bruno, outcome.expense.id, &notifier)
            .unwrap_err()
            .is_forbidden());

        let refreshed = service
            .delete(f.ana, outcome.expense.id, &notifier)
            .unwrap()
            .unwrap();
        assert_eq!(refreshed.budget.spent, Money::zero());
        assert_eq!(refreshed.progress.band, Band::None);
        assert!(service.get(f.ana, outcome.expense.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_for_month_newest_first() {
        let f = fixture();
        let notifier = RecordingNotifier::default();
        let service = ExpenseService::new(&f.storage);
        for day in [3, 17, 9] {
            service
                .create(
                    f.ana,
                    NewExpense::new("Bus", Money::from_cents(400), ExpenseCategory::Transport, date(2025, 3, day)),
                    &notifier,
                )
                .unwrap();
        }
        service
            .create(
                f.bruno,
                NewExpense::new("Cinema", Money::from_cents(400), ExpenseCategory::Leisure, date(2025, 3, 1)),
                &notifier,
            )
            .unwrap();

        let march = MonthPeriod::new(2025, 3).unwrap();
        let transport = service
            .list_for_month(f.bruno, march, Some(ExpenseCategory::Transport))
            .unwrap();
        let days: Vec<_> = transport.iter().map(|e| e.date).collect();
        assert_eq!(days, vec![date(2025, 3, 17), date(2025, 3, 9), date(2025, 3, 3)]);
        assert_eq!(service.list_for_month(f.ana, march, None).unwrap().len(), 4);
    }

    #[test]
    fn test_update_moves_spending_between_budgets() {
        let f = fixture();
        let notifier = RecordingNotifier::default();
        let march = MonthPeriod::new(2025, 3).unwrap();
        let budgets = BudgetService::new(&f.storage);
        budgets
            .create(f.ana, ExpenseCategory::Groceries, Money::from_cents(10000), march, &notifier)
            .unwrap();
        budgets
            .create(f.ana, ExpenseCategory::Leisure, Money::from_cents(10000), march.next(), &notifier)
            .unwrap();

        let service = ExpenseService::new(&f.storage);
        let expense = service
            .create(
                f.ana,
                NewExpense::new("Show", Money::from_cents(9000), ExpenseCategory::Groceries, date(2025, 3, 4)),
                &notifier,
            )
            .unwrap()
            .expense;

        let outcome = service
            .update(
                f.ana,
                expense.id,
                ExpenseUpdate {
                    category: Some(ExpenseCategory::Leisure),
                    date: Some(date(2025, 4, 2)),
                    ..Default::default()
                },
                &notifier,
            )
            .unwrap();

        assert_eq!(outcome.budgets.len(), 2);
        assert_eq!(outcome.budgets[0].budget.category, ExpenseCategory::Groceries);
        assert_eq!(outcome.budgets[0].budget.spent, Money::zero());
        assert_eq!(outcome.budgets[1].budget.category, ExpenseCategory::Leisure);
        assert_eq!(outcome.budgets[1].budget.spent, Money::from_cents(9000));
        assert_eq!(outcome.budgets[1].progress.band, Band::Warning);

        let stored = budgets
            .find(f.bruno, ExpenseCategory::Groceries, march)
            .unwrap();
        assert_eq!(stored.spent, Money::zero());
    }

    #[test]
    fn test_update_rules() {
        let f = fixture();
        let notifier = RecordingNotifier::default();
        let service = ExpenseService::new(&f.storage);

        let plain = service
            .create(
                f.ana,
                NewExpense::new("Taxi", Money::from_cents(3000), ExpenseCategory::Transport, date(2025, 2, 1)),
                &notifier,
            )
            .unwrap()
            .expense;

        let rename = ExpenseUpdate {
            description: Some("Uber".into()),
            ..Default::default()
        };
        assert!(service
            .update(f.bruno, plain.id, rename.clone(), &notifier)
            .unwrap_err()
            .is_forbidden());

        let by_card = ExpenseUpdate {
            payment_method: Some(PaymentMethod::CreditCard),
            ..Default::default()
        };
        assert!(service
            .update(f.ana, plain.id, by_card, &notifier)
            .unwrap_err()
            .is_validation());

        let mine = ExpenseUpdate {
            amount: Some(Money::from_cents(3500)),
            is_individual: Some(true),
            ..rename
        };
        let edited = service.update(f.ana, plain.id, mine, &notifier).unwrap().expense;
        assert_eq!(edited.description, "Uber");
        assert_eq!(edited.amount, Money::from_cents(3500));
        assert_eq!(edited.individual_user_id, Some(f.ana));
    }

    #[test]
    fn test_update_keeps_installment_plan() {
        let f = fixture();
        let notifier = RecordingNotifier::default();
        let service = ExpenseService::new(&f.storage);
        let mut input = NewExpense::new("Fridge", Money::from_cents(30000), ExpenseCategory::Housing, date(2025, 1, 10));
        input.installments = Some(InstallmentPlan {
            total_installments: 3,
            first_due_date: Some(date(2025, 2, 10)),
            stepped: false,
        });
        let expense = service.create(f.ana, input, &notifier).unwrap().expense;

        let err = service
            .update(
                f.ana,
                expense.id,
                ExpenseUpdate {
                    amount: Some(Money::from_cents(1)),
                    ..Default::default()
                },
                &notifier,
            )
            .unwrap_err();
        assert!(err.is_validation());

        let edited = service
            .update(
                f.ana,
                expense.id,
                ExpenseUpdate {
                    description: Some("Fridge and stove".into()),
                    ..Default::default()
                },
                &notifier,
            )
            .unwrap()
            .expense;
        assert_eq!(edited.installments, expense.installments);
        let installments = service.installments(f.ana, expense.id).unwrap();
        assert_eq!(installments.len(), 3);
        assert!(installments.iter().all(|i| i.amount == Money::from_cents(10000)));
    }
}
