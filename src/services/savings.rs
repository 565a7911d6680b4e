//! Savings service
//!
//! Goals and dreams of a household and the contributions toward them. The
//! saved amount is never edited directly: it is always the sum of the
//! contribution ledger, recomputed after each contribution.

use chrono::NaiveDate;
use tracing::{info, warn};

use super::household::{member_ids, membership};
use super::notification::{dispatch_all, Notifier};
use crate::audit::EntityType;
use crate::engine::threshold::{self, Progress};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Contribution, ContributionTarget, Dream, DreamId, Goal, GoalId, GoalType, HouseholdId,
    Insight, Money, MonthPeriod, Priority, UserId,
};
use crate::storage::Storage;

/// Input for a new goal
#[derive(Debug, Clone)]
pub struct NewGoal {
    pub name: String,
    pub description: String,
    pub target_amount: Money,
    pub goal_type: GoalType,
    pub start_date: NaiveDate,
    pub target_date: NaiveDate,
}

/// Input for a new dream
#[derive(Debug, Clone)]
pub struct NewDream {
    pub name: String,
    pub description: String,
    pub target_amount: Money,
    pub target_date: Option<NaiveDate>,
    pub priority: Priority,
}

/// Partial change to a goal; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct GoalUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub target_amount: Option<Money>,
    pub target_date: Option<NaiveDate>,
}

/// Partial change to a dream; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct DreamUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub target_amount: Option<Money>,
    pub target_date: Option<NaiveDate>,
    pub priority: Option<Priority>,
}

/// The goal or dream after a contribution was applied
#[derive(Debug, Clone)]
pub enum SavingsTarget {
    Goal(Goal),
    Dream(Dream),
}

impl SavingsTarget {
    pub fn name(&self) -> &str {
        match self {
            Self::Goal(goal) => &goal.name,
            Self::Dream(dream) => &dream.name,
        }
    }

    pub fn current_amount(&self) -> Money {
        match self {
            Self::Goal(goal) => goal.current_amount,
            Self::Dream(dream) => dream.current_amount,
        }
    }

    pub fn target_amount(&self) -> Money {
        match self {
            Self::Goal(goal) => goal.target_amount,
            Self::Dream(dream) => dream.target_amount,
        }
    }

    pub fn status_label(&self) -> String {
        match self {
            Self::Goal(goal) => goal.status.to_string(),
            Self::Dream(dream) => dream.status.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContributionOutcome {
    pub contribution: Contribution,
    pub target: SavingsTarget,
    pub progress: Progress,
    pub notified: usize,
    pub insight: Option<Insight>,
}

/// Rough monthly saving capacity from the last three months of records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavingsSuggestion {
    pub average_income: Money,
    pub average_expenses: Money,
    /// What is left over on average, never negative
    pub possible_saving: Money,
    /// 30% of the possible saving
    pub safe_saving: Money,
}

/// Months averaged by [`SavingsService::suggestion`]
const SUGGESTION_MONTHS: u32 = 3;

fn validation(e: impl ToString) -> LedgerError {
    LedgerError::Validation(e.to_string())
}

pub struct SavingsService<'a> {
    storage: &'a Storage,
}

impl<'a> SavingsService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    fn household_of(&self, user_id: UserId) -> LedgerResult<HouseholdId> {
        Ok(membership(self.storage, user_id)?.1.id)
    }

    fn owned_goal(&self, household_id: HouseholdId, id: GoalId) -> LedgerResult<Goal> {
        self.storage
            .savings
            .get_goal(id)?
            .filter(|g| g.household_id == household_id)
            .ok_or_else(|| LedgerError::goal_not_found(id.to_string()))
    }

    fn owned_dream(&self, household_id: HouseholdId, id: DreamId) -> LedgerResult<Dream> {
        self.storage
            .savings
            .get_dream(id)?
            .filter(|d| d.household_id == household_id)
            .ok_or_else(|| LedgerError::dream_not_found(id.to_string()))
    }

    pub fn create_goal(&self, user_id: UserId, input: NewGoal) -> LedgerResult<Goal> {
        let household_id = self.household_of(user_id)?;

        let mut goal = Goal::new(
            household_id,
            input.name.trim(),
            input.target_amount,
            input.start_date,
            input.target_date,
        );
        goal.description = input.description;
        goal.goal_type = input.goal_type;
        goal.validate().map_err(validation)?;

        self.storage.savings.upsert_goal(goal.clone())?;
        self.storage.savings.save()?;

        self.storage.log_create(
            EntityType::Goal,
            goal.id.to_string(),
            Some(goal.name.clone()),
            &goal,
        )?;
        info!(goal = %goal.id, target = %goal.target_amount, "created goal");

        Ok(goal)
    }

    /// Apply changes and re-classify the status against `today`
    ///
    /// No notification is sent; only contributions notify.
    pub fn update_goal(
        &self,
        user_id: UserId,
        id: GoalId,
        changes: GoalUpdate,
        today: NaiveDate,
    ) -> LedgerResult<Goal> {
        let household_id = self.household_of(user_id)?;
        let before = self.owned_goal(household_id, id)?;

        let mut goal = before.clone();
        if let Some(name) = changes.name {
            goal.name = name.trim().to_string();
        }
        if let Some(description) = changes.description {
            goal.description = description;
        }
        if let Some(target) = changes.target_amount {
            goal.target_amount = target;
        }
        if let Some(date) = changes.target_date {
            goal.target_date = date;
        }
        goal.validate().map_err(validation)?;

        let progress = threshold::evaluate(goal.current_amount, goal.target_amount)?;
        let status = threshold::classify_goal(&progress, goal.target_date, today);
        goal.apply_progress(goal.current_amount, status);

        self.storage.savings.upsert_goal(goal.clone())?;
        self.storage.savings.save()?;

        self.storage.log_update(
            EntityType::Goal,
            goal.id.to_string(),
            Some(goal.name.clone()),
            &before,
            &goal,
        )?;
        info!(goal = %goal.id, status = %goal.status, "updated goal");

        Ok(goal)
    }

    /// Delete a goal together with its contributions
    pub fn delete_goal(&self, user_id: UserId, id: GoalId) -> LedgerResult<Goal> {
        let household_id = self.household_of(user_id)?;
        let goal = self.owned_goal(household_id, id)?;

        self.storage.savings.delete_goal(id)?;
        self.storage.savings.save()?;

        self.storage.log_delete(
            EntityType::Goal,
            goal.id.to_string(),
            Some(goal.name.clone()),
            &goal,
        )?;
        info!(goal = %id, "deleted goal");

        Ok(goal)
    }

    pub fn list_goals(&self, user_id: UserId) -> LedgerResult<Vec<Goal>> {
        let household_id = self.household_of(user_id)?;
        self.storage.savings.goals_for(household_id)
    }

    /// Find a goal of the caller's household by name or id
    pub fn find_goal(&self, user_id: UserId, identifier: &str) -> LedgerResult<Option<Goal>> {
        let identifier = identifier.trim();
        Ok(self.list_goals(user_id)?.into_iter().find(|g| {
            g.name.eq_ignore_ascii_case(identifier)
                || g.id.to_string() == identifier
                || g.id.as_uuid().to_string() == identifier
        }))
    }

    pub fn create_dream(&self, user_id: UserId, input: NewDream) -> LedgerResult<Dream> {
        let household_id = self.household_of(user_id)?;

        let mut dream = Dream::new(household_id, input.name.trim(), input.target_amount);
        dream.description = input.description;
        dream.target_date = input.target_date;
        dream.priority = input.priority;
        dream.validate().map_err(validation)?;

        self.storage.savings.upsert_dream(dream.clone())?;
        self.storage.savings.save()?;

        self.storage.log_create(
            EntityType::Dream,
            dream.id.to_string(),
            Some(dream.name.clone()),
            &dream,
        )?;
        info!(dream = %dream.id, target = %dream.target_amount, "created dream");

        Ok(dream)
    }

    pub fn update_dream(
        &self,
        user_id: UserId,
        id: DreamId,
        changes: DreamUpdate,
    ) -> LedgerResult<Dream> {
        let household_id = self.household_of(user_id)?;
        let before = self.owned_dream(household_id, id)?;

        let mut dream = before.clone();
        if let Some(name) = changes.name {
            dream.name = name.trim().to_string();
        }
        if let Some(description) = changes.description {
            dream.description = description;
        }
        if let Some(target) = changes.target_amount {
            dream.target_amount = target;
        }
        if changes.target_date.is_some() {
            dream.target_date = changes.target_date;
        }
        if let Some(priority) = changes.priority {
            dream.priority = priority;
        }
        dream.validate().map_err(validation)?;

        let progress = threshold::evaluate(dream.current_amount, dream.target_amount)?;
        dream.apply_progress(dream.current_amount, threshold::classify_dream(&progress));

        self.storage.savings.upsert_dream(dream.clone())?;
        self.storage.savings.save()?;

        self.storage.log_update(
            EntityType::Dream,
            dream.id.to_string(),
            Some(dream.name.clone()),
            &before,
            &dream,
        )?;
        info!(dream = %dream.id, status = %dream.status, "updated dream");

        Ok(dream)
    }

    pub fn delete_dream(&self, user_id: UserId, id: DreamId) -> LedgerResult<Dream> {
        let household_id = self.household_of(user_id)?;
        let dream = self.owned_dream(household_id, id)?;

        self.storage.savings.delete_dream(id)?;
        self.storage.savings.save()?;

        self.storage.log_delete(
            EntityType::Dream,
            dream.id.to_string(),
            Some(dream.name.clone()),
            &dream,
        )?;
        info!(dream = %id, "deleted dream");

        Ok(dream)
    }

    pub fn list_dreams(&self, user_id: UserId) -> LedgerResult<Vec<Dream>> {
        let household_id = self.household_of(user_id)?;
        self.storage.savings.dreams_for(household_id)
    }

    pub fn find_dream(&self, user_id: UserId, identifier: &str) -> LedgerResult<Option<Dream>> {
        let identifier = identifier.trim();
        Ok(self.list_dreams(user_id)?.into_iter().find(|d| {
            d.name.eq_ignore_ascii_case(identifier)
                || d.id.to_string() == identifier
                || d.id.as_uuid().to_string() == identifier
        }))
    }

    /// Record a contribution and bring the goal or dream up to date
    ///
    /// Every member is notified when the new total lands in the warning or
    /// critical band. A goal is re-classified against `today`.
    #[allow(clippy::too_many_arguments)]
    pub fn contribute(
        &self,
        user_id: UserId,
        target: ContributionTarget,
        amount: Money,
        date: NaiveDate,
        note: Option<String>,
        today: NaiveDate,
        notifier: &dyn Notifier,
    ) -> LedgerResult<ContributionOutcome> {
        if !amount.is_positive() {
            warn!(%target, %amount, "refused non-positive contribution");
            return Err(LedgerError::Validation(
                "Contribution amount must be greater than zero".into(),
            ));
        }

        let household_id = self.household_of(user_id)?;
        match target {
            ContributionTarget::Goal(id) => {
                self.owned_goal(household_id, id)?;
            }
            ContributionTarget::Dream(id) => {
                self.owned_dream(household_id, id)?;
            }
        }

        let contribution = Contribution::new(target, user_id, amount, date).with_note(note);
        self.storage.savings.add_contribution(contribution.clone())?;
        let total = self.storage.savings.contribution_total(target)?;
        let members = member_ids(self.storage, household_id)?;

        let (updated, progress, payloads) = match target {
            ContributionTarget::Goal(id) => {
                let before = self.owned_goal(household_id, id)?;
                let mut goal = before.clone();
                let progress = threshold::evaluate(total, goal.target_amount)?;
                let status = threshold::classify_goal(&progress, goal.target_date, today);
                goal.apply_progress(total, status);
                self.storage.savings.upsert_goal(goal.clone())?;
                self.storage.log_update(
                    EntityType::Goal,
                    goal.id.to_string(),
                    Some(goal.name.clone()),
                    &before,
                    &goal,
                )?;
                let payloads = threshold::goal_notifications(&goal, &progress, &members);
                (SavingsTarget::Goal(goal), progress, payloads)
            }
            ContributionTarget::Dream(id) => {
                let before = self.owned_dream(household_id, id)?;
                let mut dream = before.clone();
                let progress = threshold::evaluate(total, dream.target_amount)?;
                dream.apply_progress(total, threshold::classify_dream(&progress));
                self.storage.savings.upsert_dream(dream.clone())?;
                self.storage.log_update(
                    EntityType::Dream,
                    dream.id.to_string(),
                    Some(dream.name.clone()),
                    &before,
                    &dream,
                )?;
                let payloads = threshold::dream_notifications(&dream, &progress, &members);
                (SavingsTarget::Dream(dream), progress, payloads)
            }
        };
        self.storage.savings.save()?;

        self.storage.log_create(
            EntityType::Contribution,
            contribution.id.to_string(),
            Some(updated.name().to_string()),
            &contribution,
        )?;
        info!(
            %target,
            amount = %amount,
            total = %total,
            band = ?progress.band,
            "recorded contribution"
        );

        let notified = dispatch_all(notifier, &payloads)?;
        let insight = threshold::insight_for(updated.name(), &progress);

        Ok(ContributionOutcome {
            contribution,
            target: updated,
            progress,
            notified,
            insight,
        })
    }

    /// Average monthly income and expenses over the three months before
    /// `today`'s month, and what could reasonably be put aside
    pub fn suggestion(&self, user_id: UserId, today: NaiveDate) -> LedgerResult<SavingsSuggestion> {
        let household_id = self.household_of(user_id)?;

        let mut income = Money::zero();
        let mut expenses = Money::zero();
        let mut period = MonthPeriod::of(today);
        for _ in 0..SUGGESTION_MONTHS {
            period = period.prev();
            income += self
                .storage
                .incomes
                .for_household_in(household_id, period)?
                .iter()
                .map(|i| i.amount)
                .sum::<Money>();
            expenses += self
                .storage
                .expenses
                .for_household_in(household_id, period)?
                .iter()
                .map(|e| e.amount)
                .sum::<Money>();
        }

        let average_income = income.divide_rounded(SUGGESTION_MONTHS);
        let average_expenses = expenses.divide_rounded(SUGGESTION_MONTHS);
        let left_over = average_income - average_expenses;
        let possible_saving = if left_over.is_positive() {
            left_over
        } else {
            Money::zero()
        };

        Ok(SavingsSuggestion {
            average_income,
            average_expenses,
            possible_saving,
            safe_saving: possible_saving.mul_ratio(3, 10),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::engine::threshold::Band;
    use crate::models::{
        DreamStatus, Expense, ExpenseCategory, GoalStatus, Income, InsightTone, NotificationType,
        SplitMethod,
    };
    use crate::services::notification::tests::RecordingNotifier;
    use crate::services::{HouseholdService, UserService};
    use tempfile::TempDir;

    struct Fixture {
        _temp_dir: TempDir,
        storage: Storage,
        ana: UserId,
        bruno: UserId,
        household: HouseholdId,
    }

    fn fixture() -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();

        let users = UserService::new(&storage);
        let ana = users.register("Ana", "").unwrap().id;
        let bruno = users.register("Bruno", "").unwrap().id;
        let households = HouseholdService::new(&storage);
        let household = households
            .create(ana, "Home", SplitMethod::FiftyFifty, None)
            .unwrap()
            .household;
        households.join(bruno, &household.invite_code).unwrap();

        Fixture {
            _temp_dir: temp_dir,
            storage,
            ana,
            bruno,
            household: household.id,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn money(units: i64) -> Money {
        Money::from_units_cents(units, 0)
    }

    fn trip() -> NewGoal {
        NewGoal {
            name: "Trip".into(),
            description: String::new(),
            target_amount: money(1000),
            goal_type: GoalType::Annual,
            start_date: date(2025, 1, 1),
            target_date: date(2025, 12, 31),
        }
    }

    fn house() -> NewDream {
        NewDream {
            name: "House".into(),
            description: "Somewhere with a garden".into(),
            target_amount: money(500),
            target_date: None,
            priority: Priority::High,
        }
    }

    #[test]
    fn test_contributions_accumulate_and_notify() {
        let f = fixture();
        let service = SavingsService::new(&f.storage);
        let notifier = RecordingNotifier::default();
        let goal = service.create_goal(f.ana, trip()).unwrap();
        let target = ContributionTarget::Goal(goal.id);
        let today = date(2025, 3, 1);

        let outcome = service
            .contribute(f.ana, target, money(200), today, None, today, &notifier)
            .unwrap();
        assert_eq!(outcome.target.current_amount(), money(200));
        assert_eq!(outcome.progress.band, Band::None);
        assert_eq!(outcome.notified, 0);
        assert_eq!(outcome.insight.unwrap().tone, InsightTone::Encouraging);

        let outcome = service
            .contribute(f.bruno, target, money(650), today, Some("bonus".into()), today, &notifier)
            .unwrap();
        assert_eq!(outcome.target.current_amount(), money(850));
        assert_eq!(outcome.notified, 2);
        assert!(outcome.insight.is_none());
        match &outcome.target {
            SavingsTarget::Goal(goal) => assert_eq!(goal.status, GoalStatus::NearCompletion),
            SavingsTarget::Dream(_) => panic!("expected a goal"),
        }

        let outcome = service
            .contribute(f.ana, target, money(150), today, None, today, &notifier)
            .unwrap();
        let SavingsTarget::Goal(completed) = outcome.target else {
            panic!("expected a goal");
        };
        assert_eq!(completed.status, GoalStatus::Completed);
        assert!(completed.completed_at.is_some());
        assert_eq!(outcome.insight.unwrap().tone, InsightTone::Celebratory);

        let sent = notifier.sent.borrow();
        assert_eq!(sent.len(), 4);
        assert_eq!(sent[2].title, "Goal completed!");
        assert!(sent
            .iter()
            .all(|p| p.notification_type == NotificationType::GoalUpdated));
    }

    #[test]
    fn test_contribution_validation() {
        let f = fixture();
        let service = SavingsService::new(&f.storage);
        let notifier = RecordingNotifier::default();
        let dream = service.create_dream(f.ana, house()).unwrap();
        let today = date(2025, 3, 1);

        let err = service
            .contribute(f.ana, ContributionTarget::Dream(dream.id), Money::zero(), today, None, today, &notifier)
            .unwrap_err();
        assert!(err.is_validation());

        let err = service
            .contribute(f.ana, ContributionTarget::Goal(GoalId::new()), money(10), today, None, today, &notifier)
            .unwrap_err();
        assert!(err.is_not_found());

        let outsider = UserService::new(&f.storage).register("Caio", "").unwrap().id;
        let err = service
            .contribute(outsider, ContributionTarget::Dream(dream.id), money(10), today, None, today, &notifier)
            .unwrap_err();
        assert!(err.is_forbidden());
    }

    #[test]
    fn test_dream_completion() {
        let f = fixture();
        let service = SavingsService::new(&f.storage);
        let notifier = RecordingNotifier::default();
        let dream = service.create_dream(f.ana, house()).unwrap();
        let today = date(2025, 3, 1);

        let outcome = service
            .contribute(f.bruno, ContributionTarget::Dream(dream.id), money(500), today, None, today, &notifier)
            .unwrap();
        let SavingsTarget::Dream(done) = outcome.target else {
            panic!("expected a dream");
        };
        assert_eq!(done.status, DreamStatus::Completed);
        assert_eq!(notifier.sent.borrow()[0].title, "Dream come true!");
        assert_eq!(
            f.storage
                .savings
                .contributions_for(ContributionTarget::Dream(dream.id))
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_update_goal_reclassifies_without_notifying() {
        let f = fixture();
        let service = SavingsService::new(&f.storage);
        let goal = service.create_goal(f.ana, trip()).unwrap();

        let updated = service
            .update_goal(
                f.bruno,
                goal.id,
                GoalUpdate {
                    target_date: Some(date(2025, 2, 1)),
                    ..Default::default()
                },
                date(2025, 3, 1),
            )
            .unwrap();
        assert_eq!(updated.status, GoalStatus::Delayed);

        let err = service
            .update_goal(
                f.ana,
                goal.id,
                GoalUpdate {
                    target_amount: Some(Money::zero()),
                    ..Default::default()
                },
                date(2025, 3, 1),
            )
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_delete_goal_removes_contributions() {
        let f = fixture();
        let service = SavingsService::new(&f.storage);
        let notifier = RecordingNotifier::default();
        let goal = service.create_goal(f.ana, trip()).unwrap();
        let target = ContributionTarget::Goal(goal.id);
        let today = date(2025, 3, 1);
        service
            .contribute(f.ana, target, money(10), today, None, today, &notifier)
            .unwrap();

        service.delete_goal(f.bruno, goal.id).unwrap();
        assert!(f.storage.savings.contributions_for(target).unwrap().is_empty());
        assert!(service.list_goals(f.ana).unwrap().is_empty());
        assert!(service.delete_goal(f.ana, goal.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_find_and_list_dreams_by_priority() {
        let f = fixture();
        let service = SavingsService::new(&f.storage);
        service.create_dream(f.ana, house()).unwrap();
        service
            .create_dream(
                f.ana,
                NewDream {
                    name: "Boat".into(),
                    priority: Priority::Low,
                    ..house()
                },
            )
            .unwrap();

        let dreams = service.list_dreams(f.bruno).unwrap();
        assert_eq!(dreams[0].name, "House");
        assert_eq!(service.find_dream(f.ana, "boat").unwrap().unwrap().name, "Boat");
        assert!(service.find_dream(f.ana, "Yacht").unwrap().is_none());
    }

    #[test]
    fn test_suggestion_averages_previous_months() {
        let f = fixture();
        for month in 1..=3 {
            f.storage
                .incomes
                .upsert(Income::new(f.household, f.ana, "Salary", money(3000), date(2025, month, 5)))
                .unwrap();
            f.storage
                .expenses
                .upsert(Expense::new(
                    f.household,
                    f.bruno,
                    "Rent",
                    money(2000),
                    ExpenseCategory::Housing,
                    date(2025, month, 10),
                ))
                .unwrap();
        }
        // the current month is left out
        f.storage
            .incomes
            .upsert(Income::new(f.household, f.ana, "Bonus", money(9000), date(2025, 4, 2)))
            .unwrap();

        let suggestion = SavingsService::new(&f.storage)
            .suggestion(f.ana, date(2025, 4, 15))
            .unwrap();
        assert_eq!(suggestion.average_income, money(3000));
        assert_eq!(suggestion.average_expenses, money(2000));
        assert_eq!(suggestion.possible_saving, money(1000));
        assert_eq!(suggestion.safe_saving, money(300));
    }
}
