//! Goals, dreams and their contributions (savings.json)

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LedgerResult;
use crate::models::{
    Contribution, ContributionId, ContributionTarget, Dream, DreamId, Goal, GoalId, HouseholdId,
    Money,
};

use super::file_io::{read_json, write_json_atomic};
use super::table::Table;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SavingsData {
    #[serde(default)]
    goals: Vec<Goal>,
    #[serde(default)]
    dreams: Vec<Dream>,
    #[serde(default)]
    contributions: Vec<Contribution>,
}

pub struct SavingsRepository {
    path: PathBuf,
    goals: Table<GoalId, Goal>,
    dreams: Table<DreamId, Dream>,
    contributions: Table<ContributionId, Contribution>,
}

impl SavingsRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            goals: Table::new(),
            dreams: Table::new(),
            contributions: Table::new(),
        }
    }

    pub fn load(&self) -> LedgerResult<()> {
        let file_data: SavingsData = read_json(&self.path)?;
        debug!(
            goals = file_data.goals.len(),
            dreams = file_data.dreams.len(),
            contributions = file_data.contributions.len(),
            "loaded savings"
        );
        self.goals.replace_all(file_data.goals, |g| g.id)?;
        self.dreams.replace_all(file_data.dreams, |d| d.id)?;
        self.contributions
            .replace_all(file_data.contributions, |c| c.id)?;
        Ok(())
    }

    pub fn save(&self) -> LedgerResult<()> {
        let mut goals = self.goals.all()?;
        goals.sort_by_key(|g| g.created_at);
        let mut dreams = self.dreams.all()?;
        dreams.sort_by_key(|d| d.created_at);
        let mut contributions = self.contributions.all()?;
        contributions.sort_by_key(|c| (c.date, c.created_at));

        write_json_atomic(
            &self.path,
            &SavingsData {
                goals,
                dreams,
                contributions,
            },
        )
    }

    pub fn get_goal(&self, id: GoalId) -> LedgerResult<Option<Goal>> {
        self.goals.get(id)
    }

    pub fn upsert_goal(&self, goal: Goal) -> LedgerResult<()> {
        self.goals.upsert(goal.id, goal)?;
        Ok(())
    }

    /// Remove a goal together with its contributions
    pub fn delete_goal(&self, id: GoalId) -> LedgerResult<Option<Goal>> {
        let removed = self.goals.remove(id)?;
        if removed.is_some() {
            self.contributions
                .remove_where(|c| c.target == ContributionTarget::Goal(id))?;
        }
        Ok(removed)
    }

    /// Goals of a household, nearest deadline first
    pub fn goals_for(&self, household_id: HouseholdId) -> LedgerResult<Vec<Goal>> {
        let mut goals = self.goals.filter(|g| g.household_id == household_id)?;
        goals.sort_by(|a, b| a.target_date.cmp(&b.target_date).then(a.name.cmp(&b.name)));
        Ok(goals)
    }

    pub fn get_dream(&self, id: DreamId) -> LedgerResult<Option<Dream>> {
        self.dreams.get(id)
    }

    pub fn upsert_dream(&self, dream: Dream) -> LedgerResult<()> {
        self.dreams.upsert(dream.id, dream)?;
        Ok(())
    }

    pub fn delete_dream(&self, id: DreamId) -> LedgerResult<Option<Dream>> {
        let removed = self.dreams.remove(id)?;
        if removed.is_some() {
            self.contributions
                .remove_where(|c| c.target == ContributionTarget::Dream(id))?;
        }
        Ok(removed)
    }

    /// Dreams of a household, highest priority first
    pub fn dreams_for(&self, household_id: HouseholdId) -> LedgerResult<Vec<Dream>> {
        let mut dreams = self.dreams.filter(|d| d.household_id == household_id)?;
        dreams.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.name.cmp(&b.name)));
        Ok(dreams)
    }

    pub fn add_contribution(&self, contribution: Contribution) -> LedgerResult<()> {
        self.contributions.upsert(contribution.id, contribution)?;
        Ok(())
    }

    pub fn contributions_for(&self, target: ContributionTarget) -> LedgerResult<Vec<Contribution>> {
        let mut contributions = self.contributions.filter(|c| c.target == target)?;
        contributions.sort_by_key(|c| (c.date, c.created_at));
        Ok(contributions)
    }

    /// Sum of every contribution made toward `target`
    pub fn contribution_total(&self, target: ContributionTarget) -> LedgerResult<Money> {
        Ok(self
            .contributions
            .filter(|c| c.target == target)?
            .iter()
            .map(|c| c.amount)
            .sum())
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

    #[test]
    fn test_contribution_total_per_target() {
        let temp_dir = TempDir::new().unwrap();
        let repo = SavingsRepository::new(temp_dir.path().join("savings.json"));
        let household = HouseholdId::new();
        let user = UserId::new();

        let goal = Goal::new(household, "Trip", Money::from_cents(100000), date(2025, 1, 1), date(2025, 12, 31));
        let dream = Dream::new(household, "House", Money::from_cents(1000000));
        repo.upsert_goal(goal.clone()).unwrap();
        repo.upsert_dream(dream.clone()).unwrap();

        let to_goal = ContributionTarget::Goal(goal.id);
        let to_dream = ContributionTarget::Dream(dream.id);
        repo.add_contribution(Contribution::new(to_goal, user, Money::from_cents(2500), date(2025, 2, 1)))
            .unwrap();
        repo.add_contribution(Contribution::new(to_goal, user, Money::from_cents(7500), date(2025, 3, 1)))
            .unwrap();
        repo.add_contribution(Contribution::new(to_dream, user, Money::from_cents(100), date(2025, 3, 1)))
            .unwrap();
        repo.save().unwrap();

        let reloaded = SavingsRepository::new(temp_dir.path().join("savings.json"));
        reloaded.load().unwrap();
        assert_eq!(reloaded.contribution_total(to_goal).unwrap(), Money::from_cents(10000));
        assert_eq!(reloaded.contribution_total(to_dream).unwrap(), Money::from_cents(100));
        assert_eq!(reloaded.contributions_for(to_goal).unwrap().len(), 2);
    }

    #[test]
    fn test_delete_goal_removes_contributions() {
        let temp_dir = TempDir::new().unwrap();
        let repo = SavingsRepository::new(temp_dir.path().join("savings.json"));
        let goal = Goal::new(HouseholdId::new(), "Trip", Money::from_cents(100), date(2025, 1, 1), date(2025, 2, 1));
        let target = ContributionTarget::Goal(goal.id);
        repo.upsert_goal(goal.clone()).unwrap();
        repo.add_contribution(Contribution::new(target, UserId::new(), Money::from_cents(50), date(2025, 1, 5)))
            .unwrap();

        assert!(repo.delete_goal(goal.id).unwrap().is_some());
        assert_eq!(repo.contribution_total(target).unwrap(), Money::zero());
    }
}
