//! Household and user repository (households.json)
//!
//! Households and users share one file so that creating a household and
//! linking its creator is persisted by a single atomic write.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LedgerResult;
use crate::models::{Household, HouseholdId, User, UserId};

use super::file_io::{read_json, write_json_atomic};
use super::table::Table;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct HouseholdData {
    #[serde(default)]
    households: Vec<Household>,
    #[serde(default)]
    users: Vec<User>,
}

pub struct HouseholdRepository {
    path: PathBuf,
    households: Table<HouseholdId, Household>,
    users: Table<UserId, User>,
}

impl HouseholdRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            households: Table::new(),
            users: Table::new(),
        }
    }

    pub fn load(&self) -> LedgerResult<()> {
        let file_data: HouseholdData = read_json(&self.path)?;
        debug!(
            households = file_data.households.len(),
            users = file_data.users.len(),
            "loaded households"
        );
        self.households.replace_all(file_data.households, |h| h.id)?;
        self.users.replace_all(file_data.users, |u| u.id)?;
        Ok(())
    }

    pub fn save(&self) -> LedgerResult<()> {
        let mut households = self.households.all()?;
        households.sort_by_key(|h| h.created_at);
        let mut users = self.users.all()?;
        users.sort_by_key(|u| u.created_at);

        write_json_atomic(&self.path, &HouseholdData { households, users })
    }

    pub fn get(&self, id: HouseholdId) -> LedgerResult<Option<Household>> {
        self.households.get(id)
    }

    pub fn get_all(&self) -> LedgerResult<Vec<Household>> {
        let mut households = self.households.all()?;
        households.sort_by_key(|h| h.created_at);
        Ok(households)
    }

    pub fn upsert(&self, household: Household) -> LedgerResult<()> {
        self.households.upsert(household.id, household)?;
        Ok(())
    }

    /// Look up an active household by invite code (case-insensitive)
    pub fn find_by_invite_code(&self, code: &str) -> LedgerResult<Option<Household>> {
        let code = code.trim().to_uppercase();
        self.households
            .find(|h| h.is_active && h.invite_code == code)
    }

    pub fn invite_code_exists(&self, code: &str) -> LedgerResult<bool> {
        self.households.any(|h| h.invite_code == code)
    }

    pub fn get_user(&self, id: UserId) -> LedgerResult<Option<User>> {
        self.users.get(id)
    }

    pub fn get_users(&self) -> LedgerResult<Vec<User>> {
        let mut users = self.users.all()?;
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.name.cmp(&b.name)));
        Ok(users)
    }

    pub fn upsert_user(&self, user: User) -> LedgerResult<()> {
        self.users.upsert(user.id, user)?;
        Ok(())
    }

    pub fn email_taken(&self, email: &str) -> LedgerResult<bool> {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Ok(false);
        }
        self.users.any(|u| u.email.to_lowercase() == email)
    }

    /// Members of a household in the order they joined
    pub fn members(&self, household_id: HouseholdId) -> LedgerResult<Vec<User>> {
        let mut members = self
            .users
            .filter(|u| u.household_id == Some(household_id))?;
        members.sort_by(|a, b| {
            a.joined_at
                .cmp(&b.joined_at)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });
        Ok(members)
    }

    /// Insert a household and its linked creator, then persist both in one
    /// write; on failure the in-memory state is restored
    pub fn create_with_member(&self, household: Household, member: User) -> LedgerResult<()> {
        let household_id = household.id;
        let previous_member = self.users.get(member.id)?;

        self.households.upsert(household_id, household)?;
        self.users.upsert(member.id, member)?;

        if let Err(e) = self.save() {
            self.households.remove(household_id)?;
            if let Some(previous) = previous_member {
                self.users.upsert(previous.id, previous)?;
            }
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, HouseholdRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = HouseholdRepository::new(temp_dir.path().join("households.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_create_with_member_persists_both() {
        let (temp_dir, repo) = create_test_repo();

        let mut user = User::new("Ana", "ana@example.com");
        repo.upsert_user(user.clone()).unwrap();

        let household = Household::new("Home", "ABCD2345");
        user.join(household.id);
        repo.create_with_member(household.clone(), user.clone())
            .unwrap();

        let reloaded = HouseholdRepository::new(temp_dir.path().join("households.json"));
        reloaded.load().unwrap();
        assert!(reloaded.get(household.id).unwrap().is_some());
        assert_eq!(
            reloaded.get_user(user.id).unwrap().unwrap().household_id,
            Some(household.id)
        );
    }

    #[test]
    fn test_members_in_join_order() {
        let (_temp, repo) = create_test_repo();
        let household = Household::new("Home", "ABCD2345");
        repo.upsert(household.clone()).unwrap();

        let mut first = User::new("Ana", "");
        first.join(household.id);
        std::thread::sleep(std::time::Duration::from_millis(5));
        let mut second = User::new("Bruno", "");
        second.join(household.id);

        repo.upsert_user(second.clone()).unwrap();
        repo.upsert_user(first.clone()).unwrap();
        repo.upsert_user(User::new("Outsider", "")).unwrap();

        let members = repo.members(household.id).unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].id, first.id);
        assert_eq!(members[1].id, second.id);
    }

    #[test]
    fn test_find_by_invite_code() {
        let (_temp, repo) = create_test_repo();
        let mut household = Household::new("Home", "ABCD2345");
        repo.upsert(household.clone()).unwrap();

        assert!(repo.find_by_invite_code("abcd2345").unwrap().is_some());
        assert!(repo.invite_code_exists("ABCD2345").unwrap());

        household.is_active = false;
        repo.upsert(household).unwrap();
        assert!(repo.find_by_invite_code("ABCD2345").unwrap().is_none());
    }

    #[test]
    fn test_email_taken() {
        let (_temp, repo) = create_test_repo();
        repo.upsert_user(User::new("Ana", "Ana@Example.com")).unwrap();
        assert!(repo.email_taken("ana@example.com").unwrap());
        assert!(!repo.email_taken("").unwrap());
    }
}
