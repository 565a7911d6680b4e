//! Household service
//!
//! Creating, joining and leaving households, and configuring how the two
//! members split shared expenses.

use tracing::{info, warn};
use uuid::Uuid;

use crate::audit::EntityType;
use crate::engine::SplitConfig;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{CustomSplit, Household, HouseholdId, SplitMethod, User, UserId};
use crate::storage::Storage;

/// A household may never hold more members than this
pub const MAX_MEMBERS: usize = 2;

const INVITE_CODE_LEN: usize = 8;
const INVITE_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const INVITE_ATTEMPTS: usize = 32;

/// A household together with its members in join order
#[derive(Debug, Clone)]
pub struct HouseholdView {
    pub household: Household,
    pub members: Vec<User>,
}

pub struct HouseholdService<'a> {
    storage: &'a Storage,
}

/// Bytes at or above this are skipped so every symbol is equally likely
const INVITE_BYTE_CUTOFF: u8 = (256 / INVITE_ALPHABET.len() * INVITE_ALPHABET.len()) as u8;

/// Bytes of a v4 uuid that carry its version and variant bits
const FIXED_UUID_BYTES: [usize; 2] = [6, 8];

fn random_invite_code() -> String {
    std::iter::repeat_with(|| Uuid::new_v4().into_bytes())
        .flat_map(|bytes| {
            bytes
                .into_iter()
                .enumerate()
                .filter(|(i, _)| !FIXED_UUID_BYTES.contains(i))
                .map(|(_, b)| b)
        })
        .filter(|b| *b < INVITE_BYTE_CUTOFF)
        .take(INVITE_CODE_LEN)
        .map(|b| INVITE_ALPHABET[usize::from(b) % INVITE_ALPHABET.len()] as char)
        .collect()
}

/// Load a user and the active household they belong to
pub(crate) fn membership(storage: &Storage, user_id: UserId) -> LedgerResult<(User, Household)> {
    let user = storage
        .households
        .get_user(user_id)?
        .ok_or_else(|| LedgerError::user_not_found(user_id.to_string()))?;

    let household_id = user.household_id.ok_or_else(LedgerError::no_household)?;
    let household = storage
        .households
        .get(household_id)?
        .filter(|h| h.is_active)
        .ok_or_else(|| LedgerError::household_not_found(household_id.to_string()))?;

    Ok((user, household))
}

/// Member ids of a household, in join order
pub(crate) fn member_ids(storage: &Storage, household_id: HouseholdId) -> LedgerResult<Vec<UserId>> {
    Ok(storage
        .households
        .members(household_id)?
        .into_iter()
        .map(|u| u.id)
        .collect())
}

impl<'a> HouseholdService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    fn unique_invite_code(&self) -> LedgerResult<String> {
        for _ in 0..INVITE_ATTEMPTS {
            let code = random_invite_code();
            if !self.storage.households.invite_code_exists(&code)? {
                return Ok(code);
            }
        }
        Err(LedgerError::Storage(
            "Could not generate a unique invite code".into(),
        ))
    }

    fn view(&self, household: Household) -> LedgerResult<HouseholdView> {
        let members = self.storage.households.members(household.id)?;
        Ok(HouseholdView { household, members })
    }

    /// Create a household and link its creator in one write
    pub fn create(
        &self,
        user_id: UserId,
        name: &str,
        split_method: SplitMethod,
        custom_split: Option<CustomSplit>,
    ) -> LedgerResult<HouseholdView> {
        let mut user = self
            .storage
            .households
            .get_user(user_id)?
            .ok_or_else(|| LedgerError::user_not_found(user_id.to_string()))?;

        if user.household_id.is_some() {
            warn!(user = %user_id, "refused household creation: already a member elsewhere");
            return Err(LedgerError::Validation(
                "User already belongs to a household".into(),
            ));
        }

        let mut household = Household::new(name.trim(), self.unique_invite_code()?);
        household.set_split(split_method, custom_split);
        household
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let before = user.clone();
        user.join(household.id);
        self.storage
            .households
            .create_with_member(household.clone(), user.clone())?;

        self.storage.log_create(
            EntityType::Household,
            household.id.to_string(),
            Some(household.name.clone()),
            &household,
        )?;
        self.storage.log_update(
            EntityType::User,
            user.id.to_string(),
            Some(user.name.clone()),
            &before,
            &user,
        )?;
        info!(household = %household.id, user = %user_id, "created household");

        self.view(household)
    }

    /// Join an active household by invite code
    pub fn join(&self, user_id: UserId, invite_code: &str) -> LedgerResult<HouseholdView> {
        let mut user = self
            .storage
            .households
            .get_user(user_id)?
            .ok_or_else(|| LedgerError::user_not_found(user_id.to_string()))?;

        if user.household_id.is_some() {
            return Err(LedgerError::Validation(
                "User already belongs to a household".into(),
            ));
        }

        let household = self
            .storage
            .households
            .find_by_invite_code(invite_code)?
            .ok_or_else(|| LedgerError::household_not_found(invite_code.trim().to_string()))?;

        if self.storage.households.members(household.id)?.len() >= MAX_MEMBERS {
            warn!(household = %household.id, "refused join: household is full");
            return Err(LedgerError::Validation(
                "This household already has two members".into(),
            ));
        }

        let before = user.clone();
        user.join(household.id);
        self.storage.households.upsert_user(user.clone())?;
        self.storage.households.save()?;

        self.storage.log_update(
            EntityType::User,
            user.id.to_string(),
            Some(user.name.clone()),
            &before,
            &user,
        )?;
        info!(household = %household.id, user = %user_id, "joined household");

        self.view(household)
    }

    /// Leave the current household; an emptied household is deactivated
    pub fn leave(&self, user_id: UserId) -> LedgerResult<()> {
        let mut user = self
            .storage
            .households
            .get_user(user_id)?
            .ok_or_else(|| LedgerError::user_not_found(user_id.to_string()))?;

        let Some(household_id) = user.household_id else {
            return Err(LedgerError::Validation(
                "User does not belong to a household".into(),
            ));
        };

        let before = user.clone();
        user.leave();
        self.storage.households.upsert_user(user.clone())?;

        let deactivated = if self.storage.households.members(household_id)?.is_empty() {
            match self.storage.households.get(household_id)? {
                Some(household) => {
                    let mut closed = household.clone();
                    closed.is_active = false;
                    closed.updated_at = chrono::Utc::now();
                    self.storage.households.upsert(closed.clone())?;
                    Some((household, closed))
                }
                None => None,
            }
        } else {
            None
        };

        self.storage.households.save()?;

        self.storage.log_update(
            EntityType::User,
            user.id.to_string(),
            Some(user.name.clone()),
            &before,
            &user,
        )?;
        if let Some((before, after)) = deactivated {
            self.storage.log_update(
                EntityType::Household,
                after.id.to_string(),
                Some(after.name.clone()),
                &before,
                &after,
            )?;
            info!(household = %household_id, "deactivated empty household");
        }
        info!(household = %household_id, user = %user_id, "left household");

        Ok(())
    }

    /// The caller's household with its members
    pub fn my_household(&self, user_id: UserId) -> LedgerResult<HouseholdView> {
        let (_, household) = membership(self.storage, user_id)?;
        self.view(household)
    }

    /// Change the split method; only members of the household may do so
    pub fn update_split(
        &self,
        user_id: UserId,
        household_id: HouseholdId,
        split_method: SplitMethod,
        custom_split: Option<CustomSplit>,
    ) -> LedgerResult<HouseholdView> {
        let user = self
            .storage
            .households
            .get_user(user_id)?
            .filter(|u| u.household_id == Some(household_id))
            .ok_or_else(|| {
                LedgerError::Forbidden("only members may change a household's split".into())
            })?;

        let before = self
            .storage
            .households
            .get(household_id)?
            .filter(|h| h.is_active)
            .ok_or_else(|| LedgerError::household_not_found(household_id.to_string()))?;

        let mut household = before.clone();
        household.set_split(split_method, custom_split);
        household
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.storage.households.upsert(household.clone())?;
        self.storage.households.save()?;

        self.storage.log_update(
            EntityType::Household,
            household.id.to_string(),
            Some(household.name.clone()),
            &before,
            &household,
        )?;
        info!(household = %household_id, user = %user.id, method = %split_method, "updated split method");

        self.view(household)
    }

    /// Resolve the caller's household into a split configuration
    ///
    /// Equity only makes sense between exactly two members, so anything else
    /// is refused rather than producing a partial report.
    pub fn split_config_for(&self, user_id: UserId) -> LedgerResult<(Household, SplitConfig)> {
        let (_, household) = membership(self.storage, user_id)?;
        let members = self.storage.households.members(household.id)?;

        match members.as_slice() {
            [first, second] => {
                let config = SplitConfig::for_household(&household, first.id, second.id);
                Ok((household, config))
            }
            _ => {
                warn!(household = %household.id, members = members.len(), "split requested without two members");
                Err(LedgerError::Forbidden(
                    "household must have two members".into(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::services::UserService;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_invite_code_shape() {
        let code = random_invite_code();
        assert_eq!(code.len(), 8);
        assert!(code
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn test_invite_code_symbols_are_evenly_spread() {
        let mut counts = std::collections::HashMap::new();
        for _ in 0..5000 {
            for c in random_invite_code().chars() {
                *counts.entry(c).or_insert(0usize) += 1;
            }
        }

        // 40000 symbols over 36 choices: about 1111 each
        assert_eq!(counts.len(), INVITE_ALPHABET.len());
        for (symbol, count) in counts {
            assert!((950..=1280).contains(&count), "{} drawn {} times", symbol, count);
        }
    }

    #[test]
    fn test_create_links_creator() {
        let (_temp_dir, storage) = create_test_storage();
        let ana = UserService::new(&storage).register("Ana", "").unwrap();
        let service = HouseholdService::new(&storage);

        let view = service
            .create(ana.id, "Home", SplitMethod::FiftyFifty, None)
            .unwrap();
        assert_eq!(view.members.len(), 1);
        assert_eq!(view.members[0].id, ana.id);
        assert!(view.household.is_active);

        let err = service
            .create(ana.id, "Second", SplitMethod::FiftyFifty, None)
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_custom_split_must_sum_to_100() {
        let (_temp_dir, storage) = create_test_storage();
        let ana = UserService::new(&storage).register("Ana", "").unwrap();
        let service = HouseholdService::new(&storage);

        let err = service
            .create(ana.id, "Home", SplitMethod::Custom, Some(CustomSplit::new(60.0, 30.0)))
            .unwrap_err();
        assert!(err.is_validation());
        assert!(storage.households.get_user(ana.id).unwrap().unwrap().household_id.is_none());

        let view = service
            .create(ana.id, "Home", SplitMethod::Custom, Some(CustomSplit::new(60.0, 40.0)))
            .unwrap();
        assert_eq!(view.household.custom_split, Some(CustomSplit::new(60.0, 40.0)));
    }

    #[test]
    fn test_join_limits_to_two_members() {
        let (_temp_dir, storage) = create_test_storage();
        let users = UserService::new(&storage);
        let ana = users.register("Ana", "").unwrap();
        let bruno = users.register("Bruno", "").unwrap();
        let carla = users.register("Carla", "").unwrap();
        let service = HouseholdService::new(&storage);

        let code = service
            .create(ana.id, "Home", SplitMethod::FiftyFifty, None)
            .unwrap()
            .household
            .invite_code;

        let view = service.join(bruno.id, &code.to_lowercase()).unwrap();
        assert_eq!(view.members.len(), 2);
        assert_eq!(view.members[0].id, ana.id);
        assert_eq!(view.members[1].id, bruno.id);

        assert!(service.join(carla.id, &code).unwrap_err().is_validation());
        assert!(service.join(carla.id, "NOPE0000").unwrap_err().is_not_found());
    }

    #[test]
    fn test_leave_deactivates_empty_household() {
        let (_temp_dir, storage) = create_test_storage();
        let users = UserService::new(&storage);
        let ana = users.register("Ana", "").unwrap();
        let bruno = users.register("Bruno", "").unwrap();
        let service = HouseholdService::new(&storage);

        let household = service
            .create(ana.id, "Home", SplitMethod::FiftyFifty, None)
            .unwrap()
            .household;
        service.join(bruno.id, &household.invite_code).unwrap();

        service.leave(ana.id).unwrap();
        assert!(storage.households.get(household.id).unwrap().unwrap().is_active);

        service.leave(bruno.id).unwrap();
        assert!(!storage.households.get(household.id).unwrap().unwrap().is_active);
        assert!(service.leave(bruno.id).unwrap_err().is_validation());
        assert!(service.join(ana.id, &household.invite_code).unwrap_err().is_not_found());
    }

    #[test]
    fn test_update_split_requires_membership() {
        let (_temp_dir, storage) = create_test_storage();
        let users = UserService::new(&storage);
        let ana = users.register("Ana", "").unwrap();
        let outsider = users.register("Zed", "").unwrap();
        let service = HouseholdService::new(&storage);

        let household = service
            .create(ana.id, "Home", SplitMethod::FiftyFifty, None)
            .unwrap()
            .household;

        let err = service
            .update_split(outsider.id, household.id, SplitMethod::OnePays, None)
            .unwrap_err();
        assert!(err.is_forbidden());

        let view = service
            .update_split(ana.id, household.id, SplitMethod::Proportional, None)
            .unwrap();
        assert_eq!(view.household.split_method, SplitMethod::Proportional);
    }

    #[test]
    fn test_split_config_needs_two_members() {
        let (_temp_dir, storage) = create_test_storage();
        let users = UserService::new(&storage);
        let ana = users.register("Ana", "").unwrap();
        let bruno = users.register("Bruno", "").unwrap();
        let service = HouseholdService::new(&storage);

        let household = service
            .create(ana.id, "Home", SplitMethod::OnePays, None)
            .unwrap()
            .household;
        assert!(service.split_config_for(ana.id).unwrap_err().is_forbidden());

        service.join(bruno.id, &household.invite_code).unwrap();
        let (_, config) = service.split_config_for(bruno.id).unwrap();
        assert_eq!(config.method, SplitMethod::OnePays);
        assert_eq!(config.user1_id, ana.id);
        assert_eq!(config.user2_id, bruno.id);
    }
}
