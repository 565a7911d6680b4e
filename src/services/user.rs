//! User service
//!
//! Registration and lookup of the people using the ledger. Authentication
//! is outside the ledger; callers pass an already-resolved `UserId`.

use tracing::info;

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{User, UserId};
use crate::storage::Storage;

pub struct UserService<'a> {
    storage: &'a Storage,
}

impl<'a> UserService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Register a new user; a non-empty email must be unique
    pub fn register(&self, name: &str, email: &str) -> LedgerResult<User> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::Validation("User name cannot be empty".into()));
        }

        let email = email.trim();
        if self.storage.households.email_taken(email)? {
            return Err(LedgerError::Duplicate {
                entity_type: "User",
                identifier: email.to_string(),
            });
        }

        let user = User::new(name, email);
        self.storage.households.upsert_user(user.clone())?;
        self.storage.households.save()?;

        self.storage.log_create(
            EntityType::User,
            user.id.to_string(),
            Some(user.name.clone()),
            &user,
        )?;
        info!(user = %user.id, "registered user");

        Ok(user)
    }

    pub fn get(&self, id: UserId) -> LedgerResult<Option<User>> {
        self.storage.households.get_user(id)
    }

    /// Fetch a user or fail with `NotFound`
    pub fn require(&self, id: UserId) -> LedgerResult<User> {
        self.storage
            .households
            .get_user(id)?
            .ok_or_else(|| LedgerError::user_not_found(id.to_string()))
    }

    /// Find a user by name (case-insensitive), email, short ID or full ID
    pub fn find(&self, identifier: &str) -> LedgerResult<Option<User>> {
        let needle = identifier.trim().to_lowercase();
        let users = self.storage.households.get_users()?;
        if let Some(user) = users.into_iter().find(|u| {
            u.name.to_lowercase() == needle
                || (!u.email.is_empty() && u.email.to_lowercase() == needle)
                || u.id.to_string() == needle
        }) {
            return Ok(Some(user));
        }

        if let Ok(id) = identifier.parse::<UserId>() {
            return self.storage.households.get_user(id);
        }

        Ok(None)
    }

    pub fn list(&self) -> LedgerResult<Vec<User>> {
        self.storage.households.get_users()
    }
}
