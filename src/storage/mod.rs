//! Storage layer for the household ledger
//!
//! One JSON file per record group under the data directory, held in memory
//! behind `RwLock`ed tables and written back with atomic renames. Mutations
//! made through services are also appended to the audit log.
//!
//! There is no optimistic concurrency: two processes recomputing the same
//! budget or goal can overwrite each other's derived fields.

pub mod budgets;
pub mod cards;
pub mod chores;
pub mod expenses;
pub mod file_io;
pub mod households;
pub mod incomes;
pub mod notifications;
pub mod savings;
mod table;

pub use budgets::BudgetRepository;
pub use cards::CardRepository;
pub use chores::ChoreRepository;
pub use expenses::ExpenseRepository;
pub use file_io::{read_json, write_json_atomic};
pub use households::HouseholdRepository;
pub use incomes::IncomeRepository;
pub use notifications::NotificationRepository;
pub use savings::SavingsRepository;

use serde::Serialize;
use tracing::debug;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::LedgerPaths;
use crate::error::LedgerResult;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: LedgerPaths,
    pub households: HouseholdRepository,
    pub incomes: IncomeRepository,
    pub expenses: ExpenseRepository,
    pub cards: CardRepository,
    pub budgets: BudgetRepository,
    pub savings: SavingsRepository,
    pub chores: ChoreRepository,
    pub notifications: NotificationRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance; data is not read until `load_all`
    pub fn new(paths: LedgerPaths) -> LedgerResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            households: HouseholdRepository::new(paths.households_file()),
            incomes: IncomeRepository::new(paths.incomes_file()),
            expenses: ExpenseRepository::new(paths.expenses_file()),
            cards: CardRepository::new(paths.cards_file()),
            budgets: BudgetRepository::new(paths.budgets_file()),
            savings: SavingsRepository::new(paths.savings_file()),
            chores: ChoreRepository::new(paths.chores_file()),
            notifications: NotificationRepository::new(paths.notifications_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Create storage and load everything from disk
    pub fn open(paths: LedgerPaths) -> LedgerResult<Self> {
        let storage = Self::new(paths)?;
        storage.load_all()?;
        Ok(storage)
    }

    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }

    pub fn load_all(&self) -> LedgerResult<()> {
        self.households.load()?;
        self.incomes.load()?;
        self.expenses.load()?;
        self.cards.load()?;
        self.budgets.load()?;
        self.savings.load()?;
        self.chores.load()?;
        self.notifications.load()?;
        debug!(base = %self.paths.base_dir().display(), "storage loaded");
        Ok(())
    }

    pub fn save_all(&self) -> LedgerResult<()> {
        self.households.save()?;
        self.incomes.save()?;
        self.expenses.save()?;
        self.cards.save()?;
        self.budgets.save()?;
        self.savings.save()?;
        self.chores.save()?;
        self.notifications.save()?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> LedgerResult<()> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> LedgerResult<()> {
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
        ))
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> LedgerResult<()> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::models::User;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths.clone()).unwrap();

        let user = User::new("Ana", "ana@example.com");
        storage.households.upsert_user(user.clone()).unwrap();
        storage.save_all().unwrap();
        storage
            .log_create(EntityType::User, user.id.to_string(), Some(user.name.clone()), &user)
            .unwrap();

        let reopened = Storage::open(paths).unwrap();
        assert_eq!(reopened.households.get_user(user.id).unwrap().unwrap().name, "Ana");

        let entries = reopened.audit().read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Create);
    }
}
