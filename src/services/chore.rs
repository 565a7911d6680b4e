//! Chore service
//!
//! Household chore templates, the chores members log against them, and the
//! monthly domestic equity. Built-in templates are shared and read-only; a
//! household's own templates are retired rather than deleted so older entries
//! keep their weight.

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};

use super::household::membership;
use crate::audit::EntityType;
use crate::engine::chores::{chore_points, compute_chore_equity, ChoreRecord, ChoreReport};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    ChoreEntry, ChoreEntryId, ChoreKind, ChoreTemplate, ChoreTemplateId, ChoreWeight, Household,
    HouseholdId, MonthPeriod, User, UserId,
};
use crate::storage::Storage;

/// Input for a household template
#[derive(Debug, Clone)]
pub struct NewChoreTemplate {
    pub name: String,
    pub description: String,
    pub kind: ChoreKind,
    pub weight: ChoreWeight,
}

/// Partial change to a template; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct ChoreTemplateUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub kind: Option<ChoreKind>,
    pub weight: Option<ChoreWeight>,
}

/// A completed chore to log
#[derive(Debug, Clone)]
pub struct NewChoreEntry {
    pub template_id: ChoreTemplateId,
    pub hours: Option<f64>,
    pub note: String,
    pub completed_on: NaiveDate,
}

/// A logged chore with the template it was done against
#[derive(Debug, Clone)]
pub struct LoggedChore {
    pub entry: ChoreEntry,
    pub template: ChoreTemplate,
    pub member: String,
}

impl LoggedChore {
    pub fn points(&self) -> f64 {
        chore_points(self.template.weight, self.entry.hours)
    }
}

/// One month of domestic equity for a household
#[derive(Debug, Clone)]
pub struct ChoreStatement {
    pub household: Household,
    pub period: MonthPeriod,
    pub user1: User,
    pub user2: User,
    pub report: ChoreReport,
    pub entries: usize,
}

impl ChoreStatement {
    pub fn member_name(&self, user_id: UserId) -> &str {
        if user_id == self.user1.id {
            &self.user1.name
        } else if user_id == self.user2.id {
            &self.user2.name
        } else {
            "unknown"
        }
    }
}

fn validation(e: impl ToString) -> LedgerError {
    LedgerError::Validation(e.to_string())
}

pub struct ChoreService<'a> {
    storage: &'a Storage,
}

impl<'a> ChoreService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    fn household_of(&self, user_id: UserId) -> LedgerResult<HouseholdId> {
        Ok(membership(self.storage, user_id)?.1.id)
    }

    /// Resolve a template the household may change
    fn own_template(&self, household_id: HouseholdId, id: ChoreTemplateId) -> LedgerResult<ChoreTemplate> {
        let template = self
            .storage
            .chores
            .get_template(id)?
            .ok_or_else(|| LedgerError::chore_not_found(id.to_string()))?;

        if template.is_built_in() {
            warn!(template = %id, "refused change to built-in chore");
            return Err(LedgerError::Forbidden(format!(
                "'{}' is a built-in chore and cannot be changed",
                template.name
            )));
        }
        if !template.is_visible_to(household_id) {
            warn!(template = %id, household = %household_id, "refused change to another household's chore");
            return Err(LedgerError::Forbidden(
                "chore belongs to another household".into(),
            ));
        }
        Ok(template)
    }

    fn ensure_unique_name(
        &self,
        household_id: HouseholdId,
        name: &str,
        except: Option<ChoreTemplateId>,
    ) -> LedgerResult<()> {
        let taken = self
            .storage
            .chores
            .templates_for(household_id)?
            .iter()
            .any(|t| Some(t.id) != except && t.name.eq_ignore_ascii_case(name));
        if taken {
            return Err(LedgerError::Duplicate {
                entity_type: "Chore",
                identifier: name.to_string(),
            });
        }
        Ok(())
    }

    /// Active templates the caller's household can log against, by name
    pub fn templates(&self, user_id: UserId) -> LedgerResult<Vec<ChoreTemplate>> {
        let household_id = self.household_of(user_id)?;
        self.storage.chores.templates_for(household_id)
    }

    /// Find an active template by name or id
    pub fn find_template(&self, user_id: UserId, identifier: &str) -> LedgerResult<Option<ChoreTemplate>> {
        let identifier = identifier.trim();
        Ok(self.templates(user_id)?.into_iter().find(|t| {
            t.name.eq_ignore_ascii_case(identifier)
                || t.id.to_string() == identifier
                || t.id.as_uuid().to_string() == identifier
        }))
    }

    pub fn create_template(&self, user_id: UserId, input: NewChoreTemplate) -> LedgerResult<ChoreTemplate> {
        let household_id = self.household_of(user_id)?;

        let mut template = ChoreTemplate::new(household_id, input.name.trim(), input.kind, input.weight);
        template.description = input.description;
        template.validate().map_err(validation)?;
        self.ensure_unique_name(household_id, &template.name, None)?;

        self.storage.chores.upsert_template(template.clone())?;
        self.storage.chores.save()?;

        self.storage.log_create(
            EntityType::ChoreTemplate,
            template.id.to_string(),
            Some(template.name.clone()),
            &template,
        )?;
        info!(template = %template.id, weight = %template.weight, "created chore");

        Ok(template)
    }

    /// Change a household template
    ///
    /// A new weight also changes how past entries score, since equity reads
    /// the template's weight when it is computed.
    pub fn update_template(
        &self,
        user_id: UserId,
        id: ChoreTemplateId,
        changes: ChoreTemplateUpdate,
    ) -> LedgerResult<ChoreTemplate> {
        let household_id = self.household_of(user_id)?;
        let before = self.own_template(household_id, id)?;

        let mut template = before.clone();
        if let Some(name) = changes.name {
            template.name = name.trim().to_string();
        }
        if let Some(description) = changes.description {
            template.description = description;
        }
        if let Some(kind) = changes.kind {
            template.kind = kind;
        }
        if let Some(weight) = changes.weight {
            template.weight = weight;
        }
        template.validate().map_err(validation)?;
        self.ensure_unique_name(household_id, &template.name, Some(id))?;
        template.updated_at = Utc::now();

        self.storage.chores.upsert_template(template.clone())?;
        self.storage.chores.save()?;

        self.storage.log_update(
            EntityType::ChoreTemplate,
            template.id.to_string(),
            Some(template.name.clone()),
            &before,
            &template,
        )?;
        info!(template = %id, "updated chore");

        Ok(template)
    }

    /// Hide a household template from new entries
    pub fn retire_template(&self, user_id: UserId, id: ChoreTemplateId) -> LedgerResult<ChoreTemplate> {
        let household_id = self.household_of(user_id)?;
        let before = self.own_template(household_id, id)?;
        if !before.is_active {
            return Err(LedgerError::chore_not_found(id.to_string()));
        }

        let mut template = before.clone();
        template.is_active = false;
        template.updated_at = Utc::now();

        self.storage.chores.upsert_template(template.clone())?;
        self.storage.chores.save()?;

        self.storage.log_update(
            EntityType::ChoreTemplate,
            template.id.to_string(),
            Some(template.name.clone()),
            &before,
            &template,
        )?;
        info!(template = %id, "retired chore");

        Ok(template)
    }

    /// Log a chore the caller completed
    pub fn record(&self, user_id: UserId, input: NewChoreEntry) -> LedgerResult<ChoreEntry> {
        let household_id = self.household_of(user_id)?;

        let template = self
            .storage
            .chores
            .get_template(input.template_id)?
            .filter(|t| t.is_active)
            .ok_or_else(|| LedgerError::chore_not_found(input.template_id.to_string()))?;
        if !template.is_visible_to(household_id) {
            warn!(template = %template.id, household = %household_id, "refused chore of another household");
            return Err(LedgerError::Forbidden(
                "chore belongs to another household".into(),
            ));
        }

        let mut entry = ChoreEntry::new(household_id, user_id, template.id, input.completed_on);
        entry.hours = input.hours;
        entry.note = input.note.trim().to_string();
        entry.validate().map_err(validation)?;

        self.storage.chores.add_entry(entry.clone())?;
        self.storage.chores.save()?;

        self.storage.log_create(
            EntityType::ChoreEntry,
            entry.id.to_string(),
            Some(template.name.clone()),
            &entry,
        )?;
        info!(entry = %entry.id, chore = %template.name, "logged chore");

        Ok(entry)
    }

    /// The household's chores for a month, newest first
    pub fn entries_for_month(&self, user_id: UserId, period: MonthPeriod) -> LedgerResult<Vec<LoggedChore>> {
        let household_id = self.household_of(user_id)?;
        let entries = self.storage.chores.entries_in(household_id, period)?;

        let mut logged = Vec::with_capacity(entries.len());
        for entry in entries {
            let Some(template) = self.storage.chores.get_template(entry.template_id)? else {
                warn!(entry = %entry.id, template = %entry.template_id, "chore entry without template");
                continue;
            };
            let member = self
                .storage
                .households
                .get_user(entry.user_id)?
                .map(|u| u.name)
                .unwrap_or_else(|| "unknown".to_string());
            logged.push(LoggedChore {
                entry,
                template,
                member,
            });
        }
        Ok(logged)
    }

    /// Find a logged chore of the caller's household by id
    pub fn find_entry(&self, user_id: UserId, identifier: &str) -> LedgerResult<Option<ChoreEntry>> {
        let household_id = self.household_of(user_id)?;
        let needle = identifier.trim().to_lowercase();
        let entries = self.storage.chores.entries_for(household_id)?;
        if let Some(found) = entries.iter().find(|e| e.id.to_string() == needle) {
            return Ok(Some(found.clone()));
        }
        match identifier.parse::<ChoreEntryId>() {
            Ok(id) => Ok(entries.into_iter().find(|e| e.id == id)),
            Err(_) => Ok(None),
        }
    }

    /// Remove one of the caller's own entries
    pub fn delete_entry(&self, user_id: UserId, id: ChoreEntryId) -> LedgerResult<ChoreEntry> {
        let household_id = self.household_of(user_id)?;
        let entry = self
            .storage
            .chores
            .get_entry(id)?
            .filter(|e| e.household_id == household_id)
            .ok_or_else(|| LedgerError::chore_entry_not_found(id.to_string()))?;
        if entry.user_id != user_id {
            warn!(entry = %id, user = %user_id, "refused deletion of another member's chore");
            return Err(LedgerError::Forbidden(
                "only the member who logged a chore can remove it".into(),
            ));
        }

        self.storage.chores.delete_entry(id)?;
        self.storage.chores.save()?;

        self.storage
            .log_delete(EntityType::ChoreEntry, id.to_string(), None, &entry)?;
        info!(entry = %id, "removed chore entry");

        Ok(entry)
    }

    /// Who did how much of the housework in `period`
    pub fn monthly_equity(&self, user_id: UserId, period: MonthPeriod) -> LedgerResult<ChoreStatement> {
        let (_, household) = membership(self.storage, user_id)?;
        let members = self.storage.households.members(household.id)?;
        let member_ids: Vec<UserId> = members.iter().map(|u| u.id).collect();

        let entries = self.storage.chores.entries_in(household.id, period)?;
        let mut records = Vec::with_capacity(entries.len());
        for entry in &entries {
            match self.storage.chores.get_template(entry.template_id)? {
                Some(template) => records.push(ChoreRecord::from_entry(entry, template.weight)),
                None => warn!(entry = %entry.id, "chore entry without template"),
            }
        }

        let report = compute_chore_equity(&member_ids, &records).map_err(|e| {
            warn!(household = %household.id, members = members.len(), "chore equity requested without two members");
            e
        })?;

        let mut members = members.into_iter();
        let (Some(user1), Some(user2)) = (members.next(), members.next()) else {
            return Err(LedgerError::Forbidden(
                "household must have two members".into(),
            ));
        };

        debug!(household = %household.id, %period, total = report.total_points, "computed chore equity");

        Ok(ChoreStatement {
            household,
            period,
            user1,
            user2,
            report,
            entries: records.len(),
        })
    }
}
