//! Chore templates and completed chores (chores.json)
//!
//! Only household templates are written to disk; the built-in catalogue is
//! rebuilt in memory and always takes precedence on lookup.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LedgerResult;
use crate::models::{
    built_in_chores, ChoreEntry, ChoreEntryId, ChoreTemplate, ChoreTemplateId, HouseholdId,
    MonthPeriod,
};

use super::file_io::{read_json, write_json_atomic};
use super::table::Table;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ChoreData {
    #[serde(default)]
    templates: Vec<ChoreTemplate>,
    #[serde(default)]
    entries: Vec<ChoreEntry>,
}

pub struct ChoreRepository {
    path: PathBuf,
    built_in: Vec<ChoreTemplate>,
    templates: Table<ChoreTemplateId, ChoreTemplate>,
    entries: Table<ChoreEntryId, ChoreEntry>,
}

impl ChoreRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            built_in: built_in_chores(),
            templates: Table::new(),
            entries: Table::new(),
        }
    }

    pub fn load(&self) -> LedgerResult<()> {
        let file_data: ChoreData = read_json(&self.path)?;
        debug!(
            templates = file_data.templates.len(),
            entries = file_data.entries.len(),
            "loaded chores"
        );
        self.templates.replace_all(
            file_data
                .templates
                .into_iter()
                .filter(|t| !t.is_built_in())
                .collect(),
            |t| t.id,
        )?;
        self.entries.replace_all(file_data.entries, |e| e.id)?;
        Ok(())
    }

    pub fn save(&self) -> LedgerResult<()> {
        let mut templates = self.templates.all()?;
        templates.sort_by_key(|t| t.created_at);
        let mut entries = self.entries.all()?;
        entries.sort_by_key(|e| (e.completed_on, e.created_at));

        write_json_atomic(&self.path, &ChoreData { templates, entries })
    }

    pub fn get_template(&self, id: ChoreTemplateId) -> LedgerResult<Option<ChoreTemplate>> {
        if let Some(built_in) = self.built_in.iter().find(|t| t.id == id) {
            return Ok(Some(built_in.clone()));
        }
        self.templates.get(id)
    }

    /// Store a household template; built-ins are never stored
    pub fn upsert_template(&self, template: ChoreTemplate) -> LedgerResult<()> {
        if !template.is_built_in() {
            self.templates.upsert(template.id, template)?;
        }
        Ok(())
    }

    /// Active built-ins plus the household's own active templates, by name
    pub fn templates_for(&self, household_id: HouseholdId) -> LedgerResult<Vec<ChoreTemplate>> {
        let mut templates: Vec<ChoreTemplate> = self.built_in.clone();
        templates.extend(
            self.templates
                .filter(|t| t.is_active && t.household_id == Some(household_id))?,
        );
        templates.sort_by_key(|t| t.name.to_lowercase());
        Ok(templates)
    }

    pub fn get_entry(&self, id: ChoreEntryId) -> LedgerResult<Option<ChoreEntry>> {
        self.entries.get(id)
    }

    pub fn add_entry(&self, entry: ChoreEntry) -> LedgerResult<()> {
        self.entries.upsert(entry.id, entry)?;
        Ok(())
    }

    pub fn delete_entry(&self, id: ChoreEntryId) -> LedgerResult<Option<ChoreEntry>> {
        self.entries.remove(id)
    }

    /// A household's chores completed in `period`, newest first
    pub fn entries_in(&self, household_id: HouseholdId, period: MonthPeriod) -> LedgerResult<Vec<ChoreEntry>> {
        let mut entries = self
            .entries
            .filter(|e| e.household_id == household_id && period.contains(e.completed_on))?;
        entries.sort_by(|a, b| {
            b.completed_on
                .cmp(&a.completed_on)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(entries)
    }

    /// Every chore a household has logged, oldest first
    pub fn entries_for(&self, household_id: HouseholdId) -> LedgerResult<Vec<ChoreEntry>> {
        let mut entries = self.entries.filter(|e| e.household_id == household_id)?;
        entries.sort_by_key(|e| (e.completed_on, e.created_at));
        Ok(entries)
    }

    /// A household's own templates, retired ones included
    pub fn custom_templates_for(&self, household_id: HouseholdId) -> LedgerResult<Vec<ChoreTemplate>> {
        let mut templates = self
            .templates
            .filter(|t| t.household_id == Some(household_id))?;
        templates.sort_by_key(|t| t.created_at);
        Ok(templates)
    }
}
