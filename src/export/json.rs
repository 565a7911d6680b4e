//! JSON export of a household snapshot
//!
//! The snapshot carries everything recorded for one household with a schema
//! version so an older export can be recognised when read back.

use std::collections::HashSet;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Budget, ChoreEntry, ChoreTemplate, Contribution, ContributionTarget, Dream, Expense, Goal,
    Household, HouseholdId, Income, Installment, User,
};
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Everything recorded for one household
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HouseholdSnapshot {
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,
    pub app_version: String,

    pub household: Household,
    pub members: Vec<User>,
    pub incomes: Vec<Income>,
    pub expenses: Vec<Expense>,
    pub installments: Vec<Installment>,
    pub budgets: Vec<Budget>,
    pub goals: Vec<Goal>,
    pub dreams: Vec<Dream>,
    pub contributions: Vec<Contribution>,
    /// The household's own chore templates; built-ins are not exported
    #[serde(default)]
    pub chore_templates: Vec<ChoreTemplate>,
    #[serde(default)]
    pub chore_entries: Vec<ChoreEntry>,

    pub metadata: SnapshotMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub income_count: usize,
    pub expense_count: usize,
    pub installment_count: usize,
    pub unpaid_installment_count: usize,
    /// Earliest expense date
    pub earliest_expense: Option<String>,
    /// Latest expense date
    pub latest_expense: Option<String>,
}

impl HouseholdSnapshot {
    /// Collect a household's records from storage
    pub fn from_storage(storage: &Storage, household_id: HouseholdId) -> LedgerResult<Self> {
        let household = storage
            .households
            .get(household_id)?
            .ok_or_else(|| LedgerError::household_not_found(household_id.to_string()))?;
        let members = storage.households.members(household_id)?;
        let incomes = storage.incomes.for_household(household_id)?;
        let expenses = storage.expenses.for_household(household_id)?;
        let installments = storage.expenses.installments_for_household(household_id)?;
        let budgets = storage.budgets.for_household(household_id)?;
        let goals = storage.savings.goals_for(household_id)?;
        let dreams = storage.savings.dreams_for(household_id)?;

        let mut contributions = Vec::new();
        for goal in &goals {
            contributions.extend(storage.savings.contributions_for(ContributionTarget::Goal(goal.id))?);
        }
        for dream in &dreams {
            contributions.extend(storage.savings.contributions_for(ContributionTarget::Dream(dream.id))?);
        }

        let chore_templates = storage.chores.custom_templates_for(household_id)?;
        let chore_entries = storage.chores.entries_for(household_id)?;

        let metadata = SnapshotMetadata {
            income_count: incomes.len(),
            expense_count: expenses.len(),
            installment_count: installments.len(),
            unpaid_installment_count: installments.iter().filter(|i| !i.is_paid).count(),
            earliest_expense: expenses.iter().map(|e| e.date).min().map(|d| d.to_string()),
            latest_expense: expenses.iter().map(|e| e.date).max().map(|d| d.to_string()),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            household,
            members,
            incomes,
            expenses,
            installments,
            budgets,
            goals,
            dreams,
            contributions,
            chore_templates,
            chore_entries,
            metadata,
        })
    }

    /// Check the schema version and that every record points inside the snapshot
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let household_id = self.household.id;
        let foreign = self
            .incomes
            .iter()
            .map(|i| i.household_id)
            .chain(self.expenses.iter().map(|e| e.household_id))
            .chain(self.budgets.iter().map(|b| b.household_id))
            .chain(self.goals.iter().map(|g| g.household_id))
            .chain(self.dreams.iter().map(|d| d.household_id))
            .chain(self.chore_entries.iter().map(|c| c.household_id))
            .chain(self.chore_templates.iter().filter_map(|t| t.household_id))
            .find(|&id| id != household_id);
        if let Some(other) = foreign {
            return Err(format!("Record belongs to another household {}", other));
        }

        let expense_ids: HashSet<_> = self.expenses.iter().map(|e| e.id).collect();
        if let Some(orphan) = self
            .installments
            .iter()
            .find(|i| !expense_ids.contains(&i.expense_id))
        {
            return Err(format!(
                "Installment {} references unknown expense {}",
                orphan.id, orphan.expense_id
            ));
        }

        let goal_ids: HashSet<_> = self.goals.iter().map(|g| g.id).collect();
        let dream_ids: HashSet<_> = self.dreams.iter().map(|d| d.id).collect();
        for contribution in &self.contributions {
            let known = match contribution.target {
                ContributionTarget::Goal(id) => goal_ids.contains(&id),
                ContributionTarget::Dream(id) => dream_ids.contains(&id),
            };
            if !known {
                return Err(format!(
                    "Contribution {} references unknown target {}",
                    contribution.id, contribution.target
                ));
            }
        }

        Ok(())
    }
}

/// Write the household snapshot as JSON
pub fn export_household_json<W: Write>(
    storage: &Storage,
    household_id: HouseholdId,
    writer: &mut W,
    pretty: bool,
) -> LedgerResult<()> {
    let snapshot = HouseholdSnapshot::from_storage(storage, household_id)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &snapshot)
    } else {
        serde_json::to_writer(writer, &snapshot)
    }
    .map_err(|e| LedgerError::Export(e.to_string()))?;

    Ok(())
}

/// Read a JSON snapshot back and validate it
pub fn read_json_snapshot(json_str: &str) -> LedgerResult<HouseholdSnapshot> {
    let snapshot: HouseholdSnapshot =
        serde_json::from_str(json_str).map_err(|e| LedgerError::Export(e.to_string()))?;
    snapshot.validate().map_err(LedgerError::Export)?;
    Ok(snapshot)
}
