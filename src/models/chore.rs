//! Domestic chores
//!
//! A chore template names a kind of housework and how heavy it is. Members log
//! completed chores against a template; the monthly domestic equity weighs
//! each entry by the template's weight and the hours spent.
//!
//! Built-in templates are a fixed catalogue shared by every household. Their
//! ids are derived from their names, so they stay stable without being stored.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::ids::{ChoreEntryId, ChoreTemplateId, HouseholdId, UserId};

/// Most hours one entry may claim
pub const MAX_CHORE_HOURS: f64 = 24.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChoreKind {
    Dishes,
    Cooking,
    Cleaning,
    Laundry,
    Maintenance,
    Grocery,
    PetCare,
    #[default]
    Other,
}

impl ChoreKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "dishes" => Some(Self::Dishes),
            "cooking" => Some(Self::Cooking),
            "cleaning" => Some(Self::Cleaning),
            "laundry" => Some(Self::Laundry),
            "maintenance" => Some(Self::Maintenance),
            "grocery" | "groceries" => Some(Self::Grocery),
            "petcare" | "pets" => Some(Self::PetCare),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for ChoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PetCare => write!(f, "Pet care"),
            other => write!(f, "{:?}", other),
        }
    }
}

/// How demanding a chore is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChoreWeight {
    Light,
    #[default]
    Medium,
    Heavy,
}

impl ChoreWeight {
    /// Points for one completion, before hours
    pub fn points(self) -> u32 {
        match self {
            Self::Light => 1,
            Self::Medium => 2,
            Self::Heavy => 3,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" => Some(Self::Light),
            "medium" => Some(Self::Medium),
            "heavy" => Some(Self::Heavy),
            _ => None,
        }
    }
}

impl fmt::Display for ChoreWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoreValidationError {
    EmptyName,
    InvalidHours,
}

impl fmt::Display for ChoreValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Chore name cannot be empty"),
            Self::InvalidHours => write!(
                f,
                "Hours must be greater than zero and at most {}",
                MAX_CHORE_HOURS
            ),
        }
    }
}

impl std::error::Error for ChoreValidationError {}

/// A kind of housework members can log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoreTemplate {
    pub id: ChoreTemplateId,
    /// `None` for the built-in catalogue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub household_id: Option<HouseholdId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub kind: ChoreKind,
    pub weight: ChoreWeight,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChoreTemplate {
    /// A household's own template
    pub fn new(
        household_id: HouseholdId,
        name: impl Into<String>,
        kind: ChoreKind,
        weight: ChoreWeight,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ChoreTemplateId::new(),
            household_id: Some(household_id),
            name: name.into(),
            description: String::new(),
            kind,
            weight,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn built_in(name: &str, kind: ChoreKind, weight: ChoreWeight) -> Self {
        let id = Uuid::new_v5(&Uuid::NAMESPACE_OID, format!("chore:{}", name).as_bytes());
        Self {
            id: ChoreTemplateId::from_uuid(id),
            household_id: None,
            name: name.to_string(),
            description: String::new(),
            kind,
            weight,
            is_active: true,
            created_at: DateTime::<Utc>::default(),
            updated_at: DateTime::<Utc>::default(),
        }
    }

    pub fn is_built_in(&self) -> bool {
        self.household_id.is_none()
    }

    /// Built-ins are usable by everyone, custom templates only by their household
    pub fn is_visible_to(&self, household_id: HouseholdId) -> bool {
        self.household_id.map_or(true, |owner| owner == household_id)
    }

    pub fn validate(&self) -> Result<(), ChoreValidationError> {
        if self.name.trim().is_empty() {
            return Err(ChoreValidationError::EmptyName);
        }
        Ok(())
    }
}

/// The catalogue every household starts with
pub fn built_in_chores() -> Vec<ChoreTemplate> {
    use ChoreKind::*;
    use ChoreWeight::*;

    [
        ("Wash dishes", Dishes, Medium),
        ("Cook", Cooking, Medium),
        ("Clean kitchen", Cleaning, Heavy),
        ("Mop floors", Cleaning, Medium),
        ("Clean bathroom", Cleaning, Heavy),
        ("Do laundry", Laundry, Heavy),
        ("Fold laundry", Laundry, Light),
        ("Take out trash", Maintenance, Light),
        ("Grocery shopping", Grocery, Medium),
        ("Pet care", PetCare, Medium),
    ]
    .into_iter()
    .map(|(name, kind, weight)| ChoreTemplate::built_in(name, kind, weight))
    .collect()
}

/// One completed chore
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoreEntry {
    pub id: ChoreEntryId,
    pub household_id: HouseholdId,
    pub user_id: UserId,
    pub template_id: ChoreTemplateId,
    /// Counted as one hour when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<f64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub note: String,
    pub completed_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl ChoreEntry {
    pub fn new(
        household_id: HouseholdId,
        user_id: UserId,
        template_id: ChoreTemplateId,
        completed_on: NaiveDate,
    ) -> Self {
        Self {
            id: ChoreEntryId::new(),
            household_id,
            user_id,
            template_id,
            hours: None,
            note: String::new(),
            completed_on,
            created_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> Result<(), ChoreValidationError> {
        match self.hours {
            Some(h) if !(h > 0.0 && h <= MAX_CHORE_HOURS) => Err(ChoreValidationError::InvalidHours),
            _ => Ok(()),
        }
    }
}
