//! Household, user and split policy models
//!
//! A household is the two-member unit across which money is shared. The split
//! method stored on the household decides how shared expenses are divided.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{HouseholdId, UserId};

/// How responsibility for a shared expense is divided between the members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SplitMethod {
    /// Even halves
    #[default]
    FiftyFifty,
    /// Fixed percentages per member
    Custom,
    /// Proportional to each member's income for the period
    Proportional,
    /// Whoever records the expense is responsible for all of it
    OnePays,
    /// Household-absorbed: nobody owes anything
    NoSplit,
}

impl SplitMethod {
    pub fn all() -> &'static [SplitMethod] {
        &[
            Self::FiftyFifty,
            Self::Custom,
            Self::Proportional,
            Self::OnePays,
            Self::NoSplit,
        ]
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "fiftyfifty" | "5050" | "even" => Some(Self::FiftyFifty),
            "custom" => Some(Self::Custom),
            "proportional" => Some(Self::Proportional),
            "onepays" => Some(Self::OnePays),
            "nosplit" => Some(Self::NoSplit),
            _ => None,
        }
    }
}

impl fmt::Display for SplitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::FiftyFifty => "50/50",
            Self::Custom => "Custom",
            Self::Proportional => "Proportional to income",
            Self::OnePays => "One pays",
            Self::NoSplit => "No split",
        };
        write!(f, "{}", label)
    }
}

/// Custom percentages for the CUSTOM split method
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CustomSplit {
    pub user1_percentage: f64,
    pub user2_percentage: f64,
}

impl CustomSplit {
    pub fn new(user1_percentage: f64, user2_percentage: f64) -> Self {
        Self {
            user1_percentage,
            user2_percentage,
        }
    }

    /// Configuration-time check: both percentages non-negative, summing to 100
    pub fn validate(&self) -> Result<(), HouseholdValidationError> {
        if self.user1_percentage < 0.0 || self.user2_percentage < 0.0 {
            return Err(HouseholdValidationError::NegativePercentage);
        }
        let total = self.user1_percentage + self.user2_percentage;
        if (total - 100.0).abs() > 1e-9 {
            return Err(HouseholdValidationError::PercentagesMustSumTo100(total));
        }
        Ok(())
    }
}

/// A person using the ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub household_id: Option<HouseholdId>,
    /// When the user joined their current household; orders the two members
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            email: email.into(),
            household_id: None,
            joined_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn join(&mut self, household_id: HouseholdId) {
        self.household_id = Some(household_id);
        self.joined_at = Some(Utc::now());
    }

    pub fn leave(&mut self) {
        self.household_id = None;
        self.joined_at = None;
    }
}

/// A shared household
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Household {
    pub id: HouseholdId,
    pub name: String,
    pub invite_code: String,
    #[serde(default)]
    pub split_method: SplitMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_split: Option<CustomSplit>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Household {
    pub fn new(name: impl Into<String>, invite_code: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: HouseholdId::new(),
            name: name.into(),
            invite_code: invite_code.into(),
            split_method: SplitMethod::default(),
            custom_split: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the split method; the custom split is only kept for CUSTOM
    pub fn set_split(&mut self, method: SplitMethod, custom_split: Option<CustomSplit>) {
        self.split_method = method;
        self.custom_split = if method == SplitMethod::Custom {
            custom_split
        } else {
            None
        };
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Result<(), HouseholdValidationError> {
        if self.name.trim().is_empty() {
            return Err(HouseholdValidationError::EmptyName);
        }
        if self.split_method == SplitMethod::Custom {
            self.custom_split
                .as_ref()
                .ok_or(HouseholdValidationError::MissingCustomSplit)?
                .validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HouseholdValidationError {
    EmptyName,
    MissingCustomSplit,
    NegativePercentage,
    PercentagesMustSumTo100(f64),
}

impl fmt::Display for HouseholdValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Household name cannot be empty"),
            Self::MissingCustomSplit => {
                write!(f, "A custom split requires both member percentages")
            }
            Self::NegativePercentage => write!(f, "Split percentages cannot be negative"),
            Self::PercentagesMustSumTo100(total) => {
                write!(f, "Custom split percentages must sum to 100 (got {})", total)
            }
        }
    }
}

impl std::error::Error for HouseholdValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_method_serialization() {
        let json = serde_json::to_string(&SplitMethod::FiftyFifty).unwrap();
        assert_eq!(json, "\"FIFTY_FIFTY\"");
        let parsed: SplitMethod = serde_json::from_str("\"NO_SPLIT\"").unwrap();
        assert_eq!(parsed, SplitMethod::NoSplit);
    }

    #[test]
    fn test_split_method_parse() {
        assert_eq!(SplitMethod::parse("fifty_fifty"), Some(SplitMethod::FiftyFifty));
        assert_eq!(SplitMethod::parse("one-pays"), Some(SplitMethod::OnePays));
        assert_eq!(SplitMethod::parse("PROPORTIONAL"), Some(SplitMethod::Proportional));
        assert_eq!(SplitMethod::parse("whatever"), None);
    }

    #[test]
    fn test_custom_split_validation() {
        assert!(CustomSplit::new(70.0, 30.0).validate().is_ok());
        assert_eq!(
            CustomSplit::new(70.0, 40.0).validate(),
            Err(HouseholdValidationError::PercentagesMustSumTo100(110.0))
        );
        assert_eq!(
            CustomSplit::new(-10.0, 110.0).validate(),
            Err(HouseholdValidationError::NegativePercentage)
        );
    }

    #[test]
    fn test_household_requires_custom_split_for_custom_method() {
        let mut household = Household::new("Home", "ABCD1234");
        assert!(household.validate().is_ok());

        household.set_split(SplitMethod::Custom, None);
        assert_eq!(
            household.validate(),
            Err(HouseholdValidationError::MissingCustomSplit)
        );

        household.set_split(SplitMethod::Custom, Some(CustomSplit::new(60.0, 40.0)));
        assert!(household.validate().is_ok());
    }

    #[test]
    fn test_custom_split_dropped_for_other_methods() {
        let mut household = Household::new("Home", "ABCD1234");
        household.set_split(SplitMethod::OnePays, Some(CustomSplit::new(60.0, 40.0)));
        assert!(household.custom_split.is_none());
    }
}
