//! Recurrence schedule shared by incomes and expenses

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How often a recurring cash flow repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    Weekly,
    Biweekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "weekly" | "w" => Some(Self::Weekly),
            "biweekly" | "bi-weekly" | "fortnightly" => Some(Self::Biweekly),
            "monthly" | "m" => Some(Self::Monthly),
            "yearly" | "annual" | "y" => Some(Self::Yearly),
            _ => None,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weekly => write!(f, "Weekly"),
            Self::Biweekly => write!(f, "Biweekly"),
            Self::Monthly => write!(f, "Monthly"),
            Self::Yearly => write!(f, "Yearly"),
        }
    }
}

/// A recurring schedule anchored on the most recent materialized occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    pub frequency: Frequency,
    pub last_occurrence: NaiveDate,
}

impl Recurrence {
    pub fn new(frequency: Frequency, last_occurrence: NaiveDate) -> Self {
        Self {
            frequency,
            last_occurrence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_parse() {
        assert_eq!(Frequency::parse("Monthly"), Some(Frequency::Monthly));
        assert_eq!(Frequency::parse("bi-weekly"), Some(Frequency::Biweekly));
        assert_eq!(Frequency::parse("daily"), None);
    }

    #[test]
    fn test_frequency_serialization() {
        let json = serde_json::to_string(&Frequency::Biweekly).unwrap();
        assert_eq!(json, "\"BIWEEKLY\"");
    }
}
