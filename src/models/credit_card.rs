//! Credit card model
//!
//! The closing day and due day anchor the card's monthly invoice cycle.
//! Invoice totals are derived from unpaid installments, never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CreditCardId, UserId};
use super::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardBrand {
    Visa,
    Mastercard,
    Elo,
    Amex,
    Hipercard,
    #[default]
    Other,
}

impl CardBrand {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "visa" => Some(Self::Visa),
            "mastercard" | "master" => Some(Self::Mastercard),
            "elo" => Some(Self::Elo),
            "amex" | "american express" => Some(Self::Amex),
            "hipercard" => Some(Self::Hipercard),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for CardBrand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Validation errors for credit cards
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreditCardValidationError {
    EmptyName,
    InvalidLastDigits(String),
    NegativeLimit,
    InvalidClosingDay(u32),
    InvalidDueDay(u32),
}

impl fmt::Display for CreditCardValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Card name cannot be empty"),
            Self::InvalidLastDigits(d) => {
                write!(f, "Last digits must be exactly 4 digits (got '{}')", d)
            }
            Self::NegativeLimit => write!(f, "Card limit cannot be negative"),
            Self::InvalidClosingDay(d) => write!(f, "Closing day must be 1-31 (got {})", d),
            Self::InvalidDueDay(d) => write!(f, "Due day must be 1-31 (got {})", d),
        }
    }
}

impl std::error::Error for CreditCardValidationError {}

/// A member's credit card
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditCard {
    pub id: CreditCardId,
    pub user_id: UserId,
    pub name: String,
    #[serde(default)]
    pub last_digits: String,
    #[serde(default)]
    pub brand: CardBrand,
    pub limit: Money,
    pub closing_day: u32,
    pub due_day: u32,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl CreditCard {
    pub fn new(
        user_id: UserId,
        name: impl Into<String>,
        limit: Money,
        closing_day: u32,
        due_day: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: CreditCardId::new(),
            user_id,
            name: name.into(),
            last_digits: String::new(),
            brand: CardBrand::default(),
            limit,
            closing_day,
            due_day,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Result<(), CreditCardValidationError> {
        if self.name.trim().is_empty() {
            return Err(CreditCardValidationError::EmptyName);
        }
        if !self.last_digits.is_empty()
            && (self.last_digits.len() != 4 || !self.last_digits.chars().all(|c| c.is_ascii_digit()))
        {
            return Err(CreditCardValidationError::InvalidLastDigits(
                self.last_digits.clone(),
            ));
        }
        if self.limit.is_negative() {
            return Err(CreditCardValidationError::NegativeLimit);
        }
        if !(1..=31).contains(&self.closing_day) {
            return Err(CreditCardValidationError::InvalidClosingDay(self.closing_day));
        }
        if !(1..=31).contains(&self.due_day) {
            return Err(CreditCardValidationError::InvalidDueDay(self.due_day));
        }
        Ok(())
    }
}
