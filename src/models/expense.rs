//! Expense model
//!
//! An expense is recorded by one member of a household. Shared expenses are
//! split between the members by the household's split method; individual
//! expenses belong entirely to one member.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CreditCardId, ExpenseId, HouseholdId, UserId};
use super::money::Money;
use super::recurrence::Recurrence;

/// Spending category, used for budgets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseCategory {
    Housing,
    Utilities,
    Groceries,
    Restaurants,
    Transport,
    Health,
    Education,
    Leisure,
    Subscriptions,
    Other,
}

impl ExpenseCategory {
    pub fn all() -> &'static [ExpenseCategory] {
        &[
            Self::Housing,
            Self::Utilities,
            Self::Groceries,
            Self::Restaurants,
            Self::Transport,
            Self::Health,
            Self::Education,
            Self::Leisure,
            Self::Subscriptions,
            Self::Other,
        ]
    }

    pub fn parse(s: &str) -> Option<Self> {
        let wanted = s.trim().to_uppercase();
        Self::all()
            .iter()
            .copied()
            .find(|c| format!("{:?}", c).to_uppercase() == wanted)
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// How an expense was paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[default]
    Cash,
    DebitCard,
    CreditCard,
    Pix,
    BankTransfer,
}

impl PaymentMethod {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "cash" => Some(Self::Cash),
            "debit" | "debitcard" => Some(Self::DebitCard),
            "credit" | "creditcard" => Some(Self::CreditCard),
            "pix" => Some(Self::Pix),
            "transfer" | "banktransfer" => Some(Self::BankTransfer),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cash => write!(f, "Cash"),
            Self::DebitCard => write!(f, "Debit card"),
            Self::CreditCard => write!(f, "Credit card"),
            Self::Pix => write!(f, "Pix"),
            Self::BankTransfer => write!(f, "Bank transfer"),
        }
    }
}

/// Validation errors for expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    NonPositiveAmount,
    EmptyDescription,
    MissingIndividualUser,
    InvalidInstallmentCount,
    MissingFirstDueDate,
    MissingCreditCard,
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount => write!(f, "Expense amount must be greater than zero"),
            Self::EmptyDescription => write!(f, "Expense description cannot be empty"),
            Self::MissingIndividualUser => {
                write!(f, "An individual expense must name the member it belongs to")
            }
            Self::InvalidInstallmentCount => {
                write!(f, "Installment expenses need at least one installment")
            }
            Self::MissingFirstDueDate => {
                write!(f, "Installment expenses need a first due date")
            }
            Self::MissingCreditCard => {
                write!(f, "A credit card is required when paying by credit card")
            }
        }
    }
}

impl std::error::Error for ExpenseValidationError {}

/// Financing terms of an installment expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentPlan {
    pub total_installments: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_due_date: Option<NaiveDate>,
    /// Only the first installment is created up front; the periodic job
    /// materializes each following one once its predecessor falls due
    #[serde(default)]
    pub stepped: bool,
}

/// A household expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub household_id: HouseholdId,
    pub created_by: UserId,
    pub description: String,
    pub amount: Money,
    pub category: ExpenseCategory,
    pub date: NaiveDate,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_card_id: Option<CreditCardId>,
    #[serde(default)]
    pub is_individual: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub individual_user_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installments: Option<InstallmentPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(
        household_id: HouseholdId,
        created_by: UserId,
        description: impl Into<String>,
        amount: Money,
        category: ExpenseCategory,
        date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ExpenseId::new(),
            household_id,
            created_by,
            description: description.into(),
            amount,
            category,
            date,
            payment_method: PaymentMethod::default(),
            credit_card_id: None,
            is_individual: false,
            individual_user_id: None,
            installments: None,
            recurrence: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark the expense as belonging entirely to one member
    pub fn make_individual(&mut self, user_id: UserId) {
        self.is_individual = true;
        self.individual_user_id = Some(user_id);
        self.updated_at = Utc::now();
    }

    pub fn is_installment(&self) -> bool {
        self.installments.is_some()
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }

    /// Copy of this expense for the next occurrence; the copy carries the
    /// recurrence forward and this one stops recurring
    pub fn next_occurrence(&mut self, date: NaiveDate) -> Expense {
        let mut next = self.clone();
        next.id = ExpenseId::new();
        next.date = date;
        next.recurrence = self.recurrence.map(|r| Recurrence::new(r.frequency, date));
        next.created_at = Utc::now();
        next.updated_at = next.created_at;
        self.recurrence = None;
        self.updated_at = Utc::now();
        next
    }

    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if !self.amount.is_positive() {
            return Err(ExpenseValidationError::NonPositiveAmount);
        }
        if self.description.trim().is_empty() {
            return Err(ExpenseValidationError::EmptyDescription);
        }
        if self.is_individual && self.individual_user_id.is_none() {
            return Err(ExpenseValidationError::MissingIndividualUser);
        }
        if self.payment_method == PaymentMethod::CreditCard && self.credit_card_id.is_none() {
            return Err(ExpenseValidationError::MissingCreditCard);
        }
        if let Some(plan) = &self.installments {
            if plan.total_installments < 1 {
                return Err(ExpenseValidationError::InvalidInstallmentCount);
            }
            // Card purchases derive due dates from the card's cycle instead
            if self.credit_card_id.is_none() && plan.first_due_date.is_none() {
                return Err(ExpenseValidationError::MissingFirstDueDate);
            }
        }
        Ok(())
    }
}
