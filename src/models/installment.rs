//! Installment model
//!
//! One scheduled portion of a financed purchase. Installments are created as a
//! set when the parent expense is created and are only ever mutated by being
//! marked paid.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{ExpenseId, InstallmentId};
use super::money::Money;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Installment {
    pub id: InstallmentId,
    pub expense_id: ExpenseId,
    /// 1-based position in the set
    pub number: u32,
    pub total_installments: u32,
    pub amount: Money,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
}

impl Installment {
    pub fn new(
        expense_id: ExpenseId,
        number: u32,
        total_installments: u32,
        amount: Money,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            id: InstallmentId::new(),
            expense_id,
            number,
            total_installments,
            amount,
            due_date,
            is_paid: false,
            paid_at: None,
        }
    }

    pub fn mark_paid(&mut self) {
        self.is_paid = true;
        self.paid_at = Some(Utc::now());
    }

    pub fn is_last(&self) -> bool {
        self.number >= self.total_installments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_paid() {
        let mut installment = Installment::new(
            ExpenseId::new(),
            1,
            3,
            Money::from_cents(10000),
            NaiveDate::from_ymd_opt(2025, 2, 20).unwrap(),
        );
        assert!(!installment.is_paid);
        assert!(installment.paid_at.is_none());

        installment.mark_paid();
        assert!(installment.is_paid);
        assert!(installment.paid_at.is_some());
        assert!(!installment.is_last());
    }
}
