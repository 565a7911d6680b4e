//! Installment scheduling and card invoice summaries
//!
//! Two generation paths exist. Card purchases and installment expenses get
//! their whole installment set up front; chains that are stepped manually are
//! extended one installment at a time by the periodic job.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::date_cycle::{add_months, installment_due_date};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Installment, Money, MonthPeriod};

/// How the rounding remainder of an installment split is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InstallmentRounding {
    /// Every installment carries `round(total / n)`; the sum may be off by up
    /// to `n - 1` cents
    #[default]
    Drift,
    /// The last installment absorbs the remainder so the sum is exact
    AdjustLast,
}

/// One entry of a generated schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledInstallment {
    pub number: u32,
    pub amount: Money,
    pub due_date: NaiveDate,
}

/// Derived card invoice figures, computed on read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InvoiceSummary {
    pub current_invoice_amount: Money,
    pub available_limit: Money,
}

fn validate_plan(total: Money, total_installments: u32) -> LedgerResult<()> {
    if total_installments < 1 {
        return Err(LedgerError::Validation(
            "At least one installment is required".into(),
        ));
    }
    if !total.is_positive() {
        return Err(LedgerError::Validation(
            "Installment total must be greater than zero".into(),
        ));
    }
    Ok(())
}

/// Check a card's invoice anchors
pub fn validate_cycle_days(closing_day: u32, due_day: u32) -> LedgerResult<()> {
    if !(1..=31).contains(&closing_day) {
        return Err(LedgerError::Validation(format!(
            "Closing day must be between 1 and 31 (got {})",
            closing_day
        )));
    }
    if !(1..=31).contains(&due_day) {
        return Err(LedgerError::Validation(format!(
            "Due day must be between 1 and 31 (got {})",
            due_day
        )));
    }
    Ok(())
}

/// Per-installment amounts for `total` split `n` ways
pub fn installment_amounts(
    total: Money,
    total_installments: u32,
    rounding: InstallmentRounding,
) -> Vec<Money> {
    if total_installments == 0 {
        return Vec::new();
    }

    let base = total.divide_rounded(total_installments);
    let mut amounts = vec![base; total_installments as usize];

    if rounding == InstallmentRounding::AdjustLast {
        let leading: Money = amounts[..amounts.len() - 1].iter().sum();
        if let Some(last) = amounts.last_mut() {
            *last = total - leading;
        }
    }

    amounts
}

/// Full installment set for a card purchase
pub fn schedule_installments(
    purchase_date: NaiveDate,
    total: Money,
    total_installments: u32,
    closing_day: u32,
    due_day: u32,
    rounding: InstallmentRounding,
) -> LedgerResult<Vec<ScheduledInstallment>> {
    validate_plan(total, total_installments)?;
    validate_cycle_days(closing_day, due_day)?;

    Ok(installment_amounts(total, total_installments, rounding)
        .into_iter()
        .zip(1..)
        .map(|(amount, number)| ScheduledInstallment {
            number,
            amount,
            due_date: installment_due_date(purchase_date, closing_day, due_day, number),
        })
        .collect())
}

/// Full installment set for an installment expense with an explicit first
/// due date; installment `i` is due `i - 1` months after the first
pub fn schedule_from_first_due(
    first_due_date: NaiveDate,
    total: Money,
    total_installments: u32,
    rounding: InstallmentRounding,
) -> LedgerResult<Vec<ScheduledInstallment>> {
    validate_plan(total, total_installments)?;

    Ok(installment_amounts(total, total_installments, rounding)
        .into_iter()
        .zip(1u32..)
        .map(|(amount, number)| ScheduledInstallment {
            number,
            amount,
            due_date: add_months(first_due_date, (number - 1) as i32),
        })
        .collect())
}

/// Whether the installment after `last` should now be materialized
pub fn should_roll_forward(last: &Installment, today: NaiveDate) -> bool {
    last.number < last.total_installments && last.due_date <= today
}

/// The installment following `last`: one month later, same amount, unpaid
pub fn next_in_chain(last: &Installment) -> Installment {
    Installment::new(
        last.expense_id,
        last.number + 1,
        last.total_installments,
        last.amount,
        add_months(last.due_date, 1),
    )
}

/// Invoice for the calendar month containing `today`
///
/// Sums unpaid installments due in that month; the available limit never
/// drops below zero.
pub fn invoice_summary<'a>(
    limit: Money,
    installments: impl IntoIterator<Item = &'a Installment>,
    today: NaiveDate,
) -> InvoiceSummary {
    let month = MonthPeriod::of(today);
    let current_invoice_amount: Money = installments
        .into_iter()
        .filter(|i| !i.is_paid && month.contains(i.due_date))
        .map(|i| i.amount)
        .sum();

    let available = limit - current_invoice_amount;
    InvoiceSummary {
        current_invoice_amount,
        available_limit: if available.is_negative() {
            Money::zero()
        } else {
            available
        },
    }
}
