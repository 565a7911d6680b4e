//! Calendar arithmetic for recurring cash flows and card invoice cycles
//!
//! Month and year addition use native rollover throughout: the day-of-month is
//! kept and any overflow spills into the following month, so Jan 31 + 1 month
//! is Mar 3 (Mar 2 in a leap year) and Feb 29 + 1 year is Mar 1. Results
//! saturate at the limits of `NaiveDate`.

use chrono::{Datelike, Days, NaiveDate};

pub use crate::models::Frequency;
use crate::error::{LedgerError, LedgerResult};
use crate::models::MonthPeriod;

/// Date for `day` counted from the first of the month `index` months after
/// January of year 0; days past the end of the month roll forward.
fn date_in_month(month_index: i64, day: u32) -> NaiveDate {
    let year = month_index.div_euclid(12);
    let month = month_index.rem_euclid(12) as u32 + 1;

    i32::try_from(year)
        .ok()
        .and_then(|year| NaiveDate::from_ymd_opt(year, month, 1))
        .and_then(|first| first.checked_add_days(Days::new(u64::from(day.max(1)) - 1)))
        .unwrap_or(if month_index < 0 {
            NaiveDate::MIN
        } else {
            NaiveDate::MAX
        })
}

fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

/// Add calendar months with native day-of-month rollover
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    shift_months(date, i64::from(months))
}

fn shift_months(date: NaiveDate, months: i64) -> NaiveDate {
    date_in_month(month_index(date).saturating_add(months), date.day())
}

fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days))
        .unwrap_or(NaiveDate::MAX)
}

/// The occurrence following `last`
pub fn next_recurring_date(last: NaiveDate, frequency: Frequency) -> NaiveDate {
    advance(last, frequency, 1)
}

/// Jump `periods` occurrences forward in one step
pub fn advance(start: NaiveDate, frequency: Frequency, periods: u32) -> NaiveDate {
    match frequency {
        Frequency::Weekly => add_days(start, 7 * u64::from(periods)),
        Frequency::Biweekly => add_days(start, 14 * u64::from(periods)),
        Frequency::Monthly => shift_months(start, i64::from(periods)),
        Frequency::Yearly => shift_months(start, 12 * i64::from(periods)),
    }
}

/// Due date of installment `number` (1-based) of a card purchase
///
/// A purchase on or before the closing day lands on the invoice due next
/// month; a later purchase lands on the one due the month after. Each further
/// installment is one month later, always on `due_day`.
pub fn installment_due_date(
    purchase_date: NaiveDate,
    closing_day: u32,
    due_day: u32,
    number: u32,
) -> NaiveDate {
    let invoice_offset = if purchase_date.day() <= closing_day {
        1
    } else {
        2
    };
    let target = month_index(purchase_date) + invoice_offset + i64::from(number.max(1) - 1);
    date_in_month(target, due_day)
}

/// First and last day (inclusive) of a calendar month
pub fn month_bounds(year: i32, month: u32) -> LedgerResult<(NaiveDate, NaiveDate)> {
    let period = MonthPeriod::new(year, month)
        .map_err(|e| LedgerError::Validation(e.to_string()))?;
    Ok((period.start_date(), period.end_date()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_next_recurring_date() {
        let start = date(2025, 1, 15);
        assert_eq!(next_recurring_date(start, Frequency::Weekly), date(2025, 1, 22));
        assert_eq!(next_recurring_date(start, Frequency::Biweekly), date(2025, 1, 29));
        assert_eq!(next_recurring_date(start, Frequency::Monthly), date(2025, 2, 15));
        assert_eq!(next_recurring_date(start, Frequency::Yearly), date(2026, 1, 15));
    }

    #[test]
    fn test_month_rollover_is_native() {
        assert_eq!(add_months(date(2025, 1, 31), 1), date(2025, 3, 3));
        assert_eq!(add_months(date(2024, 1, 31), 1), date(2024, 3, 2));
        assert_eq!(
            next_recurring_date(date(2024, 2, 29), Frequency::Yearly),
            date(2025, 3, 1)
        );
        assert_eq!(add_months(date(2025, 12, 10), 1), date(2026, 1, 10));
        assert_eq!(add_months(date(2025, 1, 10), -1), date(2024, 12, 10));
    }

    #[test]
    fn test_advance_saturates_for_huge_period_counts() {
        let start = date(2025, 1, 15);
        assert_eq!(advance(start, Frequency::Monthly, u32::MAX), NaiveDate::MAX);
        assert_eq!(advance(start, Frequency::Yearly, u32::MAX), NaiveDate::MAX);
        assert_eq!(advance(start, Frequency::Weekly, u32::MAX), NaiveDate::MAX);
        assert_eq!(advance(start, Frequency::Yearly, 3), date(2028, 1, 15));
    }

    #[test]
    fn test_installment_due_before_closing() {
        let purchase = date(2025, 3, 5);
        assert_eq!(installment_due_date(purchase, 10, 20, 1), date(2025, 4, 20));
        assert_eq!(installment_due_date(purchase, 10, 20, 2), date(2025, 5, 20));
        assert_eq!(installment_due_date(purchase, 10, 20, 3), date(2025, 6, 20));
    }

    #[test]
    fn test_installment_due_after_closing() {
        let purchase = date(2025, 3, 15);
        assert_eq!(installment_due_date(purchase, 10, 20, 1), date(2025, 5, 20));
        assert_eq!(installment_due_date(purchase, 10, 20, 3), date(2025, 7, 20));
    }

    #[test]
    fn test_installment_due_on_closing_day_uses_next_month() {
        assert_eq!(
            installment_due_date(date(2025, 3, 10), 10, 20, 1),
            date(2025, 4, 20)
        );
    }

    #[test]
    fn test_installment_due_rolls_year() {
        assert_eq!(
            installment_due_date(date(2025, 11, 25), 10, 5, 1),
            date(2026, 1, 5)
        );
        assert_eq!(
            installment_due_date(date(2025, 12, 1), 10, 5, 14),
            date(2027, 2, 5)
        );
    }

    #[test]
    fn test_due_day_overflow_rolls_forward() {
        assert_eq!(
            installment_due_date(date(2025, 1, 5), 10, 31, 1),
            date(2025, 3, 3)
        );
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(
            month_bounds(2024, 2).unwrap(),
            (date(2024, 2, 1), date(2024, 2, 29))
        );
        assert!(month_bounds(2024, 13).unwrap_err().is_validation());
    }

    proptest! {
        #[test]
        fn prop_repeated_recurrence_equals_one_jump(
            year in 1990i32..2100,
            month in 1u32..=12,
            day in 1u32..=28,
            n in 0u32..60,
            which in 0usize..3,
        ) {
            let frequency = [Frequency::Weekly, Frequency::Monthly, Frequency::Yearly][which];
            let start = date(year, month, day);

            let mut stepped = start;
            for _ in 0..n {
                stepped = next_recurring_date(stepped, frequency);
            }

            prop_assert_eq!(stepped, advance(start, frequency, n));
        }
    }
}
