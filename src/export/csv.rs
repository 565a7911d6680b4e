//! CSV export of installments
//!
//! One row per installment of the household, with the parent expense and
//! card resolved to names so the file reads on its own in a spreadsheet.

use std::collections::HashMap;
use std::io::Write;

use serde::Serialize;

use crate::error::{LedgerError, LedgerResult};
use crate::models::HouseholdId;
use crate::storage::Storage;

#[derive(Debug, Serialize)]
struct InstallmentRow<'a> {
    #[serde(rename = "Expense")]
    expense: &'a str,
    #[serde(rename = "Card")]
    card: &'a str,
    #[serde(rename = "Number")]
    number: u32,
    #[serde(rename = "Of")]
    total: u32,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "Due Date")]
    due_date: String,
    #[serde(rename = "Paid")]
    paid: bool,
    #[serde(rename = "Paid At")]
    paid_at: String,
}

/// Write every installment of the household, ordered by due date
pub fn export_installments_csv<W: Write>(
    storage: &Storage,
    household_id: HouseholdId,
    writer: W,
) -> LedgerResult<usize> {
    let expenses: HashMap<_, _> = storage
        .expenses
        .for_household(household_id)?
        .into_iter()
        .map(|e| (e.id, e))
        .collect();

    let mut card_names = HashMap::new();
    for expense in expenses.values() {
        if let Some(card_id) = expense.credit_card_id {
            if let Some(card) = storage.cards.get(card_id)? {
                card_names.insert(card_id, card.name);
            }
        }
    }

    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut rows = 0;
    for installment in storage.expenses.installments_for_household(household_id)? {
        let expense = expenses.get(&installment.expense_id);
        let card = expense
            .and_then(|e| e.credit_card_id)
            .and_then(|id| card_names.get(&id))
            .map(String::as_str)
            .unwrap_or("");

        csv_writer
            .serialize(InstallmentRow {
                expense: expense.map(|e| e.description.as_str()).unwrap_or("Unknown"),
                card,
                number: installment.number,
                total: installment.total_installments,
                amount: format!("{:.2}", installment.amount.as_units_f64()),
                due_date: installment.due_date.to_string(),
                paid: installment.is_paid,
                paid_at: installment
                    .paid_at
                    .map(|t| t.date_naive().to_string())
                    .unwrap_or_default(),
            })
            .map_err(|e| LedgerError::Export(e.to_string()))?;
        rows += 1;
    }
    csv_writer
        .flush()
        .map_err(|e| LedgerError::Export(e.to_string()))?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::models::{CardBrand, Money, SplitMethod};
    use crate::services::notification::tests::RecordingNotifier;
    use crate::services::{CreditCardService, HouseholdService, NewCard, NewPurchase, UserService};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_installments_csv() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();

        let ana = UserService::new(&storage).register("Ana", "").unwrap().id;
        let household = HouseholdService::new(&storage)
            .create(ana, "Home", SplitMethod::FiftyFifty, None)
            .unwrap()
            .household;
        let cards = CreditCardService::new(&storage);
        let card = cards
            .create(
                ana,
                NewCard {
                    name: "Travel Card".into(),
                    last_digits: "4242".into(),
                    brand: CardBrand::Visa,
                    limit: Money::from_cents(500000),
                    closing_day: 10,
                    due_day: 20,
                },
            )
            .unwrap();
        cards
            .purchase(
                ana,
                card.id,
                NewPurchase::new(
                    "Laptop, 15\"",
                    Money::from_cents(300000),
                    NaiveDate::from_ymd_opt(2025, 3, 5).unwrap(),
                    3,
                ),
                &RecordingNotifier::default(),
            )
            .unwrap();

        let mut output = Vec::new();
        let rows = export_installments_csv(&storage, household.id, &mut output).unwrap();
        assert_eq!(rows, 3);

        let csv = String::from_utf8(output).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "Expense,Card,Number,Of,Amount,Due Date,Paid,Paid At");
        assert_eq!(
            lines[1],
            "\"Laptop, 15\"\"\",Travel Card,1,3,1000.00,2025-04-20,false,"
        );
        assert!(lines[3].contains("2025-06-20"));
    }
}
