//! Income, expense, installment and card views

use std::collections::HashMap;

use tabled::Tabled;

use super::{date, money, table, truncate};
use crate::config::settings::Settings;
use crate::models::{Expense, Income, Installment, Money, UserId};
use crate::services::{CardSummary, IncomeSummary};

#[derive(Tabled)]
struct IncomeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Repeats")]
    repeats: String,
}

pub fn format_income_list(incomes: &[Income], settings: &Settings) -> String {
    if incomes.is_empty() {
        return "No incomes found.".to_string();
    }

    let mut output = table(
        incomes
            .iter()
            .map(|i| IncomeRow {
                id: i.id.to_string(),
                date: date(settings, i.date),
                description: truncate(&i.description, 30),
                amount: money(settings, i.amount),
                repeats: i.recurrence.map(|r| r.frequency.to_string()).unwrap_or_default(),
            })
            .collect(),
    );
    let total: Money = incomes.iter().map(|i| i.amount).sum();
    output.push_str(&format!("\nTotal: {}\n", money(settings, total)));
    output
}

#[derive(Tabled)]
struct EarnerRow {
    #[tabled(rename = "Member")]
    name: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Share")]
    share: String,
}

/// Who earned what in a month
pub fn format_income_summary(summary: &IncomeSummary, settings: &Settings) -> String {
    let mut output = format!("Household income for {}\n", summary.period);
    output.push_str(&table(
        summary
            .members
            .iter()
            .map(|m| EarnerRow {
                name: m.name.clone(),
                total: money(settings, m.total),
                share: if summary.total.is_positive() {
                    format!("{:.1}%", m.total.percentage_of(summary.total))
                } else {
                    "-".to_string()
                },
            })
            .collect(),
    ));
    output.push_str(&format!("\nTotal: {}\n", money(settings, summary.total)));
    output
}

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Paid by")]
    paid_by: String,
    #[tabled(rename = "Split")]
    split: String,
    #[tabled(rename = "Plan")]
    plan: String,
}

/// Expenses with the payer resolved through `names`
pub fn format_expense_list(
    expenses: &[Expense],
    names: &HashMap<UserId, String>,
    settings: &Settings,
) -> String {
    if expenses.is_empty() {
        return "No expenses found.".to_string();
    }

    let name_of = |id: UserId| names.get(&id).cloned().unwrap_or_else(|| id.to_string());

    let mut output = table(
        expenses
            .iter()
            .map(|e| ExpenseRow {
                id: e.id.to_string(),
                date: date(settings, e.date),
                description: truncate(&e.description, 24),
                category: e.category.to_string(),
                amount: money(settings, e.amount),
                paid_by: name_of(e.created_by),
                split: match (e.is_individual, e.individual_user_id) {
                    (true, Some(owner)) => format!("only {}", name_of(owner)),
                    _ => "shared".to_string(),
                },
                plan: match (e.installments, e.recurrence) {
                    (Some(plan), _) => format!("{}x {}", plan.total_installments, e.payment_method),
                    (None, Some(recurrence)) => recurrence.frequency.to_string(),
                    (None, None) => e.payment_method.to_string(),
                },
            })
            .collect(),
    );
    let total: Money = expenses.iter().map(|e| e.amount).sum();
    output.push_str(&format!("\nTotal: {}\n", money(settings, total)));
    output
}

#[derive(Tabled)]
struct InstallmentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "#")]
    number: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Status")]
    status: String,
}

pub fn format_installment_list(installments: &[Installment], settings: &Settings) -> String {
    if installments.is_empty() {
        return "No installments.".to_string();
    }

    table(
        installments
            .iter()
            .map(|i| InstallmentRow {
                id: i.id.to_string(),
                number: format!("{}/{}", i.number, i.total_installments),
                due: date(settings, i.due_date),
                amount: money(settings, i.amount),
                status: match i.paid_at {
                    Some(at) if i.is_paid => format!("paid {}", date(settings, at.date_naive())),
                    _ if i.is_paid => "paid".to_string(),
                    _ => "open".to_string(),
                },
            })
            .collect(),
    )
}

#[derive(Tabled)]
struct CardRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Card")]
    name: String,
    #[tabled(rename = "Brand")]
    brand: String,
    #[tabled(rename = "Cycle")]
    cycle: String,
    #[tabled(rename = "Limit")]
    limit: String,
    #[tabled(rename = "Invoice")]
    invoice: String,
    #[tabled(rename = "Available")]
    available: String,
}

pub fn format_card_list(cards: &[CardSummary], settings: &Settings) -> String {
    if cards.is_empty() {
        return "No active cards.".to_string();
    }

    table(
        cards
            .iter()
            .map(|s| CardRow {
                id: s.card.id.to_string(),
                name: if s.card.last_digits.is_empty() {
                    s.card.name.clone()
                } else {
                    format!("{} *{}", s.card.name, s.card.last_digits)
                },
                brand: s.card.brand.to_string(),
                cycle: format!("closes {} / due {}", s.card.closing_day, s.card.due_day),
                limit: money(settings, s.card.limit),
                invoice: money(settings, s.invoice.current_invoice_amount),
                available: money(settings, s.invoice.available_limit),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseCategory, ExpenseId, HouseholdId};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_expense_list_resolves_names() {
        let hh = HouseholdId::new();
        let (ana, bruno) = (UserId::new(), UserId::new());
        let mut gym = Expense::new(hh, ana, "Gym", Money::from_cents(5000), ExpenseCategory::Health, date(2025, 3, 2));
        gym.make_individual(bruno);
        let names = HashMap::from([(ana, "Ana".to_string()), (bruno, "Bruno".to_string())]);

        let output = format_expense_list(&[gym], &names, &Settings::default());
        assert!(output.contains("only Bruno"));
        assert!(output.contains("Ana"));
        assert!(output.contains("Total: $50.00"));
    }

    #[test]
    fn test_installment_status() {
        let mut paid = Installment::new(ExpenseId::new(), 1, 2, Money::from_cents(100), date(2025, 1, 10));
        paid.mark_paid();
        let open = Installment::new(paid.expense_id, 2, 2, Money::from_cents(100), date(2025, 2, 10));

        let output = format_installment_list(&[paid, open], &Settings::default());
        assert!(output.contains("1/2"));
        assert!(output.contains("paid "));
        assert!(output.contains("open"));
    }

    #[test]
    fn test_income_summary_shares() {
        let summary = IncomeSummary {
            household_id: HouseholdId::new(),
            period: crate::models::MonthPeriod::new(2025, 3).unwrap(),
            total: Money::from_cents(400000),
            members: vec![
                crate::services::MemberIncome {
                    user_id: UserId::new(),
                    name: "Ana".into(),
                    total: Money::from_cents(300000),
                },
                crate::services::MemberIncome {
                    user_id: UserId::new(),
                    name: "Bruno".into(),
                    total: Money::from_cents(100000),
                },
            ],
        };

        let output = format_income_summary(&summary, &Settings::default());
        assert!(output.contains("Household income for 2025-03"));
        assert!(output.contains("75.0%"));
        assert!(output.contains("25.0%"));
        assert!(output.contains("Total: $4000.00"));
    }

    #[test]
    fn test_empty_lists() {
        let settings = Settings::default();
        assert_eq!(format_income_list(&[], &settings), "No incomes found.");
        assert_eq!(format_card_list(&[], &settings), "No active cards.");
    }
}
