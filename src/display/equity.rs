//! Equity statement view
//!
//! A summary table of paid versus should-pay per member, who owes whom,
//! and the per-expense breakdown behind the numbers.

use tabled::Tabled;

use super::{date, money, table, truncate};
use crate::config::settings::Settings;
use crate::services::EquityStatement;

#[derive(Tabled)]
struct MemberRow {
    #[tabled(rename = "Member")]
    name: String,
    #[tabled(rename = "Paid")]
    paid: String,
    #[tabled(rename = "Should pay")]
    should: String,
    #[tabled(rename = "Balance")]
    balance: String,
}

#[derive(Tabled)]
struct BreakdownRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Expense")]
    description: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Paid by")]
    paid_by: String,
    #[tabled(rename = "Share 1")]
    user1_share: String,
    #[tabled(rename = "Share 2")]
    user2_share: String,
}

pub fn format_equity_statement(statement: &EquityStatement, settings: &Settings) -> String {
    let report = &statement.report;
    let mut output = String::new();

    output.push_str(&format!(
        "Equity for {}: {} ({})\n\n",
        statement.household.name, statement.period, statement.config.method
    ));

    output.push_str(&table(vec![
        MemberRow {
            name: statement.user1.name.clone(),
            paid: money(settings, report.user1_paid),
            should: money(settings, report.user1_should),
            balance: money(settings, report.user1_balance),
        },
        MemberRow {
            name: statement.user2.name.clone(),
            paid: money(settings, report.user2_paid),
            should: money(settings, report.user2_should),
            balance: money(settings, report.user2_balance),
        },
    ]));
    output.push('\n');

    output.push_str(&format!(
        "Total expenses: {}\n",
        money(settings, report.total_expenses)
    ));
    let absorbed = report.total_expenses - report.total_should();
    if absorbed.is_positive() {
        output.push_str(&format!(
            "Absorbed by the household: {}\n",
            money(settings, absorbed)
        ));
    }

    match report.creditor() {
        Some((creditor, amount)) => {
            let debtor = if creditor == statement.user1.id {
                &statement.user2.name
            } else {
                &statement.user1.name
            };
            output.push_str(&format!(
                "{} owes {} {}\n",
                debtor,
                statement.member_name(creditor),
                money(settings, amount)
            ));
        }
        None => output.push_str("All square.\n"),
    }

    if !statement.breakdown.is_empty() {
        output.push('\n');
        output.push_str(&table(
            statement
                .breakdown
                .iter()
                .map(|(expense, split)| BreakdownRow {
                    date: date(settings, expense.date),
                    description: truncate(&expense.description, 24),
                    amount: money(settings, expense.amount),
                    paid_by: statement.member_name(expense.created_by).to_string(),
                    user1_share: money(settings, split.user1_share),
                    user2_share: money(settings, split.user2_share),
                })
                .collect(),
        ));
        output.push('\n');
    }

    output
}
