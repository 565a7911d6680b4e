//! Expense CLI commands
//!
//! Recording, editing, listing and deleting household expenses, including installment
//! plans and recurring expenses.

use std::collections::HashMap;

use clap::Subcommand;

use super::{parse_amount, parse_category, parse_date, parse_frequency, parse_month};
use crate::config::settings::Settings;
use crate::display::{format_budget_outcome, format_expense_list, format_installment_list};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{CreditCardId, InstallmentPlan, PaymentMethod, UserId};
use crate::services::{
    notifier_for, CreditCardService, ExpenseService, ExpenseUpdate, HouseholdService, NewExpense,
    UserService,
};
use crate::storage::Storage;

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record an expense
    Add {
        /// Amount (e.g., "120.00" or "120")
        amount: String,
        /// Description
        description: String,
        /// Category (housing, utilities, groceries, restaurants, transport,
        /// health, education, leisure, subscriptions, other)
        #[arg(short, long, default_value = "other")]
        category: String,
        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Payment method (cash, debit, credit, pix, transfer)
        #[arg(short, long, default_value = "cash")]
        payment: String,
        /// Credit card name or ID; implies payment by credit card
        #[arg(long)]
        card: Option<String>,
        /// Charge the whole expense to you alone
        #[arg(long)]
        individual: bool,
        /// Charge the whole expense to this member alone
        #[arg(long = "for", value_name = "USER")]
        for_user: Option<String>,
        /// Number of installments
        #[arg(short, long)]
        installments: Option<u32>,
        /// Due date of the first installment (YYYY-MM-DD)
        #[arg(long)]
        first_due: Option<String>,
        /// Create each installment only once the previous one falls due
        #[arg(long)]
        stepped: bool,
        /// Repeat (weekly, biweekly, monthly, yearly)
        #[arg(short, long)]
        repeat: Option<String>,
    },
    /// List the household's expenses for a month
    List {
        /// Month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
        /// Only this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Edit one of your expenses
    ///
    /// Installment expenses keep their amount, date and payment.
    Edit {
        /// Expense ID
        expense: String,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New description
        #[arg(short = 'n', long)]
        description: Option<String>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
        /// New date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// New payment method (cash, debit, credit, pix, transfer)
        #[arg(short, long)]
        payment: Option<String>,
        /// Credit card name or ID; implies payment by credit card
        #[arg(long)]
        card: Option<String>,
        /// Charge the whole expense to you alone
        #[arg(long, conflicts_with = "shared")]
        individual: bool,
        /// Share the expense again
        #[arg(long)]
        shared: bool,
    },
    /// Show an expense's installments
    Show {
        /// Expense ID
        expense: String,
    },
    /// Delete one of your expenses
    Remove {
        /// Expense ID
        expense: String,
    },
}

fn parse_payment(input: &str) -> LedgerResult<PaymentMethod> {
    PaymentMethod::parse(input).ok_or_else(|| {
        LedgerError::Validation(format!(
            "Invalid payment method: '{}'. Valid methods: cash, debit, credit, pix, transfer",
            input
        ))
    })
}

fn find_card(storage: &Storage, user_id: UserId, card: &str) -> LedgerResult<CreditCardId> {
    CreditCardService::new(storage)
        .find(user_id, card)?
        .map(|c| c.id)
        .ok_or_else(|| LedgerError::card_not_found(card))
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> LedgerResult<()> {
    let user_id = settings.require_active_user()?;
    let service = ExpenseService::new(storage).with_rounding(settings.installment_rounding);
    let notifier = notifier_for(storage, settings);

    match cmd {
        ExpenseCommands::Add {
            amount,
            description,
            category,
            date,
            payment,
            card,
            individual,
            for_user,
            installments,
            first_due,
            stepped,
            repeat,
        } => {
            let mut input = NewExpense::new(
                description,
                parse_amount(&amount)?,
                parse_category(&category)?,
                parse_date(date.as_deref())?,
            );
            input.payment_method = parse_payment(&payment)?;

            if let Some(card) = card {
                input.credit_card_id = Some(find_card(storage, user_id, &card)?);
                input.payment_method = PaymentMethod::CreditCard;
            }

            input.is_individual = individual;
            if let Some(member) = for_user {
                let found = UserService::new(storage)
                    .find(&member)?
                    .ok_or_else(|| LedgerError::user_not_found(&member))?;
                input.individual_user_id = Some(found.id);
            }

            if let Some(total_installments) = installments {
                input.installments = Some(InstallmentPlan {
                    total_installments,
                    first_due_date: first_due
                        .as_deref()
                        .map(|d| parse_date(Some(d)))
                        .transpose()?,
                    stepped,
                });
            }
            input.frequency = parse_frequency(repeat.as_deref())?;

            let outcome = service.create(user_id, input, notifier.as_ref())?;
            let expense = &outcome.expense;
            println!("Recorded expense: {} {}", expense.description, expense.amount);
            println!("  Category: {}", expense.category);
            if !outcome.installments.is_empty() {
                println!("  Installments created: {}", outcome.installments.len());
            }
            println!("  ID: {}", expense.id);
            if let Some(budget) = &outcome.budget {
                print!("{}", format_budget_outcome(budget, settings));
            }
        }

        ExpenseCommands::List { month, category } => {
            let period = parse_month(month.as_deref())?;
            let category = category.as_deref().map(parse_category).transpose()?;
            let expenses = service.list_for_month(user_id, period, category)?;

            let names: HashMap<UserId, String> = HouseholdService::new(storage)
                .my_household(user_id)?
                .members
                .into_iter()
                .map(|m| (m.id, m.name))
                .collect();

            println!("Expenses for {}", period);
            print!("{}", format_expense_list(&expenses, &names, settings));
        }

        ExpenseCommands::Edit {
            expense,
            amount,
            description,
            category,
            date,
            payment,
            card,
            individual,
            shared,
        } => {
            let found = service
                .find(user_id, &expense)?
                .ok_or_else(|| LedgerError::expense_not_found(&expense))?;
            let credit_card_id = card
                .as_deref()
                .map(|c| find_card(storage, user_id, c))
                .transpose()?;
            let changes = ExpenseUpdate {
                description,
                amount: amount.as_deref().map(parse_amount).transpose()?,
                category: category.as_deref().map(parse_category).transpose()?,
                date: date.as_deref().map(|d| parse_date(Some(d))).transpose()?,
                payment_method: match (payment.as_deref(), credit_card_id) {
                    (Some(p), _) => Some(parse_payment(p)?),
                    (None, Some(_)) => Some(PaymentMethod::CreditCard),
                    (None, None) => None,
                },
                credit_card_id,
                is_individual: match (individual, shared) {
                    (true, _) => Some(true),
                    (false, true) => Some(false),
                    (false, false) => None,
                },
            };

            let outcome = service.update(user_id, found.id, changes, notifier.as_ref())?;
            let updated = &outcome.expense;
            println!("Updated expense: {} {}", updated.description, updated.amount);
            println!("  Category: {}", updated.category);
            for budget in &outcome.budgets {
                print!("{}", format_budget_outcome(budget, settings));
            }
        }

        ExpenseCommands::Show { expense } => {
            let found = service
                .find(user_id, &expense)?
                .ok_or_else(|| LedgerError::expense_not_found(&expense))?;
            let installments = service.installments(user_id, found.id)?;

            println!("{} {} on {}", found.description, found.amount, found.date);
            println!("{}", format_installment_list(&installments, settings));
        }

        ExpenseCommands::Remove { expense } => {
            let found = service
                .find(user_id, &expense)?
                .ok_or_else(|| LedgerError::expense_not_found(&expense))?;
            let budget = service.delete(user_id, found.id, notifier.as_ref())?;

            println!("Deleted expense: {}", found.description);
            if let Some(budget) = &budget {
                print!("{}", format_budget_outcome(budget, settings));
            }
        }
    }

    Ok(())
}
