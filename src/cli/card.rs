//! Credit card CLI commands
//!
//! Cards belong to the member who registered them. Purchases made on a card
//! are household expenses scheduled into installments by the card's cycle.

use clap::Subcommand;

use super::{parse_amount, parse_date, today};
use crate::config::settings::Settings;
use crate::display::{format_budget_outcome, format_card_list, format_installment_list};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{CardBrand, CreditCard, InstallmentId, UserId};
use crate::services::{notifier_for, CardUpdate, CreditCardService, NewCard, NewPurchase};
use crate::storage::Storage;

/// Card subcommands
#[derive(Subcommand)]
pub enum CardCommands {
    /// Register a credit card
    Add {
        /// Card name
        name: String,
        /// Credit limit
        #[arg(short, long)]
        limit: String,
        /// Day of the month the invoice closes (1-31)
        #[arg(long)]
        closing: u32,
        /// Day of the month the invoice is due (1-31)
        #[arg(long)]
        due: u32,
        /// Brand (visa, mastercard, elo, amex, hipercard, other)
        #[arg(short, long, default_value = "other")]
        brand: String,
        /// Last four digits
        #[arg(long, default_value = "")]
        digits: String,
    },
    /// List your active cards with their current invoice
    List,
    /// Change a card's details
    Edit {
        /// Card name or ID
        card: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New credit limit
        #[arg(short, long)]
        limit: Option<String>,
        /// New closing day
        #[arg(long)]
        closing: Option<u32>,
        /// New due day
        #[arg(long)]
        due: Option<u32>,
    },
    /// Record a purchase on a card
    Purchase {
        /// Card name or ID
        card: String,
        /// Amount
        amount: String,
        /// Description
        description: String,
        /// Number of installments
        #[arg(short, long, default_value = "1")]
        installments: u32,
        /// Purchase date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Show a card's installments
    Installments {
        /// Card name or ID
        card: String,
    },
    /// Mark an installment paid
    Pay {
        /// Card name or ID
        card: String,
        /// Installment ID
        installment: String,
    },
    /// Deactivate a card with no open invoice
    Close {
        /// Card name or ID
        card: String,
    },
}

fn parse_brand(input: &str) -> LedgerResult<CardBrand> {
    CardBrand::parse(input).ok_or_else(|| {
        LedgerError::Validation(format!(
            "Invalid brand: '{}'. Valid brands: visa, mastercard, elo, amex, hipercard, other",
            input
        ))
    })
}

fn require_card(
    service: &CreditCardService<'_>,
    user_id: UserId,
    card: &str,
) -> LedgerResult<CreditCard> {
    service
        .find(user_id, card)?
        .ok_or_else(|| LedgerError::card_not_found(card))
}

/// Handle a card command
pub fn handle_card_command(
    storage: &Storage,
    settings: &Settings,
    cmd: CardCommands,
) -> LedgerResult<()> {
    let user_id = settings.require_active_user()?;
    let service = CreditCardService::new(storage).with_rounding(settings.installment_rounding);

    match cmd {
        CardCommands::Add {
            name,
            limit,
            closing,
            due,
            brand,
            digits,
        } => {
            let card = service.create(
                user_id,
                NewCard {
                    name,
                    last_digits: digits,
                    brand: parse_brand(&brand)?,
                    limit: parse_amount(&limit)?,
                    closing_day: closing,
                    due_day: due,
                },
            )?;
            println!("Registered card: {}", card.name);
            println!("  Closes on day {}, due on day {}", card.closing_day, card.due_day);
            println!("  ID: {}", card.id);
        }

        CardCommands::List => {
            let cards = service.list(user_id, today())?;
            println!("{}", format_card_list(&cards, settings));
        }

        CardCommands::Edit {
            card,
            name,
            limit,
            closing,
            due,
        } => {
            let found = require_card(&service, user_id, &card)?;
            let changes = CardUpdate {
                name,
                limit: limit.as_deref().map(parse_amount).transpose()?,
                closing_day: closing,
                due_day: due,
                ..CardUpdate::default()
            };
            let updated = service.update(user_id, found.id, changes)?;
            println!("Updated card: {}", updated.name);
        }

        CardCommands::Purchase {
            card,
            amount,
            description,
            installments,
            date,
        } => {
            let found = require_card(&service, user_id, &card)?;
            let purchase = NewPurchase::new(
                description,
                parse_amount(&amount)?,
                parse_date(date.as_deref())?,
                installments,
            );
            let notifier = notifier_for(storage, settings);
            let outcome = service.purchase(user_id, found.id, purchase, notifier.as_ref())?;

            println!(
                "Recorded purchase on {}: {} {}",
                found.name, outcome.expense.description, outcome.expense.amount
            );
            println!("{}", format_installment_list(&outcome.installments, settings));
            if let Some(budget) = &outcome.budget {
                print!("{}", format_budget_outcome(budget, settings));
            }
        }

        CardCommands::Installments { card } => {
            let found = require_card(&service, user_id, &card)?;
            let installments = service.installments(user_id, found.id)?;
            println!("{}", format_installment_list(&installments, settings));
        }

        CardCommands::Pay { card, installment } => {
            let found = require_card(&service, user_id, &card)?;
            let needle = installment.trim().to_lowercase();
            let target = service
                .installments(user_id, found.id)?
                .into_iter()
                .find(|i| {
                    i.id.to_string() == needle
                        || installment.parse::<InstallmentId>().ok() == Some(i.id)
                })
                .ok_or_else(|| LedgerError::installment_not_found(&installment))?;

            let paid = service.pay_installment(user_id, found.id, target.id, None)?;
            println!(
                "Paid installment {}/{} of {}",
                paid.number, paid.total_installments, paid.amount
            );
        }

        CardCommands::Close { card } => {
            let found = require_card(&service, user_id, &card)?;
            let closed = service.deactivate(user_id, found.id, today())?;
            println!("Deactivated card: {}", closed.name);
        }
    }

    Ok(())
}
