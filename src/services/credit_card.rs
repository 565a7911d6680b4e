//! Credit card service
//!
//! Cards belong to one member. Purchases become expenses paid by card with
//! their whole installment set scheduled on the card's invoice cycle; invoice
//! figures are derived on read and never stored.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, warn};

use super::budget::BudgetService;
use super::expense::{materialize, ExpenseOutcome, ExpenseService};
use super::household::membership;
use super::notification::Notifier;
use crate::audit::EntityType;
use crate::engine::billing::{self, InstallmentRounding, InvoiceSummary};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    CardBrand, CreditCard, CreditCardId, Expense, ExpenseCategory, Installment, InstallmentId,
    InstallmentPlan, Money, MonthPeriod, PaymentMethod, UserId,
};
use crate::storage::Storage;

/// Input for registering a card
#[derive(Debug, Clone)]
pub struct NewCard {
    pub name: String,
    pub last_digits: String,
    pub brand: CardBrand,
    pub limit: Money,
    pub closing_day: u32,
    pub due_day: u32,
}

/// Fields that may change on an existing card
#[derive(Debug, Clone, Default)]
pub struct CardUpdate {
    pub name: Option<String>,
    pub last_digits: Option<String>,
    pub brand: Option<CardBrand>,
    pub limit: Option<Money>,
    pub closing_day: Option<u32>,
    pub due_day: Option<u32>,
}

/// Input for a purchase on a card
#[derive(Debug, Clone)]
pub struct NewPurchase {
    pub description: String,
    pub amount: Money,
    pub date: NaiveDate,
    /// Number of installments; below 1 is treated as 1
    pub installments: u32,
}

impl NewPurchase {
    pub fn new(description: impl Into<String>, amount: Money, date: NaiveDate, installments: u32) -> Self {
        Self {
            description: description.into(),
            amount,
            date,
            installments,
        }
    }
}

/// A card with its current invoice
#[derive(Debug, Clone)]
pub struct CardSummary {
    pub card: CreditCard,
    pub invoice: InvoiceSummary,
}

pub struct CreditCardService<'a> {
    storage: &'a Storage,
    rounding: InstallmentRounding,
}

impl<'a> CreditCardService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            rounding: InstallmentRounding::default(),
        }
    }

    pub fn with_rounding(mut self, rounding: InstallmentRounding) -> Self {
        self.rounding = rounding;
        self
    }

    fn own_card(&self, user_id: UserId, card_id: CreditCardId) -> LedgerResult<CreditCard> {
        membership(self.storage, user_id)?;
        ExpenseService::new(self.storage).usable_card(user_id, card_id)
    }

    /// Invoice figures for the month containing `today`
    pub fn invoice(&self, card: &CreditCard, today: NaiveDate) -> LedgerResult<InvoiceSummary> {
        let installments = self.storage.expenses.installments_for_card(card.id)?;
        Ok(billing::invoice_summary(card.limit, &installments, today))
    }

    pub fn create(&self, user_id: UserId, input: NewCard) -> LedgerResult<CreditCard> {
        membership(self.storage, user_id)?;
        billing::validate_cycle_days(input.closing_day, input.due_day)?;

        let mut card = CreditCard::new(
            user_id,
            input.name.trim(),
            input.limit,
            input.closing_day,
            input.due_day,
        );
        card.last_digits = input.last_digits.trim().to_string();
        card.brand = input.brand;
        card.validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.storage.cards.upsert(card.clone())?;
        self.storage.cards.save()?;

        self.storage.log_create(
            EntityType::CreditCard,
            card.id.to_string(),
            Some(card.name.clone()),
            &card,
        )?;
        info!(card = %card.id, "registered credit card");

        Ok(card)
    }

    /// The caller's active cards with their current invoices
    pub fn list(&self, user_id: UserId, today: NaiveDate) -> LedgerResult<Vec<CardSummary>> {
        membership(self.storage, user_id)?;
        self.storage
            .cards
            .active_for_user(user_id)?
            .into_iter()
            .map(|card| {
                let invoice = self.invoice(&card, today)?;
                Ok(CardSummary { card, invoice })
            })
            .collect()
    }

    /// Find one of the caller's active cards by name, short ID or full ID
    pub fn find(&self, user_id: UserId, identifier: &str) -> LedgerResult<Option<CreditCard>> {
        let needle = identifier.trim().to_lowercase();
        let cards = self.storage.cards.active_for_user(user_id)?;
        if let Some(card) = cards
            .iter()
            .find(|c| c.name.to_lowercase() == needle || c.id.to_string() == needle)
        {
            return Ok(Some(card.clone()));
        }
        match identifier.parse::<CreditCardId>() {
            Ok(id) => Ok(cards.into_iter().find(|c| c.id == id)),
            Err(_) => Ok(None),
        }
    }

    pub fn update(&self, user_id: UserId, card_id: CreditCardId, changes: CardUpdate) -> LedgerResult<CreditCard> {
        let before = self.own_card(user_id, card_id)?;

        let mut card = before.clone();
        if let Some(name) = changes.name {
            card.name = name.trim().to_string();
        }
        if let Some(digits) = changes.last_digits {
            card.last_digits = digits.trim().to_string();
        }
        if let Some(brand) = changes.brand {
            card.brand = brand;
        }
        if let Some(limit) = changes.limit {
            card.limit = limit;
        }
        if let Some(day) = changes.closing_day {
            card.closing_day = day;
        }
        if let Some(day) = changes.due_day {
            card.due_day = day;
        }
        billing::validate_cycle_days(card.closing_day, card.due_day)?;
        card.validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;
        card.updated_at = Utc::now();

        self.storage.cards.upsert(card.clone())?;
        self.storage.cards.save()?;

        self.storage.log_update(
            EntityType::CreditCard,
            card.id.to_string(),
            Some(card.name.clone()),
            &before,
            &card,
        )?;
        info!(card = %card.id, "updated credit card");

        Ok(card)
    }

    /// Deactivate a card; refused while the current invoice is open
    pub fn deactivate(&self, user_id: UserId, card_id: CreditCardId, today: NaiveDate) -> LedgerResult<CreditCard> {
        let before = self.own_card(user_id, card_id)?;

        let invoice = self.invoice(&before, today)?;
        if invoice.current_invoice_amount.is_positive() {
            warn!(card = %card_id, open = %invoice.current_invoice_amount, "refused to close card with open invoice");
            return Err(LedgerError::Validation(format!(
                "Cannot deactivate a card with an open invoice ({})",
                invoice.current_invoice_amount
            )));
        }

        let mut card = before.clone();
        card.deactivate();
        self.storage.cards.upsert(card.clone())?;
        self.storage.cards.save()?;

        self.storage.log_update(
            EntityType::CreditCard,
            card.id.to_string(),
            Some(card.name.clone()),
            &before,
            &card,
        )?;
        info!(card = %card_id, "deactivated credit card");

        Ok(card)
    }

    /// Record a purchase on a card
    ///
    /// Creates an expense paid by card in category OTHER and all of its
    /// installments at once.
    pub fn purchase(
        &self,
        user_id: UserId,
        card_id: CreditCardId,
        input: NewPurchase,
        notifier: &dyn Notifier,
    ) -> LedgerResult<ExpenseOutcome> {
        let (user, household) = membership(self.storage, user_id)?;
        let card = self.own_card(user.id, card_id)?;
        let NewPurchase {
            description,
            amount,
            date,
            installments,
        } = input;

        if !amount.is_positive() {
            return Err(LedgerError::Validation(
                "Purchase amount must be greater than zero".into(),
            ));
        }
        let n = installments.max(1);

        let mut expense = Expense::new(
            household.id,
            user.id,
            description.trim(),
            amount,
            ExpenseCategory::Other,
            date,
        );
        expense.payment_method = PaymentMethod::CreditCard;
        expense.credit_card_id = Some(card.id);
        expense.installments = Some(InstallmentPlan {
            total_installments: n,
            first_due_date: None,
            stepped: false,
        });
        expense
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let schedule = billing::schedule_installments(
            date,
            amount,
            n,
            card.closing_day,
            card.due_day,
            self.rounding,
        )?;
        let installments = materialize(expense.id, n, schedule);

        self.storage
            .expenses
            .insert_with_installments(expense.clone(), installments.clone())?;
        self.storage.expenses.save()?;

        self.storage.log_create(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.description.clone()),
            &expense,
        )?;
        info!(card = %card.id, expense = %expense.id, installments = n, "recorded card purchase");

        let budget = BudgetService::new(self.storage).refresh(
            household.id,
            expense.category,
            MonthPeriod::of(date),
            notifier,
        )?;

        Ok(ExpenseOutcome {
            expense,
            installments,
            budget,
        })
    }

    /// Installments billed to one of the caller's cards
    pub fn installments(&self, user_id: UserId, card_id: CreditCardId) -> LedgerResult<Vec<Installment>> {
        let card = self.own_card(user_id, card_id)?;
        self.storage.expenses.installments_for_card(card.id)
    }

    /// Mark an installment of the card paid; paying twice is refused
    pub fn pay_installment(
        &self,
        user_id: UserId,
        card_id: CreditCardId,
        installment_id: InstallmentId,
        paid_at: Option<DateTime<Utc>>,
    ) -> LedgerResult<Installment> {
        let card = self.own_card(user_id, card_id)?;

        let before = self
            .storage
            .expenses
            .installments_for_card(card.id)?
            .into_iter()
            .find(|i| i.id == installment_id)
            .ok_or_else(|| LedgerError::installment_not_found(installment_id.to_string()))?;

        if before.is_paid {
            return Err(LedgerError::Validation(
                "Installment is already marked as paid".into(),
            ));
        }

        let mut installment = before.clone();
        installment.mark_paid();
        if let Some(at) = paid_at {
            installment.paid_at = Some(at);
        }
        self.storage.expenses.upsert_installment(installment.clone())?;
        self.storage.expenses.save()?;

        self.storage.log_update(
            EntityType::Installment,
            installment.id.to_string(),
            Some(format!("{}/{}", installment.number, installment.total_installments)),
            &before,
            &installment,
        )?;
        info!(installment = %installment.id, "paid installment");

        Ok(installment)
    }
}
