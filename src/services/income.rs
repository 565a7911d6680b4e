//! Income service
//!
//! Incomes feed the PROPORTIONAL split and nothing else; they are recorded
//! per member and scoped to the household the member belongs to.

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use super::household::membership;
use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Frequency, HouseholdId, Income, IncomeId, Money, MonthPeriod, Recurrence, UserId,
};
use crate::storage::Storage;

/// Changes to an income; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct IncomeUpdate {
    pub description: Option<String>,
    pub amount: Option<Money>,
    pub date: Option<NaiveDate>,
    /// Start or change repeating from the income's date
    pub frequency: Option<Frequency>,
    pub stop_repeating: bool,
}

/// One earner's total for a month
#[derive(Debug, Clone, PartialEq)]
pub struct MemberIncome {
    pub user_id: UserId,
    pub name: String,
    pub total: Money,
}

/// A household's incomes for a month grouped by earner
#[derive(Debug, Clone)]
pub struct IncomeSummary {
    pub household_id: HouseholdId,
    pub period: MonthPeriod,
    pub total: Money,
    /// Current members in join order, then anyone who has since left
    pub members: Vec<MemberIncome>,
}

pub struct IncomeService<'a> {
    storage: &'a Storage,
}

impl<'a> IncomeService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record an income for the caller
    pub fn record(
        &self,
        user_id: UserId,
        description: &str,
        amount: Money,
        date: NaiveDate,
        frequency: Option<Frequency>,
    ) -> LedgerResult<Income> {
        let (user, household) = membership(self.storage, user_id)?;

        let mut income = Income::new(household.id, user.id, description.trim(), amount, date);
        income.recurrence = frequency.map(|f| Recurrence::new(f, date));
        income
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.storage.incomes.upsert(income.clone())?;
        self.storage.incomes.save()?;

        self.storage.log_create(
            EntityType::Income,
            income.id.to_string(),
            Some(income.description.clone()),
            &income,
        )?;
        info!(income = %income.id, amount = %income.amount, "recorded income");

        Ok(income)
    }

    /// The caller's incomes for one month
    pub fn list_for_month(&self, user_id: UserId, period: MonthPeriod) -> LedgerResult<Vec<Income>> {
        membership(self.storage, user_id)?;
        self.storage.incomes.for_user_in(user_id, period)
    }

    /// Find one of the caller's incomes by short or full ID
    pub fn find(&self, user_id: UserId, identifier: &str) -> LedgerResult<Option<Income>> {
        let (_, household) = membership(self.storage, user_id)?;
        let needle = identifier.trim().to_lowercase();
        let incomes: Vec<Income> = self
            .storage
            .incomes
            .for_household(household.id)?
            .into_iter()
            .filter(|i| i.user_id == user_id)
            .collect();
        if let Some(found) = incomes.iter().find(|i| i.id.to_string() == needle) {
            return Ok(Some(found.clone()));
        }
        match identifier.parse::<IncomeId>() {
            Ok(id) => Ok(incomes.into_iter().find(|i| i.id == id)),
            Err(_) => Ok(None),
        }
    }

    /// Every income of the caller's household for one month
    pub fn household_month(
        &self,
        user_id: UserId,
        period: MonthPeriod,
    ) -> LedgerResult<Vec<Income>> {
        let (_, household) = membership(self.storage, user_id)?;
        self.storage.incomes.for_household_in(household.id, period)
    }

    /// Per-member totals for the caller's household in one month
    pub fn monthly_summary(&self, user_id: UserId, period: MonthPeriod) -> LedgerResult<IncomeSummary> {
        let (_, household) = membership(self.storage, user_id)?;
        let incomes = self.storage.incomes.for_household_in(household.id, period)?;

        let mut members: Vec<MemberIncome> = self
            .storage
            .households
            .members(household.id)?
            .into_iter()
            .map(|u| MemberIncome {
                user_id: u.id,
                name: u.name,
                total: Money::zero(),
            })
            .collect();

        for income in &incomes {
            match members.iter_mut().find(|m| m.user_id == income.user_id) {
                Some(member) => member.total += income.amount,
                None => {
                    let name = self
                        .storage
                        .households
                        .get_user(income.user_id)?
                        .map(|u| u.name)
                        .unwrap_or_else(|| income.user_id.to_string());
                    members.push(MemberIncome {
                        user_id: income.user_id,
                        name,
                        total: income.amount,
                    });
                }
            }
        }

        Ok(IncomeSummary {
            household_id: household.id,
            period,
            total: incomes.iter().map(|i| i.amount).sum(),
            members,
        })
    }

    fn own(&self, user_id: UserId, id: IncomeId) -> LedgerResult<Income> {
        let income = self
            .storage
            .incomes
            .get(id)?
            .ok_or_else(|| LedgerError::NotFound {
                entity_type: "Income",
                identifier: id.to_string(),
            })?;

        if income.user_id != user_id {
            warn!(income = %id, user = %user_id, "refused access to another member's income");
            return Err(LedgerError::Forbidden(
                "income belongs to another member".into(),
            ));
        }
        Ok(income)
    }

    /// Edit one of the caller's own incomes
    pub fn update(&self, user_id: UserId, id: IncomeId, changes: IncomeUpdate) -> LedgerResult<Income> {
        let before = self.own(user_id, id)?;

        let mut income = before.clone();
        if let Some(description) = changes.description {
            income.description = description.trim().to_string();
        }
        if let Some(amount) = changes.amount {
            income.amount = amount;
        }
        if let Some(date) = changes.date {
            income.date = date;
            income.recurrence = income.recurrence.map(|r| Recurrence::new(r.frequency, date));
        }
        if let Some(frequency) = changes.frequency {
            income.recurrence = Some(Recurrence::new(frequency, income.date));
        }
        if changes.stop_repeating {
            income.recurrence = None;
        }
        income
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;
        income.updated_at = Utc::now();

        self.storage.incomes.upsert(income.clone())?;
        self.storage.incomes.save()?;

        self.storage.log_update(
            EntityType::Income,
            income.id.to_string(),
            Some(income.description.clone()),
            &before,
            &income,
        )?;
        info!(income = %income.id, amount = %income.amount, "updated income");

        Ok(income)
    }

    /// Delete one of the caller's own incomes
    pub fn delete(&self, user_id: UserId, id: IncomeId) -> LedgerResult<Income> {
        let income = self.own(user_id, id)?;

        self.storage.incomes.delete(id)?;
        self.storage.incomes.save()?;

        self.storage.log_delete(
            EntityType::Income,
            income.id.to_string(),
            Some(income.description.clone()),
            &income,
        )?;
        info!(income = %id, "deleted income");

        Ok(income)
    }
}
