//! Equity service
//!
//! Loads a household's month and hands it to the equity aggregator. Nothing
//! is stored: the statement is rebuilt from the records on every request.

use tracing::debug;

use super::household::HouseholdService;
use crate::engine::equity::{compute_equity, income_context, EquityReport, IncomeRecord};
use crate::engine::split::{split_expense, ExpenseRecord, ExpenseSplit, SplitConfig};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Expense, Household, MonthPeriod, User, UserId};
use crate::storage::Storage;

/// One month of equity for a household
#[derive(Debug, Clone)]
pub struct EquityStatement {
    pub household: Household,
    pub period: MonthPeriod,
    pub user1: User,
    pub user2: User,
    pub config: SplitConfig,
    pub report: EquityReport,
    /// How each of the month's expenses was divided, in date order
    pub breakdown: Vec<(Expense, ExpenseSplit)>,
}

impl EquityStatement {
    pub fn member_name(&self, user_id: UserId) -> &str {
        if user_id == self.user1.id {
            &self.user1.name
        } else if user_id == self.user2.id {
            &self.user2.name
        } else {
            "unknown"
        }
    }
}

pub struct EquityService<'a> {
    storage: &'a Storage,
}

impl<'a> EquityService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Paid versus should-pay for the caller's household in `period`
    pub fn monthly_equity(&self, user_id: UserId, period: MonthPeriod) -> LedgerResult<EquityStatement> {
        let (household, config) = HouseholdService::new(self.storage).split_config_for(user_id)?;

        let member = |id: UserId| -> LedgerResult<User> {
            self.storage
                .households
                .get_user(id)?
                .ok_or_else(|| LedgerError::user_not_found(id.to_string()))
        };
        let user1 = member(config.user1_id)?;
        let user2 = member(config.user2_id)?;

        let incomes: Vec<IncomeRecord> = self
            .storage
            .incomes
            .for_household_in(household.id, period)?
            .iter()
            .map(IncomeRecord::from)
            .collect();

        let mut expenses = self.storage.expenses.for_household_in(household.id, period)?;
        expenses.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
        let records: Vec<ExpenseRecord> = expenses.iter().map(ExpenseRecord::from).collect();

        let report = compute_equity(&config, &incomes, &records);

        let context = income_context(&config, &incomes);
        let breakdown = expenses
            .into_iter()
            .zip(&records)
            .map(|(expense, record)| {
                let split = split_expense(&config, &context, record);
                (expense, split)
            })
            .collect();

        debug!(
            household = %household.id,
            %period,
            total = %report.total_expenses,
            "computed equity"
        );

        Ok(EquityStatement {
            household,
            period,
            user1,
            user2,
            config,
            report,
            breakdown,
        })
    }
}
