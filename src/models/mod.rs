//! Core data models for the household ledger
//!
//! Plain records for households, incomes, expenses, installments, cards,
//! budgets, savings, chores and notifications, plus the id, money and month types
//! they are built from.

pub mod budget;
pub mod chore;
pub mod credit_card;
pub mod expense;
pub mod household;
pub mod ids;
pub mod income;
pub mod installment;
pub mod money;
pub mod notification;
pub mod period;
pub mod recurrence;
pub mod savings;

pub use budget::Budget;
pub use chore::{
    built_in_chores, ChoreEntry, ChoreKind, ChoreTemplate, ChoreWeight, MAX_CHORE_HOURS,
};
pub use credit_card::{CardBrand, CreditCard};
pub use expense::{Expense, ExpenseCategory, InstallmentPlan, PaymentMethod};
pub use household::{CustomSplit, Household, SplitMethod, User};
pub use ids::{
    BudgetId, ChoreEntryId, ChoreTemplateId, ContributionId, CreditCardId, DreamId, ExpenseId,
    GoalId, HouseholdId, IncomeId, InstallmentId, NotificationId, UserId,
};
pub use income::Income;
pub use installment::Installment;
pub use money::Money;
pub use notification::{
    Insight, InsightTone, Notification, NotificationPayload, NotificationType, RelatedEntity,
};
pub use period::MonthPeriod;
pub use recurrence::{Frequency, Recurrence};
pub use savings::{
    Contribution, ContributionTarget, Dream, DreamStatus, Goal, GoalStatus, GoalType, Priority,
};
