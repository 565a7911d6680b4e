//! Service layer
//!
//! Services sit between the CLI and storage. Each one borrows the storage,
//! takes the already-resolved user id of the caller, validates the request,
//! calls into the engine and writes the results back with an audit entry.
//! Services that can trigger notifications take the notifier explicitly.

pub mod budget;
pub mod chore;
pub mod credit_card;
pub mod equity;
pub mod expense;
pub mod household;
pub mod income;
pub mod notification;
pub mod recurring;
pub mod savings;
pub mod user;

pub use budget::{BudgetOutcome, BudgetService};
pub use chore::{
    ChoreService, ChoreStatement, ChoreTemplateUpdate, LoggedChore, NewChoreEntry, NewChoreTemplate,
};
pub use credit_card::{CardSummary, CardUpdate, CreditCardService, NewCard, NewPurchase};
pub use equity::{EquityService, EquityStatement};
pub use expense::{ExpenseOutcome, ExpenseService, ExpenseUpdate, ExpenseUpdateOutcome, NewExpense};
pub use household::{HouseholdService, HouseholdView};
pub use income::{IncomeService, IncomeSummary, IncomeUpdate, MemberIncome};
pub use notification::{
    notifier_for, DedupNotifier, NotificationService, Notifier, StoredNotifier,
};
pub use recurring::{JobReport, RecurringService};
pub use savings::{
    ContributionOutcome, DreamUpdate, GoalUpdate, NewDream, NewGoal, SavingsService,
    SavingsSuggestion, SavingsTarget,
};
pub use user::UserService;
