//! The calculation core
//!
//! Pure, synchronous functions over records that have already been loaded:
//! no I/O, no locking, no hidden state. Services load records from storage,
//! call into these modules and persist or dispatch the results.

pub mod billing;
pub mod chores;
pub mod date_cycle;
pub mod equity;
pub mod split;
pub mod threshold;

pub use billing::{InstallmentRounding, InvoiceSummary, ScheduledInstallment};
pub use chores::{compute_chore_equity, ChoreRecord, ChoreReport, ChoreShare};
pub use date_cycle::Frequency;
pub use equity::{compute_equity, EquityReport, IncomeRecord};
pub use split::{split_expense, ExpenseRecord, ExpenseSplit, IncomeContext, SplitConfig};
pub use threshold::{evaluate, Band, Progress};
