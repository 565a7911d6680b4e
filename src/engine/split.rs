//! Split policy
//!
//! Decides how much of one expense each household member is responsible for.
//! Shares are resolved to the cent: the first member's share is rounded half
//! away from zero and the second member takes the remainder, so a split
//! expense's shares always add up to its amount.

use serde::{Deserialize, Serialize};

pub use crate::models::{CustomSplit, SplitMethod};
use crate::models::{Expense, ExpenseId, Household, Money, UserId};

/// Scale applied to percentages before integer weighting
const PERCENT_SCALE: f64 = 1_000_000.0;

/// A household's split policy with its two members resolved
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitConfig {
    pub method: SplitMethod,
    pub custom_split: Option<CustomSplit>,
    pub user1_id: UserId,
    pub user2_id: UserId,
}

impl SplitConfig {
    pub fn new(method: SplitMethod, user1_id: UserId, user2_id: UserId) -> Self {
        Self {
            method,
            custom_split: None,
            user1_id,
            user2_id,
        }
    }

    pub fn with_custom_split(mut self, custom_split: CustomSplit) -> Self {
        self.custom_split = Some(custom_split);
        self
    }

    /// Build from a household and its two members, in join order
    pub fn for_household(household: &Household, user1_id: UserId, user2_id: UserId) -> Self {
        Self {
            method: household.split_method,
            custom_split: household.custom_split,
            user1_id,
            user2_id,
        }
    }
}

/// Each member's income for the period, used by PROPORTIONAL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IncomeContext {
    pub user1_income: Money,
    pub user2_income: Money,
}

/// The slice of an expense the split policy reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: ExpenseId,
    pub amount: Money,
    pub is_individual: bool,
    pub individual_user_id: Option<UserId>,
    pub created_by: UserId,
}

impl ExpenseRecord {
    /// A shared expense
    pub fn shared(amount: Money, created_by: UserId) -> Self {
        Self {
            id: ExpenseId::new(),
            amount,
            is_individual: false,
            individual_user_id: None,
            created_by,
        }
    }

    /// An expense belonging entirely to `owner`
    pub fn individual(amount: Money, created_by: UserId, owner: UserId) -> Self {
        Self {
            is_individual: true,
            individual_user_id: Some(owner),
            ..Self::shared(amount, created_by)
        }
    }
}

impl From<&Expense> for ExpenseRecord {
    fn from(expense: &Expense) -> Self {
        Self {
            id: expense.id,
            amount: expense.amount,
            is_individual: expense.is_individual,
            individual_user_id: expense.individual_user_id,
            created_by: expense.created_by,
        }
    }
}

/// Responsibility for one expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExpenseSplit {
    pub user1_share: Money,
    pub user2_share: Money,
}

impl ExpenseSplit {
    fn all_to_user1(amount: Money) -> Self {
        Self {
            user1_share: amount,
            user2_share: Money::zero(),
        }
    }

    fn all_to_user2(amount: Money) -> Self {
        Self {
            user1_share: Money::zero(),
            user2_share: amount,
        }
    }

    fn even(amount: Money) -> Self {
        Self::weighted(amount, 1, 1)
    }

    fn weighted(amount: Money, user1_weight: i128, user2_weight: i128) -> Self {
        let (user1_share, user2_share) = amount.split_ratio(user1_weight, user2_weight);
        Self {
            user1_share,
            user2_share,
        }
    }

    pub fn total(&self) -> Money {
        self.user1_share + self.user2_share
    }
}

/// Split one expense between the two members
pub fn split_expense(
    config: &SplitConfig,
    income: &IncomeContext,
    expense: &ExpenseRecord,
) -> ExpenseSplit {
    let amount = expense.amount;

    if expense.is_individual {
        match expense.individual_user_id {
            Some(owner) if owner == config.user1_id => return ExpenseSplit::all_to_user1(amount),
            Some(owner) if owner == config.user2_id => return ExpenseSplit::all_to_user2(amount),
            // Owner outside the household: use the household policy
            _ => {}
        }
    }

    match config.method {
        SplitMethod::FiftyFifty => ExpenseSplit::even(amount),
        SplitMethod::Custom => match custom_weights(config.custom_split.as_ref()) {
            Some((w1, w2)) => ExpenseSplit::weighted(amount, w1, w2),
            None => ExpenseSplit::even(amount),
        },
        SplitMethod::Proportional => {
            let w1 = i128::from(income.user1_income.cents());
            let w2 = i128::from(income.user2_income.cents());
            if w1 + w2 <= 0 {
                ExpenseSplit::even(amount)
            } else {
                ExpenseSplit::weighted(amount, w1, w2)
            }
        }
        SplitMethod::OnePays => {
            if expense.created_by == config.user1_id {
                ExpenseSplit::all_to_user1(amount)
            } else if expense.created_by == config.user2_id {
                ExpenseSplit::all_to_user2(amount)
            } else {
                ExpenseSplit::even(amount)
            }
        }
        SplitMethod::NoSplit => ExpenseSplit::default(),
    }
}

/// Integer weights for a custom split, or `None` when it cannot be used
fn custom_weights(custom: Option<&CustomSplit>) -> Option<(i128, i128)> {
    let custom = custom?;
    let (p1, p2) = (custom.user1_percentage, custom.user2_percentage);
    if !p1.is_finite() || !p2.is_finite() || p1 < 0.0 || p2 < 0.0 || p1 + p2 <= 0.0 {
        return None;
    }
    Some((
        (p1 * PERCENT_SCALE).round() as i128,
        (p2 * PERCENT_SCALE).round() as i128,
    ))
}
