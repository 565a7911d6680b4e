//! Domestic equity
//!
//! Each completed chore scores `weight points x hours` (one hour when none
//! were logged). The month's points are totalled per member and expressed as
//! a share of the household total. Entries by anyone outside the pair are
//! ignored.

use crate::error::{LedgerError, LedgerResult};
use crate::models::{ChoreEntry, ChoreWeight, UserId};

/// A completed chore reduced to what the score needs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChoreRecord {
    pub user_id: UserId,
    pub weight: ChoreWeight,
    pub hours: Option<f64>,
}

impl ChoreRecord {
    pub fn from_entry(entry: &ChoreEntry, weight: ChoreWeight) -> Self {
        Self {
            user_id: entry.user_id,
            weight,
            hours: entry.hours,
        }
    }
}

/// One member's part of the housework
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChoreShare {
    pub user_id: UserId,
    pub points: f64,
    /// Share of the household total, 0 when nothing was logged
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChoreReport {
    pub user1: ChoreShare,
    pub user2: ChoreShare,
    pub total_points: f64,
}

impl ChoreReport {
    /// The member who carried more of the work; `None` on a tie
    pub fn leader(&self) -> Option<&ChoreShare> {
        if self.user1.points > self.user2.points {
            Some(&self.user1)
        } else if self.user2.points > self.user1.points {
            Some(&self.user2)
        } else {
            None
        }
    }
}

/// Points for one chore; hours that are not a positive number count as one
pub fn chore_points(weight: ChoreWeight, hours: Option<f64>) -> f64 {
    let hours = hours.filter(|h| h.is_finite() && *h > 0.0).unwrap_or(1.0);
    f64::from(weight.points()) * hours
}

/// Split a month's chores between the two members, in join order
pub fn compute_chore_equity(members: &[UserId], chores: &[ChoreRecord]) -> LedgerResult<ChoreReport> {
    let [user1, user2] = members else {
        return Err(LedgerError::Forbidden(
            "household must have two members".into(),
        ));
    };

    let points_of = |user: UserId| -> f64 {
        chores
            .iter()
            .filter(|c| c.user_id == user)
            .map(|c| chore_points(c.weight, c.hours))
            .sum()
    };
    let (points1, points2) = (points_of(*user1), points_of(*user2));
    let total_points = points1 + points2;

    let share = |user_id: UserId, points: f64| ChoreShare {
        user_id,
        points,
        percentage: if total_points > 0.0 {
            points / total_points * 100.0
        } else {
            0.0
        },
    };

    Ok(ChoreReport {
        user1: share(*user1, points1),
        user2: share(*user2, points2),
        total_points,
    })
}
