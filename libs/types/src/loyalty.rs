//! Loyalty points and badge tiers
//!
//! Badge is a pure function of accumulated points: recomputed whenever
//! points change, never set independently.

use crate::ids::UserId;
use serde::{Deserialize, Serialize};

/// Reputation tier derived from loyalty points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Badge {
    Bronze,
    Silver,
    Gold,
    Diamond,
    Ruby,
}

impl Badge {
    /// Ascending point thresholds, inclusive at the lower edge
    pub const THRESHOLDS: [(i64, Badge); 5] = [
        (0, Badge::Bronze),
        (51, Badge::Silver),
        (151, Badge::Gold),
        (301, Badge::Diamond),
        (601, Badge::Ruby),
    ];

    /// Compute the badge for a point total
    ///
    /// Negative totals (possible after rating reversals) stay at Bronze.
    pub fn for_points(points: i64) -> Self {
        let mut badge = Badge::Bronze;
        for (threshold, tier) in Self::THRESHOLDS {
            if points >= threshold {
                badge = tier;
            }
        }
        badge
    }
}

/// Per-user loyalty accumulator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoyaltyAccount {
    pub user_id: UserId,
    pub points: i64,
    pub badge: Badge,
}

impl LoyaltyAccount {
    /// Create a fresh account at zero points
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            points: 0,
            badge: Badge::Bronze,
        }
    }

    /// Apply a signed point delta and recompute the badge
    pub fn apply_delta(&mut self, delta: i64) {
        self.points += delta;
        self.badge = Badge::for_points(self.points);
    }
}
