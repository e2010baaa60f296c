//! Rating lifecycle and loyalty bookkeeping
//!
//! A rating grants its reviewee a fixed per-star reward. Updating a rating
//! applies the score delta; deleting it reverses the full grant, so the
//! point total after delete equals the total before create.

use std::sync::Arc;

use chrono::Utc;
use store::SwapStore;
use types::errors::{MarketError, RatingError, TradeError};
use types::ids::{RatingId, TradeId, UserId};
use types::loyalty::LoyaltyAccount;
use types::rating::{Rating, Score};
use types::trade::Trade;

/// Ledger configuration
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Loyalty points granted to the reviewee per star
    pub points_per_star: i64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self { points_per_star: 5 }
    }
}

impl LedgerConfig {
    /// Reward for a score under this configuration
    pub fn reward_for(&self, score: Score) -> i64 {
        i64::from(score.stars()) * self.points_per_star
    }
}

/// Payload for creating a rating
#[derive(Debug, Clone)]
pub struct CreateRating {
    pub reviewee_id: UserId,
    pub trade_id: TradeId,
    pub score: Score,
    pub comment: Option<String>,
}

/// Rating and loyalty service over an injected store
#[derive(Debug, Clone)]
pub struct LoyaltyLedger {
    store: Arc<SwapStore>,
    config: LedgerConfig,
}

impl LoyaltyLedger {
    /// Create a ledger with the default reward configuration
    pub fn new(store: Arc<SwapStore>) -> Self {
        Self::with_config(store, LedgerConfig::default())
    }

    /// Create a ledger with a custom reward configuration
    pub fn with_config(store: Arc<SwapStore>, config: LedgerConfig) -> Self {
        Self { store, config }
    }

    /// Rate the counterparty of a completed trade
    ///
    /// Atomic two-part effect: persist the rating and apply the reviewee's
    /// point grant; the badge is recomputed from the new total in the same
    /// transaction and the change is logged.
    pub fn create_rating(
        &self,
        reviewer: UserId,
        payload: CreateRating,
    ) -> Result<Rating, MarketError> {
        let now = Utc::now();
        let reward = self.config.reward_for(payload.score);
        self.store.write(|tables| {
            if reviewer == payload.reviewee_id {
                return Err(RatingError::SelfRating.into());
            }

            let trade = tables
                .trade(&payload.trade_id)
                .cloned()
                .ok_or(TradeError::NotFound {
                    trade_id: payload.trade_id.to_string(),
                })?;
            if !trade.is_completed() {
                return Err(RatingError::TradeNotCompleted {
                    trade_id: payload.trade_id.to_string(),
                }
                .into());
            }
            let counterparty =
                trade
                    .counterparty_of(&reviewer)
                    .ok_or(RatingError::ReviewerNotParticipant {
                        trade_id: payload.trade_id.to_string(),
                    })?;
            if counterparty != payload.reviewee_id {
                return Err(RatingError::RevieweeNotCounterparty {
                    trade_id: payload.trade_id.to_string(),
                }
                .into());
            }
            if tables.rating_exists(&reviewer, &payload.reviewee_id, &payload.trade_id) {
                return Err(RatingError::Duplicate.into());
            }

            let rating = Rating::new(
                reviewer,
                payload.reviewee_id,
                payload.trade_id,
                payload.score,
                payload.comment,
                now,
            );
            tables.insert_rating(rating.clone());
            apply_and_log(tables.loyalty_mut(&payload.reviewee_id), reward);
            Ok(rating)
        })
    }

    /// Author-only score/comment revision
    ///
    /// The reviewee's points move by the reward delta in the same
    /// transaction as the rating mutation.
    pub fn update_rating(
        &self,
        author: UserId,
        rating_id: RatingId,
        score: Score,
        comment: Option<String>,
    ) -> Result<Rating, MarketError> {
        let now = Utc::now();
        self.store.write(|tables| {
            let rating = tables.rating(&rating_id).cloned().ok_or(RatingError::NotFound {
                rating_id: rating_id.to_string(),
            })?;
            if rating.reviewer_id != author {
                return Err(RatingError::NotAuthor.into());
            }

            let delta = self.config.reward_for(score) - self.config.reward_for(rating.score);
            let revised = tables.rating_mut(&rating_id).ok_or(RatingError::NotFound {
                rating_id: rating_id.to_string(),
            })?;
            revised.revise(score, comment, now);
            let revised = revised.clone();
            if delta != 0 {
                apply_and_log(tables.loyalty_mut(&rating.reviewee_id), delta);
            }
            Ok(revised)
        })
    }

    /// Author-only deletion, reversing exactly the points the rating granted
    pub fn delete_rating(&self, author: UserId, rating_id: RatingId) -> Result<(), MarketError> {
        self.store.write(|tables| {
            let rating = tables.rating(&rating_id).cloned().ok_or(RatingError::NotFound {
                rating_id: rating_id.to_string(),
            })?;
            if rating.reviewer_id != author {
                return Err(RatingError::NotAuthor.into());
            }

            tables.remove_rating(&rating_id);
            apply_and_log(
                tables.loyalty_mut(&rating.reviewee_id),
                -self.config.reward_for(rating.score),
            );
            Ok(())
        })
    }

    /// Completed trades involving the user that the user has not yet rated
    pub fn pending_ratings(&self, user: UserId) -> Result<Vec<Trade>, MarketError> {
        Ok(self.store.read(|tables| {
            let already_rated = tables.trades_rated_by(&user);
            tables
                .completed_trades_of(&user)
                .into_iter()
                .filter(|t| !already_rated.contains(&t.trade_id))
                .collect()
        })?)
    }

    /// Ratings the user has received
    pub fn ratings_of(&self, reviewee: UserId) -> Result<Vec<Rating>, MarketError> {
        Ok(self.store.read(|tables| tables.ratings_received_by(&reviewee))?)
    }

    /// Current loyalty state of the user (zeroed account if never rated)
    pub fn loyalty_of(&self, user: UserId) -> Result<LoyaltyAccount, MarketError> {
        Ok(self.store.read(|tables| {
            tables
                .loyalty(&user)
                .cloned()
                .unwrap_or_else(|| LoyaltyAccount::new(user))
        })?)
    }
}

/// Apply a point delta and log the badge recomputation outcome
///
/// Recomputation runs inside the rating transaction; a tier change is never
/// silently swallowed.
fn apply_and_log(account: &mut LoyaltyAccount, delta: i64) {
    let before = account.badge;
    account.apply_delta(delta);
    if account.badge != before {
        tracing::info!(
            user = %account.user_id,
            points = account.points,
            from = ?before,
            to = ?account.badge,
            "badge tier changed"
        );
    } else {
        tracing::debug!(
            user = %account.user_id,
            points = account.points,
            delta,
            "loyalty points adjusted"
        );
    }
}
