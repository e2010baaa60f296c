//! Rating types
//!
//! A rating is left by one trade participant about the other after the trade
//! completed. Every rating is linked to a completed trade; free-standing
//! reputation ratings are not supported.

use crate::ids::{RatingId, TradeId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Star score in [1, 5]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Score(u8);

impl Score {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Try to create a score, returning None if out of range
    pub fn try_new(stars: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&stars).then_some(Self(stars))
    }

    pub fn stars(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Score {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Score::try_new(value).ok_or_else(|| format!("score must be in [1,5], got {}", value))
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> u8 {
        score.0
    }
}

/// A review of a trade counterparty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub rating_id: RatingId,
    pub reviewer_id: UserId,
    pub reviewee_id: UserId,
    pub trade_id: TradeId,
    pub score: Score,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Rating {
    pub fn new(
        reviewer_id: UserId,
        reviewee_id: UserId,
        trade_id: TradeId,
        score: Score,
        comment: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            rating_id: RatingId::new(),
            reviewer_id,
            reviewee_id,
            trade_id,
            score,
            comment,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Apply an author edit
    pub fn revise(&mut self, score: Score, comment: Option<String>, timestamp: DateTime<Utc>) {
        self.score = score;
        self.comment = comment;
        self.updated_at = timestamp;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_range() {
        assert!(Score::try_new(0).is_none());
        assert!(Score::try_new(6).is_none());
        for stars in 1..=5 {
            assert_eq!(Score::try_new(stars).unwrap().stars(), stars);
        }
    }

    #[test]
    fn test_score_serde_rejects_out_of_range() {
        let ok: Score = serde_json::from_str("3").unwrap();
        assert_eq!(ok.stars(), 3);
        assert!(serde_json::from_str::<Score>("0").is_err());
        assert!(serde_json::from_str::<Score>("9").is_err());
    }

    #[test]
    fn test_revise_updates_score_and_comment() {
        let mut rating = Rating::new(
            UserId::new(),
            UserId::new(),
            TradeId::new(),
            Score::try_new(4).unwrap(),
            None,
            Utc::now(),
        );
        rating.revise(
            Score::try_new(2).unwrap(),
            Some("item arrived scratched".to_string()),
            Utc::now(),
        );
        assert_eq!(rating.score.stars(), 2);
        assert!(rating.comment.is_some());
    }
}
