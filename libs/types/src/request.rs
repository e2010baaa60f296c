//! Trade request lifecycle types
//!
//! A trade request is a non-binding proposal: "my offered item for your
//! requested item". It reserves nothing; items stay AVAILABLE until an
//! accept creates a trade.

use crate::ids::{ItemId, RequestId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Trade request status; terminal once non-PENDING
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestStatus {
    /// Awaiting a decision from the requested item's owner
    Pending,
    /// Accepted; a trade was created (terminal)
    Accepted,
    /// Rejected by the owner or invalidated by a competing accept (terminal)
    Rejected,
}

impl RequestStatus {
    /// Check if status is terminal (no further transitions possible)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

/// A proposal to exchange the requester's item for another user's item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRequest {
    pub request_id: RequestId,
    pub requester_id: UserId,
    pub requested_item_id: ItemId,
    pub offered_item_id: ItemId,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TradeRequest {
    /// Create a new pending request
    pub fn new(
        requester_id: UserId,
        requested_item_id: ItemId,
        offered_item_id: ItemId,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            request_id: RequestId::new(),
            requester_id,
            requested_item_id,
            offered_item_id,
            status: RequestStatus::Pending,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Check whether the request references the given item on either side
    pub fn touches_item(&self, item_id: &ItemId) -> bool {
        self.requested_item_id == *item_id || self.offered_item_id == *item_id
    }

    /// Mark accepted
    ///
    /// # Panics
    /// Panics if the request is already terminal.
    pub fn accept(&mut self, timestamp: DateTime<Utc>) {
        assert!(
            !self.status.is_terminal(),
            "Cannot accept a non-pending request"
        );
        self.status = RequestStatus::Accepted;
        self.updated_at = timestamp;
    }

    /// Mark rejected
    ///
    /// # Panics
    /// Panics if the request is already terminal.
    pub fn reject(&mut self, timestamp: DateTime<Utc>) {
        assert!(
            !self.status.is_terminal(),
            "Cannot reject a non-pending request"
        );
        self.status = RequestStatus::Rejected;
        self.updated_at = timestamp;
    }
}
