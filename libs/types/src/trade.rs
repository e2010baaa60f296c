//! Trade and transfer-ledger types
//!
//! A trade is the binding exchange created exactly once per accepted trade
//! request. Completion appends two immutable SwappedItem records, one per
//! item transferred.

use crate::ids::{ItemId, RequestId, SwapId, TradeId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Trade status; COMPLETED and CANCELLED are terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeStatus {
    /// Accepted and awaiting hand-off
    Pending,
    /// Both items exchanged (terminal)
    Completed,
    /// Called off by either participant (terminal)
    Cancelled,
}

impl TradeStatus {
    /// Check if status is terminal (no further transitions possible)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TradeStatus::Pending)
    }
}

/// The binding exchange between the requested item's owner and the requester
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: TradeId,
    /// The accepted request this trade was created from (one-to-one)
    pub request_id: RequestId,
    /// Owner of the requested item, who accepted the request
    pub owner_id: UserId,
    pub requester_id: UserId,
    pub requested_item_id: ItemId,
    pub offered_item_id: ItemId,
    pub status: TradeStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Trade {
    /// Create a new pending trade from an accepted request
    pub fn new(
        request_id: RequestId,
        owner_id: UserId,
        requester_id: UserId,
        requested_item_id: ItemId,
        offered_item_id: ItemId,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            trade_id: TradeId::new(),
            request_id,
            owner_id,
            requester_id,
            requested_item_id,
            offered_item_id,
            status: TradeStatus::Pending,
            created_at: timestamp,
            completed_at: None,
        }
    }

    /// Check whether the given user is one of the two participants
    pub fn has_participant(&self, user: &UserId) -> bool {
        self.owner_id == *user || self.requester_id == *user
    }

    /// Get the counterparty of the given participant, if they are one
    pub fn counterparty_of(&self, user: &UserId) -> Option<UserId> {
        if self.owner_id == *user {
            Some(self.requester_id)
        } else if self.requester_id == *user {
            Some(self.owner_id)
        } else {
            None
        }
    }

    /// Mark completed
    ///
    /// # Panics
    /// Panics if the trade is already terminal.
    pub fn complete(&mut self, timestamp: DateTime<Utc>) {
        assert!(
            !self.status.is_terminal(),
            "Cannot complete a non-pending trade"
        );
        self.status = TradeStatus::Completed;
        self.completed_at = Some(timestamp);
    }

    /// Mark cancelled
    ///
    /// # Panics
    /// Panics if the trade is already terminal.
    pub fn cancel(&mut self) {
        assert!(
            !self.status.is_terminal(),
            "Cannot cancel a non-pending trade"
        );
        self.status = TradeStatus::Cancelled;
    }

    /// Check if trade is completed
    pub fn is_completed(&self) -> bool {
        matches!(self.status, TradeStatus::Completed)
    }
}

/// Immutable transfer-ledger record: which user ended up owning which item
///
/// Created only at trade completion, two per trade, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwappedItem {
    pub swap_id: SwapId,
    pub trade_id: TradeId,
    pub item_id: ItemId,
    pub new_owner_id: UserId,
    pub recorded_at: DateTime<Utc>,
}

impl SwappedItem {
    pub fn new(
        trade_id: TradeId,
        item_id: ItemId,
        new_owner_id: UserId,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            swap_id: SwapId::new(),
            trade_id,
            item_id,
            new_owner_id,
            recorded_at: timestamp,
        }
    }
}
