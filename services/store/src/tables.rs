//! Marketplace tables
//!
//! BTreeMap-backed so iteration order is deterministic. All cross-table
//! queries used by the engines live here: unique-key lookups, scans over
//! pending requests, and the set-difference projection behind pending
//! ratings.

use std::collections::BTreeMap;
use types::ids::{ItemId, RatingId, RequestId, TradeId, UserId};
use types::item::Item;
use types::loyalty::LoyaltyAccount;
use types::rating::Rating;
use types::request::{RequestStatus, TradeRequest};
use types::trade::{SwappedItem, Trade, TradeStatus};

/// Committed state of every marketplace entity
#[derive(Debug, Clone, Default)]
pub struct Tables {
    items: BTreeMap<ItemId, Item>,
    requests: BTreeMap<RequestId, TradeRequest>,
    trades: BTreeMap<TradeId, Trade>,
    swapped_items: Vec<SwappedItem>,
    ratings: BTreeMap<RatingId, Rating>,
    loyalty: BTreeMap<UserId, LoyaltyAccount>,
}

impl Tables {
    // --- items ---

    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.items.get(id)
    }

    pub fn item_mut(&mut self, id: &ItemId) -> Option<&mut Item> {
        self.items.get_mut(id)
    }

    pub fn insert_item(&mut self, item: Item) {
        self.items.insert(item.item_id, item);
    }

    pub fn items_of(&self, owner: &UserId) -> Vec<Item> {
        self.items
            .values()
            .filter(|i| i.owner_id == *owner)
            .cloned()
            .collect()
    }

    // --- trade requests ---

    pub fn request(&self, id: &RequestId) -> Option<&TradeRequest> {
        self.requests.get(id)
    }

    pub fn request_mut(&mut self, id: &RequestId) -> Option<&mut TradeRequest> {
        self.requests.get_mut(id)
    }

    pub fn insert_request(&mut self, request: TradeRequest) {
        self.requests.insert(request.request_id, request);
    }

    pub fn remove_request(&mut self, id: &RequestId) -> Option<TradeRequest> {
        self.requests.remove(id)
    }

    pub fn request_count(&self) -> usize {
        self.requests.len()
    }

    /// Ids of PENDING requests referencing the item on either side
    pub fn pending_requests_touching(&self, item_id: &ItemId) -> Vec<RequestId> {
        self.requests
            .values()
            .filter(|r| r.status == RequestStatus::Pending && r.touches_item(item_id))
            .map(|r| r.request_id)
            .collect()
    }

    /// Ids of non-pending requests referencing the item on either side
    pub fn settled_requests_touching(&self, item_id: &ItemId) -> Vec<RequestId> {
        self.requests
            .values()
            .filter(|r| r.status != RequestStatus::Pending && r.touches_item(item_id))
            .map(|r| r.request_id)
            .collect()
    }

    /// Check for an existing PENDING request with the identical triple
    pub fn duplicate_pending_exists(
        &self,
        requester: &UserId,
        requested_item: &ItemId,
        offered_item: &ItemId,
    ) -> bool {
        self.requests.values().any(|r| {
            r.status == RequestStatus::Pending
                && r.requester_id == *requester
                && r.requested_item_id == *requested_item
                && r.offered_item_id == *offered_item
        })
    }

    /// Requests sent by the user, newest first
    pub fn requests_sent_by(&self, user: &UserId) -> Vec<TradeRequest> {
        let mut out: Vec<TradeRequest> = self
            .requests
            .values()
            .filter(|r| r.requester_id == *user)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }

    /// Requests targeting items the user owns, newest first
    pub fn requests_received_by(&self, user: &UserId) -> Vec<TradeRequest> {
        let mut out: Vec<TradeRequest> = self
            .requests
            .values()
            .filter(|r| {
                self.items
                    .get(&r.requested_item_id)
                    .is_some_and(|item| item.owner_id == *user)
            })
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }

    // --- trades ---

    pub fn trade(&self, id: &TradeId) -> Option<&Trade> {
        self.trades.get(id)
    }

    pub fn trade_mut(&mut self, id: &TradeId) -> Option<&mut Trade> {
        self.trades.get_mut(id)
    }

    pub fn insert_trade(&mut self, trade: Trade) {
        self.trades.insert(trade.trade_id, trade);
    }

    /// All trades the user participates in, newest first
    pub fn trades_of(&self, user: &UserId) -> Vec<Trade> {
        let mut out: Vec<Trade> = self
            .trades
            .values()
            .filter(|t| t.has_participant(user))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }

    /// Completed trades the user participates in, newest first
    pub fn completed_trades_of(&self, user: &UserId) -> Vec<Trade> {
        let mut out: Vec<Trade> = self
            .trades
            .values()
            .filter(|t| t.has_participant(user) && t.status == TradeStatus::Completed)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }

    // --- transfer ledger ---

    pub fn append_swapped_item(&mut self, record: SwappedItem) {
        self.swapped_items.push(record);
    }

    pub fn swapped_items_of_trade(&self, trade_id: &TradeId) -> Vec<SwappedItem> {
        self.swapped_items
            .iter()
            .filter(|s| s.trade_id == *trade_id)
            .cloned()
            .collect()
    }

    // --- ratings ---

    pub fn rating(&self, id: &RatingId) -> Option<&Rating> {
        self.ratings.get(id)
    }

    pub fn rating_mut(&mut self, id: &RatingId) -> Option<&mut Rating> {
        self.ratings.get_mut(id)
    }

    pub fn insert_rating(&mut self, rating: Rating) {
        self.ratings.insert(rating.rating_id, rating);
    }

    pub fn remove_rating(&mut self, id: &RatingId) -> Option<Rating> {
        self.ratings.remove(id)
    }

    /// Check the (reviewer, reviewee, trade) uniqueness constraint
    pub fn rating_exists(&self, reviewer: &UserId, reviewee: &UserId, trade: &TradeId) -> bool {
        self.ratings.values().any(|r| {
            r.reviewer_id == *reviewer && r.reviewee_id == *reviewee && r.trade_id == *trade
        })
    }

    /// Trade ids the user has already rated as reviewer
    pub fn trades_rated_by(&self, reviewer: &UserId) -> Vec<TradeId> {
        self.ratings
            .values()
            .filter(|r| r.reviewer_id == *reviewer)
            .map(|r| r.trade_id)
            .collect()
    }

    pub fn ratings_received_by(&self, reviewee: &UserId) -> Vec<Rating> {
        self.ratings
            .values()
            .filter(|r| r.reviewee_id == *reviewee)
            .cloned()
            .collect()
    }

    // --- loyalty ---

    pub fn loyalty(&self, user: &UserId) -> Option<&LoyaltyAccount> {
        self.loyalty.get(user)
    }

    /// Get or create the loyalty account for a user
    pub fn loyalty_mut(&mut self, user: &UserId) -> &mut LoyaltyAccount {
        self.loyalty
            .entry(*user)
            .or_insert_with(|| LoyaltyAccount::new(*user))
    }
}
