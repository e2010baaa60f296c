//! Trade lifecycle operations
//!
//! The accept path is the critical section: item availability is shared
//! mutable state contended by every other pending request touching either
//! item, so its four-part effect (accept, create trade, reserve items,
//! invalidate competitors) commits atomically or not at all.

use std::sync::Arc;

use chrono::Utc;
use store::SwapStore;
use types::errors::{ItemError, MarketError, RequestError, TradeError};
use types::ids::{ItemId, RequestId, TradeId, UserId};
use types::item::{Item, ItemStatus};
use types::request::{RequestStatus, TradeRequest};
use types::trade::{SwappedItem, Trade, TradeStatus};

/// Marketplace trade engine over an injected store
#[derive(Debug, Clone)]
pub struct TradeEngine {
    store: Arc<SwapStore>,
}

fn not_available(item: &Item) -> MarketError {
    ItemError::NotAvailable {
        item_id: item.item_id.to_string(),
        status: format!("{:?}", item.status).to_uppercase(),
    }
    .into()
}

impl TradeEngine {
    /// Create an engine over the given store
    pub fn new(store: Arc<SwapStore>) -> Self {
        Self { store }
    }

    pub(crate) fn store(&self) -> &SwapStore {
        &self.store
    }

    /// Propose an item-for-item trade
    ///
    /// A request reserves nothing: both items stay AVAILABLE until an accept
    /// creates a trade. Preconditions are checked in order, each failing
    /// fast with a distinct error.
    pub fn create_trade_request(
        &self,
        requester: UserId,
        requested_item_id: ItemId,
        offered_item_id: ItemId,
    ) -> Result<TradeRequest, MarketError> {
        let now = Utc::now();
        self.store.write(|tables| {
            if requested_item_id == offered_item_id {
                return Err(RequestError::SameItem.into());
            }

            let requested = tables.item(&requested_item_id).ok_or(ItemError::NotFound {
                item_id: requested_item_id.to_string(),
            })?;
            let offered = tables.item(&offered_item_id).ok_or(ItemError::NotFound {
                item_id: offered_item_id.to_string(),
            })?;

            if !requested.is_available() {
                return Err(not_available(requested));
            }
            if !offered.is_available() {
                return Err(not_available(offered));
            }
            if !offered.is_owned_by(&requester) {
                return Err(RequestError::OfferedNotOwned {
                    item_id: offered_item_id.to_string(),
                }
                .into());
            }
            if requested.is_owned_by(&requester) {
                return Err(RequestError::RequestedOwnItem {
                    item_id: requested_item_id.to_string(),
                }
                .into());
            }
            if tables.duplicate_pending_exists(&requester, &requested_item_id, &offered_item_id) {
                return Err(RequestError::DuplicatePending.into());
            }

            let request = TradeRequest::new(requester, requested_item_id, offered_item_id, now);
            tables.insert_request(request.clone());
            tracing::info!(
                request_id = %request.request_id,
                requester = %requester,
                "trade request created"
            );
            Ok(request)
        })
    }

    /// Accept a pending request, creating the binding trade
    ///
    /// Atomic four-part effect: mark the request ACCEPTED, create a PENDING
    /// trade, reserve both items, and reject every other pending request
    /// touching either item. Accepting one offer invalidates all competing
    /// offers on both sides of the exchange.
    pub fn accept_trade_request(
        &self,
        user: UserId,
        request_id: RequestId,
    ) -> Result<(Trade, TradeRequest), MarketError> {
        let now = Utc::now();
        self.store.write(|tables| {
            let request = tables
                .request(&request_id)
                .cloned()
                .ok_or(RequestError::NotFound {
                    request_id: request_id.to_string(),
                })?;

            let requested =
                tables
                    .item(&request.requested_item_id)
                    .cloned()
                    .ok_or(ItemError::NotFound {
                        item_id: request.requested_item_id.to_string(),
                    })?;
            if !requested.is_owned_by(&user) {
                return Err(RequestError::NotRequestedOwner {
                    request_id: request_id.to_string(),
                }
                .into());
            }
            if request.status != RequestStatus::Pending {
                return Err(RequestError::NotPending {
                    request_id: request_id.to_string(),
                    status: format!("{:?}", request.status).to_uppercase(),
                }
                .into());
            }

            // Stale-state guard: with multiple offers outstanding, either
            // item may have been reserved or removed since the request was
            // created.
            let offered =
                tables
                    .item(&request.offered_item_id)
                    .cloned()
                    .ok_or(ItemError::NotFound {
                        item_id: request.offered_item_id.to_string(),
                    })?;
            if !requested.is_available() {
                return Err(not_available(&requested));
            }
            if !offered.is_available() {
                return Err(not_available(&offered));
            }

            // (a) accept this request
            let accepted = tables.request_mut(&request_id).ok_or(RequestError::NotFound {
                request_id: request_id.to_string(),
            })?;
            accepted.accept(now);
            let accepted = accepted.clone();

            // (b) create the trade
            let trade = Trade::new(
                request.request_id,
                user,
                request.requester_id,
                request.requested_item_id,
                request.offered_item_id,
                now,
            );
            tables.insert_trade(trade.clone());

            // (c) reserve both items
            for item_id in [request.requested_item_id, request.offered_item_id] {
                tables
                    .item_mut(&item_id)
                    .ok_or(ItemError::NotFound {
                        item_id: item_id.to_string(),
                    })?
                    .set_status(ItemStatus::Reserved, now);
            }

            // (d) reject every other pending request touching either item
            let mut competing: Vec<RequestId> = tables
                .pending_requests_touching(&request.requested_item_id)
                .into_iter()
                .chain(tables.pending_requests_touching(&request.offered_item_id))
                .filter(|id| *id != request_id)
                .collect();
            competing.sort();
            competing.dedup();
            let rejected_count = competing.len();
            for competing_id in competing {
                if let Some(other) = tables.request_mut(&competing_id) {
                    other.reject(now);
                }
            }

            tracing::info!(
                request_id = %request_id,
                trade_id = %trade.trade_id,
                rejected_competing = rejected_count,
                "trade request accepted"
            );
            Ok((trade, accepted))
        })
    }

    /// Reject a pending request
    ///
    /// No item status change: a mere request never reserved anything.
    pub fn reject_trade_request(
        &self,
        user: UserId,
        request_id: RequestId,
    ) -> Result<TradeRequest, MarketError> {
        let now = Utc::now();
        self.store.write(|tables| {
            let request = tables
                .request(&request_id)
                .cloned()
                .ok_or(RequestError::NotFound {
                    request_id: request_id.to_string(),
                })?;

            let owns_requested = tables
                .item(&request.requested_item_id)
                .is_some_and(|item| item.is_owned_by(&user));
            if !owns_requested {
                return Err(RequestError::NotRequestedOwner {
                    request_id: request_id.to_string(),
                }
                .into());
            }
            if request.status != RequestStatus::Pending {
                return Err(RequestError::NotPending {
                    request_id: request_id.to_string(),
                    status: format!("{:?}", request.status).to_uppercase(),
                }
                .into());
            }

            let rejected = tables.request_mut(&request_id).ok_or(RequestError::NotFound {
                request_id: request_id.to_string(),
            })?;
            rejected.reject(now);
            tracing::info!(request_id = %request_id, "trade request rejected");
            Ok(rejected.clone())
        })
    }

    /// Complete a pending trade
    ///
    /// Atomic three-part effect: mark COMPLETED with a completion timestamp,
    /// move both items to SWAPPED, and append two transfer-ledger records
    /// with swapped attribution (each party is recorded as the new owner of
    /// the item they acquired). This is the sole point after which rating
    /// becomes eligible.
    pub fn complete_trade(&self, user: UserId, trade_id: TradeId) -> Result<Trade, MarketError> {
        let now = Utc::now();
        self.store.write(|tables| {
            let trade = tables.trade(&trade_id).cloned().ok_or(TradeError::NotFound {
                trade_id: trade_id.to_string(),
            })?;
            if !trade.has_participant(&user) {
                return Err(TradeError::NotParticipant {
                    trade_id: trade_id.to_string(),
                }
                .into());
            }
            match trade.status {
                TradeStatus::Pending => {}
                TradeStatus::Completed => {
                    return Err(TradeError::AlreadyCompleted {
                        trade_id: trade_id.to_string(),
                    }
                    .into())
                }
                TradeStatus::Cancelled => {
                    return Err(TradeError::AlreadyCancelled {
                        trade_id: trade_id.to_string(),
                    }
                    .into())
                }
            }

            let completed = tables.trade_mut(&trade_id).ok_or(TradeError::NotFound {
                trade_id: trade_id.to_string(),
            })?;
            completed.complete(now);
            let completed = completed.clone();

            for item_id in [trade.requested_item_id, trade.offered_item_id] {
                tables
                    .item_mut(&item_id)
                    .ok_or(ItemError::NotFound {
                        item_id: item_id.to_string(),
                    })?
                    .set_status(ItemStatus::Swapped, now);
            }

            // Swapped attribution: the requester receives the requested
            // item, the owner receives the offered item.
            tables.append_swapped_item(SwappedItem::new(
                trade_id,
                trade.requested_item_id,
                trade.requester_id,
                now,
            ));
            tables.append_swapped_item(SwappedItem::new(
                trade_id,
                trade.offered_item_id,
                trade.owner_id,
                now,
            ));

            tracing::info!(trade_id = %trade_id, "trade completed");
            Ok(completed)
        })
    }

    /// Cancel a pending trade, reverting both items to AVAILABLE
    ///
    /// Already-completed and already-cancelled trades fail with distinct
    /// errors.
    pub fn cancel_trade(&self, user: UserId, trade_id: TradeId) -> Result<Trade, MarketError> {
        let now = Utc::now();
        self.store.write(|tables| {
            let trade = tables.trade(&trade_id).cloned().ok_or(TradeError::NotFound {
                trade_id: trade_id.to_string(),
            })?;
            if !trade.has_participant(&user) {
                return Err(TradeError::NotParticipant {
                    trade_id: trade_id.to_string(),
                }
                .into());
            }
            match trade.status {
                TradeStatus::Pending => {}
                TradeStatus::Completed => {
                    return Err(TradeError::AlreadyCompleted {
                        trade_id: trade_id.to_string(),
                    }
                    .into())
                }
                TradeStatus::Cancelled => {
                    return Err(TradeError::AlreadyCancelled {
                        trade_id: trade_id.to_string(),
                    }
                    .into())
                }
            }

            let cancelled = tables.trade_mut(&trade_id).ok_or(TradeError::NotFound {
                trade_id: trade_id.to_string(),
            })?;
            cancelled.cancel();
            let cancelled = cancelled.clone();

            for item_id in [trade.requested_item_id, trade.offered_item_id] {
                tables
                    .item_mut(&item_id)
                    .ok_or(ItemError::NotFound {
                        item_id: item_id.to_string(),
                    })?
                    .set_status(ItemStatus::Available, now);
            }

            tracing::info!(trade_id = %trade_id, "trade cancelled");
            Ok(cancelled)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::item::ItemCondition;

    fn listed_item(tables_store: &SwapStore, owner: UserId, title: &str) -> ItemId {
        let item = Item::new(
            owner,
            title.to_string(),
            format!("{} in working order", title),
            "misc".to_string(),
            ItemCondition::Good,
            None,
            Vec::new(),
            Utc::now(),
        );
        let id = item.item_id;
        tables_store
            .write(|tables| {
                tables.insert_item(item);
                Ok(())
            })
            .unwrap();
        id
    }

    struct Fixture {
        store: Arc<SwapStore>,
        engine: TradeEngine,
        alice: UserId,
        bob: UserId,
        item_a: ItemId,
        item_b: ItemId,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(SwapStore::new());
        let engine = TradeEngine::new(Arc::clone(&store));
        let alice = UserId::new();
        let bob = UserId::new();
        let item_a = listed_item(&store, alice, "itemA");
        let item_b = listed_item(&store, bob, "itemB");
        Fixture {
            store,
            engine,
            alice,
            bob,
            item_a,
            item_b,
        }
    }

    fn item_status(store: &SwapStore, id: &ItemId) -> ItemStatus {
        store.read(|t| t.item(id).unwrap().status).unwrap()
    }

    #[test]
    fn test_create_request_keeps_items_available() {
        let f = fixture();
        let request = f
            .engine
            .create_trade_request(f.alice, f.item_b, f.item_a)
            .unwrap();
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(item_status(&f.store, &f.item_a), ItemStatus::Available);
        assert_eq!(item_status(&f.store, &f.item_b), ItemStatus::Available);
    }

    #[test]
    fn test_create_request_same_item_rejected_without_record() {
        let f = fixture();
        let err = f
            .engine
            .create_trade_request(f.alice, f.item_a, f.item_a)
            .unwrap_err();
        assert_eq!(err, MarketError::Request(RequestError::SameItem));
        let count = f.store.read(|t| t.request_count()).unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_create_request_offered_must_be_owned() {
        let f = fixture();
        // Alice offers Bob's own item for Bob's item
        let err = f
            .engine
            .create_trade_request(f.alice, f.item_b, f.item_b)
            .unwrap_err();
        assert!(matches!(
            err,
            MarketError::Request(RequestError::OfferedNotOwned { .. })
        ));
    }

    #[test]
    fn test_create_request_cannot_request_own_item() {
        let f = fixture();
        let second = listed_item(&f.store, f.alice, "spare");
        let err = f
            .engine
            .create_trade_request(f.alice, second, f.item_a)
            .unwrap_err();
        assert!(matches!(
            err,
            MarketError::Request(RequestError::RequestedOwnItem { .. })
        ));
    }

    #[test]
    fn test_create_request_duplicate_pending_rejected() {
        let f = fixture();
        f.engine
            .create_trade_request(f.alice, f.item_b, f.item_a)
            .unwrap();
        let err = f
            .engine
            .create_trade_request(f.alice, f.item_b, f.item_a)
            .unwrap_err();
        assert_eq!(err, MarketError::Request(RequestError::DuplicatePending));
    }

    #[test]
    fn test_accept_reserves_items_and_creates_trade() {
        let f = fixture();
        let request = f
            .engine
            .create_trade_request(f.alice, f.item_b, f.item_a)
            .unwrap();
        let (trade, accepted) = f
            .engine
            .accept_trade_request(f.bob, request.request_id)
            .unwrap();

        assert_eq!(accepted.status, RequestStatus::Accepted);
        assert_eq!(trade.status, TradeStatus::Pending);
        assert_eq!(trade.owner_id, f.bob);
        assert_eq!(trade.requester_id, f.alice);
        assert_eq!(item_status(&f.store, &f.item_a), ItemStatus::Reserved);
        assert_eq!(item_status(&f.store, &f.item_b), ItemStatus::Reserved);
    }

    #[test]
    fn test_accept_requires_requested_items_owner() {
        let f = fixture();
        let request = f
            .engine
            .create_trade_request(f.alice, f.item_b, f.item_a)
            .unwrap();
        // The requester cannot accept their own request
        let err = f
            .engine
            .accept_trade_request(f.alice, request.request_id)
            .unwrap_err();
        assert!(matches!(
            err,
            MarketError::Request(RequestError::NotRequestedOwner { .. })
        ));
    }

    #[test]
    fn test_accept_rejects_competing_requests_on_both_items() {
        let f = fixture();
        let carol = UserId::new();
        let dave = UserId::new();
        let item_c = listed_item(&f.store, carol, "itemC");
        let item_d = listed_item(&f.store, dave, "itemD");
        let item_e = listed_item(&f.store, carol, "itemE");

        // The request that will win
        let winner = f
            .engine
            .create_trade_request(f.alice, f.item_b, f.item_a)
            .unwrap();
        // Competes on the requested side (also wants itemB)
        let wants_b = f
            .engine
            .create_trade_request(carol, f.item_b, item_c)
            .unwrap();
        // Competes on the offered side (wants itemA)
        let wants_a = f
            .engine
            .create_trade_request(dave, f.item_a, item_d)
            .unwrap();
        // Touches neither item; must be untouched
        let unrelated = f
            .engine
            .create_trade_request(dave, item_e, item_d)
            .unwrap();

        f.engine
            .accept_trade_request(f.bob, winner.request_id)
            .unwrap();

        let statuses = f
            .store
            .read(|t| {
                (
                    t.request(&wants_b.request_id).unwrap().status,
                    t.request(&wants_a.request_id).unwrap().status,
                    t.request(&unrelated.request_id).unwrap().status,
                )
            })
            .unwrap();
        assert_eq!(statuses.0, RequestStatus::Rejected);
        assert_eq!(statuses.1, RequestStatus::Rejected);
        assert_eq!(statuses.2, RequestStatus::Pending);
    }

    #[test]
    fn test_accept_fails_when_item_no_longer_available() {
        let f = fixture();
        let carol = UserId::new();
        let item_c = listed_item(&f.store, carol, "itemC");

        let first = f
            .engine
            .create_trade_request(f.alice, f.item_b, f.item_a)
            .unwrap();
        let second = f
            .engine
            .create_trade_request(carol, f.item_b, item_c)
            .unwrap();

        f.engine
            .accept_trade_request(f.bob, first.request_id)
            .unwrap();

        // Second was fan-out rejected; even if it were still pending, itemB
        // is now reserved. Either way the accept must fail.
        let err = f
            .engine
            .accept_trade_request(f.bob, second.request_id)
            .unwrap_err();
        assert!(matches!(
            err,
            MarketError::Request(RequestError::NotPending { .. })
                | MarketError::Item(ItemError::NotAvailable { .. })
        ));
    }

    #[test]
    fn test_reject_leaves_items_available() {
        let f = fixture();
        let request = f
            .engine
            .create_trade_request(f.alice, f.item_b, f.item_a)
            .unwrap();
        let rejected = f
            .engine
            .reject_trade_request(f.bob, request.request_id)
            .unwrap();
        assert_eq!(rejected.status, RequestStatus::Rejected);
        assert_eq!(item_status(&f.store, &f.item_a), ItemStatus::Available);
        assert_eq!(item_status(&f.store, &f.item_b), ItemStatus::Available);
    }

    #[test]
    fn test_complete_swaps_items_and_writes_ledger() {
        let f = fixture();
        let request = f
            .engine
            .create_trade_request(f.alice, f.item_b, f.item_a)
            .unwrap();
        let (trade, _) = f
            .engine
            .accept_trade_request(f.bob, request.request_id)
            .unwrap();
        let completed = f.engine.complete_trade(f.bob, trade.trade_id).unwrap();

        assert_eq!(completed.status, TradeStatus::Completed);
        assert!(completed.completed_at.is_some());
        assert_eq!(item_status(&f.store, &f.item_a), ItemStatus::Swapped);
        assert_eq!(item_status(&f.store, &f.item_b), ItemStatus::Swapped);

        let ledger = f
            .store
            .read(|t| t.swapped_items_of_trade(&trade.trade_id))
            .unwrap();
        assert_eq!(ledger.len(), 2);
        // Alice (requester) acquires itemB; Bob (owner) acquires itemA
        assert!(ledger
            .iter()
            .any(|s| s.item_id == f.item_b && s.new_owner_id == f.alice));
        assert!(ledger
            .iter()
            .any(|s| s.item_id == f.item_a && s.new_owner_id == f.bob));
    }

    #[test]
    fn test_complete_twice_is_idempotent_rejecting() {
        let f = fixture();
        let request = f
            .engine
            .create_trade_request(f.alice, f.item_b, f.item_a)
            .unwrap();
        let (trade, _) = f
            .engine
            .accept_trade_request(f.bob, request.request_id)
            .unwrap();

        f.engine.complete_trade(f.alice, trade.trade_id).unwrap();
        let err = f.engine.complete_trade(f.alice, trade.trade_id).unwrap_err();
        assert!(matches!(
            err,
            MarketError::Trade(TradeError::AlreadyCompleted { .. })
        ));
    }

    #[test]
    fn test_cancel_reverts_items_to_available() {
        let f = fixture();
        let request = f
            .engine
            .create_trade_request(f.alice, f.item_b, f.item_a)
            .unwrap();
        let (trade, _) = f
            .engine
            .accept_trade_request(f.bob, request.request_id)
            .unwrap();
        let cancelled = f.engine.cancel_trade(f.alice, trade.trade_id).unwrap();

        assert_eq!(cancelled.status, TradeStatus::Cancelled);
        assert_eq!(item_status(&f.store, &f.item_a), ItemStatus::Available);
        assert_eq!(item_status(&f.store, &f.item_b), ItemStatus::Available);
    }

    #[test]
    fn test_cancel_after_completed_and_after_cancelled_are_distinct() {
        let f = fixture();
        let request = f
            .engine
            .create_trade_request(f.alice, f.item_b, f.item_a)
            .unwrap();
        let (trade, _) = f
            .engine
            .accept_trade_request(f.bob, request.request_id)
            .unwrap();
        f.engine.complete_trade(f.bob, trade.trade_id).unwrap();
        let after_completed = f.engine.cancel_trade(f.bob, trade.trade_id).unwrap_err();
        assert!(matches!(
            after_completed,
            MarketError::Trade(TradeError::AlreadyCompleted { .. })
        ));

        // Second lifecycle: cancel, then cancel again
        let g = fixture();
        let request = g
            .engine
            .create_trade_request(g.alice, g.item_b, g.item_a)
            .unwrap();
        let (trade, _) = g
            .engine
            .accept_trade_request(g.bob, request.request_id)
            .unwrap();
        g.engine.cancel_trade(g.bob, trade.trade_id).unwrap();
        let after_cancelled = g.engine.cancel_trade(g.bob, trade.trade_id).unwrap_err();
        assert!(matches!(
            after_cancelled,
            MarketError::Trade(TradeError::AlreadyCancelled { .. })
        ));
        assert_ne!(after_completed, after_cancelled);
    }

    #[test]
    fn test_non_participant_cannot_complete_or_cancel() {
        let f = fixture();
        let request = f
            .engine
            .create_trade_request(f.alice, f.item_b, f.item_a)
            .unwrap();
        let (trade, _) = f
            .engine
            .accept_trade_request(f.bob, request.request_id)
            .unwrap();

        let stranger = UserId::new();
        assert!(matches!(
            f.engine.complete_trade(stranger, trade.trade_id).unwrap_err(),
            MarketError::Trade(TradeError::NotParticipant { .. })
        ));
        assert!(matches!(
            f.engine.cancel_trade(stranger, trade.trade_id).unwrap_err(),
            MarketError::Trade(TradeError::NotParticipant { .. })
        ));
    }
}
