//! Read-only trade projections
//!
//! No state-machine semantics here; every projection reflects committed
//! state only, never the working copy of an in-flight write.

use types::errors::MarketError;
use types::ids::{TradeId, UserId};
use types::request::TradeRequest;
use types::trade::{SwappedItem, Trade};

use crate::engine::TradeEngine;

impl TradeEngine {
    /// All trades the user participates in, newest first
    pub fn user_trades(&self, user: UserId) -> Result<Vec<Trade>, MarketError> {
        Ok(self.store().read(|tables| tables.trades_of(&user))?)
    }

    /// Requests targeting items the user owns, newest first
    pub fn received_requests(&self, user: UserId) -> Result<Vec<TradeRequest>, MarketError> {
        Ok(self.store().read(|tables| tables.requests_received_by(&user))?)
    }

    /// Requests the user has sent, newest first
    pub fn sent_requests(&self, user: UserId) -> Result<Vec<TradeRequest>, MarketError> {
        Ok(self.store().read(|tables| tables.requests_sent_by(&user))?)
    }

    /// Completed trades the user participates in, newest first
    pub fn completed_trades(&self, user: UserId) -> Result<Vec<Trade>, MarketError> {
        Ok(self.store().read(|tables| tables.completed_trades_of(&user))?)
    }

    /// Transfer-ledger records of a trade (empty unless completed)
    pub fn trade_transfers(&self, trade_id: TradeId) -> Result<Vec<SwappedItem>, MarketError> {
        Ok(self
            .store()
            .read(|tables| tables.swapped_items_of_trade(&trade_id))?)
    }
}
