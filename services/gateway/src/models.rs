//! Request payloads accepted by the gateway
//!
//! These are the raw, untrusted shapes; `validation` turns them into the
//! sanitized inputs the engines consume. Responses reuse the serializable
//! domain types directly.

use serde::Deserialize;
use types::ids::{ItemId, TradeId, UserId};
use types::item::{GeoPoint, ItemCondition};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateItemRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub condition: ItemCondition,
    pub location: Option<GeoPoint>,
    /// Stored-file references produced by the upload collaborator
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateItemRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub condition: Option<ItemCondition>,
    pub location: Option<GeoPoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VisibilityRequest {
    pub visible: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageRequest {
    pub image: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTradeRequestPayload {
    pub requested_item_id: ItemId,
    pub offered_item_id: ItemId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRatingRequest {
    pub reviewee_id: UserId,
    pub trade_id: TradeId,
    pub score: u8,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRatingRequest {
    pub score: u8,
    pub comment: Option<String>,
}
