//! Item lifecycle types
//!
//! An item is listed by its owner and moves through availability states as
//! trades progress. Status is a closed enum so an unhandled state is a
//! compile-time error at every transition site.

use crate::ids::{ItemId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Physical condition of a listed item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemCondition {
    New,
    LikeNew,
    Good,
    Fair,
    Poor,
}

/// Item availability status
///
/// RESERVED is held exclusively by the trade engine while a trade is
/// PENDING; SWAPPED and REMOVED are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ItemStatus {
    /// Listed and open to trade requests
    Available,
    /// Locked by an accepted, not-yet-completed trade
    Reserved,
    /// Transferred through a completed trade (terminal)
    Swapped,
    /// Hidden by its owner; not open to trade requests
    Unavailable,
    /// Soft-deleted by its owner (terminal)
    Removed,
}

impl ItemStatus {
    /// Check if status is terminal (no further transitions possible)
    pub fn is_terminal(&self) -> bool {
        matches!(self, ItemStatus::Swapped | ItemStatus::Removed)
    }
}

/// Optional geolocation attached to a listing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Reference to an already-stored image (upload handling is external)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A listed item
///
/// Mutated by its owner (edits) or by the trade engine (status transitions
/// during the trade flow). `version` increments on every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub item_id: ItemId,
    pub owner_id: UserId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub condition: ItemCondition,
    pub status: ItemStatus,
    pub location: Option<GeoPoint>,
    /// Ordered list of stored-image references
    pub images: Vec<ImageRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u64,
}

impl Item {
    /// Create a new available listing
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        owner_id: UserId,
        title: String,
        description: String,
        category: String,
        condition: ItemCondition,
        location: Option<GeoPoint>,
        images: Vec<ImageRef>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            item_id: ItemId::new(),
            owner_id,
            title,
            description,
            category,
            condition,
            status: ItemStatus::Available,
            location,
            images,
            created_at: timestamp,
            updated_at: timestamp,
            version: 0,
        }
    }

    /// Check whether the item can be the subject of a new trade request
    pub fn is_available(&self) -> bool {
        self.status == ItemStatus::Available
    }

    /// Check ownership
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        self.owner_id == *user
    }

    /// Transition to a new status
    ///
    /// The caller is responsible for having validated the transition; this
    /// only refuses moves out of a terminal state.
    ///
    /// # Panics
    /// Panics if the current status is terminal.
    pub fn set_status(&mut self, status: ItemStatus, timestamp: DateTime<Utc>) {
        assert!(
            !self.status.is_terminal(),
            "Cannot transition item out of terminal status"
        );
        self.status = status;
        self.updated_at = timestamp;
        self.version += 1;
    }

    /// Apply an owner edit to the descriptive fields
    pub fn apply_edit(&mut self, edit: ItemEdit, timestamp: DateTime<Utc>) {
        if let Some(title) = edit.title {
            self.title = title;
        }
        if let Some(description) = edit.description {
            self.description = description;
        }
        if let Some(category) = edit.category {
            self.category = category;
        }
        if let Some(condition) = edit.condition {
            self.condition = condition;
        }
        if let Some(location) = edit.location {
            self.location = Some(location);
        }
        self.updated_at = timestamp;
        self.version += 1;
    }
}

/// Partial update to an item's descriptive fields
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub condition: Option<ItemCondition>,
    pub location: Option<GeoPoint>,
}
