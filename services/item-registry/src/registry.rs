//! Item CRUD, image attachments, and the deletion cascade
//!
//! Deletion is an explicit orchestration, not a database feature: it is
//! refused while any pending request references the item, and otherwise
//! removes the listing, its images, and its settled requests in one
//! transaction. The trade engine independently re-checks availability at
//! accept time, since state can change between check and use.

use std::sync::Arc;

use chrono::Utc;
use store::SwapStore;
use types::errors::{ItemError, MarketError};
use types::ids::{ItemId, UserId};
use types::item::{GeoPoint, ImageRef, Item, ItemCondition, ItemEdit, ItemStatus};

/// Fields required to create a listing
#[derive(Debug, Clone)]
pub struct NewItem {
    pub title: String,
    pub description: String,
    pub category: String,
    pub condition: ItemCondition,
    pub location: Option<GeoPoint>,
    /// Ordered stored-image references produced by the upload collaborator
    pub images: Vec<ImageRef>,
}

/// Item registry over an injected store
#[derive(Debug, Clone)]
pub struct ItemRegistry {
    store: Arc<SwapStore>,
}

fn not_found(item_id: &ItemId) -> MarketError {
    ItemError::NotFound {
        item_id: item_id.to_string(),
    }
    .into()
}

fn not_owner(item_id: &ItemId) -> MarketError {
    ItemError::NotOwner {
        item_id: item_id.to_string(),
    }
    .into()
}

impl ItemRegistry {
    /// Create a registry over the given store
    pub fn new(store: Arc<SwapStore>) -> Self {
        Self { store }
    }

    /// List a new item, initially AVAILABLE
    pub fn create_item(&self, owner: UserId, new_item: NewItem) -> Result<Item, MarketError> {
        let now = Utc::now();
        self.store.write(|tables| {
            let item = Item::new(
                owner,
                new_item.title,
                new_item.description,
                new_item.category,
                new_item.condition,
                new_item.location,
                new_item.images,
                now,
            );
            tables.insert_item(item.clone());
            tracing::info!(item_id = %item.item_id, owner = %owner, "item listed");
            Ok(item)
        })
    }

    /// Fetch an item by id
    pub fn get_item(&self, item_id: ItemId) -> Result<Item, MarketError> {
        self.store
            .read(|tables| tables.item(&item_id).cloned())?
            .ok_or_else(|| not_found(&item_id))
    }

    /// Fetch an item only if it is AVAILABLE
    pub fn find_available(&self, item_id: ItemId) -> Result<Item, MarketError> {
        let item = self.get_item(item_id)?;
        if !item.is_available() {
            return Err(ItemError::NotAvailable {
                item_id: item_id.to_string(),
                status: format!("{:?}", item.status).to_uppercase(),
            }
            .into());
        }
        Ok(item)
    }

    /// Check ownership without fetching the whole item
    pub fn is_owned_by(&self, item_id: ItemId, user: UserId) -> Result<bool, MarketError> {
        Ok(self
            .store
            .read(|tables| tables.item(&item_id).is_some_and(|i| i.is_owned_by(&user)))?)
    }

    /// All items listed by the user
    pub fn items_of(&self, owner: UserId) -> Result<Vec<Item>, MarketError> {
        Ok(self.store.read(|tables| tables.items_of(&owner))?)
    }

    /// Owner edit of the descriptive fields
    pub fn update_item(
        &self,
        owner: UserId,
        item_id: ItemId,
        edit: ItemEdit,
    ) -> Result<Item, MarketError> {
        let now = Utc::now();
        self.store.write(|tables| {
            let item = tables.item_mut(&item_id).ok_or_else(|| not_found(&item_id))?;
            if !item.is_owned_by(&owner) {
                return Err(not_owner(&item_id));
            }
            item.apply_edit(edit, now);
            Ok(item.clone())
        })
    }

    /// Owner visibility toggle: AVAILABLE ⇄ UNAVAILABLE
    ///
    /// Refused while the item is reserved or terminal; those states belong
    /// to the trade flow.
    pub fn set_visibility(
        &self,
        owner: UserId,
        item_id: ItemId,
        visible: bool,
    ) -> Result<Item, MarketError> {
        let now = Utc::now();
        self.store.write(|tables| {
            let item = tables.item_mut(&item_id).ok_or_else(|| not_found(&item_id))?;
            if !item.is_owned_by(&owner) {
                return Err(not_owner(&item_id));
            }
            match item.status {
                ItemStatus::Available | ItemStatus::Unavailable => {}
                ItemStatus::Reserved | ItemStatus::Swapped | ItemStatus::Removed => {
                    return Err(ItemError::VisibilityLocked {
                        item_id: item_id.to_string(),
                        status: format!("{:?}", item.status).to_uppercase(),
                    }
                    .into())
                }
            }
            let target = if visible {
                ItemStatus::Available
            } else {
                ItemStatus::Unavailable
            };
            if item.status != target {
                item.set_status(target, now);
            }
            Ok(item.clone())
        })
    }

    /// Append a stored-image reference to the listing
    pub fn attach_image(
        &self,
        owner: UserId,
        item_id: ItemId,
        image: ImageRef,
    ) -> Result<Item, MarketError> {
        let now = Utc::now();
        self.store.write(|tables| {
            let item = tables.item_mut(&item_id).ok_or_else(|| not_found(&item_id))?;
            if !item.is_owned_by(&owner) {
                return Err(not_owner(&item_id));
            }
            item.images.push(image);
            item.updated_at = now;
            item.version += 1;
            Ok(item.clone())
        })
    }

    /// Remove a stored-image reference from the listing
    pub fn detach_image(
        &self,
        owner: UserId,
        item_id: ItemId,
        image: &ImageRef,
    ) -> Result<Item, MarketError> {
        let now = Utc::now();
        self.store.write(|tables| {
            let item = tables.item_mut(&item_id).ok_or_else(|| not_found(&item_id))?;
            if !item.is_owned_by(&owner) {
                return Err(not_owner(&item_id));
            }
            item.images.retain(|i| i != image);
            item.updated_at = now;
            item.version += 1;
            Ok(item.clone())
        })
    }

    /// Delete a listing
    ///
    /// Orchestrated cascade: refuse unless the item is AVAILABLE and no
    /// pending request references it; then mark REMOVED, drop the image
    /// references, and purge the item's settled requests. The row itself
    /// stays so the transfer ledger keeps valid item references.
    pub fn delete_item(&self, owner: UserId, item_id: ItemId) -> Result<(), MarketError> {
        let now = Utc::now();
        self.store.write(|tables| {
            let item = tables.item(&item_id).ok_or_else(|| not_found(&item_id))?;
            if !item.is_owned_by(&owner) {
                return Err(not_owner(&item_id));
            }
            if !item.is_available() {
                return Err(ItemError::NotAvailable {
                    item_id: item_id.to_string(),
                    status: format!("{:?}", item.status).to_uppercase(),
                }
                .into());
            }
            let pending = tables.pending_requests_touching(&item_id);
            if !pending.is_empty() {
                return Err(ItemError::PendingRequestsExist {
                    item_id: item_id.to_string(),
                    count: pending.len(),
                }
                .into());
            }

            for request_id in tables.settled_requests_touching(&item_id) {
                tables.remove_request(&request_id);
            }
            let item = tables.item_mut(&item_id).ok_or_else(|| not_found(&item_id))?;
            item.images.clear();
            item.set_status(ItemStatus::Removed, now);
            tracing::info!(item_id = %item_id, "item removed");
            Ok(())
        })
    }
}
