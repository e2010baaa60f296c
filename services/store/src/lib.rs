//! Transactional in-memory store
//!
//! Shared persistence surface for the marketplace services. The store is an
//! injected dependency (`Arc<SwapStore>`), never a global singleton, so
//! engines can be constructed against isolated stores in tests.
//!
//! Write transactions are all-or-nothing: the closure runs against a working
//! copy of the tables and the copy is committed only when it returns `Ok`.
//! The interior mutex serializes writers, which is what the accept path's
//! competing-request invalidation relies on.

pub mod tables;

use std::sync::Mutex;
use types::errors::{MarketError, StoreError};

pub use tables::Tables;

/// Handle to the marketplace tables
#[derive(Debug, Default)]
pub struct SwapStore {
    inner: Mutex<Tables>,
}

impl SwapStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a read-only projection over committed state
    pub fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> Result<T, StoreError> {
        let guard = self
            .inner
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))?;
        Ok(f(&guard))
    }

    /// Run a write transaction
    ///
    /// The closure mutates a working copy; on `Ok` the copy replaces the
    /// committed tables, on `Err` every staged write is discarded. Readers
    /// never observe the working copy.
    pub fn write<T>(
        &self,
        f: impl FnOnce(&mut Tables) -> Result<T, MarketError>,
    ) -> Result<T, MarketError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| MarketError::Store(StoreError::Unavailable("store lock poisoned".to_string())))?;
        let mut working = guard.clone();
        let out = f(&mut working)?;
        *guard = working;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use types::errors::RequestError;
    use types::ids::{ItemId, UserId};
    use types::request::TradeRequest;

    #[test]
    fn test_write_commits_on_ok() {
        let store = SwapStore::new();
        let request = TradeRequest::new(UserId::new(), ItemId::new(), ItemId::new(), Utc::now());
        let id = request.request_id;

        store
            .write(|tables| {
                tables.insert_request(request);
                Ok(())
            })
            .unwrap();

        let found = store.read(|tables| tables.request(&id).cloned()).unwrap();
        assert!(found.is_some());
    }

    #[test]
    fn test_write_rolls_back_on_err() {
        let store = SwapStore::new();
        let request = TradeRequest::new(UserId::new(), ItemId::new(), ItemId::new(), Utc::now());
        let id = request.request_id;

        let result: Result<(), MarketError> = store.write(|tables| {
            tables.insert_request(request);
            Err(RequestError::SameItem.into())
        });
        assert!(result.is_err());

        // The staged insert must not be visible after the failed transaction
        let found = store.read(|tables| tables.request(&id).cloned()).unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_reads_see_committed_state_only() {
        let store = SwapStore::new();
        let before = store.read(|tables| tables.request_count()).unwrap();
        let _ = store.write(|tables| {
            tables.insert_request(TradeRequest::new(
                UserId::new(),
                ItemId::new(),
                ItemId::new(),
                Utc::now(),
            ));
            Ok(())
        });
        let after = store.read(|tables| tables.request_count()).unwrap();
        assert_eq!(after, before + 1);
    }
}
