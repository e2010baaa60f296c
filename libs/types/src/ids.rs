//! Unique identifier types for marketplace entities
//!
//! All IDs use UUID v7 for time-sortable ordering, enabling efficient
//! chronological queries over items, requests, and trades.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new id with the current timestamp embedded
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Create from an existing UUID
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Get the inner UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

uuid_id! {
    /// Unique identifier for a user account
    UserId
}

uuid_id! {
    /// Unique identifier for a listed item
    ItemId
}

uuid_id! {
    /// Unique identifier for a trade request (a non-binding proposal)
    RequestId
}

uuid_id! {
    /// Unique identifier for a trade (the binding exchange)
    TradeId
}

uuid_id! {
    /// Unique identifier for a rating
    RatingId
}

uuid_id! {
    /// Unique identifier for a transfer-ledger record
    SwapId
}
