//! Types library for the swap marketplace
//!
//! This library provides all core type definitions shared across the
//! marketplace services: identifiers, item/trade lifecycle types, ratings,
//! loyalty accounting, and the error taxonomy.
//!
//! # Modules
//! - `ids`: Unique identifiers (UserId, ItemId, RequestId, TradeId, RatingId)
//! - `item`: Item lifecycle types
//! - `request`: Trade request lifecycle types
//! - `trade`: Trade and transfer-ledger types
//! - `rating`: Rating types
//! - `loyalty`: Loyalty points and badge tiers
//! - `errors`: Error taxonomy

// Public modules
pub mod errors;
pub mod ids;
pub mod item;
pub mod loyalty;
pub mod rating;
pub mod request;
pub mod trade;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::errors::*;
    pub use crate::ids::*;
    pub use crate::item::*;
    pub use crate::loyalty::*;
    pub use crate::rating::*;
    pub use crate::request::*;
    pub use crate::trade::*;
}
