//! Rating & Loyalty Ledger
//!
//! Owns counterparty ratings for completed trades and the loyalty points
//! and badge tiers derived from them. Every rating mutation pairs with its
//! point adjustment in one transaction, and the badge is recomputed from
//! the new total before the transaction commits.

pub mod ledger;

pub use ledger::{CreateRating, LedgerConfig, LoyaltyLedger};
