//! Trade Lifecycle Engine
//!
//! Orchestrates the request → trade state machines:
//!
//! - TradeRequest: PENDING → {ACCEPTED, REJECTED} (terminal once non-PENDING)
//! - Trade: PENDING → {COMPLETED, CANCELLED} (both terminal)
//!
//! Every multi-step effect (accept, complete, cancel) runs as a single store
//! write transaction, so a failure partway rolls back every staged write.
//! The engine never retries: each precondition violation surfaces as a
//! distinct error, and store failures propagate unmodified.

pub mod engine;
pub mod queries;

pub use engine::TradeEngine;
