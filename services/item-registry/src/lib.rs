//! Item Registry
//!
//! Owns CRUD over items and their image attachments. Status transitions
//! during the trade flow belong to the trade engine; the registry only
//! handles owner-driven mutations and the orchestrated deletion cascade.

pub mod registry;

pub use registry::{ItemRegistry, NewItem};
