//! Conference use-case services.
//!
//! # Responsibility
//! - Expose one named operation per logical conference action.
//! - Wrap every write in the busy-retry policy; reads run once.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer holds no cached state; every call round-trips the store.

pub mod conference_service;
