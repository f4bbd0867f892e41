//! Ordered-collection ownership and reorder resolution.
//!
//! # Responsibility
//! - Own the single mutable block sequence behind a narrow mutation API.
//! - Translate drag gestures from both input channels into canonical
//!   relocations against that sequence.
//!
//! # Invariants
//! - The store is the exclusive writer of the collection.
//! - Every applied mutation notifies subscribers synchronously and hands a
//!   full snapshot to the persistence adapter.

pub mod document_store;
pub mod reorder;
