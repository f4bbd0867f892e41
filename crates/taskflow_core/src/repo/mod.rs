//! Persistence layer abstractions and implementations.
//!
//! # Responsibility
//! - Define the durable load/save contract for whole documents.
//! - Isolate SQLite and serialization details from the document store.
//!
//! # Invariants
//! - A repository only ever reads or writes full snapshots; it never
//!   mutates store state.
//! - Unreadable persisted payloads surface as absence, not as errors.

pub mod document_repo;
