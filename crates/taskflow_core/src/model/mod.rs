//! Domain model for the block document.
//!
//! # Responsibility
//! - Define the canonical data structures used by the document core.
//! - Keep one block-centric shape shared by storage and rendering callers.
//!
//! # Invariants
//! - Every block is identified by a stable `BlockId`.
//! - Document order is the position in the collection; there is no
//!   separate rank or sort field.

pub mod block;
