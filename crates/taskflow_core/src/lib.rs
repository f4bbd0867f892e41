//! Core block-document engine for the TaskFlow editor.
//! This crate is the single source of truth for document ordering
//! invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::block::{Block, BlockId, BlockKind, BlockPatch, BlockValidationError};
pub use repo::document_repo::{
    DocumentRepository, RepoError, RepoResult, SqliteDocumentRepository, DEFAULT_DOCUMENT_KEY,
};
pub use service::document_service::{derive_document_summary, DocumentService, DocumentSummary};
pub use store::document_store::{DocumentStore, DocumentStoreError, SubscriberId};
pub use store::reorder::{resolve_sortable_drop, DropOutcome, PositionalDrag};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
