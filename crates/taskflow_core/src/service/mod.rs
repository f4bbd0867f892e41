//! Use-case services over the document store.
//!
//! # Responsibility
//! - Orchestrate store calls into editor-level APIs.
//! - Keep rendering callers decoupled from id generation and seeding
//!   policy.

pub mod document_service;
