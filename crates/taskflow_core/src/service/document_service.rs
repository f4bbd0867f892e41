//! Document use-case service.
//!
//! # Responsibility
//! - Provide editor-level entry points: open-with-starter-content, block
//!   insertion with generated ids, per-field edit wrappers, auto-seeding.
//! - Derive the document summary projection (title, preview, to-do
//!   progress).
//!
//! # Invariants
//! - The service generates block ids; the store never does.
//! - The collection is reseeded with exactly one empty paragraph when it
//!   becomes empty, so it is never empty for longer than one rendering
//!   cycle.

use crate::model::block::{Block, BlockId, BlockKind, BlockPatch};
use crate::repo::document_repo::DocumentRepository;
use crate::store::document_store::DocumentStore;
use once_cell::sync::Lazy;
use regex::Regex;

static MARKDOWN_SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\*_`#>~\-\[\]\(\)!]+"#).expect("valid markdown symbol regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

const PREVIEW_MAX_CHARS: usize = 100;

/// Derived read-only projection of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSummary {
    /// First heading's text, falling back to the first non-empty block.
    pub title: Option<String>,
    /// Sanitized body text, capped at 100 characters.
    pub preview_text: Option<String>,
    /// Number of to-do blocks.
    pub todo_total: usize,
    /// Number of checked to-do blocks.
    pub todo_done: usize,
}

/// Editor service facade over one document store.
pub struct DocumentService<R: DocumentRepository> {
    store: DocumentStore<R>,
}

impl<R: DocumentRepository> DocumentService<R> {
    /// Opens a document session over the repository's persisted state.
    ///
    /// A fresh (or unreadable) document is seeded with the starter
    /// content: an "Untitled Document" heading followed by one prompt
    /// paragraph.
    pub fn open(repo: R) -> Self {
        let mut store = DocumentStore::open(repo);
        if store.is_empty() {
            store.set_blocks(vec![
                Block::heading("Untitled Document"),
                Block::paragraph("Start writing... (press / for commands)"),
            ]);
        }
        Self { store }
    }

    /// The underlying store, for read access and subscriptions.
    pub fn store(&self) -> &DocumentStore<R> {
        &self.store
    }

    /// Mutable access to the underlying store.
    pub fn store_mut(&mut self) -> &mut DocumentStore<R> {
        &mut self.store
    }

    /// Read-only snapshot of the ordered collection.
    pub fn blocks(&self) -> &[Block] {
        self.store.blocks()
    }

    /// Seeds one empty paragraph when the collection is empty.
    ///
    /// Returns the seeded block's id, or `None` when nothing was needed.
    /// The rendering layer calls this before every render pass.
    pub fn ensure_nonempty(&mut self) -> Option<BlockId> {
        if !self.store.is_empty() {
            return None;
        }
        Some(self.insert(Block::paragraph(""), None))
    }

    /// Inserts a heading block with a fresh id. Returns the new id.
    pub fn insert_heading(
        &mut self,
        content: impl Into<String>,
        at_index: Option<usize>,
    ) -> BlockId {
        self.insert(Block::heading(content), at_index)
    }

    /// Inserts a paragraph block with a fresh id. Returns the new id.
    pub fn insert_paragraph(
        &mut self,
        content: impl Into<String>,
        at_index: Option<usize>,
    ) -> BlockId {
        self.insert(Block::paragraph(content), at_index)
    }

    /// Inserts an unchecked to-do block with a fresh id. Returns the new id.
    pub fn insert_todo(&mut self, content: impl Into<String>, at_index: Option<usize>) -> BlockId {
        self.insert(Block::todo(content), at_index)
    }

    /// Replaces the text of the block matching `id`. Missing ids are
    /// ignored.
    pub fn set_content(&mut self, id: BlockId, text: impl Into<String>) {
        self.store.update_block(id, &BlockPatch::content(text));
    }

    /// Sets the completion flag of the to-do block matching `id`. Missing
    /// ids and non-todo blocks are ignored.
    pub fn set_checked(&mut self, id: BlockId, checked: bool) {
        self.store.update_block(id, &BlockPatch::checked(checked));
    }

    /// Derives the summary projection from the live collection.
    pub fn summary(&self) -> DocumentSummary {
        derive_document_summary(self.store.blocks())
    }

    fn insert(&mut self, block: Block, at_index: Option<usize>) -> BlockId {
        let id = block.id;
        self.store.add_block(block, at_index);
        id
    }
}

/// Derives the summary projection for a block sequence.
///
/// Rules:
/// - `title`: first heading's sanitized text; falls back to the first
///   block with non-empty sanitized text.
/// - `preview_text`: non-heading contents joined, markdown symbols
///   removed, whitespace normalized, first 100 chars retained.
/// - `todo_total`/`todo_done`: to-do counts over the whole sequence.
pub fn derive_document_summary(blocks: &[Block]) -> DocumentSummary {
    let title = blocks
        .iter()
        .find(|block| matches!(block.kind, BlockKind::Heading { .. }))
        .map(|block| sanitize_text(block.content()))
        .filter(|text| !text.is_empty())
        .or_else(|| {
            blocks
                .iter()
                .map(|block| sanitize_text(block.content()))
                .find(|text| !text.is_empty())
        });

    let body = blocks
        .iter()
        .filter(|block| !matches!(block.kind, BlockKind::Heading { .. }))
        .map(Block::content)
        .collect::<Vec<_>>()
        .join(" ");
    let sanitized_body = sanitize_text(&body);
    let preview_text = if sanitized_body.is_empty() {
        None
    } else {
        Some(sanitized_body.chars().take(PREVIEW_MAX_CHARS).collect())
    };

    let todo_total = blocks
        .iter()
        .filter(|block| matches!(block.kind, BlockKind::Todo { .. }))
        .count();
    let todo_done = blocks.iter().filter(|block| block.is_checked()).count();

    DocumentSummary {
        title,
        preview_text,
        todo_total,
        todo_done,
    }
}

fn sanitize_text(value: &str) -> String {
    let without_symbols = MARKDOWN_SYMBOL_RE.replace_all(value, " ");
    let normalized = WHITESPACE_RE.replace_all(&without_symbols, " ");
    normalized.trim().to_string()
}
