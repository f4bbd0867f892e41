//! Document store: owner of the ordered block collection.
//!
//! # Responsibility
//! - Hold exactly one ordered collection of blocks and expose its
//!   mutation API (add, update, remove, move, replace-all).
//! - Notify subscribers synchronously after every applied mutation.
//! - Hand the full current state to the persistence adapter after every
//!   applied mutation.
//!
//! # Invariants
//! - Iteration order of the collection is the authoritative document
//!   order; nothing else encodes position.
//! - Block ids stay pairwise distinct for every caller that honors the
//!   `add_block`/`set_blocks` contracts.
//! - Subscribers always observe a fully-applied, internally-consistent
//!   collection, never an intermediate one.
//! - A failed save never rolls back or blocks the in-memory mutation.

use crate::model::block::{ids_are_distinct, Block, BlockId, BlockPatch};
use crate::repo::document_repo::DocumentRepository;
use log::error;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Handle returned by `subscribe`, used to stop delivery again.
pub type SubscriberId = u64;

type Listener = Box<dyn Fn(&[Block])>;

/// Errors from document store mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentStoreError {
    /// `move_block` was asked to move from a position that does not exist.
    MoveSourceOutOfRange { from: usize, len: usize },
}

impl Display for DocumentStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MoveSourceOutOfRange { from, len } => write!(
                f,
                "cannot move block from position {from}: collection has {len} blocks"
            ),
        }
    }
}

impl Error for DocumentStoreError {}

/// Exclusive owner of one ordered block collection.
///
/// The repository is constructor-injected and the store's lifecycle is tied
/// to one document session; there is no process-wide instance.
pub struct DocumentStore<R: DocumentRepository> {
    repo: R,
    blocks: Vec<Block>,
    subscribers: Vec<(SubscriberId, Listener)>,
    next_subscriber: SubscriberId,
}

impl<R: DocumentRepository> DocumentStore<R> {
    /// Opens a store over the repository's persisted state.
    ///
    /// Absence of prior state yields an empty collection. A repository
    /// transport failure during load is logged and also yields an empty
    /// collection: losing durability must never block editing.
    pub fn open(repo: R) -> Self {
        let blocks = match repo.load() {
            Ok(Some(blocks)) => blocks,
            Ok(None) => Vec::new(),
            Err(err) => {
                error!("event=doc_load module=store status=error error={err}");
                Vec::new()
            }
        };

        Self {
            repo,
            blocks,
            subscribers: Vec::new(),
            next_subscriber: 0,
        }
    }

    /// Read-only snapshot of the ordered collection.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of blocks in the collection.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Current position of the block with the given id.
    pub fn position_of(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|block| block.id == id)
    }

    /// Inserts `block` at `at_index` when given and within bounds,
    /// otherwise appends.
    ///
    /// # Contract
    /// - The caller supplies a fresh id; the store performs no uniqueness
    ///   check here and never generates ids itself.
    /// - Insertion is unbounded and cannot fail.
    pub fn add_block(&mut self, block: Block, at_index: Option<usize>) {
        match at_index {
            Some(index) if index <= self.blocks.len() => self.blocks.insert(index, block),
            _ => self.blocks.push(block),
        }
        self.commit();
    }

    /// Merges `patch` into the block matching `id`.
    ///
    /// A missing id is a no-op, not an error: stale references from the
    /// rendering layer are expected and must not crash the view.
    pub fn update_block(&mut self, id: BlockId, patch: &BlockPatch) {
        let Some(block) = self.blocks.iter_mut().find(|block| block.id == id) else {
            return;
        };
        block.apply_patch(patch);
        self.commit();
    }

    /// Removes the block matching `id`. A missing id is a no-op.
    pub fn remove_block(&mut self, id: BlockId) {
        let Some(index) = self.position_of(id) else {
            return;
        };
        self.blocks.remove(index);
        self.commit();
    }

    /// Removes the block at `from` and reinserts it at `to` within the
    /// post-removal sequence, keeping identity and field values untouched.
    ///
    /// `to` past the end appends. `from == to` is a no-op.
    ///
    /// # Errors
    /// - An out-of-bounds `from` is rejected and leaves the collection
    ///   untouched; silently guessing a source position would corrupt
    ///   document order.
    pub fn move_block(&mut self, from: usize, to: usize) -> Result<(), DocumentStoreError> {
        if from >= self.blocks.len() {
            return Err(DocumentStoreError::MoveSourceOutOfRange {
                from,
                len: self.blocks.len(),
            });
        }
        if from == to {
            return Ok(());
        }

        let block = self.blocks.remove(from);
        let target = to.min(self.blocks.len());
        self.blocks.insert(target, block);
        self.commit();
        Ok(())
    }

    /// Atomically replaces the whole collection.
    ///
    /// Used to accept pre-computed permutations and externally validated
    /// imports. Contents are trusted, but id uniqueness is asserted in
    /// debug builds.
    pub fn set_blocks(&mut self, blocks: Vec<Block>) {
        debug_assert!(
            ids_are_distinct(&blocks),
            "set_blocks requires pairwise distinct block ids"
        );
        self.blocks = blocks;
        self.commit();
    }

    /// Registers a listener called synchronously after every applied
    /// mutation with the fully-updated collection.
    pub fn subscribe(&mut self, listener: impl Fn(&[Block]) + 'static) -> SubscriberId {
        let id = self.next_subscriber;
        self.next_subscriber += 1;
        self.subscribers.push((id, Box::new(listener)));
        id
    }

    /// Stops delivery to a previously registered listener.
    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.subscribers.retain(|(subscriber, _)| *subscriber != id);
    }

    // Runs once per applied mutation: persist the full state best-effort,
    // then notify. Mutations that left the collection unchanged return
    // before reaching this point.
    fn commit(&mut self) {
        if let Err(err) = self.repo.save(&self.blocks) {
            error!(
                "event=doc_save module=store status=error blocks={} error={err}",
                self.blocks.len()
            );
        }

        for (_, listener) in &self.subscribers {
            listener(&self.blocks);
        }
    }
}
