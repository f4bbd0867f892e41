//! Reorder resolution for the two drag input channels.
//!
//! The editor receives move intents from two structurally different
//! sources: the sortable drag-and-drop integration reports explicit source
//! and target block identities, while the native drag events report only a
//! numeric position captured when the gesture started. Positions can shift
//! between gesture start and drop when other mutations interleave, so both
//! channels resolve against *current* block identity at drop time instead
//! of trusting captured positions.
//!
//! # Invariants
//! - Channels are mutually exclusive per gesture: each gesture is its own
//!   value and no cross-channel state exists beyond the store itself.
//! - A cancelled or abandoned gesture is a complete no-op.

use crate::model::block::BlockId;
use crate::repo::document_repo::DocumentRepository;
use crate::store::document_store::{DocumentStore, DocumentStoreError};

/// Result of resolving one drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// One block was relocated.
    Moved { from: usize, to: usize },
    /// The gesture resolved onto the block's current position.
    Unchanged,
    /// A referenced block vanished mid-gesture; the move was dropped.
    Cancelled,
}

/// Resolves a drop from the structured channel: `source` was dropped onto
/// `target`.
///
/// Both identities are looked up in the live collection. If either no
/// longer exists the gesture is treated as cancelled, not as an error.
/// Otherwise the full sequence is permuted by extracting the source
/// element and reinserting it at the target's position, and the permuted
/// sequence replaces the collection wholesale.
pub fn resolve_sortable_drop<R: DocumentRepository>(
    store: &mut DocumentStore<R>,
    source: BlockId,
    target: BlockId,
) -> DropOutcome {
    let Some(from) = store.position_of(source) else {
        return DropOutcome::Cancelled;
    };
    let Some(to) = store.position_of(target) else {
        return DropOutcome::Cancelled;
    };
    if from == to {
        return DropOutcome::Unchanged;
    }

    let mut reordered = store.blocks().to_vec();
    let moved = reordered.remove(from);
    reordered.insert(to, moved);
    store.set_blocks(reordered);

    DropOutcome::Moved { from, to }
}

/// In-flight gesture for the low-level positional channel.
///
/// The raw channel only carries the numeric position at gesture start, so
/// the drag captures the *identity* at that position instead and
/// re-resolves it when the drop arrives. A block added or removed mid-drag
/// therefore shifts positions without changing which block moves.
///
/// Dropping this value without calling [`PositionalDrag::complete`] is an
/// abandoned gesture and leaves the collection untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionalDrag {
    source: BlockId,
}

impl PositionalDrag {
    /// Starts a gesture from the block currently at `from`.
    ///
    /// Returns `None` when `from` is out of range; no gesture begins.
    pub fn begin<R: DocumentRepository>(store: &DocumentStore<R>, from: usize) -> Option<Self> {
        store.blocks().get(from).map(|block| Self { source: block.id })
    }

    /// Identity captured when the gesture started.
    pub fn source(&self) -> BlockId {
        self.source
    }

    /// Completes the gesture by dropping onto position `to`.
    ///
    /// The captured identity is re-resolved against the live collection;
    /// if it was removed mid-drag the gesture cancels. `to` is clamped
    /// into the current valid range before the move is issued, so a
    /// collection that shrank mid-drag can never be written out of bounds.
    pub fn complete<R: DocumentRepository>(
        self,
        store: &mut DocumentStore<R>,
        to: usize,
    ) -> Result<DropOutcome, DocumentStoreError> {
        let Some(from) = store.position_of(self.source) else {
            return Ok(DropOutcome::Cancelled);
        };

        // `from` resolved, so the collection holds at least one block.
        let target = to.min(store.len() - 1);
        if from == target {
            return Ok(DropOutcome::Unchanged);
        }

        store.move_block(from, target)?;
        Ok(DropOutcome::Moved { from, to: target })
    }
}
