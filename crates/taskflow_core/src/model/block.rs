//! Block domain model.
//!
//! # Responsibility
//! - Define the atomic unit of document content and its closed type set.
//! - Provide patch semantics for in-place field updates.
//!
//! # Invariants
//! - `id` is stable, never reused, and never derived from position.
//! - A block's type is fixed at creation; only `content` and `checked`
//!   are mutable, and a patch cannot express an id or type change.
//! - `checked` is meaningful only for to-do blocks; an absent value in
//!   persisted payloads reads as `false`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a block within a document.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type BlockId = Uuid;

/// Per-type payload of a block.
///
/// One variant per block type, each carrying only the fields that are
/// meaningful for it. Serialized with a `type` tag so the persisted layout
/// stays `{ "id", "type", "content", "checked"? }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockKind {
    /// Section heading.
    Heading { content: String },
    /// Free-form text.
    Paragraph { content: String },
    /// Actionable item with a completion flag.
    Todo {
        content: String,
        #[serde(default)]
        checked: bool,
    },
}

impl BlockKind {
    /// Stable lowercase tag used in persisted payloads and log events.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Heading { .. } => "heading",
            Self::Paragraph { .. } => "paragraph",
            Self::Todo { .. } => "todo",
        }
    }

    /// Human-authored text payload.
    pub fn content(&self) -> &str {
        match self {
            Self::Heading { content } | Self::Paragraph { content } | Self::Todo { content, .. } => {
                content
            }
        }
    }

    fn content_mut(&mut self) -> &mut String {
        match self {
            Self::Heading { content } | Self::Paragraph { content } | Self::Todo { content, .. } => {
                content
            }
        }
    }
}

/// One atomic unit of document content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    /// Stable global ID used for keying, reordering and lookups.
    pub id: BlockId,
    /// Type tag plus type-specific fields.
    #[serde(flatten)]
    pub kind: BlockKind,
}

// Deserialization goes through `from_parts` so persisted payloads cannot
// smuggle in a nil id.
impl<'de> Deserialize<'de> for Block {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawBlock {
            id: BlockId,
            #[serde(flatten)]
            kind: BlockKind,
        }

        let raw = RawBlock::deserialize(deserializer)?;
        Block::from_parts(raw.id, raw.kind).map_err(serde::de::Error::custom)
    }
}

impl Block {
    /// Creates a heading block with a generated stable id.
    pub fn heading(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: BlockKind::Heading {
                content: content.into(),
            },
        }
    }

    /// Creates a paragraph block with a generated stable id.
    pub fn paragraph(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: BlockKind::Paragraph {
                content: content.into(),
            },
        }
    }

    /// Creates an unchecked to-do block with a generated stable id.
    pub fn todo(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: BlockKind::Todo {
                content: content.into(),
                checked: false,
            },
        }
    }

    /// Creates a block from a caller-provided stable id.
    ///
    /// Used by persistence and import paths where identity already exists
    /// externally.
    ///
    /// # Errors
    /// - Rejects the nil UUID; every block must carry a real identity.
    pub fn from_parts(id: BlockId, kind: BlockKind) -> Result<Self, BlockValidationError> {
        if id.is_nil() {
            return Err(BlockValidationError::NilId);
        }
        Ok(Self { id, kind })
    }

    /// Stable lowercase type tag.
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    /// Human-authored text payload.
    pub fn content(&self) -> &str {
        self.kind.content()
    }

    /// Completion state. `false` for every non-todo block.
    pub fn is_checked(&self) -> bool {
        matches!(self.kind, BlockKind::Todo { checked: true, .. })
    }

    /// Merges a partial patch into this block.
    ///
    /// # Contract
    /// - `content` applies to every block type.
    /// - `checked` applies only to to-do blocks and is ignored otherwise.
    /// - Applying the same patch twice yields the same state as once.
    pub fn apply_patch(&mut self, patch: &BlockPatch) {
        if let Some(content) = &patch.content {
            self.kind.content_mut().clone_from(content);
        }
        if let Some(value) = patch.checked {
            if let BlockKind::Todo { checked, .. } = &mut self.kind {
                *checked = value;
            }
        }
    }
}

/// Partial update payload for a block.
///
/// Identity and type are not representable here, which is what keeps them
/// immutable at the mutation boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockPatch {
    /// Replacement text, when present.
    pub content: Option<String>,
    /// Replacement completion flag, when present. Only to-do blocks react.
    pub checked: Option<bool>,
}

impl BlockPatch {
    /// Patch that replaces only the text payload.
    pub fn content(text: impl Into<String>) -> Self {
        Self {
            content: Some(text.into()),
            checked: None,
        }
    }

    /// Patch that replaces only the completion flag.
    pub fn checked(value: bool) -> Self {
        Self {
            content: None,
            checked: Some(value),
        }
    }
}

/// Construction-time validation failures for blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockValidationError {
    /// The nil UUID cannot identify a block.
    NilId,
}

impl Display for BlockValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "block id must not be the nil uuid"),
        }
    }
}

impl Error for BlockValidationError {}

/// Returns whether every block id in `blocks` is pairwise distinct.
pub fn ids_are_distinct(blocks: &[Block]) -> bool {
    let mut seen = HashSet::with_capacity(blocks.len());
    blocks.iter().all(|block| seen.insert(block.id))
}
