//! Error types for the editor

use blockpress_model::{BlockId, BlockKind, TreeError};
use thiserror::Error;

/// Why an edit was rejected.
///
/// Public edit operations never surface these: a rejected edit leaves the
/// tree unchanged. The `try_` variants return them so callers can report a
/// reason.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("Path error: {0}")]
    Tree(#[from] TreeError),

    #[error("Block not found: {0}")]
    BlockNotFound(BlockId),

    #[error("Block id already in use: {0}")]
    DuplicateId(BlockId),

    #[error("Document must keep at least one block")]
    RootWouldBeEmpty,

    #[error("Content does not fit a {0} block")]
    ContentMismatch(BlockKind),

    #[error("Block {id} has {expected} columns; got {actual}")]
    ColumnCountChanged {
        id: BlockId,
        expected: usize,
        actual: usize,
    },

    #[error("Would move a block into itself")]
    CycleDetected,

    #[error("No sibling at index {index} to swap with")]
    MoveOutOfRange { index: isize },

    #[error("Block {0} is not a columns block")]
    NotColumns(BlockId),

    #[error("Block {id} is not at its drag source")]
    StaleSource { id: BlockId },

    #[error("Nothing to drop onto")]
    NoDropTarget,

    #[error("Drag carries no usable payload")]
    InvalidPayload,
}
