//! # Block Mutations
//!
//! Serializable, intent-level operations on a block tree. A [`Mutation`] is
//! what edit scripts, renderers and the drop resolver hand to the session;
//! each one maps onto a single structural edit.
//!
//! ## Mutation Semantics
//!
//! ### InsertBlock
//! - Creates a fresh block of `kind` (fresh id) and inserts it at `at`
//! - Content that does not fit the kind is ignored
//!
//! ### DeleteBlock
//! - Removes `id` from `container` only
//! - Fails if that leaves the root list empty
//!
//! ### UpdateBlock
//! - Patches content or width; id and type never change
//!
//! ### TransferBlock
//! - Same block (and id) taken out of `from` and reinserted at `to`
//! - Fails if `to` lies inside the moved block

use crate::edits::{self, Direction, Patch};
use crate::errors::EditError;
use crate::resize;
use blockpress_model::{create, Block, BlockId, BlockKind, BlockTree, ContainerPath, Content, CreateOptions, Locator};
use serde::{Deserialize, Serialize};

/// Semantic mutations on a block tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    /// Create a new block of `kind` and insert it at `at`
    InsertBlock {
        at: Locator,
        kind: BlockKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<Content>,
        /// Column count for a columns block
        #[serde(default, skip_serializing_if = "Option::is_none")]
        columns: Option<usize>,
    },

    /// Insert an existing block value
    Insert { at: Locator, block: Block },

    DeleteBlock { container: ContainerPath, id: BlockId },

    UpdateBlock { id: BlockId, patch: Patch },

    /// Swap with the neighbour above or below
    MoveBlock { at: Locator, direction: Direction },

    TransferBlock { from: Locator, to: Locator },

    /// Shift the handle right of column `left` by `delta_percent`
    ResizeColumns {
        block: Locator,
        left: usize,
        delta_percent: f64,
    },
}

impl Mutation {
    /// Apply to `tree`, returning the new tree
    pub fn apply(&self, tree: &BlockTree) -> Result<BlockTree, EditError> {
        match self {
            Mutation::InsertBlock { at, kind, content, columns } => {
                let options = columns.map(CreateOptions::columns).unwrap_or_default();
                edits::try_insert(tree, at, create(*kind, content.clone(), options))
            }

            Mutation::Insert { at, block } => edits::try_insert(tree, at, block.clone()),

            Mutation::DeleteBlock { container, id } => edits::try_delete(tree, container, id),

            Mutation::UpdateBlock { id, patch } => edits::try_update(tree, id, patch.clone()),

            Mutation::MoveBlock { at, direction } => edits::try_move_block(tree, at, *direction),

            Mutation::TransferBlock { from, to } => edits::try_transfer(tree, from, to),

            Mutation::ResizeColumns { block, left, delta_percent } => {
                resize::try_resize_columns(tree, block, *left, *delta_percent)
            }
        }
    }

    /// Short operation name, as used in logs and reports
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::InsertBlock { .. } => "insert_block",
            Mutation::Insert { .. } => "insert",
            Mutation::DeleteBlock { .. } => "delete_block",
            Mutation::UpdateBlock { .. } => "update_block",
            Mutation::MoveBlock { .. } => "move_block",
            Mutation::TransferBlock { .. } => "transfer_block",
            Mutation::ResizeColumns { .. } => "resize_columns",
        }
    }

    /// Whether the mutation changes which blocks exist or where they sit
    pub fn is_structural(&self) -> bool {
        !matches!(
            self,
            Mutation::UpdateBlock { .. } | Mutation::ResizeColumns { .. }
        )
    }

    /// Block whose content this mutation edits, for history coalescing
    pub fn content_target(&self) -> Option<&BlockId> {
        match self {
            Mutation::UpdateBlock {
                id,
                patch: Patch::Content(_),
            } => Some(id),
            _ => None,
        }
    }
}
