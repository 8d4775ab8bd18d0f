//! # Structural Edits
//!
//! Pure operations on a [`BlockTree`]: each takes the tree by reference and
//! returns a new tree, copying only the nodes on the path to the edit.
//!
//! Every operation comes in two forms:
//! - `try_*` returns `Err(EditError)` when the edit is invalid
//! - the plain form never fails: a rejected edit is logged at debug level
//!   and the input tree comes back unchanged
//!
//! ## Edit Semantics
//!
//! ### Insert
//! - Siblings at or after the index shift right; an index past the end appends
//! - Rejected if the incoming block reuses an id already in the tree
//!
//! ### Delete
//! - Looks only in the given container, not the whole tree
//! - The root list keeps at least one block
//!
//! ### Transfer
//! - Same block value (and id) is removed and reinserted
//! - Destination is given in pre-removal coordinates

use crate::errors::EditError;
use blockpress_model::{Block, BlockId, BlockTree, Content, ContainerPath, Locator, TreeError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Direction of a sibling swap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn offset(self) -> isize {
        match self {
            Direction::Up => -1,
            Direction::Down => 1,
        }
    }

    pub fn from_offset(offset: isize) -> Option<Self> {
        match offset {
            -1 => Some(Direction::Up),
            1 => Some(Direction::Down),
            _ => None,
        }
    }

    pub fn reverse(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

/// Change to a block's mutable fields. Id and type never change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum Patch {
    Content(Content),
    Width(Option<String>),
    /// Take content and width from another block value
    Replace(Block),
}

/// Insert `block` at `at`
pub fn insert(tree: &BlockTree, at: &Locator, block: Block) -> BlockTree {
    settle(tree, "insert", try_insert(tree, at, block))
}

pub fn try_insert(tree: &BlockTree, at: &Locator, block: Block) -> Result<BlockTree, EditError> {
    if let Some(malformed) = block.first_malformed() {
        return Err(EditError::ContentMismatch(malformed.kind));
    }

    let existing: HashSet<BlockId> = tree.ids().into_iter().collect();
    let mut incoming = Vec::new();
    block.collect_ids(&mut incoming);

    let mut seen = HashSet::new();
    if let Some(duplicate) = incoming
        .into_iter()
        .find(|id| existing.contains(id) || !seen.insert(id.clone()))
    {
        return Err(EditError::DuplicateId(duplicate));
    }

    insert_shared(tree, at, Arc::new(block))
}

fn insert_shared(tree: &BlockTree, at: &Locator, block: Arc<Block>) -> Result<BlockTree, EditError> {
    let mut next = tree.clone();
    let list = next.container_mut(&at.path)?;
    let index = at.index.min(list.len());
    list.insert(index, block);
    Ok(next)
}

/// Remove the block `id` from the direct container `container`
pub fn delete(tree: &BlockTree, container: &ContainerPath, id: &BlockId) -> BlockTree {
    settle(tree, "delete", try_delete(tree, container, id))
}

pub fn try_delete(tree: &BlockTree, container: &ContainerPath, id: &BlockId) -> Result<BlockTree, EditError> {
    let list = tree.container(container)?;
    let position = list
        .iter()
        .position(|block| &block.id == id)
        .ok_or_else(|| EditError::BlockNotFound(id.clone()))?;

    if container.is_root() && list.len() <= 1 {
        return Err(EditError::RootWouldBeEmpty);
    }

    let mut next = tree.clone();
    next.container_mut(container)?.remove(position);
    Ok(next)
}

/// Patch the block `id`, wherever it sits
pub fn update(tree: &BlockTree, id: &BlockId, patch: Patch) -> BlockTree {
    settle(tree, "update", try_update(tree, id, patch))
}

pub fn try_update(tree: &BlockTree, id: &BlockId, patch: Patch) -> Result<BlockTree, EditError> {
    let locator = tree
        .locate(id)
        .ok_or_else(|| EditError::BlockNotFound(id.clone()))?;

    let nests = match &patch {
        Patch::Content(content) => holds_blocks(content),
        Patch::Replace(block) => holds_blocks(&block.content),
        Patch::Width(_) => false,
    };

    let mut next = tree.clone();
    let block = next.block_at_mut(&locator)?;
    match patch {
        Patch::Content(content) => set_content(block, content)?,
        Patch::Width(width) => block.width = width,
        Patch::Replace(replacement) => {
            set_content(block, replacement.content)?;
            block.width = replacement.width;
        }
    }

    if nests {
        if let Some(duplicate) = next.first_duplicate_id() {
            return Err(EditError::DuplicateId(duplicate));
        }
    }

    Ok(next)
}

fn holds_blocks(content: &Content) -> bool {
    matches!(content, Content::Blocks(_) | Content::Columns(_))
}

fn set_content(block: &mut Block, content: Content) -> Result<(), EditError> {
    if let (Some(expected), Some(actual)) = (block.content.column_count(), content.column_count()) {
        if expected != actual {
            return Err(EditError::ColumnCountChanged {
                id: block.id.clone(),
                expected,
                actual,
            });
        }
    }

    if !content.fits(block.kind) {
        return Err(EditError::ContentMismatch(block.kind));
    }
    if let Some(malformed) = content.first_malformed() {
        return Err(EditError::ContentMismatch(malformed.kind));
    }

    block.content = content;
    Ok(())
}

/// Swap the block at `at` with its neighbour in `direction`
pub fn move_block(tree: &BlockTree, at: &Locator, direction: Direction) -> BlockTree {
    settle(tree, "move", try_move_block(tree, at, direction))
}

pub fn try_move_block(tree: &BlockTree, at: &Locator, direction: Direction) -> Result<BlockTree, EditError> {
    let len = tree.container(&at.path)?.len();
    if at.index >= len {
        return Err(TreeError::IndexOutOfRange { index: at.index, len }.into());
    }

    let target = at.index as isize + direction.offset();
    if target < 0 || target as usize >= len {
        return Err(EditError::MoveOutOfRange { index: target });
    }

    let mut next = tree.clone();
    next.container_mut(&at.path)?.swap(at.index, target as usize);
    Ok(next)
}

/// Move the block at `from` to `to`, keeping its identity
pub fn transfer(tree: &BlockTree, from: &Locator, to: &Locator) -> BlockTree {
    settle(tree, "transfer", try_transfer(tree, from, to))
}

pub fn try_transfer(tree: &BlockTree, from: &Locator, to: &Locator) -> Result<BlockTree, EditError> {
    let source = tree.container(&from.path)?;
    let moved = source
        .get(from.index)
        .cloned()
        .ok_or(TreeError::IndexOutOfRange {
            index: from.index,
            len: source.len(),
        })?;

    if passes_through(from, &to.path) {
        return Err(EditError::CycleDetected);
    }

    let dest = adjusted_destination(from, to);

    let mut next = tree.clone();
    next.container_mut(&from.path)?.remove(from.index);

    let list = next.container_mut(&dest.path)?;
    let index = dest.index.min(list.len());
    list.insert(index, moved);
    Ok(next)
}

/// True when `path` descends into the block at `locator`
pub(crate) fn passes_through(locator: &Locator, path: &ContainerPath) -> bool {
    let depth = locator.path.depth();
    path.depth() > depth
        && locator.path.is_prefix_of(path)
        && path.steps()[depth].block_index() == locator.index
}

/// Translate `to` (pre-removal coordinates) to where it points once the
/// block at `from` has been taken out
pub fn adjusted_destination(from: &Locator, to: &Locator) -> Locator {
    let mut dest = to.clone();
    let depth = from.path.depth();

    if dest.path == from.path {
        if dest.index > from.index {
            dest.index -= 1;
        }
    } else if from.path.is_prefix_of(&dest.path) {
        let step = &mut dest.path.steps_mut()[depth];
        if step.block_index() > from.index {
            *step = step.with_block_index(step.block_index() - 1);
        }
    }

    dest
}

pub(crate) fn settle(tree: &BlockTree, op: &'static str, result: Result<BlockTree, EditError>) -> BlockTree {
    result.unwrap_or_else(|err| {
        debug!(op, error = %err, "Edit rejected; tree unchanged");
        tree.clone()
    })
}
