//! Error types for tree addressing

use crate::id::BlockId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    #[error("Index {index} out of range for a list of {len} blocks")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Block {0} has no child list")]
    NotAContainer(BlockId),

    #[error("Block {id} has no column {column}")]
    NoSuchColumn { id: BlockId, column: usize },
}
