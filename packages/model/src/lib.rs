//! # Blockpress Model
//!
//! Block tree document model: typed blocks, their identities, the nested
//! containers that hold them, and locators addressing positions in the tree.
//!
//! ```text
//! Document
//!   └─ BlockTree (root list, never empty)
//!        ├─ paragraph
//!        ├─ group ──── children: [..]
//!        └─ columns ── columns: [{ width, blocks: [..] }, ..]
//! ```
//!
//! Trees are values. Nodes are shared through `Arc`, and mutation goes
//! through copy-on-write paths, so any clone of a tree is an independent
//! snapshot.

pub mod block;
pub mod document;
pub mod error;
pub mod id;
pub mod locator;
pub mod tree;
pub mod width;

pub use block::{create, Block, BlockKind, Column, Content, CreateOptions, Media, UnknownBlockKind};
pub use document::{Document, Status};
pub use error::TreeError;
pub use id::{BlockId, IdGenerator};
pub use locator::{ContainerPath, Locator, Step};
pub use tree::BlockTree;
