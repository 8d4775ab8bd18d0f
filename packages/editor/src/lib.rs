//! # Blockpress Editor
//!
//! Structural editing engine for block documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: blocks, locators, BlockTree          │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: edits + history + gestures          │
//! │  - Pure structural edits on trees           │
//! │  - Linear undo/redo over snapshots          │
//! │  - Drag/drop, command palette, resizing     │
//! │  - Save payload for persistence             │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ renderers / persistence (external)          │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Trees are values**: every edit returns a new tree; snapshots never change
//! 2. **Rejected edits are no-ops**: invalid input leaves the tree as it was
//! 3. **Gestures are explicit**: drags and resizes are owned session values
//!
//! ## Usage
//!
//! ```rust,ignore
//! use blockpress_editor::{EditSession, Mutation};
//! use blockpress_model::{BlockKind, Document, Locator};
//!
//! let mut session = EditSession::new(Document::new("Hello", "hello"));
//!
//! session.apply(Mutation::InsertBlock {
//!     at: Locator::root(0),
//!     kind: BlockKind::Heading,
//!     content: None,
//!     columns: None,
//! });
//! session.undo();
//!
//! let payload = session.finalize();
//! ```

pub mod drop_target;
pub mod edits;
mod errors;
pub mod history;
mod mutations;
pub mod palette;
pub mod resize;
pub mod sanitize;
pub mod save;
mod session;

pub use drop_target::{drop_zones, DragPayload, DragSession, DragTransfer};
pub use edits::{Direction, Patch};
pub use errors::EditError;
pub use history::History;
pub use mutations::Mutation;
pub use palette::{CaretAnchor, CommandPalette, Key, PaletteCommit};
pub use resize::ResizeGesture;
pub use sanitize::{PassThrough, Sanitizer};
pub use save::{finalize, SavePayload, SaveSink, SavedBlock, SavedColumn, SavedContent};
pub use session::{BlockEvent, BlockEventKind, EditSession, EditorOptions, MutationResult};
