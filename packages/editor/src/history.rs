//! # Undo/Redo History
//!
//! Linear history over whole-tree snapshots.
//!
//! ## Design
//!
//! - The starting tree is the first entry; `cursor = 0` is the undo floor
//! - `record` drops everything after the cursor, appends, and moves the
//!   cursor to the new tip
//! - Undo/redo only move the cursor; entries are never rebuilt
//! - Snapshots share structure, so an entry costs roughly the nodes that
//!   changed since the previous one
//!
//! Content edits can optionally be coalesced: consecutive edits of the same
//! block within `coalesce_window` replace the tip instead of appending.
//! Structural edits always get their own entry.
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut history = History::new(tree.clone());
//! history.record(edits::insert(&tree, &Locator::root(0), Block::new(BlockKind::Heading)));
//!
//! let previous = history.undo().cloned();
//! let again = history.redo().cloned();
//! ```

use blockpress_model::{BlockId, BlockTree};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct ContentEdit {
    block: BlockId,
    at: Instant,
}

#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<BlockTree>,
    cursor: usize,

    /// Maximum number of entries kept (0 = unlimited)
    limit: usize,

    coalesce_window: Option<Duration>,

    /// Last content edit recorded at the tip, for coalescing
    last_edit: Option<ContentEdit>,
}

impl History {
    /// Start a history with `initial` as its floor
    pub fn new(initial: BlockTree) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
            limit: 0,
            coalesce_window: None,
            last_edit: None,
        }
    }

    /// Cap the number of entries kept; 0 means unlimited
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self.enforce_limit();
        self
    }

    /// Merge same-block content edits closer together than `window`
    pub fn with_coalesce_window(mut self, window: Duration) -> Self {
        self.coalesce_window = (!window.is_zero()).then_some(window);
        self
    }

    /// Record a snapshot after an accepted mutation
    pub fn record(&mut self, tree: BlockTree) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(tree);
        self.cursor = self.entries.len() - 1;
        self.last_edit = None;
        self.enforce_limit();
    }

    /// Record a snapshot after a content edit of `block`
    pub fn record_content_edit(&mut self, tree: BlockTree, block: &BlockId, now: Instant) {
        if self.coalesces(block, now) {
            self.entries[self.cursor] = tree;
        } else {
            self.record(tree);
        }

        self.last_edit = Some(ContentEdit {
            block: block.clone(),
            at: now,
        });
    }

    fn coalesces(&self, block: &BlockId, now: Instant) -> bool {
        let (Some(window), Some(last)) = (self.coalesce_window, &self.last_edit) else {
            return false;
        };

        // Never fold into the floor entry or onto a branch point
        self.cursor > 0
            && self.cursor == self.entries.len() - 1
            && &last.block == block
            && now.saturating_duration_since(last.at) <= window
    }

    fn enforce_limit(&mut self) {
        if self.limit == 0 || self.entries.len() <= self.limit {
            return;
        }

        let excess = self.entries.len() - self.limit;
        self.entries.drain(..excess);
        self.cursor = self.cursor.saturating_sub(excess);
    }

    pub fn undo(&mut self) -> Option<&BlockTree> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.last_edit = None;
        self.entries.get(self.cursor)
    }

    pub fn redo(&mut self) -> Option<&BlockTree> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.last_edit = None;
        self.entries.get(self.cursor)
    }

    /// Snapshot at the cursor
    pub fn current(&self) -> &BlockTree {
        &self.entries[self.cursor]
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn undo_levels(&self) -> usize {
        self.cursor
    }

    pub fn redo_levels(&self) -> usize {
        self.entries.len() - 1 - self.cursor
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget all history, keeping the current snapshot as the new floor
    pub fn clear(&mut self) {
        let current = self.entries.swap_remove(self.cursor);
        self.entries = vec![current];
        self.cursor = 0;
        self.last_edit = None;
    }
}
