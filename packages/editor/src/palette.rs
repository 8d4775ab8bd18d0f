//! # Command Palette
//!
//! Caret-anchored block-type picker: `closed → open → closed`.
//!
//! Typing [`TRIGGER`] into an empty text block opens the palette at the
//! caret. While open, printable keys edit a query that filters [`OPTIONS`]
//! by label, arrow keys move focus (wrapping), Enter commits the focused
//! option and Escape commits no selection. Either commit closes the palette
//! and yields a [`PaletteCommit`], which [`apply_commit`] turns into a tree
//! edit:
//!
//! - a chosen type is inserted at the trigger block's locator, and the
//!   trigger block is removed if it is still empty, so the empty block
//!   becomes the chosen type
//! - no selection removes the trigger block if it is still empty

use crate::edits::{self, settle};
use crate::errors::EditError;
use blockpress_model::{Block, BlockId, BlockKind, BlockTree, Locator};
use serde::{Deserialize, Serialize};
use tracing::trace;

pub const TRIGGER: char = '/';

/// Block types offered by the palette, in display order
pub const OPTIONS: [BlockKind; 8] = [
    BlockKind::Paragraph,
    BlockKind::RichText,
    BlockKind::Heading,
    BlockKind::Quote,
    BlockKind::Image,
    BlockKind::Video,
    BlockKind::Code,
    BlockKind::Divider,
];

/// Screen position of the caret when the palette opened
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CaretAnchor {
    pub x: f64,
    pub y: f64,
}

impl CaretAnchor {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Key presses a text block reports to the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Char(char),
    Backspace,
    ArrowUp,
    ArrowDown,
    Enter,
    Escape,
}

/// Result of closing the palette
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteCommit {
    /// Where the trigger block sat when the palette opened
    pub locator: Locator,
    pub trigger: BlockId,
    /// `None` for Escape, or Enter with nothing matching
    pub choice: Option<BlockKind>,
}

#[derive(Debug, Clone, PartialEq)]
struct OpenPalette {
    anchor: CaretAnchor,
    locator: Locator,
    trigger: BlockId,
    query: String,
    focus: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandPalette {
    open: Option<OpenPalette>,
}

impl CommandPalette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether typing `key` into the block at `locator` opens the palette
    pub fn should_open(tree: &BlockTree, locator: &Locator, key: char) -> bool {
        key == TRIGGER
            && tree
                .block_at(locator)
                .map_or(false, |block| block.kind.is_text() && block.content.is_empty_text())
    }

    /// Open for the block at `locator`. Returns false if there is no block there.
    pub fn open(&mut self, tree: &BlockTree, locator: &Locator, anchor: CaretAnchor) -> bool {
        let Some(block) = tree.block_at(locator) else {
            return false;
        };

        trace!(block = %block.id, at = %locator, "Palette opened");
        self.open = Some(OpenPalette {
            anchor,
            locator: locator.clone(),
            trigger: block.id.clone(),
            query: String::new(),
            focus: 0,
        });
        true
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Close without committing anything
    pub fn close(&mut self) {
        self.open = None;
    }

    pub fn anchor(&self) -> Option<CaretAnchor> {
        self.open.as_ref().map(|open| open.anchor)
    }

    pub fn query(&self) -> Option<&str> {
        self.open.as_ref().map(|open| open.query.as_str())
    }

    pub fn focus(&self) -> Option<usize> {
        self.open.as_ref().map(|open| open.focus)
    }

    /// Options whose label contains the query, ignoring case
    pub fn filtered(&self) -> Vec<BlockKind> {
        match &self.open {
            Some(open) => filter_options(&open.query),
            None => Vec::new(),
        }
    }

    pub fn focused(&self) -> Option<BlockKind> {
        let open = self.open.as_ref()?;
        filter_options(&open.query).get(open.focus).copied()
    }

    /// Feed a key press. Returns the commit when Enter or Escape closes the
    /// palette; other keys only update state.
    pub fn handle_key(&mut self, key: Key) -> Option<PaletteCommit> {
        let open = self.open.as_mut()?;

        match key {
            Key::Char(c) => {
                open.query.push(c);
                open.focus = 0;
            }
            Key::Backspace => {
                open.query.pop();
                open.focus = 0;
            }
            Key::ArrowUp | Key::ArrowDown => {
                let count = filter_options(&open.query).len();
                if count > 0 {
                    open.focus = if key == Key::ArrowUp {
                        (open.focus + count - 1) % count
                    } else {
                        (open.focus + 1) % count
                    };
                }
            }
            Key::Enter => {
                let choice = self.focused();
                return self.commit(choice);
            }
            Key::Escape => return self.commit(None),
        }

        None
    }

    fn commit(&mut self, choice: Option<BlockKind>) -> Option<PaletteCommit> {
        let open = self.open.take()?;
        trace!(?choice, trigger = %open.trigger, "Palette closed");
        Some(PaletteCommit {
            locator: open.locator,
            trigger: open.trigger,
            choice,
        })
    }
}

fn filter_options(query: &str) -> Vec<BlockKind> {
    let needle = query.to_lowercase();
    OPTIONS
        .iter()
        .copied()
        .filter(|kind| kind.label().to_lowercase().contains(&needle))
        .collect()
}

/// Turn a palette commit into the resulting tree
pub fn apply_commit(tree: &BlockTree, commit: &PaletteCommit) -> BlockTree {
    settle(tree, "palette", try_apply_commit(tree, commit))
}

pub fn try_apply_commit(tree: &BlockTree, commit: &PaletteCommit) -> Result<BlockTree, EditError> {
    // Other edits may have shifted the trigger since the palette opened
    let at = tree.locate(&commit.trigger).unwrap_or_else(|| commit.locator.clone());
    let next = match commit.choice {
        Some(kind) => edits::try_insert(tree, &at, Block::new(kind))?,
        None => tree.clone(),
    };

    if !is_empty_text(&next, &commit.trigger) {
        return Ok(next);
    }

    match next.locate(&commit.trigger) {
        Some(at) => edits::try_delete(&next, &at.path, &commit.trigger),
        None => Ok(next),
    }
}

fn is_empty_text(tree: &BlockTree, id: &BlockId) -> bool {
    tree.find(id).map_or(false, |block| block.content.is_empty_text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockpress_model::{ContainerPath, Content};

    fn open_on_empty_paragraph() -> (BlockTree, CommandPalette) {
        let tree = BlockTree::new(vec![Block::paragraph("intro"), Block::paragraph("")]);
        let mut palette = CommandPalette::new();
        assert!(CommandPalette::should_open(&tree, &Locator::root(1), '/'));
        assert!(palette.open(&tree, &Locator::root(1), CaretAnchor::new(12.0, 40.0)));
        (tree, palette)
    }

    #[test]
    fn test_should_open_only_on_empty_text() {
        let tree = BlockTree::new(vec![Block::paragraph("typed"), Block::new(BlockKind::Image)]);
        assert!(!CommandPalette::should_open(&tree, &Locator::root(0), '/'));
        assert!(!CommandPalette::should_open(&tree, &Locator::root(1), '/'));
        assert!(!CommandPalette::should_open(&tree, &Locator::root(9), '/'));
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let (_, mut palette) = open_on_empty_paragraph();
        assert_eq!(palette.filtered().len(), OPTIONS.len());

        for c in "TEX".chars() {
            palette.handle_key(Key::Char(c));
        }
        assert_eq!(palette.filtered(), vec![BlockKind::RichText]);
        assert_eq!(palette.query(), Some("TEX"));
    }

    #[test]
    fn test_focus_wraps() {
        let (_, mut palette) = open_on_empty_paragraph();
        palette.handle_key(Key::ArrowUp);
        assert_eq!(palette.focused(), Some(BlockKind::Divider));
        palette.handle_key(Key::ArrowDown);
        assert_eq!(palette.focused(), Some(BlockKind::Paragraph));

        // Editing the query resets focus
        palette.handle_key(Key::ArrowDown);
        palette.handle_key(Key::Char('e'));
        assert_eq!(palette.focus(), Some(0));
    }

    #[test]
    fn test_enter_commits_focused_type() {
        let (tree, mut palette) = open_on_empty_paragraph();
        let trigger = tree.blocks()[1].id.clone();
        for c in "quo".chars() {
            assert!(palette.handle_key(Key::Char(c)).is_none());
        }

        let commit = palette.handle_key(Key::Enter).unwrap();
        assert!(!palette.is_open());
        assert_eq!(commit.choice, Some(BlockKind::Quote));

        let next = apply_commit(&tree, &commit);
        assert_eq!(next.len(), 2);
        assert_eq!(next.blocks()[1].kind, BlockKind::Quote);
        assert!(next.blocks()[1].content.is_empty_text());
        assert!(!next.contains(&trigger));
    }

    #[test]
    fn test_enter_with_no_match_is_no_selection() {
        let (_, mut palette) = open_on_empty_paragraph();
        for c in "zzz".chars() {
            palette.handle_key(Key::Char(c));
        }
        palette.handle_key(Key::ArrowDown);
        assert_eq!(palette.handle_key(Key::Enter).unwrap().choice, None);
    }

    #[test]
    fn test_escape_removes_empty_trigger() {
        let (tree, mut palette) = open_on_empty_paragraph();
        let commit = palette.handle_key(Key::Escape).unwrap();
        let next = apply_commit(&tree, &commit);
        assert_eq!(next.len(), 1);
        assert_eq!(next.blocks()[0].content, Content::Text("intro".into()));
    }

    #[test]
    fn test_typed_trigger_block_is_kept() {
        let tree = BlockTree::new(vec![Block::paragraph("")]);
        let mut palette = CommandPalette::new();
        palette.open(&tree, &Locator::root(0), CaretAnchor::default());
        let commit = palette.handle_key(Key::Escape).unwrap();

        // Something was typed into the trigger block meanwhile
        let id = tree.blocks()[0].id.clone();
        let typed = edits::update(&tree, &id, edits::Patch::Content(Content::Text("hi".into())));
        assert_eq!(apply_commit(&typed, &commit), typed);
    }

    #[test]
    fn test_escape_on_only_block_keeps_root() {
        let tree = BlockTree::new(vec![Block::paragraph("")]);
        let mut palette = CommandPalette::new();
        palette.open(&tree, &Locator::root(0), CaretAnchor::default());
        let commit = palette.handle_key(Key::Escape).unwrap();
        assert_eq!(try_apply_commit(&tree, &commit), Err(EditError::RootWouldBeEmpty));
    }

    #[test]
    fn test_commit_follows_shifted_trigger() {
        let (tree, mut palette) = open_on_empty_paragraph();
        for c in "quo".chars() {
            palette.handle_key(Key::Char(c));
        }
        let commit = palette.handle_key(Key::Enter).unwrap();

        // A heading arrives above everything while the palette is open
        let shifted = edits::insert(&tree, &Locator::root(0), Block::new(BlockKind::Heading));
        let next = apply_commit(&shifted, &commit);
        let kinds: Vec<_> = next.blocks().iter().map(|b| b.kind).collect();
        assert_eq!(kinds, vec![BlockKind::Heading, BlockKind::Paragraph, BlockKind::Quote]);
        assert_eq!(next.blocks()[1].content, Content::Text("intro".into()));
    }

    #[test]
    fn test_commit_after_trigger_removed_uses_opening_position() {
        let (tree, mut palette) = open_on_empty_paragraph();
        palette.handle_key(Key::Char('d'));
        palette.handle_key(Key::Char('i'));
        let commit = palette.handle_key(Key::Enter).unwrap();

        let trigger = tree.blocks()[1].id.clone();
        let removed = edits::delete(&tree, &ContainerPath::root(), &trigger);
        let next = apply_commit(&removed, &commit);
        let kinds: Vec<_> = next.blocks().iter().map(|b| b.kind).collect();
        assert_eq!(kinds, vec![BlockKind::Paragraph, BlockKind::Divider]);
    }

    #[test]
    fn test_commit_in_nested_list() {
        let tree = BlockTree::new(vec![Block::container(BlockKind::Group, vec![Block::paragraph("")])]);
        let at = ContainerPath::root().children(0).at(0);
        let mut palette = CommandPalette::new();
        palette.open(&tree, &at, CaretAnchor::default());
        palette.handle_key(Key::Char('c'));
        palette.handle_key(Key::Char('o'));

        let commit = palette.handle_key(Key::Enter).unwrap();
        let next = apply_commit(&tree, &commit);
        let children = next.blocks()[0].children().unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].kind, BlockKind::Code);
    }

    #[test]
    fn test_keys_ignored_when_closed() {
        let mut palette = CommandPalette::new();
        assert!(palette.handle_key(Key::Enter).is_none());
        assert!(palette.filtered().is_empty());
    }
}
