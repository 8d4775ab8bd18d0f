//! # Blocks
//!
//! A block is the atom of a document. Its `kind` is fixed for life; its
//! `content` shape follows from the kind:
//!
//! | Kind                                          | Content            |
//! |-----------------------------------------------|--------------------|
//! | paragraph, heading, richtext, quote, code     | `Content::Text`    |
//! | image, video                                  | `Content::Media`   |
//! | divider                                       | `Content::Empty`   |
//! | group, column                                 | `Content::Blocks`  |
//! | columns                                       | `Content::Columns` |
//!
//! Child lists hold `Arc<Block>` so snapshots share untouched subtrees.

use crate::id::BlockId;
use crate::width::{preset_widths, MAX_COLUMNS, MIN_COLUMNS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Closed set of block types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Paragraph,
    Heading,
    RichText,
    Quote,
    Image,
    Video,
    Code,
    Divider,
    Group,
    Column,
    Columns,
}

impl BlockKind {
    pub const ALL: [BlockKind; 11] = [
        BlockKind::Paragraph,
        BlockKind::Heading,
        BlockKind::RichText,
        BlockKind::Quote,
        BlockKind::Image,
        BlockKind::Video,
        BlockKind::Code,
        BlockKind::Divider,
        BlockKind::Group,
        BlockKind::Column,
        BlockKind::Columns,
    ];

    /// Wire name, as used in save payloads and drag transfers
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Paragraph => "paragraph",
            BlockKind::Heading => "heading",
            BlockKind::RichText => "richtext",
            BlockKind::Quote => "quote",
            BlockKind::Image => "image",
            BlockKind::Video => "video",
            BlockKind::Code => "code",
            BlockKind::Divider => "divider",
            BlockKind::Group => "group",
            BlockKind::Column => "column",
            BlockKind::Columns => "columns",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            BlockKind::Paragraph => "Paragraph",
            BlockKind::Heading => "Heading",
            BlockKind::RichText => "Rich Text",
            BlockKind::Quote => "Quote",
            BlockKind::Image => "Image",
            BlockKind::Video => "Video",
            BlockKind::Code => "Code",
            BlockKind::Divider => "Divider",
            BlockKind::Group => "Group",
            BlockKind::Column => "Column",
            BlockKind::Columns => "Columns",
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(
            self,
            BlockKind::Paragraph
                | BlockKind::Heading
                | BlockKind::RichText
                | BlockKind::Quote
                | BlockKind::Code
        )
    }

    pub fn is_media(&self) -> bool {
        matches!(self, BlockKind::Image | BlockKind::Video)
    }

    /// Container types hold other blocks
    pub fn is_container(&self) -> bool {
        matches!(self, BlockKind::Group | BlockKind::Column | BlockKind::Columns)
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBlockKind(pub String);

impl fmt::Display for UnknownBlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown block type: {}", self.0)
    }
}

impl std::error::Error for UnknownBlockKind {}

impl FromStr for BlockKind {
    type Err = UnknownBlockKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownBlockKind(s.to_string()))
    }
}

/// Reference to uploaded media
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    pub url: String,
    #[serde(default)]
    pub alt: String,
}

/// One column of a columns block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub width: String,
    pub blocks: Vec<Arc<Block>>,
}

/// Block content, shaped by the block's kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    Text(String),
    Media(Media),
    Blocks(Vec<Arc<Block>>),
    Columns(Vec<Column>),
    #[default]
    Empty,
}

impl Content {
    /// Default content for a freshly created block of `kind`
    pub fn default_for(kind: BlockKind) -> Self {
        match kind {
            k if k.is_text() => Content::Text(String::new()),
            k if k.is_media() => Content::Media(Media::default()),
            BlockKind::Group | BlockKind::Column => Content::Blocks(Vec::new()),
            BlockKind::Columns => Content::Columns(Vec::new()),
            _ => Content::Empty,
        }
    }

    /// Whether this content shape is valid for `kind`
    pub fn fits(&self, kind: BlockKind) -> bool {
        match self {
            Content::Text(_) => kind.is_text(),
            Content::Media(_) => kind.is_media(),
            Content::Blocks(_) => matches!(kind, BlockKind::Group | BlockKind::Column),
            Content::Columns(columns) => {
                kind == BlockKind::Columns && (MIN_COLUMNS..=MAX_COLUMNS).contains(&columns.len())
            }
            Content::Empty => kind == BlockKind::Divider,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text(text) => Some(text),
            _ => None,
        }
    }

    /// True for a text block with nothing typed into it
    pub fn is_empty_text(&self) -> bool {
        matches!(self, Content::Text(text) if text.is_empty())
    }

    /// Blocks held directly by this content, column lists flattened in order
    pub fn nested(&self) -> Box<dyn Iterator<Item = &Arc<Block>> + '_> {
        match self {
            Content::Blocks(children) => Box::new(children.iter()),
            Content::Columns(columns) => Box::new(columns.iter().flat_map(|column| column.blocks.iter())),
            _ => Box::new(std::iter::empty()),
        }
    }

    /// First nested block (at any depth) whose content does not fit its kind
    pub fn first_malformed(&self) -> Option<&Block> {
        self.nested().find_map(|child| child.first_malformed())
    }

    pub fn column_count(&self) -> Option<usize> {
        match self {
            Content::Columns(columns) => Some(columns.len()),
            _ => None,
        }
    }
}

/// Options for [`create`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateOptions {
    /// Number of columns for a columns block, clamped to 1..=3
    pub column_count: usize,
    /// Seed each new column with one empty paragraph
    pub seed_columns: bool,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            column_count: 2,
            seed_columns: true,
        }
    }
}

impl CreateOptions {
    pub fn columns(count: usize) -> Self {
        Self {
            column_count: count,
            ..Self::default()
        }
    }

    pub fn unseeded(mut self) -> Self {
        self.seed_columns = false;
        self
    }
}

/// A typed content block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    #[serde(rename = "type")]
    pub kind: BlockKind,
    #[serde(default)]
    pub content: Content,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
}

impl Block {
    /// New block of `kind` with default content and a fresh id
    pub fn new(kind: BlockKind) -> Self {
        create(kind, None, CreateOptions::default())
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        create(BlockKind::Paragraph, Some(Content::Text(text.into())), CreateOptions::default())
    }

    pub fn text(kind: BlockKind, text: impl Into<String>) -> Self {
        create(kind, Some(Content::Text(text.into())), CreateOptions::default())
    }

    /// Group or column holding `children`
    pub fn container(kind: BlockKind, children: Vec<Block>) -> Self {
        let content = Content::Blocks(children.into_iter().map(Arc::new).collect());
        create(kind, Some(content), CreateOptions::default())
    }

    pub fn with_width(mut self, width: impl Into<String>) -> Self {
        self.width = Some(width.into());
        self
    }

    /// Direct child list of a group or column
    pub fn children(&self) -> Option<&[Arc<Block>]> {
        match &self.content {
            Content::Blocks(children) => Some(children),
            _ => None,
        }
    }

    pub fn columns(&self) -> Option<&[Column]> {
        match &self.content {
            Content::Columns(columns) => Some(columns),
            _ => None,
        }
    }

    /// Ids of this block and all of its descendants, depth-first
    pub fn collect_ids(&self, out: &mut Vec<BlockId>) {
        out.push(self.id.clone());
        for child in self.content.nested() {
            child.collect_ids(out);
        }
    }

    /// Whether `id` names this block or any descendant
    pub fn contains(&self, id: &BlockId) -> bool {
        &self.id == id || self.content.nested().any(|child| child.contains(id))
    }

    /// First block in this subtree (itself included) whose content does not
    /// fit its kind
    pub fn first_malformed(&self) -> Option<&Block> {
        if !self.content.fits(self.kind) {
            return Some(self);
        }
        self.content.first_malformed()
    }
}

/// Construct a well-formed block with a freshly allocated id.
///
/// `content` is used only when it fits `kind`; otherwise the kind's default
/// applies. Columns blocks get `options.column_count` (clamped to 1..=3)
/// columns with preset widths.
pub fn create(kind: BlockKind, content: Option<Content>, options: CreateOptions) -> Block {
    let content = match content {
        Some(content) if content.fits(kind) => content,
        _ if kind == BlockKind::Columns => Content::Columns(seeded_columns(options)),
        _ => Content::default_for(kind),
    };

    Block {
        id: BlockId::generate(),
        kind,
        content,
        width: None,
    }
}

fn seeded_columns(options: CreateOptions) -> Vec<Column> {
    preset_widths(options.column_count)
        .into_iter()
        .map(|width| Column {
            width,
            blocks: if options.seed_columns {
                vec![Arc::new(Block::new(BlockKind::Paragraph))]
            } else {
                Vec::new()
            },
        })
        .collect()
}
