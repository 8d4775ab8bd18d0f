//! # Save Contract
//!
//! [`finalize`] turns a document into the payload handed to persistence:
//!
//! ```json
//! { "title": "..", "slug": "..", "status": "draft",
//!   "blocks": [{ "type": "paragraph", "content": "..", "width": "50%" }] }
//! ```
//!
//! Block ids and editor state (drag, palette, resize, history) are not part
//! of the payload. Nested containers keep their structure.
//!
//! [`SavePayload::into_document`] goes the other way, allocating fresh ids.

use crate::errors::EditError;
use blockpress_model::{Block, BlockId, BlockKind, BlockTree, Column, Content, Document, Media, Status};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavePayload {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub blocks: Vec<SavedBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedBlock {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    #[serde(default)]
    pub content: SavedContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedColumn {
    pub width: String,
    #[serde(default)]
    pub blocks: Vec<SavedBlock>,
}

/// Content without ids; mirrors [`Content`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SavedContent {
    Text(String),
    Media(Media),
    Blocks(Vec<SavedBlock>),
    Columns(Vec<SavedColumn>),
    #[default]
    Empty,
}

/// Strip a document down to its save payload
pub fn finalize(document: &Document) -> SavePayload {
    SavePayload {
        title: document.title.clone(),
        slug: document.slug.clone(),
        status: document.status,
        blocks: saved_list(document.blocks.blocks()),
    }
}

fn saved_list(blocks: &[Arc<Block>]) -> Vec<SavedBlock> {
    blocks.iter().map(|block| saved_block(block)).collect()
}

fn saved_block(block: &Block) -> SavedBlock {
    let content = match &block.content {
        Content::Text(text) => SavedContent::Text(text.clone()),
        Content::Media(media) => SavedContent::Media(media.clone()),
        Content::Blocks(children) => SavedContent::Blocks(saved_list(children)),
        Content::Columns(columns) => SavedContent::Columns(
            columns
                .iter()
                .map(|column| SavedColumn {
                    width: column.width.clone(),
                    blocks: saved_list(&column.blocks),
                })
                .collect(),
        ),
        Content::Empty => SavedContent::Empty,
    };

    SavedBlock {
        kind: block.kind,
        content,
        width: block.width.clone(),
    }
}

impl SavePayload {
    /// Rebuild an editable document. Every block gets a fresh id; an empty
    /// payload yields the default single empty paragraph.
    pub fn into_document(self) -> Result<Document, EditError> {
        let mut blocks = self
            .blocks
            .into_iter()
            .map(restore_block)
            .collect::<Result<Vec<_>, _>>()?;

        if blocks.is_empty() {
            blocks.push(Block::paragraph(""));
        }

        Ok(Document {
            title: self.title,
            slug: self.slug,
            status: self.status,
            blocks: BlockTree::new(blocks),
        })
    }
}

fn restore_block(saved: SavedBlock) -> Result<Block, EditError> {
    let kind = saved.kind;
    let content = match (saved.content, kind) {
        // Text blocks saved before anything was typed
        (SavedContent::Empty, k) if k.is_text() => Content::Text(String::new()),
        (SavedContent::Empty, k) if k.is_media() => Content::Media(Media::default()),
        (SavedContent::Empty, BlockKind::Group | BlockKind::Column) => Content::Blocks(Vec::new()),
        // An empty array reads as a block list; accept it for childless containers
        (SavedContent::Blocks(children), BlockKind::Columns) if children.is_empty() => Content::Columns(Vec::new()),
        (SavedContent::Text(text), _) => Content::Text(text),
        (SavedContent::Media(media), _) => Content::Media(media),
        (SavedContent::Blocks(children), _) => Content::Blocks(restore_list(children)?),
        (SavedContent::Columns(columns), _) => Content::Columns(
            columns
                .into_iter()
                .map(|column| {
                    Ok(Column {
                        width: column.width,
                        blocks: restore_list(column.blocks)?,
                    })
                })
                .collect::<Result<Vec<_>, EditError>>()?,
        ),
        (SavedContent::Empty, _) => Content::Empty,
    };

    if !content.fits(kind) {
        return Err(EditError::ContentMismatch(kind));
    }

    Ok(Block {
        id: BlockId::generate(),
        kind,
        content,
        width: saved.width,
    })
}

fn restore_list(blocks: Vec<SavedBlock>) -> Result<Vec<Arc<Block>>, EditError> {
    blocks
        .into_iter()
        .map(|saved| restore_block(saved).map(Arc::new))
        .collect()
}

/// Receives finalized payloads. Delivery is fire-and-forget: the editor never
/// waits for or retries a save.
pub trait SaveSink {
    fn submit(&mut self, payload: SavePayload);
}

/// Collects payloads in memory
impl SaveSink for Vec<SavePayload> {
    fn submit(&mut self, payload: SavePayload) {
        self.push(payload);
    }
}
