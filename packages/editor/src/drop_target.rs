//! # Drop Target Resolution
//!
//! A drag gesture is a [`DragSession`] value: created on drag start, updated
//! as the pointer enters and leaves drop zones, and consumed by the drop.
//! Ending or cancelling a drag simply discards the session.
//!
//! ## Transfer Data
//!
//! Drag sources describe what they carry through a [`DragTransfer`], a map of
//! MIME-like keys:
//!
//! | Key                               | Value                          |
//! |-----------------------------------|--------------------------------|
//! | `application/x-blockpress-type`   | bare block type (`"heading"`)  |
//! | `application/x-blockpress-block`  | JSON `{ id, path, index }`     |
//!
//! The type key is checked first, so a palette-style source wins when both
//! are present.
//!
//! ## Failure Modes
//!
//! | Failure                         | Fallback       |
//! |---------------------------------|----------------|
//! | No zone entered before drop     | Drop is a no-op |
//! | Unreadable transfer data        | No session      |
//! | Source block moved or deleted   | Drop is a no-op |
//! | Zone lies inside dragged block  | Drop is a no-op |

use crate::edits::{self, settle};
use crate::errors::EditError;
use blockpress_model::{Block, BlockId, BlockKind, BlockTree, ContainerPath, Locator};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, trace};

pub const TYPE_KEY: &str = "application/x-blockpress-type";
pub const BLOCK_KEY: &str = "application/x-blockpress-block";

/// Key/value data attached to a drag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DragTransfer {
    entries: BTreeMap<String, String>,
}

impl DragTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Existing-block reference as carried under [`BLOCK_KEY`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct BlockRef {
    id: BlockId,
    #[serde(default)]
    path: ContainerPath,
    index: usize,
}

/// What a drag carries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DragPayload {
    /// A block type from the palette sidebar; dropping creates a fresh block
    NewBlock { block_type: BlockKind },
    /// A block already in the tree, identified by id and where it was picked up
    Existing { id: BlockId, source: Locator },
}

impl DragPayload {
    pub fn new_block(kind: BlockKind) -> Self {
        DragPayload::NewBlock { block_type: kind }
    }

    pub fn existing(id: BlockId, source: Locator) -> Self {
        DragPayload::Existing { id, source }
    }

    pub fn encode(&self) -> Result<DragTransfer, serde_json::Error> {
        let transfer = match self {
            DragPayload::NewBlock { block_type } => DragTransfer::new().with(TYPE_KEY, block_type.as_str()),
            DragPayload::Existing { id, source } => {
                let reference = BlockRef {
                    id: id.clone(),
                    path: source.path.clone(),
                    index: source.index,
                };
                DragTransfer::new().with(BLOCK_KEY, serde_json::to_string(&reference)?)
            }
        };
        Ok(transfer)
    }

    pub fn decode(transfer: &DragTransfer) -> Option<Self> {
        if let Some(kind) = transfer.get(TYPE_KEY).and_then(|raw| raw.trim().parse::<BlockKind>().ok()) {
            return Some(DragPayload::new_block(kind));
        }

        let raw = transfer.get(BLOCK_KEY)?;
        match serde_json::from_str::<BlockRef>(raw) {
            Ok(reference) => Some(DragPayload::existing(
                reference.id,
                Locator::new(reference.path, reference.index),
            )),
            Err(err) => {
                debug!(error = %err, "Unreadable block reference in drag transfer");
                None
            }
        }
    }
}

/// One in-progress drag
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    payload: DragPayload,
    target: Option<Locator>,
}

impl DragSession {
    pub fn start(payload: DragPayload) -> Self {
        trace!(?payload, "Drag started");
        Self { payload, target: None }
    }

    /// Session for transfer data, if it carries a usable payload
    pub fn from_transfer(transfer: &DragTransfer) -> Option<Self> {
        DragPayload::decode(transfer).map(Self::start)
    }

    pub fn payload(&self) -> &DragPayload {
        &self.payload
    }

    /// Provisional drop target
    pub fn target(&self) -> Option<&Locator> {
        self.target.as_ref()
    }

    /// Pointer entered `zone`
    pub fn enter(&mut self, zone: Locator) {
        trace!(zone = %zone, "Drag entered zone");
        self.target = Some(zone);
    }

    /// Pointer left `zone`; only clears the target if it is that zone
    pub fn leave(&mut self, zone: &Locator) {
        if self.target.as_ref() == Some(zone) {
            trace!(zone = %zone, "Drag left zone");
            self.target = None;
        }
    }

    /// Whether dropping on `zone` could succeed
    pub fn accepts(&self, zone: &Locator) -> bool {
        match &self.payload {
            DragPayload::NewBlock { .. } => true,
            DragPayload::Existing { source, .. } => !edits::passes_through(source, &zone.path),
        }
    }

    /// Resolve the drop against `tree`, consuming the session
    pub fn try_drop(self, tree: &BlockTree) -> Result<BlockTree, EditError> {
        let target = self.target.ok_or(EditError::NoDropTarget)?;

        match self.payload {
            DragPayload::NewBlock { block_type } => edits::try_insert(tree, &target, Block::new(block_type)),
            DragPayload::Existing { id, source } => {
                match tree.block_at(&source) {
                    Some(block) if block.id == id => {}
                    _ => return Err(EditError::StaleSource { id }),
                }
                edits::try_transfer(tree, &source, &target)
            }
        }
    }

    /// Like [`try_drop`](Self::try_drop), but a failed drop leaves the tree unchanged
    pub fn drop_onto(self, tree: &BlockTree) -> BlockTree {
        settle(tree, "drop", self.try_drop(tree))
    }
}

/// Every insertion point in the tree: before each block, after the last,
/// and inside each empty list
pub fn drop_zones(tree: &BlockTree) -> Vec<Locator> {
    let mut zones = Vec::new();
    tree.walk_containers(|path, list| {
        zones.extend((0..=list.len()).map(|index| path.at(index)));
    });
    zones
}
