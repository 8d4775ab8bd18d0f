//! Edit scripts: a JSON array of steps replayed against an [`EditSession`].
//!
//! ```json
//! [
//!   { "op": "insert_block", "at": { "index": 0 }, "kind": "heading" },
//!   { "update": { "index": 0 }, "patch": { "field": "content", "value": "Hello" } },
//!   { "drop": { "kind": "new_block", "block_type": "image" }, "at": { "index": 2 } },
//!   { "resize": { "index": 1 }, "left": 0, "width": 800, "moves": [40, 80] },
//!   { "delete": { "index": 3 } },
//!   "undo",
//!   "redo"
//! ]
//! ```
//!
//! Saved payloads carry no block ids, so the `update` and `delete` steps
//! address blocks by locator and the id is looked up when the step runs.

use anyhow::{Context, Result};
use blockpress_editor::{DragPayload, EditSession, Mutation, MutationResult, Patch};
use blockpress_model::{BlockId, Locator};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryStep {
    Undo,
    Redo,
}

/// One scripted input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScriptStep {
    History(HistoryStep),

    /// Drag `drop` over `at` and release
    Drop { drop: DragPayload, at: Locator },

    /// Drag the handle right of column `left` through `moves` (pixels from the
    /// pointer-down position) in a container `width` pixels wide
    Resize {
        resize: Locator,
        left: usize,
        width: f64,
        moves: Vec<f64>,
    },

    Delete { delete: Locator },

    Update { update: Locator, patch: Patch },

    Edit(Mutation),
}

impl ScriptStep {
    /// Short label for reports
    pub fn name(&self) -> &'static str {
        match self {
            ScriptStep::History(HistoryStep::Undo) => "undo",
            ScriptStep::History(HistoryStep::Redo) => "redo",
            ScriptStep::Drop { .. } => "drop",
            ScriptStep::Resize { .. } => "resize",
            ScriptStep::Delete { .. } => "delete",
            ScriptStep::Update { .. } => "update",
            ScriptStep::Edit(mutation) => mutation.name(),
        }
    }

    /// Feed this step into `session`
    pub fn run(&self, session: &mut EditSession) -> MutationResult {
        match self {
            ScriptStep::History(HistoryStep::Undo) => session.undo(),
            ScriptStep::History(HistoryStep::Redo) => session.redo(),

            ScriptStep::Drop { drop, at } => {
                session.begin_drag(drop.clone());
                session.drag_enter(at.clone());
                session.drop_drag()
            }

            ScriptStep::Resize {
                resize,
                left,
                width,
                moves,
            } => {
                if let Err(err) = session.begin_resize(resize, *left, *width) {
                    return MutationResult::Noop { reason: err.to_string() };
                }
                for dx in moves {
                    session.resize_to(*dx);
                }
                session.end_resize()
            }

            ScriptStep::Delete { delete } => match block_id(session, delete) {
                Some(id) => session.apply(Mutation::DeleteBlock {
                    container: delete.path.clone(),
                    id,
                }),
                None => not_found(delete),
            },

            ScriptStep::Update { update, patch } => match block_id(session, update) {
                Some(id) => session.apply(Mutation::UpdateBlock {
                    id,
                    patch: patch.clone(),
                }),
                None => not_found(update),
            },

            ScriptStep::Edit(mutation) => session.apply(mutation.clone()),
        }
    }
}

fn block_id(session: &EditSession, at: &Locator) -> Option<BlockId> {
    session.tree().block_at(at).map(|block| block.id.clone())
}

fn not_found(at: &Locator) -> MutationResult {
    MutationResult::Noop {
        reason: format!("no block at {}", at),
    }
}

pub fn parse(json: &str) -> Result<Vec<ScriptStep>> {
    Ok(serde_json::from_str(json)?)
}

pub fn load(path: &Path) -> Result<Vec<ScriptStep>> {
    let content = std::fs::read_to_string(path).with_context(|| format!("Cannot read script {}", path.display()))?;
    parse(&content).with_context(|| format!("Invalid script {}", path.display()))
}
