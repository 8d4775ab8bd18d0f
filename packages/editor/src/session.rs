//! # Edit Session
//!
//! One author's editing state for one document: the history of trees, plus
//! whichever gesture (drag, palette, resize) is in progress.
//!
//! Every input source goes through the session. Renderer events, palette
//! keys, drops and resize moves all end up as calls on the structural edit
//! engine; accepted results are recorded in history and bump `version`.
//!
//! ```text
//! BlockEvent ─┐
//! Mutation ───┼─→ EditSession ─→ edits ─→ History ─→ tree()
//! drag/drop ──┤
//! resize ─────┘
//! ```

use crate::drop_target::{DragPayload, DragSession, DragTransfer};
use crate::edits::Patch;
use crate::errors::EditError;
use crate::history::History;
use crate::mutations::Mutation;
use crate::palette::{self, CaretAnchor, CommandPalette, Key, PaletteCommit};
use crate::resize::ResizeGesture;
use crate::sanitize::{PassThrough, Sanitizer};
use crate::save::{finalize, SavePayload, SaveSink};
use blockpress_model::{BlockId, BlockKind, BlockTree, ContainerPath, Content, Document, Locator, Status};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// History settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorOptions {
    /// Maximum history entries kept (0 = unlimited)
    pub history_limit: usize,

    /// Merge same-block content edits closer together than this (0 = never)
    pub coalesce_window_ms: u64,
}

/// Outcome of an input reaching the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationResult {
    /// Tree changed and was recorded
    Applied { version: u64 },
    /// Nothing changed
    Noop { reason: String },
}

impl MutationResult {
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationResult::Applied { .. })
    }

    fn noop(reason: impl Into<String>) -> Self {
        MutationResult::Noop { reason: reason.into() }
    }
}

/// What a block renderer reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockEventKind {
    Change { content: Content },
    Delete,
    KeyDown { key: Key, caret: CaretAnchor },
}

/// Event from the renderer of block `id`, which sits directly in `container`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockEvent {
    #[serde(default)]
    pub container: ContainerPath,
    pub id: BlockId,
    #[serde(flatten)]
    pub kind: BlockEventKind,
}

struct ResizeState {
    gesture: ResizeGesture,
    live: BlockTree,
}

pub struct EditSession {
    document: Document,
    history: History,
    version: u64,
    drag: Option<DragSession>,
    palette: CommandPalette,
    resize: Option<ResizeState>,
    sanitizer: Box<dyn Sanitizer>,
}

impl EditSession {
    pub fn new(document: Document) -> Self {
        Self::with_options(document, &EditorOptions::default())
    }

    pub fn with_options(document: Document, options: &EditorOptions) -> Self {
        let history = History::new(document.blocks.clone())
            .with_limit(options.history_limit)
            .with_coalesce_window(Duration::from_millis(options.coalesce_window_ms));

        Self {
            document,
            history,
            version: 0,
            drag: None,
            palette: CommandPalette::new(),
            resize: None,
            sanitizer: Box::new(PassThrough),
        }
    }

    /// Replace the rich text sanitizer
    pub fn with_sanitizer(mut self, sanitizer: impl Sanitizer + 'static) -> Self {
        self.sanitizer = Box::new(sanitizer);
        self
    }

    /// Document as of the last recorded edit
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Tree to render: the live resize preview while resizing, else the
    /// recorded tree
    pub fn tree(&self) -> &BlockTree {
        match &self.resize {
            Some(state) => &state.live,
            None => &self.document.blocks,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.document.title = title.into();
    }

    pub fn set_slug(&mut self, slug: impl Into<String>) {
        self.document.slug = slug.into();
    }

    pub fn set_status(&mut self, status: Status) {
        self.document.status = status;
    }

    // ---------------------------------------------------------------------
    // Mutations and history
    // ---------------------------------------------------------------------

    pub fn apply(&mut self, mutation: Mutation) -> MutationResult {
        self.apply_at(mutation, Instant::now())
    }

    /// Apply `mutation` as if it happened at `now` (drives history coalescing)
    pub fn apply_at(&mut self, mutation: Mutation, now: Instant) -> MutationResult {
        self.end_resize();

        let mutation = self.sanitized(mutation);
        let result = mutation.apply(&self.document.blocks);
        let content_edit = mutation.content_target().map(|id| (id.clone(), now));
        self.commit(mutation.name(), result, content_edit)
    }

    fn sanitized(&self, mutation: Mutation) -> Mutation {
        match mutation {
            Mutation::UpdateBlock {
                id,
                patch: Patch::Content(Content::Text(markup)),
            } if self.kind_of(&id) == Some(BlockKind::RichText) => Mutation::UpdateBlock {
                patch: Patch::Content(Content::Text(self.sanitizer.sanitize(&markup))),
                id,
            },
            other => other,
        }
    }

    fn kind_of(&self, id: &BlockId) -> Option<BlockKind> {
        self.document.blocks.find(id).map(|block| block.kind)
    }

    fn commit(
        &mut self,
        op: &'static str,
        result: Result<BlockTree, EditError>,
        content_edit: Option<(BlockId, Instant)>,
    ) -> MutationResult {
        let next = match result {
            Ok(next) => next,
            Err(err) => {
                debug!(op, error = %err, "Mutation rejected");
                return MutationResult::noop(err.to_string());
            }
        };

        if next == self.document.blocks {
            trace!(op, "Mutation left the tree unchanged");
            return MutationResult::noop("tree unchanged");
        }

        match content_edit {
            Some((id, now)) => self.history.record_content_edit(next.clone(), &id, now),
            None => self.history.record(next.clone()),
        }
        self.document.blocks = next;
        self.version += 1;

        debug!(op, version = self.version, "Mutation applied");
        MutationResult::Applied { version: self.version }
    }

    pub fn undo(&mut self) -> MutationResult {
        self.cancel_gestures();
        match self.history.undo().cloned() {
            Some(tree) => self.restore("undo", tree),
            None => MutationResult::noop("nothing to undo"),
        }
    }

    pub fn redo(&mut self) -> MutationResult {
        self.cancel_gestures();
        match self.history.redo().cloned() {
            Some(tree) => self.restore("redo", tree),
            None => MutationResult::noop("nothing to redo"),
        }
    }

    fn restore(&mut self, op: &'static str, tree: BlockTree) -> MutationResult {
        self.document.blocks = tree;
        self.version += 1;
        debug!(op, version = self.version, cursor = self.history.cursor(), "History moved");
        MutationResult::Applied { version: self.version }
    }

    /// Gestures captured against a tree that undo/redo is about to replace
    fn cancel_gestures(&mut self) {
        self.drag = None;
        self.palette.close();
        self.resize = None;
    }

    // ---------------------------------------------------------------------
    // Renderer events
    // ---------------------------------------------------------------------

    pub fn dispatch(&mut self, event: BlockEvent) -> MutationResult {
        self.dispatch_at(event, Instant::now())
    }

    pub fn dispatch_at(&mut self, event: BlockEvent, now: Instant) -> MutationResult {
        let BlockEvent { container, id, kind } = event;

        match kind {
            BlockEventKind::Change { content } => self.apply_at(
                Mutation::UpdateBlock {
                    id,
                    patch: Patch::Content(content),
                },
                now,
            ),
            BlockEventKind::Delete => self.apply_at(Mutation::DeleteBlock { container, id }, now),
            BlockEventKind::KeyDown { key, caret } => self.key_down(&container, &id, key, caret),
        }
    }

    fn key_down(&mut self, container: &ContainerPath, id: &BlockId, key: Key, caret: CaretAnchor) -> MutationResult {
        if self.palette.is_open() {
            return self.palette_key(key);
        }

        let Key::Char(c) = key else {
            return MutationResult::noop("key not handled");
        };

        let locator = self
            .document
            .blocks
            .container(container)
            .ok()
            .and_then(|list| list.iter().position(|block| &block.id == id))
            .map(|index| container.at(index));

        match locator {
            Some(at) if CommandPalette::should_open(&self.document.blocks, &at, c) => {
                self.open_palette(&at, caret);
                MutationResult::noop("palette opened")
            }
            _ => MutationResult::noop("key not handled"),
        }
    }

    // ---------------------------------------------------------------------
    // Command palette
    // ---------------------------------------------------------------------

    pub fn palette(&self) -> &CommandPalette {
        &self.palette
    }

    /// Open the palette for the block at `at`
    pub fn open_palette(&mut self, at: &Locator, caret: CaretAnchor) -> bool {
        self.palette.open(&self.document.blocks, at, caret)
    }

    pub fn palette_key(&mut self, key: Key) -> MutationResult {
        match self.palette.handle_key(key) {
            Some(commit) => self.commit_palette(&commit),
            None => MutationResult::noop("palette updated"),
        }
    }

    /// Insert-and-cleanup is one history entry
    fn commit_palette(&mut self, commit: &PaletteCommit) -> MutationResult {
        let result = palette::try_apply_commit(&self.document.blocks, commit);
        self.commit("palette", result, None)
    }

    // ---------------------------------------------------------------------
    // Drag and drop
    // ---------------------------------------------------------------------

    /// Start a drag, replacing any stale one
    pub fn begin_drag(&mut self, payload: DragPayload) {
        self.drag = Some(DragSession::start(payload));
    }

    /// Start a drag from transfer data. Returns false if it carries nothing usable.
    pub fn begin_drag_transfer(&mut self, transfer: &DragTransfer) -> bool {
        self.drag = DragSession::from_transfer(transfer);
        self.drag.is_some()
    }

    pub fn drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    pub fn drag_enter(&mut self, zone: Locator) {
        if let Some(drag) = self.drag.as_mut() {
            drag.enter(zone);
        }
    }

    pub fn drag_leave(&mut self, zone: &Locator) {
        if let Some(drag) = self.drag.as_mut() {
            drag.leave(zone);
        }
    }

    /// Drag ended or was cancelled without a drop
    pub fn end_drag(&mut self) {
        if self.drag.take().is_some() {
            trace!("Drag ended without drop");
        }
    }

    pub fn drop_drag(&mut self) -> MutationResult {
        let Some(drag) = self.drag.take() else {
            return MutationResult::noop("no drag in progress");
        };
        let result = drag.try_drop(&self.document.blocks);
        self.commit("drop", result, None)
    }

    // ---------------------------------------------------------------------
    // Column resizing
    // ---------------------------------------------------------------------

    /// Pointer-down on the handle right of column `left`
    pub fn begin_resize(&mut self, columns: &Locator, left: usize, container_width: f64) -> Result<(), EditError> {
        self.end_resize();
        let gesture = ResizeGesture::begin(&self.document.blocks, columns, left, container_width)?;
        self.resize = Some(ResizeState {
            gesture,
            live: self.document.blocks.clone(),
        });
        Ok(())
    }

    pub fn is_resizing(&self) -> bool {
        self.resize.is_some()
    }

    /// Pointer moved `dx` pixels from where the resize started
    pub fn resize_to(&mut self, dx: f64) {
        if let Some(state) = self.resize.as_mut() {
            state.live = state.gesture.apply(&self.document.blocks, dx);
        }
    }

    /// Pointer-up: record the resized tree as one history entry
    pub fn end_resize(&mut self) -> MutationResult {
        match self.resize.take() {
            Some(state) => self.commit("resize", Ok(state.live), None),
            None => MutationResult::noop("no resize in progress"),
        }
    }

    /// Abandon the resize and keep the recorded widths
    pub fn cancel_resize(&mut self) {
        self.resize = None;
    }

    // ---------------------------------------------------------------------
    // Saving
    // ---------------------------------------------------------------------

    pub fn finalize(&self) -> SavePayload {
        finalize(&self.document)
    }

    pub fn save(&self, sink: &mut dyn SaveSink) {
        let payload = self.finalize();
        debug!(slug = %payload.slug, blocks = payload.blocks.len(), "Submitting save payload");
        sink.submit(payload);
    }
}

impl std::fmt::Debug for EditSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditSession")
            .field("document", &self.document)
            .field("version", &self.version)
            .field("cursor", &self.history.cursor())
            .field("drag", &self.drag)
            .field("palette_open", &self.palette.is_open())
            .field("resizing", &self.resize.is_some())
            .finish()
    }
}
