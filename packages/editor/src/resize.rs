//! # Column Resizing
//!
//! Dragging the handle between columns `left` and `left + 1` of a columns
//! block redistributes width between those two columns only:
//!
//! ```text
//! left  = round2(clamp(10, 90, origin + dx / container_width * 100))
//! right = 100 - left
//! ```
//!
//! A [`ResizeGesture`] remembers the left column's width at pointer-down, so
//! every pointer move is computed from the same origin rather than
//! accumulating rounding error.

use crate::edits::settle;
use crate::errors::EditError;
use blockpress_model::width::{format_percent, parse_percent, round_percent, MAX_COLUMN_PERCENT, MIN_COLUMN_PERCENT};
use blockpress_model::{BlockTree, Column, Content, Locator, TreeError};
use tracing::trace;

/// New `(left, right)` percentages for a handle moved by `delta_percent`.
/// The left width is rounded first so the stored pair sums to exactly 100.
pub fn resized_widths(origin_left: f64, delta_percent: f64) -> (f64, f64) {
    let left = round_percent((origin_left + delta_percent).clamp(MIN_COLUMN_PERCENT, MAX_COLUMN_PERCENT));
    (left, 100.0 - left)
}

/// Pointer travel as a percentage of the container width
pub fn pointer_delta_percent(dx: f64, container_width: f64) -> f64 {
    if container_width <= 0.0 || !container_width.is_finite() || !dx.is_finite() {
        return 0.0;
    }
    dx / container_width * 100.0
}

/// Resize relative to the current width of column `left`
pub fn resize_columns(tree: &BlockTree, at: &Locator, left: usize, delta_percent: f64) -> BlockTree {
    settle(tree, "resize", try_resize_columns(tree, at, left, delta_percent))
}

pub fn try_resize_columns(
    tree: &BlockTree,
    at: &Locator,
    left: usize,
    delta_percent: f64,
) -> Result<BlockTree, EditError> {
    let origin = {
        let columns = resizable_columns(tree, at, left)?;
        column_percent(columns, left)
    };
    write_widths(tree, at, left, resized_widths(origin, delta_percent))
}

/// Pointer-down state of a resize drag
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeGesture {
    columns: Locator,
    left: usize,
    origin_left: f64,
    container_width: f64,
}

impl ResizeGesture {
    /// Capture the handle between columns `left` and `left + 1` of the
    /// columns block at `columns`
    pub fn begin(tree: &BlockTree, columns: &Locator, left: usize, container_width: f64) -> Result<Self, EditError> {
        let list = resizable_columns(tree, columns, left)?;
        let origin_left = column_percent(list, left);
        trace!(block = %columns, left, origin_left, "Resize started");

        Ok(Self {
            columns: columns.clone(),
            left,
            origin_left,
            container_width,
        })
    }

    pub fn columns(&self) -> &Locator {
        &self.columns
    }

    pub fn left(&self) -> usize {
        self.left
    }

    pub fn origin_left(&self) -> f64 {
        self.origin_left
    }

    /// Widths for a pointer `dx` pixels from where the drag started
    pub fn widths_for(&self, dx: f64) -> (f64, f64) {
        resized_widths(self.origin_left, pointer_delta_percent(dx, self.container_width))
    }

    /// Tree with the two columns resized for pointer offset `dx`
    pub fn apply(&self, tree: &BlockTree, dx: f64) -> BlockTree {
        settle(tree, "resize", self.try_apply(tree, dx))
    }

    pub fn try_apply(&self, tree: &BlockTree, dx: f64) -> Result<BlockTree, EditError> {
        resizable_columns(tree, &self.columns, self.left)?;
        write_widths(tree, &self.columns, self.left, self.widths_for(dx))
    }
}

fn resizable_columns<'a>(tree: &'a BlockTree, at: &Locator, left: usize) -> Result<&'a [Column], EditError> {
    let block = tree.block_at(at).ok_or_else(|| {
        let len = tree.container(&at.path).map(|list| list.len()).unwrap_or(0);
        EditError::Tree(TreeError::IndexOutOfRange { index: at.index, len })
    })?;

    let columns = block.columns().ok_or_else(|| EditError::NotColumns(block.id.clone()))?;
    if left + 1 >= columns.len() {
        return Err(TreeError::NoSuchColumn {
            id: block.id.clone(),
            column: left + 1,
        }
        .into());
    }
    Ok(columns)
}

/// Current width of column `index`; unreadable widths count as an even share
fn column_percent(columns: &[Column], index: usize) -> f64 {
    columns
        .get(index)
        .and_then(|column| parse_percent(&column.width))
        .unwrap_or(100.0 / columns.len().max(1) as f64)
}

fn write_widths(tree: &BlockTree, at: &Locator, left: usize, (left_pct, right_pct): (f64, f64)) -> Result<BlockTree, EditError> {
    let mut next = tree.clone();
    let block = next.block_at_mut(at)?;
    let id = block.id.clone();

    let Content::Columns(columns) = &mut block.content else {
        return Err(EditError::NotColumns(id));
    };
    if left + 1 >= columns.len() {
        return Err(TreeError::NoSuchColumn { id, column: left + 1 }.into());
    }

    columns[left].width = format_percent(left_pct);
    columns[left + 1].width = format_percent(right_pct);
    Ok(next)
}
