//! Two-level click dispatch for list rows.
//!
//! A row carries a primary action (open a list, toggle an item) and a delete
//! control at its right edge. The control-level handler always runs first; when
//! it returns [`Propagation::Stop`] the row-level handler is never called.

use ratatui::layout::{Margin, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowPart {
    Body,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowTarget {
    pub index: usize,
    pub part: RowPart,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Propagation<T> {
    Stop(T),
    Continue,
}

pub fn dispatch_row<T>(
    target: RowTarget,
    on_control: impl FnOnce(RowTarget) -> Propagation<T>,
    on_row: impl FnOnce(usize) -> Option<T>,
) -> Option<T> {
    match on_control(target) {
        Propagation::Stop(handled) => Some(handled),
        Propagation::Continue => on_row(target.index),
    }
}

pub fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.right() && row >= area.y && row < area.bottom()
}

/// Maps a terminal cell inside a bordered list block to the row under it.
/// `control_width` is the width of the delete control at the right edge.
pub fn hit_row(
    block_area: Rect,
    offset: usize,
    len: usize,
    column: u16,
    row: u16,
    control_width: u16,
) -> Option<RowTarget> {
    let inner = block_area.inner(Margin {
        horizontal: 1,
        vertical: 1,
    });
    if !contains(inner, column, row) {
        return None;
    }
    let index = offset + (row - inner.y) as usize;
    if index >= len {
        return None;
    }
    let part = if column >= inner.right().saturating_sub(control_width) {
        RowPart::Delete
    } else {
        RowPart::Body
    };
    Some(RowTarget { index, part })
}
