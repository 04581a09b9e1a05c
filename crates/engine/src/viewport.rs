//! Virtualized viewport.
//!
//! Computes which rows intersect the scroll window, widened by an overscan on
//! both sides, and where each materialized row sits. Rows are placed by
//! absolute offset (`index * row_height`), never by sibling order, so a scroll
//! only changes which rows exist, not where existing rows are.
//!
//! Offsets are relative to the top of the scrollable body; the header sits
//! above it and does not move with the rows.

use log::trace;

pub const DEFAULT_OVERSCAN: usize = 5;

/// Scroll container measurements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportMetrics {
    pub total_rows: usize,
    pub row_height: f32,
    pub header_height: f32,
    pub scroll_top: f32,
    pub viewport_height: f32,
    pub overscan: usize,
}

impl ViewportMetrics {
    pub fn new(total_rows: usize, row_height: f32, viewport_height: f32) -> Self {
        Self {
            total_rows,
            row_height,
            header_height: 0.0,
            scroll_top: 0.0,
            viewport_height,
            overscan: DEFAULT_OVERSCAN,
        }
    }

    pub fn with_scroll(mut self, scroll_top: f32) -> Self {
        self.scroll_top = scroll_top;
        self
    }

    pub fn with_header(mut self, header_height: f32) -> Self {
        self.header_height = header_height;
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    /// Whether row heights are usable for windowing.
    fn measurable(&self) -> bool {
        self.row_height.is_finite() && self.row_height > 0.0
    }
}

/// Inclusive range of row indices to materialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowWindow {
    pub start: usize,
    pub end: usize,
}

impl RowWindow {
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index <= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowPlacement {
    pub index: usize,
    pub top: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewportLayout {
    pub rows: Vec<RowPlacement>,
    /// Full body height, so scrollbar proportions match the whole dataset.
    pub spacer_height: f32,
    pub header_height: f32,
}

pub fn row_offset(index: usize, row_height: f32) -> f32 {
    index as f32 * row_height
}

/// Rows intersecting the viewport plus overscan. `None` for an empty grid.
/// Without a usable row height every row is in the window.
pub fn visible_window(m: &ViewportMetrics) -> Option<RowWindow> {
    if m.total_rows == 0 {
        return None;
    }
    let last_row = m.total_rows - 1;
    if !m.measurable() {
        return Some(RowWindow { start: 0, end: last_row });
    }

    let scroll = m.scroll_top.max(0.0);
    let first_visible = ((scroll / m.row_height).floor() as usize).min(last_row);
    let last_visible = if m.viewport_height > 0.0 {
        let bottom = ((scroll + m.viewport_height) / m.row_height).ceil() as usize;
        bottom.saturating_sub(1).clamp(first_visible, last_row)
    } else {
        first_visible
    };

    let window = RowWindow {
        start: first_visible.saturating_sub(m.overscan),
        end: last_visible.saturating_add(m.overscan).min(last_row),
    };
    trace!("viewport window {}..={} of {}", window.start, window.end, m.total_rows);
    Some(window)
}

/// Lay out the body. The non-virtualized path materializes every row; for a
/// dataset that fits without scrolling both paths produce identical output.
pub fn layout(m: &ViewportMetrics, virtualized: bool) -> ViewportLayout {
    let window = if virtualized {
        visible_window(m)
    } else if m.total_rows == 0 {
        None
    } else {
        Some(RowWindow { start: 0, end: m.total_rows - 1 })
    };

    let row_height = if m.measurable() { m.row_height } else { 0.0 };
    let rows = window
        .map(|w| {
            (w.start..=w.end)
                .map(|index| RowPlacement { index, top: row_offset(index, row_height) })
                .collect()
        })
        .unwrap_or_default();

    ViewportLayout {
        rows,
        spacer_height: m.total_rows as f32 * row_height,
        header_height: m.header_height,
    }
}
