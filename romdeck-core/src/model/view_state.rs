//! ``src/model/view_state.rs``
//! ============================================================================
//! # `ViewState` and `Layout`
//!
//! `ViewState` is the per-activation selection and scroll position of the
//! library list. `Layout` holds the pixel geometry shared by the scroll
//! controller and the renderer; it is part of the user configuration.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Pixel geometry of the library list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Height of one row.
    pub row_height: i32,

    pub viewport_width: i32,

    /// Visible height of the list.
    pub viewport_height: i32,

    /// Left edge of the list.
    pub list_x: i32,

    /// Horizontal inset of the icon inside a row.
    pub icon_inset: i32,

    /// Distance from the icon's left edge to the filename.
    pub text_gap: i32,

    /// Line height used for centering when no font is loaded.
    pub fallback_text_height: i32,

    /// Anchor of the "no files" message.
    pub message_x: i32,
    pub message_y: i32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            row_height: 36,
            viewport_width: 400,
            viewport_height: 240,
            list_x: 0,
            icon_inset: 10,
            text_gap: 23,
            fallback_text_height: 14,
            message_x: 30,
            message_y: 30,
        }
    }
}

impl Layout {
    /// Returns a layout on which the "selected row fully visible" guarantee can
    /// hold: rows are at least one pixel tall and fit in the viewport.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let mut layout = self;

        if layout.row_height < 1 {
            warn!(
                marker = "LAYOUT_SANITIZED",
                row_height = layout.row_height,
                "Row height must be positive, using 1"
            );
            layout.row_height = 1;
        }

        if layout.viewport_height < layout.row_height {
            warn!(
                marker = "LAYOUT_SANITIZED",
                viewport_height = layout.viewport_height,
                row_height = layout.row_height,
                "Viewport shorter than one row, growing it to the row height"
            );
            layout.viewport_height = layout.row_height;
        }

        layout
    }

    /// Top of row `index` in list coordinates (before scrolling).
    #[must_use]
    pub fn row_top(&self, index: usize) -> i32 {
        i32::try_from(index).map_or(i32::MAX, |i| i.saturating_mul(self.row_height))
    }

    /// Bottom of row `index` in list coordinates.
    #[must_use]
    pub fn row_bottom(&self, index: usize) -> i32 {
        self.row_top(index).saturating_add(self.row_height)
    }
}

/// Selection and scroll position of the library list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewState {
    /// Index of the highlighted entry; meaningless while the store is empty.
    pub selection: usize,

    /// Pixels the list content is shifted up relative to the viewport top.
    pub scroll_offset: i32,
}

impl ViewState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether row `selection` lies completely inside the viewport.
    #[must_use]
    pub fn selected_row_visible(&self, layout: &Layout) -> bool {
        let top = layout.row_top(self.selection);
        let bottom = layout.row_bottom(self.selection);
        self.scroll_offset <= top
            && self.scroll_offset.saturating_add(layout.viewport_height) >= bottom
    }
}
