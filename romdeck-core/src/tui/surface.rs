//! src/tui/surface.rs
//! ============================================================================
//! # `TerminalSurface`: draw commands onto a ratatui buffer
//!
//! The library is laid out in display pixels; the terminal has cells. Each
//! cell stands for [`CELL_WIDTH`]×[`CELL_HEIGHT`] pixels. Rectangles cover
//! every cell they touch, text and bitmaps snap to the nearest cell.

use ratatui::{
    buffer::Buffer,
    layout::Rect as CellRect,
    style::Color as TermColor,
};
use tracing::trace;

use crate::{
    tui::assets,
    view::draw::{Color, DrawCommand, DrawMode, DrawSurface, Rect},
};

pub const CELL_WIDTH: i32 = 8;
pub const CELL_HEIGHT: i32 = 12;

pub struct TerminalSurface<'a> {
    buf: &'a mut Buffer,
    /// Cells the viewport maps onto.
    area: CellRect,
    /// Last `SetDrawMode` received.
    mode: DrawMode,
}

impl<'a> TerminalSurface<'a> {
    /// `area` is clipped to `viewport_px` (in pixels) so rows scrolled out of
    /// the viewport never reach the terminal.
    pub fn new(buf: &'a mut Buffer, area: CellRect, viewport_px: (i32, i32)) -> Self {
        let cols = to_u16(viewport_px.0.div_euclid(CELL_WIDTH));
        let rows = to_u16(viewport_px.1.div_euclid(CELL_HEIGHT));
        let area = CellRect {
            width: area.width.min(cols),
            height: area.height.min(rows),
            ..area
        }
        .intersection(buf.area);

        Self {
            buf,
            area,
            mode: DrawMode::Copy,
        }
    }

    pub const fn area(&self) -> CellRect {
        self.area
    }

    /// Last mode set through `SetDrawMode`.
    pub const fn mode(&self) -> DrawMode {
        self.mode
    }

    const fn term_color(color: Color) -> TermColor {
        match color {
            Color::White => TermColor::White,
            Color::Black => TermColor::Black,
        }
    }

    const fn glyph_color(mode: DrawMode) -> TermColor {
        match mode {
            DrawMode::FillWhite => TermColor::White,
            DrawMode::Copy | DrawMode::FillBlack => TermColor::Black,
        }
    }

    /// Pixel position to the nearest cell, relative to the area origin.
    fn snap(x: i32, y: i32) -> (i32, i32) {
        (
            (x + CELL_WIDTH / 2).div_euclid(CELL_WIDTH),
            (y + CELL_HEIGHT / 2).div_euclid(CELL_HEIGHT),
        )
    }

    /// Cell at (`col`, `row`) inside the area, if visible.
    fn cell_pos(&self, col: i32, row: i32) -> Option<(u16, u16)> {
        let col = u16::try_from(col).ok()?;
        let row = u16::try_from(row).ok()?;
        (col < self.area.width && row < self.area.height)
            .then(|| (self.area.x + col, self.area.y + row))
    }

    fn clear(&mut self, color: Color) {
        let bg = Self::term_color(color);
        for row in 0..self.area.height {
            for col in 0..self.area.width {
                if let Some(cell) = self.buf.cell_mut((self.area.x + col, self.area.y + row)) {
                    cell.reset();
                    cell.set_bg(bg);
                }
            }
        }
    }

    fn fill_rect(&mut self, rect: &Rect, color: Color) {
        let bg = Self::term_color(color);
        let first_col = rect.x.div_euclid(CELL_WIDTH);
        let first_row = rect.y.div_euclid(CELL_HEIGHT);
        // ceil so partially covered cells are filled
        let end_col = (rect.right() + CELL_WIDTH - 1).div_euclid(CELL_WIDTH);
        let end_row = (rect.bottom() + CELL_HEIGHT - 1).div_euclid(CELL_HEIGHT);

        for row in first_row..end_row {
            for col in first_col..end_col {
                if let Some(pos) = self.cell_pos(col, row) {
                    if let Some(cell) = self.buf.cell_mut(pos) {
                        cell.set_bg(bg);
                    }
                }
            }
        }
    }

    fn put_char(&mut self, col: i32, row: i32, ch: char, fg: TermColor) {
        if let Some(pos) = self.cell_pos(col, row) {
            if let Some(cell) = self.buf.cell_mut(pos) {
                cell.set_char(ch);
                cell.set_fg(fg);
            }
        }
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, mode: DrawMode) {
        let fg = Self::glyph_color(mode);
        let (start_col, start_row) = Self::snap(x, y);

        for (line_no, line) in text.lines().enumerate() {
            let row = start_row + i32::try_from(line_no).unwrap_or(i32::MAX);
            let glyphs = line.chars().filter(|ch| !ch.is_control());
            for (col, ch) in (start_col..).zip(glyphs) {
                self.put_char(col, row, ch, fg);
            }
        }
    }
}

impl DrawSurface for TerminalSurface<'_> {
    fn execute(&mut self, command: &DrawCommand) {
        match command {
            DrawCommand::Clear(color) => self.clear(*color),

            DrawCommand::FillRect { rect, color } => self.fill_rect(rect, *color),

            DrawCommand::DrawBitmap { bitmap, x, y, mode } => {
                let (col, row) = Self::snap(*x, *y);
                self.put_char(col, row, assets::glyph_for(&bitmap.name), Self::glyph_color(*mode));
            }

            DrawCommand::DrawText { text, x, y, mode, .. } => self.draw_text(text, *x, *y, *mode),

            DrawCommand::SetDrawMode(mode) => {
                trace!(?mode, "Surface draw mode");
                self.mode = *mode;
            }
        }
    }
}

fn to_u16(value: i32) -> u16 {
    u16::try_from(value.max(0)).unwrap_or(u16::MAX)
}
