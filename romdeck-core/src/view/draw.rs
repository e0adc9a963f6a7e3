//! src/view/draw.rs
//! ============================================================================
//! # Draw commands
//!
//! The renderer never touches a screen. It produces a [`DrawList`] of
//! [`DrawCommand`]s that a host-specific [`DrawSurface`] executes in order.
//! Every glyph and bitmap command carries its compositing mode, and each render
//! pass ends with `SetDrawMode(Copy)` through [`RenderPass`]'s `Drop`.

use compact_str::CompactString;
use tracing::trace;

/// Two-tone palette of the target display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    White,
    Black,
}

/// Compositing mode for glyph and bitmap drawing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DrawMode {
    /// Source pixels copied as-is.
    #[default]
    Copy,
    /// Opaque pixels drawn black (dark on light).
    FillBlack,
    /// Opaque pixels drawn white (light on dark).
    FillWhite,
}

/// Rectangle in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub const fn right(&self) -> i32 {
        self.x + self.width
    }
}

/// Handle to a loaded bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub name: CompactString,
    pub width: i32,
    pub height: i32,
}

/// Handle to a loaded font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
    pub name: CompactString,
    /// Line height in pixels.
    pub height: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCommand {
    Clear(Color),

    FillRect {
        rect: Rect,
        color: Color,
    },

    DrawBitmap {
        bitmap: Bitmap,
        x: i32,
        y: i32,
        mode: DrawMode,
    },

    /// Text may span several lines separated by `\n`.
    DrawText {
        text: CompactString,
        font: Option<Font>,
        x: i32,
        y: i32,
        mode: DrawMode,
    },

    /// Default mode for surfaces that keep compositing state between calls.
    SetDrawMode(DrawMode),
}

/// Executes draw commands against a concrete display.
pub trait DrawSurface {
    fn execute(&mut self, command: &DrawCommand);
}

/// Ordered draw commands for one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DrawCommand> {
        self.commands.iter()
    }

    /// Forwards every command to `surface` in order.
    pub fn present<S: DrawSurface + ?Sized>(&self, surface: &mut S) {
        trace!(commands = self.commands.len(), "Presenting draw list");
        for command in &self.commands {
            surface.execute(command);
        }
    }
}

impl<'a> IntoIterator for &'a DrawList {
    type Item = &'a DrawCommand;
    type IntoIter = std::slice::Iter<'a, DrawCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

/// Scoped writer over a [`DrawList`] that tracks the current mode and restores
/// `DrawMode::Copy` when dropped.
pub struct RenderPass<'a> {
    list: &'a mut DrawList,
    mode: DrawMode,
}

impl<'a> RenderPass<'a> {
    pub fn begin(list: &'a mut DrawList) -> Self {
        Self {
            list,
            mode: DrawMode::Copy,
        }
    }

    pub const fn mode(&self) -> DrawMode {
        self.mode
    }

    pub fn clear(&mut self, color: Color) {
        self.list.push(DrawCommand::Clear(color));
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.list.push(DrawCommand::FillRect { rect, color });
    }

    /// Switches the mode, emitting `SetDrawMode` only on change.
    pub fn set_mode(&mut self, mode: DrawMode) {
        if self.mode != mode {
            self.mode = mode;
            self.list.push(DrawCommand::SetDrawMode(mode));
        }
    }

    pub fn bitmap(&mut self, bitmap: &Bitmap, x: i32, y: i32) {
        self.list.push(DrawCommand::DrawBitmap {
            bitmap: bitmap.clone(),
            x,
            y,
            mode: self.mode,
        });
    }

    pub fn text(&mut self, text: &str, font: Option<&Font>, x: i32, y: i32) {
        self.list.push(DrawCommand::DrawText {
            text: CompactString::new(text),
            font: font.cloned(),
            x,
            y,
            mode: self.mode,
        });
    }
}

impl Drop for RenderPass<'_> {
    fn drop(&mut self) {
        self.mode = DrawMode::Copy;
        self.list.push(DrawCommand::SetDrawMode(DrawMode::Copy));
    }
}
