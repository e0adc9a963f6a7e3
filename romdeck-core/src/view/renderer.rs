//! src/view/renderer.rs
//! ============================================================
//! Library list renderer: turns the entry store and view state into a
//! [`DrawList`]. Takes no locks and mutates nothing.

use tracing::{instrument, trace};

use crate::{
    model::{
        entry_store::EntryStore,
        view_state::{Layout, ViewState},
    },
    view::draw::{Bitmap, Color, DrawList, DrawMode, Font, Rect, RenderPass},
};

pub const DEFAULT_EMPTY_MESSAGE: &str = "Place your .gb files in\n\
                                         the games folder\n\
                                         next to romdeck.\n\
                                         \n\
                                         Press Q to quit.";

/// Borrowed view of everything a frame needs.
#[derive(Debug, Clone, Copy)]
pub struct LibraryRenderer<'a> {
    pub layout: &'a Layout,
    pub icon: Option<&'a Bitmap>,
    pub font: Option<&'a Font>,
    pub empty_message: &'a str,
}

impl LibraryRenderer<'_> {
    #[instrument(level = "trace", skip_all, fields(entries = store.len()))]
    pub fn render(&self, store: &EntryStore, state: &ViewState) -> DrawList {
        let mut list = DrawList::new();
        {
            let mut pass = RenderPass::begin(&mut list);
            pass.clear(Color::White);

            if store.is_empty() {
                self.render_empty(&mut pass);
            } else {
                self.render_rows(&mut pass, store, state);
            }
        }
        list
    }

    fn render_empty(&self, pass: &mut RenderPass<'_>) {
        trace!("Rendering empty library message");
        pass.set_mode(DrawMode::FillBlack);
        pass.text(
            self.empty_message,
            self.font,
            self.layout.message_x,
            self.layout.message_y,
        );
    }

    fn render_rows(&self, pass: &mut RenderPass<'_>, store: &EntryStore, state: &ViewState) {
        let layout = self.layout;
        let text_height = self
            .font
            .map_or(layout.fallback_text_height, |font| font.height);
        let icon_x = layout.list_x + layout.icon_inset;
        let text_x = icon_x + layout.text_gap;

        for (index, name) in store.iter().enumerate() {
            let row_top = layout.row_top(index).saturating_sub(state.scroll_offset);

            if index == state.selection {
                pass.fill_rect(
                    Rect::new(layout.list_x, row_top, layout.viewport_width, layout.row_height),
                    Color::Black,
                );
                pass.set_mode(DrawMode::FillWhite);
            } else {
                pass.set_mode(DrawMode::FillBlack);
            }

            if let Some(icon) = self.icon {
                pass.bitmap(icon, icon_x, row_top + (layout.row_height - icon.height) / 2);
            }

            pass.text(
                name,
                self.font,
                text_x,
                row_top + (layout.row_height - text_height) / 2,
            );
        }
    }
}
