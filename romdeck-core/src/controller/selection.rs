//! src/controller/selection.rs
//! ============================================================================
//! # Selection & Scroll Controller
//!
//! Applies one tick of input to the [`ViewState`]: clamped up/down movement,
//! launch on `A`, then scroll correction so the selected row ends up fully
//! inside the viewport with the smallest possible scroll change.

use tracing::{debug, info};

use crate::{
    controller::input::{Button, Buttons},
    model::{
        entry_store::EntryStore,
        view_state::{Layout, ViewState},
    },
};

/// Path of the ROM the user confirmed, ready for the host launcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionController {
    /// Empty, or a directory prefix ending in exactly one `/`.
    launch_prefix: String,
    row_height: i32,
    viewport_height: i32,
}

impl SelectionController {
    pub fn new(launch_prefix: &str, layout: &Layout) -> Self {
        let trimmed = launch_prefix.trim_end_matches('/');
        let launch_prefix = if trimmed.is_empty() {
            String::new()
        } else {
            format!("{trimmed}/")
        };

        Self {
            launch_prefix,
            row_height: layout.row_height,
            viewport_height: layout.viewport_height,
        }
    }

    pub fn launch_prefix(&self) -> &str {
        &self.launch_prefix
    }

    /// Launch prefix followed by `name`.
    #[must_use]
    pub fn launch_path(&self, name: &str) -> String {
        let mut path = String::with_capacity(self.launch_prefix.len() + name.len());
        path.push_str(&self.launch_prefix);
        path.push_str(name);
        path
    }

    /// Runs one tick. Buttons apply in the order Down, Up, A; scroll
    /// correction runs afterwards regardless of input.
    pub fn update(
        &self,
        state: &mut ViewState,
        buttons: Buttons,
        store: &EntryStore,
    ) -> Option<LaunchRequest> {
        let Some(last) = store.last_index() else {
            state.reset();
            return None;
        };

        let previous = state.selection;
        state.selection = state.selection.min(last);

        if buttons.contains(Button::Down) {
            state.selection = (state.selection + 1).min(last);
        }

        if buttons.contains(Button::Up) {
            state.selection = state.selection.saturating_sub(1);
        }

        if state.selection != previous {
            debug!(
                marker = "SELECTION_CHANGED",
                from = previous,
                to = state.selection,
                "Selection moved"
            );
        }

        let launch = if buttons.contains(Button::A) {
            store.get(state.selection).map(|name| {
                let path = self.launch_path(name);
                info!(
                    marker = "LAUNCH_REQUESTED",
                    operation_type = "launch",
                    index = state.selection,
                    "Launching {}",
                    path
                );
                LaunchRequest { path }
            })
        } else {
            None
        };

        self.correct_scroll(state);
        launch
    }

    /// Moves `scroll_offset` just enough to fully reveal the selected row.
    pub fn correct_scroll(&self, state: &mut ViewState) {
        let line_top = i32::try_from(state.selection)
            .map_or(i32::MAX, |i| i.saturating_mul(self.row_height));
        let line_bottom = line_top.saturating_add(self.row_height);
        let scroll_bottom = state.scroll_offset.saturating_add(self.viewport_height);

        if state.scroll_offset > line_top {
            state.scroll_offset = line_top;
        } else if scroll_bottom < line_bottom {
            state.scroll_offset += line_bottom - scroll_bottom;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_of(names: &[&str]) -> EntryStore {
        let mut store = EntryStore::new();
        store.extend(names.iter().copied());
        store
    }

    fn numbered_store(count: usize) -> EntryStore {
        let mut store = EntryStore::new();
        for i in 0..count {
            store.append(&format!("rom{i:02}.gb"));
        }
        store
    }

    fn controller() -> SelectionController {
        SelectionController::new("games/", &Layout::default())
    }

    #[test]
    fn test_down_presses_clamp_without_scrolling() {
        let store = store_of(&["a.gb", "b.gb", "c.gb"]);
        let controller = controller();
        let mut state = ViewState::default();

        for _ in 0..6 {
            controller.update(&mut state, Button::Down.into(), &store);
        }

        assert_eq!(state.selection, 2);
        assert_eq!(state.scroll_offset, 0);
    }

    #[test]
    fn test_up_clamps_at_zero() {
        let store = store_of(&["a.gb", "b.gb"]);
        let controller = controller();
        let mut state = ViewState::default();

        controller.update(&mut state, Button::Up.into(), &store);
        assert_eq!(state.selection, 0);
    }

    #[test]
    fn test_scroll_follows_selection_both_ways() {
        let store = numbered_store(10);
        let controller = controller();
        let mut state = ViewState::default();

        for _ in 0..9 {
            controller.update(&mut state, Button::Down.into(), &store);
        }
        // Row 9 spans 324..360; bottom aligned to the 240px viewport.
        assert_eq!(state.selection, 9);
        assert_eq!(state.scroll_offset, 120);

        for _ in 0..3 {
            controller.update(&mut state, Button::Up.into(), &store);
        }
        // Row 6 (216..252) is still inside 120..360.
        assert_eq!(state.scroll_offset, 120);

        for _ in 0..3 {
            controller.update(&mut state, Button::Up.into(), &store);
        }
        // Row 3 starts at 108, above the viewport top.
        assert_eq!(state.selection, 3);
        assert_eq!(state.scroll_offset, 108);
    }

    #[test]
    fn test_selected_row_always_visible() {
        let store = numbered_store(25);
        let controller = controller();
        let layout = Layout::default();
        let mut state = ViewState::default();

        // Deterministic pseudo-random walk over Up/Down/both/none.
        let mut seed: u32 = 0x1234_5678;
        for _ in 0..500 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let buttons = match (seed >> 16) % 4 {
                0 => Buttons::from(Button::Down),
                1 => Buttons::from(Button::Up),
                2 => Button::Up | Button::Down,
                _ => Buttons::NONE,
            };

            controller.update(&mut state, buttons, &store);

            assert!(state.selection < store.len());
            assert!(state.scroll_offset <= layout.row_top(state.selection));
            assert!(
                state.scroll_offset + layout.viewport_height >= layout.row_bottom(state.selection)
            );
        }
    }

    #[test]
    fn test_correction_is_minimal() {
        let controller = controller();

        // Every visible (selection, offset) pair must be left alone.
        for selection in 0..12 {
            for scroll_offset in 0..=400 {
                let mut state = ViewState {
                    selection,
                    scroll_offset,
                };
                let visible = state.selected_row_visible(&Layout::default());
                controller.correct_scroll(&mut state);

                if visible {
                    assert_eq!(state.scroll_offset, scroll_offset);
                } else {
                    assert!(state.selected_row_visible(&Layout::default()));
                }
            }
        }
    }

    #[test]
    fn test_confirm_builds_prefixed_path() {
        let store = store_of(&["a.gb", "b.gb", "c.gb"]);
        let controller = controller();
        let mut state = ViewState::default();

        controller.update(&mut state, Button::Down.into(), &store);
        let launch = controller.update(&mut state, Button::A.into(), &store);

        assert_eq!(
            launch,
            Some(LaunchRequest {
                path: "games/b.gb".to_string()
            })
        );
    }

    #[test]
    fn test_confirm_applies_after_movement() {
        let store = store_of(&["a.gb", "b.gb"]);
        let controller = controller();
        let mut state = ViewState::default();

        let launch = controller.update(&mut state, Button::Down | Button::A, &store);
        assert_eq!(launch.map(|l| l.path), Some("games/b.gb".to_string()));
    }

    #[test]
    fn test_empty_store_ignores_input() {
        let store = EntryStore::new();
        let controller = controller();
        let mut state = ViewState {
            selection: 4,
            scroll_offset: 72,
        };

        let launch = controller.update(&mut state, Button::Down | Button::A, &store);

        assert_eq!(launch, None);
        assert_eq!(state, ViewState::default());
    }

    #[test]
    fn test_stale_selection_is_clamped() {
        let store = store_of(&["a.gb", "b.gb"]);
        let controller = controller();
        let mut state = ViewState {
            selection: 7,
            scroll_offset: 0,
        };

        let launch = controller.update(&mut state, Button::A.into(), &store);
        assert_eq!(state.selection, 1);
        assert_eq!(launch.map(|l| l.path), Some("games/b.gb".to_string()));
    }

    #[test]
    fn test_launch_prefix_normalization() {
        let layout = Layout::default();
        assert_eq!(SelectionController::new("games", &layout).launch_prefix(), "games/");
        assert_eq!(SelectionController::new("games//", &layout).launch_prefix(), "games/");
        assert_eq!(SelectionController::new("", &layout).launch_path("a.gb"), "a.gb");

        let long_name = format!("{}.gb", "n".repeat(512));
        let path = SelectionController::new("games", &layout).launch_path(&long_name);
        assert_eq!(path.len(), "games/".len() + long_name.len());
    }
}
