//! src/library_view.rs
//! ============================================================================
//! # `LibraryView`: the ROM library screen
//!
//! Owns the entry store, the selection/scroll state and the cached icon and
//! font. The host drives it with three calls:
//!
//! - [`LibraryView::show`] whenever the screen becomes visible: rebuilds the
//!   list from the games folder and resets the selection;
//! - [`LibraryView::update`] once per tick with the buttons pressed since the
//!   previous tick: returns the frame to draw;
//! - drop, which releases the entries and cached assets.

use std::path::PathBuf;

use tracing::{debug, info, instrument, warn};

use crate::{
    config::Config,
    controller::{
        input::Buttons,
        selection::{LaunchRequest, SelectionController},
    },
    fs::populator::{self, RomFilter},
    host::{AssetLoader, FileLister, GameLauncher},
    model::{
        entry_store::EntryStore,
        view_state::{Layout, ViewState},
    },
    view::{
        draw::{Bitmap, DrawList, Font},
        renderer::LibraryRenderer,
    },
};

pub struct LibraryView<L: GameLauncher> {
    launcher: L,
    store: EntryStore,
    state: ViewState,
    icon: Option<Bitmap>,
    font: Option<Font>,
    layout: Layout,
    games_dir: PathBuf,
    filter: RomFilter,
    controller: SelectionController,
    empty_message: String,
}

impl<L: GameLauncher> LibraryView<L> {
    /// Builds the view and loads its assets once. Missing assets are logged
    /// and the view renders without them.
    pub fn new<A: AssetLoader + ?Sized>(launcher: L, assets: &mut A, config: &Config) -> Self {
        let library = &config.library;
        let layout = config.layout.sanitized();

        let icon = assets.load_bitmap(&library.icon_asset);
        if icon.is_none() {
            warn!(
                marker = "ASSET_MISSING",
                asset = %library.icon_asset,
                "Row icon unavailable, rows are drawn without it"
            );
        }

        let font = assets.load_font(&library.font_asset);
        if font.is_none() {
            warn!(
                marker = "ASSET_MISSING",
                asset = %library.font_asset,
                "Font unavailable, falling back to the surface default"
            );
        }

        info!(
            marker = "LIBRARY_VIEW_CREATED",
            games_dir = %library.games_dir.display(),
            rom_suffix = %library.rom_suffix,
            "Library view created"
        );

        Self {
            launcher,
            store: EntryStore::new(),
            state: ViewState::default(),
            icon,
            font,
            controller: SelectionController::new(&library.launch_prefix, &layout),
            layout,
            games_dir: library.games_dir.clone(),
            filter: RomFilter::new(library.rom_suffix.as_str()),
            empty_message: library.empty_message.clone(),
        }
    }

    /// Screen became visible: drop the old list, rescan, reset selection.
    /// Returns the number of ROMs found.
    #[instrument(level = "debug", skip_all, fields(games_dir = %self.games_dir.display()))]
    pub fn show<F: FileLister + ?Sized>(&mut self, lister: &F) -> usize {
        self.store.clear_all();
        self.state.reset();

        let found = populator::populate(lister, &self.games_dir, &self.filter, &mut self.store);
        debug!(found, "Library view shown");
        found
    }

    /// One tick: apply `buttons`, forward a confirmed launch to the launcher,
    /// and return the frame.
    pub fn update(&mut self, buttons: Buttons) -> DrawList {
        if let Some(LaunchRequest { path }) =
            self.controller.update(&mut self.state, buttons, &self.store)
        {
            self.launcher.activate(&path);
        }

        self.draw()
    }

    /// Renders the current state without applying input.
    pub fn draw(&self) -> DrawList {
        LibraryRenderer {
            layout: &self.layout,
            icon: self.icon.as_ref(),
            font: self.font.as_ref(),
            empty_message: &self.empty_message,
        }
        .render(&self.store, &self.state)
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    pub fn icon(&self) -> Option<&Bitmap> {
        self.icon.as_ref()
    }

    pub fn font(&self) -> Option<&Font> {
        self.font.as_ref()
    }

    /// Filename under the highlight, if the list is not empty.
    pub fn selected_entry(&self) -> Option<&str> {
        self.store.get(self.state.selection)
    }
}

impl<L: GameLauncher> Drop for LibraryView<L> {
    fn drop(&mut self) {
        debug!(
            marker = "LIBRARY_VIEW_DESTROYED",
            entries = self.store.len(),
            icon_loaded = self.icon.is_some(),
            font_loaded = self.font.is_some(),
            "Library view destroyed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        controller::input::Button,
        error::AppError,
        host::Names,
        view::draw::DrawCommand,
    };
    use compact_str::CompactString;
    use std::{cell::RefCell, path::Path};

    #[derive(Default)]
    struct RecordingLauncher {
        launched: Vec<String>,
    }

    impl GameLauncher for RecordingLauncher {
        fn activate(&mut self, path: &str) {
            self.launched.push(path.to_string());
        }
    }

    #[derive(Default)]
    struct CountingAssets {
        bitmap_loads: usize,
        font_loads: usize,
        available: bool,
    }

    impl AssetLoader for CountingAssets {
        fn load_bitmap(&mut self, name: &str) -> Option<Bitmap> {
            self.bitmap_loads += 1;
            self.available.then(|| Bitmap {
                name: CompactString::new(name),
                width: 16,
                height: 16,
            })
        }

        fn load_font(&mut self, name: &str) -> Option<Font> {
            self.font_loads += 1;
            self.available.then(|| Font {
                name: CompactString::new(name),
                height: 14,
            })
        }
    }

    /// Lister whose directory contents can change between activations.
    #[derive(Default)]
    struct SwappableLister {
        names: RefCell<Option<Vec<&'static str>>>,
    }

    impl SwappableLister {
        fn set(&self, names: Option<Vec<&'static str>>) {
            *self.names.borrow_mut() = names;
        }
    }

    impl FileLister for SwappableLister {
        fn list_files(&self, dir: &Path) -> Result<Names<'_>, AppError> {
            match self.names.borrow().clone() {
                Some(names) => Ok(Box::new(names.into_iter().map(str::to_owned))),
                None => Err(AppError::NotFound(dir.to_path_buf())),
            }
        }
    }

    fn view_with(available: bool) -> (LibraryView<RecordingLauncher>, CountingAssets) {
        let mut assets = CountingAssets {
            available,
            ..CountingAssets::default()
        };
        let view = LibraryView::new(RecordingLauncher::default(), &mut assets, &Config::default());
        (view, assets)
    }

    #[test]
    fn test_assets_loaded_once() {
        let (mut view, assets) = view_with(true);
        let lister = SwappableLister::default();

        view.show(&lister);
        view.show(&lister);
        view.update(Buttons::NONE);

        assert_eq!(assets.bitmap_loads, 1);
        assert_eq!(assets.font_loads, 1);
        assert_eq!(view.icon().map(|b| b.name.as_str()), Some("images/browser-icon"));
        assert_eq!(view.font().map(|f| f.height), Some(14));
    }

    #[test]
    fn test_rebuild_matches_each_listing() {
        let (mut view, _) = view_with(true);
        let lister = SwappableLister::default();

        lister.set(None);
        assert_eq!(view.show(&lister), 0);
        assert!(view.store().is_empty());

        lister.set(Some(vec!["mario.gb", "notes.txt", "tetris.gb", ".hidden.gb", "a.GB"]));
        assert_eq!(view.show(&lister), 2);
        assert_eq!(view.store().iter().collect::<Vec<_>>(), vec!["mario.gb", "tetris.gb"]);

        lister.set(Some(vec![]));
        assert_eq!(view.show(&lister), 0);
        assert!(view.store().is_empty());

        lister.set(Some(vec!["zelda.gb"]));
        assert_eq!(view.show(&lister), 1);
        assert_eq!(view.store().len(), 1);
    }

    #[test]
    fn test_show_resets_view_state() {
        let (mut view, _) = view_with(true);
        let lister = SwappableLister::default();
        lister.set(Some(vec![
            "a.gb", "b.gb", "c.gb", "d.gb", "e.gb", "f.gb", "g.gb", "h.gb",
        ]));

        view.show(&lister);
        for _ in 0..7 {
            view.update(Button::Down.into());
        }
        assert_eq!(view.state().selection, 7);
        assert!(view.state().scroll_offset > 0);

        view.show(&lister);
        assert_eq!(*view.state(), ViewState::default());
        assert_eq!(view.selected_entry(), Some("a.gb"));
    }

    #[test]
    fn test_confirm_launches_once_with_prefixed_path() {
        let (mut view, _) = view_with(true);
        let lister = SwappableLister::default();
        lister.set(Some(vec!["a.gb", "b.gb", "c.gb"]));
        view.show(&lister);

        view.update(Button::Down.into());
        view.update(Button::Down.into());
        view.update(Button::A.into());
        view.update(Buttons::NONE);

        assert_eq!(view.launcher().launched, vec!["games/c.gb".to_string()]);
    }

    #[test]
    fn test_confirm_on_empty_library_is_noop() {
        let (mut view, _) = view_with(true);
        let lister = SwappableLister::default();
        view.show(&lister);

        let frame = view.update(Button::A | Button::Down);

        assert!(view.launcher().launched.is_empty());
        assert!(
            frame
                .iter()
                .any(|c| matches!(c, DrawCommand::DrawText { text, .. } if text.starts_with("Place your .gb files")))
        );
    }

    #[test]
    fn test_missing_assets_still_render_rows() {
        let (mut view, _) = view_with(false);
        let lister = SwappableLister::default();
        lister.set(Some(vec!["a.gb", "b.gb"]));
        view.show(&lister);

        let frame = view.update(Buttons::NONE);

        assert!(view.icon().is_none());
        assert!(view.font().is_none());
        assert!(!frame.iter().any(|c| matches!(c, DrawCommand::DrawBitmap { .. })));
        assert_eq!(
            frame
                .iter()
                .filter(|c| matches!(c, DrawCommand::DrawText { font: None, .. }))
                .count(),
            2
        );
    }

    #[test]
    fn test_borrowed_launcher() {
        let mut launcher = RecordingLauncher::default();
        {
            let mut assets = CountingAssets::default();
            let mut view = LibraryView::new(&mut launcher, &mut assets, &Config::default());
            let lister = SwappableLister::default();
            lister.set(Some(vec!["kirby.gb"]));
            view.show(&lister);
            view.update(Button::A.into());
        }
        assert_eq!(launcher.launched, vec!["games/kirby.gb".to_string()]);
    }
}
