//! src/host.rs
//! ============================================================================
//! # Host services
//!
//! The library view depends on its host only through these traits: a file
//! lister for the games folder, an asset loader for the row icon and font, an
//! input source, and a launcher that receives the path of the chosen ROM. The
//! drawing side lives in [`crate::view::draw::DrawSurface`].

use std::path::Path;

use crate::{
    controller::input::Buttons,
    error::AppError,
    view::draw::{Bitmap, Font},
};

/// Names found in a directory, without path prefix, in enumeration order.
pub type Names<'a> = Box<dyn Iterator<Item = String> + 'a>;

/// Enumerates a directory.
pub trait FileLister {
    /// Lists the entry names of `dir`. A missing directory is an error here;
    /// callers decide whether that means "no entries".
    fn list_files(&self, dir: &Path) -> Result<Names<'_>, AppError>;
}

/// Loads display assets by logical name. `None` means the asset is
/// unavailable and the caller renders without it.
pub trait AssetLoader {
    fn load_bitmap(&mut self, name: &str) -> Option<Bitmap>;

    fn load_font(&mut self, name: &str) -> Option<Font>;
}

/// Reports the buttons newly pressed since the previous poll.
pub trait InputSource {
    fn poll(&mut self) -> Buttons;
}

/// Receives the path of the ROM the user confirmed.
pub trait GameLauncher {
    fn activate(&mut self, path: &str);
}

impl<T: GameLauncher + ?Sized> GameLauncher for &mut T {
    fn activate(&mut self, path: &str) {
        (**self).activate(path);
    }
}
