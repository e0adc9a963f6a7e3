//! src/tui/assets.rs
//! ============================================================================
//! # Built-in terminal assets
//!
//! The terminal cannot show bitmaps or load fonts, so logical asset names are
//! resolved against a fixed table: bitmaps become a single glyph, fonts only
//! contribute their line height to the row layout.

use compact_str::CompactString;
use tracing::{debug, warn};

use crate::{
    error::AppError,
    host::AssetLoader,
    view::draw::{Bitmap, Font},
};

struct BitmapAsset {
    name: &'static str,
    glyph: char,
    width: i32,
    height: i32,
}

const BITMAPS: &[BitmapAsset] = &[BitmapAsset {
    name: "images/browser-icon",
    glyph: '▣',
    width: 16,
    height: 16,
}];

const FONTS: &[(&str, i32)] = &[("fonts/Asheville-Sans-14-Bold", 14)];

/// Glyph for bitmaps missing from the table.
const FALLBACK_GLYPH: char = '■';

/// Terminal glyph standing in for the bitmap `name`.
pub fn glyph_for(name: &str) -> char {
    BITMAPS
        .iter()
        .find(|asset| asset.name == name)
        .map_or(FALLBACK_GLYPH, |asset| asset.glyph)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinAssets;

impl BuiltinAssets {
    fn bitmap(name: &str) -> Result<Bitmap, AppError> {
        BITMAPS
            .iter()
            .find(|asset| asset.name == name)
            .map(|asset| Bitmap {
                name: CompactString::new(asset.name),
                width: asset.width,
                height: asset.height,
            })
            .ok_or_else(|| AppError::asset_unavailable(name, "no such bitmap"))
    }

    fn font(name: &str) -> Result<Font, AppError> {
        FONTS
            .iter()
            .find(|(font_name, _)| *font_name == name)
            .map(|(font_name, height)| Font {
                name: CompactString::new(font_name),
                height: *height,
            })
            .ok_or_else(|| AppError::asset_unavailable(name, "no such font"))
    }
}

impl AssetLoader for BuiltinAssets {
    fn load_bitmap(&mut self, name: &str) -> Option<Bitmap> {
        match Self::bitmap(name) {
            Ok(bitmap) => {
                debug!(asset = name, "Loaded bitmap");
                Some(bitmap)
            }
            Err(e) => {
                warn!(marker = "ASSET_LOAD_FAILED", "{}", e);
                None
            }
        }
    }

    fn load_font(&mut self, name: &str) -> Option<Font> {
        match Self::font(name) {
            Ok(font) => {
                debug!(asset = name, "Loaded font");
                Some(font)
            }
            Err(e) => {
                warn!(marker = "ASSET_LOAD_FAILED", "{}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_assets_resolve() {
        let mut assets = BuiltinAssets;

        let icon = assets.load_bitmap("images/browser-icon").unwrap();
        assert_eq!((icon.width, icon.height), (16, 16));
        assert_eq!(glyph_for(&icon.name), '▣');

        let font = assets.load_font("fonts/Asheville-Sans-14-Bold").unwrap();
        assert_eq!(font.height, 14);
    }

    #[test]
    fn test_unknown_assets_degrade() {
        let mut assets = BuiltinAssets;

        assert!(assets.load_bitmap("images/missing").is_none());
        assert!(assets.load_font("fonts/missing").is_none());
        assert_eq!(glyph_for("images/missing"), FALLBACK_GLYPH);
    }
}
