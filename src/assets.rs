//! Image registry
//!
//! Sprites reference images by string key. The `AssetStore` maps those keys
//! to backend-neutral image descriptions; the host turns a description into
//! whatever its renderer draws (a filled rectangle, a decoded texture).
//! The store is owned by the `Game` and passed by reference.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::info;

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba { r, g, b, a }
    }
}

/// An image the host knows how to draw.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageDesc {
    /// Flat colored rectangle, used for placeholder art.
    Solid { width: u32, height: u32, color: Rgba },
    /// Image file decoded by the host.
    File { path: PathBuf, width: u32, height: u32 },
}

impl ImageDesc {
    pub fn solid(width: u32, height: u32, color: Rgba) -> Self {
        ImageDesc::Solid {
            width,
            height,
            color,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        match self {
            ImageDesc::Solid { width, height, .. } | ImageDesc::File { width, height, .. } => {
                (*width, *height)
            }
        }
    }
}

/// Key → image lookup.
#[derive(Debug, Clone, Default)]
pub struct AssetStore {
    images: HashMap<String, ImageDesc>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the placeholder images every session starts with.
    pub fn load_defaults(&mut self) {
        self.add_image("player", ImageDesc::solid(48, 48, Rgba::rgb(0, 100, 255)));
        self.add_image("platform", ImageDesc::solid(128, 32, Rgba::rgb(0, 200, 0)));
        self.add_image("background", ImageDesc::solid(800, 600, Rgba::rgb(135, 206, 235)));
        info!("loaded {} default images", self.images.len());
    }

    /// Adds or replaces the image under `key`.
    pub fn add_image(&mut self, key: impl Into<String>, image: ImageDesc) {
        self.images.insert(key.into(), image);
    }

    pub fn image(&self, key: &str) -> Option<&ImageDesc> {
        self.images.get(key)
    }

    pub fn has_image(&self, key: &str) -> bool {
        self.images.contains_key(key)
    }

    /// `(0, 0)` for unknown keys.
    pub fn image_size(&self, key: &str) -> (u32, u32) {
        self.image(key).map(ImageDesc::size).unwrap_or((0, 0))
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_registered() {
        let mut assets = AssetStore::new();
        assets.load_defaults();

        assert!(assets.has_image("player"));
        assert!(assets.has_image("platform"));
        assert!(assets.has_image("background"));
        assert_eq!(assets.image_size("background"), (800, 600));
    }

    #[test]
    fn test_missing_image_is_absent() {
        let assets = AssetStore::new();
        assert!(assets.image("nope").is_none());
        assert_eq!(assets.image_size("nope"), (0, 0));
    }

    #[test]
    fn test_add_image_replaces() {
        let mut assets = AssetStore::new();
        assets.add_image("player", ImageDesc::solid(10, 10, Rgba::rgb(1, 2, 3)));
        assets.add_image(
            "player",
            ImageDesc::File {
                path: PathBuf::from("assets/sprites/player.png"),
                width: 48,
                height: 48,
            },
        );

        assert_eq!(assets.len(), 1);
        assert_eq!(assets.image_size("player"), (48, 48));
    }
}
