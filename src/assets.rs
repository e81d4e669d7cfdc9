use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbaImage};
use indexmap::IndexMap;
use log::{debug, info};

/// A decoded, width-scaled image ready to become (or refresh) a float
/// object's pixel buffer.
pub struct LoadedImage {
    pub pixels: RgbaImage,
    pub has_alpha: bool,
}

/// Decode `path` and scale it to `width`, preserving aspect ratio.
///
/// Always a fresh decode of the source file: resize commits must never
/// re-scale the in-memory buffer, or quality loss compounds with every
/// gesture.
pub fn load_image_scaled(path: &str, width: u32) -> Result<LoadedImage> {
    let decoded =
        image::open(path).with_context(|| format!("failed to decode image \"{path}\""))?;

    // Alpha presence is decided by the source channel count, not by file
    // extension.
    let has_alpha = decoded.color().has_alpha();
    let source = decoded.to_rgba8();

    let width = width.max(1);
    let height = ((source.height() as f32 / source.width() as f32) * width as f32)
        .round()
        .max(1.) as u32;
    let pixels = imageops::resize(&source, width, height, FilterType::Triangle);

    debug!(
        "Decoded \"{}\" ({}x{}, alpha: {}) scaled to {}x{}",
        path,
        source.width(),
        source.height(),
        has_alpha,
        width,
        height
    );

    Ok(LoadedImage { pixels, has_alpha })
}

/// Importable images found in the assets directory, keyed by file stem and
/// kept in a stable (name-sorted) order so the preview window's number keys
/// map predictably.
pub struct AssetCatalog {
    entries: IndexMap<String, PathBuf>,
}

impl AssetCatalog {
    pub fn empty() -> Self {
        AssetCatalog {
            entries: IndexMap::new(),
        }
    }

    pub fn scan(dir: &Path) -> Result<Self> {
        let mut found: Vec<(String, PathBuf)> = Vec::new();

        for entry in fs::read_dir(dir)
            .with_context(|| format!("failed to read assets directory {:?}", dir))?
        {
            let path = entry?.path();
            if !path.is_file() || ImageFormat::from_path(&path).is_err() {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            found.push((stem.to_string(), path.clone()));
        }

        found.sort_by(|a, b| a.0.cmp(&b.0));

        let entries: IndexMap<String, PathBuf> = found.into_iter().collect();
        info!("Found {} importable images in {:?}", entries.len(), dir);

        Ok(AssetCatalog { entries })
    }

    pub fn get(&self, index: usize) -> Option<(&str, &Path)> {
        self.entries
            .get_index(index)
            .map(|(name, path)| (name.as_str(), path.as_path()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_detected_by_channel_count() {
        let dir = tempfile::tempdir().unwrap();
        let rgba_path = dir.path().join("badge.png");
        let rgb_path = dir.path().join("photo.png");
        test_images::write_rgba_png(&rgba_path, 40, 20);
        test_images::write_rgb_png(&rgb_path, 40, 20);

        let with_alpha = load_image_scaled(rgba_path.to_str().unwrap(), 40).unwrap();
        let without = load_image_scaled(rgb_path.to_str().unwrap(), 40).unwrap();
        assert!(with_alpha.has_alpha);
        assert!(!without.has_alpha);
    }

    #[test]
    fn test_resize_by_width_preserves_aspect() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        test_images::write_rgb_png(&path, 200, 100);

        let loaded = load_image_scaled(path.to_str().unwrap(), 50).unwrap();
        assert_eq!(loaded.pixels.dimensions(), (50, 25));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load_image_scaled("/nonexistent/no.png", 50).is_err());
    }

    #[test]
    fn test_catalog_scan_orders_by_name() {
        let dir = tempfile::tempdir().unwrap();
        test_images::write_rgb_png(&dir.path().join("zebra.png"), 8, 8);
        test_images::write_rgb_png(&dir.path().join("apple.png"), 8, 8);
        fs::write(dir.path().join("notes.txt"), "not an image").unwrap();

        let catalog = AssetCatalog::scan(dir.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(0).unwrap().0, "apple");
        assert_eq!(catalog.get(1).unwrap().0, "zebra");
        assert!(catalog.get(2).is_none());
    }
}
