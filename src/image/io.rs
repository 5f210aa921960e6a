//! I/O helpers for the command-line tools.
//!
//! - `load_rgba_image`: read a PNG/JPEG/etc. into an owned RGBA buffer.
//! - `save_edge_map`: write an [`EdgeMap`] as a grayscale PNG.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::ImageRgba;
use crate::edges::EdgeMap;
use crate::image::ImageView;
use image::{GrayImage, ImageBuffer, Luma};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Owned, tightly packed RGBA buffer with borrowed view conversion.
#[derive(Clone, Debug)]
pub struct RgbaBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl RgbaBuffer {
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// Image width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Borrow as a read-only `ImageRgba` view
    pub fn as_view(&self) -> ImageRgba<'_> {
        ImageRgba::packed(self.width, self.height, &self.data)
    }
}

/// Load an image from disk and convert to 8-bit RGBA.
pub fn load_rgba_image(path: &Path) -> Result<RgbaBuffer, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_rgba8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    Ok(RgbaBuffer::new(width, height, img.into_raw()))
}

/// Render an edge map as a grayscale buffer (foreground white).
pub fn edge_map_to_gray(map: &EdgeMap) -> Result<GrayImage, String> {
    let mut data = Vec::with_capacity(map.pixel_count());
    for row in map.rows() {
        data.extend_from_slice(row);
    }
    ImageBuffer::<Luma<u8>, Vec<u8>>::from_raw(map.width() as u32, map.height() as u32, data)
        .ok_or_else(|| "Failed to create image buffer".to_string())
}

/// Save an edge map to a PNG.
pub fn save_edge_map(map: &EdgeMap, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    edge_map_to_gray(map)?
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
