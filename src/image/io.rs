//! I/O helpers for RGB images and JSON.
//!
//! - `load_rgb_image`: decode a PNG/JPEG/etc. into an owned `ImageRgb`,
//!   discarding any alpha channel.
//! - `save_rgb_image`: encode an `ImageRgb` (format chosen by extension).
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::ImageRgb;
use image::RgbImage;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk and convert to 8-bit RGB.
pub fn load_rgb_image(path: &Path) -> Result<ImageRgb, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_rgb8();
    let w = img.width() as usize;
    let h = img.height() as usize;
    let data = img.pixels().map(|p| p.0).collect();
    ImageRgb::from_raw(w, h, data)
        .ok_or_else(|| format!("Decoded buffer size mismatch for {}", path.display()))
}

/// Save an RGB image; the encoder is picked from the file extension.
pub fn save_rgb_image(image: &ImageRgb, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let raw: Vec<u8> = image.data.iter().flat_map(|px| px.iter().copied()).collect();
    let out = RgbImage::from_raw(image.w as u32, image.h as u32, raw)
        .ok_or_else(|| "Failed to create image buffer".to_string())?;
    out.save(path)
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
