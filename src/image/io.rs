//! I/O helpers for source images, depth maps and JSON reports.
//!
//! - `load_grayscale_f32`: read a PNG/JPEG/etc. as luma scaled to `[0, 1]`.
//! - `load_channel_f32`: read one RGB channel scaled to `[0, 1]`.
//! - `load_depth_f32`: green channel of colour depth maps, luma otherwise.
//! - `save_grayscale_f32`: write an `ImageF32` to a grayscale PNG.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{ImageF32, ImageView};
use image::{GrayImage, Luma};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk as 8-bit luma and scale it to `[0, 1]`.
pub fn load_grayscale_f32(path: &Path) -> Result<ImageF32, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_luma8();
    let (w, h) = (img.width() as usize, img.height() as usize);
    let data = img.into_raw().into_iter().map(|v| v as f32 / 255.0).collect();
    ImageF32::from_vec(w, h, data)
        .ok_or_else(|| format!("Unexpected buffer size while decoding {}", path.display()))
}

/// Load a single colour channel (0 = red, 1 = green, 2 = blue) scaled to `[0, 1]`.
///
/// Grayscale files are expanded to RGB first, so every channel holds the luma.
pub fn load_channel_f32(path: &Path, channel: usize) -> Result<ImageF32, String> {
    if channel > 2 {
        return Err(format!(
            "Colour channel {channel} out of range for {} (expected 0, 1 or 2)",
            path.display()
        ));
    }
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_rgb8();
    let (w, h) = (img.width() as usize, img.height() as usize);
    let data = img
        .into_raw()
        .chunks_exact(3)
        .map(|px| px[channel] as f32 / 255.0)
        .collect();
    ImageF32::from_vec(w, h, data)
        .ok_or_else(|| format!("Unexpected buffer size while decoding {}", path.display()))
}

/// Load a depth map scaled to `[0, 1]`.
///
/// Colour files contribute their green channel (index 1); single-channel files
/// are read as luma.
pub fn load_depth_f32(path: &Path) -> Result<ImageF32, String> {
    let color = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .color();
    if color.channel_count() >= 3 {
        load_channel_f32(path, 1)
    } else {
        load_grayscale_f32(path)
    }
}

/// Save a float image to a grayscale PNG, mapping `[cmin, cmax]` to `[0, 255]`
/// and clamping everything outside.
pub fn save_grayscale_f32(image: &ImageF32, path: &Path, cmin: f32, cmax: f32) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let range = (cmax - cmin).max(f32::EPSILON);
    let mut out = GrayImage::new(image.w as u32, image.h as u32);
    for (y, row) in image.rows().enumerate() {
        for (x, &px) in row.iter().enumerate() {
            let v = ((px - cmin) / range * 255.0).clamp(0.0, 255.0);
            out.put_pixel(x as u32, y as u32, Luma([v.round() as u8]));
        }
    }
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

/// Create `dir` and any missing parents.
pub fn ensure_dir(dir: &Path) -> Result<(), String> {
    fs::create_dir_all(dir).map_err(|e| format!("Failed to create {}: {e}", dir.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir(parent)?;
        }
    }
    Ok(())
}
