//! Image file I/O for imgprep
//!
//! Loads raster files into planar `PixelBuffer`s, writes them back out, and
//! lists the image files in a dataset directory. Decoding and encoding are
//! delegated to the `image` crate; samples are scaled between `u8` and
//! [0, 1] floats at the boundary.

use std::fs;
use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage, RgbImage};
use walkdir::WalkDir;

use crate::engine::buffer::{PixelBuffer, GRAY_CHANNELS, RGB_CHANNELS};
use crate::error::{PrepError, Result};

/// Load an image file into a `PixelBuffer`.
///
/// Grayscale sources (luma, luma-alpha) load as 1 channel; everything else
/// is converted to 3-channel RGB. Alpha is dropped.
///
/// # Errors
/// * `Decode` - if the file is missing, unreadable, or not a supported image
pub fn load_image(path: &Path) -> Result<PixelBuffer> {
    let decoded = image::open(path).map_err(|e| PrepError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
        source: Some(Box::new(e)),
    })?;

    let width = decoded.width() as usize;
    let height = decoded.height() as usize;

    let buffer = if decoded.color().has_color() {
        let rgb = decoded.into_rgb8();
        let plane = width * height;
        let mut samples = vec![0.0; plane * RGB_CHANNELS];
        for (i, pixel) in rgb.pixels().enumerate() {
            for c in 0..RGB_CHANNELS {
                samples[c * plane + i] = u8_to_unit(pixel.0[c]);
            }
        }
        PixelBuffer::from_samples(width, height, RGB_CHANNELS, samples)
    } else {
        let gray = decoded.into_luma8();
        let samples = gray.into_raw().into_iter().map(u8_to_unit).collect();
        PixelBuffer::from_samples(width, height, GRAY_CHANNELS, samples)
    };

    buffer.map_err(|e| PrepError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
        source: None,
    })
}

/// Write a `PixelBuffer` to `path`, creating parent directories.
///
/// The file format follows the path's extension. Samples are clamped to
/// [0, 1] before quantisation to 8 bits; the buffer itself is not modified.
///
/// # Errors
/// * `Write` - if the directory cannot be created or the encoder fails
pub fn save_image(buffer: &PixelBuffer, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;

    let width = buffer.width() as u32;
    let height = buffer.height() as u32;

    let image = if buffer.is_grayscale() {
        let raw: Vec<u8> = buffer.samples().iter().map(|&s| unit_to_u8(s)).collect();
        GrayImage::from_raw(width, height, raw).map(DynamicImage::ImageLuma8)
    } else {
        let plane = buffer.plane_len();
        let mut raw = Vec::with_capacity(plane * RGB_CHANNELS);
        for i in 0..plane {
            for c in 0..RGB_CHANNELS {
                raw.push(unit_to_u8(buffer.samples()[c * plane + i]));
            }
        }
        RgbImage::from_raw(width, height, raw).map(DynamicImage::ImageRgb8)
    };

    let image = image.ok_or_else(|| PrepError::Write {
        path: path.to_path_buf(),
        reason: "failed to create image buffer".to_string(),
        source: None,
    })?;

    image.save(path).map_err(|e| PrepError::Write {
        path: path.to_path_buf(),
        reason: e.to_string(),
        source: Some(Box::new(e)),
    })
}

/// List the files directly under `dir` whose extension matches `extension`
/// (case-insensitive, without the dot).
///
/// A missing directory yields an empty list. Results are sorted by path so
/// that runs are reproducible.
pub fn list_images(dir: &Path, extension: &str) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
                .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| PrepError::Write {
                path: path.to_path_buf(),
                reason: format!("failed to create {}: {}", parent.display(), e),
                source: Some(Box::new(e)),
            })?;
        }
    }
    Ok(())
}

#[inline]
fn u8_to_unit(v: u8) -> f32 {
    v as f32 / 255.0
}

#[inline]
fn unit_to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

// ============================================================================
// Tests
// ============================================================================
