//! Resampling
//!
//! Output pixel `x_out` maps back to source coordinate
//! `(x_out + 0.5) * (old / new) - 0.5` on each axis. Bilinear resampling
//! blends the four surrounding source pixels by fractional distance;
//! nearest-neighbour resampling rounds to the closest one. Neighbour indices
//! are clamped into the source, so both directions of scaling stay in bounds.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::engine::PixelBuffer;
use crate::error::{PrepError, Result};
use crate::impl_transform_common;
use crate::transform::Transform;

/// Interpolation method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeMethod {
    #[default]
    Bilinear,
    Nearest,
}

/// Per-axis sampling tap: two source indices and the weight of the second.
#[derive(Debug, Clone, Copy)]
struct Tap {
    lo: usize,
    hi: usize,
    frac: f32,
}

fn axis_taps(old: usize, new: usize) -> Vec<Tap> {
    let scale = old as f32 / new as f32;
    let max = old as isize - 1;
    (0..new)
        .map(|i| {
            let src = (i as f32 + 0.5) * scale - 0.5;
            let floor = src.floor();
            let lo = floor as isize;
            Tap {
                lo: lo.clamp(0, max) as usize,
                hi: (lo + 1).clamp(0, max) as usize,
                frac: src - floor,
            }
        })
        .collect()
}

fn check_target(operation: &'static str, new_width: usize, new_height: usize) -> Result<()> {
    if new_width == 0 || new_height == 0 {
        return Err(PrepError::shape(
            operation,
            format!("target size must be positive, got {}x{}", new_width, new_height),
        ));
    }
    Ok(())
}

/// Resample `buffer` to `new_width × new_height` with bilinear interpolation.
///
/// Returns an exact copy when the size is unchanged.
///
/// # Errors
/// * `Shape` - if a target dimension is zero
pub fn bilinear_resize(buffer: &PixelBuffer, new_width: usize, new_height: usize) -> Result<PixelBuffer> {
    check_target("bilinear_resize", new_width, new_height)?;
    if new_width == buffer.width() && new_height == buffer.height() {
        return Ok(buffer.clone());
    }

    let xs = axis_taps(buffer.width(), new_width);
    let ys = axis_taps(buffer.height(), new_height);
    let channels = buffer.channels();
    let mut samples = Vec::with_capacity(new_width * new_height * channels);

    for c in 0..channels {
        let plane = buffer.channel(c);
        let row = |y: usize| &plane[y * buffer.width()..(y + 1) * buffer.width()];
        for ty in &ys {
            let (top, bottom) = (row(ty.lo), row(ty.hi));
            for tx in &xs {
                let upper = top[tx.lo] * (1.0 - tx.frac) + top[tx.hi] * tx.frac;
                let lower = bottom[tx.lo] * (1.0 - tx.frac) + bottom[tx.hi] * tx.frac;
                samples.push(upper * (1.0 - ty.frac) + lower * ty.frac);
            }
        }
    }

    Ok(PixelBuffer::from_raw_parts(new_width, new_height, channels, samples))
}

/// Resample `buffer` to `new_width × new_height` by nearest neighbour.
///
/// # Errors
/// * `Shape` - if a target dimension is zero
pub fn nearest_resize(buffer: &PixelBuffer, new_width: usize, new_height: usize) -> Result<PixelBuffer> {
    check_target("nearest_resize", new_width, new_height)?;

    let pick = |tap: &Tap| if tap.frac >= 0.5 { tap.hi } else { tap.lo };
    let xs: Vec<usize> = axis_taps(buffer.width(), new_width).iter().map(pick).collect();
    let ys: Vec<usize> = axis_taps(buffer.height(), new_height).iter().map(pick).collect();
    let channels = buffer.channels();
    let mut samples = Vec::with_capacity(new_width * new_height * channels);

    for c in 0..channels {
        for &y in &ys {
            for &x in &xs {
                samples.push(buffer.get(x, y, c));
            }
        }
    }

    Ok(PixelBuffer::from_raw_parts(new_width, new_height, channels, samples))
}

/// Resize step
#[derive(Debug, Clone)]
pub struct Resize {
    width: usize,
    height: usize,
    method: ResizeMethod,
}

impl Resize {
    /// Create a resize step.
    ///
    /// # Errors
    /// * `Config` - if a target dimension is zero
    pub fn new(width: usize, height: usize, method: ResizeMethod) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PrepError::config(format!(
                "resize target must be positive, got {}x{}",
                width, height
            )));
        }
        Ok(Self {
            width,
            height,
            method,
        })
    }

    /// Target dimensions
    pub fn target(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}

impl Transform for Resize {
    impl_transform_common!("resize");

    fn apply(&self, buffer: PixelBuffer) -> Result<PixelBuffer> {
        match self.method {
            ResizeMethod::Bilinear => bilinear_resize(&buffer, self.width, self.height),
            ResizeMethod::Nearest => nearest_resize(&buffer, self.width, self.height),
        }
    }

    fn describe(&self) -> String {
        format!("resize({}x{}, {:?})", self.width, self.height, self.method)
    }

    fn to_json(&self) -> Value {
        json!({
            "op": "resize",
            "width": self.width,
            "height": self.height,
            "method": self.method,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use test_case::test_case;

    fn ramp(width: usize, height: usize, channels: usize) -> PixelBuffer {
        let n = width * height * channels;
        let samples = (0..n).map(|i| ((i * 37) % 101) as f32 / 100.0).collect();
        PixelBuffer::from_samples(width, height, channels, samples).unwrap()
    }

    #[test]
    fn test_same_size_is_identity() {
        let buffer = ramp(9, 5, 3);
        assert_eq!(bilinear_resize(&buffer, 9, 5).unwrap(), buffer);
    }

    #[test_case(8, 8, 16, 16 ; "upsample square")]
    #[test_case(16, 16, 4, 4 ; "downsample square")]
    #[test_case(7, 3, 20, 2 ; "mixed aspect")]
    #[test_case(1, 1, 5, 5 ; "single pixel")]
    fn test_output_shape(w: usize, h: usize, nw: usize, nh: usize) {
        for channels in [1, 3] {
            let out = bilinear_resize(&ramp(w, h, channels), nw, nh).unwrap();
            assert_eq!((out.width(), out.height(), out.channels()), (nw, nh, channels));
            assert_eq!(out.samples().len(), nw * nh * channels);
        }
    }

    #[test]
    fn test_integer_scale_hits_source_pixels() {
        // 2x downsample of a 4x1 row samples halfway between pixel pairs
        let buffer = PixelBuffer::from_samples(4, 1, 1, vec![0.0, 1.0, 0.2, 0.4]).unwrap();
        let out = bilinear_resize(&buffer, 2, 1).unwrap();
        assert_relative_eq!(out.get(0, 0, 0), 0.5, epsilon = 1e-6);
        assert_relative_eq!(out.get(1, 0, 0), 0.3, epsilon = 1e-6);
    }

    #[test]
    fn test_upsample_interpolates_between_neighbours() {
        let buffer = PixelBuffer::from_samples(2, 1, 1, vec![0.0, 1.0]).unwrap();
        let out = bilinear_resize(&buffer, 4, 1).unwrap();
        // Source coords: -0.25, 0.25, 0.75, 1.25 (edges clamp)
        let expected = [0.0, 0.25, 0.75, 1.0];
        for (x, e) in expected.iter().enumerate() {
            assert_relative_eq!(out.get(x, 0, 0), *e, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_values_stay_within_source_range() {
        let buffer = ramp(5, 5, 1);
        let out = bilinear_resize(&buffer, 23, 17).unwrap();
        assert!(out.samples().iter().all(|&s| (-1e-6..=1.0 + 1e-6).contains(&s)));
    }

    #[test]
    fn test_nearest_picks_existing_samples() {
        let buffer = PixelBuffer::from_samples(2, 1, 1, vec![0.1, 0.9]).unwrap();
        let out = nearest_resize(&buffer, 4, 1).unwrap();
        assert_eq!(out.samples(), &[0.1, 0.1, 0.9, 0.9]);
        assert_eq!(nearest_resize(&buffer, 2, 1).unwrap(), buffer);
    }

    #[test]
    fn test_zero_target_is_shape_error() {
        let err = bilinear_resize(&ramp(2, 2, 1), 0, 4).unwrap_err();
        assert_eq!(err.error_code(), "SHAPE_ERROR");
        assert!(Resize::new(0, 1, ResizeMethod::Bilinear).is_err());
    }
}
