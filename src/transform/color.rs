//! Grayscale conversion

use serde_json::{json, Value};

use crate::engine::{PixelBuffer, GRAY_CHANNELS};
use crate::error::Result;
use crate::impl_transform_common;
use crate::transform::Transform;

/// Rec. 601 luma weights for the R, G, B planes
pub const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

/// Reduce a 3-channel buffer to 1-channel luma.
///
/// Output samples are clamped to [0, 1]. A buffer that is already
/// single-channel is returned untouched.
pub fn to_grayscale(buffer: PixelBuffer) -> PixelBuffer {
    if buffer.is_grayscale() {
        return buffer;
    }

    let (r, g, b) = (buffer.channel(0), buffer.channel(1), buffer.channel(2));
    let samples: Vec<f32> = r
        .iter()
        .zip(g)
        .zip(b)
        .map(|((&r, &g), &b)| {
            (LUMA_WEIGHTS[0] * r + LUMA_WEIGHTS[1] * g + LUMA_WEIGHTS[2] * b).clamp(0.0, 1.0)
        })
        .collect();

    PixelBuffer::from_raw_parts(buffer.width(), buffer.height(), GRAY_CHANNELS, samples)
}

/// Grayscale conversion step
#[derive(Debug, Clone, Default)]
pub struct Grayscale;

impl Transform for Grayscale {
    impl_transform_common!("grayscale");

    fn apply(&self, buffer: PixelBuffer) -> Result<PixelBuffer> {
        Ok(to_grayscale(buffer))
    }

    fn describe(&self) -> String {
        "grayscale".to_string()
    }

    fn to_json(&self) -> Value {
        json!({ "op": "grayscale" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rgb(samples: Vec<f32>, width: usize, height: usize) -> PixelBuffer {
        PixelBuffer::from_samples(width, height, 3, samples).unwrap()
    }

    #[test]
    fn test_luma_weighting() {
        // 2x1: pixel 0 = (1, 0, 0), pixel 1 = (0.2, 0.4, 0.6)
        let buffer = rgb(vec![1.0, 0.2, 0.0, 0.4, 0.0, 0.6], 2, 1);
        let gray = to_grayscale(buffer);

        assert_eq!(gray.channels(), 1);
        assert_eq!((gray.width(), gray.height()), (2, 1));
        assert_relative_eq!(gray.get(0, 0, 0), 0.299, epsilon = 1e-6);
        assert_relative_eq!(
            gray.get(1, 0, 0),
            0.299 * 0.2 + 0.587 * 0.4 + 0.114 * 0.6,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_white_stays_white() {
        let gray = to_grayscale(PixelBuffer::filled(3, 3, 3, 1.0).unwrap());
        assert!(gray.samples().iter().all(|&s| s <= 1.0 && s > 0.999));
    }

    #[test]
    fn test_grayscale_is_idempotent() {
        let samples: Vec<f32> = (0..27).map(|i| (i as f32) / 27.0).collect();
        let once = to_grayscale(rgb(samples, 3, 3));
        let twice = to_grayscale(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_single_channel_passthrough() {
        let buffer = PixelBuffer::from_samples(2, 1, 1, vec![0.1, 1.5]).unwrap();
        assert_eq!(to_grayscale(buffer.clone()), buffer);
    }
}
