//! Pixel Buffer Management
//!
//! Provides the core in-memory image type for imgprep. Samples are `f32`,
//! conventionally in [0, 1], stored planar: one full `width × height` plane
//! per channel, each plane row-major.

use crate::error::{PrepError, Result};

// ============================================================================
// Constants
// ============================================================================

/// Channel count of a grayscale buffer
pub const GRAY_CHANNELS: usize = 1;

/// Channel count of an RGB buffer
pub const RGB_CHANNELS: usize = 3;

// ============================================================================
// Pixel Buffer
// ============================================================================

/// Owned planar image buffer.
///
/// `samples.len() == width * height * channels` holds for every buffer that
/// can be constructed; transforms that change the shape build a new buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    channels: usize,
    samples: Vec<f32>,
}

impl PixelBuffer {
    /// Create a zero-filled buffer.
    ///
    /// # Errors
    /// * `Shape` - if any dimension is zero or `channels` is not 1 or 3
    pub fn new(width: usize, height: usize, channels: usize) -> Result<Self> {
        Self::check_shape(width, height, channels)?;
        Ok(Self {
            width,
            height,
            channels,
            samples: vec![0.0; width * height * channels],
        })
    }

    /// Wrap existing planar samples.
    ///
    /// # Errors
    /// * `Shape` - if the shape is invalid or the sample count does not match
    pub fn from_samples(
        width: usize,
        height: usize,
        channels: usize,
        samples: Vec<f32>,
    ) -> Result<Self> {
        Self::check_shape(width, height, channels)?;
        let expected = width * height * channels;
        if samples.len() != expected {
            return Err(PrepError::shape(
                "buffer",
                format!(
                    "{}x{}x{} needs {} samples, got {}",
                    width,
                    height,
                    channels,
                    expected,
                    samples.len()
                ),
            ));
        }
        Ok(Self {
            width,
            height,
            channels,
            samples,
        })
    }

    /// Build a buffer whose shape the caller has already validated.
    ///
    /// Used by transforms that derive the output shape from a valid input.
    pub(crate) fn from_raw_parts(
        width: usize,
        height: usize,
        channels: usize,
        samples: Vec<f32>,
    ) -> Self {
        debug_assert!(width > 0 && height > 0);
        debug_assert_eq!(samples.len(), width * height * channels);
        Self {
            width,
            height,
            channels,
            samples,
        }
    }

    /// Create a buffer with every sample set to `value`.
    pub fn filled(width: usize, height: usize, channels: usize, value: f32) -> Result<Self> {
        let mut buffer = Self::new(width, height, channels)?;
        buffer.samples.fill(value);
        Ok(buffer)
    }

    fn check_shape(width: usize, height: usize, channels: usize) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(PrepError::shape(
                "buffer",
                format!("dimensions must be positive, got {}x{}", width, height),
            ));
        }
        if channels != GRAY_CHANNELS && channels != RGB_CHANNELS {
            return Err(PrepError::shape(
                "buffer",
                format!("expected 1 or 3 channels, got {}", channels),
            ));
        }
        Ok(())
    }

    /// Image width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of channels (1 or 3)
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// True for single-channel buffers
    pub fn is_grayscale(&self) -> bool {
        self.channels == GRAY_CHANNELS
    }

    /// Number of pixels in one channel plane
    pub fn plane_len(&self) -> usize {
        self.width * self.height
    }

    /// All samples, planar
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// All samples, planar (mutable)
    pub fn samples_mut(&mut self) -> &mut [f32] {
        &mut self.samples
    }

    /// Consume the buffer, returning its samples
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    /// Borrow one channel plane.
    ///
    /// # Panics
    /// Panics if `channel >= self.channels()`.
    pub fn channel(&self, channel: usize) -> &[f32] {
        let len = self.plane_len();
        &self.samples[channel * len..(channel + 1) * len]
    }

    /// Borrow one channel plane mutably.
    ///
    /// # Panics
    /// Panics if `channel >= self.channels()`.
    pub fn channel_mut(&mut self, channel: usize) -> &mut [f32] {
        let len = self.plane_len();
        &mut self.samples[channel * len..(channel + 1) * len]
    }

    #[inline]
    fn index(&self, x: usize, y: usize, c: usize) -> usize {
        c * self.plane_len() + y * self.width + x
    }

    /// Sample at (x, y, c). Coordinates must be in range.
    #[inline]
    pub fn get(&self, x: usize, y: usize, c: usize) -> f32 {
        self.samples[self.index(x, y, c)]
    }

    /// Set the sample at (x, y, c). Coordinates must be in range.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, c: usize, value: f32) {
        let i = self.index(x, y, c);
        self.samples[i] = value;
    }

    /// Sample at signed coordinates, clamped to the nearest edge pixel.
    #[inline]
    pub fn get_clamped(&self, x: isize, y: isize, c: usize) -> f32 {
        let x = x.clamp(0, self.width as isize - 1) as usize;
        let y = y.clamp(0, self.height as isize - 1) as usize;
        self.get(x, y, c)
    }

    /// Clamp every sample into [0, 1] in place.
    pub fn clamp(&mut self) {
        for sample in self.samples.iter_mut() {
            *sample = sample.clamp(0.0, 1.0);
        }
    }

    /// Check whether all samples are finite
    pub fn is_finite(&self) -> bool {
        self.samples.iter().all(|s| s.is_finite())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zeroed() {
        let buffer = PixelBuffer::new(4, 3, 3).unwrap();
        assert_eq!(buffer.samples().len(), 36);
        assert!(buffer.samples().iter().all(|&s| s == 0.0));
        assert!(!buffer.is_grayscale());
    }

    #[test]
    fn test_rejects_bad_shapes() {
        assert!(PixelBuffer::new(0, 3, 1).is_err());
        assert!(PixelBuffer::new(3, 3, 2).is_err());
        let err = PixelBuffer::from_samples(2, 2, 1, vec![0.0; 3]).unwrap_err();
        assert_eq!(err.error_code(), "SHAPE_ERROR");
    }

    #[test]
    fn test_planar_layout() {
        let samples: Vec<f32> = (0..12).map(|i| i as f32).collect();
        let buffer = PixelBuffer::from_samples(2, 2, 3, samples).unwrap();
        assert_eq!(buffer.get(0, 0, 0), 0.0);
        assert_eq!(buffer.get(1, 0, 0), 1.0);
        assert_eq!(buffer.get(0, 1, 0), 2.0);
        assert_eq!(buffer.get(0, 0, 1), 4.0);
        assert_eq!(buffer.get(1, 1, 2), 11.0);
        assert_eq!(buffer.channel(2), &[8.0, 9.0, 10.0, 11.0]);
    }

    #[test]
    fn test_get_clamped() {
        let buffer = PixelBuffer::from_samples(2, 2, 1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(buffer.get_clamped(-5, -1, 0), 1.0);
        assert_eq!(buffer.get_clamped(7, 0, 0), 2.0);
        assert_eq!(buffer.get_clamped(1, 9, 0), 4.0);
    }

    #[test]
    fn test_clamp() {
        let mut buffer = PixelBuffer::from_samples(3, 1, 1, vec![-0.5, 0.5, 1.5]).unwrap();
        buffer.clamp();
        assert_eq!(buffer.samples(), &[0.0, 0.5, 1.0]);
    }
}
