//! Value-range operations: threshold binarization and clamping

use serde_json::{json, Value};

use crate::engine::PixelBuffer;
use crate::error::{PrepError, Result};
use crate::impl_transform_common;
use crate::transform::Transform;

/// Cutoff used by every noise-suppression variant
pub const DEFAULT_CUTOFF: f32 = 0.3;

/// Snap every sample strictly above `cutoff` to 1.0.
///
/// Samples at or below the cutoff are left as they are; they are NOT pulled
/// down to 0. Operates in place on the owned buffer.
pub fn threshold_binarize(mut buffer: PixelBuffer, cutoff: f32) -> PixelBuffer {
    for sample in buffer.samples_mut().iter_mut() {
        if *sample > cutoff {
            *sample = 1.0;
        }
    }
    buffer
}

/// Threshold step
#[derive(Debug, Clone)]
pub struct Threshold {
    cutoff: f32,
}

impl Threshold {
    /// # Errors
    /// * `Config` - if the cutoff is not finite
    pub fn new(cutoff: f32) -> Result<Self> {
        if !cutoff.is_finite() {
            return Err(PrepError::config(format!(
                "threshold cutoff must be finite, got {}",
                cutoff
            )));
        }
        Ok(Self { cutoff })
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_CUTOFF,
        }
    }
}

impl Transform for Threshold {
    impl_transform_common!("threshold");

    fn apply(&self, buffer: PixelBuffer) -> Result<PixelBuffer> {
        Ok(threshold_binarize(buffer, self.cutoff))
    }

    fn describe(&self) -> String {
        format!("threshold(> {})", self.cutoff)
    }

    fn to_json(&self) -> Value {
        json!({ "op": "threshold", "cutoff": self.cutoff })
    }
}

/// Clamp-to-[0, 1] step
#[derive(Debug, Clone, Default)]
pub struct Clamp;

impl Transform for Clamp {
    impl_transform_common!("clamp");

    fn apply(&self, mut buffer: PixelBuffer) -> Result<PixelBuffer> {
        buffer.clamp();
        Ok(buffer)
    }

    fn describe(&self) -> String {
        "clamp".to_string()
    }

    fn to_json(&self) -> Value {
        json!({ "op": "clamp" })
    }
}
