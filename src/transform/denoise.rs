//! Noise suppression
//!
//! Upsample → optional Gaussian blur → threshold → downsample. At the
//! enlarged scale anything brighter than the cutoff saturates to white while
//! darker structure passes through untouched; shrinking back to the source
//! size then averages away isolated bright/dark flecks. Only defined for
//! single-channel input.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::engine::PixelBuffer;
use crate::error::{PrepError, Result};
use crate::impl_transform_common;
use crate::transform::convolve::convolve;
use crate::transform::kernel::Kernel;
use crate::transform::resize::bilinear_resize;
use crate::transform::threshold::{threshold_binarize, DEFAULT_CUTOFF};
use crate::transform::Transform;

/// Default upsampling factor
pub const DEFAULT_UPSAMPLE_FACTOR: usize = 4;

/// Largest accepted upsampling factor. The working buffer grows with the
/// square of the factor.
pub const MAX_UPSAMPLE_FACTOR: usize = 64;

/// Noise-suppression parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenoiseConfig {
    /// Integer upsampling factor applied to both axes
    #[serde(default = "default_upsample_factor")]
    pub upsample_factor: usize,
    /// Sigma of the Gaussian blur at the upsampled scale; `None` skips the blur
    #[serde(default)]
    pub blur_sigma: Option<f32>,
    /// Samples strictly above this become 1.0
    #[serde(default = "default_cutoff")]
    pub cutoff: f32,
}

fn default_upsample_factor() -> usize {
    DEFAULT_UPSAMPLE_FACTOR
}

fn default_cutoff() -> f32 {
    DEFAULT_CUTOFF
}

impl Default for DenoiseConfig {
    fn default() -> Self {
        Self {
            upsample_factor: DEFAULT_UPSAMPLE_FACTOR,
            blur_sigma: None,
            cutoff: DEFAULT_CUTOFF,
        }
    }
}

impl DenoiseConfig {
    /// Check parameter ranges.
    ///
    /// # Errors
    /// * `Config` - for a factor outside `1..=MAX_UPSAMPLE_FACTOR`, a
    ///   non-positive sigma, or a non-finite cutoff
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_UPSAMPLE_FACTOR).contains(&self.upsample_factor) {
            return Err(PrepError::config(format!(
                "denoise upsample_factor must be between 1 and {}, got {}",
                MAX_UPSAMPLE_FACTOR, self.upsample_factor
            )));
        }
        if !self.cutoff.is_finite() {
            return Err(PrepError::config(format!(
                "denoise cutoff must be finite, got {}",
                self.cutoff
            )));
        }
        if let Some(sigma) = self.blur_sigma {
            Kernel::gaussian(sigma)?;
        }
        Ok(())
    }
}

/// Noise-suppression step with its blur kernel prebuilt
#[derive(Debug, Clone)]
pub struct NoiseSuppressor {
    config: DenoiseConfig,
    blur: Option<Kernel>,
}

impl NoiseSuppressor {
    /// # Errors
    /// * `Config` - if the parameters are out of range
    pub fn new(config: DenoiseConfig) -> Result<Self> {
        config.validate()?;
        let blur = config.blur_sigma.map(Kernel::gaussian).transpose()?;
        Ok(Self { config, blur })
    }

    pub fn config(&self) -> &DenoiseConfig {
        &self.config
    }

    /// Run the filter on a single-channel buffer.
    ///
    /// The output has the same width, height and channel count as the input.
    ///
    /// # Errors
    /// * `Shape` - if the input has more than one channel, or the upsampled
    ///   size does not fit in memory
    pub fn suppress(&self, buffer: &PixelBuffer) -> Result<PixelBuffer> {
        if !buffer.is_grayscale() {
            return Err(PrepError::shape(
                "denoise",
                format!(
                    "expected a 1-channel buffer, got {} channels (convert to grayscale first)",
                    buffer.channels()
                ),
            ));
        }

        let (w, h) = (buffer.width(), buffer.height());
        let k = self.config.upsample_factor;
        let (big_w, big_h) = w
            .checked_mul(k)
            .zip(h.checked_mul(k))
            .filter(|(bw, bh)| bw.checked_mul(*bh).is_some())
            .ok_or_else(|| {
                PrepError::shape(
                    "denoise",
                    format!("{}x{} upsampled by {} overflows", w, h, k),
                )
            })?;

        let mut work = bilinear_resize(buffer, big_w, big_h)?;
        if let Some(kernel) = &self.blur {
            work = convolve(&work, kernel, true)?;
        }
        let work = threshold_binarize(work, self.config.cutoff);
        bilinear_resize(&work, w, h)
    }
}

impl Default for NoiseSuppressor {
    fn default() -> Self {
        Self {
            config: DenoiseConfig::default(),
            blur: None,
        }
    }
}

/// Run noise suppression with the given parameters.
///
/// # Errors
/// * `Config` - if the parameters are out of range
/// * `Shape` - if the input has more than one channel
pub fn suppress_noise(buffer: &PixelBuffer, config: &DenoiseConfig) -> Result<PixelBuffer> {
    NoiseSuppressor::new(config.clone())?.suppress(buffer)
}

impl Transform for NoiseSuppressor {
    impl_transform_common!("denoise");

    fn apply(&self, buffer: PixelBuffer) -> Result<PixelBuffer> {
        self.suppress(&buffer)
    }

    fn describe(&self) -> String {
        match self.config.blur_sigma {
            Some(sigma) => format!(
                "denoise(x{}, blur σ={}, cutoff={})",
                self.config.upsample_factor, sigma, self.config.cutoff
            ),
            None => format!(
                "denoise(x{}, cutoff={})",
                self.config.upsample_factor, self.config.cutoff
            ),
        }
    }

    fn to_json(&self) -> Value {
        json!({
            "op": "denoise",
            "upsample_factor": self.config.upsample_factor,
            "blur_sigma": self.config.blur_sigma,
            "cutoff": self.config.cutoff,
        })
    }
}
