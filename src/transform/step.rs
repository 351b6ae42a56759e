//! Configurable transform steps
//!
//! `TransformStep` is the serialized form of one entry in a tier's
//! transform sequence. `build` turns it into a boxed `Transform`.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::transform::color::Grayscale;
use crate::transform::convolve::Convolve;
use crate::transform::denoise::{DenoiseConfig, NoiseSuppressor};
use crate::transform::kernel::KernelSpec;
use crate::transform::resize::{Resize, ResizeMethod};
use crate::transform::threshold::{Clamp, Threshold};
use crate::transform::Transform;

/// One configured transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TransformStep {
    Grayscale,
    Denoise(DenoiseConfig),
    Resize {
        width: usize,
        height: usize,
        #[serde(default)]
        method: ResizeMethod,
    },
    Convolve {
        kernel: KernelSpec,
        #[serde(default = "default_preserve")]
        preserve_channels: bool,
    },
    Threshold {
        cutoff: f32,
    },
    Clamp,
}

fn default_preserve() -> bool {
    true
}

impl TransformStep {
    /// Square bilinear resize
    pub fn resize_to(size: usize) -> Self {
        TransformStep::Resize {
            width: size,
            height: size,
            method: ResizeMethod::Bilinear,
        }
    }

    /// Materialise the step.
    ///
    /// # Errors
    /// * `Config` - if a parameter is out of range
    /// * `Shape` - if a custom kernel is malformed
    pub fn build(&self) -> Result<Box<dyn Transform>> {
        Ok(match self {
            TransformStep::Grayscale => Box::new(Grayscale),
            TransformStep::Denoise(config) => Box::new(NoiseSuppressor::new(config.clone())?),
            TransformStep::Resize {
                width,
                height,
                method,
            } => Box::new(Resize::new(*width, *height, *method)?),
            TransformStep::Convolve {
                kernel,
                preserve_channels,
            } => Box::new(Convolve::new(kernel.clone(), *preserve_channels)?),
            TransformStep::Threshold { cutoff } => Box::new(Threshold::new(*cutoff)?),
            TransformStep::Clamp => Box::new(Clamp),
        })
    }

    /// Whether the step requires single-channel input
    pub fn requires_grayscale(&self) -> bool {
        matches!(self, TransformStep::Denoise(_))
    }

    /// Whether the step always produces single-channel output
    pub fn produces_grayscale(&self) -> bool {
        match self {
            TransformStep::Grayscale => true,
            TransformStep::Convolve {
                kernel,
                preserve_channels,
            } => {
                // Only single-channel kernels collapse
                !preserve_channels
                    && !matches!(kernel, KernelSpec::Custom { channels, .. } if *channels != 1)
            }
            _ => false,
        }
    }
}
