//! Image Transform Library
//!
//! Pixel-level transforms over `PixelBuffer`. All transforms implement the
//! `Transform` trait; `TransformChain` runs a configured sequence of them.

mod chain;
mod color;
mod convolve;
mod denoise;
mod kernel;
mod resize;
mod step;
mod threshold;
#[allow(clippy::module_inception)]
mod transform;

pub use chain::TransformChain;
pub use color::{to_grayscale, Grayscale, LUMA_WEIGHTS};
pub use convolve::{convolve, Convolve};
pub use denoise::{
    suppress_noise, DenoiseConfig, NoiseSuppressor, DEFAULT_UPSAMPLE_FACTOR, MAX_UPSAMPLE_FACTOR,
};
pub use kernel::{Kernel, KernelSpec};
pub use resize::{bilinear_resize, nearest_resize, Resize, ResizeMethod};
pub use step::TransformStep;
pub use threshold::{threshold_binarize, Clamp, Threshold, DEFAULT_CUTOFF};
pub use transform::Transform;
