//! 2D convolution (correlation form)
//!
//! Borders are handled by edge clamping: a kernel tap that falls outside
//! the image reads the nearest edge pixel.

use serde_json::{json, Value};

use crate::engine::{PixelBuffer, GRAY_CHANNELS};
use crate::error::{PrepError, Result};
use crate::impl_transform_common;
use crate::transform::kernel::{Kernel, KernelSpec};
use crate::transform::Transform;

/// Correlate `buffer` with `kernel`.
///
/// The kernel must have one channel or exactly `buffer.channels()`.
/// A single-channel kernel with `preserve_channels == false` sums the
/// per-channel responses into one output channel; every other combination
/// keeps the input channel count, pairing kernel channel `c` (or the only
/// kernel channel) with image channel `c`.
///
/// # Errors
/// * `Shape` - if the kernel channel count fits neither rule
pub fn convolve(buffer: &PixelBuffer, kernel: &Kernel, preserve_channels: bool) -> Result<PixelBuffer> {
    let in_channels = buffer.channels();
    if kernel.channels() != 1 && kernel.channels() != in_channels {
        return Err(PrepError::shape(
            "convolve",
            format!(
                "kernel has {} channels, image has {}",
                kernel.channels(),
                in_channels
            ),
        ));
    }

    let collapse = !preserve_channels && kernel.channels() == 1;
    let out_channels = if collapse { GRAY_CHANNELS } else { in_channels };

    let (width, height) = (buffer.width(), buffer.height());
    let mut samples = vec![0.0; width * height * out_channels];

    for y in 0..height {
        for x in 0..width {
            if collapse {
                let mut acc = 0.0;
                for c in 0..in_channels {
                    acc += correlate_at(buffer, kernel, x, y, c, 0);
                }
                samples[y * width + x] = acc;
            } else {
                for c in 0..out_channels {
                    let kc = if kernel.channels() == 1 { 0 } else { c };
                    samples[c * width * height + y * width + x] =
                        correlate_at(buffer, kernel, x, y, c, kc);
                }
            }
        }
    }

    Ok(PixelBuffer::from_raw_parts(width, height, out_channels, samples))
}

#[inline]
fn correlate_at(buffer: &PixelBuffer, kernel: &Kernel, x: usize, y: usize, c: usize, kc: usize) -> f32 {
    let half_w = (kernel.width() / 2) as isize;
    let half_h = (kernel.height() / 2) as isize;
    let mut acc = 0.0;
    for ky in 0..kernel.height() {
        let sy = y as isize + ky as isize - half_h;
        for kx in 0..kernel.width() {
            let sx = x as isize + kx as isize - half_w;
            acc += kernel.get(kx, ky, kc) * buffer.get_clamped(sx, sy, c);
        }
    }
    acc
}

/// Convolution step
#[derive(Debug, Clone)]
pub struct Convolve {
    spec: KernelSpec,
    kernel: Kernel,
    preserve_channels: bool,
}

impl Convolve {
    /// Build a convolution step from a kernel description.
    pub fn new(spec: KernelSpec, preserve_channels: bool) -> Result<Self> {
        let kernel = spec.build()?;
        Ok(Self {
            spec,
            kernel,
            preserve_channels,
        })
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }
}

impl Transform for Convolve {
    impl_transform_common!("convolve");

    fn apply(&self, buffer: PixelBuffer) -> Result<PixelBuffer> {
        convolve(&buffer, &self.kernel, self.preserve_channels)
    }

    fn describe(&self) -> String {
        format!(
            "convolve({}x{}, preserve={})",
            self.kernel.width(),
            self.kernel.height(),
            self.preserve_channels
        )
    }

    fn to_json(&self) -> Value {
        json!({
            "op": "convolve",
            "kernel": self.spec,
            "preserve_channels": self.preserve_channels,
        })
    }
}
