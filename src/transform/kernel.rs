//! Convolution kernels
//!
//! Kernels are small planar float grids (`width × height × channels`).
//! `KernelSpec` is the serializable description used in pipeline
//! configuration; `Kernel` is the materialised grid.

use serde::{Deserialize, Serialize};

use crate::error::{PrepError, Result};

/// Materialised convolution kernel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kernel {
    width: usize,
    height: usize,
    channels: usize,
    weights: Vec<f32>,
}

impl Kernel {
    /// Wrap planar weights.
    ///
    /// # Errors
    /// * `Shape` - if a dimension is zero or the weight count does not match
    pub fn new(width: usize, height: usize, channels: usize, weights: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 || channels == 0 {
            return Err(PrepError::shape(
                "kernel",
                format!(
                    "dimensions must be positive, got {}x{}x{}",
                    width, height, channels
                ),
            ));
        }
        if weights.len() != width * height * channels {
            return Err(PrepError::shape(
                "kernel",
                format!(
                    "{}x{}x{} needs {} weights, got {}",
                    width,
                    height,
                    channels,
                    width * height * channels,
                    weights.len()
                ),
            ));
        }
        Ok(Self {
            width,
            height,
            channels,
            weights,
        })
    }

    /// Square single-channel kernel from row-major weights
    fn square(size: usize, weights: Vec<f32>) -> Self {
        Self {
            width: size,
            height: size,
            channels: 1,
            weights,
        }
    }

    /// `size × size` averaging filter (weights sum to 1).
    pub fn box_filter(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(PrepError::config("box filter size must be positive"));
        }
        let mut kernel = Self::square(size, vec![1.0; size * size]);
        kernel.l1_normalize();
        Ok(kernel)
    }

    /// Gaussian low-pass filter.
    ///
    /// The side length is `ceil(6σ)`, bumped to the next odd number, and the
    /// weights are L1-normalised.
    pub fn gaussian(sigma: f32) -> Result<Self> {
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(PrepError::config(format!(
                "gaussian sigma must be positive, got {}",
                sigma
            )));
        }

        let mut size = (sigma * 6.0).ceil() as usize;
        if size % 2 == 0 {
            size += 1;
        }
        let half = (size / 2) as f32;
        let two_sigma_sq = 2.0 * sigma * sigma;

        let mut weights = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                let dx = x as f32 - half;
                let dy = y as f32 - half;
                weights.push((-(dx * dx + dy * dy) / two_sigma_sq).exp()
                    / (std::f32::consts::PI * two_sigma_sq));
            }
        }

        let mut kernel = Self::square(size, weights);
        kernel.l1_normalize();
        Ok(kernel)
    }

    /// 3×3 Laplacian-style high-pass filter
    pub fn highpass() -> Self {
        Self::square(3, vec![0.0, -1.0, 0.0, -1.0, 4.0, -1.0, 0.0, -1.0, 0.0])
    }

    /// 3×3 sharpen filter
    pub fn sharpen() -> Self {
        Self::square(3, vec![0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0])
    }

    /// 3×3 emboss filter
    pub fn emboss() -> Self {
        Self::square(3, vec![-2.0, -1.0, 0.0, -1.0, 1.0, 1.0, 0.0, 1.0, 2.0])
    }

    /// 3×3 Sobel filter for the horizontal gradient
    pub fn sobel_x() -> Self {
        Self::square(3, vec![-1.0, 0.0, 1.0, -2.0, 0.0, 2.0, -1.0, 0.0, 1.0])
    }

    /// 3×3 Sobel filter for the vertical gradient
    pub fn sobel_y() -> Self {
        Self::square(3, vec![-1.0, -2.0, -1.0, 0.0, 0.0, 0.0, 1.0, 2.0, 1.0])
    }

    /// Scale weights so they sum to 1. A zero-sum kernel is left as is.
    pub fn l1_normalize(&mut self) {
        let sum: f32 = self.weights.iter().sum();
        if sum != 0.0 {
            for w in &mut self.weights {
                *w /= sum;
            }
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Weight at (x, y, c)
    #[inline]
    pub fn get(&self, x: usize, y: usize, c: usize) -> f32 {
        self.weights[c * self.width * self.height + y * self.width + x]
    }
}

/// Serializable kernel description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KernelSpec {
    Box {
        size: usize,
    },
    Gaussian {
        sigma: f32,
    },
    Highpass,
    Sharpen,
    Emboss,
    SobelX,
    SobelY,
    Custom {
        width: usize,
        height: usize,
        #[serde(default = "default_kernel_channels")]
        channels: usize,
        weights: Vec<f32>,
    },
}

fn default_kernel_channels() -> usize {
    1
}

impl KernelSpec {
    /// Materialise the kernel.
    ///
    /// # Errors
    /// * `Config` - for non-positive sizes or sigmas
    /// * `Shape` - for custom kernels whose weights do not match their shape
    pub fn build(&self) -> Result<Kernel> {
        match self {
            KernelSpec::Box { size } => Kernel::box_filter(*size),
            KernelSpec::Gaussian { sigma } => Kernel::gaussian(*sigma),
            KernelSpec::Highpass => Ok(Kernel::highpass()),
            KernelSpec::Sharpen => Ok(Kernel::sharpen()),
            KernelSpec::Emboss => Ok(Kernel::emboss()),
            KernelSpec::SobelX => Ok(Kernel::sobel_x()),
            KernelSpec::SobelY => Ok(Kernel::sobel_y()),
            KernelSpec::Custom {
                width,
                height,
                channels,
                weights,
            } => Kernel::new(*width, *height, *channels, weights.clone()),
        }
    }
}
