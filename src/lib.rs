//! imgprep - Batch Image Preprocessing
//!
//! Normalizes a labeled, tiered image dataset for classifier training:
//! grayscale conversion, noise suppression and resizing, written into a
//! destination tree that mirrors the source.
//!
//! # Architecture
//!
//! - `engine`: the planar `PixelBuffer` and image file I/O
//! - `transform`: per-image transforms and the ordered `TransformChain`
//! - `pipeline`: configuration, path mapping and the `DatasetWalker`
//! - `cli`: command-line front end

pub mod cli;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod transform;

pub use engine::PixelBuffer;
pub use error::{PrepError, Result};
pub use pipeline::{DatasetWalker, PipelineConfig, RunSummary};
