//! Transform Chain management
//!
//! Transforms run in chain order (index 0 first). Each transform consumes
//! the previous output, so only one buffer is live per image at a time.

use serde_json::Value;

use crate::engine::PixelBuffer;
use crate::error::Result;
use crate::transform::step::TransformStep;
use crate::transform::Transform;

/// Ordered sequence of transforms applied to one image
#[derive(Clone, Default)]
pub struct TransformChain {
    transforms: Vec<Box<dyn Transform>>,
}

impl TransformChain {
    /// Create a new empty chain
    pub fn new() -> Self {
        Self {
            transforms: Vec::new(),
        }
    }

    /// Build a chain from configured steps, preserving their order.
    ///
    /// # Errors
    /// * `Config` / `Shape` - if any step fails to build
    pub fn from_steps(steps: &[TransformStep]) -> Result<Self> {
        let transforms = steps
            .iter()
            .map(TransformStep::build)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { transforms })
    }

    /// Append a transform at the end of the chain
    pub fn push(&mut self, transform: Box<dyn Transform>) {
        self.transforms.push(transform);
    }

    /// Run the whole chain.
    ///
    /// Stops at the first failing transform.
    pub fn apply(&self, buffer: PixelBuffer) -> Result<PixelBuffer> {
        self.transforms
            .iter()
            .try_fold(buffer, |buffer, transform| transform.apply(buffer))
    }

    /// Get the number of transforms in the chain
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Check if the chain is empty
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Iterate over transforms
    pub fn iter(&self) -> impl Iterator<Item = &dyn Transform> {
        self.transforms.iter().map(|t| t.as_ref())
    }

    /// Human-readable chain, e.g. `grayscale -> resize(64x64, Bilinear)`
    pub fn describe(&self) -> String {
        if self.transforms.is_empty() {
            return "copy".to_string();
        }
        self.transforms
            .iter()
            .map(|t| t.describe())
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    /// Serialize chain state to JSON
    pub fn to_json(&self) -> Value {
        Value::Array(self.transforms.iter().map(|t| t.to_json()).collect())
    }
}

impl std::fmt::Debug for TransformChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformChain")
            .field("transforms", &self.describe())
            .finish()
    }
}
