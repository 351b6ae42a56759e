//! Transform trait definition
//!
//! Base trait for all per-image operations.

use crate::engine::PixelBuffer;
use crate::error::Result;
use serde_json::Value;

/// Base trait for all image transforms
///
/// A transform takes ownership of its input buffer and returns the result.
/// Shape-preserving transforms may rewrite the input in place; transforms
/// that change width, height or channel count build a new buffer.
pub trait Transform: Send + Sync {
    /// Apply the transform
    ///
    /// # Errors
    /// * `Shape` - if the input violates the transform's channel/size precondition
    fn apply(&self, buffer: PixelBuffer) -> Result<PixelBuffer>;

    /// Get the transform type identifier
    fn transform_type(&self) -> &'static str;

    /// Get human-readable description including parameters
    fn describe(&self) -> String;

    /// Serialize transform parameters to JSON
    fn to_json(&self) -> Value;

    /// Clone the transform into a boxed trait object
    fn box_clone(&self) -> Box<dyn Transform>;
}

impl Clone for Box<dyn Transform> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

impl std::fmt::Debug for dyn Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Helper macro to implement the boilerplate `Transform` methods
#[macro_export]
macro_rules! impl_transform_common {
    ($transform_type:expr) => {
        fn transform_type(&self) -> &'static str {
            $transform_type
        }

        fn box_clone(&self) -> Box<dyn $crate::transform::Transform> {
            Box::new(self.clone())
        }
    };
}
