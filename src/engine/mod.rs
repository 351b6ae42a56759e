//! Image Engine Module
//!
//! Core image handling including:
//! - Pixel buffer management
//! - File I/O operations

pub mod buffer;
pub mod io;

pub use buffer::{PixelBuffer, GRAY_CHANNELS, RGB_CHANNELS};
pub use io::{list_images, load_image, save_image};
