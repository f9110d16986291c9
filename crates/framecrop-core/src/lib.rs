//! Framecrop Core - crop-to-fixed-output image transform
//!
//! This crate turns an interactive crop (an image panned, zoomed, rotated
//! and possibly mirrored under a fixed-aspect frame) into an output image of
//! exact, caller-chosen dimensions.
//!
//! The work is pure and synchronous: the source image is only borrowed, every
//! output is freshly allocated, and nothing is shared between calls, so
//! independent crops can run concurrently without coordination.

pub mod error;
pub mod pipeline;
pub mod raster;
pub mod transform;

pub use error::CropError;
pub use pipeline::{crop_to_fixed_output, crop_to_fixed_output_with, CropOptions};
pub use raster::{CroppedImage, FilterType, Orientation, Raster, SourceImage};
pub use transform::{CropState, InterpolationFilter, SampleRegion, SourceRect};
