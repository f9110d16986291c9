//! The three crop stages: geometry, sampling, resampling.
//!
//! # Stage Order
//!
//! Every crop runs these in order, with no stage feeding back into an
//! earlier one:
//! 1. [`resolve_source_rect`] maps the canvas crop frame into source pixels
//! 2. [`plan_sample_region`] folds in rotation and flip and clamps to the image
//! 3. [`extract_region`], [`rotate_recrop`], [`mirror_horizontal`] and
//!    [`crate::raster::resize_exact`] produce the fixed-size output
//!
//! # Coordinate System
//!
//! - Canvas and source coordinates have their origin at the top-left corner
//! - Rotation angles are in degrees, positive = clockwise on screen
//! - Source rectangles are expressed against the unrotated, unflipped image

mod crop;
mod flip;
mod geometry;
mod rotation;
mod sampler;

pub use crop::{extract_rect, extract_region};
pub use flip::mirror_horizontal;
pub use geometry::{resolve_source_rect, CropState, SourceRect};
pub use rotation::{rotate_recrop, rotated_extent, InterpolationFilter};
pub use sampler::{
    normalize_angle, plan_sample_region, quarter_turns, FrameExtent, PixelRect, SampleRegion,
    RIGHT_ANGLE_TOLERANCE,
};
