//! Crop-to-fixed-output entry points.
//!
//! Runs the geometry resolver, the bounds clamp and the resampler in order
//! and guarantees an output of exactly the requested size.
//!
//! # Example
//!
//! ```ignore
//! use framecrop_core::{crop_to_fixed_output, CropState};
//!
//! let crop = CropState::new(1.0, 0.6, 1000.0, 1600.0);
//! let out = crop_to_fixed_output(&source, &crop, 0.0, false, 1920, 1080)?;
//! assert_eq!((out.width, out.height), (1920, 1080));
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, warn};

use crate::error::CropError;
use crate::raster::{buffer_len, resize_exact, CroppedImage, FilterType, SourceImage};
use crate::transform::{
    extract_region, mirror_horizontal, plan_sample_region, resolve_source_rect, rotate_recrop,
    CropState, InterpolationFilter,
};

/// Tunables for the resampling stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CropOptions {
    /// Filter for the final fixed-size resize.
    pub resize_filter: FilterType,
    /// Filter for residual (non right-angle) rotations.
    pub rotation_filter: InterpolationFilter,
}

impl CropOptions {
    /// Lanczos3 for both stages. Slower, intended for export.
    pub fn high_quality() -> Self {
        Self {
            resize_filter: FilterType::Lanczos3,
            rotation_filter: InterpolationFilter::Lanczos3,
        }
    }
}

/// Crop `source` as framed by `crop` into a `target_width x target_height` image.
///
/// Uses the default [`CropOptions`]. See [`crop_to_fixed_output_with`].
pub fn crop_to_fixed_output(
    source: &SourceImage,
    crop: &CropState,
    rotation_angle: f64,
    flip_horizontal: bool,
    target_width: u32,
    target_height: u32,
) -> Result<CroppedImage, CropError> {
    crop_to_fixed_output_with(
        source,
        crop,
        rotation_angle,
        flip_horizontal,
        target_width,
        target_height,
        &CropOptions::default(),
    )
}

/// Crop `source` into a fixed-size image with explicit resampling options.
///
/// # Arguments
///
/// * `source` - Image the user framed; never modified
/// * `crop` - Viewport snapshot at commit time
/// * `rotation_angle` - Clockwise on-screen rotation in degrees
/// * `flip_horizontal` - Whether the displayed image is mirrored
/// * `target_width`, `target_height` - Exact output size
/// * `options` - Resampling filters
///
/// # Errors
///
/// - `CropError::InvalidTargetSize` for a zero target dimension
/// - `CropError::InvalidBuffer` if `source` does not match its dimensions
/// - `CropError::InvalidCropGeometry` for a malformed or degenerate crop
/// - `CropError::CropOutOfBounds` if the frame misses the image
/// - `CropError::AllocationFailure` if a buffer cannot be allocated
pub fn crop_to_fixed_output_with(
    source: &SourceImage,
    crop: &CropState,
    rotation_angle: f64,
    flip_horizontal: bool,
    target_width: u32,
    target_height: u32,
    options: &CropOptions,
) -> Result<CroppedImage, CropError> {
    let span = debug_span!(
        "crop_to_fixed_output",
        source_width = source.width,
        source_height = source.height,
        rotation_angle,
        flip_horizontal,
        target_width,
        target_height,
    );
    let _enter = span.enter();

    let result = run_pipeline(
        source,
        crop,
        rotation_angle,
        flip_horizontal,
        target_width,
        target_height,
        options,
    );
    if let Err(err) = &result {
        warn!(error = %err, "crop failed");
    }
    result
}

fn run_pipeline(
    source: &SourceImage,
    crop: &CropState,
    rotation_angle: f64,
    flip_horizontal: bool,
    target_width: u32,
    target_height: u32,
    options: &CropOptions,
) -> Result<CroppedImage, CropError> {
    if target_width == 0 || target_height == 0 {
        return Err(CropError::InvalidTargetSize {
            width: target_width,
            height: target_height,
        });
    }
    buffer_len(target_width, target_height)?;
    source.validate()?;

    let aspect = target_width as f64 / target_height as f64;
    let rect = resolve_source_rect(crop, source.width, source.height, aspect)?;
    debug!(
        x = rect.x,
        y = rect.y,
        width = rect.width,
        height = rect.height,
        "resolved crop frame"
    );

    let region = plan_sample_region(
        &rect,
        rotation_angle,
        flip_horizontal,
        source.width,
        source.height,
    )?;
    debug!(
        x = region.rect.x,
        y = region.rect.y,
        width = region.rect.width,
        height = region.rect.height,
        orientation = ?region.orientation,
        residual_angle = region.residual_angle,
        aligned = region.is_aligned(),
        "planned read region"
    );

    let mut image = extract_region(source, &region)?;
    if !region.is_aligned() {
        image = rotate_recrop(
            &image,
            &region.frame,
            region.residual_angle,
            options.rotation_filter,
        )?;
    }
    if region.flip_horizontal {
        image = mirror_horizontal(image)?;
    }

    let output = resize_exact(image, target_width, target_height, options.resize_filter)?;
    debug_assert_eq!((output.width, output.height), (target_width, target_height));
    Ok(output)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
