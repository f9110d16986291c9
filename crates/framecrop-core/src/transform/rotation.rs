//! Residual rotation with bilinear and Lanczos3 interpolation.
//!
//! Right-angle rotations never reach this module; they are absorbed into the
//! read orientation. What remains is an arbitrary angle applied to a region
//! that already contains the rotated frame's bounding box.
//!
//! # Algorithm
//!
//! The rotation uses inverse mapping: for each pixel of the requested frame,
//! we calculate which region pixel(s) contribute to it and interpolate their
//! values. For a clockwise on-screen angle θ about the crop center `c`:
//! ```text
//! src_x = c_x + dx * cos(θ) + dy * sin(θ)
//! src_y = c_y - dx * sin(θ) + dy * cos(θ)
//! ```

use serde::{Deserialize, Serialize};

use super::sampler::FrameExtent;
use crate::error::CropError;
use crate::raster::Raster;

/// Corners may land this far (in pixels) outside the region before the
/// re-crop is rejected. Absorbs floating point noise only.
const COVERAGE_TOLERANCE: f64 = 1e-3;

/// Interpolation filter for rotation operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InterpolationFilter {
    /// Fast bilinear interpolation.
    #[default]
    Bilinear,
    /// High-quality Lanczos3 interpolation.
    Lanczos3,
}

/// Size of the axis-aligned bounding box around a rotated rectangle.
///
/// ```text
/// new_w = |w*cos| + |h*sin|
/// new_h = |w*sin| + |h*cos|
/// ```
pub fn rotated_extent(width: f64, height: f64, angle_degrees: f64) -> (f64, f64) {
    let abs_angle = (angle_degrees % 360.0).abs();

    // Fast paths: right angles swap or keep dimensions exactly
    if abs_angle < 0.001 || (abs_angle - 180.0).abs() < 0.001 || (360.0 - abs_angle) < 0.001 {
        return (width, height);
    }
    if (abs_angle - 90.0).abs() < 0.001 || (abs_angle - 270.0).abs() < 0.001 {
        return (height, width);
    }

    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos().abs();
    let sin = angle_rad.sin().abs();

    (width * cos + height * sin, width * sin + height * cos)
}

/// Rotate `region` about the crop center and cut out the frame's true extent.
///
/// The output is `round(frame.width) x round(frame.height)` (at least 1x1).
/// Every output pixel is sampled from inside the region, so no blank corners
/// can appear.
///
/// # Errors
///
/// - `CropError::CropOutOfBounds` if the rotated frame is not fully covered by
///   the region (the bounding box was clamped against the source edge)
/// - `CropError::AllocationFailure` if the output cannot be allocated
pub fn rotate_recrop(
    region: &Raster,
    frame: &FrameExtent,
    angle_degrees: f64,
    filter: InterpolationFilter,
) -> Result<Raster, CropError> {
    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos();
    let sin = angle_rad.sin();

    let inverse = |dx: f64, dy: f64| {
        (
            frame.center_x + dx * cos + dy * sin,
            frame.center_y - dx * sin + dy * cos,
        )
    };

    // The region is a rectangle, so checking the four frame corners covers
    // every interior sample too.
    let half_w = frame.width / 2.0;
    let half_h = frame.height / 2.0;
    let max_x = region.width as f64 + COVERAGE_TOLERANCE;
    let max_y = region.height as f64 + COVERAGE_TOLERANCE;
    for (cx, cy) in [
        (-half_w, -half_h),
        (half_w, -half_h),
        (-half_w, half_h),
        (half_w, half_h),
    ] {
        let (x, y) = inverse(cx, cy);
        if x < -COVERAGE_TOLERANCE || y < -COVERAGE_TOLERANCE || x > max_x || y > max_y {
            return Err(CropError::CropOutOfBounds);
        }
    }

    let dst_w = (frame.width.round() as u32).max(1);
    let dst_h = (frame.height.round() as u32).max(1);
    let step_x = frame.width / dst_w as f64;
    let step_y = frame.height / dst_h as f64;

    let mut output = Raster::try_zeroed(dst_w, dst_h)?;

    for dst_y in 0..dst_h {
        // Offset of the pixel center from the frame center
        let dy = (dst_y as f64 + 0.5) * step_y - half_h;
        for dst_x in 0..dst_w {
            let dx = (dst_x as f64 + 0.5) * step_x - half_w;
            let (src_x, src_y) = inverse(dx, dy);

            // Convert from continuous coordinates to pixel-center indices
            let pixel = match filter {
                InterpolationFilter::Bilinear => sample_bilinear(region, src_x - 0.5, src_y - 0.5),
                InterpolationFilter::Lanczos3 => sample_lanczos3(region, src_x - 0.5, src_y - 0.5),
            };

            let dst_idx = output.index(dst_x, dst_y);
            output.pixels[dst_idx..dst_idx + 3].copy_from_slice(&pixel);
        }
    }

    Ok(output)
}

/// Get a pixel as [f64; 3] from an image at the given coordinates.
#[inline]
fn get_pixel_f64(image: &Raster, px: usize, py: usize) -> [f64; 3] {
    let idx = (py * image.width as usize + px) * 3;
    [
        image.pixels[idx] as f64,
        image.pixels[idx + 1] as f64,
        image.pixels[idx + 2] as f64,
    ]
}

/// Sample a pixel using bilinear interpolation.
///
/// Coordinates outside the image are clamped to the nearest edge pixel.
fn sample_bilinear(image: &Raster, x: f64, y: f64) -> [u8; 3] {
    let max_x = (image.width - 1) as f64;
    let max_y = (image.height - 1) as f64;
    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(image.width as usize - 1);
    let y1 = (y0 + 1).min(image.height as usize - 1);

    // Fractional distances
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = get_pixel_f64(image, x0, y0);
    let p10 = get_pixel_f64(image, x1, y0);
    let p01 = get_pixel_f64(image, x0, y1);
    let p11 = get_pixel_f64(image, x1, y1);

    let mut result = [0u8; 3];
    for i in 0..3 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }

    result
}

/// Sample a pixel using Lanczos3 interpolation.
///
/// Lanczos3 considers a 6x6 neighborhood of pixels. Near the edges, where the
/// kernel would leave the image, it falls back to bilinear.
fn sample_lanczos3(image: &Raster, x: f64, y: f64) -> [u8; 3] {
    let (w, h) = (image.width as i64, image.height as i64);

    if x < 2.0 || x >= (w - 3) as f64 || y < 2.0 || y >= (h - 3) as f64 {
        return sample_bilinear(image, x, y);
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let mut sum = [0.0f64; 3];
    let mut weight_sum = 0.0;

    for ky in -2..=3 {
        for kx in -2..=3 {
            let px = x0 + kx;
            let py = y0 + ky;

            let dx = x - px as f64;
            let dy = y - py as f64;
            let weight = lanczos_weight(dx, 3.0) * lanczos_weight(dy, 3.0);

            let pixel = get_pixel_f64(image, px as usize, py as usize);
            sum[0] += pixel[0] * weight;
            sum[1] += pixel[1] * weight;
            sum[2] += pixel[2] * weight;
            weight_sum += weight;
        }
    }

    if weight_sum.abs() < f64::EPSILON {
        return sample_bilinear(image, x, y);
    }

    let mut result = [0u8; 3];
    for i in 0..3 {
        result[i] = (sum[i] / weight_sum).clamp(0.0, 255.0).round() as u8;
    }

    result
}

/// Lanczos kernel weight function.
///
/// ```text
/// L(x) = sinc(x) * sinc(x/a)  for |x| < a
/// L(x) = 0                     for |x| >= a
/// ```
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;

    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}
