//! Bounds clamping: turning a resolved crop rectangle into a concrete read
//! region of the source buffer.
//!
//! # Rotation Model
//!
//! The displayed image is the source rotated clockwise about its own center
//! by the rotation angle, then mirrored horizontally when flipped. The crop
//! frame's center is mapped back through that transform about the image
//! center; the frame's corners are then rotated about the mapped crop center.
//!
//! Right-angle rotations are absorbed exactly into an [`Orientation`], so the
//! extractor can read them without interpolation. Any other angle is handled
//! by reading the axis-aligned bounding box of the rotated frame and leaving
//! a residual rotation for the resampler.

use serde::{Deserialize, Serialize};

use super::geometry::SourceRect;
use super::rotation::rotated_extent;
use crate::error::CropError;
use crate::raster::Orientation;

/// Angles closer than this (in degrees) to a multiple of 90 count as aligned.
pub const RIGHT_ANGLE_TOLERANCE: f64 = 0.001;

/// Normalize an angle in degrees to `[0, 360)`.
pub fn normalize_angle(angle_degrees: f64) -> f64 {
    let a = angle_degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}

/// Clockwise quarter turns for a right-angle aligned angle, or `None`.
pub fn quarter_turns(angle_degrees: f64) -> Option<u8> {
    let a = normalize_angle(angle_degrees);
    let turns = (a / 90.0).round();
    if (a - turns * 90.0).abs() < RIGHT_ANGLE_TOLERANCE {
        Some((turns as u8) % 4)
    } else {
        None
    }
}

/// Axis-aligned rectangle in integer source pixels, always inside the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// Right edge (exclusive). Widened so it cannot overflow.
    pub fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    /// Bottom edge (exclusive). Widened so it cannot overflow.
    pub fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }

    /// True when the rectangle is non-empty and lies inside a
    /// `width x height` image.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.width > 0
            && self.height > 0
            && self.right() <= width as u64
            && self.bottom() <= height as u64
    }
}

/// The requested frame, in pixels local to the read region.
///
/// `width` and `height` are the frame's true (unrotated) extent; the center is
/// the pivot used for residual rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameExtent {
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
}

/// Concrete read geometry handed to the resampler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleRegion {
    /// Region of the source buffer to read.
    pub rect: PixelRect,
    /// Exact orientation applied while reading the region.
    pub orientation: Orientation,
    /// Clockwise rotation still to apply, in degrees. Zero when absorbed.
    pub residual_angle: f64,
    /// Whether the resampler still has to mirror the result.
    pub flip_horizontal: bool,
    /// Requested frame relative to `rect`.
    pub frame: FrameExtent,
}

impl SampleRegion {
    /// True when rotation and flip were fully absorbed into the orientation.
    pub fn is_aligned(&self) -> bool {
        self.residual_angle == 0.0
    }
}

/// How fractional edges snap to whole pixels.
#[derive(Debug, Clone, Copy)]
enum Snap {
    /// Round each edge to the nearest pixel boundary.
    Nearest,
    /// Grow outward so the span is fully covered.
    Outward,
}

/// Snap `[start, end)` to pixels and intersect it with `[0, limit)`.
fn clamp_span(start: f64, end: f64, limit: u32, snap: Snap) -> Option<(u32, u32)> {
    let (s, e) = match snap {
        Snap::Nearest => {
            let s = start.round();
            (s, end.round().max(s + 1.0))
        }
        Snap::Outward => (start.floor(), end.ceil()),
    };
    let limit = limit as f64;
    let s = s.clamp(0.0, limit);
    let e = e.clamp(0.0, limit);
    if e <= s {
        return None;
    }
    Some((s as u32, (e - s) as u32))
}

fn clamp_rect(
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    source_width: u32,
    source_height: u32,
    snap: Snap,
) -> Result<PixelRect, CropError> {
    let (x, w) =
        clamp_span(left, left + width, source_width, snap).ok_or(CropError::CropOutOfBounds)?;
    let (y, h) =
        clamp_span(top, top + height, source_height, snap).ok_or(CropError::CropOutOfBounds)?;
    Ok(PixelRect {
        x,
        y,
        width: w,
        height: h,
    })
}

/// Resolve rotation and flip into a clamped read region.
///
/// # Arguments
///
/// * `rect` - Unclamped frame rectangle from the geometry resolver
/// * `rotation_angle` - Clockwise rotation in degrees, any finite value
/// * `flip_horizontal` - Whether the displayed image is mirrored
/// * `source_width`, `source_height` - Actual source buffer size
///
/// # Errors
///
/// - `CropError::CropOutOfBounds` if the region misses the source entirely
/// - `CropError::InvalidCropGeometry` for non-finite inputs
pub fn plan_sample_region(
    rect: &SourceRect,
    rotation_angle: f64,
    flip_horizontal: bool,
    source_width: u32,
    source_height: u32,
) -> Result<SampleRegion, CropError> {
    if !rotation_angle.is_finite() {
        return Err(CropError::geometry("rotation angle must be finite"));
    }
    if ![rect.x, rect.y, rect.width, rect.height]
        .iter()
        .all(|v| v.is_finite())
    {
        return Err(CropError::geometry("crop rectangle is not finite"));
    }
    if source_width == 0 || source_height == 0 {
        return Err(CropError::CropOutOfBounds);
    }

    let angle = normalize_angle(rotation_angle);
    let turns = quarter_turns(angle);
    let (cos, sin) = match turns {
        Some(0) => (1.0, 0.0),
        Some(1) => (0.0, 1.0),
        Some(2) => (-1.0, 0.0),
        Some(_) => (0.0, -1.0),
        None => {
            let rad = angle.to_radians();
            (rad.cos(), rad.sin())
        }
    };
    let fx = if flip_horizontal { -1.0 } else { 1.0 };

    // Map the frame center from display space back to source space about the
    // image center: undo the mirror, then the clockwise rotation.
    let image_cx = source_width as f64 / 2.0;
    let image_cy = source_height as f64 / 2.0;
    let (frame_cx, frame_cy) = rect.center();
    let dx = (frame_cx - image_cx) * fx;
    let dy = frame_cy - image_cy;
    let crop_cx = image_cx + cos * dx + sin * dy;
    let crop_cy = image_cy - sin * dx + cos * dy;

    match turns {
        Some(turns) => {
            let orientation = Orientation::from_parts(turns, flip_horizontal);
            let (fw, fh) = if orientation.swaps_dimensions() {
                (rect.height, rect.width)
            } else {
                (rect.width, rect.height)
            };
            let pixel_rect = clamp_rect(
                crop_cx - fw / 2.0,
                crop_cy - fh / 2.0,
                fw,
                fh,
                source_width,
                source_height,
                Snap::Nearest,
            )?;
            Ok(SampleRegion {
                rect: pixel_rect,
                orientation,
                residual_angle: 0.0,
                flip_horizontal: false,
                frame: FrameExtent {
                    center_x: crop_cx - pixel_rect.x as f64,
                    center_y: crop_cy - pixel_rect.y as f64,
                    width: rect.width,
                    height: rect.height,
                },
            })
        }
        None => {
            let (bw, bh) = rotated_extent(rect.width, rect.height, angle);
            let pixel_rect = clamp_rect(
                crop_cx - bw / 2.0,
                crop_cy - bh / 2.0,
                bw,
                bh,
                source_width,
                source_height,
                Snap::Outward,
            )?;
            Ok(SampleRegion {
                rect: pixel_rect,
                orientation: Orientation::Normal,
                residual_angle: angle,
                flip_horizontal,
                frame: FrameExtent {
                    center_x: crop_cx - pixel_rect.x as f64,
                    center_y: crop_cy - pixel_rect.y as f64,
                    width: rect.width,
                    height: rect.height,
                },
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f64, y: f64, width: f64, height: f64) -> SourceRect {
        SourceRect {
            x,
            y,
            width,
            height,
        }
    }

    #[test]
    fn test_normalize_angle() {
        assert_eq!(normalize_angle(0.0), 0.0);
        assert_eq!(normalize_angle(-90.0), 270.0);
        assert_eq!(normalize_angle(450.0), 90.0);
        assert_eq!(normalize_angle(720.0), 0.0);
        assert_eq!(normalize_angle(-1e-20), 0.0);
    }

    #[test]
    fn test_quarter_turns() {
        assert_eq!(quarter_turns(0.0), Some(0));
        assert_eq!(quarter_turns(90.0), Some(1));
        assert_eq!(quarter_turns(-90.0), Some(3));
        assert_eq!(quarter_turns(540.0), Some(2));
        assert_eq!(quarter_turns(89.9995), Some(1));
        assert_eq!(quarter_turns(359.9999), Some(0));
        assert_eq!(quarter_turns(45.0), None);
        assert_eq!(quarter_turns(90.5), None);
    }

    #[test]
    fn test_unrotated_region_rounds_edges() {
        let region =
            plan_sample_region(&rect(600.0, 493.75, 1800.0, 1012.5), 0.0, false, 3000, 2000)
                .unwrap();

        assert_eq!(
            region.rect,
            PixelRect {
                x: 600,
                y: 494,
                width: 1800,
                height: 1012
            }
        );
        assert_eq!(region.orientation, Orientation::Normal);
        assert!(region.is_aligned());
        assert!(!region.flip_horizontal);
    }

    #[test]
    fn test_flip_mirrors_origin() {
        let region =
            plan_sample_region(&rect(100.0, 400.0, 200.0, 200.0), 0.0, true, 1000, 1000).unwrap();

        // new_x = source_width - x - width
        assert_eq!(region.rect.x, 700);
        assert_eq!(region.rect.y, 400);
        assert_eq!(region.orientation, Orientation::FlipHorizontal);
        // Flip is absorbed, the resampler must not apply it again
        assert!(!region.flip_horizontal);
    }

    #[test]
    fn test_quarter_turn_swaps_dimensions() {
        let region =
            plan_sample_region(&rect(300.0, 400.0, 400.0, 200.0), 90.0, false, 1000, 1000)
                .unwrap();

        assert_eq!(
            region.rect,
            PixelRect {
                x: 400,
                y: 300,
                width: 200,
                height: 400
            }
        );
        assert_eq!(region.orientation, Orientation::Rotate90CW);
        assert_eq!(region.residual_angle, 0.0);
    }

    #[test]
    fn test_quarter_turn_relocates_off_center_frame() {
        // Frame centered 200px right of the image center on screen. With the
        // image turned clockwise, screen-right is source-up.
        let region =
            plan_sample_region(&rect(650.0, 450.0, 100.0, 100.0), 90.0, false, 1000, 1000)
                .unwrap();

        assert_eq!(region.rect.x, 450);
        assert_eq!(region.rect.y, 250);
    }

    #[test]
    fn test_counter_clockwise_turn() {
        let region =
            plan_sample_region(&rect(650.0, 450.0, 100.0, 100.0), -90.0, false, 1000, 1000)
                .unwrap();

        // Screen-right is source-down for a counter-clockwise turn
        assert_eq!(region.rect.x, 450);
        assert_eq!(region.rect.y, 650);
        assert_eq!(region.orientation, Orientation::Rotate270CW);
    }

    #[test]
    fn test_flipped_quarter_turn_orientation() {
        let region =
            plan_sample_region(&rect(300.0, 400.0, 400.0, 200.0), 90.0, true, 1000, 1000).unwrap();
        assert_eq!(region.orientation, Orientation::Transpose);

        let region =
            plan_sample_region(&rect(300.0, 400.0, 400.0, 200.0), 270.0, true, 1000, 1000)
                .unwrap();
        assert_eq!(region.orientation, Orientation::Transverse);
    }

    #[test]
    fn test_partial_overlap_clamps_each_edge() {
        let region =
            plan_sample_region(&rect(-100.0, 50.0, 300.0, 100.0), 0.0, false, 500, 500).unwrap();

        // Only the left edge moves; aspect ratio changes
        assert_eq!(
            region.rect,
            PixelRect {
                x: 0,
                y: 50,
                width: 200,
                height: 100
            }
        );
    }

    #[test]
    fn test_oversized_frame_clamps_to_full_image() {
        let region = plan_sample_region(&rect(-500.0, -500.0, 2000.0, 2000.0), 0.0, false, 640, 480)
            .unwrap();

        assert_eq!(
            region.rect,
            PixelRect {
                x: 0,
                y: 0,
                width: 640,
                height: 480
            }
        );
    }

    #[test]
    fn test_region_outside_source_fails() {
        let err = plan_sample_region(&rect(5000.0, 0.0, 100.0, 100.0), 0.0, false, 1000, 1000)
            .unwrap_err();
        assert_eq!(err, CropError::CropOutOfBounds);

        let err = plan_sample_region(&rect(0.0, -300.0, 100.0, 100.0), 90.0, false, 1000, 1000)
            .unwrap_err();
        assert_eq!(err, CropError::CropOutOfBounds);
    }

    #[test]
    fn test_arbitrary_angle_uses_bounding_box() {
        let region =
            plan_sample_region(&rect(450.0, 450.0, 100.0, 100.0), 45.0, true, 1000, 1000).unwrap();

        // Diagonal of a 100px square is ~141.4, grown outward to whole pixels
        assert_eq!(region.rect.x, 429);
        assert_eq!(region.rect.width, 142);
        assert_eq!(region.rect.height, 142);
        assert_eq!(region.orientation, Orientation::Normal);
        assert_eq!(region.residual_angle, 45.0);
        // Flip stays pending for the resampler
        assert!(region.flip_horizontal);
        assert!(!region.is_aligned());

        // Pivot sits at the crop center inside the region
        assert!((region.frame.center_x - 71.0).abs() < 1e-9);
        assert_eq!(region.frame.width, 100.0);
    }

    #[test]
    fn test_non_finite_angle_rejected() {
        let err = plan_sample_region(&rect(0.0, 0.0, 10.0, 10.0), f64::NAN, false, 100, 100)
            .unwrap_err();
        assert!(matches!(err, CropError::InvalidCropGeometry(_)));
    }

    #[test]
    fn test_pixel_rect_edges_do_not_overflow() {
        let r = PixelRect {
            x: u32::MAX,
            y: u32::MAX - 1,
            width: 2,
            height: 3,
        };
        assert_eq!(r.right(), u32::MAX as u64 + 2);
        assert_eq!(r.bottom(), u32::MAX as u64 + 2);
        assert!(!r.fits_within(u32::MAX, u32::MAX));

        let inside = PixelRect {
            x: 2,
            y: 3,
            width: 8,
            height: 7,
        };
        assert!(inside.fits_within(10, 10));
        assert!(!inside.fits_within(9, 10));
    }

    #[test]
    fn test_region_always_inside_source() {
        for angle in [0.0, 17.0, 90.0, 133.0, 180.0, 271.0] {
            for flip in [false, true] {
                let region = plan_sample_region(
                    &rect(-40.0, 30.0, 200.0, 120.0),
                    angle,
                    flip,
                    160,
                    100,
                )
                .unwrap();
                assert!(region.rect.fits_within(160, 100), "angle {}", angle);
                assert!(region.rect.width > 0 && region.rect.height > 0);
            }
        }
    }
}
