//! Region extraction.
//!
//! Copies a clamped pixel rectangle out of the source image, reading it
//! through the region's [`Orientation`]. This is a pure copy: right-angle
//! rotations and mirrors are index remaps, so no interpolation happens here.
//!
//! # Example
//!
//! ```ignore
//! let region = plan_sample_region(&rect, 90.0, false, src.width, src.height)?;
//! let pixels = extract_region(&src, &region)?;
//! ```

use super::sampler::{PixelRect, SampleRegion};
use crate::error::CropError;
use crate::raster::{Orientation, Raster, SourceImage, CHANNELS};

/// Extract the region's pixels from `source`, applying its orientation.
///
/// The output has the region's dimensions, swapped when the orientation
/// turns by an odd number of quarter turns.
///
/// # Errors
///
/// - `CropError::CropOutOfBounds` if the rectangle is empty or exceeds the source
/// - `CropError::AllocationFailure` if the output cannot be allocated
pub fn extract_region(source: &SourceImage, region: &SampleRegion) -> Result<Raster, CropError> {
    extract_rect(source, &region.rect, region.orientation)
}

/// Extract `rect` from `source`, reading it through `orientation`.
pub fn extract_rect(
    source: &SourceImage,
    rect: &PixelRect,
    orientation: Orientation,
) -> Result<Raster, CropError> {
    if !rect.fits_within(source.width, source.height) {
        return Err(CropError::CropOutOfBounds);
    }

    let (out_width, out_height) = orientation.output_dimensions(rect.width, rect.height);
    let mut output = Raster::try_zeroed(out_width, out_height)?;

    if orientation == Orientation::Normal {
        // Copy pixel data row by row for efficiency
        let row_bytes = rect.width as usize * CHANNELS;
        for y in 0..rect.height {
            let src_start = source.index(rect.x, rect.y + y);
            let dst_start = output.index(0, y);
            output.pixels[dst_start..dst_start + row_bytes]
                .copy_from_slice(&source.pixels[src_start..src_start + row_bytes]);
        }
        return Ok(output);
    }

    for v in 0..out_height {
        for u in 0..out_width {
            let (x, y) = orientation.source_coords(u, v, rect.width, rect.height);
            let src_idx = source.index(rect.x + x, rect.y + y);
            let dst_idx = output.index(u, v);
            output.pixels[dst_idx..dst_idx + CHANNELS]
                .copy_from_slice(&source.pixels[src_idx..src_idx + CHANNELS]);
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Create a test image where each pixel encodes its own position.
    fn test_image(width: u32, height: u32) -> Raster {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(x as u8); // R
                pixels.push(y as u8); // G
                pixels.push(((y * width + x) % 256) as u8); // B
            }
        }
        Raster::new(width, height, pixels).unwrap()
    }

    fn rect(x: u32, y: u32, width: u32, height: u32) -> PixelRect {
        PixelRect {
            x,
            y,
            width,
            height,
        }
    }

    #[test]
    fn test_full_extract_is_identity() {
        let img = test_image(50, 40);
        let result = extract_rect(&img, &rect(0, 0, 50, 40), Orientation::Normal).unwrap();

        assert_eq!(result, img);
    }

    #[test]
    fn test_center_extract() {
        let img = test_image(10, 10);
        let result = extract_rect(&img, &rect(2, 3, 6, 4), Orientation::Normal).unwrap();

        assert_eq!(result.width, 6);
        assert_eq!(result.height, 4);
        // First pixel comes from (2, 3) in the original
        assert_eq!(result.pixel(0, 0), img.pixel(2, 3));
        assert_eq!(result.pixel(5, 3), img.pixel(7, 6));
    }

    #[test]
    fn test_rotate90_extract() {
        let img = test_image(10, 10);
        let result = extract_rect(&img, &rect(1, 1, 4, 2), Orientation::Rotate90CW).unwrap();

        assert_eq!((result.width, result.height), (2, 4));
        // Bottom-left of the region becomes the top-left
        assert_eq!(result.pixel(0, 0), img.pixel(1, 2));
        // Top-left of the region becomes the top-right
        assert_eq!(result.pixel(1, 0), img.pixel(1, 1));
        // Top-right of the region becomes the bottom-right
        assert_eq!(result.pixel(1, 3), img.pixel(4, 1));
    }

    #[test]
    fn test_mirrored_extract() {
        let img = test_image(8, 3);
        let result = extract_rect(&img, &rect(0, 0, 8, 3), Orientation::FlipHorizontal).unwrap();

        for y in 0..3 {
            for x in 0..8 {
                assert_eq!(result.pixel(x, y), img.pixel(7 - x, y));
            }
        }
    }

    #[test]
    fn test_rotate180_is_two_quarter_turns() {
        let img = test_image(7, 5);
        let full = rect(0, 0, 7, 5);
        let once = extract_rect(&img, &full, Orientation::Rotate90CW).unwrap();
        let twice = extract_rect(&once, &rect(0, 0, 5, 7), Orientation::Rotate90CW).unwrap();
        let half_turn = extract_rect(&img, &full, Orientation::Rotate180).unwrap();

        assert_eq!(twice, half_turn);
    }

    #[test]
    fn test_extract_rejects_out_of_bounds() {
        let img = test_image(10, 10);
        assert_eq!(
            extract_rect(&img, &rect(8, 0, 4, 4), Orientation::Normal).unwrap_err(),
            CropError::CropOutOfBounds
        );
        assert!(extract_rect(&img, &rect(0, 0, 0, 4), Orientation::Normal).is_err());
    }

    #[test]
    fn test_extract_rejects_rect_past_u32_range() {
        let img = test_image(4, 4);
        for r in [
            rect(u32::MAX, 0, 2, 1),
            rect(0, u32::MAX, 1, 2),
            rect(1, 0, u32::MAX, 1),
        ] {
            for orientation in [Orientation::Normal, Orientation::Rotate90CW] {
                assert_eq!(
                    extract_rect(&img, &r, orientation).unwrap_err(),
                    CropError::CropOutOfBounds
                );
            }
        }
    }

    #[test]
    fn test_extract_does_not_touch_source() {
        let img = test_image(12, 12);
        let before = img.clone();
        let _ = extract_rect(&img, &rect(3, 3, 5, 5), Orientation::Transverse).unwrap();
        assert_eq!(img, before);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
