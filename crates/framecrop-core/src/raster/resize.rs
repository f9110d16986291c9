//! Fixed-size resizing.
//!
//! Wraps `fast_image_resize`'s separable convolution. Horizontal and vertical
//! axes are scaled independently, so the source aspect ratio never has to
//! match the target. The destination buffer is allocated up front with a
//! fallible reservation and the resizer writes into it.

use fast_image_resize as fir;

use super::types::{FilterType, Raster, CHANNELS};
use crate::error::CropError;

/// Resize an image to exact dimensions.
///
/// # Arguments
///
/// * `image` - The image to resize (consumed, its buffer is reused when no
///   resize is needed)
/// * `width` - Target width in pixels
/// * `height` - Target height in pixels
/// * `filter` - Interpolation filter to use
///
/// # Errors
///
/// - `CropError::InvalidTargetSize` if either dimension is zero
/// - `CropError::AllocationFailure` if the target buffer cannot be allocated
/// - `CropError::InvalidBuffer` if `image` does not match its dimensions
pub fn resize_exact(
    image: Raster,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<Raster, CropError> {
    if width == 0 || height == 0 {
        return Err(CropError::InvalidTargetSize { width, height });
    }

    // Fast path: if dimensions match, hand the buffer straight back
    if image.width == width && image.height == height {
        return Ok(image);
    }

    image.validate()?;
    let output = Raster::try_zeroed(width, height)?;

    let mismatch = |raster: &Raster| CropError::InvalidBuffer {
        expected: raster.pixel_count() as usize * CHANNELS,
        actual: raster.pixels.len(),
    };

    let src = fir::images::ImageRef::new(
        image.width,
        image.height,
        &image.pixels,
        fir::PixelType::U8x3,
    )
    .map_err(|_| mismatch(&image))?;
    let dst_err = mismatch(&output);
    let mut dst =
        fir::images::Image::from_vec_u8(width, height, output.pixels, fir::PixelType::U8x3)
            .map_err(|_| dst_err)?;

    let options = fir::ResizeOptions::new().resize_alg(filter.to_resize_alg());
    fir::Resizer::new()
        .resize(&src, &mut dst, &options)
        .map_err(|_| mismatch(&image))?;

    Ok(Raster {
        width,
        height,
        pixels: dst.into_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_image(width: u32, height: u32) -> Raster {
        // Create a simple gradient image for testing
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(((x * 255) / width.max(1)) as u8); // R
                pixels.push(((y * 255) / height.max(1)) as u8); // G
                pixels.push(128); // B
            }
        }
        Raster::new(width, height, pixels).unwrap()
    }

    #[test]
    fn test_resize_basic() {
        let img = create_test_image(100, 50);
        let resized = resize_exact(img, 50, 25, FilterType::Bilinear).unwrap();

        assert_eq!(resized.width, 50);
        assert_eq!(resized.height, 25);
        assert_eq!(resized.pixels.len(), 50 * 25 * 3);
    }

    #[test]
    fn test_resize_same_dimensions_keeps_pixels() {
        let img = create_test_image(100, 50);
        let expected = img.pixels.clone();
        let resized = resize_exact(img, 100, 50, FilterType::Bilinear).unwrap();

        assert_eq!(resized.pixels, expected);
    }

    #[test]
    fn test_resize_upscale() {
        let img = create_test_image(50, 25);
        let resized = resize_exact(img, 100, 50, FilterType::Lanczos3).unwrap();

        assert_eq!(resized.width, 100);
        assert_eq!(resized.height, 50);
    }

    #[test]
    fn test_resize_changes_aspect_ratio() {
        // Tall strip stretched into a wide banner
        let img = create_test_image(10, 40);
        let resized = resize_exact(img, 64, 36, FilterType::CatmullRom).unwrap();

        assert_eq!((resized.width, resized.height), (64, 36));
    }

    #[test]
    fn test_resize_zero_dimensions_error() {
        let img = create_test_image(100, 50);
        assert_eq!(
            resize_exact(img.clone(), 0, 50, FilterType::Bilinear).unwrap_err(),
            CropError::InvalidTargetSize {
                width: 0,
                height: 50
            }
        );
        assert!(resize_exact(img, 50, 0, FilterType::Bilinear).is_err());
    }

    #[test]
    fn test_resize_uniform_color_preserved() {
        let img = Raster::new(7, 5, vec![200u8; 7 * 5 * 3]).unwrap();
        let resized = resize_exact(img, 19, 11, FilterType::Bilinear).unwrap();

        assert!(resized.pixels.iter().all(|&p| p.abs_diff(200) <= 1));
    }

    #[test]
    fn test_unallocatable_target_is_allocation_failure() {
        // Representable size, but far beyond any real allocator
        let img = create_test_image(4, 4);
        let err = resize_exact(img, 1 << 20, 1 << 20, FilterType::Bilinear).unwrap_err();
        assert!(matches!(err, CropError::AllocationFailure { .. }));
    }

    #[test]
    fn test_resize_rejects_malformed_buffer() {
        let img = Raster {
            width: 8,
            height: 8,
            pixels: vec![0u8; 10],
        };
        let err = resize_exact(img, 4, 4, FilterType::Bilinear).unwrap_err();
        assert!(matches!(err, CropError::InvalidBuffer { .. }));
    }

    #[test]
    fn test_all_filter_types() {
        for filter in [
            FilterType::Bilinear,
            FilterType::CatmullRom,
            FilterType::Lanczos3,
        ] {
            let img = create_test_image(100, 50);
            let resized = resize_exact(img, 50, 25, filter).unwrap();
            assert_eq!(resized.width, 50);
            assert_eq!(resized.height, 25);
        }
    }
}
