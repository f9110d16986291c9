//! Horizontal mirroring for regions whose flip was not absorbed upstream.

use crate::error::CropError;
use crate::raster::{buffer_len, Raster};

/// Mirror an image about its vertical axis, in place.
///
/// Only called for residual-rotation regions; right-angle regions carry the
/// flip in their read orientation and must not be mirrored again.
///
/// # Errors
///
/// `CropError::InvalidBuffer` if the pixel buffer does not match the dimensions.
pub fn mirror_horizontal(image: Raster) -> Result<Raster, CropError> {
    let expected = buffer_len(image.width, image.height)?;
    let actual = image.pixels.len();
    let mut rgb = image
        .into_rgb_image()
        .ok_or(CropError::InvalidBuffer { expected, actual })?;

    image::imageops::flip_horizontal_in_place(&mut rgb);

    Ok(Raster::from_rgb_image(rgb))
}
