//! Core raster types.

use fast_image_resize as fir;
use serde::{Deserialize, Serialize};

use crate::error::CropError;

/// Bytes per pixel of every raster handled by this crate (packed RGB8).
pub const CHANNELS: usize = 3;

/// Filter type for the final fixed-size resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Bilinear interpolation (fast, acceptable quality).
    #[default]
    Bilinear,
    /// Catmull-Rom cubic interpolation (sharper than bilinear).
    CatmullRom,
    /// Lanczos3 interpolation (slower, highest quality).
    Lanczos3,
}

impl FilterType {
    /// Convert to the convolution algorithm used by the resizer.
    pub fn to_resize_alg(self) -> fir::ResizeAlg {
        let filter = match self {
            FilterType::Bilinear => fir::FilterType::Bilinear,
            FilterType::CatmullRom => fir::FilterType::CatmullRom,
            FilterType::Lanczos3 => fir::FilterType::Lanczos3,
        };
        fir::ResizeAlg::Convolution(filter)
    }
}

/// Exact read orientation for right-angle rotations.
///
/// Each variant is a clockwise quarter-turn rotation optionally followed by a
/// horizontal mirror of the rotated result. Reading a region through an
/// orientation is a pure index remap, no interpolation involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    /// No transformation.
    #[default]
    Normal,
    /// Horizontal mirror.
    FlipHorizontal,
    /// Rotate 90 degrees clockwise.
    Rotate90CW,
    /// Rotate 180 degrees.
    Rotate180,
    /// Rotate 270 degrees clockwise (90 CCW).
    Rotate270CW,
    /// Rotate 180 degrees, then mirror (a vertical flip).
    FlipVertical,
    /// Rotate 90 CW, then mirror (reflection across the main diagonal).
    Transpose,
    /// Rotate 270 CW, then mirror (reflection across the anti-diagonal).
    Transverse,
}

impl Orientation {
    /// Build an orientation from clockwise quarter turns and a mirror flag.
    ///
    /// `quarter_turns` is taken modulo 4.
    pub fn from_parts(quarter_turns: u8, mirrored: bool) -> Self {
        match (quarter_turns % 4, mirrored) {
            (0, false) => Orientation::Normal,
            (0, true) => Orientation::FlipHorizontal,
            (1, false) => Orientation::Rotate90CW,
            (1, true) => Orientation::Transpose,
            (2, false) => Orientation::Rotate180,
            (2, true) => Orientation::FlipVertical,
            (3, false) => Orientation::Rotate270CW,
            _ => Orientation::Transverse,
        }
    }

    /// Clockwise quarter turns applied by this orientation.
    pub fn quarter_turns(self) -> u8 {
        match self {
            Orientation::Normal | Orientation::FlipHorizontal => 0,
            Orientation::Rotate90CW | Orientation::Transpose => 1,
            Orientation::Rotate180 | Orientation::FlipVertical => 2,
            Orientation::Rotate270CW | Orientation::Transverse => 3,
        }
    }

    /// Returns true if the rotated result is mirrored.
    pub fn is_mirrored(self) -> bool {
        matches!(
            self,
            Orientation::FlipHorizontal
                | Orientation::FlipVertical
                | Orientation::Transpose
                | Orientation::Transverse
        )
    }

    /// Returns true if this orientation swaps width and height dimensions.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        self.quarter_turns() % 2 == 1
    }

    /// Output dimensions when reading a `width x height` region.
    #[inline]
    pub fn output_dimensions(self, width: u32, height: u32) -> (u32, u32) {
        if self.swaps_dimensions() {
            (height, width)
        } else {
            (width, height)
        }
    }

    /// Map an output pixel `(u, v)` to the region pixel it reads from.
    ///
    /// `width` and `height` are the dimensions of the region being read, not
    /// of the output. Both must be non-zero and `(u, v)` must lie inside the
    /// output dimensions.
    #[inline]
    pub(crate) fn source_coords(self, u: u32, v: u32, width: u32, height: u32) -> (u32, u32) {
        let last_x = width - 1;
        let last_y = height - 1;
        match self {
            Orientation::Normal => (u, v),
            Orientation::FlipHorizontal => (last_x - u, v),
            Orientation::Rotate90CW => (v, last_y - u),
            Orientation::Transpose => (v, u),
            Orientation::Rotate180 => (last_x - u, last_y - v),
            Orientation::FlipVertical => (u, last_y - v),
            Orientation::Rotate270CW => (last_x - v, u),
            Orientation::Transverse => (last_x - v, last_y - u),
        }
    }
}

/// Compute the byte length of a `width x height` RGB buffer.
///
/// Sizes that overflow or exceed `isize::MAX` are reported as an
/// allocation failure, since no allocator could satisfy them.
pub fn buffer_len(width: u32, height: u32) -> Result<usize, CropError> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(CHANNELS))
        .filter(|&n| n <= isize::MAX as usize)
        .ok_or(CropError::AllocationFailure { bytes: usize::MAX })
}

/// An RGB8 image buffer.
///
/// Used both for the caller's source image and for every buffer the crop
/// pipeline allocates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGB pixel data in row-major order (3 bytes per pixel).
    /// Length should be width * height * 3.
    pub pixels: Vec<u8>,
}

/// Image supplied by the caller. Only ever borrowed by the pipeline.
pub type SourceImage = Raster;

/// Image produced by the pipeline. Owned by the caller.
pub type CroppedImage = Raster;

impl Raster {
    /// Create a raster, checking that the buffer matches the dimensions.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, CropError> {
        let raster = Self {
            width,
            height,
            pixels,
        };
        raster.validate()?;
        Ok(raster)
    }

    /// Allocate a black raster, failing instead of aborting on exhaustion.
    pub fn try_zeroed(width: u32, height: u32) -> Result<Self, CropError> {
        let len = buffer_len(width, height)?;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| CropError::AllocationFailure { bytes: len })?;
        pixels.resize(len, 0);
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Check that the raster is non-empty and its buffer length is exact.
    pub fn validate(&self) -> Result<(), CropError> {
        let expected = buffer_len(self.width, self.height)?;
        if self.width == 0 || self.height == 0 || self.pixels.len() != expected {
            return Err(CropError::InvalidBuffer {
                expected,
                actual: self.pixels.len(),
            });
        }
        Ok(())
    }

    /// Create a Raster from an image::RgbImage.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.into_raw();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Convert into an image::RgbImage without copying the pixels.
    pub fn into_rgb_image(self) -> Option<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.pixels)
    }

    /// Read the pixel at `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = self.index(x, y);
        [self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]]
    }

    /// Byte offset of the pixel at `(x, y)`.
    #[inline]
    pub(crate) fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Get the size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}
