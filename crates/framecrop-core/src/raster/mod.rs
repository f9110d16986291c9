//! Pixel buffers and fixed-size resizing.
//!
//! All rasters are packed RGB8 in row-major order. The crop pipeline borrows
//! the caller's [`SourceImage`] read-only and always returns a freshly
//! allocated [`CroppedImage`].

mod resize;
mod types;

pub use resize::resize_exact;
pub use types::{
    buffer_len, CroppedImage, FilterType, Orientation, Raster, SourceImage, CHANNELS,
};
