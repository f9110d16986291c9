//! Error type shared by every stage of the crop pipeline.

use thiserror::Error;

/// Errors returned by the crop pipeline.
///
/// The transform is deterministic, so none of these are worth retrying with
/// the same inputs. Callers are expected to surface them and request a new
/// crop state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CropError {
    /// The crop state is malformed or resolves to a non-positive area.
    #[error("Invalid crop geometry: {0}")]
    InvalidCropGeometry(String),

    /// The crop frame has no usable intersection with the source image.
    #[error("Crop region lies outside the source image")]
    CropOutOfBounds,

    /// A pixel buffer could not be allocated.
    #[error("Failed to allocate {bytes} bytes for pixel buffer")]
    AllocationFailure {
        /// Requested buffer size in bytes (saturated on overflow).
        bytes: usize,
    },

    /// The requested output size has a zero dimension.
    #[error("Invalid target size {width}x{height}")]
    InvalidTargetSize { width: u32, height: u32 },

    /// A pixel buffer does not match its declared dimensions.
    #[error("Pixel buffer size mismatch: expected {expected} bytes, got {actual}")]
    InvalidBuffer { expected: usize, actual: usize },
}

impl CropError {
    /// Shorthand for building an [`CropError::InvalidCropGeometry`].
    pub(crate) fn geometry(reason: impl Into<String>) -> Self {
        CropError::InvalidCropGeometry(reason.into())
    }
}
