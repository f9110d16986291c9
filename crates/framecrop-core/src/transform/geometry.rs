//! Viewport geometry: mapping the on-screen crop frame back to source pixels.
//!
//! # Fit Convention
//!
//! At `image_scale = 1` the source image, in its native orientation, is
//! scaled to fit entirely inside the canvas (containment, so the shorter
//! relative side decides) and centered on it. `image_scale` zooms around
//! that placement and the pan offsets then move the image center away from
//! the canvas center.
//!
//! The crop frame is centered on the canvas, has the output's aspect ratio,
//! and its longer side is `frame_scale * min(canvas_width, canvas_height)`.

use serde::{Deserialize, Serialize};

use crate::error::CropError;

/// Snapshot of the interactive crop viewport at commit time.
///
/// All lengths are in canvas pixels. This is a plain value; it holds no
/// reference to whatever view system produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropState {
    /// Zoom relative to the fit-to-canvas size (must be > 0)
    pub image_scale: f64,
    /// Frame size relative to the canvas's shorter side (0 < x <= 1)
    pub frame_scale: f64,
    /// Horizontal pan of the image center from the canvas center
    #[serde(default)]
    pub offset_x: f64,
    /// Vertical pan of the image center from the canvas center
    #[serde(default)]
    pub offset_y: f64,
    /// Viewport width (must be > 0)
    pub canvas_width: f64,
    /// Viewport height (must be > 0)
    pub canvas_height: f64,
}

impl CropState {
    /// Create a crop state with no pan offset.
    pub fn new(image_scale: f64, frame_scale: f64, canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            image_scale,
            frame_scale,
            offset_x: 0.0,
            offset_y: 0.0,
            canvas_width,
            canvas_height,
        }
    }

    /// Return a copy panned by the given canvas offset.
    pub fn with_offset(mut self, offset_x: f64, offset_y: f64) -> Self {
        self.offset_x = offset_x;
        self.offset_y = offset_y;
        self
    }

    /// Check the value invariants.
    pub fn validate(&self) -> Result<(), CropError> {
        let fields = [
            self.image_scale,
            self.frame_scale,
            self.offset_x,
            self.offset_y,
            self.canvas_width,
            self.canvas_height,
        ];
        if fields.iter().any(|v| !v.is_finite()) {
            return Err(CropError::geometry("crop state contains a non-finite value"));
        }
        if self.image_scale <= 0.0 {
            return Err(CropError::geometry(format!(
                "image scale must be positive, got {}",
                self.image_scale
            )));
        }
        if self.frame_scale <= 0.0 || self.frame_scale > 1.0 {
            return Err(CropError::geometry(format!(
                "frame scale must be in (0, 1], got {}",
                self.frame_scale
            )));
        }
        if self.canvas_width <= 0.0 || self.canvas_height <= 0.0 {
            return Err(CropError::geometry(format!(
                "canvas must have positive size, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        Ok(())
    }

    /// Scale that fits a `source_width x source_height` image inside the canvas.
    pub fn fit_scale(&self, source_width: u32, source_height: u32) -> f64 {
        let sx = self.canvas_width / source_width as f64;
        let sy = self.canvas_height / source_height as f64;
        sx.min(sy)
    }

    /// Crop frame size on the canvas for a frame of the given aspect ratio.
    pub fn frame_size(&self, aspect: f64) -> (f64, f64) {
        let side = self.frame_scale * self.canvas_width.min(self.canvas_height);
        if aspect >= 1.0 {
            (side, side / aspect)
        } else {
            (side * aspect, side)
        }
    }
}

/// Unclamped rectangle in source pixel coordinates.
///
/// Expressed against the image's native orientation. It may extend past the
/// image on any side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SourceRect {
    /// Center point of the rectangle.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Right edge (exclusive).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Resolve the on-canvas crop frame into source pixel coordinates.
///
/// # Arguments
///
/// * `crop` - Viewport snapshot
/// * `source_width`, `source_height` - Native source image size
/// * `frame_aspect` - Width / height of the crop frame (the output's aspect)
///
/// # Errors
///
/// `CropError::InvalidCropGeometry` if the crop state breaks its invariants
/// or the resolved rectangle rounds to zero width or height.
pub fn resolve_source_rect(
    crop: &CropState,
    source_width: u32,
    source_height: u32,
    frame_aspect: f64,
) -> Result<SourceRect, CropError> {
    crop.validate()?;
    if source_width == 0 || source_height == 0 {
        return Err(CropError::geometry("source image has zero size"));
    }
    if !frame_aspect.is_finite() || frame_aspect <= 0.0 {
        return Err(CropError::geometry(format!(
            "frame aspect must be positive, got {}",
            frame_aspect
        )));
    }

    let fit = crop.fit_scale(source_width, source_height);
    let scale = fit * crop.image_scale;

    // Image placement on the canvas
    let display_w = source_width as f64 * scale;
    let display_h = source_height as f64 * scale;
    let canvas_cx = crop.canvas_width / 2.0;
    let canvas_cy = crop.canvas_height / 2.0;
    let image_left = canvas_cx + crop.offset_x - display_w / 2.0;
    let image_top = canvas_cy + crop.offset_y - display_h / 2.0;

    // Frame placement on the canvas
    let (frame_w, frame_h) = crop.frame_size(frame_aspect);
    let frame_left = canvas_cx - frame_w / 2.0;
    let frame_top = canvas_cy - frame_h / 2.0;

    let rect = SourceRect {
        x: (frame_left - image_left) / scale,
        y: (frame_top - image_top) / scale,
        width: frame_w / scale,
        height: frame_h / scale,
    };

    if !(rect.width.round() > 0.0 && rect.height.round() > 0.0) {
        return Err(CropError::geometry(format!(
            "crop frame resolves to {:.4}x{:.4} source pixels",
            rect.width, rect.height
        )));
    }

    Ok(rect)
}
