//! WASM bindings for the crop-to-fixed-output transform.
//!
//! The app shell keeps a `JsCropState` in sync with the user's gestures and
//! hands it over, together with the source image, when the crop is committed.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const crop = new JsCropState(1.2, 0.5, 0, 0, 1200, 2000);
//! const out = crop_to_fixed_output(source, crop, 90, true, 1920, 1080, false);
//! console.log(`Cropped ${out.width}x${out.height}`);
//! ```

use crate::types::JsRasterImage;
use framecrop_core::transform::resolve_source_rect;
use framecrop_core::{crop_to_fixed_output_with, CropError, CropOptions, CropState};
use wasm_bindgen::prelude::*;

/// Convert a core error into a thrown JavaScript value, logging it first.
fn to_js_error(err: CropError) -> JsValue {
    let message = err.to_string();
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&JsValue::from_str(&format!("framecrop: {}", message)));
    JsValue::from_str(&message)
}

/// Crop viewport snapshot for JavaScript.
///
/// Wraps the core `CropState`. All lengths are canvas pixels.
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsCropState {
    inner: CropState,
}

#[wasm_bindgen]
impl JsCropState {
    /// Create a crop state.
    ///
    /// # Arguments
    /// * `image_scale` - Zoom relative to the fit-to-canvas size
    /// * `frame_scale` - Frame size relative to the canvas's shorter side
    /// * `offset_x`, `offset_y` - Pan of the image center from the canvas center
    /// * `canvas_width`, `canvas_height` - Viewport size
    #[wasm_bindgen(constructor)]
    pub fn new(
        image_scale: f64,
        frame_scale: f64,
        offset_x: f64,
        offset_y: f64,
        canvas_width: f64,
        canvas_height: f64,
    ) -> JsCropState {
        JsCropState {
            inner: CropState::new(image_scale, frame_scale, canvas_width, canvas_height)
                .with_offset(offset_x, offset_y),
        }
    }

    /// Get image scale
    #[wasm_bindgen(getter)]
    pub fn image_scale(&self) -> f64 {
        self.inner.image_scale
    }

    /// Set image scale
    #[wasm_bindgen(setter)]
    pub fn set_image_scale(&mut self, value: f64) {
        self.inner.image_scale = value;
    }

    /// Get frame scale
    #[wasm_bindgen(getter)]
    pub fn frame_scale(&self) -> f64 {
        self.inner.frame_scale
    }

    /// Set frame scale
    #[wasm_bindgen(setter)]
    pub fn set_frame_scale(&mut self, value: f64) {
        self.inner.frame_scale = value;
    }

    /// Get horizontal pan offset
    #[wasm_bindgen(getter)]
    pub fn offset_x(&self) -> f64 {
        self.inner.offset_x
    }

    /// Set horizontal pan offset
    #[wasm_bindgen(setter)]
    pub fn set_offset_x(&mut self, value: f64) {
        self.inner.offset_x = value;
    }

    /// Get vertical pan offset
    #[wasm_bindgen(getter)]
    pub fn offset_y(&self) -> f64 {
        self.inner.offset_y
    }

    /// Set vertical pan offset
    #[wasm_bindgen(setter)]
    pub fn set_offset_y(&mut self, value: f64) {
        self.inner.offset_y = value;
    }

    /// Get canvas width
    #[wasm_bindgen(getter)]
    pub fn canvas_width(&self) -> f64 {
        self.inner.canvas_width
    }

    /// Get canvas height
    #[wasm_bindgen(getter)]
    pub fn canvas_height(&self) -> f64 {
        self.inner.canvas_height
    }

    /// Resize the canvas (e.g. on device rotation)
    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.inner.canvas_width = width;
        self.inner.canvas_height = height;
    }

    /// Serialize to a plain object (camelCase keys)
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Deserialize from a plain object (camelCase keys)
    pub fn from_json(value: JsValue) -> Result<JsCropState, JsValue> {
        let inner: CropState =
            serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self { inner })
    }
}

impl JsCropState {
    /// Get a reference to the inner CropState for use by the bindings
    pub(crate) fn inner(&self) -> &CropState {
        &self.inner
    }
}

/// Crop an image to exactly `target_width x target_height`.
///
/// # Arguments
///
/// * `image` - Source image; not modified
/// * `crop` - Viewport snapshot at commit time
/// * `rotation_angle` - Clockwise rotation in degrees
/// * `flip_horizontal` - Whether the displayed image is mirrored
/// * `target_width`, `target_height` - Output size
/// * `high_quality` - Use Lanczos3 filters (slower, for export)
///
/// # Errors
///
/// Throws the error message when the crop is malformed or misses the image.
#[wasm_bindgen]
pub fn crop_to_fixed_output(
    image: &JsRasterImage,
    crop: &JsCropState,
    rotation_angle: f64,
    flip_horizontal: bool,
    target_width: u32,
    target_height: u32,
    high_quality: bool,
) -> Result<JsRasterImage, JsValue> {
    let options = if high_quality {
        CropOptions::high_quality()
    } else {
        CropOptions::default()
    };

    crop_to_fixed_output_with(
        image.raster(),
        crop.inner(),
        rotation_angle,
        flip_horizontal,
        target_width,
        target_height,
        &options,
    )
    .map(JsRasterImage::from_raster)
    .map_err(to_js_error)
}

/// Source-pixel rectangle `[x, y, width, height]` framed by `crop`.
///
/// Ignores rotation and flip; intended for drawing preview overlays. The
/// rectangle is not clamped to the image.
///
/// # Errors
///
/// Throws when the crop state is malformed or collapses to zero size.
#[wasm_bindgen]
pub fn crop_source_rect(
    source_width: u32,
    source_height: u32,
    crop: &JsCropState,
    target_width: u32,
    target_height: u32,
) -> Result<Vec<f64>, JsValue> {
    if target_width == 0 || target_height == 0 {
        return Err(to_js_error(CropError::InvalidTargetSize {
            width: target_width,
            height: target_height,
        }));
    }
    let aspect = target_width as f64 / target_height as f64;
    let rect = resolve_source_rect(crop.inner(), source_width, source_height, aspect)
        .map_err(to_js_error)?;
    Ok(vec![rect.x, rect.y, rect.width, rect.height])
}
