//! Framecrop WASM - WebAssembly bindings for framecrop
//!
//! This crate exposes the framecrop-core crop transform to the
//! JavaScript/TypeScript app shell.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for image data
//! - `crop` - Crop state wrapper and the crop-to-fixed-output binding
//!
//! # Usage
//!
//! ```typescript
//! import init, { crop_to_fixed_output, JsCropState, JsRasterImage } from '@framecrop/wasm';
//!
//! await init();
//!
//! const source = new JsRasterImage(width, height, rgbBytes);
//! const crop = JsCropState.from_json(cropSnapshot);
//! const post = crop_to_fixed_output(source, crop, rotation, flipped, 1080, 1080, true);
//! ```

use wasm_bindgen::prelude::*;

mod crop;
mod types;

// Re-export public types
pub use crop::{crop_source_rect, crop_to_fixed_output, JsCropState};
pub use types::JsRasterImage;

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
