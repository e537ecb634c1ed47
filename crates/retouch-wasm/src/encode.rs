//! Image encoding WASM bindings.
//!
//! Exposes the retouch-core JPEG encoder. The editor already hands back
//! encoded bytes when a tool mode is exited; these functions let the host
//! re-encode arbitrary bitmaps (for example a download at a different
//! quality).

use crate::types::JsBitmap;
use retouch_core::encode;
use wasm_bindgen::prelude::*;

/// The fixed quality used for mode-exit exports.
#[wasm_bindgen]
pub fn export_quality() -> u8 {
    encode::EXPORT_QUALITY
}

/// Encode a bitmap to JPEG bytes.
///
/// # Arguments
///
/// * `bitmap` - The bitmap to encode
/// * `quality` - JPEG quality (1-100, clamped)
///
/// # Errors
///
/// Returns an error if the bitmap has zero dimensions or an inconsistent
/// pixel buffer.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const jpeg = encode_jpeg(bitmap, 90);
/// const blob = new Blob([jpeg], { type: 'image/jpeg' });
/// ```
#[wasm_bindgen]
pub fn encode_jpeg(bitmap: &JsBitmap, quality: u8) -> Result<Vec<u8>, JsValue> {
    encode::encode_jpeg(&bitmap.to_bitmap(), quality)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
