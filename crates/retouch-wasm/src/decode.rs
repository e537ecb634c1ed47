//! Image decoding WASM bindings.
//!
//! Exposes the retouch-core decoder so the host can turn a user-selected
//! file (JPEG or PNG bytes) into a pixel buffer, with EXIF orientation
//! applied. Most callers go through `Editor.finish_load` instead, which
//! decodes internally; this free function exists for hosts that want the
//! pixels without an editor.

use crate::types::JsBitmap;
use retouch_core::decode;
use wasm_bindgen::prelude::*;

/// Decode an image from bytes.
///
/// The format is guessed from the content; JPEG and PNG are supported.
/// EXIF orientation is applied, so the returned pixels are upright.
///
/// # Errors
///
/// Returns an error if the byte slice is empty (no file selected) or the
/// data cannot be decoded. The error message is suitable for showing to
/// the user.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const bytes = new Uint8Array(await file.arrayBuffer());
/// const bitmap = decode_image(bytes);
/// console.log(`Decoded ${bitmap.width}x${bitmap.height}`);
/// ```
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsBitmap, JsValue> {
    decode::decode_image(bytes)
        .map(JsBitmap::from_bitmap)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
