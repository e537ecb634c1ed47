//! Retouch WASM - WebAssembly bindings for Retouch
//!
//! This crate exposes the retouch-core editor to JavaScript/TypeScript
//! applications. The host owns the DOM (three stacked canvases, the
//! button bar, and the file picker) and drives the [`Editor`] class with
//! pointer and button events, repainting from the returned layers.
//!
//! # Module Structure
//!
//! - `editor` - The `Editor` class: modes, pointer events, layers, export
//! - `types` - WASM-compatible wrapper types for image data
//! - `decode` - Image decoding bindings (JPEG/PNG with EXIF orientation)
//! - `encode` - Image encoding bindings (JPEG export)
//!
//! # Usage
//!
//! ```typescript
//! import init, { Editor } from '@retouch/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const editor = new Editor();
//! const ticket = editor.begin_load();
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! editor.finish_load(ticket, bytes);
//!
//! // Repaint from editor.base_layer() / editor.blurred_layer()
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod editor;
mod encode;
mod types;

// Re-export public types
pub use decode::decode_image;
pub use editor::{Editor, LoadTicket};
pub use encode::{encode_jpeg, export_quality};
pub use types::JsBitmap;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Future: Set up panic hook for better error messages in browser console
    // when console_error_panic_hook feature is added
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
