//! The editor binding: one wasm class wrapping the core state machine.
//!
//! The JavaScript host owns the DOM: the stacked canvases, the button bar,
//! and the file picker. It forwards every pointer and button event here and
//! paints whatever `base_layer`/`blurred_layer` return after each call.
//! Image decoding runs asynchronously on the host side, so loads follow the
//! two-phase `begin_load`/`finish_load` protocol; a completion carrying a
//! superseded ticket is dropped and logged.

use retouch_core::{EditorMode, EditorState, Rect};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::types::JsBitmap;

/// The in-progress drag rectangle as handed to the overlay canvas,
/// serialized as a plain `{ x, y, width, height }` object.
#[derive(Debug, Serialize, PartialEq, Eq)]
struct DragRect {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl From<Rect> for DragRect {
    fn from(rect: Rect) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        }
    }
}

/// Tag for an in-flight image load, issued by [`Editor::begin_load`].
#[wasm_bindgen]
pub struct LoadTicket {
    inner: retouch_core::LoadTicket,
}

/// The image editor: rotation in 90° steps, drag-to-blur regions, and
/// JPEG export on mode exit.
#[wasm_bindgen]
pub struct Editor {
    inner: EditorState,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl Editor {
    /// Create an editor with the default 600x800 canvas.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Editor {
        Editor {
            inner: EditorState::new(),
        }
    }

    // ------------------------------------------------------------------
    // Image lifecycle
    // ------------------------------------------------------------------

    /// Start an image load. The returned ticket must be passed back to
    /// `finish_load` once the file bytes are available; issuing a newer
    /// ticket invalidates this one.
    pub fn begin_load(&mut self) -> LoadTicket {
        LoadTicket {
            inner: self.inner.begin_load(),
        }
    }

    /// Complete an image load: decode the bytes and install the image if
    /// the ticket is still current.
    ///
    /// Returns true when the image was installed, false when a newer load
    /// superseded this one (the result is dropped and a warning logged).
    ///
    /// # Errors
    ///
    /// Returns an error when the bytes are empty (no file selected) or not
    /// a decodable image; the message is suitable for a user notification.
    pub fn finish_load(&mut self, ticket: LoadTicket, bytes: &[u8]) -> Result<bool, JsValue> {
        let bitmap =
            retouch_core::decode_image(bytes).map_err(|e| JsValue::from_str(&e.to_string()))?;

        let installed = self.inner.finish_load(ticket.inner, bitmap);
        if !installed {
            warn("Dropping stale image load; a newer load superseded it");
        }
        Ok(installed)
    }

    /// True once an image has been loaded.
    pub fn has_image(&self) -> bool {
        self.inner.has_image()
    }

    // ------------------------------------------------------------------
    // Modes and rotation
    // ------------------------------------------------------------------

    /// True while rotation mode is active (rotate-left/right enabled).
    pub fn is_rotating(&self) -> bool {
        self.inner.mode() == EditorMode::Rotating
    }

    /// True while blur mode is active (canvas drags select blur regions).
    pub fn is_blurring(&self) -> bool {
        self.inner.mode() == EditorMode::Blurring
    }

    /// The current display angle in degrees (0, 90, 180, or 270).
    pub fn angle_degrees(&self) -> u32 {
        self.inner.angle().degrees()
    }

    /// Toggle rotation mode. On exit, returns the re-encoded JPEG that has
    /// the rotation baked in; the host replaces its image source with it.
    pub fn toggle_rotation(&mut self) -> Result<Option<Vec<u8>>, JsValue> {
        self.inner
            .toggle_rotation()
            .map(|export| export.map(|e| e.jpeg))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Step the display angle 90° counter-clockwise.
    pub fn rotate_left(&mut self) -> Result<(), JsValue> {
        self.inner
            .rotate_left()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Step the display angle 90° clockwise.
    pub fn rotate_right(&mut self) -> Result<(), JsValue> {
        self.inner
            .rotate_right()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Toggle blur mode. On exit, returns the re-encoded JPEG with the
    /// committed blur regions baked in, and clears the region list.
    pub fn toggle_blur(&mut self) -> Result<Option<Vec<u8>>, JsValue> {
        self.inner
            .toggle_blur()
            .map(|export| export.map(|e| e.jpeg))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Revert to the originally loaded image and clear all edit state.
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    // ------------------------------------------------------------------
    // Pointer events (forwarded from the topmost canvas)
    // ------------------------------------------------------------------

    /// Pointer pressed at canvas coordinates.
    pub fn pointer_down(&mut self, x: i32, y: i32, primary: bool) {
        self.inner.pointer_down(x, y, primary);
    }

    /// Pointer moved across the canvas.
    pub fn pointer_move(&mut self, x: i32, y: i32, primary_held: bool) {
        self.inner.pointer_move(x, y, primary_held);
    }

    /// Pointer released. Returns true when a blur region was committed.
    pub fn pointer_up(&mut self) -> bool {
        self.inner.pointer_up()
    }

    /// Pointer left the canvas. Returns true when a blur region was
    /// committed (primary button still held).
    pub fn pointer_leave(&mut self, primary_held: bool) -> bool {
        self.inner.pointer_leave(primary_held)
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// The canvas bitmap width at the current angle.
    pub fn canvas_width(&self) -> u32 {
        self.inner.canvas_size().width
    }

    /// The canvas bitmap height at the current angle.
    pub fn canvas_height(&self) -> u32 {
        self.inner.canvas_size().height
    }

    /// The base layer (image plus committed blur regions), or undefined
    /// before an image loads.
    pub fn base_layer(&self) -> Option<JsBitmap> {
        self.inner
            .layers()
            .map(|stack| JsBitmap::from_bitmap(stack.base.clone()))
    }

    /// The fully blurred layer, or undefined before an image loads.
    pub fn blurred_layer(&self) -> Option<JsBitmap> {
        self.inner
            .layers()
            .map(|stack| JsBitmap::from_bitmap(stack.blurred.clone()))
    }

    /// The in-progress drag rectangle for the overlay canvas, as
    /// `{ x, y, width, height }` or undefined when no drag is active.
    pub fn drag_rect(&self) -> Result<JsValue, JsValue> {
        let rect = self.inner.drag_rect().map(DragRect::from);
        serde_wasm_bindgen::to_value(&rect).map_err(JsValue::from)
    }

    /// Number of committed blur regions.
    pub fn area_count(&self) -> usize {
        self.inner.areas().len()
    }
}

/// Log a warning to the browser console.
fn warn(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&JsValue::from_str(message));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = message;
}
