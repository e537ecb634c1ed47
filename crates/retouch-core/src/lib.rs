//! Retouch Core - Image editor logic
//!
//! This crate provides the core functionality for Retouch, a browser-based
//! image editor: canvas geometry for quarter-turn rotation, layer rendering,
//! drag-to-select blur regions, and JPEG export. The WASM bindings crate
//! exposes these pieces to the JavaScript UI, which owns the DOM canvases
//! and forwards pointer and button events.

pub mod decode;
pub mod editor;
pub mod encode;
pub mod geometry;
pub mod raster;
pub mod render;
pub mod selection;

pub use decode::{decode_image, DecodeError};
pub use editor::{EditorError, EditorMode, EditorState, Export, LoadTicket};
pub use encode::{encode_jpeg, EncodeError, EXPORT_QUALITY};
pub use geometry::{place_image, rotated_canvas_size, Rect, RotationAngle, Size};
pub use raster::Bitmap;
pub use render::{render_layers, LayerStack};
pub use selection::{BlurryArea, DragSelection};

/// Default logical canvas width in pixels.
pub const CANVAS_WIDTH: u32 = 600;

/// Default logical canvas height in pixels.
pub const CANVAS_HEIGHT: u32 = 800;

/// Sigma of the fixed Gaussian filter applied to the blurred layer.
pub const BLUR_SIGMA: f32 = 4.0;

/// Editor configuration.
///
/// The defaults match the hosted UI: a 600x800 logical canvas, the fixed
/// blur strength, and the fixed JPEG export quality.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EditorOptions {
    /// Logical canvas size before rotation adjustment.
    pub canvas: Size,
    /// Gaussian sigma for the blurred layer.
    pub blur_sigma: f32,
    /// JPEG quality (1-100) for mode-exit exports.
    pub export_quality: u8,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            canvas: Size::new(CANVAS_WIDTH, CANVAS_HEIGHT),
            blur_sigma: BLUR_SIGMA,
            export_quality: EXPORT_QUALITY,
        }
    }
}
