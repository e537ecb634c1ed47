//! Layer rendering: compositing the stacked editor canvases.
//!
//! The editor UI stacks three canvases: the base image, a fully blurred
//! copy of it, and a drag overlay. The first two carry pixels and are
//! rendered here; the overlay only ever draws the in-progress selection
//! rectangle and stays on the host side as pure geometry.
//!
//! Rendering is a pure function of the working image, the rotation angle,
//! and the committed blur areas. It is re-run whenever any of those
//! change, and running it twice with the same inputs produces identical
//! layers.

use crate::geometry::{place_image, rotated_canvas_size, RotationAngle};
use crate::raster::Bitmap;
use crate::selection::BlurryArea;
use crate::EditorOptions;

/// Background color for canvas pixels the image does not cover.
const BACKGROUND: [u8; 3] = [0, 0, 0];

/// The two pixel-bearing layers of the editor canvas stack.
#[derive(Debug, Clone)]
pub struct LayerStack {
    /// The image layer, with committed blur regions replayed on top.
    pub base: Bitmap,
    /// A fully blurred copy of the image; commit-time snapshots are
    /// captured from this layer.
    pub blurred: Bitmap,
}

/// Render the layer stack for the current editor state.
///
/// Both layers share the same geometry: the canvas bitmap is sized via
/// [`rotated_canvas_size`], and the image is scaled to its placement,
/// rotated, and drawn at the screen position the placement case table
/// yields. The blurred layer applies the Gaussian filter before rotation.
/// The base layer then replays each committed area's pixel snapshot at its
/// normalized top-left anchor, in insertion order.
pub fn render_layers(
    image: &Bitmap,
    angle: RotationAngle,
    areas: &[BlurryArea],
    options: &EditorOptions,
) -> LayerStack {
    let blurred = render_image_layer(image, angle, Some(options.blur_sigma), options);
    let mut base = render_image_layer(image, angle, None, options);

    // First committed is drawn first, so later areas paint over earlier ones
    for area in areas {
        if let Some(pixels) = &area.pixels {
            let (x, y) = area.anchor();
            base.blit(pixels, x, y);
        }
    }

    LayerStack { base, blurred }
}

/// Render one canvas layer: scale, optionally blur, rotate, draw.
fn render_image_layer(
    image: &Bitmap,
    angle: RotationAngle,
    blur_sigma: Option<f32>,
    options: &EditorOptions,
) -> Bitmap {
    let bitmap_size = rotated_canvas_size(options.canvas, angle);
    let mut layer = Bitmap::filled(bitmap_size, BACKGROUND);

    if image.is_empty() {
        return layer;
    }

    let placement = place_image(image.size(), options.canvas, angle);
    let screen = placement.rotated_about_origin(angle);

    let Some(mut scaled) = image.scaled(placement.width as u32, placement.height as u32) else {
        return layer;
    };

    if let Some(sigma) = blur_sigma {
        if let Some(blurred) = scaled.blurred(sigma) {
            scaled = blurred;
        }
    }

    let Some(rotated) = scaled.rotated(angle) else {
        return layer;
    };

    layer.blit(&rotated, screen.x, screen.y);
    layer
}
