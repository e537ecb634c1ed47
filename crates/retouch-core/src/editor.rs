//! The editor state machine.
//!
//! [`EditorState`] owns the working image, the rotation angle, the drag
//! selection, and the committed blur areas, and enforces the interaction
//! rules: rotation and blur mode are mutually exclusive, rotation steps are
//! only accepted in rotation mode, and pointer events only matter in blur
//! mode. Exiting either mode bakes the edit into a freshly encoded JPEG
//! that replaces the working image.
//!
//! All state transitions happen on discrete host callbacks (pointer events,
//! button clicks, load completions) on a single thread; there is no
//! locking. Image decoding is asynchronous on the host side, so loads are
//! tagged with a generation ticket and a completion carrying a stale ticket
//! is dropped; the newest requested load always wins.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encode::{encode_jpeg, EncodeError};
use crate::geometry::{rotated_canvas_size, Rect, RotationAngle, Size};
use crate::raster::Bitmap;
use crate::render::{render_layers, LayerStack};
use crate::selection::{BlurryArea, DragSelection};
use crate::EditorOptions;

/// The editor's interaction mode. Rotating and blurring are mutually
/// exclusive; entering one disables the controls of the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EditorMode {
    /// No tool active.
    #[default]
    Idle,
    /// Rotate-left/right controls are live; angle may be non-zero.
    Rotating,
    /// Pointer drags define blur rectangles.
    Blurring,
}

/// Errors surfaced by editor operations.
#[derive(Debug, Error)]
pub enum EditorError {
    /// The operation needs a loaded image.
    #[error("No image is loaded")]
    ImageNotLoaded,

    /// The other tool mode is active and its controls are disabled.
    #[error("Control disabled while {0:?} mode is active")]
    ModeLocked(EditorMode),

    /// A rotation step was requested outside rotation mode.
    #[error("Rotation controls are only active in rotation mode")]
    NotRotating,

    /// Baking the edit failed during JPEG encoding.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Tag for an in-flight image load. Only the most recently issued ticket
/// is accepted by [`EditorState::finish_load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// The result of exiting a tool mode: the edited canvas re-encoded as a
/// JPEG. The same raster replaces the editor's working image.
#[derive(Debug, Clone)]
pub struct Export {
    /// JPEG bytes at the configured export quality.
    pub jpeg: Vec<u8>,
    /// Dimensions of the exported raster.
    pub size: Size,
}

/// The single mutable editor state record, owned by the UI event loop.
#[derive(Debug, Clone, Default)]
pub struct EditorState {
    options: EditorOptions,
    /// The first successfully loaded image, restored on reset.
    original: Option<Bitmap>,
    /// The current base raster; replaced by the baked result on mode exit.
    working: Option<Bitmap>,
    angle: RotationAngle,
    mode: EditorMode,
    selection: DragSelection,
    areas: Vec<BlurryArea>,
    /// Rendered canvases, refreshed whenever image, angle, or areas change.
    layers: Option<LayerStack>,
    load_generation: u64,
}

impl EditorState {
    /// Create an editor with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an editor with explicit options.
    pub fn with_options(options: EditorOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// The current interaction mode.
    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    /// The current display angle.
    pub fn angle(&self) -> RotationAngle {
        self.angle
    }

    /// True once an image has been loaded.
    pub fn has_image(&self) -> bool {
        self.working.is_some()
    }

    /// The canvas bitmap size at the current angle.
    pub fn canvas_size(&self) -> Size {
        rotated_canvas_size(self.options.canvas, self.angle)
    }

    /// The committed blur areas, oldest first.
    pub fn areas(&self) -> &[BlurryArea] {
        &self.areas
    }

    /// The in-progress drag rectangle for the overlay, if any.
    pub fn drag_rect(&self) -> Option<Rect> {
        self.selection.rect()
    }

    /// The rendered layers, if an image is loaded.
    pub fn layers(&self) -> Option<&LayerStack> {
        self.layers.as_ref()
    }

    // ------------------------------------------------------------------
    // Image lifecycle
    // ------------------------------------------------------------------

    /// Register a new image load and return its ticket.
    ///
    /// Issuing a new ticket invalidates all earlier ones, so of several
    /// overlapping loads only the most recently requested can complete.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.load_generation += 1;
        LoadTicket(self.load_generation)
    }

    /// Install a decoded image if its ticket is still current.
    ///
    /// Returns false (and leaves the state untouched) when the ticket has
    /// been superseded by a later `begin_load`.
    pub fn finish_load(&mut self, ticket: LoadTicket, bitmap: Bitmap) -> bool {
        if ticket.0 != self.load_generation {
            return false;
        }
        if self.original.is_none() {
            self.original = Some(bitmap.clone());
        }
        self.working = Some(bitmap);
        self.refresh();
        true
    }

    // ------------------------------------------------------------------
    // Rotation mode
    // ------------------------------------------------------------------

    /// Toggle rotation mode.
    ///
    /// Entering requires a loaded image and is refused while blur mode is
    /// active. Exiting bakes the rotation into a re-encoded working image
    /// and resets the angle to 0; committed blur areas are untouched.
    pub fn toggle_rotation(&mut self) -> Result<Option<Export>, EditorError> {
        match self.mode {
            EditorMode::Blurring => Err(EditorError::ModeLocked(EditorMode::Blurring)),
            EditorMode::Idle => {
                if !self.has_image() {
                    return Err(EditorError::ImageNotLoaded);
                }
                self.mode = EditorMode::Rotating;
                Ok(None)
            }
            EditorMode::Rotating => {
                let export = self.bake()?;
                self.angle = RotationAngle::Deg0;
                self.mode = EditorMode::Idle;
                self.refresh();
                Ok(Some(export))
            }
        }
    }

    /// Step the display angle 90° counter-clockwise (the "left" control).
    pub fn rotate_left(&mut self) -> Result<(), EditorError> {
        if self.mode != EditorMode::Rotating {
            return Err(EditorError::NotRotating);
        }
        self.angle = self.angle.stepped_left();
        self.refresh();
        Ok(())
    }

    /// Step the display angle 90° clockwise (the "right" control).
    pub fn rotate_right(&mut self) -> Result<(), EditorError> {
        if self.mode != EditorMode::Rotating {
            return Err(EditorError::NotRotating);
        }
        self.angle = self.angle.stepped_right();
        self.refresh();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Blur mode
    // ------------------------------------------------------------------

    /// Toggle blur mode.
    ///
    /// Entering requires a loaded image and is refused while rotation mode
    /// is active. Exiting bakes the composited blur regions into a
    /// re-encoded working image and clears the committed-area list.
    pub fn toggle_blur(&mut self) -> Result<Option<Export>, EditorError> {
        match self.mode {
            EditorMode::Rotating => Err(EditorError::ModeLocked(EditorMode::Rotating)),
            EditorMode::Idle => {
                if !self.has_image() {
                    return Err(EditorError::ImageNotLoaded);
                }
                self.mode = EditorMode::Blurring;
                Ok(None)
            }
            EditorMode::Blurring => {
                self.selection.cancel();
                let export = self.bake()?;
                self.areas.clear();
                self.mode = EditorMode::Idle;
                self.refresh();
                Ok(Some(export))
            }
        }
    }

    /// Pointer pressed on the canvas. Starts a drag in blur mode when the
    /// primary button is down; ignored otherwise.
    pub fn pointer_down(&mut self, x: i32, y: i32, primary: bool) {
        if self.mode != EditorMode::Blurring || !primary {
            return;
        }
        self.selection.begin(x, y);
    }

    /// Pointer moved. Resizes the drag rectangle while the primary button
    /// is held; ignored otherwise.
    pub fn pointer_move(&mut self, x: i32, y: i32, primary_held: bool) {
        if self.mode != EditorMode::Blurring || !primary_held {
            return;
        }
        self.selection.update(x, y);
    }

    /// Pointer released. Commits the drag rectangle as a blur area when it
    /// has non-zero width and height; returns whether an area was added.
    pub fn pointer_up(&mut self) -> bool {
        self.commit_selection()
    }

    /// Pointer left the canvas. With the primary button still held this
    /// commits exactly like a release; otherwise any stray drag state is
    /// discarded.
    pub fn pointer_leave(&mut self, primary_held: bool) -> bool {
        if primary_held {
            self.commit_selection()
        } else {
            self.selection.cancel();
            false
        }
    }

    // ------------------------------------------------------------------
    // Reset
    // ------------------------------------------------------------------

    /// Revert to the original image: clears committed areas, the angle,
    /// both modes, and any in-progress drag.
    pub fn reset(&mut self) {
        self.mode = EditorMode::Idle;
        self.angle = RotationAngle::Deg0;
        self.areas.clear();
        self.selection.cancel();
        self.working = self.original.clone();
        self.refresh();
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Commit the in-progress drag: capture the blurred-layer pixels under
    /// the rectangle and append a [`BlurryArea`].
    fn commit_selection(&mut self) -> bool {
        if self.mode != EditorMode::Blurring {
            self.selection.cancel();
            return false;
        }
        let Some(rect) = self.selection.finish() else {
            return false;
        };

        // Snapshot may be None when the whole rect lies off-canvas; the
        // area still commits but replays nothing.
        let pixels = self
            .layers
            .as_ref()
            .and_then(|stack| stack.blurred.capture(rect));

        self.areas.push(BlurryArea { rect, pixels });
        self.refresh();
        true
    }

    /// Re-encode the current base layer and make it the new working image.
    fn bake(&mut self) -> Result<Export, EditorError> {
        let base = match &self.layers {
            Some(stack) => stack.base.clone(),
            None => return Err(EditorError::ImageNotLoaded),
        };
        let jpeg = encode_jpeg(&base, self.options.export_quality)?;
        let size = base.size();
        self.working = Some(base);
        Ok(Export { jpeg, size })
    }

    /// Re-render the layer stack from the current image, angle, and areas.
    fn refresh(&mut self) {
        self.layers = self
            .working
            .as_ref()
            .map(|image| render_layers(image, self.angle, &self.areas, &self.options));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_options() -> EditorOptions {
        EditorOptions {
            canvas: Size::new(60, 80),
            blur_sigma: 2.0,
            export_quality: 90,
        }
    }

    /// A portrait gradient image so edits are visible in the pixels.
    fn test_image() -> Bitmap {
        let (w, h) = (30u32, 40u32);
        let mut pixels = Vec::with_capacity((w * h * 3) as usize);
        for y in 0..h {
            for x in 0..w {
                pixels.push((x * 8) as u8);
                pixels.push((y * 6) as u8);
                pixels.push(128);
            }
        }
        Bitmap::new(w, h, pixels)
    }

    /// An editor with the test image installed.
    fn loaded_editor() -> EditorState {
        let mut editor = EditorState::with_options(test_options());
        let ticket = editor.begin_load();
        assert!(editor.finish_load(ticket, test_image()));
        editor
    }

    #[test]
    fn test_new_editor_is_idle_and_empty() {
        let editor = EditorState::new();
        assert_eq!(editor.mode(), EditorMode::Idle);
        assert_eq!(editor.angle(), RotationAngle::Deg0);
        assert!(!editor.has_image());
        assert!(editor.layers().is_none());
        assert!(editor.areas().is_empty());
    }

    #[test]
    fn test_finish_load_installs_image() {
        let mut editor = EditorState::with_options(test_options());
        let ticket = editor.begin_load();

        assert!(editor.finish_load(ticket, test_image()));
        assert!(editor.has_image());
        assert!(editor.layers().is_some());
    }

    #[test]
    fn test_stale_load_is_dropped() {
        let mut editor = EditorState::with_options(test_options());
        let first = editor.begin_load();
        let second = editor.begin_load();

        // The older ticket lost the race and must not install
        assert!(!editor.finish_load(first, test_image()));
        assert!(!editor.has_image());

        assert!(editor.finish_load(second, test_image()));
        assert!(editor.has_image());
    }

    #[test]
    fn test_completion_order_does_not_matter() {
        let mut editor = EditorState::with_options(test_options());
        let first = editor.begin_load();
        let second = editor.begin_load();

        // Newest completes first, then the stale one arrives late
        assert!(editor.finish_load(second, test_image()));
        assert!(!editor.finish_load(first, Bitmap::filled(Size::new(2, 2), [9, 9, 9])));

        // The newest load's pixels are still installed
        assert_eq!(editor.working.as_ref().unwrap().width, 30);
    }

    #[test]
    fn test_mode_toggles_require_image() {
        let mut editor = EditorState::with_options(test_options());
        assert!(matches!(
            editor.toggle_rotation(),
            Err(EditorError::ImageNotLoaded)
        ));
        assert!(matches!(
            editor.toggle_blur(),
            Err(EditorError::ImageNotLoaded)
        ));
    }

    #[test]
    fn test_modes_are_mutually_exclusive() {
        let mut editor = loaded_editor();

        editor.toggle_rotation().unwrap();
        assert!(matches!(
            editor.toggle_blur(),
            Err(EditorError::ModeLocked(EditorMode::Rotating))
        ));

        editor.toggle_rotation().unwrap(); // exit
        editor.toggle_blur().unwrap();
        assert!(matches!(
            editor.toggle_rotation(),
            Err(EditorError::ModeLocked(EditorMode::Blurring))
        ));
    }

    #[test]
    fn test_rotate_steps_require_rotation_mode() {
        let mut editor = loaded_editor();
        assert!(matches!(editor.rotate_left(), Err(EditorError::NotRotating)));
        assert!(matches!(
            editor.rotate_right(),
            Err(EditorError::NotRotating)
        ));
    }

    #[test]
    fn test_rotation_steps_and_canvas_size() {
        let mut editor = loaded_editor();
        editor.toggle_rotation().unwrap();

        editor.rotate_right().unwrap();
        assert_eq!(editor.angle(), RotationAngle::Deg90);
        assert_eq!(editor.canvas_size(), Size::new(80, 60));

        editor.rotate_left().unwrap();
        assert_eq!(editor.angle(), RotationAngle::Deg0);
        assert_eq!(editor.canvas_size(), Size::new(60, 80));
    }

    #[test]
    fn test_exit_rotation_bakes_and_resets_angle() {
        let mut editor = loaded_editor();
        editor.toggle_rotation().unwrap();
        editor.rotate_right().unwrap();

        let export = editor.toggle_rotation().unwrap().unwrap();

        assert_eq!(editor.mode(), EditorMode::Idle);
        assert_eq!(editor.angle(), RotationAngle::Deg0);
        // The baked image is the rotated canvas (80x60 landscape)
        assert_eq!(export.size, Size::new(80, 60));
        assert_eq!(&export.jpeg[0..2], &[0xFF, 0xD8]);
        assert_eq!(editor.working.as_ref().unwrap().size(), Size::new(80, 60));
    }

    #[test]
    fn test_exit_rotation_keeps_committed_areas() {
        let mut editor = loaded_editor();

        // Plant a committed area directly; only a blur-mode exit or a
        // reset is allowed to clear the list
        editor.areas.push(BlurryArea {
            rect: Rect::new(5, 5, 10, 10),
            pixels: None,
        });

        editor.toggle_rotation().unwrap();
        editor.rotate_right().unwrap();
        editor.toggle_rotation().unwrap().unwrap();

        assert_eq!(editor.areas().len(), 1);
    }

    #[test]
    fn test_pointer_events_ignored_outside_blur_mode() {
        let mut editor = loaded_editor();

        editor.pointer_down(10, 10, true);
        editor.pointer_move(30, 30, true);
        assert!(!editor.pointer_up());
        assert!(editor.areas().is_empty());
    }

    #[test]
    fn test_non_primary_button_does_not_drag() {
        let mut editor = loaded_editor();
        editor.toggle_blur().unwrap();

        editor.pointer_down(10, 10, false);
        editor.pointer_move(30, 30, true);
        assert!(!editor.pointer_up());
        assert!(editor.areas().is_empty());
    }

    #[test]
    fn test_drag_commit_captures_blurred_pixels() {
        let mut editor = loaded_editor();
        editor.toggle_blur().unwrap();

        editor.pointer_down(10, 10, true);
        editor.pointer_move(30, 30, true);
        assert_eq!(editor.drag_rect(), Some(Rect::new(10, 10, 20, 20)));
        assert!(editor.pointer_up());

        let area = &editor.areas()[0];
        assert_eq!(area.rect, Rect::new(10, 10, 20, 20));
        let pixels = area.pixels.as_ref().unwrap();
        assert_eq!(pixels.width, 20);
        assert_eq!(pixels.height, 20);
        assert!(editor.drag_rect().is_none());
    }

    #[test]
    fn test_click_without_drag_commits_nothing() {
        let mut editor = loaded_editor();
        editor.toggle_blur().unwrap();

        editor.pointer_down(10, 10, true);
        assert!(!editor.pointer_up());
        assert!(editor.areas().is_empty());
    }

    #[test]
    fn test_leave_with_button_held_commits() {
        let mut editor = loaded_editor();
        editor.toggle_blur().unwrap();

        editor.pointer_down(10, 10, true);
        editor.pointer_move(25, 35, true);
        assert!(editor.pointer_leave(true));
        assert_eq!(editor.areas().len(), 1);
    }

    #[test]
    fn test_leave_without_button_discards_drag() {
        let mut editor = loaded_editor();
        editor.toggle_blur().unwrap();

        editor.pointer_down(10, 10, true);
        editor.pointer_move(25, 35, true);
        assert!(!editor.pointer_leave(false));
        assert!(editor.areas().is_empty());
        assert!(editor.drag_rect().is_none());
    }

    #[test]
    fn test_negative_drag_commits_min_corner_rect() {
        let mut editor = loaded_editor();
        editor.toggle_blur().unwrap();

        editor.pointer_down(50, 40, true);
        editor.pointer_move(10, 10, true);
        assert!(editor.pointer_up());

        assert_eq!(editor.areas()[0].rect, Rect::new(10, 10, 40, 30));
    }

    #[test]
    fn test_exit_blur_bakes_and_clears_areas() {
        let mut editor = loaded_editor();
        editor.toggle_blur().unwrap();

        editor.pointer_down(10, 10, true);
        editor.pointer_move(30, 30, true);
        editor.pointer_up();

        let baked_region = editor.layers().unwrap().base.capture(Rect::new(10, 10, 20, 20));

        let export = editor.toggle_blur().unwrap().unwrap();
        assert_eq!(editor.mode(), EditorMode::Idle);
        assert!(editor.areas().is_empty());
        assert_eq!(&export.jpeg[0..2], &[0xFF, 0xD8]);

        // The new working image carries the blur baked in
        let working_region = editor
            .working
            .as_ref()
            .unwrap()
            .capture(Rect::new(10, 10, 20, 20));
        assert_eq!(working_region, baked_region);
    }

    #[test]
    fn test_reset_reverts_everything() {
        let mut editor = loaded_editor();

        editor.toggle_rotation().unwrap();
        editor.rotate_right().unwrap();
        editor.toggle_rotation().unwrap().unwrap();

        editor.toggle_blur().unwrap();
        editor.pointer_down(5, 5, true);
        editor.pointer_move(20, 20, true);
        editor.pointer_up();

        editor.reset();

        assert_eq!(editor.mode(), EditorMode::Idle);
        assert_eq!(editor.angle(), RotationAngle::Deg0);
        assert!(editor.areas().is_empty());
        assert!(editor.drag_rect().is_none());
        // Back to the originally loaded pixels
        assert_eq!(editor.working.as_ref().unwrap(), &test_image());
    }

    #[test]
    fn test_reset_without_image_stays_empty() {
        let mut editor = EditorState::with_options(test_options());
        editor.reset();
        assert!(!editor.has_image());
        assert!(editor.layers().is_none());
    }

    /// The end-to-end scenario: load, rotate once and exit, then blur a
    /// dragged region and exit.
    #[test]
    fn test_end_to_end_rotate_then_blur() {
        let mut editor = loaded_editor();

        // Rotate once and exit: working image re-exported, angle reset
        editor.toggle_rotation().unwrap();
        editor.rotate_right().unwrap();
        let rotated = editor.toggle_rotation().unwrap().unwrap();
        assert_eq!(editor.angle(), RotationAngle::Deg0);
        assert_eq!(&rotated.jpeg[0..2], &[0xFF, 0xD8]);

        // Blur a region dragged from (10,10) to (50,40)
        editor.toggle_blur().unwrap();
        editor.pointer_down(10, 10, true);
        editor.pointer_move(50, 40, true);
        assert!(editor.pointer_up());

        assert_eq!(editor.areas().len(), 1);
        assert_eq!(editor.areas()[0].rect, Rect::new(10, 10, 40, 30));

        // Exit blur mode: areas cleared, another export produced
        let blurred = editor.toggle_blur().unwrap().unwrap();
        assert!(editor.areas().is_empty());
        assert_eq!(&blurred.jpeg[0..2], &[0xFF, 0xD8]);
        assert_eq!(editor.mode(), EditorMode::Idle);
    }
}
