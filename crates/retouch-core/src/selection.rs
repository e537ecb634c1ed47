//! Drag selection for blur regions.
//!
//! While blur mode is active the pointer defines rectangular regions:
//! mouse-down anchors a zero-size rectangle, mouse-move resizes it toward
//! the pointer (drag-to-size, not drag-to-move), and mouse-up (or leaving
//! the canvas with the button held) commits it. A commit only produces a
//! region when both dimensions are non-zero; a click without movement
//! selects nothing.

use crate::geometry::Rect;
use crate::raster::Bitmap;

/// A committed blur selection.
///
/// The pixel snapshot is taken from the blurred layer at commit time and is
/// `None` until then; replaying the snapshot over the base layer is what
/// makes the region appear blurred.
#[derive(Debug, Clone)]
pub struct BlurryArea {
    /// The committed rectangle, anchored at its min corner by
    /// [`DragSelection::finish`]. Rects constructed elsewhere may still
    /// carry negative dimensions; [`BlurryArea::anchor`] normalizes.
    pub rect: Rect,
    /// Blurred pixels captured under the rectangle at commit time.
    pub pixels: Option<Bitmap>,
}

impl BlurryArea {
    /// The top-left corner where the snapshot is anchored when replayed.
    ///
    /// The rectangle's min corner, clipped to the canvas origin. Capture
    /// clamps the rect to the canvas bounds, so a rect extending past the
    /// negative edge yields a snapshot whose first pixel is canvas (0, 0);
    /// the replay anchor has to match that clipped origin.
    pub fn anchor(&self) -> (i32, i32) {
        let normalized = self.rect.normalized();
        (normalized.x.max(0), normalized.y.max(0))
    }
}

/// The in-progress drag rectangle.
///
/// A two-state machine: idle (no anchor) or dragging. `finish` returns the
/// selection (if any) and always resets back to idle.
#[derive(Debug, Clone, Default)]
pub struct DragSelection {
    rect: Option<Rect>,
}

impl DragSelection {
    /// Create an idle selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a drag is in progress.
    pub fn is_active(&self) -> bool {
        self.rect.is_some()
    }

    /// The in-progress rectangle, if a drag is active.
    pub fn rect(&self) -> Option<Rect> {
        self.rect
    }

    /// Start a new drag: a zero-size rectangle anchored at the pointer.
    pub fn begin(&mut self, x: i32, y: i32) {
        self.rect = Some(Rect::anchored_at(x, y));
    }

    /// Track the pointer: the anchor stays put, width/height follow.
    ///
    /// Ignored when no drag is active (a move with the button released).
    pub fn update(&mut self, x: i32, y: i32) {
        if let Some(rect) = &mut self.rect {
            rect.width = x - rect.x;
            rect.height = y - rect.y;
        }
    }

    /// End the drag, returning the normalized rectangle if it has non-zero
    /// width and height. The in-progress rectangle resets regardless.
    pub fn finish(&mut self) -> Option<Rect> {
        let rect = self.rect.take()?;
        if rect.is_empty() {
            None
        } else {
            Some(rect.normalized())
        }
    }

    /// Abandon the drag without committing.
    pub fn cancel(&mut self) {
        self.rect = None;
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
