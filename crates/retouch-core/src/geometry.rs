//! Canvas geometry: sizes, rectangles, and quarter-turn rotation math.
//!
//! Only four orientations are ever valid in the editor (0°, 90°, 180°, 270°),
//! so every rotation-dependent computation here is an explicit case table
//! keyed by [`RotationAngle`] rather than generalized trigonometry. This
//! removes floating-point rounding ambiguity at the angle boundaries.
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner, y grows downward (canvas convention)
//! - Positive rotation steps are clockwise on screen
//! - Rectangle width/height are signed: a drag that runs left/up from its
//!   anchor produces negative dimensions, normalized at commit time

use serde::{Deserialize, Serialize};

/// Canvas or image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Create a new size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns the size with width and height swapped.
    pub fn swapped(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// True if either dimension is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A top-left-anchored rectangle with signed dimensions.
///
/// Width and height may be negative while a drag is in progress: the anchor
/// stays fixed and the dimensions track the pointer, so dragging left/up
/// yields negative values. [`Rect::normalized`] resolves this into a rect
/// whose anchor is the true top-left (min-x, min-y) corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A zero-size rectangle anchored at the given point.
    pub fn anchored_at(x: i32, y: i32) -> Self {
        Self::new(x, y, 0, 0)
    }

    /// True if the rectangle covers no pixels (zero width or height).
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Resolve negative dimensions into a rect anchored at the true
    /// top-left corner with non-negative width/height.
    pub fn normalized(self) -> Self {
        let x = if self.width < 0 {
            self.x + self.width
        } else {
            self.x
        };
        let y = if self.height < 0 {
            self.y + self.height
        } else {
            self.y
        };
        Self {
            x,
            y,
            width: self.width.abs(),
            height: self.height.abs(),
        }
    }

    /// Map this rectangle through a rotation of the drawing context about
    /// its origin, returning the rectangle in screen coordinates.
    ///
    /// This is the inverse view of the placement offsets: a rect drawn at
    /// [`place_image`]'s coordinates lands at the screen position this
    /// function reports.
    pub fn rotated_about_origin(self, angle: RotationAngle) -> Self {
        let Self {
            x,
            y,
            width: w,
            height: h,
        } = self;
        match angle {
            RotationAngle::Deg0 => self,
            RotationAngle::Deg90 => Self::new(-(y + h), x, h, w),
            RotationAngle::Deg180 => Self::new(-(x + w), -(y + h), w, h),
            RotationAngle::Deg270 => Self::new(y, -(x + w), h, w),
        }
    }
}

/// Display rotation in quarter turns.
///
/// The editor only ever rotates in 90° steps, so the angle is a closed
/// four-element group rather than a free-form number of degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RotationAngle {
    /// No rotation.
    #[default]
    Deg0,
    /// Quarter turn clockwise.
    Deg90,
    /// Half turn.
    Deg180,
    /// Three-quarter turn clockwise.
    Deg270,
}

impl RotationAngle {
    /// The angle in degrees, always a multiple of 90 in [0, 360).
    pub fn degrees(self) -> u32 {
        match self {
            RotationAngle::Deg0 => 0,
            RotationAngle::Deg90 => 90,
            RotationAngle::Deg180 => 180,
            RotationAngle::Deg270 => 270,
        }
    }

    /// Parse an angle from degrees, wrapping modulo 360.
    ///
    /// Returns `None` if the wrapped angle is not a multiple of 90.
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        match degrees.rem_euclid(360) {
            0 => Some(RotationAngle::Deg0),
            90 => Some(RotationAngle::Deg90),
            180 => Some(RotationAngle::Deg180),
            270 => Some(RotationAngle::Deg270),
            _ => None,
        }
    }

    /// The angle advanced by 90° clockwise (the rotate-right control).
    pub fn stepped_right(self) -> Self {
        match self {
            RotationAngle::Deg0 => RotationAngle::Deg90,
            RotationAngle::Deg90 => RotationAngle::Deg180,
            RotationAngle::Deg180 => RotationAngle::Deg270,
            RotationAngle::Deg270 => RotationAngle::Deg0,
        }
    }

    /// The angle retreated by 90° (the rotate-left control).
    pub fn stepped_left(self) -> Self {
        match self {
            RotationAngle::Deg0 => RotationAngle::Deg270,
            RotationAngle::Deg90 => RotationAngle::Deg0,
            RotationAngle::Deg180 => RotationAngle::Deg90,
            RotationAngle::Deg270 => RotationAngle::Deg180,
        }
    }

    /// True for the odd multiples of 90°, which swap canvas width/height.
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, RotationAngle::Deg90 | RotationAngle::Deg270)
    }
}

/// Compute the canvas bitmap size for a given rotation angle.
///
/// The canvas element is resized so the rotated image fills it exactly:
/// width and height swap for 90°/270°, and are unchanged for 0°/180°.
pub fn rotated_canvas_size(size: Size, angle: RotationAngle) -> Size {
    if angle.swaps_dimensions() {
        size.swapped()
    } else {
        size
    }
}

/// Compute the destination rectangle for drawing an image into a rotated
/// drawing context.
///
/// The image is letterboxed into the logical canvas bounds preserving its
/// aspect ratio: landscape images fill the canvas width, portrait and square
/// images fill the canvas height. The x/y offsets are whole multiples of the
/// placed width/height that compensate for the coordinate-system shift
/// introduced by rotating the context about its origin:
///
/// | angle | offset (in placed widths/heights) |
/// |-------|-----------------------------------|
/// | 0°    | ( 0,  0)                          |
/// | 90°   | ( 0, -1)                          |
/// | 180°  | (-1, -1)                          |
/// | 270°  | (-1,  0)                          |
///
/// Drawing at the returned rect inside a context rotated by `angle` lands
/// the image at the screen origin (see [`Rect::rotated_about_origin`]).
pub fn place_image(image: Size, canvas: Size, angle: RotationAngle) -> Rect {
    let (width, height) = fit_to_canvas(image, canvas);

    let (mx, my) = match angle {
        RotationAngle::Deg0 => (0, 0),
        RotationAngle::Deg90 => (0, -1),
        RotationAngle::Deg180 => (-1, -1),
        RotationAngle::Deg270 => (-1, 0),
    };

    Rect::new(mx * width, my * height, width, height)
}

/// Scale an image to the logical canvas bounds preserving aspect ratio.
///
/// Landscape images (width > height) fill the canvas width; portrait and
/// square images fill the canvas height.
fn fit_to_canvas(image: Size, canvas: Size) -> (i32, i32) {
    if image.is_empty() || canvas.is_empty() {
        return (0, 0);
    }

    let (iw, ih) = (image.width as f64, image.height as f64);

    // Minimum placed dimension is 1px so extreme aspect ratios stay drawable
    if image.width > image.height {
        let width = canvas.width as f64;
        let height = (width * ih / iw).round().max(1.0);
        (width as i32, height as i32)
    } else {
        let height = canvas.height as f64;
        let width = (height * iw / ih).round().max(1.0);
        (width as i32, height as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ANGLES: [RotationAngle; 4] = [
        RotationAngle::Deg0,
        RotationAngle::Deg90,
        RotationAngle::Deg180,
        RotationAngle::Deg270,
    ];

    #[test]
    fn test_rotated_canvas_size_swaps_for_odd_quarters() {
        let size = Size::new(600, 800);

        for angle in ALL_ANGLES {
            let rotated = rotated_canvas_size(size, angle);
            if angle.degrees() / 90 % 2 == 1 {
                assert_eq!(rotated, size.swapped(), "angle {:?}", angle);
            } else {
                assert_eq!(rotated, size, "angle {:?}", angle);
            }
        }
    }

    #[test]
    fn test_four_right_steps_return_to_start() {
        for start in ALL_ANGLES {
            let mut angle = start;
            for _ in 0..4 {
                angle = angle.stepped_right();
            }
            assert_eq!(angle, start);
        }
    }

    #[test]
    fn test_four_left_steps_return_to_start() {
        for start in ALL_ANGLES {
            let mut angle = start;
            for _ in 0..4 {
                angle = angle.stepped_left();
            }
            assert_eq!(angle, start);
        }
    }

    #[test]
    fn test_left_undoes_right() {
        for start in ALL_ANGLES {
            assert_eq!(start.stepped_right().stepped_left(), start);
            assert_eq!(start.stepped_left().stepped_right(), start);
        }
    }

    #[test]
    fn test_from_degrees_wraps() {
        assert_eq!(RotationAngle::from_degrees(0), Some(RotationAngle::Deg0));
        assert_eq!(RotationAngle::from_degrees(90), Some(RotationAngle::Deg90));
        assert_eq!(RotationAngle::from_degrees(450), Some(RotationAngle::Deg90));
        assert_eq!(
            RotationAngle::from_degrees(-90),
            Some(RotationAngle::Deg270)
        );
        assert_eq!(RotationAngle::from_degrees(720), Some(RotationAngle::Deg0));
        assert_eq!(RotationAngle::from_degrees(45), None);
    }

    #[test]
    fn test_degrees_always_multiple_of_90() {
        for angle in ALL_ANGLES {
            assert_eq!(angle.degrees() % 90, 0);
            assert!(angle.degrees() < 360);
        }
    }

    #[test]
    fn test_normalized_positive_rect_unchanged() {
        let rect = Rect::new(10, 10, 40, 30);
        assert_eq!(rect.normalized(), rect);
    }

    #[test]
    fn test_normalized_negative_width() {
        // Drag from (50, 10) moving 40 left
        let rect = Rect::new(50, 10, -40, 30);
        assert_eq!(rect.normalized(), Rect::new(10, 10, 40, 30));
    }

    #[test]
    fn test_normalized_negative_both() {
        // Drag from (50, 40) moving up and left
        let rect = Rect::new(50, 40, -40, -30);
        assert_eq!(rect.normalized(), Rect::new(10, 10, 40, 30));
    }

    #[test]
    fn test_rect_is_empty() {
        assert!(Rect::new(5, 5, 0, 10).is_empty());
        assert!(Rect::new(5, 5, 10, 0).is_empty());
        assert!(Rect::anchored_at(3, 3).is_empty());
        assert!(!Rect::new(5, 5, 1, 1).is_empty());
        assert!(!Rect::new(5, 5, -1, 1).is_empty());
    }

    #[test]
    fn test_placement_offsets_case_table() {
        // 300x400 portrait image into a 600x800 canvas fills the height
        let image = Size::new(300, 400);
        let canvas = Size::new(600, 800);

        let expected = [
            (RotationAngle::Deg0, Rect::new(0, 0, 600, 800)),
            (RotationAngle::Deg90, Rect::new(0, -800, 600, 800)),
            (RotationAngle::Deg180, Rect::new(-600, -800, 600, 800)),
            (RotationAngle::Deg270, Rect::new(-600, 0, 600, 800)),
        ];

        for (angle, rect) in expected {
            assert_eq!(place_image(image, canvas, angle), rect, "angle {:?}", angle);
        }
    }

    #[test]
    fn test_placement_lands_at_screen_origin() {
        let image = Size::new(300, 400);
        let canvas = Size::new(600, 800);

        for angle in ALL_ANGLES {
            let placed = place_image(image, canvas, angle);
            let screen = placed.rotated_about_origin(angle);
            assert_eq!(screen.x, 0, "angle {:?}", angle);
            assert_eq!(screen.y, 0, "angle {:?}", angle);
        }
    }

    #[test]
    fn test_placement_screen_rect_matches_rotated_canvas() {
        let image = Size::new(600, 800);
        let canvas = Size::new(600, 800);

        for angle in ALL_ANGLES {
            let placed = place_image(image, canvas, angle);
            let screen = placed.rotated_about_origin(angle);
            let bitmap = rotated_canvas_size(canvas, angle);
            assert_eq!(screen.width as u32, bitmap.width, "angle {:?}", angle);
            assert_eq!(screen.height as u32, bitmap.height, "angle {:?}", angle);
        }
    }

    #[test]
    fn test_landscape_image_fills_width() {
        let image = Size::new(1200, 600);
        let canvas = Size::new(600, 800);

        let placed = place_image(image, canvas, RotationAngle::Deg0);
        assert_eq!(placed.width, 600);
        assert_eq!(placed.height, 300);
    }

    #[test]
    fn test_portrait_image_fills_height() {
        let image = Size::new(600, 1200);
        let canvas = Size::new(600, 800);

        let placed = place_image(image, canvas, RotationAngle::Deg0);
        assert_eq!(placed.width, 400);
        assert_eq!(placed.height, 800);
    }

    #[test]
    fn test_empty_image_places_empty_rect() {
        let placed = place_image(
            Size::new(0, 0),
            Size::new(600, 800),
            RotationAngle::Deg0,
        );
        assert!(placed.is_empty());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
