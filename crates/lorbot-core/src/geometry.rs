//! Geometry types for window coordinates and screen regions.
//!
//! All pixel coordinates are top-down (origin at the window's top-left
//! corner) unless stated otherwise. Telemetry rectangles use bottom-up y and
//! are converted when a card record is built.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Pixel position inside the game window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
pub struct Point {
    /// Horizontal offset in pixels
    pub x: i32,
    /// Vertical offset in pixels (top-down)
    pub y: i32,
}

impl Point {
    /// Create a new point.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Translate by another point.
    pub fn offset(&self, by: Point) -> Self {
        Self::new(self.x + by.x, self.y + by.y)
    }
}

/// Size of a window or region in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
pub struct Size {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Size {
    /// Create a new size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether the size covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Pixel rectangle inside the game window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
pub struct Rect {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Rect {
    /// Create a new rectangle.
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    /// Number of pixels covered.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Check if a point is contained within this rectangle.
    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Check if this rectangle intersects another one.
    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.right() <= other.x
            || other.right() <= self.x
            || self.bottom() <= other.y
            || other.bottom() <= self.y)
    }

    /// Clip the rectangle to a `size`-sized area anchored at the origin.
    ///
    /// Returns `None` when nothing of the rectangle remains visible.
    pub fn clamp_to(&self, size: Size) -> Option<Rect> {
        let left = self.x.max(0);
        let top = self.y.max(0);
        let right = self.right().min(size.width as i32);
        let bottom = self.bottom().min(size.height as i32);

        if right <= left || bottom <= top {
            return None;
        }

        Some(Rect::new(
            left,
            top,
            (right - left) as u32,
            (bottom - top) as u32,
        ))
    }
}

/// Point expressed as fractions of the window size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct RatioPoint {
    /// Horizontal fraction (0.0 = left edge)
    pub x: f64,
    /// Vertical fraction (0.0 = top edge)
    pub y: f64,
}

impl RatioPoint {
    /// Create a new ratio point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Resolve against a window size.
    pub fn resolve(&self, size: Size) -> Point {
        Point::new(
            (self.x * size.width as f64).round() as i32,
            (self.y * size.height as f64).round() as i32,
        )
    }
}

/// Size expressed as fractions of the window size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct RatioSize {
    /// Width fraction
    pub width: f32,
    /// Height fraction
    pub height: f32,
}

impl RatioSize {
    /// Create a new ratio size.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Resolve against a window size, rounding up.
    pub fn resolve(&self, size: Size) -> Size {
        Size::new(
            (size.width as f32 * self.width).ceil() as u32,
            (size.height as f32 * self.height).ceil() as u32,
        )
    }
}

/// Rectangle expressed as fractions of the window size.
///
/// Calibrated for a single aspect ratio; see `calibration` in the config.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct RatioRect {
    /// Left edge fraction
    pub x: f32,
    /// Top edge fraction
    pub y: f32,
    /// Width fraction
    pub width: f32,
    /// Height fraction
    pub height: f32,
}

impl RatioRect {
    /// Create a new ratio rectangle.
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Resolve against a window size, rounding every edge up.
    pub fn resolve(&self, size: Size) -> Rect {
        let w = size.width as f32;
        let h = size.height as f32;
        Rect::new(
            (w * self.x).ceil() as i32,
            (h * self.y).ceil() as i32,
            (w * self.width).ceil() as u32,
            (h * self.height).ceil() as u32,
        )
    }
}

/// Rectangle anchored by a window fraction but sized in fixed pixels.
///
/// Used where the pixel templates matched inside the region have a fixed
/// size (the mana counter).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct AnchoredRect {
    /// Left edge fraction
    pub x: f32,
    /// Top edge fraction
    pub y: f32,
    /// Width in pixels
    pub width_px: u32,
    /// Height in pixels
    pub height_px: u32,
}

impl AnchoredRect {
    /// Resolve against a window size.
    pub fn resolve(&self, size: Size) -> Rect {
        Rect::new(
            (size.width as f32 * self.x).ceil() as i32,
            (size.height as f32 * self.y).ceil() as i32,
            self.width_px,
            self.height_px,
        )
    }
}

/// Location and size of the game window on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct WindowGeometry {
    /// Screen position of the window's top-left corner
    pub origin: Point,
    /// Window size
    pub size: Size,
}

impl WindowGeometry {
    /// Create a new window geometry.
    pub fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Convert a window-relative point to screen coordinates.
    pub fn to_screen(&self, point: Point) -> Point {
        self.origin.offset(point)
    }

    /// Resolve a ratio point to screen coordinates.
    pub fn ratio_to_screen(&self, ratio: RatioPoint) -> Point {
        self.to_screen(ratio.resolve(self.size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(10, 20, 5, 5);
        assert!(rect.contains(&Point::new(10, 20)));
        assert!(rect.contains(&Point::new(14, 24)));
        assert!(!rect.contains(&Point::new(15, 20)));
        assert!(!rect.contains(&Point::new(10, 25)));
    }

    #[test]
    fn test_rect_intersects() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        let c = Rect::new(10, 0, 10, 10);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_rect_clamp_to() {
        let size = Size::new(100, 50);
        assert_eq!(
            Rect::new(-5, 40, 20, 20).clamp_to(size),
            Some(Rect::new(0, 40, 15, 10))
        );
        assert_eq!(Rect::new(100, 0, 5, 5).clamp_to(size), None);
        assert_eq!(Rect::new(10, 10, 0, 5).clamp_to(size), None);
    }

    #[test]
    fn test_ratio_rect_rounds_up() {
        let rect = RatioRect::new(0.82, 0.42, 0.10416, 0.1574).resolve(Size::new(1920, 1080));
        assert_eq!(rect, Rect::new(1575, 454, 200, 170));
    }

    #[test]
    fn test_anchored_rect_keeps_pixel_size() {
        let anchored = AnchoredRect {
            x: 0.8255,
            y: 0.5907,
            width_px: 50,
            height_px: 37,
        };
        let rect = anchored.resolve(Size::new(1920, 1080));
        assert_eq!(rect.width, 50);
        assert_eq!(rect.height, 37);
        assert_eq!(rect.x, 1585);
        assert_eq!(rect.y, 638);
    }

    #[test]
    fn test_window_ratio_to_screen() {
        let window = WindowGeometry::new(Point::new(100, 50), Size::new(1000, 500));
        assert_eq!(
            window.ratio_to_screen(RatioPoint::new(0.5, 0.5)),
            Point::new(600, 300)
        );
    }
}
