use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in pixel coordinates (top-left + size).
///
/// Used both for candidate bounding boxes and for the rectangular entry
/// zone of the trigger predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left x coordinate
    pub x: f32,
    /// Top-left y coordinate
    pub y: f32,
    /// Width of the rectangle
    pub width: f32,
    /// Height of the rectangle
    pub height: f32,
}

impl Rect {
    /// Create a new Rect from top-left coordinates and dimensions.
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a Rect from two corner points (x1, y1, x2, y2).
    #[inline]
    pub fn from_corners(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        }
    }

    /// Right edge x coordinate.
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge y coordinate.
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Get the center point of the rectangle.
    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Get the area of the rectangle.
    #[inline]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Whether the point lies inside the rectangle (edges inclusive).
    #[inline]
    pub fn contains(&self, point: (f32, f32)) -> bool {
        point.0 >= self.x && point.0 <= self.right() && point.1 >= self.y && point.1 <= self.bottom()
    }

    /// Scale the rectangle's coordinates and size by a uniform factor.
    #[inline]
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_and_area() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.center(), (25.0, 40.0));
        assert_eq!(rect.area(), 1200.0);
    }

    #[test]
    fn test_from_corners() {
        let rect = Rect::from_corners(10.0, 20.0, 40.0, 60.0);
        assert_eq!(rect, Rect::new(10.0, 20.0, 30.0, 40.0));
    }

    #[test]
    fn test_contains_edges_inclusive() {
        let rect = Rect::new(0.0, 0.0, 640.0, 240.0);
        assert!(rect.contains((0.0, 0.0)));
        assert!(rect.contains((640.0, 240.0)));
        assert!(rect.contains((300.0, 120.0)));
        assert!(!rect.contains((300.0, 241.0)));
        assert!(!rect.contains((-1.0, 100.0)));
    }

    #[test]
    fn test_scaled() {
        let rect = Rect::new(5.0, 10.0, 15.0, 20.0);
        assert_eq!(rect.scaled(2.0), Rect::new(10.0, 20.0, 30.0, 40.0));
    }
}
