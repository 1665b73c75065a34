//! Geometric primitives used by the plotting pipeline.
//!
//! Data-space types use `f64` with y growing upward. Screen-space types use
//! integer pixels with y growing downward.

/// A point in data space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// X value in data coordinates.
    pub x: f64,
    /// Y value in data coordinates.
    pub y: f64,
}

impl Point {
    /// Create a new data point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Check whether both components are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A plotted sample with optional symmetric error bars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// X value in data coordinates.
    pub x: f64,
    /// Y value in data coordinates.
    pub y: f64,
    /// Half-width of the horizontal error bar, in data units.
    pub x_error: f64,
    /// Half-height of the vertical error bar, in data units.
    pub y_error: f64,
}

impl Coordinate {
    /// Create a coordinate without error bars.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            x_error: 0.0,
            y_error: 0.0,
        }
    }

    /// Create a coordinate with error bars.
    pub fn with_errors(x: f64, y: f64, x_error: f64, y_error: f64) -> Self {
        Self {
            x,
            y,
            x_error,
            y_error,
        }
    }

    /// The position of the coordinate, without its errors.
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<Point> for Coordinate {
    fn from(point: Point) -> Self {
        Self::new(point.x, point.y)
    }
}

/// A point in screen space (pixel coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScreenPoint {
    /// X value in screen pixels.
    pub x: i32,
    /// Y value in screen pixels.
    pub y: i32,
}

impl ScreenPoint {
    /// Create a new screen point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Translate the point by a pixel offset.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

/// A rectangle in screen space, `min` inclusive and `max` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenRect {
    /// Top-left corner.
    pub min: ScreenPoint,
    /// Bottom-right corner.
    pub max: ScreenPoint,
}

impl ScreenRect {
    /// Create a new screen rectangle from corners.
    pub const fn new(min: ScreenPoint, max: ScreenPoint) -> Self {
        Self { min, max }
    }

    /// Create a rectangle from its top-left corner and size.
    pub fn from_origin_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(
            ScreenPoint::new(x, y),
            ScreenPoint::new(x.saturating_add(width), y.saturating_add(height)),
        )
    }

    /// Rectangle width in pixels.
    pub fn width(&self) -> i32 {
        self.max.x - self.min.x
    }

    /// Rectangle height in pixels.
    pub fn height(&self) -> i32 {
        self.max.y - self.min.y
    }

    /// Check whether the rectangle has positive area.
    pub fn is_valid(&self) -> bool {
        self.width() > 0 && self.height() > 0
    }

    /// Half-open containment test.
    pub fn contains(&self, point: ScreenPoint) -> bool {
        point.x >= self.min.x && point.x < self.max.x && point.y >= self.min.y && point.y < self.max.y
    }

    /// Intersection of two rectangles, possibly empty.
    pub fn intersect(&self, other: &Self) -> Self {
        Self::new(
            ScreenPoint::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y)),
            ScreenPoint::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y)),
        )
    }

    /// Translate the rectangle.
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.min.offset(dx, dy), self.max.offset(dx, dy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_is_half_open() {
        let rect = ScreenRect::from_origin_size(10, 10, 5, 5);
        assert!(rect.contains(ScreenPoint::new(10, 10)));
        assert!(rect.contains(ScreenPoint::new(14, 14)));
        assert!(!rect.contains(ScreenPoint::new(15, 12)));
    }

    #[test]
    fn intersect_of_disjoint_rects_is_invalid() {
        let a = ScreenRect::from_origin_size(0, 0, 10, 10);
        let b = ScreenRect::from_origin_size(20, 20, 10, 10);
        assert!(!a.intersect(&b).is_valid());
        let c = ScreenRect::from_origin_size(5, 5, 10, 10);
        assert_eq!(a.intersect(&c), ScreenRect::from_origin_size(5, 5, 5, 5));
    }
}
