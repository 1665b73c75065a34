//! Viewport state and data ranges.

use crate::geom::Coordinate;

/// Numeric range with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
}

impl Range {
    /// Create a new range, swapping bounds if needed.
    pub fn new(mut min: f64, mut max: f64) -> Self {
        if min > max {
            std::mem::swap(&mut min, &mut max);
        }
        Self { min, max }
    }

    /// Span of the range.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Midpoint of the range.
    pub fn center(&self) -> f64 {
        (self.min + self.max) * 0.5
    }

    /// Check whether both bounds are finite.
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Check whether the range has positive span and finite bounds.
    pub fn is_valid(&self) -> bool {
        self.is_finite() && self.span() > 0.0
    }

    /// Check whether a value lies inside the range.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Expand the range to include a value.
    pub fn expand_to_include(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }
}

/// Data bounds of a set of coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// X axis range.
    pub x: Range,
    /// Y axis range.
    pub y: Range,
}

impl Bounds {
    /// Bounds of the finite coordinates, `None` if there are none.
    pub fn of<'a>(coordinates: impl IntoIterator<Item = &'a Coordinate>) -> Option<Self> {
        let mut bounds: Option<Self> = None;
        for c in coordinates {
            if !c.x.is_finite() || !c.y.is_finite() {
                continue;
            }
            match bounds.as_mut() {
                None => {
                    bounds = Some(Self {
                        x: Range::new(c.x, c.x),
                        y: Range::new(c.y, c.y),
                    });
                }
                Some(existing) => {
                    existing.x.expand_to_include(c.x);
                    existing.y.expand_to_include(c.y);
                }
            }
        }
        bounds
    }

    /// Smallest bounds covering both.
    pub fn union(self, other: Self) -> Self {
        Self {
            x: Range::new(self.x.min.min(other.x.min), self.x.max.max(other.x.max)),
            y: Range::new(self.y.min.min(other.y.min), self.y.max.max(other.y.max)),
        }
    }
}

/// Zoom and pan state of one sub plot.
///
/// Zooms are in pixels per data unit. Offsets are the data-space translation
/// applied before scaling: the data point `(-x_offset, -y_offset)` sits at the
/// center of the plot rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    /// Horizontal zoom, the anchor both axes scale from.
    pub x_zoom: f64,
    /// Ratio between vertical and horizontal zoom.
    pub y_x_ratio: f64,
    /// Horizontal translation in data units.
    pub x_offset: f64,
    /// Vertical translation in data units.
    pub y_offset: f64,
}

impl ViewState {
    /// A view with equal zoom on both axes, centered on the origin.
    pub fn centered(zoom: f64) -> Self {
        Self {
            x_zoom: zoom,
            y_x_ratio: 1.0,
            x_offset: 0.0,
            y_offset: 0.0,
        }
    }

    /// Vertical zoom derived from the anchor zoom and the ratio.
    pub fn y_zoom(&self) -> f64 {
        self.x_zoom * self.y_x_ratio
    }

    /// View showing the data rectangle `[x, x + w] × [y - h, y]` in a plot of
    /// the given pixel size. `y` is the top edge.
    pub fn window(x: f64, y: f64, w: f64, h: f64, width: i32, height: i32) -> Self {
        let x_zoom = f64::from(width) / w;
        let y_zoom = f64::from(height) / h;
        Self {
            x_zoom,
            y_x_ratio: y_zoom / x_zoom,
            x_offset: -(x + w / 2.0),
            y_offset: -(y - h / 2.0),
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::centered(1.0)
    }
}
