//! Coordinate transforms between data and screen space.

use crate::geom::{Point, ScreenPoint, ScreenRect};
use crate::view::{Range, ViewState};

/// Transform from data coordinates into screen coordinates.
///
/// Built from a [`ViewState`] and the plot rectangle it is displayed in. The
/// pixel origin is the center of the rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    rect: ScreenRect,
    x_zoom: f64,
    y_zoom: f64,
    x_offset: f64,
    y_offset: f64,
    origin_x: f64,
    origin_y: f64,
}

impl Transform {
    /// Create a transform for the given view and plot rectangle.
    pub fn new(view: &ViewState, rect: ScreenRect) -> Self {
        Self {
            rect,
            x_zoom: view.x_zoom,
            y_zoom: view.y_zoom(),
            x_offset: view.x_offset,
            y_offset: view.y_offset,
            origin_x: f64::from(rect.min.x) + f64::from(rect.width()) / 2.0,
            origin_y: f64::from(rect.min.y) + f64::from(rect.height()) / 2.0,
        }
    }

    /// Access the plot rectangle.
    pub fn rect(&self) -> ScreenRect {
        self.rect
    }

    /// Screen column of a data abscissa, before rounding and clamping.
    pub fn to_screen_x_f64(&self, x: f64) -> f64 {
        self.origin_x + (x + self.x_offset) * self.x_zoom
    }

    /// Screen row of a data ordinate, before rounding and clamping.
    pub fn to_screen_y_f64(&self, y: f64) -> f64 {
        self.origin_y - (y + self.y_offset) * self.y_zoom
    }

    /// Screen column of a data abscissa. `None` for non-finite input.
    pub fn to_screen_x(&self, x: f64) -> Option<i32> {
        if !x.is_finite() {
            return None;
        }
        Some(clamp_to_i32(self.to_screen_x_f64(x)))
    }

    /// Screen row of a data ordinate. `None` for non-finite input.
    pub fn to_screen_y(&self, y: f64) -> Option<i32> {
        if !y.is_finite() {
            return None;
        }
        Some(clamp_to_i32(self.to_screen_y_f64(y)))
    }

    /// Map a data point into screen space.
    pub fn to_screen(&self, point: Point) -> Option<ScreenPoint> {
        Some(ScreenPoint::new(
            self.to_screen_x(point.x)?,
            self.to_screen_y(point.y)?,
        ))
    }

    /// Data abscissa of a screen column.
    pub fn from_screen_x(&self, x: i32) -> f64 {
        (f64::from(x) - self.origin_x) / self.x_zoom - self.x_offset
    }

    /// Data ordinate of a screen row.
    pub fn from_screen_y(&self, y: i32) -> f64 {
        (self.origin_y - f64::from(y)) / self.y_zoom - self.y_offset
    }

    /// Map a screen point into data space.
    pub fn from_screen(&self, point: ScreenPoint) -> Point {
        Point::new(self.from_screen_x(point.x), self.from_screen_y(point.y))
    }

    /// Strictly inside the plot rectangle horizontally.
    pub fn x_in_plot(&self, x: i32) -> bool {
        x > self.rect.min.x && x < self.rect.max.x
    }

    /// Strictly inside the plot rectangle vertically.
    pub fn y_in_plot(&self, y: i32) -> bool {
        y > self.rect.min.y && y < self.rect.max.y
    }

    /// Strictly inside the plot rectangle.
    pub fn in_plot(&self, point: ScreenPoint) -> bool {
        self.x_in_plot(point.x) && self.y_in_plot(point.y)
    }

    /// Data range spanned by the plot rectangle horizontally.
    pub fn visible_x(&self) -> Range {
        Range::new(
            self.from_screen_x(self.rect.min.x),
            self.from_screen_x(self.rect.max.x),
        )
    }

    /// Data range spanned by the plot rectangle vertically.
    pub fn visible_y(&self) -> Range {
        Range::new(
            self.from_screen_y(self.rect.max.y),
            self.from_screen_y(self.rect.min.y),
        )
    }
}

fn clamp_to_i32(value: f64) -> i32 {
    value
        .round()
        .clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plot_rect() -> ScreenRect {
        ScreenRect::from_origin_size(60, 50, 800, 600)
    }

    #[test]
    fn roundtrip_within_one_pixel() {
        let views = [
            ViewState::centered(50.0),
            ViewState {
                x_zoom: 3.7,
                y_x_ratio: 12.5,
                x_offset: -140.25,
                y_offset: 3.0,
            },
            ViewState {
                x_zoom: 1e6,
                y_x_ratio: 0.001,
                x_offset: 1e-3,
                y_offset: -7.0,
            },
        ];
        for view in views {
            let transform = Transform::new(&view, plot_rect());
            let xs = transform.visible_x();
            let ys = transform.visible_y();
            for i in 1..10 {
                let t = f64::from(i) / 10.0;
                let point = Point::new(xs.min + t * xs.span(), ys.min + t * ys.span());
                let screen = transform.to_screen(point).expect("finite point");
                let back = transform.from_screen(screen);
                assert!((back.x - point.x).abs() <= 1.0 / view.x_zoom);
                assert!((back.y - point.y).abs() <= 1.0 / view.y_zoom());
            }
        }
    }

    #[test]
    fn origin_maps_to_center() {
        let transform = Transform::new(&ViewState::centered(10.0), plot_rect());
        assert_eq!(
            transform.to_screen(Point::new(0.0, 0.0)),
            Some(ScreenPoint::new(460, 350))
        );
        // y grows upward in data space.
        assert_eq!(transform.to_screen_y(1.0), Some(340));
    }

    #[test]
    fn far_points_are_clamped_not_wrapped() {
        let transform = Transform::new(&ViewState::centered(1e300), plot_rect());
        let screen = transform
            .to_screen(Point::new(1e300, -1e300))
            .expect("finite point");
        assert_eq!(screen, ScreenPoint::new(i32::MAX, i32::MAX));
        assert_eq!(transform.to_screen(Point::new(f64::NAN, 0.0)), None);
    }

    #[test]
    fn visible_ranges_cover_the_rect() {
        let transform = Transform::new(&ViewState::centered(100.0), plot_rect());
        assert_eq!(transform.visible_x(), Range::new(-4.0, 4.0));
        assert_eq!(transform.visible_y(), Range::new(-3.0, 3.0));
    }
}
