//! Point markers and error bars.

use std::collections::BTreeMap;

use crate::geom::{Coordinate, ScreenPoint, ScreenRect};
use crate::render::clip::{ClipRect, clip_segment};
use crate::render::{RenderList, Rgba};
use crate::style::PointType;
use crate::transform::Transform;

/// Draw one marker centered on `center`.
pub(crate) fn draw_marker(
    list: &mut RenderList,
    shape: PointType,
    center: ScreenPoint,
    half_size: i32,
    color: Rgba,
) {
    match shape {
        PointType::Square => list.fill_rect(
            ScreenRect::new(
                center.offset(-half_size, -half_size),
                center.offset(half_size, half_size),
            ),
            color,
        ),
        PointType::Circle => {
            for (row, (left, right)) in circle_spans(half_size) {
                list.fill_rect(
                    ScreenRect::new(
                        center.offset(left, row),
                        center.offset(right + 1, row + 1),
                    ),
                    color,
                );
            }
        }
        PointType::Cross => {
            list.line(
                center.offset(-half_size, -half_size),
                center.offset(half_size, half_size),
                color,
            );
            list.line(
                center.offset(-half_size, half_size),
                center.offset(half_size, -half_size),
                color,
            );
        }
    }
}

/// Horizontal spans `row -> (left, right)` of a filled disc, relative to its
/// center, from the midpoint circle algorithm.
pub fn circle_spans(radius: i32) -> BTreeMap<i32, (i32, i32)> {
    let mut spans = BTreeMap::new();
    let mut add = |row: i32, half: i32| {
        let span = spans.entry(row).or_insert((-half, half));
        span.0 = span.0.min(-half);
        span.1 = span.1.max(half);
    };
    let (mut x, mut y) = (radius.max(0), 0);
    let mut error = 1 - x;
    while x >= y {
        add(y, x);
        add(-y, x);
        add(x, y);
        add(-x, y);
        y += 1;
        if error < 0 {
            error += 2 * y + 1;
        } else {
            x -= 1;
            error += 2 * (y - x) + 1;
        }
    }
    spans
}

/// Draw the error bars of `coordinate`: a span and two caps per axis with a
/// positive error, clipped to the plot rectangle.
pub(crate) fn draw_error_bars(
    list: &mut RenderList,
    transform: &Transform,
    coordinate: &Coordinate,
    cap_half: i32,
    color: Rgba,
) -> usize {
    let rect = transform.rect();
    let clip = ClipRect::new(
        i64::from(rect.min.x),
        i64::from(rect.min.y),
        i64::from(rect.width()),
        i64::from(rect.height()),
    );
    let mut drawn = 0;
    let mut segment = |a: ScreenPoint, b: ScreenPoint| {
        let wide = |p: ScreenPoint| (i64::from(p.x), i64::from(p.y));
        if let Some((start, end)) = clip_segment(wide(a), wide(b), clip) {
            // Clipped points lie inside the plot rectangle.
            list.line(
                ScreenPoint::new(start.0 as i32, start.1 as i32),
                ScreenPoint::new(end.0 as i32, end.1 as i32),
                color,
            );
            drawn += 1;
        }
    };

    let (x, y) = (coordinate.x, coordinate.y);
    if coordinate.x_error > 0.0 {
        let left = transform.to_screen_x(x - coordinate.x_error);
        let right = transform.to_screen_x(x + coordinate.x_error);
        if let (Some(left), Some(right), Some(row)) = (left, right, transform.to_screen_y(y)) {
            segment(ScreenPoint::new(left, row), ScreenPoint::new(right, row));
            for column in [left, right] {
                segment(
                    ScreenPoint::new(column, row.saturating_sub(cap_half)),
                    ScreenPoint::new(column, row.saturating_add(cap_half)),
                );
            }
        }
    }
    if coordinate.y_error > 0.0 {
        let top = transform.to_screen_y(y + coordinate.y_error);
        let bottom = transform.to_screen_y(y - coordinate.y_error);
        if let (Some(top), Some(bottom), Some(column)) = (top, bottom, transform.to_screen_x(x)) {
            segment(ScreenPoint::new(column, top), ScreenPoint::new(column, bottom));
            for row in [top, bottom] {
                segment(
                    ScreenPoint::new(column.saturating_sub(cap_half), row),
                    ScreenPoint::new(column.saturating_add(cap_half), row),
                );
            }
        }
    }
    drawn
}
