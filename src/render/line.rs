//! Collection rendering: markers, error bars and strip-drawn segments.

use crate::geom::ScreenPoint;
use crate::render::clip::{ClipRect, WidePoint, clip_segment};
use crate::render::marker::{draw_error_bars, draw_marker};
use crate::render::strip::{STRIP_HEIGHT, SegmentStrip};
use crate::render::{RenderCommand, RenderList, Rgba, StripCopy};
use crate::series::Collection;
use crate::style::LineStyle;
use crate::transform::Transform;

/// What a collection render produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawStats {
    /// Markers drawn.
    pub markers: usize,
    /// Segments drawn.
    pub segments: usize,
    /// Segments skipped because no part of them is visible.
    pub rejected: usize,
}

/// Marker and stroke settings of a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSettings {
    /// Half size of markers and error bar caps.
    pub half_point_size: i32,
    /// Drawn and skipped pixels of dashed lines.
    pub dash_pattern: (i32, i32),
}

/// Render `collection` into `list`.
///
/// Markers are placed for every finite point strictly inside the plot
/// rectangle, whatever its neighbours are. Segments whose endpoints both lie beyond the same edge are skipped before
/// anything is drawn; the others are clipped and drawn as rotated copies of
/// one strip shared by the whole collection, with the dash phase carried
/// from segment to segment.
pub(crate) fn render_collection(
    collection: &Collection,
    transform: &Transform,
    settings: LineSettings,
    list: &mut RenderList,
) -> DrawStats {
    let mut stats = DrawStats::default();
    let points = collection.points();
    if points.is_empty() {
        return stats;
    }
    let color = Rgba::from(collection.color());
    let rect = transform.rect();
    let clip = ClipRect::new(
        i64::from(rect.min.x),
        i64::from(rect.min.y),
        i64::from(rect.width()),
        i64::from(rect.height()),
    );
    let diagonal = f64::from(rect.width()).hypot(f64::from(rect.height()));
    let draw_points = collection.display_points().0;
    let draw_lines = collection.display_lines().0;

    let strip = if draw_lines && points.len() > 1 {
        let strip = SegmentStrip::new(
            color,
            collection.line_style(),
            diagonal.ceil() as i32,
            settings.dash_pattern,
        );
        let period = strip.period();
        Some((list.add_strip(strip), period))
    } else {
        None
    };

    if draw_points {
        for coordinate in points {
            let Some(center) = transform.to_screen(coordinate.point()) else {
                continue;
            };
            if !transform.in_plot(center) {
                continue;
            }
            draw_error_bars(list, transform, coordinate, settings.half_point_size, color);
            draw_marker(
                list,
                collection.point_type(),
                center,
                settings.half_point_size,
                color,
            );
            stats.markers += 1;
        }
    }

    let Some((strip, period)) = strip else {
        log::trace!("rendered {:?}: {stats:?}", collection.name());
        return stats;
    };
    let mut drawn_length = 0.0;
    for pair in points.windows(2) {
        let (Some(a), Some(b)) = (
            transform.to_screen(pair[0].point()),
            transform.to_screen(pair[1].point()),
        ) else {
            continue;
        };
        let (a, b) = (wide(a), wide(b));
        if clip.trivially_rejects(a, b) {
            stats.rejected += 1;
            continue;
        }
        let Some((start, end)) = clip_segment(a, b, clip) else {
            stats.rejected += 1;
            continue;
        };
        let phase = match collection.line_style() {
            LineStyle::Solid => 0,
            LineStyle::Dashed => {
                ((drawn_length + distance(a, start)) as i64).rem_euclid(i64::from(period)) as i32
            }
        };
        drawn_length += distance(a, b);
        list.push(RenderCommand::Strip(segment_copy(
            strip, start, end, diagonal, phase,
        )));
        stats.segments += 1;
    }
    log::trace!("rendered {:?}: {stats:?}", collection.name());
    stats
}

fn wide(point: ScreenPoint) -> WidePoint {
    (i64::from(point.x), i64::from(point.y))
}

fn distance(a: WidePoint, b: WidePoint) -> f64 {
    ((b.0 - a.0) as f64).hypot((b.1 - a.1) as f64)
}

/// Place a strip copy so its center row runs from `start` to `end`.
fn segment_copy(
    strip: usize,
    start: WidePoint,
    end: WidePoint,
    max_length: f64,
    phase: i32,
) -> StripCopy {
    let (dx, dy) = ((end.0 - start.0) as f64, (end.1 - start.1) as f64);
    let length = (dx.hypot(dy) + 1.0).min(max_length).max(1.0);
    let angle = dy.atan2(dx);
    let (sin, cos) = angle.sin_cos();
    let half_height = f64::from(STRIP_HEIGHT) / 2.0;
    // Pixel centers sit at +0.5; the copy starts half a pixel before `start`
    // and its center row is offset perpendicular to the segment.
    let center = (start.0 as f64 + 0.5, start.1 as f64 + 0.5);
    let pivot = (
        center.0 + half_height * sin - 0.5 * cos,
        center.1 - half_height * cos - 0.5 * sin,
    );
    StripCopy {
        strip,
        pivot,
        angle,
        length: length as i32,
        phase,
    }
}
