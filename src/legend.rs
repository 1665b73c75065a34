//! Shared info box: series swatches in two columns and the cursor readout.

use crate::axis::format_label;
use crate::config::PlotContext;
use crate::geom::{Point, ScreenPoint, ScreenRect};
use crate::render::{RenderList, TextPlacement};
use crate::style::Color;
use crate::text::{FontKind, TextMetrics};

const ELLIPSIS: &str = "...";

/// One legend row item.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    /// Swatch color.
    pub color: Color,
    /// Series name.
    pub name: String,
}

/// Height of an info box holding `entries` items and the readout line.
pub fn legend_height(ctx: &PlotContext, entries: usize) -> i32 {
    let rows = i32::try_from(entries.div_ceil(2)).unwrap_or(i32::MAX / 2) + 1;
    (rows + 1) * ctx.config.info_margin
        + rows * ctx.metrics.label_height
        + ctx.config.bottom_margin
}

/// Shorten `name` with a trailing ellipsis until it fits in `available`
/// pixels of label font.
pub fn truncate_to_width(name: &str, available: i32, metrics: &TextMetrics) -> String {
    if metrics.label_width(name) <= available {
        return name.to_string();
    }
    let budget = available - metrics.label_width(ELLIPSIS);
    let mut kept = String::new();
    for c in name.chars() {
        let mut candidate = kept.clone();
        candidate.push(c);
        if metrics.label_width(&candidate) > budget {
            break;
        }
        kept = candidate;
    }
    kept.push_str(ELLIPSIS);
    kept
}

/// Text of the cursor readout line.
pub fn readout_text(point: Point, digits: usize) -> String {
    format!(
        "x : {}, y : {}",
        format_label(point.x, digits),
        format_label(point.y, digits)
    )
}

/// Lay out the info box starting at `(left, top)` across `width` pixels.
pub(crate) fn build_legend(
    ctx: &PlotContext,
    entries: &[LegendEntry],
    readout: Option<Point>,
    left: i32,
    top: i32,
    width: i32,
    list: &mut RenderList,
) {
    let metrics = &ctx.metrics;
    let margin = ctx.config.info_margin;
    let swatch = metrics.label_height;
    let half_width = width / 2;
    let available = half_width - (swatch + margin);
    let mut row_top = top + margin;

    for (index, entry) in entries.iter().enumerate() {
        let column = if index % 2 == 0 { 0 } else { half_width };
        list.fill_rect(
            ScreenRect::from_origin_size(left + column, row_top, swatch, swatch),
            entry.color,
        );
        let text = truncate_to_width(&entry.name, available, metrics);
        if !text.is_empty() {
            list.text(
                ScreenPoint::new(left + column + swatch + margin, row_top),
                text,
                FontKind::Label,
                TextPlacement::TOP_LEFT,
            );
        }
        if index % 2 == 1 {
            row_top += margin + metrics.label_height;
        }
    }
    if entries.len() % 2 == 1 {
        row_top += margin + metrics.label_height;
    }
    if let Some(point) = readout {
        list.text(
            ScreenPoint::new(left, row_top),
            readout_text(point, ctx.config.label_digits),
            FontKind::Label,
            TextPlacement::TOP_LEFT,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlotterConfig;
    use crate::render::RenderCommand;

    fn ctx() -> PlotContext {
        PlotContext::fixed(PlotterConfig::default())
    }

    #[test]
    fn short_names_are_untouched() {
        let metrics = ctx().metrics;
        assert_eq!(truncate_to_width("sin", 100, &metrics), "sin");
    }

    #[test]
    fn long_names_fit_after_truncation() {
        let metrics = ctx().metrics;
        let name = "a rather long series name that cannot possibly fit";
        for available in [40, 95, 180, 333] {
            let text = truncate_to_width(name, available, &metrics);
            assert!(text.ends_with("..."));
            assert!(metrics.label_width(&text) <= available, "{text:?} > {available}px");
            // One more character would not have fit.
            let kept = text.chars().count() - 3;
            let longer: String = name.chars().take(kept + 1).chain("...".chars()).collect();
            assert!(metrics.label_width(&longer) > available);
        }
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let metrics = ctx().metrics;
        let text = truncate_to_width("ééééééééééééé", 90, &metrics);
        assert_eq!(text, "ééééééé...");
    }

    #[test]
    fn height_counts_rows_and_readout() {
        let ctx = ctx();
        // Three entries take two rows, plus the readout row.
        assert_eq!(legend_height(&ctx, 3), 4 * 5 + 3 * 18 + 25);
        assert_eq!(legend_height(&ctx, 0), 2 * 5 + 18 + 25);
    }

    #[test]
    fn entries_flow_in_two_columns() {
        let ctx = ctx();
        let entries: Vec<LegendEntry> = (0..3)
            .map(|i| LegendEntry {
                color: Color::rgb(i, 0, 0),
                name: format!("s{i}"),
            })
            .collect();
        let mut list = RenderList::new();
        build_legend(&ctx, &entries, Some(Point::new(1.5, -2.0)), 0, 0, 400, &mut list);
        let swatches: Vec<ScreenPoint> = list
            .commands()
            .iter()
            .filter_map(|command| match command {
                RenderCommand::FillRect { rect, .. } => Some(rect.min),
                _ => None,
            })
            .collect();
        assert_eq!(
            swatches,
            vec![
                ScreenPoint::new(0, 5),
                ScreenPoint::new(200, 5),
                ScreenPoint::new(0, 28)
            ]
        );
        let readout = list.commands().iter().find_map(|command| match command {
            RenderCommand::Text { text, position, .. } if text.starts_with("x :") => {
                Some((text.clone(), *position))
            }
            _ => None,
        });
        assert_eq!(
            readout,
            Some(("x : 1.5, y : -2".to_string(), ScreenPoint::new(0, 51)))
        );
    }
}
