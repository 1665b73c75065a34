//! Layout and interaction settings shared by all sub plots.

use std::time::Duration;

use crate::axis::GridSpacing;
use crate::text::TextMetrics;

/// Plotter configuration.
///
/// Every field has a sensible default; override only what you need.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotterConfig {
    /// Space above the plot box, holding the title.
    pub top_margin: i32,
    /// Space right of the plot box.
    pub right_margin: i32,
    /// Fixed part of the space left of the plot box; tick labels and the y
    /// title are added to it.
    pub base_left_margin: i32,
    /// Space between the plot box (or x title) and the legend.
    pub plot_info_margin: i32,
    /// Spacing between legend rows and around swatches.
    pub info_margin: i32,
    /// Space below the legend.
    pub bottom_margin: i32,
    /// Padding around tick labels and axis titles.
    pub text_margin: i32,
    /// Title font size in pixels.
    pub title_font_size: f32,
    /// Label font size in pixels.
    pub label_font_size: f32,
    /// Half thickness of gridlines.
    pub line_width_half: i32,
    /// Half size of square markers, radius of circles and crosses.
    pub half_point_size: i32,
    /// Zoom multiplier per wheel notch.
    pub zoom_factor: f64,
    /// Gridline spacing bounds.
    pub grid: GridSpacing,
    /// Significant digits of tick labels and the cursor readout.
    pub label_digits: usize,
    /// Minimum characters reserved for tick labels on the left.
    pub min_label_chars: usize,
    /// Zoom (pixels per unit) used when there is nothing to fit.
    pub default_zoom: f64,
    /// Fraction of the plot box the fitted data occupies.
    pub fit_margin: f64,
    /// Samples taken of each function per frame.
    pub sampling_points: usize,
    /// Plot box size of a new sub plot.
    pub default_plot_size: (i32, i32),
    /// Smallest plot box size a resize may produce.
    pub min_plot_size: (i32, i32),
    /// Dash pattern of dashed lines, drawn then skipped pixels.
    pub dash_pattern: (i32, i32),
    /// Shortest time between two interactive frames.
    pub frame_period: Duration,
    /// Pan distance of one arrow key press.
    pub arrow_step_px: i32,
}

impl Default for PlotterConfig {
    fn default() -> Self {
        Self {
            top_margin: 50,
            right_margin: 30,
            base_left_margin: 30,
            plot_info_margin: 25,
            info_margin: 5,
            bottom_margin: 25,
            text_margin: 5,
            title_font_size: 24.0,
            label_font_size: 15.0,
            line_width_half: 1,
            half_point_size: 4,
            zoom_factor: 1.3,
            grid: GridSpacing::default(),
            label_digits: 4,
            min_label_chars: 5,
            default_zoom: 50.0,
            fit_margin: 0.9,
            sampling_points: 5000,
            default_plot_size: (800, 600),
            min_plot_size: (160, 120),
            dash_pattern: (8, 6),
            frame_period: Duration::from_millis(40),
            arrow_step_px: 10,
        }
    }
}

/// Read-only context handed by the plotter to its sub plots.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotContext {
    /// Layout settings.
    pub config: PlotterConfig,
    /// Font metrics.
    pub metrics: TextMetrics,
}

impl PlotContext {
    /// Create a context.
    pub fn new(config: PlotterConfig, metrics: TextMetrics) -> Self {
        Self { config, metrics }
    }

    /// Context with made-up metrics, for layout without loaded fonts.
    pub fn fixed(config: PlotterConfig) -> Self {
        let metrics = TextMetrics {
            label_advance: 9,
            label_height: 18,
            title_height: 28,
        };
        Self { config, metrics }
    }

    /// Height of an axis title band, `0` when there is no title.
    pub fn axis_title_size(&self, present: bool) -> i32 {
        if present {
            2 * self.config.text_margin + self.config.label_font_size.round() as i32
        } else {
            0
        }
    }
}
