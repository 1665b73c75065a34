//! Grid step selection, gridline placement, and axis label formatting.

use crate::transform::Transform;

const STEP_MULTIPLIERS: [f64; 3] = [1.0, 2.0, 5.0];

/// Choose a grid step of the form `{1, 2, 5} × 10^n`.
///
/// The step is picked so that `range / step` lies in `[min_count, max_count]`.
/// Multipliers are tried in ascending order and the last one that admits a
/// decade wins, which prefers the coarser grid. Returns `None` when no such
/// step exists, including for an empty or non-finite range.
pub fn compute_grid_step(min_count: i32, max_count: i32, range: f64) -> Option<f64> {
    if !range.is_finite() || range <= 0.0 || max_count < 1 {
        return None;
    }
    let min_count = min_count.max(1);
    if min_count > max_count {
        return None;
    }
    let mut found = None;
    for multiplier in STEP_MULTIPLIERS {
        let fine = (range / (multiplier * f64::from(max_count))).log10().floor();
        let coarse = (range / (multiplier * f64::from(min_count))).log10().floor();
        if !fine.is_finite() || !coarse.is_finite() {
            continue;
        }
        if fine != coarse {
            found = Some(multiplier * 10_f64.powf(coarse));
        }
    }
    found.filter(|step| step.is_finite() && *step > 0.0)
}

/// One gridline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axis {
    /// Screen position of the line (row for horizontal lines, column for
    /// vertical lines).
    pub screen_coordinate: i32,
    /// Data value the line marks.
    pub data_coordinate: f64,
    /// Whether this is the zero line of its dimension.
    pub is_main: bool,
}

/// Gridlines of both dimensions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisSet {
    /// Lines of constant y, labeled on the left of the plot.
    pub horizontal: Vec<Axis>,
    /// Lines of constant x, labeled below the plot.
    pub vertical: Vec<Axis>,
}

impl AxisSet {
    /// Number of characters of the longest horizontal-line label.
    pub fn longest_label(&self, digits: usize) -> usize {
        self.horizontal
            .iter()
            .map(|axis| format_label(axis.data_coordinate, digits).chars().count())
            .max()
            .unwrap_or(0)
    }
}

/// Pixel spacing bounds between consecutive gridlines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpacing {
    /// Smallest spacing, bounds the line count from above.
    pub min_px: f64,
    /// Largest spacing, bounds the line count from below.
    pub max_px: f64,
}

impl GridSpacing {
    /// Line count bounds `(min, max)` for an extent in pixels.
    pub fn counts(&self, extent: i32) -> (i32, i32) {
        let extent = f64::from(extent.max(0));
        ((extent / self.max_px) as i32, (extent / self.min_px) as i32)
    }
}

impl Default for GridSpacing {
    fn default() -> Self {
        Self {
            min_px: 80.0,
            max_px: 200.0,
        }
    }
}

/// Computes gridlines for a transform.
#[derive(Debug, Clone, Copy)]
pub struct AxisBuilder {
    spacing: GridSpacing,
}

impl AxisBuilder {
    /// Create a builder with the given spacing bounds.
    pub fn new(spacing: GridSpacing) -> Self {
        Self { spacing }
    }

    /// Compute secondary gridlines and the main zero lines.
    ///
    /// This is a pure function of the transform.
    pub fn build(&self, transform: &Transform) -> AxisSet {
        let rect = transform.rect();
        let xs = transform.visible_x();
        let ys = transform.visible_y();
        let (min_vertical, max_vertical) = self.spacing.counts(rect.width());
        let (min_horizontal, max_horizontal) = self.spacing.counts(rect.height());

        let mut set = AxisSet::default();

        match compute_grid_step(min_horizontal, max_horizontal, ys.span()) {
            Some(step) => {
                for value in grid_values(ys.min, ys.max, step, max_horizontal) {
                    if let Some(row) = transform.to_screen_y(value) {
                        if transform.y_in_plot(row) {
                            set.horizontal.push(Axis {
                                screen_coordinate: row,
                                data_coordinate: value,
                                is_main: false,
                            });
                        }
                    }
                }
            }
            None => log::debug!("no horizontal grid step for range {}", ys.span()),
        }
        match compute_grid_step(min_vertical, max_vertical, xs.span()) {
            Some(step) => {
                for value in grid_values(xs.min, xs.max, step, max_vertical) {
                    if let Some(column) = transform.to_screen_x(value) {
                        if transform.x_in_plot(column) {
                            set.vertical.push(Axis {
                                screen_coordinate: column,
                                data_coordinate: value,
                                is_main: false,
                            });
                        }
                    }
                }
            }
            None => log::debug!("no vertical grid step for range {}", xs.span()),
        }

        if let Some(row) = transform.to_screen_y(0.0) {
            if transform.y_in_plot(row) {
                set.horizontal.push(Axis {
                    screen_coordinate: row,
                    data_coordinate: 0.0,
                    is_main: true,
                });
            }
        }
        if let Some(column) = transform.to_screen_x(0.0) {
            if transform.x_in_plot(column) {
                set.vertical.push(Axis {
                    screen_coordinate: column,
                    data_coordinate: 0.0,
                    is_main: true,
                });
            }
        }
        set
    }
}

/// Multiples of `step` from `floor(min / step) * step` up to `max`.
fn grid_values(min: f64, max: f64, step: f64, max_count: i32) -> impl Iterator<Item = f64> {
    let start = (min / step).floor() * step;
    // A step always yields fewer than `max_count` intervals, two extra
    // candidates cover the partial intervals at both ends.
    let limit = max_count.max(0) as usize + 2;
    (0..=limit)
        .map(move |i| {
            let value = start + i as f64 * step;
            if value.abs() < step * 1e-9 { 0.0 } else { value }
        })
        .take_while(move |value| *value <= max)
}

/// Format a number like a `%g` conversion with `digits` significant digits.
pub fn format_label(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let digits = digits.max(1);
    // Scientific rounding first, so the exponent accounts for carries
    // (9.9996 at four digits becomes 10.00).
    let scientific = format!("{:.*e}", digits - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if exponent < -4 || exponent >= digits as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    }
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::ScreenRect;
    use crate::view::ViewState;

    fn is_nice(step: f64) -> bool {
        let exponent = step.log10().floor();
        let mantissa = step / 10_f64.powf(exponent);
        [1.0, 2.0, 5.0, 10.0]
            .iter()
            .any(|candidate| (mantissa - candidate).abs() < 1e-9)
    }

    #[test]
    fn grid_step_is_nice_and_within_bounds() {
        let spacing = GridSpacing::default();
        for extent in [160, 250, 480, 600, 800, 1333, 1920] {
            let (min_count, max_count) = spacing.counts(extent);
            // Consecutive nice steps are at most 2.5x apart, so only a count
            // window at least that wide always admits one.
            let always_fits = f64::from(max_count) >= 2.5 * f64::from(min_count.max(1));
            let mut range = 1e-7;
            while range < 1e9 {
                let Some(step) = compute_grid_step(min_count, max_count, range) else {
                    assert!(!always_fits, "no step for {range} over {extent}px");
                    range *= 1.37;
                    continue;
                };
                assert!(is_nice(step), "{step} is not 1/2/5 x 10^n");
                let count = range / step;
                assert!(
                    count >= f64::from(min_count.max(1)) - 1e-9
                        && count <= f64::from(max_count) + 1e-9,
                    "{count} lines for range {range} over {extent}px"
                );
                range *= 1.37;
            }
        }
    }

    #[test]
    fn narrow_count_window_can_have_no_step() {
        // 160px allows 1..=2 lines, a range of 4.5 needs a step in [2.25, 4.5].
        assert_eq!(GridSpacing::default().counts(160), (0, 2));
        assert_eq!(compute_grid_step(0, 2, 4.5), None);
    }

    #[test]
    fn grid_step_prefers_coarser_multiplier() {
        // For range 10 with 4..=10 lines both 1 and 2 fit, 2 wins.
        assert_eq!(compute_grid_step(4, 10, 10.0), Some(2.0));
        assert_eq!(compute_grid_step(3, 7, 1000.0), Some(200.0));
    }

    #[test]
    fn grid_step_rejects_degenerate_input() {
        assert_eq!(compute_grid_step(4, 10, 0.0), None);
        assert_eq!(compute_grid_step(4, 10, -3.0), None);
        assert_eq!(compute_grid_step(4, 10, f64::NAN), None);
        assert_eq!(compute_grid_step(0, 0, 10.0), None);
    }

    #[test]
    fn builder_line_counts_respect_density() {
        let rect = ScreenRect::from_origin_size(70, 50, 800, 600);
        let view = ViewState::window(-10.3, 10.7, 20.0, 20.0, 800, 600);
        let transform = Transform::new(&view, rect);
        let set = AxisBuilder::new(GridSpacing::default()).build(&transform);
        let secondary = |axes: &[Axis]| -> Vec<f64> {
            axes.iter()
                .filter(|axis| !axis.is_main)
                .map(|axis| axis.data_coordinate)
                .collect()
        };
        // 800px allows 4..=10 lines and 600px allows 3..=7, a range of 20
        // gives a step of 5 on both.
        assert_eq!(secondary(&set.vertical), vec![-10.0, -5.0, 0.0, 5.0]);
        assert_eq!(secondary(&set.horizontal), vec![-5.0, 0.0, 5.0, 10.0]);
        assert_eq!(set.vertical.iter().filter(|axis| axis.is_main).count(), 1);
        assert_eq!(set.horizontal.iter().filter(|axis| axis.is_main).count(), 1);
    }

    #[test]
    fn border_aligned_lines_leave_one_below_minimum() {
        let rect = ScreenRect::from_origin_size(0, 0, 800, 600);
        let view = ViewState::window(0.0, 15.0, 20.0, 15.0, 800, 600);
        let set = AxisBuilder::new(GridSpacing::default()).build(&Transform::new(&view, rect));
        // Step 5 gives 3 intervals over 15, the lines at 0 and 15 sit on the
        // borders and only 2 remain for a minimum of 3.
        let horizontal: Vec<f64> = set
            .horizontal
            .iter()
            .filter(|axis| !axis.is_main)
            .map(|axis| axis.data_coordinate)
            .collect();
        assert_eq!(horizontal, vec![5.0, 10.0]);
        let vertical = set.vertical.iter().filter(|axis| !axis.is_main).count();
        assert_eq!(vertical, 3);
    }

    #[test]
    fn builder_line_counts_stay_within_one_of_bounds() {
        let spacing = GridSpacing::default();
        let builder = AxisBuilder::new(spacing);
        let rect = ScreenRect::from_origin_size(70, 50, 800, 600);
        let (min_vertical, max_vertical) = spacing.counts(rect.width());
        let (min_horizontal, max_horizontal) = spacing.counts(rect.height());
        for span in [0.8, 3.0, 7.5, 15.0, 20.0, 123.0, 4096.0] {
            for start in [0.0, -0.37, 12.5, -1e3] {
                let view = ViewState::window(start, start + span, span, span, 800, 600);
                let transform = Transform::new(&view, rect);
                let set = builder.build(&transform);
                let vertical = set.vertical.iter().filter(|axis| !axis.is_main).count() as i32;
                let horizontal = set.horizontal.iter().filter(|axis| !axis.is_main).count() as i32;
                if compute_grid_step(min_vertical, max_vertical, transform.visible_x().span())
                    .is_some()
                {
                    assert!(
                        (min_vertical.max(1) - 1..=max_vertical).contains(&vertical),
                        "{vertical} vertical lines for span {span} at {start}"
                    );
                }
                if compute_grid_step(min_horizontal, max_horizontal, transform.visible_y().span())
                    .is_some()
                {
                    assert!(
                        (min_horizontal.max(1) - 1..=max_horizontal).contains(&horizontal),
                        "{horizontal} horizontal lines for span {span} at {start}"
                    );
                }
            }
        }
    }

    #[test]
    fn builder_is_idempotent() {
        let rect = ScreenRect::from_origin_size(70, 50, 640, 480);
        let view = ViewState {
            x_zoom: 33.3,
            y_x_ratio: 0.2,
            x_offset: 17.0,
            y_offset: -250.0,
        };
        let transform = Transform::new(&view, rect);
        let builder = AxisBuilder::new(GridSpacing::default());
        assert_eq!(builder.build(&transform), builder.build(&transform));
    }

    #[test]
    fn lines_are_strictly_inside_the_plot() {
        let rect = ScreenRect::from_origin_size(0, 0, 800, 600);
        // Gridlines at multiples of 100 would land exactly on the borders.
        let transform = Transform::new(&ViewState::window(0.0, 600.0, 800.0, 600.0, 800, 600), rect);
        let set = AxisBuilder::new(GridSpacing::default()).build(&transform);
        for axis in &set.vertical {
            assert!(axis.screen_coordinate > 0 && axis.screen_coordinate < 800);
        }
        for axis in &set.horizontal {
            assert!(axis.screen_coordinate > 0 && axis.screen_coordinate < 600);
        }
        assert!(set.vertical.iter().all(|axis| !axis.is_main));
    }

    #[test]
    fn main_axes_only_when_no_step() {
        let rect = ScreenRect::from_origin_size(0, 0, 100, 600);
        let transform = Transform::new(&ViewState::centered(10.0), rect);
        // 100px admits no vertical gridline count at all.
        let set = AxisBuilder::new(GridSpacing::default()).build(&transform);
        assert_eq!(set.vertical.len(), 1);
        assert!(set.vertical[0].is_main);
    }

    #[test]
    fn labels_follow_general_format() {
        assert_eq!(format_label(0.0, 4), "0");
        assert_eq!(format_label(2.0, 4), "2");
        assert_eq!(format_label(-0.5, 4), "-0.5");
        assert_eq!(format_label(0.30000000000000004, 4), "0.3");
        assert_eq!(format_label(1234.0, 4), "1234");
        assert_eq!(format_label(12346.0, 4), "1.235e+04");
        assert_eq!(format_label(0.0001, 4), "0.0001");
        assert_eq!(format_label(0.00001, 4), "1e-05");
        assert_eq!(format_label(9.9996, 4), "10");
    }
}
