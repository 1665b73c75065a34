//! One independent plot: viewport, gridlines, series and their rendering.

use crate::axis::{AxisBuilder, AxisSet, format_label};
use crate::config::PlotContext;
use crate::geom::{Point, ScreenPoint, ScreenRect};
use crate::interaction::{CursorIcon, Key};
use crate::legend::LegendEntry;
use crate::raster::Canvas;
use crate::render::line::LineSettings;
use crate::render::{
    Align, DrawStats, Orientation, RenderCommand, RenderList, Rgba, TextPlacement,
    render_collection,
};
use crate::series::{Collection, Function, SampleKey, SampledFunction};
use crate::style::{Color, ColorGenerator};
use crate::text::{FontKind, Fonts};
use crate::transform::Transform;
use crate::view::{Bounds, ViewState};

const MAIN_AXIS_GRAY: u8 = 120;
const SECONDARY_AXIS_GRAY: u8 = 180;
const MAX_RELAYOUTS: usize = 4;

/// Whether the viewport was set up for the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitState {
    /// Nothing was fitted or set yet.
    Uninitialized,
    /// The viewport is fitted or explicit and follows input events.
    Ready,
}

/// What the plotter needs from a sub plot: layout, input and drawing.
///
/// Positions are local to the sub plot's slot in the window.
pub trait Pane {
    /// Fit the viewport before the first frame.
    fn prepare(&mut self, ctx: &PlotContext);
    /// Size of the whole slot: margins, plot box and titles.
    fn outer_size(&self, ctx: &PlotContext) -> (i32, i32);
    /// Fit the slot into `width` × `height`.
    fn resize(&mut self, ctx: &PlotContext, width: i32, height: i32);
    /// Discrete pan.
    fn key(&mut self, ctx: &PlotContext, key: Key);
    /// Zoom around `at`.
    fn wheel(&mut self, ctx: &PlotContext, delta: f64, at: ScreenPoint);
    /// Button pressed at `at`.
    fn press(&mut self, ctx: &PlotContext, at: ScreenPoint);
    /// Button released.
    fn release(&mut self);
    /// Drag by a pixel delta.
    fn drag(&mut self, ctx: &PlotContext, dx: i32, dy: i32);
    /// Cursor moved to `at`, or left the slot.
    fn hover(&mut self, ctx: &PlotContext, at: Option<ScreenPoint>);
    /// Cursor shape for this pane.
    fn cursor(&self) -> CursorIcon;
    /// Legend items, collections first.
    fn legend_entries(&self) -> Vec<LegendEntry>;
    /// Data coordinate under the cursor.
    fn readout(&self) -> Option<Point>;
    /// Draw into `frame` with the slot's top-left corner at `origin`.
    fn draw(
        &mut self,
        ctx: &PlotContext,
        fonts: &Fonts,
        frame: &mut Canvas,
        origin: ScreenPoint,
    ) -> DrawStats;
}

/// A plot box with its own viewport and series.
#[derive(Debug)]
pub struct SubPlot {
    title: String,
    x_title: Option<String>,
    y_title: Option<String>,
    collections: Vec<Collection>,
    functions: Vec<SampledFunction>,
    view: ViewState,
    init: InitState,
    window_defined: bool,
    orthonormal: bool,
    width: i32,
    height: i32,
    left_margin: i32,
    axes: AxisSet,
    dirty_axis: bool,
    mouse: Option<Point>,
    dragging: bool,
    target: Option<Canvas>,
}

impl SubPlot {
    /// Create an empty sub plot with a plot box of `size` pixels.
    pub fn new(
        title: impl Into<String>,
        x_title: Option<String>,
        y_title: Option<String>,
        size: (i32, i32),
    ) -> Self {
        Self {
            title: title.into(),
            x_title,
            y_title,
            collections: Vec::new(),
            functions: Vec::new(),
            view: ViewState::default(),
            init: InitState::Uninitialized,
            window_defined: false,
            orthonormal: false,
            width: size.0,
            height: size.1,
            left_margin: 0,
            axes: AxisSet::default(),
            dirty_axis: true,
            mouse: None,
            dragging: false,
            target: None,
        }
    }

    /// Title drawn above the plot box.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Add a collection, assigning a palette color if it has none.
    pub fn add_collection(&mut self, mut collection: Collection, colors: &mut ColorGenerator) {
        collection.assign_color(colors.resolve(collection.color()));
        self.collections.push(collection);
    }

    /// Add a function, assigning a palette color if it has none.
    pub fn add_function(&mut self, mut function: Function, colors: &mut ColorGenerator) {
        function.assign_color(colors.resolve(function.color()));
        self.functions.push(SampledFunction::new(function));
    }

    /// Show the data rectangle `[x, x + w] × [y - h, y]`; `y` is the top edge.
    ///
    /// An explicit window replaces fitting to the data.
    pub fn set_window(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.view = ViewState::window(x, y, w, h, self.width, self.height);
        self.window_defined = true;
        self.dirty_axis = true;
    }

    /// Force equal scales on both axes when fitting to the data.
    pub fn set_orthonormal(&mut self, orthonormal: bool) {
        self.orthonormal = orthonormal;
    }

    /// Access the collections.
    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    /// Access the functions.
    pub fn functions(&self) -> &[SampledFunction] {
        &self.functions
    }

    /// Current viewport.
    pub fn view(&self) -> ViewState {
        self.view
    }

    /// Initialization state.
    pub fn init_state(&self) -> InitState {
        self.init
    }

    /// Plot box size.
    pub fn plot_size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    /// Width reserved left of the plot box.
    pub fn left_margin(&self) -> i32 {
        self.left_margin
    }

    /// Whether the gridlines must be recomputed.
    pub fn is_axis_dirty(&self) -> bool {
        self.dirty_axis
    }

    /// Cached gridlines.
    pub fn axes(&self) -> &AxisSet {
        &self.axes
    }

    /// Size of the cached content target, once one was created.
    pub fn target_size(&self) -> Option<(i32, i32)> {
        self.target.as_ref().map(Canvas::size)
    }

    /// Plot box in slot coordinates.
    pub fn plot_rect(&self, ctx: &PlotContext) -> ScreenRect {
        ScreenRect::from_origin_size(
            self.left_margin,
            ctx.config.top_margin,
            self.width,
            self.height,
        )
    }

    /// Transform for the current viewport and layout.
    pub fn transform(&self, ctx: &PlotContext) -> Transform {
        Transform::new(&self.view, self.plot_rect(ctx))
    }

    fn y_title_size(&self, ctx: &PlotContext) -> i32 {
        ctx.axis_title_size(self.y_title.is_some())
    }

    fn x_title_size(&self, ctx: &PlotContext) -> i32 {
        ctx.axis_title_size(self.x_title.is_some())
    }

    fn left_margin_for(&self, ctx: &PlotContext, label_chars: usize) -> i32 {
        let chars = i32::try_from(label_chars.max(ctx.config.min_label_chars)).unwrap_or(i32::MAX);
        ctx.config.base_left_margin
            + chars.saturating_mul(ctx.metrics.label_advance)
            + self.y_title_size(ctx)
    }

    /// Pan by `pixels` horizontally.
    pub fn event_x_move(&mut self, pixels: i32) {
        self.view.x_offset += f64::from(pixels) / self.view.x_zoom;
        self.dirty_axis = true;
    }

    /// Pan by `pixels` vertically.
    pub fn event_y_move(&mut self, pixels: i32) {
        self.view.y_offset += f64::from(pixels) / self.view.y_zoom();
        self.dirty_axis = true;
    }

    /// Zoom by `zoom_factor^delta`, keeping the data point under `mouse`
    /// fixed when the cursor is inside the plot box.
    ///
    /// Returns `false`, leaving the view untouched, when the new zoom would
    /// no longer resolve neighboring pixels.
    pub fn event_zoom(&mut self, ctx: &PlotContext, delta: f64, mouse: ScreenPoint) -> bool {
        let before = self.transform(ctx);
        let anchor = before.from_screen(mouse);
        let previous = self.view;
        self.view.x_zoom *= ctx.config.zoom_factor.powf(delta);

        let after = self.transform(ctx);
        if !resolves_pixels(&self.view, &after) {
            log::debug!(
                "zoom to {} px/unit reverted: pixels no longer resolvable",
                self.view.x_zoom
            );
            self.view = previous;
            return false;
        }
        if before.in_plot(mouse) {
            let moved = after.from_screen(mouse);
            self.view.x_offset += moved.x - anchor.x;
            self.view.y_offset += moved.y - anchor.y;
        }
        self.dirty_axis = true;
        true
    }

    /// Fit the viewport to the collections.
    pub fn initialize_zoom_and_offset(&mut self, ctx: &PlotContext) {
        let config = &ctx.config;
        let bounds = self
            .collections
            .iter()
            .filter_map(Collection::bounds)
            .reduce(Bounds::union);
        let Some(bounds) = bounds else {
            self.view = ViewState::centered(config.default_zoom);
            self.dirty_axis = true;
            return;
        };
        let fit = |pixels: i32, span: f64| {
            if span > 0.0 && span.is_finite() {
                f64::from(pixels) / span * config.fit_margin
            } else {
                config.default_zoom
            }
        };
        let x_zoom = fit(self.width, bounds.x.span());
        let y_zoom = fit(self.height, bounds.y.span());
        let (x_zoom, y_x_ratio) = if self.orthonormal {
            (x_zoom.min(y_zoom), 1.0)
        } else {
            (x_zoom, y_zoom / x_zoom)
        };
        self.view = ViewState {
            x_zoom,
            y_x_ratio,
            x_offset: -bounds.x.center(),
            y_offset: -bounds.y.center(),
        };
        self.dirty_axis = true;
        log::debug!("fitted {:?} to x {:?}, y {:?}", self.title, bounds.x, bounds.y);
    }

    /// Recompute the gridlines if they are stale.
    ///
    /// The left margin follows the widest tick label; when it changes the
    /// plot box is narrowed or widened inside the same slot and the gridlines
    /// are computed again.
    pub fn refresh_axis(&mut self, ctx: &PlotContext) {
        if !self.dirty_axis {
            return;
        }
        let builder = AxisBuilder::new(ctx.config.grid);
        for _ in 0..MAX_RELAYOUTS {
            self.axes = builder.build(&self.transform(ctx));
            let chars = self.axes.longest_label(ctx.config.label_digits);
            let margin = self.left_margin_for(ctx, chars);
            if margin == self.left_margin {
                break;
            }
            let (outer_width, _) = self.outer_size(ctx);
            log::debug!(
                "left margin of {:?} {} -> {} px",
                self.title,
                self.left_margin,
                margin
            );
            self.left_margin = margin;
            self.width = (outer_width - margin - ctx.config.right_margin).max(ctx.config.min_plot_size.0);
        }
        self.dirty_axis = false;
    }

    /// Render the series into a list in slot coordinates.
    pub(crate) fn render_content(&mut self, ctx: &PlotContext) -> (RenderList, DrawStats) {
        let transform = self.transform(ctx);
        let settings = LineSettings {
            half_point_size: ctx.config.half_point_size,
            dash_pattern: ctx.config.dash_pattern,
        };
        let mut list = RenderList::new();
        let mut total = DrawStats::default();
        let mut add = |stats: DrawStats| {
            total.markers += stats.markers;
            total.segments += stats.segments;
            total.rejected += stats.rejected;
        };
        for collection in &self.collections {
            add(render_collection(collection, &transform, settings, &mut list));
        }
        let key = SampleKey::new(transform.visible_x(), ctx.config.sampling_points);
        for function in &mut self.functions {
            add(render_collection(
                function.samples(key),
                &transform,
                settings,
                &mut list,
            ));
        }
        (list, total)
    }

    /// Render gridlines, tick labels, the plot box and titles.
    pub(crate) fn render_decorations(&mut self, ctx: &PlotContext) -> RenderList {
        self.refresh_axis(ctx);
        let config = &ctx.config;
        let rect = self.plot_rect(ctx);
        let half = config.line_width_half;
        let mut list = RenderList::new();

        for axis in &self.axes.horizontal {
            let row = axis.screen_coordinate;
            list.fill_rect(
                ScreenRect::new(
                    ScreenPoint::new(rect.min.x, row - half),
                    ScreenPoint::new(rect.max.x, row + half + 1),
                ),
                axis_color(axis.is_main),
            );
            list.text(
                ScreenPoint::new(rect.min.x - config.text_margin, row),
                format_label(axis.data_coordinate, config.label_digits),
                FontKind::Label,
                TextPlacement::RIGHT_CENTER,
            );
        }
        for axis in &self.axes.vertical {
            let column = axis.screen_coordinate;
            list.fill_rect(
                ScreenRect::new(
                    ScreenPoint::new(column - half, rect.min.y),
                    ScreenPoint::new(column + half + 1, rect.max.y),
                ),
                axis_color(axis.is_main),
            );
            list.text(
                ScreenPoint::new(column, rect.max.y + config.text_margin),
                format_label(axis.data_coordinate, config.label_digits),
                FontKind::Label,
                TextPlacement {
                    horizontal: Align::Center,
                    vertical: Align::Start,
                    orientation: Orientation::Horizontal,
                },
            );
        }

        list.push(RenderCommand::StrokeRect {
            rect: ScreenRect::new(rect.min, rect.max.offset(1, 1)),
            color: Rgba::BLACK,
        });

        let (outer_width, _) = self.outer_size(ctx);
        if !self.title.is_empty() {
            list.text(
                ScreenPoint::new(outer_width / 2, config.top_margin / 2),
                self.title.clone(),
                FontKind::Title,
                TextPlacement::CENTER,
            );
        }
        let label_size = config.label_font_size.round() as i32;
        if let Some(x_title) = &self.x_title {
            list.text(
                ScreenPoint::new(
                    rect.min.x + self.width / 2,
                    rect.max.y + label_size + config.text_margin + label_size / 2,
                ),
                x_title.clone(),
                FontKind::Label,
                TextPlacement::CENTER,
            );
        }
        if let Some(y_title) = &self.y_title {
            list.text(
                ScreenPoint::new(self.y_title_size(ctx) / 2, rect.min.y + self.height / 2),
                y_title.clone(),
                FontKind::Label,
                TextPlacement::VERTICAL_CENTER,
            );
        }
        list
    }
}

fn axis_color(is_main: bool) -> Color {
    Color::gray(if is_main {
        MAIN_AXIS_GRAY
    } else {
        SECONDARY_AXIS_GRAY
    })
}

/// Two pixels apart must still map to distinct data values on both axes.
fn resolves_pixels(view: &ViewState, transform: &Transform) -> bool {
    let distinct = |a: f64, b: f64| {
        let step = (b - a).abs();
        step.is_finite() && step > f64::EPSILON * a.abs().max(b.abs())
    };
    if !view.x_zoom.is_finite() || view.x_zoom <= 0.0 || !view.y_zoom().is_finite() {
        return false;
    }
    let rect = transform.rect();
    distinct(
        transform.from_screen_x(rect.min.x),
        transform.from_screen_x(rect.min.x + 2),
    ) && distinct(
        transform.from_screen_y(rect.min.y),
        transform.from_screen_y(rect.min.y + 2),
    )
}

impl Pane for SubPlot {
    fn prepare(&mut self, ctx: &PlotContext) {
        if self.init == InitState::Ready {
            return;
        }
        self.left_margin = self.left_margin_for(ctx, ctx.config.min_label_chars);
        if !self.window_defined {
            self.initialize_zoom_and_offset(ctx);
        }
        self.init = InitState::Ready;
        self.dirty_axis = true;
    }

    fn outer_size(&self, ctx: &PlotContext) -> (i32, i32) {
        let config = &ctx.config;
        (
            self.left_margin + self.width + config.right_margin,
            config.top_margin + self.height + config.plot_info_margin + self.x_title_size(ctx),
        )
    }

    fn resize(&mut self, ctx: &PlotContext, width: i32, height: i32) {
        let config = &ctx.config;
        let (min_width, min_height) = config.min_plot_size;
        self.width = (width - self.left_margin - config.right_margin).max(min_width);
        self.height = (height
            - config.top_margin
            - config.plot_info_margin
            - self.x_title_size(ctx))
        .max(min_height);
        self.dirty_axis = true;
    }

    fn key(&mut self, ctx: &PlotContext, key: Key) {
        let step = ctx.config.arrow_step_px;
        match key {
            Key::Left => self.event_x_move(step),
            Key::Right => self.event_x_move(-step),
            Key::Up => self.event_y_move(-step),
            Key::Down => self.event_y_move(step),
            Key::Escape => {}
        }
    }

    fn wheel(&mut self, ctx: &PlotContext, delta: f64, at: ScreenPoint) {
        self.event_zoom(ctx, delta, at);
        self.hover(ctx, Some(at));
    }

    fn press(&mut self, ctx: &PlotContext, at: ScreenPoint) {
        self.dragging = true;
        self.hover(ctx, Some(at));
    }

    fn release(&mut self) {
        self.dragging = false;
    }

    fn drag(&mut self, _ctx: &PlotContext, dx: i32, dy: i32) {
        if dx != 0 {
            self.event_x_move(dx);
        }
        if dy != 0 {
            self.event_y_move(-dy);
        }
    }

    fn hover(&mut self, ctx: &PlotContext, at: Option<ScreenPoint>) {
        let transform = self.transform(ctx);
        self.mouse = at
            .filter(|point| transform.in_plot(*point))
            .map(|point| transform.from_screen(point));
    }

    fn cursor(&self) -> CursorIcon {
        if self.dragging {
            CursorIcon::Grab
        } else {
            CursorIcon::Arrow
        }
    }

    fn legend_entries(&self) -> Vec<LegendEntry> {
        let collections = self.collections.iter().map(|c| LegendEntry {
            color: c.color(),
            name: c.name().to_string(),
        });
        let functions = self.functions.iter().map(|f| LegendEntry {
            color: f.function().color(),
            name: f.function().name().to_string(),
        });
        collections.chain(functions).collect()
    }

    fn readout(&self) -> Option<Point> {
        self.mouse
    }

    fn draw(
        &mut self,
        ctx: &PlotContext,
        fonts: &Fonts,
        frame: &mut Canvas,
        origin: ScreenPoint,
    ) -> DrawStats {
        let decorations = self.render_decorations(ctx);
        frame.paint(&decorations, fonts, (origin.x, origin.y));

        let rect = self.plot_rect(ctx);
        let (content, stats) = self.render_content(ctx);
        let mut target = match self.target.take() {
            Some(target) if target.size() == (rect.width(), rect.height()) => target,
            _ => {
                log::debug!(
                    "content target of {:?} is now {}x{}",
                    self.title,
                    rect.width(),
                    rect.height()
                );
                Canvas::new(rect.width(), rect.height())
            }
        };
        target.clear(Rgba::TRANSPARENT);
        target.paint(&content, fonts, (-rect.min.x, -rect.min.y));
        frame.blit(&target, origin.offset(rect.min.x, rect.min.y));
        self.target = Some(target);
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlotterConfig;
    use crate::geom::Coordinate;
    use crate::style::{DisplayLines, DisplayPoints};

    fn ctx() -> PlotContext {
        PlotContext::fixed(PlotterConfig::default())
    }

    fn sub_plot() -> SubPlot {
        SubPlot::new("test", None, None, (800, 600))
    }

    fn parabola() -> Collection {
        Collection::new([(0.0, 0.0), (1.0, 1.0), (2.0, 4.0), (3.0, 9.0), (4.0, 16.0)])
            .with_display_lines(DisplayLines::YES)
    }

    #[test]
    fn parabola_is_fitted_with_margin() {
        let ctx = ctx();
        let mut colors = ColorGenerator::new();
        let mut plot = sub_plot();
        plot.add_collection(parabola(), &mut colors);
        plot.prepare(&ctx);
        let view = plot.view();
        assert_eq!(view.x_zoom, 800.0 / 4.0 * 0.9);
        assert!((view.y_zoom() - 600.0 / 16.0 * 0.9).abs() < 1e-9);
        assert_eq!(view.x_offset, -2.0);
        assert_eq!(view.y_offset, -8.0);
        assert_eq!(plot.init_state(), InitState::Ready);

        let transform = plot.transform(&ctx);
        let xs = transform.visible_x();
        assert!(xs.min < 0.0 && xs.max > 4.0);
        let (_, stats) = plot.render_content(&ctx);
        assert_eq!(
            stats,
            DrawStats {
                markers: 5,
                segments: 4,
                rejected: 0
            }
        );
    }

    #[test]
    fn orthonormal_fit_uses_smaller_zoom() {
        let ctx = ctx();
        let mut plot = sub_plot();
        plot.set_orthonormal(true);
        plot.add_collection(parabola(), &mut ColorGenerator::new());
        plot.prepare(&ctx);
        let view = plot.view();
        assert_eq!(view.y_x_ratio, 1.0);
        assert_eq!(view.x_zoom, 600.0 / 16.0 * 0.9);
    }

    #[test]
    fn single_point_falls_back_to_default_zoom() {
        let ctx = ctx();
        let mut plot = sub_plot();
        plot.add_collection(Collection::new([(3.0, -1.0)]), &mut ColorGenerator::new());
        plot.prepare(&ctx);
        let view = plot.view();
        assert_eq!(view.x_zoom, 50.0);
        assert_eq!(view.y_zoom(), 50.0);
        assert_eq!((view.x_offset, view.y_offset), (-3.0, 1.0));
    }

    #[test]
    fn empty_plot_uses_default_view() {
        let ctx = ctx();
        let mut plot = sub_plot();
        plot.prepare(&ctx);
        assert_eq!(plot.view(), ViewState::centered(50.0));
        // Non-finite points do not count either.
        let mut plot = sub_plot();
        plot.add_collection(
            Collection::new([Coordinate::new(f64::NAN, 1.0)]),
            &mut ColorGenerator::new(),
        );
        plot.prepare(&ctx);
        assert_eq!(plot.view(), ViewState::centered(50.0));
    }

    #[test]
    fn explicit_window_skips_fitting_and_pans_exactly() {
        let ctx = ctx();
        let mut plot = sub_plot();
        plot.add_collection(parabola(), &mut ColorGenerator::new());
        plot.set_window(-10.0, 10.0, 20.0, 20.0);
        plot.prepare(&ctx);
        let zoom = plot.view().x_zoom;
        assert_eq!(zoom, 40.0);
        let before = plot.view().x_offset;
        plot.key(&ctx, Key::Right);
        assert_eq!(plot.view().x_offset, before - 10.0 / zoom);
        assert!(plot.is_axis_dirty());
    }

    #[test]
    fn arrow_keys_pan_both_axes() {
        let ctx = ctx();
        let mut plot = sub_plot();
        plot.set_window(-10.0, 10.0, 20.0, 20.0);
        plot.prepare(&ctx);
        plot.key(&ctx, Key::Left);
        assert_eq!(plot.view().x_offset, 10.0 / 40.0);
        plot.key(&ctx, Key::Up);
        assert_eq!(plot.view().y_offset, -10.0 / 30.0);
        plot.key(&ctx, Key::Down);
        assert_eq!(plot.view().y_offset, 0.0);
    }

    #[test]
    fn drag_moves_content_with_the_cursor() {
        let ctx = ctx();
        let mut plot = sub_plot();
        plot.set_window(-10.0, 10.0, 20.0, 20.0);
        plot.prepare(&ctx);
        let transform = plot.transform(&ctx);
        let before = transform.to_screen(Point::new(1.0, 1.0)).expect("finite");
        plot.press(&ctx, before);
        assert_eq!(plot.cursor(), CursorIcon::Grab);
        plot.drag(&ctx, 40, -30);
        plot.release();
        assert_eq!(plot.cursor(), CursorIcon::Arrow);
        let after = plot.transform(&ctx).to_screen(Point::new(1.0, 1.0)).expect("finite");
        assert_eq!(after, before.offset(40, -30));
    }

    #[test]
    fn zoom_keeps_point_under_cursor() {
        let ctx = ctx();
        let mut plot = sub_plot();
        plot.add_collection(parabola(), &mut ColorGenerator::new());
        plot.prepare(&ctx);
        let mouse = ScreenPoint::new(plot.left_margin() + 123, 50 + 321);
        let before = plot.transform(&ctx).from_screen(mouse);
        for delta in [1.0, 2.5, -0.75, -3.0] {
            assert!(plot.event_zoom(&ctx, delta, mouse));
            let after = plot.transform(&ctx).from_screen(mouse);
            assert!((after.x - before.x).abs() < 1e-9, "{after:?} vs {before:?}");
            assert!((after.y - before.y).abs() < 1e-9, "{after:?} vs {before:?}");
        }
    }

    #[test]
    fn zoom_outside_plot_does_not_recenter() {
        let ctx = ctx();
        let mut plot = sub_plot();
        plot.prepare(&ctx);
        assert!(plot.event_zoom(&ctx, 1.0, ScreenPoint::new(0, 0)));
        assert_eq!(plot.view().x_offset, 0.0);
        assert!((plot.view().x_zoom - 65.0).abs() < 1e-9);
    }

    #[test]
    fn unresolvable_zoom_is_reverted() {
        let ctx = ctx();
        let mut plot = sub_plot();
        // One pixel per unit, far from the origin.
        plot.set_window(1e15, 300.0, 800.0, 600.0);
        plot.prepare(&ctx);
        let before = plot.view();
        let mouse = ScreenPoint::new(plot.left_margin() + 400, 350);
        assert!(!plot.event_zoom(&ctx, 30.0, mouse));
        assert_eq!(plot.view(), before);

        let mut plot = sub_plot();
        plot.prepare(&ctx);
        assert!(!plot.event_zoom(&ctx, 5000.0, mouse));
        assert_eq!(plot.view(), ViewState::centered(50.0));
    }

    #[test]
    fn margin_follows_label_width_inside_same_slot() {
        let ctx = ctx();
        let mut plot = sub_plot();
        plot.set_window(-10.0, 123_456_789.0, 20.0, 20.0);
        plot.prepare(&ctx);
        let (outer_before, _) = plot.outer_size(&ctx);
        assert_eq!(plot.left_margin(), 30 + 5 * 9);
        plot.refresh_axis(&ctx);
        // "1.235e+08" style labels are longer than five characters.
        let chars = plot.axes().longest_label(4);
        assert!(chars > 5);
        assert_eq!(plot.left_margin(), 30 + chars as i32 * 9);
        assert_eq!(plot.outer_size(&ctx).0, outer_before);
        assert!(!plot.is_axis_dirty());
        // Gridlines were computed for the final layout.
        let fresh = AxisBuilder::new(ctx.config.grid).build(&plot.transform(&ctx));
        assert_eq!(plot.axes(), &fresh);
    }

    #[test]
    fn y_title_widens_the_margin() {
        let ctx = ctx();
        let mut plot = SubPlot::new("t", Some("x".into()), Some("y".into()), (800, 600));
        plot.prepare(&ctx);
        assert_eq!(plot.left_margin(), 30 + 5 * 9 + 2 * 5 + 15);
        let (_, outer_height) = plot.outer_size(&ctx);
        assert_eq!(outer_height, 50 + 600 + 25 + 25);
    }

    #[test]
    fn resize_respects_minimum() {
        let ctx = ctx();
        let mut plot = sub_plot();
        plot.prepare(&ctx);
        plot.refresh_axis(&ctx);
        plot.resize(&ctx, 20, 20);
        assert_eq!(plot.plot_size(), (160, 120));
        assert!(plot.is_axis_dirty());
        let margin = plot.left_margin();
        plot.resize(&ctx, margin + 30 + 500, 50 + 25 + 400);
        assert_eq!(plot.plot_size(), (500, 400));
    }

    #[test]
    fn hover_tracks_data_under_cursor() {
        let ctx = ctx();
        let mut plot = sub_plot();
        plot.set_window(-10.0, 10.0, 20.0, 20.0);
        plot.prepare(&ctx);
        let center = ScreenPoint::new(plot.left_margin() + 400, 50 + 300);
        plot.hover(&ctx, Some(center));
        assert_eq!(plot.readout(), Some(Point::new(0.0, 0.0)));
        plot.hover(&ctx, Some(ScreenPoint::new(plot.left_margin(), 60)));
        assert_eq!(plot.readout(), None);
        plot.hover(&ctx, None);
        assert_eq!(plot.readout(), None);
    }

    #[test]
    fn functions_resample_only_when_domain_changes() {
        let ctx = ctx();
        let mut plot = sub_plot();
        let mut colors = ColorGenerator::new();
        plot.add_function(Function::new(|x| x.sin()).with_name("sin"), &mut colors);
        plot.prepare(&ctx);
        let (_, first) = plot.render_content(&ctx);
        assert!(first.segments > 0);
        assert_eq!(first.markers, 0);
        plot.render_content(&ctx);
        assert_eq!(plot.functions()[0].resample_count(), 1);
        plot.key(&ctx, Key::Right);
        plot.render_content(&ctx);
        assert_eq!(plot.functions()[0].resample_count(), 2);
    }

    #[test]
    fn colors_are_assigned_once_in_order() {
        let mut plot = sub_plot();
        let mut colors = ColorGenerator::new();
        plot.add_collection(parabola(), &mut colors);
        plot.add_collection(parabola().with_color(Color::rgb(1, 2, 3)), &mut colors);
        plot.add_function(Function::new(|x| x), &mut colors);
        let entries = plot.legend_entries();
        assert_eq!(entries[0].color, Color::rgb(0, 72, 186));
        assert_eq!(entries[1].color, Color::rgb(1, 2, 3));
        assert_eq!(entries[2].color, Color::rgb(219, 45, 67));
    }

    #[test]
    fn decorations_are_stable_between_refreshes() {
        let ctx = ctx();
        let mut plot = sub_plot();
        plot.add_collection(
            parabola().with_display_points(DisplayPoints::NO),
            &mut ColorGenerator::new(),
        );
        plot.prepare(&ctx);
        let first = plot.render_decorations(&ctx);
        let second = plot.render_decorations(&ctx);
        assert_eq!(first, second);
        let grid = first.count(|c| matches!(c, RenderCommand::FillRect { .. }));
        assert_eq!(grid, plot.axes().horizontal.len() + plot.axes().vertical.len());
    }
}
