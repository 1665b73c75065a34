//! Plotter entry points: sub plot management, layout, input routing and
//! output.

use std::borrow::Cow;
use std::ffi::OsString;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use crate::config::{PlotContext, PlotterConfig};
use crate::error::PlotError;
use crate::geom::{Point, ScreenPoint, ScreenRect};
use crate::interaction::{CursorIcon, DragState, InputEvent, Key, PaneSlot, hit_test};
use crate::legend::{LegendEntry, build_legend, legend_height};
use crate::raster::Canvas;
use crate::render::{RenderList, Rgba};
use crate::runner::{FrameHost, run_loop};
use crate::series::{Collection, Function};
use crate::style::ColorGenerator;
use crate::subplot::{Pane, SubPlot};
use crate::text::{FontSource, Fonts};

/// How sub plots are arranged in the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StackingDirection {
    /// Side by side, left to right.
    #[default]
    Horizontal,
    /// On top of each other, top to bottom.
    Vertical,
}

/// A window of one or more sub plots sharing a legend.
///
/// Sub plot 0 always exists and carries the titles given to
/// [`Plotter::new`].
#[derive(Debug)]
pub struct Plotter {
    title: String,
    sub_plots: Vec<SubPlot>,
    direction: StackingDirection,
    colors: ColorGenerator,
    ctx: PlotContext,
    font_source: FontSource,
    fonts: Option<Fonts>,
    hovered: Option<usize>,
    last_hovered: usize,
    drag: Option<DragState>,
}

/// Mutable access to one sub plot, with the plotter's color generator.
#[derive(Debug)]
pub struct SubPlotHandle<'a> {
    index: usize,
    sub_plot: &'a mut SubPlot,
    colors: &'a mut ColorGenerator,
}

impl SubPlotHandle<'_> {
    /// Index of the sub plot in its plotter.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Add a collection.
    pub fn add_collection(&mut self, collection: Collection) -> &mut Self {
        self.sub_plot.add_collection(collection, self.colors);
        self
    }

    /// Add a function.
    pub fn add_function(&mut self, function: Function) -> &mut Self {
        self.sub_plot.add_function(function, self.colors);
        self
    }

    /// Show the data rectangle `[x, x + w] × [y - h, y]`.
    pub fn set_window(&mut self, x: f64, y: f64, w: f64, h: f64) -> &mut Self {
        self.sub_plot.set_window(x, y, w, h);
        self
    }

    /// Force equal scales on both axes.
    pub fn set_orthonormal(&mut self, orthonormal: bool) -> &mut Self {
        self.sub_plot.set_orthonormal(orthonormal);
        self
    }

    /// The sub plot itself.
    pub fn sub_plot(&self) -> &SubPlot {
        self.sub_plot
    }
}

fn optional(title: String) -> Option<String> {
    if title.is_empty() { None } else { Some(title) }
}

impl Plotter {
    /// Create a plotter with default settings. Empty axis titles are not drawn.
    pub fn new(
        title: impl Into<String>,
        x_title: impl Into<String>,
        y_title: impl Into<String>,
    ) -> Self {
        Self::with_config(title, x_title, y_title, PlotterConfig::default())
    }

    /// Create a plotter with custom settings.
    pub fn with_config(
        title: impl Into<String>,
        x_title: impl Into<String>,
        y_title: impl Into<String>,
        config: PlotterConfig,
    ) -> Self {
        let title = title.into();
        let first = SubPlot::new(
            title.clone(),
            optional(x_title.into()),
            optional(y_title.into()),
            config.default_plot_size,
        );
        Self {
            title,
            sub_plots: vec![first],
            direction: StackingDirection::default(),
            colors: ColorGenerator::new(),
            ctx: PlotContext::fixed(config),
            font_source: FontSource::default(),
            fonts: None,
            hovered: None,
            last_hovered: 0,
            drag: None,
        }
    }

    /// Use other fonts. The label font must be monospaced.
    pub fn with_fonts(
        mut self,
        title: impl Into<Cow<'static, [u8]>>,
        label: impl Into<Cow<'static, [u8]>>,
    ) -> Self {
        self.font_source = FontSource::new(title, label);
        self.fonts = None;
        self
    }

    /// Window title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Active settings.
    pub fn config(&self) -> &PlotterConfig {
        &self.ctx.config
    }

    /// Number of sub plots.
    pub fn sub_plot_count(&self) -> usize {
        self.sub_plots.len()
    }

    /// Append a sub plot. Empty axis titles are not drawn.
    pub fn add_sub_plot(
        &mut self,
        title: impl Into<String>,
        x_title: impl Into<String>,
        y_title: impl Into<String>,
    ) -> SubPlotHandle<'_> {
        let index = self.sub_plots.len();
        self.sub_plots.push(SubPlot::new(
            title,
            optional(x_title.into()),
            optional(y_title.into()),
            self.ctx.config.default_plot_size,
        ));
        SubPlotHandle {
            index,
            sub_plot: &mut self.sub_plots[index],
            colors: &mut self.colors,
        }
    }

    /// Handle of the sub plot at `index`.
    pub fn sub_plot(&mut self, index: usize) -> Option<SubPlotHandle<'_>> {
        let sub_plot = self.sub_plots.get_mut(index)?;
        Some(SubPlotHandle {
            index,
            sub_plot,
            colors: &mut self.colors,
        })
    }

    fn handle(&mut self, index: usize) -> Result<SubPlotHandle<'_>, PlotError> {
        let count = self.sub_plots.len();
        self.sub_plot(index)
            .ok_or(PlotError::NoSuchSubPlot { index, count })
    }

    /// Add a collection to the sub plot at `index`.
    pub fn add_collection(&mut self, collection: Collection, index: usize) -> Result<(), PlotError> {
        self.handle(index)?.add_collection(collection);
        Ok(())
    }

    /// Add a function to the sub plot at `index`.
    pub fn add_function(&mut self, function: Function, index: usize) -> Result<(), PlotError> {
        self.handle(index)?.add_function(function);
        Ok(())
    }

    /// Show the data rectangle `[x, x + w] × [y - h, y]` in the sub plot at
    /// `index`.
    pub fn set_window(
        &mut self,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        index: usize,
    ) -> Result<(), PlotError> {
        self.handle(index)?.set_window(x, y, w, h);
        Ok(())
    }

    /// Force equal scales on both axes of the sub plot at `index`.
    pub fn set_orthonormal(&mut self, orthonormal: bool, index: usize) -> Result<(), PlotError> {
        self.handle(index)?.set_orthonormal(orthonormal);
        Ok(())
    }

    /// Arrange sub plots side by side or stacked.
    pub fn set_stacking_direction(&mut self, direction: StackingDirection) {
        self.direction = direction;
    }

    /// Current arrangement.
    pub fn stacking_direction(&self) -> StackingDirection {
        self.direction
    }

    fn fonts(&mut self) -> Result<Fonts, PlotError> {
        if let Some(fonts) = &self.fonts {
            return Ok(fonts.clone());
        }
        let config = &self.ctx.config;
        let fonts = Fonts::load(
            &self.font_source,
            config.title_font_size,
            config.label_font_size,
        )?;
        self.ctx.metrics = fonts.metrics();
        log::debug!("fonts loaded: {:?}", self.ctx.metrics);
        self.fonts = Some(fonts.clone());
        Ok(fonts)
    }

    /// Load fonts and fit every sub plot that has not been set up yet.
    pub fn prepare(&mut self) -> Result<(), PlotError> {
        self.fonts()?;
        for sub_plot in &mut self.sub_plots {
            sub_plot.prepare(&self.ctx);
        }
        Ok(())
    }

    /// Sub plot areas in window coordinates.
    pub fn slots(&self) -> Vec<PaneSlot> {
        let mut cursor = 0;
        self.sub_plots
            .iter()
            .enumerate()
            .map(|(index, sub_plot)| {
                let (width, height) = sub_plot.outer_size(&self.ctx);
                let rect = match self.direction {
                    StackingDirection::Horizontal => {
                        let rect = ScreenRect::from_origin_size(cursor, 0, width, height);
                        cursor += width;
                        rect
                    }
                    StackingDirection::Vertical => {
                        let rect = ScreenRect::from_origin_size(0, cursor, width, height);
                        cursor += height;
                        rect
                    }
                };
                PaneSlot { index, rect }
            })
            .collect()
    }

    fn plots_extent(&self) -> (i32, i32) {
        self.slots().iter().fold((0, 0), |(width, height), slot| {
            match self.direction {
                StackingDirection::Horizontal => {
                    (width + slot.rect.width(), height.max(slot.rect.height()))
                }
                StackingDirection::Vertical => {
                    (width.max(slot.rect.width()), height + slot.rect.height())
                }
            }
        })
    }

    /// Legend items of every sub plot, in sub plot order.
    pub fn legend_entries(&self) -> Vec<LegendEntry> {
        self.sub_plots
            .iter()
            .flat_map(|sub_plot| sub_plot.legend_entries())
            .collect()
    }

    /// Window size: stacked sub plots plus the legend below them.
    pub fn window_size(&self) -> (i32, i32) {
        let (width, height) = self.plots_extent();
        (
            width,
            height + legend_height(&self.ctx, self.legend_entries().len()),
        )
    }

    /// Fit the sub plots into a window of `width` × `height`.
    pub fn resize(&mut self, width: i32, height: i32) {
        let count = i32::try_from(self.sub_plots.len()).unwrap_or(i32::MAX).max(1);
        let available = height - legend_height(&self.ctx, self.legend_entries().len());
        let direction = self.direction;
        let total = self.sub_plots.len();
        for (index, sub_plot) in self.sub_plots.iter_mut().enumerate() {
            let last = index + 1 == total;
            let share = |total: i32| {
                let part = total / count;
                if last { total - part * (count - 1) } else { part }
            };
            let (w, h) = match direction {
                StackingDirection::Horizontal => (share(width), available),
                StackingDirection::Vertical => (width, share(available)),
            };
            sub_plot.resize(&self.ctx, w, h);
        }
        log::debug!("window resized to {width}x{height}");
    }

    /// Data coordinate under the cursor, from the sub plot it hovers.
    pub fn readout(&self) -> Option<Point> {
        let index = self.drag.map(|drag| drag.pane).or(self.hovered)?;
        self.sub_plots.get(index)?.readout()
    }

    /// Pointer shape for the current interaction.
    pub fn cursor(&self) -> CursorIcon {
        self.drag
            .and_then(|drag| self.sub_plots.get(drag.pane))
            .map(|sub_plot| sub_plot.cursor())
            .unwrap_or_default()
    }

    /// Apply one input event. Breaks on quit requests.
    pub fn handle_event(&mut self, event: InputEvent) -> ControlFlow<()> {
        match event {
            InputEvent::Quit | InputEvent::Key(Key::Escape) => return ControlFlow::Break(()),
            InputEvent::Key(key) => {
                let index = self.hovered.unwrap_or(self.last_hovered);
                if let Some(sub_plot) = self.sub_plots.get_mut(index) {
                    sub_plot.key(&self.ctx, key);
                }
            }
            InputEvent::Wheel { delta, x, y } => {
                let point = ScreenPoint::new(x, y);
                if let Some((index, local)) = self.locate(point) {
                    self.sub_plots[index].wheel(&self.ctx, delta, local);
                }
            }
            InputEvent::MouseDown { x, y } => {
                let point = ScreenPoint::new(x, y);
                if let Some((index, local)) = self.locate(point) {
                    self.drag = Some(DragState {
                        pane: index,
                        origin: point.offset(-local.x, -local.y),
                    });
                    self.sub_plots[index].press(&self.ctx, local);
                }
            }
            InputEvent::MouseUp { x, y } => {
                if let Some(drag) = self.drag.take() {
                    if let Some(sub_plot) = self.sub_plots.get_mut(drag.pane) {
                        sub_plot.release();
                    }
                }
                self.hover(ScreenPoint::new(x, y));
            }
            InputEvent::MouseMove { x, y, dx, dy } => {
                let point = ScreenPoint::new(x, y);
                match self.drag {
                    Some(drag) => {
                        if let Some(sub_plot) = self.sub_plots.get_mut(drag.pane) {
                            sub_plot.drag(&self.ctx, dx, dy);
                            let local = point.offset(-drag.origin.x, -drag.origin.y);
                            sub_plot.hover(&self.ctx, Some(local));
                        }
                    }
                    None => self.hover(point),
                }
            }
            InputEvent::Resize { width, height } => self.resize(width, height),
        }
        ControlFlow::Continue(())
    }

    /// Sub plot under `point` and the point in its local coordinates.
    fn locate(&self, point: ScreenPoint) -> Option<(usize, ScreenPoint)> {
        let slots = self.slots();
        let index = hit_test(&slots, point)?;
        let origin = slots[index].rect.min;
        Some((index, point.offset(-origin.x, -origin.y)))
    }

    fn hover(&mut self, point: ScreenPoint) {
        let located = self.locate(point);
        self.hovered = located.map(|(index, _)| index);
        if let Some(index) = self.hovered {
            self.last_hovered = index;
        }
        for (index, sub_plot) in self.sub_plots.iter_mut().enumerate() {
            let local = located
                .filter(|(hit, _)| *hit == index)
                .map(|(_, local)| local);
            sub_plot.hover(&self.ctx, local);
        }
    }

    /// Render one frame: sub plots on white with the legend below.
    pub fn render_frame(&mut self) -> Result<Canvas, PlotError> {
        self.prepare()?;
        let fonts = self.fonts()?;
        let slots = self.slots();
        let (width, height) = self.window_size();
        let (_, plots_height) = self.plots_extent();
        let mut frame = Canvas::filled(width, height, Rgba::WHITE);

        for slot in &slots {
            self.sub_plots[slot.index].draw(&self.ctx, &fonts, &mut frame, slot.rect.min);
        }

        let config = &self.ctx.config;
        let mut legend = RenderList::new();
        build_legend(
            &self.ctx,
            &self.legend_entries(),
            self.readout(),
            config.base_left_margin,
            plots_height,
            width - config.base_left_margin - config.right_margin,
            &mut legend,
        );
        frame.paint(&legend, &fonts, (0, 0));
        Ok(frame)
    }

    /// Render once and write `<name>.png`, returning the path written.
    pub fn try_save(&mut self, name: impl AsRef<Path>) -> Result<PathBuf, PlotError> {
        let mut path = OsString::from(name.as_ref().as_os_str());
        path.push(".png");
        let path = PathBuf::from(path);
        let frame = self.render_frame()?;
        frame.save_png(&path)?;
        log::info!(
            "saved {}x{} plot to {}",
            frame.width(),
            frame.height(),
            path.display()
        );
        Ok(path)
    }

    /// Render once and write `<name>.png`. Failures are logged.
    pub fn save(&mut self, name: impl AsRef<Path>) -> bool {
        match self.try_save(name) {
            Ok(_) => true,
            Err(err) => {
                log::error!("failed to save plot {:?}: {err}", self.title);
                false
            }
        }
    }

    /// Run the interactive loop on a custom host until it reports a quit.
    /// Failures are logged and the arrow cursor is restored.
    pub fn run<H: FrameHost + ?Sized>(&mut self, host: &mut H) -> bool {
        let result = run_loop(self, host);
        self.drag = None;
        host.set_cursor(CursorIcon::Arrow);
        match result {
            Ok(()) => true,
            Err(err) => {
                log::error!("plot {:?} stopped: {err}", self.title);
                false
            }
        }
    }

    /// Open an interactive window and block until it is closed.
    #[cfg(feature = "gpui")]
    pub fn plot(&mut self) -> bool {
        crate::gpui_backend::open_window(self)
    }

    /// Open an interactive window. Needs the `gpui` feature.
    #[cfg(not(feature = "gpui"))]
    pub fn plot(&mut self) -> bool {
        log::error!(
            "cannot open plot {:?}: built without the `gpui` feature",
            self.title
        );
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;
    use crate::view::ViewState;

    fn plotter() -> Plotter {
        let mut plotter = Plotter::new("left", "x", "y");
        plotter
            .add_collection(Collection::new([(0.0, 0.0), (1.0, 1.0), (2.0, 4.0)]), 0)
            .expect("sub plot 0");
        plotter
            .add_sub_plot("right", "", "")
            .add_function(Function::new(|x| x * x).with_name("square"));
        plotter.prepare().expect("bundled fonts");
        plotter
    }

    fn center_of(plotter: &Plotter, index: usize) -> ScreenPoint {
        let slot = plotter.slots()[index];
        let left = plotter.sub_plots[index].left_margin();
        let (width, height) = plotter.sub_plots[index].plot_size();
        slot.rect
            .min
            .offset(left + width / 2, plotter.config().top_margin + height / 2)
    }

    #[test]
    fn out_of_range_index_is_an_error() {
        let mut plotter = Plotter::new("t", "", "");
        let result = plotter.add_collection(Collection::new([(0.0, 0.0)]), 1);
        assert!(matches!(
            result,
            Err(PlotError::NoSuchSubPlot { index: 1, count: 1 })
        ));
        assert!(plotter.sub_plot(3).is_none());
        assert_eq!(plotter.sub_plot(0).map(|handle| handle.index()), Some(0));
    }

    #[test]
    fn colors_are_shared_across_sub_plots() {
        let plotter = plotter();
        let entries = plotter.legend_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].color, Color::rgb(0, 72, 186));
        assert_eq!(entries[1].color, Color::rgb(219, 45, 67));
        assert_eq!(entries[1].name, "square");
    }

    #[test]
    fn window_size_follows_stacking() {
        let mut plotter = plotter();
        let left = plotter.sub_plots[0].outer_size(&plotter.ctx);
        let right = plotter.sub_plots[1].outer_size(&plotter.ctx);
        let legend = legend_height(&plotter.ctx, 2);
        assert_eq!(
            plotter.window_size(),
            (left.0 + right.0, left.1.max(right.1) + legend)
        );
        plotter.set_stacking_direction(StackingDirection::Vertical);
        assert_eq!(
            plotter.window_size(),
            (left.0.max(right.0), left.1 + right.1 + legend)
        );
        assert_eq!(plotter.slots()[1].rect.min, ScreenPoint::new(0, left.1));
    }

    #[test]
    fn wheel_zooms_only_the_hovered_sub_plot() {
        let mut plotter = plotter();
        let before = plotter.sub_plots[0].view();
        let center = center_of(&plotter, 1);
        let flow = plotter.handle_event(InputEvent::Wheel {
            delta: 1.0,
            x: center.x,
            y: center.y,
        });
        assert_eq!(flow, ControlFlow::Continue(()));
        assert_eq!(plotter.sub_plots[0].view(), before);
        assert!((plotter.sub_plots[1].view().x_zoom - 65.0).abs() < 1e-9);
    }

    fn send(plotter: &mut Plotter, event: InputEvent) {
        assert_eq!(plotter.handle_event(event), ControlFlow::Continue(()));
    }

    #[test]
    fn drag_stays_with_the_pressed_sub_plot() {
        let mut plotter = plotter();
        let start = center_of(&plotter, 0);
        let right_before = plotter.sub_plots[1].view();
        send(&mut plotter, InputEvent::MouseDown {
            x: start.x,
            y: start.y,
        });
        assert_eq!(plotter.cursor(), CursorIcon::Grab);
        let far = center_of(&plotter, 1);
        let zoom = plotter.sub_plots[0].view().x_zoom;
        let offset = plotter.sub_plots[0].view().x_offset;
        send(&mut plotter, InputEvent::MouseMove {
            x: far.x,
            y: start.y,
            dx: far.x - start.x,
            dy: 0,
        });
        let moved = plotter.sub_plots[0].view().x_offset;
        assert!((moved - (offset + f64::from(far.x - start.x) / zoom)).abs() < 1e-9);
        assert_eq!(plotter.sub_plots[1].view(), right_before);
        send(&mut plotter, InputEvent::MouseUp {
            x: far.x,
            y: start.y,
        });
        assert_eq!(plotter.cursor(), CursorIcon::Arrow);
    }

    #[test]
    fn keys_go_to_the_last_hovered_sub_plot() {
        let mut plotter = plotter();
        let center = center_of(&plotter, 1);
        send(&mut plotter, InputEvent::MouseMove {
            x: center.x,
            y: center.y,
            dx: 0,
            dy: 0,
        });
        assert!(plotter.readout().is_some());
        // Leave through the top margin; the key still reaches sub plot 1.
        send(&mut plotter, InputEvent::MouseMove {
            x: center.x,
            y: -5,
            dx: 0,
            dy: 0,
        });
        assert!(plotter.readout().is_none());
        let before = plotter.sub_plots[1].view();
        send(&mut plotter, InputEvent::Key(Key::Right));
        let after = plotter.sub_plots[1].view();
        assert_eq!(after.x_offset, before.x_offset - 10.0 / before.x_zoom);
    }

    #[test]
    fn quit_events_break_the_loop() {
        let mut plotter = Plotter::new("t", "", "");
        assert_eq!(plotter.handle_event(InputEvent::Quit), ControlFlow::Break(()));
        assert_eq!(
            plotter.handle_event(InputEvent::Key(Key::Escape)),
            ControlFlow::Break(())
        );
    }

    #[test]
    fn resize_splits_the_window() {
        let mut plotter = plotter();
        send(&mut plotter, InputEvent::Resize {
            width: 1200,
            height: 700,
        });
        let (width, height) = plotter.window_size();
        assert_eq!(width, 1200);
        assert_eq!(height, 700);
    }

    #[test]
    fn frame_matches_window_size() {
        let mut plotter = plotter();
        let frame = plotter.render_frame().expect("frame");
        assert_eq!(frame.size(), plotter.window_size());
        assert_eq!(frame.pixel(0, 0), Some(Rgba::WHITE));
        assert_eq!(plotter.sub_plots[1].view(), ViewState::centered(50.0));
    }
}
