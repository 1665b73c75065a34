//! plotter draws points, curves and functions in pannable, zoomable 2D
//! plots with adaptive gridlines, and saves them as PNG images.
//!
//! Rendering happens in software on a [`Canvas`]. Interactive windows use
//! GPUI behind the `gpui` feature, or any [`FrameHost`].

#![forbid(unsafe_code)]

pub mod axis;
pub mod config;
pub mod error;
pub mod geom;
pub mod interaction;
pub mod legend;
pub mod plot;
pub mod raster;
pub mod render;
pub mod runner;
pub mod series;
pub mod style;
pub mod subplot;
pub mod text;
pub mod transform;
pub mod view;

#[cfg(feature = "gpui")]
pub mod gpui_backend;

pub use axis::{Axis, AxisBuilder, AxisSet, GridSpacing, compute_grid_step};
pub use config::{PlotContext, PlotterConfig};
pub use error::{PlotError, SeriesError};
pub use geom::{Coordinate, Point, ScreenPoint, ScreenRect};
pub use interaction::{CursorIcon, InputEvent, Key};
pub use plot::{Plotter, StackingDirection, SubPlotHandle};
pub use raster::Canvas;
pub use render::{DrawStats, Rgba};
pub use runner::FrameHost;
pub use series::{Collection, Function};
pub use style::{Color, ColorGenerator, DisplayLines, DisplayPoints, LineStyle, PointType};
pub use subplot::{Pane, SubPlot};
pub use text::FontSource;
pub use transform::Transform;
pub use view::{Range, ViewState};

#[cfg(feature = "gpui")]
pub use gpui_backend::GpuiPlotView;
