//! Plotted data: point collections and sampled functions.

use std::fmt;

use crate::error::SeriesError;
use crate::geom::Coordinate;
use crate::style::{Color, DisplayLines, DisplayPoints, LineStyle, PointType};
use crate::view::{Bounds, Range};

/// An ordered set of points, connected in order when lines are displayed.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    points: Vec<Coordinate>,
    name: String,
    color: Color,
    display_points: DisplayPoints,
    display_lines: DisplayLines,
    point_type: PointType,
    line_style: LineStyle,
}

impl Collection {
    /// Create a collection from points.
    pub fn new<I, P>(points: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Coordinate>,
    {
        Self {
            points: points.into_iter().map(Into::into).collect(),
            name: String::new(),
            color: Color::UNDEFINED,
            display_points: DisplayPoints::YES,
            display_lines: DisplayLines::NO,
            point_type: PointType::default(),
            line_style: LineStyle::default(),
        }
    }

    /// Create a collection from parallel x and y slices.
    pub fn from_xy(xs: &[f64], ys: &[f64]) -> Result<Self, SeriesError> {
        check_len("ys", xs.len(), ys.len())?;
        Ok(Self::new(xs.iter().zip(ys).map(|(&x, &y)| Coordinate::new(x, y))))
    }

    /// Create a collection with error bars from parallel slices.
    pub fn with_errors(
        xs: &[f64],
        ys: &[f64],
        x_errors: &[f64],
        y_errors: &[f64],
    ) -> Result<Self, SeriesError> {
        check_len("ys", xs.len(), ys.len())?;
        check_len("x_errors", xs.len(), x_errors.len())?;
        check_len("y_errors", xs.len(), y_errors.len())?;
        let points = (0..xs.len())
            .map(|i| Coordinate::with_errors(xs[i], ys[i], x_errors[i], y_errors[i]));
        Ok(Self::new(points))
    }

    /// Set the legend label.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set an explicit color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Toggle point markers.
    pub fn with_display_points(mut self, display: DisplayPoints) -> Self {
        self.display_points = display;
        self
    }

    /// Toggle connecting segments.
    pub fn with_display_lines(mut self, display: DisplayLines) -> Self {
        self.display_lines = display;
        self
    }

    /// Set the marker shape.
    pub fn with_point_type(mut self, point_type: PointType) -> Self {
        self.point_type = point_type;
        self
    }

    /// Set the stroke pattern.
    pub fn with_line_style(mut self, line_style: LineStyle) -> Self {
        self.line_style = line_style;
        self
    }

    /// Append a point.
    pub fn push(&mut self, point: impl Into<Coordinate>) {
        self.points.push(point.into());
    }

    /// Access the points.
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// Access the legend label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Access the color.
    pub fn color(&self) -> Color {
        self.color
    }

    pub(crate) fn assign_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Whether markers are drawn.
    pub fn display_points(&self) -> DisplayPoints {
        self.display_points
    }

    /// Whether segments are drawn.
    pub fn display_lines(&self) -> DisplayLines {
        self.display_lines
    }

    /// Access the marker shape.
    pub fn point_type(&self) -> PointType {
        self.point_type
    }

    /// Access the stroke pattern.
    pub fn line_style(&self) -> LineStyle {
        self.line_style
    }

    /// Bounds of the finite points.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::of(&self.points)
    }
}

fn check_len(what: &'static str, expected: usize, found: usize) -> Result<(), SeriesError> {
    if expected == found {
        Ok(())
    } else {
        Err(SeriesError::LengthMismatch {
            what,
            expected,
            found,
        })
    }
}

/// A function of x drawn across the visible range.
pub struct Function {
    function: Box<dyn Fn(f64) -> f64>,
    name: String,
    color: Color,
    line_style: LineStyle,
}

impl Function {
    /// Wrap a function.
    pub fn new(function: impl Fn(f64) -> f64 + 'static) -> Self {
        Self {
            function: Box::new(function),
            name: String::new(),
            color: Color::UNDEFINED,
            line_style: LineStyle::default(),
        }
    }

    /// Set the legend label.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set an explicit color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set the stroke pattern.
    pub fn with_line_style(mut self, line_style: LineStyle) -> Self {
        self.line_style = line_style;
        self
    }

    /// Evaluate the function.
    pub fn eval(&self, x: f64) -> f64 {
        (self.function)(x)
    }

    /// Access the legend label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Access the color.
    pub fn color(&self) -> Color {
        self.color
    }

    pub(crate) fn assign_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Access the stroke pattern.
    pub fn line_style(&self) -> LineStyle {
        self.line_style
    }

    /// Sample `count` points spread evenly over `domain`, ends included.
    pub fn sample(&self, domain: Range, count: usize) -> Collection {
        let mut collection = Collection::new(std::iter::empty::<Coordinate>())
            .with_name(self.name.clone())
            .with_color(self.color)
            .with_display_points(DisplayPoints::NO)
            .with_display_lines(DisplayLines::YES)
            .with_line_style(self.line_style);
        collection.points.reserve(count);
        match count {
            0 => {}
            1 => collection.push((domain.min, self.eval(domain.min))),
            _ => {
                let step = domain.span() / (count - 1) as f64;
                for i in 0..count {
                    let x = if i + 1 == count {
                        domain.max
                    } else {
                        domain.min + step * i as f64
                    };
                    collection.push((x, self.eval(x)));
                }
            }
        }
        collection
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("color", &self.color)
            .field("line_style", &self.line_style)
            .finish_non_exhaustive()
    }
}

/// Identifies one sampling of a function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleKey {
    /// Lower end of the sampled domain.
    pub min: f64,
    /// Upper end of the sampled domain.
    pub max: f64,
    /// Number of samples.
    pub count: usize,
}

impl SampleKey {
    /// Key for sampling `domain` with `count` points.
    pub fn new(domain: Range, count: usize) -> Self {
        Self {
            min: domain.min,
            max: domain.max,
            count,
        }
    }

    fn domain(&self) -> Range {
        Range::new(self.min, self.max)
    }
}

/// A function with its most recent sampling.
///
/// The sampled collection is rebuilt only when the requested key differs
/// from the cached one.
#[derive(Debug)]
pub struct SampledFunction {
    function: Function,
    key: Option<SampleKey>,
    samples: Collection,
    evaluations: u64,
}

impl SampledFunction {
    /// Wrap a function with an empty cache.
    pub fn new(function: Function) -> Self {
        Self {
            function,
            key: None,
            samples: Collection::new(std::iter::empty::<Coordinate>()),
            evaluations: 0,
        }
    }

    /// Access the function.
    pub fn function(&self) -> &Function {
        &self.function
    }

    /// Samples for `key`, recomputed only when the key changed.
    pub fn samples(&mut self, key: SampleKey) -> &Collection {
        if self.key != Some(key) {
            self.evaluations += 1;
            self.samples = self.function.sample(key.domain(), key.count);
            self.key = Some(key);
        }
        &self.samples
    }

    /// How many times the function was resampled.
    pub fn resample_count(&self) -> u64 {
        self.evaluations
    }
}
