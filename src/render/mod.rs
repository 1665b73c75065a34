//! Rendering primitives.
//!
//! Plot content is described as a backend-agnostic list of commands that the
//! software [`Canvas`](crate::raster::Canvas) executes. The list and its
//! commands stay inside the crate; colors and text placement are shared.

pub(crate) mod clip;
pub(crate) mod line;
pub(crate) mod marker;
pub(crate) mod strip;

use crate::geom::{ScreenPoint, ScreenRect};
use crate::style::Color;
use crate::text::FontKind;

pub use line::DrawStats;
pub(crate) use line::render_collection;
pub(crate) use strip::SegmentStrip;

/// Straight (non-premultiplied) RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    /// Create a new color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with another alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }
}

impl From<Color> for Rgba {
    fn from(color: Color) -> Self {
        Self::new(color.r, color.g, color.b, 255)
    }
}

/// Alignment of a text box relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    /// Anchor at the left or top edge.
    #[default]
    Start,
    /// Anchor at the center.
    Center,
    /// Anchor at the right or bottom edge.
    End,
}

impl Align {
    /// Offset of the box start from the anchor for a box of `extent`.
    pub fn offset(self, extent: i32) -> i32 {
        match self {
            Self::Start => 0,
            Self::Center => -extent / 2,
            Self::End => -extent,
        }
    }
}

/// Text direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Left to right.
    #[default]
    Horizontal,
    /// Bottom to top, rotated a quarter turn counter-clockwise.
    Vertical,
}

/// Where and how a text run is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextPlacement {
    /// Horizontal alignment of the (rotated) box.
    pub horizontal: Align,
    /// Vertical alignment of the (rotated) box.
    pub vertical: Align,
    /// Text direction.
    pub orientation: Orientation,
}

impl TextPlacement {
    /// Box top-left at the anchor.
    pub const TOP_LEFT: Self = Self {
        horizontal: Align::Start,
        vertical: Align::Start,
        orientation: Orientation::Horizontal,
    };
    /// Box centered on the anchor.
    pub const CENTER: Self = Self {
        horizontal: Align::Center,
        vertical: Align::Center,
        orientation: Orientation::Horizontal,
    };
    /// Box right edge at the anchor, vertically centered.
    pub const RIGHT_CENTER: Self = Self {
        horizontal: Align::End,
        vertical: Align::Center,
        orientation: Orientation::Horizontal,
    };
    /// Box centered on the anchor, reading bottom to top.
    pub const VERTICAL_CENTER: Self = Self {
        horizontal: Align::Center,
        vertical: Align::Center,
        orientation: Orientation::Vertical,
    };
}

/// One rotated copy of a segment strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct StripCopy {
    /// Index of the strip in the owning [`RenderList`].
    pub strip: usize,
    /// Destination of the strip's top-left corner.
    pub pivot: (f64, f64),
    /// Rotation in radians, clockwise on screen.
    pub angle: f64,
    /// Number of strip columns copied.
    pub length: i32,
    /// First strip column copied, keeps dashes continuous.
    pub phase: i32,
}

/// Render command list.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RenderCommand {
    /// Fill a rectangle.
    FillRect {
        /// Rectangle bounds.
        rect: ScreenRect,
        /// Fill color.
        color: Rgba,
    },
    /// Outline a rectangle with a one pixel stroke.
    StrokeRect {
        /// Rectangle bounds.
        rect: ScreenRect,
        /// Stroke color.
        color: Rgba,
    },
    /// Draw a one pixel line, both ends included.
    Line {
        /// Segment start.
        start: ScreenPoint,
        /// Segment end.
        end: ScreenPoint,
        /// Stroke color.
        color: Rgba,
    },
    /// Draw a single line of text.
    Text {
        /// Anchor point.
        position: ScreenPoint,
        /// Text content.
        text: String,
        /// Font slot.
        font: FontKind,
        /// Placement relative to the anchor.
        placement: TextPlacement,
        /// Text color.
        color: Rgba,
    },
    /// Copy part of a segment strip, rotated.
    Strip(StripCopy),
}

/// Aggregated render commands and the strips they reference.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct RenderList {
    commands: Vec<RenderCommand>,
    strips: Vec<SegmentStrip>,
}

impl RenderList {
    /// Create an empty render list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a render command.
    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    /// Register a strip and return its index for [`StripCopy::strip`].
    pub fn add_strip(&mut self, strip: SegmentStrip) -> usize {
        self.strips.push(strip);
        self.strips.len() - 1
    }

    /// Access all render commands.
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Access a registered strip.
    pub fn strip(&self, index: usize) -> Option<&SegmentStrip> {
        self.strips.get(index)
    }

    /// Number of registered strips.
    #[cfg(test)]
    pub fn strip_count(&self) -> usize {
        self.strips.len()
    }

    /// Fill a rectangle.
    pub fn fill_rect(&mut self, rect: ScreenRect, color: impl Into<Rgba>) {
        self.push(RenderCommand::FillRect {
            rect,
            color: color.into(),
        });
    }

    /// Draw a one pixel line.
    pub fn line(&mut self, start: ScreenPoint, end: ScreenPoint, color: impl Into<Rgba>) {
        self.push(RenderCommand::Line {
            start,
            end,
            color: color.into(),
        });
    }

    /// Draw black text.
    pub fn text(
        &mut self,
        position: ScreenPoint,
        text: impl Into<String>,
        font: FontKind,
        placement: TextPlacement,
    ) {
        self.push(RenderCommand::Text {
            position,
            text: text.into(),
            font,
            placement,
            color: Rgba::BLACK,
        });
    }

    /// Count commands matching a predicate.
    #[cfg(test)]
    pub fn count(&self, predicate: impl Fn(&RenderCommand) -> bool) -> usize {
        self.commands.iter().filter(|command| predicate(command)).count()
    }
}
