//! Pre-rendered segment strips.
//!
//! A strip is a three-row image: an opaque center row flanked by two
//! translucent rows that soften the edges of rotated copies. Segments are
//! drawn by copying a length-matching run of columns, rotated onto the
//! segment.

use crate::render::Rgba;
use crate::style::LineStyle;

/// Rows of a strip.
pub const STRIP_HEIGHT: i32 = 3;

const FLANK_ALPHA: u8 = 96;

/// A reusable stroke image for one collection.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SegmentStrip {
    width: i32,
    period: i32,
    pixels: Vec<Rgba>,
}

impl SegmentStrip {
    /// Strip long enough for segments up to `max_length` pixels at any dash
    /// phase.
    pub fn new(color: Rgba, style: LineStyle, max_length: i32, dash: (i32, i32)) -> Self {
        let (on, off) = (dash.0.max(1), dash.1.max(0));
        let period = match style {
            LineStyle::Solid => 1,
            LineStyle::Dashed => on + off,
        };
        let width = max_length.max(1) + period + 1;
        let mut pixels = vec![Rgba::TRANSPARENT; (width * STRIP_HEIGHT) as usize];
        for u in 0..width {
            let drawn = match style {
                LineStyle::Solid => true,
                LineStyle::Dashed => u % period < on,
            };
            if !drawn {
                continue;
            }
            let u = u as usize;
            let w = width as usize;
            pixels[u] = color.with_alpha(FLANK_ALPHA);
            pixels[w + u] = color;
            pixels[2 * w + u] = color.with_alpha(FLANK_ALPHA);
        }
        Self {
            width,
            period,
            pixels,
        }
    }

    /// Solid strip.
    #[cfg(test)]
    pub fn solid(color: Rgba, max_length: i32) -> Self {
        Self::new(color, LineStyle::Solid, max_length, (1, 0))
    }

    /// Number of columns.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Dash period in columns, `1` for solid strips.
    pub fn period(&self) -> i32 {
        self.period
    }

    /// Pixel at column `u`, row `v`; transparent outside the strip.
    pub fn sample(&self, u: i32, v: i32) -> Rgba {
        if u < 0 || u >= self.width || !(0..STRIP_HEIGHT).contains(&v) {
            return Rgba::TRANSPARENT;
        }
        self.pixels[(v * self.width + u) as usize]
    }
}
