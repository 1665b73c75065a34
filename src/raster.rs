//! Software raster surface that executes render lists.

use std::path::Path;

use image::{ImageFormat, RgbaImage};

use crate::error::PlotError;
use crate::geom::{ScreenPoint, ScreenRect};
use crate::render::strip::STRIP_HEIGHT;
use crate::render::{Orientation, RenderCommand, RenderList, Rgba, StripCopy, TextPlacement};
use crate::text::{FontKind, Fonts};

/// An RGBA8 pixel buffer with straight alpha.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    width: i32,
    height: i32,
    pixels: Vec<Rgba>,
}

impl Canvas {
    /// Transparent canvas.
    pub fn new(width: i32, height: i32) -> Self {
        Self::filled(width, height, Rgba::TRANSPARENT)
    }

    /// Canvas filled with one color.
    pub fn filled(width: i32, height: i32, color: Rgba) -> Self {
        let (width, height) = (width.max(0), height.max(0));
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Size in pixels.
    pub fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    /// Overwrite every pixel.
    pub fn clear(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Pixel at `(x, y)`.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba> {
        self.index(x, y).map(|index| self.pixels[index])
    }

    /// Composite `color` over the pixel at `(x, y)`.
    pub fn blend(&mut self, x: i32, y: i32, color: Rgba) {
        if let Some(index) = self.index(x, y) {
            self.pixels[index] = over(color, self.pixels[index]);
        }
    }

    /// Fill a rectangle, clipped to the canvas.
    pub fn fill_rect(&mut self, rect: ScreenRect, color: Rgba) {
        let bounds = rect.intersect(&ScreenRect::from_origin_size(0, 0, self.width, self.height));
        if !bounds.is_valid() {
            return;
        }
        for y in bounds.min.y..bounds.max.y {
            for x in bounds.min.x..bounds.max.x {
                self.blend(x, y, color);
            }
        }
    }

    /// Outline a rectangle; the stroke covers the first and last row and
    /// column inside it.
    pub fn stroke_rect(&mut self, rect: ScreenRect, color: Rgba) {
        if !rect.is_valid() {
            return;
        }
        let (left, top) = (rect.min.x, rect.min.y);
        let (right, bottom) = (rect.max.x - 1, rect.max.y - 1);
        self.line(ScreenPoint::new(left, top), ScreenPoint::new(right, top), color);
        self.line(ScreenPoint::new(left, bottom), ScreenPoint::new(right, bottom), color);
        if bottom - top > 1 {
            self.line(ScreenPoint::new(left, top + 1), ScreenPoint::new(left, bottom - 1), color);
            self.line(ScreenPoint::new(right, top + 1), ScreenPoint::new(right, bottom - 1), color);
        }
    }

    /// Bresenham line, both ends included.
    pub fn line(&mut self, start: ScreenPoint, end: ScreenPoint, color: Rgba) {
        let (mut x, mut y) = (i64::from(start.x), i64::from(start.y));
        let (x1, y1) = (i64::from(end.x), i64::from(end.y));
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut error = dx + dy;
        loop {
            if let (Ok(px), Ok(py)) = (i32::try_from(x), i32::try_from(y)) {
                self.blend(px, py, color);
            }
            if x == x1 && y == y1 {
                break;
            }
            let doubled = 2 * error;
            if doubled >= dy {
                error += dy;
                x += sx;
            }
            if doubled <= dx {
                error += dx;
                y += sy;
            }
        }
    }

    /// Composite another canvas with its top-left corner at `at`.
    pub fn blit(&mut self, source: &Canvas, at: ScreenPoint) {
        for y in 0..source.height {
            for x in 0..source.width {
                let color = source.pixels[y as usize * source.width as usize + x as usize];
                if color.a != 0 {
                    self.blend(at.x + x, at.y + y, color);
                }
            }
        }
    }

    /// Draw a rotated run of strip columns.
    pub(crate) fn copy_strip(&mut self, list: &RenderList, copy: &StripCopy, offset: (i32, i32)) {
        let Some(strip) = list.strip(copy.strip) else {
            log::warn!("strip {} is not registered", copy.strip);
            return;
        };
        let (sin, cos) = copy.angle.sin_cos();
        let pivot = (
            copy.pivot.0 + f64::from(offset.0),
            copy.pivot.1 + f64::from(offset.1),
        );
        let length = f64::from(copy.length);
        let thickness = f64::from(STRIP_HEIGHT);
        let corners = [
            pivot,
            (pivot.0 + length * cos, pivot.1 + length * sin),
            (pivot.0 - thickness * sin, pivot.1 + thickness * cos),
            (
                pivot.0 + length * cos - thickness * sin,
                pivot.1 + length * sin + thickness * cos,
            ),
        ];
        let min_x = corners.iter().map(|c| c.0).fold(f64::INFINITY, f64::min);
        let max_x = corners.iter().map(|c| c.0).fold(f64::NEG_INFINITY, f64::max);
        let min_y = corners.iter().map(|c| c.1).fold(f64::INFINITY, f64::min);
        let max_y = corners.iter().map(|c| c.1).fold(f64::NEG_INFINITY, f64::max);
        let x0 = (min_x.floor().max(0.0)) as i32;
        let y0 = (min_y.floor().max(0.0)) as i32;
        let x1 = (max_x.ceil().min(f64::from(self.width))) as i32;
        let y1 = (max_y.ceil().min(f64::from(self.height))) as i32;
        for y in y0..y1 {
            for x in x0..x1 {
                let dx = f64::from(x) + 0.5 - pivot.0;
                let dy = f64::from(y) + 0.5 - pivot.1;
                let u = dx * cos + dy * sin;
                let v = -dx * sin + dy * cos;
                if u < 0.0 || u >= length || v < 0.0 || v >= thickness {
                    continue;
                }
                let color = strip.sample(u as i32 + copy.phase, v as i32);
                if color.a != 0 {
                    self.blend(x, y, color);
                }
            }
        }
    }

    /// Draw one line of text.
    pub fn text(
        &mut self,
        fonts: &Fonts,
        kind: FontKind,
        text: &str,
        position: ScreenPoint,
        placement: TextPlacement,
        color: Rgba,
    ) {
        if text.is_empty() {
            return;
        }
        let width = fonts.text_width(kind, text);
        let height = fonts.line_height(kind);
        let put = |canvas: &mut Self, x: i32, y: i32, coverage: f32| {
            let alpha = (coverage.clamp(0.0, 1.0) * f32::from(color.a)).round() as u8;
            if alpha != 0 {
                canvas.blend(x, y, color.with_alpha(alpha));
            }
        };
        match placement.orientation {
            Orientation::Horizontal => {
                let left = position.x + placement.horizontal.offset(width);
                let top = position.y + placement.vertical.offset(height);
                fonts.rasterize(kind, text, |x, y, coverage| {
                    put(self, left + x, top + y, coverage);
                });
            }
            Orientation::Vertical => {
                let left = position.x + placement.horizontal.offset(height);
                let top = position.y + placement.vertical.offset(width);
                fonts.rasterize(kind, text, |x, y, coverage| {
                    put(self, left + y, top + width - 1 - x, coverage);
                });
            }
        }
    }

    /// Execute a render list, translating every command by `offset`.
    pub(crate) fn paint(&mut self, list: &RenderList, fonts: &Fonts, offset: (i32, i32)) {
        let (dx, dy) = offset;
        for command in list.commands() {
            match command {
                RenderCommand::FillRect { rect, color } => {
                    self.fill_rect(rect.translated(dx, dy), *color);
                }
                RenderCommand::StrokeRect { rect, color } => {
                    self.stroke_rect(rect.translated(dx, dy), *color);
                }
                RenderCommand::Line { start, end, color } => {
                    self.line(start.offset(dx, dy), end.offset(dx, dy), *color);
                }
                RenderCommand::Text {
                    position,
                    text,
                    font,
                    placement,
                    color,
                } => {
                    self.text(fonts, *font, text, position.offset(dx, dy), *placement, *color);
                }
                RenderCommand::Strip(copy) => self.copy_strip(list, copy, offset),
            }
        }
    }

    /// Pixels as RGBA bytes.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|pixel| [pixel.r, pixel.g, pixel.b, pixel.a])
            .collect()
    }

    /// Pixels as BGRA bytes, the order most window systems present.
    pub fn to_bgra(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|pixel| [pixel.b, pixel.g, pixel.r, pixel.a])
            .collect()
    }

    /// Convert into an [`RgbaImage`].
    pub fn to_image(&self) -> Option<RgbaImage> {
        RgbaImage::from_raw(self.width as u32, self.height as u32, self.to_rgba())
    }

    /// Encode as PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), PlotError> {
        let path = path.as_ref();
        let encode_error = |source| PlotError::Encode {
            path: path.to_path_buf(),
            source,
        };
        let image = self.to_image().ok_or_else(|| {
            encode_error(image::ImageError::Parameter(
                image::error::ParameterError::from_kind(
                    image::error::ParameterErrorKind::DimensionMismatch,
                ),
            ))
        })?;
        image
            .save_with_format(path, ImageFormat::Png)
            .map_err(encode_error)
    }
}

/// Source-over compositing of straight-alpha colors.
fn over(source: Rgba, destination: Rgba) -> Rgba {
    match source.a {
        255 => return source,
        0 => return destination,
        _ => {}
    }
    let sa = u32::from(source.a);
    let weight_source = sa * 255;
    let weight_destination = u32::from(destination.a) * (255 - sa);
    let total = weight_source + weight_destination;
    let mix = |s: u8, d: u8| -> u8 {
        ((u32::from(s) * weight_source + u32::from(d) * weight_destination + total / 2) / total)
            as u8
    };
    Rgba::new(
        mix(source.r, destination.r),
        mix(source.g, destination.g),
        mix(source.b, destination.b),
        ((total + 127) / 255) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::SegmentStrip;

    #[test]
    fn over_blends_straight_alpha() {
        assert_eq!(over(Rgba::BLACK, Rgba::WHITE), Rgba::BLACK);
        assert_eq!(over(Rgba::TRANSPARENT, Rgba::WHITE), Rgba::WHITE);
        // Translucent over transparent keeps its own color.
        let half = Rgba::new(200, 100, 50, 128);
        assert_eq!(over(half, Rgba::TRANSPARENT), half);
        let mixed = over(Rgba::new(0, 0, 0, 128), Rgba::WHITE);
        assert_eq!(mixed.a, 255);
        assert!((126..=128).contains(&mixed.r));
    }

    #[test]
    fn fill_rect_is_clipped() {
        let mut canvas = Canvas::new(4, 4);
        canvas.fill_rect(ScreenRect::from_origin_size(-2, -2, 4, 4), Rgba::BLACK);
        assert_eq!(canvas.pixel(0, 0), Some(Rgba::BLACK));
        assert_eq!(canvas.pixel(1, 1), Some(Rgba::BLACK));
        assert_eq!(canvas.pixel(2, 2), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn line_covers_both_ends() {
        let mut canvas = Canvas::new(10, 10);
        canvas.line(ScreenPoint::new(1, 1), ScreenPoint::new(8, 4), Rgba::BLACK);
        assert_eq!(canvas.pixel(1, 1), Some(Rgba::BLACK));
        assert_eq!(canvas.pixel(8, 4), Some(Rgba::BLACK));
        let inked = canvas.pixels.iter().filter(|p| p.a == 255).count();
        assert_eq!(inked, 8);
    }

    #[test]
    fn horizontal_strip_copy_covers_three_rows() {
        let mut list = RenderList::new();
        let strip = list.add_strip(SegmentStrip::solid(Rgba::BLACK, 20));
        let copy = StripCopy {
            strip,
            pivot: (2.0, 4.0),
            angle: 0.0,
            length: 10,
            phase: 0,
        };
        let mut canvas = Canvas::new(20, 10);
        canvas.copy_strip(&list, &copy, (0, 0));
        assert_eq!(canvas.pixel(2, 5), Some(Rgba::BLACK));
        assert_eq!(canvas.pixel(11, 5), Some(Rgba::BLACK));
        assert_eq!(canvas.pixel(12, 5), Some(Rgba::TRANSPARENT));
        assert_eq!(canvas.pixel(5, 4).map(|p| p.a), Some(96));
        assert_eq!(canvas.pixel(5, 6).map(|p| p.a), Some(96));
        assert_eq!(canvas.pixel(5, 7), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn vertical_strip_copy_follows_rotation() {
        let mut list = RenderList::new();
        let strip = list.add_strip(SegmentStrip::solid(Rgba::BLACK, 20));
        // Quarter turn: columns run down the screen, rows run right to left.
        let copy = StripCopy {
            strip,
            pivot: (7.0, 1.0),
            angle: std::f64::consts::FRAC_PI_2,
            length: 5,
            phase: 0,
        };
        let mut canvas = Canvas::new(10, 10);
        canvas.copy_strip(&list, &copy, (0, 0));
        assert_eq!(canvas.pixel(5, 1), Some(Rgba::BLACK));
        assert_eq!(canvas.pixel(5, 5), Some(Rgba::BLACK));
        assert_eq!(canvas.pixel(5, 6), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn bgra_swaps_red_and_blue() {
        let canvas = Canvas::filled(1, 1, Rgba::new(1, 2, 3, 4));
        assert_eq!(canvas.to_bgra(), vec![3, 2, 1, 4]);
        assert_eq!(canvas.to_rgba(), vec![1, 2, 3, 4]);
    }
}
