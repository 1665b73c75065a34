//! Font loading, text measurement and glyph coverage.

use std::borrow::Cow;

use ab_glyph::{Font, FontArc, PxScale, ScaleFont, point};

use crate::error::PlotError;

/// Which of the two plot fonts a piece of text uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontKind {
    /// Proportional font for plot titles.
    Title,
    /// Monospaced font for tick labels, axis titles and the legend.
    Label,
}

/// Raw font files, parsed when a plot is rendered.
#[derive(Debug, Clone)]
pub struct FontSource {
    /// Title font bytes (TTF/OTF).
    pub title: Cow<'static, [u8]>,
    /// Label font bytes (TTF/OTF). Must be monospaced.
    pub label: Cow<'static, [u8]>,
}

impl FontSource {
    /// Use custom font files.
    pub fn new(title: impl Into<Cow<'static, [u8]>>, label: impl Into<Cow<'static, [u8]>>) -> Self {
        Self {
            title: title.into(),
            label: label.into(),
        }
    }
}

impl Default for FontSource {
    fn default() -> Self {
        Self::new(
            epaint_default_fonts::UBUNTU_LIGHT,
            epaint_default_fonts::HACK_REGULAR,
        )
    }
}

/// Pixel metrics of the label font, all that layout needs to know about text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextMetrics {
    /// Advance of one label character.
    pub label_advance: i32,
    /// Line height of the label font.
    pub label_height: i32,
    /// Line height of the title font.
    pub title_height: i32,
}

impl TextMetrics {
    /// Width of `text` in the label font.
    pub fn label_width(&self, text: &str) -> i32 {
        let chars = i32::try_from(text.chars().count()).unwrap_or(i32::MAX);
        chars.saturating_mul(self.label_advance)
    }
}

/// Loaded title and label fonts at their plot sizes.
#[derive(Debug, Clone)]
pub struct Fonts {
    title: FontArc,
    label: FontArc,
    title_scale: PxScale,
    label_scale: PxScale,
}

impl Fonts {
    /// Parse both fonts and check that the label font is monospaced.
    pub fn load(source: &FontSource, title_size: f32, label_size: f32) -> Result<Self, PlotError> {
        let title = parse(&source.title).map_err(|source| PlotError::Font {
            which: "title",
            source,
        })?;
        let label = parse(&source.label).map_err(|source| PlotError::Font {
            which: "label",
            source,
        })?;
        let fonts = Self {
            title,
            label,
            title_scale: PxScale::from(title_size),
            label_scale: PxScale::from(label_size),
        };
        let scaled = fonts.label.as_scaled(fonts.label_scale);
        let narrow = scaled.h_advance(fonts.label.glyph_id('i'));
        let wide = scaled.h_advance(fonts.label.glyph_id('W'));
        if (narrow - wide).abs() > 0.5 {
            return Err(PlotError::NotMonospace { narrow, wide });
        }
        log::debug!(
            "loaded fonts: title {title_size}px, label {label_size}px ({narrow:.1}px advance)"
        );
        Ok(fonts)
    }

    /// Layout metrics of the loaded fonts.
    pub fn metrics(&self) -> TextMetrics {
        let label = self.label.as_scaled(self.label_scale);
        TextMetrics {
            label_advance: label.h_advance(self.label.glyph_id('0')).round() as i32,
            label_height: self.line_height(FontKind::Label),
            title_height: self.line_height(FontKind::Title),
        }
    }

    fn font(&self, kind: FontKind) -> (&FontArc, PxScale) {
        match kind {
            FontKind::Title => (&self.title, self.title_scale),
            FontKind::Label => (&self.label, self.label_scale),
        }
    }

    /// Line height in pixels.
    pub fn line_height(&self, kind: FontKind) -> i32 {
        let (font, scale) = self.font(kind);
        font.as_scaled(scale).height().ceil() as i32
    }

    /// Width of a single line of text in pixels.
    pub fn text_width(&self, kind: FontKind, text: &str) -> i32 {
        let (font, scale) = self.font(kind);
        let scaled = font.as_scaled(scale);
        let mut width = 0.0;
        let mut previous = None;
        for c in text.chars() {
            let id = font.glyph_id(c);
            if let Some(previous) = previous {
                width += scaled.kern(previous, id);
            }
            width += scaled.h_advance(id);
            previous = Some(id);
        }
        width.ceil() as i32
    }

    /// Rasterize a single line of text.
    ///
    /// `put` receives pixel positions relative to the top-left corner of the
    /// text box and a coverage in `0.0..=1.0`.
    pub fn rasterize(&self, kind: FontKind, text: &str, mut put: impl FnMut(i32, i32, f32)) {
        let (font, scale) = self.font(kind);
        let scaled = font.as_scaled(scale);
        let baseline = scaled.ascent();
        let mut caret = 0.0;
        let mut previous = None;
        for c in text.chars() {
            let id = font.glyph_id(c);
            if let Some(previous) = previous {
                caret += scaled.kern(previous, id);
            }
            let glyph = id.with_scale_and_position(scale, point(caret, baseline));
            caret += scaled.h_advance(id);
            previous = Some(id);
            let Some(outline) = font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outline.px_bounds();
            let (left, top) = (bounds.min.x as i32, bounds.min.y as i32);
            outline.draw(|x, y, coverage| {
                put(left + x as i32, top + y as i32, coverage);
            });
        }
    }
}

fn parse(bytes: &Cow<'static, [u8]>) -> Result<FontArc, ab_glyph::InvalidFont> {
    match bytes {
        Cow::Borrowed(bytes) => FontArc::try_from_slice(*bytes),
        Cow::Owned(bytes) => FontArc::try_from_vec(bytes.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fonts() -> Fonts {
        Fonts::load(&FontSource::default(), 24.0, 15.0).expect("bundled fonts load")
    }

    #[test]
    fn bundled_label_font_is_monospaced() {
        let fonts = fonts();
        let metrics = fonts.metrics();
        assert!(metrics.label_advance > 0);
        assert_eq!(
            fonts.text_width(FontKind::Label, "iiii"),
            fonts.text_width(FontKind::Label, "WWWW")
        );
        assert!(metrics.title_height > metrics.label_height);
    }

    #[test]
    fn proportional_label_font_is_rejected() {
        let source = FontSource::new(
            epaint_default_fonts::UBUNTU_LIGHT,
            epaint_default_fonts::UBUNTU_LIGHT,
        );
        assert!(matches!(
            Fonts::load(&source, 24.0, 15.0),
            Err(PlotError::NotMonospace { .. })
        ));
    }

    #[test]
    fn garbage_font_is_a_setup_error() {
        let source = FontSource::new(vec![0_u8; 16], epaint_default_fonts::HACK_REGULAR);
        assert!(matches!(
            Fonts::load(&source, 24.0, 15.0),
            Err(PlotError::Font { which: "title", .. })
        ));
    }

    #[test]
    fn rasterized_text_stays_in_its_box() {
        let fonts = fonts();
        let width = fonts.text_width(FontKind::Label, "1.5e+03");
        let height = fonts.line_height(FontKind::Label);
        let mut inked = 0;
        fonts.rasterize(FontKind::Label, "1.5e+03", |x, y, coverage| {
            assert!(x >= -1 && x <= width + 1, "x {x} outside 0..{width}");
            assert!(y >= -1 && y <= height + 1, "y {y} outside 0..{height}");
            if coverage > 0.5 {
                inked += 1;
            }
        });
        assert!(inked > 0);
    }
}
