//! Series styling: colors, palette assignment, marker and stroke choices.

/// Opaque RGB color of a series.
///
/// A color is either definite or the [`Color::UNDEFINED`] sentinel, which
/// asks the plotter to assign the next palette color when the series is added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Whether the color was chosen.
    pub definite: bool,
}

impl Color {
    /// Sentinel for "pick a color for me".
    pub const UNDEFINED: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        definite: false,
    };
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Create a definite color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r,
            g,
            b,
            definite: true,
        }
    }

    /// A gray level.
    pub const fn gray(level: u8) -> Self {
        Self::rgb(level, level, level)
    }

    /// Whether this color was chosen rather than left undefined.
    pub fn is_definite(&self) -> bool {
        self.definite
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::UNDEFINED
    }
}

const PALETTE: [Color; 10] = [
    Color::rgb(0, 72, 186),
    Color::rgb(219, 45, 67),
    Color::rgb(123, 182, 97),
    Color::rgb(230, 103, 206),
    Color::rgb(150, 75, 0),
    Color::rgb(204, 85, 0),
    Color::rgb(189, 51, 164),
    Color::rgb(75, 54, 33),
    Color::rgb(255, 239, 0),
    Color::rgb(209, 190, 168),
];

/// Hands out palette colors in order, wrapping around.
///
/// One generator is owned by each plotter; the cursor never resets.
#[derive(Debug, Clone, Default)]
pub struct ColorGenerator {
    cursor: usize,
}

impl ColorGenerator {
    /// Create a generator at the start of the palette.
    pub fn new() -> Self {
        Self::default()
    }

    /// Next palette color.
    pub fn next_color(&mut self) -> Color {
        let color = PALETTE[self.cursor % PALETTE.len()];
        self.cursor = (self.cursor + 1) % PALETTE.len();
        color
    }

    /// Keep a definite color, or replace the sentinel with the next palette
    /// color.
    pub fn resolve(&mut self, color: Color) -> Color {
        if color.definite {
            color
        } else {
            self.next_color()
        }
    }
}

/// Marker drawn at each point of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointType {
    /// Filled square.
    #[default]
    Square,
    /// Filled circle.
    Circle,
    /// Diagonal cross.
    Cross,
}

/// Stroke pattern of connecting segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    /// Continuous stroke.
    #[default]
    Solid,
    /// Alternating drawn and skipped runs.
    Dashed,
}

/// Whether a collection draws its point markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayPoints(pub bool);

impl DisplayPoints {
    /// Draw markers.
    pub const YES: Self = Self(true);
    /// Skip markers.
    pub const NO: Self = Self(false);
}

impl Default for DisplayPoints {
    fn default() -> Self {
        Self::YES
    }
}

/// Whether a collection connects consecutive points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayLines(pub bool);

impl DisplayLines {
    /// Draw connecting segments.
    pub const YES: Self = Self(true);
    /// Skip connecting segments.
    pub const NO: Self = Self(false);
}

impl Default for DisplayLines {
    fn default() -> Self {
        Self::NO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_wraps_around_palette() {
        let mut generator = ColorGenerator::new();
        let first: Vec<Color> = (0..10).map(|_| generator.next_color()).collect();
        assert_eq!(first[0], Color::rgb(0, 72, 186));
        assert_eq!(first[9], Color::rgb(209, 190, 168));
        assert_eq!(generator.next_color(), first[0]);
        assert!(first.iter().all(Color::is_definite));
    }

    #[test]
    fn resolve_keeps_definite_colors() {
        let mut generator = ColorGenerator::new();
        let chosen = Color::rgb(1, 2, 3);
        assert_eq!(generator.resolve(chosen), chosen);
        // The cursor did not move.
        assert_eq!(generator.resolve(Color::UNDEFINED), Color::rgb(0, 72, 186));
        assert_eq!(generator.resolve(Color::UNDEFINED), Color::rgb(219, 45, 67));
    }
}
