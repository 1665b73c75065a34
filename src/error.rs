//! Error types.

use std::path::PathBuf;

/// Errors raised while setting up, rendering or writing a plot.
#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    /// A font could not be parsed.
    #[error("failed to load {which} font")]
    Font {
        /// Which font slot failed.
        which: &'static str,
        /// Parser error.
        #[source]
        source: ab_glyph::InvalidFont,
    },
    /// The label font must give every character the same advance.
    #[error("label font is not monospaced ({narrow} px vs {wide} px advances)")]
    NotMonospace {
        /// Advance of a narrow glyph.
        narrow: f32,
        /// Advance of a wide glyph.
        wide: f32,
    },
    /// Encoding or writing the image failed.
    #[error("failed to write {}", path.display())]
    Encode {
        /// Destination file.
        path: PathBuf,
        /// Encoder error.
        #[source]
        source: image::ImageError,
    },
    /// The host refused a frame.
    #[error("failed to present frame: {0}")]
    Present(String),
    /// The windowing backend failed or is unavailable.
    #[error("backend error: {0}")]
    Backend(String),
    /// A sub plot index was out of range.
    #[error("no sub plot at index {index} (have {count})")]
    NoSuchSubPlot {
        /// Requested index.
        index: usize,
        /// Number of sub plots.
        count: usize,
    },
}

/// Errors raised while building a series.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeriesError {
    /// Parallel input slices had different lengths.
    #[error("{what} has {found} values, expected {expected}")]
    LengthMismatch {
        /// Name of the offending slice.
        what: &'static str,
        /// Length of the x slice.
        expected: usize,
        /// Length of the offending slice.
        found: usize,
    },
}
