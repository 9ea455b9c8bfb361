//! Board localisation and rectification for sudoku photographs.
//!
//! The [`BoardExtractor`] takes a grayscale raster and produces a square,
//! axis-aligned canonical board image with its printed grid lines erased,
//! ready for glyph segmentation. The underlying raster primitives
//! (filtering, morphology, contours, Hough) are exported for direct use.

pub mod contour;
pub mod corners;
pub mod filter;
pub mod gridlines;
pub mod hough;
pub mod morph;

mod detector;

pub use contour::{BoundingBox, Contour};
pub use corners::Quadrilateral;
pub use detector::{
    BoardExtraction, BoardExtractor, BoardParams, ExtractError, ExtractionSummary,
    PreprocessParams,
};
pub use gridlines::{GridLineSuppression, LineFilterParams};
pub use hough::PolarLine;
