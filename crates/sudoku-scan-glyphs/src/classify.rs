//! Classifier boundary: the trait the external glyph model implements, and
//! the per-cell read driver.
//!
//! The model is an injected dependency; nothing here loads weights or keeps
//! process-global state.

use sudoku_scan_core::{resize_lanczos, GrayImageView};

use crate::assemble::{GridCell, SortedGrid};

/// Default classifier input side length.
pub const DEFAULT_INPUT_DIM: usize = 28;

/// A fixed-size single-channel image normalized to `[0, 1]`.
#[derive(Clone, Debug)]
pub struct NormalizedGlyph {
    pub dim: usize,
    /// Row-major, `dim * dim` samples.
    pub data: Vec<f32>,
}

/// Contract of the external glyph model: one discrete class index per
/// glyph, no side effects on the pipeline.
pub trait GlyphClassifier {
    fn classify(&self, glyph: &NormalizedGlyph) -> usize;
}

/// Resize to `dim x dim` and scale into `[0, 1]`.
pub fn normalize_glyph(img: &GrayImageView<'_>, dim: usize) -> NormalizedGlyph {
    let resized = resize_lanczos(img, dim, dim);
    NormalizedGlyph {
        dim,
        data: resized.data.iter().map(|&v| v as f32 / 255.0).collect(),
    }
}

/// Read the 81 cells in raster order. Blank cells yield `None` without
/// touching the classifier; glyph cells are normalized and classified.
pub fn read_grid(
    grid: &SortedGrid,
    classifier: &dyn GlyphClassifier,
    input_dim: usize,
) -> Vec<Option<usize>> {
    grid.cells
        .iter()
        .map(|cell| match cell {
            GridCell::Blank => None,
            GridCell::Glyph(img) => {
                let glyph = normalize_glyph(&img.as_view(), input_dim);
                Some(classifier.classify(&glyph))
            }
        })
        .collect()
}
