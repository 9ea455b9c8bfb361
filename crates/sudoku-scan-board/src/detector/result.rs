use serde::{Deserialize, Serialize};

use sudoku_scan_core::GrayImage;

use crate::corners::Quadrilateral;

/// Output of a board extraction run.
#[derive(Clone, Debug)]
pub struct BoardExtraction {
    /// Labeled corners of the dominant quadrilateral, in capped-image
    /// coordinates.
    pub corners: Quadrilateral,
    /// Canonical side length; always a positive multiple of 9.
    pub side: usize,
    /// The perspective-corrected binary board.
    pub canonical: GrayImage,
    /// The canonical board with printed grid lines erased.
    pub glyphs: GrayImage,
    /// Number of Hough lines the suppression mask used (0 = all-pass).
    pub line_count: usize,
}

/// Machine-readable digest of an extraction, without the image payloads.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExtractionSummary {
    pub corners: Quadrilateral,
    pub side: usize,
    pub line_count: usize,
}

impl BoardExtraction {
    pub fn summary(&self) -> ExtractionSummary {
        ExtractionSummary {
            corners: self.corners,
            side: self.side,
            line_count: self.line_count,
        }
    }
}
