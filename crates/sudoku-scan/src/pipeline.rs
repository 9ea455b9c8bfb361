use log::debug;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use sudoku_scan_board::{BoardExtraction, BoardExtractor, BoardParams, ExtractError};
use sudoku_scan_core::GrayImageView;
use sudoku_scan_glyphs::{
    assemble_grid, pad_glyphs, read_grid, segment_glyphs, AssembleParams, GlyphClassifier,
    PadParams, SegmentParams, SortedGrid,
};

/// Every tunable of the end-to-end pipeline, one struct per stage.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanParams {
    pub board: BoardParams,
    pub segment: SegmentParams,
    pub pad: PadParams,
    pub assemble: AssembleParams,
}

/// Errors surfaced by the pipeline and the image-boundary helpers.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("invalid grayscale image buffer length (expected {expected} bytes, got {got})")]
    InvalidGrayBuffer { expected: usize, got: usize },

    #[error("invalid grayscale image dimensions (width={width}, height={height})")]
    InvalidGrayDimensions { width: u32, height: u32 },
}

/// Output of a full scan.
#[derive(Clone, Debug)]
pub struct ScanOutcome {
    /// Board-side diagnostics and rasters.
    pub board: BoardExtraction,
    /// The ordered 9x9 cell sequence.
    pub grid: SortedGrid,
    /// Glyph crops that cleared segmentation.
    pub segmented: usize,
    /// Crops the padding stage dropped.
    pub dropped: usize,
}

/// The end-to-end scanning pipeline.
///
/// A pure function of its input image (and, for [`ScanPipeline::read`], the
/// injected classifier): no hidden globals, no retained state between runs.
#[derive(Clone, Debug, Default)]
pub struct ScanPipeline {
    params: ScanParams,
    extractor: BoardExtractor,
}

impl ScanPipeline {
    pub fn new(params: ScanParams) -> Self {
        let extractor = BoardExtractor::new(params.board.clone());
        Self { params, extractor }
    }

    #[inline]
    pub fn params(&self) -> &ScanParams {
        &self.params
    }

    /// Locate the board and assemble the 81-cell sequence.
    ///
    /// Fatal conditions ("board not found", "invalid geometry") abort the
    /// whole image; soft per-item conditions are absorbed as blanks and
    /// drops.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, image), fields(width = image.width, height = image.height))
    )]
    pub fn scan(&self, image: &GrayImageView<'_>) -> Result<ScanOutcome, ScanError> {
        let board = self.extractor.extract(image)?;

        let crops = segment_glyphs(&board.glyphs.as_view(), &self.params.segment);
        let segmented = crops.len();
        let padded = pad_glyphs(crops, &self.params.pad);
        let dropped = segmented - padded.len();

        let grid = assemble_grid(&board.glyphs.as_view(), &padded, &self.params.assemble);
        debug!(
            "scan: {segmented} glyphs segmented, {dropped} dropped, {} cells occupied",
            grid.occupied()
        );
        Ok(ScanOutcome {
            board,
            grid,
            segmented,
            dropped,
        })
    }

    /// Scan and then read every cell with the injected classifier.
    ///
    /// Blank cells come back `None` without touching the classifier.
    pub fn read(
        &self,
        image: &GrayImageView<'_>,
        classifier: &dyn GlyphClassifier,
        input_dim: usize,
    ) -> Result<(ScanOutcome, Vec<Option<usize>>), ScanError> {
        let outcome = self.scan(image)?;
        let labels = read_grid(&outcome.grid, classifier, input_dim);
        Ok((outcome, labels))
    }
}
