//! Glyph-side pipeline stages for scanned sudoku boards: segmentation,
//! aspect padding, normalized cross-correlation matching, 9x9 cell
//! assembly, and the classifier read driver.

pub mod assemble;
pub mod classify;
pub mod pad;
pub mod segment;
pub mod zncc;

pub use assemble::{assemble_grid, subdivide, AssembleParams, GridCell, SortedGrid, CELL_COUNT, GRID_DIM};
pub use classify::{normalize_glyph, read_grid, GlyphClassifier, NormalizedGlyph, DEFAULT_INPUT_DIM};
pub use pad::{pad_glyph, pad_glyphs, PadParams, PadRejection, PaddedGlyph};
pub use segment::{segment_glyphs, GlyphCrop, SegmentParams};
pub use zncc::{matches_anywhere, max_zncc, zncc_at};
