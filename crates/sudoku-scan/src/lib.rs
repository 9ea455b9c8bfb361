//! High-level facade crate for the `sudoku-scan-*` workspace.
//!
//! This crate provides:
//! - stable re-exports of the board and glyph pipeline crates
//! - the end-to-end [`ScanPipeline`]
//! - (feature-gated) helpers that decode from `image::GrayImage` or raw
//!   buffers, plus a small CLI binary.
//!
//! ## Quickstart
//!
//! ```no_run
//! use sudoku_scan::{detect, ScanParams};
//! use image::ImageReader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = ImageReader::open("board.jpg")?.decode()?.to_luma8();
//! let outcome = detect::scan_gray_image(&img, ScanParams::default())?;
//! println!(
//!     "side {}, {} occupied cells",
//!     outcome.board.side,
//!     outcome.grid.occupied()
//! );
//! # Ok(())
//! # }
//! ```
//!
//! Reading the cells through a classifier is the same pipeline plus an
//! injected [`glyphs::GlyphClassifier`]:
//!
//! ```no_run
//! # use sudoku_scan::{ScanParams, ScanPipeline};
//! # use sudoku_scan::glyphs::{GlyphClassifier, NormalizedGlyph, DEFAULT_INPUT_DIM};
//! # struct Model;
//! # impl GlyphClassifier for Model {
//! #     fn classify(&self, _: &NormalizedGlyph) -> usize { 0 }
//! # }
//! # fn run(image: sudoku_scan::core::GrayImageView<'_>) -> Result<(), sudoku_scan::ScanError> {
//! let pipeline = ScanPipeline::new(ScanParams::default());
//! let (outcome, labels) = pipeline.read(&image, &Model, DEFAULT_INPUT_DIM)?;
//! # let _ = (outcome, labels); Ok(())
//! # }
//! ```
//!
//! ## API map
//! - [`core`](sudoku_scan_core): grayscale buffers, Lanczos resampling,
//!   homographies and warping.
//! - [`board`](sudoku_scan_board): binarization, contour corners,
//!   rectification, grid line suppression.
//! - [`glyphs`](sudoku_scan_glyphs): segmentation, padding, template
//!   matching, 9x9 assembly, the classifier trait.
//! - [`detect`] (feature `image`): end-to-end helpers from
//!   `image::GrayImage`.

pub use sudoku_scan_board as board;
pub use sudoku_scan_core as core;
pub use sudoku_scan_glyphs as glyphs;

pub use sudoku_scan_board::{BoardParams, ExtractError, Quadrilateral};
pub use sudoku_scan_glyphs::{GridCell, SortedGrid};

mod pipeline;
pub use pipeline::{ScanError, ScanOutcome, ScanParams, ScanPipeline};

#[cfg(feature = "image")]
pub mod detect;
