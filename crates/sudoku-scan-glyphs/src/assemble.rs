//! 9x9 cell assembly: subdivide the canonical glyph raster into 81 tiles
//! and map each segmented glyph back onto the tile it visually matches.

use log::debug;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use sudoku_scan_core::{copy_rect, resize_lanczos, GrayImage, GrayImageView};

use crate::pad::PaddedGlyph;
use crate::zncc::matches_anywhere;

pub const GRID_DIM: usize = 9;
pub const CELL_COUNT: usize = GRID_DIM * GRID_DIM;

/// Tunables for the assembly stage.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssembleParams {
    /// ZNCC score treated as a positive match (inclusive).
    pub match_threshold: f64,
    /// Side length of assigned cell images. `None` falls back to the first
    /// template's height, or the tile size when no templates exist.
    pub output_dim: Option<usize>,
}

impl Default for AssembleParams {
    fn default() -> Self {
        Self {
            match_threshold: 0.8,
            output_dim: None,
        }
    }
}

/// One of the 81 grid positions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum GridCell {
    #[default]
    Blank,
    Glyph(GrayImage),
}

impl GridCell {
    #[inline]
    pub fn is_blank(&self) -> bool {
        matches!(self, GridCell::Blank)
    }
}

/// The pipeline's terminal artifact: 81 cells in row-major order.
#[derive(Clone, Debug)]
pub struct SortedGrid {
    pub cells: Vec<GridCell>,
    /// Side length every glyph cell was resized to.
    pub cell_dim: usize,
}

impl SortedGrid {
    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> &GridCell {
        &self.cells[row * GRID_DIM + col]
    }

    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_blank()).count()
    }
}

/// Cut the canonical raster into `divisions x divisions` equal tiles,
/// row-major. The tile edge is `height / divisions`; the canonical image's
/// side is a multiple of 9, so nothing is left over.
pub fn subdivide(img: &GrayImageView<'_>, divisions: usize) -> Vec<GrayImage> {
    let cell = img.height / divisions;
    let mut tiles = Vec::with_capacity(divisions * divisions);
    for row in 0..divisions {
        for col in 0..divisions {
            tiles.push(copy_rect(img, col * cell, row * cell, cell, cell));
        }
    }
    tiles
}

/// Match every glyph back onto the 9x9 layout.
///
/// Templates are the unpadded crops in segmentation order. For each, the
/// tiles are scanned in row-major order; the first unassigned tile scoring
/// at or above the threshold receives the template's padded counterpart
/// (resized to the common cell dimension) and the template stops there.
/// Assigned tiles are skipped by later templates, so each cell is written
/// at most once. Templates that match nothing are dropped silently.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(glyphs, padded, params), fields(templates = padded.len()))
)]
pub fn assemble_grid(
    glyphs: &GrayImageView<'_>,
    padded: &[PaddedGlyph],
    params: &AssembleParams,
) -> SortedGrid {
    let tiles = subdivide(glyphs, GRID_DIM);
    let tile_dim = glyphs.height / GRID_DIM;
    let cell_dim = params
        .output_dim
        .or_else(|| padded.first().map(|p| p.crop.image.height))
        .unwrap_or(tile_dim);

    let mut cells = vec![GridCell::Blank; CELL_COUNT];
    let mut matched = 0usize;
    for glyph in padded {
        let template = glyph.crop.image.as_view();
        for (idx, tile) in tiles.iter().enumerate() {
            if !cells[idx].is_blank() {
                continue;
            }
            if matches_anywhere(&tile.as_view(), &template, params.match_threshold) {
                cells[idx] = GridCell::Glyph(resize_lanczos(
                    &glyph.padded.as_view(),
                    cell_dim,
                    cell_dim,
                ));
                matched += 1;
                break;
            }
        }
    }
    debug!(
        "assembled grid: {matched} of {} glyphs placed, cell_dim {cell_dim}",
        padded.len()
    );
    SortedGrid { cells, cell_dim }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pad::{pad_glyphs, PadParams};
    use crate::segment::{segment_glyphs, SegmentParams};

    // Canonical-style raster with a textured glyph stamped into the given
    // cells. Texture (not a solid block) keeps template variance non-zero.
    fn board_with_glyphs(side: usize, cells: &[(usize, usize)]) -> GrayImage {
        let cell = side / GRID_DIM;
        let mut img = GrayImage::new(side, side);
        for &(row, col) in cells {
            let y0 = row * cell + cell / 4;
            let x0 = col * cell + cell / 4;
            for y in 0..cell / 2 {
                for x in 0..cell / 2 {
                    img.data[(y0 + y) * side + x0 + x] = (120 + (x * 13 + y * 7) % 136) as u8;
                }
            }
        }
        img
    }

    fn run(img: &GrayImage) -> SortedGrid {
        let crops = segment_glyphs(&img.as_view(), &SegmentParams::default());
        let padded = pad_glyphs(crops, &PadParams::default());
        assemble_grid(&img.as_view(), &padded, &AssembleParams::default())
    }

    #[test]
    fn params_deserialize_with_an_optional_output_dim() {
        let p: AssembleParams =
            serde_json::from_str(r#"{"match_threshold":0.9,"output_dim":28}"#).expect("parse");
        assert_eq!(p.output_dim, Some(28));
        let p: AssembleParams =
            serde_json::from_str(r#"{"match_threshold":0.8,"output_dim":null}"#).expect("parse");
        assert_eq!(p.output_dim, None);
    }

    #[test]
    fn subdivision_round_trips() {
        let mut img = GrayImage::new(90, 90);
        for (i, px) in img.data.iter_mut().enumerate() {
            *px = (i % 251) as u8;
        }
        let tiles = subdivide(&img.as_view(), GRID_DIM);
        assert_eq!(tiles.len(), CELL_COUNT);

        // Row-major reassembly reconstructs the raster exactly.
        let cell = 10;
        let mut rebuilt = GrayImage::new(90, 90);
        for (idx, tile) in tiles.iter().enumerate() {
            let (row, col) = (idx / GRID_DIM, idx % GRID_DIM);
            for y in 0..cell {
                for x in 0..cell {
                    rebuilt.data[(row * cell + y) * 90 + col * cell + x] =
                        tile.data[y * cell + x];
                }
            }
        }
        assert_eq!(rebuilt, img);
    }

    #[test]
    fn single_glyph_lands_in_its_cell() {
        let grid = run(&board_with_glyphs(450, &[(2, 5)]));
        assert_eq!(grid.occupied(), 1);
        assert!(!grid.cell(2, 5).is_blank());
    }

    #[test]
    fn identical_glyphs_fill_distinct_cells() {
        // Write-once: the second identical template skips the first
        // (already assigned) tile and claims the next match.
        let grid = run(&board_with_glyphs(450, &[(1, 1), (6, 3)]));
        assert_eq!(grid.occupied(), 2);
        assert!(!grid.cell(1, 1).is_blank());
        assert!(!grid.cell(6, 3).is_blank());
    }

    #[test]
    fn solid_square_claims_the_first_tile_in_scan_order() {
        // A solid square crops to a constant template, which matches every
        // tile; first match wins, so it lands in cell (0, 0).
        let side = 900;
        let mut img = GrayImage::new(side, side);
        for y in 5..95 {
            for x in 5..95 {
                img.data[y * side + x] = 255;
            }
        }
        let grid = run(&img);
        assert_eq!(grid.occupied(), 1);
        assert!(!grid.cell(0, 0).is_blank());
    }

    #[test]
    fn empty_template_set_yields_an_all_blank_grid() {
        let img = GrayImage::new(450, 450);
        let grid = assemble_grid(&img.as_view(), &[], &AssembleParams::default());
        assert_eq!(grid.occupied(), 0);
        assert_eq!(grid.cell_dim, 50, "falls back to the tile size");
    }

    #[test]
    fn output_dim_override_wins() {
        let img = board_with_glyphs(450, &[(4, 4)]);
        let crops = segment_glyphs(&img.as_view(), &SegmentParams::default());
        let padded = pad_glyphs(crops, &PadParams::default());
        let grid = assemble_grid(
            &img.as_view(),
            &padded,
            &AssembleParams {
                output_dim: Some(28),
                ..AssembleParams::default()
            },
        );
        assert_eq!(grid.cell_dim, 28);
        if let GridCell::Glyph(g) = grid.cell(4, 4) {
            assert_eq!((g.width, g.height), (28, 28));
        } else {
            panic!("cell (4,4) should hold a glyph");
        }
    }
}
