//! Printed grid line detection and removal.
//!
//! Directional morphology isolates the long horizontal and vertical runs,
//! an adaptive re-threshold and a double dilation clean and fatten the
//! combined mask, and a Hough pass extrapolates every detected rule across
//! the full canonical frame. Inverting the result and AND-ing it with the
//! canonical image leaves only the glyph strokes.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use sudoku_scan_core::{GrayImage, GrayImageView};

use crate::filter::adaptive_threshold_gaussian;
use crate::hough::{hough_lines, PolarLine};
use crate::morph::{bitwise_and, dilate_rect, erode_rect, saturating_add};

/// Tunables for the grid line suppression stage.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LineFilterParams {
    /// Directional element length = image extent / `length_divisor`.
    pub length_divisor: usize,
    /// Block size of the cleaning re-threshold.
    pub thresh_block: usize,
    /// Offset of the cleaning re-threshold.
    pub thresh_offset: i32,
    /// Hough distance resolution in pixels.
    pub rho_res: f64,
    /// Hough angle resolution in radians.
    pub theta_res: f64,
    /// Minimum Hough votes for a line (inclusive).
    pub vote_threshold: u32,
}

impl Default for LineFilterParams {
    fn default() -> Self {
        Self {
            length_divisor: 12,
            thresh_block: 235,
            thresh_offset: 2,
            rho_res: 0.3,
            theta_res: std::f64::consts::PI / 90.0,
            vote_threshold: 200,
        }
    }
}

/// Outcome of the suppression stage.
#[derive(Clone, Debug)]
pub struct GridLineSuppression {
    /// The canonical image with grid lines erased.
    pub glyphs: GrayImage,
    /// Number of Hough lines the mask was built from; 0 means the stage
    /// passed the canonical image through untouched.
    pub line_count: usize,
}

// Each line is rasterized as a 2 px stroke from two far points +-1000 px
// along its direction vector, guaranteeing full-frame coverage.
fn draw_line(mask: &mut GrayImage, line: &PolarLine) {
    let a = line.theta.cos();
    let b = line.theta.sin();
    let x0 = a * line.rho;
    let y0 = b * line.rho;
    let x1 = (x0 + 1000.0 * -b) as i64;
    let y1 = (y0 + 1000.0 * a) as i64;
    let x2 = (x0 - 1000.0 * -b) as i64;
    let y2 = (y0 - 1000.0 * a) as i64;

    let (w, h) = (mask.width as i64, mask.height as i64);
    let steps = (x2 - x1).abs().max((y2 - y1).abs());
    if steps == 0 {
        return;
    }
    for s in 0..=steps {
        let t = s as f64 / steps as f64;
        let px = (x1 as f64 + t * (x2 - x1) as f64).round() as i64;
        let py = (y1 as f64 + t * (y2 - y1) as f64).round() as i64;
        for dy in 0..2i64 {
            for dx in 0..2i64 {
                let (x, y) = (px + dx, py + dy);
                if x >= 0 && y >= 0 && x < w && y < h {
                    mask.data[(y * w + x) as usize] = 255;
                }
            }
        }
    }
}

fn inverted(src: &GrayImage) -> GrayImage {
    GrayImage {
        width: src.width,
        height: src.height,
        data: src.data.iter().map(|&v| 255 - v).collect(),
    }
}

/// Erase the printed grid lines from a canonical binary image.
///
/// An empty Hough vote set is a soft failure: the mask degenerates to
/// all-pass and the canonical image comes back unchanged.
pub fn suppress_grid_lines(
    canonical: &GrayImageView<'_>,
    params: &LineFilterParams,
) -> GridLineSuppression {
    let h_len = (canonical.width / params.length_divisor).max(1);
    let v_len = (canonical.height / params.length_divisor).max(1);

    // Directional open: erode-then-dilate keeps only runs at least as long
    // as the element.
    let horizontal = dilate_rect(&erode_rect(canonical, h_len, 1).as_view(), h_len, 1);
    let vertical = dilate_rect(&erode_rect(canonical, 1, v_len).as_view(), 1, v_len);

    let combined = saturating_add(&horizontal.as_view(), &vertical.as_view());
    let cleaned = adaptive_threshold_gaussian(
        &combined.as_view(),
        params.thresh_block,
        params.thresh_offset,
    );
    let mut mask = dilate_rect(&dilate_rect(&cleaned.as_view(), 3, 3).as_view(), 3, 3);

    let lines = hough_lines(
        &mask.as_view(),
        params.rho_res,
        params.theta_res,
        params.vote_threshold,
    );
    if lines.is_empty() {
        warn!("no grid lines detected; suppression mask is all-pass");
        return GridLineSuppression {
            glyphs: canonical.to_owned(),
            line_count: 0,
        };
    }
    debug!("suppressing {} grid lines", lines.len());

    for line in &lines {
        draw_line(&mut mask, line);
    }
    let keep = inverted(&mask);
    GridLineSuppression {
        glyphs: bitwise_and(canonical, &keep.as_view()),
        line_count: lines.len(),
    }
}
