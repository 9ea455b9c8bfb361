use log::debug;
use nalgebra::Point2;

#[cfg(feature = "tracing")]
use tracing::instrument;

use sudoku_scan_core::{
    fit_longest_side, homography_from_4pt, warp_perspective_gray, GrayImage, GrayImageView,
};

use super::{BoardParams, BoardExtraction, ExtractError};
use crate::contour::external_contours;
use crate::corners::{locate_corners, Quadrilateral};
use crate::filter::{adaptive_threshold_gaussian, gaussian_blur, invert};
use crate::gridlines::suppress_grid_lines;
use crate::morph::{dilate_rect, open_rect};

/// Staged board extractor: cap, binarize, locate corners, rectify,
/// suppress grid lines.
#[derive(Clone, Debug, Default)]
pub struct BoardExtractor {
    params: BoardParams,
}

impl BoardExtractor {
    pub fn new(params: BoardParams) -> Self {
        Self { params }
    }

    #[inline]
    pub fn params(&self) -> &BoardParams {
        &self.params
    }

    /// Binarize a grayscale raster into a grid-emphasizing foreground mask.
    ///
    /// Blur, adaptive threshold, inversion, speckle opening, reconnecting
    /// dilation. There is no error path; a degenerate (all-flat) input
    /// produces an empty mask and fails at corner location instead.
    pub fn preprocess(&self, image: &GrayImageView<'_>) -> GrayImage {
        let p = &self.params.preprocess;
        let blurred = gaussian_blur(image, p.blur_kernel);
        let thresh =
            adaptive_threshold_gaussian(&blurred.as_view(), p.thresh_block, p.thresh_offset);
        let ink = invert(&thresh.as_view());
        let opened = open_rect(&ink.as_view(), p.morph_kernel, p.morph_kernel);
        dilate_rect(&opened.as_view(), p.morph_kernel, p.morph_kernel)
    }

    /// Locate the labeled corners of the largest foreground region.
    pub fn locate(&self, binary: &GrayImageView<'_>) -> Result<Quadrilateral, ExtractError> {
        let contours = external_contours(binary);
        let largest = contours
            .iter()
            .max_by(|a, b| a.area().total_cmp(&b.area()))
            .ok_or(ExtractError::BoardNotFound)?;
        Ok(locate_corners(largest))
    }

    /// Warp the board quadrilateral into a `side x side` canonical image,
    /// `side` rounded down to a multiple of 9 so the board subdivides into
    /// 81 whole cells.
    pub fn rectify(
        &self,
        binary: &GrayImageView<'_>,
        quad: &Quadrilateral,
    ) -> Result<(usize, GrayImage), ExtractError> {
        let side = canonical_side(quad);
        if side <= 0 {
            return Err(ExtractError::InvalidGeometry { side });
        }
        let s = side as f64 - 1.0;
        let dst = [
            Point2::new(0.0, 0.0), // top_left
            Point2::new(s, 0.0),   // top_right
            Point2::new(s, s),     // bottom_left (max-sum label)
            Point2::new(0.0, s),   // bottom_right (min-diff label)
        ];
        // Destination-to-source mapping feeds the inverse-sampling warp.
        let h = homography_from_4pt(&dst, &quad.points())
            .ok_or(ExtractError::InvalidGeometry { side })?;
        let side = side as usize;
        Ok((side, warp_perspective_gray(binary, h, side, side)))
    }

    /// Run the full extraction.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, image), fields(width = image.width, height = image.height))
    )]
    pub fn extract(&self, image: &GrayImageView<'_>) -> Result<BoardExtraction, ExtractError> {
        let capped = fit_longest_side(image, self.params.max_side);
        let binary = self.preprocess(&capped.as_view());
        let corners = self.locate(&binary.as_view())?;
        debug!(
            "board corners tl=({:.0},{:.0}) tr=({:.0},{:.0}) bl=({:.0},{:.0}) br=({:.0},{:.0})",
            corners.top_left.x,
            corners.top_left.y,
            corners.top_right.x,
            corners.top_right.y,
            corners.bottom_left.x,
            corners.bottom_left.y,
            corners.bottom_right.x,
            corners.bottom_right.y,
        );

        let (side, canonical) = self.rectify(&binary.as_view(), &corners)?;
        debug!("canonical side {side}");

        let suppression = suppress_grid_lines(&canonical.as_view(), &self.params.lines);
        Ok(BoardExtraction {
            corners,
            side,
            canonical,
            glyphs: suppression.glyphs,
            line_count: suppression.line_count,
        })
    }
}

// Raw width/height are the longer of the two opposing side lengths, each
// truncated to an integer before the divide; the result rounds down to the
// nearest multiple of 9.
fn canonical_side(quad: &Quadrilateral) -> i64 {
    let dist = |a: Point2<f64>, b: Point2<f64>| (a.x - b.x).hypot(a.y - b.y);
    let width = dist(quad.bottom_right, quad.bottom_left).max(dist(quad.top_right, quad.top_left))
        as i64;
    let height = dist(quad.top_right, quad.bottom_right).max(dist(quad.top_left, quad.bottom_left))
        as i64;
    width.max(height) / 9 * 9
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(tl: (f64, f64), tr: (f64, f64), bl: (f64, f64), br: (f64, f64)) -> Quadrilateral {
        Quadrilateral {
            top_left: Point2::new(tl.0, tl.1),
            top_right: Point2::new(tr.0, tr.1),
            bottom_left: Point2::new(bl.0, bl.1),
            bottom_right: Point2::new(br.0, br.1),
        }
    }

    #[test]
    fn side_is_a_multiple_of_nine() {
        // Axis-aligned 449 px square. The height terms pair corners across
        // the board (bottom_left carries the max-sum label, the geometric
        // bottom-right), so height = trunc(449 * sqrt(2)) = 634 and
        // side = 634 / 9 * 9.
        let q = quad((0.0, 0.0), (449.0, 0.0), (449.0, 449.0), (0.0, 449.0));
        assert_eq!(canonical_side(&q), 630);
        assert_eq!(canonical_side(&q) % 9, 0);
    }

    #[test]
    fn side_takes_the_longer_extent() {
        let q = quad((0.0, 0.0), (200.0, 0.0), (200.0, 390.0), (0.0, 390.0));
        // width 200; height = trunc(hypot(200, 390)) = 438 -> 438 / 9 * 9.
        assert_eq!(canonical_side(&q), 432);
    }

    #[test]
    fn collapsed_corners_are_invalid_geometry() {
        let q = quad((5.0, 5.0), (5.0, 5.0), (5.0, 5.0), (5.0, 5.0));
        assert_eq!(canonical_side(&q), 0);

        let binary = GrayImage::filled(32, 32, 255);
        let err = BoardExtractor::default()
            .rectify(&binary.as_view(), &q)
            .unwrap_err();
        assert!(matches!(err, ExtractError::InvalidGeometry { side: 0 }));
    }

    #[test]
    fn blank_image_reports_board_not_found() {
        let img = GrayImage::new(64, 64);
        let err = BoardExtractor::default()
            .locate(&img.as_view())
            .unwrap_err();
        assert!(matches!(err, ExtractError::BoardNotFound));
    }

    #[test]
    fn rectify_preserves_an_axis_aligned_board() {
        // White frame on black, corners at the frame's own corners: the warp
        // is a near-identity rescale, so frame pixels stay put (up to
        // resampling).
        let n = 300;
        let mut img = GrayImage::new(n, n);
        for i in 10..n - 10 {
            for t in 0..3 {
                img.data[(10 + t) * n + i] = 255;
                img.data[(n - 13 + t) * n + i] = 255;
                img.data[i * n + 10 + t] = 255;
                img.data[i * n + n - 13 + t] = 255;
            }
        }
        let q = quad(
            (10.0, 10.0),
            ((n - 11) as f64, 10.0),
            ((n - 11) as f64, (n - 11) as f64),
            (10.0, (n - 11) as f64),
        );
        let (side, canonical) = BoardExtractor::default()
            .rectify(&img.as_view(), &q)
            .unwrap();
        assert_eq!(side % 9, 0);
        // Top edge of the frame maps to the top row of the canonical image.
        let top_hits = (0..side).filter(|&x| canonical.data[x] > 128).count();
        assert!(top_hits > side * 3 / 4, "top edge lost: {top_hits}/{side}");
    }
}
