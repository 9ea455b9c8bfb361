//! Contour-based glyph segmentation over the grid-line-free board image.

use log::debug;
use serde::{Deserialize, Serialize};

use sudoku_scan_board::contour::external_contours;
use sudoku_scan_board::BoundingBox;
use sudoku_scan_core::{copy_rect, GrayImage, GrayImageView};

/// Tunables for the segmentation stage.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SegmentParams {
    /// Contours are kept when their area strictly exceeds
    /// `min_area_frac * image_area`; a scale-relative speck floor.
    pub min_area_frac: f64,
    /// Optional `(lo, hi)` bounds on the bounding box width/height ratio.
    /// `None` (the default) disables the filter.
    pub aspect_ratio: Option<(f64, f64)>,
}

impl Default for SegmentParams {
    fn default() -> Self {
        Self {
            min_area_frac: 5e-4,
            aspect_ratio: None,
        }
    }
}

/// One segmented glyph: the cropped sub-raster plus where it sat in the
/// canonical image.
#[derive(Clone, Debug)]
pub struct GlyphCrop {
    pub image: GrayImage,
    pub bbox: BoundingBox,
}

/// Crop every foreground region that clears the noise floor, in contour
/// discovery order (top-to-bottom scan). Downstream stages treat this order
/// as the template enumeration order.
pub fn segment_glyphs(glyphs: &GrayImageView<'_>, params: &SegmentParams) -> Vec<GlyphCrop> {
    let image_area = (glyphs.width * glyphs.height) as f64;
    let min_area = params.min_area_frac * image_area;

    let mut crops = Vec::new();
    for contour in external_contours(glyphs) {
        if contour.area() <= min_area {
            continue;
        }
        let bbox = contour.bounding_box();
        if let Some((lo, hi)) = params.aspect_ratio {
            let ratio = bbox.width as f64 / bbox.height as f64;
            if ratio < lo || ratio > hi {
                continue;
            }
        }
        crops.push(GlyphCrop {
            image: copy_rect(glyphs, bbox.x, bbox.y, bbox.width, bbox.height),
            bbox,
        });
    }
    debug!("segmented {} glyph crops", crops.len());
    crops
}
