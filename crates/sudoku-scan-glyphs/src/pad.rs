//! Aspect padding of glyph crops.
//!
//! Each crop gets a symmetric black border sized from its own height:
//! `pad_h = trunc(crop_h / height_ratio)` and
//! `pad_w = (crop_h - crop_w) + pad_h`, each integer-halved per side. Crops
//! the formula cannot pad (wide crops driving the per-side width negative,
//! or zero-size crops) are rejected per item; the stage is best effort and
//! never fails as a whole.

use log::debug;
use serde::{Deserialize, Serialize};

use sudoku_scan_core::GrayImage;

use crate::segment::GlyphCrop;

/// Tunables for the padding stage.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PadParams {
    /// Divisor of the crop height in the vertical pad formula.
    pub height_ratio: f64,
}

impl Default for PadParams {
    fn default() -> Self {
        Self { height_ratio: 1.75 }
    }
}

/// A padded glyph, still linked to the unpadded crop it came from so the
/// template/counterpart pairing survives drops.
#[derive(Clone, Debug)]
pub struct PaddedGlyph {
    pub crop: GlyphCrop,
    pub padded: GrayImage,
}

/// Why one crop was dropped.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum PadRejection {
    #[error("zero-size crop")]
    EmptyCrop,
    #[error("padding formula drives the per-side width negative ({per_side})")]
    NegativePad { per_side: i64 },
}

/// Pad one crop, consuming it on success.
pub fn pad_glyph(crop: GlyphCrop, params: &PadParams) -> Result<PaddedGlyph, PadRejection> {
    let crop_w = crop.image.width as i64;
    let crop_h = crop.image.height as i64;
    if crop_w == 0 || crop_h == 0 {
        return Err(PadRejection::EmptyCrop);
    }

    let pad_h = (crop_h as f64 / params.height_ratio) as i64;
    let pad_w = (crop_h - crop_w) + pad_h;
    // Floor halving: a negative total keeps its sign and gets rejected.
    let pad_h = pad_h.div_euclid(2);
    let pad_w = pad_w.div_euclid(2);
    if pad_w < 0 {
        return Err(PadRejection::NegativePad { per_side: pad_w });
    }

    let out_w = (crop_w + 2 * pad_w) as usize;
    let out_h = (crop_h + 2 * pad_h) as usize;
    let mut padded = GrayImage::new(out_w, out_h);
    for y in 0..crop.image.height {
        let src = y * crop.image.width;
        let dst = (y + pad_h as usize) * out_w + pad_w as usize;
        padded.data[dst..dst + crop.image.width]
            .copy_from_slice(&crop.image.data[src..src + crop.image.width]);
    }
    Ok(PaddedGlyph { crop, padded })
}

/// Pad a whole crop set, keeping the survivors in order and logging the
/// drop count.
pub fn pad_glyphs(crops: Vec<GlyphCrop>, params: &PadParams) -> Vec<PaddedGlyph> {
    let total = crops.len();
    let kept: Vec<PaddedGlyph> = crops
        .into_iter()
        .filter_map(|crop| pad_glyph(crop, params).ok())
        .collect();
    if kept.len() < total {
        debug!("padding dropped {} of {} crops", total - kept.len(), total);
    }
    kept
}
