//! Binary morphology with rectangular structuring elements.
//!
//! A `k`-wide element spans window offsets `[-k/2, +(k-1)/2]`: centered for
//! odd `k`, biased one pixel up/left for even `k`. Erosion ignores
//! out-of-bounds samples (treats them as foreground); dilation treats them
//! as background. Rectangular elements run separably, one axis per pass.

use sudoku_scan_core::{GrayImage, GrayImageView};

#[inline]
fn window(k: usize) -> (i64, i64) {
    let k = k as i64;
    (-(k / 2), (k - 1) / 2)
}

fn erode_axis(src: &GrayImage, k: usize, horizontal: bool) -> GrayImage {
    if k <= 1 {
        return src.clone();
    }
    let (lo, hi) = window(k);
    let (w, h) = (src.width as i64, src.height as i64);
    let mut out = GrayImage::new(src.width, src.height);
    for y in 0..h {
        for x in 0..w {
            let mut m = 255u8;
            for o in lo..=hi {
                let (sx, sy) = if horizontal { (x + o, y) } else { (x, y + o) };
                if sx < 0 || sy < 0 || sx >= w || sy >= h {
                    continue;
                }
                m = m.min(src.data[(sy * w + sx) as usize]);
            }
            out.data[(y * w + x) as usize] = m;
        }
    }
    out
}

fn dilate_axis(src: &GrayImage, k: usize, horizontal: bool) -> GrayImage {
    if k <= 1 {
        return src.clone();
    }
    let (lo, hi) = window(k);
    let (w, h) = (src.width as i64, src.height as i64);
    let mut out = GrayImage::new(src.width, src.height);
    for y in 0..h {
        for x in 0..w {
            let mut m = 0u8;
            for o in lo..=hi {
                let (sx, sy) = if horizontal { (x + o, y) } else { (x, y + o) };
                if sx < 0 || sy < 0 || sx >= w || sy >= h {
                    continue;
                }
                m = m.max(src.data[(sy * w + sx) as usize]);
            }
            out.data[(y * w + x) as usize] = m;
        }
    }
    out
}

/// Erosion with a `kw x kh` rectangular element.
pub fn erode_rect(src: &GrayImageView<'_>, kw: usize, kh: usize) -> GrayImage {
    let horiz = erode_axis(&src.to_owned(), kw, true);
    erode_axis(&horiz, kh, false)
}

/// Dilation with a `kw x kh` rectangular element.
pub fn dilate_rect(src: &GrayImageView<'_>, kw: usize, kh: usize) -> GrayImage {
    let horiz = dilate_axis(&src.to_owned(), kw, true);
    dilate_axis(&horiz, kh, false)
}

/// Morphological opening (erosion then dilation), removing features smaller
/// than the element.
pub fn open_rect(src: &GrayImageView<'_>, kw: usize, kh: usize) -> GrayImage {
    let eroded = erode_rect(src, kw, kh);
    dilate_rect(&eroded.as_view(), kw, kh)
}

/// Pixelwise saturating add; OR on binary masks.
pub fn saturating_add(a: &GrayImageView<'_>, b: &GrayImageView<'_>) -> GrayImage {
    debug_assert_eq!((a.width, a.height), (b.width, b.height));
    GrayImage {
        width: a.width,
        height: a.height,
        data: a
            .data
            .iter()
            .zip(b.data.iter())
            .map(|(&x, &y)| x.saturating_add(y))
            .collect(),
    }
}

/// Pixelwise bitwise AND; on a binary mask this keeps `a` where the mask is
/// set and blanks it elsewhere.
pub fn bitwise_and(a: &GrayImageView<'_>, b: &GrayImageView<'_>) -> GrayImage {
    debug_assert_eq!((a.width, a.height), (b.width, b.height));
    GrayImage {
        width: a.width,
        height: a.height,
        data: a
            .data
            .iter()
            .zip(b.data.iter())
            .map(|(&x, &y)| x & y)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn horizontal_run(w: usize, h: usize, y: usize, x0: usize, len: usize) -> GrayImage {
        let mut img = GrayImage::new(w, h);
        for x in x0..x0 + len {
            img.data[y * w + x] = 255;
        }
        img
    }

    #[test]
    fn wide_element_keeps_long_runs_and_erases_short_ones() {
        let long = horizontal_run(60, 9, 4, 5, 40);
        let short = horizontal_run(60, 9, 4, 5, 10);
        let k = 20;

        let kept = dilate_rect(&erode_rect(&long.as_view(), k, 1).as_view(), k, 1);
        assert!(
            kept.data.iter().any(|&v| v == 255),
            "a 40 px run must survive a 20 px element"
        );

        let erased = dilate_rect(&erode_rect(&short.as_view(), k, 1).as_view(), k, 1);
        assert!(
            erased.data.iter().all(|&v| v == 0),
            "a 10 px run must not survive a 20 px element"
        );
    }

    #[test]
    fn opening_removes_speckle_but_keeps_blocks() {
        let mut img = GrayImage::new(12, 12);
        img.data[3 * 12 + 3] = 255; // isolated speck
        for y in 7..10 {
            for x in 7..10 {
                img.data[y * 12 + x] = 255; // 3x3 block
            }
        }
        let out = open_rect(&img.as_view(), 2, 2);
        assert_eq!(out.data[3 * 12 + 3], 0, "speck removed");
        assert_eq!(out.data[8 * 12 + 8], 255, "block kept");
    }

    #[test]
    fn even_element_window_is_biased_up_left() {
        assert_eq!(window(2), (-1, 0));
        assert_eq!(window(3), (-1, 1));
        assert_eq!(window(4), (-2, 1));
    }

    #[test]
    fn erosion_treats_borders_as_foreground() {
        // A full row of foreground touching both image edges survives a wide
        // horizontal erosion because out-of-bounds samples are ignored.
        let img = horizontal_run(20, 5, 2, 0, 20);
        let out = erode_rect(&img.as_view(), 7, 1);
        assert!(out.data[2 * 20..3 * 20].iter().all(|&v| v == 255));
    }

    #[test]
    fn dilation_treats_borders_as_background() {
        let mut img = GrayImage::new(5, 5);
        img.data[0] = 255;
        let out = dilate_rect(&img.as_view(), 3, 3);
        assert_eq!(out.data[0], 255);
        assert_eq!(out.data[1 * 5 + 1], 255);
        assert_eq!(out.data[2 * 5 + 2], 0);
    }

    #[test]
    fn combine_operators() {
        let a = GrayImage {
            width: 3,
            height: 1,
            data: vec![200, 0, 255],
        };
        let b = GrayImage {
            width: 3,
            height: 1,
            data: vec![100, 255, 255],
        };
        assert_eq!(
            saturating_add(&a.as_view(), &b.as_view()).data,
            vec![255, 255, 255]
        );
        assert_eq!(
            bitwise_and(&a.as_view(), &b.as_view()).data,
            vec![64, 0, 255]
        );
    }
}
