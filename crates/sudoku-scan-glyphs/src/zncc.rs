//! Zero-mean normalized cross-correlation template scanning.

use sudoku_scan_core::GrayImageView;

const VAR_EPS: f64 = 1e-9;

/// Precomputed template statistics, reused across every window of a scan.
struct TemplatePlan {
    width: usize,
    height: usize,
    /// Mean-subtracted template samples.
    centered: Vec<f64>,
    /// Sum of squared deviations.
    norm2: f64,
}

impl TemplatePlan {
    fn new(template: &GrayImageView<'_>) -> Self {
        let n = (template.width * template.height) as f64;
        let mean = template.data.iter().map(|&v| v as f64).sum::<f64>() / n;
        let centered: Vec<f64> = template.data.iter().map(|&v| v as f64 - mean).collect();
        let norm2 = centered.iter().map(|d| d * d).sum();
        Self {
            width: template.width,
            height: template.height,
            centered,
            norm2,
        }
    }
}

fn zncc_at_plan(image: &GrayImageView<'_>, plan: &TemplatePlan, x: usize, y: usize) -> f64 {
    let n = (plan.width * plan.height) as f64;
    let mut window_sum = 0.0;
    for ty in 0..plan.height {
        let row = (y + ty) * image.width + x;
        for tx in 0..plan.width {
            window_sum += image.data[row + tx] as f64;
        }
    }
    let window_mean = window_sum / n;

    let mut cross = 0.0;
    let mut window_norm2 = 0.0;
    for ty in 0..plan.height {
        let row = (y + ty) * image.width + x;
        for tx in 0..plan.width {
            let d = image.data[row + tx] as f64 - window_mean;
            cross += d * plan.centered[ty * plan.width + tx];
            window_norm2 += d * d;
        }
    }
    if window_norm2 < VAR_EPS {
        return 0.0;
    }
    cross / (plan.norm2 * window_norm2).sqrt()
}

/// ZNCC score of `template` against the window of `image` anchored at
/// `(x, y)`. A zero-variance window scores 0; a zero-variance template
/// scores 1 anywhere (the reference matcher's convention).
pub fn zncc_at(image: &GrayImageView<'_>, template: &GrayImageView<'_>, x: usize, y: usize) -> f64 {
    let plan = TemplatePlan::new(template);
    if plan.norm2 < VAR_EPS {
        return 1.0;
    }
    zncc_at_plan(image, &plan, x, y)
}

/// Maximum ZNCC over every valid window position, or `None` when the
/// template exceeds the image in either dimension (no valid position).
pub fn max_zncc(image: &GrayImageView<'_>, template: &GrayImageView<'_>) -> Option<f64> {
    if template.width > image.width
        || template.height > image.height
        || template.width == 0
        || template.height == 0
    {
        return None;
    }
    let plan = TemplatePlan::new(template);
    if plan.norm2 < VAR_EPS {
        return Some(1.0);
    }
    let mut best = f64::NEG_INFINITY;
    for y in 0..=image.height - template.height {
        for x in 0..=image.width - template.width {
            best = best.max(zncc_at_plan(image, &plan, x, y));
        }
    }
    Some(best)
}

/// Whether any window position scores at or above `threshold`.
pub fn matches_anywhere(
    image: &GrayImageView<'_>,
    template: &GrayImageView<'_>,
    threshold: f64,
) -> bool {
    max_zncc(image, template).is_some_and(|score| score >= threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use sudoku_scan_core::{copy_rect, GrayImage};

    fn textured(w: usize, h: usize) -> GrayImage {
        let mut img = GrayImage::new(w, h);
        for y in 0..h {
            for x in 0..w {
                img.data[y * w + x] = ((x * 31 + y * 57 + (x * y) % 13) % 256) as u8;
            }
        }
        img
    }

    #[test]
    fn patch_matches_itself_perfectly() {
        let img = textured(40, 40);
        let patch = copy_rect(&img.as_view(), 12, 8, 10, 10);
        let score = zncc_at(&img.as_view(), &patch.as_view(), 12, 8);
        assert_relative_eq!(score, 1.0, epsilon = 1e-9);
        assert_relative_eq!(
            max_zncc(&img.as_view(), &patch.as_view()).unwrap(),
            1.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn inverse_patch_anticorrelates() {
        let img = textured(30, 30);
        let patch = copy_rect(&img.as_view(), 5, 5, 12, 12);
        let inverse = GrayImage {
            width: 12,
            height: 12,
            data: patch.data.iter().map(|&v| 255 - v).collect(),
        };
        let score = zncc_at(&img.as_view(), &inverse.as_view(), 5, 5);
        assert_relative_eq!(score, -1.0, epsilon = 1e-9);
    }

    #[test]
    fn oversized_template_has_no_valid_position() {
        let img = textured(10, 10);
        let template = textured(12, 8);
        assert!(max_zncc(&img.as_view(), &template.as_view()).is_none());
        assert!(!matches_anywhere(
            &img.as_view(),
            &template.as_view(),
            0.8
        ));
    }

    #[test]
    fn constant_template_matches_everything() {
        let img = textured(20, 20);
        let flat = GrayImage::filled(6, 6, 255);
        assert_relative_eq!(
            max_zncc(&img.as_view(), &flat.as_view()).unwrap(),
            1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn constant_window_scores_zero() {
        let img = GrayImage::filled(20, 20, 128);
        let template = textured(6, 6);
        assert_relative_eq!(
            max_zncc(&img.as_view(), &template.as_view()).unwrap(),
            0.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn displaced_pattern_is_found_by_the_scan() {
        let mut img = GrayImage::new(40, 40);
        let stamp = textured(9, 9);
        for y in 0..9 {
            for x in 0..9 {
                img.data[(20 + y) * 40 + (25 + x)] = stamp.data[y * 9 + x];
            }
        }
        assert!(matches_anywhere(&img.as_view(), &stamp.as_view(), 0.8));
    }
}
