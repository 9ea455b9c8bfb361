//! Raster filtering: Gaussian blur, adaptive Gaussian threshold, inversion.
//!
//! Both filters run separably with replicated edges. Kernel sigma is derived
//! from the kernel size with the conventional `0.3*((k-1)*0.5 - 1) + 0.8`
//! rule, so a 9-tap blur gets sigma 1.7 and an 11-tap threshold window gets
//! sigma 2.0.

use sudoku_scan_core::{GrayImage, GrayImageView};

fn sigma_for_kernel(ksize: usize) -> f64 {
    0.3 * ((ksize as f64 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Normalized 1-D Gaussian weights for a `ksize`-tap window.
pub(crate) fn gaussian_kernel(ksize: usize) -> Vec<f64> {
    let sigma = sigma_for_kernel(ksize);
    let center = (ksize as f64 - 1.0) * 0.5;
    let mut weights: Vec<f64> = (0..ksize)
        .map(|i| {
            let d = i as f64 - center;
            (-d * d / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let total: f64 = weights.iter().sum();
    for w in &mut weights {
        *w /= total;
    }
    weights
}

// Horizontal convolution with replicated edges; rows independent.
fn convolve_rows(src: &[f64], rows: usize, cols: usize, kernel: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0f64; rows * cols];
    let half = (kernel.len() / 2) as i64;
    for y in 0..rows {
        let base = y * cols;
        for x in 0..cols {
            let mut acc = 0.0;
            for (k, w) in kernel.iter().enumerate() {
                let sx = (x as i64 + k as i64 - half).clamp(0, cols as i64 - 1) as usize;
                acc += w * src[base + sx];
            }
            out[base + x] = acc;
        }
    }
    out
}

fn separable_gaussian(src: &GrayImageView<'_>, ksize: usize) -> Vec<f64> {
    let kernel = gaussian_kernel(ksize);
    let planar: Vec<f64> = src.data.iter().map(|&v| v as f64).collect();
    let horiz = convolve_rows(&planar, src.height, src.width, &kernel);

    // Vertical pass over the transposed buffer.
    let mut transposed = vec![0.0f64; src.width * src.height];
    for y in 0..src.height {
        for x in 0..src.width {
            transposed[x * src.height + y] = horiz[y * src.width + x];
        }
    }
    let vert = convolve_rows(&transposed, src.width, src.height, &kernel);

    let mut out = vec![0.0f64; src.width * src.height];
    for y in 0..src.height {
        for x in 0..src.width {
            out[y * src.width + x] = vert[x * src.height + y];
        }
    }
    out
}

/// Gaussian blur with a square `ksize x ksize` kernel.
pub fn gaussian_blur(src: &GrayImageView<'_>, ksize: usize) -> GrayImage {
    if src.width == 0 || src.height == 0 || ksize < 2 {
        return src.to_owned();
    }
    let blurred = separable_gaussian(src, ksize);
    GrayImage {
        width: src.width,
        height: src.height,
        data: blurred
            .iter()
            .map(|&v| v.round().clamp(0.0, 255.0) as u8)
            .collect(),
    }
}

/// Adaptive Gaussian threshold: each pixel compares against the
/// Gaussian-weighted mean of its `block x block` neighborhood minus
/// `offset`. Strictly-above pixels come out 255, the rest 0.
///
/// The mean surface is rounded to 8 bits before the comparison, so a flat
/// black region with a positive offset thresholds to 255 (0 > -offset),
/// exactly like the classical formulation.
pub fn adaptive_threshold_gaussian(
    src: &GrayImageView<'_>,
    block: usize,
    offset: i32,
) -> GrayImage {
    let mut out = GrayImage::new(src.width, src.height);
    if src.width == 0 || src.height == 0 {
        return out;
    }
    let mean = separable_gaussian(src, block);
    for (i, px) in out.data.iter_mut().enumerate() {
        let t = mean[i].round().clamp(0.0, 255.0) as i32 - offset;
        *px = if src.data[i] as i32 > t { 255 } else { 0 };
    }
    out
}

/// Bitwise inversion, flipping ink to the high value.
pub fn invert(src: &GrayImageView<'_>) -> GrayImage {
    GrayImage {
        width: src.width,
        height: src.height,
        data: src.data.iter().map(|&v| 255 - v).collect(),
    }
}
