//! Polar Hough transform for straight line detection.
//!
//! The accumulator is a flat `(angles + 2) x (rhos + 2)` vote grid with a
//! one-bin pad on every side so the local-maximum scan never branches on
//! bounds. Angle bins cover `[0, pi)`; the rho axis is centered on zero.

use sudoku_scan_core::GrayImageView;

/// One detected line in polar form: `x*cos(theta) + y*sin(theta) = rho`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PolarLine {
    pub rho: f64,
    pub theta: f64,
    pub votes: u32,
}

pub struct HoughAccumulator {
    num_angle: usize,
    num_rho: usize,
    rho_res: f64,
    theta_res: f64,
    // (sin, cos) per angle bin, pre-divided by the rho resolution.
    trig: Vec<(f64, f64)>,
    votes: Vec<u32>,
}

impl HoughAccumulator {
    /// Size the accumulator for a `width x height` image so every pixel's
    /// rho fits: `round(((w + h) * 2 + 1) / rho_res)` bins centered on zero.
    pub fn new(width: usize, height: usize, rho_res: f64, theta_res: f64) -> Self {
        let num_angle = (std::f64::consts::PI / theta_res).round() as usize;
        let num_rho = (((width + height) as f64 * 2.0 + 1.0) / rho_res).round() as usize;
        let trig = (0..num_angle)
            .map(|n| {
                let theta = n as f64 * theta_res;
                (theta.sin() / rho_res, theta.cos() / rho_res)
            })
            .collect();
        Self {
            num_angle,
            num_rho,
            rho_res,
            theta_res,
            trig,
            votes: vec![0u32; (num_angle + 2) * (num_rho + 2)],
        }
    }

    #[inline]
    fn base(&self, angle: usize, rho_idx: usize) -> usize {
        (angle + 1) * (self.num_rho + 2) + rho_idx + 1
    }

    /// Vote one foreground pixel into every angle bin.
    pub fn vote(&mut self, x: usize, y: usize) {
        let offset = (self.num_rho as i64 - 1) / 2;
        for n in 0..self.num_angle {
            let (sin, cos) = self.trig[n];
            let r = (x as f64 * cos + y as f64 * sin).round() as i64 + offset;
            let idx = self.base(n, r as usize);
            self.votes[idx] += 1;
        }
    }

    /// Bins with at least `threshold` votes that are local maxima over their
    /// four rho/theta neighbors: strictly above the left/lower neighbor, at
    /// least equal to the right/upper one (the deterministic tie-break).
    pub fn detect(&self, threshold: u32) -> Vec<PolarLine> {
        let stride = self.num_rho + 2;
        let offset = (self.num_rho as i64 - 1) / 2;
        let mut lines = Vec::new();
        for n in 0..self.num_angle {
            for r in 0..self.num_rho {
                let base = self.base(n, r);
                let v = self.votes[base];
                if v >= threshold
                    && v > self.votes[base - 1]
                    && v >= self.votes[base + 1]
                    && v > self.votes[base - stride]
                    && v >= self.votes[base + stride]
                {
                    lines.push(PolarLine {
                        rho: (r as i64 - offset) as f64 * self.rho_res,
                        theta: n as f64 * self.theta_res,
                        votes: v,
                    });
                }
            }
        }
        lines
    }
}

/// Run the full transform over every foreground pixel (> 0) of a binary
/// mask.
pub fn hough_lines(
    mask: &GrayImageView<'_>,
    rho_res: f64,
    theta_res: f64,
    threshold: u32,
) -> Vec<PolarLine> {
    let mut acc = HoughAccumulator::new(mask.width, mask.height, rho_res, theta_res);
    for y in 0..mask.height {
        for x in 0..mask.width {
            if mask.data[y * mask.width + x] > 0 {
                acc.vote(x, y);
            }
        }
    }
    acc.detect(threshold)
}
