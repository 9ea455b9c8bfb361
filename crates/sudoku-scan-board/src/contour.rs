//! External contour extraction over binary images.
//!
//! Foreground components are gathered with 8-connected labeling; each
//! component's outer boundary is traced from its topmost-leftmost pixel
//! (Suzuki-Abe border following over the Moore neighborhood). Hole
//! boundaries are not traced.

use serde::{Deserialize, Serialize};

use sudoku_scan_core::GrayImageView;

/// Axis-aligned box in image pixel coordinates. `width`/`height` are
/// strictly positive by construction (a contour always has at least one
/// point).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

/// Ordered boundary of one connected foreground region.
#[derive(Clone, Debug)]
pub struct Contour {
    /// Boundary pixels in trace order.
    pub points: Vec<(i32, i32)>,
}

impl Contour {
    /// Enclosed area by the shoelace formula over the boundary polygon.
    ///
    /// Note this measures the polygon through pixel *centers*: a filled
    /// `w x h` rectangle scores `(w-1) * (h-1)`.
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut twice = 0i64;
        for i in 0..n {
            let (x0, y0) = self.points[i];
            let (x1, y1) = self.points[(i + 1) % n];
            twice += x0 as i64 * y1 as i64 - x1 as i64 * y0 as i64;
        }
        (twice.abs() as f64) / 2.0
    }

    /// Tight bounding box of the boundary points.
    pub fn bounding_box(&self) -> BoundingBox {
        let mut min_x = i32::MAX;
        let mut min_y = i32::MAX;
        let mut max_x = i32::MIN;
        let mut max_y = i32::MIN;
        for &(x, y) in &self.points {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        BoundingBox {
            x: min_x as usize,
            y: min_y as usize,
            width: (max_x - min_x + 1) as usize,
            height: (max_y - min_y + 1) as usize,
        }
    }
}

// Moore neighborhood in clockwise order (screen coordinates, y down).
const DIRS: [(i32, i32); 8] = [
    (1, 0),   // E
    (1, 1),   // SE
    (0, 1),   // S
    (-1, 1),  // SW
    (-1, 0),  // W
    (-1, -1), // NW
    (0, -1),  // N
    (1, -1),  // NE
];

fn dir_index(from: (i32, i32), to: (i32, i32)) -> usize {
    let d = (to.0 - from.0, to.1 - from.1);
    DIRS.iter().position(|&v| v == d).expect("adjacent pixels")
}

struct Labels {
    width: usize,
    height: usize,
    data: Vec<u32>,
}

impl Labels {
    #[inline]
    fn get(&self, x: i32, y: i32) -> u32 {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return 0;
        }
        self.data[y as usize * self.width + x as usize]
    }
}

// Outer border of one component, starting from its raster-first pixel
// (topmost row, leftmost in it; its west neighbor is never part of the
// component).
fn trace_outer_border(labels: &Labels, label: u32, start: (i32, i32)) -> Vec<(i32, i32)> {
    let fg = |p: (i32, i32)| labels.get(p.0, p.1) == label;
    let step = |p: (i32, i32), d: usize| (p.0 + DIRS[d].0, p.1 + DIRS[d].1);

    // Scan clockwise from west for the trace predecessor.
    let mut first = None;
    for k in 0..8 {
        let d = (4 + k) % 8;
        if fg(step(start, d)) {
            first = Some(step(start, d));
            break;
        }
    }
    let Some(first) = first else {
        return vec![start]; // isolated pixel
    };

    let mut contour = vec![start];
    let mut prev = first;
    let mut cur = start;
    loop {
        // Counterclockwise sweep around `cur`, starting one step past the
        // direction of the previous pixel.
        let back = dir_index(cur, prev);
        let mut next = cur;
        for k in 1..=8 {
            let d = (back + 8 - k) % 8;
            let cand = step(cur, d);
            if fg(cand) {
                next = cand;
                break;
            }
        }
        if next == start && cur == first {
            break; // full loop closed
        }
        contour.push(next);
        prev = cur;
        cur = next;
    }
    contour
}

/// Trace the external contour of every 8-connected foreground component
/// (pixels > 0), in raster discovery order.
pub fn external_contours(src: &GrayImageView<'_>) -> Vec<Contour> {
    let (w, h) = (src.width, src.height);
    let mut labels = Labels {
        width: w,
        height: h,
        data: vec![0u32; w * h],
    };
    let mut contours = Vec::new();
    let mut next_label = 0u32;
    let mut stack: Vec<(i32, i32)> = Vec::new();

    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            if src.data[i] == 0 || labels.data[i] != 0 {
                continue;
            }
            next_label += 1;
            let label = next_label;
            let start = (x as i32, y as i32);

            // Flood-fill the component so the tracer can test membership.
            labels.data[i] = label;
            stack.push(start);
            while let Some((cx, cy)) = stack.pop() {
                for &(dx, dy) in &DIRS {
                    let (nx, ny) = (cx + dx, cy + dy);
                    if nx < 0 || ny < 0 || nx >= w as i32 || ny >= h as i32 {
                        continue;
                    }
                    let ni = ny as usize * w + nx as usize;
                    if src.data[ni] > 0 && labels.data[ni] == 0 {
                        labels.data[ni] = label;
                        stack.push((nx, ny));
                    }
                }
            }

            contours.push(Contour {
                points: trace_outer_border(&labels, label, start),
            });
        }
    }
    contours
}
