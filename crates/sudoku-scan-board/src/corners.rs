//! Corner labeling by the extreme sum/difference rule.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::contour::Contour;

/// Four labeled corner points of the dominant quadrilateral.
///
/// The labeling is derived from the contour, never given, and pairs the
/// maximum-sum point with `bottom_left` (the legacy convention; the warper's
/// destination pairing keeps the board in its photographed orientation).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quadrilateral {
    pub top_left: Point2<f64>,
    pub top_right: Point2<f64>,
    pub bottom_left: Point2<f64>,
    pub bottom_right: Point2<f64>,
}

impl Quadrilateral {
    /// Corners in label order: top-left, top-right, bottom-left,
    /// bottom-right.
    pub fn points(&self) -> [Point2<f64>; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_left,
            self.bottom_right,
        ]
    }
}

/// Label the contour's extreme points: minimum `x + y` is `top_left`,
/// maximum `x + y` is `bottom_left`, maximum `x - y` is `top_right`,
/// minimum `x - y` is `bottom_right`.
///
/// This convex-hull-free rule relies on the board being roughly
/// axis-aligned; heavily rotated quads can mis-order. Ties resolve to the
/// earliest point in trace order, so the labeling is deterministic.
pub fn locate_corners(contour: &Contour) -> Quadrilateral {
    debug_assert!(!contour.points.is_empty());

    let mut top_left = contour.points[0];
    let mut top_right = contour.points[0];
    let mut bottom_left = contour.points[0];
    let mut bottom_right = contour.points[0];

    for &(x, y) in &contour.points[1..] {
        let sum = x as i64 + y as i64;
        let diff = x as i64 - y as i64;
        if sum < top_left.0 as i64 + top_left.1 as i64 {
            top_left = (x, y);
        }
        if sum > bottom_left.0 as i64 + bottom_left.1 as i64 {
            bottom_left = (x, y);
        }
        if diff > top_right.0 as i64 - top_right.1 as i64 {
            top_right = (x, y);
        }
        if diff < bottom_right.0 as i64 - bottom_right.1 as i64 {
            bottom_right = (x, y);
        }
    }

    let pt = |(x, y): (i32, i32)| Point2::new(x as f64, y as f64);
    Quadrilateral {
        top_left: pt(top_left),
        top_right: pt(top_right),
        bottom_left: pt(bottom_left),
        bottom_right: pt(bottom_right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contour_of(points: &[(i32, i32)]) -> Contour {
        Contour {
            points: points.to_vec(),
        }
    }

    #[test]
    fn axis_aligned_square_labels_its_corners() {
        let c = contour_of(&[(10, 10), (90, 10), (90, 90), (10, 90), (50, 9)]);
        let q = locate_corners(&c);
        assert_eq!(q.top_left, Point2::new(10.0, 10.0));
        assert_eq!(q.top_right, Point2::new(90.0, 10.0));
        assert_eq!(q.bottom_left, Point2::new(90.0, 90.0), "max-sum label");
        assert_eq!(q.bottom_right, Point2::new(10.0, 90.0), "min-diff label");
    }

    #[test]
    fn labeling_is_deterministic() {
        let c = contour_of(&[(3, 7), (40, 2), (44, 41), (1, 38), (20, 20)]);
        let a = locate_corners(&c);
        let b = locate_corners(&c);
        assert_eq!(a, b);
    }

    #[test]
    fn ties_resolve_to_the_earliest_point() {
        // (0, 4) and (4, 0) share the minimum sum; trace order decides.
        let c = contour_of(&[(0, 4), (4, 0), (9, 9)]);
        let q = locate_corners(&c);
        assert_eq!(q.top_left, Point2::new(0.0, 4.0));
    }

    #[test]
    fn degenerate_contour_collapses_labels() {
        // A single point yields four coincident labels; the warper's
        // positive-side invariant rejects it downstream.
        let c = contour_of(&[(5, 5)]);
        let q = locate_corners(&c);
        assert_eq!(q.top_left, q.bottom_right);
        assert_eq!(q.top_right, q.bottom_left);
    }
}
