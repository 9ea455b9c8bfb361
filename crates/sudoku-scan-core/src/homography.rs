use crate::{sample_bilinear_u8, GrayImage, GrayImageView};
use nalgebra::{Matrix3, Point2, SMatrix, SVector, Vector3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Homography {
    pub h: Matrix3<f64>,
}

impl Homography {
    pub fn new(h: Matrix3<f64>) -> Self {
        Self { h }
    }

    pub fn to_array(&self) -> [[f64; 3]; 3] {
        [
            [self.h[(0, 0)], self.h[(0, 1)], self.h[(0, 2)]],
            [self.h[(1, 0)], self.h[(1, 1)], self.h[(1, 2)]],
            [self.h[(2, 0)], self.h[(2, 1)], self.h[(2, 2)]],
        ]
    }

    #[inline]
    pub fn apply(&self, p: Point2<f64>) -> Point2<f64> {
        let v = self.h * Vector3::new(p.x, p.y, 1.0);
        Point2::new(v[0] / v[2], v[1] / v[2])
    }

    pub fn inverse(&self) -> Option<Self> {
        self.h.try_inverse().map(Self::new)
    }
}

// Hartley conditioning: translate the centroid to the origin and scale so
// the mean distance from it is sqrt(2). Keeps the 8x8 solve well behaved
// for pixel-scale coordinates.
fn conditioning_transform(pts: &[Point2<f64>; 4]) -> Matrix3<f64> {
    let mut cx = 0.0;
    let mut cy = 0.0;
    for p in pts {
        cx += p.x;
        cy += p.y;
    }
    cx /= 4.0;
    cy /= 4.0;

    let mut mean_dist = 0.0;
    for p in pts {
        mean_dist += (p.x - cx).hypot(p.y - cy);
    }
    mean_dist /= 4.0;

    let s = if mean_dist > 1e-12 {
        2.0_f64.sqrt() / mean_dist
    } else {
        1.0
    };
    Matrix3::new(s, 0.0, -s * cx, 0.0, s, -s * cy, 0.0, 0.0, 1.0)
}

fn apply_transform(t: &Matrix3<f64>, pts: &[Point2<f64>; 4]) -> [Point2<f64>; 4] {
    pts.map(|p| {
        let v = t * Vector3::new(p.x, p.y, 1.0);
        Point2::new(v[0] / v[2], v[1] / v[2])
    })
}

/// Compute H such that `dst ~ H * src` from 4 point correspondences, with
/// the corner order consistent between `src` and `dst`.
///
/// Returns `None` when the correspondences are degenerate (three collinear
/// or coincident points make the system singular).
pub fn homography_from_4pt(src: &[Point2<f64>; 4], dst: &[Point2<f64>; 4]) -> Option<Homography> {
    let t_src = conditioning_transform(src);
    let t_dst = conditioning_transform(dst);
    let src_n = apply_transform(&t_src, src);
    let dst_n = apply_transform(&t_dst, dst);

    // Unknowns [h11 h12 h13 h21 h22 h23 h31 h32], h33 = 1. Each
    // correspondence (x,y)->(u,v) contributes:
    //   h11 x + h12 y + h13 - u h31 x - u h32 y = u
    //   h21 x + h22 y + h23 - v h31 x - v h32 y = v
    let mut a = SMatrix::<f64, 8, 8>::zeros();
    let mut b = SVector::<f64, 8>::zeros();

    for k in 0..4 {
        let x = src_n[k].x;
        let y = src_n[k].y;
        let u = dst_n[k].x;
        let v = dst_n[k].y;

        let r0 = 2 * k;
        a[(r0, 0)] = x;
        a[(r0, 1)] = y;
        a[(r0, 2)] = 1.0;
        a[(r0, 6)] = -u * x;
        a[(r0, 7)] = -u * y;
        b[r0] = u;

        let r1 = 2 * k + 1;
        a[(r1, 3)] = x;
        a[(r1, 4)] = y;
        a[(r1, 5)] = 1.0;
        a[(r1, 6)] = -v * x;
        a[(r1, 7)] = -v * y;
        b[r1] = v;
    }

    let x = a.lu().solve(&b)?;

    let hn = Matrix3::<f64>::new(
        x[0], x[1], x[2], //
        x[3], x[4], x[5], //
        x[6], x[7], 1.0,
    );

    // Undo the conditioning and fix the h33 = 1 gauge.
    let h = t_dst.try_inverse()? * hn * t_src;
    let s = h[(2, 2)];
    if s.abs() < 1e-12 {
        return None;
    }
    Some(Homography::new(h / s))
}

/// Warp into the rectified frame: each destination pixel maps through
/// `h_src_from_dst` back into the source and samples bilinearly; samples
/// outside the source read as black. Pixel coordinates are the grid indices
/// themselves, so an identity mapping reproduces the source exactly.
pub fn warp_perspective_gray(
    src: &GrayImageView<'_>,
    h_src_from_dst: Homography,
    out_w: usize,
    out_h: usize,
) -> GrayImage {
    let mut out = vec![0u8; out_w * out_h];

    for y in 0..out_h {
        for x in 0..out_w {
            let ps = h_src_from_dst.apply(Point2::new(x as f64, y as f64));
            out[y * out_w + x] = sample_bilinear_u8(src, ps.x as f32, ps.y as f32);
        }
    }

    GrayImage {
        width: out_w,
        height: out_h,
        data: out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Point2<f64>, b: Point2<f64>, tol: f64) {
        let dx = (a.x - b.x).abs();
        let dy = (a.y - b.y).abs();
        assert!(
            dx < tol && dy < tol,
            "expected ({:.6},{:.6}) ~ ({:.6},{:.6}) within {}",
            a.x,
            a.y,
            b.x,
            b.y,
            tol
        );
    }

    #[test]
    fn inverse_round_trips_points() {
        let h = Homography::new(Matrix3::new(
            1.1, 0.08, 14.0, //
            -0.03, 0.95, 7.0, //
            0.0008, 0.0003, 1.0,
        ));
        let inv = h.inverse().expect("invertible");

        for p in [
            Point2::new(0.0, 0.0),
            Point2::new(42.0, -15.0),
            Point2::new(280.0, 310.0),
        ] {
            assert_close(inv.apply(h.apply(p)), p, 1e-6);
        }
    }

    #[test]
    fn four_point_solve_recovers_known_transform() {
        let ground_truth = Homography::new(Matrix3::new(
            0.9, 0.04, 35.0, //
            -0.06, 1.05, 22.0, //
            0.0007, -0.0005, 1.0,
        ));

        let square = [
            Point2::new(0.0, 0.0),
            Point2::new(260.0, 0.0),
            Point2::new(260.0, 260.0),
            Point2::new(0.0, 260.0),
        ];
        let photographed = square.map(|p| ground_truth.apply(p));

        let recovered = homography_from_4pt(&square, &photographed).expect("recoverable");
        for p in [
            Point2::new(0.0, 0.0),
            Point2::new(130.0, 65.0),
            Point2::new(250.0, 255.0),
        ] {
            assert_close(recovered.apply(p), ground_truth.apply(p), 1e-6);
        }
    }

    #[test]
    fn collinear_corners_are_rejected() {
        let src = [
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(20.0, 0.0),
            Point2::new(30.0, 0.0),
        ];
        let dst = [
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ];
        assert!(homography_from_4pt(&src, &dst).is_none());
    }

    #[test]
    fn identity_mapping_warps_to_a_copy() {
        let mut img = GrayImage::new(12, 12);
        for (i, px) in img.data.iter_mut().enumerate() {
            *px = (i % 256) as u8;
        }
        let warped = warp_perspective_gray(
            &img.as_view(),
            Homography::new(Matrix3::identity()),
            12,
            12,
        );
        assert_eq!(warped.data, img.data);
    }
}
