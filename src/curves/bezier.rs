// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Alexandre Severino
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! Cubic Bezier intersection by recursive subdivision.
//!
//! Both curves are split in half until each piece is flat to within
//! `1 / INV_EPS`. Pairs whose control-point boxes overlap recurse. Leaf pairs
//! are intersected as straight chords from `p0` to `p3`, solved in `f64`.

use crate::geometry::{BoundsUv, Vector2F};

/// Inverse of the flatness tolerance used to pick the subdivision depth.
pub const INV_EPS: f32 = (1 << 14) as f32;
/// Cross-product tolerance when testing a point against a flattened piece.
pub const COLLINEAR_EPS: f32 = 1e-5;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bezier {
    pub p0: Vector2F,
    pub p1: Vector2F,
    pub p2: Vector2F,
    pub p3: Vector2F,
}

/// Where two curves cross, as parameters along each curve plus the point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BezierIntersection {
    pub curve_a_percentage: f32,
    pub curve_b_percentage: f32,
    pub intersection_point: Vector2F,
}

impl Bezier {
    pub fn new(p0: Vector2F, p1: Vector2F, p2: Vector2F, p3: Vector2F) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// A straight segment with evenly spaced inner control points.
    pub fn linear(from: Vector2F, to: Vector2F) -> Self {
        Self::new(from, from.lerp(&to, 1.0 / 3.0), from.lerp(&to, 2.0 / 3.0), to)
    }

    pub fn point_at(&self, t: f32) -> Vector2F {
        let u = 1.0 - t;
        let tt = t * t;
        let uu = u * u;
        self.p0 * (uu * u) + self.p1 * (3.0 * uu * t) + self.p2 * (3.0 * u * tt) + self.p3 * (tt * t)
    }

    /// De Casteljau split at `t = 0.5`.
    pub fn split(&self) -> (Bezier, Bezier) {
        let a = self.p0.lerp(&self.p1, 0.5);
        let b = self.p1.lerp(&self.p2, 0.5);
        let c = self.p2.lerp(&self.p3, 0.5);
        let d = a.lerp(&b, 0.5);
        let e = b.lerp(&c, 0.5);
        let f = d.lerp(&e, 0.5);
        (Bezier::new(self.p0, a, d, f), Bezier::new(f, e, c, self.p3))
    }

    /// Bounds of the control polygon, which contain the curve.
    pub fn bounds(&self) -> BoundsUv {
        BoundsUv::from_points(&[self.p0, self.p1, self.p2, self.p3])
    }

    /// Box overlap test. With `allow_boundaries` touching boxes count as
    /// overlapping.
    pub fn intersects_bounds(&self, other: &Bezier, allow_boundaries: bool) -> bool {
        let a = self.bounds();
        let b = other.bounds();
        if allow_boundaries {
            !(a.min.x > b.max.x || b.min.x > a.max.x || a.min.y > b.max.y || b.min.y > a.max.y)
        } else {
            !(a.min.x >= b.max.x || b.min.x >= a.max.x || a.min.y >= b.max.y || b.min.y >= a.max.y)
        }
    }

    /// Number of halvings needed before the curve is flat to `1 / INV_EPS`.
    pub fn curve_depth(&self) -> u32 {
        let d0 = self.p0 - self.p1 * 2.0 + self.p2;
        let d1 = self.p1 - self.p2 * 2.0 + self.p3;
        let l0 = d0.x.abs().max(d0.y.abs()).max(d1.x.abs()).max(d1.y.abs());
        if l0 * 0.75 * std::f32::consts::SQRT_2 + 1.0 == 1.0 {
            return 0;
        }
        let log4 = 0.5 * (std::f32::consts::SQRT_2 * 6.0 / 8.0 * INV_EPS * l0).log2();
        log4.ceil().max(0.0) as u32
    }

    /// Every crossing between `self` and `other`.
    ///
    /// A crossing that lands on a subdivision seam may be reported twice,
    /// and a tangential touch may be missed.
    pub fn find_all_intersections(
        &self,
        other: &Bezier,
        allow_boundaries: bool,
    ) -> Vec<BezierIntersection> {
        let mut out = Vec::new();
        if self.intersects_bounds(other, allow_boundaries) {
            recursively_intersect(
                self,
                (0.0, 1.0),
                self.curve_depth(),
                other,
                (0.0, 1.0),
                other.curve_depth(),
                allow_boundaries,
                &mut out,
            );
        }
        out
    }

    pub fn point_belongs_to_curve(&self, p: &Vector2F) -> bool {
        recursive_point_search(p, self, self.curve_depth())
    }

    /// Crossing of the control-polygon chords `p0`-`p2` of both curves.
    /// `p2` coincides with `p3` on straight path segments.
    ///
    /// With `allow_boundaries` a shared chord endpoint is reported directly,
    /// at parameter 0 or just below 1.
    pub fn find_linear_intersection(
        &self,
        other: &Bezier,
        allow_boundaries: bool,
    ) -> Option<BezierIntersection> {
        let (p0, p1) = (self.p0, self.p2);
        let (q0, q1) = (other.p0, other.p2);

        let start_start = allow_boundaries && p0 == q0;
        let start_end = allow_boundaries && p0 == q1;
        let end_start = allow_boundaries && p1 == q0;
        let end_end = allow_boundaries && p1 == q1;
        if start_start || start_end || end_start || end_end {
            let below_one = f32::from_bits(1.0f32.to_bits() - 1);
            return Some(BezierIntersection {
                curve_a_percentage: if start_start || start_end { 0.0 } else { below_one },
                curve_b_percentage: if start_start || end_start { 0.0 } else { below_one },
                intersection_point: if start_start || start_end { p0 } else { p1 },
            });
        }

        if !segments_cross(&p0, &p1, &q0, &q1) {
            return None;
        }

        let a1 = f64::from(p1.y - p0.y);
        let b1 = f64::from(p0.x - p1.x);
        let c1 = a1 * f64::from(p0.x) + b1 * f64::from(p0.y);
        let a2 = f64::from(q1.y - q0.y);
        let b2 = f64::from(q0.x - q1.x);
        let c2 = a2 * f64::from(q0.x) + b2 * f64::from(q0.y);

        let determinant = a1 * b2 - a2 * b1;
        if determinant == 0.0 {
            return None;
        }

        let point = Vector2F::new(
            ((b2 * c1 - b1 * c2) / determinant) as f32,
            ((a1 * c2 - a2 * c1) / determinant) as f32,
        );
        Some(BezierIntersection {
            curve_a_percentage: p0.distance(&point) / p0.distance(&p1),
            curve_b_percentage: q0.distance(&point) / q0.distance(&q1),
            intersection_point: point,
        })
    }
}

#[allow(clippy::too_many_arguments)]
fn recursively_intersect(
    a: &Bezier,
    (t0, t1): (f64, f64),
    depth_a: u32,
    b: &Bezier,
    (u0, u1): (f64, f64),
    depth_b: u32,
    allow_boundaries: bool,
    out: &mut Vec<BezierIntersection>,
) {
    if depth_a > 0 {
        let (a1, a2) = a.split();
        let tm = (t0 + t1) * 0.5;
        let halves_a = [(a1, (t0, tm)), (a2, (tm, t1))];
        if depth_b > 0 {
            let (b1, b2) = b.split();
            let um = (u0 + u1) * 0.5;
            let halves_b = [(b1, (u0, um)), (b2, (um, u1))];
            for (sub_a, range_a) in &halves_a {
                for (sub_b, range_b) in &halves_b {
                    if sub_a.intersects_bounds(sub_b, allow_boundaries) {
                        recursively_intersect(
                            sub_a,
                            *range_a,
                            depth_a - 1,
                            sub_b,
                            *range_b,
                            depth_b - 1,
                            allow_boundaries,
                            out,
                        );
                    }
                }
            }
        } else {
            for (sub_a, range_a) in &halves_a {
                if sub_a.intersects_bounds(b, allow_boundaries) {
                    recursively_intersect(
                        sub_a,
                        *range_a,
                        depth_a - 1,
                        b,
                        (u0, u1),
                        depth_b,
                        allow_boundaries,
                        out,
                    );
                }
            }
        }
        return;
    }

    if depth_b > 0 {
        let (b1, b2) = b.split();
        let um = (u0 + u1) * 0.5;
        for (sub_b, range_b) in [(b1, (u0, um)), (b2, (um, u1))] {
            if a.intersects_bounds(&sub_b, allow_boundaries) {
                recursively_intersect(
                    a,
                    (t0, t1),
                    depth_a,
                    &sub_b,
                    range_b,
                    depth_b - 1,
                    allow_boundaries,
                    out,
                );
            }
        }
        return;
    }

    // Both pieces are flat: intersect their chords.
    let (a0, a3) = (a.p0.cast::<f64>(), a.p3.cast::<f64>());
    let (b0, b3) = (b.p0.cast::<f64>(), b.p3.cast::<f64>());
    let lk = a3 - a0;
    let nm = b3 - b0;
    let mk = b0 - a0;
    let det = nm.x * lk.y - nm.y * lk.x;
    if 1.0 + det == 1.0 {
        return;
    }
    let det_inv = 1.0 / det;
    let s = (nm.x * mk.y - nm.y * mk.x) * det_inv;
    let t = (lk.x * mk.y - lk.y * mk.x) * det_inv;
    if !(0.0..=1.0).contains(&s) || !(0.0..=1.0).contains(&t) {
        return;
    }
    out.push(BezierIntersection {
        curve_a_percentage: (t0 + s * (t1 - t0)) as f32,
        curve_b_percentage: (u0 + t * (u1 - u0)) as f32,
        intersection_point: (a0 + lk * s).cast::<f32>(),
    });
}

fn recursive_point_search(p: &Vector2F, bez: &Bezier, depth: u32) -> bool {
    if !bez.bounds().contains(p) {
        return false;
    }
    if depth == 0 {
        let a = bez.p0;
        let b = bez.p3;
        let between_x = (p.x >= a.x && p.x <= b.x) || (p.x >= b.x && p.x <= a.x);
        let between_y = (p.y >= a.y && p.y <= b.y) || (p.y >= b.y && p.y <= a.y);
        return between_x && between_y && (b - a).cross(&(*p - a)).abs() < COLLINEAR_EPS;
    }
    let (left, right) = bez.split();
    recursive_point_search(p, &left, depth - 1) || recursive_point_search(p, &right, depth - 1)
}

/// Whether segments `p1p2` and `q1q2` cross, counting a touch at one end.
fn segments_cross(p1: &Vector2F, p2: &Vector2F, q1: &Vector2F, q2: &Vector2F) -> bool {
    let side = |o: &Vector2F, d: &Vector2F, x: &Vector2F| (*x - *o).cross(&(*d - *o));
    let v1 = side(p1, p2, q1) * side(p1, p2, q2);
    let v2 = side(q1, q2, p1) * side(q1, q2, p2);
    (v1 <= 0.0 && v2 < 0.0) || (v1 < 0.0 && v2 <= 0.0)
}
