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

use num_traits::Float;

use crate::geometry::line::{Line2, line_intersect_interp};
use crate::geometry::vector_2::Vector2;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Circle<T> {
    pub center: Vector2<T>,
    pub radius: T,
}

pub type CircleF = Circle<f32>;
pub type CircleD = Circle<f64>;

impl<T: Float> Circle<T> {
    pub fn new(center: Vector2<T>, radius: T) -> Self {
        Self { center, radius }
    }

    /// Boundary-inclusive containment.
    pub fn contains_point(&self, p: &Vector2<T>) -> bool {
        self.center.distance(p) <= self.radius
    }
}

/// Smallest circle through two points: centered on their midpoint.
pub fn circumcircle2<T: Float>(p0: Vector2<T>, p1: Vector2<T>) -> Circle<T> {
    let center = Line2::new(p0, p1).midpoint();
    Circle::new(center, p0.distance(&center))
}

/// Circle through three points, found by crossing the perpendicular
/// bisectors of `p0p1` and `p1p2`.
///
/// Coincident points collapse to the two-point circle of the remaining pair.
/// Collinear points have parallel bisectors; those also fall back to the
/// two-point circle of `p0p1`.
pub fn circumcircle<T: Float>(p0: Vector2<T>, p1: Vector2<T>, p2: Vector2<T>) -> Circle<T> {
    let line1 = Line2::new(p0, p1);
    let line2 = Line2::new(p1, p2);
    if line1.is_degenerate() {
        return circumcircle2(p1, p2);
    }
    if line2.is_degenerate() {
        return circumcircle2(p0, p1);
    }

    let mid1 = line1.midpoint();
    let mid2 = line2.midpoint();
    let bisector1 = Line2::new(mid1, mid1 + line1.tangent());
    let bisector2 = Line2::new(mid2, mid2 + line2.tangent());

    match line_intersect_interp(&bisector1, &bisector2) {
        Some(interp) if interp.x.is_finite() => {
            let center = bisector1.point_at(interp.x);
            Circle::new(center, p0.distance(&center))
        }
        _ => circumcircle2(p0, p1),
    }
}
