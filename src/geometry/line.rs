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

use crate::geometry::vector_2::{Vector2, length_epsilon};

/// A directed segment with its unit direction and length cached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line2<T> {
    pub pos: Vector2<T>,
    pub end: Vector2<T>,
    pub dir: Vector2<T>,
    pub length: T,
}

impl<T: Float> Line2<T> {
    pub fn new(pos: Vector2<T>, end: Vector2<T>) -> Self {
        let delta = end - pos;
        let length = delta.length();
        let dir = if length <= length_epsilon() {
            Vector2::new(T::one(), T::zero())
        } else {
            delta / length
        };
        Self {
            pos,
            end,
            dir,
            length,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.length <= length_epsilon()
    }

    pub fn midpoint(&self) -> Vector2<T> {
        self.point_at(T::from(0.5).unwrap_or_else(T::zero))
    }

    pub fn point_at(&self, u: T) -> Vector2<T> {
        self.pos.lerp(&self.end, u)
    }

    /// Unit normal `(dir.y, -dir.x)`: the direction rotated a quarter turn clockwise.
    pub fn tangent(&self) -> Vector2<T> {
        Vector2::new(self.dir.y, -self.dir.x).normalized()
    }
}

/// Interpolants `(u1, u2)` at which two infinite lines cross, so that
/// `a.point_at(u1) == b.point_at(u2)`. `None` when either denominator vanishes.
pub fn line_intersect_interp<T: Float>(a: &Line2<T>, b: &Line2<T>) -> Option<Vector2<T>> {
    let (ax, ay) = (a.pos.x, a.pos.y);
    let (bx, by) = (a.end.x, a.end.y);
    let (cx, cy) = (b.pos.x, b.pos.y);
    let (dx, dy) = (b.end.x, b.end.y);

    let u1_num = -(cx * ay) + (dx * ay) + (ax * cy) - (dx * cy) - (ax * dy) + (cx * dy);
    let u1_div = -(cx * ay) + (dx * ay) + (cx * by) - (dx * by) + (ax * cy) - (bx * cy) - (ax * dy)
        + (bx * dy);
    let u2_num = -(bx * ay) + (cx * ay) + (ax * by) - (cx * by) - (ax * cy) + (bx * cy);
    let u2_div = (cx * ay) - (dx * ay) - (cx * by) + (dx * by) - (ax * cy) + (bx * cy) + (ax * dy)
        - (bx * dy);

    if u1_div == T::zero() || u2_div == T::zero() {
        return None;
    }
    Some(Vector2::new(u1_num / u1_div, u2_num / u2_div))
}
