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

use crate::curves::bezier::Bezier;
use crate::geometry::{BoundsUv, Vector2F};

/// Parameter step for the spans of an open path.
pub const OPEN_SPAN_STEP: f32 = 0.005;
/// Parameter step for the span that closes a closed path.
pub const CLOSING_SPAN_STEP: f32 = 0.001;

/// One control point of a vector path, with its incoming and outgoing handles.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathPoints {
    pub is_linked: bool,
    pub anchor_point: Vector2F,
    pub seg_in: Vector2F,
    pub seg_out: Vector2F,
}

impl PathPoints {
    /// A corner point whose handles sit on the anchor.
    pub fn corner(anchor_point: Vector2F) -> Self {
        Self {
            is_linked: false,
            anchor_point,
            seg_in: anchor_point,
            seg_out: anchor_point,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathRecord {
    pub is_closed_path: bool,
    pub points: Vec<PathPoints>,
}

/// A boundary curve: its control points and the dense polyline sampled
/// from them, in source UV space.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BezierCurve {
    pub paths: Vec<PathPoints>,
    pub points: Vec<Vector2F>,
}

impl BezierCurve {
    /// Wraps a polyline that was already flattened elsewhere.
    pub fn from_points(points: Vec<Vector2F>) -> Self {
        Self {
            paths: Vec::new(),
            points,
        }
    }

    /// Samples every span of `record`.
    ///
    /// Paths with two control points or fewer produce no samples. Closed
    /// paths get an extra, more finely sampled span from the last control
    /// point back to the first.
    pub fn from_path_record(record: &PathRecord) -> Self {
        let mut curve = Self {
            paths: record.points.clone(),
            points: Vec::new(),
        };
        let paths = &record.points;
        if paths.len() <= 2 {
            return curve;
        }

        for pair in paths.windows(2) {
            sample_span(&pair[0], &pair[1], OPEN_SPAN_STEP, &mut curve.points);
        }
        if record.is_closed_path {
            sample_span(&paths[paths.len() - 1], &paths[0], CLOSING_SPAN_STEP, &mut curve.points);
        }
        curve
    }

    pub fn point(&self, index: usize) -> Option<Vector2F> {
        self.points.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn bounds(&self) -> BoundsUv {
        BoundsUv::from_points(&self.points)
    }

    pub fn clamp_curve_points(&mut self, min: Vector2F, max: Vector2F) {
        for p in self.points.iter_mut() {
            p.x = p.x.max(min.x).min(max.x);
            p.y = p.y.max(min.y).min(max.y);
        }
    }
}

fn sample_span(from: &PathPoints, to: &PathPoints, step: f32, out: &mut Vec<Vector2F>) {
    let span = Bezier::new(from.anchor_point, from.seg_out, to.seg_in, to.anchor_point);
    let mut t = 0.0f32;
    while t <= 1.0 {
        out.push(span.point_at(t));
        t += step;
    }
}
