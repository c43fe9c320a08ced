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

use crate::curves::BezierCurve;
use crate::geometry::{BoundsPixels, BoundsUv};
use crate::numeric::CurveInterp;

/// Low/mid/high anchors of one calibration curve.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterpAnchors {
    pub lo: f32,
    pub mid: f32,
    pub hi: f32,
}

impl InterpAnchors {
    pub const fn new(lo: f32, mid: f32, hi: f32) -> Self {
        Self { lo, mid, hi }
    }

    pub fn curve(&self, lo_linear: bool, hi_linear: bool) -> CurveInterp {
        CurveInterp::new(self.lo, self.mid, self.hi, lo_linear, hi_linear)
    }
}

/// Global defaults from which per-layer parameters are built.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MeshPreferences {
    pub inner_detail: InterpAnchors,
    pub outer_detail: InterpAnchors,
    pub falloff_detail: InterpAnchors,
    pub default_outer_detail: f32,
    pub default_inner_detail: f32,
    pub default_falloff_detail: f32,
}

impl Default for MeshPreferences {
    fn default() -> Self {
        Self {
            inner_detail: InterpAnchors::new(0.2, 0.015, 0.001),
            outer_detail: InterpAnchors::new(0.2, 0.015, 0.001),
            falloff_detail: InterpAnchors::new(1.0, 1.4, 2.0),
            default_outer_detail: 50.0,
            default_inner_detail: 50.0,
            default_falloff_detail: 40.0,
        }
    }
}

impl MeshPreferences {
    /// Parameters at the default slider values. The lower half of the
    /// falloff curve is linear.
    pub fn parameters(&self) -> DelaunayMeshParameters {
        DelaunayMeshParameters {
            outer_detail: self.default_outer_detail,
            inner_detail: self.default_inner_detail,
            falloff_detail: self.default_falloff_detail,
            outer_detail_interp: self.outer_detail.curve(false, false),
            inner_detail_interp: self.inner_detail.curve(false, false),
            falloff_detail_interp: self.falloff_detail.curve(true, false),
        }
    }
}

/// Slider values and the curves that turn them into algorithm settings.
///
/// `outer_detail` and `inner_detail` range over `[1, 100]`, and
/// `falloff_detail` over `[0, 100]`.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DelaunayMeshParameters {
    pub outer_detail: f32,
    pub inner_detail: f32,
    pub falloff_detail: f32,
    pub outer_detail_interp: CurveInterp,
    pub inner_detail_interp: CurveInterp,
    pub falloff_detail_interp: CurveInterp,
}

impl Default for DelaunayMeshParameters {
    fn default() -> Self {
        MeshPreferences::default().parameters()
    }
}

/// Two parameter sets are equal when their slider values are.
impl PartialEq for DelaunayMeshParameters {
    fn eq(&self, other: &Self) -> bool {
        self.outer_detail == other.outer_detail
            && self.inner_detail == other.inner_detail
            && self.falloff_detail == other.falloff_detail
    }
}

/// Layer raster and boundary curves to mesh.
#[derive(Debug, Clone, Default)]
pub struct DelaunayMeshInput {
    /// Per-channel buffers covering `bounds_pixels`, row-major. Four
    /// channels are ordered ARGB, three are RGB.
    pub pixels: Vec<Vec<u8>>,
    /// Boundary curves in source UV space. `None` entries are skipped.
    pub curves: Vec<Option<BezierCurve>>,
    /// Layer rectangle within the source image.
    pub bounds_pixels: BoundsPixels,
    /// Bounds of the curves in UV space, as reported by the caller.
    pub bounds_curves: BoundsUv,
    /// Source image width.
    pub width: i32,
    /// Source image height.
    pub height: i32,
    pub name: String,
}
