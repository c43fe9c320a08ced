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

/// Maps a slider weight in `[0, 1]` onto a calibrated value range.
///
/// The curve passes through `lo` at 0, `mid` at 0.5 and `hi` at 1, using
/// `w^exp * (hi - lo) + lo` with the exponent solved from the midpoint.
/// Either half can be made linear instead.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurveInterp {
    pub lo: f32,
    pub mid: f32,
    pub hi: f32,
    pub lo_linear: bool,
    pub hi_linear: bool,
    offset: f32,
    scale: f32,
    exp: f32,
}

impl CurveInterp {
    pub fn new(lo: f32, mid: f32, hi: f32, lo_linear: bool, hi_linear: bool) -> Self {
        let scale = hi - lo;
        let exp = -((mid - lo) / scale).log2();
        Self {
            lo,
            mid,
            hi,
            lo_linear,
            hi_linear,
            offset: lo,
            scale,
            exp,
        }
    }

    pub fn interp(&self, w: f32) -> f32 {
        if self.lo_linear && w < 0.5 {
            return lerp(self.lo, self.mid, w * 2.0);
        }
        if self.hi_linear && w > 0.5 {
            return lerp(self.mid, self.hi, (w - 0.5) * 2.0);
        }
        w.powf(self.exp) * self.scale + self.offset
    }

    pub fn exponent(&self) -> f32 {
        self.exp
    }
}

impl Default for CurveInterp {
    fn default() -> Self {
        Self::new(0.0, 0.5, 1.0, false, false)
    }
}

#[inline]
fn lerp(a: f32, b: f32, w: f32) -> f32 {
    a + (b - a) * w
}
