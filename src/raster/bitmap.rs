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

use std::ops::ControlFlow;

use crate::error::{MeshError, Result};
use crate::geometry::Vector2I;

/// Dense row-major grid of `T`.
#[derive(Debug, Clone, Default)]
pub struct Bitmap<T> {
    width: i32,
    height: i32,
    data: Vec<T>,
}

impl<T: Clone> Bitmap<T> {
    /// A `width` x `height` grid filled with `value`. Negative sizes give an
    /// empty grid. Fails if the storage cannot be reserved.
    pub fn new(width: i32, height: i32, value: T) -> Result<Self> {
        let width = width.max(0);
        let height = height.max(0);
        let len = width as usize * height as usize;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| MeshError::RasterAllocation {
                width: width as usize,
                height: height as usize,
            })?;
        data.resize(len, value);
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn is_valid(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.is_valid(x, y)
            .then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<&T> {
        self.index(x, y).map(|i| &self.data[i])
    }

    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut T> {
        self.index(x, y).map(|i| &mut self.data[i])
    }

    /// Writes `value` at `(x, y)`; coordinates outside the grid are ignored.
    pub fn set(&mut self, x: i32, y: i32, value: T) {
        if let Some(i) = self.index(x, y) {
            self.data[i] = value;
        }
    }

    /// Rasterizes the segment `p0`-`p1` with `value`.
    ///
    /// With `fill_corners`, each step in the minor axis also paints the pixel
    /// beside it, so the line stays 4-connected.
    pub fn draw_line(&mut self, value: &T, p0: Vector2I, p1: Vector2I, fill_corners: bool) {
        walk_line(p0, p1, fill_corners, |x, y| {
            self.set(x, y, value.clone());
            ControlFlow::Continue(())
        });
    }

    pub fn pixels(&self) -> &[T] {
        &self.data
    }
}

/// Visits the pixels of segment `p0`-`p1` and stops early when `visit`
/// breaks.
///
/// The walk steps one pixel at a time along the major axis, always from the
/// endpoint with the lower major coordinate. It can start at either input
/// point.
pub fn walk_line<F>(p0: Vector2I, p1: Vector2I, fill_corners: bool, mut visit: F)
where
    F: FnMut(i32, i32) -> ControlFlow<()>,
{
    let horizontal = (p1.x - p0.x).abs() > (p1.y - p0.y).abs();
    if horizontal {
        let (a, b) = if p0.x > p1.x { (p1, p0) } else { (p0, p1) };
        walk_major(a.x, a.y, b.x, b.y, fill_corners, |major, minor| visit(major, minor));
    } else {
        let (a, b) = if p0.y > p1.y { (p1, p0) } else { (p0, p1) };
        walk_major(a.y, a.x, b.y, b.x, fill_corners, |major, minor| visit(minor, major));
    }
}

fn walk_major<F>(major0: i32, minor0: i32, major1: i32, minor1: i32, fill_corners: bool, mut visit: F)
where
    F: FnMut(i32, i32) -> ControlFlow<()>,
{
    let span = (major1 - major0).max(1);
    let inc = (minor1 - minor0) as f32 / span as f32;
    let mut minor_f = minor0 as f32 + 0.5;
    let mut minor_prev = minor0;
    let mut major = major0;
    loop {
        let minor = minor_f as i32;
        if visit(major, minor).is_break() {
            return;
        }
        if fill_corners && minor != minor_prev && visit(major, minor_prev).is_break() {
            return;
        }
        minor_prev = minor;
        if major == major1 {
            break;
        }
        major += 1;
        minor_f += inc;
    }
}
