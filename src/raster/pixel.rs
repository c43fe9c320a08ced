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

/// Cell of the topographic raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TopoPix {
    pub flags: u16,
    /// Approximate step distance from the nearest boundary pixel.
    pub height: u16,
    /// Curve that drew this pixel, for boundary pixels.
    pub curve_index: u32,
    /// Segment of that curve, for boundary pixels.
    pub segment_index: u32,
}

impl TopoPix {
    pub const FLAG_EXTERIOR: u16 = 1;
    pub const FLAG_INTERIOR: u16 = 2;
    pub const FLAG_BORDER: u16 = 4;
    /// Selected as a mesh sample point.
    pub const FLAG_VERT: u16 = 8;
    /// Too close to a selected sample point to be selected itself.
    pub const FLAG_NOVERT: u16 = 16;

    pub fn new(flags: u16, height: u16, curve_index: u32, segment_index: u32) -> Self {
        Self {
            flags,
            height,
            curve_index,
            segment_index,
        }
    }

    pub fn has_flag(&self, flag: u16) -> bool {
        self.flags & flag != 0
    }

    pub fn is_exterior(&self) -> bool {
        self.has_flag(Self::FLAG_EXTERIOR)
    }

    pub fn is_interior(&self) -> bool {
        self.has_flag(Self::FLAG_INTERIOR)
    }

    pub fn is_border(&self) -> bool {
        self.has_flag(Self::FLAG_BORDER)
    }

    pub fn is_segment(&self, curve_index: u32, segment_index: u32) -> bool {
        self.curve_index == curve_index && self.segment_index == segment_index
    }
}

/// Encoded surface normal: each component maps `[-1, 1]` onto `[0, 255]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalPix {
    pub x: u8,
    pub y: u8,
    pub z: u8,
}

impl NormalPix {
    /// Straight out of the image plane.
    pub const FLAT: NormalPix = NormalPix::new(127, 127, 255);

    pub const fn new(x: u8, y: u8, z: u8) -> Self {
        Self { x, y, z }
    }

    pub fn encode(x: f32, y: f32, z: f32) -> Self {
        let channel = |s: f32| (127.5 + 127.5 * s) as u8;
        Self::new(channel(x), channel(y), channel(z))
    }
}

impl Default for NormalPix {
    fn default() -> Self {
        Self::FLAT
    }
}

/// One source pixel gathered from the per-channel buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorPix {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ColorPix {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}
