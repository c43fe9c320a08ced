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

use crate::geometry::{CircleD, Vector2F};

/// Vertex or edge slot of a deleted record.
pub const NO_INDEX: usize = usize::MAX;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeomVertData {
    pub pos: Vector2F,
    pub flags: u32,
}

impl GeomVertData {
    pub const FLAG_ERR: u32 = 1;
    pub const FLAG_CULLED: u32 = 2;
    /// Sampled from a boundary curve.
    pub const FLAG_BORDER: u32 = 4;

    pub fn new(pos: Vector2F) -> Self {
        Self { pos, flags: 0 }
    }

    pub fn is_valid(&self) -> bool {
        self.flags & Self::FLAG_CULLED == 0
    }

    pub fn has_flag(&self, flag: u32) -> bool {
        self.flags & flag != 0
    }
}

/// Edge between two vertices, shared by up to two triangles.
///
/// `ti[0]` is the forward triangle, which traverses the edge from `vi[0]` to
/// `vi[1]`; `ti[1]` traverses it the other way. `tangent` is the unit normal
/// pointing into the forward triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeomEdgeData {
    pub vi: [usize; 2],
    pub ti: [Option<usize>; 2],
    pub tangent: Vector2F,
    pub flags: u32,
}

impl GeomEdgeData {
    pub const FLAG_ERR: u32 = 1;
    pub const FLAG_CULLED: u32 = 2;
    /// Crosses the inside of a boundary.
    pub const FLAG_INTERIOR: u32 = 4;

    pub fn is_valid(&self) -> bool {
        self.flags & Self::FLAG_CULLED == 0 && self.vi[0] != NO_INDEX && self.vi[1] != NO_INDEX
    }

    pub fn has_flag(&self, flag: u32) -> bool {
        self.flags & flag != 0
    }

    pub fn is_forward_tri(&self, ti: usize) -> bool {
        self.ti[0] == Some(ti)
    }

    pub fn has_verts(&self, a: usize, b: usize) -> bool {
        (self.vi[0] == a && self.vi[1] == b) || (self.vi[0] == b && self.vi[1] == a)
    }

    /// The endpoint that is not `vi`.
    pub fn other_vert(&self, vi: usize) -> usize {
        if self.vi[0] == vi { self.vi[1] } else { self.vi[0] }
    }

    pub(crate) fn invalidate(&mut self) {
        self.vi = [NO_INDEX; 2];
        self.ti = [None; 2];
    }
}

/// Triangle with vertices and edges in traversal order: `ei[k]` joins
/// `vi[k]` and `vi[(k + 1) % 3]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeomTriData {
    pub vi: [usize; 3],
    pub ei: [usize; 3],
    pub circle: CircleD,
    pub flags: u32,
}

impl GeomTriData {
    pub const FLAG_ERR: u32 = 1;
    pub const FLAG_CULLED: u32 = 2;

    pub fn is_valid(&self) -> bool {
        self.flags & Self::FLAG_CULLED == 0
            && self.vi.iter().all(|&v| v != NO_INDEX)
            && self.ei.iter().all(|&e| e != NO_INDEX)
    }

    pub fn has_flag(&self, flag: u32) -> bool {
        self.flags & flag != 0
    }

    /// Vertex opposite the edge `ei`.
    pub fn vert_across(&self, ei: usize) -> usize {
        if ei == self.ei[0] {
            self.vi[2]
        } else if ei == self.ei[1] {
            self.vi[0]
        } else {
            self.vi[1]
        }
    }

    pub fn edge_after(&self, ei: usize) -> usize {
        if ei == self.ei[0] {
            self.ei[1]
        } else if ei == self.ei[1] {
            self.ei[2]
        } else {
            self.ei[0]
        }
    }

    pub fn edge_before(&self, ei: usize) -> usize {
        if ei == self.ei[0] {
            self.ei[2]
        } else if ei == self.ei[1] {
            self.ei[0]
        } else {
            self.ei[1]
        }
    }

    pub fn replace_edge(&mut self, find: usize, replace: usize) {
        for e in self.ei.iter_mut() {
            if *e == find {
                *e = replace;
            }
        }
    }

    pub(crate) fn invalidate(&mut self) {
        self.vi = [NO_INDEX; 3];
        self.ei = [NO_INDEX; 3];
    }
}
