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

use crate::geometry::{BoundsUv, Vector2F};

/// Flat polygon mesh handed back to the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataMesh {
    pub name: String,
    pub width: f32,
    pub height: f32,
    pub bounds_uv: BoundsUv,
    /// Positions in source UV space.
    pub vertices: Vec<Vector2F>,
    /// Vertex count of each face.
    pub face_sizes: Vec<usize>,
    /// Offset of each face's first index in `face_verts`.
    pub face_marks: Vec<usize>,
    pub face_verts: Vec<usize>,
}

impl DataMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_values(
        &mut self,
        vertices: Vec<Vector2F>,
        face_sizes: Vec<usize>,
        face_marks: Vec<usize>,
        face_verts: Vec<usize>,
    ) {
        self.vertices = vertices;
        self.face_sizes = face_sizes;
        self.face_marks = face_marks;
        self.face_verts = face_verts;
    }

    /// Appends a face over existing vertices.
    pub fn add_face(&mut self, verts: &[usize]) {
        self.face_sizes.push(verts.len());
        self.face_marks.push(self.face_verts.len());
        self.face_verts.extend_from_slice(verts);
    }

    /// Indices of face `face`, if it exists.
    pub fn face(&self, face: usize) -> Option<&[usize]> {
        let start = *self.face_marks.get(face)?;
        let size = *self.face_sizes.get(face)?;
        self.face_verts.get(start..start + size)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.face_sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.face_sizes.is_empty()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.face_sizes.clear();
        self.face_marks.clear();
        self.face_verts.clear();
    }
}
