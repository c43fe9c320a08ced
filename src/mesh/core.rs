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

use std::sync::Arc;

use log::debug;

use crate::geometry::{Line2, Vector2F, circumcircle};
use crate::mesh::basic_types::{GeomEdgeData, GeomTriData, GeomVertData, NO_INDEX};
use crate::util::thread_pool::WorkerPool;

/// Arena mesh of vertices, edges and triangles addressed by index.
///
/// Deletion only invalidates records in place. Nothing is physically removed
/// until [`GeomMesh::compact`] runs, so indices stay stable between
/// compactions.
#[derive(Debug, Clone, Default)]
pub struct GeomMesh {
    pub verts: Vec<GeomVertData>,
    pub edges: Vec<GeomEdgeData>,
    pub tris: Vec<GeomTriData>,
    pub(crate) compact_tri_count_last: usize,
    pub(crate) pool: Option<Arc<WorkerPool>>,
}

impl GeomMesh {
    /// A mesh that locates points on the calling thread only.
    pub fn new() -> Self {
        Self::default()
    }

    /// A mesh that splits point location across `pool` once it grows large.
    pub fn with_pool(pool: Arc<WorkerPool>) -> Self {
        Self {
            pool: Some(pool),
            ..Self::default()
        }
    }

    pub fn pool(&self) -> Option<&Arc<WorkerPool>> {
        self.pool.as_ref()
    }

    pub fn vert_count(&self) -> usize {
        self.verts.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn tri_count(&self) -> usize {
        self.tris.len()
    }

    pub fn vert(&self, vi: usize) -> Option<&GeomVertData> {
        self.verts.get(vi)
    }

    pub fn edge(&self, ei: usize) -> Option<&GeomEdgeData> {
        self.edges.get(ei)
    }

    pub fn tri(&self, ti: usize) -> Option<&GeomTriData> {
        self.tris.get(ti)
    }

    pub fn valid_tri_count(&self) -> usize {
        self.tris.iter().filter(|t| t.is_valid()).count()
    }

    pub fn clear(&mut self) {
        self.verts.clear();
        self.edges.clear();
        self.tris.clear();
        self.compact_tri_count_last = 0;
    }

    pub fn add_vert(&mut self, pos: Vector2F) -> usize {
        self.verts.push(GeomVertData::new(pos));
        self.verts.len() - 1
    }

    pub fn add_edge(&mut self, vi0: usize, vi1: usize, ti0: Option<usize>, ti1: Option<usize>) -> usize {
        let tangent = Line2::new(self.verts[vi0].pos, self.verts[vi1].pos).tangent();
        self.edges.push(GeomEdgeData {
            vi: [vi0, vi1],
            ti: [ti0, ti1],
            tangent,
            flags: 0,
        });
        self.edges.len() - 1
    }

    pub fn add_tri(&mut self, vi: [usize; 3], ei: [usize; 3]) -> usize {
        let circle = circumcircle(
            self.verts[vi[0]].pos.cast::<f64>(),
            self.verts[vi[1]].pos.cast::<f64>(),
            self.verts[vi[2]].pos.cast::<f64>(),
        );
        self.tris.push(GeomTriData {
            vi,
            ei,
            circle,
            flags: 0,
        });
        self.tris.len() - 1
    }

    pub fn delete_edge(&mut self, ei: usize) {
        self.edges[ei].invalidate();
    }

    pub fn delete_tri(&mut self, ti: usize) {
        self.tris[ti].invalidate();
    }

    /// Side of edge `ei` on which `p` lies, seen from triangle `ti`:
    /// 1 inside, -1 outside, 0 on the line or at an endpoint.
    pub fn dir_point(&self, ei: usize, p: &Vector2F, ti: usize) -> i32 {
        let edge = &self.edges[ei];
        let p0 = self.verts[edge.vi[0]].pos;
        let p1 = self.verts[edge.vi[1]].pos;
        if *p == p0 || *p == p1 {
            return 0;
        }
        let orient = if edge.is_forward_tri(ti) { 1 } else { -1 };
        let f = (*p - p0).dot(&edge.tangent);
        let side = if f > 0.0 {
            1
        } else if f < 0.0 {
            -1
        } else {
            0
        };
        side * orient
    }

    /// Circumcircle pre-filter, then all three edge sides. Points on an edge
    /// or vertex count as contained.
    pub fn tri_contains_point(&self, ti: usize, p: &Vector2F) -> bool {
        let tri = &self.tris[ti];
        if !tri.circle.contains_point(&p.cast::<f64>()) {
            return false;
        }
        tri.ei.iter().all(|&ei| self.dir_point(ei, p, ti) >= 0)
    }

    /// Resets the mesh to a rectangle split into two triangles along the
    /// `(ul.x, lr.y)`-`(lr.x, ul.y)` diagonal.
    pub fn init_quad(&mut self, ul: Vector2F, lr: Vector2F) {
        self.clear();

        self.add_vert(Vector2F::new(ul.x, ul.y));
        self.add_vert(Vector2F::new(ul.x, lr.y));
        self.add_vert(Vector2F::new(lr.x, ul.y));
        self.add_vert(Vector2F::new(lr.x, lr.y));

        self.add_edge(0, 1, Some(0), None);
        self.add_edge(1, 2, Some(0), Some(1));
        self.add_edge(2, 0, Some(0), None);
        self.add_edge(1, 3, Some(1), None);
        self.add_edge(3, 2, Some(1), None);

        self.add_tri([0, 1, 2], [0, 1, 2]);
        self.add_tri([2, 1, 3], [1, 3, 4]);
    }

    /// Drops invalid triangles along with any vertex or edge no valid
    /// triangle uses, then renumbers what is left in order.
    ///
    /// Returns the number of records removed.
    pub fn compact(&mut self) -> usize {
        for v in self.verts.iter_mut() {
            v.flags |= GeomVertData::FLAG_CULLED;
        }
        for e in self.edges.iter_mut() {
            e.flags |= GeomEdgeData::FLAG_CULLED;
        }
        for ti in 0..self.tris.len() {
            let tri = self.tris[ti];
            if !tri.is_valid() {
                continue;
            }
            for k in 0..3 {
                self.verts[tri.vi[k]].flags &= !GeomVertData::FLAG_CULLED;
                self.edges[tri.ei[k]].flags &= !GeomEdgeData::FLAG_CULLED;
            }
        }

        let vert_remap = build_remap(self.verts.iter().map(GeomVertData::is_valid));
        let edge_remap = build_remap(self.edges.iter().map(GeomEdgeData::is_valid));
        let tri_remap = build_remap(self.tris.iter().map(GeomTriData::is_valid));

        let removed = vert_remap.removed + edge_remap.removed + tri_remap.removed;
        if removed > 0 {
            let verts: Vec<GeomVertData> = self
                .verts
                .iter()
                .zip(&vert_remap.map)
                .filter(|(_, m)| **m != NO_INDEX)
                .map(|(v, _)| *v)
                .collect();

            let edges: Vec<GeomEdgeData> = self
                .edges
                .iter()
                .zip(&edge_remap.map)
                .filter(|(_, m)| **m != NO_INDEX)
                .map(|(e, _)| {
                    let mut e = *e;
                    e.vi = e.vi.map(|vi| vert_remap.get(vi));
                    e.ti = e.ti.map(|ti| ti.map(|ti| tri_remap.get(ti)).filter(|&ti| ti != NO_INDEX));
                    e
                })
                .collect();

            let tris: Vec<GeomTriData> = self
                .tris
                .iter()
                .zip(&tri_remap.map)
                .filter(|(_, m)| **m != NO_INDEX)
                .map(|(t, _)| {
                    let mut t = *t;
                    t.vi = t.vi.map(|vi| vert_remap.get(vi));
                    t.ei = t.ei.map(|ei| edge_remap.get(ei));
                    t
                })
                .collect();

            self.verts = verts;
            self.edges = edges;
            self.tris = tris;
        }

        debug!(
            "compacted mesh: removed {} records, {} verts, {} edges, {} tris left",
            removed,
            self.verts.len(),
            self.edges.len(),
            self.tris.len()
        );
        self.compact_tri_count_last = self.tris.len();
        removed
    }
}

struct Remap {
    map: Vec<usize>,
    removed: usize,
}

impl Remap {
    fn get(&self, index: usize) -> usize {
        self.map.get(index).copied().unwrap_or(NO_INDEX)
    }
}

fn build_remap(valid: impl Iterator<Item = bool>) -> Remap {
    let mut map = Vec::new();
    let mut next = 0;
    let mut removed = 0;
    for is_valid in valid {
        if is_valid {
            map.push(next);
            next += 1;
        } else {
            map.push(NO_INDEX);
            removed += 1;
        }
    }
    Remap { map, removed }
}
