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

use log::{debug, trace};

use crate::error::{MeshError, Result};
use crate::geometry::{Vector2F, circumcircle};
use crate::mesh::basic_types::{GeomTriData, GeomVertData, NO_INDEX};
use crate::mesh::core::GeomMesh;

/// Triangle growth since the last compaction that triggers another one.
pub const COMPACT_TRI_THRESHOLD: usize = 100_000;

impl GeomMesh {
    /// Inserts `p` and restores the Delaunay property around it.
    ///
    /// The containing triangle is removed and each of its edges is handed to
    /// [`Self::add_delaunay_tri`], which grows the cavity across any neighbor
    /// whose circumcircle holds `p`. The open edges of the fans are then
    /// welded pairwise. A point equal to a corner of its containing
    /// triangle returns that corner.
    pub fn add_delaunay_vert(&mut self, p: Vector2F) -> Result<usize> {
        if self.tris.len().saturating_sub(self.compact_tri_count_last) > COMPACT_TRI_THRESHOLD {
            let removed = self.compact();
            debug!("periodic compaction removed {removed} records");
        }

        let Some(ti) = self.isect_tri(p) else {
            return Err(MeshError::PointNotContained { x: p.x, y: p.y });
        };

        let tri = self.tris[ti];
        if let Some(&existing) = tri.vi.iter().find(|&&vi| self.verts[vi].pos == p) {
            trace!("point ({}, {}) already present as vertex {existing}", p.x, p.y);
            return Ok(existing);
        }

        let vi = self.add_vert(p);
        self.delete_tri(ti);

        let mut open = [[NO_INDEX; 2]; 3];
        for (k, &ei) in tri.ei.iter().enumerate() {
            let forward = self.edges[ei].is_forward_tri(ti);
            open[k] = self.add_delaunay_tri(vi, ei, forward);
        }

        for i in 0..3 {
            for j in (i + 1)..3 {
                for &a in &open[i] {
                    for &b in &open[j] {
                        self.weld_edges(a, b);
                    }
                }
            }
        }

        trace!("inserted vertex {vi} at ({}, {}) in triangle {ti}", p.x, p.y);
        Ok(vi)
    }

    /// Fans vertex `vi` onto edge `ei`, seen from its `forward` side.
    ///
    /// If the triangle across `ei` has `vi` inside its circumcircle, it and
    /// `ei` are deleted and both of its other edges are fanned in turn.
    /// Otherwise a single triangle `(vi, v1, v2)` is created on `ei`.
    /// Returns the two edges of the fan that still lack a second triangle.
    fn add_delaunay_tri(&mut self, vi: usize, ei: usize, forward: bool) -> [usize; 2] {
        let edge = self.edges[ei];
        let (vi1, vi2) = if forward {
            (edge.vi[0], edge.vi[1])
        } else {
            (edge.vi[1], edge.vi[0])
        };
        let across = if forward { edge.ti[1] } else { edge.ti[0] };

        if let Some(ta) = across.filter(|&ta| self.tris[ta].is_valid()) {
            let tri_across = self.tris[ta];
            let va = tri_across.vert_across(ei);
            let circle = circumcircle(
                self.verts[va].pos.cast::<f64>(),
                self.verts[vi1].pos.cast::<f64>(),
                self.verts[vi2].pos.cast::<f64>(),
            );

            if circle.contains_point(&self.verts[vi].pos.cast::<f64>()) {
                let ei_after = tri_across.edge_after(ei);
                let ei_before = tri_across.edge_before(ei);
                let after_forward = self.edges[ei_after].is_forward_tri(ta);
                let before_forward = self.edges[ei_before].is_forward_tri(ta);

                self.delete_edge(ei);
                self.delete_tri(ta);

                let after = self.add_delaunay_tri(vi, ei_after, after_forward);
                let before = self.add_delaunay_tri(vi, ei_before, before_forward);

                let mut open = [NO_INDEX; 2];
                if self.weld_edges(before[0], after[0]) {
                    open = [before[1], after[1]];
                }
                if self.weld_edges(before[0], after[1]) {
                    open = [before[1], after[0]];
                }
                if self.weld_edges(before[1], after[0]) {
                    open = [before[0], after[1]];
                }
                if self.weld_edges(before[1], after[1]) {
                    open = [before[0], after[0]];
                }
                return open;
            }
        }

        let ti = self.tris.len();
        let ei0 = self.add_edge(vi, vi1, Some(ti), None);
        let ei2 = self.add_edge(vi2, vi, Some(ti), None);
        self.add_tri([vi, vi1, vi2], [ei0, ei, ei2]);
        let slot = if forward { 0 } else { 1 };
        self.edges[ei].ti[slot] = Some(ti);
        [ei0, ei2]
    }

    /// Merges edge `merge` into `keep` when both are valid and join the same
    /// two vertices. `keep` takes over the triangle of `merge`, which is then
    /// deleted.
    pub fn weld_edges(&mut self, keep: usize, merge: usize) -> bool {
        let (Some(a), Some(b)) = (self.edges.get(keep).copied(), self.edges.get(merge).copied())
        else {
            return false;
        };
        if keep == merge || !a.is_valid() || !b.is_valid() || !a.has_verts(b.vi[0], b.vi[1]) {
            return false;
        }

        let merged_tri = b.ti[0].or(b.ti[1]);
        let slot = if a.ti[0].is_none() { 0 } else { 1 };
        self.edges[keep].ti[slot] = merged_tri;

        for ti in self.edges[keep].ti.into_iter().flatten() {
            self.tris[ti].replace_edge(merge, keep);
        }
        self.delete_edge(merge);
        true
    }

    /// Flags with `FLAG_ERR` every valid vertex strictly inside the
    /// circumcircle of triangle `ti`, and returns how many there were.
    pub fn check_delaunay_tri(&mut self, ti: usize) -> usize {
        let tri = self.tris[ti];
        if !tri.is_valid() {
            return 0;
        }
        let circle = circumcircle(
            self.verts[tri.vi[0]].pos.cast::<f64>(),
            self.verts[tri.vi[1]].pos.cast::<f64>(),
            self.verts[tri.vi[2]].pos.cast::<f64>(),
        );
        let limit = circle.radius * (1.0 - 1e-6);

        let mut errors = 0;
        for (vi, v) in self.verts.iter_mut().enumerate() {
            if !v.is_valid() || tri.vi.contains(&vi) {
                continue;
            }
            if circle.center.distance(&v.pos.cast::<f64>()) < limit {
                v.flags |= GeomVertData::FLAG_ERR;
                errors += 1;
            }
        }
        if errors > 0 {
            self.tris[ti].flags |= GeomTriData::FLAG_ERR;
        }
        errors
    }

    /// Runs [`Self::check_delaunay_tri`] over every valid triangle.
    pub fn check_delaunay(&mut self) -> usize {
        (0..self.tris.len()).map(|ti| self.check_delaunay_tri(ti)).sum()
    }
}
