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

use crate::geometry::Vector2F;
use crate::mesh::core::GeomMesh;
use crate::util::thread_pool::FoundSlot;

/// Triangles scanned per worker before another worker is added.
pub const ISECT_TRI_COUNT_PER_THREAD: usize = 2000;
/// Upper bound on workers for a single lookup.
pub const ISECT_TRI_THREAD_MAX: usize = 8;
/// Workers re-read the shared result every this many triangles.
pub const ISECT_POLL_INTERVAL: usize = 256;

impl GeomMesh {
    /// Index of a valid triangle containing `p`, if any.
    ///
    /// Small meshes, and meshes without a pool, are scanned on the calling
    /// thread. Otherwise the triangle array is cut into contiguous ranges, one
    /// task per range, and the first task to find a match publishes it.
    /// Triangles never overlap, so at most one can match away from shared edges.
    pub fn isect_tri(&self, p: Vector2F) -> Option<usize> {
        let tri_count = self.tris.len();
        let slot = FoundSlot::new();

        let thread_count = self.isect_thread_count();
        match self.pool.as_ref() {
            Some(pool) if thread_count > 1 => {
                let span = tri_count / thread_count;
                pool.scope(|scope| {
                    for thread_index in 0..thread_count {
                        let begin = thread_index * span;
                        let end = if thread_index + 1 == thread_count {
                            tri_count
                        } else {
                            begin + span
                        };
                        let slot = &slot;
                        scope.spawn(move |_| {
                            self.isect_tri_range(&p, begin, end, thread_index, slot);
                        });
                    }
                });
            }
            _ => {
                self.isect_tri_range(&p, 0, tri_count, 0, &slot);
            }
        }

        slot.get().filter(|&ti| ti < tri_count)
    }

    /// Every valid triangle containing `p`. More than one only when `p` lies
    /// on a shared edge or vertex.
    pub fn find_enclosing_tris(&self, p: Vector2F) -> Vec<usize> {
        (0..self.tris.len())
            .filter(|&ti| self.tris[ti].is_valid() && self.tri_contains_point(ti, &p))
            .collect()
    }

    fn isect_thread_count(&self) -> usize {
        let tri_count = self.tris.len();
        if self.pool.is_none() || tri_count < 2 * ISECT_TRI_COUNT_PER_THREAD {
            return 1;
        }
        (tri_count / ISECT_TRI_COUNT_PER_THREAD).min(ISECT_TRI_THREAD_MAX)
    }

    fn isect_tri_range(
        &self,
        p: &Vector2F,
        begin: usize,
        end: usize,
        thread_index: usize,
        slot: &FoundSlot,
    ) -> Option<usize> {
        let mut found = slot.get();
        let mut ti = begin;
        while found.is_none() && ti < end {
            if ti % ISECT_POLL_INTERVAL == thread_index {
                found = slot.get();
                if found.is_some() {
                    break;
                }
            }
            if self.tris[ti].is_valid() && self.tri_contains_point(ti, p) {
                found = Some(slot.offer(ti));
            }
            ti += 1;
        }
        found
    }
}
