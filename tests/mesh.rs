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

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use topomesh::MeshError;
use topomesh::geometry::Vector2F;
use topomesh::mesh::{GeomMesh, GeomTriData};
use topomesh::util::WorkerPool;

fn quad_mesh() -> GeomMesh {
    let mut mesh = GeomMesh::new();
    mesh.init_quad(Vector2F::new(-0.1, -0.1), Vector2F::new(1.1, 1.1));
    mesh
}

fn random_points(seed: u64, count: usize) -> Vec<Vector2F> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| Vector2F::new(rng.random_range(0.0..1.0), rng.random_range(0.0..1.0)))
        .collect()
}

fn valid_tris(mesh: &GeomMesh) -> Vec<GeomTriData> {
    mesh.tris.iter().filter(|t| t.is_valid()).copied().collect()
}

#[test]
fn test_init_quad() {
    let mesh = quad_mesh();
    assert_eq!(mesh.vert_count(), 4);
    assert_eq!(mesh.edge_count(), 5);
    assert_eq!(mesh.tri_count(), 2);
    assert_eq!(mesh.tris[0].vi, [0, 1, 2]);
    assert_eq!(mesh.tris[1].vi, [2, 1, 3]);

    // The diagonal is shared by both triangles.
    assert_eq!(mesh.edges[1].ti, [Some(0), Some(1)]);
    assert!(mesh.tri_contains_point(0, &Vector2F::new(0.0, 0.0)));
    assert!(mesh.tri_contains_point(1, &Vector2F::new(1.0, 1.0)));
    assert!(!mesh.tri_contains_point(0, &Vector2F::new(1.0, 1.0)));
}

#[test]
fn test_insert_single_point() {
    let mut mesh = quad_mesh();
    let vi = mesh.add_delaunay_vert(Vector2F::new(0.3, 0.4)).unwrap();
    assert_eq!(vi, 4);
    assert_eq!(mesh.valid_tri_count(), 4);
    mesh.compact();
    assert_eq!(mesh.vert_count(), 5);
    assert_eq!(mesh.tri_count(), 4);
    assert_eq!(mesh.edge_count(), 8);
}

#[test]
fn test_random_insertion_is_delaunay() {
    let mut mesh = quad_mesh();
    for p in random_points(7, 200) {
        mesh.add_delaunay_vert(p).unwrap();
    }
    assert_eq!(mesh.check_delaunay(), 0);
}

#[test]
fn test_compact_keeps_planar_topology() {
    let mut mesh = quad_mesh();
    for p in random_points(11, 200) {
        mesh.add_delaunay_vert(p).unwrap();
    }
    mesh.compact();

    let v = mesh.vert_count() as i64;
    let e = mesh.edge_count() as i64;
    let f = mesh.tri_count() as i64;
    assert_eq!(v, 204);
    assert_eq!(v - e + f, 1);
    assert_eq!(f, 2 * v - 4 - 2);

    for (ti, tri) in mesh.tris.iter().enumerate() {
        assert!(tri.is_valid());
        for k in 0..3 {
            let edge = &mesh.edges[tri.ei[k]];
            assert!(edge.has_verts(tri.vi[k], tri.vi[(k + 1) % 3]));
            assert!(edge.ti.contains(&Some(ti)));
        }
    }
}

#[test]
fn test_compact_is_idempotent() {
    let mut mesh = quad_mesh();
    for p in random_points(3, 150) {
        mesh.add_delaunay_vert(p).unwrap();
    }
    mesh.compact();
    let verts = mesh.verts.clone();
    let edges = mesh.edges.clone();
    let tris = mesh.tris.clone();

    assert_eq!(mesh.compact(), 0);
    assert_eq!(mesh.verts, verts);
    assert_eq!(mesh.edges, edges);
    assert_eq!(mesh.tris, tris);
}

#[test]
fn test_point_location_single_triangle() {
    let mut mesh = quad_mesh();
    for p in random_points(21, 200) {
        mesh.add_delaunay_vert(p).unwrap();
    }
    mesh.compact();

    for p in random_points(99, 1000) {
        let ti = mesh.isect_tri(p).expect("point inside the guard quad");
        assert!(mesh.tri_contains_point(ti, &p));
        assert_eq!(mesh.find_enclosing_tris(p), vec![ti]);
    }
}

#[test]
fn test_point_outside_quad() {
    let mut mesh = quad_mesh();
    assert!(mesh.isect_tri(Vector2F::new(2.0, 0.5)).is_none());
    let err = mesh.add_delaunay_vert(Vector2F::new(2.0, 0.5)).unwrap_err();
    assert!(matches!(err, MeshError::PointNotContained { .. }));
    assert_eq!(mesh.vert_count(), 4);
}

#[test]
fn test_duplicate_point_returns_existing_vertex() {
    let mut mesh = quad_mesh();
    let p = Vector2F::new(0.25, 0.75);
    let vi = mesh.add_delaunay_vert(p).unwrap();
    let tri_count = mesh.valid_tri_count();

    assert_eq!(mesh.add_delaunay_vert(p).unwrap(), vi);
    assert_eq!(mesh.vert_count(), 5);
    assert_eq!(mesh.valid_tri_count(), tri_count);
}

#[test]
fn test_weld_edges_rejects_unrelated_edges() {
    let mut mesh = quad_mesh();
    // Edges 0 (0-1) and 4 (3-2) share no vertices.
    assert!(!mesh.weld_edges(0, 4));
    assert!(!mesh.weld_edges(0, 0));
    assert!(!mesh.weld_edges(0, 99));
}

#[test]
fn test_pooled_location_matches_serial() {
    let pool = Arc::new(WorkerPool::new(4).unwrap());
    let mut serial = quad_mesh();
    let mut pooled = GeomMesh::with_pool(pool);
    pooled.init_quad(Vector2F::new(-0.1, -0.1), Vector2F::new(1.1, 1.1));

    let points = random_points(5, 2500);
    for &p in &points {
        let a = serial.add_delaunay_vert(p).unwrap();
        let b = pooled.add_delaunay_vert(p).unwrap();
        assert_eq!(a, b);
    }
    assert!(pooled.tri_count() > 4000);
    assert_eq!(valid_tris(&serial), valid_tris(&pooled));

    for p in random_points(6, 200) {
        assert_eq!(serial.isect_tri(p), pooled.isect_tri(p));
    }
}
