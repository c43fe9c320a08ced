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

use std::f32::consts::TAU;
use std::sync::Arc;

use topomesh::MeshError;
use topomesh::curves::BezierCurve;
use topomesh::geometry::{BoundsPixels, Vector2F, Vector2I};
use topomesh::mesh::GeomMesh;
use topomesh::mesh_generator::delaunay_algo::is_edge_interior;
use topomesh::mesh_generator::{
    DataMesh, DelaunayAlgo, DelaunayMesh, DelaunayMeshInput, DelaunayMeshParameters,
};
use topomesh::util::{CancelToken, ProgressTask, ProgressTracker, WorkerPool};

fn circle(center: Vector2F, radius: f32, count: usize) -> BezierCurve {
    let points = (0..count)
        .map(|i| {
            let a = TAU * i as f32 / count as f32;
            Vector2F::new(center.x + radius * a.cos(), center.y + radius * a.sin())
        })
        .collect();
    BezierCurve::from_points(points)
}

fn layer_input(width: i32, height: i32, curves: Vec<Option<BezierCurve>>) -> DelaunayMeshInput {
    let len = (width * height) as usize;
    DelaunayMeshInput {
        pixels: vec![vec![0u8; len]; 4],
        curves,
        bounds_pixels: BoundsPixels::new(0, 0, width, height),
        width,
        height,
        name: "layer".to_string(),
        ..Default::default()
    }
}

/// Asks to stop as soon as the first progress value arrives.
#[derive(Default)]
struct StopOnFirstUpdate {
    updates: usize,
    last: f32,
}

impl ProgressTask for StopOnFirstUpdate {
    fn set_value_and_update(&mut self, value: f32) {
        self.updates += 1;
        self.last = value;
    }

    fn is_cancelled(&self) -> bool {
        self.updates > 0
    }
}

fn circle_input() -> DelaunayMeshInput {
    layer_input(256, 256, vec![Some(circle(Vector2F::new(0.5, 0.5), 0.4, 32))])
}

fn generate(input: &DelaunayMeshInput) -> DataMesh {
    let mut progress = ProgressTracker::new();
    DelaunayMesh::new()
        .generate_mesh(&DelaunayMeshParameters::default(), input, &mut progress)
        .unwrap()
}

fn assert_well_formed(mesh: &DataMesh) {
    assert_eq!(mesh.face_sizes.len(), mesh.face_marks.len());
    assert_eq!(mesh.face_verts.len(), 3 * mesh.face_count());
    for (i, (&size, &mark)) in mesh.face_sizes.iter().zip(&mesh.face_marks).enumerate() {
        assert_eq!(size, 3);
        assert_eq!(mark, 3 * i);
    }
    assert!(mesh.face_verts.iter().all(|&vi| vi < mesh.vertex_count()));
}

#[test]
fn test_circle_layer() {
    let input = circle_input();
    let mesh = generate(&input);

    assert!(!mesh.is_empty());
    assert_well_formed(&mesh);
    assert!((400..=700).contains(&mesh.vertex_count()));
    assert!((800..=1400).contains(&mesh.face_count()));

    let center = Vector2F::new(0.5, 0.5);
    for v in &mesh.vertices {
        assert!(v.distance(&center) <= 0.4 + 1e-3);
    }

    assert_eq!(mesh.name, "layer");
    assert_eq!(mesh.width, 256.0);
    assert_eq!(mesh.height, 256.0);
    assert!((mesh.bounds_uv.min.x - 0.1).abs() < 1e-5);
    assert!((mesh.bounds_uv.max.y - 0.9).abs() < 1e-5);
}

#[test]
fn test_algo_settings() {
    let input = circle_input();
    let params = DelaunayMeshParameters::default();
    let algo = DelaunayAlgo::new(&params, &input, GeomMesh::new()).unwrap();

    assert_eq!(algo.height_step(), 7);
    assert!((algo.border_step() - 0.015198).abs() < 1e-5);
    assert!((algo.height_falloff() - 1.32).abs() < 1e-5);
    assert_eq!(algo.topo_map().width(), 414);
    assert_eq!(algo.topo_map().height(), 414);
    assert_eq!(algo.normal_map().width(), 206);

    // Guard quad only.
    assert_eq!(algo.mesh().vert_count(), 4);

    let p = Vector2F::new(0.25, 0.75);
    let back = algo.topo_space_to_source_uv(algo.source_uv_to_topo_space(p));
    assert!(back.distance(&p) < 1e-6);
}

#[test]
fn test_algo_marks_interior() {
    let input = circle_input();
    let params = DelaunayMeshParameters::default();
    let mut algo = DelaunayAlgo::new(&params, &input, GeomMesh::new()).unwrap();
    let mut progress = ProgressTracker::new();
    let mesh = algo.generate_mesh(&mut progress);
    assert!(!mesh.is_empty());

    assert_eq!(algo.border_lists().len(), 1);
    assert_eq!(algo.border_lists()[0].len(), 32);
    assert!(algo.border_lists()[0].iter().all(|b| b.vert_index.is_some()));

    let center = algo.topo_space_to_topo_pixel(Vector2F::new(0.5, 0.5));
    let topo = algo.topo_map();
    let center_pix = topo.get(center.x, center.y).unwrap();
    assert!(center_pix.is_interior());
    assert!(!center_pix.is_exterior());
    assert!(center_pix.height > 100);

    let corner = topo.get(0, 0).unwrap();
    assert!(corner.is_exterior());
    assert!(!corner.is_interior());
    assert_eq!(corner.height, 0);

    // A transparent layer is flat everywhere.
    let n = algo.normal_map().get(10, 10).unwrap();
    assert_eq!((n.x, n.y), (127, 127));
}

#[test]
fn test_topo_pixel_round_trip() {
    let input = circle_input();
    let params = DelaunayMeshParameters::default();
    let algo = DelaunayAlgo::new(&params, &input, GeomMesh::new()).unwrap();
    for p in [Vector2I::new(2, 2), Vector2I::new(100, 37), Vector2I::new(413, 413)] {
        let v = algo.topo_pixel_to_topo_space(p);
        assert_eq!(algo.topo_space_to_topo_pixel(v), p);
    }
}

#[test]
fn test_two_separate_curves() {
    let input = layer_input(
        256,
        256,
        vec![
            Some(circle(Vector2F::new(0.3, 0.5), 0.15, 32)),
            None,
            Some(circle(Vector2F::new(0.7, 0.5), 0.15, 32)),
        ],
    );
    let mesh = generate(&input);
    assert_well_formed(&mesh);

    let left = Vector2F::new(0.3, 0.5);
    let right = Vector2F::new(0.7, 0.5);
    let near_left = mesh.vertices.iter().filter(|v| v.distance(&left) <= 0.151).count();
    let near_right = mesh.vertices.iter().filter(|v| v.distance(&right) <= 0.151).count();
    assert!(near_left > 50);
    assert!(near_right > 50);
    assert_eq!(near_left + near_right, mesh.vertex_count());
}

#[test]
fn test_wide_image() {
    let input = layer_input(512, 256, vec![Some(circle(Vector2F::new(0.5, 0.5), 0.4, 32))]);
    let mesh = generate(&input);
    assert!(!mesh.is_empty());
    assert_well_formed(&mesh);
    for v in &mesh.vertices {
        assert!(v.x >= 0.1 - 1e-3 && v.x <= 0.9 + 1e-3);
        assert!(v.y >= 0.1 - 1e-3 && v.y <= 0.9 + 1e-3);
    }
}

#[test]
fn test_pooled_generator_matches_serial() {
    let input = circle_input();
    let serial = generate(&input);

    let pool = Arc::new(WorkerPool::new(2).unwrap());
    let generator = DelaunayMesh::with_pool(pool);
    let mut progress = ProgressTracker::new();
    let pooled = generator
        .generate_mesh(&DelaunayMeshParameters::default(), &input, &mut progress)
        .unwrap();
    assert_eq!(serial, pooled);
}

#[test]
fn test_cancelled_generation_is_empty() {
    let input = circle_input();
    let token = CancelToken::new();
    token.cancel();
    let mut progress = ProgressTracker::with_cancel(token);
    let mesh = DelaunayMesh::new()
        .generate_mesh(&DelaunayMeshParameters::default(), &input, &mut progress)
        .unwrap();
    assert!(mesh.is_empty());
    assert_eq!(progress.update_count(), 0);
}

#[test]
fn test_cancel_during_point_insertion() {
    let input = layer_input(256, 256, vec![Some(circle(Vector2F::new(0.5, 0.5), 0.4, 64))]);
    let params = DelaunayMeshParameters {
        inner_detail: 90.0,
        outer_detail: 90.0,
        ..Default::default()
    };
    let mut progress = StopOnFirstUpdate::default();
    let mesh = DelaunayMesh::new()
        .generate_mesh(&params, &input, &mut progress)
        .unwrap();

    assert_eq!(progress.updates, 1);
    assert!(progress.last > 0.0 && progress.last <= 1.0);
    assert!(mesh.is_empty());
    assert_eq!(mesh.vertex_count(), 0);
}

#[test]
fn test_normals_follow_alpha_gradient() {
    let mut input = circle_input();
    for (i, alpha) in input.pixels[0].iter_mut().enumerate() {
        let x = i % 256;
        *alpha = (32 * x).min(255) as u8;
    }
    let params = DelaunayMeshParameters::default();
    let mut algo = DelaunayAlgo::new(&params, &input, GeomMesh::new()).unwrap();
    algo.generate_mesh(&mut ProgressTracker::new());

    // Alpha rises toward +x, so the normal tilts toward +x only.
    let n = algo.normal_map().get(3, 10).unwrap();
    assert!(n.x > 127, "{n:?}");
    assert_eq!(n.y, 127);
    assert!(n.z < 255, "{n:?}");

    // Saturated alpha is flat again.
    let flat = algo.normal_map().get(100, 10).unwrap();
    assert_eq!((flat.x, flat.y, flat.z), (127, 127, 255));
}

#[test]
fn test_degenerate_inputs_are_empty() {
    assert!(generate(&layer_input(256, 256, Vec::new())).is_empty());
    assert!(generate(&layer_input(256, 256, vec![None, None])).is_empty());
    assert!(generate(&layer_input(256, 256, vec![Some(BezierCurve::default())])).is_empty());

    let mut input = circle_input();
    input.width = 0;
    assert!(generate(&input).is_empty());

    // Samples closer together than the border step collapse below three.
    let tiny = layer_input(256, 256, vec![Some(circle(Vector2F::new(0.5, 0.5), 0.001, 16))]);
    assert!(generate(&tiny).is_empty());
}

#[test]
fn test_far_out_curve_points_are_clamped() {
    let mut curve = circle(Vector2F::new(0.5, 0.5), 0.4, 32);
    curve.points[0] = Vector2F::new(1e30, 1e30);
    curve.points[16] = Vector2F::new(-1e30, f32::MAX);
    let input = layer_input(256, 256, vec![Some(curve)]);

    let params = DelaunayMeshParameters::default();
    let algo = DelaunayAlgo::new(&params, &input, GeomMesh::new()).unwrap();
    assert!((algo.bounds().min.x + 0.05).abs() < 1e-5);
    assert!((algo.bounds().max.x - 1.05).abs() < 1e-5);
    assert!((algo.bounds().max.y - 1.05).abs() < 1e-5);
    assert_eq!(algo.topo_map().width(), 567);

    let far = algo.topo_space_to_topo_pixel(Vector2F::new(1e30, -1e30));
    assert_eq!(far.x, i32::MAX);
    assert!(far.y < 0);

    let mesh = generate(&input);
    assert_well_formed(&mesh);
    for v in &mesh.vertices {
        assert!(v.is_finite());
        assert!((-0.05..=1.05).contains(&v.x) && (-0.05..=1.05).contains(&v.y), "{v:?}");
    }
}

#[test]
fn test_short_pixel_buffer() {
    let mut input = circle_input();
    input.pixels[2].truncate(100);
    let mut progress = ProgressTracker::new();
    let err = DelaunayMesh::new()
        .generate_mesh(&DelaunayMeshParameters::default(), &input, &mut progress)
        .unwrap_err();
    match err {
        MeshError::PixelBufferTooSmall {
            channel,
            expected,
            found,
        } => {
            assert_eq!(channel, 2);
            assert_eq!(expected, 256 * 256);
            assert_eq!(found, 100);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_edge_interior_angle() {
    let cur = Vector2F::new(0.0, 0.0);
    let prev = Vector2F::new(-1.0, 0.0);
    let next = Vector2F::new(1.0, 0.0);
    // Sweeping from prev to next through atan2(dx, dy) covers positive y.
    assert!(is_edge_interior(prev, cur, next, Vector2F::new(0.0, 1.0)));
    assert!(!is_edge_interior(prev, cur, next, Vector2F::new(0.0, -1.0)));
    assert!(!is_edge_interior(prev, cur, next, prev));
}
