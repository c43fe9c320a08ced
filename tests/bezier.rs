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

use topomesh::curves::{Bezier, BezierCurve, PathPoints, PathRecord};
use topomesh::geometry::Vector2F;

fn arch() -> Bezier {
    Bezier::new(
        Vector2F::new(0.0, 0.0),
        Vector2F::new(0.3, 1.0),
        Vector2F::new(0.7, 1.0),
        Vector2F::new(1.0, 0.0),
    )
}

#[test]
fn test_crossing_diagonals() {
    let a = Bezier::linear(Vector2F::new(0.0, 0.0), Vector2F::new(1.0, 1.0));
    let b = Bezier::linear(Vector2F::new(0.0, 1.0), Vector2F::new(1.0, 0.0));
    let hits = a.find_all_intersections(&b, true);
    assert!(!hits.is_empty());
    for hit in &hits {
        assert!((hit.intersection_point.x - 0.5).abs() < 1e-4);
        assert!((hit.intersection_point.y - 0.5).abs() < 1e-4);
        assert!((hit.curve_a_percentage - 0.5).abs() < 1e-4);
        assert!((hit.curve_b_percentage - 0.5).abs() < 1e-4);
    }
}

#[test]
fn test_sub_pixel_crossing() {
    let c = Vector2F::new(0.5, 0.5);
    for arm in [1e-3f32, 1e-4, 5e-5] {
        let a = Bezier::linear(c - Vector2F::new(arm, arm), c + Vector2F::new(arm, arm));
        let b = Bezier::linear(c + Vector2F::new(-arm, arm), c + Vector2F::new(arm, -arm));
        let hits = a.find_all_intersections(&b, true);
        assert!(!hits.is_empty(), "arm {arm}");
        for hit in &hits {
            assert!((hit.intersection_point.x - 0.5).abs() < 1e-6);
            assert!((hit.intersection_point.y - 0.5).abs() < 1e-6);
            assert!((hit.curve_a_percentage - 0.5).abs() < 1e-2);
            assert!((hit.curve_b_percentage - 0.5).abs() < 1e-2);
        }
    }
}

#[test]
fn test_arch_crosses_line_twice() {
    let a = arch();
    let b = Bezier::linear(Vector2F::new(0.0, 0.5), Vector2F::new(1.0, 0.5));
    assert!(a.curve_depth() > 0);

    let hits = a.find_all_intersections(&b, true);
    assert!(hits.iter().all(|h| (h.intersection_point.y - 0.5).abs() < 1e-3));
    assert!(hits.iter().any(|h| (h.curve_a_percentage - 0.2113).abs() < 1e-3));
    assert!(hits.iter().any(|h| (h.curve_a_percentage - 0.7887).abs() < 1e-3));
    for h in &hits {
        let p = a.point_at(h.curve_a_percentage);
        assert!((p.y - 0.5).abs() < 1e-3);
    }
}

#[test]
fn test_disjoint_curves_do_not_intersect() {
    let a = arch();
    let b = Bezier::linear(Vector2F::new(0.0, 2.0), Vector2F::new(1.0, 2.0));
    assert!(!a.intersects_bounds(&b, true));
    assert!(a.find_all_intersections(&b, true).is_empty());
}

#[test]
fn test_point_belongs_to_curve() {
    let line = Bezier::linear(Vector2F::new(0.0, 0.0), Vector2F::new(1.0, 0.5));
    assert!(line.point_belongs_to_curve(&Vector2F::new(0.5, 0.25)));
    assert!(!line.point_belongs_to_curve(&Vector2F::new(0.5, 0.4)));
    assert!(!line.point_belongs_to_curve(&Vector2F::new(1.5, 0.75)));
}

#[test]
fn test_linear_intersection() {
    let a = Bezier::new(
        Vector2F::new(0.0, 0.0),
        Vector2F::new(0.0, 0.0),
        Vector2F::new(1.0, 1.0),
        Vector2F::new(1.0, 1.0),
    );
    let b = Bezier::new(
        Vector2F::new(0.0, 1.0),
        Vector2F::new(0.0, 1.0),
        Vector2F::new(1.0, 0.0),
        Vector2F::new(1.0, 0.0),
    );
    let hit = a.find_linear_intersection(&b, false).expect("chords cross");
    assert!((hit.intersection_point.x - 0.5).abs() < 1e-6);
    assert!((hit.intersection_point.y - 0.5).abs() < 1e-6);
    assert!((hit.curve_a_percentage - 0.5).abs() < 1e-6);
    assert!((hit.curve_b_percentage - 0.5).abs() < 1e-6);

    let c = Bezier::new(
        Vector2F::new(2.0, 0.0),
        Vector2F::new(2.0, 0.0),
        Vector2F::new(3.0, 1.0),
        Vector2F::new(3.0, 1.0),
    );
    assert!(a.find_linear_intersection(&c, false).is_none());
}

#[test]
fn test_linear_intersection_shared_endpoint() {
    let a = Bezier::new(
        Vector2F::new(0.0, 0.0),
        Vector2F::new(0.0, 0.0),
        Vector2F::new(1.0, 0.0),
        Vector2F::new(1.0, 0.0),
    );
    let b = Bezier::new(
        Vector2F::new(1.0, 0.0),
        Vector2F::new(1.0, 0.0),
        Vector2F::new(1.0, 1.0),
        Vector2F::new(1.0, 1.0),
    );
    let hit = a.find_linear_intersection(&b, true).expect("shared endpoint");
    assert_eq!(hit.intersection_point, Vector2F::new(1.0, 0.0));
    assert_eq!(hit.curve_b_percentage, 0.0);
    assert!(hit.curve_a_percentage < 1.0 && hit.curve_a_percentage > 0.999);
}

fn triangle_record(is_closed_path: bool) -> PathRecord {
    PathRecord {
        is_closed_path,
        points: vec![
            PathPoints::corner(Vector2F::new(0.2, 0.2)),
            PathPoints::corner(Vector2F::new(0.8, 0.2)),
            PathPoints::corner(Vector2F::new(0.5, 0.8)),
        ],
    }
}

#[test]
fn test_path_record_flattening() {
    let open = BezierCurve::from_path_record(&triangle_record(false));
    assert_eq!(open.len(), 2 * 201);
    assert_eq!(open.point(0), Some(Vector2F::new(0.2, 0.2)));

    let closed = BezierCurve::from_path_record(&triangle_record(true));
    assert_eq!(closed.len(), 2 * 201 + 1001);
    assert_eq!(closed.paths.len(), 3);

    let bounds = closed.bounds();
    assert!((bounds.min.x - 0.2).abs() < 1e-5);
    assert!((bounds.max.y - 0.8).abs() < 1e-5);
}

#[test]
fn test_short_path_has_no_samples() {
    let record = PathRecord {
        is_closed_path: true,
        points: vec![
            PathPoints::corner(Vector2F::new(0.2, 0.2)),
            PathPoints::corner(Vector2F::new(0.8, 0.2)),
        ],
    };
    let curve = BezierCurve::from_path_record(&record);
    assert!(curve.is_empty());
    assert_eq!(curve.paths.len(), 2);
}

#[test]
fn test_clamp_curve_points() {
    let mut curve = BezierCurve::from_points(vec![
        Vector2F::new(-0.5, 0.5),
        Vector2F::new(0.5, 1.5),
        Vector2F::new(0.3, 0.4),
    ]);
    curve.clamp_curve_points(Vector2F::new(0.0, 0.0), Vector2F::new(1.0, 1.0));
    assert_eq!(curve.points[0], Vector2F::new(0.0, 0.5));
    assert_eq!(curve.points[1], Vector2F::new(0.5, 1.0));
    assert_eq!(curve.points[2], Vector2F::new(0.3, 0.4));
}
