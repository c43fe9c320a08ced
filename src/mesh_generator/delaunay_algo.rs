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

//! Topographic point placement and interior classification.
//!
//! The boundary curves are drawn into a raster that is swept into an
//! approximate distance-from-boundary field. Sample points are picked on
//! evenly spaced height rungs and triangulated together with spaced-out curve
//! points. Triangles outside every boundary are then discarded by flood
//! filling the raster from the edges that leave each boundary inward.
//!
//! Three coordinate spaces are involved:
//! - source UV: `[0, 1]` across the whole image on both axes.
//! - topo space: UV scaled so that the longer image axis spans `[0, 1]` and
//!   distances are isotropic. The mesh lives here.
//! - topo pixels: topo space scaled by the raster resolution, offset to
//!   the cropped raster origin and padded.

use std::collections::VecDeque;
use std::f32::consts::TAU;
use std::ops::ControlFlow;

use ahash::AHashMap;
use log::{debug, info, warn};
use smallvec::SmallVec;

use crate::curves::BezierCurve;
use crate::error::Result;
use crate::geometry::{BoundsUv, Vector2F, Vector2I};
use crate::mesh::basic_types::{GeomEdgeData, GeomVertData};
use crate::mesh::core::GeomMesh;
use crate::mesh_generator::data_mesh::DataMesh;
use crate::mesh_generator::parameters::{DelaunayMeshInput, DelaunayMeshParameters};
use crate::raster::{Bitmap, ColorPix, NormalPix, TopoPix, walk_line};
use crate::util::progress::ProgressTask;

/// Largest raster dimension, in pixels, for the longer image axis.
pub const TOPO_BITMAP_MAXIMUM: i32 = 4096;
/// Blank pixels around the cropped raster so the sweeps start outside.
pub const TOPO_BITMAP_PADDING: i32 = 2;
/// Guard rectangle every inserted point must fall inside, in topo space.
pub const GUARD_QUAD_MIN: Vector2F = Vector2F::new(-0.1, -0.1);
pub const GUARD_QUAD_MAX: Vector2F = Vector2F::new(1.1, 1.1);
/// Edges reaching further than this outside `[0, 1]` touch the guard quad.
pub const GUARD_EDGE_MARGIN: f32 = 0.05;
/// Points inserted between progress reports.
pub const PROGRESS_INTERVAL: usize = 1000;

/// A sample kept from a boundary curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BorderVert {
    /// Index of the sample in the curve's polyline.
    pub knot_index: usize,
    /// Mesh vertex created for it, once inserted.
    pub vert_index: Option<usize>,
}

type VertEdgeLookup = AHashMap<usize, SmallVec<[usize; 8]>>;

pub struct DelaunayAlgo<'a> {
    input: &'a DelaunayMeshInput,
    curves: Vec<Option<BezierCurve>>,
    mesh: GeomMesh,
    topo: Bitmap<TopoPix>,
    normals: Bitmap<NormalPix>,
    border_lists: Vec<Vec<BorderVert>>,
    bounds: BoundsUv,
    border_step: f32,
    height_step: i32,
    height_falloff: f32,
    topo_bitmap_maximum: i32,
    topo_bitmap_pos: Vector2I,
    topo_space_range: Vector2F,
    points_total: usize,
    points_finished: usize,
}

impl<'a> DelaunayAlgo<'a> {
    /// Derives spacing settings from `params`, sizes both rasters to the
    /// curve bounds and seeds `mesh` with the guard quad.
    ///
    /// `input` must have positive dimensions. Fails only when a raster
    /// cannot be allocated.
    pub fn new(
        params: &DelaunayMeshParameters,
        input: &'a DelaunayMeshInput,
        mut mesh: GeomMesh,
    ) -> Result<Self> {
        let image_w = input.width as f32;
        let image_h = input.height as f32;

        let topo_bitmap_maximum = TOPO_BITMAP_MAXIMUM.min(2 * input.width.max(input.height)).max(1);
        let topo_max = topo_bitmap_maximum as f32;

        let border_step = params
            .outer_detail_interp
            .interp((params.outer_detail - 1.0) / 99.0)
            .max(2.0 / topo_max);
        let height_step = ((params.inner_detail_interp.interp((params.inner_detail - 1.0) / 99.0)
            * topo_max) as i32)
            .max(2);
        let height_falloff = params.falloff_detail_interp.interp(params.falloff_detail / 100.0);

        let topo_space_range = if input.width > input.height {
            Vector2F::new(1.0, image_h / image_w)
        } else {
            Vector2F::new(image_w / image_h, 1.0)
        };

        // Curve points outside the culling margin are pulled onto it.
        let curve_lo = Vector2F::new(-GUARD_EDGE_MARGIN, -GUARD_EDGE_MARGIN);
        let curve_hi = Vector2F::new(1.0 + GUARD_EDGE_MARGIN, 1.0 + GUARD_EDGE_MARGIN);
        let curves: Vec<Option<BezierCurve>> = input
            .curves
            .iter()
            .map(|curve| {
                curve.as_ref().map(|curve| {
                    let mut curve = curve.clone();
                    curve.clamp_curve_points(curve_lo, curve_hi);
                    curve
                })
            })
            .collect();
        if curves != input.curves {
            warn!("curve points outside [{}, {}] were clamped", curve_lo.x, curve_hi.x);
        }

        let bounds = curves
            .iter()
            .flatten()
            .fold(BoundsUv::default(), |acc, curve| acc.union(&curve.bounds()));

        let max_x = (topo_max * topo_space_range.x) as i32;
        let max_y = (topo_max * topo_space_range.y) as i32;
        let topo_bitmap_pos = Vector2I::new(
            (max_x as f32 * bounds.min.x) as i32,
            (max_y as f32 * bounds.min.y) as i32,
        );
        let topo_hi = Vector2I::new(
            (max_x as f32 * bounds.max.x) as i32,
            (max_y as f32 * bounds.max.y) as i32,
        );
        let topo = Bitmap::new(
            raster_extent(topo_bitmap_pos.x, topo_hi.x, TOPO_BITMAP_PADDING),
            raster_extent(topo_bitmap_pos.y, topo_hi.y, TOPO_BITMAP_PADDING),
            TopoPix::default(),
        )?;

        let img_lo = Vector2I::new((image_w * bounds.min.x) as i32, (image_h * bounds.min.y) as i32);
        let img_hi = Vector2I::new((image_w * bounds.max.x) as i32, (image_h * bounds.max.y) as i32);
        let normals = Bitmap::new(
            raster_extent(img_lo.x, img_hi.x, 0),
            raster_extent(img_lo.y, img_hi.y, 0),
            NormalPix::FLAT,
        )?;

        debug!(
            "delaunay setup: border step {border_step}, height step {height_step}, falloff {height_falloff}, topo raster {}x{}",
            topo.width(),
            topo.height()
        );

        mesh.init_quad(GUARD_QUAD_MIN, GUARD_QUAD_MAX);

        Ok(Self {
            input,
            curves,
            mesh,
            topo,
            normals,
            border_lists: Vec::new(),
            bounds,
            border_step,
            height_step,
            height_falloff,
            topo_bitmap_maximum,
            topo_bitmap_pos,
            topo_space_range,
            points_total: 0,
            points_finished: 0,
        })
    }

    /// Runs every phase in order, checking `progress` for cancellation
    /// between them. A cancelled run returns an empty mesh.
    pub fn generate_mesh(&mut self, progress: &mut dyn ProgressTask) -> DataMesh {
        if !progress.is_cancelled() {
            self.init_border_points();
            self.draw_height();
            self.draw_normals();
            self.draw_points();
        }
        if !progress.is_cancelled() {
            self.add_height_points(progress);
        }
        if !progress.is_cancelled() {
            for curve_index in 0..self.border_lists.len() {
                if progress.is_cancelled() {
                    break;
                }
                self.add_border_points(curve_index, progress);
            }
        }

        let mut mesh_out = DataMesh::new();
        if !progress.is_cancelled() {
            self.draw_interior();
            self.remove_interior_tris();
            self.mesh.compact();
            self.get_data_mesh(&mut mesh_out);
            info!(
                "generated mesh '{}': {} vertices, {} faces",
                mesh_out.name,
                mesh_out.vertex_count(),
                mesh_out.face_count()
            );
        } else {
            debug!("mesh generation cancelled");
        }
        mesh_out
    }

    pub fn mesh(&self) -> &GeomMesh {
        &self.mesh
    }

    pub fn topo_map(&self) -> &Bitmap<TopoPix> {
        &self.topo
    }

    pub fn normal_map(&self) -> &Bitmap<NormalPix> {
        &self.normals
    }

    pub fn border_lists(&self) -> &[Vec<BorderVert>] {
        &self.border_lists
    }

    /// Union of the bounds of every input curve, after clamping.
    pub fn bounds(&self) -> BoundsUv {
        self.bounds
    }

    pub fn border_step(&self) -> f32 {
        self.border_step
    }

    pub fn height_step(&self) -> i32 {
        self.height_step
    }

    pub fn height_falloff(&self) -> f32 {
        self.height_falloff
    }

    pub fn source_uv_to_topo_space(&self, v: Vector2F) -> Vector2F {
        Vector2F::new(v.x * self.topo_space_range.x, v.y * self.topo_space_range.y)
    }

    pub fn topo_space_to_source_uv(&self, v: Vector2F) -> Vector2F {
        Vector2F::new(v.x / self.topo_space_range.x, v.y / self.topo_space_range.y)
    }

    pub fn topo_space_to_topo_pixel(&self, v: Vector2F) -> Vector2I {
        let scale = self.topo_bitmap_maximum as f32;
        Vector2I::new(
            ((v.x * scale) as i32)
                .saturating_sub(self.topo_bitmap_pos.x)
                .saturating_add(TOPO_BITMAP_PADDING),
            ((v.y * scale) as i32)
                .saturating_sub(self.topo_bitmap_pos.y)
                .saturating_add(TOPO_BITMAP_PADDING),
        )
    }

    /// Center of topo pixel `p`.
    pub fn topo_pixel_to_topo_space(&self, p: Vector2I) -> Vector2F {
        let scale = self.topo_bitmap_maximum as f32;
        Vector2F::new(
            ((p.x - TOPO_BITMAP_PADDING + self.topo_bitmap_pos.x) as f32 + 0.5) / scale,
            ((p.y - TOPO_BITMAP_PADDING + self.topo_bitmap_pos.y) as f32 + 0.5) / scale,
        )
    }

    /// Keeps curve samples spaced more than `border_step` apart, measured in
    /// aspect-corrected UV. Spacing carries over from one curve to the next.
    fn init_border_points(&mut self) {
        let squeeze = self.topo_space_range;
        let mut p_last = Vector2F::new(-1.0, -1.0);

        self.border_lists.clear();
        for (curve_index, curve) in self.curves.iter().enumerate() {
            let mut border_verts = Vec::new();
            if let Some(curve) = curve {
                for (knot_index, point) in curve.points.iter().enumerate() {
                    let p = Vector2F::new(point.x * squeeze.x, point.y * squeeze.y);
                    if p.distance(&p_last) > self.border_step {
                        border_verts.push(BorderVert {
                            knot_index,
                            vert_index: None,
                        });
                        p_last = p;
                        self.points_total += 1;
                    }
                }
                if border_verts.len() < 3 {
                    warn!(
                        "curve {curve_index} keeps {} samples after spacing, skipping it",
                        border_verts.len()
                    );
                    border_verts.clear();
                }
            }
            self.border_lists.push(border_verts);
        }
    }

    fn knot_point(&self, curve_index: usize, knot_index: usize) -> Option<Vector2F> {
        self.curves.get(curve_index)?.as_ref()?.point(knot_index)
    }

    /// Curve sample `knot_index` of curve `curve_index`, in topo pixels.
    fn knot_pixel(&self, curve_index: usize, knot_index: usize) -> Option<Vector2I> {
        let point = self.knot_point(curve_index, knot_index)?;
        Some(self.topo_space_to_topo_pixel(self.source_uv_to_topo_space(point)))
    }

    fn draw_height(&mut self) {
        for curve_index in 0..self.border_lists.len() {
            self.draw_height_border(curve_index);
        }
        self.draw_height_pass(-1, 0);
        self.draw_height_pass(1, 0);
        self.draw_height_pass(0, -1);
        self.draw_height_pass(0, 1);
    }

    /// Draws the closed polyline through the kept samples of one curve.
    /// Every pixel records its curve and segment. Segment `s` runs from
    /// sample `s - 1` to sample `s`, wrapping around.
    fn draw_height_border(&mut self, curve_index: usize) {
        let knots: Vec<usize> = self.border_lists[curve_index]
            .iter()
            .map(|b| b.knot_index)
            .collect();
        let Some(&last) = knots.last() else {
            return;
        };
        let Some(mut p_prev) = self.knot_pixel(curve_index, last) else {
            return;
        };

        for (segment_index, &knot_index) in knots.iter().enumerate() {
            let Some(p_cur) = self.knot_pixel(curve_index, knot_index) else {
                continue;
            };
            let val = TopoPix::new(
                TopoPix::FLAG_BORDER,
                0,
                curve_index as u32,
                segment_index as u32,
            );
            self.topo.draw_line(&val, p_prev, p_cur, true);

            let val_vert = TopoPix {
                flags: val.flags | TopoPix::FLAG_VERT,
                ..val
            };
            self.topo.set(p_prev.x, p_prev.y, val_vert);
            self.topo.set(p_cur.x, p_cur.y, val_vert);
            p_prev = p_cur;
        }
    }

    /// One directional sweep of the height field. Each pixel takes one more
    /// than its neighbor at `(x + xs, y + ys)` if that is smaller than its
    /// current height. Exterior status spreads the same way and border
    /// pixels block it. The first row and column visited are exterior.
    fn draw_height_pass(&mut self, xs: i32, ys: i32) {
        let (w, h) = (self.topo.width(), self.topo.height());
        let (x_begin, x_end, x_dir) = if xs > 0 { (w - 1, -1, -1) } else { (0, w, 1) };
        let (y_begin, y_end, y_dir) = if ys > 0 { (h - 1, -1, -1) } else { (0, h, 1) };

        let exterior = TopoPix::new(TopoPix::FLAG_EXTERIOR, 0, 0, 0);
        let mut y = y_begin;
        while y != y_end {
            let mut x = x_begin;
            while x != x_end {
                let val_prev = self.topo.get(x + xs, y + ys).copied().unwrap_or(exterior);
                let Some(cur) = self.topo.get_mut(x, y) else {
                    break;
                };
                let height_rolling = val_prev.height.saturating_add(1);

                if x == x_begin || y == y_begin {
                    cur.flags |= TopoPix::FLAG_EXTERIOR;
                    cur.height = 0;
                } else if !cur.is_border() {
                    if val_prev.is_exterior() || cur.is_exterior() {
                        cur.flags |= TopoPix::FLAG_EXTERIOR;
                        cur.height = 0;
                    } else if cur.height > height_rolling || cur.height == 0 {
                        cur.height = height_rolling;
                    }
                }
                x += x_dir;
            }
            y += y_dir;
        }
    }

    fn draw_normals(&mut self) {
        for y in 0..self.normals.height() {
            for x in 0..self.normals.width() {
                let normal = self.color_crop_normal(x, y);
                self.normals.set(x, y, normal);
            }
        }
    }

    /// Source pixel at `(x, y)` of the layer crop, or `None` outside it.
    fn color_crop_pix(&self, x: i32, y: i32) -> Option<ColorPix> {
        let bounds = &self.input.bounds_pixels;
        if !bounds.contains(x, y) {
            return None;
        }
        let index = y as usize * bounds.width as usize + x as usize;
        let channel = |c: usize| {
            self.input
                .pixels
                .get(c)
                .and_then(|p| p.get(index))
                .copied()
                .unwrap_or(0)
        };
        Some(if self.input.pixels.len() > 3 {
            ColorPix::new(channel(1), channel(2), channel(3), channel(0))
        } else {
            ColorPix::new(channel(0), channel(1), channel(2), 0)
        })
    }

    /// Surface normal from the alpha gradient over the eight neighbors.
    fn color_crop_normal(&self, x: i32, y: i32) -> NormalPix {
        const OFFSETS: [(i32, i32, f32, f32); 8] = [
            (-1, -1, -0.7071, -0.7071),
            (0, -1, 0.0, -1.0),
            (1, -1, 0.7071, -0.7071),
            (-1, 0, -1.0, 0.0),
            (1, 0, 1.0, 0.0),
            (-1, 1, -0.7071, 0.7071),
            (0, 1, 0.0, 1.0),
            (1, 1, 0.7071, 0.7071),
        ];

        let Some(center) = self.color_crop_pix(x, y) else {
            return NormalPix::FLAT;
        };
        let (mut sx, mut sy) = (0.0f32, 0.0f32);
        let mut count = 0;
        for (dx, dy, vx, vy) in OFFSETS {
            let Some(side) = self.color_crop_pix(x + dx, y + dy) else {
                continue;
            };
            let weight = (i32::from(side.a) - i32::from(center.a)) as f32 / 255.0;
            sx += vx * weight;
            sy += vy * weight;
            count += 1;
        }
        if count == 0 {
            return NormalPix::FLAT;
        }
        sx /= count as f32;
        sy /= count as f32;
        let sz = (1.0 - (sx * sx + sy * sy)).max(0.0).sqrt();
        NormalPix::encode(sx, sy, sz)
    }

    /// Picks sample pixels rung by rung up the height field. Each pick
    /// suppresses further picks in a square around it. Rung spacing and
    /// suppression radius both grow by the falloff factor per rung. Stops
    /// at the first rung that yields no pixel.
    fn draw_points(&mut self) {
        let mut radius_up = self.height_step as f32;
        let mut radius_side = radius_up * 0.75 + 1.0;
        let height_inc = self.height_falloff - 1.0;
        let (w, h) = (self.topo.width(), self.topo.height());

        let mut height_target = 0i32;
        let mut points_added = usize::MAX;
        while points_added != 0 {
            let up = radius_up as i32;
            let side = (radius_side as i32).max(1);
            height_target = height_target.saturating_add(up);
            points_added = 0;

            for y in 0..h {
                for x in 0..w {
                    let Some(&val_cur) = self.topo.get(x, y) else {
                        continue;
                    };
                    let height_cur = i32::from(val_cur.height);
                    let allow = !val_cur.has_flag(TopoPix::FLAG_NOVERT);
                    if allow && height_cur >= height_target && height_cur <= height_target + 2 {
                        for xr in (x - side)..(x + side) {
                            for yr in (y - side)..(y + side) {
                                if let Some(p) = self.topo.get_mut(xr, yr) {
                                    p.flags |= TopoPix::FLAG_NOVERT;
                                }
                            }
                        }
                        self.topo.set(
                            x,
                            y,
                            TopoPix {
                                flags: val_cur.flags | TopoPix::FLAG_VERT,
                                ..val_cur
                            },
                        );
                        points_added += 1;
                        self.points_total += 1;
                    }
                }
            }
            debug!("height rung {height_target}: {points_added} points");

            radius_up = radius_up * self.height_falloff + height_inc;
            radius_side = radius_side * self.height_falloff + height_inc;
        }
    }

    fn report_progress(&mut self, since_update: &mut usize, progress: &mut dyn ProgressTask) -> bool {
        self.points_finished += 1;
        *since_update += 1;
        if *since_update > PROGRESS_INTERVAL {
            *since_update = 0;
            progress.set_value_and_update(self.points_finished as f32 / self.points_total.max(1) as f32);
            return progress.is_cancelled();
        }
        false
    }

    /// Inserts every picked interior pixel, row by row.
    fn add_height_points(&mut self, progress: &mut dyn ProgressTask) {
        let mut since_update = 0;
        let (w, h) = (self.topo.width(), self.topo.height());
        for y in 0..h {
            for x in 0..w {
                let Some(val) = self.topo.get(x, y) else {
                    continue;
                };
                if !val.has_flag(TopoPix::FLAG_VERT) || val.is_border() {
                    continue;
                }
                let v = self.topo_pixel_to_topo_space(Vector2I::new(x, y));
                if let Err(err) = self.mesh.add_delaunay_vert(v) {
                    warn!("dropping height point at pixel ({x}, {y}): {err}");
                }
                if self.report_progress(&mut since_update, progress) {
                    return;
                }
            }
        }
    }

    /// Inserts the kept samples of one curve and flags them as border vertices.
    fn add_border_points(&mut self, curve_index: usize, progress: &mut dyn ProgressTask) {
        if !matches!(self.curves.get(curve_index), Some(Some(_))) {
            return;
        }
        let mut since_update = 0;
        for segment_index in 0..self.border_lists[curve_index].len() {
            let knot_index = self.border_lists[curve_index][segment_index].knot_index;
            if let Some(point) = self.knot_point(curve_index, knot_index) {
                let v = self.source_uv_to_topo_space(point);
                match self.mesh.add_delaunay_vert(v) {
                    Ok(vi) => {
                        self.mesh.verts[vi].flags |= GeomVertData::FLAG_BORDER;
                        self.border_lists[curve_index][segment_index].vert_index = Some(vi);
                    }
                    Err(err) => {
                        warn!("dropping border point {knot_index} of curve {curve_index}: {err}");
                    }
                }
            }
            if self.report_progress(&mut since_update, progress) {
                return;
            }
        }
    }

    /// Marks inward edges at every border vertex and flood fills the raster
    /// from where each one first leaves its own boundary segments.
    fn draw_interior(&mut self) {
        let mut lookup = VertEdgeLookup::default();
        for (ei, e) in self.mesh.edges.iter().enumerate() {
            if e.is_valid() {
                lookup.entry(e.vi[0]).or_default().push(ei);
                lookup.entry(e.vi[1]).or_default().push(ei);
            }
        }

        for curve_index in 0..self.border_lists.len() {
            let has_curve = matches!(self.curves.get(curve_index), Some(Some(_)));
            if has_curve && self.border_lists[curve_index].len() >= 3 {
                self.draw_interior_border(curve_index, &lookup);
            }
        }
    }

    fn draw_interior_border(&mut self, curve_index: usize, lookup: &VertEdgeLookup) {
        let border_verts = self.border_lists[curve_index].clone();
        let segment_count = border_verts.len();

        for segment_index in 0..segment_count {
            let segment_prev = (segment_index + segment_count - 1) % segment_count;
            let segment_next = (segment_index + 1) % segment_count;
            let (Some(vi_prev), Some(vi_cur), Some(vi_next)) = (
                border_verts[segment_prev].vert_index,
                border_verts[segment_index].vert_index,
                border_verts[segment_next].vert_index,
            ) else {
                continue;
            };
            let point_prev = self.mesh.verts[vi_prev].pos;
            let point_cur = self.mesh.verts[vi_cur].pos;
            let point_next = self.mesh.verts[vi_next].pos;

            let Some(edges) = lookup.get(&vi_cur) else {
                continue;
            };
            for &ei in edges {
                let vi_check = self.mesh.edges[ei].other_vert(vi_cur);
                let is_corner = vi_cur < 4 || vi_check < 4;
                let is_border = vi_check == vi_prev || vi_check == vi_next || vi_check == vi_cur;
                if is_corner || is_border {
                    continue;
                }

                let point_check = self.mesh.verts[vi_check].pos;
                if !is_edge_interior(point_prev, point_cur, point_next, point_check) {
                    continue;
                }
                self.mesh.edges[ei].flags |= GeomEdgeData::FLAG_INTERIOR;

                let origin = [
                    (curve_index as u32, segment_prev as u32),
                    (curve_index as u32, segment_index as u32),
                ];
                let p1 = self.topo_space_to_topo_pixel(point_cur);
                let p2 = self.topo_space_to_topo_pixel(point_check);
                let mut found = None;
                walk_line(p1, p2, false, |x, y| {
                    let Some(val) = self.topo.get(x, y) else {
                        return ControlFlow::Break(());
                    };
                    let is_origin = val.is_border()
                        && origin.iter().any(|&(c, s)| val.is_segment(c, s));
                    if is_origin {
                        return ControlFlow::Continue(());
                    }
                    if !val.is_border() {
                        found = Some(Vector2I::new(x, y));
                    }
                    ControlFlow::Break(())
                });
                if let Some(start) = found {
                    self.draw_interior_fill(start);
                }
            }
        }
    }

    /// Breadth-first fill of interior pixels from `start`, bounded by border
    /// pixels. Pixels next to the border become both interior and border,
    /// which seals the boundary against later fills.
    fn draw_interior_fill(&mut self, start: Vector2I) {
        const SIDES: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

        let mut queue = VecDeque::new();
        queue.push_back(start);
        while let Some(pos) = queue.pop_front() {
            let Some(&val) = self.topo.get(pos.x, pos.y) else {
                continue;
            };
            if val.is_interior() || val.is_exterior() {
                continue;
            }

            let mut is_adjacent = false;
            for (dx, dy) in SIDES {
                let side = Vector2I::new(pos.x + dx, pos.y + dy);
                let Some(side_val) = self.topo.get(side.x, side.y) else {
                    continue;
                };
                let border_only = side_val.is_border() && !side_val.is_interior();
                if !side_val.is_interior() && !border_only {
                    queue.push_back(side);
                }
                if border_only {
                    is_adjacent = true;
                }
            }

            let mut flags = val.flags | TopoPix::FLAG_INTERIOR;
            if is_adjacent {
                flags |= TopoPix::FLAG_BORDER;
            }
            self.topo.set(pos.x, pos.y, TopoPix { flags, ..val });
        }
    }

    /// Culls edges that reach the guard quad and flags edges that pass over
    /// a filled interior pixel. Then deletes, in reverse order, every
    /// triangle with a culled edge or without an interior edge.
    fn remove_interior_tris(&mut self) {
        let lo = -GUARD_EDGE_MARGIN;
        let hi = 1.0 + GUARD_EDGE_MARGIN;
        let outside = |p: &Vector2F| p.x < lo || p.y < lo || p.x > hi || p.y > hi;

        for ei in 0..self.mesh.edges.len() {
            let edge = self.mesh.edges[ei];
            if !edge.is_valid() {
                continue;
            }
            let p0 = self.mesh.verts[edge.vi[0]].pos;
            let p1 = self.mesh.verts[edge.vi[1]].pos;
            if outside(&p0) || outside(&p1) {
                self.mesh.edges[ei].flags |= GeomEdgeData::FLAG_CULLED;
                continue;
            }

            let mut is_interior = false;
            walk_line(
                self.topo_space_to_topo_pixel(p0),
                self.topo_space_to_topo_pixel(p1),
                false,
                |x, y| match self.topo.get(x, y) {
                    Some(val) if val.is_interior() && !val.is_border() => {
                        is_interior = true;
                        ControlFlow::Break(())
                    }
                    Some(_) => ControlFlow::Continue(()),
                    None => ControlFlow::Break(()),
                },
            );
            if is_interior {
                self.mesh.edges[ei].flags |= GeomEdgeData::FLAG_INTERIOR;
            }
        }

        for ti in (0..self.mesh.tris.len()).rev() {
            let tri = self.mesh.tris[ti];
            if !tri.is_valid() {
                continue;
            }
            let edges = tri.ei.map(|ei| self.mesh.edges[ei]);
            let any_interior = edges.iter().any(|e| e.has_flag(GeomEdgeData::FLAG_INTERIOR));
            let any_culled = edges.iter().any(|e| e.has_flag(GeomEdgeData::FLAG_CULLED));
            if !any_interior || any_culled {
                self.mesh.delete_tri(ti);
            }
        }
    }

    fn get_data_mesh(&self, mesh_out: &mut DataMesh) {
        let vertices = self
            .mesh
            .verts
            .iter()
            .map(|v| self.topo_space_to_source_uv(v.pos))
            .collect();
        let tri_count = self.mesh.tris.len();
        let face_sizes = vec![3; tri_count];
        let face_marks = (0..tri_count).map(|ti| 3 * ti).collect();
        let face_verts = self.mesh.tris.iter().flat_map(|t| t.vi).collect();

        mesh_out.name = self.input.name.clone();
        mesh_out.width = self.input.width as f32;
        mesh_out.height = self.input.height as f32;
        mesh_out.bounds_uv = self.bounds;
        mesh_out.set_values(vertices, face_sizes, face_marks, face_verts);
    }
}

/// Pixel count spanning `lo..=hi` plus `padding` on both sides.
fn raster_extent(lo: i32, hi: i32, padding: i32) -> i32 {
    hi.saturating_sub(lo)
        .saturating_add(1)
        .saturating_add(padding.saturating_mul(2))
}

/// Whether `check`, seen from border vertex `cur`, lies inside the angle
/// swept from `prev` to `next`. Angles are measured with `atan2(dx, dy)`, so
/// the interior is on the right of the direction of travel in image
/// coordinates.
pub fn is_edge_interior(prev: Vector2F, cur: Vector2F, next: Vector2F, check: Vector2F) -> bool {
    let angle = |p: Vector2F| (p.x - cur.x).atan2(p.y - cur.y);
    let a_prev = angle(prev);
    let mut a_next = angle(next) - a_prev;
    let mut a_check = angle(check) - a_prev;
    if a_next < 0.0 {
        a_next += TAU;
    }
    if a_check < 0.0 {
        a_check += TAU;
    }
    a_check > 0.0 && a_check < a_next
}
