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

use log::{debug, info};

use crate::error::{MeshError, Result};
use crate::mesh::core::GeomMesh;
use crate::mesh_generator::data_mesh::DataMesh;
use crate::mesh_generator::delaunay_algo::DelaunayAlgo;
use crate::mesh_generator::parameters::{DelaunayMeshInput, DelaunayMeshParameters};
use crate::util::progress::ProgressTask;
use crate::util::thread_pool::WorkerPool;

/// Entry point for topographic Delaunay meshing.
///
/// Without a pool, point location runs on the calling thread.
#[derive(Debug, Clone, Default)]
pub struct DelaunayMesh {
    pool: Option<Arc<WorkerPool>>,
}

impl DelaunayMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shares `pool` with every mesh this generator builds.
    pub fn with_pool(pool: Arc<WorkerPool>) -> Self {
        Self { pool: Some(pool) }
    }

    pub fn pool(&self) -> Option<&Arc<WorkerPool>> {
        self.pool.as_ref()
    }

    /// Meshes the area enclosed by the input curves.
    ///
    /// Returns an empty mesh when the image has no area, when no curve has
    /// points, or when `progress` reports cancellation. Errors come from
    /// undersized pixel buffers and failed raster allocation.
    pub fn generate_mesh(
        &self,
        params: &DelaunayMeshParameters,
        input: &DelaunayMeshInput,
        progress: &mut dyn ProgressTask,
    ) -> Result<DataMesh> {
        let expected = input.bounds_pixels.pixel_count();
        for (channel, pixels) in input.pixels.iter().enumerate() {
            if pixels.len() < expected {
                return Err(MeshError::PixelBufferTooSmall {
                    channel,
                    expected,
                    found: pixels.len(),
                });
            }
        }

        if input.width <= 0 || input.height <= 0 {
            debug!("image '{}' has no area, nothing to mesh", input.name);
            return Ok(DataMesh::new());
        }
        let has_points = input.curves.iter().flatten().any(|curve| !curve.is_empty());
        if !has_points {
            debug!("layer '{}' has no curve points, nothing to mesh", input.name);
            return Ok(DataMesh::new());
        }

        let mesh = match &self.pool {
            Some(pool) => GeomMesh::with_pool(Arc::clone(pool)),
            None => GeomMesh::new(),
        };
        let mut algo = DelaunayAlgo::new(params, input, mesh)?;
        let mesh_out = algo.generate_mesh(progress);

        info!(
            "meshed layer '{}' ({}x{}) into {} faces",
            input.name,
            input.width,
            input.height,
            mesh_out.face_count()
        );
        Ok(mesh_out)
    }
}
