//! # Mesh Combiner
//!
//! Folds per-feature meshes into one tile mesh. Output order always
//! follows input order, so a tile combined twice from the same parts is
//! byte-identical regardless of strategy.
//!
//! The parallel path precomputes prefix offsets, carves the output
//! buffers into disjoint per-mesh slices and lets rayon fill them
//! independently; no locks, no post-sort.
//!
//! [`combine_into`] writes into a caller-provided mesh, which is how the
//! scheduler's pooled buffers get their capacity reused across builds.

use bytemuck::Zeroable;
use config::constants::{MAX_TRIANGLES, MAX_VERTICES};
use rayon::prelude::*;
use vectile_tile::geom::Vertex;

use crate::error::{MeshError, MeshResult};
use crate::mesh::TileMesh;

/// How the per-feature meshes of a tile are folded together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// One mesh at a time on the calling thread.
    #[default]
    Sequential,
    /// Disjoint output slices filled on the rayon pool.
    Parallel,
}

/// Combines meshes into a fresh mesh.
///
/// See [`combine_into`] for the semantics.
pub fn combine(meshes: &[TileMesh], strategy: Strategy) -> MeshResult<TileMesh> {
    let mut combined = TileMesh::new();
    combine_into(&mut combined, meshes, strategy)?;
    Ok(combined)
}

/// Combines meshes into `out`, remapping indices past each mesh's vertex
/// offset. `out` is cleared first; its buffer capacity is kept.
///
/// Fails when the combined totals exceed the crate limits. An empty input
/// produces an empty mesh.
pub fn combine_into(
    out: &mut TileMesh,
    meshes: &[TileMesh],
    strategy: Strategy,
) -> MeshResult<()> {
    let vertex_total: usize = meshes.iter().map(TileMesh::vertex_count).sum();
    let index_total: usize = meshes.iter().map(TileMesh::index_count).sum();
    if vertex_total > MAX_VERTICES {
        return Err(MeshError::TooManyVertices {
            count: vertex_total,
            max: MAX_VERTICES,
        });
    }
    let triangle_total = index_total / 3;
    if triangle_total > MAX_TRIANGLES {
        return Err(MeshError::TooManyTriangles {
            count: triangle_total,
            max: MAX_TRIANGLES,
        });
    }

    out.clear();
    match strategy {
        Strategy::Sequential => {
            out.reserve(vertex_total, index_total);
            for mesh in meshes {
                out.merge(mesh);
            }
        }
        Strategy::Parallel => {
            combine_parallel(out, meshes, vertex_total, index_total);
        }
    }
    Ok(())
}

fn combine_parallel(
    out: &mut TileMesh,
    meshes: &[TileMesh],
    vertex_total: usize,
    index_total: usize,
) {
    let (vertices, indices) = out.parts_mut();
    vertices.resize(vertex_total, Vertex::zeroed());
    indices.resize(index_total, 0);

    let mut jobs = Vec::with_capacity(meshes.len());
    let mut vertex_rest: &mut [Vertex] = vertices;
    let mut index_rest: &mut [u32] = indices;
    let mut offset = 0u32;
    for mesh in meshes {
        let (vertex_slot, remaining) =
            std::mem::take(&mut vertex_rest).split_at_mut(mesh.vertex_count());
        vertex_rest = remaining;
        let (index_slot, remaining) =
            std::mem::take(&mut index_rest).split_at_mut(mesh.index_count());
        index_rest = remaining;
        jobs.push((mesh, vertex_slot, index_slot, offset));
        offset += mesh.vertex_count() as u32;
    }

    jobs.into_par_iter()
        .for_each(|(mesh, vertex_slot, index_slot, offset)| {
            vertex_slot.copy_from_slice(mesh.vertices());
            for (slot, &index) in index_slot.iter_mut().zip(mesh.indices()) {
                *slot = index + offset;
            }
        });
}
