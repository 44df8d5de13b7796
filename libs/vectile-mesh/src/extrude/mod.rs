//! # Area and Structure Meshers
//!
//! Flat footprints and extruded structures, built on the ear-clipping
//! triangulator.
//!
//! Areas become a single triangulated polygon in the ground plane: one
//! vertex per ring point, an up normal, and the same atlas coordinate on
//! every vertex so the whole surface samples one texel region.
//!
//! Structures add a vertical displacement: the footprint is triangulated
//! once and lifted to the clamped height, then one quad is emitted per
//! exterior edge as a wall. Wall normals come from the edge's outward
//! horizontal normal, not from the lifted surface, so lighting stays
//! stable however the roof triangulates. A zero displacement yields the
//! roof only.

use vectile_tile::geom::{Vec2, Vertex, UP};
use vectile_tile::{AreaFeature, StructureFeature};

use crate::error::MeshResult;
use crate::mesh::TileMesh;
use crate::options::{AreaOptions, StructureOptions};
use crate::triangulate::triangulate;

// =============================================================================
// AREAS
// =============================================================================

/// Meshes a flat area feature.
///
/// Ring points keep their own elevation; the mesher adds no displacement.
/// Fails when the boundary cannot be triangulated.
pub fn mesh_area_feature(feature: &AreaFeature, options: &AreaOptions) -> MeshResult<TileMesh> {
    let ring = feature.points();
    let indices = triangulate(ring)?;
    let vertices = ring
        .iter()
        .map(|&p| Vertex::new(p, UP, options.atlas_uv))
        .collect();
    Ok(TileMesh::from_parts(vertices, indices))
}

// =============================================================================
// STRUCTURES
// =============================================================================

/// Meshes an extruded structure: a lifted roof plus one wall quad per
/// exterior edge.
///
/// The source height is clamped into the option range before use, and
/// points downward for underground structures. Fails when the footprint
/// cannot be triangulated.
pub fn mesh_structure_feature(
    feature: &StructureFeature,
    options: &StructureOptions,
) -> MeshResult<TileMesh> {
    let ring = feature.footprint().points();
    let roof_indices = triangulate(ring)?;
    let displacement = clamped_displacement(feature, options);
    let lift = UP * displacement;

    let edges = feature.exterior_edges();
    let wall_count = if displacement == 0.0 { 0 } else { edges.len() };
    let mut mesh = TileMesh::with_capacity(
        ring.len() + 4 * wall_count,
        roof_indices.len() + 6 * wall_count,
    );

    for &p in ring {
        mesh.add_vertex(Vertex::new(p + lift, UP, options.atlas_uv));
    }
    for tri in roof_indices.chunks_exact(3) {
        mesh.add_triangle(tri[0], tri[1], tri[2]);
    }

    if wall_count > 0 {
        for edge in edges {
            let normal = match edge.outward_normal() {
                Some(normal) => normal,
                None => continue,
            };
            let top_a = mesh.add_vertex(Vertex::new(edge.a + lift, normal, Vec2::new(0.0, 1.0)));
            let top_b = mesh.add_vertex(Vertex::new(edge.b + lift, normal, Vec2::new(1.0, 1.0)));
            let bottom_a = mesh.add_vertex(Vertex::new(edge.a, normal, Vec2::new(0.0, 0.0)));
            let bottom_b = mesh.add_vertex(Vertex::new(edge.b, normal, Vec2::new(1.0, 0.0)));
            mesh.add_triangle(top_a, bottom_b, bottom_a);
            mesh.add_triangle(top_a, top_b, bottom_b);
        }
    }

    Ok(mesh)
}

/// Source height clamped into the configured range, negated for
/// underground structures.
fn clamped_displacement(feature: &StructureFeature, options: &StructureOptions) -> f32 {
    let clamped = feature.height().clamp(options.min_height, options.max_height);
    if feature.is_underground() {
        -clamped
    } else {
        clamped
    }
}
