//! Tests for the tile mesh builder.

use std::sync::atomic::{AtomicUsize, Ordering};

use approx::assert_relative_eq;
use vectile_tile::geom::Vec3;
use vectile_tile::{AreaFeature, LinearFeature, PointFeature, StructureFeature, Tile, TileId};

use crate::builder::TileMesher;
use crate::cancel::{CancelCheck, NeverCancel};
use crate::combine::Strategy;
use crate::error::MeshError;
use crate::options::{AreaOptions, LodRange, RibbonOptions, StructureOptions, WidthPreset};

struct AlwaysCancelled;

impl CancelCheck for AlwaysCancelled {
    fn is_cancelled(&self) -> bool {
        true
    }
}

/// Reports cancelled from the `after`-th checkpoint on.
struct CancelAfter {
    calls: AtomicUsize,
    after: usize,
}

impl CancelAfter {
    fn new(after: usize) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            after,
        }
    }
}

impl CancelCheck for CancelAfter {
    fn is_cancelled(&self) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst) >= self.after
    }
}

fn square(origin: Vec3) -> Vec<Vec3> {
    vec![
        origin,
        origin + Vec3::new(1.0, 0.0, 0.0),
        origin + Vec3::new(1.0, 0.0, 1.0),
        origin + Vec3::new(0.0, 0.0, 1.0),
    ]
}

fn full_tile() -> Tile {
    let mut tile = Tile::new(TileId::new(3, 7, 16), 1.0);
    tile.push_linear(LinearFeature::single_strip(vec![
        Vec3::ZERO,
        Vec3::new(4.0, 0.0, 0.0),
    ]));
    tile.push_area(AreaFeature::new(square(Vec3::new(10.0, 0.0, 0.0))));
    tile.push_structure(StructureFeature::from_ring(
        square(Vec3::new(20.0, 0.0, 0.0)),
        5.0,
    ));
    tile
}

fn full_mesher() -> TileMesher {
    TileMesher::new()
        .with_linear(RibbonOptions::default())
        .unwrap()
        .with_areas(AreaOptions::default())
        .with_structures(StructureOptions::default())
        .unwrap()
}

// =============================================================================
// STAGES
// =============================================================================

#[test]
fn test_build_meshes_every_configured_kind() {
    let mesh = full_mesher()
        .build(&full_tile(), &NeverCancel)
        .unwrap()
        .unwrap();
    // Ribbon 12/30, area 4/6, structure 20/30.
    assert_eq!(mesh.vertex_count(), 36);
    assert_eq!(mesh.index_count(), 66);
    assert!(mesh.validate());
}

#[test]
fn test_empty_tile_builds_nothing() {
    let tile = Tile::new(TileId::new(0, 0, 16), 1.0);
    let built = full_mesher().build(&tile, &NeverCancel).unwrap();
    assert!(built.is_none());
}

#[test]
fn test_unconfigured_kinds_are_ignored() {
    let mesher = TileMesher::new().with_areas(AreaOptions::default());
    let mesh = mesher.build(&full_tile(), &NeverCancel).unwrap().unwrap();
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.index_count(), 6);
}

#[test]
fn test_point_features_are_not_meshed() {
    let mut tile = Tile::new(TileId::new(0, 0, 16), 1.0);
    tile.push_point(PointFeature::new(Vec3::ZERO));
    let built = full_mesher().build(&tile, &NeverCancel).unwrap();
    assert!(built.is_none());
}

#[test]
fn test_lod_range_gates_the_stage() {
    let lod = LodRange::new(0, 10).unwrap();
    let mesher = TileMesher::new()
        .with_linear(RibbonOptions::new(WidthPreset::Medium, lod))
        .unwrap();
    // Tile zoom 16 sits outside the stage's range.
    let built = mesher.build(&full_tile(), &NeverCancel).unwrap();
    assert!(built.is_none());
}

#[test]
fn test_degenerate_feature_is_skipped_not_fatal() {
    let mut tile = Tile::new(TileId::new(0, 0, 16), 1.0);
    tile.push_area(AreaFeature::new(vec![Vec3::ZERO, Vec3::X]));
    tile.push_area(AreaFeature::new(square(Vec3::ZERO)));
    let mesher = TileMesher::new().with_areas(AreaOptions::default());
    let mesh = mesher.build(&tile, &NeverCancel).unwrap().unwrap();
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.index_count(), 6);
}

// =============================================================================
// CANCELLATION
// =============================================================================

#[test]
fn test_cancelled_before_start() {
    let err = full_mesher()
        .build(&full_tile(), &AlwaysCancelled)
        .unwrap_err();
    assert!(err.is_cancelled());
}

#[test]
fn test_cancellation_lands_on_stage_boundaries() {
    // Checkpoints run before collect, mesh and combine; flipping the flag
    // after any of them aborts the build.
    for after in 0..3 {
        let err = full_mesher()
            .build(&full_tile(), &CancelAfter::new(after))
            .unwrap_err();
        assert_eq!(err, MeshError::Cancelled);
    }
    // All three checkpoints passed: the build runs to completion.
    let built = full_mesher()
        .build(&full_tile(), &CancelAfter::new(3))
        .unwrap();
    assert!(built.is_some());
}

// =============================================================================
// STRATEGY AND WIDTH
// =============================================================================

#[test]
fn test_build_into_reuses_the_buffer() {
    let mesher = full_mesher();
    let reference = mesher.build(&full_tile(), &NeverCancel).unwrap().unwrap();

    let mut buffer = crate::mesh::TileMesh::new();
    assert!(mesher
        .build_into(&full_tile(), &NeverCancel, &mut buffer)
        .unwrap());
    assert_eq!(buffer.content_hash(), reference.content_hash());

    // A second build into the same buffer replaces the content wholesale.
    assert!(mesher
        .build_into(&full_tile(), &NeverCancel, &mut buffer)
        .unwrap());
    assert_eq!(buffer.content_hash(), reference.content_hash());

    // An empty tile leaves the buffer cleared.
    let empty = Tile::new(TileId::new(9, 9, 16), 1.0);
    assert!(!mesher.build_into(&empty, &NeverCancel, &mut buffer).unwrap());
    assert!(buffer.is_empty());
}

#[test]
fn test_sequential_and_parallel_agree() {
    let sequential = full_mesher()
        .build(&full_tile(), &NeverCancel)
        .unwrap()
        .unwrap();
    let parallel = full_mesher()
        .with_strategy(Strategy::Parallel)
        .build(&full_tile(), &NeverCancel)
        .unwrap()
        .unwrap();
    assert_eq!(sequential.content_hash(), parallel.content_hash());
}

#[test]
fn test_ribbon_width_follows_tile_size() {
    let mesher = TileMesher::new()
        .with_linear(RibbonOptions::default())
        .unwrap();
    let strip = LinearFeature::single_strip(vec![Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0)]);

    // Medium preset spans 1.0..4.0; at the anchor zoom the scale factor
    // is 1, so a 2.0 tile gets 4.0 / 2.0 and an 8.0 tile clamps to the
    // minimum.
    let mut near = Tile::new(TileId::new(0, 0, 16), 2.0);
    near.push_linear(strip.clone());
    let mesh = mesher.build(&near, &NeverCancel).unwrap().unwrap();
    let across = mesh.vertices()[1].position - mesh.vertices()[0].position;
    assert_relative_eq!(across.length(), 2.0, epsilon = 1e-5);

    let mut far = Tile::new(TileId::new(0, 0, 16), 8.0);
    far.push_linear(strip);
    let mesh = mesher.build(&far, &NeverCancel).unwrap().unwrap();
    let across = mesh.vertices()[1].position - mesh.vertices()[0].position;
    assert_relative_eq!(across.length(), 1.0, epsilon = 1e-5);
}
