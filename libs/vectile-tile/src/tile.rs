//! # Tile
//!
//! One decoded tile: identity, physical size, and per-kind feature lists in
//! decode order. Meshing iterates the lists in that order, which is what
//! makes repeated builds byte-identical.

use serde::{Deserialize, Serialize};

use crate::feature::{AreaFeature, FeatureKind, LinearFeature, PointFeature, StructureFeature};

// =============================================================================
// TILE ID
// =============================================================================

/// Tile address in the quadtree: column, row, zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId {
    /// Tile column.
    pub x: i32,
    /// Tile row.
    pub y: i32,
    /// Zoom level.
    pub zoom: u8,
}

impl TileId {
    /// Creates a tile id.
    pub fn new(x: i32, y: i32, zoom: u8) -> Self {
        Self { x, y, zoom }
    }
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

// =============================================================================
// TILE
// =============================================================================

/// A decoded tile ready for meshing.
///
/// Assembled by the decoder with the `push_*` methods, then frozen behind
/// `Arc` and shared read-only with build workers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    id: TileId,
    physical_size: f64,
    linear: Vec<LinearFeature>,
    areas: Vec<AreaFeature>,
    structures: Vec<StructureFeature>,
    points: Vec<PointFeature>,
}

impl Tile {
    /// Creates an empty tile.
    pub fn new(id: TileId, physical_size: f64) -> Self {
        Self {
            id,
            physical_size,
            linear: Vec::new(),
            areas: Vec::new(),
            structures: Vec::new(),
            points: Vec::new(),
        }
    }

    /// Tile address.
    pub fn id(&self) -> TileId {
        self.id
    }

    /// Zoom level, from the address.
    pub fn zoom(&self) -> u8 {
        self.id.zoom
    }

    /// Physical size of the tile.
    pub fn physical_size(&self) -> f64 {
        self.physical_size
    }

    /// Appends a linear feature.
    pub fn push_linear(&mut self, feature: LinearFeature) {
        self.linear.push(feature);
    }

    /// Appends an area feature.
    pub fn push_area(&mut self, feature: AreaFeature) {
        self.areas.push(feature);
    }

    /// Appends a structure feature.
    pub fn push_structure(&mut self, feature: StructureFeature) {
        self.structures.push(feature);
    }

    /// Appends a point feature.
    pub fn push_point(&mut self, feature: PointFeature) {
        self.points.push(feature);
    }

    /// Linear features in decode order.
    pub fn linear_features(&self) -> &[LinearFeature] {
        &self.linear
    }

    /// Area features in decode order.
    pub fn area_features(&self) -> &[AreaFeature] {
        &self.areas
    }

    /// Structure features in decode order.
    pub fn structure_features(&self) -> &[StructureFeature] {
        &self.structures
    }

    /// Point features in decode order.
    pub fn point_features(&self) -> &[PointFeature] {
        &self.points
    }

    /// Number of features of one kind.
    pub fn feature_count(&self, kind: FeatureKind) -> usize {
        match kind {
            FeatureKind::Linear => self.linear.len(),
            FeatureKind::Area => self.areas.len(),
            FeatureKind::Structure => self.structures.len(),
            FeatureKind::Point => self.points.len(),
        }
    }

    /// Features across all kinds.
    pub fn total_feature_count(&self) -> usize {
        FeatureKind::ALL
            .iter()
            .map(|&kind| self.feature_count(kind))
            .sum()
    }

    /// True when the tile carries no features at all.
    pub fn is_empty(&self) -> bool {
        self.total_feature_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn sample_tile() -> Tile {
        let mut tile = Tile::new(TileId::new(3, 7, 15), 611.5);
        tile.push_linear(LinearFeature::single_strip(vec![
            Vec3::ZERO,
            Vec3::new(10.0, 0.0, 0.0),
        ]));
        tile.push_area(AreaFeature::new(vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
        ]));
        tile.push_structure(StructureFeature::from_ring(
            vec![
                Vec3::new(2.0, 0.0, 2.0),
                Vec3::new(3.0, 0.0, 2.0),
                Vec3::new(3.0, 0.0, 3.0),
            ],
            4.0,
        ));
        tile.push_point(PointFeature::new(Vec3::new(5.0, 0.0, 5.0)));
        tile
    }

    #[test]
    fn test_tile_id_display() {
        assert_eq!(TileId::new(3, 7, 15).to_string(), "15/3/7");
    }

    #[test]
    fn test_feature_counts_per_kind() {
        let tile = sample_tile();
        for kind in FeatureKind::ALL {
            assert_eq!(tile.feature_count(kind), 1);
        }
        assert_eq!(tile.total_feature_count(), 4);
        assert!(!tile.is_empty());
    }

    #[test]
    fn test_empty_tile() {
        let tile = Tile::new(TileId::new(0, 0, 0), 1.0);
        assert!(tile.is_empty());
        assert_eq!(tile.total_feature_count(), 0);
    }

    #[test]
    fn test_zoom_comes_from_id() {
        let tile = sample_tile();
        assert_eq!(tile.zoom(), 15);
        assert_eq!(tile.id(), TileId::new(3, 7, 15));
        assert!((tile.physical_size() - 611.5).abs() < 1e-9);
    }
}
