//! # Tile Features
//!
//! Decoded map features, one type per kind. All geometry is tile-local and
//! immutable after construction; per-kind meshers read these and emit
//! triangle meshes.

use config::constants::MIN_SEGMENT_LENGTH_SQUARED;
use serde::{Deserialize, Serialize};

use crate::error::TileError;
use crate::geom::{LineSegment, Point};

// =============================================================================
// FEATURE KIND
// =============================================================================

/// Discriminates the per-kind feature lists of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureKind {
    /// Polyline strips (roads, rivers, paths).
    Linear,
    /// Flat closed polygons (parks, water bodies).
    Area,
    /// Extruded closed polygons (buildings).
    Structure,
    /// Single positions (POIs). Carried in the data model, meshed by a
    /// downstream label/billboard collaborator rather than this pipeline.
    Point,
}

impl FeatureKind {
    /// All kinds in the order tiles store them.
    pub const ALL: [FeatureKind; 4] = [
        FeatureKind::Linear,
        FeatureKind::Area,
        FeatureKind::Structure,
        FeatureKind::Point,
    ];
}

// =============================================================================
// LINEAR FEATURE
// =============================================================================

/// A polyline feature made of one or more strips.
///
/// `points` is the concatenation of every strip; `strip_lengths` says where
/// one strip ends and the next begins. The lengths are validated at
/// construction so downstream meshing can slice without bounds checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearFeature {
    points: Vec<Point>,
    strip_lengths: Vec<usize>,
}

impl LinearFeature {
    /// Creates a multi-strip polyline.
    ///
    /// Fails when the strip lengths do not sum to the point count.
    pub fn new(points: Vec<Point>, strip_lengths: Vec<usize>) -> Result<Self, TileError> {
        let declared: usize = strip_lengths.iter().sum();
        if declared != points.len() {
            return Err(TileError::StripLengthMismatch {
                declared,
                actual: points.len(),
            });
        }
        Ok(Self {
            points,
            strip_lengths,
        })
    }

    /// Creates a polyline with a single strip covering every point.
    pub fn single_strip(points: Vec<Point>) -> Self {
        let len = points.len();
        Self {
            points,
            strip_lengths: vec![len],
        }
    }

    /// All points, strip by strip.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Length of each strip.
    pub fn strip_lengths(&self) -> &[usize] {
        &self.strip_lengths
    }

    /// Number of strips.
    pub fn strip_count(&self) -> usize {
        self.strip_lengths.len()
    }

    /// Iterates the strips as point slices.
    pub fn strips(&self) -> impl Iterator<Item = &[Point]> + '_ {
        self.strip_lengths.iter().scan(0usize, move |start, &len| {
            let begin = *start;
            *start += len;
            Some(&self.points[begin..begin + len])
        })
    }
}

// =============================================================================
// AREA FEATURE
// =============================================================================

/// A flat closed polygon given as an ordered boundary ring.
///
/// The ring is simple (no self-intersections) but may wind either way;
/// the triangulator normalizes winding at build time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaFeature {
    points: Vec<Point>,
}

impl AreaFeature {
    /// Creates an area from its boundary ring (not repeated-closed).
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Boundary ring.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Boundary segments including the closing edge, degenerate edges
    /// skipped.
    pub fn exterior_edges(&self) -> Vec<LineSegment> {
        ring_edges(&self.points)
    }
}

/// Consecutive ring segments (with the wrap-around edge), dropping
/// zero-length ones produced by duplicate points.
fn ring_edges(ring: &[Point]) -> Vec<LineSegment> {
    if ring.len() < 2 {
        return Vec::new();
    }
    let mut edges = Vec::with_capacity(ring.len());
    for i in 0..ring.len() {
        let seg = LineSegment::new(ring[i], ring[(i + 1) % ring.len()]);
        if seg.length_squared() >= MIN_SEGMENT_LENGTH_SQUARED {
            edges.push(seg);
        }
    }
    edges
}

// =============================================================================
// STRUCTURE FEATURE
// =============================================================================

/// An extruded polygon: a footprint plus vertical displacement data.
///
/// The wall source is the stored `exterior_edges` list, not the footprint
/// ring: a feed that carries interior rings can strip their edges here and
/// walls stay correct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureFeature {
    footprint: AreaFeature,
    exterior_edges: Vec<LineSegment>,
    height: f32,
    is_underground: bool,
}

impl StructureFeature {
    /// Creates a structure from explicit parts.
    pub fn new(
        footprint: AreaFeature,
        exterior_edges: Vec<LineSegment>,
        height: f32,
        is_underground: bool,
    ) -> Self {
        Self {
            footprint,
            exterior_edges,
            height,
            is_underground,
        }
    }

    /// Creates an above-ground structure whose walls follow the boundary
    /// ring.
    pub fn from_ring(points: Vec<Point>, height: f32) -> Self {
        let exterior_edges = ring_edges(&points);
        Self {
            footprint: AreaFeature::new(points),
            exterior_edges,
            height,
            is_underground: false,
        }
    }

    /// Marks the structure as underground (displaced downward).
    pub fn underground(mut self) -> Self {
        self.is_underground = true;
        self
    }

    /// Footprint polygon.
    pub fn footprint(&self) -> &AreaFeature {
        &self.footprint
    }

    /// Wall source edges.
    pub fn exterior_edges(&self) -> &[LineSegment] {
        &self.exterior_edges
    }

    /// Raw source height, before clamping.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Whether the displacement points down instead of up.
    pub fn is_underground(&self) -> bool {
        self.is_underground
    }
}

// =============================================================================
// POINT FEATURE
// =============================================================================

/// A single located feature (POI, label anchor).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointFeature {
    /// Tile-local position.
    pub position: Point,
}

impl PointFeature {
    /// Creates a point feature.
    pub fn new(position: Point) -> Self {
        Self { position }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_linear_feature_validates_strip_lengths() {
        let points = vec![Vec3::ZERO, Vec3::X, Vec3::Z];
        let err = LinearFeature::new(points, vec![2, 2]).unwrap_err();
        assert_eq!(
            err,
            TileError::StripLengthMismatch {
                declared: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn test_linear_feature_strips_iterate_slices() {
        let points = vec![
            Vec3::ZERO,
            Vec3::X,
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(5.0, 0.0, 1.0),
            Vec3::new(5.0, 0.0, 2.0),
        ];
        let feature = LinearFeature::new(points, vec![2, 3]).unwrap();
        let strips: Vec<&[Point]> = feature.strips().collect();
        assert_eq!(strips.len(), 2);
        assert_eq!(strips[0].len(), 2);
        assert_eq!(strips[1].len(), 3);
        assert_eq!(strips[1][0], Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_single_strip_covers_all_points() {
        let feature = LinearFeature::single_strip(vec![Vec3::ZERO, Vec3::X, Vec3::Z]);
        assert_eq!(feature.strip_count(), 1);
        assert_eq!(feature.strip_lengths(), &[3]);
    }

    #[test]
    fn test_area_exterior_edges_close_the_ring() {
        let ring = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 1.0),
        ];
        let area = AreaFeature::new(ring);
        let edges = area.exterior_edges();
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[3].b, Vec3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_exterior_edges_skip_duplicate_points() {
        let ring = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
        ];
        let area = AreaFeature::new(ring);
        assert_eq!(area.exterior_edges().len(), 3);
    }

    #[test]
    fn test_structure_from_ring_derives_walls() {
        let structure = StructureFeature::from_ring(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(2.0, 0.0, 0.0),
                Vec3::new(2.0, 0.0, 2.0),
            ],
            10.0,
        );
        assert_eq!(structure.exterior_edges().len(), 3);
        assert_eq!(structure.height(), 10.0);
        assert!(!structure.is_underground());
        assert!(structure.underground().is_underground());
    }
}
