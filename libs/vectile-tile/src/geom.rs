//! # Geometry Primitives
//!
//! Thin wrappers around `glam` types shared by every pipeline stage, plus
//! the GPU vertex layout and the line segment used for wall extrusion.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

pub use glam::{Vec2, Vec3};

/// A position in tile-local space.
///
/// Alias of [`Vec3`]; kept as its own name so feature definitions read as
/// geometry rather than linear algebra.
pub use glam::Vec3 as Point;

/// World up. Ground features lie in the XZ plane.
pub const UP: Vec3 = Vec3::Y;

// =============================================================================
// VERTEX
// =============================================================================

/// One output vertex: position, normal and texture coordinate.
///
/// `#[repr(C)]` and `Pod` so a `&[Vertex]` can be uploaded to the GPU
/// verbatim. Meshers emit these; the combiner copies them with all channels
/// in lockstep.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Tile-local position.
    pub position: Vec3,
    /// Unit surface normal.
    pub normal: Vec3,
    /// Texture coordinate.
    pub uv: Vec2,
}

impl Vertex {
    /// Creates a vertex from its three channels.
    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }

    /// Creates an up-facing vertex, the common case for ground geometry.
    pub fn ground(position: Vec3, uv: Vec2) -> Self {
        Self::new(position, UP, uv)
    }
}

// =============================================================================
// LINE SEGMENT
// =============================================================================

/// A directed segment between two points.
///
/// Structure footprints store their boundary as segments (the wall source);
/// the extrusion mesher turns each one into a quad.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    /// Start point.
    pub a: Point,
    /// End point.
    pub b: Point,
}

impl LineSegment {
    /// Creates a segment from `a` to `b`.
    pub fn new(a: Point, b: Point) -> Self {
        Self { a, b }
    }

    /// Vector from start to end.
    pub fn delta(&self) -> Vec3 {
        self.b - self.a
    }

    /// Segment length.
    pub fn length(&self) -> f32 {
        self.delta().length()
    }

    /// Squared segment length, cheap degenerate check.
    pub fn length_squared(&self) -> f32 {
        self.delta().length_squared()
    }

    /// Unit direction from `a` to `b`, or `None` for a degenerate segment.
    pub fn direction(&self) -> Option<Vec3> {
        self.delta().try_normalize()
    }

    /// Unit normal pointing to the left of travel in the ground plane.
    ///
    /// Exterior footprint rings arrive wound so that this faces away from
    /// the polygon interior, which is the facing the extrusion mesher gives
    /// its walls. `None` for a degenerate segment.
    pub fn outward_normal(&self) -> Option<Vec3> {
        UP.cross(self.delta()).try_normalize()
    }
}
