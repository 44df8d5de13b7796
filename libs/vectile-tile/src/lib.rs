//! # Vectile Tile Data Model
//!
//! Decoded vector-tile data consumed by the meshing pipeline. A [`Tile`]
//! holds per-kind feature lists (linear, area, structure, point) in decode
//! order; the meshing crates read it through `Arc<Tile>` and never mutate it.
//!
//! ## Coordinate Convention
//!
//! All geometry is tile-local: Y is up, the ground plane is XZ. Positions,
//! normals and texture coordinates are `f32`; the tile's physical size is
//! carried separately as `f64` in the [`Tile`] header.
//!
//! ## Pipeline Position
//!
//! ```text
//! decoder (out of scope)
//!       |
//!       v
//! vectile-tile (this crate: Tile, features, Point/Vertex/LineSegment)
//!       |
//!       v
//! vectile-mesh (triangulator, meshers, combiner)
//!       |
//!       v
//! vectile-build (batch scheduler)
//! ```

pub mod error;
pub mod feature;
pub mod geom;
pub mod tile;

pub use error::TileError;
pub use feature::{AreaFeature, FeatureKind, LinearFeature, PointFeature, StructureFeature};
pub use geom::{LineSegment, Point, Vertex, UP};
pub use tile::{Tile, TileId};
