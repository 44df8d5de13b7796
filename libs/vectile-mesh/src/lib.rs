//! # Vectile Mesh
//!
//! Meshing kernel for decoded vector tiles. Per-kind meshers turn features
//! into `TileMesh` fragments (linear features into mitered, smoothed ribbons
//! with semicircular end caps; areas into triangulated flat polygons;
//! structures into extruded footprints with walls), and the combiner folds
//! the fragments into one mesh per tile with index remapping.
//!
//! ## Architecture
//!
//! ```text
//! Tile (from vectile-tile)
//!       |
//!       v
//! TileMesher::build
//!   1. collect active features (LOD gating)     <- cancellation checkpoint
//!   2. per-feature meshing                      <- cancellation checkpoint
//!      ribbon / triangulate / extrude
//!   3. combine (prefix sums, index remapping)   <- cancellation checkpoint
//!       |
//!       v
//! TileMesh (Pod vertices + u32 indices, GPU ready)
//! ```
//!
//! Degenerate features are skipped with a `warn` log and never fail the
//! tile; cancellation surfaces as [`MeshError::Cancelled`] and is observed
//! only between stages.

pub mod builder;
pub mod cancel;
pub mod combine;
pub mod error;
pub mod extrude;
pub mod mesh;
pub mod options;
pub mod ribbon;
pub mod triangulate;

pub use builder::TileMesher;
pub use cancel::{CancelCheck, NeverCancel};
pub use combine::{combine, combine_into, Strategy};
pub use error::{MeshError, MeshResult};
pub use extrude::{mesh_area_feature, mesh_structure_feature};
pub use mesh::TileMesh;
pub use options::{AreaOptions, LodRange, RibbonOptions, StructureOptions, WidthPreset};
pub use ribbon::{appraise_feature, mesh_linear_feature, RibbonAppraisal};
pub use triangulate::{signed_area_xz, triangulate};
