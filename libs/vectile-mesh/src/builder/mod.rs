//! # Tile Mesh Builder
//!
//! The front door of the crate: configure per-kind stages once, then turn
//! tiles into combined meshes.
//!
//! A build runs three stages with a cancellation checkpoint between each:
//!
//! 1. **Collect**: keep the features whose kind has a stage configured
//!    and active at the tile's zoom. The ribbon width for this tile is
//!    resolved here.
//! 2. **Mesh**: run every job to a per-feature mesh, sequentially or on
//!    the rayon pool. Degenerate features are logged and skipped; other
//!    failures abort the build.
//! 3. **Combine**: fold the per-feature meshes into one tile mesh.
//!
//! Checkpoints make cancellation cooperative: a stale build stops at the
//! next boundary instead of being torn down mid-write.

use config::constants::{base_size_factor, compute_ribbon_width};
use rayon::prelude::*;
use vectile_tile::{AreaFeature, LinearFeature, StructureFeature, Tile};

use crate::cancel::CancelCheck;
use crate::combine::{combine_into, Strategy};
use crate::error::{MeshError, MeshResult};
use crate::extrude::{mesh_area_feature, mesh_structure_feature};
use crate::mesh::TileMesh;
use crate::options::{AreaOptions, RibbonOptions, StructureOptions};
use crate::ribbon::mesh_linear_feature;

// =============================================================================
// MESHER
// =============================================================================

/// Configured meshing stages for one tile stream.
///
/// Stages are optional; an unconfigured kind is ignored wholesale. The
/// mesher is immutable after construction and safe to share across build
/// threads.
#[derive(Debug, Clone)]
pub struct TileMesher {
    linear: Option<RibbonOptions>,
    area: Option<AreaOptions>,
    structure: Option<StructureOptions>,
    strategy: Strategy,
    base_size_factor: f32,
}

impl TileMesher {
    /// Creates a mesher with no stages configured.
    pub fn new() -> Self {
        Self {
            linear: None,
            area: None,
            structure: None,
            strategy: Strategy::default(),
            base_size_factor: 1.0,
        }
    }

    /// Enables the linear stage.
    ///
    /// The ribbon width scale is anchored at the stage's maximum zoom, so
    /// ribbons keep their on-screen width across the LOD range. Fails when
    /// the options do not validate.
    pub fn with_linear(mut self, options: RibbonOptions) -> MeshResult<Self> {
        let options = options.normalized()?;
        self.base_size_factor = base_size_factor(options.lod.max_zoom);
        self.linear = Some(options);
        Ok(self)
    }

    /// Enables the flat area stage.
    pub fn with_areas(mut self, options: AreaOptions) -> Self {
        self.area = Some(options);
        self
    }

    /// Enables the structure stage. Fails when the height band does not
    /// validate.
    pub fn with_structures(mut self, options: StructureOptions) -> MeshResult<Self> {
        self.structure = Some(options.normalized()?);
        Ok(self)
    }

    /// Selects how per-feature work is scheduled.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Builds the combined mesh for one tile.
    ///
    /// Returns `Ok(None)` when nothing is active at the tile's zoom or the
    /// tile holds no meshable features. Stops with
    /// [`MeshError::Cancelled`] at the next stage boundary once `cancel`
    /// reports true.
    pub fn build(&self, tile: &Tile, cancel: &dyn CancelCheck) -> MeshResult<Option<TileMesh>> {
        let mut out = TileMesh::new();
        if self.build_into(tile, cancel, &mut out)? {
            Ok(Some(out))
        } else {
            Ok(None)
        }
    }

    /// Builds into a caller-provided mesh, reusing its buffer capacity.
    ///
    /// `out` is cleared first and stays cleared when the build produces
    /// nothing or fails. Returns whether geometry was produced. The batch
    /// scheduler runs its pooled buffers through this.
    pub fn build_into(
        &self,
        tile: &Tile,
        cancel: &dyn CancelCheck,
        out: &mut TileMesh,
    ) -> MeshResult<bool> {
        out.clear();
        checkpoint(cancel)?;
        let jobs = self.collect_jobs(tile);
        if jobs.is_empty() {
            return Ok(false);
        }

        checkpoint(cancel)?;
        let meshes: Vec<TileMesh> = match self.strategy {
            Strategy::Sequential => jobs.iter().map(MeshJob::run).collect::<MeshResult<_>>()?,
            Strategy::Parallel => jobs
                .par_iter()
                .map(MeshJob::run)
                .collect::<MeshResult<_>>()?,
        };

        checkpoint(cancel)?;
        combine_into(out, &meshes, self.strategy)?;
        Ok(!out.is_empty())
    }

    fn collect_jobs<'a>(&'a self, tile: &'a Tile) -> Vec<MeshJob<'a>> {
        let zoom = tile.zoom();
        let mut jobs = Vec::new();
        if let Some(options) = &self.linear {
            if options.lod.contains(zoom) && !tile.linear_features().is_empty() {
                let (width_min, width_max) = options.size.bounds();
                let width = compute_ribbon_width(
                    width_min,
                    width_max,
                    self.base_size_factor,
                    tile.physical_size(),
                );
                jobs.extend(tile.linear_features().iter().map(|feature| MeshJob::Ribbon {
                    feature,
                    options,
                    width,
                }));
            }
        }
        if let Some(options) = &self.area {
            if options.lod.contains(zoom) {
                jobs.extend(
                    tile.area_features()
                        .iter()
                        .map(|feature| MeshJob::Area { feature, options }),
                );
            }
        }
        if let Some(options) = &self.structure {
            if options.lod.contains(zoom) {
                jobs.extend(
                    tile.structure_features()
                        .iter()
                        .map(|feature| MeshJob::Structure { feature, options }),
                );
            }
        }
        jobs
    }
}

impl Default for TileMesher {
    fn default() -> Self {
        Self::new()
    }
}

fn checkpoint(cancel: &dyn CancelCheck) -> MeshResult<()> {
    if cancel.is_cancelled() {
        return Err(MeshError::Cancelled);
    }
    Ok(())
}

// =============================================================================
// JOBS
// =============================================================================

/// One feature bound to its stage configuration.
enum MeshJob<'a> {
    Ribbon {
        feature: &'a LinearFeature,
        options: &'a RibbonOptions,
        width: f32,
    },
    Area {
        feature: &'a AreaFeature,
        options: &'a AreaOptions,
    },
    Structure {
        feature: &'a StructureFeature,
        options: &'a StructureOptions,
    },
}

impl MeshJob<'_> {
    /// Meshes the feature. A degenerate polygon downgrades to an empty
    /// mesh with a warning so one bad feature cannot sink its tile.
    fn run(&self) -> MeshResult<TileMesh> {
        let result = match self {
            MeshJob::Ribbon {
                feature,
                options,
                width,
            } => mesh_linear_feature(feature, options, *width),
            MeshJob::Area { feature, options } => mesh_area_feature(feature, options),
            MeshJob::Structure { feature, options } => mesh_structure_feature(feature, options),
        };
        match result {
            Err(MeshError::DegeneratePolygon { message }) => {
                log::warn!("skipping degenerate feature: {}", message);
                Ok(TileMesh::new())
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests;
