//! # Mesher Options
//!
//! Per-kind configuration with validation. Builders construct these once and
//! call [`normalized`](RibbonOptions::normalized) to clamp soft parameters
//! into their documented ranges and reject nonsense outright.

use config::constants::{
    BEND_THRESHOLD_MAX, BEND_THRESHOLD_MIN, DEFAULT_BEND_THRESHOLD, DEFAULT_END_CAP_POINTS,
    DEFAULT_MAX_HEIGHT, DEFAULT_MIN_HEIGHT, DEFAULT_SMOOTH_FACTOR, END_CAP_POINTS_MAX,
    END_CAP_POINTS_MIN, LARGE_WIDTH_MAX, LARGE_WIDTH_MIN, MEDIUM_WIDTH_MAX, MEDIUM_WIDTH_MIN,
    SMALL_WIDTH_MAX, SMALL_WIDTH_MIN, SMOOTH_FACTOR_MAX, SMOOTH_FACTOR_MIN,
};
use serde::{Deserialize, Serialize};
use vectile_tile::geom::Vec2;

use crate::error::{MeshError, MeshResult};

// =============================================================================
// LOD RANGE
// =============================================================================

/// Inclusive zoom range in which a builder is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LodRange {
    /// Coarsest zoom the builder meshes.
    pub min_zoom: u8,
    /// Finest zoom the builder meshes. Widths are scaled against this.
    pub max_zoom: u8,
}

impl LodRange {
    /// Creates a range; fails when inverted.
    pub fn new(min_zoom: u8, max_zoom: u8) -> MeshResult<Self> {
        if min_zoom > max_zoom {
            return Err(MeshError::invalid_options(format!(
                "lod range inverted: min_zoom {min_zoom} > max_zoom {max_zoom}"
            )));
        }
        Ok(Self { min_zoom, max_zoom })
    }

    /// True when a tile at `zoom` falls inside the range.
    pub fn contains(&self, zoom: u8) -> bool {
        zoom >= self.min_zoom && zoom <= self.max_zoom
    }
}

impl Default for LodRange {
    fn default() -> Self {
        Self {
            min_zoom: 0,
            max_zoom: config::constants::REFERENCE_ZOOM,
        }
    }
}

// =============================================================================
// WIDTH PRESET
// =============================================================================

/// Ribbon width selection: three named presets plus a custom range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WidthPreset {
    /// Footpaths, minor lines.
    Small,
    /// Ordinary roads, streams.
    Medium,
    /// Highways, rivers.
    Large,
    /// Explicit (min, max) bounds in tile-local units.
    Custom {
        /// Narrowest allowed width.
        min: f32,
        /// Widest allowed width.
        max: f32,
    },
}

impl WidthPreset {
    /// The (min, max) width bounds this preset resolves to.
    pub fn bounds(&self) -> (f32, f32) {
        match *self {
            WidthPreset::Small => (SMALL_WIDTH_MIN, SMALL_WIDTH_MAX),
            WidthPreset::Medium => (MEDIUM_WIDTH_MIN, MEDIUM_WIDTH_MAX),
            WidthPreset::Large => (LARGE_WIDTH_MIN, LARGE_WIDTH_MAX),
            WidthPreset::Custom { min, max } => (min, max),
        }
    }

    fn validate(&self) -> MeshResult<()> {
        let (min, max) = self.bounds();
        if !min.is_finite() || !max.is_finite() || min <= 0.0 || min > max {
            return Err(MeshError::invalid_options(format!(
                "width bounds must satisfy 0 < min <= max, got ({min}, {max})"
            )));
        }
        Ok(())
    }
}

// =============================================================================
// RIBBON OPTIONS
// =============================================================================

/// Configuration for the linear feature mesher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RibbonOptions {
    /// Width preset.
    pub size: WidthPreset,
    /// Fan vertices per end cap, clamped to the documented range.
    pub end_cap_points: usize,
    /// Tangent dot product below which a corner is smoothed, clamped to
    /// the documented range.
    pub bend_threshold: f32,
    /// Corner cut fraction, clamped to the documented range.
    pub smooth_factor: f32,
    /// Zoom range this builder is active in.
    pub lod: LodRange,
}

impl RibbonOptions {
    /// Creates options with the documented defaults.
    pub fn new(size: WidthPreset, lod: LodRange) -> Self {
        Self {
            size,
            end_cap_points: DEFAULT_END_CAP_POINTS,
            bend_threshold: DEFAULT_BEND_THRESHOLD,
            smooth_factor: DEFAULT_SMOOTH_FACTOR,
            lod,
        }
    }

    /// Returns a copy with soft parameters clamped into range.
    ///
    /// Fails on hard errors: non-finite parameters or bad width bounds.
    pub fn normalized(&self) -> MeshResult<Self> {
        self.size.validate()?;
        if !self.bend_threshold.is_finite() || self.bend_threshold.abs() > 1.0 {
            return Err(MeshError::invalid_options(format!(
                "bend threshold must be a cosine in [-1, 1], got {}",
                self.bend_threshold
            )));
        }
        if !self.smooth_factor.is_finite() {
            return Err(MeshError::invalid_options("smooth factor is not finite"));
        }
        let mut normalized = self.clone();
        normalized.end_cap_points = self
            .end_cap_points
            .clamp(END_CAP_POINTS_MIN, END_CAP_POINTS_MAX);
        normalized.bend_threshold = self
            .bend_threshold
            .clamp(BEND_THRESHOLD_MIN, BEND_THRESHOLD_MAX);
        normalized.smooth_factor = self.smooth_factor.clamp(SMOOTH_FACTOR_MIN, SMOOTH_FACTOR_MAX);
        Ok(normalized)
    }
}

impl Default for RibbonOptions {
    fn default() -> Self {
        Self::new(WidthPreset::Medium, LodRange::default())
    }
}

// =============================================================================
// AREA OPTIONS
// =============================================================================

/// Configuration for the flat area mesher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaOptions {
    /// Atlas coordinate applied uniformly to every footprint vertex.
    pub atlas_uv: Vec2,
    /// Zoom range this builder is active in.
    pub lod: LodRange,
}

impl AreaOptions {
    /// Creates options with a zero atlas coordinate.
    pub fn new(lod: LodRange) -> Self {
        Self {
            atlas_uv: Vec2::ZERO,
            lod,
        }
    }
}

impl Default for AreaOptions {
    fn default() -> Self {
        Self::new(LodRange::default())
    }
}

// =============================================================================
// STRUCTURE OPTIONS
// =============================================================================

/// Configuration for the extruded structure mesher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureOptions {
    /// Atlas coordinate applied uniformly to top-face vertices.
    pub atlas_uv: Vec2,
    /// Lower clamp bound for height displacement.
    pub min_height: f32,
    /// Upper clamp bound for height displacement.
    pub max_height: f32,
    /// Zoom range this builder is active in.
    pub lod: LodRange,
}

impl StructureOptions {
    /// Creates options with the documented default height band.
    pub fn new(lod: LodRange) -> Self {
        Self {
            atlas_uv: Vec2::ZERO,
            min_height: DEFAULT_MIN_HEIGHT,
            max_height: DEFAULT_MAX_HEIGHT,
            lod,
        }
    }

    /// Validates the height band.
    pub fn normalized(&self) -> MeshResult<Self> {
        if !self.min_height.is_finite() || !self.max_height.is_finite() {
            return Err(MeshError::invalid_options("height bounds are not finite"));
        }
        if self.min_height > self.max_height {
            return Err(MeshError::invalid_options(format!(
                "height bounds inverted: min {} > max {}",
                self.min_height, self.max_height
            )));
        }
        Ok(self.clone())
    }
}

impl Default for StructureOptions {
    fn default() -> Self {
        Self::new(LodRange::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lod_range_rejects_inverted() {
        assert!(LodRange::new(10, 5).is_err());
        let range = LodRange::new(5, 10).unwrap();
        assert!(range.contains(5));
        assert!(range.contains(10));
        assert!(!range.contains(11));
        assert!(!range.contains(4));
    }

    #[test]
    fn test_width_presets_resolve_to_config_bounds() {
        assert_eq!(WidthPreset::Small.bounds(), (SMALL_WIDTH_MIN, SMALL_WIDTH_MAX));
        assert_eq!(WidthPreset::Custom { min: 0.25, max: 3.0 }.bounds(), (0.25, 3.0));
    }

    #[test]
    fn test_ribbon_defaults_pass_normalization() {
        let options = RibbonOptions::default().normalized().unwrap();
        assert_eq!(options.end_cap_points, DEFAULT_END_CAP_POINTS);
        assert!((options.smooth_factor - DEFAULT_SMOOTH_FACTOR).abs() < 1e-6);
    }

    #[test]
    fn test_ribbon_normalization_clamps_soft_parameters() {
        let mut options = RibbonOptions::default();
        options.end_cap_points = 100;
        options.smooth_factor = 0.9;
        options.bend_threshold = 0.95;
        let normalized = options.normalized().unwrap();
        assert_eq!(normalized.end_cap_points, END_CAP_POINTS_MAX);
        assert!((normalized.smooth_factor - SMOOTH_FACTOR_MAX).abs() < 1e-6);
        assert!((normalized.bend_threshold - BEND_THRESHOLD_MAX).abs() < 1e-6);

        options.end_cap_points = 0;
        options.smooth_factor = 0.0;
        options.bend_threshold = 0.2;
        let normalized = options.normalized().unwrap();
        assert_eq!(normalized.end_cap_points, END_CAP_POINTS_MIN);
        assert!((normalized.smooth_factor - SMOOTH_FACTOR_MIN).abs() < 1e-6);
        assert!((normalized.bend_threshold - BEND_THRESHOLD_MIN).abs() < 1e-6);
    }

    #[test]
    fn test_ribbon_normalization_rejects_bad_custom_width() {
        let mut options = RibbonOptions::default();
        options.size = WidthPreset::Custom { min: 4.0, max: 1.0 };
        assert!(matches!(
            options.normalized(),
            Err(MeshError::InvalidOptions { .. })
        ));
    }

    #[test]
    fn test_ribbon_normalization_rejects_bad_threshold() {
        let mut options = RibbonOptions::default();
        options.bend_threshold = 2.0;
        assert!(options.normalized().is_err());
    }

    #[test]
    fn test_structure_options_reject_inverted_heights() {
        let mut options = StructureOptions::default();
        options.min_height = 1.0;
        options.max_height = 0.5;
        assert!(options.normalized().is_err());
    }

    #[test]
    fn test_structure_defaults() {
        let options = StructureOptions::default();
        assert_eq!(options.min_height, DEFAULT_MIN_HEIGHT);
        assert_eq!(options.max_height, DEFAULT_MAX_HEIGHT);
    }
}
