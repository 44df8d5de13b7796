//! # Configuration Constants
//!
//! Centralized constants for the vectile meshing pipeline. All geometry
//! tolerances, ribbon shaping parameters, extrusion bounds, and scheduler
//! defaults are defined here.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Ribbon**: Linear-feature mesher defaults (bends, smoothing, caps, widths)
//! - **Extrusion**: Structure height displacement bounds
//! - **Limits**: Maximum values for safety bounds
//! - **Scheduler**: Batch build defaults

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// Used for determining if two floating-point values are "equal" within
/// numerical tolerance, and for rejecting degenerate cross products before
/// trusting their sign.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f32, b: f32) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-7));
/// ```
pub const EPSILON: f32 = 1e-6;

/// Minimum squared length for a segment to contribute a tangent.
///
/// Consecutive duplicate points in a polyline produce zero-length segments
/// whose direction is undefined. Segments with a squared length below this
/// value are skipped when tangents and bi-normals are averaged.
///
/// # Example
///
/// ```rust
/// use config::constants::MIN_SEGMENT_LENGTH_SQUARED;
///
/// let dx = 1e-5_f32;
/// let degenerate = dx * dx < MIN_SEGMENT_LENGTH_SQUARED;
/// assert!(degenerate);
/// ```
pub const MIN_SEGMENT_LENGTH_SQUARED: f32 = 1e-8;

// =============================================================================
// RIBBON CONSTANTS (linear feature mesher)
// =============================================================================

/// Default dot-product threshold below which a corner counts as a bend.
///
/// At an interior polyline corner the unit tangents of the incoming and
/// outgoing segments are compared; when their dot product falls below this
/// threshold (an angle wider than roughly 31 degrees) the corner is cut and
/// smoothed before meshing.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_BEND_THRESHOLD;
///
/// let straight = 0.999_f32;
/// let sharp = 0.2_f32;
/// assert!(straight >= DEFAULT_BEND_THRESHOLD);
/// assert!(sharp < DEFAULT_BEND_THRESHOLD);
/// ```
pub const DEFAULT_BEND_THRESHOLD: f32 = 0.85;

/// Lower bound for the bend threshold.
pub const BEND_THRESHOLD_MIN: f32 = 0.7;

/// Upper bound for the bend threshold.
///
/// Above 0.9 even gentle curves fall below the threshold and nearly every
/// interior corner of a polyline gets cut.
pub const BEND_THRESHOLD_MAX: f32 = 0.9;

/// Default interpolation factor for corner-cut smoothing.
///
/// A bend corner (p0, p1, p2) is replaced by two points pulled from p1
/// toward its neighbors by this fraction. Larger values cut deeper into
/// the corner and round it more aggressively.
///
/// # Example
///
/// ```rust
/// use config::constants::{DEFAULT_SMOOTH_FACTOR, SMOOTH_FACTOR_MIN, SMOOTH_FACTOR_MAX};
///
/// assert!(DEFAULT_SMOOTH_FACTOR >= SMOOTH_FACTOR_MIN);
/// assert!(DEFAULT_SMOOTH_FACTOR <= SMOOTH_FACTOR_MAX);
/// ```
pub const DEFAULT_SMOOTH_FACTOR: f32 = 0.15;

/// Lower bound for the smoothing factor.
pub const SMOOTH_FACTOR_MIN: f32 = 0.1;

/// Upper bound for the smoothing factor.
///
/// Factors above 0.25 move the cut points past the segment midpoints once
/// both ends of a short segment are smoothed, which can fold the polyline
/// back on itself.
pub const SMOOTH_FACTOR_MAX: f32 = 0.25;

/// Maximum recursion depth for corner-cut smoothing.
///
/// Each level of recursion can roughly double the number of points a sharp
/// corner contributes, so the depth is kept small. At the depth floor the
/// corner is emitted as-is even if it still exceeds the bend threshold.
///
/// # Example
///
/// ```rust
/// use config::constants::MAX_SMOOTH_DEPTH;
///
/// let depth = 2;
/// assert!(depth < MAX_SMOOTH_DEPTH);
/// ```
pub const MAX_SMOOTH_DEPTH: u32 = 3;

/// Default number of fan vertices in a semicircular ribbon end cap.
///
/// # Example
///
/// ```rust
/// use config::constants::{DEFAULT_END_CAP_POINTS, END_CAP_POINTS_MIN, END_CAP_POINTS_MAX};
///
/// assert!(DEFAULT_END_CAP_POINTS >= END_CAP_POINTS_MIN);
/// assert!(DEFAULT_END_CAP_POINTS <= END_CAP_POINTS_MAX);
/// ```
pub const DEFAULT_END_CAP_POINTS: usize = 4;

/// Minimum accepted end cap vertex count.
pub const END_CAP_POINTS_MIN: usize = 1;

/// Maximum accepted end cap vertex count.
///
/// Eight fan vertices already give a visually smooth semicircle at map
/// scales; higher counts only inflate the vertex budget.
pub const END_CAP_POINTS_MAX: usize = 8;

/// Zoom level the ribbon width presets are authored against.
///
/// A builder whose maximum zoom sits below this reference gets its widths
/// scaled up by `base_size_factor` so lines stay readable on coarser tiles.
///
/// # Example
///
/// ```rust
/// use config::constants::{base_size_factor, REFERENCE_ZOOM};
///
/// assert_eq!(base_size_factor(REFERENCE_ZOOM), 1.0);
/// assert_eq!(base_size_factor(REFERENCE_ZOOM - 1), 2.0);
/// ```
pub const REFERENCE_ZOOM: u8 = 16;

/// Small ribbon width preset, minimum (tile-local units).
pub const SMALL_WIDTH_MIN: f32 = 0.5;

/// Small ribbon width preset, maximum (tile-local units).
pub const SMALL_WIDTH_MAX: f32 = 2.0;

/// Medium ribbon width preset, minimum (tile-local units).
pub const MEDIUM_WIDTH_MIN: f32 = 1.0;

/// Medium ribbon width preset, maximum (tile-local units).
pub const MEDIUM_WIDTH_MAX: f32 = 4.0;

/// Large ribbon width preset, minimum (tile-local units).
pub const LARGE_WIDTH_MIN: f32 = 2.0;

/// Large ribbon width preset, maximum (tile-local units).
pub const LARGE_WIDTH_MAX: f32 = 8.0;

// =============================================================================
// EXTRUSION CONSTANTS (structure mesher)
// =============================================================================

/// Default lower clamp bound for structure height displacement.
pub const DEFAULT_MIN_HEIGHT: f32 = 0.0;

/// Default upper clamp bound for structure height displacement.
///
/// Source data frequently carries raw building heights in meters; the clamp
/// keeps footprint tops within a narrow band of tile-local units so distant
/// tiles do not sprout towers taller than the tile itself.
///
/// # Example
///
/// ```rust
/// use config::constants::{DEFAULT_MIN_HEIGHT, DEFAULT_MAX_HEIGHT};
///
/// let raw_height = 5.0_f32;
/// let clamped = raw_height.clamp(DEFAULT_MIN_HEIGHT, DEFAULT_MAX_HEIGHT);
/// assert_eq!(clamped, DEFAULT_MAX_HEIGHT);
/// ```
pub const DEFAULT_MAX_HEIGHT: f32 = 0.2;

// =============================================================================
// LIMIT CONSTANTS
// =============================================================================

/// Maximum number of vertices in a single combined tile mesh.
///
/// Safety limit to prevent memory exhaustion from pathological tile data.
///
/// # Example
///
/// ```rust
/// use config::constants::MAX_VERTICES;
///
/// let vertex_count = 1000;
/// assert!(vertex_count < MAX_VERTICES);
/// ```
pub const MAX_VERTICES: usize = 10_000_000;

/// Maximum number of triangles in a single combined tile mesh.
///
/// Safety limit to prevent memory exhaustion from pathological tile data.
pub const MAX_TRIANGLES: usize = 10_000_000;

// =============================================================================
// SCHEDULER CONSTANTS
// =============================================================================

/// Ticks a build may stay in flight before the scheduler force-completes it.
///
/// Bounds worst-case latency: once a slot's age exceeds this value the
/// scheduler blocks on the result channel until that slot settles.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_MAX_BUILD_AGE;
///
/// let age = 3;
/// assert!(age <= DEFAULT_MAX_BUILD_AGE);
/// ```
pub const DEFAULT_MAX_BUILD_AGE: u32 = 8;

/// Worker thread count used when available parallelism cannot be queried.
pub const FALLBACK_WORKER_THREADS: usize = 2;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Computes the base size factor for a builder's maximum zoom level.
///
/// Widths are authored for [`REFERENCE_ZOOM`]; a builder capped at a coarser
/// zoom doubles its widths for every level below the reference, and a finer
/// cap halves them. Computed once per builder, not per tile.
///
/// # Example
///
/// ```rust
/// use config::constants::base_size_factor;
///
/// assert_eq!(base_size_factor(14), 4.0);
/// assert_eq!(base_size_factor(17), 0.5);
/// ```
pub fn base_size_factor(max_zoom: u8) -> f32 {
    2.0_f32.powi(REFERENCE_ZOOM as i32 - max_zoom as i32)
}

/// Computes the ribbon width for one tile.
///
/// Scales the preset maximum by the builder's base size factor, normalizes
/// by the tile's physical size, and clamps into the preset's range.
///
/// # Arguments
///
/// * `width_min` - Preset minimum width (tile-local units)
/// * `width_max` - Preset maximum width (tile-local units)
/// * `base_size_factor` - Precomputed via [`base_size_factor`]
/// * `tile_size` - The tile's physical size
///
/// # Example
///
/// ```rust
/// use config::constants::compute_ribbon_width;
///
/// // A tiny tile saturates at the preset maximum.
/// let w = compute_ribbon_width(1.0, 4.0, 1.0, 0.5);
/// assert_eq!(w, 4.0);
///
/// // A huge tile floors at the preset minimum.
/// let w = compute_ribbon_width(1.0, 4.0, 1.0, 1e9);
/// assert_eq!(w, 1.0);
/// ```
pub fn compute_ribbon_width(
    width_min: f32,
    width_max: f32,
    base_size_factor: f32,
    tile_size: f64,
) -> f32 {
    if tile_size <= 0.0 {
        return width_max;
    }
    let scaled = width_max * base_size_factor / tile_size as f32;
    scaled.clamp(width_min, width_max)
}
