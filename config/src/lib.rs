//! # Config Crate
//!
//! Centralized configuration constants for the vectile meshing pipeline.
//! All magic numbers and tunable parameters are defined here to ensure
//! consistency across crates and easy configuration management.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{EPSILON, DEFAULT_BEND_THRESHOLD};
//!
//! // Use EPSILON for floating-point comparisons
//! let value: f32 = 0.0000001; // 1e-7, smaller than EPSILON (1e-6)
//! let is_zero = value.abs() < EPSILON;
//! assert!(is_zero);
//!
//! // Use the bend threshold to classify polyline corners
//! let tangent_dot = 0.5_f32;
//! let is_bend = tangent_dot < DEFAULT_BEND_THRESHOLD;
//! assert!(is_bend);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Tile-Local**: Values are expressed in tile-local units (Y up, XZ ground)
//! - **Well-Documented**: Every constant has clear documentation

pub mod constants;
