//! # Mesh Errors
//!
//! Error types for the meshing kernel.

use thiserror::Error;

/// Convenience alias used across the meshing crates.
pub type MeshResult<T> = Result<T, MeshError>;

/// Errors that can occur while meshing a tile.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// A polygon ring could not be triangulated
    #[error("degenerate polygon: {message}")]
    DegeneratePolygon {
        /// What made the ring untriangulatable.
        message: String,
    },

    /// Mesher options failed validation
    #[error("invalid options: {message}")]
    InvalidOptions {
        /// Which option and why.
        message: String,
    },

    /// The build was cancelled cooperatively between stages.
    ///
    /// A control-flow signal rather than a defect: callers drop the partial
    /// output and report the build as cancelled, not failed.
    #[error("build cancelled")]
    Cancelled,

    /// Too many vertices
    #[error("too many vertices: {count} (max: {max})")]
    TooManyVertices {
        /// Vertices the build would emit.
        count: usize,
        /// Configured ceiling.
        max: usize,
    },

    /// Too many triangles
    #[error("too many triangles: {count} (max: {max})")]
    TooManyTriangles {
        /// Triangles the build would emit.
        count: usize,
        /// Configured ceiling.
        max: usize,
    },
}

impl MeshError {
    /// Creates a degenerate polygon error.
    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::DegeneratePolygon {
            message: message.into(),
        }
    }

    /// Creates an invalid options error.
    pub fn invalid_options(message: impl Into<String>) -> Self {
        Self::InvalidOptions {
            message: message.into(),
        }
    }

    /// True for the cooperative cancellation signal.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// True for per-feature defects a tile build recovers from by skipping
    /// the feature.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::DegeneratePolygon { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MeshError>();
    }

    #[test]
    fn test_degenerate_is_recoverable() {
        let err = MeshError::degenerate("collinear ring");
        assert!(err.is_recoverable());
        assert!(!err.is_cancelled());
    }

    #[test]
    fn test_cancelled_is_not_recoverable() {
        assert!(MeshError::Cancelled.is_cancelled());
        assert!(!MeshError::Cancelled.is_recoverable());
    }

    #[test]
    fn test_error_messages() {
        let err = MeshError::TooManyVertices {
            count: 11,
            max: 10,
        };
        assert_eq!(err.to_string(), "too many vertices: 11 (max: 10)");
    }
}
