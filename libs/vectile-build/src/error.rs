//! # Build Errors
//!
//! Error types for the batch scheduler.

use thiserror::Error;
use vectile_mesh::MeshError;

/// Convenience alias used across the scheduler.
pub type BuildResult<T> = Result<T, BuildError>;

/// Errors that can occur while scheduling and running tile builds.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A meshing error surfaced from a worker
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// A worker build panicked; the pool stays alive and the slot recovers
    #[error("build panicked")]
    Panicked,

    /// A submit referenced a builder id that was never registered
    #[error("unknown builder id {index}")]
    UnknownBuilder {
        /// The out-of-range builder index.
        index: usize,
    },
}

impl BuildError {
    /// True for the cooperative cancellation signal.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Mesh(MeshError::Cancelled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BuildError>();
    }

    #[test]
    fn test_mesh_errors_convert() {
        let err: BuildError = MeshError::Cancelled.into();
        assert!(err.is_cancelled());
        assert!(!BuildError::Panicked.is_cancelled());
    }

    #[test]
    fn test_error_messages() {
        let err = BuildError::UnknownBuilder { index: 7 };
        assert_eq!(err.to_string(), "unknown builder id 7");
    }
}
