//! # Tile Data Errors
//!
//! Validation errors raised while assembling tile features.

use thiserror::Error;

/// Errors produced by feature constructors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TileError {
    /// Strip lengths do not account for every polyline point.
    #[error("strip lengths declare {declared} points but {actual} were provided")]
    StripLengthMismatch {
        /// Sum of the declared strip lengths.
        declared: usize,
        /// Number of points actually provided.
        actual: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TileError>();
    }

    #[test]
    fn test_error_message_names_both_counts() {
        let err = TileError::StripLengthMismatch {
            declared: 5,
            actual: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains('5'));
        assert!(msg.contains('3'));
    }
}
