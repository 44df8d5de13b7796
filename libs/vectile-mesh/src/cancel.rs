//! # Cooperative Cancellation
//!
//! The seam between the meshing kernel and whatever drives it. Builds poll
//! [`CancelCheck`] between stages only, never inside tight loops, so a
//! cancelled build abandons its work within one stage.

/// Polled between build stages to abandon superseded work.
pub trait CancelCheck: Sync {
    /// True once the build's output is no longer wanted.
    fn is_cancelled(&self) -> bool;
}

/// A check that never cancels, for synchronous callers.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverCancel;

impl CancelCheck for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_cancel() {
        assert!(!NeverCancel.is_cancelled());
    }
}
