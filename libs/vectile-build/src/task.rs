//! # Build Tasks
//!
//! The job and outcome types that cross the scheduler's channels, and the
//! worker loop that turns one into the other.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use vectile_mesh::{CancelCheck, TileMesher};
use vectile_tile::{Tile, TileId};

use crate::error::BuildError;
use crate::pool::{BufferPool, PooledMesh};
use crate::scheduler::BuilderId;

/// One tile build handed to a worker.
pub(crate) struct BuildJob {
    pub tile: Arc<Tile>,
    pub builder: BuilderId,
    pub version: u64,
    pub slot_version: Arc<AtomicU64>,
    pub mesher: Arc<TileMesher>,
}

/// What a worker sends back. Carries the version it was built under so the
/// scheduler can drop superseded results unopened.
pub(crate) struct BuildOutcome {
    pub tile: TileId,
    pub builder: BuilderId,
    pub version: u64,
    pub result: Result<Option<PooledMesh>, BuildError>,
}

/// Cooperative cancellation token: a build is stale as soon as its slot's
/// version moves past the one it was submitted with.
pub(crate) struct VersionToken {
    current: Arc<AtomicU64>,
    expected: u64,
}

impl VersionToken {
    pub fn new(current: Arc<AtomicU64>, expected: u64) -> Self {
        Self { current, expected }
    }
}

impl CancelCheck for VersionToken {
    fn is_cancelled(&self) -> bool {
        self.current.load(Ordering::SeqCst) != self.expected
    }
}

/// Worker thread body: drain jobs until the scheduler drops its sender.
pub(crate) fn worker_loop(
    jobs: Receiver<BuildJob>,
    results: Sender<BuildOutcome>,
    pool: BufferPool,
) {
    while let Ok(job) = jobs.recv() {
        let outcome = run_build(&job, &pool);
        if results.send(outcome).is_err() {
            break;
        }
    }
}

/// Runs one build. Panics are caught so a poisoned tile cannot take the
/// worker down; the buffer guard releases on every path, the unwind
/// included.
fn run_build(job: &BuildJob, pool: &BufferPool) -> BuildOutcome {
    let token = VersionToken::new(Arc::clone(&job.slot_version), job.version);
    let mut buffer = pool.acquire();
    let built = catch_unwind(AssertUnwindSafe(|| {
        job.mesher.build_into(&job.tile, &token, &mut buffer)
    }));
    let result = match built {
        Ok(Ok(true)) => Ok(Some(buffer)),
        Ok(Ok(false)) => Ok(None),
        Ok(Err(err)) => Err(BuildError::Mesh(err)),
        Err(_) => Err(BuildError::Panicked),
    };
    BuildOutcome {
        tile: job.tile.id(),
        builder: job.builder,
        version: job.version,
        result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_token_tracks_the_atomic() {
        let version = Arc::new(AtomicU64::new(3));
        let token = VersionToken::new(Arc::clone(&version), 3);
        assert!(!token.is_cancelled());
        version.fetch_add(1, Ordering::SeqCst);
        assert!(token.is_cancelled());
    }
}
