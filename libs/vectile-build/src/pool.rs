//! # Buffer Pool
//!
//! Reusable mesh assembly buffers. Workers acquire a buffer per build and
//! the guard returns it on every exit path: applied results, stale drops,
//! cancellations and panics all funnel through [`PooledMesh`]'s `Drop`.
//!
//! Returned buffers are cleared but keep their vertex and index capacity,
//! so a steady stream of tile builds settles into zero-allocation reuse.

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use vectile_mesh::TileMesh;

// =============================================================================
// POOL
// =============================================================================

/// Shared pool of reusable [`TileMesh`] buffers.
///
/// Cloning is cheap and every clone works the same underlying pool, which
/// is how the scheduler hands it to its worker threads.
#[derive(Debug, Clone, Default)]
pub struct BufferPool {
    shared: Arc<PoolShared>,
}

#[derive(Debug, Default)]
struct PoolShared {
    free: Mutex<Vec<TileMesh>>,
    outstanding: AtomicUsize,
}

impl BufferPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a cleared buffer out of the pool, allocating a fresh one when
    /// none is free. The guard returns it on drop.
    pub fn acquire(&self) -> PooledMesh {
        let mesh = self
            .shared
            .free
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop()
            .unwrap_or_default();
        self.shared.outstanding.fetch_add(1, Ordering::SeqCst);
        PooledMesh {
            mesh,
            shared: Arc::clone(&self.shared),
        }
    }

    /// Number of guards currently alive.
    ///
    /// Zero once every build outcome has settled; leak tests pin this.
    pub fn outstanding(&self) -> usize {
        self.shared.outstanding.load(Ordering::SeqCst)
    }

    /// Number of buffers waiting in the pool.
    pub fn idle(&self) -> usize {
        self.shared
            .free
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

// =============================================================================
// GUARD
// =============================================================================

/// A pooled [`TileMesh`], returned to its pool when dropped.
///
/// Dereferences to the mesh; consumers read or fill it in place and simply
/// drop the guard when done.
#[derive(Debug)]
pub struct PooledMesh {
    mesh: TileMesh,
    shared: Arc<PoolShared>,
}

impl Deref for PooledMesh {
    type Target = TileMesh;

    fn deref(&self) -> &TileMesh {
        &self.mesh
    }
}

impl DerefMut for PooledMesh {
    fn deref_mut(&mut self) -> &mut TileMesh {
        &mut self.mesh
    }
}

impl Drop for PooledMesh {
    fn drop(&mut self) {
        let mut mesh = std::mem::take(&mut self.mesh);
        mesh.clear();
        self.shared
            .free
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(mesh);
        self.shared.outstanding.fetch_sub(1, Ordering::SeqCst);
    }
}
