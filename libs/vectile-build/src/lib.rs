//! # Vectile Build
//!
//! Background build orchestration for tile meshes. A fixed pool of worker
//! threads runs `TileMesher` builds off the render thread; per-slot
//! versioning cancels superseded builds cooperatively at stage checkpoints,
//! and a buffer pool recycles mesh allocations across builds.
//!
//! ## Architecture
//!
//! ```text
//! MeshScheduler::submit(tile, builder, target)
//!       |
//!       v
//! job channel --> worker: acquire pooled buffer
//!                         build_into(tile, version token, buffer)
//!                         |
//!                         v
//! result channel --> tick(): apply to MeshTarget / drop if superseded
//! ```
//!
//! Stale results are dropped unopened; their buffers return to the pool
//! through the guard's `Drop` on every path, cancellation and panic
//! included.

pub mod error;
pub mod pool;
pub mod scheduler;
mod task;

pub use error::{BuildError, BuildResult};
pub use pool::{BufferPool, PooledMesh};
pub use scheduler::{BuilderId, MeshScheduler, MeshTarget, SlotState};
