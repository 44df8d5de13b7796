//! # Mesh Scheduler
//!
//! Background tile meshing over a fixed worker pool. Each `(TileId,
//! BuilderId)` pair owns a slot with a monotonically increasing version;
//! submitting bumps the version so a stale in-flight build cancels
//! cooperatively at its next checkpoint, and at most one build per slot is
//! ever in flight. Finished results drain on [`MeshScheduler::tick`] without
//! blocking, except for slots whose age passed `max_build_age`, which are
//! force-completed by blocking on the result channel until they settle.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use config::constants::{DEFAULT_MAX_BUILD_AGE, FALLBACK_WORKER_THREADS};
use crossbeam_channel::{unbounded, Receiver, Sender};
use vectile_mesh::TileMesher;
use vectile_tile::{Tile, TileId};

use crate::error::{BuildError, BuildResult};
use crate::pool::{BufferPool, PooledMesh};
use crate::task::{worker_loop, BuildJob, BuildOutcome};

// ============================================================================
// Public Types
// ============================================================================

/// Handle for a mesher registered with [`MeshScheduler::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BuilderId(pub(crate) usize);

/// Lifecycle of one `(TileId, BuilderId)` slot.
///
/// A slot rests in `Completed` until the next submission moves it back
/// through `Building`; a failed build falls back to `Idle`. `Cancelled`
/// only shows while a cancelled slot waits out its superseded build; once
/// nothing is in flight the slot is released and reads `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotState {
    /// Nothing in flight and no result to show.
    #[default]
    Idle,
    /// A build is queued or running.
    Building,
    /// The latest build finished and its result was applied.
    Completed,
    /// The latest build was cancelled before it could finish.
    Cancelled,
}

/// Seam to the rendering side.
///
/// The scheduler applies finished meshes here; `None` clears whatever the
/// target currently shows. The pooled guard travels with the mesh so the
/// buffer returns to the pool once the target is done with it.
pub trait MeshTarget: Send {
    /// Receives the outcome of the latest build for this slot.
    fn apply(&mut self, mesh: Option<PooledMesh>);
}

// ============================================================================
// Scheduler
// ============================================================================

struct Slot {
    version: Arc<AtomicU64>,
    state: SlotState,
    /// Ticks spent in `Building`; reset whenever the slot settles or restarts.
    age: u32,
    /// A job for this slot is queued or running and its outcome has not
    /// drained yet. `submit` parks on this rather than on `state`: a
    /// cancelled slot can still have its superseded build out.
    in_flight: bool,
    /// A newer submission arrived while a build was in flight; enqueue it
    /// when the stale outcome drains.
    pending: bool,
    target: Box<dyn MeshTarget>,
    tile: Arc<Tile>,
}

/// Schedules tile mesh builds across background workers.
///
/// Meshers are registered once and shared with the workers; tiles are
/// submitted per `(tile, builder)` slot and finished meshes are handed to
/// the slot's [`MeshTarget`] during [`tick`](MeshScheduler::tick). Dropping
/// the scheduler closes the job channel and joins the workers.
pub struct MeshScheduler {
    meshers: Vec<Arc<TileMesher>>,
    pool: BufferPool,
    jobs: Option<Sender<BuildJob>>,
    results: Receiver<BuildOutcome>,
    slots: HashMap<(TileId, BuilderId), Slot>,
    workers: Vec<JoinHandle<()>>,
    max_build_age: u32,
}

impl MeshScheduler {
    /// Creates a scheduler with the default worker count, one less than the
    /// available parallelism and at least one.
    pub fn new() -> Self {
        Self::with_workers(default_worker_count())
    }

    /// Creates a scheduler with an explicit worker count (minimum one).
    pub fn with_workers(worker_count: usize) -> Self {
        let worker_count = worker_count.max(1);
        let (job_tx, job_rx) = unbounded::<BuildJob>();
        let (result_tx, result_rx) = unbounded::<BuildOutcome>();
        let pool = BufferPool::new();

        let workers = (0..worker_count)
            .map(|_| {
                let jobs = job_rx.clone();
                let results = result_tx.clone();
                let pool = pool.clone();
                thread::spawn(move || worker_loop(jobs, results, pool))
            })
            .collect();

        Self {
            meshers: Vec::new(),
            pool,
            jobs: Some(job_tx),
            results: result_rx,
            slots: HashMap::new(),
            workers,
            max_build_age: DEFAULT_MAX_BUILD_AGE,
        }
    }

    /// Overrides how many ticks a build may stay in flight before `tick`
    /// blocks on its result.
    pub fn with_max_build_age(mut self, ticks: u32) -> Self {
        self.max_build_age = ticks;
        self
    }

    /// Registers a mesher and returns the id to submit tiles under.
    pub fn register(&mut self, mesher: TileMesher) -> BuilderId {
        self.meshers.push(Arc::new(mesher));
        BuilderId(self.meshers.len() - 1)
    }

    /// Number of worker threads serving the job channel.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Mesh buffers currently held by in-flight builds or applied results.
    pub fn outstanding_buffers(&self) -> usize {
        self.pool.outstanding()
    }

    /// The pool backing this scheduler's mesh buffers.
    pub fn pool(&self) -> &BufferPool {
        &self.pool
    }

    /// Queues a build of `tile` under `builder`, replacing the slot's target.
    ///
    /// Bumping the slot version cancels any in-flight build for the same
    /// slot; the new job is enqueued immediately when nothing is in flight,
    /// or once the superseded outcome drains when a build still is.
    /// Whatever the target currently shows stays untouched until the
    /// replacement mesh arrives.
    pub fn submit(
        &mut self,
        tile: Arc<Tile>,
        builder: BuilderId,
        target: Box<dyn MeshTarget>,
    ) -> BuildResult<()> {
        let mesher = match self.meshers.get(builder.0) {
            Some(mesher) => Arc::clone(mesher),
            None => return Err(BuildError::UnknownBuilder { index: builder.0 }),
        };

        match self.slots.entry((tile.id(), builder)) {
            Entry::Occupied(mut occupied) => {
                let slot = occupied.get_mut();
                let version = slot.version.fetch_add(1, Ordering::SeqCst) + 1;
                slot.target = target;
                slot.tile = Arc::clone(&tile);
                slot.state = SlotState::Building;
                if slot.in_flight {
                    // Still owed an outcome; the job is parked until that
                    // drains.
                    slot.pending = true;
                } else {
                    slot.age = 0;
                    slot.pending = false;
                    slot.in_flight = true;
                    send_job(
                        &self.jobs,
                        BuildJob {
                            tile,
                            builder,
                            version,
                            slot_version: Arc::clone(&slot.version),
                            mesher,
                        },
                    );
                }
            }
            Entry::Vacant(vacant) => {
                let version = Arc::new(AtomicU64::new(1));
                send_job(
                    &self.jobs,
                    BuildJob {
                        tile: Arc::clone(&tile),
                        builder,
                        version: 1,
                        slot_version: Arc::clone(&version),
                        mesher,
                    },
                );
                vacant.insert(Slot {
                    version,
                    state: SlotState::Building,
                    age: 0,
                    in_flight: true,
                    pending: false,
                    target,
                    tile,
                });
            }
        }
        Ok(())
    }

    /// Cancels the slot and clears its target.
    ///
    /// Any in-flight build turns stale immediately and its buffers return
    /// to the pool when the outcome drains. The slot itself, tile and
    /// target included, is released as soon as nothing is in flight for
    /// it, after which the key reads [`SlotState::Idle`]. Unknown slots
    /// are ignored.
    pub fn cancel(&mut self, tile: TileId, builder: BuilderId) {
        if let Entry::Occupied(mut occupied) = self.slots.entry((tile, builder)) {
            let slot = occupied.get_mut();
            slot.version.fetch_add(1, Ordering::SeqCst);
            slot.target.apply(None);
            if slot.in_flight {
                // Kept around to absorb the stale outcome; released when
                // that drains.
                slot.pending = false;
                slot.age = 0;
                slot.state = SlotState::Cancelled;
            } else {
                occupied.remove();
            }
        }
    }

    /// Current state of a slot; unknown slots read as [`SlotState::Idle`].
    pub fn slot_state(&self, tile: TileId, builder: BuilderId) -> SlotState {
        self.slots
            .get(&(tile, builder))
            .map_or(SlotState::Idle, |slot| slot.state)
    }

    /// Drains finished builds and applies them to their targets.
    ///
    /// Never blocks for healthy slots. Slots that have been `Building` for
    /// more than `max_build_age` ticks are force-completed: the call blocks
    /// on the result channel until the overdue slot settles, which bounds
    /// how stale a displayed tile can get.
    pub fn tick(&mut self) {
        while let Ok(outcome) = self.results.try_recv() {
            self.process_outcome(outcome);
        }

        let mut overdue = Vec::new();
        for (key, slot) in &mut self.slots {
            if slot.state == SlotState::Building {
                slot.age += 1;
                if slot.age > self.max_build_age {
                    overdue.push(*key);
                }
            }
        }
        for key in overdue {
            self.force_complete(key);
        }
    }

    /// Blocks on the result channel until `key` is no longer overdue.
    ///
    /// Outcomes for other slots drain normally while waiting. A pending
    /// resubmission restarting the slot resets its age, which also ends
    /// the wait.
    fn force_complete(&mut self, key: (TileId, BuilderId)) {
        loop {
            let overdue = self
                .slots
                .get(&key)
                .is_some_and(|slot| slot.state == SlotState::Building && slot.age > self.max_build_age);
            if !overdue {
                break;
            }
            match self.results.recv() {
                Ok(outcome) => self.process_outcome(outcome),
                Err(_) => break,
            }
        }
    }

    fn process_outcome(&mut self, outcome: BuildOutcome) {
        let Entry::Occupied(mut occupied) = self.slots.entry((outcome.tile, outcome.builder))
        else {
            return;
        };
        let slot = occupied.get_mut();
        slot.in_flight = false;

        let current = slot.version.load(Ordering::SeqCst);
        if outcome.version != current {
            // Superseded; drop the result (and its buffer) unopened, and
            // before anything new starts. A parked submission restarts the
            // slot; a cancelled one is released here.
            drop(outcome.result);
            if slot.pending {
                slot.pending = false;
                slot.state = SlotState::Building;
                slot.age = 0;
                slot.in_flight = true;
                if let Some(mesher) = self.meshers.get(outcome.builder.0) {
                    send_job(
                        &self.jobs,
                        BuildJob {
                            tile: Arc::clone(&slot.tile),
                            builder: outcome.builder,
                            version: current,
                            slot_version: Arc::clone(&slot.version),
                            mesher: Arc::clone(mesher),
                        },
                    );
                }
            } else if slot.state == SlotState::Cancelled {
                occupied.remove();
            }
            return;
        }

        slot.age = 0;
        match outcome.result {
            Ok(mesh) => {
                slot.target.apply(mesh);
                slot.state = SlotState::Completed;
            }
            Err(err) if err.is_cancelled() => {
                slot.state = SlotState::Cancelled;
            }
            Err(err) => {
                log::error!(
                    "mesh build failed for tile {} builder {}: {}",
                    outcome.tile,
                    outcome.builder.0,
                    err
                );
                slot.target.apply(None);
                slot.state = SlotState::Idle;
            }
        }
    }
}

impl Default for MeshScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MeshScheduler {
    fn drop(&mut self) {
        // Closing the job channel lets idle workers fall out of recv; builds
        // already running finish against a live result receiver first.
        self.jobs.take();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

fn send_job(jobs: &Option<Sender<BuildJob>>, job: BuildJob) {
    if let Some(sender) = jobs {
        // Unbounded send only fails once every worker has exited.
        let _ = sender.send(job);
    }
}

fn default_worker_count() -> usize {
    thread::available_parallelism()
        .map(|cores| cores.get().saturating_sub(1))
        .unwrap_or(FALLBACK_WORKER_THREADS)
        .max(1)
}
