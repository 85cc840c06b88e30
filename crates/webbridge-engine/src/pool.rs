//! Bounded worker pool for async-marked calls
//!
//! A fixed set of threads pulls jobs from one FIFO queue, so an async call
//! costs a channel send instead of a thread spawn. A submitted job runs
//! exactly once on some worker unless the pool is shut down first.
//!
//! Shutdown signals every worker, wakes them by closing the queue, and joins
//! them. A job already running finishes; jobs still queued are dropped
//! without running. Callers that need drain semantics must wait for their
//! outstanding work themselves.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Receiver, Sender};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;

/// Unit of work run on a pool thread
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Worker pool errors
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    /// The pool no longer accepts work
    #[error("worker pool is shut down")]
    ShutDown,

    /// A worker thread could not be started
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

// ============================================================================
// WorkerPool
// ============================================================================

/// Fixed-size thread pool with a FIFO queue
pub struct WorkerPool {
    size: usize,
    /// Sender side of the queue; `None` once shut down
    job_tx: Mutex<Option<Sender<Job>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    shutdown: Arc<AtomicBool>,
    pending: Arc<AtomicUsize>,
}

impl WorkerPool {
    /// Start `size` workers. A size of 0 means one per CPU core.
    pub fn new(size: usize, thread_name: &str) -> Result<Self, PoolError> {
        let size = if size == 0 { num_cpus::get().max(1) } else { size };
        let (job_tx, job_rx) = channel::unbounded::<Job>();
        let shutdown = Arc::new(AtomicBool::new(false));
        let pending = Arc::new(AtomicUsize::new(0));

        let pool = Self {
            size,
            job_tx: Mutex::new(Some(job_tx)),
            workers: Mutex::new(Vec::with_capacity(size)),
            shutdown,
            pending,
        };

        for i in 0..size {
            let rx = job_rx.clone();
            let shutdown = pool.shutdown.clone();
            let pending = pool.pending.clone();

            let handle = thread::Builder::new()
                .name(format!("{}-{}", thread_name, i))
                .spawn(move || Self::worker_loop(rx, shutdown, pending));
            match handle {
                Ok(handle) => pool.workers.lock().push(handle),
                Err(e) => {
                    pool.shutdown();
                    return Err(PoolError::Spawn(e));
                }
            }
        }

        log::debug!("worker pool started with {} threads", size);
        Ok(pool)
    }

    /// Queue a job. Fails only once the pool is shut down.
    pub fn submit(&self, job: impl FnOnce() + Send + 'static) -> Result<(), PoolError> {
        let tx = self.job_tx.lock();
        let tx = tx.as_ref().ok_or(PoolError::ShutDown)?;
        self.pending.fetch_add(1, Ordering::AcqRel);
        tx.send(Box::new(job)).map_err(|_| {
            self.pending.fetch_sub(1, Ordering::AcqRel);
            PoolError::ShutDown
        })
    }

    /// Number of worker threads
    pub fn size(&self) -> usize {
        self.size
    }

    /// Approximate number of queued jobs not yet picked up
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    /// Whether the pool still accepts work
    pub fn is_running(&self) -> bool {
        !self.shutdown.load(Ordering::Acquire)
    }

    /// Stop all workers. Idempotent.
    pub fn shutdown(&self) {
        if self.shutdown.swap(true, Ordering::AcqRel) {
            return;
        }

        // Dropping the sender wakes every blocked worker
        self.job_tx.lock().take();

        let current = thread::current().id();
        for handle in self.workers.lock().drain(..) {
            if handle.thread().id() == current {
                continue;
            }
            if handle.join().is_err() {
                log::error!("worker thread panicked during shutdown");
            }
        }
        log::debug!("worker pool stopped");
    }

    fn worker_loop(rx: Receiver<Job>, shutdown: Arc<AtomicBool>, pending: Arc<AtomicUsize>) {
        while let Ok(job) = rx.recv() {
            pending.fetch_sub(1, Ordering::AcqRel);
            if shutdown.load(Ordering::Acquire) {
                break;
            }
            if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                log::error!(
                    "job panicked on {}",
                    thread::current().name().unwrap_or("worker")
                );
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ============================================================================
// LazyPool
// ============================================================================

/// Worker pool started on first use.
///
/// The size is a one-time setting: [`configure`](LazyPool::configure) only
/// takes effect before the first job is submitted. Afterwards it is ignored
/// and reports `false`.
pub struct LazyPool {
    /// Configured size; also held while the pool starts
    configured: Mutex<usize>,
    closed: AtomicBool,
    thread_name: String,
    pool: OnceCell<WorkerPool>,
}

impl LazyPool {
    /// Create an unstarted pool. `None` means one thread per CPU core.
    pub fn new(size: Option<usize>, thread_name: impl Into<String>) -> Self {
        Self {
            configured: Mutex::new(size.unwrap_or(0)),
            closed: AtomicBool::new(false),
            thread_name: thread_name.into(),
            pool: OnceCell::new(),
        }
    }

    /// Set the worker count. Returns `false` if the pool already started.
    pub fn configure(&self, size: usize) -> bool {
        let mut configured = self.configured.lock();
        if let Some(pool) = self.pool.get() {
            log::warn!(
                "worker pool already running with {} threads; ignoring resize to {}",
                pool.size(),
                size
            );
            return false;
        }
        *configured = size;
        true
    }

    /// The running pool, starting it if needed
    pub fn get(&self) -> Result<&WorkerPool, PoolError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(PoolError::ShutDown);
        }
        if let Some(pool) = self.pool.get() {
            return Ok(pool);
        }
        let configured = self.configured.lock();
        self.pool
            .get_or_try_init(|| WorkerPool::new(*configured, &self.thread_name))
    }

    /// Queue a job, starting the pool if needed
    pub fn submit(&self, job: impl FnOnce() + Send + 'static) -> Result<(), PoolError> {
        self.get()?.submit(job)
    }

    /// Whether the workers have been started
    pub fn is_started(&self) -> bool {
        self.pool.get().is_some()
    }

    /// Worker count of the running pool, or the configured count
    pub fn size(&self) -> usize {
        match self.pool.get() {
            Some(pool) => pool.size(),
            None => match *self.configured.lock() {
                0 => num_cpus::get().max(1),
                n => n,
            },
        }
    }

    /// Stop the pool and refuse to start it again
    pub fn shutdown(&self) {
        self.closed.store(true, Ordering::Release);
        if let Some(pool) = self.pool.get() {
            pool.shutdown();
        }
    }
}
