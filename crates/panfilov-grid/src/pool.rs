//! Fixed-size thread pool for a worker's data-parallel loops.

use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

/// A worker's private rayon pool.
///
/// Every data-parallel region of a step (mirroring, column packing, the
/// three update passes) runs inside [`install`](WorkerPool::install), so
/// workers sharing a process never contend for one global pool.
#[derive(Debug)]
pub struct WorkerPool {
    pool: ThreadPool,
}

impl WorkerPool {
    /// Build a pool of `threads` threads named after the owning rank.
    ///
    /// `threads == 0` lets rayon pick the number of logical CPUs.
    pub fn new(threads: usize, rank: usize) -> Result<Self, ThreadPoolBuildError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(move |i| format!("panfilov-w{rank}-t{i}"))
            .build()?;
        Ok(Self { pool })
    }

    /// Run `op` inside the pool. Parallel iterators used by `op` execute
    /// on this pool's threads; the call returns after all of them join.
    pub fn install<R: Send>(&self, op: impl FnOnce() -> R + Send) -> R {
        self.pool.install(op)
    }

    /// Number of threads in the pool.
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}
