/*!
 * Worker pool sizing for paragraph processing.
 *
 * Paragraph processing is CPU-bound and shares nothing mutable, so a plain
 * rayon pool is enough. With no explicit size the global pool is used.
 */

use log::debug;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

/// Optional dedicated thread pool for paragraph batches
#[derive(Debug, Default)]
pub struct ProcessingPool {
    pool: Option<ThreadPool>,
}

impl ProcessingPool {
    /// Build a pool with `workers` threads, or use the global pool when `None`
    pub fn new(workers: Option<usize>) -> Result<Self, ThreadPoolBuildError> {
        let pool = match workers {
            Some(count) => {
                debug!("Building paragraph pool with {} workers", count);
                Some(
                    ThreadPoolBuilder::new()
                        .num_threads(count)
                        .thread_name(|i| format!("doctag-worker-{i}"))
                        .build()?,
                )
            }
            None => None,
        };

        Ok(Self { pool })
    }

    /// Number of threads work will run on
    pub fn worker_count(&self) -> usize {
        self.pool
            .as_ref()
            .map_or_else(rayon::current_num_threads, ThreadPool::current_num_threads)
    }

    /// Run `op` inside the pool
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }
}
