//! Work partitioning and fork-join execution.
//!
//! Every kernel in this crate parallelises the same way: split the work into
//! contiguous parts, compute each part on its own worker into a local
//! buffer, join, then merge on the calling thread. [`WorkPartitioner`]
//! implements that once.
//!
//! Two split rules exist:
//!
//! - [`item_ranges`]: `N` items into ranges of `ceil(N/T)`, the last one
//!   clamped to `N`. Workers whose start would be `>= N` get no range.
//! - [`trial_counts`]: a simulation budget into `T` counts, the remainder
//!   going one unit each to the first `N mod T` workers, so the counts
//!   always sum to the budget.
//!
//! Each call builds a dedicated Rayon pool of exactly as many threads as
//! there are parts and drops it on return; nothing outlives the call.
//! Threads inherit the CPU affinity of the caller at spawn time.

use std::ops::Range;

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::debug;

/// Errors from parallel execution.
#[derive(Debug, thiserror::Error)]
pub enum ParallelError {
    /// A partitioner needs at least one worker.
    #[error("Worker count must be at least 1")]
    ZeroWorkers,

    /// The worker pool could not be created.
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Splits `n_items` into at most `n_workers` contiguous, non-overlapping ranges.
///
/// The union of the returned ranges is exactly `0..n_items`. Empty ranges are
/// never returned.
///
/// # Examples
/// ```
/// use pricer_risk::parallel::item_ranges;
///
/// assert_eq!(item_ranges(10, 3), vec![0..4, 4..8, 8..10]);
/// assert_eq!(item_ranges(3, 8), vec![0..1, 1..2, 2..3]);
/// assert!(item_ranges(0, 4).is_empty());
/// ```
pub fn item_ranges(n_items: usize, n_workers: usize) -> Vec<Range<usize>> {
    if n_items == 0 || n_workers == 0 {
        return Vec::new();
    }

    let chunk = n_items.div_ceil(n_workers);
    (0..n_workers)
        .map(|worker| worker * chunk)
        .take_while(|&start| start < n_items)
        .map(|start| start..(start + chunk).min(n_items))
        .collect()
}

/// Splits a trial budget into exactly `n_workers` counts.
///
/// # Examples
/// ```
/// use pricer_risk::parallel::trial_counts;
///
/// assert_eq!(trial_counts(10, 3), vec![4, 3, 3]);
/// assert_eq!(trial_counts(2, 4), vec![1, 1, 0, 0]);
/// ```
pub fn trial_counts(total: usize, n_workers: usize) -> Vec<usize> {
    if n_workers == 0 {
        return Vec::new();
    }

    let base = total / n_workers;
    let remainder = total % n_workers;
    (0..n_workers)
        .map(|worker| base + usize::from(worker < remainder))
        .collect()
}

/// Configuration for parallel execution.
#[derive(Clone, Debug)]
pub struct ParallelConfig {
    /// Number of worker threads per kernel call.
    pub num_threads: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            num_threads: num_cpus::get().max(1),
        }
    }
}

impl ParallelConfig {
    /// Creates a configuration with an explicit thread count.
    pub fn new(num_threads: usize) -> Self {
        Self { num_threads }
    }
}

/// Fork-join executor over a fixed worker count.
///
/// # Examples
/// ```
/// use pricer_risk::parallel::WorkPartitioner;
///
/// let partitioner = WorkPartitioner::new(4).unwrap();
/// let values: Vec<u64> = (1..=100).collect();
///
/// let total = partitioner
///     .reduce_items(
///         values.len(),
///         |_, range| values[range].iter().sum::<u64>(),
///         |partials| partials.into_iter().sum::<u64>(),
///     )
///     .unwrap();
/// assert_eq!(total, 5050);
/// ```
#[derive(Clone, Debug)]
pub struct WorkPartitioner {
    num_threads: usize,
}

impl WorkPartitioner {
    /// Creates a partitioner for `num_threads` workers.
    ///
    /// # Errors
    /// [`ParallelError::ZeroWorkers`] if `num_threads == 0`.
    pub fn new(num_threads: usize) -> Result<Self, ParallelError> {
        if num_threads == 0 {
            return Err(ParallelError::ZeroWorkers);
        }
        Ok(Self { num_threads })
    }

    /// Creates a partitioner from a [`ParallelConfig`].
    pub fn from_config(config: &ParallelConfig) -> Result<Self, ParallelError> {
        Self::new(config.num_threads)
    }

    /// Returns the worker count.
    #[inline]
    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    /// Item ranges for this worker count. See [`item_ranges`].
    #[inline]
    pub fn item_ranges(&self, n_items: usize) -> Vec<Range<usize>> {
        item_ranges(n_items, self.num_threads)
    }

    /// Trial counts for this worker count. See [`trial_counts`].
    #[inline]
    pub fn trial_counts(&self, total: usize) -> Vec<usize> {
        trial_counts(total, self.num_threads)
    }

    /// Runs `compute(worker_index, part)` for every part and returns the
    /// results in part order.
    ///
    /// Returns only after every worker has finished. A single part runs on
    /// the calling thread.
    pub fn fan_out<P, R, C>(&self, parts: Vec<P>, compute: C) -> Result<Vec<R>, ParallelError>
    where
        P: Send,
        R: Send,
        C: Fn(usize, P) -> R + Sync,
    {
        match parts.len() {
            0 => return Ok(Vec::new()),
            1 => return Ok(parts.into_iter().map(|p| compute(0, p)).collect()),
            _ => {}
        }

        debug!(workers = parts.len(), "fanning out");
        let pool = ThreadPoolBuilder::new()
            .num_threads(parts.len())
            .thread_name(|i| format!("risk-worker-{i}"))
            .build()?;

        Ok(pool.install(|| {
            parts
                .into_par_iter()
                .enumerate()
                .map(|(worker, part)| compute(worker, part))
                .collect()
        }))
    }

    /// Partition-and-reduce over `n_items` items.
    ///
    /// `compute` receives the worker index and its item range; `merge` folds
    /// the per-worker results, which arrive in range order.
    pub fn reduce_items<R, O, C, M>(
        &self,
        n_items: usize,
        compute: C,
        merge: M,
    ) -> Result<O, ParallelError>
    where
        R: Send,
        C: Fn(usize, Range<usize>) -> R + Sync,
        M: FnOnce(Vec<R>) -> O,
    {
        let partials = self.fan_out(self.item_ranges(n_items), compute)?;
        Ok(merge(partials))
    }

    /// Partition-and-reduce over a trial budget.
    ///
    /// `compute` receives the worker index and its trial count; every worker
    /// runs, including those assigned zero trials.
    pub fn reduce_trials<R, O, C, M>(
        &self,
        total: usize,
        compute: C,
        merge: M,
    ) -> Result<O, ParallelError>
    where
        R: Send,
        C: Fn(usize, usize) -> R + Sync,
        M: FnOnce(Vec<R>) -> O,
    {
        let partials = self.fan_out(self.trial_counts(total), compute)?;
        Ok(merge(partials))
    }
}
