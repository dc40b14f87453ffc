//! Timing harness.

use std::time::{Duration, Instant};

use pricer_risk::{AggregationResult, VaRResult};
use serde::Serialize;

/// Wall-clock stopwatch.
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Starts a timer now.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Restarts the timer.
    pub fn reset(&mut self) {
        self.start = Instant::now();
    }

    /// Time since start.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Milliseconds since start.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed().as_secs_f64() * 1_000.0
    }

    /// Seconds since start.
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }
}

/// Single number summarising a kernel's output, recorded alongside its
/// timing.
pub trait Headline {
    /// The headline value.
    fn headline(&self) -> f64;
}

impl Headline for f64 {
    fn headline(&self) -> f64 {
        *self
    }
}

impl Headline for VaRResult {
    fn headline(&self) -> f64 {
        self.var_99
    }
}

impl Headline for AggregationResult {
    fn headline(&self) -> f64 {
        self.net_exposure
    }
}

/// Output paired with an explicit headline.
impl<T> Headline for (T, f64) {
    fn headline(&self) -> f64 {
        self.1
    }
}

/// Failed runs have no headline.
impl<T: Headline, E> Headline for Result<T, E> {
    fn headline(&self) -> f64 {
        self.as_ref().map_or(f64::NAN, Headline::headline)
    }
}

/// One timed kernel run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkResult {
    /// Run label.
    pub name: String,
    /// Wall-clock time.
    pub elapsed_ms: f64,
    /// Headline value of the output.
    pub value: f64,
}

/// Times `f` and records its headline value.
///
/// # Examples
/// ```
/// use service_cli::bench::run_benchmark;
///
/// let (result, sum) = run_benchmark("sum", || (1..=10).map(f64::from).sum::<f64>());
/// assert_eq!(result.name, "sum");
/// assert_eq!(result.value, 55.0);
/// assert_eq!(sum, 55.0);
/// ```
pub fn run_benchmark<T, F>(name: &str, f: F) -> (BenchmarkResult, T)
where
    T: Headline,
    F: FnOnce() -> T,
{
    let timer = Timer::new();
    let output = f();
    let elapsed_ms = timer.elapsed_ms();
    tracing::debug!(benchmark = name, elapsed_ms, "benchmark finished");

    let result = BenchmarkResult {
        name: name.to_string(),
        elapsed_ms,
        value: output.headline(),
    };
    (result, output)
}

/// `single / multi`, or `None` when the multi-threaded time is not positive.
pub fn speedup(single_ms: f64, multi_ms: f64) -> Option<f64> {
    (multi_ms > 0.0).then(|| single_ms / multi_ms)
}

/// Single- versus multi-threaded timing of one kernel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    /// Kernel label.
    pub kernel: String,
    /// Single-threaded run.
    pub single: BenchmarkResult,
    /// Multi-threaded run.
    pub multi: BenchmarkResult,
    /// Single over multi elapsed time.
    pub speedup: Option<f64>,
}

impl Comparison {
    /// Pairs two runs of `kernel`.
    pub fn new(kernel: &str, single: BenchmarkResult, multi: BenchmarkResult) -> Self {
        let speedup = speedup(single.elapsed_ms, multi.elapsed_ms);
        Self {
            kernel: kernel.to_string(),
            single,
            multi,
            speedup,
        }
    }
}

/// Summed timings over several comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Totals {
    /// Total single-threaded time.
    pub single_ms: f64,
    /// Total multi-threaded time.
    pub multi_ms: f64,
    /// Overall speedup.
    pub speedup: Option<f64>,
}

impl Totals {
    /// Sums the single and multi timings of `comparisons`.
    pub fn from_comparisons<'a>(comparisons: impl IntoIterator<Item = &'a Comparison>) -> Self {
        let (single_ms, multi_ms) = comparisons
            .into_iter()
            .fold((0.0, 0.0), |(s, m), c| {
                (s + c.single.elapsed_ms, m + c.multi.elapsed_ms)
            });
        Self {
            single_ms,
            multi_ms,
            speedup: speedup(single_ms, multi_ms),
        }
    }
}
