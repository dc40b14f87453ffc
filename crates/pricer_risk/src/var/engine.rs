//! GBM P&L simulation and its parallel run.

use pricer_models::instruments::Position;
use tracing::debug;

use super::config::SimulationConfig;
use super::result::{summarize, VaRResult};
use super::rng::PnlRng;
use crate::parallel::{ParallelError, WorkPartitioner};

/// Seed stride between consecutive workers of a parallel run.
pub const WORKER_SEED_STRIDE: u64 = 12_345;

/// Seed of worker `index` for global seed `seed`: `seed + index × 12345`.
///
/// Wraps on overflow.
///
/// # Examples
/// ```
/// use pricer_risk::var::worker_seed;
///
/// assert_eq!(worker_seed(42, 0), 42);
/// assert_eq!(worker_seed(42, 2), 42 + 2 * 12_345);
/// ```
#[inline]
pub fn worker_seed(seed: u64, index: usize) -> u64 {
    seed.wrapping_add((index as u64).wrapping_mul(WORKER_SEED_STRIDE))
}

/// Per-position GBM terms over one horizon.
#[derive(Clone, Copy)]
struct GbmTerm {
    notional: f64,
    drift: f64,
    diffusion: f64,
}

impl GbmTerm {
    fn new(position: &Position, horizon: f64) -> Self {
        let sigma = position.volatility;
        Self {
            notional: position.quantity * position.price,
            drift: (position.risk_free_rate - 0.5 * sigma * sigma) * horizon,
            diffusion: sigma * horizon.sqrt(),
        }
    }

    #[inline]
    fn pnl(&self, z: f64) -> f64 {
        self.notional * ((self.drift + self.diffusion * z).exp() - 1.0)
    }
}

/// Simulates `num_trials` portfolio P&L samples under GBM.
///
/// Each trial draws one standard normal per position, in position order,
/// from a generator seeded once with `seed`. The output is in trial order and
/// depends only on the arguments.
///
/// # Examples
/// ```
/// use pricer_models::instruments::Position;
/// use pricer_risk::var::simulate_pnl;
///
/// let book = vec![Position::equity("AAPL", 100.0, 150.0, 0.3, 0.05)];
/// let a = simulate_pnl(&book, 1_000, 1.0 / 252.0, 42);
/// let b = simulate_pnl(&book, 1_000, 1.0 / 252.0, 42);
/// assert_eq!(a.len(), 1_000);
/// assert_eq!(a, b);
/// ```
pub fn simulate_pnl(
    positions: &[Position],
    num_trials: usize,
    horizon: f64,
    seed: u64,
) -> Vec<f64> {
    let terms: Vec<GbmTerm> = positions.iter().map(|p| GbmTerm::new(p, horizon)).collect();
    let mut rng = PnlRng::from_seed(seed);
    let mut shocks = vec![0.0; terms.len()];

    (0..num_trials)
        .map(|_| {
            rng.fill_normal(&mut shocks);
            terms
                .iter()
                .zip(&shocks)
                .map(|(term, &z)| term.pnl(z))
                .sum()
        })
        .collect()
}

/// Monte Carlo VaR engine.
///
/// The single-threaded run simulates every trial from the global seed. The
/// parallel run splits the trials across workers, seeds worker `i` with
/// [`worker_seed`]`(seed, i)`, concatenates the samples in worker order and
/// summarises once. Its samples therefore depend on the worker count: runs
/// reproduce exactly for a fixed worker count, and agree only statistically
/// across different counts.
///
/// # Examples
/// ```
/// use pricer_models::instruments::Position;
/// use pricer_risk::parallel::WorkPartitioner;
/// use pricer_risk::var::{MonteCarloEngine, SimulationConfig};
///
/// let config = SimulationConfig::builder().num_trials(20_000).build().unwrap();
/// let engine = MonteCarloEngine::new(config);
/// let book = vec![Position::equity("AAPL", 100.0, 150.0, 0.3, 0.05)];
///
/// let single = engine.run(&book);
/// let multi = engine.run_parallel(&book, &WorkPartitioner::new(4).unwrap()).unwrap();
/// assert!(single.var_99 >= single.var_95);
/// assert!((single.var_99 - multi.var_99).abs() / single.var_99 < 0.25);
/// ```
#[derive(Clone, Debug, Default)]
pub struct MonteCarloEngine {
    config: SimulationConfig,
}

impl MonteCarloEngine {
    /// Creates an engine for the given configuration.
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// P&L samples from the global seed, on the calling thread.
    pub fn simulate(&self, positions: &[Position]) -> Vec<f64> {
        simulate_pnl(
            positions,
            self.config.num_trials(),
            self.config.horizon(),
            self.config.seed(),
        )
    }

    /// P&L samples from every worker, concatenated in worker order.
    ///
    /// Always returns exactly `num_trials` samples. Workers assigned zero
    /// trials contribute nothing.
    pub fn simulate_parallel(
        &self,
        positions: &[Position],
        partitioner: &WorkPartitioner,
    ) -> Result<Vec<f64>, ParallelError> {
        let horizon = self.config.horizon();
        let seed = self.config.seed();
        debug!(
            trials = self.config.num_trials(),
            workers = partitioner.num_threads(),
            seed,
            "monte carlo fan-out"
        );

        partitioner.reduce_trials(
            self.config.num_trials(),
            |worker, trials| simulate_pnl(positions, trials, horizon, worker_seed(seed, worker)),
            |parts| parts.concat(),
        )
    }

    /// Single-threaded VaR.
    pub fn run(&self, positions: &[Position]) -> VaRResult {
        summarize(&self.simulate(positions))
    }

    /// Multi-threaded VaR.
    pub fn run_parallel(
        &self,
        positions: &[Position],
        partitioner: &WorkPartitioner,
    ) -> Result<VaRResult, ParallelError> {
        let samples = self.simulate_parallel(positions, partitioner)?;
        Ok(summarize(&samples))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn book() -> Vec<Position> {
        vec![
            Position::equity("AAPL", 100.0, 150.0, 0.3, 0.05),
            Position::equity("MSFT", -40.0, 310.0, 0.25, 0.05),
            Position::call("AAPL", 10.0, 150.0, 0.3, 155.0, 0.5, 0.05),
        ]
    }

    fn engine(trials: usize, seed: u64) -> MonteCarloEngine {
        MonteCarloEngine::new(
            SimulationConfig::builder()
                .num_trials(trials)
                .seed(seed)
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_simulate_is_deterministic() {
        let e = engine(5_000, 42);
        assert_eq!(e.simulate(&book()), e.simulate(&book()));
    }

    #[test]
    fn test_seed_changes_stream() {
        assert_ne!(engine(100, 1).simulate(&book()), engine(100, 2).simulate(&book()));
    }

    #[test]
    fn test_draw_order_is_trial_major() {
        let positions = book();
        let horizon = 1.0 / 252.0;
        let samples = simulate_pnl(&positions, 3, horizon, 99);

        let mut rng = PnlRng::from_seed(99);
        for &sample in &samples {
            let expected: f64 = positions
                .iter()
                .map(|p| GbmTerm::new(p, horizon).pnl(rng.gen_normal()))
                .sum();
            assert_eq!(sample, expected);
        }
    }

    #[test]
    fn test_zero_volatility_is_deterministic_drift() {
        let stock = vec![Position::equity("X", 10.0, 100.0, 0.0, 0.05)];
        let samples = simulate_pnl(&stock, 10, 1.0, 7);
        let expected = 10.0 * 100.0 * (0.05_f64.exp() - 1.0);
        for s in samples {
            assert_relative_eq!(s, expected, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_empty_book_and_zero_trials() {
        let samples = simulate_pnl(&[], 50, 1.0 / 252.0, 1);
        assert_eq!(samples, vec![0.0; 50]);
        assert!(simulate_pnl(&book(), 0, 1.0 / 252.0, 1).is_empty());
        assert_eq!(engine(0, 1).run(&book()), VaRResult::default());
    }

    #[test]
    fn test_mean_pnl_converges_to_drift() {
        // E[pnl] = q·S·(e^{rh} − 1) under GBM with drift r
        let stock = vec![Position::equity("X", 1_000.0, 100.0, 0.2, 0.05)];
        let horizon = 0.25;
        let samples = simulate_pnl(&stock, 200_000, horizon, 3);
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        let expected = 1_000.0 * 100.0 * ((0.05 * horizon).exp() - 1.0);
        let std_err = 1_000.0 * 100.0 * 0.2 * horizon.sqrt() / (samples.len() as f64).sqrt();
        assert!((mean - expected).abs() < 5.0 * std_err, "mean = {mean}");
    }

    #[test]
    fn test_worker_seed_stride() {
        assert_eq!(worker_seed(0, 3), 37_035);
        assert_eq!(worker_seed(u64::MAX, 1), WORKER_SEED_STRIDE - 1);
    }

    #[test]
    fn test_parallel_sample_count_and_streams() {
        let positions = book();
        let e = engine(10, 42);
        let partitioner = WorkPartitioner::new(3).unwrap();
        let samples = e.simulate_parallel(&positions, &partitioner).unwrap();
        assert_eq!(samples.len(), 10);

        let h = e.config().horizon();
        let mut expected = simulate_pnl(&positions, 4, h, worker_seed(42, 0));
        expected.extend(simulate_pnl(&positions, 3, h, worker_seed(42, 1)));
        expected.extend(simulate_pnl(&positions, 3, h, worker_seed(42, 2)));
        assert_eq!(samples, expected);
    }

    #[test]
    fn test_one_worker_matches_single_thread() {
        let e = engine(2_000, 11);
        let partitioner = WorkPartitioner::new(1).unwrap();
        assert_eq!(
            e.simulate_parallel(&book(), &partitioner).unwrap(),
            e.simulate(&book())
        );
    }

    #[test]
    fn test_more_workers_than_trials() {
        let e = engine(2, 5);
        let partitioner = WorkPartitioner::new(8).unwrap();
        let samples = e.simulate_parallel(&book(), &partitioner).unwrap();
        assert_eq!(samples.len(), 2);
    }

    #[test]
    fn test_parallel_run_is_reproducible() {
        let e = engine(20_000, 42);
        let partitioner = WorkPartitioner::new(4).unwrap();
        let a = e.run_parallel(&book(), &partitioner).unwrap();
        let b = e.run_parallel(&book(), &partitioner).unwrap();
        assert_eq!(a, b);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_parallel_always_full_budget(trials in 0usize..500, threads in 1usize..12) {
            let e = engine(trials, 42);
            let partitioner = WorkPartitioner::new(threads).unwrap();
            let samples = e.simulate_parallel(&book(), &partitioner).unwrap();
            prop_assert_eq!(samples.len(), trials);
        }
    }
}
