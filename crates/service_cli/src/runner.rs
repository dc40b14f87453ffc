//! Benchmark run: generate the book, then time every kernel single- and
//! multi-threaded.

use adapter_positions::{PositionSource, SyntheticBook};
use pricer_risk::{
    portfolio_delta, AggregationEngine, AggregationResult, GreeksEngine, MonteCarloEngine,
    NetExposure, VaRResult,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::bench::{run_benchmark, Comparison, Timer, Totals};
use crate::config::BenchConfig;
use crate::error::Result;

/// Relative tolerance for comparing aggregated totals across worker counts.
pub const AGGREGATION_TOLERANCE: f64 = 1e-9;

/// One row of the top-exposure table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExposureRow {
    /// Symbol.
    pub symbol: String,
    /// Netted exposure.
    #[serde(flatten)]
    pub exposure: NetExposure,
}

/// Whether the deterministic kernels agreed between their single- and
/// multi-threaded runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CrossCheck {
    /// Greeks were bit-identical.
    pub greeks_identical: bool,
    /// Aggregated totals agreed within [`AGGREGATION_TOLERANCE`].
    pub aggregation_agrees: bool,
}

impl CrossCheck {
    /// Both kernels agreed.
    pub fn passed(&self) -> bool {
        self.greeks_identical && self.aggregation_agrees
    }
}

/// Everything one benchmark run measured.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Positions generated.
    pub positions: usize,
    /// Monte Carlo trials.
    pub simulations: usize,
    /// Worker threads in the multi-threaded runs.
    pub threads: usize,
    /// Time spent generating the book.
    pub generation_ms: f64,
    /// Monte Carlo VaR timings.
    pub monte_carlo: Comparison,
    /// Greeks batch timings.
    pub greeks: Comparison,
    /// Aggregation timings.
    pub aggregation: Comparison,
    /// Summed timings.
    pub total: Totals,
    /// VaR from the multi-threaded run.
    pub var: VaRResult,
    /// Quantity-weighted portfolio delta.
    pub portfolio_delta: f64,
    /// Signed net notional.
    pub net_exposure: f64,
    /// Sum of positive notionals.
    pub long_exposure: f64,
    /// Sum of short notional magnitudes.
    pub short_exposure: f64,
    /// Distinct symbols in the book.
    pub unique_symbols: usize,
    /// Largest exposures by |notional|.
    pub top_exposures: Vec<ExposureRow>,
    /// Agreement of the deterministic kernels.
    pub cross_check: CrossCheck,
}

/// Runs the full benchmark against a seeded synthetic book.
pub fn run(config: &BenchConfig) -> Result<RunSummary> {
    let book = SyntheticBook::new().with_seed(config.seed);
    run_with_source(config, &book)
}

/// Runs the full benchmark against positions from `source`.
pub fn run_with_source<S: PositionSource>(config: &BenchConfig, source: &S) -> Result<RunSummary> {
    let partitioner = config.partitioner()?;
    let monte_carlo = MonteCarloEngine::new(config.simulation_config()?);
    let greeks_engine = GreeksEngine::with_bump(config.bump);
    let aggregation = AggregationEngine::new();

    let timer = Timer::new();
    let positions = source.positions(config.positions);
    let generation_ms = timer.elapsed_ms();
    info!(positions = positions.len(), elapsed_ms = generation_ms, "generated book");

    info!(
        trials = config.simulations,
        threads = partitioner.num_threads(),
        "monte carlo var"
    );
    let (mc_single, _) = run_benchmark("MC VaR (single)", || monte_carlo.run(&positions));
    let (mc_multi, var) = run_benchmark("MC VaR (multi)", || {
        monte_carlo.run_parallel(&positions, &partitioner)
    });
    let var = var?;

    info!("greeks batch");
    let (greeks_single, (single_greeks, _)) = run_benchmark("Greeks (single)", || {
        let greeks = greeks_engine.compute_batch(&positions);
        let delta = portfolio_delta(&greeks, &positions);
        (greeks, delta)
    });
    let (greeks_multi, multi) = run_benchmark("Greeks (multi)", || {
        greeks_engine
            .compute_batch_parallel(&positions, &partitioner)
            .map(|greeks| {
                let delta = portfolio_delta(&greeks, &positions);
                (greeks, delta)
            })
    });
    let (multi_greeks, delta) = multi?;

    info!("exposure aggregation");
    let (agg_single, single_agg) =
        run_benchmark("Aggregation (single)", || aggregation.aggregate(&positions));
    let (agg_multi, multi_agg) = run_benchmark("Aggregation (multi)", || {
        aggregation.aggregate_parallel(&positions, &partitioner)
    });
    let multi_agg = multi_agg?;

    let cross_check = CrossCheck {
        greeks_identical: single_greeks == multi_greeks,
        aggregation_agrees: aggregations_agree(&single_agg, &multi_agg),
    };
    if !cross_check.passed() {
        warn!(?cross_check, "single- and multi-threaded results disagree");
    }

    let monte_carlo = Comparison::new("Monte Carlo VaR", mc_single, mc_multi);
    let greeks = Comparison::new("Greeks", greeks_single, greeks_multi);
    let aggregation = Comparison::new("Aggregation", agg_single, agg_multi);
    let total = Totals::from_comparisons([&monte_carlo, &greeks, &aggregation]);

    Ok(RunSummary {
        positions: positions.len(),
        simulations: config.simulations,
        threads: partitioner.num_threads(),
        generation_ms,
        monte_carlo,
        greeks,
        aggregation,
        total,
        var,
        portfolio_delta: delta,
        net_exposure: multi_agg.net_exposure,
        long_exposure: multi_agg.total_long_exposure,
        short_exposure: multi_agg.total_short_exposure,
        unique_symbols: multi_agg.unique_symbols(),
        top_exposures: top_rows(&multi_agg, config.top),
        cross_check,
    })
}

fn top_rows(result: &AggregationResult, k: usize) -> Vec<ExposureRow> {
    result
        .top_exposures(k)
        .into_iter()
        .map(|(symbol, exposure)| ExposureRow {
            symbol: symbol.to_string(),
            exposure: exposure.clone(),
        })
        .collect()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= AGGREGATION_TOLERANCE * a.abs().max(b.abs()).max(1.0)
}

fn aggregations_agree(a: &AggregationResult, b: &AggregationResult) -> bool {
    a.total_positions == b.total_positions
        && a.by_symbol.len() == b.by_symbol.len()
        && close(a.net_exposure, b.net_exposure)
        && close(a.total_long_exposure, b.total_long_exposure)
        && close(a.total_short_exposure, b.total_short_exposure)
        && a.by_symbol.iter().all(|(symbol, x)| {
            b.get(symbol).is_some_and(|y| {
                x.position_count == y.position_count
                    && close(x.quantity, y.quantity)
                    && close(x.notional, y.notional)
            })
        })
}
