//! Single- versus multi-threaded agreement of the risk kernels over a
//! synthetic book.

use adapter_positions::SyntheticBook;
use approx::assert_relative_eq;
use pricer_models::instruments::Position;
use pricer_risk::aggregation::AggregationEngine;
use pricer_risk::greeks::{portfolio_delta, GreeksEngine};
use pricer_risk::parallel::WorkPartitioner;
use pricer_risk::var::{summarize, worker_seed, MonteCarloEngine, SimulationConfig};
use proptest::prelude::*;

fn book(count: usize) -> Vec<Position> {
    SyntheticBook::new().generate(count)
}

#[test]
fn test_greeks_identical_for_any_worker_count() {
    let positions = book(1_003);
    let engine = GreeksEngine::new();
    let baseline = engine.compute_batch(&positions);

    for threads in [1, 2, 3, 7, 16] {
        let partitioner = WorkPartitioner::new(threads).unwrap();
        let multi = engine
            .compute_batch_parallel(&positions, &partitioner)
            .unwrap();
        assert_eq!(multi, baseline, "threads = {threads}");
        assert_eq!(
            portfolio_delta(&multi, &positions),
            portfolio_delta(&baseline, &positions)
        );
    }
}

#[test]
fn test_aggregation_agrees_across_worker_counts() {
    let positions = book(5_000);
    let engine = AggregationEngine::new();
    let baseline = engine.aggregate(&positions);
    assert_eq!(baseline.total_positions, 5_000);

    for threads in [2, 4, 9] {
        let partitioner = WorkPartitioner::new(threads).unwrap();
        let multi = engine.aggregate_parallel(&positions, &partitioner).unwrap();

        assert_eq!(multi.unique_symbols(), baseline.unique_symbols());
        assert_relative_eq!(multi.net_exposure, baseline.net_exposure, max_relative = 1e-9);
        assert_relative_eq!(
            multi.total_short_exposure,
            baseline.total_short_exposure,
            max_relative = 1e-9
        );

        for (symbol, expected) in &baseline.by_symbol {
            let got = multi.get(symbol).unwrap();
            assert_eq!(got.position_count, expected.position_count);
            match (got.avg_price, expected.avg_price) {
                (Some(a), Some(b)) => assert_relative_eq!(a, b, max_relative = 1e-6),
                (a, b) => assert_eq!(a.is_some(), b.is_some()),
            }
        }

        let top_multi: Vec<&str> = multi.top_exposures(10).into_iter().map(|(s, _)| s).collect();
        let top_base: Vec<&str> = baseline
            .top_exposures(10)
            .into_iter()
            .map(|(s, _)| s)
            .collect();
        assert_eq!(top_multi, top_base);
    }
}

#[test]
fn test_parallel_var_is_statistically_close() {
    let positions = book(50);
    let config = SimulationConfig::builder()
        .num_trials(50_000)
        .seed(42)
        .build()
        .unwrap();
    let engine = MonteCarloEngine::new(config);

    let single = engine.run(&positions);
    let partitioner = WorkPartitioner::new(4).unwrap();
    let multi = engine.run_parallel(&positions, &partitioner).unwrap();

    assert!(single.var_95 > 0.0 && multi.var_95 > 0.0);
    assert_relative_eq!(single.var_95, multi.var_95, max_relative = 0.1);
    assert_relative_eq!(single.std_pnl, multi.std_pnl, max_relative = 0.05);
}

#[test]
fn test_parallel_samples_are_per_worker_streams() {
    let positions = book(20);
    let config = SimulationConfig::builder()
        .num_trials(1_001)
        .seed(7)
        .build()
        .unwrap();
    let engine = MonteCarloEngine::new(config);
    let partitioner = WorkPartitioner::new(4).unwrap();

    let samples = engine.simulate_parallel(&positions, &partitioner).unwrap();
    assert_eq!(samples.len(), 1_001);

    // 1001 over 4 workers: 251, 250, 250, 250
    let last_worker = pricer_risk::var::simulate_pnl(
        &positions,
        250,
        config.horizon(),
        worker_seed(7, 3),
    );
    assert_eq!(&samples[751..], &last_worker[..]);

    assert_eq!(
        engine.run_parallel(&positions, &partitioner).unwrap(),
        summarize(&samples)
    );
}

#[test]
fn test_var_tail_ordering_on_simulated_book() {
    let positions = book(100);
    let config = SimulationConfig::builder()
        .num_trials(10_000)
        .build()
        .unwrap();
    let result = MonteCarloEngine::new(config).run(&positions);

    assert!(result.var_95 >= 0.0);
    assert!(result.var_99 >= result.var_95);
    assert!(result.expected_shortfall >= result.var_99);
    assert!(result.std_pnl > 0.0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_simulation_deterministic(seed in any::<u64>(), trials in 1usize..300) {
        let positions = book(8);
        let a = pricer_risk::var::simulate_pnl(&positions, trials, 1.0 / 252.0, seed);
        let b = pricer_risk::var::simulate_pnl(&positions, trials, 1.0 / 252.0, seed);
        prop_assert_eq!(a, b);
    }
}
