//! Single- and multi-threaded aggregation.

use pricer_models::instruments::Position;
use tracing::debug;

use super::result::AggregationResult;
use crate::parallel::{ParallelError, WorkPartitioner};

/// Nets positions by symbol.
///
/// # Examples
/// ```
/// use pricer_models::instruments::Position;
/// use pricer_risk::aggregation::AggregationEngine;
///
/// let book = vec![
///     Position::equity("AAPL", 100.0, 150.0, 0.3, 0.05),
///     Position::equity("AAPL", -50.0, 150.0, 0.3, 0.05),
/// ];
/// let result = AggregationEngine::new().aggregate(&book);
/// let aapl = result.get("AAPL").unwrap();
/// assert_eq!(aapl.quantity, 50.0);
/// assert_eq!(aapl.notional, 7_500.0);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct AggregationEngine;

impl AggregationEngine {
    /// Creates an engine.
    pub fn new() -> Self {
        Self
    }

    /// Aggregates on the calling thread.
    pub fn aggregate(&self, positions: &[Position]) -> AggregationResult {
        let mut result = fold_range(positions);
        result.finalize();
        result
    }

    /// Aggregates across the partitioner's workers.
    ///
    /// Each worker folds a contiguous range into its own partial result; the
    /// partials are merged in range order and average prices are derived
    /// once, after the merge.
    pub fn aggregate_parallel(
        &self,
        positions: &[Position],
        partitioner: &WorkPartitioner,
    ) -> Result<AggregationResult, ParallelError> {
        debug!(
            positions = positions.len(),
            workers = partitioner.num_threads(),
            "aggregation fan-out"
        );
        partitioner.reduce_items(
            positions.len(),
            |_, range| fold_range(&positions[range]),
            |partials| {
                let mut merged = AggregationResult::default();
                for partial in partials {
                    merged.merge(partial);
                }
                merged.finalize();
                merged
            },
        )
    }
}

fn fold_range(positions: &[Position]) -> AggregationResult {
    let mut result = AggregationResult::default();
    for position in positions {
        result.fold(position);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn stock(symbol: &str, quantity: f64, price: f64) -> Position {
        Position::equity(symbol, quantity, price, 0.2, 0.05)
    }

    #[test]
    fn test_single_equity_scenario() {
        let r = AggregationEngine::new().aggregate(&[stock("AAPL", 100.0, 150.0)]);
        assert_eq!(r.net_exposure, 15_000.0);
        assert_eq!(r.total_long_exposure, 15_000.0);
        assert_eq!(r.total_short_exposure, 0.0);
        assert_eq!(r.unique_symbols(), 1);
        assert_eq!(r.get("AAPL").unwrap().avg_price, Some(150.0));
    }

    #[test]
    fn test_offsetting_positions_scenario() {
        let r = AggregationEngine::new()
            .aggregate(&[stock("AAPL", 100.0, 150.0), stock("AAPL", -50.0, 150.0)]);
        let aapl = r.get("AAPL").unwrap();
        assert_eq!(aapl.quantity, 50.0);
        assert_eq!(aapl.notional, 7_500.0);
        assert_eq!(aapl.position_count, 2);
        assert_eq!(r.total_long_exposure, 15_000.0);
        assert_eq!(r.total_short_exposure, 7_500.0);
    }

    #[test]
    fn test_empty_book() {
        let partitioner = WorkPartitioner::new(4).unwrap();
        let engine = AggregationEngine::new();
        assert_eq!(engine.aggregate(&[]), AggregationResult::default());
        assert_eq!(
            engine.aggregate_parallel(&[], &partitioner).unwrap(),
            AggregationResult::default()
        );
    }

    #[test]
    fn test_parallel_matches_single() {
        let positions: Vec<Position> = (0..101)
            .map(|i| {
                let qty = if i % 2 == 0 { 10.0 + i as f64 } else { -(i as f64) };
                stock(&format!("S{}", i % 7), qty, 20.0 + (i % 5) as f64)
            })
            .collect();
        let engine = AggregationEngine::new();
        let single = engine.aggregate(&positions);

        for threads in [1, 2, 3, 8, 200] {
            let partitioner = WorkPartitioner::new(threads).unwrap();
            let multi = engine.aggregate_parallel(&positions, &partitioner).unwrap();

            assert_eq!(multi.total_positions, single.total_positions);
            assert_eq!(multi.unique_symbols(), single.unique_symbols());
            assert_relative_eq!(multi.net_exposure, single.net_exposure, max_relative = 1e-12);
            assert_relative_eq!(
                multi.total_long_exposure,
                single.total_long_exposure,
                max_relative = 1e-12
            );
            for (symbol, expected) in &single.by_symbol {
                let got = multi.get(symbol).unwrap();
                assert_eq!(got.position_count, expected.position_count);
                assert_relative_eq!(got.quantity, expected.quantity, max_relative = 1e-12);
                assert_relative_eq!(got.notional, expected.notional, max_relative = 1e-12);
            }
        }
    }
}
