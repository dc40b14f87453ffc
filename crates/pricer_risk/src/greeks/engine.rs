//! Bump-and-reprice Greeks engine.

use pricer_models::instruments::{InstrumentKind, Position};
use tracing::debug;

use super::result::Greeks;
use crate::parallel::{ParallelError, WorkPartitioner};

/// Default relative spot bump and absolute volatility bump.
pub const DEFAULT_BUMP: f64 = 0.01;

/// Theta step: one calendar day in years.
pub const THETA_STEP: f64 = 1.0 / 365.0;

/// Lower bound on the bumped expiry used for theta.
///
/// Keeps the theta reprice out of the intrinsic-value branch.
pub const MIN_EXPIRY: f64 = 0.001;

/// Finite-difference Greeks calculator.
///
/// - delta: central difference on spot, S·(1 ± bump)
/// - gamma: three-point second difference over (bump·S)²
/// - vega: forward difference on volatility, σ + bump
/// - theta: one-day decay, expiry floored at [`MIN_EXPIRY`], × 365
///
/// Equity positions short-circuit to delta = 1 and zero convexity.
///
/// # Examples
/// ```
/// use pricer_models::instruments::Position;
/// use pricer_risk::greeks::GreeksEngine;
///
/// let engine = GreeksEngine::new();
/// let call = Position::call("AAPL", 10.0, 150.0, 0.3, 155.0, 0.5, 0.05);
/// let g = engine.greeks(&call);
/// assert!(g.delta > 0.0 && g.delta < 1.0);
/// assert!(g.gamma > 0.0);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct GreeksEngine {
    bump: f64,
}

impl Default for GreeksEngine {
    fn default() -> Self {
        Self { bump: DEFAULT_BUMP }
    }
}

impl GreeksEngine {
    /// Creates an engine with [`DEFAULT_BUMP`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with a custom bump size.
    pub fn with_bump(bump: f64) -> Self {
        Self { bump }
    }

    /// Returns the bump size.
    #[inline]
    pub fn bump(&self) -> f64 {
        self.bump
    }

    /// Unit price: spot for equity, Black-Scholes for options.
    #[inline]
    pub fn price(&self, position: &Position) -> f64 {
        position.unit_price()
    }

    /// Greeks of a single position.
    pub fn greeks(&self, position: &Position) -> Greeks {
        if position.kind == InstrumentKind::Equity {
            return Greeks::linear(position.price);
        }

        let spot = position.price;
        let vol = position.volatility;
        let expiry = position.time_to_expiry;
        let bump = self.bump;

        let price = position.unit_price_with(spot, vol, expiry);

        let spot_up = spot * (1.0 + bump);
        let spot_down = spot * (1.0 - bump);
        let price_up = position.unit_price_with(spot_up, vol, expiry);
        let price_down = position.unit_price_with(spot_down, vol, expiry);

        let delta = (price_up - price_down) / (spot_up - spot_down);
        let ds = spot * bump;
        let gamma = (price_up - 2.0 * price + price_down) / (ds * ds);

        let vega = (position.unit_price_with(spot, vol + bump, expiry) - price) / bump;

        let decayed = (expiry - THETA_STEP).max(MIN_EXPIRY);
        let theta = (position.unit_price_with(spot, vol, decayed) - price) * 365.0;

        Greeks {
            price,
            delta,
            gamma,
            vega,
            theta,
        }
    }

    /// Greeks for every position, in input order, on the calling thread.
    pub fn compute_batch(&self, positions: &[Position]) -> Vec<Greeks> {
        positions.iter().map(|p| self.greeks(p)).collect()
    }

    /// Greeks for every position, in input order, across the partitioner's
    /// workers.
    ///
    /// Output is identical to [`compute_batch`](Self::compute_batch) for any
    /// worker count.
    pub fn compute_batch_parallel(
        &self,
        positions: &[Position],
        partitioner: &WorkPartitioner,
    ) -> Result<Vec<Greeks>, ParallelError> {
        debug!(
            positions = positions.len(),
            workers = partitioner.num_threads(),
            "greeks batch"
        );
        partitioner.reduce_items(
            positions.len(),
            |_, range| self.compute_batch(&positions[range]),
            |chunks| chunks.into_iter().flatten().collect(),
        )
    }
}

/// Quantity-weighted delta: Σ greeks[i].delta × positions[i].quantity.
///
/// Pairs are matched by index; extra elements in the longer slice are ignored.
pub fn portfolio_delta(greeks: &[Greeks], positions: &[Position]) -> f64 {
    greeks
        .iter()
        .zip(positions)
        .map(|(g, p)| g.delta * p.quantity)
        .sum()
}

/// Quantity-weighted sum of every Greek.
pub fn portfolio_greeks(greeks: &[Greeks], positions: &[Position]) -> Greeks {
    greeks
        .iter()
        .zip(positions)
        .fold(Greeks::default(), |acc, (g, p)| acc + g.scaled(p.quantity))
}
