//! Seeded synthetic book.

use pricer_models::instruments::{InstrumentKind, Position};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Uniform;
use tracing::debug;

use crate::PositionSource;

/// Default generator seed.
pub const DEFAULT_SEED: u64 = 42;

/// Default size of the symbol universe (`SYM0` ..= `SYM499`).
pub const DEFAULT_SYMBOLS: usize = 500;

/// Default annualised risk-free rate.
pub const DEFAULT_RATE: f64 = 0.05;

/// Random book generator.
///
/// Draws, per position: symbol uniformly from the universe, spot U(10, 500),
/// quantity U(-1000, 1000), volatility U(0.1, 0.8) and kind uniformly over
/// equity/call/put. Options additionally draw strike U(0.8·S, 1.2·S) and
/// expiry U(0.1, 2.0) years. The same seed always yields the same book.
///
/// # Examples
/// ```
/// use adapter_positions::{PositionSource, SyntheticBook};
///
/// let book = SyntheticBook::new().with_seed(7);
/// let a = book.positions(100);
/// assert_eq!(a.len(), 100);
/// assert_eq!(a, book.positions(100));
/// ```
#[derive(Clone, Debug)]
pub struct SyntheticBook {
    seed: u64,
    num_symbols: usize,
    risk_free_rate: f64,
}

impl Default for SyntheticBook {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            num_symbols: DEFAULT_SYMBOLS,
            risk_free_rate: DEFAULT_RATE,
        }
    }
}

impl SyntheticBook {
    /// Creates a generator with the default seed, universe and rate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the symbol universe size; zero is treated as one.
    pub fn with_symbols(mut self, num_symbols: usize) -> Self {
        self.num_symbols = num_symbols.max(1);
        self
    }

    /// Sets the risk-free rate carried by every position.
    pub fn with_rate(mut self, risk_free_rate: f64) -> Self {
        self.risk_free_rate = risk_free_rate;
        self
    }

    /// Returns the seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generates `count` positions.
    pub fn generate(&self, count: usize) -> Vec<Position> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let price_dist = Uniform::new(10.0, 500.0);
        let qty_dist = Uniform::new(-1_000.0, 1_000.0);
        let vol_dist = Uniform::new(0.1, 0.8);
        let expiry_dist = Uniform::new(0.1, 2.0);

        let positions: Vec<Position> = (0..count)
            .map(|_| {
                let symbol = format!("SYM{}", rng.gen_range(0..self.num_symbols));
                let price: f64 = rng.sample(price_dist);
                let quantity: f64 = rng.sample(qty_dist);
                let volatility: f64 = rng.sample(vol_dist);

                let kind = match rng.gen_range(0..3u8) {
                    0 => InstrumentKind::Equity,
                    1 => InstrumentKind::Call,
                    _ => InstrumentKind::Put,
                };

                if kind.is_option() {
                    let strike = rng.gen_range(price * 0.8..price * 1.2);
                    let expiry = rng.sample(expiry_dist);
                    Position::option(
                        symbol,
                        kind,
                        quantity,
                        price,
                        volatility,
                        strike,
                        expiry,
                        self.risk_free_rate,
                    )
                } else {
                    Position::equity(symbol, quantity, price, volatility, self.risk_free_rate)
                }
            })
            .collect();

        debug!(count, seed = self.seed, "generated synthetic book");
        positions
    }
}

impl PositionSource for SyntheticBook {
    fn positions(&self, count: usize) -> Vec<Position> {
        self.generate(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_deterministic_for_seed() {
        let book = SyntheticBook::new();
        assert_eq!(book.generate(500), book.generate(500));
        assert_ne!(book.generate(50), SyntheticBook::new().with_seed(43).generate(50));
    }

    #[test]
    fn test_prefix_stable_across_counts() {
        let book = SyntheticBook::new();
        let short = book.generate(10);
        let long = book.generate(20);
        assert_eq!(short[..], long[..10]);
    }

    #[test]
    fn test_field_ranges() {
        for p in SyntheticBook::new().generate(2_000) {
            assert!((10.0..500.0).contains(&p.price));
            assert!((-1_000.0..1_000.0).contains(&p.quantity));
            assert!((0.1..0.8).contains(&p.volatility));
            assert_eq!(p.risk_free_rate, DEFAULT_RATE);
            assert!(p.symbol.starts_with("SYM"));

            if p.is_option() {
                assert!(p.strike >= 0.8 * p.price && p.strike < 1.2 * p.price);
                assert!((0.1..2.0).contains(&p.time_to_expiry));
            } else {
                assert_eq!(p.strike, 0.0);
                assert_eq!(p.time_to_expiry, 0.0);
            }
        }
    }

    #[test]
    fn test_all_kinds_present() {
        let kinds: HashSet<InstrumentKind> = SyntheticBook::new()
            .generate(300)
            .into_iter()
            .map(|p| p.kind)
            .collect();
        assert_eq!(kinds.len(), 3);
    }

    #[test]
    fn test_symbol_universe() {
        let symbols: HashSet<String> = SyntheticBook::new()
            .with_symbols(5)
            .generate(500)
            .into_iter()
            .map(|p| p.symbol)
            .collect();
        assert_eq!(symbols.len(), 5);
        assert!(symbols.contains("SYM0") && symbols.contains("SYM4"));
    }

    #[test]
    fn test_zero_count() {
        assert!(SyntheticBook::new().generate(0).is_empty());
    }
}
