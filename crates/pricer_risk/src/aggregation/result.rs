//! Aggregation value types and the fold/merge/finalise steps.

use std::cmp::Ordering;
use std::collections::HashMap;

use pricer_models::instruments::Position;

/// Netted exposure of one symbol.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetExposure {
    /// Net signed quantity.
    pub quantity: f64,
    /// Net signed notional.
    pub notional: f64,
    /// `notional / quantity`, or `None` when the net quantity is exactly zero.
    ///
    /// A flat symbol reports no average rather than keeping the last folded
    /// position's price, so single and merged results agree.
    pub avg_price: Option<f64>,
    /// Number of positions folded in.
    pub position_count: usize,
}

impl NetExposure {
    fn add_position(&mut self, position: &Position) {
        self.quantity += position.quantity;
        self.notional += position.notional();
        self.position_count += 1;
    }

    fn absorb(&mut self, other: &NetExposure) {
        self.quantity += other.quantity;
        self.notional += other.notional;
        self.position_count += other.position_count;
    }

    fn refresh_avg_price(&mut self) {
        self.avg_price = (self.quantity != 0.0).then(|| self.notional / self.quantity);
    }
}

/// Aggregated book: per-symbol exposure plus portfolio totals.
///
/// `total_long_exposure` sums positive notionals; `total_short_exposure`
/// sums the magnitudes of the rest; `net_exposure` is the signed sum.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AggregationResult {
    /// Exposure by symbol.
    pub by_symbol: HashMap<String, NetExposure>,
    /// Sum of positive notionals.
    pub total_long_exposure: f64,
    /// Sum of |notional| over non-positive notionals.
    pub total_short_exposure: f64,
    /// Signed sum of all notionals.
    pub net_exposure: f64,
    /// Number of positions folded in.
    pub total_positions: usize,
}

impl AggregationResult {
    /// Folds one position in. Average prices are left stale until
    /// [`finalize`](Self::finalize).
    pub(crate) fn fold(&mut self, position: &Position) {
        let notional = position.notional();
        self.by_symbol
            .entry(position.symbol.clone())
            .or_default()
            .add_position(position);

        if notional > 0.0 {
            self.total_long_exposure += notional;
        } else {
            self.total_short_exposure += notional.abs();
        }
        self.net_exposure += notional;
        self.total_positions += 1;
    }

    /// Adds the raw sums of `other` into `self`; the symbol set becomes the
    /// union.
    pub(crate) fn merge(&mut self, other: AggregationResult) {
        for (symbol, exposure) in other.by_symbol {
            self.by_symbol.entry(symbol).or_default().absorb(&exposure);
        }
        self.total_long_exposure += other.total_long_exposure;
        self.total_short_exposure += other.total_short_exposure;
        self.net_exposure += other.net_exposure;
        self.total_positions += other.total_positions;
    }

    /// Derives every average price from the folded sums.
    pub(crate) fn finalize(&mut self) {
        self.by_symbol
            .values_mut()
            .for_each(NetExposure::refresh_avg_price);
    }

    /// Number of distinct symbols.
    #[inline]
    pub fn unique_symbols(&self) -> usize {
        self.by_symbol.len()
    }

    /// Exposure of `symbol`, if present.
    #[inline]
    pub fn get(&self, symbol: &str) -> Option<&NetExposure> {
        self.by_symbol.get(symbol)
    }

    /// The `k` largest exposures by |notional|, descending.
    ///
    /// Equal magnitudes are ordered by symbol, ascending.
    ///
    /// # Examples
    /// ```
    /// use pricer_models::instruments::Position;
    /// use pricer_risk::aggregation::AggregationEngine;
    ///
    /// let book = vec![
    ///     Position::equity("A", 10.0, 10.0, 0.2, 0.05),
    ///     Position::equity("B", -30.0, 10.0, 0.2, 0.05),
    ///     Position::equity("C", 20.0, 10.0, 0.2, 0.05),
    /// ];
    /// let result = AggregationEngine::new().aggregate(&book);
    /// let top: Vec<&str> = result.top_exposures(2).into_iter().map(|(s, _)| s).collect();
    /// assert_eq!(top, vec!["B", "C"]);
    /// ```
    pub fn top_exposures(&self, k: usize) -> Vec<(&str, &NetExposure)> {
        let mut ranked: Vec<(&str, &NetExposure)> = self
            .by_symbol
            .iter()
            .map(|(symbol, exposure)| (symbol.as_str(), exposure))
            .collect();

        ranked.sort_by(|(sa, a), (sb, b)| {
            b.notional
                .abs()
                .partial_cmp(&a.notional.abs())
                .unwrap_or(Ordering::Equal)
                .then_with(|| sa.cmp(sb))
        });
        ranked.truncate(k);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock(symbol: &str, quantity: f64, price: f64) -> Position {
        Position::equity(symbol, quantity, price, 0.2, 0.05)
    }

    #[test]
    fn test_fold_classifies_long_and_short() {
        let mut r = AggregationResult::default();
        r.fold(&stock("A", 10.0, 5.0));
        r.fold(&stock("B", -4.0, 5.0));
        r.fold(&stock("C", 0.0, 5.0));

        assert_eq!(r.total_long_exposure, 50.0);
        assert_eq!(r.total_short_exposure, 20.0);
        assert_eq!(r.net_exposure, 30.0);
        assert_eq!(r.total_positions, 3);
        assert_eq!(r.unique_symbols(), 3);
    }

    #[test]
    fn test_avg_price_only_after_finalize() {
        let mut r = AggregationResult::default();
        r.fold(&stock("A", 10.0, 5.0));
        assert_eq!(r.get("A").unwrap().avg_price, None);
        r.finalize();
        assert_eq!(r.get("A").unwrap().avg_price, Some(5.0));
    }

    #[test]
    fn test_zero_net_quantity_has_no_avg_price() {
        let mut r = AggregationResult::default();
        r.fold(&stock("A", 10.0, 5.0));
        r.fold(&stock("A", -10.0, 6.0));
        r.finalize();
        let a = r.get("A").unwrap();
        assert_eq!(a.quantity, 0.0);
        assert_eq!(a.notional, -10.0);
        assert_eq!(a.avg_price, None);
        assert_eq!(a.position_count, 2);
    }

    #[test]
    fn test_merge_weights_average_by_quantity() {
        // Partial averages 10 and 20 over quantities 1 and 3 -> weighted 17.5,
        // not the unweighted 15
        let mut left = AggregationResult::default();
        left.fold(&stock("A", 1.0, 10.0));
        let mut right = AggregationResult::default();
        right.fold(&stock("A", 3.0, 20.0));
        right.fold(&stock("B", -2.0, 4.0));

        left.merge(right);
        left.finalize();

        assert_eq!(left.get("A").unwrap().avg_price, Some(17.5));
        assert_eq!(left.get("A").unwrap().position_count, 2);
        assert_eq!(left.get("B").unwrap().avg_price, Some(4.0));
        assert_eq!(left.total_positions, 3);
        assert_eq!(left.total_long_exposure, 70.0);
        assert_eq!(left.total_short_exposure, 8.0);
    }

    #[test]
    fn test_top_exposures_orders_and_truncates() {
        let mut r = AggregationResult::default();
        for (symbol, qty) in [("A", 1.0), ("B", -5.0), ("C", 3.0), ("D", -3.0)] {
            r.fold(&stock(symbol, qty, 10.0));
        }
        r.finalize();

        let top: Vec<&str> = r.top_exposures(3).into_iter().map(|(s, _)| s).collect();
        assert_eq!(top, vec!["B", "C", "D"]);
        assert_eq!(r.top_exposures(10).len(), 4);
        assert!(r.top_exposures(0).is_empty());
    }

    #[test]
    fn test_get_missing_symbol() {
        assert!(AggregationResult::default().get("NOPE").is_none());
    }
}
