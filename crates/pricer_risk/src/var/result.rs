//! VaR summary statistics.

/// Summary of a simulated P&L distribution.
///
/// VaR and expected shortfall are positive loss magnitudes; mean and
/// standard deviation are in P&L terms.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VaRResult {
    /// 95% Value-at-Risk.
    pub var_95: f64,
    /// 99% Value-at-Risk.
    pub var_99: f64,
    /// Mean loss at or beyond the 99% quantile.
    pub expected_shortfall: f64,
    /// Sample mean P&L.
    pub mean_pnl: f64,
    /// Population standard deviation of P&L.
    pub std_pnl: f64,
}

/// Quantile indices into an ascending sort of `n` samples: `(idx95, idx99)`.
#[inline]
pub(crate) fn tail_indices(n: usize) -> (usize, usize) {
    let n = n as f64;
    ((0.05 * n).floor() as usize, (0.01 * n).floor() as usize)
}

/// Summarises P&L samples into VaR, expected shortfall, mean and std.
///
/// Quantiles are read from an ascending sort; mean and population standard
/// deviation use the unsorted input. Empty input yields the zero result.
///
/// # Examples
///
/// ```rust
/// use pricer_risk::var::summarize;
///
/// let samples: Vec<f64> = (1..=100).map(|i| i as f64 - 50.0).collect();
/// let result = summarize(&samples);
/// assert_eq!(result.var_95, 44.0);
/// assert_eq!(result.var_99, 48.0);
/// assert_eq!(result.expected_shortfall, 48.5);
/// ```
pub fn summarize(samples: &[f64]) -> VaRResult {
    if samples.is_empty() {
        return VaRResult::default();
    }

    let n = samples.len();
    let mut sorted = samples.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);

    let (idx95, idx99) = tail_indices(n);
    let tail = &sorted[..=idx99];
    let tail_mean = tail.iter().sum::<f64>() / tail.len() as f64;

    let mean = samples.iter().sum::<f64>() / n as f64;
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;

    VaRResult {
        var_95: -sorted[idx95],
        var_99: -sorted[idx99],
        expected_shortfall: -tail_mean,
        mean_pnl: mean,
        std_pnl: variance.sqrt(),
    }
}
