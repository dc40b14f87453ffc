//! Monte Carlo VaR configuration.

/// One trading day in years.
pub const TRADING_DAY: f64 = 1.0 / 252.0;

/// Default number of simulated trials.
pub const DEFAULT_TRIALS: usize = 100_000;

/// Default generator seed.
pub const DEFAULT_SEED: u64 = 42;

/// Configuration errors for the VaR engine.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum VarConfigError {
    /// Horizon is negative, NaN or infinite.
    #[error("Invalid horizon {0}: must be a finite, non-negative number of years")]
    InvalidHorizon(f64),
}

/// Simulation parameters for [`MonteCarloEngine`](super::MonteCarloEngine).
///
/// # Examples
///
/// ```rust
/// use pricer_risk::var::{SimulationConfig, TRADING_DAY};
///
/// let config = SimulationConfig::builder()
///     .num_trials(10_000)
///     .horizon(10.0 * TRADING_DAY)
///     .seed(7)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.num_trials(), 10_000);
/// assert_eq!(config.seed(), 7);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationConfig {
    num_trials: usize,
    horizon: f64,
    seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_trials: DEFAULT_TRIALS,
            horizon: TRADING_DAY,
            seed: DEFAULT_SEED,
        }
    }
}

impl SimulationConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    /// Number of P&L samples to simulate.
    #[inline]
    pub fn num_trials(&self) -> usize {
        self.num_trials
    }

    /// Horizon in years.
    #[inline]
    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    /// Global seed.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Validates the configuration.
    ///
    /// Zero trials is accepted and summarises to an all-zero result.
    ///
    /// # Errors
    /// [`VarConfigError::InvalidHorizon`] for a negative or non-finite horizon.
    pub fn validate(&self) -> Result<(), VarConfigError> {
        if !self.horizon.is_finite() || self.horizon < 0.0 {
            return Err(VarConfigError::InvalidHorizon(self.horizon));
        }
        Ok(())
    }
}

/// Builder for [`SimulationConfig`].
#[derive(Clone, Debug, Default)]
pub struct SimulationConfigBuilder {
    num_trials: Option<usize>,
    horizon: Option<f64>,
    seed: Option<u64>,
}

impl SimulationConfigBuilder {
    /// Sets the number of trials.
    #[inline]
    pub fn num_trials(mut self, num_trials: usize) -> Self {
        self.num_trials = Some(num_trials);
        self
    }

    /// Sets the horizon in years.
    #[inline]
    pub fn horizon(mut self, horizon: f64) -> Self {
        self.horizon = Some(horizon);
        self
    }

    /// Sets the horizon as a number of trading days.
    #[inline]
    pub fn horizon_days(self, days: f64) -> Self {
        self.horizon(days * TRADING_DAY)
    }

    /// Sets the global seed.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds and validates the configuration.
    pub fn build(self) -> Result<SimulationConfig, VarConfigError> {
        let defaults = SimulationConfig::default();
        let config = SimulationConfig {
            num_trials: self.num_trials.unwrap_or(defaults.num_trials),
            horizon: self.horizon.unwrap_or(defaults.horizon),
            seed: self.seed.unwrap_or(defaults.seed),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::builder().build().unwrap();
        assert_eq!(config.num_trials(), 100_000);
        assert_eq!(config.horizon(), 1.0 / 252.0);
        assert_eq!(config.seed(), 42);
    }

    #[test]
    fn test_horizon_days() {
        let config = SimulationConfig::builder()
            .horizon_days(5.0)
            .build()
            .unwrap();
        assert_eq!(config.horizon(), 5.0 * TRADING_DAY);
    }

    #[test]
    fn test_invalid_horizon_rejected() {
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let err = SimulationConfig::builder().horizon(bad).build().unwrap_err();
            assert!(matches!(err, VarConfigError::InvalidHorizon(_)));
        }
    }

    #[test]
    fn test_zero_trials_and_horizon_accepted() {
        let config = SimulationConfig::builder()
            .num_trials(0)
            .horizon(0.0)
            .build()
            .unwrap();
        assert_eq!(config.num_trials(), 0);
    }

    #[test]
    fn test_error_display() {
        let err = VarConfigError::InvalidHorizon(-2.0);
        assert!(err.to_string().contains("Invalid horizon -2"));
    }
}
