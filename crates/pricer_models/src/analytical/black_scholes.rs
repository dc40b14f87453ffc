//! Black-Scholes pricing for European options.
//!
//! ## Mathematical Formulas
//!
//! **Call Price**: C = S·N(d₁) - K·e^(-rT)·N(d₂)
//! **Put Price**: P = K·e^(-rT)·N(-d₂) - S·N(-d₁)
//!
//! Where:
//! - d₁ = (ln(S/K) + (r + σ²/2)T) / (σ√T)
//! - d₂ = d₁ - σ√T
//!
//! When `T <= 0` or `σ <= 0` the formula is skipped and the intrinsic value
//! max(S−K, 0) / max(K−S, 0) is returned.

use num_traits::Float;

use super::distributions::norm_cdf;

/// Black-Scholes model for European option pricing.
///
/// Construction never fails: degenerate volatility is accepted and handled
/// at pricing time by the intrinsic-value branch.
///
/// # Examples
/// ```
/// use pricer_models::analytical::BlackScholes;
///
/// let bs = BlackScholes::new(100.0_f64, 0.05, 0.2);
/// let call = bs.price_call(100.0, 1.0);
/// let put = bs.price_put(100.0, 1.0);
///
/// // Put-call parity: C - P = S - K*exp(-rT)
/// let parity = call - put - (100.0 - 100.0 * (-0.05_f64).exp());
/// assert!(parity.abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BlackScholes<T: Float> {
    /// Spot price (S)
    spot: T,
    /// Risk-free interest rate (r)
    rate: T,
    /// Volatility (σ)
    volatility: T,
}

impl<T: Float> BlackScholes<T> {
    /// Creates a new Black-Scholes model.
    #[inline]
    pub fn new(spot: T, rate: T, volatility: T) -> Self {
        Self {
            spot,
            rate,
            volatility,
        }
    }

    /// Returns the spot price.
    #[inline]
    pub fn spot(&self) -> T {
        self.spot
    }

    /// Returns the risk-free rate.
    #[inline]
    pub fn rate(&self) -> T {
        self.rate
    }

    /// Returns the volatility.
    #[inline]
    pub fn volatility(&self) -> T {
        self.volatility
    }

    /// Whether the closed form is undefined for this expiry.
    #[inline]
    fn is_degenerate(&self, expiry: T) -> bool {
        expiry <= T::zero() || self.volatility <= T::zero()
    }

    /// Returns (d₁, d₂). Only meaningful when not degenerate.
    #[inline]
    fn d1_d2(&self, strike: T, expiry: T) -> (T, T) {
        let half = T::from(0.5).unwrap_or_else(T::zero);
        let vol_sqrt_t = self.volatility * expiry.sqrt();
        let drift = (self.rate + half * self.volatility * self.volatility) * expiry;
        let d1 = ((self.spot / strike).ln() + drift) / vol_sqrt_t;
        (d1, d1 - vol_sqrt_t)
    }

    /// Computes the European call price.
    #[inline]
    pub fn price_call(&self, strike: T, expiry: T) -> T {
        if self.is_degenerate(expiry) {
            return (self.spot - strike).max(T::zero());
        }

        let (d1, d2) = self.d1_d2(strike, expiry);
        let discount = (-self.rate * expiry).exp();
        self.spot * norm_cdf(d1) - strike * discount * norm_cdf(d2)
    }

    /// Computes the European put price.
    #[inline]
    pub fn price_put(&self, strike: T, expiry: T) -> T {
        if self.is_degenerate(expiry) {
            return (strike - self.spot).max(T::zero());
        }

        let (d1, d2) = self.d1_d2(strike, expiry);
        let discount = (-self.rate * expiry).exp();
        strike * discount * norm_cdf(-d2) - self.spot * norm_cdf(-d1)
    }

    /// Prices a call (`is_call = true`) or a put.
    #[inline]
    pub fn price(&self, strike: T, expiry: T, is_call: bool) -> T {
        if is_call {
            self.price_call(strike, expiry)
        } else {
            self.price_put(strike, expiry)
        }
    }
}

/// Free-function form of [`BlackScholes::price`].
///
/// # Examples
/// ```
/// use pricer_models::analytical::black_scholes_price;
///
/// let price = black_scholes_price(100.0, 100.0, 0.2, 0.05, 1.0, true);
/// assert!((price - 10.45).abs() < 0.5);
/// ```
#[inline]
pub fn black_scholes_price(
    spot: f64,
    strike: f64,
    volatility: f64,
    rate: f64,
    expiry: f64,
    is_call: bool,
) -> f64 {
    BlackScholes::new(spot, rate, volatility).price(strike, expiry, is_call)
}
