//! Standard normal distribution functions.
//!
//! - `norm_cdf`: Φ(x), computed from the complementary error function
//! - `norm_pdf`: φ(x)
//!
//! Both are generic over `T: Float`.

use num_traits::Float;

/// 1 / sqrt(2)
const FRAC_1_SQRT_2: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// 1 / sqrt(2 * pi)
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Abramowitz and Stegun 7.1.26 coefficients.
const ERFC_P: f64 = 0.327_591_1;
const ERFC_A: [f64; 5] = [
    0.254_829_592,
    -0.284_496_736,
    1.421_413_741,
    -1.453_152_027,
    1.061_405_429,
];

/// Complementary error function (Abramowitz and Stegun 7.1.26).
///
/// Maximum absolute error 1.5e-7. Negative arguments use
/// erfc(-x) = 2 - erfc(x).
#[inline]
fn erfc<T: Float>(x: T) -> T {
    let c = |v: f64| T::from(v).unwrap_or_else(T::zero);

    let ax = x.abs();
    let t = T::one() / (T::one() + c(ERFC_P) * ax);

    // Horner evaluation of a1*t + a2*t^2 + ... + a5*t^5
    let poly = ERFC_A
        .iter()
        .rev()
        .fold(T::zero(), |acc, &a| (acc + c(a)) * t);

    let tail = poly * (-ax * ax).exp();
    if x < T::zero() {
        c(2.0) - tail
    } else {
        tail
    }
}

/// Standard normal cumulative distribution function.
///
/// Φ(x) = ½·erfc(−x/√2)
///
/// # Examples
/// ```
/// use pricer_models::analytical::norm_cdf;
///
/// assert!((norm_cdf(0.0_f64) - 0.5).abs() < 1e-7);
/// assert!((norm_cdf(1.96_f64) - 0.975).abs() < 1e-3);
/// ```
#[inline]
pub fn norm_cdf<T: Float>(x: T) -> T {
    let half = T::from(0.5).unwrap_or_else(T::zero);
    let scale = T::from(FRAC_1_SQRT_2).unwrap_or_else(T::zero);
    half * erfc(-x * scale)
}

/// Standard normal probability density function.
///
/// φ(x) = exp(−x²/2) / √(2π)
///
/// # Examples
/// ```
/// use pricer_models::analytical::norm_pdf;
///
/// assert!((norm_pdf(0.0_f64) - 0.398_942_280_4).abs() < 1e-9);
/// ```
#[inline]
pub fn norm_pdf<T: Float>(x: T) -> T {
    let half = T::from(0.5).unwrap_or_else(T::zero);
    let norm = T::from(FRAC_1_SQRT_2PI).unwrap_or_else(T::zero);
    norm * (-half * x * x).exp()
}
