//! Greeks value type.

use std::ops::{Add, AddAssign};

/// Price and first/second-order sensitivities of one instrument.
///
/// - `delta`: ∂V/∂S
/// - `gamma`: ∂²V/∂S²
/// - `vega`: ∂V/∂σ (per unit of absolute volatility)
/// - `theta`: ∂V/∂t, annualised (negative for decaying long options)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Greeks {
    /// Unit price.
    pub price: f64,
    /// Delta.
    pub delta: f64,
    /// Gamma.
    pub gamma: f64,
    /// Vega.
    pub vega: f64,
    /// Theta.
    pub theta: f64,
}

impl Greeks {
    /// Greeks of a linear unit-exposure instrument at `price`.
    #[inline]
    pub fn linear(price: f64) -> Self {
        Self {
            price,
            delta: 1.0,
            ..Default::default()
        }
    }

    /// Every field multiplied by `quantity`.
    #[inline]
    pub fn scaled(&self, quantity: f64) -> Self {
        Self {
            price: self.price * quantity,
            delta: self.delta * quantity,
            gamma: self.gamma * quantity,
            vega: self.vega * quantity,
            theta: self.theta * quantity,
        }
    }
}

impl Add for Greeks {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            price: self.price + rhs.price,
            delta: self.delta + rhs.delta,
            gamma: self.gamma + rhs.gamma,
            vega: self.vega + rhs.vega,
            theta: self.theta + rhs.theta,
        }
    }
}

impl AddAssign for Greeks {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}
