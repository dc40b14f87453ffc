//! Position and instrument kind.

use std::fmt;

use crate::analytical::BlackScholes;

/// Instrument kind carried by a position.
///
/// Equity is a linear, unit-delta instrument. Calls and puts are European
/// options priced with Black-Scholes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum InstrumentKind {
    /// Cash equity.
    Equity,
    /// European call option.
    Call,
    /// European put option.
    Put,
}

impl InstrumentKind {
    /// Returns `true` for calls and puts.
    #[inline]
    pub fn is_option(self) -> bool {
        !matches!(self, Self::Equity)
    }

    /// Returns `true` for calls.
    #[inline]
    pub fn is_call(self) -> bool {
        matches!(self, Self::Call)
    }
}

impl fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equity => write!(f, "equity"),
            Self::Call => write!(f, "call"),
            Self::Put => write!(f, "put"),
        }
    }
}

/// A single trading position.
///
/// `strike` and `time_to_expiry` are only meaningful for options; equity
/// constructors set both to zero. Option inputs are not validated here:
/// non-positive volatility or expiry prices at intrinsic value downstream.
///
/// # Examples
/// ```
/// use pricer_models::instruments::{InstrumentKind, Position};
///
/// let stock = Position::equity("AAPL", 100.0, 150.0, 0.3, 0.05);
/// assert_eq!(stock.notional(), 15_000.0);
/// assert_eq!(stock.kind, InstrumentKind::Equity);
///
/// let call = Position::call("AAPL", 10.0, 150.0, 0.3, 155.0, 0.5, 0.05);
/// assert!(call.is_option());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// Ticker symbol. Not unique within a book.
    pub symbol: String,
    /// Signed quantity; negative is short.
    pub quantity: f64,
    /// Current spot price.
    pub price: f64,
    /// Annualised volatility.
    pub volatility: f64,
    /// Instrument kind.
    pub kind: InstrumentKind,
    /// Option strike (zero for equity).
    pub strike: f64,
    /// Time to expiry in years (zero for equity).
    pub time_to_expiry: f64,
    /// Annualised risk-free rate.
    pub risk_free_rate: f64,
}

impl Position {
    /// Creates an equity position.
    pub fn equity(
        symbol: impl Into<String>,
        quantity: f64,
        price: f64,
        volatility: f64,
        risk_free_rate: f64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
            price,
            volatility,
            kind: InstrumentKind::Equity,
            strike: 0.0,
            time_to_expiry: 0.0,
            risk_free_rate,
        }
    }

    /// Creates an option position of the given kind.
    #[allow(clippy::too_many_arguments)]
    pub fn option(
        symbol: impl Into<String>,
        kind: InstrumentKind,
        quantity: f64,
        price: f64,
        volatility: f64,
        strike: f64,
        time_to_expiry: f64,
        risk_free_rate: f64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
            price,
            volatility,
            kind,
            strike,
            time_to_expiry,
            risk_free_rate,
        }
    }

    /// Creates a European call position.
    pub fn call(
        symbol: impl Into<String>,
        quantity: f64,
        price: f64,
        volatility: f64,
        strike: f64,
        time_to_expiry: f64,
        risk_free_rate: f64,
    ) -> Self {
        Self::option(
            symbol,
            InstrumentKind::Call,
            quantity,
            price,
            volatility,
            strike,
            time_to_expiry,
            risk_free_rate,
        )
    }

    /// Creates a European put position.
    pub fn put(
        symbol: impl Into<String>,
        quantity: f64,
        price: f64,
        volatility: f64,
        strike: f64,
        time_to_expiry: f64,
        risk_free_rate: f64,
    ) -> Self {
        Self::option(
            symbol,
            InstrumentKind::Put,
            quantity,
            price,
            volatility,
            strike,
            time_to_expiry,
            risk_free_rate,
        )
    }

    /// Returns `true` for option positions.
    #[inline]
    pub fn is_option(&self) -> bool {
        self.kind.is_option()
    }

    /// Signed dollar exposure: quantity × spot.
    #[inline]
    pub fn notional(&self) -> f64 {
        self.quantity * self.price
    }

    /// Market value of the position at spot.
    ///
    /// Options are carried at spot notional like equity; this is the
    /// exposure measure used by aggregation, not an option valuation.
    #[inline]
    pub fn market_value(&self) -> f64 {
        self.notional()
    }

    /// Unit price of the instrument: spot for equity, Black-Scholes for options.
    #[inline]
    pub fn unit_price(&self) -> f64 {
        self.unit_price_with(self.price, self.volatility, self.time_to_expiry)
    }

    /// Unit price with spot, volatility and expiry overridden.
    ///
    /// Used by bump-and-reprice; the position itself is never mutated.
    #[inline]
    pub fn unit_price_with(&self, spot: f64, volatility: f64, time_to_expiry: f64) -> f64 {
        match self.kind {
            InstrumentKind::Equity => spot,
            kind => BlackScholes::new(spot, self.risk_free_rate, volatility).price(
                self.strike,
                time_to_expiry,
                kind.is_call(),
            ),
        }
    }
}
