pub mod black_scholes;
pub mod gbm;

use crate::errors::{EngineError, EngineResult};

/// Market inputs shared by pricing and simulation.
///
/// `rate` is the risk-free rate used for risk-neutral valuation.
/// `drift` is the real-world drift used only when simulating outcomes.
/// Stack-allocated, Copy.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct MarketParameters {
    pub spot: f64,
    pub volatility: f64,
    pub rate: f64,
    pub drift: f64,
}

impl MarketParameters {
    pub fn new(spot: f64, volatility: f64, rate: f64, drift: f64) -> Self {
        Self { spot, volatility, rate, drift }
    }

    pub fn validate(&self) -> EngineResult<()> {
        if !(self.spot.is_finite() && self.spot > 0.0) {
            return Err(EngineError::InvalidMarket(format!(
                "spot must be positive and finite, got {}",
                self.spot
            )));
        }
        if !(self.volatility.is_finite() && self.volatility > 0.0) {
            return Err(EngineError::InvalidMarket(format!(
                "volatility must be positive and finite, got {}",
                self.volatility
            )));
        }
        if !self.rate.is_finite() || !self.drift.is_finite() {
            return Err(EngineError::InvalidMarket(format!(
                "rate and drift must be finite, got rate={} drift={}",
                self.rate, self.drift
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Call,
    Put,
}

impl std::fmt::Display for OptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "call"),
            Self::Put => write!(f, "put"),
        }
    }
}

/// A European option leg. `expiry` is in years.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct OptionSpec {
    pub strike: f64,
    pub expiry: f64,
    pub kind: OptionKind,
}

impl OptionSpec {
    pub fn call(strike: f64, expiry: f64) -> Self {
        Self { strike, expiry, kind: OptionKind::Call }
    }

    pub fn put(strike: f64, expiry: f64) -> Self {
        Self { strike, expiry, kind: OptionKind::Put }
    }

    pub fn validate(&self) -> EngineResult<()> {
        if !(self.strike.is_finite() && self.strike > 0.0) {
            return Err(EngineError::InvalidOption(format!(
                "{} strike must be positive and finite, got {}",
                self.kind, self.strike
            )));
        }
        if !(self.expiry.is_finite() && self.expiry >= 0.0) {
            return Err(EngineError::InvalidOption(format!(
                "{} time to expiry must be non-negative, got {}",
                self.kind, self.expiry
            )));
        }
        Ok(())
    }

    /// Time left to expiry after `horizon` years have elapsed.
    #[inline]
    pub fn remaining(&self, horizon: f64) -> f64 {
        self.expiry - horizon
    }
}
