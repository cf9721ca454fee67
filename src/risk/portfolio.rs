/// How call and put values combine into one portfolio value.
///
/// `value()` must be a pure function: deterministic output from inputs only,
/// defined for every non-negative (call, put) pair.
/// Send + Sync so a definition can be shared freely.
///
/// Any `Fn(f64, f64) -> f64` closure taking (call, put) is a portfolio.
pub trait PortfolioDefinition: Send + Sync {
    fn name(&self) -> &'static str;

    fn value(&self, call: f64, put: f64) -> f64;
}

impl<F> PortfolioDefinition for F
where
    F: Fn(f64, f64) -> f64 + Send + Sync,
{
    fn name(&self) -> &'static str {
        "custom"
    }

    #[inline]
    fn value(&self, call: f64, put: f64) -> f64 {
        self(call, put)
    }
}

/// Long the put, short the call. The default portfolio.
#[derive(Debug, Clone, Copy, Default)]
pub struct PutMinusCall;

impl PortfolioDefinition for PutMinusCall {
    fn name(&self) -> &'static str {
        "put-minus-call"
    }

    #[inline]
    fn value(&self, call: f64, put: f64) -> f64 {
        put - call
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CallMinusPut;

impl PortfolioDefinition for CallMinusPut {
    fn name(&self) -> &'static str {
        "call-minus-put"
    }

    #[inline]
    fn value(&self, call: f64, put: f64) -> f64 {
        call - put
    }
}

/// Long both legs (a strangle when strikes differ).
#[derive(Debug, Clone, Copy, Default)]
pub struct LongStraddle;

impl PortfolioDefinition for LongStraddle {
    fn name(&self) -> &'static str {
        "long-straddle"
    }

    #[inline]
    fn value(&self, call: f64, put: f64) -> f64 {
        call + put
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ShortStraddle;

impl PortfolioDefinition for ShortStraddle {
    fn name(&self) -> &'static str {
        "short-straddle"
    }

    #[inline]
    fn value(&self, call: f64, put: f64) -> f64 {
        -call - put
    }
}

/// Named presets, selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PortfolioPreset {
    #[default]
    PutMinusCall,
    CallMinusPut,
    LongStraddle,
    ShortStraddle,
}

impl PortfolioPreset {
    pub fn definition(self) -> &'static dyn PortfolioDefinition {
        match self {
            Self::PutMinusCall => &PutMinusCall,
            Self::CallMinusPut => &CallMinusPut,
            Self::LongStraddle => &LongStraddle,
            Self::ShortStraddle => &ShortStraddle,
        }
    }
}
