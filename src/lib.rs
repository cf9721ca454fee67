//! Monte Carlo Value-at-Risk and Expected Shortfall for a call/put portfolio
//! under Black-Scholes, with the underlying simulated as GBM over a short horizon.

pub mod config;
pub mod errors;
pub mod models;
pub mod report;
pub mod risk;

pub use errors::{EngineError, EngineResult};
pub use models::{MarketParameters, OptionKind, OptionSpec};
pub use risk::{
    LossDistribution, PortfolioDefinition, PortfolioPreset, PutMinusCall, RiskEngine, RiskOutcome,
    RiskStatistics, SimulationConfig,
};
