pub mod engine;
pub mod portfolio;
pub mod tail;

pub use engine::{LossDistribution, RiskEngine, RiskOutcome, RiskStatistics, SimulationConfig};
pub use portfolio::{PortfolioDefinition, PortfolioPreset, PutMinusCall};
