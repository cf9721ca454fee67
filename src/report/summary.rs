use crate::config::AppConfig;
use crate::errors::EngineResult;
use crate::models::{MarketParameters, OptionSpec};
use crate::risk::{RiskOutcome, SimulationConfig};
use chrono::{DateTime, Utc};

/// Everything needed to reproduce or audit one run, minus the raw losses.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RiskReport {
    pub generated_at: DateTime<Utc>,
    pub portfolio: &'static str,
    pub market: MarketParameters,
    pub call: OptionSpec,
    pub put: OptionSpec,
    pub simulation: SimulationConfig,
    pub initial_value: f64,
    pub var: f64,
    pub es: f64,
    pub loss_min: f64,
    pub loss_median: f64,
    pub loss_max: f64,
}

impl RiskReport {
    pub fn new(config: &AppConfig, outcome: &RiskOutcome) -> Self {
        Self {
            generated_at: Utc::now(),
            portfolio: config.portfolio.definition().name(),
            market: config.market,
            call: config.call,
            put: config.put,
            simulation: config.simulation,
            initial_value: outcome.initial_value,
            var: outcome.stats.var,
            es: outcome.stats.es,
            loss_min: outcome.losses.min(),
            loss_median: outcome.losses.median(),
            loss_max: outcome.losses.max(),
        }
    }

    pub fn headline(&self) -> String {
        format!("VaR: {} ES: {}", self.var, self.es)
    }

    pub fn to_json(&self) -> EngineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
