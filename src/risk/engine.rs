use crate::errors::{EngineError, EngineResult};
use crate::models::black_scholes::BlackScholes;
use crate::models::gbm::{rng_from_seed, GbmSampler};
use crate::models::{MarketParameters, OptionKind, OptionSpec};
use crate::risk::portfolio::PortfolioDefinition;
use crate::risk::tail;
use rand::Rng;

/// Monte Carlo settings for one risk run.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct SimulationConfig {
    /// Risk horizon in years. Must be shorter than every leg's expiry.
    pub horizon: f64,
    pub trials: usize,
    /// In (0, 1), e.g. 0.95
    pub confidence: f64,
    /// Fixed seed for reproducible runs; fresh entropy when None.
    pub seed: Option<u64>,
}

impl SimulationConfig {
    pub fn new(horizon: f64, trials: usize, confidence: f64) -> Self {
        Self { horizon, trials, confidence, seed: None }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> EngineResult<()> {
        if !(self.horizon.is_finite() && self.horizon > 0.0) {
            return Err(EngineError::InvalidSimulation(format!(
                "horizon must be positive, got {}",
                self.horizon
            )));
        }
        if self.trials == 0 {
            return Err(EngineError::InvalidSimulation("trial count must be positive".into()));
        }
        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(EngineError::InvalidSimulation(format!(
                "confidence must be in (0, 1), got {}",
                self.confidence
            )));
        }
        Ok(())
    }
}

/// Simulated portfolio value changes (v0 - vt), sorted ascending.
/// Positive entries are losses.
#[derive(Debug, Clone, PartialEq)]
pub struct LossDistribution {
    sorted: Vec<f64>,
}

impl LossDistribution {
    /// Sorts `losses`. Rejects empty input and NaN.
    pub fn from_unsorted(mut losses: Vec<f64>) -> EngineResult<Self> {
        if losses.is_empty() {
            return Err(EngineError::Model("empty loss distribution".into()));
        }
        if let Some(i) = losses.iter().position(|x| x.is_nan()) {
            return Err(EngineError::Model(format!("loss at trial {i} is NaN")));
        }
        losses.sort_by(|a, b| a.total_cmp(b));
        Ok(Self { sorted: losses })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.sorted
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.sorted
    }

    pub fn percentile(&self, q: f64) -> f64 {
        tail::percentile(&self.sorted, q)
    }

    pub fn tail_mean(&self, threshold: f64) -> f64 {
        tail::tail_mean(&self.sorted, threshold)
    }

    pub fn min(&self) -> f64 {
        self.sorted[0]
    }

    pub fn max(&self) -> f64 {
        self.sorted[self.sorted.len() - 1]
    }

    pub fn median(&self) -> f64 {
        self.percentile(0.5)
    }
}

/// VaR and ES at one confidence level, both stated as losses.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct RiskStatistics {
    pub confidence: f64,
    pub var: f64,
    pub es: f64,
}

impl RiskStatistics {
    pub fn from_losses(losses: &LossDistribution, confidence: f64) -> Self {
        let var = losses.percentile(confidence);
        let es = losses.tail_mean(var);
        Self { confidence, var, es }
    }
}

#[derive(Debug, Clone)]
pub struct RiskOutcome {
    /// Portfolio value today
    pub initial_value: f64,
    pub losses: LossDistribution,
    pub stats: RiskStatistics,
}

/// Revalues a call/put portfolio at the horizon across simulated spots.
///
/// Pricing is risk-neutral (risk-free rate); the simulated spots use the
/// real-world drift. All inputs are validated on construction and never
/// mutated, so one engine can run any number of times.
pub struct RiskEngine {
    pricer: BlackScholes,
    market: MarketParameters,
    call: OptionSpec,
    put: OptionSpec,
    sim: SimulationConfig,
}

impl RiskEngine {
    pub fn new(
        market: MarketParameters,
        call: OptionSpec,
        put: OptionSpec,
        sim: SimulationConfig,
    ) -> EngineResult<Self> {
        market.validate()?;
        call.validate()?;
        put.validate()?;
        sim.validate()?;

        if call.kind != OptionKind::Call {
            return Err(EngineError::InvalidOption(format!("call leg has kind {}", call.kind)));
        }
        if put.kind != OptionKind::Put {
            return Err(EngineError::InvalidOption(format!("put leg has kind {}", put.kind)));
        }

        for leg in [&call, &put] {
            let remaining = leg.remaining(sim.horizon);
            if remaining <= 0.0 {
                return Err(EngineError::InvalidSimulation(format!(
                    "horizon {} must be shorter than {} expiry {} (remaining {remaining})",
                    sim.horizon, leg.kind, leg.expiry
                )));
            }
        }

        Ok(Self { pricer: BlackScholes::new(), market, call, put, sim })
    }

    pub fn market(&self) -> &MarketParameters {
        &self.market
    }

    pub fn simulation(&self) -> &SimulationConfig {
        &self.sim
    }

    /// Portfolio value at time 0.
    pub fn initial_value<P: PortfolioDefinition + ?Sized>(&self, portfolio: &P) -> f64 {
        let c0 = self.pricer.price(&self.market, &self.call);
        let p0 = self.pricer.price(&self.market, &self.put);
        portfolio.value(c0, p0)
    }

    /// Run with the configured seed, or fresh entropy if none.
    pub fn run<P: PortfolioDefinition + ?Sized>(&self, portfolio: &P) -> EngineResult<RiskOutcome> {
        let mut rng = rng_from_seed(self.sim.seed);
        self.run_with_rng(portfolio, &mut rng)
    }

    pub fn run_with_rng<P, R>(&self, portfolio: &P, rng: &mut R) -> EngineResult<RiskOutcome>
    where
        P: PortfolioDefinition + ?Sized,
        R: Rng + ?Sized,
    {
        let sampler = GbmSampler::new(&self.market, self.sim.horizon);
        let spots = sampler.sample(self.sim.trials, rng);
        tracing::debug!(trials = spots.len(), "sampled horizon spots");
        self.evaluate(portfolio, &spots)
    }

    /// Run on a caller-supplied sequence of standard-normal draws instead of
    /// live sampling. `normals.len()` must equal the configured trial count.
    pub fn run_with_draws<P: PortfolioDefinition + ?Sized>(
        &self,
        portfolio: &P,
        normals: &[f64],
    ) -> EngineResult<RiskOutcome> {
        if normals.len() != self.sim.trials {
            return Err(EngineError::InvalidSimulation(format!(
                "expected {} draws, got {}",
                self.sim.trials,
                normals.len()
            )));
        }
        let sampler = GbmSampler::new(&self.market, self.sim.horizon);
        let spots = sampler.from_normals(normals);
        tracing::debug!(trials = spots.len(), "mapped injected draws to horizon spots");
        self.evaluate(portfolio, &spots)
    }

    fn evaluate<P: PortfolioDefinition + ?Sized>(
        &self,
        portfolio: &P,
        spots: &[f64],
    ) -> EngineResult<RiskOutcome> {
        let v0 = self.initial_value(portfolio);
        if !v0.is_finite() {
            return Err(EngineError::Model(format!("initial portfolio value is {v0}")));
        }
        tracing::debug!(portfolio = portfolio.name(), v0 = v0, "valued portfolio at time 0");

        let h = self.sim.horizon;
        let calls = self.pricer.price_many(spots, &self.market, &self.call, self.call.remaining(h));
        let puts = self.pricer.price_many(spots, &self.market, &self.put, self.put.remaining(h));

        let losses: Vec<f64> = calls
            .iter()
            .zip(&puts)
            .map(|(&c, &p)| v0 - portfolio.value(c, p))
            .collect();

        if let Some(bad) = losses.iter().find(|x| !x.is_finite()) {
            return Err(EngineError::Model(format!("non-finite loss {bad} at horizon")));
        }
        tracing::debug!(trials = losses.len(), horizon = h, "revalued portfolio at horizon");

        let losses = LossDistribution::from_unsorted(losses)?;
        tracing::debug!(min = losses.min(), max = losses.max(), "sorted loss distribution");
        let stats = RiskStatistics::from_losses(&losses, self.sim.confidence);

        tracing::info!(
            portfolio = portfolio.name(),
            trials = losses.len(),
            v0 = v0,
            var = stats.var,
            es = stats.es,
            confidence = stats.confidence,
            "risk run complete"
        );

        Ok(RiskOutcome { initial_value: v0, losses, stats })
    }
}
