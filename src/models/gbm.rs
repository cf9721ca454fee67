use crate::models::MarketParameters;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Terminal-price sampler for geometric Brownian motion under the real-world drift.
///
/// S_h = S_0 * exp((mu - sigma^2/2)*h + sigma*sqrt(h)*Z),  Z ~ N(0, 1)
///
/// `mu` is the market's drift, not the risk-free rate: this simulates
/// outcomes, it does not price. The sampler owns no random state.
#[derive(Debug, Clone, Copy)]
pub struct GbmSampler {
    spot: f64,
    /// (mu - sigma^2/2) * h
    drift_term: f64,
    /// sigma * sqrt(h)
    diffusion: f64,
}

impl GbmSampler {
    pub fn new(market: &MarketParameters, horizon: f64) -> Self {
        let sigma = market.volatility;
        Self {
            spot: market.spot,
            drift_term: (market.drift - 0.5 * sigma * sigma) * horizon,
            diffusion: sigma * horizon.sqrt(),
        }
    }

    /// Terminal price for a single standard-normal draw.
    #[inline]
    pub fn terminal(&self, z: f64) -> f64 {
        self.spot * (self.drift_term + self.diffusion * z).exp()
    }

    /// Map an injected sequence of standard-normal draws to terminal prices.
    pub fn from_normals(&self, normals: &[f64]) -> Vec<f64> {
        normals.iter().map(|&z| self.terminal(z)).collect()
    }

    /// Draw `n` i.i.d. terminal prices from `rng`.
    pub fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<f64> {
        (0..n)
            .map(|_| {
                let z: f64 = rng.sample(StandardNormal);
                self.terminal(z)
            })
            .collect()
    }

    /// Draw `n` terminal prices from a generator built for this call only.
    pub fn sample_fresh(&self, n: usize, seed: Option<u64>) -> Vec<f64> {
        let mut rng = rng_from_seed(seed);
        self.sample(n, &mut rng)
    }
}

/// Seeded generator when `seed` is given, OS entropy otherwise.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn market() -> MarketParameters {
        MarketParameters::new(100.0, 0.4, 0.05, 0.1)
    }

    #[test]
    fn test_zero_draw_is_deterministic_drift() {
        let sampler = GbmSampler::new(&market(), 1.0);
        // (0.1 - 0.08) * 1
        assert_relative_eq!(sampler.terminal(0.0), 100.0 * 0.02_f64.exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_from_normals_shape_and_monotonicity() {
        let sampler = GbmSampler::new(&market(), 1.0);
        let spots = sampler.from_normals(&[-2.0, -1.0, 0.0, 1.0, 2.0]);
        assert_eq!(spots.len(), 5);
        assert!(spots.windows(2).all(|w| w[0] < w[1]), "spots={spots:?}");
        assert!(spots.iter().all(|s| *s > 0.0));
    }

    #[test]
    fn test_seeded_sampling_reproducible() {
        let sampler = GbmSampler::new(&market(), 1.0);
        let a = sampler.sample_fresh(1000, Some(7));
        let b = sampler.sample_fresh(1000, Some(7));
        let c = sampler.sample_fresh(1000, Some(8));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_log_return_moments_use_real_world_drift() {
        let m = market();
        let h = 1.0;
        let sampler = GbmSampler::new(&m, h);
        let mut rng = StdRng::seed_from_u64(42);
        let n = 200_000;
        let log_returns: Vec<f64> = sampler
            .sample(n, &mut rng)
            .iter()
            .map(|s| (s / m.spot).ln())
            .collect();

        let mean = log_returns.iter().sum::<f64>() / n as f64;
        let var = log_returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n as f64 - 1.0);

        let expected_mean = (m.drift - 0.5 * m.volatility * m.volatility) * h;
        assert!((mean - expected_mean).abs() < 0.005, "mean={mean} expected={expected_mean}");
        assert!((var - m.volatility * m.volatility * h).abs() < 0.005, "var={var}");
    }

    #[test]
    fn test_unseeded_calls_differ() {
        let sampler = GbmSampler::new(&market(), 1.0);
        assert_ne!(sampler.sample_fresh(64, None), sampler.sample_fresh(64, None));
    }
}
