use crate::models::{MarketParameters, OptionKind, OptionSpec};
use statrs::distribution::{ContinuousCDF, Normal};

/// Black-Scholes European option pricing.
///
/// d1 = (ln(S/K) + (r + sigma^2/2)*T) / (sigma * sqrt(T))
/// d2 = d1 - sigma * sqrt(T)
///
/// Call = S*Phi(d1) - K*e^{-rT}*Phi(d2)
/// Put  = K*e^{-rT}*Phi(-d2) - S*Phi(-d1)
///
/// Callers must ensure T > 0 and sigma > 0. Neither is guarded here: a
/// zero denominator yields non-finite prices, which the risk engine rejects.
pub struct BlackScholes {
    /// Standard normal distribution (created once, reused)
    normal: Normal,
}

/// Terms that depend only on (market, t), shared across every spot in a batch.
#[derive(Debug, Clone, Copy)]
struct TermInputs {
    sigma_sqrt_t: f64,
    carry: f64,
    discount: f64,
}

impl TermInputs {
    #[inline]
    fn new(market: &MarketParameters, t: f64) -> Self {
        let sigma = market.volatility;
        Self {
            sigma_sqrt_t: sigma * t.sqrt(),
            carry: (market.rate + 0.5 * sigma * sigma) * t,
            discount: (-market.rate * t).exp(),
        }
    }
}

impl BlackScholes {
    pub fn new() -> Self {
        Self { normal: Normal::standard() }
    }

    /// Returns (d1, d2) for the given spot, strike and time to expiry.
    #[inline]
    pub fn d1_d2(&self, spot: f64, market: &MarketParameters, strike: f64, t: f64) -> (f64, f64) {
        let terms = TermInputs::new(market, t);
        Self::d1_d2_with(spot, strike, &terms)
    }

    #[inline]
    fn d1_d2_with(spot: f64, strike: f64, terms: &TermInputs) -> (f64, f64) {
        let d1 = ((spot / strike).ln() + terms.carry) / terms.sigma_sqrt_t;
        (d1, d1 - terms.sigma_sqrt_t)
    }

    #[inline]
    fn value_with(&self, spot: f64, strike: f64, kind: OptionKind, terms: &TermInputs) -> f64 {
        let (d1, d2) = Self::d1_d2_with(spot, strike, terms);
        let pv_strike = strike * terms.discount;
        match kind {
            OptionKind::Call => spot * self.normal.cdf(d1) - pv_strike * self.normal.cdf(d2),
            OptionKind::Put => pv_strike * self.normal.cdf(-d2) - spot * self.normal.cdf(-d1),
        }
    }

    pub fn call(&self, spot: f64, market: &MarketParameters, strike: f64, t: f64) -> f64 {
        self.value_with(spot, strike, OptionKind::Call, &TermInputs::new(market, t))
    }

    pub fn put(&self, spot: f64, market: &MarketParameters, strike: f64, t: f64) -> f64 {
        self.value_with(spot, strike, OptionKind::Put, &TermInputs::new(market, t))
    }

    /// Value `option` at an explicit spot with `t` years left.
    pub fn price_at(&self, spot: f64, market: &MarketParameters, option: &OptionSpec, t: f64) -> f64 {
        self.value_with(spot, option.strike, option.kind, &TermInputs::new(market, t))
    }

    /// Value `option` today: market spot, full time to expiry.
    pub fn price(&self, market: &MarketParameters, option: &OptionSpec) -> f64 {
        self.price_at(market.spot, market, option, option.expiry)
    }

    /// Elementwise valuation over a batch of spots. Output has the same length as `spots`.
    pub fn price_many(
        &self,
        spots: &[f64],
        market: &MarketParameters,
        option: &OptionSpec,
        t: f64,
    ) -> Vec<f64> {
        let terms = TermInputs::new(market, t);
        spots
            .iter()
            .map(|&s| self.value_with(s, option.strike, option.kind, &terms))
            .collect()
    }
}

impl Default for BlackScholes {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn market(vol: f64) -> MarketParameters {
        MarketParameters::new(100.0, vol, 0.05, 0.1)
    }

    #[test]
    fn test_reference_values() {
        // Hull, S=K=100, r=5%, sigma=20%, T=1
        let bs = BlackScholes::new();
        let m = MarketParameters::new(100.0, 0.2, 0.05, 0.0);
        assert_relative_eq!(bs.call(100.0, &m, 100.0, 1.0), 10.4506, epsilon = 1e-3);
        assert_relative_eq!(bs.put(100.0, &m, 100.0, 1.0), 5.5735, epsilon = 1e-3);
    }

    #[test]
    fn test_d1_d2_spacing() {
        let bs = BlackScholes::new();
        let m = market(0.4);
        let (d1, d2) = bs.d1_d2(100.0, &m, 105.0, 9.0);
        assert_relative_eq!(d1 - d2, 0.4 * 3.0, epsilon = 1e-12);
        assert_relative_eq!(d1, ((100.0_f64 / 105.0).ln() + 0.13 * 9.0) / 1.2, epsilon = 1e-12);
    }

    #[test]
    fn test_prices_non_negative() {
        let bs = BlackScholes::new();
        for &vol in &[0.05, 0.2, 0.4, 1.5] {
            let m = market(vol);
            for &strike in &[50.0, 95.0, 100.0, 105.0, 200.0] {
                for &t in &[0.01, 1.0, 10.0] {
                    let c = bs.call(m.spot, &m, strike, t);
                    let p = bs.put(m.spot, &m, strike, t);
                    assert!(c >= -1e-12, "call={c} vol={vol} k={strike} t={t}");
                    assert!(p >= -1e-12, "put={p} vol={vol} k={strike} t={t}");
                }
            }
        }
    }

    #[test]
    fn test_put_call_parity() {
        let bs = BlackScholes::new();
        let m = market(0.4);
        for &strike in &[80.0, 95.0, 105.0, 130.0] {
            for &t in &[0.25, 1.0, 9.0] {
                let c = bs.call(m.spot, &m, strike, t);
                let p = bs.put(m.spot, &m, strike, t);
                let forward_gap = m.spot - strike * (-m.rate * t).exp();
                assert_relative_eq!(c - p, forward_gap, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_small_vol_limit() {
        let bs = BlackScholes::new();
        let m = market(1e-6);
        let t = 2.0;
        for &strike in &[90.0, 105.0, 120.0] {
            let pv = strike * (-m.rate * t).exp();
            let c = bs.call(m.spot, &m, strike, t);
            let p = bs.put(m.spot, &m, strike, t);
            assert_relative_eq!(c, (m.spot - pv).max(0.0), epsilon = 1e-6);
            assert_relative_eq!(p, (pv - m.spot).max(0.0), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_price_many_matches_scalar() {
        let bs = BlackScholes::new();
        let m = market(0.4);
        let put = OptionSpec::put(95.0, 10.0);
        let spots = [60.0, 95.0, 100.0, 140.0, 300.0];
        let batch = bs.price_many(&spots, &m, &put, 9.0);
        assert_eq!(batch.len(), spots.len());
        for (s, v) in spots.iter().zip(&batch) {
            assert_eq!(*v, bs.price_at(*s, &m, &put, 9.0));
        }
    }

    #[test]
    fn test_price_uses_market_spot_and_full_expiry() {
        let bs = BlackScholes::new();
        let m = market(0.4);
        let call = OptionSpec::call(105.0, 10.0);
        assert_eq!(bs.price(&m, &call), bs.call(100.0, &m, 105.0, 10.0));
    }

    #[test]
    fn test_zero_time_is_not_finite() {
        let bs = BlackScholes::new();
        let m = market(0.4);
        // At the money with t=0: 0/0 in d1
        assert!(!bs.call(100.0, &m, 100.0, 0.0).is_finite());
    }
}
