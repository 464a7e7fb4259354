//! Monte Carlo price-path simulator.
//!
//! Discretized geometric random walk with one trading day per step
//! (`dt = 1/252`):
//!
//! ```text
//! price += price * (drift * dt + volatility * sqrt(dt) * z),   z ~ N(0, 1)
//! price  = max(price, 0.01)
//! ```
//!
//! Only terminal prices are kept. Degenerate inputs never panic or error; they
//! yield `paths` copies of the starting price and an explicit
//! [`SimulationOutcome::Degenerate`] marker.
//!
//! The random generator is always supplied by the caller, so every call owns
//! its stream (see [`crate::rng::RngHierarchy`] for deriving one per symbol).

use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::PriceSeries;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Simulated prices never fall below this.
pub const PRICE_FLOOR: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DegenerateReason {
    /// Price, volatility or drift was NaN or infinite.
    NonFiniteInput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimulationOutcome {
    Simulated,
    Degenerate(DegenerateReason),
}

/// Terminal prices of one simulation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Simulation {
    pub current_price: f64,
    pub days: usize,
    pub terminal_prices: Vec<f64>,
    pub outcome: SimulationOutcome,
}

impl Simulation {
    fn degenerate(current_price: f64, days: usize, paths: usize, reason: DegenerateReason) -> Self {
        Self {
            current_price,
            days,
            terminal_prices: vec![current_price; paths],
            outcome: SimulationOutcome::Degenerate(reason),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        matches!(self.outcome, SimulationOutcome::Degenerate(_))
    }

    pub fn paths(&self) -> usize {
        self.terminal_prices.len()
    }
}

/// Simulation horizon and path count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonteCarlo {
    pub days: usize,
    pub paths: usize,
}

impl Default for MonteCarlo {
    fn default() -> Self {
        Self {
            days: 30,
            paths: 1000,
        }
    }
}

impl MonteCarlo {
    pub fn new(days: usize, paths: usize) -> Self {
        Self { days, paths }
    }

    /// Simulate `paths` independent paths of `days` steps from `current_price`.
    ///
    /// `volatility` and `drift` are annualized.
    pub fn simulate<R: Rng + ?Sized>(
        &self,
        current_price: f64,
        volatility: f64,
        drift: f64,
        rng: &mut R,
    ) -> Simulation {
        if !(current_price.is_finite() && volatility.is_finite() && drift.is_finite()) {
            warn!(current_price, volatility, drift, "non-finite simulation input");
            return Simulation::degenerate(
                current_price,
                self.days,
                self.paths,
                DegenerateReason::NonFiniteInput,
            );
        }

        let dt = 1.0 / TRADING_DAYS_PER_YEAR;
        let drift_step = drift * dt;
        let vol_step = volatility * dt.sqrt();

        let terminal_prices = (0..self.paths)
            .map(|_| {
                let mut price = current_price;
                for _ in 0..self.days {
                    let shock: f64 = rng.sample(StandardNormal);
                    price = (price + price * (drift_step + vol_step * shock)).max(PRICE_FLOOR);
                }
                price
            })
            .collect();

        Simulation {
            current_price,
            days: self.days,
            terminal_prices,
            outcome: SimulationOutcome::Simulated,
        }
    }
}

/// Free-function form with explicit horizon and path count.
pub fn simulate<R: Rng + ?Sized>(
    current_price: f64,
    volatility: f64,
    drift: f64,
    days: usize,
    paths: usize,
    rng: &mut R,
) -> Simulation {
    MonteCarlo::new(days, paths).simulate(current_price, volatility, drift, rng)
}

/// Annualized drift and volatility of daily returns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GbmParameters {
    pub drift: f64,
    pub volatility: f64,
}

impl GbmParameters {
    /// Estimate from daily returns: drift = mean * 252, volatility = sample
    /// std * sqrt(252). Both are NaN with fewer than two finite returns, which
    /// the simulator turns into a degenerate result.
    pub fn from_returns(returns: &[f64]) -> Self {
        let finite: Vec<f64> = returns.iter().copied().filter(|r| r.is_finite()).collect();
        if finite.len() < 2 {
            return Self {
                drift: f64::NAN,
                volatility: f64::NAN,
            };
        }
        let n = finite.len() as f64;
        let mean = finite.iter().sum::<f64>() / n;
        let variance = finite.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
        Self {
            drift: mean * TRADING_DAYS_PER_YEAR,
            volatility: variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt(),
        }
    }

    pub fn estimate(series: &PriceSeries) -> Self {
        Self::from_returns(&series.daily_returns())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn zero_drift_zero_vol_is_flat() {
        let mut rng = StdRng::seed_from_u64(7);
        let sim = MonteCarlo::default().simulate(1520.0, 0.0, 0.0, &mut rng);
        assert_eq!(sim.paths(), 1000);
        assert!(sim.terminal_prices.iter().all(|&p| p == 1520.0));
        assert_eq!(sim.outcome, SimulationOutcome::Simulated);
    }

    #[test]
    fn nan_input_is_degenerate() {
        let mut rng = StdRng::seed_from_u64(7);
        let sim = simulate(250.0, f64::NAN, 0.1, 30, 64, &mut rng);
        assert_eq!(sim.terminal_prices, vec![250.0; 64]);
        assert_eq!(
            sim.outcome,
            SimulationOutcome::Degenerate(DegenerateReason::NonFiniteInput)
        );
    }

    #[test]
    fn infinite_drift_is_degenerate() {
        let mut rng = StdRng::seed_from_u64(7);
        let sim = simulate(250.0, 0.2, f64::INFINITY, 30, 8, &mut rng);
        assert!(sim.is_degenerate());
        assert_eq!(sim.terminal_prices, vec![250.0; 8]);
    }

    #[test]
    fn negative_volatility_is_simulated() {
        // The sign of the shock is symmetric, so a negative volatility still walks.
        let mut rng = StdRng::seed_from_u64(7);
        let sim = simulate(100.0, -0.3, 0.0, 30, 10, &mut rng);
        assert_eq!(sim.outcome, SimulationOutcome::Simulated);
        assert_eq!(sim.paths(), 10);
        assert!(sim.terminal_prices.iter().any(|&p| p != 100.0));
        assert!(sim.terminal_prices.iter().all(|&p| p >= PRICE_FLOOR));
    }

    #[test]
    fn non_finite_price_yields_copies_of_it() {
        let mut rng = StdRng::seed_from_u64(7);
        let sim = simulate(f64::NAN, 0.2, 0.05, 30, 12, &mut rng);
        assert_eq!(sim.terminal_prices.len(), 12);
        assert!(sim.terminal_prices.iter().all(|p| p.is_nan()));
        assert!(sim.is_degenerate());

        let sim = simulate(f64::INFINITY, 0.2, 0.05, 30, 4, &mut rng);
        assert_eq!(sim.terminal_prices, vec![f64::INFINITY; 4]);
        assert_eq!(
            sim.outcome,
            SimulationOutcome::Degenerate(DegenerateReason::NonFiniteInput)
        );
    }

    #[test]
    fn prices_never_fall_below_floor() {
        let mut rng = StdRng::seed_from_u64(11);
        let sim = simulate(1.0, 8.0, -20.0, 60, 200, &mut rng);
        assert!(sim.terminal_prices.iter().all(|&p| p >= PRICE_FLOOR));
    }

    #[test]
    fn same_seed_same_paths() {
        let mc = MonteCarlo::new(20, 50);
        let a = mc.simulate(100.0, 0.25, 0.05, &mut StdRng::seed_from_u64(3));
        let b = mc.simulate(100.0, 0.25, 0.05, &mut StdRng::seed_from_u64(3));
        let c = mc.simulate(100.0, 0.25, 0.05, &mut StdRng::seed_from_u64(4));
        assert_eq!(a, b);
        assert_ne!(a.terminal_prices, c.terminal_prices);
    }

    #[test]
    fn positive_drift_shifts_mean_up() {
        let mut rng = StdRng::seed_from_u64(99);
        let sim = simulate(100.0, 0.05, 2.52, 25, 2000, &mut rng);
        let mean = sim.terminal_prices.iter().sum::<f64>() / sim.paths() as f64;
        // Expected ≈ 100 * (1 + 0.01)^25 ≈ 128
        assert!(mean > 120.0 && mean < 136.0, "mean = {mean}");
    }

    #[test]
    fn zero_days_returns_start_price() {
        let mut rng = StdRng::seed_from_u64(1);
        let sim = simulate(42.0, 0.3, 0.1, 0, 5, &mut rng);
        assert_eq!(sim.terminal_prices, vec![42.0; 5]);
    }

    #[test]
    fn gbm_parameters_from_returns() {
        let params = GbmParameters::from_returns(&[0.01, -0.01, 0.01, -0.01]);
        assert!(params.drift.abs() < 1e-12);
        // sample std of ±0.01 alternating (n=4): sqrt(4e-4 / 3)
        let expected = (4e-4f64 / 3.0).sqrt() * 252f64.sqrt();
        assert!((params.volatility - expected).abs() < 1e-12);
    }

    #[test]
    fn gbm_parameters_need_two_returns() {
        let params = GbmParameters::from_returns(&[0.02]);
        assert!(params.drift.is_nan());
        assert!(params.volatility.is_nan());
    }
}
