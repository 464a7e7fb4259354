//! Monte Carlo projections: distribution summaries and parallel batches.
//!
//! Each series gets its own generator derived from the master seed and the
//! symbol, so a batch produces the same summaries whatever order rayon
//! schedules it in.

use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use marketlens_core::domain::PriceSeries;
use marketlens_core::montecarlo::{GbmParameters, MonteCarlo, Simulation, SimulationOutcome};
use marketlens_core::rng::RngHierarchy;

use crate::config::SimulationConfig;

/// Distribution of simulated terminal prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub start_price: f64,
    pub days: usize,
    pub paths: usize,
    pub mean: f64,
    pub median: f64,
    pub p5: f64,
    pub p25: f64,
    pub p75: f64,
    pub p95: f64,
    /// Share of paths ending strictly above the start price.
    pub prob_up: f64,
    pub outcome: SimulationOutcome,
}

impl SimulationSummary {
    pub fn from_simulation(sim: &Simulation) -> Self {
        let mut sorted: Vec<f64> = sim
            .terminal_prices
            .iter()
            .copied()
            .filter(|p| !p.is_nan())
            .collect();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let n = sorted.len();
        let mean = if n == 0 {
            sim.current_price
        } else {
            sorted.iter().sum::<f64>() / n as f64
        };
        let prob_up = if n == 0 {
            0.0
        } else {
            sorted.iter().filter(|&&p| p > sim.current_price).count() as f64 / n as f64
        };
        let pct = |p: f64| percentile_sorted(&sorted, p).unwrap_or(sim.current_price);

        Self {
            start_price: sim.current_price,
            days: sim.days,
            paths: sim.paths(),
            mean,
            median: pct(50.0),
            p5: pct(5.0),
            p25: pct(25.0),
            p75: pct(75.0),
            p95: pct(95.0),
            prob_up,
            outcome: sim.outcome.clone(),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        matches!(self.outcome, SimulationOutcome::Degenerate(_))
    }

    /// Mean terminal price relative to the start price.
    pub fn expected_return(&self) -> f64 {
        if self.start_price == 0.0 {
            return 0.0;
        }
        self.mean / self.start_price - 1.0
    }
}

/// Linear-interpolated percentile of an ascending slice; `p` in 0..=100.
fn percentile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    let n = sorted.len();
    match n {
        0 => None,
        1 => Some(sorted[0]),
        _ => {
            let rank = (p / 100.0) * (n - 1) as f64;
            let lo = rank.floor() as usize;
            let hi = (lo + 1).min(n - 1);
            let frac = rank - lo as f64;
            Some(sorted[lo] * (1.0 - frac) + sorted[hi] * frac)
        }
    }
}

/// Simulate forward from the series' last close with drift and volatility
/// estimated from its own daily returns.
pub fn project_series<R: Rng + ?Sized>(
    series: &PriceSeries,
    monte_carlo: &MonteCarlo,
    rng: &mut R,
) -> SimulationSummary {
    let params = GbmParameters::estimate(series);
    debug!(
        symbol = series.symbol(),
        drift = params.drift,
        volatility = params.volatility,
        "projecting series"
    );
    let sim = monte_carlo.simulate(series.last_close(), params.volatility, params.drift, rng);
    SimulationSummary::from_simulation(&sim)
}

/// One symbol's projection in a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub symbol: String,
    pub summary: SimulationSummary,
}

/// Project every series in parallel, preserving input order.
pub fn project_all(series: &[PriceSeries], config: &SimulationConfig) -> Vec<Projection> {
    let hierarchy = RngHierarchy::new(config.seed);
    let monte_carlo = config.monte_carlo();

    series
        .par_iter()
        .map(|s| {
            let mut rng = hierarchy.rng_for(s.symbol(), 0);
            Projection {
                symbol: s.symbol().to_string(),
                summary: project_series(s, &monte_carlo, &mut rng),
            }
        })
        .collect()
}
