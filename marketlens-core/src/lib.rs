//! MarketLens Core: signal and forecast engine for daily equity series.
//!
//! This crate contains:
//! - Domain types (bars, price series, lookback periods)
//! - Price series source with NSE → BSE exchange fallback over a pluggable provider
//! - Indicator library (SMA, EMA, RSI, MACD) and the aligned indicator frame
//! - Heuristic scoring model (bounded score, signal labels, naive forward return)
//! - Monte Carlo price-path simulator with caller-owned random streams
//!
//! Every call is stateless: results are fresh value objects owned by the caller.

pub mod data;
pub mod domain;
pub mod indicators;
pub mod montecarlo;
pub mod rng;
pub mod scoring;

pub use data::{DataError, DataProvider, FetchError, PriceSeriesSource};
pub use domain::{Bar, Period, PriceSeries};
pub use indicators::IndicatorFrame;
pub use montecarlo::{GbmParameters, MonteCarlo, Simulation, SimulationOutcome};
pub use scoring::{score, score_series, ScoreResult, ScoreStatus, ScoringModel};
