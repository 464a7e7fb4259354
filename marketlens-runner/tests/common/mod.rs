//! Shared fixtures for runner integration tests.
#![allow(dead_code)]

use chrono::NaiveDate;
use marketlens_core::data::{DataError, PriceSeriesSource, StaticProvider};
use marketlens_core::domain::{Bar, PriceSeries};
use marketlens_runner::ScanConfig;

pub fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
    let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            date: base + chrono::Duration::days(i as i64),
            open: close,
            high: close * 1.01,
            low: close * 0.99,
            close,
            volume: 75_000.0,
        })
        .collect()
}

/// 130 bars rising 0.4% a day: scores 25 ("RSI Overbought", "MACD Bullish",
/// "Strong Uptrend").
pub fn climbing(start: f64) -> Vec<Bar> {
    let closes: Vec<f64> = (0..130).map(|i| start * 1.004f64.powi(i)).collect();
    bars_from_closes(&closes)
}

/// 130 identical closes: never above its moving averages, scores at most 10.
pub fn flat(price: f64) -> Vec<Bar> {
    bars_from_closes(&[price; 130])
}

/// Too short to survive the SMA-50 warmup.
pub fn short(start: f64) -> Vec<Bar> {
    let closes: Vec<f64> = (0..20).map(|i| start + i as f64).collect();
    bars_from_closes(&closes)
}

pub fn climbing_series(symbol: &str, start: f64) -> PriceSeries {
    PriceSeries::new(symbol, climbing(start)).unwrap()
}

/// Watchlist fixture:
/// - ALPHA trades on NSE and climbs
/// - BETA only trades on BSE and climbs
/// - FLAT is flat on NSE
/// - TINY has too little history
/// - GONE fails on both exchanges
pub fn source() -> PriceSeriesSource<StaticProvider> {
    let provider = StaticProvider::new()
        .with_bars("ALPHA.NS", climbing(1200.0))
        .with_failure("BETA.NS", DataError::RateLimited { retry_after_secs: 60 })
        .with_bars("BETA.BO", climbing(310.0))
        .with_bars("FLAT.NS", flat(500.0))
        .with_bars("TINY.NS", short(40.0))
        .with_failure("GONE.NS", DataError::NetworkUnreachable("refused".into()));
    PriceSeriesSource::new(provider)
}

pub fn config(min_score: f64) -> ScanConfig {
    ScanConfig {
        min_score,
        throttle_ms: 0,
        ..ScanConfig::default()
    }
}
