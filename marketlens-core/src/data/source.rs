//! Price series source with NSE → BSE exchange fallback.
//!
//! A bare symbol is qualified with the NSE suffix. If the NSE request fails or
//! comes back empty, the same symbol is tried once on BSE. The plan is at most
//! two attempts and is spelled out by [`FetchPlan`] rather than a retry loop.

use thiserror::Error;
use tracing::{debug, warn};

use super::provider::{DataError, DataProvider};
use crate::domain::{Period, PriceSeries};

pub const NSE_SUFFIX: &str = ".NS";
pub const BSE_SUFFIX: &str = ".BO";

/// Exchange a qualified symbol trades on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exchange {
    Nse,
    Bse,
}

impl Exchange {
    /// Exchange implied by the symbol's suffix, if any.
    pub fn of(symbol: &str) -> Option<Exchange> {
        if symbol.ends_with(NSE_SUFFIX) {
            Some(Exchange::Nse)
        } else if symbol.ends_with(BSE_SUFFIX) {
            Some(Exchange::Bse)
        } else {
            None
        }
    }
}

/// Append the NSE suffix unless the symbol already names an exchange.
pub fn normalize_symbol(symbol: &str) -> String {
    let symbol = symbol.trim();
    match Exchange::of(symbol) {
        Some(_) => symbol.to_string(),
        None => format!("{symbol}{NSE_SUFFIX}"),
    }
}

/// The ordered attempts for one fetch: a primary symbol and at most one fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPlan {
    pub primary: String,
    pub fallback: Option<String>,
}

impl FetchPlan {
    pub fn for_symbol(symbol: &str) -> Self {
        let primary = normalize_symbol(symbol);
        let fallback = match Exchange::of(&primary) {
            Some(Exchange::Nse) => primary
                .strip_suffix(NSE_SUFFIX)
                .map(|base| format!("{base}{BSE_SUFFIX}")),
            _ => None,
        };
        Self { primary, fallback }
    }
}

/// Failure of the whole fetch plan.
#[derive(Debug, Error, PartialEq)]
pub enum FetchError {
    #[error("data unavailable for {symbol}: {cause}")]
    DataUnavailable {
        /// Symbol as the caller supplied it.
        symbol: String,
        /// Failure of the primary attempt.
        cause: DataError,
    },
}

impl FetchError {
    pub fn symbol(&self) -> &str {
        match self {
            FetchError::DataUnavailable { symbol, .. } => symbol,
        }
    }
}

/// Resolves symbols to price series through a [`DataProvider`].
#[derive(Debug, Clone)]
pub struct PriceSeriesSource<P> {
    provider: P,
}

impl<P: DataProvider> PriceSeriesSource<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Fetch a non-empty series for `symbol` over `period`.
    pub fn fetch(&self, symbol: &str, period: Period) -> Result<PriceSeries, FetchError> {
        let plan = FetchPlan::for_symbol(symbol);

        let primary_err = match self.attempt(&plan.primary, period) {
            Ok(series) => return Ok(series),
            Err(err) => err,
        };

        if let Some(fallback) = &plan.fallback {
            warn!(
                primary = %plan.primary,
                fallback = %fallback,
                error = %primary_err,
                "primary exchange failed, trying fallback"
            );
            match self.attempt(fallback, period) {
                Ok(series) => return Ok(series),
                Err(err) => debug!(symbol = %fallback, error = %err, "fallback exchange failed"),
            }
        }

        Err(FetchError::DataUnavailable {
            symbol: symbol.to_string(),
            cause: primary_err,
        })
    }

    /// One provider call; an empty answer counts as a failure.
    fn attempt(&self, symbol: &str, period: Period) -> Result<PriceSeries, DataError> {
        debug!(symbol, %period, provider = self.provider.name(), "fetching series");
        let bars = self.provider.fetch(symbol, period)?;
        PriceSeries::from_unsorted(symbol, bars).map_err(|_| DataError::EmptySeries {
            symbol: symbol.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::provider::StaticProvider;
    use crate::domain::Bar;
    use chrono::NaiveDate;

    fn bars(n: usize, start: f64) -> Vec<Bar> {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..n)
            .map(|i| {
                let close = start + i as f64;
                Bar {
                    date: base + chrono::Duration::days(i as i64),
                    open: close,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 100.0,
                }
            })
            .collect()
    }

    #[test]
    fn normalize_appends_nse_suffix() {
        assert_eq!(normalize_symbol("FOO"), "FOO.NS");
        assert_eq!(normalize_symbol("FOO.NS"), "FOO.NS");
        assert_eq!(normalize_symbol("FOO.BO"), "FOO.BO");
        assert_eq!(normalize_symbol(" FOO "), "FOO.NS");
    }

    #[test]
    fn plan_has_bse_fallback_only_for_nse() {
        assert_eq!(
            FetchPlan::for_symbol("FOO"),
            FetchPlan {
                primary: "FOO.NS".into(),
                fallback: Some("FOO.BO".into()),
            }
        );
        assert_eq!(FetchPlan::for_symbol("FOO.BO").fallback, None);
    }

    #[test]
    fn primary_success_uses_nse_symbol() {
        let provider = StaticProvider::new().with_bars("FOO.NS", bars(5, 100.0));
        let series = PriceSeriesSource::new(provider)
            .fetch("FOO", Period::SixMonths)
            .unwrap();
        assert_eq!(series.symbol(), "FOO.NS");
    }

    #[test]
    fn nse_failure_falls_back_to_bse() {
        let provider = StaticProvider::new().with_bars("FOO.BO", bars(5, 50.0));
        let series = PriceSeriesSource::new(provider)
            .fetch("FOO", Period::OneYear)
            .unwrap();
        assert_eq!(series.symbol(), "FOO.BO");
        assert_eq!(series.closes()[0], 50.0);
    }

    #[test]
    fn empty_nse_series_falls_back_to_bse() {
        let provider = StaticProvider::new()
            .with_bars("FOO.NS", vec![])
            .with_bars("FOO.BO", bars(3, 10.0));
        let series = PriceSeriesSource::new(provider)
            .fetch("FOO.NS", Period::OneYear)
            .unwrap();
        assert_eq!(series.symbol(), "FOO.BO");
    }

    #[test]
    fn negative_price_rows_count_as_empty() {
        let provider = StaticProvider::new()
            .with_bars("FOO.NS", bars(3, -10.0))
            .with_bars("FOO.BO", bars(3, 10.0));
        let series = PriceSeriesSource::new(provider)
            .fetch("FOO.NS", Period::OneYear)
            .unwrap();
        assert_eq!(series.symbol(), "FOO.BO");
        assert!(series.closes().iter().all(|c| *c >= 0.0));
    }

    #[test]
    fn both_failing_reports_requested_symbol_and_primary_cause() {
        let provider = StaticProvider::new()
            .with_failure("FOO.NS", DataError::NetworkUnreachable("timeout".into()));
        let err = PriceSeriesSource::new(provider)
            .fetch("FOO", Period::OneYear)
            .unwrap_err();
        assert_eq!(
            err,
            FetchError::DataUnavailable {
                symbol: "FOO".into(),
                cause: DataError::NetworkUnreachable("timeout".into()),
            }
        );
        assert_eq!(err.symbol(), "FOO");
    }

    #[test]
    fn bse_symbol_is_not_retried() {
        let provider = StaticProvider::new().with_bars("FOO.NS", bars(3, 10.0));
        let err = PriceSeriesSource::new(provider)
            .fetch("FOO.BO", Period::OneYear)
            .unwrap_err();
        assert!(matches!(
            err,
            FetchError::DataUnavailable {
                cause: DataError::SymbolNotFound { .. },
                ..
            }
        ));
    }
}
