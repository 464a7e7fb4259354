//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts the single outbound operation the engine
//! needs ("daily OHLCV bars for symbol X over period P") so Yahoo can be
//! swapped for any other source, or for an in-memory map in tests.

use std::collections::HashMap;

use thiserror::Error;

use crate::domain::{Bar, Period};

/// Structured error types for provider operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("provider returned no bars for {symbol}")]
    EmptySeries { symbol: String },

    #[error("hard stop: data provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("data error: {0}")]
    Other(String),
}

/// Trait for market-data providers.
///
/// Implementations return raw rows in whatever order the source produced them;
/// canonicalization into a `PriceSeries` happens in the source layer. An empty
/// `Ok` vector is allowed and is treated as a failed attempt upstream.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily OHLCV bars for an exchange-qualified symbol.
    fn fetch(&self, symbol: &str, period: Period) -> Result<Vec<Bar>, DataError>;
}

impl<P: DataProvider + ?Sized> DataProvider for &P {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch(&self, symbol: &str, period: Period) -> Result<Vec<Bar>, DataError> {
        (**self).fetch(symbol, period)
    }
}

impl<P: DataProvider + ?Sized> DataProvider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch(&self, symbol: &str, period: Period) -> Result<Vec<Bar>, DataError> {
        (**self).fetch(symbol, period)
    }
}

/// In-memory provider keyed by exchange-qualified symbol.
///
/// Symbols without an entry answer `SymbolNotFound`. Period is ignored; the
/// stored bars are returned as-is.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    bars: HashMap<String, Vec<Bar>>,
    failures: HashMap<String, DataError>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bars(mut self, symbol: impl Into<String>, bars: Vec<Bar>) -> Self {
        self.bars.insert(symbol.into(), bars);
        self
    }

    /// Make `symbol` fail with a specific error.
    pub fn with_failure(mut self, symbol: impl Into<String>, error: DataError) -> Self {
        self.failures.insert(symbol.into(), error);
        self
    }
}

impl DataProvider for StaticProvider {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch(&self, symbol: &str, _period: Period) -> Result<Vec<Bar>, DataError> {
        if let Some(err) = self.failures.get(symbol) {
            return Err(err.clone());
        }
        self.bars
            .get(symbol)
            .cloned()
            .ok_or_else(|| DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn one_bar() -> Vec<Bar> {
        vec![Bar {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            open: 1.0,
            high: 1.0,
            low: 1.0,
            close: 1.0,
            volume: 0.0,
        }]
    }

    #[test]
    fn static_provider_serves_known_symbols() {
        let provider = StaticProvider::new().with_bars("INFY.NS", one_bar());
        assert_eq!(provider.fetch("INFY.NS", Period::OneYear).unwrap().len(), 1);
        assert!(matches!(
            provider.fetch("INFY.BO", Period::OneYear),
            Err(DataError::SymbolNotFound { .. })
        ));
    }

    #[test]
    fn static_provider_injected_failure_wins() {
        let provider = StaticProvider::new()
            .with_bars("INFY.NS", one_bar())
            .with_failure("INFY.NS", DataError::RateLimited { retry_after_secs: 5 });
        assert_eq!(
            provider.fetch("INFY.NS", Period::SixMonths),
            Err(DataError::RateLimited { retry_after_secs: 5 })
        );
    }

    #[test]
    fn borrowed_and_boxed_providers_delegate() {
        fn bar_count(provider: impl DataProvider) -> usize {
            provider.fetch("A.NS", Period::OneYear).map(|b| b.len()).unwrap_or(0)
        }
        let provider = StaticProvider::new().with_bars("A.NS", one_bar());
        assert_eq!(bar_count(&provider), 1);
        let boxed: Box<dyn DataProvider> = Box::new(provider);
        assert_eq!(bar_count(boxed), 1);
    }
}
