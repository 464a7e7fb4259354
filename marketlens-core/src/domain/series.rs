//! PriceSeries: an ordered run of daily bars for one symbol.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::bar::Bar;

/// Validation failures when building a [`PriceSeries`].
#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("series for '{symbol}' is empty")]
    Empty { symbol: String },

    #[error("series for '{symbol}' is not ascending at {date}")]
    OutOfOrder { symbol: String, date: NaiveDate },

    #[error("series for '{symbol}' has duplicate date {date}")]
    DuplicateDate { symbol: String, date: NaiveDate },
}

/// Ordered daily bars for a single symbol.
///
/// Invariants: at least one bar, dates strictly ascending (so no duplicates).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Build a series from bars that are already in order.
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, SeriesError> {
        let symbol = symbol.into();
        if bars.is_empty() {
            return Err(SeriesError::Empty { symbol });
        }
        for pair in bars.windows(2) {
            if pair[1].date == pair[0].date {
                return Err(SeriesError::DuplicateDate {
                    symbol,
                    date: pair[1].date,
                });
            }
            if pair[1].date < pair[0].date {
                return Err(SeriesError::OutOfOrder {
                    symbol,
                    date: pair[1].date,
                });
            }
        }
        Ok(Self { symbol, bars })
    }

    /// Canonicalize raw provider rows: drop void or insane bars (non-finite,
    /// negative, high below low), sort by date, and collapse duplicate dates
    /// keeping the last row seen.
    pub fn from_unsorted(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, SeriesError> {
        let mut bars: Vec<Bar> = bars.into_iter().filter(Bar::is_sane).collect();
        // Stable sort keeps provider order within a date, so the last row wins below.
        bars.sort_by_key(|b| b.date);
        let mut canonical: Vec<Bar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match canonical.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => canonical.push(bar),
            }
        }
        Self::new(symbol, canonical)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false for a validated series; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn last_close(&self) -> f64 {
        self.bars.last().map(|b| b.close).unwrap_or(f64::NAN)
    }

    /// Daily percentage returns of close (length `len() - 1`).
    pub fn daily_returns(&self) -> Vec<f64> {
        pct_change(&self.closes())
    }
}

/// Percentage change between consecutive values; the leading undefined entry
/// is dropped, so the output is one shorter than the input.
pub fn pct_change(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}
