//! IndicatorFrame: a price series annotated with aligned indicator columns.
//!
//! Columns are computed independently. A column that comes back all-undefined
//! is still attached; a column whose length does not match the series is
//! rejected and left out, and downstream consumers fall back to defaults for
//! any column that is missing.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use super::{Indicator, Macd, Rsi, Sma};
use crate::domain::PriceSeries;

/// Standard column names.
pub mod columns {
    pub const CLOSE: &str = "Close";
    pub const RSI: &str = "RSI";
    pub const MACD: &str = "MACD";
    pub const MACD_SIGNAL: &str = "MACD_Signal";
    pub const SMA_20: &str = "SMA_20";
    pub const SMA_50: &str = "SMA_50";
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("column '{name}' has {actual} rows, frame has {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("'{0}' is reserved for the close column")]
    ReservedName(String),
}

/// Latest defined value of every column, keyed by column name.
pub type IndicatorSnapshot = BTreeMap<String, f64>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorFrame {
    symbol: String,
    dates: Vec<NaiveDate>,
    close: Vec<f64>,
    columns: BTreeMap<String, Vec<f64>>,
}

impl IndicatorFrame {
    /// Frame with only the close column.
    ///
    /// # Panics
    /// If `dates` and `close` differ in length.
    pub fn new(symbol: impl Into<String>, dates: Vec<NaiveDate>, close: Vec<f64>) -> Self {
        assert_eq!(dates.len(), close.len(), "dates and close must align");
        Self {
            symbol: symbol.into(),
            dates,
            close,
            columns: BTreeMap::new(),
        }
    }

    pub fn from_series(series: &PriceSeries) -> Self {
        Self::new(series.symbol(), series.dates(), series.closes())
    }

    /// Attach the standard set: RSI(14), MACD(12,26,9) + signal, SMA 20 and 50.
    pub fn annotate(series: &PriceSeries) -> Self {
        let rsi = Rsi::default();
        let macd = Macd::default();
        let sma_20 = Sma::new(20);
        let sma_50 = Sma::new(50);
        let indicators: [&dyn Indicator; 3] = [&rsi, &sma_20, &sma_50];

        let mut frame = Self::with_indicators(series, &indicators);
        // Both MACD lines come from one pass.
        let lines = macd.lines(&frame.close);
        frame.attach(columns::MACD, lines.macd);
        frame.attach(columns::MACD_SIGNAL, lines.signal);
        frame
    }

    /// Attach an arbitrary set of indicators, each under its own name.
    pub fn with_indicators(series: &PriceSeries, indicators: &[&dyn Indicator]) -> Self {
        let mut frame = Self::from_series(series);
        for indicator in indicators {
            let values = indicator.compute(&frame.close);
            frame.attach(indicator.name(), values);
        }
        frame
    }

    /// Insert, logging and skipping a column that cannot be attached.
    fn attach(&mut self, name: &str, values: Vec<f64>) {
        if let Err(err) = self.insert(name, values) {
            warn!(symbol = %self.symbol, error = %err, "indicator column skipped");
        }
    }

    /// Insert or replace a named column.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<(), FrameError> {
        let name = name.into();
        if name == columns::CLOSE {
            return Err(FrameError::ReservedName(name));
        }
        if values.len() != self.close.len() {
            return Err(FrameError::LengthMismatch {
                name,
                expected: self.close.len(),
                actual: values.len(),
            });
        }
        self.columns.insert(name, values);
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<f64>) -> Result<Self, FrameError> {
        self.insert(name, values)?;
        Ok(self)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn close(&self) -> &[f64] {
        &self.close
    }

    /// Column by name; "Close" resolves to the close series.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        if name == columns::CLOSE {
            return Some(&self.close);
        }
        self.columns.get(name).map(|v| v.as_slice())
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|k| k.as_str())
    }

    /// Value of `name` on the last row, if the column exists and is defined there.
    pub fn latest(&self, name: &str) -> Option<f64> {
        self.column(name)
            .and_then(|values| values.last().copied())
            .filter(|v| v.is_finite())
    }

    /// Last defined value of `name`, scanning back from the final row.
    pub fn latest_defined(&self, name: &str) -> Option<f64> {
        self.column(name)
            .and_then(|values| values.iter().rev().copied().find(|v| v.is_finite()))
    }

    /// Latest defined value of the close and every indicator column.
    pub fn snapshot(&self) -> IndicatorSnapshot {
        std::iter::once(columns::CLOSE)
            .chain(self.column_names())
            .filter_map(|name| self.latest_defined(name).map(|v| (name.to_string(), v)))
            .collect()
    }

    /// Keep only rows where the close and every present column are defined.
    ///
    /// An all-undefined column therefore empties the frame.
    pub fn drop_undefined(&self) -> IndicatorFrame {
        let keep: Vec<usize> = (0..self.len())
            .filter(|&i| {
                self.close[i].is_finite() && self.columns.values().all(|col| col[i].is_finite())
            })
            .collect();

        IndicatorFrame {
            symbol: self.symbol.clone(),
            dates: keep.iter().map(|&i| self.dates[i]).collect(),
            close: keep.iter().map(|&i| self.close[i]).collect(),
            columns: self
                .columns
                .iter()
                .map(|(name, col)| (name.clone(), keep.iter().map(|&i| col[i]).collect()))
                .collect(),
        }
    }
}
