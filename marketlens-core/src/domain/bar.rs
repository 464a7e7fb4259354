//! Bar: one trading day of OHLCV data.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily OHLCV bar.
///
/// Prices and volume are expected to be finite and non-negative. Volume is kept
/// as a float because providers report fractional volume for some instruments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Returns true if any price field is non-finite (void bar).
    pub fn is_void(&self) -> bool {
        !(self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite())
    }

    /// Basic OHLCV sanity check: finite, non-negative, high >= low.
    pub fn is_sane(&self) -> bool {
        if self.is_void() || !self.volume.is_finite() {
            return false;
        }
        self.high >= self.low
            && self.open >= 0.0
            && self.low >= 0.0
            && self.close >= 0.0
            && self.volume >= 0.0
    }
}
