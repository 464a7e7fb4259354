//! Indicator library.
//!
//! Indicators are pure functions: closing prices in, a series of the same
//! length out. Warmup entries are `f64::NAN` ("undefined"). Malformed input
//! (empty, or containing any non-finite value) produces an all-NaN series
//! instead of panicking, so one bad column never aborts the others.

pub mod ema;
pub mod frame;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use ema::{ema_of_series, Ema};
pub use frame::{columns, FrameError, IndicatorFrame, IndicatorSnapshot};
pub use macd::{Macd, MacdLine, MacdLines};
pub use rsi::{rsi_from_averages, Rsi, RsiSmoothing, NEUTRAL_RSI};
pub use sma::{sma_of_series, Sma};

/// Trait for single-series indicators.
///
/// # Look-ahead guard
/// No value at index t may depend on input at t+1 or later; truncating the
/// input must leave every earlier output unchanged.
pub trait Indicator: Send + Sync {
    /// Column name in an [`IndicatorFrame`] (e.g. "SMA_20", "RSI").
    fn name(&self) -> &str;

    /// Number of leading points that are undefined on well-formed input.
    fn lookback(&self) -> usize;

    /// Compute over the whole closing-price series; output has the same length.
    fn compute(&self, closes: &[f64]) -> Vec<f64>;
}

/// Empty input or any non-finite value.
pub(crate) fn is_malformed(values: &[f64]) -> bool {
    values.is_empty() || values.iter().any(|v| !v.is_finite())
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

#[cfg(test)]
mod tests {
    use super::*;

    fn standard_set() -> Vec<Box<dyn Indicator>> {
        vec![
            Box::new(Sma::new(20)),
            Box::new(Sma::new(50)),
            Box::new(Ema::new(12)),
            Box::new(Rsi::default()),
            Box::new(Rsi::default().with_smoothing(RsiSmoothing::Wilder)),
            Box::new(Macd::default()),
            Box::new(Macd::default().signal_line()),
        ]
    }

    #[test]
    fn empty_input_yields_empty_output() {
        for indicator in standard_set() {
            assert!(indicator.compute(&[]).is_empty());
        }
    }
}
