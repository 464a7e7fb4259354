//! Relative Strength Index (RSI).
//!
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss), over the trailing `period`
//! close-to-close changes. Lookback: period.
//!
//! Zero-division convention:
//! - avg_gain == 0 and avg_loss == 0 → 50 (no movement)
//! - avg_loss == 0 → 100
//! - avg_gain == 0 → 0

use super::{is_malformed, Indicator};

/// Neutral RSI used whenever there is not enough data to compute one.
pub const NEUTRAL_RSI: f64 = 50.0;

/// How average gain and average loss are smoothed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RsiSmoothing {
    /// Plain mean over the trailing window.
    #[default]
    Simple,
    /// Wilder's recursive smoothing, seeded with the first window's mean.
    Wilder,
}

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    smoothing: RsiSmoothing,
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(14)
    }
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            smoothing: RsiSmoothing::Simple,
        }
    }

    pub fn with_smoothing(mut self, smoothing: RsiSmoothing) -> Self {
        self.smoothing = smoothing;
        self
    }

    /// Last defined RSI value, or [`NEUTRAL_RSI`] when none exists
    /// (empty input, fewer than `period + 1` points, malformed input).
    pub fn latest(&self, closes: &[f64]) -> f64 {
        self.compute(closes)
            .into_iter()
            .rev()
            .find(|v| !v.is_nan())
            .unwrap_or(NEUTRAL_RSI)
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        "RSI"
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, closes: &[f64]) -> Vec<f64> {
        let n = closes.len();
        let mut result = vec![f64::NAN; n];

        if n < self.period + 1 || is_malformed(closes) {
            return result;
        }

        // gains[i] / losses[i] describe the move from i-1 to i; index 0 is unused.
        let mut gains = vec![0.0; n];
        let mut losses = vec![0.0; n];
        for i in 1..n {
            let change = closes[i] - closes[i - 1];
            if change > 0.0 {
                gains[i] = change;
            } else {
                losses[i] = -change;
            }
        }

        let period = self.period as f64;
        let mut avg_gain = gains[1..=self.period].iter().sum::<f64>() / period;
        let mut avg_loss = losses[1..=self.period].iter().sum::<f64>() / period;
        result[self.period] = rsi_from_averages(avg_gain, avg_loss);

        for i in (self.period + 1)..n {
            match self.smoothing {
                RsiSmoothing::Simple => {
                    let start = i + 1 - self.period;
                    avg_gain = gains[start..=i].iter().sum::<f64>() / period;
                    avg_loss = losses[start..=i].iter().sum::<f64>() / period;
                }
                RsiSmoothing::Wilder => {
                    let alpha = 1.0 / period;
                    avg_gain = alpha * gains[i] + (1.0 - alpha) * avg_gain;
                    avg_loss = alpha * losses[i] + (1.0 - alpha) * avg_loss;
                }
            }
            result[i] = rsi_from_averages(avg_gain, avg_loss);
        }

        result
    }
}

/// RSI from average gain and loss, with the module's zero-division convention.
pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        NEUTRAL_RSI
    } else if avg_loss == 0.0 {
        100.0
    } else if avg_gain == 0.0 {
        0.0
    } else {
        (100.0 - 100.0 / (1.0 + avg_gain / avg_loss)).clamp(0.0, 100.0)
    }
}
