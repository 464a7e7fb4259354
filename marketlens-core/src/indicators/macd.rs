//! Moving Average Convergence/Divergence (MACD).
//!
//! - MACD line: EMA(close, fast) - EMA(close, slow)
//! - Signal line: EMA(MACD line, signal)
//! - Histogram: MACD line - signal line
//!
//! Each line is exposed as a separate named instance so the single-series
//! `Indicator` trait stays unchanged; `Macd::lines` returns both at once.
//! Lookback: slow - 1 for the MACD line, slow + signal - 2 for the others.

use super::ema::ema_of_series;
use super::{is_malformed, Indicator};

/// Which MACD output to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdLine {
    Macd,
    Signal,
    Histogram,
}

/// MACD line and signal line, aligned with the input.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdLines {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    line: MacdLine,
}

impl Default for Macd {
    fn default() -> Self {
        Self::new(12, 26, 9)
    }
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast >= 1 && slow >= 1 && signal >= 1, "MACD periods must be >= 1");
        Self {
            fast,
            slow,
            signal,
            line: MacdLine::Macd,
        }
    }

    pub fn signal_line(mut self) -> Self {
        self.line = MacdLine::Signal;
        self
    }

    pub fn histogram(mut self) -> Self {
        self.line = MacdLine::Histogram;
        self
    }

    /// Compute the MACD and signal lines together.
    pub fn lines(&self, closes: &[f64]) -> MacdLines {
        let n = closes.len();
        if is_malformed(closes) {
            return MacdLines {
                macd: vec![f64::NAN; n],
                signal: vec![f64::NAN; n],
            };
        }

        let fast = ema_of_series(closes, self.fast);
        let slow = ema_of_series(closes, self.slow);
        // NaN on either side keeps the warmup undefined.
        let macd: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = ema_of_series(&macd, self.signal);

        MacdLines { macd, signal }
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        match self.line {
            MacdLine::Macd => "MACD",
            MacdLine::Signal => "MACD_Signal",
            MacdLine::Histogram => "MACD_Histogram",
        }
    }

    fn lookback(&self) -> usize {
        let line = self.fast.max(self.slow) - 1;
        match self.line {
            MacdLine::Macd => line,
            MacdLine::Signal | MacdLine::Histogram => line + self.signal - 1,
        }
    }

    fn compute(&self, closes: &[f64]) -> Vec<f64> {
        let lines = self.lines(closes);
        match self.line {
            MacdLine::Macd => lines.macd,
            MacdLine::Signal => lines.signal,
            MacdLine::Histogram => lines
                .macd
                .iter()
                .zip(&lines.signal)
                .map(|(m, s)| m - s)
                .collect(),
        }
    }
}
