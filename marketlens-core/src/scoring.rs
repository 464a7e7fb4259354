//! Heuristic scoring model.
//!
//! Reduces the latest row of an [`IndicatorFrame`] to a bounded score, the
//! list of rule labels that fired, and a naive forward return estimate.
//!
//! Rules (each contributes independently, evaluated in this order):
//! 1. RSI: < 30 → +15, > 70 → −10, else +5
//! 2. MACD vs signal: above → +15, else −5
//! 3. Trend, only when close, SMA-20 and SMA-50 are all positive:
//!    close > SMA-20 > SMA-50 → +20, close > SMA-20 → +10, else −10
//!
//! The sum is clamped to [0, 100] and used as both score and confidence.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::series::pct_change;
use crate::domain::PriceSeries;
use crate::indicators::{columns, IndicatorFrame, NEUTRAL_RSI};

/// Label attached to a result that could not be scored.
pub const INSUFFICIENT_DATA_LABEL: &str = "Insufficient data";

/// Bound on `predicted_change` in either direction.
pub const MAX_PREDICTED_CHANGE: f64 = 0.1;

/// A rule outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    RsiOversold,
    RsiOverbought,
    RsiNeutral,
    MacdBullish,
    MacdBearish,
    StrongUptrend,
    ShortTermBullish,
    BelowMovingAverages,
}

impl Signal {
    pub fn label(&self) -> &'static str {
        match self {
            Signal::RsiOversold => "RSI Oversold",
            Signal::RsiOverbought => "RSI Overbought",
            Signal::RsiNeutral => "RSI Neutral",
            Signal::MacdBullish => "MACD Bullish",
            Signal::MacdBearish => "MACD Bearish",
            Signal::StrongUptrend => "Strong Uptrend",
            Signal::ShortTermBullish => "Short-term Bullish",
            Signal::BelowMovingAverages => "Below Moving Averages",
        }
    }

    /// Score contribution.
    pub fn points(&self) -> f64 {
        match self {
            Signal::RsiOversold => 15.0,
            Signal::RsiOverbought => -10.0,
            Signal::RsiNeutral => 5.0,
            Signal::MacdBullish => 15.0,
            Signal::MacdBearish => -5.0,
            Signal::StrongUptrend => 20.0,
            Signal::ShortTermBullish => 10.0,
            Signal::BelowMovingAverages => -10.0,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether a result was computed or is the degenerate fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreStatus {
    Computed,
    /// Fewer rows than the model needs; score and confidence are zero.
    InsufficientData { rows: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: f64,
    /// Same value as `score`.
    pub confidence: f64,
    pub signals: Vec<String>,
    /// Naive forward return estimate in [-0.1, 0.1].
    pub predicted_change: f64,
    pub status: ScoreStatus,
}

impl ScoreResult {
    fn insufficient(rows: usize) -> Self {
        Self {
            score: 0.0,
            confidence: 0.0,
            signals: vec![INSUFFICIENT_DATA_LABEL.to_string()],
            predicted_change: 0.0,
            status: ScoreStatus::InsufficientData { rows },
        }
    }

    pub fn is_degenerate(&self) -> bool {
        !matches!(self.status, ScoreStatus::Computed)
    }

    /// `current * (1 + predicted_change)`.
    pub fn projected_price(&self, current: f64) -> f64 {
        current * (1.0 + self.predicted_change)
    }
}

/// Thresholds of the scoring model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringModel {
    /// Minimum rows (after dropping undefined rows) needed to score.
    pub min_rows: usize,
    pub oversold: f64,
    pub overbought: f64,
    /// Number of trailing daily returns averaged into `recent`.
    pub return_window: usize,
}

impl Default for ScoringModel {
    fn default() -> Self {
        Self {
            min_rows: 30,
            oversold: 30.0,
            overbought: 70.0,
            return_window: 5,
        }
    }
}

impl ScoringModel {
    pub fn score(&self, frame: &IndicatorFrame) -> ScoreResult {
        if frame.len() < self.min_rows {
            debug!(
                symbol = frame.symbol(),
                rows = frame.len(),
                needed = self.min_rows,
                "not enough rows to score"
            );
            return ScoreResult::insufficient(frame.len());
        }

        let fired = self.evaluate_rules(frame);
        let raw: f64 = fired.iter().map(Signal::points).sum();
        let score = raw.clamp(0.0, 100.0);

        let recent = self.recent_return(frame.close());
        let predicted = if score > 70.0 {
            recent * 1.5 + 0.01
        } else if score < 30.0 {
            recent * 0.5 - 0.01
        } else {
            recent
        };

        ScoreResult {
            score,
            confidence: score,
            signals: fired.iter().map(|s| s.label().to_string()).collect(),
            predicted_change: clamp_change(predicted),
            status: ScoreStatus::Computed,
        }
    }

    /// Rule outcomes for the frame's last row, in evaluation order.
    pub fn evaluate_rules(&self, frame: &IndicatorFrame) -> Vec<Signal> {
        let mut fired = Vec::with_capacity(3);

        let rsi = frame.latest(columns::RSI).unwrap_or(NEUTRAL_RSI);
        fired.push(if rsi < self.oversold {
            Signal::RsiOversold
        } else if rsi > self.overbought {
            Signal::RsiOverbought
        } else {
            Signal::RsiNeutral
        });

        let macd = frame.latest(columns::MACD).unwrap_or(0.0);
        let macd_signal = frame.latest(columns::MACD_SIGNAL).unwrap_or(0.0);
        fired.push(if macd > macd_signal {
            Signal::MacdBullish
        } else {
            Signal::MacdBearish
        });

        let close = frame.latest(columns::CLOSE).unwrap_or(0.0);
        let sma_20 = frame.latest(columns::SMA_20).unwrap_or(0.0);
        let sma_50 = frame.latest(columns::SMA_50).unwrap_or(0.0);
        if close > 0.0 && sma_20 > 0.0 && sma_50 > 0.0 {
            fired.push(if close > sma_20 && sma_20 > sma_50 {
                Signal::StrongUptrend
            } else if close > sma_20 {
                Signal::ShortTermBullish
            } else {
                Signal::BelowMovingAverages
            });
        }

        fired
    }

    /// Mean of the last `return_window` daily returns; 0 if there are fewer.
    /// Non-finite returns (e.g. from a zero close) are ignored.
    pub fn recent_return(&self, closes: &[f64]) -> f64 {
        let returns: Vec<f64> = pct_change(closes)
            .into_iter()
            .filter(|r| r.is_finite())
            .collect();
        if self.return_window == 0 || returns.len() < self.return_window {
            return 0.0;
        }
        let tail = &returns[returns.len() - self.return_window..];
        tail.iter().sum::<f64>() / tail.len() as f64
    }
}

fn clamp_change(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(-MAX_PREDICTED_CHANGE, MAX_PREDICTED_CHANGE)
    } else {
        0.0
    }
}

/// Score an annotated frame with the default model.
pub fn score(frame: &IndicatorFrame) -> ScoreResult {
    ScoringModel::default().score(frame)
}

/// Annotate a raw series, drop undefined rows, and score it.
pub fn score_series(series: &PriceSeries) -> ScoreResult {
    score(&IndicatorFrame::annotate(series).drop_undefined())
}
