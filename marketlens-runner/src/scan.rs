//! Throttled batch scans over symbol lists and sectors.
//!
//! Symbols are processed one at a time with a pause after each, to stay under
//! provider rate limits. A failed fetch is recorded and the scan moves on.

use std::thread;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use marketlens_core::data::{DataProvider, PriceSeriesSource};
use marketlens_core::scoring::{score_series, ScoreStatus};

use crate::config::{ConfigError, ScanConfig};
use crate::progress::{ScanProgress, SymbolOutcome};

/// One scored symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanEntry {
    pub symbol: String,
    pub resolved_symbol: String,
    pub score: f64,
    pub signals: Vec<String>,
    pub predicted_change: f64,
    pub current_price: f64,
    pub projected_price: f64,
    pub status: ScoreStatus,
}

/// A symbol whose fetch plan failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanFailure {
    pub symbol: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub generated_at: DateTime<Utc>,
    pub scanned: usize,
    /// Entries at or above the minimum score, highest first.
    pub entries: Vec<ScanEntry>,
    pub failures: Vec<ScanFailure>,
}

impl ScanReport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Scan of one sector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorReport {
    pub sector: String,
    pub report: ScanReport,
}

/// Fetch, score and filter each symbol in turn.
///
/// The config is validated before any fetch.
pub fn scan_symbols<P, S>(
    source: &PriceSeriesSource<P>,
    symbols: &[S],
    config: &ScanConfig,
    progress: &dyn ScanProgress,
) -> Result<ScanReport, ConfigError>
where
    P: DataProvider,
    S: AsRef<str>,
{
    config.validate()?;
    Ok(run_scan(source, symbols, config, progress))
}

fn run_scan<P, S>(
    source: &PriceSeriesSource<P>,
    symbols: &[S],
    config: &ScanConfig,
    progress: &dyn ScanProgress,
) -> ScanReport
where
    P: DataProvider,
    S: AsRef<str>,
{
    let total = symbols.len();
    let mut entries = Vec::new();
    let mut failures = Vec::new();

    for (index, symbol) in symbols.iter().enumerate() {
        let symbol = symbol.as_ref();
        progress.on_start(symbol, index, total);

        let outcome = match source.fetch(symbol, config.period) {
            Ok(series) => {
                let result = score_series(&series);
                let kept = result.score >= config.min_score;
                let outcome = SymbolOutcome::Scored {
                    score: result.score,
                    kept,
                };
                if kept {
                    let current_price = series.last_close();
                    entries.push(ScanEntry {
                        symbol: symbol.to_string(),
                        resolved_symbol: series.symbol().to_string(),
                        score: result.score,
                        projected_price: result.projected_price(current_price),
                        predicted_change: result.predicted_change,
                        current_price,
                        signals: result.signals,
                        status: result.status,
                    });
                }
                outcome
            }
            Err(err) => {
                let reason = err.to_string();
                failures.push(ScanFailure {
                    symbol: symbol.to_string(),
                    reason: reason.clone(),
                });
                SymbolOutcome::Failed { reason }
            }
        };
        progress.on_complete(symbol, index, total, &outcome);

        if config.throttle_ms > 0 {
            thread::sleep(config.throttle());
        }
    }

    // Stable: ties keep scan order.
    entries.sort_by(|a, b| b.score.total_cmp(&a.score));
    progress.on_batch_complete(entries.len(), failures.len(), total);

    ScanReport {
        generated_at: Utc::now(),
        scanned: total,
        entries,
        failures,
    }
}

/// Scan each sector and keep its `top_per_sector` best entries.
///
/// Sectors are reported in the order given.
pub fn scan_sectors<P, S>(
    source: &PriceSeriesSource<P>,
    sectors: &[(S, Vec<S>)],
    config: &ScanConfig,
    progress: &dyn ScanProgress,
) -> Result<Vec<SectorReport>, ConfigError>
where
    P: DataProvider,
    S: AsRef<str>,
{
    config.validate()?;
    let reports = sectors
        .iter()
        .map(|(sector, symbols)| {
            info!(sector = sector.as_ref(), symbols = symbols.len(), "scanning sector");
            let mut report = run_scan(source, symbols, config, progress);
            report.entries.truncate(config.top_per_sector);
            SectorReport {
                sector: sector.as_ref().to_string(),
                report,
            }
        })
        .collect();
    Ok(reports)
}
