//! MarketLens Runner: analysis pipeline, batch scans, projections.
//!
//! This crate builds on `marketlens-core` to provide:
//! - TOML scan configuration with defaults
//! - Single-symbol analysis (score, projected price, Monte Carlo summary)
//! - Throttled watchlist and sector scans with per-symbol failure records
//! - Parallel Monte Carlo projections with per-symbol random streams
//! - Progress callbacks and `tracing` subscriber setup

pub mod analysis;
pub mod config;
pub mod logging;
pub mod progress;
pub mod projection;
pub mod scan;

pub use analysis::{analyze_symbol, AnalysisError, StockAnalysis};
pub use config::{ConfigError, ScanConfig, SimulationConfig};
pub use logging::init_logging;
pub use progress::{NoProgress, ScanProgress, SymbolOutcome, TracingProgress};
pub use projection::{project_all, project_series, Projection, SimulationSummary};
pub use scan::{scan_sectors, scan_symbols, ScanEntry, ScanFailure, ScanReport, SectorReport};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<ScanConfig>();
        assert_sync::<ScanConfig>();
        assert_send::<SimulationConfig>();
        assert_sync::<SimulationConfig>();
    }

    #[test]
    fn report_types_are_send_sync() {
        assert_send::<ScanReport>();
        assert_sync::<ScanReport>();
        assert_send::<SectorReport>();
        assert_sync::<SectorReport>();
        assert_send::<StockAnalysis>();
        assert_sync::<StockAnalysis>();
    }

    #[test]
    fn projection_types_are_send_sync() {
        assert_send::<SimulationSummary>();
        assert_sync::<SimulationSummary>();
        assert_send::<Projection>();
        assert_sync::<Projection>();
    }

    #[test]
    fn errors_are_send_sync() {
        assert_send::<AnalysisError>();
        assert_sync::<AnalysisError>();
    }
}
