//! Integration tests for watchlist and sector scans.

mod common;

use std::sync::Mutex;

use marketlens_core::scoring::ScoreStatus;
use marketlens_runner::{
    scan_sectors, scan_symbols, ConfigError, NoProgress, ScanProgress, ScanReport,
    SymbolOutcome,
};

/// Records every callback as a line of text.
#[derive(Default)]
struct RecordingProgress {
    events: Mutex<Vec<String>>,
}

impl RecordingProgress {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl ScanProgress for RecordingProgress {
    fn on_start(&self, symbol: &str, index: usize, total: usize) {
        self.events
            .lock()
            .unwrap()
            .push(format!("start {symbol} {}/{total}", index + 1));
    }

    fn on_complete(&self, symbol: &str, _index: usize, _total: usize, outcome: &SymbolOutcome) {
        let line = match outcome {
            SymbolOutcome::Scored { kept, .. } => format!("done {symbol} kept={kept}"),
            SymbolOutcome::Failed { .. } => format!("fail {symbol}"),
        };
        self.events.lock().unwrap().push(line);
    }

    fn on_batch_complete(&self, kept: usize, failed: usize, total: usize) {
        self.events
            .lock()
            .unwrap()
            .push(format!("batch {kept}/{total} failed={failed}"));
    }
}

#[test]
fn scan_keeps_passing_symbols_and_records_failures() {
    let source = common::source();
    let symbols = ["FLAT", "ALPHA", "GONE", "TINY", "BETA"];
    let report =
        scan_symbols(&source, &symbols, &common::config(20.0), &NoProgress).unwrap();

    assert_eq!(report.scanned, 5);
    let kept: Vec<&str> = report.entries.iter().map(|e| e.symbol.as_str()).collect();
    assert_eq!(kept, vec!["ALPHA", "BETA"]);
    assert!(report.entries.iter().all(|e| e.score == 25.0));

    assert_eq!(report.entries[1].resolved_symbol, "BETA.BO");
    assert_eq!(report.entries[0].resolved_symbol, "ALPHA.NS");
    assert_eq!(
        report.entries[0].signals,
        vec!["RSI Overbought", "MACD Bullish", "Strong Uptrend"]
    );

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].symbol, "GONE");
    assert!(report.failures[0].reason.contains("GONE"));
}

#[test]
fn entries_are_sorted_by_score_descending() {
    let source = common::source();
    let symbols = ["TINY", "FLAT", "ALPHA"];
    let report = scan_symbols(&source, &symbols, &common::config(0.0), &NoProgress).unwrap();

    assert_eq!(report.entries.len(), 3);
    assert_eq!(report.entries[0].symbol, "ALPHA");
    for pair in report.entries.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }

    let tiny = report
        .entries
        .iter()
        .find(|e| e.symbol == "TINY")
        .unwrap();
    assert_eq!(tiny.status, ScoreStatus::InsufficientData { rows: 0 });
    assert_eq!(tiny.signals, vec!["Insufficient data"]);
    assert_eq!(tiny.projected_price, tiny.current_price);
}

#[test]
fn projected_price_follows_predicted_change() {
    let source = common::source();
    let report = scan_symbols(&source, &["ALPHA"], &common::config(0.0), &NoProgress).unwrap();
    let entry = &report.entries[0];
    let expected = entry.current_price * (1.0 + entry.predicted_change);
    assert!((entry.projected_price - expected).abs() < 1e-9);
    // Score 25 is below 30: 0.004 * 0.5 - 0.01.
    assert!((entry.predicted_change + 0.008).abs() < 1e-9);
}

#[test]
fn progress_sees_every_symbol_in_order() {
    let source = common::source();
    let progress = RecordingProgress::default();
    scan_symbols(&source, &["ALPHA", "GONE"], &common::config(10.0), &progress).unwrap();

    assert_eq!(
        progress.events(),
        vec![
            "start ALPHA 1/2",
            "done ALPHA kept=true",
            "start GONE 2/2",
            "fail GONE",
            "batch 1/2 failed=1",
        ]
    );
}

#[test]
fn sector_scan_keeps_top_entries_per_sector() {
    let source = common::source();
    let mut config = common::config(0.0);
    config.top_per_sector = 2;

    let sectors = vec![
        ("Banking", vec!["FLAT", "ALPHA", "TINY", "BETA"]),
        ("Energy", vec!["GONE"]),
    ];
    let reports = scan_sectors(&source, &sectors, &config, &NoProgress).unwrap();

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].sector, "Banking");
    let banking: Vec<&str> = reports[0]
        .report
        .entries
        .iter()
        .map(|e| e.symbol.as_str())
        .collect();
    assert_eq!(banking, vec!["ALPHA", "BETA"]);
    assert_eq!(reports[0].report.scanned, 4);

    assert_eq!(reports[1].sector, "Energy");
    assert!(reports[1].report.entries.is_empty());
    assert_eq!(reports[1].report.failures.len(), 1);
}

#[test]
fn empty_watchlist_yields_empty_report() {
    let source = common::source();
    let symbols: [&str; 0] = [];
    let report = scan_symbols(&source, &symbols, &common::config(10.0), &NoProgress).unwrap();
    assert_eq!(report.scanned, 0);
    assert!(report.entries.is_empty());
    assert!(report.failures.is_empty());
}

#[test]
fn report_exports_to_json() {
    let source = common::source();
    let report =
        scan_symbols(&source, &["ALPHA", "GONE"], &common::config(10.0), &NoProgress).unwrap();
    let json = report.to_json().unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["scanned"], 2);
    assert_eq!(value["entries"][0]["symbol"], "ALPHA");
    assert_eq!(value["failures"][0]["symbol"], "GONE");

    let back: ScanReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back.generated_at, report.generated_at);
    assert_eq!(back.entries.len(), 1);
    assert_eq!(back.entries[0].signals, report.entries[0].signals);
}

#[test]
fn invalid_config_is_rejected_before_any_fetch() {
    let source = common::source();
    let progress = RecordingProgress::default();
    let mut config = common::config(10.0);
    config.min_score = f64::NAN;

    let result = scan_symbols(&source, &["ALPHA"], &config, &progress);
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
    assert!(progress.events().is_empty());
}

#[test]
fn sector_scan_rejects_zero_top_per_sector() {
    let source = common::source();
    let mut config = common::config(0.0);
    config.top_per_sector = 0;

    let sectors = vec![("Banking", vec!["ALPHA"])];
    let result = scan_sectors(&source, &sectors, &config, &NoProgress);
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}
