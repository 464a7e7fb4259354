//! Progress callbacks for batch scans.

use tracing::{info, warn};

/// How one symbol in a batch ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolOutcome {
    /// Scored; `kept` is whether it passed the score filter.
    Scored { score: f64, kept: bool },
    /// The fetch plan failed.
    Failed { reason: String },
}

/// Progress callback for multi-symbol scans.
pub trait ScanProgress: Send + Sync {
    /// Called before fetching a symbol.
    fn on_start(&self, symbol: &str, index: usize, total: usize);

    /// Called once a symbol is scored or has failed.
    fn on_complete(&self, symbol: &str, index: usize, total: usize, outcome: &SymbolOutcome);

    /// Called when the whole batch is done.
    fn on_batch_complete(&self, kept: usize, failed: usize, total: usize);
}

/// Reports progress through `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl ScanProgress for TracingProgress {
    fn on_start(&self, symbol: &str, index: usize, total: usize) {
        info!(symbol, "[{}/{}] scanning", index + 1, total);
    }

    fn on_complete(&self, symbol: &str, _index: usize, _total: usize, outcome: &SymbolOutcome) {
        match outcome {
            SymbolOutcome::Scored { score, kept } => info!(symbol, score, kept, "scored"),
            SymbolOutcome::Failed { reason } => warn!(symbol, %reason, "scan failed"),
        }
    }

    fn on_batch_complete(&self, kept: usize, failed: usize, total: usize) {
        info!(kept, failed, total, "scan complete");
    }
}

/// Discards all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ScanProgress for NoProgress {
    fn on_start(&self, _symbol: &str, _index: usize, _total: usize) {}

    fn on_complete(&self, _symbol: &str, _index: usize, _total: usize, _outcome: &SymbolOutcome) {}

    fn on_batch_complete(&self, _kept: usize, _failed: usize, _total: usize) {}
}
