//! Single-symbol analysis: fetch → annotate → drop undefined → score →
//! projected price, with an optional Monte Carlo projection.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use marketlens_core::data::{DataProvider, FetchError, PriceSeriesSource};
use marketlens_core::domain::PriceSeries;
use marketlens_core::indicators::{IndicatorFrame, IndicatorSnapshot};
use marketlens_core::rng::RngHierarchy;
use marketlens_core::scoring::{score, ScoreResult};

use crate::config::{ConfigError, ScanConfig};
use crate::projection::{project_series, SimulationSummary};

/// Errors from the analysis pipeline.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),
}

/// Everything computed for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockAnalysis {
    /// Symbol as requested.
    pub symbol: String,
    /// Exchange-qualified symbol the data came from.
    pub resolved_symbol: String,
    pub bars: usize,
    pub current_price: f64,
    pub projected_price: f64,
    pub score: ScoreResult,
    /// Latest defined value of each indicator before undefined rows were dropped.
    pub indicators: IndicatorSnapshot,
    pub projection: Option<SimulationSummary>,
}

impl StockAnalysis {
    /// Score and project an already-fetched series.
    pub fn from_series(symbol: &str, series: &PriceSeries, config: &ScanConfig) -> Self {
        let annotated = IndicatorFrame::annotate(series);
        let indicators = annotated.snapshot();
        let result = score(&annotated.drop_undefined());

        let current_price = series.last_close();
        let projected_price = result.projected_price(current_price);

        let projection = config.simulation.enabled.then(|| {
            let mut rng = RngHierarchy::new(config.simulation.seed).rng_for(series.symbol(), 0);
            project_series(series, &config.simulation.monte_carlo(), &mut rng)
        });

        Self {
            symbol: symbol.to_string(),
            resolved_symbol: series.symbol().to_string(),
            bars: series.len(),
            current_price,
            projected_price,
            score: result,
            indicators,
            projection,
        }
    }
}

/// Fetch `symbol` over the configured period and analyze it.
pub fn analyze_symbol<P: DataProvider>(
    source: &PriceSeriesSource<P>,
    symbol: &str,
    config: &ScanConfig,
) -> Result<StockAnalysis, AnalysisError> {
    config.validate()?;
    let series = source.fetch(symbol, config.period)?;
    debug!(symbol, resolved = series.symbol(), bars = series.len(), "series fetched");

    let analysis = StockAnalysis::from_series(symbol, &series, config);
    info!(
        symbol,
        score = analysis.score.score,
        current = analysis.current_price,
        projected = analysis.projected_price,
        "analysis complete"
    );
    Ok(analysis)
}
