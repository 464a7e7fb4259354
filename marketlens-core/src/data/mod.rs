//! Market data acquisition

pub mod circuit_breaker;
pub mod provider;
pub mod source;
pub mod yahoo;

pub use circuit_breaker::CircuitBreaker;
pub use provider::{DataError, DataProvider, StaticProvider};
pub use source::{normalize_symbol, Exchange, FetchError, FetchPlan, PriceSeriesSource};
pub use yahoo::YahooProvider;
