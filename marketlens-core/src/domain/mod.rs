//! Domain types for MarketLens

pub mod bar;
pub mod period;
pub mod series;

pub use bar::Bar;
pub use period::{ParsePeriodError, Period};
pub use series::{PriceSeries, SeriesError};
