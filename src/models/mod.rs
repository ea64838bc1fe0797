// Domain models for breakout analysis
// These modules contain pure data types independent of where candles come from

pub mod breakout;
pub mod pair_context;
pub mod series;
pub mod trendline;

// Re-export key types for convenience
pub use breakout::{Breakout, BreakoutSignals, Direction, Strength};
pub use pair_context::PairContext;
pub use series::{CandleSeries, SeriesError};
pub use trendline::{Fractal, Pivot, PivotKind, Trendline, TrendlineKind};
