// Breakout detection pipeline and multi-pair monitoring
pub mod breakout;
pub mod ema;
pub mod multi_pair_monitor;
pub mod pair_analysis;
pub mod pivots;
pub mod trendlines;

// Re-export commonly used types
pub use breakout::{classify_breakout, classify_strength, volume_ratio};
pub use ema::{EmaSeries, compute_ema, compute_emas};
pub use multi_pair_monitor::{MultiPairMonitor, ScanSummary, fetch_and_analyze};
pub use pair_analysis::{AnalysisSettings, BreakoutAnalysis, analyze, analyze_with_settings};
pub use pivots::{detect_pivots, find_fractals};
pub use trendlines::build_trendlines;
