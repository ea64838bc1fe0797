//! Configuration module for the breakout scanner.

pub mod analysis;
pub mod persistence;
pub mod scanner;

mod debug; // Private: use crate::config::DEBUG_* re-exports below
pub use debug::{
    PRINT_ANALYSIS_FOR_SYMBOL, PRINT_ENGINE_QUEUE, PRINT_SERDE, PRINT_STRENGTH_INPUTS,
    PRINT_TRENDLINES, PRINT_WORKER_TIMINGS,
};

// Re-export commonly used items
pub use analysis::{ANALYSIS, AnalysisConfig, BreakoutSettings, PivotSettings, StrengthThresholds};
pub use persistence::{PERSISTENCE, cache_filename};
pub use scanner::SCANNER;
