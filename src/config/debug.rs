//! Debugging feature flags.
//!
//! Toggle individual diagnostics here; keep them `false` by default so release
//! builds remain quiet.

/// Emit per-pair pivot and trendline details after each analysis.
pub const PRINT_TRENDLINES: bool = false;

/// Emit the inputs to each strength classification (pct change, volume ratio).
pub const PRINT_STRENGTH_INPUTS: bool = false;

/// Emit queue/dispatch events from the scan engine.
pub const PRINT_ENGINE_QUEUE: bool = false;

/// Emit timings for each worker job.
pub const PRINT_WORKER_TIMINGS: bool = false;

/// Emit detailed cache load/save logs.
pub const PRINT_SERDE: bool = false;

/// If non-empty, emit detailed analysis output only for this symbol.
/// Example: "BTC/USDT". Use "" to disable.
pub const PRINT_ANALYSIS_FOR_SYMBOL: &str = "";
