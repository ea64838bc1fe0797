//! Scanner / engine configuration constants.

/// Settings for the polling scan engine
pub struct EngineConfig {
    /// Worker threads running analyses
    pub worker_threads: usize,
    /// Re-analyse a pair once its last result is older than this
    pub poll_interval_secs: u64,
    /// Sleep between engine ticks when running the CLI in watch mode
    pub tick_ms: u64,
}

/// The Master Scanner Configuration
pub struct ScannerConfig {
    pub engine: EngineConfig,
    /// Capacity of the recent-alerts list (newest first, oldest dropped)
    pub recent_alerts_capacity: usize,
    /// Maximum number of pairs a single scan will accept
    pub max_pairs: usize,
    /// Symbols scanned when the CLI is given none
    pub default_symbols: &'static [&'static str],
}

pub const SCANNER: ScannerConfig = ScannerConfig {
    engine: EngineConfig {
        worker_threads: 4,
        // Matches the chart refresh cadence of the alerting UI
        poll_interval_secs: 30,
        tick_ms: 250,
    },
    recent_alerts_capacity: 50,
    max_pairs: 50,
    default_symbols: &["BTC/USDT", "ETH/USDT", "ADA/USDT", "SOL/USDT", "MATIC/USDT"],
};
