//! File persistence and serialization configuration

use crate::domain::pair_interval::Timeframe;

pub struct CacheSettings {
    /// Directory path for storing candle caches
    pub directory: &'static str,
    /// Base filename for cache files (without extension)
    pub filename_without_ext: &'static str,
    /// Current version of the cache serialization format
    pub version: f64,
}

pub struct PersistenceConfig {
    pub cache: CacheSettings,
}

pub const PERSISTENCE: PersistenceConfig = PersistenceConfig {
    cache: CacheSettings {
        directory: "candle_data",
        filename_without_ext: "candles",
        version: 1.0,
    },
};

/// Generate timeframe-specific cache filename
/// Example: "candles_15m_v1.bin"
pub fn cache_filename(timeframe: Timeframe) -> String {
    format!(
        "{}_{}_v{}.bin",
        PERSISTENCE.cache.filename_without_ext, timeframe, PERSISTENCE.cache.version
    )
}
