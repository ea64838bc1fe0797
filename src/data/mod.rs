// Data loading, caching, and candle sources
pub mod timeseries;

// Re-export commonly used types
pub use timeseries::cache_file::CacheFile;
pub use timeseries::json_dir::JsonDirSource;
pub use timeseries::memory::MemorySource;
pub use timeseries::raw_ohlcv::{RawOhlcvBatch, RawOhlcvRows};
pub use timeseries::{CandleSource, FallbackSource, SeriesCollection};
