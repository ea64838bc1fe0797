use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use serde::{Deserialize, Serialize};

#[cfg(debug_assertions)]
use crate::config::PRINT_SERDE;
use crate::config::{PERSISTENCE, cache_filename};
use crate::data::timeseries::SeriesCollection;
use crate::domain::pair_interval::Timeframe;

/// Serialized snapshot of candle series for one timeframe.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CacheFile {
    pub version: f64,
    pub timestamp_secs: i64,
    pub timeframe: Timeframe,
    pub data: SeriesCollection,
}

impl CacheFile {
    pub fn new(timeframe: Timeframe, data: SeriesCollection, version: f64) -> Self {
        Self {
            version,
            timestamp_secs: Utc::now().timestamp(),
            timeframe,
            data,
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).context(format!("Failed to open cache file: {:?}", path))?;
        let mut reader = BufReader::new(file);
        let cache: CacheFile = bincode::deserialize_from(&mut reader)
            .context(format!("Failed to deserialize cache: {:?}", path))?;

        #[cfg(debug_assertions)]
        if PRINT_SERDE {
            log::info!(
                "Loaded cache {:?}: v{}, {} series",
                path,
                cache.version,
                cache.data.series_data.len()
            );
        }
        Ok(cache)
    }

    /// Load and reject caches written by a different format version.
    /// Every series is re-validated so a corrupt cache fails here, not mid-scan.
    pub fn load_checked(path: &Path, version_required: f64) -> Result<Self> {
        let cache = Self::load_from_path(path)?;
        if cache.version != version_required {
            bail!(
                "Cache version mismatch: file v{} vs required v{}",
                cache.version,
                version_required
            );
        }
        for series in &cache.data.series_data {
            series
                .validate()
                .context(format!("Cached series {} is malformed", series.pair_interval))?;
        }
        Ok(cache)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .context(format!("Failed to create directory: {}", parent.display()))?;
        }
        let file =
            File::create(path).context(format!("Failed to create file: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        bincode::serialize_into(&mut writer, self)
            .context(format!("Failed to serialize cache to: {}", path.display()))
    }

    pub fn default_cache_path(timeframe: Timeframe) -> PathBuf {
        PathBuf::from(PERSISTENCE.cache.directory).join(cache_filename(timeframe))
    }
}
