use anyhow::{Context, Result};
use breakout_scanner::config::{PERSISTENCE, SCANNER};
use breakout_scanner::data::timeseries::SeriesCollection;
use breakout_scanner::data::timeseries::cache_file::CacheFile;
use breakout_scanner::data::timeseries::json_dir::JsonDirSource;
use breakout_scanner::domain::{Candle, PairInterval, Timeframe};
use breakout_scanner::models::CandleSeries;
use breakout_scanner::utils::time_utils::now_as_timestamp_secs;
use clap::Parser;
use itertools::{Itertools, iproduct};
use std::path::PathBuf;

/// Write deterministic synthetic candle caches for the default symbols.
#[derive(Parser, Debug)]
struct Args {
    /// Timeframes to generate, e.g. 15m,1h
    #[arg(long, value_delimiter = ',', default_value = "15m")]
    timeframes: Vec<Timeframe>,

    #[arg(long, default_value_t = 200)]
    bars: usize,

    /// Also write JSON row files here
    #[arg(long)]
    json_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    build_demo_cache(&Args::parse())
}

fn build_demo_cache(args: &Args) -> Result<()> {
    let end_time = now_as_timestamp_secs();

    let by_timeframe = iproduct!(
        args.timeframes.iter().copied(),
        SCANNER.default_symbols.iter().enumerate()
    )
    .map(|(tf, (seed, symbol))| synthetic_series(PairInterval::new(*symbol, tf), seed, args.bars, end_time))
    .collect::<Result<Vec<_>>>()?
    .into_iter()
    .into_group_map_by(|series| series.pair_interval.timeframe);

    for (timeframe, series_data) in by_timeframe {
        if let Some(dir) = &args.json_dir {
            for series in &series_data {
                JsonDirSource::write_series(dir, series)?;
            }
        }

        let collection = SeriesCollection {
            name: "Demo Series Collection".to_string(),
            version: PERSISTENCE.cache.version,
            series_data,
        };
        let output_path = CacheFile::default_cache_path(timeframe);
        let output_cache = CacheFile::new(timeframe, collection, PERSISTENCE.cache.version);
        output_cache.save_to_path(&output_path)?;

        println!(
            "✅ Demo cache written to {:?} with {} pairs.",
            output_path,
            output_cache.data.series_data.len()
        );
    }
    Ok(())
}

/// Oscillating, slowly drifting prices. Every other symbol ends on a high-volume
/// surge so the demo has something to alert on.
fn synthetic_series(
    pair: PairInterval,
    seed: usize,
    bars: usize,
    end_time: i64,
) -> Result<CandleSeries> {
    let step = pair.timeframe.interval_secs();
    let start = end_time - end_time % step - step * bars as i64;
    let base = 100.0 * (seed + 1) as f64;
    let phase = seed as f64;

    let mut candles: Vec<Candle> = (0..bars)
        .map(|i| {
            let x = i as f64;
            let close = base * (1.0 + 0.03 * (x * 0.35 + phase).sin() - 0.0005 * x);
            let open = base * (1.0 + 0.03 * ((x - 1.0) * 0.35 + phase).sin() - 0.0005 * x);
            let high = open.max(close) * 1.004;
            let low = open.min(close) * 0.996;
            let volume = 1_000.0 + 200.0 * (x * 0.2 + phase).cos();
            Candle::new(start + step * i as i64, open, high, low, close, volume)
        })
        .collect();

    if seed % 2 == 1 {
        if let Some(last) = candles.last_mut() {
            let prior_high = last.high;
            last.close = prior_high * 1.05;
            last.high = last.close * 1.002;
            last.volume *= 3.0;
        }
    }

    CandleSeries::from_candles(pair.clone(), &candles)
        .with_context(|| format!("Synthetic series for {} is malformed", pair))
}
