use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::utils::TimeUtils;

/// Candle width. String forms match exchange shorthand (`15m`, `1h`, ...).
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, Hash, Eq, PartialEq, Display, EnumString,
)]
pub enum Timeframe {
    #[strum(serialize = "1m")]
    #[serde(rename = "1m")]
    M1,
    #[strum(serialize = "3m")]
    #[serde(rename = "3m")]
    M3,
    #[strum(serialize = "5m")]
    #[serde(rename = "5m")]
    M5,
    #[strum(serialize = "15m")]
    #[serde(rename = "15m")]
    M15,
    #[strum(serialize = "30m")]
    #[serde(rename = "30m")]
    M30,
    #[strum(serialize = "1h")]
    #[serde(rename = "1h")]
    H1,
    #[strum(serialize = "4h")]
    #[serde(rename = "4h")]
    H4,
    #[strum(serialize = "1d")]
    #[serde(rename = "1d")]
    D1,
    #[strum(serialize = "1w")]
    #[serde(rename = "1w")]
    W1,
}

impl Timeframe {
    pub fn interval_secs(&self) -> i64 {
        match self {
            Timeframe::M1 => TimeUtils::SECS_IN_MIN,
            Timeframe::M3 => TimeUtils::SECS_IN_3_MIN,
            Timeframe::M5 => TimeUtils::SECS_IN_5_MIN,
            Timeframe::M15 => TimeUtils::SECS_IN_15_MIN,
            Timeframe::M30 => TimeUtils::SECS_IN_30_MIN,
            Timeframe::H1 => TimeUtils::SECS_IN_H,
            Timeframe::H4 => TimeUtils::SECS_IN_4_H,
            Timeframe::D1 => TimeUtils::SECS_IN_D,
            Timeframe::W1 => TimeUtils::SECS_IN_W,
        }
    }
}

/// A symbol on a given timeframe. This is the unit the scanner analyses.
#[derive(Serialize, Deserialize, Debug, Clone, Hash, Eq, PartialEq)]
pub struct PairInterval {
    pub symbol: String,
    pub timeframe: Timeframe,
}

impl PairInterval {
    pub fn new(symbol: impl Into<String>, timeframe: Timeframe) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
        }
    }

    /// Key used in maps and file names, e.g. `BTCUSDT_15m`
    pub fn key(&self) -> String {
        format!("{}_{}", self.symbol.replace('/', ""), self.timeframe)
    }

    pub fn name(&self) -> &str {
        &self.symbol
    }
}

impl std::fmt::Display for PairInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} ({})", self.symbol, self.timeframe)
    }
}
