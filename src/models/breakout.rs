use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::models::trendline::{Trendline, TrendlineKind};
use crate::utils::time_utils::epoch_sec_to_utc;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    Upward,
    Downward,
}

impl From<TrendlineKind> for Direction {
    fn from(kind: TrendlineKind) -> Self {
        match kind {
            TrendlineKind::Resistance => Direction::Upward,
            TrendlineKind::Support => Direction::Downward,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Strength {
    Weak,
    Medium,
    Strong,
}

/// A trendline crossed by the last bar's range.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Breakout {
    pub symbol: String,
    pub direction: Direction,
    pub strength: Strength,
    /// Close of the breakout bar
    pub price: f64,
    pub percent_change: f64,
    pub volume: f64,
    /// Bar volume over the mean of the prior bars. 0.0 when there is no prior
    /// bar or the prior mean is zero, which grades the breakout Weak.
    pub volume_ratio: f64,
    /// Breakout bar time (unix seconds)
    pub timestamp: i64,
    pub broken_line: Trendline,
    pub line_start_time: Option<i64>,
    pub line_end_time: Option<i64>,
}

impl Breakout {
    /// One-line alert text, e.g. `BTC/USDT upward (strong) @ 43120.5000 +3.40% vol x1.80`
    pub fn description(&self) -> String {
        format!(
            "{} {} ({}) @ {:.4} {:+.2}% vol x{:.2} [{}]",
            self.symbol,
            self.direction,
            self.strength,
            self.price,
            self.percent_change,
            self.volume_ratio,
            epoch_sec_to_utc(self.timestamp),
        )
    }
}

/// Per-direction outcome of one classification. Both can fire on the same bar.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct BreakoutSignals {
    pub upward: Option<Breakout>,
    pub downward: Option<Breakout>,
}

impl BreakoutSignals {
    pub fn is_empty(&self) -> bool {
        self.upward.is_none() && self.downward.is_none()
    }

    /// Upward first, then downward
    pub fn iter(&self) -> impl Iterator<Item = &Breakout> {
        self.upward.iter().chain(self.downward.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_line_kind() {
        assert_eq!(Direction::from(TrendlineKind::Resistance), Direction::Upward);
        assert_eq!(Direction::from(TrendlineKind::Support), Direction::Downward);
    }

    #[test]
    fn test_strength_ordering_and_names() {
        assert!(Strength::Strong > Strength::Medium);
        assert!(Strength::Medium > Strength::Weak);
        assert_eq!(Strength::Medium.to_string(), "medium");
    }

    #[test]
    fn test_description() {
        let breakout = Breakout {
            symbol: "BTC/USDT".to_string(),
            direction: Direction::Upward,
            strength: Strength::Strong,
            price: 101.5,
            percent_change: 3.4,
            volume: 180.0,
            volume_ratio: 1.8,
            timestamp: 0,
            broken_line: Trendline {
                kind: TrendlineKind::Resistance,
                x1: 0,
                y1: 100.0,
                x2: 10,
                y2: 101.0,
            },
            line_start_time: Some(0),
            line_end_time: Some(0),
        };
        assert_eq!(
            breakout.description(),
            "BTC/USDT upward (strong) @ 101.5000 +3.40% vol x1.80 [1970-01-01 00:00]"
        );
    }
}
