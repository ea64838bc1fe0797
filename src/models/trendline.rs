use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::models::series::CandleSeries;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PivotKind {
    High,
    Low,
}

/// A confirmed local extremum ("fractal") at a bar index.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Pivot {
    pub index: usize,
    pub price: f64,
    pub kind: PivotKind,
}

/// Chart marker for a fractal. Same condition as a pivot, labelled with bar time.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Fractal {
    pub time: i64,
    pub index: usize,
    pub price: f64,
    pub kind: PivotKind,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TrendlineKind {
    /// Through two high pivots
    Resistance,
    /// Through two low pivots
    Support,
}

impl From<PivotKind> for TrendlineKind {
    fn from(kind: PivotKind) -> Self {
        match kind {
            PivotKind::High => TrendlineKind::Resistance,
            PivotKind::Low => TrendlineKind::Support,
        }
    }
}

/// Line in (bar index, price) space.
/// (x1, y1) is the earlier anchor pivot; (x2, y2) is the line extrapolated to the
/// last bar of the series it was built from.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Trendline {
    pub kind: TrendlineKind,
    pub x1: usize,
    pub y1: f64,
    pub x2: usize,
    pub y2: f64,
}

impl Trendline {
    /// Price of the line at the last bar
    pub fn line_value(&self) -> f64 {
        self.y2
    }

    /// Map the index coordinates onto the series' bar times for chart overlays.
    pub fn anchor_times(&self, series: &CandleSeries) -> (Option<i64>, Option<i64>) {
        (series.time_at(self.x1), series.time_at(self.x2))
    }
}
