use chrono::{DateTime, Utc};

pub struct TimeUtils;

impl TimeUtils {
    pub const SECS_IN_MIN: i64 = 60;
    pub const SECS_IN_3_MIN: i64 = Self::SECS_IN_MIN * 3;
    pub const SECS_IN_5_MIN: i64 = Self::SECS_IN_MIN * 5;
    pub const SECS_IN_15_MIN: i64 = Self::SECS_IN_MIN * 15;
    pub const SECS_IN_30_MIN: i64 = Self::SECS_IN_MIN * 30;
    pub const SECS_IN_H: i64 = Self::SECS_IN_MIN * 60;
    pub const SECS_IN_4_H: i64 = Self::SECS_IN_H * 4;
    pub const SECS_IN_D: i64 = Self::SECS_IN_H * 24;
    pub const SECS_IN_W: i64 = Self::SECS_IN_D * 7;
    pub const STANDARD_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";
}

/// Candle times are unix seconds. Used for display (logs, CLI report).
pub fn epoch_sec_to_utc(epoch_sec: i64) -> String {
    match DateTime::from_timestamp(epoch_sec, 0) {
        Some(dt) => dt.format(TimeUtils::STANDARD_TIME_FORMAT).to_string(),
        None => String::new(),
    }
}

pub fn now_as_timestamp_secs() -> i64 {
    Utc::now().timestamp()
}
