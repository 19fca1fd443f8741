//! WIB (UTC+7) calendar-day arithmetic.
//!
//! The upstream scheduler stamps every day-bucket at 00:00 WIB, and cache
//! validity is tied to WIB calendar-date rollover, not to elapsed time.
//! All helpers are pure functions over epoch-milliseconds so callers and
//! tests control "now" explicitly.

use chrono::{DateTime, FixedOffset, Utc};

/// Western Indonesia Time is a fixed UTC+7 offset (no DST).
pub const WIB_OFFSET_SECS: i32 = 7 * 3600;

const WIB_OFFSET_MS: i64 = WIB_OFFSET_SECS as i64 * 1000;
const DAY_MS: i64 = 86_400_000;

fn wib() -> FixedOffset {
    FixedOffset::east_opt(WIB_OFFSET_SECS).expect("UTC+7 is a valid offset")
}

/// Epoch-ms of 00:00:00.000 WIB on the calendar day containing `now_ms`.
pub fn day_start_ms(now_ms: i64) -> i64 {
    now_ms - (now_ms + WIB_OFFSET_MS).rem_euclid(DAY_MS)
}

/// Epoch-ms of the start of today's WIB calendar day.
pub fn today_start_ms() -> i64 {
    day_start_ms(Utc::now().timestamp_millis())
}

/// Whether two epoch-ms instants fall on the same WIB calendar date.
pub fn same_wib_day(a_ms: i64, b_ms: i64) -> bool {
    (a_ms + WIB_OFFSET_MS).div_euclid(DAY_MS) == (b_ms + WIB_OFFSET_MS).div_euclid(DAY_MS)
}

/// Render an epoch-ms instant as a WIB calendar date, e.g. "2026-08-22".
pub fn wib_date_string(ms: i64) -> String {
    match DateTime::from_timestamp_millis(ms) {
        Some(dt) => dt.with_timezone(&wib()).format("%Y-%m-%d").to_string(),
        None => format!("out-of-range:{ms}"),
    }
}
