//! Timestamp arithmetic over UTC seconds.
//!
//! Timestamps are unsigned seconds since the Unix epoch. "Local" time is the
//! result of applying a fixed whole-hour offset arithmetically; there is no
//! DST or leap-second handling.

pub const SECONDS_PER_DAY: u64 = 86400;
pub const DAYS_PER_WEEK: u64 = 7;

/// Apply a signed offset to an unsigned timestamp.
///
/// Callers must guarantee `ts >= offset_secs.unsigned_abs()` for negative
/// offsets; timestamps here sit decades past the epoch while offsets are
/// bounded to half a day, so the subtraction cannot underflow in practice.
pub fn offset_timestamp(ts: u64, offset_secs: i64) -> u64 {
    if offset_secs >= 0 {
        ts + offset_secs as u64
    } else {
        ts - offset_secs.unsigned_abs()
    }
}

/// Day of week for a UTC timestamp, 1 = Sunday .. 7 = Saturday.
///
/// Epoch day 0 (1970-01-01) was a Thursday; the `+ 4` shift anchors the
/// mapping and must stay exact.
pub fn day_of_week(ts: u64) -> u32 {
    ((ts / SECONDS_PER_DAY + 4) % DAYS_PER_WEEK + 1) as u32
}

/// UTC instant of the most recent local midnight at or before `ts`.
pub fn last_local_midnight(ts: u64, tz_offset_secs: i64) -> u64 {
    let local = offset_timestamp(ts, tz_offset_secs);
    let local_midnight = local - local % SECONDS_PER_DAY;
    offset_timestamp(local_midnight, -tz_offset_secs)
}
