//! Deadline instants and submission-window membership derived from a stored
//! schedule configuration.

use crate::time_math::{self, DAYS_PER_WEEK, SECONDS_PER_DAY};
use crate::ScheduleConfig;

fn tz(config: &ScheduleConfig) -> i64 {
    config.utc_offset_secs as i64
}

/// Whether the local time-of-day of `now` is past the configured alarm time.
pub fn deadline_passed_today(config: &ScheduleConfig, now: u64) -> bool {
    let local = time_math::offset_timestamp(now, tz(config));
    local % SECONDS_PER_DAY > config.alarm_time_of_day as u64
}

/// The next instant (today or tomorrow) at which the alarm time-of-day occurs.
pub fn next_deadline_interval(config: &ScheduleConfig, now: u64) -> u64 {
    let mut deadline =
        time_math::last_local_midnight(now, tz(config)) + config.alarm_time_of_day as u64;
    if deadline_passed_today(config, now) {
        deadline += SECONDS_PER_DAY;
    }
    deadline
}

/// Today's deadline instant, whether it already fired or is about to.
///
/// Anchor for the weekday-distance walk in [`next_deadline_timestamp`].
pub fn last_deadline_interval(config: &ScheduleConfig, now: u64) -> u64 {
    time_math::last_local_midnight(now, tz(config)) + config.alarm_time_of_day as u64
}

/// True while `now` sits inside the trailing window before today's deadline.
///
/// Membership is purely time-of-day based; configured weekdays do not
/// constrain it.
pub fn in_submission_window(config: &ScheduleConfig, now: u64) -> bool {
    if deadline_passed_today(config, now) {
        return false;
    }
    next_deadline_interval(config, now) - now < config.submission_window as u64
}

/// First configured day strictly after `current_day`, wrapping to the lowest
/// configured day when the week is exhausted.
pub fn next_alarm_day(config: &ScheduleConfig, current_day: u32) -> u32 {
    for day in config.alarm_days.iter() {
        if day > current_day {
            return day;
        }
    }
    // alarm_days is validated non-empty at init.
    config.alarm_days.get(0).unwrap()
}

/// UTC instant of the next configured-weekday deadline after the most recent
/// daily deadline instant.
pub fn next_deadline_timestamp(config: &ScheduleConfig, now: u64) -> u64 {
    let reference = last_deadline_interval(config, now);
    let current_day = time_math::day_of_week(time_math::offset_timestamp(reference, tz(config)));
    let next_day = next_alarm_day(config, current_day);
    let days_away = if next_day > current_day {
        next_day - current_day
    } else {
        DAYS_PER_WEEK as u32 - current_day + next_alarm_day(config, 0)
    };
    reference + days_away as u64 * SECONDS_PER_DAY
}

pub fn time_to_next_deadline(config: &ScheduleConfig, now: u64) -> u64 {
    next_deadline_timestamp(config, now) - now
}
