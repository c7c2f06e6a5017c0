#![no_std]
use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, symbol_short, vec, Address, Env, Vec,
};

pub mod accounting;
pub mod deadline;
pub mod time_math;

use time_math::SECONDS_PER_DAY;

// Storage TTL constants for active data
const INSTANCE_LIFETIME_THRESHOLD: u32 = 17280; // ~1 day
const INSTANCE_BUMP_AMOUNT: u32 = 518400; // ~30 days

/// Immutable alarm configuration, set by `init`.
#[derive(Clone)]
#[contracttype]
pub struct ScheduleConfig {
    /// Seconds since local midnight, < 86400.
    pub alarm_time_of_day: u32,
    /// Weekday codes (1 = Sunday .. 7 = Saturday), strictly increasing.
    pub alarm_days: Vec<u32>,
    /// Trailing acceptance window before each deadline, in seconds.
    pub submission_window: u32,
    /// Whole-hour timezone offset in seconds, exclusive of +/-12h.
    pub utc_offset_secs: i32,
}

/// Mutable schedule counters.
#[derive(Clone)]
#[contracttype]
pub struct ScheduleState {
    /// UTC instant the deadline cycle began; 0 until `start`.
    pub activated_at: u64,
    /// UTC instant of the most recent accepted confirmation; 0 before any.
    pub last_entry_at: u64,
    /// Seven counter slots indexed by weekday code minus one; slots only grow.
    pub weekly_entries: Vec<u32>,
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    InvalidAlarmTime = 1,
    InvalidDays = 2,
    InvalidSubmissionWindow = 3,
    InvalidTimezoneOffset = 4,
    NotInitialized = 5,
    NotStarted = 6,
    AlreadyStarted = 7,
    AlreadySubmittedToday = 8,
    NotInSubmissionWindow = 9,
    Unauthorized = 10,
}

/// Events emitted on successful state transitions, for external observers
#[contracttype]
#[derive(Clone)]
pub enum ScheduleEvent {
    Initialized,
    Started,
    EntryRecorded,
}

/// Weekly check-in obligations against a fixed alarm schedule.
///
/// Every operation takes the current time as an explicit argument; the
/// contract never reads the ledger clock, so a replayed sequence of
/// `(operation, timestamp)` calls is fully deterministic.
#[contract]
pub struct CheckInSchedule;

#[contractimpl]
impl CheckInSchedule {
    /// Configure the schedule and bind its owner.
    ///
    /// # Arguments
    /// * `owner` - Address of the participant (must authorize)
    /// * `alarm_time_of_day` - Seconds since local midnight, < 86400
    /// * `alarm_days` - Strictly increasing weekday codes, 1 = Sunday .. 7 = Saturday
    /// * `submission_window` - Seconds before a deadline during which a
    ///   confirmation is accepted, 0 < window < 86400
    /// * `utc_offset_secs` - Whole-hour timezone offset, strictly between +/-43200
    ///
    /// Re-configuring is allowed until `start`; after that the schedule is
    /// fixed for its lifetime.
    ///
    /// # Errors
    /// * `InvalidAlarmTime` / `InvalidDays` / `InvalidSubmissionWindow` /
    ///   `InvalidTimezoneOffset` - One per violated constraint; nothing is stored
    /// * `AlreadyStarted` - If the deadline cycle has already begun
    pub fn init(
        env: Env,
        owner: Address,
        alarm_time_of_day: u32,
        alarm_days: Vec<u32>,
        submission_window: u32,
        utc_offset_secs: i32,
    ) -> Result<(), Error> {
        // Access control: require owner authorization
        owner.require_auth();

        if alarm_time_of_day as u64 >= SECONDS_PER_DAY {
            return Err(Error::InvalidAlarmTime);
        }
        Self::validate_days(&alarm_days)?;
        if submission_window == 0 || submission_window as u64 >= SECONDS_PER_DAY {
            return Err(Error::InvalidSubmissionWindow);
        }
        if utc_offset_secs <= -43200 || utc_offset_secs >= 43200 || utc_offset_secs % 3600 != 0 {
            return Err(Error::InvalidTimezoneOffset);
        }

        if let Some(state) = Self::load_state(&env) {
            if state.activated_at != 0 {
                return Err(Error::AlreadyStarted);
            }
        }

        Self::extend_instance_ttl(&env);
        let config = ScheduleConfig {
            alarm_time_of_day,
            alarm_days,
            submission_window,
            utc_offset_secs,
        };
        env.storage()
            .instance()
            .set(&symbol_short!("CONFIG"), &config);
        env.storage()
            .instance()
            .set(&symbol_short!("OWNER"), &owner);
        env.storage()
            .instance()
            .set(&symbol_short!("STATE"), &Self::empty_state(&env));

        // Emit event for external observers
        env.events().publish(
            (symbol_short!("checkin"), ScheduleEvent::Initialized),
            owner,
        );

        Ok(())
    }

    /// Begin the deadline cycle.
    ///
    /// The activation timestamp is the next daily alarm instant after `now`
    /// and is fixed once set.
    ///
    /// # Errors
    /// * `NotInitialized` - If `init` has not run
    /// * `AlreadyStarted` - If the cycle already began
    /// * `Unauthorized` - If `caller` is not the bound owner
    pub fn start(env: Env, caller: Address, now: u64) -> Result<(), Error> {
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        let config = Self::load_config(&env).ok_or(Error::NotInitialized)?;
        let mut state = Self::load_state(&env).ok_or(Error::NotInitialized)?;
        if state.activated_at != 0 {
            return Err(Error::AlreadyStarted);
        }

        Self::extend_instance_ttl(&env);
        state.activated_at = deadline::next_deadline_interval(&config, now);
        env.storage()
            .instance()
            .set(&symbol_short!("STATE"), &state);

        env.events().publish(
            (symbol_short!("checkin"), ScheduleEvent::Started),
            state.activated_at,
        );

        Ok(())
    }

    /// Record a confirmation for the upcoming deadline.
    ///
    /// Accepted only inside the submission window, and at most once per
    /// deadline: a resubmission is rejected until a full day minus the window
    /// has elapsed since the last accepted entry. Failure leaves state
    /// untouched.
    ///
    /// # Errors
    /// * `NotInitialized` / `NotStarted` - State guards, checked first
    /// * `AlreadySubmittedToday` - Too soon after the previous entry
    /// * `NotInSubmissionWindow` - Outside the acceptance window
    /// * `Unauthorized` - If `caller` is not the bound owner
    pub fn record_entry(env: Env, caller: Address, now: u64) -> Result<(), Error> {
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        let config = Self::load_config(&env).ok_or(Error::NotInitialized)?;
        let mut state = Self::load_state(&env).ok_or(Error::NotInitialized)?;
        if state.activated_at == 0 {
            return Err(Error::NotStarted);
        }

        if now.saturating_sub(state.last_entry_at)
            < SECONDS_PER_DAY - config.submission_window as u64
        {
            return Err(Error::AlreadySubmittedToday);
        }
        if !deadline::in_submission_window(&config, now) {
            return Err(Error::NotInSubmissionWindow);
        }

        Self::extend_instance_ttl(&env);
        state.last_entry_at = now;
        let slot = time_math::day_of_week(time_math::offset_timestamp(
            now,
            config.utc_offset_secs as i64,
        )) - 1;
        let count = state.weekly_entries.get(slot).unwrap_or(0);
        state.weekly_entries.set(slot, count + 1);
        env.storage()
            .instance()
            .set(&symbol_short!("STATE"), &state);

        env.events().publish(
            (symbol_short!("checkin"), ScheduleEvent::EntryRecorded),
            (caller, now),
        );

        Ok(())
    }

    /// Total confirmations recorded across all weekdays.
    pub fn entries(env: Env) -> Result<u64, Error> {
        let (_, state) = Self::require_started(&env)?;
        let mut total = 0u64;
        for count in state.weekly_entries.iter() {
            total += count as u64;
        }
        Ok(total)
    }

    /// Whether `now` falls inside the acceptance window before today's
    /// deadline.
    pub fn in_submission_window(env: Env, now: u64) -> Result<bool, Error> {
        let (config, _) = Self::require_started(&env)?;
        Ok(deadline::in_submission_window(&config, now))
    }

    /// Count of scheduled deadlines still unconfirmed from activation
    /// through `now`.
    pub fn missed_deadlines(env: Env, now: u64) -> Result<u64, Error> {
        let (config, state) = Self::require_started(&env)?;
        Ok(accounting::missed_deadlines(&config, &state, now))
    }

    /// UTC instant of the next configured-weekday deadline.
    pub fn next_deadline_timestamp(env: Env, now: u64) -> Result<u64, Error> {
        let (config, _) = Self::require_started(&env)?;
        Ok(deadline::next_deadline_timestamp(&config, now))
    }

    /// Seconds from `now` until the next configured-weekday deadline.
    pub fn time_to_next_deadline(env: Env, now: u64) -> Result<u64, Error> {
        let (config, _) = Self::require_started(&env)?;
        Ok(deadline::time_to_next_deadline(&config, now))
    }

    /// Read back the stored configuration, if initialized.
    pub fn get_config(env: Env) -> Option<ScheduleConfig> {
        Self::load_config(&env)
    }

    /// Read back the mutable counters, if initialized.
    pub fn get_state(env: Env) -> Option<ScheduleState> {
        Self::load_state(&env)
    }

    /// The participant bound at `init`, if any.
    pub fn get_owner(env: Env) -> Option<Address> {
        env.storage().instance().get(&symbol_short!("OWNER"))
    }

    fn validate_days(days: &Vec<u32>) -> Result<(), Error> {
        if days.is_empty() || days.len() > 7 {
            return Err(Error::InvalidDays);
        }
        let mut previous = 0u32;
        for day in days.iter() {
            // Strictly increasing covers unsorted and duplicate inputs.
            if day < 1 || day > 7 || day <= previous {
                return Err(Error::InvalidDays);
            }
            previous = day;
        }
        Ok(())
    }

    fn require_owner(env: &Env, caller: &Address) -> Result<(), Error> {
        let owner: Address = env
            .storage()
            .instance()
            .get(&symbol_short!("OWNER"))
            .ok_or(Error::NotInitialized)?;
        if owner != *caller {
            return Err(Error::Unauthorized);
        }
        Ok(())
    }

    fn require_started(env: &Env) -> Result<(ScheduleConfig, ScheduleState), Error> {
        let config = Self::load_config(env).ok_or(Error::NotInitialized)?;
        let state = Self::load_state(env).ok_or(Error::NotInitialized)?;
        if state.activated_at == 0 {
            return Err(Error::NotStarted);
        }
        Ok((config, state))
    }

    fn load_config(env: &Env) -> Option<ScheduleConfig> {
        env.storage().instance().get(&symbol_short!("CONFIG"))
    }

    fn load_state(env: &Env) -> Option<ScheduleState> {
        env.storage().instance().get(&symbol_short!("STATE"))
    }

    fn empty_state(env: &Env) -> ScheduleState {
        ScheduleState {
            activated_at: 0,
            last_entry_at: 0,
            weekly_entries: vec![env, 0, 0, 0, 0, 0, 0, 0],
        }
    }

    /// Extend the TTL of instance storage
    fn extend_instance_ttl(env: &Env) {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
    }
}
