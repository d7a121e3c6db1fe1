use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

/// Statutory retirement age in years.
pub const RETIREMENT_AGE: i32 = 65;

const SECS_PER_DAY: i64 = 86_400;
const SECS_PER_HOUR: i64 = 3_600;
const SECS_PER_MINUTE: i64 = 60;

/// Why a piece of text was not accepted as a birth date.
///
/// The controller treats every variant the same way; the distinction only
/// shows up in the log.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidDateInput {
    #[error("no date entered")]
    Empty,
    #[error("text is not a YYYY-MM-DD calendar date")]
    Malformed,
    #[error("year {0} is outside 1..=9999")]
    YearOutOfRange(i32),
}

/// Countdown components. `hours`, `minutes` and `seconds` are always below
/// their unit's modulus; `days` is unbounded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RemainingDuration {
    pub days: u64,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl RemainingDuration {
    pub fn total_seconds(&self) -> u64 {
        self.days * SECS_PER_DAY as u64
            + self.hours as u64 * SECS_PER_HOUR as u64
            + self.minutes as u64 * SECS_PER_MINUTE as u64
            + self.seconds as u64
    }

    pub fn is_zero(&self) -> bool {
        self.total_seconds() == 0
    }
}

/// Parses user text of the form `YYYY-MM-DD`. Surrounding whitespace is ignored.
pub fn parse_birth_date(text: &str) -> Result<NaiveDate, InvalidDateInput> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(InvalidDateInput::Empty);
    }
    if !is_iso_shape(trimmed) {
        return Err(InvalidDateInput::Malformed);
    }
    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| InvalidDateInput::Malformed)?;
    if !(1..=9999).contains(&date.year()) {
        return Err(InvalidDateInput::YearOutOfRange(date.year()));
    }
    Ok(date)
}

/// Exactly `DDDD-DD-DD`. chrono alone would also take `1960-3-1`, which
/// matters while a date is being typed one character at a time.
fn is_iso_shape(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// First day of the month following the 65th birthday.
pub fn compute_retirement_date(birth: NaiveDate) -> NaiveDate {
    let (year, month) = if birth.month() == 12 {
        (birth.year() + RETIREMENT_AGE + 1, 1)
    } else {
        (birth.year() + RETIREMENT_AGE, birth.month() + 1)
    };
    // Unreachable for years accepted by parse_birth_date.
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MAX)
}

/// The instant the countdown runs to: local midnight at the start of `date`.
pub fn retirement_instant(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Splits `target - now` into days/hours/minutes/seconds, flooring to whole
/// seconds. A target at or before `now` yields all zeros.
pub fn compute_remaining_duration(target: NaiveDateTime, now: NaiveDateTime) -> RemainingDuration {
    let secs = target.signed_duration_since(now).num_seconds();
    if secs <= 0 {
        return RemainingDuration::default();
    }
    RemainingDuration {
        days: (secs / SECS_PER_DAY) as u64,
        hours: ((secs % SECS_PER_DAY) / SECS_PER_HOUR) as u32,
        minutes: ((secs % SECS_PER_HOUR) / SECS_PER_MINUTE) as u32,
        seconds: (secs % SECS_PER_MINUTE) as u32,
    }
}
