//! UTC calendar date/time with sub-second precision.
//!
//! Provides `UtcTime`, the civil representation used at the engine boundary.
//! Internally every search works on Julian Days (UT); this type only exists
//! to get dates in and out.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TimeError;
use crate::julian::{SECONDS_PER_DAY, calendar_to_jd, jd_to_calendar};

/// UTC calendar date with sub-second precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UtcTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: f64,
}

impl UtcTime {
    pub fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: f64) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Midnight UTC on the given date.
    pub fn date(year: i32, month: u32, day: u32) -> Self {
        Self::new(year, month, day, 0, 0, 0.0)
    }

    /// Build from a local wall-clock time and its UTC offset in hours
    /// (e.g. `+3.0` for UTC+3).
    pub fn from_local(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        offset_hours: f64,
    ) -> Self {
        let local_jd = Self::new(year, month, day, hour, minute, 0.0).to_jd();
        Self::from_jd(local_jd - offset_hours / 24.0)
    }

    /// Check month and day ranges.
    ///
    /// Hour/minute overflow (24:00, minute 60) is accepted on purpose: it
    /// normalises through [`UtcTime::to_jd`].
    pub fn validate(&self) -> Result<(), TimeError> {
        if !(1..=12).contains(&self.month) {
            return Err(TimeError::InvalidField("month must be 1..=12"));
        }
        if !(1..=31).contains(&self.day) {
            return Err(TimeError::InvalidField("day must be 1..=31"));
        }
        if !self.second.is_finite() || self.second < 0.0 {
            return Err(TimeError::InvalidField("second must be finite and >= 0"));
        }
        Ok(())
    }

    /// Convert to a Julian Day (UT).
    pub fn to_jd(&self) -> f64 {
        let day_frac = self.day as f64
            + self.hour as f64 / 24.0
            + self.minute as f64 / 1440.0
            + self.second / SECONDS_PER_DAY;
        calendar_to_jd(self.year, self.month, day_frac)
    }

    /// Convert from a Julian Day (UT), rounded to the millisecond.
    ///
    /// An `f64` Julian Day near the present only resolves to about 40 µs.
    pub fn from_jd(jd: f64) -> Self {
        let shifted = jd + 0.5;
        let mut day_number = shifted.floor();
        let mut seconds = ((shifted - day_number) * SECONDS_PER_DAY * 1e3).round() / 1e3;
        if seconds >= SECONDS_PER_DAY {
            day_number += 1.0;
            seconds -= SECONDS_PER_DAY;
        }

        let (year, month, day_frac) = jd_to_calendar(day_number - 0.5);
        let hour = (seconds / 3600.0).floor() as u32;
        let minute = ((seconds % 3600.0) / 60.0).floor() as u32;
        let second = seconds % 60.0;
        Self {
            year,
            month,
            day: day_frac.round() as u32,
            hour,
            minute,
            second,
        }
    }

    /// Checked variant of [`UtcTime::from_jd`].
    pub fn try_from_jd(jd: f64) -> Result<Self, TimeError> {
        if !jd.is_finite() {
            return Err(TimeError::NonFiniteJd);
        }
        Ok(Self::from_jd(jd))
    }

    /// Hours since midnight as a fraction.
    pub fn fractional_hour(&self) -> f64 {
        self.hour as f64 + self.minute as f64 / 60.0 + self.second / 3600.0
    }
}

impl fmt::Display for UtcTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.second as u32;
        let frac = self.second - whole as f64;
        if frac.abs() < 1e-9 {
            write!(
                f,
                "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
                self.year, self.month, self.day, self.hour, self.minute, whole
            )
        } else {
            write!(
                f,
                "{:04}-{:02}-{:02}T{:02}:{:02}:{:09.6}Z",
                self.year, self.month, self.day, self.hour, self.minute, self.second
            )
        }
    }
}

impl FromStr for UtcTime {
    type Err = TimeError;

    /// Parse `YYYY-MM-DD`, `YYYY-MM-DDThh:mm` or `YYYY-MM-DDThh:mm:ss[.fff]`,
    /// optionally suffixed with `Z` or `+00:00`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s
            .strip_suffix('Z')
            .or_else(|| s.strip_suffix("+00:00"))
            .unwrap_or(s);
        let (date_part, time_part) = match s.split_once('T') {
            Some((d, t)) => (d, Some(t)),
            None => (s, None),
        };

        let date_fields: Vec<&str> = date_part.split('-').collect();
        if date_fields.len() != 3 {
            return Err(TimeError::Parse(format!("expected YYYY-MM-DD, got {date_part}")));
        }
        let year: i32 = parse_field(date_fields[0])?;
        let month: u32 = parse_field(date_fields[1])?;
        let day: u32 = parse_field(date_fields[2])?;

        let (hour, minute, second) = match time_part {
            None => (0, 0, 0.0),
            Some(t) => {
                let time_fields: Vec<&str> = t.split(':').collect();
                match time_fields.as_slice() {
                    [h, m] => (parse_field(h)?, parse_field(m)?, 0.0),
                    [h, m, sec] => (parse_field(h)?, parse_field(m)?, parse_field(sec)?),
                    _ => {
                        return Err(TimeError::Parse(format!("expected hh:mm[:ss], got {t}")));
                    }
                }
            }
        };

        let utc = Self::new(year, month, day, hour, minute, second);
        utc.validate()?;
        Ok(utc)
    }
}

fn parse_field<T: FromStr>(s: &str) -> Result<T, TimeError> {
    s.parse()
        .map_err(|_| TimeError::Parse(format!("invalid number: {s:?}")))
}
