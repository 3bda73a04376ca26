// --- File: crates/slotbook_slots/src/template.rs ---
//! Weekly availability templates.
//!
//! A template is a time zone plus at most one bookable window per day of the week.
//! Windows are expressed in local wall-clock time and may end at `24:00`.

use chrono::{Duration, Weekday};
use chrono_tz::Tz;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Invalid time of day '{0}', expected HH:MM between 00:00 and 24:00")]
    InvalidTimeOfDay(String),
    #[error("Invalid day of week {0}, expected 0 (Sunday) through 6 (Saturday)")]
    InvalidDayOfWeek(u8),
    #[error("Window for {day} must start before it ends ({start} >= {end})")]
    EmptyWindow {
        day: Weekday,
        start: TimeOfDay,
        end: TimeOfDay,
    },
    #[error("More than one availability rule targets {0}")]
    DuplicateDay(Weekday),
    #[error("Unknown time zone '{0}'")]
    UnknownTimeZone(String),
}

/// Minute-resolution local time of day, `00:00` through `24:00` inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u32);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);
    pub const END_OF_DAY: TimeOfDay = TimeOfDay(MINUTES_PER_DAY);

    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if minute >= 60 {
            return None;
        }
        let total = hour.checked_mul(60)?.checked_add(minute)?;
        (total <= MINUTES_PER_DAY).then_some(TimeOfDay(total))
    }

    pub fn minutes_since_midnight(self) -> u32 {
        self.0
    }

    /// Offset from local midnight.
    pub fn offset(self) -> Duration {
        Duration::minutes(i64::from(self.0))
    }
}

impl FromStr for TimeOfDay {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TemplateError::InvalidTimeOfDay(s.to_string());
        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if minute.len() != 2 || !digits(hour) || !digits(minute) {
            return Err(invalid());
        }
        let hour: u32 = hour.parse().map_err(|_| invalid())?;
        let minute: u32 = minute.parse().map_err(|_| invalid())?;
        TimeOfDay::from_hm(hour, minute).ok_or_else(invalid)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// Maps a day index (0 = Sunday … 6 = Saturday) to a [`Weekday`].
pub fn weekday_from_index(day: u8) -> Result<Weekday, TemplateError> {
    match day {
        0 => Ok(Weekday::Sun),
        1 => Ok(Weekday::Mon),
        2 => Ok(Weekday::Tue),
        3 => Ok(Weekday::Wed),
        4 => Ok(Weekday::Thu),
        5 => Ok(Weekday::Fri),
        6 => Ok(Weekday::Sat),
        other => Err(TemplateError::InvalidDayOfWeek(other)),
    }
}

/// Parses an IANA zone name such as `America/Chicago`.
pub fn parse_time_zone(name: &str) -> Result<Tz, TemplateError> {
    Tz::from_str(name).map_err(|_| TemplateError::UnknownTimeZone(name.to_string()))
}

/// One recurring bookable window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityRule {
    pub weekday: Weekday,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl AvailabilityRule {
    pub fn new(weekday: Weekday, start: TimeOfDay, end: TimeOfDay) -> Result<Self, TemplateError> {
        if start >= end {
            return Err(TemplateError::EmptyWindow {
                day: weekday,
                start,
                end,
            });
        }
        Ok(Self {
            weekday,
            start,
            end,
        })
    }

    /// Builds a rule from a day index and two `HH:MM` strings.
    pub fn parse(day: u8, start: &str, end: &str) -> Result<Self, TemplateError> {
        Self::new(weekday_from_index(day)?, start.parse()?, end.parse()?)
    }

    pub fn window_length(&self) -> Duration {
        self.end.offset() - self.start.offset()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityTemplate {
    time_zone: Tz,
    rules: Vec<AvailabilityRule>,
}

impl AvailabilityTemplate {
    /// Creates a template, rejecting two rules for the same day.
    pub fn new(
        time_zone: Tz,
        rules: impl IntoIterator<Item = AvailabilityRule>,
    ) -> Result<Self, TemplateError> {
        let mut collected: Vec<AvailabilityRule> = Vec::new();
        for rule in rules {
            if collected.iter().any(|r| r.weekday == rule.weekday) {
                return Err(TemplateError::DuplicateDay(rule.weekday));
            }
            collected.push(rule);
        }
        Ok(Self {
            time_zone,
            rules: collected,
        })
    }

    /// The same window on every day of the week.
    pub fn daily(time_zone: Tz, start: TimeOfDay, end: TimeOfDay) -> Result<Self, TemplateError> {
        let rules = [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]
        .into_iter()
        .map(|day| AvailabilityRule::new(day, start, end))
        .collect::<Result<Vec<_>, _>>()?;
        Self::new(time_zone, rules)
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    pub fn rules(&self) -> &[AvailabilityRule] {
        &self.rules
    }

    pub fn rule_for(&self, weekday: Weekday) -> Option<&AvailabilityRule> {
        self.rules.iter().find(|rule| rule.weekday == weekday)
    }
}
